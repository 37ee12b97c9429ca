//! Collaborators around the core: model calls, prompt rendering, catalog and images.

pub mod catalog;
pub mod image_cache;
pub mod model_client;
pub mod openai_client;
pub mod prompt;

pub use catalog::{load_catalog, parse_catalog, DEFAULT_CATALOG_LIMIT};
pub use image_cache::ImageCache;
pub use model_client::{ChatCompletionRequest, ModelClient};
pub use openai_client::OpenAIClient;
pub use prompt::{dataset_lines, render_prompt, TripRequest};
