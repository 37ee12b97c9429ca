use crate::error::{ItineraryError, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// How much of the raw model output to include in debug logs
    pub preview_chars: usize,
    /// Fill empty extras from labeled headings in the raw text
    pub label_fallback: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            preview_chars: 800,
            label_fallback: true,
        }
    }
}

impl PipelineConfig {
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn with_label_fallback(mut self, label_fallback: bool) -> Self {
        self.label_fallback = label_fallback;
        self
    }
}

/// Settings for the model-backed planner.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: Option<u32>,
    /// Catalog rows listed in the prompt dataset
    pub dataset_sample: usize,
}

impl PlannerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
            max_tokens: Some(8000),
            dataset_sample: 20,
        }
    }

    /// Read `OPENAI_API_KEY` (required) and apply [`Self::with_env_overrides`].
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ItineraryError::Config(
                "OPENAI_API_KEY environment variable must be set before planning an itinerary"
                    .to_string(),
            )
        })?;

        Self::new(api_key).with_env_overrides()
    }

    /// Apply `OPENAI_BASE_URL` / `OPENROUTER_BASE_URL`, `ITINERARY_MODEL` and
    /// `ITINERARY_TIMEOUT_SECS` when they are set.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(base_url) =
            std::env::var("OPENAI_BASE_URL").or_else(|_| std::env::var("OPENROUTER_BASE_URL"))
        {
            self.base_url = base_url;
        }
        if let Ok(model) = std::env::var("ITINERARY_MODEL") {
            self.model = model;
        }
        if let Ok(raw) = std::env::var("ITINERARY_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ItineraryError::Config(format!("ITINERARY_TIMEOUT_SECS must be a number, got {raw:?}"))
            })?;
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_dataset_sample(mut self, dataset_sample: usize) -> Self {
        self.dataset_sample = dataset_sample;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.preview_chars, 800);
        assert!(config.label_fallback);
        assert!(!config.with_label_fallback(false).label_fallback);
    }

    #[test]
    fn test_planner_builders() {
        let config = PlannerConfig::new("key")
            .with_model("openai/gpt-4.1-mini")
            .with_base_url("http://localhost:9999")
            .with_timeout(Duration::from_secs(5))
            .with_dataset_sample(3);
        assert_eq!(config.model, "openai/gpt-4.1-mini");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.dataset_sample, 3);
    }
}
