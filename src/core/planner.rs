use super::pipeline::ItineraryPipeline;
use crate::{
    config::PlannerConfig,
    error::{ItineraryError, Result},
    services::{
        model_client::{ChatCompletionRequest, ModelClient},
        openai_client::OpenAIClient,
        prompt::{render_prompt, TripRequest},
    },
    types::{NormalizedItinerary, PlaceCatalogEntry},
};
use tracing::info;

/// Prompt, model call and normalization for one trip request.
#[derive(Debug)]
pub struct ItineraryPlanner {
    client: Box<dyn ModelClient>,
    config: PlannerConfig,
    pipeline: ItineraryPipeline,
}

impl ItineraryPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        let client = OpenAIClient::new(config.api_key.clone()).with_base_url(config.base_url.clone());
        Self {
            client: Box::new(client),
            config,
            pipeline: ItineraryPipeline::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(PlannerConfig::from_env()?))
    }

    /// Swap the model backend, keeping the rest of the configuration.
    pub fn with_client(mut self, client: impl ModelClient + 'static) -> Self {
        self.client = Box::new(client);
        self
    }

    pub fn with_pipeline(mut self, pipeline: ItineraryPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub async fn plan(
        &self,
        request: &TripRequest,
        catalog: &[PlaceCatalogEntry],
    ) -> Result<NormalizedItinerary> {
        if request.days == 0 {
            return Err(ItineraryError::Validation(
                "trip must span at least one day".to_string(),
            ));
        }
        if catalog.is_empty() {
            return Err(ItineraryError::Validation(format!(
                "no catalog places for {}",
                request.destination_label()
            )));
        }

        let prompt = render_prompt(request, catalog, self.config.dataset_sample);
        let completion = ChatCompletionRequest::from_prompt(&self.config.model, &prompt)
            .with_max_tokens(self.config.max_tokens)
            .with_json_object_output();

        info!(
            target: "itinerary::planner",
            model = %self.config.model,
            days = request.days,
            catalog = catalog.len(),
            "requesting itinerary"
        );
        let raw_text = self.client.complete(completion, self.config.timeout).await?;

        self.pipeline.run(&raw_text, request.days, catalog)
    }
}
