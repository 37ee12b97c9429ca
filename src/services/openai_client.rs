use std::{future::Future, pin::Pin, time::Duration};

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use super::model_client::{first_choice_text, ChatCompletionRequest, ModelClient};
use crate::config::DEFAULT_BASE_URL;
use crate::error::{ItineraryError, Result};

const MAX_RETRIES: usize = 3;

/// OpenAI-compatible chat completions client (OpenRouter by default).
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a chat completion body, retrying 429s and 5xx responses with backoff.
    pub async fn chat_completion(&self, body: &Value, timeout: Duration) -> Result<Value> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ItineraryError::Http(format!("Failed to build HTTP client: {err}")))?;

        let request_url = build_chat_url(&self.base_url);
        let mut attempt = 0;
        let mut backoff = Duration::from_millis(250);

        loop {
            let response = client
                .post(&request_url)
                .bearer_auth(&self.api_key)
                .header("X-Title", "itinerary-rs")
                .json(body)
                .send()
                .await
                .map_err(|err| ItineraryError::Http(format!("HTTP request failed: {err}")))?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response
                .text()
                .await
                .map_err(|err| ItineraryError::Http(format!("Failed to read response: {err}")))?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < MAX_RETRIES {
                    warn!(target: "itinerary::model", attempt, ?retry_after, "rate limited, retrying");
                    tokio::time::sleep(retry_after).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(ItineraryError::RateLimit {
                    retry_after: retry_after.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < MAX_RETRIES {
                warn!(target: "itinerary::model", attempt, %status, "server error, retrying");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            if !status.is_success() {
                let api_message = serde_json::from_str::<Value>(&response_text)
                    .ok()
                    .and_then(|body| {
                        body.get("error")?
                            .get("message")?
                            .as_str()
                            .map(str::to_string)
                    })
                    .unwrap_or(response_text);

                return Err(ItineraryError::Http(format!(
                    "HTTP {} error: {}",
                    status, api_message
                )));
            }

            let response_json: Value = serde_json::from_str(&response_text).map_err(|err| {
                ItineraryError::Model(format!("Response is not JSON ({err}): {response_text}"))
            })?;

            if let Some(error) = response_json.get("error") {
                let error_message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                return Err(ItineraryError::Model(format!("API error: {}", error_message)));
            }

            return Ok(response_json);
        }
    }
}

impl ModelClient for OpenAIClient {
    fn complete(
        &self,
        request: ChatCompletionRequest,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        Box::pin(async move {
            let model = request.model().to_string();
            let response = self.chat_completion(&request.into_value(), timeout).await?;

            let text = first_choice_text(&response).ok_or_else(|| {
                ItineraryError::Model(format!("Model `{model}` returned no text content"))
            })?;
            debug!(target: "itinerary::model", model = %model, chars = text.len(), "completion received");
            Ok(text.to_string())
        })
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chat_url() {
        assert_eq!(
            build_chat_url("https://openrouter.ai/api/v1/"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("http://localhost:1234/v1/chat/completions"),
            "http://localhost:1234/v1/chat/completions"
        );
    }
}
