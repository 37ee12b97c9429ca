use crate::error::Result;
use serde_json::{json, Value};
use std::{future::Future, pin::Pin, time::Duration};

/// Source of raw model text for a rendered prompt.
pub trait ModelClient: Send + Sync + std::fmt::Debug {
    /// Run one chat completion and return the assistant's text verbatim.
    fn complete(
        &self,
        request: ChatCompletionRequest,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    max_tokens: Option<u32>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            response_format: None,
        }
    }

    /// Single user message carrying the whole prompt.
    pub fn from_prompt(model: impl Into<String>, prompt: &str) -> Self {
        Self::new(model, vec![json!({ "role": "user", "content": prompt })])
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Ask the provider for a bare JSON object reply.
    pub fn with_json_object_output(mut self) -> Self {
        self.response_format = Some(json!({ "type": "json_object" }));
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[Value] {
        &self.messages
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}

/// Assistant text of the first choice in a chat completion response.
pub(crate) fn first_choice_text(response: &Value) -> Option<&str> {
    response
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let body = ChatCompletionRequest::from_prompt("m", "plan a trip")
            .with_max_tokens(Some(100))
            .into_value();
        assert_eq!(body["model"], "m");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "plan a trip");
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body.as_object().map(|body| body.len()), Some(3));

        let body = ChatCompletionRequest::from_prompt("m", "x")
            .with_json_object_output()
            .into_value();
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_first_choice_text() {
        let response = json!({"choices": [{"message": {"role": "assistant", "content": "{}"}}]});
        assert_eq!(first_choice_text(&response), Some("{}"));
        assert_eq!(first_choice_text(&json!({"choices": []})), None);
        assert_eq!(
            first_choice_text(&json!({"choices": [{"message": {"content": null}}]})),
            None
        );
    }
}
