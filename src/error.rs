use thiserror::Error;

/// Number of characters of offending text carried by extraction errors.
pub const PREVIEW_CHARS: usize = 80;

/// Main error type for the itinerary pipeline and its collaborators
#[derive(Error, Debug)]
pub enum ItineraryError {
    #[error("Model output is empty")]
    EmptyInput,

    #[error("No JSON object start found in model output: {preview:?}")]
    NoObjectStart { preview: String },

    #[error("Could not extract a balanced JSON object from model output: {preview:?}")]
    UnbalancedObject { preview: String },

    #[error("Extracted object is not valid JSON ({source}): {preview:?}")]
    InvalidSyntax {
        preview: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ItineraryError>;

impl ItineraryError {
    /// True for the four ways the model output can fail to yield a document.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            ItineraryError::EmptyInput
                | ItineraryError::NoObjectStart { .. }
                | ItineraryError::UnbalancedObject { .. }
                | ItineraryError::InvalidSyntax { .. }
        )
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ItineraryError::RateLimit { .. } | ItineraryError::Http(_)
        )
    }

    /// Offending text prefix, when the error carries one.
    pub fn preview(&self) -> Option<&str> {
        match self {
            ItineraryError::NoObjectStart { preview }
            | ItineraryError::UnbalancedObject { preview }
            | ItineraryError::InvalidSyntax { preview, .. } => Some(preview),
            _ => None,
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ItineraryError::EmptyInput => "EMPTY_INPUT",
            ItineraryError::NoObjectStart { .. } => "NO_OBJECT_START",
            ItineraryError::UnbalancedObject { .. } => "UNBALANCED_OBJECT",
            ItineraryError::InvalidSyntax { .. } => "INVALID_SYNTAX",
            ItineraryError::Config(_) => "CONFIG_ERROR",
            ItineraryError::Http(_) => "HTTP_ERROR",
            ItineraryError::Model(_) => "MODEL_ERROR",
            ItineraryError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            ItineraryError::Serialization(_) => "SERIALIZATION_ERROR",
            ItineraryError::Validation(_) => "VALIDATION_ERROR",
            ItineraryError::Io(_) => "IO_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable(),
                "preview": self.preview(),
            }
        })
    }
}

/// First [`PREVIEW_CHARS`] characters of `text`, cut on a char boundary.
pub(crate) fn preview_of(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_failures_are_flagged() {
        assert!(ItineraryError::EmptyInput.is_extraction_failure());
        assert!(ItineraryError::NoObjectStart {
            preview: "hello".to_string()
        }
        .is_extraction_failure());
        assert!(!ItineraryError::Config("x".to_string()).is_extraction_failure());
    }

    #[test]
    fn test_error_payload_carries_preview() {
        let err = ItineraryError::UnbalancedObject {
            preview: "{\"days\": [".to_string(),
        };
        let payload = err.to_error_payload();
        assert_eq!(payload["error"]["code"], "UNBALANCED_OBJECT");
        assert_eq!(payload["error"]["preview"], "{\"days\": [");
        assert_eq!(payload["error"]["retryable"], false);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "é".repeat(200);
        let preview = preview_of(&text);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS);
    }
}
