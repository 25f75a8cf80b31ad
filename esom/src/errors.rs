use thiserror::Error;

/// Top-level error type returned by esom operations.
#[derive(Debug, Error)]
pub enum EsError {
    /// A required argument was empty or malformed. Never retried.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The transport layer failed before a structured response arrived.
    #[error("elasticsearch transport error: {0}")]
    Transport(#[from] elasticsearch::Error),

    /// The engine returned a non-success response.
    #[error("elasticsearch rejected the request (status {status}): {reason}")]
    Rejected { status: u16, reason: String },

    /// No `#[es(id)]` field is declared on the document type.
    #[error("no identifier field declared on document type `{type_name}`")]
    MissingIdField { type_name: String },

    /// A document could not be serialized into a request body.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EsError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

pub type EsResult<T> = Result<T, EsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_id_field_names_the_type() {
        let err = EsError::MissingIdField {
            type_name: "Article".to_string(),
        };
        assert!(err.to_string().contains("Article"));
    }

    #[test]
    fn rejected_carries_status_and_reason() {
        let err = EsError::Rejected {
            status: 400,
            reason: "mapper_parsing_exception".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("400"));
        assert!(rendered.contains("mapper_parsing_exception"));
    }
}
