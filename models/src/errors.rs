// models/src/errors.rs

pub use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// An edge was offered to a container that does not hold both endpoints.
    /// Once recorded, this error is carried by the container for good.
    #[error("undefined edge: fromId={from_id}; toId={to_id}")]
    UndefinedEdge { from_id: String, to_id: String },
    #[error("Serialization error: {0}")]
    SerializationError(String), // Error during data serialization
    #[error("Deserialization error: {0}")]
    DeserializationError(String), // Error during data deserialization
    #[error("{0}")]
    Restored(String), // Error read back from a serialized graph document
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl GraphError {
    /// Builds the referential-integrity error for an edge with the given endpoints.
    pub fn undefined_edge(from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        GraphError::UndefinedEdge {
            from_id: from_id.into(),
            to_id: to_id.into(),
        }
    }
}

// Any JSON failure reaching a `?` is on the read side; the write side maps explicitly.
impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::DeserializationError(format!("JSON processing error: {}", err))
    }
}

/// A validation error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    /// An identifier is empty.
    #[error("identifier has invalid length")]
    InvalidIdentifierLength,
    /// A timestamp could not be read as an ISO-8601 UTC instant.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// A type alias for a `Result` that returns a `GraphError` on failure.
pub type GraphResult<T> = Result<T, GraphError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_edge_message_names_both_ids() {
        let err = GraphError::undefined_edge("missing", "valid");
        assert_eq!(err.to_string(), "undefined edge: fromId=missing; toId=valid");
    }

    #[test]
    fn validation_errors_convert() {
        let err: GraphError = ValidationError::InvalidIdentifierLength.into();
        assert_eq!(err.to_string(), "identifier has invalid length");
    }

    #[test]
    fn serde_json_errors_become_deserialization_errors() {
        let err: GraphError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GraphError::DeserializationError(_)));
    }
}
