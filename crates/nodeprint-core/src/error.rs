use std::fmt;
use thiserror::Error;

/// Boxed cause carried by [`NodePrintError::Serialization`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which half of a serialization failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializeStage {
    /// Selecting whitespace-only text nodes.
    Query,
    /// Writing the tree out as text.
    Render,
}

impl fmt::Display for SerializeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Render => f.write_str("render"),
        }
    }
}

#[derive(Error, Debug)]
pub enum NodePrintError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("XML parsing error at {location}: {message}")]
    XmlParse { message: String, location: String },

    #[error("XML serialization error during {stage}: {source}")]
    Serialization {
        stage: SerializeStage,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] serde_json::Error),
}

impl NodePrintError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn query<E: Into<BoxError>>(source: E) -> Self {
        Self::Serialization {
            stage: SerializeStage::Query,
            source: source.into(),
        }
    }

    pub fn render<E: Into<BoxError>>(source: E) -> Self {
        Self::Serialization {
            stage: SerializeStage::Render,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NodePrintError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn error_display_formats_correctly() {
        let err = NodePrintError::invalid_argument("node is null.");
        assert_eq!(err.to_string(), "Invalid argument: node is null.");
    }

    #[test]
    fn serialization_error_keeps_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "sink closed");
        let err = NodePrintError::render(cause);

        assert_eq!(
            err.to_string(),
            "XML serialization error during render: sink closed"
        );
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("sink closed"));
    }

    #[test]
    fn query_error_names_stage() {
        let err = NodePrintError::query("dangling node");
        assert!(matches!(
            err,
            NodePrintError::Serialization {
                stage: SerializeStage::Query,
                ..
            }
        ));
    }
}
