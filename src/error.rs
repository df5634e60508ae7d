use thiserror::Error;

use crate::gemini::response::{BlockReason, FinishReason};

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Data corrupted at `{path}`: {reason}")]
    DataCorrupted { path: String, reason: String },

    #[error("Missing required field `{path}`")]
    MissingField { path: String },

    #[error("Invalid value for `{path}`: {source}")]
    InvalidField {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Empty content object at `{path}`: {source}")]
    EmptyContent {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed content at `{path}`: {source}")]
    MalformedContent {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Prompt blocked: {reason:?}")]
    PromptBlocked { reason: BlockReason },

    #[error("Response stopped early: {reason:?}")]
    ResponseStoppedEarly { reason: FinishReason },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl GeminiError {
    /// True for failures that mean the document does not have the expected shape.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DataCorrupted { .. } | Self::MissingField { .. } | Self::InvalidField { .. }
        )
    }

    /// Field path of the offending value, when the failure came from decoding.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::DataCorrupted { path, .. }
            | Self::MissingField { path }
            | Self::InvalidField { path, .. }
            | Self::EmptyContent { path, .. }
            | Self::MalformedContent { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Prefixes the stored path, used when a sub-document is decoded in a wider context.
    pub(crate) fn within(self, prefix: &str) -> Self {
        let join = |path: String| {
            if path.is_empty() {
                prefix.to_string()
            } else {
                format!("{}.{}", prefix, path)
            }
        };
        match self {
            Self::DataCorrupted { path, reason } => Self::DataCorrupted {
                path: join(path),
                reason,
            },
            Self::MissingField { path } => Self::MissingField { path: join(path) },
            Self::InvalidField { path, source } => Self::InvalidField {
                path: join(path),
                source,
            },
            Self::EmptyContent { path, source } => Self::EmptyContent {
                path: join(path),
                source,
            },
            Self::MalformedContent { path, source } => Self::MalformedContent {
                path: join(path),
                source,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, GeminiError>;
