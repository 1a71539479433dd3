//! Error types for the RAG pipeline.

use thiserror::Error;

/// Result type alias using RagError.
pub type Result<T> = std::result::Result<T, RagError>;

/// Errors that can occur while answering a question.
#[derive(Error, Debug)]
pub enum RagError {
    /// Invalid argument provided.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Search hit came from an index with no entry in the field table.
    #[error("No source field mapped for index: {index}")]
    UnmappedIndex { index: String },

    /// Expected field absent from a hit's source document.
    #[error("Missing field '{field}' in hit from index {index}")]
    MissingField { index: String, field: String },

    /// Search backend returned a non-success status.
    #[error("Search failed with status {status}: {body}")]
    Search { status: u16, body: String },

    /// Completion endpoint failed or returned an unusable response.
    #[error("Completion error: {message}")]
    Completion { message: String },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl RagError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(index: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            index: index.into(),
            field: field.into(),
        }
    }

    /// Create a completion error.
    pub fn completion(message: impl Into<String>) -> Self {
        Self::Completion {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a stable error code for CLI output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::UnmappedIndex { .. } => "UNMAPPED_INDEX",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::Search { .. } => "SEARCH_ERROR",
            Self::Completion { .. } => "COMPLETION_ERROR",
            Self::Http(_) => "HTTP_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
        }
    }
}
