//! Error types for watermark operations.

use thiserror::Error;

use crate::text::TokenizeError;
use crate::watermark::WatermarkError;

/// Errors that can occur while embedding or decoding watermarks.
///
/// Missing payload on a single word is never an error; decode simply
/// omits that word from its report.
#[derive(Error, Debug)]
pub enum Error {
    /// The input document is malformed.
    #[error("Failed to parse {format} document: {message}")]
    Parse {
        /// Format that failed to parse ("XML", "JSON" or "UTF-8").
        format: &'static str,
        /// Parser message.
        message: String,
    },

    /// Embedding failed; no partial output is produced.
    #[error("Error in watermark embedding: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Text could not be segmented for decoding.
    #[error("Error in watermark decoding: {0}")]
    Decoding(#[source] TokenizeError),

    /// Required caller input is missing or invalid.
    #[error("Invalid input: {0}")]
    Validation(String),
}

/// Underlying cause of an embedding failure.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error(transparent)]
    Watermark(#[from] WatermarkError),

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error("Serialization failed: {0}")]
    Serialize(String),
}

impl Error {
    pub(crate) fn parse(format: &'static str, message: impl ToString) -> Self {
        Error::Parse {
            format,
            message: message.to_string(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
