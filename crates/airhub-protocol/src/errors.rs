//! Codec error types.

use thiserror::Error;

/// Result type alias using CodecError.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while converting wire types to and from JSON.
///
/// Both variants are terminal for the call that produced them: there is no
/// partial result and nothing to retry at this layer.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input was not valid JSON or did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The value could not be serialized (invalid geometry).
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CodecError {
    /// Whether this error came from decoding.
    pub fn is_decode(&self) -> bool {
        matches!(self, CodecError::Decode(_))
    }

    /// Whether this error came from encoding.
    pub fn is_encode(&self) -> bool {
        matches!(self, CodecError::Encode(_))
    }
}
