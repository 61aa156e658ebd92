use thiserror::Error;

/// Reasons a speech clip could not be turned into samples.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("audio payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("audio payload holds no complete sample")]
    Empty,
}
