//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by a `ContentProvider`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("content generation is not configured")]
    Disabled,
    #[error("content generation returned an empty response")]
    EmptyResponse,
    #[error("content generation returned malformed lesson json: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("content generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the `LookaheadLoader`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("lesson load was interrupted: {0}")]
    Interrupted(String),
}

/// Errors reported by an `AudioSink` stream.
///
/// The playback controller swallows these; they only reach the log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("stream already stopped")]
    AlreadyStopped,
    #[error("audio device error: {0}")]
    Device(String),
}

/// Errors emitted by the lesson session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no topic selected")]
    NoTopic,
    #[error(transparent)]
    Load(#[from] LoadError),
}
