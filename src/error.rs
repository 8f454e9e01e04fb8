//! Error types for the Pixi brain.
//!
//! None of these ever escape the decision loop: handler, perception and
//! reasoning failures are logged and degraded to a safe outcome by their
//! callers. They surface only at boot (configuration) and to direct callers
//! of the lower-level APIs.

use thiserror::Error;

/// Errors raised while loading or validating a [`BrainConfig`](crate::config::BrainConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The YAML document is malformed or has wrongly-typed fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A field holds a value outside its permitted range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Error returned by an action handler bound in the catalogue.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// The hardware driver rejected or failed the command.
    #[error("driver error: {0}")]
    Driver(String),

    /// The driver did not answer within its deadline.
    #[error("driver timed out after {0} ms")]
    Timeout(u64),
}

/// Errors from the reasoning delegate.
#[derive(Debug, Error)]
pub enum ReasoningError {
    /// Neither `OPENROUTER_API_KEY` nor `GROQ_API_KEY` is set.
    #[error("missing OPENROUTER_API_KEY or GROQ_API_KEY")]
    MissingCredentials,

    /// Transport-level failure talking to the completion endpoint.
    #[error("reasoning request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("reasoning endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The delegate did not answer in time.
    #[error("reasoning delegate timed out after {0} ms")]
    Timeout(u64),

    /// The reply could not be interpreted.
    #[error("malformed reasoning reply: {0}")]
    Malformed(String),
}

/// Errors from audio capture and transcription.
#[derive(Debug, Error)]
pub enum PerceptionError {
    /// The audio device failed to deliver frames.
    #[error("audio capture failed: {0}")]
    Capture(String),

    /// The speech-to-text backend failed.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// The speech-to-text backend missed its deadline.
    #[error("transcription timed out after {0} ms")]
    TranscriptionTimeout(u64),

    /// A perception script could not be read or parsed.
    #[error("invalid perception script: {0}")]
    Script(String),

    /// A worker task panicked or was cancelled.
    #[error("perception worker `{0}` stopped unexpectedly")]
    WorkerLost(String),
}

/// Crate-wide error.
#[derive(Debug, Error)]
pub enum PixiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Reasoning(#[from] ReasoningError),

    #[error(transparent)]
    Perception(#[from] PerceptionError),
}

/// Result alias defaulting to [`PixiError`].
pub type Result<T, E = PixiError> = std::result::Result<T, E>;
