use std::error::Error;
use thiserror::Error;

/// Failures of the serverless deployment mode.
///
/// Transport-level failures ([`Transport`](Self::Transport),
/// [`MissingRequestId`](Self::MissingRequestId)) are retryable by the
/// invocation loop; everything else is terminal for the invocation that
/// produced it and is reported on the error channel.
#[derive(Debug, Error)]
pub enum LambdaError {
    #[error("environment variable {name} is not set")]
    MissingEnv { name: &'static str },

    #[error("runtime API transport failure: {source}")]
    Transport {
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    #[error("runtime API response carries no Lambda-Runtime-Aws-Request-Id header")]
    MissingRequestId,

    #[error("invalid invocation event: {reason}")]
    InvalidEvent { reason: String },

    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("handler error: {source}")]
    Handler {
        #[from]
        source: rill_web::WebError,
    },

    #[error("runtime API unreachable after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

impl LambdaError {
    pub fn missing_env(name: &'static str) -> Self {
        Self::MissingEnv { name }
    }

    pub fn transport<E: Into<Box<dyn Error + Send + Sync>>>(e: E) -> Self {
        Self::Transport { source: e.into() }
    }

    pub fn invalid_event<S: ToString>(reason: S) -> Self {
        Self::InvalidEvent { reason: reason.to_string() }
    }

    /// Transport-level failures are the only ones worth another poll.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::MissingRequestId)
    }

    /// Stable error-type name for the error envelope.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MissingEnv { .. } => "MissingEnv",
            Self::Transport { .. } => "Transport",
            Self::MissingRequestId => "MissingRequestId",
            Self::InvalidEvent { .. } => "InvalidEvent",
            Self::Serialization { .. } => "Serialization",
            Self::Handler { .. } => "Handler",
            Self::AttemptsExhausted { .. } => "AttemptsExhausted",
        }
    }
}
