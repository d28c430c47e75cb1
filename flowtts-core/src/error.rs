use thiserror::Error;

/// Error surfaced by every fallible SDK operation.
///
/// Raw transport and decode errors never escape; callers always get a
/// machine-readable [`code`](TtsError::code), a message, and the service
/// request id when one was available.
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("unknown voice id: {0}. Use list_voices() to see available voices")]
    UnknownVoiceId(String),

    #[error("no voices available in the voice catalog")]
    NoVoicesAvailable,

    #[error("voice catalog failed to load: {0}")]
    CatalogInit(String),

    #[error("transport error: {0}")]
    Transport(anyhow::Error),

    #[error("decode error: {0}")]
    Decode(anyhow::Error),

    #[error("service error [{code}]: {message}")]
    Service {
        code: String,
        message: String,
        request_id: Option<String>,
    },
}

impl TtsError {
    /// Machine-readable error code.
    pub fn code(&self) -> &str {
        match self {
            TtsError::InvalidConfig(_) => "InvalidConfig",
            TtsError::InvalidOptions(_) => "InvalidOptions",
            TtsError::UnknownVoiceId(_) => "UnknownVoiceID",
            TtsError::NoVoicesAvailable => "NoVoicesAvailable",
            TtsError::CatalogInit(_) => "CatalogInitFailed",
            TtsError::Transport(_) => "TransportError",
            TtsError::Decode(_) => "DecodeError",
            TtsError::Service { code, .. } => code,
        }
    }

    /// Request id reported by the service, when one was attached.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            TtsError::Service { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }
}
