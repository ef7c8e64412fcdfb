//! Error type shared by the loader, the canvas surface and the contact endpoint.

pub type PlayerResult<T> = Result<T, PlayerError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("fetch error: {uri}: {reason}")]
    Fetch { uri: String, reason: String },

    #[error("surface error: {0}")]
    Surface(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("relay error: {0}")]
    Relay(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl PlayerError {
    pub fn fetch(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn relay(msg: impl Into<String>) -> Self {
        Self::Relay(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}
