use thiserror::Error;

#[derive(Debug, Error)]
pub enum GasError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Marshal error: no loggable fields found on {type_name}")]
    Marshal { type_name: &'static str },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Failures raised while talking to the remote endpoint.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Decode(err.to_string())
    }
}

impl GasError {
    pub fn is_validation(&self) -> bool {
        matches!(self, GasError::Validation(_))
    }

    pub fn is_marshal(&self) -> bool {
        matches!(self, GasError::Marshal { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, GasError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, GasError>;
