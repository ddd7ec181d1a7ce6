use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Transport(String),
    #[error("weather provider returned status {0}")]
    Status(u16),
    #[error("weather response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn bad_request(message: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into(), correlation_id: correlation_id.into() }
    }

    pub fn internal(message: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), correlation_id: correlation_id.into() }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }

    /// Text returned to callers in the `detail` field.
    pub fn detail(&self) -> String {
        match self {
            Self::BadRequest { message, .. } => {
                format!("The request could not be processed: {message}")
            }
            Self::Internal { .. } => "An unexpected internal error occurred.".to_string(),
        }
    }
}
