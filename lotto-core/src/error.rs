use crate::numbers::NumberSetError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LottoError>;

#[derive(Error, Debug)]
pub enum LottoError {
    #[error("Invalid numbers: {0}")]
    Validation(#[from] NumberSetError),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("User not found: {name}")]
    UserNotFound { name: String },

    #[error("User already exists: {name}")]
    UserExists { name: String },

    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    #[error("Draw not found: {id}")]
    DrawNotFound { id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl LottoError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for input the caller can fix and resubmit.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidUsername(_))
    }
}

// conversion from dialoguer::Error
impl From<dialoguer::Error> for LottoError {
    fn from(err: dialoguer::Error) -> Self {
        LottoError::Dialog(err.to_string())
    }
}
