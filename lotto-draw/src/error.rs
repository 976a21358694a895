use lotto_core::{LottoError, NumberSetError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LotteryError>;

#[derive(Error, Debug)]
pub enum LotteryError {
    #[error("{0}")]
    Core(#[from] LottoError),

    #[error("No active draw has been published")]
    NoActiveDraw,

    #[error("Requested {requested} quick picks, limit is {limit}")]
    AutoPickLimit { requested: u32, limit: u32 },
}

impl LotteryError {
    /// True when the error came from rejected user input.
    pub fn is_validation(&self) -> bool {
        match self {
            LotteryError::Core(e) => e.is_validation(),
            LotteryError::AutoPickLimit { .. } => true,
            _ => false,
        }
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, LotteryError::Core(LottoError::InvariantViolation(_)))
    }
}

impl From<NumberSetError> for LotteryError {
    fn from(err: NumberSetError) -> Self {
        LotteryError::Core(LottoError::Validation(err))
    }
}

impl From<rusqlite::Error> for LotteryError {
    fn from(err: rusqlite::Error) -> Self {
        LotteryError::Core(LottoError::Storage(err))
    }
}
