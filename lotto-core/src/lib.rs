//! Lotto core - number sets, records and storage for a 6/45 lottery
//!
//! This library owns the value types shared by tickets and draws, the error
//! taxonomy, configuration, and the SQLite stores that the settlement and
//! purchase flows read from and write to.

pub mod config;
pub mod error;
pub mod numbers;
pub mod storage;
pub mod types;

pub use config::LottoConfig;
pub use error::{LottoError, Result};
pub use numbers::{NumberSet, NumberSetError};
pub use storage::{DrawStore, Storage, TicketStore, UserStore};
pub use types::{Draw, Ticket, TicketOrigin, Tier, User};
