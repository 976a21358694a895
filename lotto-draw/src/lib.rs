//! Draws and settlement for a 6/45 lottery
//!
//! Tickets are graded against the active draw by [`grade`]; publishing a
//! draw through [`SettlementEngine`] re-grades the whole ticket population in
//! a single transaction.

pub mod error;
pub mod generator;
pub mod grade;
pub mod manager;
pub mod office;
pub mod settlement;

pub use error::{LotteryError, Result};
pub use generator::{generate_draw, DrawGenerator, GeneratedDraw};
pub use grade::{grade, grade_ticket};
pub use manager::LottoManager;
pub use office::{TicketCheck, TicketOffice};
pub use settlement::{SettlementEngine, SettlementReport, SettlementState};
