use crate::error::{LottoError, Result};
use crate::numbers::NumberSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prize rank. `NoWin` is also the state of a ticket nobody has graded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    NoWin,
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl Tier {
    pub const ALL: [Tier; 6] = [
        Tier::First,
        Tier::Second,
        Tier::Third,
        Tier::Fourth,
        Tier::Fifth,
        Tier::NoWin,
    ];

    /// Stored rank: 0 for no win, 1 (top prize) through 5.
    pub fn rank(self) -> u8 {
        match self {
            Tier::NoWin => 0,
            Tier::First => 1,
            Tier::Second => 2,
            Tier::Third => 3,
            Tier::Fourth => 4,
            Tier::Fifth => 5,
        }
    }

    pub fn from_rank(rank: i64) -> Result<Self> {
        match rank {
            0 => Ok(Tier::NoWin),
            1 => Ok(Tier::First),
            2 => Ok(Tier::Second),
            3 => Ok(Tier::Third),
            4 => Ok(Tier::Fourth),
            5 => Ok(Tier::Fifth),
            other => Err(LottoError::invariant(format!(
                "unknown prize tier {}",
                other
            ))),
        }
    }

    pub fn is_win(self) -> bool {
        self != Tier::NoWin
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::NoWin => f.write_str("no win"),
            Tier::First => f.write_str("1st prize"),
            Tier::Second => f.write_str("2nd prize"),
            Tier::Third => f.write_str("3rd prize"),
            Tier::Fourth => f.write_str("4th prize"),
            Tier::Fifth => f.write_str("5th prize"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketOrigin {
    Manual,
    Automatic,
}

impl TicketOrigin {
    pub fn is_auto(self) -> bool {
        matches!(self, TicketOrigin::Automatic)
    }

    pub fn from_is_auto(is_auto: bool) -> Self {
        if is_auto {
            TicketOrigin::Automatic
        } else {
            TicketOrigin::Manual
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub owner_id: String,
    pub numbers: NumberSet,
    pub origin: TicketOrigin,
    pub created_at: DateTime<Utc>,
    pub tier: Tier,
    pub draw_id: Option<String>,
}

impl Ticket {
    /// Record the outcome against `draw`. Tier and draw reference only ever
    /// change together.
    pub fn record_result(&mut self, draw: &Draw, tier: Tier) {
        self.tier = tier;
        self.draw_id = Some(draw.id.clone());
    }

    pub fn is_settled(&self) -> bool {
        self.draw_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub id: String,
    pub numbers: NumberSet,
    pub bonus: Option<u8>,
    pub drawn_at: DateTime<Utc>,
    pub is_active: bool,
}
