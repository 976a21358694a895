use crate::error::{LottoError, Result};
use crate::numbers::{checked_number, NumberSet};
use crate::storage::{from_millis, now, invalid_column, to_millis};
use crate::types::Draw;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const DRAW_COLUMNS: &str = "id, numbers, bonus_number, drawn_at, is_active";

/// Reject a bonus outside `1..=45` or inside the winning set.
pub fn check_bonus(numbers: &NumberSet, bonus: Option<u8>) -> Result<()> {
    if let Some(bonus) = bonus {
        checked_number(bonus as i64)?;
        if numbers.contains(bonus) {
            return Err(LottoError::invariant(format!(
                "bonus number {} is part of the winning numbers {}",
                bonus, numbers
            )));
        }
    }
    Ok(())
}

pub struct DrawStore<'a> {
    conn: &'a Connection,
}

impl<'a> DrawStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// The single active draw, if one has been published.
    pub fn active_draw(&self) -> Result<Option<Draw>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM draws WHERE is_active = 1 LIMIT 2",
            DRAW_COLUMNS
        ))?;

        let mut active = stmt
            .query_map([], draw_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if active.len() > 1 {
            tracing::error!("Found {} active draws", active.len());
            return Err(LottoError::invariant("more than one active draw"));
        }

        Ok(active.pop())
    }

    /// Clear the active flag. Returns how many draws were deactivated.
    pub fn deactivate_active(&self) -> Result<usize> {
        let changed = self
            .conn
            .execute("UPDATE draws SET is_active = 0 WHERE is_active = 1", [])?;
        Ok(changed)
    }

    /// Persist a new draw as the active one. Fails if another draw is still
    /// active; callers deactivate first.
    pub fn create(&self, numbers: NumberSet, bonus: Option<u8>) -> Result<Draw> {
        check_bonus(&numbers, bonus)?;

        let draw = Draw {
            id: Uuid::new_v4().to_string(),
            numbers,
            bonus,
            drawn_at: now(),
            is_active: true,
        };

        self.conn.execute(
            "INSERT INTO draws (id, numbers, bonus_number, drawn_at, is_active)
             VALUES (?1, ?2, ?3, ?4, 1)",
            params![
                draw.id,
                draw.numbers.to_string(),
                draw.bonus,
                to_millis(draw.drawn_at),
            ],
        )?;

        Ok(draw)
    }

    pub fn get(&self, draw_id: &str) -> Result<Draw> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM draws WHERE id = ?1", DRAW_COLUMNS),
                params![draw_id],
                draw_from_row,
            )
            .optional()?
            .ok_or_else(|| LottoError::DrawNotFound {
                id: draw_id.to_string(),
            })
    }

    /// All draws, newest first.
    pub fn history(&self) -> Result<Vec<Draw>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM draws ORDER BY drawn_at DESC, rowid DESC",
            DRAW_COLUMNS
        ))?;

        let draws = stmt
            .query_map([], draw_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(draws)
    }

    /// Administrative correction of a stored draw's numbers. The active flag
    /// and draw time are left alone.
    pub fn correct(&self, draw_id: &str, numbers: NumberSet, bonus: Option<u8>) -> Result<Draw> {
        check_bonus(&numbers, bonus)?;

        let updated = self.conn.execute(
            "UPDATE draws SET numbers = ?1, bonus_number = ?2 WHERE id = ?3",
            params![numbers.to_string(), bonus, draw_id],
        )?;

        if updated == 0 {
            return Err(LottoError::DrawNotFound {
                id: draw_id.to_string(),
            });
        }

        self.get(draw_id)
    }
}

fn draw_from_row(row: &Row<'_>) -> rusqlite::Result<Draw> {
    let numbers: String = row.get(1)?;
    let numbers = numbers
        .parse::<NumberSet>()
        .map_err(|e| invalid_column(1, e))?;

    Ok(Draw {
        id: row.get(0)?,
        numbers,
        bonus: row.get(2)?,
        drawn_at: from_millis(row.get(3)?),
        is_active: row.get(4)?,
    })
}
