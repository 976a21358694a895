use crate::error::{LottoError, Result};
use crate::numbers::NumberSet;
use crate::storage::{from_millis, now, invalid_column, to_millis};
use crate::types::{Ticket, TicketOrigin, Tier};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const TICKET_COLUMNS: &str = "id, user_id, numbers, is_auto, created_at, winning_grade, draw_id";

pub struct TicketStore<'a> {
    conn: &'a Connection,
}

impl<'a> TicketStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a fresh, ungraded ticket.
    pub fn create(&self, owner_id: &str, numbers: NumberSet, origin: TicketOrigin) -> Result<Ticket> {
        let ticket = Ticket {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            numbers,
            origin,
            created_at: now(),
            tier: Tier::NoWin,
            draw_id: None,
        };

        self.conn.execute(
            "INSERT INTO tickets (id, user_id, numbers, is_auto, created_at, winning_grade, draw_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                ticket.id,
                ticket.owner_id,
                ticket.numbers.to_string(),
                ticket.origin.is_auto(),
                to_millis(ticket.created_at),
                ticket.tier.rank(),
                ticket.draw_id,
            ],
        )?;

        Ok(ticket)
    }

    /// Persist the mutable part of a ticket: tier and draw reference, in one
    /// statement.
    pub fn save(&self, ticket: &Ticket) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare_cached("UPDATE tickets SET winning_grade = ?1, draw_id = ?2 WHERE id = ?3")?;

        let updated = stmt.execute(params![ticket.tier.rank(), ticket.draw_id, ticket.id])?;
        if updated == 0 {
            return Err(LottoError::TicketNotFound {
                id: ticket.id.clone(),
            });
        }

        Ok(())
    }

    pub fn get(&self, ticket_id: &str) -> Result<Ticket> {
        let ticket = self
            .conn
            .query_row(
                &format!("SELECT {} FROM tickets WHERE id = ?1", TICKET_COLUMNS),
                params![ticket_id],
                ticket_from_row,
            )
            .optional()?;

        let ticket = ticket.ok_or_else(|| LottoError::TicketNotFound {
            id: ticket_id.to_string(),
        })?;

        Ok(ticket)
    }

    /// Every ticket regardless of tier or age.
    pub fn all_tickets(&self) -> Result<Vec<Ticket>> {
        self.query(
            &format!(
                "SELECT {} FROM tickets ORDER BY created_at, rowid",
                TICKET_COLUMNS
            ),
            [],
        )
    }

    /// A user's tickets, newest first.
    pub fn tickets_for_user(&self, owner_id: &str) -> Result<Vec<Ticket>> {
        self.query(
            &format!(
                "SELECT {} FROM tickets WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
                TICKET_COLUMNS
            ),
            params![owner_id],
        )
    }

    pub fn tickets_for_draw(&self, draw_id: &str) -> Result<Vec<Ticket>> {
        self.query(
            &format!(
                "SELECT {} FROM tickets WHERE draw_id = ?1 ORDER BY created_at, rowid",
                TICKET_COLUMNS
            ),
            params![draw_id],
        )
    }

    /// Winning tickets settled against `draw_id`, best tier first.
    pub fn winners(&self, draw_id: &str) -> Result<Vec<Ticket>> {
        self.query(
            &format!(
                "SELECT {} FROM tickets WHERE draw_id = ?1 AND winning_grade > 0
                 ORDER BY winning_grade, created_at, rowid",
                TICKET_COLUMNS
            ),
            params![draw_id],
        )
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Ticket>> {
        let mut stmt = self.conn.prepare(sql)?;
        let tickets = stmt
            .query_map(params, ticket_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tickets)
    }
}

fn ticket_from_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    let numbers: String = row.get(2)?;
    let numbers = numbers
        .parse::<NumberSet>()
        .map_err(|e| invalid_column(2, e))?;

    let tier = Tier::from_rank(row.get(5)?).map_err(|e| invalid_column(5, e))?;

    Ok(Ticket {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        numbers,
        origin: TicketOrigin::from_is_auto(row.get(3)?),
        created_at: from_millis(row.get(4)?),
        tier,
        draw_id: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DrawStore, Storage, UserStore};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_and_save_ticket() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::new(&temp_dir.path().join("lotto.db"))
            .await
            .unwrap();
        let conn = storage.get_connection().await;
        let owner = UserStore::new(&conn).create("alice").unwrap();
        let tickets = TicketStore::new(&conn);

        let numbers: NumberSet = "1,2,3,4,5,6".parse().unwrap();
        let mut ticket = tickets
            .create(&owner.id, numbers, TicketOrigin::Manual)
            .unwrap();
        assert_eq!(ticket.tier, Tier::NoWin);
        assert!(!ticket.is_settled());
        assert_eq!(tickets.get(&ticket.id).unwrap(), ticket);

        let draw = DrawStore::new(&conn)
            .create("1,2,3,4,5,7".parse().unwrap(), Some(6))
            .unwrap();
        ticket.record_result(&draw, Tier::Second);
        tickets.save(&ticket).unwrap();

        let stored = tickets.get(&ticket.id).unwrap();
        assert_eq!(stored.tier, Tier::Second);
        assert_eq!(stored.draw_id.as_deref(), Some(draw.id.as_str()));
        assert_eq!(tickets.winners(&draw.id).unwrap(), vec![stored.clone()]);
        assert_eq!(tickets.tickets_for_draw(&draw.id).unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_unknown_ticket_and_owner() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::new(&temp_dir.path().join("lotto.db"))
            .await
            .unwrap();
        let conn = storage.get_connection().await;
        let tickets = TicketStore::new(&conn);

        assert!(matches!(
            tickets.get("missing"),
            Err(LottoError::TicketNotFound { .. })
        ));

        // foreign keys are enforced
        let numbers: NumberSet = "1,2,3,4,5,6".parse().unwrap();
        assert!(matches!(
            tickets.create("nobody", numbers, TicketOrigin::Automatic),
            Err(LottoError::Storage(_))
        ));
        assert_eq!(tickets.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_user_tickets_newest_first() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::new(&temp_dir.path().join("lotto.db"))
            .await
            .unwrap();
        let conn = storage.get_connection().await;
        let users = UserStore::new(&conn);
        let alice = users.create("alice").unwrap();
        let bob = users.create("bob").unwrap();
        let tickets = TicketStore::new(&conn);

        let first = tickets
            .create(&alice.id, "1,2,3,4,5,6".parse().unwrap(), TicketOrigin::Manual)
            .unwrap();
        let second = tickets
            .create(&alice.id, "7,8,9,10,11,12".parse().unwrap(), TicketOrigin::Automatic)
            .unwrap();
        tickets
            .create(&bob.id, "1,2,3,4,5,6".parse().unwrap(), TicketOrigin::Manual)
            .unwrap();

        let ids: Vec<String> = tickets
            .tickets_for_user(&alice.id)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(tickets.all_tickets().unwrap().len(), 3);
    }
}
