use crate::error::{LotteryError, Result};
use crate::generator::DrawGenerator;
use crate::grade::grade_ticket;
use lotto_core::{Draw, DrawStore, NumberSet, Storage, Ticket, TicketOrigin, TicketStore, Tier, UserStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A ticket viewed against whatever draw is active right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCheck {
    pub ticket: Ticket,
    pub active_draw: Option<Draw>,
    /// Tier against `active_draw`; `None` when nothing has been drawn.
    pub tier: Option<Tier>,
}

/// Purchase flow. Purchases only insert tickets, so they never wait on
/// anything but the connection lock.
pub struct TicketOffice {
    storage: Arc<Storage>,
    generator: Arc<DrawGenerator>,
    auto_pick_limit: u32,
}

impl TicketOffice {
    pub fn new(storage: Arc<Storage>, generator: Arc<DrawGenerator>, auto_pick_limit: u32) -> Self {
        Self {
            storage,
            generator,
            auto_pick_limit,
        }
    }

    /// Buy a ticket with hand-picked numbers, e.g. `"1,5,12,20,33,42"`.
    /// Invalid input is rejected before anything is written.
    pub async fn buy_manual(&self, username: &str, input: &str) -> Result<Ticket> {
        let numbers = match input.parse::<NumberSet>() {
            Ok(numbers) => numbers,
            Err(e) => {
                tracing::warn!("Rejected manual ticket for '{}': {}", username, e);
                return Err(e.into());
            }
        };

        let conn = self.storage.get_connection().await;
        let owner = UserStore::new(&conn).get_by_name(username)?;
        let ticket = TicketStore::new(&conn).create(&owner.id, numbers, TicketOrigin::Manual)?;

        tracing::info!("User '{}' bought manual ticket {} ({})", username, ticket.id, ticket.numbers);
        Ok(ticket)
    }

    /// Buy `count` quick-pick tickets in one transaction.
    pub async fn buy_auto(&self, username: &str, count: u32) -> Result<Vec<Ticket>> {
        if count == 0 || count > self.auto_pick_limit {
            return Err(LotteryError::AutoPickLimit {
                requested: count,
                limit: self.auto_pick_limit,
            });
        }

        let picks: Vec<NumberSet> = (0..count).map(|_| self.generator.quick_pick()).collect();

        let mut conn = self.storage.get_connection().await;
        let tx = conn.transaction()?;
        let owner = UserStore::new(&tx).get_by_name(username)?;
        let tickets = {
            let store = TicketStore::new(&tx);
            picks
                .into_iter()
                .map(|numbers| store.create(&owner.id, numbers, TicketOrigin::Automatic))
                .collect::<lotto_core::Result<Vec<_>>>()?
        };
        tx.commit()?;

        for ticket in &tickets {
            tracing::info!("User '{}' bought quick pick {} ({})", username, ticket.id, ticket.numbers);
        }
        Ok(tickets)
    }

    /// A user's tickets, newest first.
    pub async fn tickets_for(&self, username: &str) -> Result<Vec<Ticket>> {
        let conn = self.storage.get_connection().await;
        let owner = UserStore::new(&conn).get_by_name(username)?;
        Ok(TicketStore::new(&conn).tickets_for_user(&owner.id)?)
    }

    /// Look a ticket up and grade it against the active draw without
    /// writing anything.
    pub async fn check_ticket(&self, ticket_id: &str) -> Result<TicketCheck> {
        let conn = self.storage.get_connection().await;
        let ticket = TicketStore::new(&conn).get(ticket_id)?;
        let active_draw = DrawStore::new(&conn).active_draw()?;
        let tier = active_draw.as_ref().map(|draw| grade_ticket(&ticket, draw));

        Ok(TicketCheck {
            ticket,
            active_draw,
            tier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotto_core::{LottoError, NumberSetError};
    use tempfile::{tempdir, TempDir};

    async fn office() -> (TempDir, Arc<Storage>, TicketOffice) {
        let dir = tempdir().unwrap();
        let storage = Arc::new(Storage::new(&dir.path().join("lotto.db")).await.unwrap());
        {
            let conn = storage.get_connection().await;
            UserStore::new(&conn).create("alice").unwrap();
        }
        let office = TicketOffice::new(storage.clone(), Arc::new(DrawGenerator::seeded(8)), 5);
        (dir, storage, office)
    }

    async fn ticket_count(storage: &Storage) -> usize {
        let conn = storage.get_connection().await;
        TicketStore::new(&conn).count().unwrap()
    }

    #[tokio::test]
    async fn test_buy_manual_ticket() {
        let (_dir, _storage, office) = office().await;

        let ticket = office.buy_manual("alice", "42,1,5,12,33,20").await.unwrap();
        assert_eq!(ticket.numbers.to_string(), "1,5,12,20,33,42");
        assert_eq!(ticket.origin, TicketOrigin::Manual);
        assert_eq!(ticket.tier, Tier::NoWin);
        assert_eq!(office.tickets_for("alice").await.unwrap(), vec![ticket]);
    }

    #[tokio::test]
    async fn test_invalid_manual_input_creates_nothing() {
        let (_dir, storage, office) = office().await;

        let cases = [
            ("1,2,3,4,5", NumberSetError::InvalidCount { found: 5 }),
            ("1,2,3,4,5,99", NumberSetError::OutOfRange { value: 99 }),
            ("1,2,3,4,5,5", NumberSetError::DuplicateValue { value: 5 }),
            (
                "1,2,3,4,5,six",
                NumberSetError::NotNumeric {
                    token: "six".to_string(),
                },
            ),
        ];

        for (input, expected) in cases {
            let err = office.buy_manual("alice", input).await.unwrap_err();
            assert!(err.is_validation());
            match err {
                LotteryError::Core(LottoError::Validation(found)) => assert_eq!(found, expected),
                other => panic!("unexpected error {:?}", other),
            }
        }
        assert_eq!(ticket_count(&storage).await, 0);
    }

    #[tokio::test]
    async fn test_unknown_user_cannot_buy() {
        let (_dir, storage, office) = office().await;

        assert!(matches!(
            office.buy_manual("mallory", "1,2,3,4,5,6").await,
            Err(LotteryError::Core(LottoError::UserNotFound { .. }))
        ));
        assert!(matches!(
            office.buy_auto("mallory", 2).await,
            Err(LotteryError::Core(LottoError::UserNotFound { .. }))
        ));
        assert_eq!(ticket_count(&storage).await, 0);
    }

    #[tokio::test]
    async fn test_buy_auto_tickets() {
        let (_dir, storage, office) = office().await;

        let tickets = office.buy_auto("alice", 3).await.unwrap();
        assert_eq!(tickets.len(), 3);
        assert!(tickets.iter().all(|t| t.origin == TicketOrigin::Automatic));
        assert_eq!(ticket_count(&storage).await, 3);

        assert!(matches!(
            office.buy_auto("alice", 0).await,
            Err(LotteryError::AutoPickLimit { requested: 0, limit: 5 })
        ));
        assert!(matches!(
            office.buy_auto("alice", 6).await,
            Err(LotteryError::AutoPickLimit { requested: 6, limit: 5 })
        ));
        assert_eq!(ticket_count(&storage).await, 3);
    }

    #[tokio::test]
    async fn test_check_ticket_against_active_draw() {
        let (_dir, storage, office) = office().await;
        let ticket = office.buy_manual("alice", "1,2,3,4,5,7").await.unwrap();

        let check = office.check_ticket(&ticket.id).await.unwrap();
        assert!(check.active_draw.is_none());
        assert_eq!(check.tier, None);

        {
            let conn = storage.get_connection().await;
            DrawStore::new(&conn)
                .create("1,2,3,4,5,6".parse().unwrap(), Some(7))
                .unwrap();
        }

        let check = office.check_ticket(&ticket.id).await.unwrap();
        assert_eq!(check.tier, Some(Tier::Second));
        // checking does not settle the ticket
        assert!(!check.ticket.is_settled());

        assert!(matches!(
            office.check_ticket("missing").await,
            Err(LotteryError::Core(LottoError::TicketNotFound { .. }))
        ));
    }
}
