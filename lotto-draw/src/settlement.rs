use crate::error::{LotteryError, Result};
use crate::generator::DrawGenerator;
use crate::grade::grade_ticket;
use lotto_core::{Draw, DrawStore, NumberSet, Storage, Ticket, TicketStore, Tier};
use parking_lot::RwLock;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lifecycle of the most recent draw publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementState {
    Idle,
    DrawPublished { draw_id: String },
    Settling { draw_id: String },
    Settled { draw_id: String },
}

/// Outcome of a settlement or correction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub draw: Draw,
    /// Draws whose active flag was cleared (0 or 1).
    pub deactivated: usize,
    pub graded: usize,
    pub tier_counts: BTreeMap<Tier, usize>,
}

impl SettlementReport {
    pub fn count(&self, tier: Tier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }

    pub fn winners(&self) -> usize {
        self.tier_counts
            .iter()
            .filter(|(tier, _)| tier.is_win())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Publishes draws and grades every ticket against them.
///
/// Each run holds the storage connection for its whole transaction, so two
/// publications never interleave and a failed run leaves no trace.
pub struct SettlementEngine {
    storage: Arc<Storage>,
    generator: Arc<DrawGenerator>,
    state: RwLock<SettlementState>,
}

impl SettlementEngine {
    pub fn new(storage: Arc<Storage>, generator: Arc<DrawGenerator>) -> Self {
        Self {
            storage,
            generator,
            state: RwLock::new(SettlementState::Idle),
        }
    }

    pub fn state(&self) -> SettlementState {
        self.state.read().clone()
    }

    /// Publish a freshly generated draw and settle every ticket against it.
    pub async fn publish_draw(&self) -> Result<SettlementReport> {
        let generated = self.generator.generate();
        self.publish(generated.numbers, Some(generated.bonus)).await
    }

    /// Publish administrator-supplied numbers through the same settlement path.
    pub async fn publish_manual_draw(
        &self,
        numbers: NumberSet,
        bonus: Option<u8>,
    ) -> Result<SettlementReport> {
        self.publish(numbers, bonus).await
    }

    async fn publish(&self, numbers: NumberSet, bonus: Option<u8>) -> Result<SettlementReport> {
        let mut conn = self.storage.get_connection().await;
        let previous = self.state();

        match self.settle(&mut conn, numbers, bonus) {
            Ok(report) => {
                *self.state.write() = SettlementState::Settled {
                    draw_id: report.draw.id.clone(),
                };
                tracing::info!(
                    "Draw {} published: {} bonus {:?}, {} tickets graded, {} winners",
                    report.draw.id,
                    report.draw.numbers,
                    report.draw.bonus,
                    report.graded,
                    report.winners()
                );
                Ok(report)
            }
            Err(e) => {
                *self.state.write() = previous;
                log_abort("Settlement", &e);
                Err(e)
            }
        }
    }

    fn settle(
        &self,
        conn: &mut Connection,
        numbers: NumberSet,
        bonus: Option<u8>,
    ) -> Result<SettlementReport> {
        let tx = conn.transaction()?;

        let draws = DrawStore::new(&tx);
        let deactivated = draws.deactivate_active()?;
        let draw = draws.create(numbers, bonus)?;
        self.set_state(SettlementState::DrawPublished {
            draw_id: draw.id.clone(),
        });

        self.set_state(SettlementState::Settling {
            draw_id: draw.id.clone(),
        });
        let tickets = TicketStore::new(&tx);
        let pending = tickets.all_tickets()?;
        let tier_counts = regrade(&tickets, &draw, pending)?;

        // one active draw after the run, or nothing is committed
        match draws.active_draw()? {
            Some(active) if active.id == draw.id => {}
            _ => {
                return Err(LotteryError::Core(lotto_core::LottoError::invariant(
                    "published draw is not the active draw",
                )))
            }
        }

        tx.commit()?;

        Ok(SettlementReport {
            draw,
            deactivated,
            graded: tier_counts.values().sum(),
            tier_counts,
        })
    }

    /// Elevated correction of a stored draw. Rewrites its numbers and
    /// re-grades the tickets that were settled against it, in one transaction.
    /// The active flag and the settlement state are not touched.
    pub async fn correct_draw(
        &self,
        draw_id: &str,
        numbers: NumberSet,
        bonus: Option<u8>,
    ) -> Result<SettlementReport> {
        let mut conn = self.storage.get_connection().await;

        let result = (|| -> Result<SettlementReport> {
            let tx = conn.transaction()?;
            let draw = DrawStore::new(&tx).correct(draw_id, numbers, bonus)?;

            let tickets = TicketStore::new(&tx);
            let settled = tickets.tickets_for_draw(&draw.id)?;
            let tier_counts = regrade(&tickets, &draw, settled)?;

            tx.commit()?;
            Ok(SettlementReport {
                draw,
                deactivated: 0,
                graded: tier_counts.values().sum(),
                tier_counts,
            })
        })();

        match &result {
            Ok(report) => tracing::info!(
                "Draw {} corrected to {} bonus {:?}, {} tickets re-graded",
                report.draw.id,
                report.draw.numbers,
                report.draw.bonus,
                report.graded
            ),
            Err(e) => log_abort("Draw correction", e),
        }

        result
    }

    fn set_state(&self, state: SettlementState) {
        *self.state.write() = state;
    }
}

/// Grade `tickets` against `draw` and write tier + draw reference back.
fn regrade(
    store: &TicketStore<'_>,
    draw: &Draw,
    tickets: Vec<Ticket>,
) -> Result<BTreeMap<Tier, usize>> {
    let mut tier_counts = BTreeMap::new();

    for mut ticket in tickets {
        let tier = grade_ticket(&ticket, draw);
        ticket.record_result(draw, tier);
        store.save(&ticket)?;

        tracing::debug!("Ticket {} graded {} against draw {}", ticket.id, tier, draw.id);
        *tier_counts.entry(tier).or_insert(0) += 1;
    }

    Ok(tier_counts)
}

fn log_abort(operation: &str, err: &LotteryError) {
    if err.is_invariant_violation() {
        tracing::error!("{} aborted: {}", operation, err);
    } else {
        tracing::warn!("{} rolled back: {}", operation, err);
    }
}
