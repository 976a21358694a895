use crate::error::{LotteryError, Result};
use crate::generator::DrawGenerator;
use crate::office::TicketOffice;
use crate::settlement::SettlementEngine;
use lotto_core::{Draw, DrawStore, LottoConfig, Storage, Ticket, TicketStore, User, UserStore};
use std::path::Path;
use std::sync::Arc;

/// Entry point tying storage, purchase and settlement together for one data
/// directory.
pub struct LottoManager {
    storage: Arc<Storage>,
    config: LottoConfig,
    office: TicketOffice,
    engine: SettlementEngine,
}

impl LottoManager {
    /// Open the data directory using `lotto.json` if present.
    pub async fn new(data_dir: &Path) -> Result<Self> {
        let config = LottoConfig::load(data_dir).await?;
        Self::with_config(data_dir, config).await
    }

    pub async fn with_config(data_dir: &Path, config: LottoConfig) -> Result<Self> {
        let generator = DrawGenerator::from_config(&config);
        Self::with_generator(data_dir, config, generator).await
    }

    pub async fn with_generator(
        data_dir: &Path,
        config: LottoConfig,
        generator: DrawGenerator,
    ) -> Result<Self> {
        config.validate()?;

        let db_path = data_dir.join(&config.db_file);
        let storage = Arc::new(Storage::new(&db_path).await?);
        let generator = Arc::new(generator);

        tracing::debug!("Opened lottery database at {}", db_path.display());

        Ok(Self {
            office: TicketOffice::new(storage.clone(), generator.clone(), config.auto_pick_limit),
            engine: SettlementEngine::new(storage.clone(), generator),
            storage,
            config,
        })
    }

    pub fn config(&self) -> &LottoConfig {
        &self.config
    }

    pub fn office(&self) -> &TicketOffice {
        &self.office
    }

    pub fn engine(&self) -> &SettlementEngine {
        &self.engine
    }

    pub async fn register_user(&self, username: &str) -> Result<User> {
        let conn = self.storage.get_connection().await;
        let user = UserStore::new(&conn).create(username)?;

        tracing::info!("Registered user '{}' with ID: {}", user.username, user.id);
        Ok(user)
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        let conn = self.storage.get_connection().await;
        Ok(UserStore::new(&conn).list()?)
    }

    pub async fn active_draw(&self) -> Result<Option<Draw>> {
        let conn = self.storage.get_connection().await;
        Ok(DrawStore::new(&conn).active_draw()?)
    }

    pub async fn draw_history(&self) -> Result<Vec<Draw>> {
        let conn = self.storage.get_connection().await;
        Ok(DrawStore::new(&conn).history()?)
    }

    /// Winning tickets of the active draw, best tier first.
    pub async fn winners(&self) -> Result<(Draw, Vec<Ticket>)> {
        let conn = self.storage.get_connection().await;
        let draw = DrawStore::new(&conn)
            .active_draw()?
            .ok_or(LotteryError::NoActiveDraw)?;
        let winners = TicketStore::new(&conn).winners(&draw.id)?;
        Ok((draw, winners))
    }
}
