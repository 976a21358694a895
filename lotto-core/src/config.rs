use crate::error::{LottoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "lotto.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LottoConfig {
    /// SQLite file, relative to the data directory.
    pub db_file: String,
    /// Upper bound on quick-pick tickets bought in one purchase.
    pub auto_pick_limit: u32,
    /// Seed for draws and quick picks. `None` uses OS entropy.
    pub draw_seed: Option<u64>,
}

impl Default for LottoConfig {
    fn default() -> Self {
        Self {
            db_file: "lotto.db".to_string(),
            auto_pick_limit: 10,
            draw_seed: None,
        }
    }
}

impl LottoConfig {
    /// Reads `lotto.json` from `data_dir`, falling back to defaults when the
    /// file does not exist.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let config = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };

        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        self.validate()?;
        tokio::fs::create_dir_all(data_dir).await?;
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(data_dir.join(CONFIG_FILE_NAME), content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.db_file.trim().is_empty() {
            return Err(LottoError::config("Database file name cannot be empty"));
        }

        if self.auto_pick_limit == 0 {
            return Err(LottoError::config(
                "Auto pick limit must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = LottoConfig::load(temp_dir.path()).await.unwrap();
        assert_eq!(config, LottoConfig::default());
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let temp_dir = tempdir().unwrap();
        tokio::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            r#"{ "draw_seed": 42 }"#,
        )
        .await
        .unwrap();

        let config = LottoConfig::load(temp_dir.path()).await.unwrap();
        assert_eq!(config.draw_seed, Some(42));
        assert_eq!(config.db_file, "lotto.db");
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let temp_dir = tempdir().unwrap();
        let config = LottoConfig {
            auto_pick_limit: 0,
            ..LottoConfig::default()
        };
        assert!(matches!(
            config.save(temp_dir.path()).await,
            Err(LottoError::Config(_))
        ));
    }
}
