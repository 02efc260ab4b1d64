// Startup configuration. Every value comes from the environment first and
// falls back to a plain file inside the data directory.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_DIR: &str = "persistent";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {var} environment variable and no readable {} file", .file.display())]
    Missing { var: &'static str, file: PathBuf },

    #[error("ADMIN_ID must be a numeric user id, got {0:?}")]
    InvalidAdminId(String),
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    /// The super-admin, who may always change settings.
    pub admin_id: u64,
    pub data_dir: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|name| std::env::var(name).ok())
    }

    /// `lookup` reads a variable; tests pass a map instead of the process env.
    pub fn load<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // A variable that is set but blank counts as unset.
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let data_dir = lookup("ARCHER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let token = lookup("DISCORD_TOKEN")
            .or_else(|| lookup("TOKEN"))
            .or_else(|| read_trimmed(&data_dir.join("TOKEN")))
            .ok_or_else(|| ConfigError::Missing {
                var: "DISCORD_TOKEN",
                file: data_dir.join("TOKEN"),
            })?;

        let admin_id = lookup("ADMIN_ID")
            .or_else(|| read_trimmed(&data_dir.join("ADMIN-ID")))
            .ok_or_else(|| ConfigError::Missing {
                var: "ADMIN_ID",
                file: data_dir.join("ADMIN-ID"),
            })?;
        let admin_id = admin_id
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidAdminId(admin_id.clone()))?;

        Ok(Self {
            token: token.trim().to_string(),
            admin_id,
            data_dir,
        })
    }

    pub fn settings_dir(&self) -> PathBuf {
        self.data_dir.join("settings")
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
