use super::settings_models::SettingsRecord;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Blob storage for one settings record per guild.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// `Ok(None)` when nothing was ever saved for this guild.
    async fn load(&self, guild_id: u64) -> Result<Option<SettingsRecord>, StoreError>;

    /// Overwrites the stored record.
    async fn save(&self, guild_id: u64, record: &SettingsRecord) -> Result<(), StoreError>;
}
