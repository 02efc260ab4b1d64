// In-memory implementation of SettingsStore.
//
// Nothing survives a restart; used by tests and handy when running the bot
// against a throwaway server.

use crate::core::settings::{SettingsRecord, SettingsStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Clones share the same records.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    records: Arc<DashMap<u64, SettingsRecord>>,
}

#[allow(dead_code)]
impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last record saved for a guild.
    pub fn record(&self, guild_id: u64) -> Option<SettingsRecord> {
        self.records.get(&guild_id).map(|r| r.clone())
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self, guild_id: u64) -> Result<Option<SettingsRecord>, StoreError> {
        Ok(self.record(guild_id))
    }

    async fn save(&self, guild_id: u64, record: &SettingsRecord) -> Result<(), StoreError> {
        self.records.insert(guild_id, record.clone());
        Ok(())
    }
}
