use crate::core::settings::{SettingsRecord, SettingsStore, StoreError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// One JSON file per guild: `<dir>/<guild_id>.json`.
pub struct JsonSettingsStore {
    dir: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, guild_id: u64) -> PathBuf {
        self.dir.join(format!("{}.json", guild_id))
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn load(&self, guild_id: u64) -> Result<Option<SettingsRecord>, StoreError> {
        let path = self.path_for(guild_id);
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn save(&self, guild_id: u64, record: &SettingsRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        let text = serde_json::to_string_pretty(record)?;
        fs::write(self.path_for(guild_id), text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::{RoleMessage, Settings};
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonSettingsStore::new(dir.path());
        assert!(store.load(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_persistence_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("settings"));

        let mut settings = Settings::default();
        settings.set_prefix("? ").unwrap();
        settings.set_moderator_role(Some(9));
        settings.set_distraction_probability(0).unwrap();
        settings.set_role_message(Some(RoleMessage {
            message_id: 3,
            channel_id: 4,
        }));
        settings.insert_role_link(123, 9);
        store.save(55, &settings.to_record()).await.unwrap();

        // Reload from a second store instance
        let reloaded = JsonSettingsStore::new(dir.path().join("settings"));
        let record = reloaded.load(55).await.unwrap().unwrap();
        let known: HashSet<u64> = [9].into_iter().collect();
        assert_eq!(Settings::from_record(record, Some(&known)), settings);

        // Guilds do not share files
        assert!(reloaded.load(56).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1.json"), "{ not json").unwrap();

        let store = JsonSettingsStore::new(dir.path());
        assert!(matches!(
            store.load(1).await,
            Err(StoreError::Serialization(_))
        ));
    }
}
