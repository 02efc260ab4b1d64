// Settings service - owns the per-guild settings contexts.
//
// A guild's settings are loaded exactly once, on the first event that needs
// them, and the in-memory copy is authoritative afterwards. Each guild gets
// its own async mutex: holding it for the length of a handler serializes all
// handlers of that guild while other guilds proceed independently.

use super::settings_models::{Settings, SettingsError};
use super::settings_store::SettingsStore;
use crate::core::gateway::GuildGateway;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Shared handle to one guild's settings.
pub type GuildSettings = Arc<Mutex<Settings>>;

pub struct SettingsService<S: SettingsStore> {
    store: S,
    contexts: DashMap<u64, Arc<OnceCell<GuildSettings>>>,
}

impl<S: SettingsStore> SettingsService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            contexts: DashMap::new(),
        }
    }

    /// Get the settings context for a guild, loading it on first use.
    pub async fn guild(&self, guild_id: u64, gateway: &dyn GuildGateway) -> GuildSettings {
        let cell = self.contexts.entry(guild_id).or_default().clone();
        cell.get_or_init(|| async {
            Arc::new(Mutex::new(self.load(guild_id, gateway).await))
        })
        .await
        .clone()
    }

    /// Load never fails: an absent or unreadable blob is a fresh install.
    async fn load(&self, guild_id: u64, gateway: &dyn GuildGateway) -> Settings {
        let record = match self.store.load(guild_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::info!(guild_id, "No stored settings, starting with defaults");
                return Settings::default();
            }
            Err(e) => {
                tracing::warn!(guild_id, "Stored settings unreadable, using defaults: {}", e);
                return Settings::default();
            }
        };

        let known_roles = match gateway.roles(guild_id).await {
            Ok(roles) => Some(roles.into_iter().map(|r| r.id).collect::<HashSet<_>>()),
            Err(e) => {
                tracing::warn!(guild_id, "Could not resolve roles while loading settings: {}", e);
                None
            }
        };

        let settings = Settings::from_record(record, known_roles.as_ref());
        tracing::info!(
            guild_id,
            prefix = settings.prefix(),
            reaction_roles = settings.role_map().len(),
            "Loaded settings"
        );
        settings
    }

    pub async fn save(&self, guild_id: u64, settings: &Settings) -> Result<(), SettingsError> {
        self.store.save(guild_id, &settings.to_record()).await?;
        Ok(())
    }

    /// Apply `mutate` and persist the result.
    ///
    /// The mutation runs on a copy which only replaces `settings` once it has
    /// been saved, so a rejected mutation or a failed save leaves `settings`
    /// exactly as it was.
    pub async fn update<T, F>(
        &self,
        guild_id: u64,
        settings: &mut Settings,
        mutate: F,
    ) -> Result<T, SettingsError>
    where
        F: FnOnce(&mut Settings) -> Result<T, SettingsError>,
    {
        let mut candidate = settings.clone();
        let value = mutate(&mut candidate)?;
        self.save(guild_id, &candidate).await?;
        *settings = candidate;
        Ok(value)
    }
}
