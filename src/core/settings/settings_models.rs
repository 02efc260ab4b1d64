// Settings domain models - the per-guild configuration of the bot.
//
// `Settings` is the in-memory, validated representation. `SettingsRecord` is
// the persisted blob layout. Loading a record never fails: every field that is
// absent or malformed falls back to its default on its own.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use super::settings_store::StoreError;

pub const DEFAULT_PREFIX: &str = "archer ";
pub const DEFAULT_DISTRACTION_PROBABILITY: u8 = 100;
pub const MAX_DISTRACTION_PROBABILITY: u8 = 100;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Prefix must not be empty")]
    EmptyPrefix,

    #[error("Distraction probability {0} is outside of 0-100")]
    ProbabilityOutOfRange(u8),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// The live message users react to for self-assigned roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMessage {
    pub message_id: u64,
    pub channel_id: u64,
}

/// Mutable configuration of one guild.
///
/// Invariants held by the setters:
/// - `prefix` is never empty
/// - `distraction_probability` is within 0-100
/// - `role_map` has at most one entry per emoji and per role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    prefix: String,
    moderator_role: Option<u64>,
    distraction_probability: u8,
    role_message: Option<RoleMessage>,
    /// Custom emoji id -> role id. BTreeMap keeps the rendering order stable.
    role_map: BTreeMap<u64, u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            moderator_role: None,
            distraction_probability: DEFAULT_DISTRACTION_PROBABILITY,
            role_message: None,
            role_map: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) -> Result<(), SettingsError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(SettingsError::EmptyPrefix);
        }
        self.prefix = prefix;
        Ok(())
    }

    pub fn moderator_role(&self) -> Option<u64> {
        self.moderator_role
    }

    pub fn set_moderator_role(&mut self, role_id: Option<u64>) {
        self.moderator_role = role_id;
    }

    pub fn distraction_probability(&self) -> u8 {
        self.distraction_probability
    }

    pub fn set_distraction_probability(&mut self, probability: u8) -> Result<(), SettingsError> {
        if probability > MAX_DISTRACTION_PROBABILITY {
            return Err(SettingsError::ProbabilityOutOfRange(probability));
        }
        self.distraction_probability = probability;
        Ok(())
    }

    pub fn role_message(&self) -> Option<RoleMessage> {
        self.role_message
    }

    pub fn set_role_message(&mut self, role_message: Option<RoleMessage>) {
        self.role_message = role_message;
    }

    pub fn role_map(&self) -> &BTreeMap<u64, u64> {
        &self.role_map
    }

    pub fn role_for(&self, emoji_id: u64) -> Option<u64> {
        self.role_map.get(&emoji_id).copied()
    }

    pub fn is_role_linked(&self, role_id: u64) -> bool {
        self.role_map.values().any(|linked| *linked == role_id)
    }

    /// Inserts a mapping. Uniqueness is checked by the reaction-role service
    /// before this is called, so this only refuses to overwrite.
    pub(crate) fn insert_role_link(&mut self, emoji_id: u64, role_id: u64) -> bool {
        if self.role_map.contains_key(&emoji_id) {
            return false;
        }
        self.role_map.insert(emoji_id, role_id);
        true
    }

    pub(crate) fn remove_role_link(&mut self, emoji_id: u64) -> Option<u64> {
        self.role_map.remove(&emoji_id)
    }

    /// Build settings from a persisted record.
    ///
    /// `known_roles` is the set of role ids that exist in the guild right now.
    /// Role ids missing from it are dropped. `None` means the role list could
    /// not be fetched, in which case ids are kept as they are.
    pub fn from_record(record: SettingsRecord, known_roles: Option<&HashSet<u64>>) -> Self {
        let role_exists = |role_id: &u64| known_roles.map_or(true, |roles| roles.contains(role_id));

        let prefix = record
            .prefix
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let distraction_probability = record
            .distraction_probability
            .filter(|p| *p <= MAX_DISTRACTION_PROBABILITY)
            .unwrap_or(DEFAULT_DISTRACTION_PROBABILITY);

        let role_message = match (record.roles_msg, record.roles_channel) {
            (Some(message_id), Some(channel_id)) => Some(RoleMessage {
                message_id,
                channel_id,
            }),
            _ => None,
        };

        let mut role_map = BTreeMap::new();
        for (emoji, role_id) in record.roles {
            let Ok(emoji_id) = emoji.parse::<u64>() else {
                continue;
            };
            if !role_exists(&role_id) || role_map.values().any(|r| *r == role_id) {
                continue;
            }
            role_map.insert(emoji_id, role_id);
        }

        Self {
            prefix,
            moderator_role: record.mod_role.filter(role_exists),
            distraction_probability,
            role_message,
            role_map,
        }
    }

    pub fn to_record(&self) -> SettingsRecord {
        SettingsRecord {
            prefix: Some(self.prefix.clone()),
            roles_msg: self.role_message.map(|m| m.message_id),
            roles_channel: self.role_message.map(|m| m.channel_id),
            mod_role: self.moderator_role,
            distraction_probability: Some(self.distraction_probability),
            roles: self
                .role_map
                .iter()
                .map(|(emoji, role)| (emoji.to_string(), *role))
                .collect(),
        }
    }
}

// ============================================================================
// PERSISTED LAYOUT
// ============================================================================

/// On-disk layout of the settings blob.
///
/// Every field is optional when reading; a field with the wrong type is read
/// as absent instead of failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub prefix: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub roles_msg: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub roles_channel: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub mod_role: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub distraction_probability: Option<u8>,
    #[serde(default, deserialize_with = "lenient_roles")]
    pub roles: BTreeMap<String, u64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

// Drops individual bad entries rather than the whole map.
fn lenient_roles<'de, D>(deserializer: D) -> Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(entries) = value else {
        return Ok(BTreeMap::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|(emoji, role)| role.as_u64().map(|role| (emoji, role)))
        .collect())
}
