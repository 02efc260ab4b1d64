// Discord layer - the serenity adapters around the core services.

#[path = "events/mod.rs"]
pub mod events;

#[path = "gateway/mod.rs"]
pub mod gateway;

#[path = "presence.rs"]
pub mod presence;

use crate::core::commands::CommandService;
use crate::core::reaction_roles::ReactionRoleService;
use crate::infra::settings::JsonSettingsStore;
use std::sync::Arc;

// Types used by all event handlers
pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub struct Data {
    pub commands: Arc<CommandService<JsonSettingsStore>>,
    pub reaction_roles: Arc<ReactionRoleService<JsonSettingsStore>>,
}
