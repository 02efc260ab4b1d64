// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "commands/mod.rs"]
pub mod commands;

#[path = "distraction/distraction_service.rs"]
pub mod distraction;

#[path = "gateway/mod.rs"]
pub mod gateway;

#[path = "packages/package_index.rs"]
pub mod packages;

#[path = "permissions/permission_service.rs"]
pub mod permissions;

#[path = "reaction_roles/mod.rs"]
pub mod reaction_roles;

#[path = "settings/mod.rs"]
pub mod settings;

#[path = "wordplay/transforms.rs"]
pub mod wordplay;
