// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "config/bot_config.rs"]
pub mod config;

#[path = "packages/arch_client.rs"]
pub mod packages;

#[path = "settings/settings_store.rs"]
pub mod settings;
