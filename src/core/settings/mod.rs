// Core settings module - per-guild configuration and its persistence port.

pub mod settings_models;
pub mod settings_service;
pub mod settings_store;

pub use settings_models::*;
pub use settings_service::SettingsService;
pub use settings_store::{SettingsStore, StoreError};
