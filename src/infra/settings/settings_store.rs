// Implementations of the settings store.

pub mod in_memory;
pub mod json_store;

// Re-export for convenience
#[allow(unused_imports)]
pub use in_memory::InMemorySettingsStore;
pub use json_store::JsonSettingsStore;
