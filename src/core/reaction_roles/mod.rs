// Core reaction-role module - self-assigned roles via reactions on one message.

pub mod emoji;
pub mod reaction_role_service;

pub use emoji::CustomEmoji;
pub use reaction_role_service::*;
