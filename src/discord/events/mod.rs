// Discord event adapters: turn serenity events into core calls.

pub mod message_events;
pub mod reaction_events;
