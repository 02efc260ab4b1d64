// Core gateway module - the chat platform port.

pub mod guild_gateway;

#[cfg(test)]
pub mod mock_gateway;

pub use guild_gateway::*;
