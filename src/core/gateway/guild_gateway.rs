// The chat platform as seen by the core.
//
// Everything the bot does to Discord goes through this port so the command
// and reaction-role logic can be exercised without a gateway connection.
// The serenity implementation lives in `discord/gateway`.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The platform answered that the referenced object does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// A role as it currently exists in a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRole {
    pub id: u64,
    pub name: String,
}

/// A custom emoji as it currently exists in a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildEmoji {
    pub id: u64,
    pub name: String,
    pub animated: bool,
}

impl GuildEmoji {
    /// Message markup that renders the emoji inline.
    pub fn markup(&self) -> String {
        if self.animated {
            format!("<a:{}:{}>", self.name, self.id)
        } else {
            format!("<:{}:{}>", self.name, self.id)
        }
    }
}

#[async_trait]
pub trait GuildGateway: Send + Sync {
    /// User id of the bot itself.
    fn bot_user_id(&self) -> u64;

    /// Sends a plain text message and returns its id.
    async fn send_message(&self, channel_id: u64, content: &str) -> Result<u64, GatewayError>;

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> Result<(), GatewayError>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), GatewayError>;

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &GuildEmoji,
    ) -> Result<(), GatewayError>;

    /// Removes the bot's own reaction.
    async fn remove_own_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &GuildEmoji,
    ) -> Result<(), GatewayError>;

    async fn channel_exists(&self, channel_id: u64) -> Result<bool, GatewayError>;

    async fn roles(&self, guild_id: u64) -> Result<Vec<GuildRole>, GatewayError>;

    async fn emojis(&self, guild_id: u64) -> Result<Vec<GuildEmoji>, GatewayError>;

    async fn add_member_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError>;

    async fn remove_member_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError>;
}
