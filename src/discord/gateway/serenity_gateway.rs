// GuildGateway backed by serenity.
//
// Roles and emojis are read from the cache when the guild is cached and
// fetched over HTTP otherwise. Cache references are never held across an
// await point.

use crate::core::gateway::{GatewayError, GuildEmoji, GuildGateway, GuildRole};
use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, Context};
use std::num::NonZeroU64;

const ROLE_REASON: &str = "Automatically through Reaction Roles";

pub struct SerenityGateway<'a> {
    ctx: &'a Context,
    bot_user_id: u64,
}

impl<'a> SerenityGateway<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        let bot_user_id = ctx.cache.current_user().id.get();
        Self { ctx, bot_user_id }
    }
}

/// Discord ids are never zero; a zero can only come from user input or a
/// hand-edited settings file and names nothing.
fn nonzero(id: u64) -> Result<NonZeroU64, GatewayError> {
    NonZeroU64::new(id).ok_or_else(|| GatewayError::NotFound(format!("id {}", id)))
}

fn map_err(what: String, err: serenity::Error) -> GatewayError {
    if let serenity::Error::Http(http_error) = &err {
        if http_error.status_code().map(|s| s.as_u16()) == Some(404) {
            return GatewayError::NotFound(what);
        }
    }
    GatewayError::Platform(format!("{}: {}", what, err))
}

fn reaction_type(emoji: &GuildEmoji) -> Result<serenity::ReactionType, GatewayError> {
    Ok(serenity::ReactionType::Custom {
        animated: emoji.animated,
        id: serenity::EmojiId::from(nonzero(emoji.id)?),
        name: Some(emoji.name.clone()),
    })
}

#[async_trait]
impl GuildGateway for SerenityGateway<'_> {
    fn bot_user_id(&self) -> u64 {
        self.bot_user_id
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<u64, GatewayError> {
        let channel = serenity::ChannelId::from(nonzero(channel_id)?);
        let message = channel
            .say(&self.ctx.http, content)
            .await
            .map_err(|e| map_err(format!("channel {}", channel_id), e))?;
        Ok(message.id.get())
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> Result<(), GatewayError> {
        let channel = serenity::ChannelId::from(nonzero(channel_id)?);
        let message = serenity::MessageId::from(nonzero(message_id)?);
        channel
            .edit_message(
                self.ctx,
                message,
                serenity::EditMessage::new().content(content),
            )
            .await
            .map_err(|e| map_err(format!("message {}", message_id), e))?;
        Ok(())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), GatewayError> {
        let channel = serenity::ChannelId::from(nonzero(channel_id)?);
        let message = serenity::MessageId::from(nonzero(message_id)?);
        channel
            .delete_message(&self.ctx.http, message)
            .await
            .map_err(|e| map_err(format!("message {}", message_id), e))
    }

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &GuildEmoji,
    ) -> Result<(), GatewayError> {
        let channel = serenity::ChannelId::from(nonzero(channel_id)?);
        let message = serenity::MessageId::from(nonzero(message_id)?);
        channel
            .create_reaction(&self.ctx.http, message, reaction_type(emoji)?)
            .await
            .map_err(|e| map_err(format!("message {}", message_id), e))
    }

    async fn remove_own_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &GuildEmoji,
    ) -> Result<(), GatewayError> {
        let channel = serenity::ChannelId::from(nonzero(channel_id)?);
        let message = serenity::MessageId::from(nonzero(message_id)?);
        channel
            .delete_reaction(&self.ctx.http, message, None, reaction_type(emoji)?)
            .await
            .map_err(|e| map_err(format!("message {}", message_id), e))
    }

    async fn channel_exists(&self, channel_id: u64) -> Result<bool, GatewayError> {
        let Some(id) = NonZeroU64::new(channel_id) else {
            return Ok(false);
        };
        // Cache first, HTTP for channels the cache has not seen.
        match serenity::ChannelId::from(id).to_channel(self.ctx).await {
            Ok(_) => Ok(true),
            Err(e) => match map_err(format!("channel {}", channel_id), e) {
                GatewayError::NotFound(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn roles(&self, guild_id: u64) -> Result<Vec<GuildRole>, GatewayError> {
        let guild = serenity::GuildId::from(nonzero(guild_id)?);
        let cached = self.ctx.cache.guild(guild).map(|g| {
            g.roles
                .values()
                .map(|r| GuildRole {
                    id: r.id.get(),
                    name: r.name.clone(),
                })
                .collect::<Vec<_>>()
        });
        if let Some(roles) = cached {
            return Ok(roles);
        }

        let roles = self
            .ctx
            .http
            .get_guild_roles(guild)
            .await
            .map_err(|e| map_err(format!("roles of guild {}", guild_id), e))?;
        Ok(roles
            .into_iter()
            .map(|r| GuildRole {
                id: r.id.get(),
                name: r.name,
            })
            .collect())
    }

    async fn emojis(&self, guild_id: u64) -> Result<Vec<GuildEmoji>, GatewayError> {
        let guild = serenity::GuildId::from(nonzero(guild_id)?);
        let cached = self.ctx.cache.guild(guild).map(|g| {
            g.emojis
                .values()
                .map(|e| GuildEmoji {
                    id: e.id.get(),
                    name: e.name.clone(),
                    animated: e.animated,
                })
                .collect::<Vec<_>>()
        });
        if let Some(emojis) = cached {
            return Ok(emojis);
        }

        let emojis = self
            .ctx
            .http
            .get_emojis(guild)
            .await
            .map_err(|e| map_err(format!("emojis of guild {}", guild_id), e))?;
        Ok(emojis
            .into_iter()
            .map(|e| GuildEmoji {
                id: e.id.get(),
                name: e.name,
                animated: e.animated,
            })
            .collect())
    }

    async fn add_member_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError> {
        self.ctx
            .http
            .add_member_role(
                serenity::GuildId::from(nonzero(guild_id)?),
                serenity::UserId::from(nonzero(user_id)?),
                serenity::RoleId::from(nonzero(role_id)?),
                Some(ROLE_REASON),
            )
            .await
            .map_err(|e| map_err(format!("role {} for user {}", role_id, user_id), e))
    }

    async fn remove_member_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError> {
        self.ctx
            .http
            .remove_member_role(
                serenity::GuildId::from(nonzero(guild_id)?),
                serenity::UserId::from(nonzero(user_id)?),
                serenity::RoleId::from(nonzero(role_id)?),
                Some(ROLE_REASON),
            )
            .await
            .map_err(|e| map_err(format!("role {} for user {}", role_id, user_id), e))
    }
}
