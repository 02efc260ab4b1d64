use crate::core::commands::IncomingMessage;
use crate::core::permissions::Caller;
use crate::discord::gateway::SerenityGateway;
use crate::discord::Data;
use anyhow::Result;
use poise::serenity_prelude::{self as serenity, Context};

/// Reduce a Discord message to the dispatcher's view of it.
fn incoming(message: &serenity::Message, bot_user_id: serenity::UserId) -> IncomingMessage {
    let role_ids = message
        .member
        .as_ref()
        .map(|member| member.roles.iter().map(|r| r.get()).collect())
        .unwrap_or_default();

    IncomingMessage {
        guild_id: message.guild_id.map(|g| g.get()),
        channel_id: message.channel_id.get(),
        caller: Caller {
            user_id: message.author.id.get(),
            display_name: message.author.tag(),
            role_ids,
        },
        author_is_bot: message.author.bot,
        mentions_bot: message.mentions.iter().any(|u| u.id == bot_user_id),
        content: message.content.clone(),
    }
}

pub async fn handle_message(ctx: &Context, data: &Data, message: &serenity::Message) -> Result<()> {
    let gateway = SerenityGateway::new(ctx);
    let bot_user_id = ctx.cache.current_user().id;

    data.commands
        .handle_message(&gateway, &incoming(message, bot_user_id))
        .await?;
    Ok(())
}
