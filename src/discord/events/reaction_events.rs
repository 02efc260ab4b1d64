use crate::core::reaction_roles::{ReactionEvent, ReactionOutcome};
use crate::discord::gateway::SerenityGateway;
use crate::discord::Data;
use anyhow::Result;
use poise::serenity_prelude::{self as serenity, Context};

/// Only guild reactions with a custom emoji can map to a role.
fn reaction_event(reaction: &serenity::Reaction) -> Option<(u64, ReactionEvent)> {
    let guild_id = reaction.guild_id?.get();
    let user_id = reaction.user_id?.get();
    let serenity::ReactionType::Custom { id, .. } = &reaction.emoji else {
        return None;
    };

    Some((
        guild_id,
        ReactionEvent {
            message_id: reaction.message_id.get(),
            emoji_id: id.get(),
            user_id,
        },
    ))
}

pub async fn handle_reaction_add(
    ctx: &Context,
    data: &Data,
    reaction: &serenity::Reaction,
) -> Result<()> {
    let Some((guild_id, event)) = reaction_event(reaction) else {
        return Ok(());
    };

    let gateway = SerenityGateway::new(ctx);
    let outcome = data
        .reaction_roles
        .on_external_reaction_added(&gateway, guild_id, event)
        .await?;
    if outcome == ReactionOutcome::Ignored {
        tracing::debug!(guild_id, message_id = event.message_id, "Reaction ignored");
    } else {
        tracing::debug!(guild_id, user_id = event.user_id, ?outcome, "Reaction handled");
    }
    Ok(())
}

pub async fn handle_reaction_remove(
    ctx: &Context,
    data: &Data,
    reaction: &serenity::Reaction,
) -> Result<()> {
    let Some((guild_id, event)) = reaction_event(reaction) else {
        return Ok(());
    };

    let gateway = SerenityGateway::new(ctx);
    let outcome = data
        .reaction_roles
        .on_external_reaction_removed(&gateway, guild_id, event)
        .await?;
    if outcome == ReactionOutcome::Ignored {
        tracing::debug!(guild_id, message_id = event.message_id, "Reaction removal ignored");
    } else {
        tracing::debug!(guild_id, user_id = event.user_id, ?outcome, "Reaction removal handled");
    }
    Ok(())
}
