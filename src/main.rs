// This is the entry point of the Archer bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (settings files, package index, config)
// - `discord/` = Discord-specific adapters (gateway, events, presence)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Route events to the adapters

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::commands::CommandService;
use crate::core::permissions::PermissionService;
use crate::core::reaction_roles::ReactionRoleService;
use crate::core::settings::SettingsService;
use crate::discord::events::{message_events, reaction_events};
use crate::discord::{presence, Data, Error};
use crate::infra::config::BotConfig;
use crate::infra::packages::ArchPackageClient;
use crate::infra::settings::JsonSettingsStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for all Discord events.
///
/// Handler failures are logged and swallowed so one broken event never stops
/// the event loop.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            tracing::info!("Login as {}", data_about_bot.user.name);
        }
        serenity::FullEvent::Message { new_message } => {
            if let Err(e) = message_events::handle_message(ctx, data, new_message).await {
                tracing::error!(
                    channel_id = new_message.channel_id.get(),
                    "Failed to handle message: {:#}",
                    e
                );
            }
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            if let Err(e) = reaction_events::handle_reaction_add(ctx, data, add_reaction).await {
                tracing::error!(
                    message_id = add_reaction.message_id.get(),
                    "Failed to handle reaction add: {:#}",
                    e
                );
            }
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            if let Err(e) =
                reaction_events::handle_reaction_remove(ctx, data, removed_reaction).await
            {
                tracing::error!(
                    message_id = removed_reaction.message_id.get(),
                    "Failed to handle reaction removal: {:#}",
                    e
                );
            }
        }
        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Token and super-admin id come from the environment or the data directory
    let config = BotConfig::from_env()
        .unwrap_or_else(|e| panic!("{}. Set it in .env or the data directory.", e));
    tracing::info!(data_dir = %config.data_dir.display(), "Configuration loaded");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let settings_service = Arc::new(SettingsService::new(JsonSettingsStore::new(
        config.settings_dir(),
    )));
    let reaction_role_service = Arc::new(ReactionRoleService::new(Arc::clone(&settings_service)));
    let package_index =
        Arc::new(ArchPackageClient::new().expect("Failed to create package index client"));
    let command_service = Arc::new(CommandService::new(
        Arc::clone(&settings_service),
        Arc::clone(&reaction_role_service),
        PermissionService::new(config.admin_id),
        package_index,
    ));

    let data = Data {
        commands: command_service,
        reaction_roles: reaction_role_service,
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================
    // Commands are plain text with a per-guild prefix, so the framework only
    // routes events.

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::GUILD_EMOJIS_AND_STICKERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: Vec::new(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, _framework| {
            Box::pin(async move {
                presence::on_ready(ctx);
                tracing::info!("Bot is ready");
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(config.token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
