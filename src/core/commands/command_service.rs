// Command dispatcher - the entry point for every chat message.
//
// A message is handled under its guild's settings lock. Each line is checked
// for the prefix on its own, so one message can run several commands. A
// denied privileged command stops the whole message; an unknown command only
// skips its line. Messages without any command line may get a flavor reply.

use super::command_parser::{parse_line, ParsedLine};
use super::command_table::{self, Invocation};
use super::responses;
use crate::core::distraction::DistractionService;
use crate::core::gateway::{GatewayError, GuildGateway, GuildRole};
use crate::core::packages::PackageIndex;
use crate::core::permissions::{Caller, PermissionService};
use crate::core::reaction_roles::{
    render_role_lines, LiveSync, ReactionRoleError, ReactionRoleService,
};
use crate::core::settings::{Settings, SettingsService, SettingsStore};
use crate::core::wordplay::{borkify, leetify};
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Failures that could not be turned into a chat reply: the reply itself
/// failed, or a lookup needed to answer at all did.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// A chat message reduced to what the dispatcher needs.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// `None` for direct messages.
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub caller: Caller,
    pub author_is_bot: bool,
    pub mentions_bot: bool,
    pub content: String,
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct CommandService<S: SettingsStore> {
    settings: Arc<SettingsService<S>>,
    reaction_roles: Arc<ReactionRoleService<S>>,
    permissions: PermissionService,
    distraction: DistractionService,
    packages: Arc<dyn PackageIndex>,
}

impl<S: SettingsStore> CommandService<S> {
    pub fn new(
        settings: Arc<SettingsService<S>>,
        reaction_roles: Arc<ReactionRoleService<S>>,
        permissions: PermissionService,
        packages: Arc<dyn PackageIndex>,
    ) -> Self {
        Self {
            settings,
            reaction_roles,
            permissions,
            distraction: DistractionService::new(),
            packages,
        }
    }

    pub async fn handle_message(
        &self,
        gateway: &dyn GuildGateway,
        message: &IncomingMessage,
    ) -> Result<(), CommandError> {
        if message.author_is_bot {
            return Ok(());
        }

        let Some(guild_id) = message.guild_id else {
            gateway
                .send_message(message.channel_id, responses::DIRECT_MESSAGE_REPLY)
                .await?;
            return Ok(());
        };

        let context = self.settings.guild(guild_id, gateway).await;
        let mut settings = context.lock().await;

        if message.mentions_bot {
            let reply = responses::current_prefix(settings.prefix());
            gateway.send_message(message.channel_id, &reply).await?;
            return Ok(());
        }

        let mut saw_command = false;
        for line in message.content.lines() {
            // The prefix is re-read per line: a `prefix` command applies to
            // the lines after it.
            let parsed = parse_line(line, settings.prefix());
            saw_command |= parsed.is_command();

            let tokens = match parsed {
                ParsedLine::NotCommand | ParsedLine::Empty => continue,
                ParsedLine::Unbalanced => {
                    gateway
                        .send_message(message.channel_id, responses::UNBALANCED_QUOTES)
                        .await?;
                    continue;
                }
                ParsedLine::Tokens(tokens) => tokens,
            };
            let Some((name, args)) = tokens.split_first() else {
                continue;
            };

            tracing::info!(
                guild_id,
                user_id = message.caller.user_id,
                "Command issued by {}: {:?}",
                message.caller.display_name,
                tokens
            );

            let Some(command) = command_table::lookup(name) else {
                let reply = responses::unknown_command(settings.prefix());
                gateway.send_message(message.channel_id, &reply).await?;
                continue;
            };

            if command.requires_moderator && !self.permissions.authorize(&message.caller, &settings)
            {
                let reply = responses::permission_denied(
                    &message.caller.display_name,
                    message.caller.user_id,
                );
                gateway.send_message(message.channel_id, &reply).await?;
                return Ok(());
            }

            match (command.parse)(args) {
                Ok(invocation) => {
                    self.execute(gateway, guild_id, &mut settings, message, invocation)
                        .await?
                }
                Err(usage) => {
                    gateway
                        .send_message(message.channel_id, &usage.to_string())
                        .await?;
                }
            }
        }

        if !saw_command {
            let reply = {
                let mut rng = rand::thread_rng();
                self.distraction.distraction_for(
                    &message.content,
                    settings.distraction_probability(),
                    &mut rng,
                )
            };
            if let Some(reply) = reply {
                gateway.send_message(message.channel_id, reply).await?;
            }
        }

        Ok(())
    }

    async fn execute(
        &self,
        gateway: &dyn GuildGateway,
        guild_id: u64,
        settings: &mut Settings,
        message: &IncomingMessage,
        invocation: Invocation,
    ) -> Result<(), CommandError> {
        let channel_id = message.channel_id;
        let replies: Vec<String> = match invocation {
            Invocation::Help => responses::HELP_PAGES.iter().map(|p| p.to_string()).collect(),

            Invocation::SetPrefix(prefix) => {
                match self
                    .settings
                    .update(guild_id, settings, |s| s.set_prefix(prefix))
                    .await
                {
                    Ok(()) => vec![responses::prefix_changed(settings.prefix())],
                    Err(e) => {
                        tracing::warn!(guild_id, "Prefix not changed: {}", e);
                        vec![responses::settings_error(&e).to_string()]
                    }
                }
            }

            Invocation::WhoAmI => {
                let caller = &message.caller;
                let reply = if self
                    .permissions
                    .is_moderator(caller.user_id, &caller.role_ids, settings)
                {
                    responses::MAY_CONFIGURE
                } else {
                    responses::MAY_NOT_CONFIGURE
                };
                vec![reply.to_string()]
            }

            Invocation::Show => vec![self.show(gateway, guild_id, settings).await],

            Invocation::Leetify(text) => vec![leetify(&text)],

            Invocation::Borkify(text) => vec![borkify(&text)],

            Invocation::Lookup(name) => match self.packages.lookup(&name).await {
                Ok(Some(package)) => vec![package.to_string()],
                Ok(None) => vec![responses::PACKAGE_NOT_FOUND.to_string()],
                Err(e) => {
                    tracing::warn!(package = %name, "Package lookup failed: {}", e);
                    vec![responses::PACKAGE_INDEX_DOWN.to_string()]
                }
            },

            Invocation::Rm => {
                let reply = {
                    let mut rng = rand::thread_rng();
                    self.distraction.rm_reply(&mut rng)
                };
                vec![reply.to_string()]
            }

            Invocation::SetModRole(role_name) => {
                match Self::find_role(gateway, guild_id, &role_name).await {
                    Err(reply) => vec![reply.to_string()],
                    Ok(role) => match self
                        .settings
                        .update(guild_id, settings, |s| {
                            s.set_moderator_role(Some(role.id));
                            Ok(())
                        })
                        .await
                    {
                        Ok(()) => {
                            tracing::info!(guild_id, role_id = role.id, "Moderator role set");
                            vec![responses::MOD_ROLE_SET.to_string()]
                        }
                        Err(e) => {
                            tracing::warn!(guild_id, "Moderator role not changed: {}", e);
                            vec![responses::settings_error(&e).to_string()]
                        }
                    },
                }
            }

            Invocation::SendRoleMessage(target) => {
                match self
                    .reaction_roles
                    .publish(gateway, guild_id, settings, target)
                    .await
                {
                    Ok((_, LiveSync::Failed)) => {
                        vec![responses::ROLE_MESSAGE_OUT_OF_SYNC.to_string()]
                    }
                    Ok(_) => Vec::new(),
                    Err(e) => {
                        tracing::warn!(guild_id, channel_id = target, "Role message not sent: {}", e);
                        vec![responses::reaction_role_error(&e).to_string()]
                    }
                }
            }

            Invocation::AddRole { emoji, role_name } => {
                match Self::find_role(gateway, guild_id, &role_name).await {
                    Err(reply) => vec![reply.to_string()],
                    Ok(role) => {
                        let result = self
                            .reaction_roles
                            .link(gateway, guild_id, settings, emoji.id, role.id)
                            .await;
                        Self::mapping_replies(guild_id, result, responses::ROLE_LINKED)
                    }
                }
            }

            Invocation::RemoveRole(emoji) => {
                let result = self
                    .reaction_roles
                    .unlink(gateway, guild_id, settings, emoji.id)
                    .await;
                Self::mapping_replies(guild_id, result, responses::ROLE_UNLINKED)
            }

            Invocation::DistractionProbability(probability) => {
                match self
                    .settings
                    .update(guild_id, settings, |s| {
                        s.set_distraction_probability(probability)
                    })
                    .await
                {
                    Ok(()) => vec![responses::probability_changed(
                        settings.distraction_probability(),
                    )],
                    Err(e) => {
                        tracing::warn!(guild_id, "Distraction probability not changed: {}", e);
                        vec![responses::settings_error(&e).to_string()]
                    }
                }
            }
        };

        for reply in replies {
            gateway.send_message(channel_id, &reply).await?;
        }
        Ok(())
    }

    async fn show(&self, gateway: &dyn GuildGateway, guild_id: u64, settings: &Settings) -> String {
        let roles = gateway.roles(guild_id).await.unwrap_or_else(|e| {
            tracing::warn!(guild_id, "Could not list roles: {}", e);
            Vec::new()
        });
        let emojis = gateway.emojis(guild_id).await.unwrap_or_else(|e| {
            tracing::warn!(guild_id, "Could not list emojis: {}", e);
            Vec::new()
        });

        let moderator_role = settings
            .moderator_role()
            .and_then(|id| roles.iter().find(|r| r.id == id))
            .map(|r| r.name.as_str());

        responses::settings_summary(
            moderator_role,
            settings.distraction_probability(),
            settings.prefix(),
            &render_role_lines(settings.role_map(), &roles, &emojis),
        )
    }

    /// Resolves a role by exact name. The error is the reply to send.
    async fn find_role(
        gateway: &dyn GuildGateway,
        guild_id: u64,
        role_name: &str,
    ) -> Result<GuildRole, &'static str> {
        let roles = gateway.roles(guild_id).await.map_err(|e| {
            tracing::warn!(guild_id, "Could not list roles: {}", e);
            responses::PLATFORM_REFUSED
        })?;
        roles
            .into_iter()
            .find(|r| r.name == role_name)
            .ok_or(responses::ROLE_NOT_FOUND)
    }

    fn mapping_replies(
        guild_id: u64,
        result: Result<LiveSync, ReactionRoleError>,
        success: &str,
    ) -> Vec<String> {
        match result {
            Ok(LiveSync::Failed) => vec![
                success.to_string(),
                responses::ROLE_MESSAGE_OUT_OF_SYNC.to_string(),
            ],
            Ok(_) => vec![success.to_string()],
            Err(e) => {
                tracing::info!(guild_id, "Reaction role change rejected: {}", e);
                vec![responses::reaction_role_error(&e).to_string()]
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
