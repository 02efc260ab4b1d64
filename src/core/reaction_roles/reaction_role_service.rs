// Reaction-role synchronizer.
//
// Keeps four things in agreement: the emoji -> role map in the settings, the
// body of the live role message, the bot's reactions under that message and
// the roles members actually hold. The live message is optional; while it is
// unset only the map is maintained and `publish` catches the message up.

use crate::core::gateway::{GatewayError, GuildEmoji, GuildGateway, GuildRole};
use crate::core::settings::{RoleMessage, Settings, SettingsError, SettingsService, SettingsStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

pub const ROLE_MESSAGE_HEADER: &str =
    "Benutze die Reaktionen unter dieser Nachricht, um dir selber Rollen zu geben.";

// ============================================================================
// ERRORS AND OUTCOMES
// ============================================================================

#[derive(Debug, Error)]
pub enum ReactionRoleError {
    #[error("Channel {0} not found")]
    ChannelNotFound(u64),

    #[error("Role {0} is already linked")]
    RoleAlreadyLinked(u64),

    #[error("Emoji {0} is already linked")]
    EmojiAlreadyLinked(u64),

    #[error("Emoji {0} does not exist in this guild")]
    EmojiNotInGuild(u64),

    #[error("No role is linked to emoji {0}")]
    NotFound(u64),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// What happened to the live role message after a mapping change.
#[derive(Debug)]
pub enum LiveSync {
    /// No role message has been published yet.
    Skipped,
    Updated,
    /// The mapping is persisted but the live message could not be updated.
    /// The cause is logged where it happens.
    Failed,
}

/// Result of handling a reaction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// Not on the role message, unknown emoji or the bot's own reaction.
    Ignored,
    Granted { role_id: u64 },
    Revoked { role_id: u64 },
    /// The mapped role no longer exists in the guild.
    StaleRole { role_id: u64 },
}

/// A raw reaction add or remove, reduced to ids.
#[derive(Debug, Clone, Copy)]
pub struct ReactionEvent {
    pub message_id: u64,
    pub emoji_id: u64,
    pub user_id: u64,
}

// ============================================================================
// RENDERING
// ============================================================================

/// One line per mapping, in emoji id order. Mappings whose role or emoji no
/// longer resolves are skipped.
pub fn render_role_lines(
    role_map: &BTreeMap<u64, u64>,
    roles: &[GuildRole],
    emojis: &[GuildEmoji],
) -> String {
    role_map
        .iter()
        .filter_map(|(emoji_id, role_id)| {
            let emoji = emojis.iter().find(|e| e.id == *emoji_id)?;
            let role = roles.iter().find(|r| r.id == *role_id)?;
            Some(format!("  {} → `{}`", emoji.markup(), role.name))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_role_message(
    role_map: &BTreeMap<u64, u64>,
    roles: &[GuildRole],
    emojis: &[GuildEmoji],
) -> String {
    format!(
        "{}\n{}",
        ROLE_MESSAGE_HEADER,
        render_role_lines(role_map, roles, emojis)
    )
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct ReactionRoleService<S: SettingsStore> {
    settings: Arc<SettingsService<S>>,
}

impl<S: SettingsStore> ReactionRoleService<S> {
    pub fn new(settings: Arc<SettingsService<S>>) -> Self {
        Self { settings }
    }

    /// Send a fresh role message into `channel_id` and make it the live one.
    pub async fn publish(
        &self,
        gateway: &dyn GuildGateway,
        guild_id: u64,
        settings: &mut Settings,
        channel_id: u64,
    ) -> Result<(u64, LiveSync), ReactionRoleError> {
        if !gateway.channel_exists(channel_id).await? {
            return Err(ReactionRoleError::ChannelNotFound(channel_id));
        }

        let message_id = gateway.send_message(channel_id, ROLE_MESSAGE_HEADER).await?;
        let role_message = RoleMessage {
            message_id,
            channel_id,
        };
        let recorded = self
            .settings
            .update(guild_id, settings, |s| {
                s.set_role_message(Some(role_message));
                Ok(())
            })
            .await;
        if let Err(e) = recorded {
            // Nothing points at the message, so it must not stay behind.
            if let Err(delete_err) = gateway.delete_message(channel_id, message_id).await {
                tracing::warn!(
                    guild_id,
                    channel_id,
                    message_id,
                    "Unrecorded role message left in channel: {}",
                    delete_err
                );
            }
            return Err(e.into());
        }
        tracing::info!(guild_id, channel_id, message_id, "Published role message");

        let emojis = match gateway.emojis(guild_id).await {
            Ok(emojis) => emojis,
            Err(e) => {
                tracing::warn!(guild_id, "Could not list emojis for role message: {}", e);
                Vec::new()
            }
        };

        // One failing reaction must not keep the others off the message.
        for emoji_id in settings.role_map().keys() {
            let Some(emoji) = emojis.iter().find(|e| e.id == *emoji_id) else {
                tracing::warn!(guild_id, emoji_id, "Linked emoji no longer exists");
                continue;
            };
            if let Err(e) = gateway.add_reaction(channel_id, message_id, emoji).await {
                tracing::warn!(guild_id, emoji_id, "Failed to add reaction: {}", e);
            }
        }

        let refreshed = self.refresh_message(gateway, guild_id, settings).await;
        Ok((message_id, Self::live_result(guild_id, refreshed)))
    }

    /// Link `emoji_id` to `role_id`.
    pub async fn link(
        &self,
        gateway: &dyn GuildGateway,
        guild_id: u64,
        settings: &mut Settings,
        emoji_id: u64,
        role_id: u64,
    ) -> Result<LiveSync, ReactionRoleError> {
        if settings.is_role_linked(role_id) {
            return Err(ReactionRoleError::RoleAlreadyLinked(role_id));
        }
        if settings.role_for(emoji_id).is_some() {
            return Err(ReactionRoleError::EmojiAlreadyLinked(emoji_id));
        }

        let emoji = gateway
            .emojis(guild_id)
            .await?
            .into_iter()
            .find(|e| e.id == emoji_id)
            .ok_or(ReactionRoleError::EmojiNotInGuild(emoji_id))?;

        self.settings
            .update(guild_id, settings, |s| {
                s.insert_role_link(emoji_id, role_id);
                Ok(())
            })
            .await?;
        tracing::info!(guild_id, emoji_id, role_id, "Linked reaction role");

        let settings: &Settings = settings;
        let Some(role_message) = settings.role_message() else {
            return Ok(LiveSync::Skipped);
        };

        let live = async {
            gateway
                .add_reaction(role_message.channel_id, role_message.message_id, &emoji)
                .await?;
            self.refresh_message(gateway, guild_id, settings).await
        };
        Ok(Self::live_result(guild_id, live.await))
    }

    /// Remove the mapping for `emoji_id`.
    pub async fn unlink(
        &self,
        gateway: &dyn GuildGateway,
        guild_id: u64,
        settings: &mut Settings,
        emoji_id: u64,
    ) -> Result<LiveSync, ReactionRoleError> {
        if settings.role_for(emoji_id).is_none() {
            return Err(ReactionRoleError::NotFound(emoji_id));
        }

        self.settings
            .update(guild_id, settings, |s| {
                s.remove_role_link(emoji_id);
                Ok(())
            })
            .await?;
        tracing::info!(guild_id, emoji_id, "Unlinked reaction role");

        let settings: &Settings = settings;
        let Some(role_message) = settings.role_message() else {
            return Ok(LiveSync::Skipped);
        };

        let live = async {
            let emoji = gateway
                .emojis(guild_id)
                .await?
                .into_iter()
                .find(|e| e.id == emoji_id);
            // An emoji deleted from the guild takes its reactions with it.
            if let Some(emoji) = emoji {
                gateway
                    .remove_own_reaction(role_message.channel_id, role_message.message_id, &emoji)
                    .await?;
            }
            self.refresh_message(gateway, guild_id, settings).await
        };
        Ok(Self::live_result(guild_id, live.await))
    }

    /// Grant the mapped role when a member reacts on the role message.
    pub async fn apply_reaction_added(
        &self,
        gateway: &dyn GuildGateway,
        guild_id: u64,
        settings: &Settings,
        event: ReactionEvent,
    ) -> Result<ReactionOutcome, ReactionRoleError> {
        let Some(role_id) = Self::mapped_role(gateway, settings, event) else {
            return Ok(ReactionOutcome::Ignored);
        };

        match gateway
            .add_member_role(guild_id, event.user_id, role_id)
            .await
        {
            Ok(()) => {
                tracing::info!(guild_id, user_id = event.user_id, role_id, "Granted reaction role");
                Ok(ReactionOutcome::Granted { role_id })
            }
            Err(GatewayError::NotFound(what)) => {
                tracing::warn!(guild_id, role_id, "Skipping grant, {} is gone", what);
                Ok(ReactionOutcome::StaleRole { role_id })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Revoke the mapped role when a member removes their reaction.
    pub async fn apply_reaction_removed(
        &self,
        gateway: &dyn GuildGateway,
        guild_id: u64,
        settings: &Settings,
        event: ReactionEvent,
    ) -> Result<ReactionOutcome, ReactionRoleError> {
        let Some(role_id) = Self::mapped_role(gateway, settings, event) else {
            return Ok(ReactionOutcome::Ignored);
        };

        match gateway
            .remove_member_role(guild_id, event.user_id, role_id)
            .await
        {
            Ok(()) => {
                tracing::info!(guild_id, user_id = event.user_id, role_id, "Revoked reaction role");
                Ok(ReactionOutcome::Revoked { role_id })
            }
            Err(GatewayError::NotFound(what)) => {
                tracing::warn!(guild_id, role_id, "Skipping revoke, {} is gone", what);
                Ok(ReactionOutcome::StaleRole { role_id })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Entry point for reaction-add events: runs under the guild's settings lock.
    pub async fn on_external_reaction_added(
        &self,
        gateway: &dyn GuildGateway,
        guild_id: u64,
        event: ReactionEvent,
    ) -> Result<ReactionOutcome, ReactionRoleError> {
        let settings = self.settings.guild(guild_id, gateway).await;
        let settings = settings.lock().await;
        self.apply_reaction_added(gateway, guild_id, &settings, event)
            .await
    }

    /// Entry point for reaction-remove events: runs under the guild's settings lock.
    pub async fn on_external_reaction_removed(
        &self,
        gateway: &dyn GuildGateway,
        guild_id: u64,
        event: ReactionEvent,
    ) -> Result<ReactionOutcome, ReactionRoleError> {
        let settings = self.settings.guild(guild_id, gateway).await;
        let settings = settings.lock().await;
        self.apply_reaction_removed(gateway, guild_id, &settings, event)
            .await
    }

    /// Re-render the live message body from the current map.
    async fn refresh_message(
        &self,
        gateway: &dyn GuildGateway,
        guild_id: u64,
        settings: &Settings,
    ) -> Result<(), GatewayError> {
        let Some(role_message) = settings.role_message() else {
            return Ok(());
        };

        let roles = gateway.roles(guild_id).await?;
        let emojis = gateway.emojis(guild_id).await?;
        let body = render_role_message(settings.role_map(), &roles, &emojis);
        gateway
            .edit_message(role_message.channel_id, role_message.message_id, &body)
            .await
    }

    fn mapped_role(
        gateway: &dyn GuildGateway,
        settings: &Settings,
        event: ReactionEvent,
    ) -> Option<u64> {
        if event.user_id == gateway.bot_user_id() {
            return None;
        }
        let role_message = settings.role_message()?;
        if role_message.message_id != event.message_id {
            return None;
        }
        settings.role_for(event.emoji_id)
    }

    fn live_result(guild_id: u64, result: Result<(), GatewayError>) -> LiveSync {
        match result {
            Ok(()) => LiveSync::Updated,
            Err(e) => {
                tracing::warn!(guild_id, "Role message out of sync: {}", e);
                LiveSync::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gateway::mock_gateway::{MockGateway, BOT_USER_ID};
    use crate::core::settings::{SettingsRecord, StoreError};
    use crate::infra::settings::InMemorySettingsStore;
    use async_trait::async_trait;

    const GUILD: u64 = 77;
    const CHANNEL: u64 = 500;
    const HELPER: u64 = 31;
    const OTHER: u64 = 32;
    const USER: u64 = 4242;

    fn gateway() -> MockGateway {
        MockGateway::new()
            .with_role(HELPER, "Helper")
            .with_role(OTHER, "Other")
            .with_emoji(123, "foo")
            .with_emoji(456, "bar")
            .with_channel(CHANNEL)
    }

    fn service() -> (
        ReactionRoleService<InMemorySettingsStore>,
        Arc<SettingsService<InMemorySettingsStore>>,
    ) {
        let settings = Arc::new(SettingsService::new(InMemorySettingsStore::new()));
        (ReactionRoleService::new(Arc::clone(&settings)), settings)
    }

    async fn published(
        service: &ReactionRoleService<InMemorySettingsStore>,
        gateway: &MockGateway,
        settings: &mut Settings,
    ) -> u64 {
        let (message_id, sync) = service
            .publish(gateway, GUILD, settings, CHANNEL)
            .await
            .unwrap();
        assert!(matches!(sync, LiveSync::Updated));
        message_id
    }

    #[tokio::test]
    async fn link_then_unlink_restores_the_map() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();
        let before = settings.role_map().clone();

        let sync = service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();
        assert!(matches!(sync, LiveSync::Skipped));
        assert_eq!(settings.role_for(123), Some(HELPER));

        service
            .unlink(&gateway, GUILD, &mut settings, 123)
            .await
            .unwrap();
        assert_eq!(settings.role_map(), &before);
    }

    #[tokio::test]
    async fn link_rejects_a_role_that_is_already_linked() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();

        service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();
        let err = service
            .link(&gateway, GUILD, &mut settings, 456, HELPER)
            .await
            .unwrap_err();

        assert!(matches!(err, ReactionRoleError::RoleAlreadyLinked(HELPER)));
        assert_eq!(settings.role_map().len(), 1);
    }

    #[tokio::test]
    async fn link_rejects_an_emoji_that_is_already_linked() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();

        service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();
        let err = service
            .link(&gateway, GUILD, &mut settings, 123, OTHER)
            .await
            .unwrap_err();

        assert!(matches!(err, ReactionRoleError::EmojiAlreadyLinked(123)));
        assert_eq!(settings.role_for(123), Some(HELPER));
    }

    #[tokio::test]
    async fn link_rejects_foreign_emoji() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();

        let err = service
            .link(&gateway, GUILD, &mut settings, 999, HELPER)
            .await
            .unwrap_err();
        assert!(matches!(err, ReactionRoleError::EmojiNotInGuild(999)));
        assert!(settings.role_map().is_empty());
    }

    #[tokio::test]
    async fn unlink_of_unknown_emoji_is_not_found() {
        let (service, settings_service) = service();
        let gateway = gateway();
        let mut settings = Settings::default();

        let err = service
            .unlink(&gateway, GUILD, &mut settings, 123)
            .await
            .unwrap_err();
        assert!(matches!(err, ReactionRoleError::NotFound(123)));
        assert_eq!(settings, Settings::default());

        // Nothing was persisted either.
        let stored = settings_service.guild(GUILD, &gateway).await;
        assert_eq!(*stored.lock().await, Settings::default());
    }

    #[tokio::test]
    async fn link_is_persisted() {
        let store = InMemorySettingsStore::new();
        let service = ReactionRoleService::new(Arc::new(SettingsService::new(store.clone())));
        let gateway = gateway();
        let mut settings = Settings::default();

        service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();

        let record = store.record(GUILD).unwrap();
        assert_eq!(record.roles.get("123"), Some(&HELPER));
    }

    #[tokio::test]
    async fn publish_records_message_reacts_and_renders() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();
        service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();
        service
            .link(&gateway, GUILD, &mut settings, 456, OTHER)
            .await
            .unwrap();

        let message_id = published(&service, &gateway, &mut settings).await;

        assert_eq!(
            settings.role_message(),
            Some(RoleMessage {
                message_id,
                channel_id: CHANNEL
            })
        );
        assert_eq!(gateway.reactions_on(message_id), vec![123, 456]);
        assert_eq!(
            gateway.message_content(message_id).unwrap(),
            format!("{ROLE_MESSAGE_HEADER}\n  <:foo:123> → `Helper`\n  <:bar:456> → `Other`")
        );
    }

    #[tokio::test]
    async fn publish_is_best_effort_per_reaction() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();
        service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();
        service
            .link(&gateway, GUILD, &mut settings, 456, OTHER)
            .await
            .unwrap();
        gateway.fail_reaction_for(123);

        let message_id = published(&service, &gateway, &mut settings).await;
        assert_eq!(gateway.reactions_on(message_id), vec![456]);
    }

    #[tokio::test]
    async fn publish_into_unknown_channel_fails() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();

        let err = service
            .publish(&gateway, GUILD, &mut settings, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ReactionRoleError::ChannelNotFound(1)));
        assert_eq!(settings.role_message(), None);
        assert!(gateway.sent().is_empty());
    }

    struct ReadOnlyStore;

    #[async_trait]
    impl SettingsStore for ReadOnlyStore {
        async fn load(&self, _: u64) -> Result<Option<SettingsRecord>, StoreError> {
            Ok(None)
        }

        async fn save(&self, _: u64, _: &SettingsRecord) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("read-only file system")))
        }
    }

    #[tokio::test]
    async fn unsaved_role_message_is_deleted_again() {
        let service = ReactionRoleService::new(Arc::new(SettingsService::new(ReadOnlyStore)));
        let gateway = gateway();
        let mut settings = Settings::default();

        let err = service
            .publish(&gateway, GUILD, &mut settings, CHANNEL)
            .await
            .unwrap_err();

        assert!(matches!(err, ReactionRoleError::Settings(SettingsError::Store(_))));
        assert_eq!(settings.role_message(), None);
        assert_eq!(gateway.sent().len(), 1);
        assert!(gateway.message_ids().is_empty());
    }

    #[tokio::test]
    async fn link_and_unlink_keep_live_message_in_sync() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();
        let message_id = published(&service, &gateway, &mut settings).await;

        let sync = service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();
        assert!(matches!(sync, LiveSync::Updated));
        assert_eq!(gateway.reactions_on(message_id), vec![123]);
        assert!(gateway
            .message_content(message_id)
            .unwrap()
            .contains("<:foo:123> → `Helper`"));

        service
            .unlink(&gateway, GUILD, &mut settings, 123)
            .await
            .unwrap();
        assert!(gateway.reactions_on(message_id).is_empty());
        assert_eq!(
            gateway.message_content(message_id).unwrap(),
            format!("{ROLE_MESSAGE_HEADER}\n")
        );
    }

    #[tokio::test]
    async fn failed_live_update_keeps_the_mapping() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();
        published(&service, &gateway, &mut settings).await;
        gateway.fail_edits();

        let sync = service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();
        assert!(matches!(sync, LiveSync::Failed));
        assert_eq!(settings.role_for(123), Some(HELPER));
    }

    #[tokio::test]
    async fn reactions_grant_and_revoke_idempotently() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();
        service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();
        let message_id = published(&service, &gateway, &mut settings).await;
        let event = ReactionEvent {
            message_id,
            emoji_id: 123,
            user_id: USER,
        };

        let outcome = service
            .apply_reaction_added(&gateway, GUILD, &settings, event)
            .await
            .unwrap();
        assert_eq!(outcome, ReactionOutcome::Granted { role_id: HELPER });
        assert!(gateway.member_has_role(USER, HELPER));

        // Granting a held role again is fine.
        service
            .apply_reaction_added(&gateway, GUILD, &settings, event)
            .await
            .unwrap();
        assert!(gateway.member_has_role(USER, HELPER));

        let outcome = service
            .apply_reaction_removed(&gateway, GUILD, &settings, event)
            .await
            .unwrap();
        assert_eq!(outcome, ReactionOutcome::Revoked { role_id: HELPER });
        assert!(!gateway.member_has_role(USER, HELPER));

        let outcome = service
            .apply_reaction_removed(&gateway, GUILD, &settings, event)
            .await
            .unwrap();
        assert_eq!(outcome, ReactionOutcome::Revoked { role_id: HELPER });
        assert!(!gateway.member_has_role(USER, HELPER));
    }

    #[tokio::test]
    async fn unrelated_reactions_are_ignored() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();
        service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();

        let before_publish = ReactionEvent {
            message_id: 1,
            emoji_id: 123,
            user_id: USER,
        };
        assert_eq!(
            service
                .apply_reaction_added(&gateway, GUILD, &settings, before_publish)
                .await
                .unwrap(),
            ReactionOutcome::Ignored
        );

        let message_id = published(&service, &gateway, &mut settings).await;
        for event in [
            ReactionEvent {
                message_id: message_id + 1,
                emoji_id: 123,
                user_id: USER,
            },
            ReactionEvent {
                message_id,
                emoji_id: 456,
                user_id: USER,
            },
            ReactionEvent {
                message_id,
                emoji_id: 123,
                user_id: BOT_USER_ID,
            },
        ] {
            assert_eq!(
                service
                    .apply_reaction_added(&gateway, GUILD, &settings, event)
                    .await
                    .unwrap(),
                ReactionOutcome::Ignored
            );
        }
        assert!(!gateway.member_has_role(BOT_USER_ID, HELPER));
        assert!(!gateway.member_has_role(USER, HELPER));
    }

    #[tokio::test]
    async fn deleted_role_is_skipped_not_fatal() {
        let (service, _) = service();
        let gateway = gateway();
        let mut settings = Settings::default();
        service
            .link(&gateway, GUILD, &mut settings, 123, HELPER)
            .await
            .unwrap();
        let message_id = published(&service, &gateway, &mut settings).await;
        gateway.remove_role(HELPER);

        let outcome = service
            .apply_reaction_added(
                &gateway,
                GUILD,
                &settings,
                ReactionEvent {
                    message_id,
                    emoji_id: 123,
                    user_id: USER,
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, ReactionOutcome::StaleRole { role_id: HELPER });
    }

    #[test]
    fn rendering_skips_stale_entries() {
        let mut map = BTreeMap::new();
        map.insert(123, HELPER);
        map.insert(456, 999);
        map.insert(789, OTHER);

        let roles = vec![
            GuildRole {
                id: HELPER,
                name: "Helper".into(),
            },
            GuildRole {
                id: OTHER,
                name: "Other".into(),
            },
        ];
        let emojis = vec![
            GuildEmoji {
                id: 123,
                name: "foo".into(),
                animated: false,
            },
            GuildEmoji {
                id: 456,
                name: "bar".into(),
                animated: false,
            },
        ];

        assert_eq!(
            render_role_lines(&map, &roles, &emojis),
            "  <:foo:123> → `Helper`"
        );
    }

    #[tokio::test]
    async fn external_reaction_events_use_the_guild_context() {
        let (service, settings_service) = service();
        let gateway = gateway();

        let context = settings_service.guild(GUILD, &gateway).await;
        let message_id = {
            let mut settings = context.lock().await;
            service
                .link(&gateway, GUILD, &mut settings, 123, HELPER)
                .await
                .unwrap();
            published(&service, &gateway, &mut settings).await
        };
        let event = ReactionEvent {
            message_id,
            emoji_id: 123,
            user_id: USER,
        };

        service
            .on_external_reaction_added(&gateway, GUILD, event)
            .await
            .unwrap();
        assert!(gateway.member_has_role(USER, HELPER));

        service
            .on_external_reaction_removed(&gateway, GUILD, event)
            .await
            .unwrap();
        assert!(!gateway.member_has_role(USER, HELPER));

        // Removing again is a no-op success.
        let outcome = service
            .on_external_reaction_removed(&gateway, GUILD, event)
            .await
            .unwrap();
        assert_eq!(outcome, ReactionOutcome::Revoked { role_id: HELPER });
    }
}
