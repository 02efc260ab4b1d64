// Recording in-memory gateway for tests.

use super::guild_gateway::{GatewayError, GuildEmoji, GuildGateway, GuildRole};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

pub const BOT_USER_ID: u64 = 1;

#[derive(Default)]
struct MockState {
    roles: Vec<GuildRole>,
    emojis: Vec<GuildEmoji>,
    channels: HashSet<u64>,
    next_message_id: u64,
    messages: HashMap<u64, (u64, String)>,
    reactions: HashMap<u64, BTreeSet<u64>>,
    sent: Vec<(u64, String)>,
    member_roles: HashMap<u64, BTreeSet<u64>>,
    failing_reactions: HashSet<u64>,
    fail_edits: bool,
    fail_roles: bool,
}

pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_message_id: 1000,
                ..Default::default()
            }),
        }
    }

    pub fn with_role(self, id: u64, name: &str) -> Self {
        self.state.lock().unwrap().roles.push(GuildRole {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_emoji(self, id: u64, name: &str) -> Self {
        self.state.lock().unwrap().emojis.push(GuildEmoji {
            id,
            name: name.to_string(),
            animated: false,
        });
        self
    }

    pub fn with_channel(self, id: u64) -> Self {
        self.state.lock().unwrap().channels.insert(id);
        self
    }

    pub fn remove_role(&self, id: u64) {
        self.state.lock().unwrap().roles.retain(|r| r.id != id);
    }

    pub fn fail_reaction_for(&self, emoji_id: u64) {
        self.state.lock().unwrap().failing_reactions.insert(emoji_id);
    }

    pub fn fail_edits(&self) {
        self.state.lock().unwrap().fail_edits = true;
    }

    pub fn fail_role_listing(&self) {
        self.state.lock().unwrap().fail_roles = true;
    }

    /// Everything sent with `send_message`, in order.
    pub fn sent(&self) -> Vec<(u64, String)> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Ids of messages that were sent and not deleted since.
    pub fn message_ids(&self) -> Vec<u64> {
        let state = self.state.lock().unwrap();
        let mut ids: Vec<u64> = state.messages.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn message_content(&self, message_id: u64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .messages
            .get(&message_id)
            .map(|(_, content)| content.clone())
    }

    pub fn reactions_on(&self, message_id: u64) -> Vec<u64> {
        self.state
            .lock()
            .unwrap()
            .reactions
            .get(&message_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn member_has_role(&self, user_id: u64, role_id: u64) -> bool {
        self.state
            .lock()
            .unwrap()
            .member_roles
            .get(&user_id)
            .is_some_and(|roles| roles.contains(&role_id))
    }
}

#[async_trait]
impl GuildGateway for MockGateway {
    fn bot_user_id(&self) -> u64 {
        BOT_USER_ID
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<u64, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.next_message_id += 1;
        let id = state.next_message_id;
        state.messages.insert(id, (channel_id, content.to_string()));
        state.sent.push((channel_id, content.to_string()));
        Ok(id)
    }

    async fn edit_message(
        &self,
        _channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_edits {
            return Err(GatewayError::Platform("edit refused".into()));
        }
        match state.messages.get_mut(&message_id) {
            Some(message) => {
                message.1 = content.to_string();
                Ok(())
            }
            None => Err(GatewayError::NotFound(format!("message {message_id}"))),
        }
    }

    async fn delete_message(&self, _channel_id: u64, message_id: u64) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.reactions.remove(&message_id);
        match state.messages.remove(&message_id) {
            Some(_) => Ok(()),
            None => Err(GatewayError::NotFound(format!("message {message_id}"))),
        }
    }

    async fn add_reaction(
        &self,
        _channel_id: u64,
        message_id: u64,
        emoji: &GuildEmoji,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_reactions.contains(&emoji.id) {
            return Err(GatewayError::Platform("reaction refused".into()));
        }
        state
            .reactions
            .entry(message_id)
            .or_default()
            .insert(emoji.id);
        Ok(())
    }

    async fn remove_own_reaction(
        &self,
        _channel_id: u64,
        message_id: u64,
        emoji: &GuildEmoji,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        if let Some(set) = state.reactions.get_mut(&message_id) {
            set.remove(&emoji.id);
        }
        Ok(())
    }

    async fn channel_exists(&self, channel_id: u64) -> Result<bool, GatewayError> {
        Ok(self.state.lock().unwrap().channels.contains(&channel_id))
    }

    async fn roles(&self, _guild_id: u64) -> Result<Vec<GuildRole>, GatewayError> {
        let state = self.state.lock().unwrap();
        if state.fail_roles {
            return Err(GatewayError::Platform("roles unavailable".into()));
        }
        Ok(state.roles.clone())
    }

    async fn emojis(&self, _guild_id: u64) -> Result<Vec<GuildEmoji>, GatewayError> {
        Ok(self.state.lock().unwrap().emojis.clone())
    }

    async fn add_member_role(
        &self,
        _guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        if !state.roles.iter().any(|r| r.id == role_id) {
            return Err(GatewayError::NotFound(format!("role {role_id}")));
        }
        state.member_roles.entry(user_id).or_default().insert(role_id);
        Ok(())
    }

    async fn remove_member_role(
        &self,
        _guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        if !state.roles.iter().any(|r| r.id == role_id) {
            return Err(GatewayError::NotFound(format!("role {role_id}")));
        }
        if let Some(roles) = state.member_roles.get_mut(&user_id) {
            roles.remove(&role_id);
        }
        Ok(())
    }
}
