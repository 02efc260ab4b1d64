// Two-tier permission model: moderators may change settings, everyone else
// may only read them.

use crate::core::settings::Settings;

/// Who issued a command, reduced to what the permission check needs.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: u64,
    /// Human readable identity used in denial messages and logs.
    pub display_name: String,
    pub role_ids: Vec<u64>,
}

pub struct PermissionService {
    super_admin_id: u64,
}

impl PermissionService {
    pub fn new(super_admin_id: u64) -> Self {
        Self { super_admin_id }
    }

    /// The super-admin always passes, whatever the moderator role is set to.
    pub fn is_moderator(&self, caller_id: u64, caller_roles: &[u64], settings: &Settings) -> bool {
        caller_id == self.super_admin_id
            || settings
                .moderator_role()
                .is_some_and(|role| caller_roles.contains(&role))
    }

    /// Same as `is_moderator` but leaves an audit trail when access is denied.
    pub fn authorize(&self, caller: &Caller, settings: &Settings) -> bool {
        let allowed = self.is_moderator(caller.user_id, &caller.role_ids, settings);
        if !allowed {
            tracing::warn!(
                user_id = caller.user_id,
                "{} ({}) failed to authenticate as root.",
                caller.display_name,
                caller.user_id
            );
        }
        allowed
    }
}
