use crate::config::Config;

use serenity::model::id::RoleId;

/// True when any of `roles` is configured as helper or above.
pub fn helper_plus(roles: &[RoleId], config: &Config) -> bool {
    roles.iter().any(|role| config.helper_roles.contains(role))
}
