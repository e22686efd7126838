//! Cross-role analysis: overlapping grants and permission usage
//!
//! A "conflict" here is an overlap, not a contradiction: two distinct roles
//! both grant at least one common action on the same module. Nothing in the
//! engine treats overlapping grants as an error; they are surfaced so an
//! administrator can spot redundant roles.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{Permission, Role, User};

/// One permission of a role and the other roles granting overlapping capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionConflict {
    pub permission: Permission,
    pub conflicting_roles: Vec<Role>,
}

/// How widely a permission is granted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionUsage {
    /// Distinct roles granting the permission
    pub roles: usize,
    /// Distinct users holding at least one such role
    pub users: usize,
}

/// Conflict and usage analysis across roles
pub struct ConflictAnalyzer;

impl ConflictAnalyzer {
    /// For each permission of `role`, the other roles in `all_roles` that
    /// grant a permission on the same module sharing at least one action.
    ///
    /// Records follow `role.permissions` order and only permissions with at
    /// least one conflicting role are reported. Within a record, roles follow
    /// `all_roles` order. A role is "other" when its id differs from
    /// `role.id`. Repeated grants of the same permission id are reported once.
    pub fn permission_conflicts(role: &Role, all_roles: &[Role]) -> Vec<PermissionConflict> {
        let mut seen = HashSet::new();
        let mut conflicts = Vec::new();

        for permission in &role.permissions {
            if !seen.insert(permission.id.as_str()) {
                continue;
            }

            let conflicting_roles: Vec<Role> = all_roles
                .iter()
                .filter(|other| {
                    other.id != role.id
                        && other.permissions.iter().any(|q| q.overlaps(permission))
                })
                .cloned()
                .collect();

            if !conflicting_roles.is_empty() {
                conflicts.push(PermissionConflict {
                    permission: permission.clone(),
                    conflicting_roles,
                });
            }
        }

        conflicts
    }

    /// Usage counts for every catalog permission, keyed by permission id.
    ///
    /// Roles and users are counted by distinct id, and a user's grants are
    /// read from the roles embedded in that user.
    pub fn permission_usage(
        permissions: &[Permission],
        roles: &[Role],
        users: &[User],
    ) -> HashMap<String, PermissionUsage> {
        permissions
            .iter()
            .map(|permission| {
                let id = permission.id.as_str();

                let granting_roles: HashSet<&str> = roles
                    .iter()
                    .filter(|r| r.grants_permission_id(id))
                    .map(|r| r.id.as_str())
                    .collect();

                let holding_users: HashSet<&str> = users
                    .iter()
                    .filter(|u| u.roles.iter().any(|r| r.grants_permission_id(id)))
                    .map(|u| u.id.as_str())
                    .collect();

                (
                    permission.id.clone(),
                    PermissionUsage {
                        roles: granting_roles.len(),
                        users: holding_users.len(),
                    },
                )
            })
            .collect()
    }
}
