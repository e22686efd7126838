//! Caller-owned view of all RBAC entities at one point in time

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::aggregator::PermissionsByModule;
use crate::error::Result;
use crate::models::{Module, Permission, Role, User};

/// Everything a query may look at. Refreshed by the caller after each mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacSnapshot {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub modules: Vec<Module>,
}

/// A broken data invariant found by [`RbacSnapshot::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("permission {permission_id} grants no actions")]
    EmptyActions { permission_id: String },

    #[error("permission {permission_id} lists action {action} more than once")]
    DuplicateAction {
        permission_id: String,
        action: String,
    },

    #[error("duplicate {collection} id: {id}")]
    DuplicateId {
        collection: &'static str,
        id: String,
    },

    #[error("role {role_id} grants permission {permission_id} more than once")]
    DuplicateGrant {
        role_id: String,
        permission_id: String,
    },

    #[error("user {user_id} holds role {role_id} more than once")]
    DuplicateAssignment { user_id: String, role_id: String },

    #[error("permission {permission_id} references unknown module {module}")]
    UnknownModule {
        permission_id: String,
        module: String,
    },
}

impl RbacSnapshot {
    pub fn new(
        users: Vec<User>,
        roles: Vec<Role>,
        permissions: Vec<Permission>,
        modules: Vec<Module>,
    ) -> Self {
        Self {
            users,
            roles,
            permissions,
            modules,
        }
    }

    /// Parse a snapshot exported as JSON. Missing collections default to empty.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn permission(&self, id: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.id == id)
    }

    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Catalog grouped by module, including catalog modules without permissions
    pub fn permissions_by_module(&self) -> PermissionsByModule {
        PermissionsByModule::with_modules(&self.modules, &self.permissions)
    }

    /// Report every broken invariant without failing.
    ///
    /// Module references are only checked when the module catalog is non-empty.
    pub fn validate(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        check_unique_ids(
            "permission",
            self.permissions.iter().map(|p| p.id.as_str()),
            &mut violations,
        );
        check_unique_ids("role", self.roles.iter().map(|r| r.id.as_str()), &mut violations);
        check_unique_ids("user", self.users.iter().map(|u| u.id.as_str()), &mut violations);
        check_unique_ids("module", self.modules.iter().map(|m| m.id.as_str()), &mut violations);

        let module_names: HashSet<&str> = self.modules.iter().map(|m| m.name.as_str()).collect();

        for permission in &self.permissions {
            check_actions(permission, &mut violations);

            if !module_names.is_empty() && !module_names.contains(permission.module.as_str()) {
                violations.push(InvariantViolation::UnknownModule {
                    permission_id: permission.id.clone(),
                    module: permission.module.clone(),
                });
            }
        }

        for role in &self.roles {
            let mut granted = HashSet::new();
            for permission in &role.permissions {
                if !granted.insert(permission.id.as_str()) {
                    violations.push(InvariantViolation::DuplicateGrant {
                        role_id: role.id.clone(),
                        permission_id: permission.id.clone(),
                    });
                }
            }
        }

        for user in &self.users {
            let mut assigned = HashSet::new();
            for role in &user.roles {
                if !assigned.insert(role.id.as_str()) {
                    violations.push(InvariantViolation::DuplicateAssignment {
                        user_id: user.id.clone(),
                        role_id: role.id.clone(),
                    });
                }
            }
        }

        for violation in &violations {
            warn!(%violation, "Snapshot invariant violated");
        }

        violations
    }
}

fn check_unique_ids<'a>(
    collection: &'static str,
    ids: impl Iterator<Item = &'a str>,
    violations: &mut Vec<InvariantViolation>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            violations.push(InvariantViolation::DuplicateId {
                collection,
                id: id.to_string(),
            });
        }
    }
}

fn check_actions(permission: &Permission, violations: &mut Vec<InvariantViolation>) {
    if permission.actions.is_empty() {
        violations.push(InvariantViolation::EmptyActions {
            permission_id: permission.id.clone(),
        });
        return;
    }

    let mut seen = HashSet::new();
    for action in &permission.actions {
        if !seen.insert(*action) {
            violations.push(InvariantViolation::DuplicateAction {
                permission_id: permission.id.clone(),
                action: action.to_string(),
            });
        }
    }
}
