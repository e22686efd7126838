//! RBAC domain model
//!
//! Entities are plain values owned by the caller. Roles embed the
//! permissions they grant and users embed their roles, so a single
//! [`User`] carries everything needed to evaluate it.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RbacError;

/// Operation kind a permission can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    BulkEdit,
}

impl Action {
    /// Every action, in declaration order
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::BulkEdit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::BulkEdit => "bulk_edit",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| RbacError::UnknownAction(s.to_string()))
    }
}

/// A grant of one or more actions on a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Module *name* this permission is scoped to (matched case-sensitively)
    pub module: String,
    pub actions: Vec<Action>,
}

impl Permission {
    /// Create a permission. Repeated actions are dropped, first occurrence kept.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        module: impl Into<String>,
        actions: impl IntoIterator<Item = Action>,
    ) -> Self {
        let mut unique = Vec::new();
        for action in actions {
            if !unique.contains(&action) {
                unique.push(action);
            }
        }

        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            module: module.into(),
            actions: unique,
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Whether this permission satisfies `check`
    pub fn grants(&self, check: &PermissionCheck) -> bool {
        self.module == check.module && self.allows(check.action)
    }

    /// Same module and at least one shared action.
    ///
    /// Symmetric: `a.overlaps(b) == b.overlaps(a)`.
    pub fn overlaps(&self, other: &Permission) -> bool {
        self.module == other.module && self.actions.iter().any(|a| other.allows(*a))
    }
}

/// A functional area permissions are scoped to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Module {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A named bundle of permission grants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Create a role with no grants, stamped with the current time
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            permissions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style [`Role::grant`] over many permissions
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        for permission in permissions {
            self.grant(permission);
        }
        self
    }

    /// Add a grant. Returns `false` if a permission with the same id is already granted.
    pub fn grant(&mut self, permission: Permission) -> bool {
        if self.grants_permission_id(&permission.id) {
            return false;
        }
        self.permissions.push(permission);
        true
    }

    pub fn grants_permission_id(&self, permission_id: &str) -> bool {
        self.permissions.iter().any(|p| p.id == permission_id)
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            other => Err(RbacError::UnknownUserStatus(other.to_string())),
        }
    }
}

/// An account. Authorization comes only from its roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create an active user with no roles, stamped with the current time
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            status: UserStatus::Active,
            roles: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder-style [`User::assign_role`] over many roles
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        for role in roles {
            self.assign_role(role);
        }
        self
    }

    /// Add a role. Returns `false` if a role with the same id is already assigned.
    pub fn assign_role(&mut self, role: Role) -> bool {
        if self.has_role_id(&role.id) {
            return false;
        }
        self.roles.push(role);
        true
    }

    pub fn has_role_id(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r.id == role_id)
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// A `(module, action)` authorization query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionCheck {
    pub module: String,
    pub action: Action,
}

impl PermissionCheck {
    pub fn new(module: impl Into<String>, action: Action) -> Self {
        Self {
            module: module.into(),
            action,
        }
    }
}

impl std::fmt::Display for PermissionCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.module, self.action)
    }
}
