//! In-memory directory of modules, permissions, roles and users
//!
//! The directory owns the entities, enforces the save and delete rules,
//! and hands out [`RbacSnapshot`]s for the engine to query. Roles embed
//! permissions and users embed roles, so every edit is copied into the
//! embedding entities before the method returns.

use std::sync::Arc;

use chrono::Utc;
use keyward_common::{Validatable, ValidationError};
use keyward_rbac::{
    Action, Module, Permission, PermissionCheck, RbacService, RbacSnapshot, Role, User, UserStatus,
};
use parking_lot::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::activity::{Activity, ActivityFeed, ActivityKind};
use crate::config::{DirectorySettings, SettingsManager};
use crate::error::{DirectoryError, Result};
use crate::requests::{NewPermission, NewRole, NewUser, PermissionUpdate, RoleUpdate, UserUpdate};
use crate::search::UserQuery;

/// Module that guards user mutations
pub const USERS_MODULE: &str = "Users";

/// A directory shared between threads
pub type SharedDirectory = Arc<RwLock<Directory>>;

#[derive(Debug, Clone)]
pub struct Directory {
    settings: DirectorySettings,
    rbac: RbacService,
    modules: Vec<Module>,
    permissions: Vec<Permission>,
    roles: Vec<Role>,
    users: Vec<User>,
    activity: ActivityFeed,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new(DirectorySettings::default())
    }
}

impl Directory {
    /// An empty directory
    pub fn new(settings: DirectorySettings) -> Self {
        let activity = ActivityFeed::new(settings.activity_capacity);
        Self {
            settings,
            rbac: RbacService::new(),
            modules: Vec::new(),
            permissions: Vec::new(),
            roles: Vec::new(),
            users: Vec::new(),
            activity,
        }
    }

    /// An empty directory configured by `manager`.
    ///
    /// Also installs the global tracing subscriber at the configured level
    /// unless one is already installed.
    pub fn from_settings_manager(manager: &SettingsManager) -> Result<Self> {
        let settings = manager.load()?;
        let level = settings.log_level();
        if keyward_common::init_tracing(level) {
            debug!(level = %level, "Installed tracing subscriber");
        }
        info!(path = ?manager.path(), "Directory configured from settings");
        Ok(Self::new(settings))
    }

    /// Load existing entities as-is, without validation or activity.
    pub fn from_snapshot(settings: DirectorySettings, snapshot: RbacSnapshot) -> Self {
        let mut directory = Self::new(settings);
        directory.modules = snapshot.modules;
        directory.permissions = snapshot.permissions;
        directory.roles = snapshot.roles;
        directory.users = snapshot.users;
        directory
    }

    pub fn with_modules(mut self, modules: impl IntoIterator<Item = Module>) -> Self {
        self.modules = modules.into_iter().collect();
        self
    }

    pub fn into_shared(self) -> SharedDirectory {
        Arc::new(RwLock::new(self))
    }

    pub fn settings(&self) -> &DirectorySettings {
        &self.settings
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn permission(&self, id: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.id == id)
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn activities(&self) -> &ActivityFeed {
        &self.activity
    }

    pub(crate) fn activity_mut(&mut self) -> &mut ActivityFeed {
        &mut self.activity
    }

    /// Owned copy of the current state for the RBAC engine
    pub fn snapshot(&self) -> RbacSnapshot {
        RbacSnapshot::new(
            self.users.clone(),
            self.roles.clone(),
            self.permissions.clone(),
            self.modules.clone(),
        )
    }

    pub fn search_users(&self, query: &UserQuery) -> Vec<&User> {
        query.apply(&self.users)
    }

    fn record(&mut self, kind: ActivityKind, title: &str, description: String) {
        debug!(kind = %kind, %description, "Recording activity");
        self.activity.record(Activity::new(kind, title, description));
    }

    // ------------------------------------------------------------------
    // Permissions
    // ------------------------------------------------------------------

    fn check_module(&self, module: &str) -> Result<()> {
        if !self.modules.is_empty() && !self.modules.iter().any(|m| m.name == module) {
            return Err(ValidationError::InvalidValue {
                field: "module".to_string(),
                message: format!("unknown module {module}"),
            }
            .into());
        }
        Ok(())
    }

    pub fn create_permission(&mut self, request: NewPermission) -> Result<Permission> {
        request.validate()?;
        self.check_module(&request.module)?;

        let permission = Permission::new(
            Uuid::new_v4().to_string(),
            request.name,
            request.description,
            request.module,
            request.actions,
        );
        self.permissions.push(permission.clone());

        info!(permission_id = %permission.id, module = %permission.module, "Permission created");
        self.record(
            ActivityKind::PermissionUpdated,
            "Permission Created",
            format!("New permission \"{}\" has been created", permission.name),
        );
        Ok(permission)
    }

    pub fn update_permission(&mut self, id: &str, update: PermissionUpdate) -> Result<Permission> {
        update.validate()?;
        if let Some(module) = &update.module {
            self.check_module(module)?;
        }

        let current = self
            .permission(id)
            .ok_or_else(|| DirectoryError::not_found("Permission", id))?;
        let updated = Permission::new(
            current.id.clone(),
            update.name.unwrap_or_else(|| current.name.clone()),
            update.description.unwrap_or_else(|| current.description.clone()),
            update.module.unwrap_or_else(|| current.module.clone()),
            update.actions.unwrap_or_else(|| current.actions.clone()),
        );

        for permission in self.permissions.iter_mut().filter(|p| p.id == id) {
            *permission = updated.clone();
        }
        for role in &mut self.roles {
            for granted in role.permissions.iter_mut().filter(|p| p.id == id) {
                *granted = updated.clone();
            }
        }
        self.sync_user_roles();

        info!(permission_id = %id, "Permission updated");
        self.record(
            ActivityKind::PermissionUpdated,
            "Permission Updated",
            format!("Permission \"{}\" has been updated", updated.name),
        );
        Ok(updated)
    }

    /// Refuses while any role still grants the permission.
    pub fn delete_permission(&mut self, id: &str) -> Result<Permission> {
        let index = self
            .permissions
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DirectoryError::not_found("Permission", id))?;

        let granting = self
            .roles
            .iter()
            .filter(|r| r.grants_permission_id(id))
            .count();
        if granting > 0 {
            warn!(permission_id = %id, roles = granting, "Refused to delete permission in use");
            return Err(DirectoryError::PermissionInUse {
                permission: self.permissions[index].name.clone(),
                roles: granting,
            });
        }

        let removed = self.permissions.remove(index);
        info!(permission_id = %id, "Permission deleted");
        self.record(
            ActivityKind::PermissionUpdated,
            "Permission Deleted",
            format!("Permission \"{}\" has been deleted", removed.name),
        );
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------

    fn resolve_permissions(&self, ids: &[String]) -> Result<Vec<Permission>> {
        let unknown: Vec<String> = ids
            .iter()
            .filter(|id| self.permission(id).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(DirectoryError::UnknownPermissions(unknown));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.permission(id).cloned())
            .collect())
    }

    pub fn create_role(&mut self, request: NewRole) -> Result<Role> {
        request.validate()?;
        let grants = self.resolve_permissions(&request.permission_ids)?;

        let role = Role::new(Uuid::new_v4().to_string(), request.name, request.description)
            .with_permissions(grants);
        self.roles.push(role.clone());

        info!(role_id = %role.id, grants = role.permissions.len(), "Role created");
        self.record(
            ActivityKind::RoleModified,
            "Role Created",
            format!("New role \"{}\" has been created", role.name),
        );
        Ok(role)
    }

    pub fn update_role(&mut self, id: &str, update: RoleUpdate) -> Result<Role> {
        update.validate()?;
        let grants = match &update.permission_ids {
            Some(ids) => Some(self.resolve_permissions(ids)?),
            None => None,
        };

        let role = self
            .roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DirectoryError::not_found("Role", id))?;
        if let Some(name) = update.name {
            role.name = name;
        }
        if let Some(description) = update.description {
            role.description = description;
        }
        if let Some(grants) = grants {
            role.permissions.clear();
            for permission in grants {
                role.grant(permission);
            }
        }
        role.updated_at = Utc::now();
        let updated = role.clone();
        self.sync_user_roles();

        info!(role_id = %id, "Role updated");
        self.record(
            ActivityKind::RoleModified,
            "Role Updated",
            format!("Role \"{}\" has been updated", updated.name),
        );
        Ok(updated)
    }

    /// Refuses protected role names and roles still assigned to a user.
    pub fn delete_role(&mut self, id: &str) -> Result<Role> {
        let index = self
            .roles
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DirectoryError::not_found("Role", id))?;
        let name = self.roles[index].name.clone();

        if self.settings.is_protected_role(&name) {
            warn!(role_id = %id, role = %name, "Refused to delete protected role");
            return Err(DirectoryError::ProtectedRole(name));
        }

        let holders = self.users.iter().filter(|u| u.has_role_id(id)).count();
        if holders > 0 {
            warn!(role_id = %id, users = holders, "Refused to delete role in use");
            return Err(DirectoryError::RoleInUse {
                role: name,
                users: holders,
            });
        }

        let removed = self.roles.remove(index);
        info!(role_id = %id, "Role deleted");
        self.record(
            ActivityKind::RoleModified,
            "Role Deleted",
            format!("Role \"{}\" has been deleted", removed.name),
        );
        Ok(removed)
    }

    /// Replace every role embedded in a user with the stored role of the same id
    fn sync_user_roles(&mut self) {
        let roles = &self.roles;
        for user in &mut self.users {
            for held in &mut user.roles {
                if let Some(current) = roles.iter().find(|r| r.id == held.id) {
                    *held = current.clone();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    fn authorize(&self, actor: &User, action: Action) -> Result<()> {
        let check = PermissionCheck::new(USERS_MODULE, action);
        if self.rbac.has_permission(actor, &check) {
            return Ok(());
        }
        warn!(actor_id = %actor.id, required = %check, "Directory mutation denied");
        Err(DirectoryError::PermissionDenied {
            actor_id: actor.id.clone(),
            required: check.to_string(),
        })
    }

    fn resolve_roles(&self, ids: &[String]) -> Result<Vec<Role>> {
        let unknown: Vec<String> = ids
            .iter()
            .filter(|id| self.role(id).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(DirectoryError::UnknownRoles(unknown));
        }
        Ok(ids.iter().filter_map(|id| self.role(id).cloned()).collect())
    }

    fn is_admin(&self, user: &User) -> bool {
        user.roles
            .iter()
            .any(|r| r.name == self.settings.admin_role_name)
    }

    /// Requires `Users/update` from `actor`.
    pub fn create_user(&mut self, actor: &User, request: NewUser) -> Result<User> {
        self.authorize(actor, Action::Update)?;
        request.validate()?;
        let roles = self.resolve_roles(&request.role_ids)?;

        let user = User::new(Uuid::new_v4().to_string(), request.name, request.email)
            .with_status(request.status)
            .with_roles(roles);
        self.users.push(user.clone());

        info!(user_id = %user.id, actor_id = %actor.id, "User created");
        self.record(
            ActivityKind::UserAdded,
            "New user added",
            format!("{} was added to the system", user.name),
        );
        Ok(user)
    }

    /// Requires `Users/update` from `actor`.
    pub fn update_user(&mut self, actor: &User, id: &str, update: UserUpdate) -> Result<User> {
        self.authorize(actor, Action::Update)?;
        update.validate()?;
        let roles = match &update.role_ids {
            Some(ids) => Some(self.resolve_roles(ids)?),
            None => None,
        };

        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DirectoryError::not_found("User", id))?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(status) = update.status {
            user.status = status;
        }
        if let Some(roles) = roles {
            user.roles.clear();
            for role in roles {
                user.assign_role(role);
            }
        }
        user.updated_at = Utc::now();
        let updated = user.clone();

        info!(user_id = %id, actor_id = %actor.id, "User updated");
        self.record(
            ActivityKind::UserUpdated,
            "User updated",
            format!("{}'s profile was updated", updated.name),
        );
        Ok(updated)
    }

    /// Requires `Users/delete` from `actor`. Holders of the admin role are kept.
    pub fn delete_user(&mut self, actor: &User, id: &str) -> Result<User> {
        self.authorize(actor, Action::Delete)?;

        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| DirectoryError::not_found("User", id))?;
        if self.is_admin(&self.users[index]) {
            warn!(user_id = %id, "Refused to delete admin user");
            return Err(DirectoryError::AdminUserProtected(
                self.users[index].name.clone(),
            ));
        }

        let removed = self.users.remove(index);
        info!(user_id = %id, actor_id = %actor.id, "User deleted");
        self.record(
            ActivityKind::UserDeleted,
            "User deleted",
            format!("{} has been removed from the system", removed.name),
        );
        Ok(removed)
    }

    /// Delete every listed user except unknown ids and admin holders.
    ///
    /// Requires `Users/bulk_edit` and `Users/delete` from `actor`. Returns how
    /// many were removed.
    pub fn bulk_delete_users<S: AsRef<str>>(&mut self, actor: &User, ids: &[S]) -> Result<usize> {
        self.authorize(actor, Action::BulkEdit)?;
        self.authorize(actor, Action::Delete)?;

        let before = self.users.len();
        let admin_role = self.settings.admin_role_name.clone();
        self.users.retain(|user| {
            let selected = ids.iter().any(|id| id.as_ref() == user.id);
            if !selected {
                return true;
            }
            let admin = user.roles.iter().any(|r| r.name == admin_role);
            if admin {
                warn!(user_id = %user.id, "Skipping admin user in bulk delete");
            }
            admin
        });
        let removed = before - self.users.len();

        info!(removed, requested = ids.len(), actor_id = %actor.id, "Bulk user delete");
        if removed > 0 {
            self.record(
                ActivityKind::UsersDeleted,
                "Users deleted",
                format!("{removed} users were deleted"),
            );
        }
        Ok(removed)
    }

    /// Set the status of every listed user. Unknown ids are ignored.
    ///
    /// Requires `Users/bulk_edit` and `Users/update` from `actor`. Returns how
    /// many users matched.
    pub fn bulk_set_status<S: AsRef<str>>(
        &mut self,
        actor: &User,
        ids: &[S],
        status: UserStatus,
    ) -> Result<usize> {
        self.authorize(actor, Action::BulkEdit)?;
        self.authorize(actor, Action::Update)?;

        let now = Utc::now();
        let mut affected = 0;
        for user in &mut self.users {
            if ids.iter().any(|id| id.as_ref() == user.id) {
                user.status = status;
                user.updated_at = now;
                affected += 1;
            }
        }

        info!(affected, status = %status, actor_id = %actor.id, "Bulk status update");
        if affected > 0 {
            let verb = match status {
                UserStatus::Active => "activated",
                UserStatus::Inactive => "deactivated",
            };
            self.record(
                ActivityKind::UsersStatusUpdated,
                "Users status updated",
                format!("{affected} users were {verb}"),
            );
        }
        Ok(affected)
    }
}
