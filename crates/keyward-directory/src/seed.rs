//! Sample data for demos and tests

use chrono::{Duration, Utc};
use keyward_rbac::{Action, Module, Permission, RbacSnapshot, Role, User};

use crate::activity::{Activity, ActivityKind};
use crate::config::DirectorySettings;
use crate::store::Directory;

pub fn sample_modules() -> Vec<Module> {
    vec![
        Module::new("1", "Dashboard", "Main dashboard access"),
        Module::new("2", "Users", "User management"),
        Module::new("3", "Roles", "Role management"),
        Module::new("4", "Reports", "Security reports and analytics"),
    ]
}

pub fn sample_permissions() -> Vec<Permission> {
    let crud = [Action::Create, Action::Read, Action::Update, Action::Delete];
    vec![
        Permission::new(
            "1",
            "Manage Users",
            "Create, read, update, and delete users",
            "Users",
            crud,
        ),
        Permission::new(
            "2",
            "View Dashboard",
            "Access to dashboard analytics",
            "Dashboard",
            [Action::Read],
        ),
        Permission::new(
            "3",
            "Manage Roles",
            "Create, read, update, and delete roles",
            "Roles",
            crud,
        ),
    ]
}

impl Directory {
    /// Sample directory with default settings
    pub fn with_sample_data() -> Self {
        Self::with_sample_data_and_settings(DirectorySettings::default())
    }

    /// Four modules, three permissions, "Super Admin" and "User Manager",
    /// and three users. "Admin User" (id `1`) holds Super Admin.
    pub fn with_sample_data_and_settings(settings: DirectorySettings) -> Self {
        let permissions = sample_permissions();
        let super_admin = Role::new("1", "Super Admin", "Full system access")
            .with_permissions(permissions.iter().cloned());
        let user_manager = Role::new("2", "User Manager", "Can manage users")
            .with_permissions(permissions.iter().take(1).cloned());

        let users = vec![
            User::new("1", "Admin User", "admin@example.com").with_roles([super_admin.clone()]),
            User::new("2", "John Doe", "john@example.com").with_roles([user_manager.clone()]),
            User::new("3", "Jane Smith", "jane@example.com").with_roles([user_manager.clone()]),
        ];

        let snapshot = RbacSnapshot::new(
            users,
            vec![super_admin, user_manager],
            permissions,
            sample_modules(),
        );
        let mut directory = Directory::from_snapshot(settings, snapshot);

        let now = Utc::now();
        for (kind, title, description, hours) in [
            (ActivityKind::RoleModified, "Role modified", "Admin permissions updated", 5),
            (ActivityKind::UserAdded, "New user added", "John Doe", 2),
        ] {
            let mut activity = Activity::new(kind, title, description);
            activity.timestamp = now - Duration::hours(hours);
            directory.activity_mut().record(activity);
        }

        directory
    }
}
