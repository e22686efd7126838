//! Authorization decisions for a single user

use crate::models::{PermissionCheck, User};

/// Decides whether a user satisfies a permission check or holds roles.
///
/// Role names are compared exactly (case-sensitive).
pub struct PermissionEvaluator;

impl PermissionEvaluator {
    /// True iff some role of `user` grants `check.action` on `check.module`.
    ///
    /// A user with no roles is never authorized.
    pub fn has_permission(user: &User, check: &PermissionCheck) -> bool {
        user.roles
            .iter()
            .any(|role| role.permissions.iter().any(|p| p.grants(check)))
    }

    /// True iff at least one of the user's role names is in `role_names`.
    pub fn has_any_role<S: AsRef<str>>(user: &User, role_names: &[S]) -> bool {
        user.roles
            .iter()
            .any(|role| role_names.iter().any(|name| name.as_ref() == role.name))
    }

    /// True iff every name in `role_names` matches one of the user's roles.
    ///
    /// An empty `role_names` is vacuously satisfied.
    pub fn has_all_roles<S: AsRef<str>>(user: &User, role_names: &[S]) -> bool {
        role_names
            .iter()
            .all(|name| user.roles.iter().any(|role| role.name == name.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, Permission, Role};

    fn editor() -> User {
        let perm = Permission::new("p1", "Edit Users", "", "Users", [Action::Read, Action::Update]);
        let role = Role::new("r1", "Editor", "").with_permissions([perm]);
        User::new("u1", "Jane", "jane@example.com").with_roles([role])
    }

    #[test]
    fn test_has_permission_matching_action() {
        let user = editor();
        assert!(PermissionEvaluator::has_permission(
            &user,
            &PermissionCheck::new("Users", Action::Update)
        ));
    }

    #[test]
    fn test_has_permission_missing_action() {
        let user = editor();
        assert!(!PermissionEvaluator::has_permission(
            &user,
            &PermissionCheck::new("Users", Action::Delete)
        ));
    }

    #[test]
    fn test_has_permission_other_module() {
        let user = editor();
        assert!(!PermissionEvaluator::has_permission(
            &user,
            &PermissionCheck::new("Roles", Action::Read)
        ));
    }

    #[test]
    fn test_has_permission_no_roles() {
        let user = User::new("u2", "Nobody", "nobody@example.com");
        for action in Action::ALL {
            assert!(!PermissionEvaluator::has_permission(
                &user,
                &PermissionCheck::new("Users", action)
            ));
        }
    }

    #[test]
    fn test_has_permission_across_roles() {
        let reader = Role::new("r1", "Reader", "").with_permissions([Permission::new(
            "p1",
            "",
            "",
            "Reports",
            [Action::Read],
        )]);
        let bulk = Role::new("r2", "Bulk", "").with_permissions([Permission::new(
            "p2",
            "",
            "",
            "Users",
            [Action::BulkEdit],
        )]);
        let user = User::new("u1", "Jane", "jane@example.com").with_roles([reader, bulk]);

        assert!(PermissionEvaluator::has_permission(
            &user,
            &PermissionCheck::new("Users", Action::BulkEdit)
        ));
        assert!(PermissionEvaluator::has_permission(
            &user,
            &PermissionCheck::new("Reports", Action::Read)
        ));
    }

    #[test]
    fn test_has_any_role() {
        let user = editor();
        assert!(PermissionEvaluator::has_any_role(&user, &["Admin", "Editor"]));
        assert!(!PermissionEvaluator::has_any_role(&user, &["Admin"]));
        assert!(!PermissionEvaluator::has_any_role::<&str>(&user, &[]));
    }

    #[test]
    fn test_role_names_are_case_sensitive() {
        let user = editor();
        assert!(!PermissionEvaluator::has_any_role(&user, &["editor"]));
        assert!(!PermissionEvaluator::has_all_roles(&user, &["EDITOR"]));
    }

    #[test]
    fn test_has_all_roles() {
        let user = editor();
        assert!(PermissionEvaluator::has_all_roles(&user, &["Editor"]));
        assert!(PermissionEvaluator::has_all_roles(&user, &["Editor", "Editor"]));
        assert!(!PermissionEvaluator::has_all_roles(&user, &["Editor", "Admin"]));
    }

    #[test]
    fn test_has_all_roles_empty_is_vacuous() {
        let nobody = User::new("u2", "Nobody", "nobody@example.com");
        assert!(PermissionEvaluator::has_all_roles::<String>(&nobody, &[]));
        assert!(PermissionEvaluator::has_all_roles::<String>(&editor(), &[]));
    }

    #[test]
    fn test_accepts_owned_names() {
        let names = vec!["Editor".to_string()];
        assert!(PermissionEvaluator::has_any_role(&editor(), &names));
    }
}
