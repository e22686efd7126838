//! Scenario tests for the RBAC engine against small literal snapshots

use keyward_rbac::{
    Action, ConflictAnalyzer, Module, Permission, PermissionAggregator, PermissionCheck,
    PermissionEvaluator, PermissionUsage, PermissionsByModule, RbacService, RbacSnapshot, Role,
    User,
};

fn users_perm(id: &str, actions: &[Action]) -> Permission {
    Permission::new(id, format!("Users {id}"), "", "Users", actions.iter().copied())
}

#[test]
fn test_single_role_permission_check() {
    let p1 = users_perm("p1", &[Action::Read, Action::Update]);
    let a = Role::new("r1", "A", "").with_permissions([p1]);
    let u = User::new("u1", "U", "u@example.com").with_roles([a]);

    assert!(PermissionEvaluator::has_permission(
        &u,
        &PermissionCheck::new("Users", Action::Update)
    ));
    assert!(!PermissionEvaluator::has_permission(
        &u,
        &PermissionCheck::new("Users", Action::Delete)
    ));
}

#[test]
fn test_quarter_coverage() {
    let catalog: Vec<Permission> = (1..=4)
        .map(|i| users_perm(&format!("p{i}"), &[Action::Read]))
        .collect();
    let a = Role::new("r1", "A", "").with_permissions([catalog[0].clone()]);

    let coverage =
        PermissionAggregator::role_permission_coverage(&a, &PermissionsByModule::from_catalog(&catalog));
    assert_eq!(coverage["Users"], 25);
}

#[test]
fn test_overlapping_read_is_reported() {
    let p1 = users_perm("p1", &[Action::Read]);
    let p2 = users_perm("p2", &[Action::Read, Action::Delete]);
    let a = Role::new("r1", "A", "").with_permissions([p1.clone()]);
    let b = Role::new("r2", "B", "").with_permissions([p2]);

    let conflicts = ConflictAnalyzer::permission_conflicts(&a, &[a.clone(), b.clone()]);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].permission, p1);
    assert_eq!(conflicts[0].conflicting_roles, vec![b]);
}

#[test]
fn test_usage_counts_roles_and_users() {
    let p1 = users_perm("p1", &[Action::Read]);
    let a = Role::new("r1", "A", "").with_permissions([p1.clone()]);
    let b = Role::new("r2", "B", "").with_permissions([p1.clone()]);
    let u1 = User::new("u1", "U1", "u1@example.com").with_roles([a.clone()]);
    let u2 = User::new("u2", "U2", "u2@example.com").with_roles([a.clone(), b.clone()]);
    let u3 = User::new("u3", "U3", "u3@example.com");

    let usage = ConflictAnalyzer::permission_usage(&[p1], &[a, b], &[u1, u2, u3]);
    assert_eq!(usage["p1"], PermissionUsage { roles: 2, users: 2 });
}

#[test]
fn test_empty_module_coverage_is_zero() {
    let snapshot = RbacSnapshot::new(
        vec![],
        vec![],
        vec![users_perm("p1", &[Action::Read])],
        vec![
            Module::new("m1", "Users", "User management"),
            Module::new("m2", "Reports", "Security reports and analytics"),
        ],
    );
    let any_role = Role::new("r1", "Anything", "").with_permissions([users_perm("p1", &[Action::Read])]);

    let coverage = RbacService::new()
        .insights(&snapshot)
        .role_permission_coverage(&any_role);
    assert_eq!(coverage["Reports"], 0);
    assert_eq!(coverage["Users"], 100);
}

#[test]
fn test_user_without_roles() {
    let user = User::new("u1", "Nobody", "nobody@example.com");
    assert!(PermissionAggregator::user_permissions(&user).is_empty());
    assert!(!PermissionEvaluator::has_any_role(&user, &["Admin"]));
}

#[test]
fn test_snapshot_from_exported_json() {
    let json = r#"{
        "modules": [{"id": "2", "name": "Users", "description": "User management"}],
        "permissions": [{
            "id": "1", "name": "Manage Users", "description": "CRUD users",
            "module": "Users", "actions": ["create", "read", "update", "delete", "bulk_edit"]
        }],
        "roles": [],
        "users": [{
            "id": "1", "name": "Admin User", "email": "admin@example.com", "status": "active",
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z",
            "roles": [{
                "id": "1", "name": "Super Admin", "description": "Full system access",
                "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z",
                "permissions": [{
                    "id": "1", "name": "Manage Users", "description": "CRUD users",
                    "module": "Users", "actions": ["create", "read", "update", "delete", "bulk_edit"]
                }]
            }]
        }]
    }"#;

    let snapshot = RbacSnapshot::from_json_str(json).unwrap();
    assert!(snapshot.validate().is_empty());

    let admin = snapshot.user("1").unwrap();
    let ctx = RbacService::new().access(Some(admin));
    assert!(ctx.check_permission(&PermissionCheck::new("Users", Action::BulkEdit)));
    assert!(ctx.check_role(&["Super Admin"], true));
}
