//! Injectable RBAC service
//!
//! [`RbacService`] holds no state. Construct it once while wiring the
//! application (or resolve it from the DI factories) and pass it to whoever
//! needs authorization answers.

use std::collections::HashMap;

use tracing::debug;

use crate::aggregator::{ModuleStat, PermissionAggregator, PermissionsByModule};
use crate::analyzer::{ConflictAnalyzer, PermissionConflict, PermissionUsage};
use crate::evaluator::PermissionEvaluator;
use crate::models::{Permission, PermissionCheck, Role, User};
use crate::session::AccessContext;
use crate::snapshot::RbacSnapshot;

/// Facade over the evaluator, aggregator and analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacService;

impl RbacService {
    pub fn new() -> Self {
        Self
    }

    pub fn has_permission(&self, user: &User, check: &PermissionCheck) -> bool {
        let allowed = PermissionEvaluator::has_permission(user, check);
        debug!(
            user_id = %user.id,
            module = %check.module,
            action = %check.action,
            allowed,
            "Evaluated permission"
        );
        allowed
    }

    pub fn has_any_role<S: AsRef<str>>(&self, user: &User, role_names: &[S]) -> bool {
        PermissionEvaluator::has_any_role(user, role_names)
    }

    pub fn has_all_roles<S: AsRef<str>>(&self, user: &User, role_names: &[S]) -> bool {
        PermissionEvaluator::has_all_roles(user, role_names)
    }

    pub fn get_user_permissions(&self, user: &User) -> Vec<Permission> {
        PermissionAggregator::user_permissions(user)
    }

    pub fn get_permission_hierarchy(&self, roles: &[Role]) -> HashMap<String, Vec<String>> {
        PermissionAggregator::permission_hierarchy(roles)
    }

    pub fn get_role_permission_coverage(
        &self,
        role: &Role,
        by_module: &PermissionsByModule,
    ) -> HashMap<String, u8> {
        PermissionAggregator::role_permission_coverage(role, by_module)
    }

    pub fn module_stats(&self, permissions: &[Permission], roles: &[Role]) -> HashMap<String, ModuleStat> {
        PermissionAggregator::module_stats(permissions, roles)
    }

    pub fn check_permission_conflicts(&self, role: &Role, all_roles: &[Role]) -> Vec<PermissionConflict> {
        let conflicts = ConflictAnalyzer::permission_conflicts(role, all_roles);
        debug!(role_id = %role.id, conflicts = conflicts.len(), "Analyzed role conflicts");
        conflicts
    }

    pub fn analyze_permission_usage(
        &self,
        permissions: &[Permission],
        roles: &[Role],
        users: &[User],
    ) -> HashMap<String, PermissionUsage> {
        ConflictAnalyzer::permission_usage(permissions, roles, users)
    }

    /// Checks on behalf of an optional signed-in user
    pub fn access<'a>(&self, current_user: Option<&'a User>) -> AccessContext<'a> {
        AccessContext::new(current_user)
    }

    /// Snapshot-bound queries that share one grouping of the catalog
    pub fn insights<'a>(&self, snapshot: &'a RbacSnapshot) -> PermissionInsights<'a> {
        PermissionInsights::new(snapshot)
    }
}

/// Catalog-wide queries against one snapshot.
///
/// Groups the catalog by module once on construction; the grouping is
/// only ever derived from the borrowed snapshot, so results are identical
/// to calling the underlying functions directly.
#[derive(Debug, Clone)]
pub struct PermissionInsights<'a> {
    snapshot: &'a RbacSnapshot,
    by_module: PermissionsByModule,
}

impl<'a> PermissionInsights<'a> {
    pub fn new(snapshot: &'a RbacSnapshot) -> Self {
        Self {
            snapshot,
            by_module: snapshot.permissions_by_module(),
        }
    }

    pub fn snapshot(&self) -> &'a RbacSnapshot {
        self.snapshot
    }

    pub fn permissions_by_module(&self) -> &PermissionsByModule {
        &self.by_module
    }

    pub fn module_stats(&self) -> HashMap<String, ModuleStat> {
        PermissionAggregator::module_stats(&self.snapshot.permissions, &self.snapshot.roles)
    }

    pub fn role_permission_coverage(&self, role: &Role) -> HashMap<String, u8> {
        PermissionAggregator::role_permission_coverage(role, &self.by_module)
    }

    pub fn user_effective_permissions(&self, user: &User) -> Vec<Permission> {
        PermissionAggregator::user_permissions(user)
    }

    pub fn permission_conflicts(&self, role: &Role) -> Vec<PermissionConflict> {
        ConflictAnalyzer::permission_conflicts(role, &self.snapshot.roles)
    }

    pub fn permission_usage(&self) -> HashMap<String, PermissionUsage> {
        ConflictAnalyzer::permission_usage(
            &self.snapshot.permissions,
            &self.snapshot.roles,
            &self.snapshot.users,
        )
    }
}
