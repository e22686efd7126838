//! Derived views over users, roles and the permission catalog

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::{Module, Permission, Role, User};

/// Catalog permissions grouped by module name, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionsByModule {
    order: Vec<String>,
    groups: HashMap<String, Vec<Permission>>,
}

impl PermissionsByModule {
    /// Group a permission catalog. Only modules that own a permission appear.
    pub fn from_catalog(permissions: &[Permission]) -> Self {
        let mut grouped = Self::default();
        for permission in permissions {
            grouped.push(permission.clone());
        }
        grouped
    }

    /// Group a catalog, seeding every module from `modules` first so that
    /// modules without permissions are present with an empty group.
    pub fn with_modules(modules: &[Module], permissions: &[Permission]) -> Self {
        let mut grouped = Self::default();
        for module in modules {
            grouped.ensure(&module.name);
        }
        for permission in permissions {
            grouped.push(permission.clone());
        }
        grouped
    }

    fn ensure(&mut self, module: &str) -> &mut Vec<Permission> {
        if !self.groups.contains_key(module) {
            self.order.push(module.to_string());
        }
        self.groups.entry(module.to_string()).or_default()
    }

    fn push(&mut self, permission: Permission) {
        let module = permission.module.clone();
        self.ensure(&module).push(permission);
    }

    /// Permissions in `module`; empty for unknown modules
    pub fn get(&self, module: &str) -> &[Permission] {
        self.groups.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Catalog size of `module`
    pub fn total(&self, module: &str) -> usize {
        self.get(module).len()
    }

    pub fn contains_module(&self, module: &str) -> bool {
        self.groups.contains_key(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Permission])> {
        self.order
            .iter()
            .map(move |module| (module.as_str(), self.get(module)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Catalog size and usage of one module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleStat {
    /// Catalog permissions in the module
    pub total: usize,
    /// Of those, how many at least one role grants
    pub used: usize,
}

/// Effective permissions, hierarchies and coverage
pub struct PermissionAggregator;

impl PermissionAggregator {
    /// Union of all permissions granted by the user's roles.
    ///
    /// Deduplicated by permission id; the first occurrence (role order, then
    /// grant order) is the one kept.
    pub fn user_permissions(user: &User) -> Vec<Permission> {
        let mut seen = HashSet::new();
        let mut effective = Vec::new();

        for permission in user.roles.iter().flat_map(|role| role.permissions.iter()) {
            if seen.insert(permission.id.as_str()) {
                effective.push(permission.clone());
            }
        }

        trace!(user_id = %user.id, count = effective.len(), "Aggregated effective permissions");
        effective
    }

    /// Role name to that role's permission names, in stored order.
    ///
    /// Keyed by name: when two roles share a name the later one replaces the
    /// earlier entry.
    pub fn permission_hierarchy(roles: &[Role]) -> HashMap<String, Vec<String>> {
        let mut hierarchy = HashMap::new();
        for role in roles {
            let names = role.permissions.iter().map(|p| p.name.clone()).collect();
            hierarchy.insert(role.name.clone(), names);
        }
        hierarchy
    }

    /// Percentage of each module's catalog the role grants, rounded half-up.
    ///
    /// Modules with an empty catalog report 0. Grants repeated under the same
    /// id count once and results are capped at 100.
    pub fn role_permission_coverage(
        role: &Role,
        by_module: &PermissionsByModule,
    ) -> HashMap<String, u8> {
        let mut assigned: HashMap<&str, HashSet<&str>> = HashMap::new();
        for permission in &role.permissions {
            assigned
                .entry(permission.module.as_str())
                .or_default()
                .insert(permission.id.as_str());
        }

        by_module
            .iter()
            .map(|(module, catalog)| {
                let granted = assigned.get(module).map_or(0, HashSet::len);
                (module.to_string(), percentage(granted, catalog.len()))
            })
            .collect()
    }

    /// Per-module catalog totals and how many of those are granted by any role.
    pub fn module_stats(permissions: &[Permission], roles: &[Role]) -> HashMap<String, ModuleStat> {
        let granted: HashSet<&str> = roles
            .iter()
            .flat_map(|role| role.permissions.iter().map(|p| p.id.as_str()))
            .collect();

        let mut stats: HashMap<String, ModuleStat> = HashMap::new();
        for permission in permissions {
            let stat = stats.entry(permission.module.clone()).or_default();
            stat.total += 1;
            if granted.contains(permission.id.as_str()) {
                stat.used += 1;
            }
        }
        stats
    }
}

/// `round(100 * part / whole)` with halves rounded up; 0 when `whole` is 0.
fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole);
    // integer form of floor(100 * part / whole + 0.5)
    ((200 * part + whole) / (2 * whole)) as u8
}
