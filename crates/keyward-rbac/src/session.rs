//! Checks on behalf of the signed-in user, who may be absent

use std::collections::HashMap;

use tracing::debug;

use crate::aggregator::PermissionAggregator;
use crate::evaluator::PermissionEvaluator;
use crate::models::{Permission, PermissionCheck, User};

/// The current user of a request or screen, if any.
///
/// With no user every check is denied and every aggregate is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessContext<'a> {
    current_user: Option<&'a User>,
}

impl<'a> AccessContext<'a> {
    pub fn new(current_user: Option<&'a User>) -> Self {
        Self { current_user }
    }

    pub fn anonymous() -> Self {
        Self { current_user: None }
    }

    pub fn current_user(&self) -> Option<&'a User> {
        self.current_user
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn check_permission(&self, check: &PermissionCheck) -> bool {
        let allowed = self
            .current_user
            .is_some_and(|user| PermissionEvaluator::has_permission(user, check));

        debug!(
            user_id = self.current_user.map(|u| u.id.as_str()),
            module = %check.module,
            action = %check.action,
            allowed,
            "Permission check"
        );
        allowed
    }

    /// All of `role_names` when `require_all`, otherwise any of them.
    pub fn check_role<S: AsRef<str>>(&self, role_names: &[S], require_all: bool) -> bool {
        let Some(user) = self.current_user else {
            return false;
        };

        if require_all {
            PermissionEvaluator::has_all_roles(user, role_names)
        } else {
            PermissionEvaluator::has_any_role(user, role_names)
        }
    }

    pub fn effective_permissions(&self) -> Vec<Permission> {
        self.current_user
            .map(PermissionAggregator::user_permissions)
            .unwrap_or_default()
    }

    /// Hierarchy of the current user's own roles
    pub fn permission_hierarchy(&self) -> HashMap<String, Vec<String>> {
        self.current_user
            .map(|user| PermissionAggregator::permission_hierarchy(&user.roles))
            .unwrap_or_default()
    }
}
