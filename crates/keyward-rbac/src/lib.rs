//! Permission evaluation engine for keyward
//!
//! Answers authorization questions against a caller-owned snapshot of
//! users, roles and permissions:
//!
//! - [`PermissionEvaluator`]: does this user satisfy a `(module, action)` check
//!   or hold the named roles
//! - [`PermissionAggregator`]: effective permissions, per-role hierarchy,
//!   module coverage and module statistics
//! - [`ConflictAnalyzer`]: overlapping grants across roles and per-permission usage
//!
//! Every query is pure. Nothing is cached between calls and inputs are
//! never mutated; callers re-query after each change to their data.

pub mod aggregator;
pub mod analyzer;
pub mod di;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod service;
pub mod session;
pub mod snapshot;

pub use aggregator::{ModuleStat, PermissionAggregator, PermissionsByModule};
pub use analyzer::{ConflictAnalyzer, PermissionConflict, PermissionUsage};
pub use error::{RbacError, Result};
pub use evaluator::PermissionEvaluator;
pub use models::{Action, Module, Permission, PermissionCheck, Role, User, UserStatus};
pub use service::{PermissionInsights, RbacService};
pub use session::AccessContext;
pub use snapshot::{InvariantViolation, RbacSnapshot};
