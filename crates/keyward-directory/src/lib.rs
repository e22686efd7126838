//! In-memory user, role and permission directory
//!
//! The mutable side of keyward. [`Directory`] owns the entities, checks
//! requests before saving them, refuses unsafe deletions and keeps a short
//! activity feed. Authorization questions are answered by `keyward-rbac`
//! against [`Directory::snapshot`].
//!
//! ```rust,ignore
//! use keyward_directory::{Directory, NewUser};
//!
//! let mut directory = Directory::with_sample_data();
//! let admin = directory.user("1").cloned().unwrap();
//! directory.create_user(&admin, NewUser::new("Sam Lee", "sam@example.com"))?;
//! ```

pub mod activity;
pub mod config;
pub mod di;
pub mod error;
pub mod requests;
pub mod search;
pub mod seed;
pub mod store;

pub use activity::{format_relative_time, Activity, ActivityFeed, ActivityKind};
pub use crate::config::{validate_settings, DirectorySettings, SettingsManager};
pub use error::{ConfigError, DirectoryError, Result};
pub use requests::{NewPermission, NewRole, NewUser, PermissionUpdate, RoleUpdate, UserUpdate};
pub use search::{SortDirection, SortField, StatusFilter, UserQuery};
pub use seed::{sample_modules, sample_permissions};
pub use store::{Directory, SharedDirectory, USERS_MODULE};
