//! Error types for directory mutations and settings

use keyward_common::ValidationError;
use thiserror::Error;

/// Result type for directory operations
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Errors that can occur while changing the directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid role assignment: unknown roles {0:?}")]
    UnknownRoles(Vec<String>),

    #[error("Invalid grant: unknown permissions {0:?}")]
    UnknownPermissions(Vec<String>),

    #[error("Permission denied: {actor_id} lacks {required}")]
    PermissionDenied { actor_id: String, required: String },

    #[error("Cannot delete system role: {0}")]
    ProtectedRole(String),

    #[error("Cannot delete role {role}: assigned to {users} user(s)")]
    RoleInUse { role: String, users: usize },

    #[error("Cannot delete permission {permission}: used by {roles} role(s)")]
    PermissionInUse { permission: String, roles: usize },

    #[error("Cannot delete admin user: {0}")]
    AdminUserProtected(String),

    #[error("Settings error: {0}")]
    Settings(#[from] ConfigError),
}

impl DirectoryError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        DirectoryError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Settings errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
