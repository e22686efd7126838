//! Error types for the RBAC engine
//!
//! Queries never fail. Errors only come from parsing values that cross
//! the boundary as text.

use thiserror::Error;

/// Result type for RBAC operations
pub type Result<T> = std::result::Result<T, RbacError>;

/// Errors raised while reading RBAC data
#[derive(Error, Debug)]
pub enum RbacError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown user status: {0}")]
    UnknownUserStatus(String),

    #[error("Malformed snapshot: {0}")]
    SnapshotFormat(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_action_display() {
        let err = RbacError::UnknownAction("approve".to_string());
        assert_eq!(err.to_string(), "Unknown action: approve");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: RbacError = json_err.into();
        assert!(matches!(err, RbacError::SnapshotFormat(_)));
        assert!(err.to_string().starts_with("Malformed snapshot"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RbacError>();
    }
}
