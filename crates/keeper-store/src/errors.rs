//! Error handling for keeper-store
//!
//! Wraps keeper-core ExError with store-specific helpers

use keeper_core::errors::{ExError, ExErrorKind};
use zookeeper::ZkError;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Node required by the call is absent
pub fn not_found(op: &str, path: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(op)
        .with_path(path)
        .with_message("node does not exist")
}

/// Node the call would create is already present
pub fn already_exists(op: &str, path: &str) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op(op)
        .with_path(path)
        .with_message("node already exists")
}

/// Store could not be reached or the session was lost
pub fn connectivity(op: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Connectivity)
        .with_op(op)
        .with_message(message)
}

/// Write attempted through a read-only session
pub fn read_only(op: &str, path: &str) -> ExError {
    ExError::new(ExErrorKind::Forbidden)
        .with_op(op)
        .with_path(path)
        .with_message("session is read-only")
}

/// Path is not an absolute, slash-delimited node path
pub fn bad_path(op: &str, path: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(op)
        .with_path(path)
        .with_message("invalid node path")
}

/// Stored value is not valid UTF-8
pub fn invalid_value(path: &str, err: std::string::FromUtf8Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("get")
        .with_path(path)
        .with_message(err.to_string())
}

/// Create a store error from a ZooKeeper client error
pub fn from_zk(op: &str, path: &str, err: ZkError) -> ExError {
    let kind = match err {
        ZkError::NoNode => ExErrorKind::NotFound,
        ZkError::NodeExists => ExErrorKind::AlreadyExists,
        ZkError::ConnectionLoss | ZkError::OperationTimeout | ZkError::SessionExpired => {
            ExErrorKind::Connectivity
        }
        ZkError::NoAuth | ZkError::AuthFailed | ZkError::InvalidACL => ExErrorKind::Forbidden,
        _ => ExErrorKind::Persistence,
    };

    ExError::new(kind)
        .with_op(op)
        .with_path(path)
        .with_message(format!("zookeeper: {:?}", err))
}
