//! Primitive node operations consumed from a hierarchical store
//!
//! Paths are absolute and `/`-delimited. Values are raw bytes; the inventory
//! stores UTF-8 text.

use crate::errors::Result;

/// A hierarchical key-value namespace (ZooKeeper-like)
pub trait NodeStore {
    /// Whether a node exists at `path`
    fn exists(&self, path: &str) -> Result<bool>;

    /// Names (not paths) of the direct children of `path`, sorted
    ///
    /// # Errors
    ///
    /// `NotFound` if `path` does not exist.
    fn children(&self, path: &str) -> Result<Vec<String>>;

    /// Value stored at `path`
    ///
    /// # Errors
    ///
    /// `NotFound` if `path` does not exist.
    fn get(&self, path: &str) -> Result<Vec<u8>>;

    /// Create a single node
    ///
    /// # Errors
    ///
    /// `NotFound` if the parent is missing, `AlreadyExists` if the node is present.
    fn create(&self, path: &str, value: &[u8]) -> Result<()>;

    /// Create `path` and any missing ancestors with empty values
    fn ensure_path(&self, path: &str) -> Result<()>;

    /// Overwrite the value of an existing node
    ///
    /// # Errors
    ///
    /// `NotFound` if `path` does not exist.
    fn set(&self, path: &str, value: &[u8]) -> Result<()>;

    /// Delete `path` and its whole subtree
    ///
    /// # Errors
    ///
    /// `NotFound` if `path` does not exist.
    fn delete_recursive(&self, path: &str) -> Result<()>;

    /// Release the underlying connection
    fn close(&self) -> Result<()>;
}

/// Split an absolute path into its parent path
pub(crate) fn parent_of(path: &str) -> Option<&str> {
    match path.rfind('/') {
        Some(0) if path.len() > 1 => Some("/"),
        Some(0) | None => None,
        Some(idx) => Some(&path[..idx]),
    }
}

/// Absolute, no trailing slash, no empty segments
pub(crate) fn is_valid_path(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    path.starts_with('/') && path[1..].split('/').all(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of("/a/b/c"), Some("/a/b"));
        assert_eq!(parent_of("/a"), Some("/"));
        assert_eq!(parent_of("/"), None);
    }

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("/"));
        assert!(is_valid_path("/a/b"));
        assert!(!is_valid_path("a/b"));
        assert!(!is_valid_path("/a/"));
        assert!(!is_valid_path("/a//b"));
    }
}
