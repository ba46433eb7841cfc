//! In-process node store
//!
//! Same semantics as the ZooKeeper backend, held in a shared `BTreeMap`.
//! Clones share one tree, so several sessions observe each other's writes.
//! Supports fault injection for connectivity and mid-operation failures.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use keeper_core::errors::{ExError, ExErrorKind};
use keeper_core::StoreConfig;

use crate::errors::{already_exists, bad_path, connectivity, not_found, Result};
use crate::node::{is_valid_path, parent_of, NodeStore};
use crate::session::Connector;

#[derive(Debug, Default)]
struct MemoryTree {
    /// Every node except the implicit root, keyed by absolute path
    nodes: BTreeMap<String, Vec<u8>>,
    offline: bool,
    /// Remaining writes before injected failure; `None` = unlimited
    writes_left: Option<usize>,
    open_sessions: usize,
}

impl MemoryTree {
    fn exists(&self, path: &str) -> bool {
        path == "/" || self.nodes.contains_key(path)
    }

    fn subtree_prefix(path: &str) -> String {
        if path == "/" {
            "/".to_string()
        } else {
            format!("{}/", path)
        }
    }
}

/// Shared in-memory tree implementing `NodeStore` and `Connector`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryTree>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> Result<MutexGuard<'_, MemoryTree>> {
        self.inner.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal).with_message("memory store lock poisoned")
        })
    }

    fn online(&self, op: &str, path: &str) -> Result<MutexGuard<'_, MemoryTree>> {
        let tree = self.tree()?;
        if tree.offline {
            return Err(connectivity(op, "store offline").with_path(path));
        }
        if !is_valid_path(path) {
            return Err(bad_path(op, path));
        }
        Ok(tree)
    }

    fn writable(&self, op: &str, path: &str) -> Result<MutexGuard<'_, MemoryTree>> {
        let mut tree = self.online(op, path)?;
        match tree.writes_left {
            Some(0) => Err(connectivity(op, "connection lost during write").with_path(path)),
            Some(n) => {
                tree.writes_left = Some(n - 1);
                Ok(tree)
            }
            None => Ok(tree),
        }
    }

    /// Make every subsequent call fail with a connectivity error
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut tree) = self.inner.lock() {
            tree.offline = offline;
        }
    }

    /// Allow `n` more writes, then fail writes with a connectivity error
    pub fn fail_writes_after(&self, n: usize) {
        if let Ok(mut tree) = self.inner.lock() {
            tree.writes_left = Some(n);
        }
    }

    /// Sessions currently connected and not yet closed
    pub fn open_sessions(&self) -> usize {
        self.inner.lock().map(|t| t.open_sessions).unwrap_or(0)
    }

    /// All node paths, sorted (root excluded)
    pub fn paths(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|t| t.nodes.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl NodeStore for MemoryStore {
    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.online("exists", path)?.exists(path))
    }

    fn children(&self, path: &str) -> Result<Vec<String>> {
        let tree = self.online("children", path)?;
        if !tree.exists(path) {
            return Err(not_found("children", path));
        }

        let prefix = MemoryTree::subtree_prefix(path);
        let names = tree
            .nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, _)| &key[prefix.len()..])
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect();
        Ok(names)
    }

    fn get(&self, path: &str) -> Result<Vec<u8>> {
        let tree = self.online("get", path)?;
        if path == "/" {
            return Ok(Vec::new());
        }
        tree.nodes
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("get", path))
    }

    fn create(&self, path: &str, value: &[u8]) -> Result<()> {
        let mut tree = self.writable("create", path)?;
        if tree.exists(path) {
            return Err(already_exists("create", path));
        }
        match parent_of(path) {
            Some(parent) if tree.exists(parent) => {}
            _ => return Err(not_found("create", path).with_message("parent node does not exist")),
        }
        tree.nodes.insert(path.to_string(), value.to_vec());
        Ok(())
    }

    fn ensure_path(&self, path: &str) -> Result<()> {
        let mut tree = self.writable("ensure_path", path)?;
        let mut current = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            if !tree.nodes.contains_key(&current) {
                tree.nodes.insert(current.clone(), Vec::new());
            }
        }
        Ok(())
    }

    fn set(&self, path: &str, value: &[u8]) -> Result<()> {
        let mut tree = self.writable("set", path)?;
        match tree.nodes.get_mut(path) {
            Some(slot) => {
                *slot = value.to_vec();
                Ok(())
            }
            None => Err(not_found("set", path)),
        }
    }

    fn delete_recursive(&self, path: &str) -> Result<()> {
        let mut tree = self.writable("delete_recursive", path)?;
        if path == "/" {
            return Err(bad_path("delete_recursive", path).with_message("cannot delete root"));
        }
        if tree.nodes.remove(path).is_none() {
            return Err(not_found("delete_recursive", path));
        }
        let prefix = MemoryTree::subtree_prefix(path);
        tree.nodes.retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut tree = self.tree()?;
        tree.open_sessions = tree.open_sessions.saturating_sub(1);
        Ok(())
    }
}

impl Connector for MemoryStore {
    fn connect(&self, _config: &StoreConfig) -> Result<Box<dyn NodeStore>> {
        let mut tree = self.tree()?;
        if tree.offline {
            return Err(connectivity("connect", "store offline"));
        }
        tree.open_sessions += 1;
        drop(tree);
        Ok(Box::new(self.clone()))
    }
}
