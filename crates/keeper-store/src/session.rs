//! Scoped store sessions
//!
//! A `StoreClient` holds the connection settings and opens one `Session` per
//! command invocation. The session releases its connection when dropped, so
//! the connection is closed on success, on error and on early return alike.

use keeper_core::errors::{ExError, ExErrorKind};
use keeper_core::{InventoryLayout, StoreConfig};
use tracing::{debug, warn};

use crate::errors::{invalid_value, read_only, Result};
use crate::node::NodeStore;

/// Whether a session may mutate the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "read_only",
            AccessMode::ReadWrite => "read_write",
        }
    }
}

/// Opens backend connections
pub trait Connector {
    fn connect(&self, config: &StoreConfig) -> Result<Box<dyn NodeStore>>;
}

/// Entry point for opening sessions against one configured store
pub struct StoreClient<C: Connector> {
    config: StoreConfig,
    layout: InventoryLayout,
    connector: C,
}

impl<C: Connector> StoreClient<C> {
    pub fn new(config: StoreConfig, connector: C) -> Self {
        let layout = InventoryLayout::new(&config.base_path);
        Self {
            config,
            layout,
            connector,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn layout(&self) -> &InventoryLayout {
        &self.layout
    }

    pub fn open_read_only(&self) -> Result<Session> {
        self.open(AccessMode::ReadOnly)
    }

    pub fn open_read_write(&self) -> Result<Session> {
        self.open(AccessMode::ReadWrite)
    }

    fn open(&self, mode: AccessMode) -> Result<Session> {
        let backend = self.connector.connect(&self.config).map_err(|e| {
            if e.kind() == ExErrorKind::Connectivity {
                e
            } else {
                ExError::new(ExErrorKind::Connectivity)
                    .with_op("connect")
                    .with_message(e.to_string())
            }
        })?;
        debug!(
            component = module_path!(),
            servers = %self.config.connect_string(),
            session_mode = mode.as_str(),
            "store session opened"
        );
        Ok(Session { backend, mode })
    }
}

/// One open connection, released on drop
pub struct Session {
    backend: Box<dyn NodeStore>,
    mode: AccessMode,
}

impl Session {
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    fn check_writable(&self, op: &str, path: &str) -> Result<()> {
        match self.mode {
            AccessMode::ReadWrite => Ok(()),
            AccessMode::ReadOnly => Err(read_only(op, path)),
        }
    }

    pub fn exists(&self, path: &str) -> Result<bool> {
        self.backend.exists(path)
    }

    pub fn children(&self, path: &str) -> Result<Vec<String>> {
        self.backend.children(path)
    }

    /// Children of `path`, or nothing if `path` is absent
    pub fn children_or_empty(&self, path: &str) -> Result<Vec<String>> {
        match self.backend.children(path) {
            Ok(names) => Ok(names),
            Err(e) if e.kind() == ExErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub fn get(&self, path: &str) -> Result<Vec<u8>> {
        self.backend.get(path)
    }

    /// Value at `path` decoded as UTF-8
    pub fn get_string(&self, path: &str) -> Result<String> {
        let bytes = self.backend.get(path)?;
        String::from_utf8(bytes).map_err(|e| invalid_value(path, e))
    }

    pub fn create(&self, path: &str, value: &[u8]) -> Result<()> {
        self.check_writable("create", path)?;
        self.backend.create(path, value)
    }

    pub fn ensure_path(&self, path: &str) -> Result<()> {
        self.check_writable("ensure_path", path)?;
        self.backend.ensure_path(path)
    }

    pub fn set(&self, path: &str, value: &[u8]) -> Result<()> {
        self.check_writable("set", path)?;
        self.backend.set(path, value)
    }

    pub fn delete_recursive(&self, path: &str) -> Result<()> {
        self.check_writable("delete_recursive", path)?;
        self.backend.delete_recursive(path)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        match self.backend.close() {
            Ok(()) => debug!(
                component = module_path!(),
                session_mode = self.mode.as_str(),
                "store session closed"
            ),
            Err(e) => warn!(
                component = module_path!(),
                session_mode = self.mode.as_str(),
                error = %e,
                "store session close failed"
            ),
        }
    }
}
