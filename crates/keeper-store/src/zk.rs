//! ZooKeeper backend

use std::time::Duration;

use keeper_core::StoreConfig;
use tracing::debug;
use zookeeper::{Acl, CreateMode, WatchedEvent, Watcher, ZooKeeper, ZooKeeperExt};

use crate::errors::{from_zk, Result};
use crate::node::NodeStore;
use crate::session::Connector;

/// Logs session state changes; the inventory never sets data watches
struct SessionWatcher;

impl Watcher for SessionWatcher {
    fn handle(&self, event: WatchedEvent) {
        debug!(
            component = module_path!(),
            event_type = ?event.event_type,
            keeper_state = ?event.keeper_state,
            path = ?event.path,
            "zookeeper session event"
        );
    }
}

/// Live ZooKeeper connection
pub struct ZkStore {
    zk: ZooKeeper,
}

impl ZkStore {
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        let connect_string = config.connect_string();
        let zk = ZooKeeper::connect(
            &connect_string,
            Duration::from_millis(config.session_timeout_ms),
            SessionWatcher,
        )
        .map_err(|e| from_zk("connect", &config.base_path, e))?;
        Ok(Self { zk })
    }
}

impl NodeStore for ZkStore {
    fn exists(&self, path: &str) -> Result<bool> {
        self.zk
            .exists(path, false)
            .map(|stat| stat.is_some())
            .map_err(|e| from_zk("exists", path, e))
    }

    fn children(&self, path: &str) -> Result<Vec<String>> {
        let mut names = self
            .zk
            .get_children(path, false)
            .map_err(|e| from_zk("children", path, e))?;
        names.sort();
        Ok(names)
    }

    fn get(&self, path: &str) -> Result<Vec<u8>> {
        self.zk
            .get_data(path, false)
            .map(|(data, _stat)| data)
            .map_err(|e| from_zk("get", path, e))
    }

    fn create(&self, path: &str, value: &[u8]) -> Result<()> {
        self.zk
            .create(
                path,
                value.to_vec(),
                Acl::open_unsafe().clone(),
                CreateMode::Persistent,
            )
            .map(|_| ())
            .map_err(|e| from_zk("create", path, e))
    }

    fn ensure_path(&self, path: &str) -> Result<()> {
        self.zk
            .ensure_path(path)
            .map_err(|e| from_zk("ensure_path", path, e))
    }

    fn set(&self, path: &str, value: &[u8]) -> Result<()> {
        self.zk
            .set_data(path, value.to_vec(), None)
            .map(|_| ())
            .map_err(|e| from_zk("set", path, e))
    }

    fn delete_recursive(&self, path: &str) -> Result<()> {
        self.zk
            .delete_recursive(path)
            .map_err(|e| from_zk("delete_recursive", path, e))
    }

    fn close(&self) -> Result<()> {
        self.zk.close().map_err(|e| from_zk("close", "/", e))
    }
}

/// Opens a fresh `ZkStore` per session
#[derive(Debug, Clone, Copy, Default)]
pub struct ZkConnector;

impl Connector for ZkConnector {
    fn connect(&self, config: &StoreConfig) -> Result<Box<dyn NodeStore>> {
        Ok(Box::new(ZkStore::connect(config)?))
    }
}
