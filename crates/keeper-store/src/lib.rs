//! Keeper Store - node access for the inventory tree
//!
//! Provides:
//! - `NodeStore`, the primitive node operations the inventory needs
//! - ZooKeeper backend and an in-process backend for tests
//! - Scoped sessions that close their connection on every exit path

pub mod errors;
pub mod memory;
pub mod node;
pub mod session;
pub mod zk;

// Re-export key types
pub use errors::Result;
pub use memory::MemoryStore;
pub use node::NodeStore;
pub use session::{AccessMode, Connector, Session, StoreClient};
pub use zk::{ZkConnector, ZkStore};
