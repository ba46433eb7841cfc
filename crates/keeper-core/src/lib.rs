//! Keeper Core - inventory vocabulary shared by every ansible-keeper crate
//!
//! This crate provides:
//! - The error facility (`ExError`, `ExErrorKind`) and domain errors (`KeeperError`)
//! - The structured logging facility and its `log_op_*` macros
//! - Store connection configuration (`KeeperConfig`)
//! - The inventory tree layout and the command-token resolver
//!
//! Nothing here performs I/O against the coordination store.

pub mod config;
pub mod errors;
pub mod layout;
pub mod logging_facility;
pub mod model;
pub mod token;

#[doc(hidden)]
pub use keeper_core_types;

// Re-export commonly used types
pub use config::{ConfigOverrides, KeeperConfig, ServerAddr, StoreConfig};
pub use errors::{ExError, ExErrorKind, KeeperError, Result};
pub use layout::InventoryLayout;
pub use model::{HostVarMap, VarMap};
pub use token::{HostAssignment, Namespace, NodeTarget, RenameTarget, ResolvedNode};
