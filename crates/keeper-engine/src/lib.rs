//! Keeper Engine - inventory operations
//!
//! Provides the mutation engine (`apply_inventory_command`) and the query
//! engine (`apply_inventory_query`) over a `keeper_store::StoreClient`.

pub mod commands;
pub mod membership;

pub use commands::engine_command::{apply_inventory_command, CommandOutcome, InventoryCommand};
pub use commands::engine_query::{apply_inventory_query, InventoryQuery, QueryResult};
pub use commands::mutation::{Deletion, MarkerPolicy, Renamed, UpdateOutcome, UpdateStatus};
pub use commands::views::{AnsibleGroup, AnsibleInventory, AnsibleMeta, DumpMode, InventoryDump};
pub use membership::MembershipIndex;
