//! Engine-level read-only query surface.
//!
//! `apply_inventory_query` is the single entry point for all reads. Unlike
//! `apply_inventory_command`, it opens a read-only session and never writes.

#![allow(clippy::result_large_err)]

use keeper_core::errors::{KeeperError, Result};
use keeper_core::{log_op_end, log_op_error, log_op_start};
use keeper_core::{HostVarMap, NodeTarget, VarMap};
use keeper_store::{Connector, StoreClient};
use serde::Serialize;

use crate::commands::views::{self, AnsibleInventory, DumpMode, InventoryDump};

/// Read-only queries supported by the engine.
#[derive(Debug, Clone)]
pub enum InventoryQuery {
    /// `{host: {var: value}}` for a group, `{var: value}` for `hosts:<name>`.
    ShowVariables(NodeTarget),
    /// Plain listing of hosts, groups or both.
    Dump(DumpMode),
    /// Ansible `--list` document.
    AnsibleList,
    /// Ansible `--host <name>` document.
    AnsibleHost { host: String },
}

impl InventoryQuery {
    fn op_name(&self) -> &'static str {
        match self {
            InventoryQuery::ShowVariables(_) => "show_variables",
            InventoryQuery::Dump(_) => "dump",
            InventoryQuery::AnsibleList => "ansible_list",
            InventoryQuery::AnsibleHost { .. } => "ansible_host",
        }
    }
}

/// Result of an inventory query; serializes as the bare payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Variables(HostVarMap),
    Names(Vec<String>),
    Inventory(InventoryDump),
    Ansible(AnsibleInventory),
    HostVars(VarMap),
}

impl QueryResult {
    /// Compact JSON rendering
    ///
    /// # Errors
    ///
    /// Returns `KeeperError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Apply a read-only query against the configured store.
pub fn apply_inventory_query<C: Connector>(
    query: InventoryQuery,
    client: &StoreClient<C>,
) -> Result<QueryResult> {
    let op = query.op_name();
    log_op_start!(op);
    let start = std::time::Instant::now();

    let result = (|| -> Result<QueryResult> {
        match &query {
            InventoryQuery::ShowVariables(target @ NodeTarget::Member { .. }) => {
                return Err(KeeperError::syntax(target.to_string(), views::SHOW_SHAPE));
            }
            InventoryQuery::AnsibleHost { host } => {
                NodeTarget::parse(&format!("hosts:{}", host))?;
            }
            _ => {}
        }

        let layout = client.layout();
        let session = client.open_read_only()?;

        match query {
            InventoryQuery::ShowVariables(NodeTarget::Group { group }) => Ok(
                QueryResult::Variables(views::group_variables(&session, layout, &group)?),
            ),
            InventoryQuery::ShowVariables(NodeTarget::Host { host }) => Ok(
                QueryResult::HostVars(views::host_variables(&session, layout, &host)?),
            ),
            InventoryQuery::ShowVariables(target @ NodeTarget::Member { .. }) => {
                Err(KeeperError::syntax(target.to_string(), views::SHOW_SHAPE))
            }
            InventoryQuery::Dump(DumpMode::Hosts) => {
                Ok(QueryResult::Names(views::host_names(&session, layout)?))
            }
            InventoryQuery::Dump(DumpMode::Groups) => {
                Ok(QueryResult::Names(views::group_names(&session, layout)?))
            }
            InventoryQuery::Dump(DumpMode::All) => Ok(QueryResult::Inventory(
                views::inventory_dump(&session, layout)?,
            )),
            InventoryQuery::AnsibleList => Ok(QueryResult::Ansible(views::ansible_inventory(
                &session, layout,
            )?)),
            InventoryQuery::AnsibleHost { host } => Ok(QueryResult::HostVars(
                views::single_host_variables(&session, layout, &host)?,
            )),
        }
    })();

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => log_op_end!(op, duration_ms = elapsed),
        Err(e) => {
            let e_clone = e.clone();
            log_op_error!(op, e_clone, duration_ms = elapsed);
        }
    }
    result
}
