//! Engine-level mutation commands.
//!
//! `apply_inventory_command` is the single entry point for every write to the
//! inventory tree. Arguments arrive already parsed, so malformed tokens are
//! rejected before any connection is made. Each command opens exactly one
//! read-write session, released when the command returns.

#![allow(clippy::result_large_err)]

use std::fmt;

use keeper_core::errors::{KeeperError, Result};
use keeper_core::{log_op_end, log_op_error, log_op_start};
use keeper_core::{HostAssignment, Namespace, NodeTarget, RenameTarget};
use keeper_store::{Connector, StoreClient};

use crate::commands::mutation::{self, Deletion, MarkerPolicy, Renamed, UpdateOutcome};

/// Mutations supported by the engine.
#[derive(Debug, Clone)]
pub enum InventoryCommand {
    /// Create a host with variables and put it in a group.
    AddHostWithVariables(HostAssignment),
    /// Add an existing host to a group.
    AddHostToGroup { group: String, host: String },
    /// Delete a membership, a group or a host.
    DeleteRecursive {
        target: NodeTarget,
        policy: MarkerPolicy,
    },
    /// Overwrite variables the host already has.
    UpdateHostVariables(HostAssignment),
    /// Rename a host or a group.
    RenameNode(RenameTarget),
}

impl InventoryCommand {
    /// `AddHostToGroup` from a `group:host` target
    ///
    /// # Errors
    ///
    /// Returns `KeeperError::Syntax` for host-only or group-only targets.
    pub fn add_to_group(target: NodeTarget) -> Result<Self> {
        match target {
            NodeTarget::Member { group, host } => {
                Ok(InventoryCommand::AddHostToGroup { group, host })
            }
            other => Err(KeeperError::syntax(other.to_string(), "<groupname:hostname>")),
        }
    }

    fn op_name(&self) -> &'static str {
        match self {
            InventoryCommand::AddHostWithVariables(_) => "add_host",
            InventoryCommand::AddHostToGroup { .. } => "add_host_to_group",
            InventoryCommand::DeleteRecursive { .. } => "delete_recursive",
            InventoryCommand::UpdateHostVariables(_) => "update_host",
            InventoryCommand::RenameNode(_) => "rename",
        }
    }
}

/// Status of an applied command; `Display` renders the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Added { group: String, host: String },
    Deleted(Deletion),
    Updated(UpdateOutcome),
    Renamed(Renamed),
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Added { group, host } => {
                write!(f, "ADDED ==> host: {} to group: {}", host, group)
            }
            CommandOutcome::Deleted(Deletion::Member {
                group,
                host,
                group_removed,
            }) => {
                write!(f, "DELETED ==> host: {} in group: {}", host, group)?;
                if *group_removed {
                    write!(f, " (last member, group removed)")?;
                }
                Ok(())
            }
            CommandOutcome::Deleted(Deletion::Group { group }) => {
                write!(f, "DELETED ==> group: {}", group)
            }
            CommandOutcome::Deleted(Deletion::Host {
                host,
                purged_groups,
            }) => {
                write!(f, "DELETED ==> host: {}", host)?;
                if !purged_groups.is_empty() {
                    write!(f, " (removed from groups: {})", purged_groups.join(", "))?;
                }
                Ok(())
            }
            CommandOutcome::Updated(outcome) => write!(f, "{}", outcome),
            CommandOutcome::Renamed(renamed) => {
                let kind = match renamed.namespace {
                    Namespace::Hosts => "host",
                    Namespace::Groups => "group",
                };
                write!(
                    f,
                    "RENAMED ==> {}: {} to: {}",
                    kind, renamed.old, renamed.new
                )
            }
        }
    }
}

/// Apply a mutation against the configured store.
pub fn apply_inventory_command<C: Connector>(
    cmd: InventoryCommand,
    client: &StoreClient<C>,
) -> Result<CommandOutcome> {
    let op = cmd.op_name();
    log_op_start!(op);
    let start = std::time::Instant::now();

    let result = (|| -> Result<CommandOutcome> {
        let layout = client.layout();
        let session = client.open_read_write()?;

        match cmd {
            InventoryCommand::AddHostWithVariables(assignment) => {
                mutation::add_host_with_variables(&session, layout, &assignment)?;
                Ok(CommandOutcome::Added {
                    group: assignment.group,
                    host: assignment.host,
                })
            }
            InventoryCommand::AddHostToGroup { group, host } => {
                mutation::add_host_to_group(&session, layout, &group, &host)?;
                Ok(CommandOutcome::Added { group, host })
            }
            InventoryCommand::DeleteRecursive { target, policy } => {
                mutation::delete_recursive(&session, layout, &target, policy)
                    .map(CommandOutcome::Deleted)
            }
            InventoryCommand::UpdateHostVariables(assignment) => {
                mutation::update_host_variables(&session, layout, &assignment)
                    .map(CommandOutcome::Updated)
            }
            InventoryCommand::RenameNode(target) => {
                mutation::rename_node(&session, layout, &target).map(CommandOutcome::Renamed)
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_group_requires_member_target() {
        let cmd = InventoryCommand::add_to_group(NodeTarget::parse("web:web01").unwrap());
        assert!(matches!(
            cmd,
            Ok(InventoryCommand::AddHostToGroup { ref group, ref host })
                if group == "web" && host == "web01"
        ));

        let err = InventoryCommand::add_to_group(NodeTarget::parse("hosts:web01").unwrap())
            .unwrap_err();
        assert!(matches!(err, KeeperError::Syntax { .. }));
    }

    #[test]
    fn test_status_lines() {
        let added = CommandOutcome::Added {
            group: "web".to_string(),
            host: "web01".to_string(),
        };
        assert_eq!(added.to_string(), "ADDED ==> host: web01 to group: web");

        let deleted = CommandOutcome::Deleted(Deletion::Group {
            group: "web".to_string(),
        });
        assert_eq!(deleted.to_string(), "DELETED ==> group: web");

        let renamed = CommandOutcome::Renamed(Renamed {
            namespace: Namespace::Hosts,
            old: "a".to_string(),
            new: "b".to_string(),
            moved: vec![],
        });
        assert_eq!(renamed.to_string(), "RENAMED ==> host: a to: b");
    }
}
