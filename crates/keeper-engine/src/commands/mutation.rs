//! Mutation handlers for the inventory tree.
//!
//! Every handler runs inside one read-write session opened by the caller.
//! Existence checks happen before the first write. Writes are recorded as
//! steps so a failure after the first write reports exactly what took effect.

use std::fmt;

use keeper_core::errors::{KeeperError, Result};
use keeper_core::{HostAssignment, InventoryLayout, Namespace, NodeTarget, RenameTarget, VarMap};
use keeper_store::errors::Result as StoreResult;
use keeper_store::Session;

use crate::membership::MembershipIndex;

/// What host deletion does with the host's membership markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerPolicy {
    /// Remove the host's marker from every group that lists it
    #[default]
    Purge,
    /// Leave markers in place (they then point at a missing host)
    Retain,
}

/// Classification of an update request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    AllUpdated,
    SomeUpdated,
    NoneUpdated,
}

/// Result of `update`: which submitted variables were written, which skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub host: String,
    pub status: UpdateStatus,
    pub updated: VarMap,
    /// Submitted variables the host did not already have
    pub skipped: Vec<String>,
}

impl UpdateOutcome {
    fn new(host: &str, updated: VarMap, skipped: Vec<String>) -> Self {
        let status = match (updated.is_empty(), skipped.is_empty()) {
            (_, true) => UpdateStatus::AllUpdated,
            (false, false) => UpdateStatus::SomeUpdated,
            (true, false) => UpdateStatus::NoneUpdated,
        };
        Self {
            host: host.to_string(),
            status,
            updated,
            skipped,
        }
    }
}

fn fmt_vars(vars: &VarMap) -> String {
    let items: Vec<String> = vars.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
    format!("{{{}}}", items.join(", "))
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let skipped = format!("[{}]", self.skipped.join(", "));
        match self.status {
            UpdateStatus::AllUpdated => write!(
                f,
                "UPDATED ==> host: {} with new hostvars {}",
                self.host,
                fmt_vars(&self.updated)
            ),
            UpdateStatus::SomeUpdated => write!(
                f,
                "UPDATED ==> host: {} with new hostvars {} ==> NOT UPDATED hostvars {} which do not exist",
                self.host,
                fmt_vars(&self.updated),
                skipped
            ),
            UpdateStatus::NoneUpdated => write!(
                f,
                "NOT UPDATED ==> host: {} has none of hostvars {}",
                self.host, skipped
            ),
        }
    }
}

/// Ordered record of the writes a multi-step mutation has completed
pub(crate) struct Steps {
    op: &'static str,
    entity: String,
    completed: Vec<String>,
}

impl Steps {
    pub(crate) fn new(op: &'static str, entity: impl Into<String>) -> Self {
        Self {
            op,
            entity: entity.into(),
            completed: Vec::new(),
        }
    }

    /// Perform one write; failure after an earlier write is a partial application
    pub(crate) fn run<T>(
        &mut self,
        label: impl Into<String>,
        write: impl FnOnce() -> StoreResult<T>,
    ) -> Result<T> {
        match write() {
            Ok(value) => {
                self.completed.push(label.into());
                Ok(value)
            }
            Err(source) if self.completed.is_empty() => Err(KeeperError::Store(source)),
            Err(source) => Err(KeeperError::PartialApplication {
                op: self.op.to_string(),
                entity: self.entity.clone(),
                completed: self.completed.clone(),
                source,
            }),
        }
    }

    pub(crate) fn completed(&self) -> &[String] {
        &self.completed
    }
}

/// Read every variable of `host`; a missing host yields an empty map
pub(crate) fn read_host_vars(
    session: &Session,
    layout: &InventoryLayout,
    host: &str,
) -> StoreResult<VarMap> {
    let mut vars = VarMap::new();
    for name in session.children_or_empty(&layout.host_path(host))? {
        let value = session.get_string(&layout.variable_path(host, &name))?;
        vars.insert(name, value);
    }
    Ok(vars)
}

pub(crate) fn add_host_with_variables(
    session: &Session,
    layout: &InventoryLayout,
    assignment: &HostAssignment,
) -> Result<()> {
    let HostAssignment { group, host, vars } = assignment;
    let host_path = layout.host_path(host);
    let marker_path = layout.marker_path(group, host);

    if session.exists(&host_path)? {
        return Err(KeeperError::HostAlreadyExists { host: host.clone() });
    }
    if session.exists(&marker_path)? {
        return Err(KeeperError::AlreadyInGroup {
            host: host.clone(),
            group: group.clone(),
        });
    }

    let mut steps = Steps::new("add_host", host.as_str());
    steps.run(format!("host {}", host), || session.ensure_path(&host_path))?;
    steps.run(format!("marker {}/{}", group, host), || {
        session.ensure_path(&marker_path)
    })?;
    // VarMap iterates sorted by name
    for (name, value) in vars {
        steps.run(format!("var {}", name), || {
            session.create(&layout.variable_path(host, name), value.as_bytes())
        })?;
    }
    Ok(())
}

pub(crate) fn add_host_to_group(
    session: &Session,
    layout: &InventoryLayout,
    group: &str,
    host: &str,
) -> Result<()> {
    let marker_path = layout.marker_path(group, host);
    if session.exists(&marker_path)? {
        return Err(KeeperError::AlreadyInGroup {
            host: host.to_string(),
            group: group.to_string(),
        });
    }
    if !session.exists(&layout.host_path(host))? {
        return Err(KeeperError::HostNotFound {
            host: host.to_string(),
        });
    }
    session.ensure_path(&marker_path)?;
    Ok(())
}

/// Effect of a delete, for the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    /// Marker removed; `group_removed` when the host was the last member
    Member {
        group: String,
        host: String,
        group_removed: bool,
    },
    Group {
        group: String,
    },
    /// Host subtree removed, plus markers in `purged_groups`
    Host {
        host: String,
        purged_groups: Vec<String>,
    },
}

pub(crate) fn delete_recursive(
    session: &Session,
    layout: &InventoryLayout,
    target: &NodeTarget,
    policy: MarkerPolicy,
) -> Result<Deletion> {
    match target {
        NodeTarget::Member { group, host } => {
            if !session.exists(&layout.host_path(host))? {
                return Err(KeeperError::HostNotFound { host: host.clone() });
            }
            let marker_path = layout.marker_path(group, host);
            if !session.exists(&marker_path)? {
                return Err(KeeperError::NotInGroup {
                    host: host.clone(),
                    group: group.clone(),
                });
            }

            let group_path = layout.group_path(group);
            let group_removed = session.children(&group_path)?.len() == 1;
            if group_removed {
                session.delete_recursive(&group_path)?;
            } else {
                session.delete_recursive(&marker_path)?;
            }
            Ok(Deletion::Member {
                group: group.clone(),
                host: host.clone(),
                group_removed,
            })
        }
        NodeTarget::Group { group } => {
            let group_path = layout.group_path(group);
            if !session.exists(&group_path)? {
                return Err(KeeperError::GroupNotFound {
                    group: group.clone(),
                });
            }
            session.delete_recursive(&group_path)?;
            Ok(Deletion::Group {
                group: group.clone(),
            })
        }
        NodeTarget::Host { host } => {
            let host_path = layout.host_path(host);
            if !session.exists(&host_path)? {
                return Err(KeeperError::HostNotFound { host: host.clone() });
            }

            let purged_groups = match policy {
                MarkerPolicy::Purge => MembershipIndex::build(session, layout)?.groups_of(host),
                MarkerPolicy::Retain => Vec::new(),
            };

            // markers first, so a retry after a failure still finds the host
            let mut steps = Steps::new("delete_host", host.as_str());
            for group in &purged_groups {
                steps.run(format!("marker {}/{}", group, host), || {
                    session.delete_recursive(&layout.marker_path(group, host))
                })?;
            }
            steps.run(format!("host {}", host), || {
                session.delete_recursive(&host_path)
            })?;

            Ok(Deletion::Host {
                host: host.clone(),
                purged_groups,
            })
        }
    }
}

pub(crate) fn update_host_variables(
    session: &Session,
    layout: &InventoryLayout,
    assignment: &HostAssignment,
) -> Result<UpdateOutcome> {
    let host = assignment.host.as_str();
    let host_path = layout.host_path(host);
    if !session.exists(&host_path)? {
        return Err(KeeperError::HostNotFound {
            host: host.to_string(),
        });
    }

    let existing = session.children(&host_path)?;
    for name in &existing {
        if !session.exists(&layout.variable_path(host, name))? {
            return Err(KeeperError::VariableNotFound {
                host: host.to_string(),
                variable: name.clone(),
            });
        }
    }

    let mut steps = Steps::new("update_host", host);
    let mut updated = VarMap::new();
    let mut skipped = Vec::new();
    for (name, value) in &assignment.vars {
        if existing.contains(name) {
            steps.run(format!("var {}", name), || {
                session.set(&layout.variable_path(host, name), value.as_bytes())
            })?;
            updated.insert(name.clone(), value.clone());
        } else {
            skipped.push(name.clone());
        }
    }

    Ok(UpdateOutcome::new(host, updated, skipped))
}

/// Effect of a rename, for the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub namespace: Namespace,
    pub old: String,
    pub new: String,
    /// Groups whose markers were moved (host rename) or re-created members (group rename)
    pub moved: Vec<String>,
}

pub(crate) fn rename_node(
    session: &Session,
    layout: &InventoryLayout,
    target: &RenameTarget,
) -> Result<Renamed> {
    let [old, new] = target.resolve(layout);
    if !session.exists(&old.path)? {
        return Err(KeeperError::SourceNotFound { name: old.name });
    }
    if session.exists(&new.path)? {
        return Err(KeeperError::TargetExists { name: new.name });
    }

    let mut steps = Steps::new("rename", old.name.as_str());
    let moved = match target.namespace {
        Namespace::Hosts => {
            let vars = read_host_vars(session, layout, &old.name)?;
            let groups = MembershipIndex::build(session, layout)?.groups_of(&old.name);

            steps.run(format!("host {}", new.name), || session.ensure_path(&new.path))?;
            for (name, value) in &vars {
                steps.run(format!("var {}", name), || {
                    session.create(&layout.variable_path(&new.name, name), value.as_bytes())
                })?;
            }
            for group in &groups {
                steps.run(format!("marker {}/{}", group, new.name), || {
                    session.ensure_path(&layout.marker_path(group, &new.name))
                })?;
                steps.run(format!("unmark {}/{}", group, old.name), || {
                    session.delete_recursive(&layout.marker_path(group, &old.name))
                })?;
            }
            groups
        }
        Namespace::Groups => {
            let members = session.children(&old.path)?;

            steps.run(format!("group {}", new.name), || session.ensure_path(&new.path))?;
            for member in &members {
                steps.run(format!("marker {}/{}", new.name, member), || {
                    session.create(&layout.marker_path(&new.name, member), b"")
                })?;
            }
            members
        }
    };
    steps.run(format!("delete {}", old.name), || {
        session.delete_recursive(&old.path)
    })?;

    tracing::debug!(
        component = module_path!(),
        steps = steps.completed().len(),
        "rename applied"
    );

    Ok(Renamed {
        namespace: target.namespace,
        old: old.name,
        new: new.name,
        moved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_status_classification() {
        let mut vars = VarMap::new();
        vars.insert("a".to_string(), "1".to_string());

        assert_eq!(
            UpdateOutcome::new("h", vars.clone(), vec![]).status,
            UpdateStatus::AllUpdated
        );
        assert_eq!(
            UpdateOutcome::new("h", vars, vec!["b".to_string()]).status,
            UpdateStatus::SomeUpdated
        );
        assert_eq!(
            UpdateOutcome::new("h", VarMap::new(), vec!["b".to_string()]).status,
            UpdateStatus::NoneUpdated
        );
    }

    #[test]
    fn test_update_status_line() {
        let mut vars = VarMap::new();
        vars.insert("fqdn".to_string(), "w1.example.com".to_string());
        let outcome = UpdateOutcome::new("web01", vars, vec!["rack".to_string()]);
        assert_eq!(
            outcome.to_string(),
            "UPDATED ==> host: web01 with new hostvars {fqdn: w1.example.com} ==> NOT UPDATED hostvars [rack] which do not exist"
        );
    }
}
