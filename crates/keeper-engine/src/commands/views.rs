//! Read-side payloads and the handlers that build them.
//!
//! All maps are `BTreeMap`, so serialized output is sorted and stable.

use std::collections::BTreeMap;
use std::str::FromStr;

use keeper_core::errors::{KeeperError, Result};
use keeper_core::{HostVarMap, InventoryLayout, VarMap};
use keeper_store::errors::Result as StoreResult;
use keeper_store::Session;
use serde::Serialize;

use crate::commands::mutation::read_host_vars;
use crate::membership::MembershipIndex;

pub(crate) const SHOW_SHAPE: &str = "<groupname> or <hosts:hostname>";

/// Which namespaces a plain dump lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpMode {
    Hosts,
    Groups,
    #[default]
    All,
}

impl FromStr for DumpMode {
    type Err = KeeperError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hosts" => Ok(DumpMode::Hosts),
            "groups" => Ok(DumpMode::Groups),
            "all" => Ok(DumpMode::All),
            _ => Err(KeeperError::syntax(s, "hosts, groups or all")),
        }
    }
}

/// `{"hosts": [...], "groups": [{"<group>": [members]}, ...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryDump {
    pub hosts: Vec<String>,
    pub groups: Vec<BTreeMap<String, Vec<String>>>,
}

/// One group in Ansible inventory-script output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnsibleGroup {
    pub hosts: Vec<String>,
    pub vars: VarMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnsibleMeta {
    pub hostvars: HostVarMap,
}

/// Ansible `--list` document: groups at top level plus `_meta.hostvars`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnsibleInventory {
    #[serde(flatten)]
    pub groups: BTreeMap<String, AnsibleGroup>,
    #[serde(rename = "_meta")]
    pub meta: AnsibleMeta,
}

/// `{host: {var: value}}` for every member of a group
pub(crate) fn group_variables(
    session: &Session,
    layout: &InventoryLayout,
    group: &str,
) -> Result<HostVarMap> {
    let group_path = layout.group_path(group);
    if !session.exists(&group_path)? {
        return Err(KeeperError::GroupNotFound {
            group: group.to_string(),
        });
    }
    let mut result = HostVarMap::new();
    for host in session.children(&group_path)? {
        let vars = read_host_vars(session, layout, &host)?;
        result.insert(host, vars);
    }
    Ok(result)
}

/// `{var: value}` of one defined host
pub(crate) fn host_variables(
    session: &Session,
    layout: &InventoryLayout,
    host: &str,
) -> Result<VarMap> {
    if !session.exists(&layout.host_path(host))? {
        return Err(KeeperError::HostNotFound {
            host: host.to_string(),
        });
    }
    Ok(read_host_vars(session, layout, host)?)
}

pub(crate) fn host_names(session: &Session, layout: &InventoryLayout) -> StoreResult<Vec<String>> {
    session.children_or_empty(&layout.hosts_root())
}

pub(crate) fn group_names(session: &Session, layout: &InventoryLayout) -> StoreResult<Vec<String>> {
    session.children_or_empty(&layout.groups_root())
}

pub(crate) fn inventory_dump(
    session: &Session,
    layout: &InventoryLayout,
) -> StoreResult<InventoryDump> {
    let hosts = host_names(session, layout)?;
    let index = MembershipIndex::build(session, layout)?;
    let groups = index
        .groups()
        .map(|(group, members)| BTreeMap::from([(group.clone(), members.clone())]))
        .collect();
    Ok(InventoryDump { hosts, groups })
}

pub(crate) fn ansible_inventory(
    session: &Session,
    layout: &InventoryLayout,
) -> StoreResult<AnsibleInventory> {
    let index = MembershipIndex::build(session, layout)?;
    let groups = index
        .groups()
        .map(|(group, members)| {
            (
                group.clone(),
                AnsibleGroup {
                    hosts: members.clone(),
                    vars: VarMap::new(),
                },
            )
        })
        .collect();

    let mut hostvars = HostVarMap::new();
    for host in host_names(session, layout)? {
        let vars = read_host_vars(session, layout, &host)?;
        hostvars.insert(host, vars);
    }

    Ok(AnsibleInventory {
        groups,
        meta: AnsibleMeta { hostvars },
    })
}

/// Variables of one host; `{}` when the host is not defined
pub(crate) fn single_host_variables(
    session: &Session,
    layout: &InventoryLayout,
    host: &str,
) -> StoreResult<VarMap> {
    read_host_vars(session, layout, host)
}
