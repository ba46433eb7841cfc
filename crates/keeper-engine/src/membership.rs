//! Reverse membership index: host -> groups listing it.
//!
//! Built from one scan of the group namespace and discarded with the
//! invocation. Markers remain the only source of truth.

use std::collections::{BTreeMap, BTreeSet};

use keeper_core::InventoryLayout;
use keeper_store::errors::Result;
use keeper_store::Session;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipIndex {
    by_host: BTreeMap<String, BTreeSet<String>>,
    groups: BTreeMap<String, Vec<String>>,
}

impl MembershipIndex {
    /// Scan `groups/*` and every group's markers
    pub fn build(session: &Session, layout: &InventoryLayout) -> Result<Self> {
        let mut index = Self::default();
        for group in session.children_or_empty(&layout.groups_root())? {
            let members = session.children_or_empty(&layout.group_path(&group))?;
            for host in &members {
                index
                    .by_host
                    .entry(host.clone())
                    .or_default()
                    .insert(group.clone());
            }
            index.groups.insert(group, members);
        }
        Ok(index)
    }

    /// Groups listing `host`, sorted
    pub fn groups_of(&self, host: &str) -> Vec<String> {
        self.by_host
            .get(host)
            .map(|groups| groups.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every group with its sorted member list
    pub fn groups(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.groups.iter()
    }
}
