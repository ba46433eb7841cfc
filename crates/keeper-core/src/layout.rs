//! Tree layout of the inventory inside the coordination store.
//!
//! ```text
//! <base>/hosts/<host>/<variable>     value = variable value
//! <base>/groups/<group>/<host>       empty membership marker
//! ```

/// Name of the host namespace under the base path
pub const HOSTS_NODE: &str = "hosts";
/// Name of the group namespace under the base path
pub const GROUPS_NODE: &str = "groups";

/// Maps inventory names to absolute store paths under a base prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLayout {
    /// Base prefix without trailing slash; empty when rooted at `/`
    prefix: String,
}

impl InventoryLayout {
    /// Create a layout rooted at `base` (e.g. `/ansible-test`)
    pub fn new(base: &str) -> Self {
        Self {
            prefix: base.trim_end_matches('/').to_string(),
        }
    }

    /// The base path this layout is rooted at
    pub fn base(&self) -> &str {
        if self.prefix.is_empty() {
            "/"
        } else {
            &self.prefix
        }
    }

    pub fn hosts_root(&self) -> String {
        format!("{}/{}", self.prefix, HOSTS_NODE)
    }

    pub fn groups_root(&self) -> String {
        format!("{}/{}", self.prefix, GROUPS_NODE)
    }

    /// Canonical host node
    pub fn host_path(&self, host: &str) -> String {
        format!("{}/{}", self.hosts_root(), host)
    }

    pub fn group_path(&self, group: &str) -> String {
        format!("{}/{}", self.groups_root(), group)
    }

    /// Membership marker of `host` inside `group`
    pub fn marker_path(&self, group: &str, host: &str) -> String {
        format!("{}/{}", self.group_path(group), host)
    }

    pub fn variable_path(&self, host: &str, variable: &str) -> String {
        format!("{}/{}", self.host_path(host), variable)
    }
}
