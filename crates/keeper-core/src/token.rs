//! Command token parsing and path resolution
//!
//! Tokens are the compact strings passed on the command line:
//!
//! | token                       | meaning                               |
//! |-----------------------------|---------------------------------------|
//! | `hosts:web01`               | the host `web01`, no group context    |
//! | `web:web01`                 | host `web01` as a member of `web`     |
//! | `web`                       | the group `web`                       |
//! | `hosts:old:new`             | rename host `old` to `new`            |
//! | `web:web01,fqdn:w1,ip:1.2.3.4` | host `web01` in `web` with variables |
//!
//! Parsing is purely syntactic and never touches the store.

use std::fmt;
use std::str::FromStr;

use crate::errors::{KeeperError, Result};
use crate::layout::{InventoryLayout, GROUPS_NODE, HOSTS_NODE};
use crate::model::{HostVarMap, NestedAssignment, VarMap};

const TARGET_SHAPE: &str = "<groupname:hostname>, <groupname> or <hosts:hostname>";
const RENAME_SHAPE: &str = "<hosts:oldname:newname> or <groups:oldname:newname>";
const ASSIGNMENT_SHAPE: &str = "<groupname:hostname[,var1:value1,var2:value2...]>";

/// Key the Ansible `--list` document reserves next to the group names
const RESERVED_GROUP: &str = "_meta";

fn check_name<'a>(token: &str, name: &'a str, expected: &str) -> Result<&'a str> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(KeeperError::syntax(token, expected));
    }
    Ok(name)
}

fn check_group<'a>(token: &str, name: &'a str, expected: &str) -> Result<&'a str> {
    if name == RESERVED_GROUP {
        return Err(KeeperError::syntax(token, expected));
    }
    check_name(token, name, expected)
}

/// One resolved tree location: `(name, path[, marker_path])`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNode {
    pub name: String,
    pub path: String,
    /// Membership marker path, set for a host resolved in a group context
    pub marker_path: Option<String>,
}

impl ResolvedNode {
    fn new(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            path,
            marker_path: None,
        }
    }
}

/// Reference to a host, a group, or a host inside a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTarget {
    /// `hosts:<host>`
    Host { host: String },
    /// `<group>`
    Group { group: String },
    /// `<group>:<host>`
    Member { group: String, host: String },
}

impl NodeTarget {
    /// Parse a target token
    ///
    /// # Errors
    ///
    /// Returns `KeeperError::Syntax` for empty names, names containing `/`,
    /// the reserved group name `_meta`, or tokens with more than one `:`.
    pub fn parse(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.split(':').collect();
        match parts.as_slice() {
            [group] => Ok(NodeTarget::Group {
                group: check_group(token, group, TARGET_SHAPE)?.to_string(),
            }),
            [HOSTS_NODE, host] => Ok(NodeTarget::Host {
                host: check_name(token, host, TARGET_SHAPE)?.to_string(),
            }),
            [group, host] => Ok(NodeTarget::Member {
                group: check_group(token, group, TARGET_SHAPE)?.to_string(),
                host: check_name(token, host, TARGET_SHAPE)?.to_string(),
            }),
            _ => Err(KeeperError::syntax(token, TARGET_SHAPE)),
        }
    }

    /// Resolve to the ordered list of tree locations the target denotes
    ///
    /// Group-and-host targets yield the group first, then the host with its
    /// membership marker path.
    pub fn resolve(&self, layout: &InventoryLayout) -> Vec<ResolvedNode> {
        match self {
            NodeTarget::Host { host } => vec![ResolvedNode::new(host, layout.host_path(host))],
            NodeTarget::Group { group } => {
                vec![ResolvedNode::new(group, layout.group_path(group))]
            }
            NodeTarget::Member { group, host } => vec![
                ResolvedNode::new(group, layout.group_path(group)),
                ResolvedNode {
                    name: host.clone(),
                    path: layout.host_path(host),
                    marker_path: Some(layout.marker_path(group, host)),
                },
            ],
        }
    }
}

impl FromStr for NodeTarget {
    type Err = KeeperError;

    fn from_str(s: &str) -> Result<Self> {
        NodeTarget::parse(s)
    }
}

impl fmt::Display for NodeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTarget::Host { host } => write!(f, "{}:{}", HOSTS_NODE, host),
            NodeTarget::Group { group } => write!(f, "{}", group),
            NodeTarget::Member { group, host } => write!(f, "{}:{}", group, host),
        }
    }
}

/// Which namespace a rename applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Hosts,
    Groups,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Hosts => HOSTS_NODE,
            Namespace::Groups => GROUPS_NODE,
        }
    }
}

/// `("hosts"|"groups") ":" OLD ":" NEW`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTarget {
    pub namespace: Namespace,
    pub old: String,
    pub new: String,
}

impl RenameTarget {
    /// Parse a rename token
    ///
    /// # Errors
    ///
    /// Returns `KeeperError::Syntax` unless the token has exactly two colons,
    /// a `hosts`/`groups` keyword and two valid names. Group renames may not
    /// use `_meta`.
    pub fn parse(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.split(':').collect();
        let [keyword, old, new] = parts.as_slice() else {
            return Err(KeeperError::syntax(token, RENAME_SHAPE));
        };

        let namespace = match *keyword {
            HOSTS_NODE => Namespace::Hosts,
            GROUPS_NODE => Namespace::Groups,
            _ => return Err(KeeperError::syntax(token, RENAME_SHAPE)),
        };
        let checked = |name: &str| -> Result<String> {
            let name = match namespace {
                Namespace::Hosts => check_name(token, name, RENAME_SHAPE)?,
                Namespace::Groups => check_group(token, name, RENAME_SHAPE)?,
            };
            Ok(name.to_string())
        };

        Ok(Self {
            namespace,
            old: checked(*old)?,
            new: checked(*new)?,
        })
    }

    /// `[(old, oldPath), (new, newPath)]`
    pub fn resolve(&self, layout: &InventoryLayout) -> [ResolvedNode; 2] {
        let path_of = |name: &str| match self.namespace {
            Namespace::Hosts => layout.host_path(name),
            Namespace::Groups => layout.group_path(name),
        };
        [
            ResolvedNode::new(&self.old, path_of(&self.old)),
            ResolvedNode::new(&self.new, path_of(&self.new)),
        ]
    }
}

impl FromStr for RenameTarget {
    type Err = KeeperError;

    fn from_str(s: &str) -> Result<Self> {
        RenameTarget::parse(s)
    }
}

/// `GROUP ":" HOST ("," KEY ":" VALUE)*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAssignment {
    pub group: String,
    pub host: String,
    pub vars: VarMap,
}

impl HostAssignment {
    /// Parse an assignment token
    ///
    /// The value of each item is everything after its first `:`, so values
    /// may themselves contain colons. A repeated key keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns `KeeperError::Syntax` if the head is not `group:host` or a
    /// variable item has no `:` or an invalid name.
    pub fn parse(token: &str) -> Result<Self> {
        let mut items = token.split(',');
        let head = items.next().unwrap_or_default();

        let NodeTarget::Member { group, host } = NodeTarget::parse(head)
            .map_err(|_| KeeperError::syntax(token, ASSIGNMENT_SHAPE))?
        else {
            return Err(KeeperError::syntax(token, ASSIGNMENT_SHAPE));
        };

        let mut vars = VarMap::new();
        for item in items {
            let (key, value) = item
                .split_once(':')
                .ok_or_else(|| KeeperError::syntax(token, ASSIGNMENT_SHAPE))?;
            let key = check_name(token, key, ASSIGNMENT_SHAPE)?;
            vars.insert(key.to_string(), value.to_string());
        }

        Ok(Self { group, host, vars })
    }

    /// `{group: {host: {key: value}}}`
    pub fn to_nested(&self) -> NestedAssignment {
        let mut hosts = HostVarMap::new();
        hosts.insert(self.host.clone(), self.vars.clone());
        let mut nested = NestedAssignment::new();
        nested.insert(self.group.clone(), hosts);
        nested
    }
}

impl FromStr for HostAssignment {
    type Err = KeeperError;

    fn from_str(s: &str) -> Result<Self> {
        HostAssignment::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> InventoryLayout {
        InventoryLayout::new("/ansible-test")
    }

    #[test]
    fn test_host_only_token() {
        let target = NodeTarget::parse("hosts:web01").unwrap();
        assert_eq!(
            target.resolve(&layout()),
            vec![ResolvedNode {
                name: "web01".to_string(),
                path: "/ansible-test/hosts/web01".to_string(),
                marker_path: None,
            }]
        );
    }

    #[test]
    fn test_member_token_yields_group_then_host() {
        let nodes = NodeTarget::parse("web:web01").unwrap().resolve(&layout());
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name, "web");
        assert_eq!(nodes[0].path, "/ansible-test/groups/web");
        assert_eq!(nodes[1].name, "web01");
        assert_eq!(nodes[1].path, "/ansible-test/hosts/web01");
        assert_eq!(
            nodes[1].marker_path.as_deref(),
            Some("/ansible-test/groups/web/web01")
        );
    }

    #[test]
    fn test_bare_token_is_group() {
        assert_eq!(
            NodeTarget::parse("web").unwrap(),
            NodeTarget::Group {
                group: "web".to_string()
            }
        );
    }

    #[test]
    fn test_hosts_keyword_only_matches_as_prefix_segment() {
        assert_eq!(
            NodeTarget::parse("myhosts:web01").unwrap(),
            NodeTarget::Member {
                group: "myhosts".to_string(),
                host: "web01".to_string()
            }
        );
    }

    #[test]
    fn test_target_rejects_bad_shapes() {
        for token in ["", "a:b:c", "web:", ":web01", "hosts:", "web/x", "web:.."] {
            assert!(
                matches!(NodeTarget::parse(token), Err(KeeperError::Syntax { .. })),
                "token {:?} should be rejected",
                token
            );
        }
    }

    #[test]
    fn test_meta_is_not_a_group_name() {
        for token in ["_meta", "_meta:web01"] {
            assert!(
                matches!(NodeTarget::parse(token), Err(KeeperError::Syntax { .. })),
                "token {:?} should be rejected",
                token
            );
        }
        assert!(HostAssignment::parse("_meta:h1,fqdn:x").is_err());
        assert!(matches!(
            RenameTarget::parse("groups:web:_meta"),
            Err(KeeperError::Syntax { .. })
        ));
        // only reserved in the groups namespace
        assert_eq!(
            NodeTarget::parse("hosts:_meta").unwrap(),
            NodeTarget::Host {
                host: "_meta".to_string()
            }
        );
        assert!(RenameTarget::parse("hosts:web01:_meta").is_ok());
    }

    #[test]
    fn test_rename_host_and_group() {
        let rename = RenameTarget::parse("hosts:old01:new01").unwrap();
        assert_eq!(rename.namespace, Namespace::Hosts);
        let [old, new] = rename.resolve(&layout());
        assert_eq!(old.path, "/ansible-test/hosts/old01");
        assert_eq!(new.path, "/ansible-test/hosts/new01");

        let rename = RenameTarget::parse("groups:web:frontend").unwrap();
        assert_eq!(rename.namespace, Namespace::Groups);
        assert_eq!(rename.resolve(&layout())[1].path, "/ansible-test/groups/frontend");
    }

    #[test]
    fn test_rename_syntax_errors_name_token_and_shape() {
        for token in ["hosts:old", "hosts:a:b:c", "racks:a:b", "hosts::b"] {
            match RenameTarget::parse(token) {
                Err(KeeperError::Syntax { token: t, expected }) => {
                    assert_eq!(t, token);
                    assert!(expected.contains("hosts:oldname:newname"));
                }
                other => panic!("expected syntax error for {:?}, got {:?}", token, other),
            }
        }
    }

    #[test]
    fn test_assignment_kafka_example() {
        let parsed =
            HostAssignment::parse("kafka:kafka01,fqdn:kafka01.fqdn.com,ipv4:1.2.3.4,kafka-id:1")
                .unwrap();
        let nested = parsed.to_nested();

        let expected: NestedAssignment = serde_json::from_str(
            r#"{"kafka":{"kafka01":{"fqdn":"kafka01.fqdn.com","ipv4":"1.2.3.4","kafka-id":"1"}}}"#,
        )
        .unwrap();
        assert_eq!(nested, expected);
    }

    #[test]
    fn test_assignment_without_vars_is_empty_map() {
        let parsed = HostAssignment::parse("web:web01").unwrap();
        assert!(parsed.vars.is_empty());
    }

    #[test]
    fn test_assignment_last_duplicate_wins() {
        let parsed = HostAssignment::parse("web:web01,a:1,b:2,a:3").unwrap();
        assert_eq!(parsed.vars.get("a").map(String::as_str), Some("3"));
        assert_eq!(parsed.vars.len(), 2);
    }

    #[test]
    fn test_assignment_value_keeps_colons() {
        let parsed = HostAssignment::parse("web:web01,url:http://w1:8080").unwrap();
        assert_eq!(parsed.vars["url"], "http://w1:8080");
    }

    #[test]
    fn test_assignment_rejects_malformed() {
        for token in ["web", "hosts:web01", "web:web01,novalue", "web:web01,", "web:web01,:v"] {
            assert!(
                matches!(HostAssignment::parse(token), Err(KeeperError::Syntax { .. })),
                "token {:?} should be rejected",
                token
            );
        }
    }
}
