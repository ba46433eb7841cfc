//! Plain inventory value types shared by the resolver and the engine.
//!
//! Maps are `BTreeMap` throughout so every rendering of the inventory is
//! sorted and stable across runs.

use std::collections::BTreeMap;

/// Host variables: variable name -> value
pub type VarMap = BTreeMap<String, String>;

/// Variables for several hosts: host name -> variables
pub type HostVarMap = BTreeMap<String, VarMap>;

/// `{group: {host: {var: value}}}` as produced from an assignment token
pub type NestedAssignment = BTreeMap<String, HostVarMap>;
