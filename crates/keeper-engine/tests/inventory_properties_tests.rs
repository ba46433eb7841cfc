// Property tests: add/show round trip, repeated add and cascade deletion
// over generated hosts, groups and variable maps.

use keeper_core::errors::KeeperError;
use keeper_core::{NodeTarget, StoreConfig, VarMap};
use keeper_engine::{
    apply_inventory_command, apply_inventory_query, InventoryCommand, InventoryQuery,
    MarkerPolicy, QueryResult,
};
use keeper_store::{MemoryStore, StoreClient};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}".prop_filter("hosts is a keyword", |s| s != "hosts")
}

fn varmap() -> impl Strategy<Value = VarMap> {
    prop::collection::btree_map(name(), "[A-Za-z0-9.:/-]{0,16}", 1..6)
}

fn assignment(group: &str, host: &str, vars: &VarMap) -> String {
    let mut token = format!("{}:{}", group, host);
    for (key, value) in vars {
        token.push_str(&format!(",{}:{}", key, value));
    }
    token
}

fn add(
    client: &StoreClient<MemoryStore>,
    group: &str,
    host: &str,
    vars: &VarMap,
) -> keeper_core::Result<()> {
    let parsed = assignment(group, host, vars).parse().unwrap();
    apply_inventory_command(InventoryCommand::AddHostWithVariables(parsed), client).map(|_| ())
}

fn show_host(client: &StoreClient<MemoryStore>, host: &str) -> keeper_core::Result<VarMap> {
    let target = NodeTarget::Host {
        host: host.to_string(),
    };
    match apply_inventory_query(InventoryQuery::ShowVariables(target), client)? {
        QueryResult::HostVars(vars) => Ok(vars),
        other => panic!("unexpected query result: {:?}", other),
    }
}

fn setup() -> (MemoryStore, StoreClient<MemoryStore>) {
    let store = MemoryStore::new();
    let client = StoreClient::new(StoreConfig::default(), store.clone());
    (store, client)
}

proptest! {
    #[test]
    fn add_then_show_host_returns_exact_varmap(
        group in name(),
        host in name(),
        vars in varmap(),
    ) {
        let (store, client) = setup();
        add(&client, &group, &host, &vars).unwrap();

        prop_assert_eq!(show_host(&client, &host).unwrap(), vars);
        prop_assert_eq!(store.open_sessions(), 0);
    }

    #[test]
    fn second_add_fails_and_keeps_first_varmap(
        group in name(),
        other_group in name(),
        host in name(),
        first in varmap(),
        second in varmap(),
    ) {
        let (_store, client) = setup();
        add(&client, &group, &host, &first).unwrap();

        let err = add(&client, &other_group, &host, &second).unwrap_err();
        prop_assert!(
            matches!(err, KeeperError::HostAlreadyExists { .. }),
            "unexpected error: {:?}",
            err
        );
        prop_assert_eq!(show_host(&client, &host).unwrap(), first);
    }

    #[test]
    fn delete_host_removes_node_and_every_variable(
        group in name(),
        host in name(),
        vars in varmap(),
    ) {
        let (store, client) = setup();
        add(&client, &group, &host, &vars).unwrap();

        apply_inventory_command(
            InventoryCommand::DeleteRecursive {
                target: NodeTarget::Host { host: host.clone() },
                policy: MarkerPolicy::default(),
            },
            &client,
        )
        .unwrap();

        let session = client.open_read_only().unwrap();
        let host_path = client.layout().host_path(&host);
        prop_assert!(!session.exists(&host_path).unwrap());
        drop(session);

        let prefix = format!("{}/", host_path);
        prop_assert!(store
            .paths()
            .iter()
            .all(|path| path != &host_path && !path.starts_with(&prefix)));
    }
}
