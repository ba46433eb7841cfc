// Every engine op is bracketed by start/end log events with stable error codes.

use keeper_core::keeper_core_types::schema::{EVENT_END, EVENT_START};
use keeper_core::logging_facility::test_capture::init_test_capture;
use keeper_core::{NodeTarget, StoreConfig};
use keeper_engine::{
    apply_inventory_command, apply_inventory_query, InventoryCommand, InventoryQuery,
};
use keeper_store::{MemoryStore, StoreClient};

fn setup() -> (MemoryStore, StoreClient<MemoryStore>) {
    let store = MemoryStore::new();
    let client = StoreClient::new(StoreConfig::default(), store.clone());
    (store, client)
}

#[test]
fn test_command_emits_start_and_end() {
    let capture = init_test_capture();
    let (_store, client) = setup();

    apply_inventory_command(
        InventoryCommand::AddHostWithVariables("web:log01,fqdn:l1".parse().unwrap()),
        &client,
    )
    .unwrap();

    capture.assert_event_exists("add_host", EVENT_START);
    capture.assert_event_exists("add_host", EVENT_END);
}

#[test]
fn test_failed_query_records_error_code() {
    let capture = init_test_capture();
    let (_store, client) = setup();

    let _ = apply_inventory_query(
        InventoryQuery::ShowVariables(NodeTarget::parse("hosts:absent").unwrap()),
        &client,
    );

    capture.assert_error_code("show_variables", "ERR_NOT_FOUND");
}

#[test]
fn test_connectivity_failure_records_error_code() {
    let capture = init_test_capture();
    let (store, client) = setup();
    store.set_offline(true);

    let _ = apply_inventory_query(InventoryQuery::AnsibleList, &client);

    capture.assert_error_code("ansible_list", "ERR_CONNECTIVITY");
}
