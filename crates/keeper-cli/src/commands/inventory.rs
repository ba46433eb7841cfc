//! Ansible dynamic-inventory documents (`--list`, `--host`)

use keeper_engine::{apply_inventory_query, InventoryQuery};

use super::GlobalArgs;

pub fn execute_list(global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = global.client()?;
    let result = apply_inventory_query(InventoryQuery::AnsibleList, &client)?;
    println!("{}", result.to_json()?);
    Ok(())
}

pub fn execute_host(host: String, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = global.client()?;
    let result = apply_inventory_query(InventoryQuery::AnsibleHost { host }, &client)?;
    println!("{}", result.to_json()?);
    Ok(())
}
