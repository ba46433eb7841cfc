//! Show host variables as JSON

use clap::Args;
use keeper_core::NodeTarget;
use keeper_engine::{apply_inventory_query, InventoryQuery};

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// groupname or hosts:hostname
    pub token: String,
}

pub fn execute(args: ShowArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let target = NodeTarget::parse(&args.token)?;
    let client = global.client()?;

    let result = apply_inventory_query(InventoryQuery::ShowVariables(target), &client)?;
    println!("{}", result.to_json()?);
    Ok(())
}
