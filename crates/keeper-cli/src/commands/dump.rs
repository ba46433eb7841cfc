//! Plain inventory dump

use clap::Args;
use keeper_engine::{apply_inventory_query, DumpMode, InventoryQuery};

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// hosts, groups or all
    #[arg(long, default_value = "all")]
    pub mode: String,
}

pub fn execute(args: DumpArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mode: DumpMode = args.mode.parse()?;
    let client = global.client()?;

    let result = apply_inventory_query(InventoryQuery::Dump(mode), &client)?;
    println!("{}", result.to_json()?);
    Ok(())
}
