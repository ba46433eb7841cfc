//! Update variables a host already has

use clap::Args;
use keeper_core::HostAssignment;
use keeper_engine::{apply_inventory_command, InventoryCommand};

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// groupname:hostname,var1:value1[,var2:value2...]
    pub token: String,
}

pub fn execute(args: UpdateArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let assignment = HostAssignment::parse(&args.token)?;
    let client = global.client()?;

    let outcome =
        apply_inventory_command(InventoryCommand::UpdateHostVariables(assignment), &client)?;
    println!("{}", outcome);
    Ok(())
}
