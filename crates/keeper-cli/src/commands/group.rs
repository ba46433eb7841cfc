//! Add an existing host to a group

use clap::Args;
use keeper_core::NodeTarget;
use keeper_engine::{apply_inventory_command, InventoryCommand};

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct GroupArgs {
    /// groupname:hostname
    pub token: String,
}

pub fn execute(args: GroupArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cmd = InventoryCommand::add_to_group(NodeTarget::parse(&args.token)?)?;
    let client = global.client()?;

    let outcome = apply_inventory_command(cmd, &client)?;
    println!("{}", outcome);
    Ok(())
}
