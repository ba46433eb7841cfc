//! Rename a host or a group

use clap::Args;
use keeper_core::RenameTarget;
use keeper_engine::{apply_inventory_command, InventoryCommand};

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// hosts:oldname:newname or groups:oldname:newname
    pub token: String,
}

pub fn execute(args: RenameArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let target = RenameTarget::parse(&args.token)?;
    let client = global.client()?;

    let outcome = apply_inventory_command(InventoryCommand::RenameNode(target), &client)?;
    println!("{}", outcome);
    Ok(())
}
