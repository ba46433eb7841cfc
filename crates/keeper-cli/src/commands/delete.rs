//! Delete a membership, a group or a host

use clap::Args;
use keeper_core::NodeTarget;
use keeper_engine::{apply_inventory_command, InventoryCommand, MarkerPolicy};

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// groupname:hostname, groupname or hosts:hostname
    pub token: String,

    /// Keep the host's group markers when deleting hosts:hostname
    #[arg(long)]
    pub retain_markers: bool,
}

pub fn execute(args: DeleteArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let target = NodeTarget::parse(&args.token)?;
    let policy = if args.retain_markers {
        MarkerPolicy::Retain
    } else {
        MarkerPolicy::Purge
    };
    let client = global.client()?;

    let outcome =
        apply_inventory_command(InventoryCommand::DeleteRecursive { target, policy }, &client)?;
    println!("{}", outcome);
    Ok(())
}
