//! ansible-keeper CLI
//!
//! Manages an Ansible host/group inventory stored in ZooKeeper and serves it
//! as an Ansible dynamic inventory script.

use clap::{Parser, Subcommand};
use keeper_core::logging_facility;
use keeper_core_types::RequestId;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "ansible-keeper")]
#[command(about = "Ansible inventory kept in ZooKeeper", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    /// Print the Ansible inventory (dynamic inventory script mode)
    #[arg(long, conflicts_with = "host")]
    list: bool,

    /// Print the variables of one host (dynamic inventory script mode)
    #[arg(long, value_name = "HOSTNAME")]
    host: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a host with variables to a group
    Add(commands::add::AddArgs),
    /// Add an existing host to a group
    Group(commands::group::GroupArgs),
    /// Delete a host from a group, a whole group, or a host
    Delete(commands::delete::DeleteArgs),
    /// Update existing host variables
    Update(commands::update::UpdateArgs),
    /// Rename a host or a group
    Rename(commands::rename::RenameArgs),
    /// Show host variables of a group or a host as JSON
    Show(commands::show::ShowArgs),
    /// Dump host and group names as JSON
    Dump(commands::dump::DumpArgs),
    /// Print the Ansible inventory as JSON (same as --list)
    Inventory,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let global = &cli.global;
    match (cli.command, cli.list, cli.host) {
        (Some(command), false, None) => match command {
            Commands::Add(args) => commands::add::execute(args, global),
            Commands::Group(args) => commands::group::execute(args, global),
            Commands::Delete(args) => commands::delete::execute(args, global),
            Commands::Update(args) => commands::update::execute(args, global),
            Commands::Rename(args) => commands::rename::execute(args, global),
            Commands::Show(args) => commands::show::execute(args, global),
            Commands::Dump(args) => commands::dump::execute(args, global),
            Commands::Inventory => commands::inventory::execute_list(global),
        },
        (None, true, None) => commands::inventory::execute_list(global),
        (None, false, Some(host)) => commands::inventory::execute_host(host, global),
        (None, false, None) => Err("no command given (see --help)".into()),
        _ => Err("--list and --host cannot be combined with a subcommand".into()),
    }
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.global.log_format.profile());

    let request_id = RequestId::new();
    let span = tracing::info_span!("invocation", request_id = %request_id);
    let _guard = span.enter();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_delete_with_retain_markers() {
        let cli = Cli::try_parse_from([
            "ansible-keeper",
            "delete",
            "hosts:web01",
            "--retain-markers",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Delete(args)) => {
                assert_eq!(args.token, "hosts:web01");
                assert!(args.retain_markers);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ansible-keeper",
            "dump",
            "--mode",
            "hosts",
            "--servers",
            "zk1:2181",
            "--base-path",
            "/inv",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.global.servers.as_deref(), Some("zk1:2181"));
        assert_eq!(cli.global.base_path.as_deref(), Some("/inv"));
        assert_eq!(cli.global.log_format, commands::LogFormat::Json);
    }

    #[test]
    fn test_inventory_script_flags() {
        let cli = Cli::try_parse_from(["ansible-keeper", "--host", "web01"]).unwrap();
        assert_eq!(cli.host.as_deref(), Some("web01"));
        assert!(cli.command.is_none());

        assert!(Cli::try_parse_from(["ansible-keeper", "--list", "--host", "web01"]).is_err());
    }
}
