//! Subcommand implementations
//!
//! Each subcommand parses its token before touching configuration or the
//! store, so malformed input fails fast.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use keeper_core::logging_facility::Profile;
use keeper_core::{ConfigOverrides, KeeperConfig};
use keeper_store::{StoreClient, ZkConnector};

pub mod add;
pub mod delete;
pub mod dump;
pub mod group;
pub mod inventory;
pub mod rename;
pub mod show;
pub mod update;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn profile(self) -> Profile {
        match self {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

/// Options shared by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma-separated host:port list of coordination servers
    #[arg(long, global = true, env = "KEEPER_SERVERS")]
    pub servers: Option<String>,

    /// Inventory root inside the store
    #[arg(long, global = true, env = "KEEPER_BASE_PATH")]
    pub base_path: Option<String>,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl GlobalArgs {
    /// Build a ZooKeeper-backed client from file, env and flags
    pub fn client(&self) -> keeper_core::Result<StoreClient<ZkConnector>> {
        let overrides = ConfigOverrides {
            servers: self.servers.clone(),
            base_path: self.base_path.clone(),
        };
        let config = KeeperConfig::load(self.config.as_deref(), &overrides)?;
        tracing::debug!(
            component = module_path!(),
            servers = %config.store.connect_string(),
            path = %config.store.base_path,
            "configuration loaded"
        );
        Ok(StoreClient::new(config.store, ZkConnector))
    }
}
