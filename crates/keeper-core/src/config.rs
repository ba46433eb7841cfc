//! Configuration for the coordination-store connection
//!
//! Loaded once per invocation from built-in defaults, an optional TOML file
//! and command-line/environment overrides, validated, then passed by value to
//! the store client. Nothing mutates it afterwards.
//!
//! ```toml
//! servers = "zoo1.dmz:2181,zoo2.dmz:2181"   # or ["zoo1.dmz:2181", ...]
//! base_path = "/ansible-test"
//! session_timeout_ms = 10000
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{KeeperError, Result};

pub const DEFAULT_SERVERS: &str = "zoo1.dmz:2181,zoo2.dmz:2181,zoo3.dmz:2181";
pub const DEFAULT_BASE_PATH: &str = "/ansible-test";
pub const DEFAULT_SESSION_TIMEOUT_MS: u64 = 10_000;

/// One `host:port` coordination server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddr {
    pub host: String,
    pub port: u16,
}

impl FromStr for ServerAddr {
    type Err = KeeperError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || KeeperError::Config {
            reason: format!("server '{}' is not of the form host:port", s),
        };

        let (host, port) = s.trim().rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parse a comma-separated `host:port` list
///
/// # Errors
///
/// Returns `KeeperError::Config` if any entry is malformed.
pub fn parse_server_list(list: &str) -> Result<Vec<ServerAddr>> {
    list.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(ServerAddr::from_str)
        .collect()
}

/// Connection settings for the store client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub servers: Vec<ServerAddr>,
    pub base_path: String,
    pub session_timeout_ms: u64,
}

impl StoreConfig {
    /// Connect string as expected by ZooKeeper clients
    pub fn connect_string(&self) -> String {
        self.servers
            .iter()
            .map(ServerAddr::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            servers: parse_server_list(DEFAULT_SERVERS).unwrap_or_default(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            session_timeout_ms: DEFAULT_SESSION_TIMEOUT_MS,
        }
    }
}

/// Top-level configuration record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeeperConfig {
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum ServerListFile {
    Joined(String),
    List(Vec<String>),
}

/// On-disk shape of the configuration file; every key is optional
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    servers: Option<ServerListFile>,
    base_path: Option<String>,
    session_timeout_ms: Option<u64>,
}

/// Command-line or environment overrides applied on top of the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub servers: Option<String>,
    pub base_path: Option<String>,
}

impl KeeperConfig {
    /// Parse configuration from TOML text, starting from defaults
    ///
    /// # Errors
    ///
    /// Returns `KeeperError::Config` on malformed TOML, unknown keys or bad
    /// server entries.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).map_err(|e| KeeperError::Config {
            reason: e.to_string(),
        })?;

        let mut config = KeeperConfig::default();
        match file.servers {
            Some(ServerListFile::Joined(list)) => config.store.servers = parse_server_list(&list)?,
            Some(ServerListFile::List(list)) => {
                config.store.servers = list
                    .iter()
                    .map(|s| s.parse())
                    .collect::<Result<Vec<_>>>()?;
            }
            None => {}
        }
        if let Some(base_path) = file.base_path {
            config.store.base_path = base_path;
        }
        if let Some(timeout) = file.session_timeout_ms {
            config.store.session_timeout_ms = timeout;
        }
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns `KeeperError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| KeeperError::Config {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve the effective configuration: file (or defaults), then overrides
    ///
    /// # Errors
    ///
    /// Returns `KeeperError::Config` if loading fails or the result is invalid.
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(servers) = &overrides.servers {
            config.store.servers = parse_server_list(servers)?;
        }
        if let Some(base_path) = &overrides.base_path {
            config.store.base_path = base_path.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the store client relies on
    ///
    /// # Errors
    ///
    /// Returns `KeeperError::Config` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let store = &self.store;
        if store.servers.is_empty() {
            return Err(KeeperError::Config {
                reason: "at least one coordination server is required".to_string(),
            });
        }

        let base = store.base_path.as_str();
        let bad_base = !base.starts_with('/')
            || (base.len() > 1 && base.ends_with('/'))
            || (base.len() > 1 && base[1..].split('/').any(str::is_empty));
        if bad_base {
            return Err(KeeperError::Config {
                reason: format!(
                    "base path '{}' must be absolute, without empty segments or trailing '/'",
                    base
                ),
            });
        }

        if store.session_timeout_ms == 0 {
            return Err(KeeperError::Config {
                reason: "session_timeout_ms must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = KeeperConfig::default();
        assert_eq!(config.store.servers.len(), 3);
        assert_eq!(config.store.base_path, "/ansible-test");
        config.validate().unwrap();
    }

    #[test]
    fn test_server_list_parsing() {
        let servers = parse_server_list("zk1:2181, zk2:2182").unwrap();
        assert_eq!(
            servers,
            vec![
                ServerAddr {
                    host: "zk1".to_string(),
                    port: 2181
                },
                ServerAddr {
                    host: "zk2".to_string(),
                    port: 2182
                },
            ]
        );
    }

    #[test]
    fn test_server_list_rejects_missing_port() {
        assert!(matches!(
            parse_server_list("zk1,zk2:2181"),
            Err(KeeperError::Config { .. })
        ));
        assert!(parse_server_list("zk1:notaport").is_err());
        assert!(parse_server_list(":2181").is_err());
    }

    #[test]
    fn test_toml_accepts_string_or_array() {
        let a = KeeperConfig::from_toml_str("servers = \"zk1:2181,zk2:2181\"").unwrap();
        let b = KeeperConfig::from_toml_str("servers = [\"zk1:2181\", \"zk2:2181\"]").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.store.connect_string(), "zk1:2181,zk2:2181");
    }

    #[test]
    fn test_toml_rejects_unknown_keys() {
        assert!(KeeperConfig::from_toml_str("zk_servers = \"a:1\"").is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = ConfigOverrides {
            servers: Some("local:2181".to_string()),
            base_path: Some("/inv".to_string()),
        };
        let config = KeeperConfig::load(None, &overrides).unwrap();
        assert_eq!(config.store.connect_string(), "local:2181");
        assert_eq!(config.store.base_path, "/inv");
    }

    #[test]
    fn test_validate_base_path() {
        for bad in ["relative", "/trailing/", "/double//slash"] {
            let overrides = ConfigOverrides {
                base_path: Some(bad.to_string()),
                ..Default::default()
            };
            assert!(
                KeeperConfig::load(None, &overrides).is_err(),
                "{} should be rejected",
                bad
            );
        }

        let root = ConfigOverrides {
            base_path: Some("/".to_string()),
            ..Default::default()
        };
        assert!(KeeperConfig::load(None, &root).is_ok());
    }
}
