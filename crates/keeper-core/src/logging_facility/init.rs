//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for interactive use
    Development,
    /// JSON structured output for log shipping
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => "keeper=debug",
            Profile::Production => "keeper=info",
            Profile::Test => "off",
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" | "development" => Ok(Profile::Development),
            "json" | "production" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!("unknown log profile '{}'", other)),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at process start; later calls are no-ops. `RUST_LOG`
/// overrides the profile's default filter.
///
/// # Profiles
///
/// - **Development**: Human-readable logs, `keeper=debug`
/// - **Production**: JSON structured logs, `keeper=info`
/// - **Test**: Bare registry; tests install a capture layer instead
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));

        match profile {
            Profile::Development => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Test => {
                // capture layer is installed by init_test_capture()
                let _ = tracing_subscriber::registry().try_init();
            }
        }
    });
}
