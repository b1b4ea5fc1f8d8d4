//! Tracing setup
//!
//! The configured level is only known after the config file is read, so
//! config loading runs under a short-lived bootstrap subscriber.

use medoc_common::config::{load_config, TomlConfig};
use std::path::Path;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const BOOTSTRAP_LEVEL: &str = "info";

/// `RUST_LOG` when set, otherwise `level`
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber
pub fn init(level: &str) {
    tracing_subscriber::fmt().with_env_filter(env_filter(level)).init();
}

/// Load configuration with its log lines sent to `writer`
pub fn load_config_logged<W>(explicit: Option<&Path>, writer: W) -> medoc_common::Result<TomlConfig>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(env_filter(BOOTSTRAP_LEVEL))
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(bootstrap, || load_config(explicit))
}
