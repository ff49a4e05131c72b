//! Environment-driven configuration.

use std::path::PathBuf;

use clap::Args;

/// Connection and state settings for the storefront CLI.
///
/// Every flag can also come from the environment, so a shell profile or an
/// `.env` file can hold the storefront address and session once.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Base URL of the storefront API.
    #[arg(
        long,
        env = "TUCKSHOP_API_URL",
        default_value = "http://localhost:4000/api"
    )]
    pub api_url: String,

    /// Session cookie value of a signed-in shopper.
    #[arg(long, env = "TUCKSHOP_SESSION", hide_env_values = true)]
    pub session: Option<String>,

    /// Path of the state file used when no session is set.
    #[arg(long, env = "TUCKSHOP_STATE_FILE", default_value = "tuckshop-state.json")]
    pub state_file: PathBuf,

    /// Log level filter, e.g. `info` or `tuckshop_store=debug`.
    #[arg(long, env = "TUCKSHOP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
