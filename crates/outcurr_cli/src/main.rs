//! `outcurr` server entry point.
//!
//! # Responsibility
//! - Load configuration from `OUTCURR_*` environment variables.
//! - Initialize process logging before any other work.
//! - Run the HTTP server until Ctrl-C.

use anyhow::{Context, Result};
use outcurr_api::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().context("failed to load configuration")?;

    outcurr_core::init_logging(&config.log_level, &config.log_dir)
        .context("failed to initialize logging")?;
    log::info!(
        "event=config_loaded module=cli status=ok core_version={} http_addr={} db={}",
        outcurr_core::core_version(),
        config.http_addr,
        config
            .db_path
            .as_deref()
            .map_or_else(|| "memory".to_string(), |path| path.display().to_string())
    );

    outcurr_api::serve(config).await?;
    Ok(())
}
