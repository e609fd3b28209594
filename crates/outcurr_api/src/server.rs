//! HTTP server loop.

use log::{error, info, warn};
use outcurr_core::db::{open_db, open_db_in_memory, DbError};

use crate::config::ServerConfig;
use crate::routes::api_router;
use crate::state::AppState;

/// Server startup or runtime failure.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to open faculty store: {0}")]
    Store(#[from] DbError),
    #[error("http server i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opens the configured store, binds the listener and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let conn = match config.db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => {
            warn!(
                "event=server_start module=server status=warn message=no_db_path_using_in_memory_store"
            );
            open_db_in_memory()?
        }
    };

    let addr = config.http_addr;
    let router = api_router(AppState::new(conn, config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "event=server_start module=server status=ok addr={}",
        listener.local_addr()?
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=server_stop module=server status=error error={err}");
        return;
    }
    info!("event=shutdown_requested module=server status=ok signal=ctrl_c");
}
