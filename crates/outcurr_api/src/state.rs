//! Shared state for API handlers.

use std::sync::Arc;

use log::warn;
use outcurr_core::{FacultyService, ServiceResult, SqliteFacultyRepository};
use rusqlite::Connection;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::auth::TokenVerifier;
use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};

/// Shared state for API handlers.
///
/// The SQLite connection is not `Sync`, so it lives behind a mutex and each
/// service call holds the lock for its whole duration.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    verifier: Arc<TokenVerifier>,
    /// Server-side configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates state over a migrated connection from `outcurr_core::db`.
    pub fn new(conn: Connection, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            verifier: Arc::new(TokenVerifier::new(&config.jwt)),
            config: Arc::new(config),
        }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Runs one faculty use-case on the blocking pool.
    ///
    /// The configured request timeout bounds only the wait for the store.
    /// Once the use-case starts it runs to completion and its outcome is the
    /// response, so a timeout (503) always means nothing was written.
    pub async fn with_faculties<T, F>(&self, op: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut FacultyService<SqliteFacultyRepository<'_>>) -> ServiceResult<T>
            + Send
            + 'static,
    {
        let mut conn = self.acquire_store().await?;
        let joined = tokio::task::spawn_blocking(move || {
            let mut service = FacultyService::new(SqliteFacultyRepository::new(&mut conn));
            op(&mut service)
        })
        .await;

        match joined {
            Ok(result) => result.map_err(ApiError::from),
            Err(err) => Err(ApiError::internal(format!("storage task failed: {err}"))),
        }
    }

    async fn acquire_store(&self) -> ApiResult<OwnedMutexGuard<Connection>> {
        let lock = Arc::clone(&self.db).lock_owned();
        let Some(wait) = self.config.request_timeout else {
            return Ok(lock.await);
        };

        tokio::time::timeout(wait, lock).await.map_err(|_| {
            warn!(
                "event=store_wait module=api status=timeout wait_ms={}",
                wait.as_millis()
            );
            ApiError::ServiceUnavailable {
                message: "request timed out waiting for the faculty store".to_string(),
            }
        })
    }
}
