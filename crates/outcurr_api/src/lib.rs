//! HTTP surface for the faculty import service.
//!
//! # Responsibility
//! - Authenticate bearer tokens before any request body is read.
//! - Map the explicit route table onto `outcurr_core` use-cases.
//! - Translate core errors into stable HTTP status codes and payloads.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use auth::{Principal, TokenVerifier};
pub use config::{ConfigError, JwtConfig, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use routes::{api_router, Operation, RouteSpec, Verb, ROUTES};
pub use server::{serve, ServerError};
pub use state::AppState;
