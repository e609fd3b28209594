//! Route table and router assembly.
//!
//! The mapping from `(verb, path)` to operation is the static [`ROUTES`]
//! table; the router is built by folding over it, so the table is the single
//! place that declares the public surface.

use std::time::Instant;

use axum::extract::{OriginalUri, Request};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, on, MethodFilter, MethodRouter};
use axum::Router;
use log::{error, info};
use tower::limit::ConcurrencyLimitLayer;

use crate::auth::require_bearer;
use crate::error::ApiError;
use crate::handlers::{faculties, health};
use crate::state::AppState;

/// Public liveness path; not part of the authenticated table.
pub const HEALTH_PATH: &str = "/outcurrapi/health";

/// HTTP verbs used by the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Delete,
}

impl Verb {
    fn filter(self) -> MethodFilter {
        match self {
            Self::Get => MethodFilter::GET,
            Self::Post => MethodFilter::POST,
            Self::Delete => MethodFilter::DELETE,
        }
    }
}

/// Operations exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListFaculties,
    PageFaculties,
    ImportFaculties,
    DeleteFaculty,
}

/// One row of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSpec {
    pub verb: Verb,
    pub path: &'static str,
    pub operation: Operation,
}

/// Authenticated routes. Every entry requires a bearer token.
pub const ROUTES: &[RouteSpec] = &[
    RouteSpec {
        verb: Verb::Get,
        path: "/outcurrapi/v1/external/banner/faculties/",
        operation: Operation::ListFaculties,
    },
    RouteSpec {
        verb: Verb::Get,
        path: "/outcurrapi/v1/external/banner/faculties/page",
        operation: Operation::PageFaculties,
    },
    RouteSpec {
        verb: Verb::Post,
        path: "/outcurrapi/v1/external/banner/faculties/",
        operation: Operation::ImportFaculties,
    },
    RouteSpec {
        verb: Verb::Delete,
        path: "/outcurrapi/v1/auth/faculties/:fac_id",
        operation: Operation::DeleteFaculty,
    },
];

impl RouteSpec {
    fn method_router(&self) -> MethodRouter<AppState> {
        let filter = self.verb.filter();
        match self.operation {
            Operation::ListFaculties => on(filter, faculties::list_faculties),
            Operation::PageFaculties => on(filter, faculties::page_faculties),
            Operation::ImportFaculties => on(filter, faculties::import_faculties),
            Operation::DeleteFaculty => on(filter, faculties::delete_faculty),
        }
    }
}

/// Creates the API router.
///
/// The configured request timeout is enforced by [`AppState::with_faculties`]
/// while waiting for the store, not by a router-wide layer.
pub fn api_router(state: AppState) -> Router {
    let concurrency_limit = state.config.concurrency_limit;

    let protected = ROUTES
        .iter()
        .fold(Router::<AppState>::new(), |router, spec| {
            router.route(spec.path, spec.method_router())
        })
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let router = Router::new()
        .route(HEALTH_PATH, get(health::health))
        .merge(protected)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(middleware::from_fn(log_requests));

    let router = match concurrency_limit {
        Some(limit) => router.layer(ConcurrencyLimitLayer::new(limit)),
        None => router,
    };

    router.with_state(state)
}

async fn not_found(uri: OriginalUri) -> ApiError {
    ApiError::not_found(format!("not found: {}", uri.0.path()))
}

async fn method_not_allowed(method: Method, uri: OriginalUri) -> ApiError {
    ApiError::MethodNotAllowed {
        message: format!("{method} not allowed on {}", uri.0.path()),
    }
}

async fn log_requests(req: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let status = response.status();
    if status.is_server_error() {
        error!(
            "event=http_request module=api status=error method={} path={} status_code={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            started_at.elapsed().as_millis()
        );
    } else {
        info!(
            "event=http_request module=api status=ok method={} path={} status_code={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            started_at.elapsed().as_millis()
        );
    }
    response
}
