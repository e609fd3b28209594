//! Faculty import, listing and deletion handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use log::info;
use outcurr_core::{Faculty, FacultyId, FacultyPage};
use serde::Deserialize;

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Body of the bulk import call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyNamesRequest {
    pub faculty_names: Vec<String>,
}

/// Query string of the paginated listing.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    /// Zero-based page index.
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// `GET /v1/external/banner/faculties/`
pub async fn list_faculties(State(state): State<AppState>) -> ApiResult<Json<Vec<Faculty>>> {
    let faculties = state
        .with_faculties(|service| service.list_faculties())
        .await?;
    Ok(Json(faculties))
}

/// `GET /v1/external/banner/faculties/page?page=&size=`
pub async fn page_faculties(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<FacultyPage>> {
    let Query(params) = params.map_err(|rejection| {
        ApiError::bad_request(format!("invalid page parameters: {}", rejection.body_text()))
    })?;

    let page = state
        .with_faculties(move |service| service.page_faculties(params.page, params.size))
        .await?;
    Ok(Json(page))
}

/// `POST /v1/external/banner/faculties/`
///
/// All-or-nothing: any invalid name rejects the batch.
pub async fn import_faculties(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<FacultyNamesRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Faculty>>> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::bad_request(format!("invalid request body: {}", rejection.body_text()))
    })?;

    let created = state
        .with_faculties(move |service| service.import_faculties(&request.faculty_names))
        .await?;

    info!(
        "event=faculty_import module=api status=ok actor={} created={}",
        principal.subject,
        created.len()
    );
    Ok(Json(created))
}

/// `DELETE /v1/auth/faculties/{id}`
pub async fn delete_faculty(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    fac_id: Result<Path<FacultyId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(fac_id) = fac_id.map_err(|rejection| {
        ApiError::bad_request(format!("invalid faculty id: {}", rejection.body_text()))
    })?;

    state
        .with_faculties(move |service| service.delete_faculty(fac_id))
        .await?;

    info!(
        "event=faculty_delete module=api status=ok actor={} fac_id={}",
        principal.subject, fac_id
    );
    Ok(StatusCode::NO_CONTENT)
}
