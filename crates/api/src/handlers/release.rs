//! Handlers for releases, both project-scoped
//! (`/projects/{project_id}/releases`) and unscoped (`/releases/{id}`).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use depot_core::pagination::Paginated;
use depot_core::structure::StructureView;
use depot_core::types::DbId;
use depot_db::models::release::{
    CreateRelease, Release, ReleaseFilter, ReleaseStatus, UpdateRelease,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for release listings.
#[derive(Debug, Deserialize)]
pub struct ListReleasesQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<ReleaseStatus>,
    pub version: Option<String>,
}

impl From<ListReleasesQuery> for ReleaseFilter {
    fn from(query: ListReleasesQuery) -> Self {
        ReleaseFilter {
            page: query.page,
            page_size: query.page_size,
            status: query.status,
            version: query.version,
        }
    }
}

/// Body for `PUT /releases/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: ReleaseStatus,
}

/// Body for `PUT /releases/{id}/structure`.
#[derive(Debug, Deserialize)]
pub struct UpdateStructureBody {
    pub snapshot_id: DbId,
    pub structure: Value,
}

// ---------------------------------------------------------------------------
// Project-scoped handlers
// ---------------------------------------------------------------------------

/// GET /api/projects/{project_id}/releases
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(query): Query<ListReleasesQuery>,
) -> AppResult<Json<Paginated<Release>>> {
    let result = state.releases.list(project_id, &query.into()).await?;
    Ok(Json(result))
}

/// POST /api/projects/{project_id}/releases
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateRelease>,
) -> AppResult<(StatusCode, Json<Release>)> {
    let release = state.releases.create(project_id, input).await?;
    Ok((StatusCode::CREATED, Json(release)))
}

/// GET /api/projects/{project_id}/releases/{id}
pub async fn get_scoped(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Release>> {
    let release = state.releases.get(id, Some(project_id)).await?;
    Ok(Json(release))
}

/// PUT /api/projects/{project_id}/releases/{id}
pub async fn update_scoped(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateRelease>,
) -> AppResult<Json<Release>> {
    let release = state.releases.update(id, input, Some(project_id)).await?;
    Ok(Json(release))
}

/// DELETE /api/projects/{project_id}/releases/{id}
pub async fn delete_scoped(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    state.releases.remove(id, Some(project_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Unscoped handlers
// ---------------------------------------------------------------------------

/// GET /api/releases/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Release>> {
    let release = state.releases.get(id, None).await?;
    Ok(Json(release))
}

/// PUT /api/releases/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRelease>,
) -> AppResult<Json<Release>> {
    let release = state.releases.update(id, input, None).await?;
    Ok(Json(release))
}

/// DELETE /api/releases/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.releases.remove(id, None).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/releases/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateStatusBody>,
) -> AppResult<Json<Release>> {
    let release = state.releases.update_status(id, body.status).await?;
    Ok(Json(release))
}

/// PUT /api/releases/{id}/structure
///
/// The hook by which the snapshot pipeline attaches a concrete payload;
/// forces the status to `created`.
pub async fn update_structure(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateStructureBody>,
) -> AppResult<Json<Release>> {
    let release = state
        .releases
        .update_structure(id, body.snapshot_id, body.structure)
        .await?;
    Ok(Json(release))
}

/// GET /api/releases/{id}/structure
pub async fn get_structure(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StructureView>> {
    let view = state.releases.get_structure(id).await?;
    Ok(Json(view))
}
