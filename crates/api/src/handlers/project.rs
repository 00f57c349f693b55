//! Handlers for the `/projects` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use depot_core::pagination::Paginated;
use depot_core::types::DbId;
use depot_db::models::project::{
    CreateProject, Project, ProjectFilter, ProjectSortBy, ProjectStatus, SortOrder, UpdateProject,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `GET /projects`.
///
/// `tag_ids` arrives as a comma-separated list; everything else maps
/// straight onto [`ProjectFilter`].
#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub owner_id: Option<DbId>,
    pub status: Option<ProjectStatus>,
    pub search: Option<String>,
    pub tag_ids: Option<String>,
    pub sort_by: Option<ProjectSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ListProjectsQuery {
    fn into_filter(self) -> Result<ProjectFilter, AppError> {
        let tag_ids = match self.tag_ids.as_deref() {
            None => None,
            Some(raw) => {
                let ids = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        Uuid::parse_str(s)
                            .map_err(|_| AppError::BadRequest(format!("Invalid tag id '{s}'")))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if ids.is_empty() {
                    None
                } else {
                    Some(ids)
                }
            }
        };

        Ok(ProjectFilter {
            page: self.page,
            page_size: self.page_size,
            owner_id: self.owner_id,
            status: self.status,
            search: self.search,
            tag_ids,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        })
    }
}

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> AppResult<Json<Paginated<Project>>> {
    let filter = query.into_filter()?;
    let result = state.projects.list(&filter).await?;
    Ok(Json(result))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = state.projects.get(id).await?;
    Ok(Json(project))
}

/// GET /api/projects/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Project>> {
    let project = state.projects.get_by_slug(&slug).await?;
    Ok(Json(project))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = state.projects.create(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    let project = state.projects.update(id, input).await?;
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.projects.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/projects/{id}/icon
///
/// Multipart upload; reads the `file` part and stores it via the blob store.
pub async fn upload_icon(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<Project>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let mime_type = field
            .content_type()
            .ok_or_else(|| AppError::BadRequest("Missing content type on file part".into()))?
            .to_string();
        let original_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(err.to_string()))?;

        let project = state
            .projects
            .upload_icon(id, &bytes, &mime_type, original_name.as_deref())
            .await?;
        return Ok(Json(project));
    }

    Err(AppError::BadRequest("Missing 'file' part".into()))
}
