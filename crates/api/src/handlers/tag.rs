//! Handlers for the `/tags` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use depot_core::pagination::Paginated;
use depot_core::types::DbId;
use depot_db::models::tag::{CreateTag, Tag, TagFilter, UpdateTag};
use serde::Deserialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for `GET /tags`.
#[derive(Debug, Deserialize)]
pub struct ListTagsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
}

impl From<ListTagsQuery> for TagFilter {
    fn from(query: ListTagsQuery) -> Self {
        TagFilter {
            page: query.page,
            page_size: query.page_size,
            search: query.search,
        }
    }
}

/// GET /api/tags
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListTagsQuery>,
) -> AppResult<Json<Paginated<Tag>>> {
    let result = state.tags.list(&query.into()).await?;
    Ok(Json(result))
}

/// GET /api/tags/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Tag>> {
    let tag = state.tags.get(id).await?;
    Ok(Json(tag))
}

/// POST /api/tags
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let tag = state.tags.create(input).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /api/tags/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTag>,
) -> AppResult<Json<Tag>> {
    let tag = state.tags.update(id, input).await?;
    Ok(Json(tag))
}

/// DELETE /api/tags/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.tags.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
