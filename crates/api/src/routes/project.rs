//! Route definitions for the `/projects` resource.
//!
//! Also nests project-scoped release routes under
//! `/projects/{project_id}/releases`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{project, release};
use crate::state::AppState;
use crate::storage::ICON_MAX_SIZE_BYTES;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /slug/{slug}                       -> get_by_slug
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// POST   /{id}/icon                         -> upload_icon
///
/// GET    /{project_id}/releases             -> list_by_project
/// POST   /{project_id}/releases             -> create
/// GET    /{project_id}/releases/{id}        -> get_scoped
/// PUT    /{project_id}/releases/{id}        -> update_scoped
/// DELETE /{project_id}/releases/{id}        -> delete_scoped
/// ```
pub fn router() -> Router<AppState> {
    let release_routes = Router::new()
        .route(
            "/",
            get(release::list_by_project).post(release::create),
        )
        .route(
            "/{id}",
            get(release::get_scoped)
                .put(release::update_scoped)
                .delete(release::delete_scoped),
        );

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/slug/{slug}", get(project::get_by_slug))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        // Body cap = icon limit + multipart framing overhead.
        .route(
            "/{id}/icon",
            post(project::upload_icon).layer(DefaultBodyLimit::max(ICON_MAX_SIZE_BYTES + 64 * 1024)),
        )
        .nest("/{project_id}/releases", release_routes)
}
