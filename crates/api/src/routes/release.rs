//! Route definitions for the unscoped `/releases` resource.
//!
//! Project-scoped release routes live under `/projects/{project_id}/releases`
//! (see `routes::project`); the routes here address a release directly by
//! its id, the way the snapshot pipeline does.

use axum::routing::get;
use axum::Router;

use crate::handlers::release;
use crate::state::AppState;

/// Routes mounted at `/releases`.
///
/// ```text
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// PUT    /{id}/status     -> update_status
/// GET    /{id}/structure  -> get_structure
/// PUT    /{id}/structure  -> update_structure
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(release::get_by_id)
                .put(release::update)
                .delete(release::delete),
        )
        .route("/{id}/status", axum::routing::put(release::update_status))
        .route(
            "/{id}/structure",
            get(release::get_structure).put(release::update_structure),
        )
}
