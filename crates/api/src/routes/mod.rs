pub mod health;
pub mod project;
pub mod release;
pub mod tag;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /projects                                  list, create
/// /projects/slug/{slug}                      get by slug
/// /projects/{id}                             get, update, delete
/// /projects/{id}/icon                        icon upload (POST)
///
/// /projects/{project_id}/releases            list, create
/// /projects/{project_id}/releases/{id}       get, update, delete (scoped)
///
/// /releases/{id}                             get, update, delete
/// /releases/{id}/status                      update status (PUT)
/// /releases/{id}/structure                   get, update structure
///
/// /tags                                      list, create
/// /tags/{id}                                 get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/releases", release::router())
        .nest("/tags", tag::router())
}
