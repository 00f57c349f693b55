use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{ProjectService, ReleaseService, TagService};

/// Shared application state available to all Axum handlers via
/// `State<AppState>`, and to the gRPC services at construction time.
///
/// This is cheaply cloneable (services hold their stores behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub projects: ProjectService,
    pub releases: ReleaseService,
    pub tags: TagService,
    pub config: Arc<ServerConfig>,
}
