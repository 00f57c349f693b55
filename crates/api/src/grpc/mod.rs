//! gRPC surface: one tonic service per domain service, sharing the same
//! service layer as the REST handlers.

pub mod convert;

mod projects;
mod releases;
mod tags;

pub use projects::ProjectsGrpcService;
pub use releases::ReleasesGrpcService;
pub use tags::TagsGrpcService;

/// Generated protobuf types for the `depot.v1` package.
pub mod proto {
    tonic::include_proto!("depot.v1");
}

use std::net::SocketAddr;

use proto::projects_service_server::ProjectsServiceServer;
use proto::releases_service_server::ReleasesServiceServer;
use proto::tags_service_server::TagsServiceServer;
use tonic::transport::Server;

use crate::state::AppState;

/// Serve the catalogue services until the task is dropped or fails.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), tonic::transport::Error> {
    Server::builder()
        .add_service(ProjectsServiceServer::new(ProjectsGrpcService::new(
            state.projects.clone(),
        )))
        .add_service(ReleasesServiceServer::new(ReleasesGrpcService::new(
            state.releases.clone(),
        )))
        .add_service(TagsServiceServer::new(TagsGrpcService::new(
            state.tags.clone(),
        )))
        .serve(addr)
        .await
}
