//! gRPC controller for the releases service.

use depot_db::models::release::{CreateRelease, ReleaseFilter, UpdateRelease};
use tonic::{Request, Response, Status};

use super::convert::{
    metadata_from_rpc, parse_id, release_status_from_rpc, release_to_rpc, status_from_core,
    structure_from_rpc, structure_view_to_rpc,
};
use super::proto;
use crate::services::ReleaseService;

pub struct ReleasesGrpcService {
    releases: ReleaseService,
}

impl ReleasesGrpcService {
    pub fn new(releases: ReleaseService) -> Self {
        Self { releases }
    }
}

#[tonic::async_trait]
impl proto::releases_service_server::ReleasesService for ReleasesGrpcService {
    async fn get_release(
        &self,
        request: Request<proto::GetReleaseRequest>,
    ) -> Result<Response<proto::Release>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "release id")?;
        let release = self
            .releases
            .get(id, None)
            .await
            .map_err(status_from_core)?;
        Ok(Response::new(release_to_rpc(&release)))
    }

    async fn list_releases(
        &self,
        request: Request<proto::ListReleasesRequest>,
    ) -> Result<Response<proto::ListReleasesResponse>, Status> {
        let req = request.into_inner();
        let project_id = parse_id(&req.project_id, "project id")?;
        let filter = ReleaseFilter {
            page: req.page.map(i64::from),
            page_size: req.page_size.map(i64::from),
            status: req.status.map(release_status_from_rpc),
            version: req.version,
        };

        let result = self
            .releases
            .list(project_id, &filter)
            .await
            .map_err(status_from_core)?;
        Ok(Response::new(proto::ListReleasesResponse {
            items: result.items.iter().map(release_to_rpc).collect(),
            total: result.total,
            page: result.page as i32,
            page_size: result.page_size as i32,
        }))
    }

    async fn create_release(
        &self,
        request: Request<proto::CreateReleaseRequest>,
    ) -> Result<Response<proto::Release>, Status> {
        let req = request.into_inner();
        let project_id = parse_id(&req.project_id, "project id")?;
        let input = CreateRelease {
            version: req.version,
            changelog: req.changelog,
            notes: req.notes,
            structure: req.structure.as_ref().map(structure_from_rpc),
            metadata: if req.metadata.is_empty() {
                None
            } else {
                Some(metadata_from_rpc(&req.metadata))
            },
        };

        let release = self
            .releases
            .create(project_id, input)
            .await
            .map_err(status_from_core)?;
        Ok(Response::new(release_to_rpc(&release)))
    }

    async fn update_release(
        &self,
        request: Request<proto::UpdateReleaseRequest>,
    ) -> Result<Response<proto::Release>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "release id")?;
        let snapshot_id = match req.snapshot_id.as_deref() {
            Some(raw) if !raw.is_empty() => Some(parse_id(raw, "snapshot id")?),
            _ => None,
        };
        let input = UpdateRelease {
            status: req.status.map(release_status_from_rpc),
            snapshot_id,
            changelog: req.changelog,
            notes: req.notes,
            structure: req.structure.as_ref().map(structure_from_rpc),
            metadata: if req.metadata.is_empty() {
                None
            } else {
                Some(metadata_from_rpc(&req.metadata))
            },
        };

        let release = self
            .releases
            .update(id, input, None)
            .await
            .map_err(status_from_core)?;
        Ok(Response::new(release_to_rpc(&release)))
    }

    async fn update_release_structure(
        &self,
        request: Request<proto::UpdateReleaseStructureRequest>,
    ) -> Result<Response<proto::Release>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "release id")?;
        let snapshot_id = parse_id(&req.snapshot_id, "snapshot id")?;
        let structure = req
            .structure
            .as_ref()
            .ok_or_else(|| Status::invalid_argument("structure is required"))?;

        let release = self
            .releases
            .update_structure(id, snapshot_id, structure_from_rpc(structure))
            .await
            .map_err(status_from_core)?;
        Ok(Response::new(release_to_rpc(&release)))
    }

    async fn update_release_status(
        &self,
        request: Request<proto::UpdateReleaseStatusRequest>,
    ) -> Result<Response<proto::Release>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "release id")?;
        let status = release_status_from_rpc(req.status);

        let release = self
            .releases
            .update_status(id, status)
            .await
            .map_err(status_from_core)?;
        Ok(Response::new(release_to_rpc(&release)))
    }

    async fn delete_release(
        &self,
        request: Request<proto::DeleteReleaseRequest>,
    ) -> Result<Response<proto::DeleteReleaseResponse>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "release id")?;
        self.releases
            .remove(id, None)
            .await
            .map_err(status_from_core)?;
        Ok(Response::new(proto::DeleteReleaseResponse {}))
    }

    async fn get_release_structure(
        &self,
        request: Request<proto::GetReleaseStructureRequest>,
    ) -> Result<Response<proto::ReleaseStructure>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "release id")?;
        let view = self
            .releases
            .get_structure(id)
            .await
            .map_err(status_from_core)?;
        Ok(Response::new(structure_view_to_rpc(&view)))
    }
}
