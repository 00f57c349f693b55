//! gRPC controller for the projects service.

use depot_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
use tonic::{Request, Response, Status};

use super::convert::{
    lifecycle_stage_from_rpc, metadata_from_rpc, parse_id, project_status_from_rpc,
    project_to_rpc, status_from_core,
};
use super::proto;
use crate::services::ProjectService;

pub struct ProjectsGrpcService {
    projects: ProjectService,
}

impl ProjectsGrpcService {
    pub fn new(projects: ProjectService) -> Self {
        Self { projects }
    }
}

fn parse_optional_id(raw: Option<&str>, field: &str) -> Result<Option<uuid::Uuid>, Status> {
    match raw {
        Some(raw) if !raw.is_empty() => Ok(Some(parse_id(raw, field)?)),
        _ => Ok(None),
    }
}

fn parse_id_list(raw: &[String], field: &str) -> Result<Option<Vec<uuid::Uuid>>, Status> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.iter()
        .map(|id| parse_id(id, field))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[tonic::async_trait]
impl proto::projects_service_server::ProjectsService for ProjectsGrpcService {
    async fn health_check(
        &self,
        request: Request<proto::HealthCheckRequest>,
    ) -> Result<Response<proto::HealthCheckResponse>, Status> {
        let service = request
            .into_inner()
            .service
            .unwrap_or_else(|| "unknown".into());
        Ok(Response::new(proto::HealthCheckResponse {
            status: "OK".into(),
            message: format!("Projects service is healthy. Service: {service}"),
        }))
    }

    async fn get_project(
        &self,
        request: Request<proto::GetProjectRequest>,
    ) -> Result<Response<proto::Project>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "project id")?;
        let project = self.projects.get(id).await.map_err(status_from_core)?;
        Ok(Response::new(project_to_rpc(&project)))
    }

    async fn list_projects(
        &self,
        request: Request<proto::ListProjectsRequest>,
    ) -> Result<Response<proto::ListProjectsResponse>, Status> {
        let req = request.into_inner();
        let filter = ProjectFilter {
            page: req.page.map(i64::from),
            page_size: req.page_size.map(i64::from),
            owner_id: parse_optional_id(req.owner_id.as_deref(), "owner id")?,
            status: req.status.map(project_status_from_rpc),
            search: req.search,
            tag_ids: parse_id_list(&req.tag_ids, "tag id")?,
            sort_by: None,
            sort_order: None,
        };

        let result = self.projects.list(&filter).await.map_err(status_from_core)?;
        Ok(Response::new(proto::ListProjectsResponse {
            items: result.items.iter().map(project_to_rpc).collect(),
            total: result.total,
            page: result.page as i32,
            page_size: result.page_size as i32,
        }))
    }

    async fn create_project(
        &self,
        request: Request<proto::CreateProjectRequest>,
    ) -> Result<Response<proto::Project>, Status> {
        let req = request.into_inner();
        let input = CreateProject {
            name: req.name,
            slug: req.slug,
            description: req.description,
            image_url: None,
            emoji: None,
            status: req.status.map(project_status_from_rpc),
            owner_id: parse_optional_id(req.owner_id.as_deref(), "owner id")?,
            lifecycle_stages: if req.lifecycle_stages.is_empty() {
                None
            } else {
                Some(
                    req.lifecycle_stages
                        .iter()
                        .map(|code| lifecycle_stage_from_rpc(*code))
                        .collect(),
                )
            },
            tag_ids: parse_id_list(&req.tag_ids, "tag id")?,
            metadata: if req.metadata.is_empty() {
                None
            } else {
                Some(metadata_from_rpc(&req.metadata))
            },
        };

        let project = self.projects.create(input).await.map_err(status_from_core)?;
        Ok(Response::new(project_to_rpc(&project)))
    }

    async fn update_project(
        &self,
        request: Request<proto::UpdateProjectRequest>,
    ) -> Result<Response<proto::Project>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "project id")?;
        let input = UpdateProject {
            name: req.name,
            slug: req.slug,
            description: req.description,
            image_url: None,
            emoji: None,
            status: req.status.map(project_status_from_rpc),
            owner_id: parse_optional_id(req.owner_id.as_deref(), "owner id")?,
            // Empty lists mean "no change" on this surface; proto3 repeated
            // fields cannot distinguish absent from empty.
            lifecycle_stages: if req.lifecycle_stages.is_empty() {
                None
            } else {
                Some(
                    req.lifecycle_stages
                        .iter()
                        .map(|code| lifecycle_stage_from_rpc(*code))
                        .collect(),
                )
            },
            tag_ids: parse_id_list(&req.tag_ids, "tag id")?,
            metadata: if req.metadata.is_empty() {
                None
            } else {
                Some(metadata_from_rpc(&req.metadata))
            },
        };

        let project = self
            .projects
            .update(id, input)
            .await
            .map_err(status_from_core)?;
        Ok(Response::new(project_to_rpc(&project)))
    }

    async fn delete_project(
        &self,
        request: Request<proto::DeleteProjectRequest>,
    ) -> Result<Response<proto::DeleteProjectResponse>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "project id")?;
        self.projects.remove(id).await.map_err(status_from_core)?;
        Ok(Response::new(proto::DeleteProjectResponse {}))
    }

    async fn project_exists(
        &self,
        request: Request<proto::ProjectExistsRequest>,
    ) -> Result<Response<proto::ProjectExistsResponse>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "project id")?;
        let exists = self.projects.exists(id).await.map_err(status_from_core)?;
        Ok(Response::new(proto::ProjectExistsResponse { exists }))
    }
}
