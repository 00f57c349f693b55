//! gRPC controller for the tags service.

use depot_db::models::tag::{CreateTag, TagFilter, UpdateTag};
use tonic::{Request, Response, Status};

use super::convert::{parse_id, status_from_core, tag_to_rpc};
use super::proto;
use crate::services::TagService;

pub struct TagsGrpcService {
    tags: TagService,
}

impl TagsGrpcService {
    pub fn new(tags: TagService) -> Self {
        Self { tags }
    }
}

#[tonic::async_trait]
impl proto::tags_service_server::TagsService for TagsGrpcService {
    async fn get_tag(
        &self,
        request: Request<proto::GetTagRequest>,
    ) -> Result<Response<proto::Tag>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "tag id")?;
        let tag = self.tags.get(id).await.map_err(status_from_core)?;
        Ok(Response::new(tag_to_rpc(&tag)))
    }

    async fn list_tags(
        &self,
        request: Request<proto::ListTagsRequest>,
    ) -> Result<Response<proto::ListTagsResponse>, Status> {
        let req = request.into_inner();
        let filter = TagFilter {
            page: req.page.map(i64::from),
            page_size: req.page_size.map(i64::from),
            search: req.search,
        };

        let result = self.tags.list(&filter).await.map_err(status_from_core)?;
        Ok(Response::new(proto::ListTagsResponse {
            items: result.items.iter().map(tag_to_rpc).collect(),
            total: result.total,
            page: result.page as i32,
            page_size: result.page_size as i32,
        }))
    }

    async fn create_tag(
        &self,
        request: Request<proto::CreateTagRequest>,
    ) -> Result<Response<proto::Tag>, Status> {
        let req = request.into_inner();
        let input = CreateTag {
            name: req.name,
            description: req.description,
            color: req.color,
        };

        let tag = self.tags.create(input).await.map_err(status_from_core)?;
        Ok(Response::new(tag_to_rpc(&tag)))
    }

    async fn update_tag(
        &self,
        request: Request<proto::UpdateTagRequest>,
    ) -> Result<Response<proto::Tag>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "tag id")?;
        let input = UpdateTag {
            name: req.name,
            description: req.description,
            color: req.color,
        };

        let tag = self.tags.update(id, input).await.map_err(status_from_core)?;
        Ok(Response::new(tag_to_rpc(&tag)))
    }

    async fn delete_tag(
        &self,
        request: Request<proto::DeleteTagRequest>,
    ) -> Result<Response<proto::DeleteTagResponse>, Status> {
        let req = request.into_inner();
        let id = parse_id(&req.id, "tag id")?;
        self.tags.remove(id).await.map_err(status_from_core)?;
        Ok(Response::new(proto::DeleteTagResponse {}))
    }
}
