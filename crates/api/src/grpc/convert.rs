//! Conversions between the internal model and the `depot.v1` wire shapes.
//!
//! Status enums exist twice: the internal closed enums and the wire enums
//! with numeric codes where 0 is always `UNSPECIFIED`. Internal-to-wire is
//! total; wire-to-internal is partial and falls back to the first
//! substantive value for `UNSPECIFIED` or unrecognized codes, so callers
//! must not rely on round-tripping unknown codes.

use std::collections::HashMap;

use depot_core::error::CoreError;
use depot_core::structure::{self, StructureView};
use depot_core::types::DbId;
use depot_db::models::project::{LifecycleStage, Project, ProjectStatus};
use depot_db::models::release::{Release, ReleaseStatus};
use depot_db::models::tag::Tag;
use serde_json::{json, Value};
use tonic::Status;
use uuid::Uuid;

use super::proto;

/// Map a domain failure onto a gRPC status code.
pub fn status_from_core(err: CoreError) -> Status {
    match &err {
        CoreError::NotFound { .. } => Status::not_found(err.to_string()),
        CoreError::Conflict(_) => Status::already_exists(err.to_string()),
        CoreError::Validation(_) => Status::invalid_argument(err.to_string()),
        CoreError::Internal(_) => Status::internal(err.to_string()),
    }
}

/// Parse a wire id, rejecting malformed UUIDs.
pub fn parse_id(raw: &str, field: &str) -> Result<DbId, Status> {
    Uuid::parse_str(raw)
        .map_err(|_| Status::invalid_argument(format!("Invalid {field}: '{raw}'")))
}

// ---------------------------------------------------------------------------
// Enum mapping tables
// ---------------------------------------------------------------------------

pub fn project_status_to_rpc(status: ProjectStatus) -> proto::ProjectStatus {
    match status {
        ProjectStatus::Active => proto::ProjectStatus::Active,
        ProjectStatus::Archived => proto::ProjectStatus::Archived,
        ProjectStatus::Suspended => proto::ProjectStatus::Suspended,
    }
}

pub fn project_status_from_rpc(code: i32) -> ProjectStatus {
    match proto::ProjectStatus::try_from(code) {
        Ok(proto::ProjectStatus::Archived) => ProjectStatus::Archived,
        Ok(proto::ProjectStatus::Suspended) => ProjectStatus::Suspended,
        _ => ProjectStatus::Active,
    }
}

pub fn lifecycle_stage_to_rpc(stage: LifecycleStage) -> proto::LifecycleStage {
    match stage {
        LifecycleStage::Development => proto::LifecycleStage::Development,
        LifecycleStage::Testing => proto::LifecycleStage::Testing,
        LifecycleStage::Staging => proto::LifecycleStage::Staging,
        LifecycleStage::Production => proto::LifecycleStage::Production,
    }
}

pub fn lifecycle_stage_from_rpc(code: i32) -> LifecycleStage {
    match proto::LifecycleStage::try_from(code) {
        Ok(proto::LifecycleStage::Testing) => LifecycleStage::Testing,
        Ok(proto::LifecycleStage::Staging) => LifecycleStage::Staging,
        Ok(proto::LifecycleStage::Production) => LifecycleStage::Production,
        _ => LifecycleStage::Development,
    }
}

pub fn release_status_to_rpc(status: ReleaseStatus) -> proto::ReleaseStatus {
    match status {
        ReleaseStatus::Draft => proto::ReleaseStatus::Draft,
        ReleaseStatus::Created => proto::ReleaseStatus::Created,
        ReleaseStatus::Delivering => proto::ReleaseStatus::Delivering,
        ReleaseStatus::Delivered => proto::ReleaseStatus::Delivered,
        ReleaseStatus::Failed => proto::ReleaseStatus::Failed,
    }
}

pub fn release_status_from_rpc(code: i32) -> ReleaseStatus {
    match proto::ReleaseStatus::try_from(code) {
        Ok(proto::ReleaseStatus::Created) => ReleaseStatus::Created,
        Ok(proto::ReleaseStatus::Delivering) => ReleaseStatus::Delivering,
        Ok(proto::ReleaseStatus::Delivered) => ReleaseStatus::Delivered,
        Ok(proto::ReleaseStatus::Failed) => ReleaseStatus::Failed,
        // UNSPECIFIED, the extended-profile codes this build does not store
        // (scheduled, deployed, rolled back, cancelled), and unknown codes
        // all land on the initial state.
        _ => ReleaseStatus::Draft,
    }
}

// ---------------------------------------------------------------------------
// Metadata maps
// ---------------------------------------------------------------------------

/// Project a jsonb document into the wire `map<string, string>`.
///
/// String values pass through; anything else is rendered as JSON text.
pub fn metadata_to_rpc(value: &Value) -> HashMap<String, String> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect(),
        _ => HashMap::new(),
    }
}

pub fn metadata_from_rpc(map: &HashMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

pub fn project_to_rpc(project: &Project) -> proto::Project {
    proto::Project {
        id: project.id.to_string(),
        name: project.name.clone(),
        slug: project.slug.clone(),
        description: project.description.clone().unwrap_or_default(),
        status: project_status_to_rpc(project.status).into(),
        owner_id: project
            .owner_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        lifecycle_stages: project
            .lifecycle_stages
            .iter()
            .map(|stage| lifecycle_stage_to_rpc(*stage).into())
            .collect(),
        tag_ids: project.tags.iter().map(|tag| tag.id.to_string()).collect(),
        metadata: metadata_to_rpc(&project.metadata),
        created_at: project.created_at.to_rfc3339(),
        updated_at: project.updated_at.to_rfc3339(),
    }
}

pub fn release_to_rpc(release: &Release) -> proto::Release {
    proto::Release {
        id: release.id.to_string(),
        project_id: release.project_id.to_string(),
        version: release.version.clone(),
        snapshot_id: release
            .snapshot_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        status: release_status_to_rpc(release.status).into(),
        changelog: release.changelog.clone().unwrap_or_default(),
        notes: release.notes.clone().unwrap_or_default(),
        structure: stored_structure_to_rpc(&release.structure),
        metadata: metadata_to_rpc(&release.metadata),
        created_at: release.created_at.to_rfc3339(),
        updated_at: release.updated_at.to_rfc3339(),
    }
}

pub fn tag_to_rpc(tag: &Tag) -> proto::Tag {
    proto::Tag {
        id: tag.id.to_string(),
        name: tag.name.clone(),
        description: tag.description.clone().unwrap_or_default(),
        color: tag.color.clone().unwrap_or_default(),
        created_at: tag.created_at.to_rfc3339(),
        updated_at: tag.updated_at.to_rfc3339(),
    }
}

// ---------------------------------------------------------------------------
// Structure documents
// ---------------------------------------------------------------------------

/// Best-effort projection of a stored structure document into the wire
/// message. Only `config` and `metadata` survive here; the identity fields
/// are filled by `GetReleaseStructure`.
fn stored_structure_to_rpc(stored: &Value) -> Option<proto::ReleaseStructure> {
    if structure::is_absent(stored) {
        return None;
    }
    Some(proto::ReleaseStructure {
        project_id: String::new(),
        project_name: String::new(),
        version: String::new(),
        snapshot_id: String::new(),
        config: Some(config_to_rpc(stored.get("config"))),
        metadata: stored
            .get("metadata")
            .map(metadata_to_rpc)
            .unwrap_or_default(),
    })
}

pub fn structure_view_to_rpc(view: &StructureView) -> proto::ReleaseStructure {
    proto::ReleaseStructure {
        project_id: view.project_id.to_string(),
        project_name: view.project_name.clone(),
        version: view.version.clone(),
        snapshot_id: view
            .snapshot_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        config: Some(config_to_rpc(Some(&view.config))),
        metadata: metadata_to_rpc(&view.metadata),
    }
}

fn config_to_rpc(config: Option<&Value>) -> proto::ReleaseConfig {
    let Some(config) = config else {
        return proto::ReleaseConfig::default();
    };

    let processes = config
        .get("processes")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|process| proto::ProcessSpec {
                    id: str_field(process, "id"),
                    name: str_field(process, "name"),
                    config: process
                        .get("config")
                        .map(metadata_to_rpc)
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    let variables = config
        .get("variables")
        .map(metadata_to_rpc)
        .unwrap_or_default();

    let assets = config
        .get("assets")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|asset| proto::AssetSpec {
                    id: str_field(asset, "id"),
                    name: str_field(asset, "name"),
                    url: str_field(asset, "url"),
                    metadata: asset
                        .get("metadata")
                        .map(metadata_to_rpc)
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    proto::ReleaseConfig {
        processes,
        variables,
        assets,
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Convert an inbound wire structure into the stored jsonb document.
pub fn structure_from_rpc(structure: &proto::ReleaseStructure) -> Value {
    let config = structure
        .config
        .as_ref()
        .map(|config| {
            json!({
                "processes": config
                    .processes
                    .iter()
                    .map(|p| json!({"id": p.id, "name": p.name, "config": p.config}))
                    .collect::<Vec<_>>(),
                "variables": config.variables,
                "assets": config
                    .assets
                    .iter()
                    .map(|a| json!({
                        "id": a.id,
                        "name": a.name,
                        "url": a.url,
                        "metadata": a.metadata,
                    }))
                    .collect::<Vec<_>>(),
            })
        })
        .unwrap_or_else(|| json!({}));

    json!({
        "config": config,
        "metadata": structure.metadata,
    })
}
