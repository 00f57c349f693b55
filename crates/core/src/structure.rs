//! Release structure documents.
//!
//! A release stores an opaque JSON document describing its processes,
//! variables, and assets. The catalogue never interprets the document beyond
//! two points: deciding whether it is absent, and shaping it into the
//! [`StructureView`] returned by the structure endpoint, filling in defaults
//! for missing sub-keys.

use serde::Serialize;
use serde_json::{json, Value};

use crate::types::DbId;

/// A structure document is absent when it is null or an empty object.
pub fn is_absent(structure: &Value) -> bool {
    match structure {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// The default `config` sub-document used when the stored structure lacks one.
pub fn default_config() -> Value {
    json!({
        "processes": [],
        "variables": {},
        "assets": [],
    })
}

/// The caller-facing shape of a release's structure.
#[derive(Debug, Clone, Serialize)]
pub struct StructureView {
    pub project_id: DbId,
    pub project_name: String,
    pub version: String,
    pub snapshot_id: Option<DbId>,
    pub config: Value,
    pub metadata: Value,
}

impl StructureView {
    /// Shape a stored structure document into the view, defaulting `config`
    /// and `metadata` when the document lacks them.
    pub fn from_stored(
        project_id: DbId,
        project_name: String,
        version: String,
        snapshot_id: Option<DbId>,
        stored: &Value,
    ) -> Self {
        let config = stored
            .get("config")
            .cloned()
            .unwrap_or_else(default_config);
        let metadata = stored
            .get("metadata")
            .cloned()
            .unwrap_or_else(|| json!({}));

        StructureView {
            project_id,
            project_name,
            version,
            snapshot_id,
            config,
            metadata,
        }
    }
}
