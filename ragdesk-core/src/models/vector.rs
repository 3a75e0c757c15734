use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FlexibleId;

/// A collection in the vector database, as reported by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorCollection {
    pub name: String,
    pub vectors_count: u64,
    pub indexed_vectors_count: u64,
    pub points_count: u64,
    pub segments_count: u64,
    pub status: String,
    pub optimizer_status: String,
    pub disk_data_size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorCollectionsResponse {
    pub success: bool,
    pub collections: Vec<VectorCollection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorCollectionStats {
    pub success: bool,
    pub collection: VectorCollection,
    pub payload_schema: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorSearchParams {
    pub query: String,
    pub top_k: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorPayload {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<FlexibleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorSearchResult {
    pub id: FlexibleId,
    pub score: f64,
    pub payload: VectorPayload,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorSearchResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<VectorSearchResult>,
    pub time_ms: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_ms: Option<f64>,
}

/// Maintenance operations on a collection; each maps to `POST /api/vector/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorAction {
    Optimize,
    Rebuild,
    Backup,
}

impl VectorAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            VectorAction::Optimize => "optimize",
            VectorAction::Rebuild => "rebuild",
            VectorAction::Backup => "backup",
        }
    }
}
