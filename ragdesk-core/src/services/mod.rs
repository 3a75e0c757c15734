//! One module per backend area; each adds methods to `ApiClient`.
//!
//! Every method takes the `Session` it acts for. Endpoints the backend does
//! not serve yet return empty results without touching the network.

pub mod analytics;
pub mod auth;
pub mod conversations;
pub mod documents;
pub mod rag;
pub mod settings;
pub mod system;
pub mod users;
pub mod vector;

pub use documents::ProgressFn;

/// Filter params plus `format`, as one query string object.
pub(crate) fn export_query<P: serde::Serialize, F: serde::Serialize>(
    params: &P,
    format: F,
) -> serde_json::Value {
    let mut query = serde_json::to_value(params).unwrap_or_else(|_| serde_json::json!({}));
    if let Some(obj) = query.as_object_mut() {
        obj.insert(
            "format".to_string(),
            serde_json::to_value(format).unwrap_or(serde_json::Value::Null),
        );
    }
    query
}
