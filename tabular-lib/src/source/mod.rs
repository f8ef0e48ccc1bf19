//! Data-source boundary.
//!
//! The engine operates on in-memory snapshots and performs no I/O; hosts
//! implement [`RowSource`] over their service layer and hand the response
//! to a [`RowMapper`], which normalizes heterogeneous backend payloads
//! (varying id spellings, nested vs. flat association shapes, date
//! strings) into canonical [`Row`]s before the engine ever sees them.
//! Credentials are an injected [`Credential`] context passed to the
//! fetch boundary; nothing downstream of it reads them.

use async_trait::async_trait;
use serde::Deserialize;

use crate::model::Row;
use crate::model::RowId;
use crate::model::json_to_value;

/// Error type for the data-source boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// The backend answered but reported failure.
    #[error("backend reported failure: {0}")]
    Backend(String),

    /// The request itself failed (network, serialization).
    #[error("transport error: {0}")]
    Transport(String),

    /// A payload record is not a JSON object.
    #[error("payload record is not an object: {0}")]
    NotAnObject(String),

    /// A payload record carries no usable identifier.
    #[error("payload record has no usable id field")]
    MissingId,
}

/// An injected credential context for the fetch boundary.
///
/// Sources receive it explicitly on every fetch instead of reading a
/// token from ambient shared storage. `Debug` redacts the token.
#[derive(Clone)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Wraps a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Returns the bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").field("token", &"***").finish()
    }
}

/// Server-side pagination metadata, passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// The two payload shapes backends answer with: a bare row list, or an
/// envelope with items plus pagination metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Rows(Vec<serde_json::Value>),
    Paged {
        items: Vec<serde_json::Value>,
        pagination: PageInfo,
    },
}

impl Payload {
    /// Returns the raw records regardless of envelope shape.
    pub fn into_records(self) -> Vec<serde_json::Value> {
        match self {
            Payload::Rows(records) => records,
            Payload::Paged { items, .. } => items,
        }
    }
}

/// A backend response as the host's service layer delivers it.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceResponse {
    pub success: bool,
    pub data: Payload,
    #[serde(default)]
    pub message: Option<String>,
}

/// An opaque producer of snapshots.
///
/// The engine never retries, caches, or paginates server-side through
/// this trait; it only asks for a fresh snapshot.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetches the current row set from the backend.
    async fn fetch(&self, credential: &Credential) -> Result<SourceResponse, SourceError>;
}

/// Normalizes raw backend records into canonical rows.
///
/// One mapper per table definition replaces ad hoc per-screen field
/// probing: identifier spellings and renamed fields are declared once,
/// and every record passes through the same conversion
/// ([`json_to_value`]) so dates sort chronologically and nested objects
/// stay reachable via dot paths.
///
/// # Example
///
/// ```
/// use tabular_lib::source::RowMapper;
///
/// let mapper = RowMapper::new()
///     .id_field("product_id")
///     .alias("categoryName", "category");
///
/// let record = serde_json::json!({ "product_id": 7, "categoryName": "Kitchen" });
/// let row = mapper.normalize(&record)?;
/// assert_eq!(row.id(), &7.into());
/// assert_eq!(row.value_at("category").unwrap().as_str(), Some("Kitchen"));
/// # Ok::<(), tabular_lib::source::SourceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RowMapper {
    id_fields: Vec<String>,
    aliases: Vec<(String, String)>,
}

impl Default for RowMapper {
    fn default() -> Self {
        Self {
            id_fields: vec!["id".to_string(), "_id".to_string()],
            aliases: Vec::new(),
        }
    }
}

impl RowMapper {
    /// Creates a mapper accepting `id` and `_id` as identifier fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an identifier field checked before the defaults.
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_fields.insert(0, field.into());
        self
    }

    /// Renames a source field to a canonical field name.
    pub fn alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.push((from.into(), to.into()));
        self
    }

    /// Normalizes one raw record into a canonical row.
    pub fn normalize(&self, record: &serde_json::Value) -> Result<Row, SourceError> {
        let serde_json::Value::Object(map) = record else {
            return Err(SourceError::NotAnObject(record.to_string()));
        };

        let id = self.extract_id(map).ok_or(SourceError::MissingId)?;
        let mut row = Row::new(id);
        for (key, value) in map {
            let key = self
                .aliases
                .iter()
                .find(|(from, _)| from == key)
                .map(|(_, to)| to.clone())
                .unwrap_or_else(|| key.clone());
            row.insert(key, json_to_value(value.clone()));
        }
        Ok(row)
    }

    /// Normalizes a whole backend response into rows.
    ///
    /// A response with `success: false` becomes [`SourceError::Backend`]
    /// carrying the backend's message.
    pub fn normalize_response(&self, response: SourceResponse) -> Result<Vec<Row>, SourceError> {
        if !response.success {
            return Err(SourceError::Backend(
                response.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        let records = response.data.into_records();
        log::debug!("normalizing {} backend records", records.len());
        records
            .iter()
            .map(|record| self.normalize(record))
            .collect()
    }

    fn extract_id(&self, map: &serde_json::Map<String, serde_json::Value>) -> Option<RowId> {
        for field in &self.id_fields {
            if let Some(id) = map.get(field).and_then(json_to_id) {
                return Some(id);
            }
        }
        // Fall back to any `*_id` key, in sorted order for determinism.
        let mut keys: Vec<&String> = map.keys().filter(|k| k.ends_with("_id")).collect();
        keys.sort();
        keys.into_iter()
            .find_map(|key| map.get(key).and_then(json_to_id))
    }
}

fn json_to_id(value: &serde_json::Value) -> Option<RowId> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().map(RowId::Int),
        serde_json::Value::String(s) => match uuid::Uuid::parse_str(s) {
            Ok(guid) => Some(RowId::Guid(guid)),
            Err(_) => Some(RowId::Str(s.clone())),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    #[test]
    fn test_accepted_id_spellings_normalize_identically() {
        let mapper = RowMapper::new().id_field("product_id");
        for record in [
            serde_json::json!({ "id": 7, "name": "Mug" }),
            serde_json::json!({ "_id": 7, "name": "Mug" }),
            serde_json::json!({ "product_id": 7, "name": "Mug" }),
        ] {
            let row = mapper.normalize(&record).unwrap();
            assert_eq!(row.id(), &7.into());
        }
    }

    #[test]
    fn test_fallback_to_suffixed_id_key() {
        let mapper = RowMapper::new();
        let record = serde_json::json!({ "order_id": 12, "total": 99 });
        let row = mapper.normalize(&record).unwrap();
        assert_eq!(row.id(), &12.into());
    }

    #[test]
    fn test_guid_ids_are_recognized() {
        let mapper = RowMapper::new();
        let record = serde_json::json!({ "id": "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8" });
        let row = mapper.normalize(&record).unwrap();
        assert!(matches!(row.id(), RowId::Guid(_)));
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let mapper = RowMapper::new();
        let record = serde_json::json!({ "name": "Mug" });
        assert!(matches!(
            mapper.normalize(&record),
            Err(SourceError::MissingId)
        ));
    }

    #[test]
    fn test_aliases_rename_fields() {
        let mapper = RowMapper::new().alias("categoryName", "category");
        let record = serde_json::json!({ "id": 1, "categoryName": "Kitchen" });
        let row = mapper.normalize(&record).unwrap();
        assert!(row.contains("category"));
        assert!(!row.contains("categoryName"));
    }

    #[test]
    fn test_nested_and_flat_category_shapes_stay_reachable() {
        let mapper = RowMapper::new().alias("categoryName", "category");

        let flat = mapper
            .normalize(&serde_json::json!({ "id": 1, "categoryName": "Kitchen" }))
            .unwrap();
        let nested = mapper
            .normalize(&serde_json::json!({ "id": 2, "category": { "name": "Kitchen" } }))
            .unwrap();

        assert_eq!(
            flat.value_at("category").unwrap().as_str(),
            Some("Kitchen")
        );
        assert_eq!(
            nested.value_at("category.name").unwrap().as_str(),
            Some("Kitchen")
        );
    }

    #[test]
    fn test_date_strings_become_datetimes() {
        let mapper = RowMapper::new();
        let record = serde_json::json!({ "id": 1, "created_at": "2026-02-01T09:00:00Z" });
        let row = mapper.normalize(&record).unwrap();
        assert!(matches!(
            row.get("created_at"),
            Some(Value::DateTime(_))
        ));
    }

    #[test]
    fn test_failed_response_surfaces_backend_message() {
        let mapper = RowMapper::new();
        let response = SourceResponse {
            success: false,
            data: Payload::Rows(Vec::new()),
            message: Some("session expired".to_string()),
        };
        assert!(matches!(
            mapper.normalize_response(response),
            Err(SourceError::Backend(message)) if message == "session expired"
        ));
    }

    #[test]
    fn test_paged_envelope_unwraps_items() {
        let mapper = RowMapper::new();
        let response: SourceResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "data": {
                "items": [{ "id": 1 }, { "id": 2 }],
                "pagination": { "page": 1, "total_pages": 1, "total_items": 2 }
            }
        }))
        .unwrap();
        let rows = mapper.normalize_response(response).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
