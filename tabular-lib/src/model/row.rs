//! Dynamic table row

use std::collections::HashMap;

use super::RowId;
use super::Value;

/// One record in the data set rendered by a table.
///
/// Rows hold field values as a `HashMap<String, Value>`, allowing dynamic
/// access to any field. The engine only ever reads rows; once a row enters
/// a [`RowStore`](crate::store::RowStore) it is treated as immutable.
///
/// # Example
///
/// ```
/// use tabular_lib::model::Row;
///
/// let row = Row::new(1)
///     .set("name", "Espresso machine")
///     .set("price", 249.99);
///
/// assert_eq!(row.value_at("name").unwrap().as_str(), Some("Espresso machine"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// The unique identifier of the row.
    pub(crate) id: RowId,

    /// The field values.
    pub(crate) fields: HashMap<String, Value>,
}

impl Row {
    /// Creates a new empty row with the given identifier.
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Returns the row identifier.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Sets a field value, consuming and returning the row (builder style).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Resolves a column key against this row.
    ///
    /// An exact field name wins; otherwise a dot-separated path
    /// (`category.name`) descends into nested [`Value::Json`] objects.
    /// Returns `None` when no field along the path exists.
    pub fn value_at(&self, path: &str) -> Option<Value> {
        if let Some(v) = self.fields.get(path) {
            return Some(v.clone());
        }

        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?.clone();
        for segment in segments {
            let Value::Json(serde_json::Value::Object(map)) = &current else {
                return None;
            };
            current = json_to_value(map.get(segment)?.clone());
        }
        Some(current)
    }
}

/// Converts a raw JSON value into the engine's [`Value`] representation.
///
/// Scalars map to typed variants; RFC 3339 strings become datetimes so
/// date columns sort chronologically; objects and arrays stay as
/// [`Value::Json`] for path lookups.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Bool(v),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => match chrono::DateTime::parse_from_rfc3339(&s) {
            Ok(dt) => Value::DateTime(dt.with_timezone(&chrono::Utc)),
            Err(_) => Value::String(s),
        },
        other => Value::Json(other),
    }
}
