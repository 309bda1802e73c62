//! Record access.
//!
//! The engine reads records through the [`Record`] trait and never mutates
//! them. A record exposes two views: a flattened attribute form (what a host
//! table stores per row) and the raw nested object it was built from.

use std::fmt;

use serde_json::{Map, Value as JsonValue};

/// Identifier a record carries in its own data.
pub type RecordId = String;

/// Key of a record within the visibility partition.
///
/// Records are keyed by their own identifier. A record without one, or whose
/// identifier repeats an earlier record's, is keyed by its input position, so
/// every record has exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKey {
    /// The record's own identifier.
    Id(RecordId),
    /// Position of the record in the input collection.
    Row(usize),
}

impl RecordKey {
    /// Returns the identifier, if this key carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            RecordKey::Id(id) => Some(id),
            RecordKey::Row(_) => None,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => f.write_str(id),
            RecordKey::Row(index) => write!(f, "#{index}"),
        }
    }
}

/// Trait for types the filter engine can evaluate predicates against.
///
/// # Example
///
/// ```
/// use findings_filter::{Record, RecordId};
/// use serde_json::{json, Value};
///
/// struct Row {
///     id: u32,
///     raw: Value,
/// }
///
/// impl Record for Row {
///     fn record_id(&self) -> Option<RecordId> {
///         Some(self.id.to_string())
///     }
///
///     fn attribute(&self, name: &str) -> Option<&Value> {
///         self.raw.get(name)
///     }
///
///     fn raw(&self) -> &Value {
///         &self.raw
///     }
/// }
///
/// let row = Row { id: 7, raw: json!({"status": "pending"}) };
/// assert_eq!(row.attribute("status"), Some(&json!("pending")));
/// ```
pub trait Record {
    /// Returns the record's identifier, or `None` if it has none.
    fn record_id(&self) -> Option<RecordId>;

    /// Returns a flattened attribute, or `None` if the record lacks it.
    fn attribute(&self, name: &str) -> Option<&JsonValue>;

    /// Returns the unflattened nested form of the record.
    fn raw(&self) -> &JsonValue;
}

/// A plain JSON object is its own attribute map.
///
/// The identifier is the `id` key rendered as text. A null or empty `id`
/// counts as absent.
impl Record for JsonValue {
    fn record_id(&self) -> Option<RecordId> {
        id_of(self)
    }

    fn attribute(&self, name: &str) -> Option<&JsonValue> {
        self.get(name)
    }

    fn raw(&self) -> &JsonValue {
        self
    }
}

/// A security finding held in both flattened and raw form.
///
/// Flattening mirrors how a host table stores row attributes:
/// scalars are kept, arrays are stored as their JSON text, and nested
/// objects are flattened into `parent_child` keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    id: Option<RecordId>,
    attributes: Map<String, JsonValue>,
    raw: JsonValue,
}

impl Finding {
    /// Builds a finding from its raw JSON object.
    pub fn from_json(raw: JsonValue) -> Self {
        let mut attributes = Map::new();
        if let JsonValue::Object(map) = &raw {
            flatten_into(&mut attributes, None, map);
        }
        let id = id_of(&raw);
        Finding {
            id,
            attributes,
            raw,
        }
    }

    /// Returns the flattened attribute map.
    pub fn attributes(&self) -> &Map<String, JsonValue> {
        &self.attributes
    }
}

impl From<JsonValue> for Finding {
    fn from(raw: JsonValue) -> Self {
        Finding::from_json(raw)
    }
}

impl Record for Finding {
    fn record_id(&self) -> Option<RecordId> {
        self.id.clone()
    }

    fn attribute(&self, name: &str) -> Option<&JsonValue> {
        self.attributes.get(name)
    }

    fn raw(&self) -> &JsonValue {
        &self.raw
    }
}

fn id_of(raw: &JsonValue) -> Option<RecordId> {
    raw.get("id")
        .map(scalar_text)
        .filter(|id| !id.is_empty())
}

fn flatten_into(
    out: &mut Map<String, JsonValue>,
    prefix: Option<&str>,
    map: &Map<String, JsonValue>,
) {
    for (key, value) in map {
        let name = match prefix {
            Some(prefix) => format!("{prefix}_{key}"),
            None => key.clone(),
        };
        match value {
            JsonValue::Object(inner) => flatten_into(out, Some(name.as_str()), inner),
            JsonValue::Array(_) => {
                out.insert(name, JsonValue::String(value.to_string()));
            }
            scalar => {
                out.insert(name, scalar.clone());
            }
        }
    }
}

/// Renders a scalar JSON value as plain text (strings unquoted).
pub(crate) fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
