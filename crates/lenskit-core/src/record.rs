//! Record (node) types and identities

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Record type label, `"<app>.<model>"` in lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordType(String);

impl RecordType {
    /// Parse and normalize a record type label
    pub fn parse(label: &str) -> Result<Self> {
        let label = label.trim();
        match label.split_once('.') {
            Some((app, model)) if !app.is_empty() && !model.is_empty() && !model.contains('.') => {
                Ok(Self(label.to_lowercase()))
            }
            _ => Err(Error::InvalidRecordType(label.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Model part of the label (`"item"` for `"shop.item"`)
    pub fn model_name(&self) -> &str {
        self.0.split_once('.').map(|(_, model)| model).unwrap_or(&self.0)
    }
}

impl TryFrom<String> for RecordType {
    type Error = Error;

    fn try_from(label: String) -> Result<Self> {
        Self::parse(&label)
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        t.0
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary key of a record
///
/// Variant order matters for deserialization: numbers become `Int`, strings
/// that parse as a UUID become `Uuid`, everything else is `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    Int(i64),
    Uuid(Uuid),
    Text(String),
}

impl PrimaryKey {
    /// Parse a key from user input (integer, then UUID, then text)
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            Self::Int(n)
        } else if let Ok(id) = Uuid::parse_str(s) {
            Self::Uuid(id)
        } else {
            Self::Text(s.to_string())
        }
    }

    /// Interpret a field value as a key reference
    ///
    /// Returns `Ok(None)` for `null`, an error for values that cannot be keys.
    pub fn from_json(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_i64()
                .map(|n| Some(Self::Int(n)))
                .ok_or_else(|| Error::Integrity(format!("non-integer key reference: {}", n))),
            Value::String(s) => Ok(Some(match Uuid::parse_str(s) {
                Ok(id) => Self::Uuid(id),
                Err(_) => Self::Text(s.clone()),
            })),
            other => Err(Error::Integrity(format!(
                "value is not a key reference: {}",
                other
            ))),
        }
    }

    /// Whether a stored field value references this key
    pub fn is_referenced_by(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => items
                .iter()
                .any(|item| matches!(Self::from_json(item), Ok(Some(ref pk)) if pk == self)),
            other => matches!(Self::from_json(other), Ok(Some(ref pk)) if pk == self),
        }
    }
}

impl std::fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Uuid(id) => write!(f, "{}", id),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for PrimaryKey {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for PrimaryKey {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<Uuid> for PrimaryKey {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl From<&str> for PrimaryKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Deduplication key of a record: its type plus its primary key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdentity {
    pub record_type: RecordType,
    pub pk: PrimaryKey,
}

impl std::fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.record_type, self.pk)
    }
}

/// A stored record, shaped like a fixture entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "model")]
    pub record_type: RecordType,

    pub pk: PrimaryKey,

    /// Field values; link fields hold keys (or arrays of keys)
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(record_type: RecordType, pk: impl Into<PrimaryKey>) -> Self {
        Self {
            record_type,
            pk: pk.into(),
            fields: Map::new(),
        }
    }

    /// Set a field value
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn identity(&self) -> NodeIdentity {
        NodeIdentity {
            record_type: self.record_type.clone(),
            pk: self.pk.clone(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
