use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One item returned by a list endpoint. The console never validates its
/// shape; display code only reaches into it through [`Entity::field`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(pub Value);

impl Entity {
    pub fn field(&self, path: &str) -> FieldValue {
        resolve_field(&self.0, path)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Entity {
    fn from(v: Value) -> Self {
        Entity(v)
    }
}

/// The record collections the backend exposes as lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Accounts,
    Users,
    Domains,
    Tokens,
    Places,
    Requests,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Accounts,
        EntityKind::Users,
        EntityKind::Domains,
        EntityKind::Tokens,
        EntityKind::Places,
        EntityKind::Requests,
    ];

    /// Path of the list endpoint.
    pub fn list_path(self) -> &'static str {
        match self {
            EntityKind::Accounts => "/api/v1/accounts",
            EntityKind::Users => "/api/v1/users",
            EntityKind::Domains => "/api/v1/domains",
            EntityKind::Tokens => "/api/v1/tokens",
            EntityKind::Places => "/api/v1/places",
            EntityKind::Requests => "/api/v1/requests",
        }
    }

    /// Member of the response `data` object that holds the list.
    pub fn field_name(self) -> &'static str {
        match self {
            EntityKind::Accounts => "accounts",
            EntityKind::Users => "users",
            EntityKind::Domains => "domains",
            EntityKind::Tokens => "tokens",
            EntityKind::Places => "places",
            EntityKind::Requests => "requests",
        }
    }

    /// Style tag added to the rendered table.
    pub fn table_class(self) -> &'static str {
        match self {
            EntityKind::Accounts | EntityKind::Users => "v-acct-table",
            EntityKind::Domains => "v-domain-table",
            EntityKind::Tokens => "v-token-table",
            EntityKind::Places => "v-place-table",
            EntityKind::Requests => "v-request-table",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.field_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown entity kind: {}", s))
    }
}

/// A field read out of an entity, tagged by JSON kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null,
    /// The path did not lead to a value.
    Missing,
    List(Vec<FieldValue>),
    Mapping(serde_json::Map<String, Value>),
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// True for the kinds that stringify directly into a cell.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            FieldValue::Text(_) | FieldValue::Number(_) | FieldValue::Bool(_)
        )
    }
}

impl From<&Value> for FieldValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => FieldValue::Number(n.clone()),
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Null => FieldValue::Null,
            Value::Array(items) => FieldValue::List(items.iter().map(FieldValue::from).collect()),
            Value::Object(map) => FieldValue::Mapping(map.clone()),
        }
    }
}

/// Walk `record` along the dot-separated `path`.
///
/// Each segment must name a member of a JSON object; hitting a missing member
/// or a non-object before the path is exhausted yields [`FieldValue::Missing`].
pub fn resolve_field(record: &Value, path: &str) -> FieldValue {
    lookup(record, path).map_or(FieldValue::Missing, FieldValue::from)
}

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |current, segment| current.as_object()?.get(segment))
}
