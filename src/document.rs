use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::hash::{Hash, Hasher};
use ulid::Ulid;

/// Reserved body key carrying the document id in the merged view.
pub const ID_PATH: &str = "_id";

///
/// Document
///
/// One stored row: a unique id plus a JSON object body. Equality and
/// hashing are defined over the merged view (`_id` injected into the
/// body) and computed from decoded JSON, so two differently formatted
/// but semantically equal bodies compare equal.
///

#[derive(Clone, Debug)]
pub struct Document {
    id: String,
    body: Map<String, Value>,
}

impl Document {
    /// Build a document from a body map, taking the id from the reserved
    /// `_id` key or generating a ULID when the key is absent or not a
    /// string.
    #[must_use]
    pub fn new(mut body: Map<String, Value>) -> Self {
        let id = match body.remove(ID_PATH) {
            Some(Value::String(id)) => id,
            _ => Ulid::new().to_string(),
        };

        Self { id, body }
    }

    /// Build a document with an explicit id. A reserved `_id` key inside
    /// the body is dropped in favor of the explicit id.
    #[must_use]
    pub fn with_id(id: impl Into<String>, mut body: Map<String, Value>) -> Self {
        body.remove(ID_PATH);

        Self {
            id: id.into(),
            body,
        }
    }

    /// Decode a body column returned by the engine.
    pub(crate) fn from_row(id: String, body_json: &str) -> Result<Self, serde_json::Error> {
        let body: Map<String, Value> = serde_json::from_str(body_json)?;

        Ok(Self::with_id(id, body))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Body with the id injected under `_id`.
    #[must_use]
    pub fn merged(&self) -> Map<String, Value> {
        let mut merged = self.body.clone();
        merged.insert(ID_PATH.to_string(), Value::String(self.id.clone()));

        merged
    }

    /// Serialized body, as bound into insert/replace parameters.
    pub(crate) fn body_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.body)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.body == other.body
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);

        // Map keys are sorted, so the serialized form is identical for
        // equal bodies.
        if let Ok(json) = serde_json::to_string(&self.body) {
            json.hash(state);
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.merged().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = Map::deserialize(deserializer)?;

        Ok(Self::new(body))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object body")
    }

    #[test]
    fn takes_id_from_reserved_key() {
        let doc = Document::new(body(json!({ "_id": "user-1", "name": "Magnus" })));

        assert_eq!(doc.id(), "user-1");
        assert!(!doc.body().contains_key(ID_PATH));
    }

    #[test]
    fn generates_id_when_absent() {
        let a = Document::new(body(json!({ "name": "Magnus" })));
        let b = Document::new(body(json!({ "name": "Magnus" })));

        assert!(!a.id().is_empty());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn generates_id_when_reserved_key_is_not_a_string() {
        let doc = Document::new(body(json!({ "_id": 42, "name": "Magnus" })));

        assert!(!doc.id().is_empty());
        assert_ne!(doc.id(), "42");
        assert!(!doc.body().contains_key(ID_PATH));
    }

    #[test]
    fn explicit_id_wins_over_reserved_key() {
        let doc = Document::with_id("outer", body(json!({ "_id": "inner", "age": 27 })));

        assert_eq!(doc.id(), "outer");
        assert!(!doc.body().contains_key(ID_PATH));
    }

    #[test]
    fn equality_ignores_formatting() {
        let a = Document::from_row("u".to_string(), r#"{"age":27,"name":"Magnus"}"#).unwrap();
        let b = Document::from_row("u".to_string(), r#"{ "name": "Magnus", "age": 27 }"#).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn equality_covers_the_id() {
        let a = Document::with_id("a", body(json!({ "age": 27 })));
        let b = Document::with_id("b", body(json!({ "age": 27 })));

        assert_ne!(a, b);
    }

    #[test]
    fn merged_view_contains_the_id() {
        let doc = Document::with_id("user-1", body(json!({ "age": 27 })));
        let merged = doc.merged();

        assert_eq!(merged.get(ID_PATH), Some(&json!("user-1")));
        assert_eq!(merged.get("age"), Some(&json!(27)));
    }

    #[test]
    fn serde_round_trip_preserves_identity() {
        let doc = Document::with_id("user-1", body(json!({ "age": 27 })));
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();

        assert_eq!(doc, back);
    }
}
