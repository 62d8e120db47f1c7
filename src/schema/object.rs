use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{expect_array, expect_length, screen_null, Decode, Encode, Packer, Phase, Schema};
use crate::classify::kind_name;
use crate::error::{DecodeError, EncodeError, ErrorKind};
use crate::path::Path;

/// A keyed record whose envelope is a positional array.
///
/// The declared key order is the only link between positions and keys on the
/// wire, so it is kept exactly as given to [`super::object`] no matter how
/// many bindings are added afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    keys: Vec<String>,
    shape: IndexMap<String, Arc<Schema>>,
    nullable: bool,
}

impl ObjectSchema {
    pub fn new<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> Self {
        Self { keys: keys.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// Bind (or rebind) the child node for one key.
    pub fn with_key(&self, key: impl Into<String>, node: impl Into<Schema>) -> Self {
        let mut out = self.clone();
        out.shape.insert(key.into(), Arc::new(node.into()));
        out
    }

    /// Bind many keys at once; later entries win over earlier bindings.
    pub fn with_shape<K, S>(&self, shape: impl IntoIterator<Item = (K, S)>) -> Self
    where
        K: Into<String>,
        S: Into<Schema>,
    {
        let mut out = self.clone();
        out.shape.extend(shape.into_iter().map(|(key, node)| (key.into(), Arc::new(node.into()))));
        out
    }

    /// Declared keys in envelope order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Bound children in binding order. May include keys that were never
    /// declared; those are ignored by encode/decode.
    pub fn shape(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.shape.iter().map(|(key, node)| (key.as_str(), node.as_ref()))
    }

    pub fn child(&self, key: &str) -> Option<&Schema> {
        self.shape.get(key).map(Arc::as_ref)
    }

    /// `path` must already end with `key`.
    fn child_at<P: Phase>(&self, key: &str, path: &Path) -> Result<&Schema, P::Error> {
        self.child(key).ok_or_else(|| P::fail(ErrorKind::UndefinedKey { key: key.to_string() }, path))
    }
}

impl Packer for ObjectSchema {
    fn encode_at(&self, value: &Value, path: &mut Path) -> Result<Value, EncodeError> {
        if let Some(out) = screen_null::<Encode>(value, self.nullable, "object", path) {
            return out;
        }
        let Value::Object(record) = value else {
            // arrays land here too and are reported as "got array"
            return Err(Encode::fail(
                ErrorKind::TypeMismatch { expected: "object".to_string(), actual: kind_name(value) },
                path,
            ));
        };
        let mut envelope = Vec::with_capacity(self.keys.len());
        for key in &self.keys {
            let packed = path.descend(key.as_str(), |path| {
                let node = self.child_at::<Encode>(key, path)?;
                // a declared key must be present, even when its node is nullable
                let field = record
                    .get(key)
                    .ok_or_else(|| Encode::fail(ErrorKind::MissingField { field: key.clone() }, path))?;
                node.encode_at(field, path)
            })?;
            envelope.push(packed);
        }
        Ok(Value::Array(envelope))
    }

    fn decode_at(&self, envelope: &Value, path: &mut Path) -> Result<Value, DecodeError> {
        if let Some(out) = screen_null::<Decode>(envelope, self.nullable, "object", path) {
            return out;
        }
        let items = expect_array::<Decode>(envelope, "array", path)?;
        expect_length::<Decode>(items, "array", self.keys.len(), path)?;
        let mut record = Map::with_capacity(self.keys.len());
        for (key, item) in self.keys.iter().zip(items) {
            let field = path.descend(key.as_str(), |path| {
                self.child_at::<Decode>(key, path)?.decode_at(item, path)
            })?;
            record.insert(key.clone(), field);
        }
        Ok(Value::Object(record))
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn to_nullable(&self, nullable: bool) -> Self {
        Self { nullable, ..self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::PrimitiveKind::{Number, String as Str};
    use crate::path::Segment;
    use crate::schema::{object, primitive};
    use serde_json::json;

    fn user() -> ObjectSchema {
        object(["id", "name"]).with_shape([("id", primitive([Number])), ("name", primitive([Str]))])
    }

    #[test]
    fn packs_to_declared_key_order() {
        assert_eq!(user().encode(&json!({"name": "Ada", "id": 1})).unwrap(), json!([1, "Ada"]));
        assert_eq!(user().decode(&json!([2, "Bob"])).unwrap(), json!({"id": 2, "name": "Bob"}));
    }

    #[test]
    fn decoded_record_follows_declared_order() {
        let decoded = object(["z", "a"])
            .with_key("a", primitive([Number]))
            .with_key("z", primitive([Number]))
            .decode(&json!([1, 2]))
            .unwrap();
        let keys: Vec<_> = decoded.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn nested_failure_points_at_key() {
        let err = user().encode(&json!({"id": 1, "name": 123})).unwrap_err();
        assert_eq!(err.path().segments(), &[Segment::from("name")]);
        assert_eq!(err.message(), "expected string, got number");
    }

    #[test]
    fn arrays_get_their_own_message() {
        let err = user().encode(&json!([1, "Ada"])).unwrap_err();
        assert_eq!(err.message(), "expected object, got array");
        let err = user().encode(&json!("Ada")).unwrap_err();
        assert_eq!(err.message(), "expected object, got string");
    }

    #[test]
    fn absent_fields_are_rejected_even_when_nullable() {
        let node = object(["id", "note"])
            .with_key("id", primitive([Number]))
            .with_key("note", primitive([Str]).nullable());
        let err = node.encode(&json!({"id": 7})).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MissingField { field: "note".into() });
        assert_eq!(err.to_string(), "missing note field at $.note");

        let packed = node.encode(&json!({"id": 7, "note": null})).unwrap();
        assert_eq!(packed, json!([7, null]));
        assert_eq!(node.decode(&packed).unwrap(), json!({"id": 7, "note": null}));

        let err = user().encode(&json!({"id": 7})).unwrap_err();
        assert_eq!(err.path(), &Path::root().child("name"));
    }

    #[test]
    fn decode_checks_envelope_length() {
        let err = user().decode(&json!([1])).unwrap_err();
        assert_eq!(err.message(), "expected array of length 2, got length 1");
        let err = user().decode(&json!({"id": 1})).unwrap_err();
        assert_eq!(err.message(), "expected array, got object");
    }

    #[test]
    fn unbound_key_fails_at_that_key() {
        let partial = object(["id", "name"]).with_key("id", primitive([Number]));
        let err = partial.encode(&json!({"id": 1, "name": "x"})).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UndefinedKey { key: "name".into() });
        assert_eq!(err.path(), &Path::root().child("name"));

        let err = partial.decode(&json!([1, "x"])).unwrap_err();
        assert_eq!(err.path(), &Path::root().child("name"));
    }

    #[test]
    fn null_handling_precedes_shape_checks() {
        let err = user().decode(&Value::Null).unwrap_err();
        assert_eq!(err.message(), "expected object, got null");
        assert_eq!(user().nullable().decode(&Value::Null).unwrap(), Value::Null);
        assert_eq!(user().nullable().encode(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn extension_leaves_earlier_stage_untouched() {
        let base = object(["id", "name"]).with_key("id", primitive([Number]));
        let full = base.with_key("name", primitive([Str]));
        assert!(base.child("name").is_none());
        assert!(full.child("name").is_some());
        assert_eq!(base.keys().collect::<Vec<_>>(), full.keys().collect::<Vec<_>>());
    }
}
