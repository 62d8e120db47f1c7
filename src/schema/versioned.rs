use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{expect_array, expect_length, screen_null, Decode, Encode, Packer, Phase, Schema};
use crate::classify::{kind_name, Literal};
use crate::error::{DecodeError, EncodeError, ErrorKind, SchemaError};
use crate::path::Path;

const ENVELOPE: &str = "array of [version, envelope]";

/// A union dispatched on a `version` tag.
///
/// Domain shape: `{"version": v, "data": ...}`. Envelope: `[v, data']`, where
/// `data'` is produced by the node registered for `v`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionedSchema {
    cases: IndexMap<Literal, Arc<Schema>>,
    nullable: bool,
}

impl VersionedSchema {
    /// Register the node for `version`.
    ///
    /// # Panics
    ///
    /// If `version` is already registered. Use [`Self::try_with_case`] when
    /// the table comes from untrusted input.
    pub fn with_case(&self, version: impl Into<Literal>, node: impl Into<Schema>) -> Self {
        self.try_with_case(version, node).unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn try_with_case(&self, version: impl Into<Literal>, node: impl Into<Schema>) -> Result<Self, SchemaError> {
        let version = version.into();
        if self.cases.contains_key(&version) {
            return Err(SchemaError::DuplicateVersion(version));
        }
        let mut out = self.clone();
        out.cases.insert(version, Arc::new(node.into()));
        Ok(out)
    }

    /// Registered versions in registration order.
    pub fn cases(&self) -> impl Iterator<Item = (&Literal, &Schema)> {
        self.cases.iter().map(|(version, node)| (version, node.as_ref()))
    }

    pub fn case(&self, version: &Literal) -> Option<&Schema> {
        self.cases.get(version).map(Arc::as_ref)
    }

    fn lookup<P: Phase>(&self, version: &Value, path: &Path) -> Result<&Schema, P::Error> {
        Literal::from_value(version)
            .and_then(|literal| self.case(&literal))
            .ok_or_else(|| P::fail(ErrorKind::UnknownVersion { version: version.clone() }, path))
    }
}

impl Packer for VersionedSchema {
    fn encode_at(&self, value: &Value, path: &mut Path) -> Result<Value, EncodeError> {
        if let Some(out) = screen_null::<Encode>(value, self.nullable, "object", path) {
            return out;
        }
        let Value::Object(record) = value else {
            return Err(Encode::fail(
                ErrorKind::TypeMismatch { expected: "object".to_string(), actual: kind_name(value) },
                path,
            ));
        };
        let version = record
            .get("version")
            .ok_or_else(|| Encode::fail(ErrorKind::MissingField { field: "version".into() }, path))?;
        let node = self.lookup::<Encode>(version, path)?;
        let data = record
            .get("data")
            .ok_or_else(|| Encode::fail(ErrorKind::MissingField { field: "data".into() }, path))?;
        let packed = path.descend("data", |path| node.encode_at(data, path))?;
        Ok(Value::Array(vec![version.clone(), packed]))
    }

    fn decode_at(&self, envelope: &Value, path: &mut Path) -> Result<Value, DecodeError> {
        if let Some(out) = screen_null::<Decode>(envelope, self.nullable, "versioned envelope", path) {
            return out;
        }
        let items = expect_array::<Decode>(envelope, ENVELOPE, path)?;
        expect_length::<Decode>(items, ENVELOPE, 2, path)?;
        let (version, packed) = (&items[0], &items[1]);
        let node = self.lookup::<Decode>(version, path)?;
        let data = path.descend("data", |path| node.decode_at(packed, path))?;

        let mut record = Map::with_capacity(2);
        record.insert("version".to_string(), version.clone());
        record.insert("data".to_string(), data);
        Ok(Value::Object(record))
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn to_nullable(&self, nullable: bool) -> Self {
        Self { nullable, ..self.clone() }
    }
}
