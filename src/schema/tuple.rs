use std::sync::Arc;

use serde_json::Value;

use super::{expect_array, expect_length, screen_null, visit_items, Decode, Encode, Packer, Phase, Schema};
use crate::error::{DecodeError, EncodeError};
use crate::path::Path;

/// A fixed-arity array with one node per position.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleSchema {
    elements: Vec<Arc<Schema>>,
    nullable: bool,
}

impl TupleSchema {
    pub fn new<S: Into<Schema>>(elements: impl IntoIterator<Item = S>) -> Self {
        Self {
            elements: elements.into_iter().map(|node| Arc::new(node.into())).collect(),
            nullable: false,
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Schema> {
        self.elements.iter().map(Arc::as_ref)
    }

    pub fn arity(&self) -> usize {
        self.elements.len()
    }

    fn walk<P: Phase>(&self, value: &Value, path: &mut Path) -> Result<Value, P::Error> {
        if let Some(out) = screen_null::<P>(value, self.nullable, "tuple", path) {
            return out;
        }
        let items = expect_array::<P>(value, "tuple", path)?;
        expect_length::<P>(items, "tuple", self.arity(), path)?;
        visit_items::<P>(items, |index| &self.elements[index], path)
    }
}

impl Packer for TupleSchema {
    fn encode_at(&self, value: &Value, path: &mut Path) -> Result<Value, EncodeError> {
        self.walk::<Encode>(value, path)
    }

    fn decode_at(&self, envelope: &Value, path: &mut Path) -> Result<Value, DecodeError> {
        self.walk::<Decode>(envelope, path)
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
    use crate::schema::{literal, primitive, tuple};
    use serde_json::json;

    fn pair() -> TupleSchema {
        tuple([Schema::from(primitive([Str])), primitive([Number]).into()])
    }

    #[test]
    fn packs_and_unpacks_positionally() {
        assert_eq!(pair().encode(&json!(["ok", 3])).unwrap(), json!(["ok", 3]));
        assert_eq!(pair().decode(&json!(["hi", 4])).unwrap(), json!(["hi", 4]));
    }

    #[test]
    fn rejects_arity_mismatch() {
        let err = pair().encode(&json!(["only"])).unwrap_err();
        assert_eq!(err.message(), "expected tuple of length 2, got length 1");
        assert!(pair().decode(&json!(["a", 1, 2])).is_err());
    }

    #[test]
    fn each_position_uses_its_own_node() {
        let err = pair().encode(&json!([3, "ok"])).unwrap_err();
        assert_eq!(err.path(), &Path::root().child(0usize));

        let tagged = tuple([Schema::from(literal("point")), primitive([Number]).to_array_of(2).into()]);
        let err = tagged.decode(&json!(["point", [1, "y"]])).unwrap_err();
        assert_eq!(err.path(), &Path::root().child(1usize).child(1usize));
    }

    #[test]
    fn null_and_type_checks() {
        assert_eq!(pair().encode(&Value::Null).unwrap_err().message(), "expected tuple, got null");
        assert_eq!(pair().decode(&json!("x")).unwrap_err().message(), "expected tuple, got string");
        assert_eq!(pair().nullable().decode(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn empty_tuple_only_accepts_empty_array() {
        let unit = TupleSchema::new(Vec::<Schema>::new());
        assert_eq!(unit.arity(), 0);
        assert_eq!(unit.encode(&json!([])).unwrap(), json!([]));
        assert!(unit.encode(&json!([1])).is_err());
    }
}
