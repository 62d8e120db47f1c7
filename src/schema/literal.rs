use indexmap::IndexSet;
use serde_json::Value;

use super::{screen_null, Decode, Encode, Packer, Phase};
use crate::classify::Literal;
use crate::error::{DecodeError, EncodeError, ErrorKind, SchemaError};
use crate::path::Path;

/// Admits a fixed set of literal values. `null` is never a member of the
/// set; it is admitted through the nullability flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralSchema {
    accepts: IndexSet<Literal>,
    nullable: bool,
}

impl LiteralSchema {
    pub fn new(value: impl Into<Literal>) -> Self {
        Self { accepts: IndexSet::from([value.into()]), nullable: false }
    }

    /// Build from raw JSON values. A `null` among them turns nullability on
    /// instead of becoming a member.
    pub fn from_values<'v>(values: impl IntoIterator<Item = &'v Value>) -> Result<Self, SchemaError> {
        let mut accepts = IndexSet::new();
        let mut nullable = false;
        for value in values {
            if value.is_null() {
                nullable = true;
                continue;
            }
            let literal = Literal::from_value(value).ok_or_else(|| SchemaError::NotALiteral(value.clone()))?;
            accepts.insert(literal);
        }
        if accepts.is_empty() {
            return Err(SchemaError::EmptyLiteral);
        }
        Ok(Self { accepts, nullable })
    }

    /// Extend the set by one value. Returns an equal node when `value` is
    /// already a member.
    pub fn or(&self, value: impl Into<Literal>) -> Self {
        let mut out = self.clone();
        out.accepts.insert(value.into());
        out
    }

    /// Admissible values in insertion order.
    pub fn accepts(&self) -> impl Iterator<Item = &Literal> {
        self.accepts.iter()
    }

    fn check<P: Phase>(&self, value: &Value, path: &Path) -> Result<Value, P::Error> {
        if let Some(out) = screen_null::<P>(value, self.nullable, "literal", path) {
            return out;
        }
        match Literal::from_value(value) {
            Some(literal) if self.accepts.contains(&literal) => Ok(value.clone()),
            _ => Err(P::fail(
                ErrorKind::UnknownLiteral { expected: self.accepts.iter().cloned().collect(), actual: value.clone() },
                path,
            )),
        }
    }
}

impl Packer for LiteralSchema {
    fn encode_at(&self, value: &Value, path: &mut Path) -> Result<Value, EncodeError> {
        self.check::<Encode>(value, path)
    }

    fn decode_at(&self, envelope: &Value, path: &mut Path) -> Result<Value, DecodeError> {
        self.check::<Decode>(envelope, path)
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn to_nullable(&self, nullable: bool) -> Self {
        Self { accepts: self.accepts.clone(), nullable }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::literal;
    use serde_json::json;

    #[test]
    fn accepts_exactly_the_configured_literals() {
        let status = literal("active").or("disabled");
        assert_eq!(status.encode(&json!("active")).unwrap(), json!("active"));
        assert_eq!(status.decode(&json!("disabled")).unwrap(), json!("disabled"));

        let err = status.decode(&json!("inactive")).unwrap_err();
        assert_eq!(err.message(), r#"expected literal "active" | "disabled", got "inactive""#);
    }

    #[test]
    fn failure_carries_caller_path() {
        let status = literal("active");
        let err = status.decode_at(&json!("inactive"), &mut Path::root().child("status")).unwrap_err();
        assert_eq!(err.path(), &Path::root().child("status"));
    }

    #[test]
    fn or_with_existing_member_is_a_no_op() {
        let status = literal("a").or("b");
        assert_eq!(status.or("a"), status);
        assert_eq!(status.accepts().count(), 2);
    }

    #[test]
    fn mixed_kinds_compare_by_value() {
        let node = literal(1).or(true);
        assert!(node.encode(&json!(1.0)).is_ok());
        assert!(node.encode(&json!(true)).is_ok());
        assert!(node.encode(&json!("1")).is_err());
        assert!(node.encode(&json!(false)).is_err());
    }

    #[test]
    fn null_in_values_sets_nullability() {
        let node = LiteralSchema::from_values(&[json!("on"), Value::Null, json!("off")]).unwrap();
        assert!(node.is_nullable());
        assert_eq!(node.accepts().count(), 2);
        assert_eq!(node.encode(&Value::Null).unwrap(), Value::Null);

        let err = node.to_nullable(false).encode(&Value::Null).unwrap_err();
        assert_eq!(err.message(), "expected literal, got null");
    }

    #[test]
    fn structured_values_are_not_literals() {
        assert_eq!(
            LiteralSchema::from_values(&[json!([1])]).unwrap_err(),
            SchemaError::NotALiteral(json!([1]))
        );
        assert_eq!(LiteralSchema::from_values(&[Value::Null]).unwrap_err(), SchemaError::EmptyLiteral);
    }
}
