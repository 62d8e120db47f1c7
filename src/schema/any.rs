use serde_json::Value;

use super::{screen_null, Decode, Encode, Packer, Phase};
use crate::error::{DecodeError, EncodeError};
use crate::path::Path;

/// Skips structural validation but still enforces the null policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnySchema {
    nullable: bool,
}

impl AnySchema {
    fn pass<P: Phase>(&self, value: &Value, path: &Path) -> Result<Value, P::Error> {
        match screen_null::<P>(value, self.nullable, "non-null value", path) {
            Some(out) => out,
            None => Ok(value.clone()),
        }
    }
}

impl Packer for AnySchema {
    fn encode_at(&self, value: &Value, path: &mut Path) -> Result<Value, EncodeError> {
        self.pass::<Encode>(value, path)
    }

    fn decode_at(&self, envelope: &Value, path: &mut Path) -> Result<Value, DecodeError> {
        self.pass::<Decode>(envelope, path)
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn to_nullable(&self, nullable: bool) -> Self {
        Self { nullable }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::any;
    use serde_json::json;

    #[test]
    fn passes_values_through_without_validation() {
        let value = json!({"value": 42, "nested": [1, "two", null]});
        assert_eq!(any().encode(&value).unwrap(), value);
        assert_eq!(any().decode(&value).unwrap(), value);
    }

    #[test]
    fn rejects_null_unless_nullable() {
        let node = any();
        let err = node.encode(&Value::Null).unwrap_err();
        assert_eq!(err.message(), "expected non-null value, got null");
        assert!(node.decode(&Value::Null).is_err());

        let nullable = node.nullable();
        assert_eq!(nullable.encode(&Value::Null).unwrap(), Value::Null);
        assert_eq!(nullable.decode(&Value::Null).unwrap(), Value::Null);
    }
}
