//! Primitive classification and literal values.
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

// ------------------------------- Kinds ----------------------------------- //

/// The primitive kinds a [`crate::schema::PrimitiveSchema`] can admit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Null,
}

impl PrimitiveKind {
    /// Runtime classification. Arrays and objects are not primitives.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(_) => Some(Self::Boolean),
            Value::Number(_) => Some(Self::Number),
            Value::String(_) => Some(Self::String),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of any value's kind, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        other => PrimitiveKind::of(other).map(PrimitiveKind::as_str).unwrap_or("unknown"),
    }
}

// ------------------------------ Literals --------------------------------- //

/// A non-null primitive value usable as a set member or table key.
///
/// Numbers compare by their `f64` value, so `1` and `1.0` are the same
/// literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Bool(bool),
    Number(OrderedFloat<f64>),
    String(String),
}

impl Literal {
    /// `None` for null, arrays and objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Literal::Bool(*b)),
            Value::Number(n) => n.as_f64().map(|f| Literal::Number(OrderedFloat(f))),
            Value::String(s) => Some(Literal::String(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Number(OrderedFloat(f)) => {
                // integral values print as integers; `i64::MAX as f64` is 2^63,
                // which is out of range for i64 but not for u64
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Value::from(*f as i64)
                } else if f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64 {
                    Value::from(*f as u64)
                } else {
                    Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null)
                }
            }
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Literal::Bool(_) => PrimitiveKind::Boolean,
            Literal::Number(_) => PrimitiveKind::Number,
            Literal::String(_) => PrimitiveKind::String,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self { Literal::String(s.to_string()) }
}

impl From<String> for Literal {
    fn from(s: String) -> Self { Literal::String(s) }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self { Literal::Bool(b) }
}

impl From<f64> for Literal {
    fn from(f: f64) -> Self { Literal::Number(OrderedFloat(f)) }
}

macro_rules! literal_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Literal {
            fn from(n: $t) -> Self { Literal::Number(OrderedFloat(n as f64)) }
        }
    )*};
}

literal_from_int!(i32, i64, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_every_primitive() {
        assert_eq!(PrimitiveKind::of(&json!("x")), Some(PrimitiveKind::String));
        assert_eq!(PrimitiveKind::of(&json!(1.5)), Some(PrimitiveKind::Number));
        assert_eq!(PrimitiveKind::of(&json!(false)), Some(PrimitiveKind::Boolean));
        assert_eq!(PrimitiveKind::of(&Value::Null), Some(PrimitiveKind::Null));
        assert_eq!(PrimitiveKind::of(&json!([])), None);
        assert_eq!(kind_name(&json!({})), "object");
        assert_eq!(kind_name(&json!([1])), "array");
    }

    #[test]
    fn integral_numbers_are_one_literal() {
        assert_eq!(Literal::from_value(&json!(1)), Literal::from_value(&json!(1.0)));
        assert_eq!(Literal::from(1).to_value(), json!(1));
        assert_eq!(Literal::from(2.5).to_value(), json!(2.5));
    }

    #[test]
    fn large_integers_keep_their_value() {
        assert_eq!(Literal::from(9223372036854775808u64).to_string(), "9223372036854775808");
        assert_eq!(Literal::from(i64::MIN).to_value(), json!(i64::MIN));
        assert_eq!(Literal::from(1e20).to_value(), json!(1e20));
    }

    #[test]
    fn null_is_never_a_literal() {
        assert_eq!(Literal::from_value(&Value::Null), None);
        assert_eq!(Literal::from_value(&json!({"a": 1})), None);
    }

    #[test]
    fn display_is_json_text() {
        assert_eq!(Literal::from("active").to_string(), "\"active\"");
        assert_eq!(Literal::from(true).to_string(), "true");
    }
}
