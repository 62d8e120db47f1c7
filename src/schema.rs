//! Schema nodes and the encode/decode walk.
//!
//! A schema is an immutable tree of nodes. `encode` turns a rich domain value
//! into its compact envelope (objects become positional arrays, versioned
//! unions become `[version, data]` pairs); `decode` reverses it. Both walk the
//! tree depth-first against the input, extend a [`Path`] on every descent and
//! stop at the first mismatch.
//!
//! Builder calls (`with_key`, `or`, `with_case`, `with_fixed_length`,
//! `to_nullable`, `to_array`) never touch the receiver; they return a new node
//! that shares unchanged children through [`Arc`].
pub mod primitive;
pub mod literal;
pub mod object;
pub mod array;
pub mod tuple;
pub mod versioned;
pub mod any;

use std::sync::Arc;

use serde_json::Value;

use crate::classify::{kind_name, Literal, PrimitiveKind};
use crate::error::{DecodeError, EncodeError, ErrorKind};
use crate::path::Path;

pub use primitive::PrimitiveSchema;
pub use literal::LiteralSchema;
pub use object::ObjectSchema;
pub use array::ArraySchema;
pub use tuple::TupleSchema;
pub use versioned::VersionedSchema;
pub use any::AnySchema;

// ------------------------------ Capability -------------------------------- //

/// The contract every node kind satisfies.
pub trait Packer: Clone + Into<Schema> {
    /// Encode starting from `path`. The path is restored before returning.
    fn encode_at(&self, value: &Value, path: &mut Path) -> Result<Value, EncodeError>;

    /// Decode starting from `path`. The path is restored before returning.
    fn decode_at(&self, envelope: &Value, path: &mut Path) -> Result<Value, DecodeError>;

    fn is_nullable(&self) -> bool;

    /// A sibling node that does (or does not) accept `null`. Nothing else
    /// about the node changes.
    fn to_nullable(&self, nullable: bool) -> Self;

    fn encode(&self, value: &Value) -> Result<Value, EncodeError> {
        let result = self.encode_at(value, &mut Path::root());
        if let Err(err) = &result {
            tracing::debug!(path = %err.path(), "encode rejected: {}", err.message());
        }
        result
    }

    fn decode(&self, envelope: &Value) -> Result<Value, DecodeError> {
        let result = self.decode_at(envelope, &mut Path::root());
        if let Err(err) = &result {
            tracing::debug!(path = %err.path(), "decode rejected: {}", err.message());
        }
        result
    }

    /// Shorthand for `to_nullable(true)`.
    fn nullable(&self) -> Self {
        self.to_nullable(true)
    }

    /// An array of any length whose elements are this node.
    fn to_array(&self) -> ArraySchema {
        ArraySchema::new(self.clone())
    }

    /// An array of exactly `length` elements of this node.
    fn to_array_of(&self, length: usize) -> ArraySchema {
        self.to_array().with_fixed_length(length)
    }
}

// ------------------------------- Variants --------------------------------- //

/// Closed set of node kinds. Composite kinds own their children.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Primitive(PrimitiveSchema),
    Literal(LiteralSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Tuple(TupleSchema),
    Versioned(VersionedSchema),
    Any(AnySchema),
}

macro_rules! each_kind {
    ($schema:expr, $node:ident => $body:expr) => {
        match $schema {
            Schema::Primitive($node) => $body,
            Schema::Literal($node) => $body,
            Schema::Object($node) => $body,
            Schema::Array($node) => $body,
            Schema::Tuple($node) => $body,
            Schema::Versioned($node) => $body,
            Schema::Any($node) => $body,
        }
    };
}

impl Schema {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Schema::Primitive(_) => "primitive",
            Schema::Literal(_) => "literal",
            Schema::Object(_) => "object",
            Schema::Array(_) => "array",
            Schema::Tuple(_) => "tuple",
            Schema::Versioned(_) => "versioned",
            Schema::Any(_) => "any",
        }
    }
}

impl Packer for Schema {
    fn encode_at(&self, value: &Value, path: &mut Path) -> Result<Value, EncodeError> {
        each_kind!(self, node => node.encode_at(value, path))
    }

    fn decode_at(&self, envelope: &Value, path: &mut Path) -> Result<Value, DecodeError> {
        each_kind!(self, node => node.decode_at(envelope, path))
    }

    fn is_nullable(&self) -> bool {
        each_kind!(self, node => node.is_nullable())
    }

    fn to_nullable(&self, nullable: bool) -> Self {
        each_kind!(self, node => Schema::from(node.to_nullable(nullable)))
    }
}

macro_rules! into_schema {
    ($($variant:ident($ty:ty)),* $(,)?) => {$(
        impl From<$ty> for Schema {
            fn from(node: $ty) -> Self { Schema::$variant(node) }
        }
    )*};
}

into_schema! {
    Primitive(PrimitiveSchema),
    Literal(LiteralSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Tuple(TupleSchema),
    Versioned(VersionedSchema),
    Any(AnySchema),
}

// ------------------------------ Combinators ------------------------------- //

/// A node admitting the given primitive kinds.
///
/// # Panics
///
/// If `kinds` is empty. Use [`PrimitiveSchema::try_new`] to get a
/// [`SchemaError`](crate::error::SchemaError) instead.
pub fn primitive(kinds: impl IntoIterator<Item = PrimitiveKind>) -> PrimitiveSchema {
    PrimitiveSchema::try_new(kinds).unwrap_or_else(|err| panic!("{err}"))
}

/// A node admitting exactly `value`; extend it with [`LiteralSchema::or`].
pub fn literal(value: impl Into<Literal>) -> LiteralSchema {
    LiteralSchema::new(value)
}

/// A keyed object whose envelope follows the order of `keys`. Bind children
/// with [`ObjectSchema::with_key`] or [`ObjectSchema::with_shape`].
pub fn object<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> ObjectSchema {
    ObjectSchema::new(keys)
}

/// A fixed-arity, heterogeneous array.
pub fn tuple<S: Into<Schema>>(elements: impl IntoIterator<Item = S>) -> TupleSchema {
    TupleSchema::new(elements)
}

/// An empty version-tagged union; add cases with
/// [`VersionedSchema::with_case`].
pub fn versioned() -> VersionedSchema {
    VersionedSchema::default()
}

/// A passthrough node that only enforces the null policy.
pub fn any() -> AnySchema {
    AnySchema::default()
}

// ------------------------------ Walk helpers ------------------------------ //

/// Encode or decode, selected at compile time so kinds whose two directions
/// are symmetric implement them once.
pub(crate) trait Phase {
    type Error;

    fn fail(kind: ErrorKind, path: &Path) -> Self::Error;

    fn visit(node: &Schema, value: &Value, path: &mut Path) -> Result<Value, Self::Error>;
}

pub(crate) struct Encode;

pub(crate) struct Decode;

impl Phase for Encode {
    type Error = EncodeError;

    fn fail(kind: ErrorKind, path: &Path) -> EncodeError {
        EncodeError::new(kind, path.clone())
    }

    fn visit(node: &Schema, value: &Value, path: &mut Path) -> Result<Value, EncodeError> {
        node.encode_at(value, path)
    }
}

impl Phase for Decode {
    type Error = DecodeError;

    fn fail(kind: ErrorKind, path: &Path) -> DecodeError {
        DecodeError::new(kind, path.clone())
    }

    fn visit(node: &Schema, value: &Value, path: &mut Path) -> Result<Value, DecodeError> {
        node.decode_at(value, path)
    }
}

/// First step of every non-primitive kind. `Some` means the walk ends here:
/// null passes through when `nullable`, otherwise it is rejected.
pub(crate) fn screen_null<P: Phase>(
    value: &Value,
    nullable: bool,
    expected: &'static str,
    path: &Path,
) -> Option<Result<Value, P::Error>> {
    if !value.is_null() {
        return None;
    }
    if nullable {
        Some(Ok(Value::Null))
    } else {
        Some(Err(P::fail(ErrorKind::UnexpectedNull { expected }, path)))
    }
}

pub(crate) fn expect_array<'v, P: Phase>(
    value: &'v Value,
    expected: &str,
    path: &Path,
) -> Result<&'v Vec<Value>, P::Error> {
    value.as_array().ok_or_else(|| {
        P::fail(ErrorKind::TypeMismatch { expected: expected.to_string(), actual: kind_name(value) }, path)
    })
}

pub(crate) fn expect_length<P: Phase>(
    items: &[Value],
    expected: &'static str,
    expected_len: usize,
    path: &Path,
) -> Result<(), P::Error> {
    if items.len() == expected_len {
        Ok(())
    } else {
        Err(P::fail(ErrorKind::LengthMismatch { expected, expected_len, actual: items.len() }, path))
    }
}

/// Map every element through its own child, extending the path with the
/// element's index.
pub(crate) fn visit_items<'s, P: Phase>(
    items: &[Value],
    mut child_for: impl FnMut(usize) -> &'s Arc<Schema>,
    path: &mut Path,
) -> Result<Value, P::Error> {
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let node = child_for(index);
        out.push(path.descend(index, |path| P::visit(node, item, path))?);
    }
    Ok(Value::Array(out))
}
