//! Schema-driven JSON packing.
//!
//! Declare the shape of a value once and use the resulting schema both ways:
//! `encode` validates a domain value and compacts it into an envelope
//! (records become positional arrays, versioned unions become
//! `[version, data]`), `decode` validates an envelope and rebuilds the domain
//! value. Failures carry the path to the offending sub-value.
//!
//! ```ignore
//! use json_packer::{object, primitive, Packer, PrimitiveKind::*};
//!
//! let user = object(["id", "name"])
//!     .with_key("id", primitive([Number]))
//!     .with_key("name", primitive([String]));
//! assert_eq!(user.encode(&json!({"id": 1, "name": "Ada"}))?, json!([1, "Ada"]));
//! ```
pub mod error;
pub mod path;
pub mod classify;
pub mod schema;
pub mod ir;
pub mod lower;
pub mod path_de;
pub mod typed;

pub use error::{DecodeError, EncodeError, Error, ErrorKind, Result, SchemaError};
pub use ir::{CaseDef, NodeDef};
pub use lower::{describe, lower};
pub use path::{Path, Segment};
pub use path_de::{from_value_with_path, parse_definition};
pub use classify::{Literal, PrimitiveKind};
pub use schema::{
    any, literal, object, primitive, tuple, versioned, AnySchema, ArraySchema, LiteralSchema, ObjectSchema,
    Packer, PrimitiveSchema, Schema, TupleSchema, VersionedSchema,
};
pub use typed::Typed;
