//! Error types.
//!
//! Encode and decode failures are kept apart so a caller can tell "I produced
//! bad data" from "I received bad data". Both carry the same [`ErrorKind`] and
//! the [`Path`] of the offending sub-value. Mistakes made while *building* a
//! schema are a separate [`SchemaError`].
use serde_json::Value;
use thiserror::Error;

use crate::classify::Literal;
use crate::path::Path;

/// What went wrong, independent of phase.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Wrong primitive kind, non-object where an object is expected, array
    /// where an object is expected, or non-array where an array is expected.
    #[error("expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: &'static str },

    /// `null` reached a node that is not nullable.
    #[error("expected {expected}, got null")]
    UnexpectedNull { expected: &'static str },

    #[error("expected literal {}, got {actual}", join_literals(.expected))]
    UnknownLiteral { expected: Vec<Literal>, actual: Value },

    #[error("unknown version {version}")]
    UnknownVersion { version: Value },

    /// Fixed array length, tuple arity, object envelope length or union
    /// envelope arity.
    #[error("expected {expected} of length {expected_len}, got length {actual}")]
    LengthMismatch { expected: &'static str, expected_len: usize, actual: usize },

    /// A declared object key, or a union's `version`/`data`, is absent.
    #[error("missing {field} field")]
    MissingField { field: String },

    /// An object key was declared but never bound to a child schema.
    #[error("shape for key {key:?} is not defined")]
    UndefinedKey { key: String },
}

fn join_literals(literals: &[Literal]) -> String {
    literals.iter().map(ToString::to_string).collect::<Vec<_>>().join(" | ")
}

macro_rules! phase_error {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Error, Debug, Clone, PartialEq)]
        #[error("{kind} at {path}")]
        pub struct $name {
            kind: ErrorKind,
            path: Path,
        }

        impl $name {
            pub fn new(kind: ErrorKind, path: Path) -> Self { Self { kind, path } }

            pub fn kind(&self) -> &ErrorKind { &self.kind }

            /// Location of the failing sub-value, root first.
            pub fn path(&self) -> &Path { &self.path }

            /// Human readable description without the location.
            pub fn message(&self) -> String { self.kind.to_string() }

            pub fn into_parts(self) -> (ErrorKind, Path) { (self.kind, self.path) }
        }
    };
}

phase_error! {
    /// Raised while turning a domain value into its envelope.
    EncodeError
}

phase_error! {
    /// Raised while rebuilding a domain value from an envelope.
    DecodeError
}

/// Construction-time mistakes. These never come out of encode/decode.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("version {0} already exists")]
    DuplicateVersion(Literal),

    #[error("primitive schema must admit at least one kind")]
    EmptyPrimitive,

    #[error("literal schema must admit at least one value")]
    EmptyLiteral,

    #[error("{0} is not a primitive literal")]
    NotALiteral(Value),

    /// A schema description could not be parsed.
    #[error("invalid schema definition at {path}: {reason}")]
    Definition { path: String, reason: String },
}

/// Everything the crate can fail with.
#[derive(Error, Debug)]
pub enum Error {
    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A decoded value did not fit the requested Rust type.
    #[error("at JSON path {path} → {source}")]
    Deserialize { path: String, source: serde_json::Error },

    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_excludes_path_but_display_includes_it() {
        let err = EncodeError::new(
            ErrorKind::TypeMismatch { expected: "number".into(), actual: "string" },
            Path::root().child("name"),
        );
        assert_eq!(err.message(), "expected number, got string");
        assert_eq!(err.to_string(), "expected number, got string at $.name");
    }

    #[test]
    fn literal_list_is_pipe_separated() {
        let kind = ErrorKind::UnknownLiteral {
            expected: vec![Literal::from("active"), Literal::from("disabled")],
            actual: json!("inactive"),
        };
        assert_eq!(kind.to_string(), r#"expected literal "active" | "disabled", got "inactive""#);
    }

    #[test]
    fn phases_wrap_into_crate_error() {
        let err: Error = DecodeError::new(ErrorKind::MissingField { field: "version".into() }, Path::root()).into();
        assert!(matches!(err, Error::Decode(_)));
        assert_eq!(err.to_string(), "decode failed: missing version field at $");
    }
}
