use indexmap::IndexSet;
use serde_json::Value;

use super::{Decode, Encode, Packer, Phase};
use crate::classify::{kind_name, PrimitiveKind};
use crate::error::{DecodeError, EncodeError, ErrorKind, SchemaError};
use crate::path::Path;

/// Admits values whose runtime kind is in a fixed set. Nullability is the
/// presence of [`PrimitiveKind::Null`] in that set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveSchema {
    kinds: IndexSet<PrimitiveKind>,
}

impl PrimitiveSchema {
    pub fn try_new(kinds: impl IntoIterator<Item = PrimitiveKind>) -> Result<Self, SchemaError> {
        let kinds: IndexSet<_> = kinds.into_iter().collect();
        if kinds.is_empty() {
            return Err(SchemaError::EmptyPrimitive);
        }
        Ok(Self { kinds })
    }

    /// Admitted kinds in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = PrimitiveKind> + '_ {
        self.kinds.iter().copied()
    }

    pub fn admits(&self, kind: PrimitiveKind) -> bool {
        self.kinds.contains(&kind)
    }

    fn check<P: Phase>(&self, value: &Value, path: &Path) -> Result<Value, P::Error> {
        match PrimitiveKind::of(value) {
            Some(kind) if self.admits(kind) => Ok(value.clone()),
            _ => {
                let expected = self.kinds().map(PrimitiveKind::as_str).collect::<Vec<_>>().join(" | ");
                Err(P::fail(ErrorKind::TypeMismatch { expected, actual: kind_name(value) }, path))
            }
        }
    }
}

impl Packer for PrimitiveSchema {
    fn encode_at(&self, value: &Value, path: &mut Path) -> Result<Value, EncodeError> {
        self.check::<Encode>(value, path)
    }

    fn decode_at(&self, envelope: &Value, path: &mut Path) -> Result<Value, DecodeError> {
        self.check::<Decode>(envelope, path)
    }

    fn is_nullable(&self) -> bool {
        self.admits(PrimitiveKind::Null)
    }

    /// Adds or removes [`PrimitiveKind::Null`]. A node that admits only
    /// `null` is returned unchanged by `to_nullable(false)`, since the kind
    /// set may never be empty.
    fn to_nullable(&self, nullable: bool) -> Self {
        let mut kinds = self.kinds.clone();
        if nullable {
            kinds.insert(PrimitiveKind::Null);
        } else {
            kinds.shift_remove(&PrimitiveKind::Null);
        }
        if kinds.is_empty() {
            return self.clone();
        }
        Self { kinds }
    }
}
