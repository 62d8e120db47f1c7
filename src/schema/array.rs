use std::sync::Arc;

use serde_json::Value;

use super::{expect_array, expect_length, screen_null, visit_items, Decode, Encode, Packer, Phase, Schema};
use crate::error::{DecodeError, EncodeError};
use crate::path::Path;

/// A homogeneous array, optionally pinned to one length.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    element: Arc<Schema>,
    length: Option<usize>,
    nullable: bool,
}

impl ArraySchema {
    pub fn new(element: impl Into<Schema>) -> Self {
        Self { element: Arc::new(element.into()), length: None, nullable: false }
    }

    /// Same element node, exactly `length` elements.
    pub fn with_fixed_length(&self, length: usize) -> Self {
        Self { length: Some(length), ..self.clone() }
    }

    /// Same element node, any length.
    pub fn with_any_length(&self) -> Self {
        Self { length: None, ..self.clone() }
    }

    pub fn element(&self) -> &Schema {
        &self.element
    }

    pub fn fixed_length(&self) -> Option<usize> {
        self.length
    }

    fn walk<P: Phase>(&self, value: &Value, path: &mut Path) -> Result<Value, P::Error> {
        if let Some(out) = screen_null::<P>(value, self.nullable, "array", path) {
            return out;
        }
        let items = expect_array::<P>(value, "array", path)?;
        if let Some(length) = self.length {
            expect_length::<P>(items, "array", length, path)?;
        }
        visit_items::<P>(items, |_| &self.element, path)
    }
}

impl Packer for ArraySchema {
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
