//! A schema bound to a Rust domain type.
//!
//! The untyped nodes work on `serde_json::Value`. `Typed<T>` puts a Rust type
//! on the domain side so call sites get `T` in and `T` out, with serde doing
//! the conversion and the schema doing the validation and compaction.
use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::path_de::from_value_with_path;
use crate::schema::{Packer, Schema};

pub struct Typed<T> {
    schema: Schema,
    _domain: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self { schema: schema.into(), _domain: PhantomData }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl<T: Serialize + DeserializeOwned> Typed<T> {
    pub fn encode(&self, value: &T) -> Result<Value> {
        let domain = serde_json::to_value(value).map_err(Error::Serialize)?;
        Ok(self.schema.encode(&domain)?)
    }

    pub fn decode(&self, envelope: &Value) -> Result<T> {
        let domain = self.schema.decode(envelope)?;
        from_value_with_path(domain)
    }
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self::new(self.schema.clone())
    }
}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typed")
            .field("domain", &std::any::type_name::<T>())
            .field("schema", &self.schema)
            .finish()
    }
}
