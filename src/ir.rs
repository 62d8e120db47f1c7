// Declarative, serde-friendly description of a schema tree. No `Arc`s or
// behavior here; `lower` turns it into live nodes.
//
// Externally tagged (`{"object": {...}}`) so `serde_path_to_error` can follow
// the path into every variant.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::PrimitiveKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeDef {
    /// `"null"` among `types` is what makes a primitive nullable.
    Primitive {
        types: Vec<PrimitiveKind>,
    },
    Literal {
        values: Vec<Value>,          // a `null` here sets `nullable`
        #[serde(default, skip_serializing_if = "is_false")]
        nullable: bool,
    },
    Object {
        keys: Vec<String>,           // envelope order
        #[serde(default)]
        shape: IndexMap<String, NodeDef>,
        #[serde(default, skip_serializing_if = "is_false")]
        nullable: bool,
    },
    Array {
        element: Box<NodeDef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        length: Option<usize>,
        #[serde(default, skip_serializing_if = "is_false")]
        nullable: bool,
    },
    Tuple {
        elements: Vec<NodeDef>,
        #[serde(default, skip_serializing_if = "is_false")]
        nullable: bool,
    },
    Versioned {
        cases: Vec<CaseDef>,         // registration order
        #[serde(default, skip_serializing_if = "is_false")]
        nullable: bool,
    },
    Any {
        #[serde(default, skip_serializing_if = "is_false")]
        nullable: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDef {
    pub version: Value,
    pub schema: NodeDef,
}

fn is_false(b: &bool) -> bool { !*b }
