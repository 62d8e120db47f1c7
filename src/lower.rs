use crate::classify::Literal;
use crate::error::SchemaError;
use crate::ir::{CaseDef, NodeDef};
use crate::schema::{
    AnySchema, ArraySchema, LiteralSchema, ObjectSchema, Packer, PrimitiveSchema, Schema, TupleSchema,
    VersionedSchema,
};

/// Build live schema nodes from a description, through the same builder
/// operations a hand-written schema would use.
pub fn lower(def: &NodeDef) -> Result<Schema, SchemaError> {
    let schema: Schema = match def {
        NodeDef::Primitive { types } => PrimitiveSchema::try_new(types.iter().copied())?.into(),
        NodeDef::Literal { values, nullable } => {
            let node = LiteralSchema::from_values(values)?;
            // a `null` inside `values` already made it nullable
            let nullable = *nullable || node.is_nullable();
            node.to_nullable(nullable).into()
        }
        NodeDef::Object { keys, shape, nullable } => {
            let mut node = ObjectSchema::new(keys.iter().cloned());
            for (key, child) in shape {
                node = node.with_key(key.clone(), lower(child)?);
            }
            node.to_nullable(*nullable).into()
        }
        NodeDef::Array { element, length, nullable } => {
            let node = ArraySchema::new(lower(element)?);
            let node = match length {
                Some(length) => node.with_fixed_length(*length),
                None => node,
            };
            node.to_nullable(*nullable).into()
        }
        NodeDef::Tuple { elements, nullable } => {
            let elements = elements.iter().map(lower).collect::<Result<Vec<_>, _>>()?;
            TupleSchema::new(elements).to_nullable(*nullable).into()
        }
        NodeDef::Versioned { cases, nullable } => {
            let mut node = VersionedSchema::default();
            for CaseDef { version, schema } in cases {
                let version = Literal::from_value(version).ok_or_else(|| SchemaError::NotALiteral(version.clone()))?;
                node = node.try_with_case(version, lower(schema)?)?;
            }
            node.to_nullable(*nullable).into()
        }
        NodeDef::Any { nullable } => AnySchema::default().to_nullable(*nullable).into(),
    };
    tracing::trace!(kind = schema.kind_name(), "lowered schema node");
    Ok(schema)
}

/// The description `lower` would need to rebuild `schema`.
pub fn describe(schema: &Schema) -> NodeDef {
    match schema {
        Schema::Primitive(node) => NodeDef::Primitive { types: node.kinds().collect() },
        Schema::Literal(node) => NodeDef::Literal {
            values: node.accepts().map(Literal::to_value).collect(),
            nullable: node.is_nullable(),
        },
        Schema::Object(node) => NodeDef::Object {
            keys: node.keys().map(str::to_string).collect(),
            shape: node.shape().map(|(key, child)| (key.to_string(), describe(child))).collect(),
            nullable: node.is_nullable(),
        },
        Schema::Array(node) => NodeDef::Array {
            element: Box::new(describe(node.element())),
            length: node.fixed_length(),
            nullable: node.is_nullable(),
        },
        Schema::Tuple(node) => NodeDef::Tuple {
            elements: node.elements().map(describe).collect(),
            nullable: node.is_nullable(),
        },
        Schema::Versioned(node) => NodeDef::Versioned {
            cases: node
                .cases()
                .map(|(version, child)| CaseDef { version: version.to_value(), schema: describe(child) })
                .collect(),
            nullable: node.is_nullable(),
        },
        Schema::Any(node) => NodeDef::Any { nullable: node.is_nullable() },
    }
}
