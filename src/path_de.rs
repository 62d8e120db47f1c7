use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, SchemaError};
use crate::ir::NodeDef;

/// Parse a schema description, reporting the JSON path of any mismatch.
pub fn parse_definition(src: &str) -> Result<NodeDef, SchemaError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, NodeDef>(de).map_err(|err| SchemaError::Definition {
        path: err.path().to_string(),
        reason: err.into_inner().to_string(),
    })
}

/// Deserialize an already decoded value with JSON-path context in errors.
pub fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| Error::Deserialize {
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn definition_errors_name_the_json_path() {
        let src = r#"{"object": {"keys": ["a"], "shape": {"a": {"primitive": {"types": ["strng"]}}}}}"#;
        match parse_definition(src).unwrap_err() {
            SchemaError::Definition { path, reason } => {
                assert!(path.contains("shape") && path.contains("types"), "path was {path}");
                assert!(reason.contains("strng"), "reason was {reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn value_errors_name_the_json_path() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct User { id: u32, tags: Vec<String> }

        let err = from_value_with_path::<User>(json!({"id": 1, "tags": ["a", 2]})).unwrap_err();
        assert!(err.to_string().contains("tags[1]"), "{err}");
    }
}
