use serde_json::Value;
use tracing::debug;

use super::document::{build_tree, DocumentValue, ValueView};
use super::{strip_location, Parser};
use crate::error::{ConfigError, Result};
use crate::tree::{Position, TreeNode};

/// Parser for JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, text: &str) -> Result<TreeNode> {
        let document: Value = serde_json::from_str(text).map_err(|e| {
            let position = if e.line() == 0 {
                Position::UNKNOWN
            } else {
                Position::new(e.line(), e.column())
            };
            debug!(error = %e, "malformed JSON document");
            ConfigError::parse(strip_location(&e.to_string()), position)
        })?;
        build_tree(&document)
    }
}

impl DocumentValue for Value {
    fn view(&self) -> Result<ValueView<'_, Self>> {
        Ok(match self {
            Value::Null => ValueView::Null,
            Value::Bool(value) => ValueView::Scalar(value.to_string()),
            Value::Number(value) => ValueView::Scalar(value.to_string()),
            Value::String(value) => ValueView::Scalar(value.clone()),
            Value::Array(elements) => ValueView::Array(elements),
            Value::Object(map) => {
                ValueView::Object(map.iter().map(|(key, value)| (key.clone(), value)).collect())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(text: &str) -> Result<TreeNode> {
        JsonParser.parse(text)
    }

    #[test]
    fn test_scalars_become_params() {
        let tree = parse(r#"{"name": "app", "port": 8080, "ratio": 0.5, "debug": true}"#).unwrap();
        let root = tree.as_item().unwrap();
        assert_eq!(root.param("name").unwrap().value(), Some("app"));
        assert_eq!(root.param("port").unwrap().value(), Some("8080"));
        assert_eq!(root.param("ratio").unwrap().value(), Some("0.5"));
        assert_eq!(root.param("debug").unwrap().value(), Some("true"));
    }

    #[test]
    fn test_null_is_absent() {
        let tree = parse(r#"{"name": null}"#).unwrap();
        assert!(!tree.as_item().unwrap().has_param("name"));
    }

    #[test]
    fn test_arrays_of_objects_become_node_lists() {
        let tree = parse(
            r#"{
                "testStr": "Hello",
                "testNodes": [{"testInt": 3}, {"testInt": 2}],
                "testList": [1, 2, 3]
            }"#,
        )
        .unwrap();
        let root = tree.as_item().unwrap();

        let nodes = root.node("testNodes").unwrap().as_list().unwrap();
        assert_eq!(nodes.len(), 2);
        let second = nodes.node(1).unwrap().as_item().unwrap();
        assert_eq!(second.param("testInt").unwrap().value(), Some("2"));

        let list = root.param("testList").unwrap();
        assert_eq!(
            list.values(),
            Some(&["1".to_string(), "2".to_string(), "3".to_string()][..])
        );
    }

    #[test]
    fn test_nested_objects_become_items() {
        let tree = parse(r#"{"db": {"host": "localhost", "pool": {"size": 4}}}"#).unwrap();
        let db = tree.as_item().unwrap().node("db").unwrap().as_item().unwrap();
        assert_eq!(db.param("host").unwrap().value(), Some("localhost"));
        assert!(db.node("pool").unwrap().is_item());
    }

    #[test]
    fn test_mixed_array_is_rejected() {
        let error = parse(r#"{"nodes": [{"a": 1}, 2]}"#).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Source);
        assert_eq!(error.to_string(), "Node list 'nodes' element 1 must be an object");

        let error = parse(r#"{"values": [1, [2]]}"#).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_syntax_error_has_position() {
        let error = parse("{\n  \"name\": \"app\",\n  \"port\": \n}").unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert_eq!(error.position().line, Some(4));
        assert!(!error.to_string().contains(" at line "));
    }

    #[test]
    fn test_root_must_be_object() {
        let error = parse("[1, 2]").unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }
}
