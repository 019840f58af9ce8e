use toml::{Table, Value};
use tracing::debug;

use super::document::{build_tree, DocumentValue, ValueView};
use super::Parser;
use crate::error::{ConfigError, Result};
use crate::tree::{Position, TreeNode};

/// Parser for TOML documents. Datetimes are kept in their RFC 3339 form.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlParser;

impl Parser for TomlParser {
    fn parse(&self, text: &str) -> Result<TreeNode> {
        let table: Table = toml::from_str(text).map_err(|e| {
            let position = e
                .span()
                .map(|span| Position::from_offset(text, span.start))
                .unwrap_or_default();
            debug!(error = %e, "malformed TOML document");
            ConfigError::parse(e.message().trim_end(), position)
        })?;
        build_tree(&Value::Table(table))
    }
}

impl DocumentValue for Value {
    fn view(&self) -> Result<ValueView<'_, Self>> {
        Ok(match self {
            Value::String(value) => ValueView::Scalar(value.clone()),
            Value::Integer(value) => ValueView::Scalar(value.to_string()),
            Value::Float(value) => ValueView::Scalar(value.to_string()),
            Value::Boolean(value) => ValueView::Scalar(value.to_string()),
            Value::Datetime(value) => ValueView::Scalar(value.to_string()),
            Value::Array(elements) => ValueView::Array(elements),
            Value::Table(table) => {
                ValueView::Object(table.iter().map(|(key, value)| (key.clone(), value)).collect())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<TreeNode> {
        TomlParser.parse(text)
    }

    #[test]
    fn test_tables_and_arrays_of_tables() {
        let tree = parse(
            r#"
testStr = "Hello"
testList = [1, 2, 3]

[testCfg]
testDouble = 0.5

[[testCfg.testNodes]]
testInt = 3

[[testCfg.testNodes]]
testInt = 2
"#,
        )
        .unwrap();
        let root = tree.as_item().unwrap();
        assert_eq!(root.param("testStr").unwrap().value(), Some("Hello"));
        assert_eq!(root.param("testList").unwrap().values().unwrap(), ["1", "2", "3"]);

        let cfg = root.node("testCfg").unwrap().as_item().unwrap();
        assert_eq!(cfg.param("testDouble").unwrap().value(), Some("0.5"));
        let nodes = cfg.node("testNodes").unwrap().as_list().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(
            nodes.node(0).unwrap().as_item().unwrap().param("testInt").unwrap().value(),
            Some("3")
        );
    }

    #[test]
    fn test_datetime_is_rfc3339() {
        let tree = parse("released = 1979-05-27T07:32:00Z\nday = 1979-05-27\n").unwrap();
        let root = tree.as_item().unwrap();
        assert_eq!(root.param("released").unwrap().value(), Some("1979-05-27T07:32:00Z"));
        assert_eq!(root.param("day").unwrap().value(), Some("1979-05-27"));
    }

    #[test]
    fn test_empty_array_is_empty_param_list() {
        let tree = parse("hosts = []\n").unwrap();
        let hosts = tree.as_item().unwrap().param("hosts").unwrap();
        assert_eq!(hosts.values(), Some(&[][..]));
    }

    #[test]
    fn test_syntax_error_has_line_and_column() {
        let error = parse("name = \"app\"\nport = \n").unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert_eq!(error.position().line, Some(2));
        assert!(error.position().column.is_some());
    }
}
