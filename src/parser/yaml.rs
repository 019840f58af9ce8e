use serde_yaml::Value;
use tracing::debug;

use super::document::{build_tree, DocumentValue, ValueView};
use super::{strip_location, Parser};
use crate::error::{ConfigError, Result};
use crate::tree::{Position, TreeNode};

/// Parser for YAML documents. An empty document is an empty configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl Parser for YamlParser {
    fn parse(&self, text: &str) -> Result<TreeNode> {
        let document: Value = serde_yaml::from_str(text).map_err(|e| {
            let position = e
                .location()
                .map(|location| Position::new(location.line(), location.column()))
                .unwrap_or_default();
            debug!(error = %e, "malformed YAML document");
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
            Value::Sequence(elements) => ValueView::Array(elements),
            Value::Mapping(mapping) => ValueView::Object(
                mapping
                    .iter()
                    .map(|(key, value)| Ok((mapping_key(key)?, value)))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Tagged(tagged) => return tagged.value.view(),
        })
    }
}

fn mapping_key(key: &Value) -> Result<String> {
    match key {
        Value::String(key) => Ok(key.clone()),
        Value::Bool(key) => Ok(key.to_string()),
        Value::Number(key) => Ok(key.to_string()),
        _ => Err(ConfigError::parse(
            "Mapping keys must be single values",
            Position::UNKNOWN,
        )),
    }
}
