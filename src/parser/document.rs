//! Shared tree construction for the structured formats (JSON, YAML, TOML).
//!
//! Objects become item nodes and scalars become params. An array becomes a
//! node list when its first element is an object, and a param list
//! otherwise. Null values are left out of the tree.

use crate::error::{ConfigError, Result};
use crate::tree::{Position, TreeItem, TreeNode};

/// One document value, seen through the shapes the tree can hold.
pub(super) enum ValueView<'a, V> {
    Null,
    Scalar(String),
    Array(&'a [V]),
    Object(Vec<(String, &'a V)>),
}

pub(super) trait DocumentValue: Sized {
    fn view(&self) -> Result<ValueView<'_, Self>>;
}

pub(super) fn build_tree<V: DocumentValue>(root: &V) -> Result<TreeNode> {
    let mut tree = TreeNode::root();
    match root.view()? {
        ValueView::Null => {}
        ValueView::Object(entries) => {
            if let Some(item) = tree.as_item_mut() {
                fill_item(item, entries)?;
            }
        }
        ValueView::Scalar(_) | ValueView::Array(_) => {
            return Err(ConfigError::parse(
                "Document root must be an object with named values",
                Position::new(1, 1),
            ));
        }
    }
    Ok(tree)
}

fn fill_item<V: DocumentValue>(item: &mut TreeItem, entries: Vec<(String, &V)>) -> Result<()> {
    for (name, value) in entries {
        match value.view()? {
            ValueView::Null => {}
            ValueView::Scalar(value) => item.add_param(name, value, Position::UNKNOWN)?,
            ValueView::Object(children) => {
                let node = item.add_node(name, Position::UNKNOWN)?;
                if let Some(child) = node.as_item_mut() {
                    fill_item(child, children)?;
                }
            }
            ValueView::Array(elements) => add_array(item, name, elements)?,
        }
    }
    Ok(())
}

fn add_array<V: DocumentValue>(item: &mut TreeItem, name: String, elements: &[V]) -> Result<()> {
    let views = elements
        .iter()
        .map(V::view)
        .collect::<Result<Vec<_>>>()?;

    if matches!(views.first(), Some(ValueView::Object(_))) {
        let node = item.add_node_list(name.as_str(), Position::UNKNOWN)?;
        let Some(list) = node.as_list_mut() else {
            return Ok(());
        };
        for (index, view) in views.into_iter().enumerate() {
            let ValueView::Object(entries) = view else {
                return Err(ConfigError::parse(
                    format!("Node list '{name}' element {index} must be an object"),
                    Position::UNKNOWN,
                ));
            };
            if let Some(element) = list.add_node(Position::UNKNOWN).as_item_mut() {
                fill_item(element, entries)?;
            }
        }
        return Ok(());
    }

    let mut values = Vec::with_capacity(views.len());
    for view in views {
        match view {
            ValueView::Scalar(value) => values.push(value),
            ValueView::Null => {
                return Err(ConfigError::parse(
                    format!("Parameter list '{name}' element is missing"),
                    Position::UNKNOWN,
                ));
            }
            ValueView::Array(_) | ValueView::Object(_) => {
                return Err(ConfigError::parse(
                    format!("Parameter list '{name}' can only contain single values"),
                    Position::UNKNOWN,
                ));
            }
        }
    }
    item.add_param_list(name, values, Position::UNKNOWN)
}
