//! Format-agnostic configuration tree.
//!
//! Every parser produces a [`TreeNode`] root; the [`Reader`](crate::Reader)
//! consumes it without knowing which syntax it came from. Trees are only
//! built by parsers (or by hand in tests) and are never mutated by readers.

mod position;

use std::collections::BTreeMap;

pub use position::Position;

use crate::error::{ConfigError, Result};

/// A leaf value: either a single string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeParam {
    value: ParamValue,
    position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParamValue {
    Item(String),
    List(Vec<String>),
}

impl TreeParam {
    pub fn item(value: impl Into<String>, position: Position) -> Self {
        Self {
            value: ParamValue::Item(value.into()),
            position,
        }
    }

    pub fn list(values: Vec<String>, position: Position) -> Self {
        Self {
            value: ParamValue::List(values),
            position,
        }
    }

    pub fn is_item(&self) -> bool {
        matches!(self.value, ParamValue::Item(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.value, ParamValue::List(_))
    }

    /// Returns the single value, or `None` for a list-valued param.
    pub fn value(&self) -> Option<&str> {
        match &self.value {
            ParamValue::Item(value) => Some(value),
            ParamValue::List(_) => None,
        }
    }

    /// Returns the value list, or `None` for a single-valued param.
    pub fn values(&self) -> Option<&[String]> {
        match &self.value {
            ParamValue::Item(_) => None,
            ParamValue::List(values) => Some(values),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

/// A tree node: an [`Item`](TreeItem) object or a [`List`](TreeList) of items.
///
/// The kind is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    data: NodeData,
    position: Position,
    is_root: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeData {
    Item(TreeItem),
    List(TreeList),
}

impl TreeNode {
    /// Creates an empty root item.
    pub fn root() -> Self {
        Self {
            data: NodeData::Item(TreeItem::default()),
            position: Position::new(1, 1),
            is_root: true,
        }
    }

    fn new_item(position: Position) -> Self {
        Self {
            data: NodeData::Item(TreeItem::default()),
            position,
            is_root: false,
        }
    }

    fn new_list(position: Position) -> Self {
        Self {
            data: NodeData::List(TreeList::default()),
            position,
            is_root: false,
        }
    }

    pub fn is_item(&self) -> bool {
        matches!(self.data, NodeData::Item(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.data, NodeData::List(_))
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn as_item(&self) -> Option<&TreeItem> {
        match &self.data {
            NodeData::Item(item) => Some(item),
            NodeData::List(_) => None,
        }
    }

    pub fn as_item_mut(&mut self) -> Option<&mut TreeItem> {
        match &mut self.data {
            NodeData::Item(item) => Some(item),
            NodeData::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&TreeList> {
        match &self.data {
            NodeData::Item(_) => None,
            NodeData::List(list) => Some(list),
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut TreeList> {
        match &mut self.data {
            NodeData::Item(_) => None,
            NodeData::List(list) => Some(list),
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self.data {
            NodeData::Item(_) => "item",
            NodeData::List(_) => "list",
        }
    }
}

/// Named params and nodes of an object. A name is used at most once,
/// by either a param or a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeItem {
    params: BTreeMap<String, TreeParam>,
    nodes: BTreeMap<String, TreeNode>,
}

impl TreeItem {
    pub fn params(&self) -> &BTreeMap<String, TreeParam> {
        &self.params
    }

    pub fn nodes(&self) -> &BTreeMap<String, TreeNode> {
        &self.nodes
    }

    pub fn param(&self, name: &str) -> Option<&TreeParam> {
        self.params.get(name)
    }

    pub fn node(&self, name: &str) -> Option<&TreeNode> {
        self.nodes.get(name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut TreeNode> {
        self.nodes.get_mut(name)
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn add_param(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        position: Position,
    ) -> Result<()> {
        let name = name.into();
        self.ensure_unused(&name, "Parameter", position)?;
        self.params.insert(name, TreeParam::item(value, position));
        Ok(())
    }

    pub fn add_param_list(
        &mut self,
        name: impl Into<String>,
        values: Vec<String>,
        position: Position,
    ) -> Result<()> {
        let name = name.into();
        self.ensure_unused(&name, "Parameter list", position)?;
        self.params.insert(name, TreeParam::list(values, position));
        Ok(())
    }

    /// Adds an item node and returns it for filling.
    pub fn add_node(&mut self, name: impl Into<String>, position: Position) -> Result<&mut TreeNode> {
        let name = name.into();
        self.ensure_unused(&name, "Node", position)?;
        Ok(self
            .nodes
            .entry(name)
            .or_insert_with(|| TreeNode::new_item(position)))
    }

    /// Adds a list node and returns it for filling.
    pub fn add_node_list(
        &mut self,
        name: impl Into<String>,
        position: Position,
    ) -> Result<&mut TreeNode> {
        let name = name.into();
        self.ensure_unused(&name, "Node list", position)?;
        Ok(self
            .nodes
            .entry(name)
            .or_insert_with(|| TreeNode::new_list(position)))
    }

    fn ensure_unused(&self, name: &str, entity: &str, position: Position) -> Result<()> {
        if self.params.contains_key(name) || self.nodes.contains_key(name) {
            return Err(ConfigError::DuplicateName {
                entity: format!("{entity} '{name}'"),
                position,
            });
        }
        Ok(())
    }
}

/// Ordered sequence of item nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeList {
    nodes: Vec<TreeNode>,
}

impl TreeList {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut TreeNode> {
        self.nodes.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TreeNode> {
        self.nodes.iter()
    }

    /// Appends an item node and returns it for filling.
    pub fn add_node(&mut self, position: Position) -> &mut TreeNode {
        self.nodes.push(TreeNode::new_item(position));
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }
}

impl<'a> IntoIterator for &'a TreeList {
    type Item = &'a TreeNode;
    type IntoIter = std::slice::Iter<'a, TreeNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
