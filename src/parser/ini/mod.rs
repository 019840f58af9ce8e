//! INI parser reconstructing nesting from dotted section names.
//!
//! `[a.b]` is node `b` inside node `a`; a numeric part makes the preceding
//! part a section array, so `[servers.0]` and `[servers.1]` are the two
//! elements of node list `servers`. Array indices must be introduced in
//! order, starting from zero. Entries before the first header belong to the
//! root. Values written as `[x, y, z]` are param lists.

mod lexer;
mod value;

use std::collections::HashMap;

use tracing::trace;

use super::Parser;
use crate::error::{ConfigError, Result};
use crate::tree::{Position, TreeItem, TreeNode};
use lexer::Section;
use value::Value;

/// Parser for INI documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniParser;

impl Parser for IniParser {
    fn parse(&self, text: &str) -> Result<TreeNode> {
        let mut tree = TreeNode::root();
        let mut index = SectionIndex::default();
        for section in lexer::lex(text)? {
            let path = match section.name {
                Some(name) => index.resolve(&mut tree, name, section.position)?,
                None => Vec::new(),
            };
            let node = node_at(&mut tree, &path).ok_or_else(|| {
                ConfigError::parse("Section can't be resolved", section.position)
            })?;
            add_entries(node, &section)?;
        }
        Ok(tree)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Index(usize),
}

/// Tree paths of every dotted section prefix seen so far, so sections
/// sharing a prefix attach to the same node.
#[derive(Debug, Default)]
struct SectionIndex {
    paths: HashMap<String, Vec<Step>>,
}

impl SectionIndex {
    fn resolve(&mut self, tree: &mut TreeNode, name: &str, position: Position) -> Result<Vec<Step>> {
        let parts: Vec<&str> = name.split('.').map(str::trim).collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(ConfigError::parse(
                format!("Section name '{name}' has an empty part"),
                position,
            ));
        }

        let mut prefix = String::new();
        let mut path = Vec::new();
        for (i, part) in parts.iter().enumerate() {
            let parent_prefix = prefix.clone();
            if i > 0 {
                prefix.push('.');
            }
            prefix.push_str(part);
            if let Some(known) = self.paths.get(&prefix) {
                path.clone_from(known);
                continue;
            }

            let parent = node_at(tree, &path)
                .ok_or_else(|| ConfigError::parse("Section can't be resolved", position))?;
            if is_index(part) {
                let list = parent.as_list_mut().ok_or_else(|| {
                    ConfigError::parse(
                        format!("Section '{name}': index '{part}' doesn't follow a section array"),
                        position,
                    )
                })?;
                let index = part
                    .parse::<usize>()
                    .ok()
                    .filter(|index| *index == list.len())
                    .ok_or_else(|| ConfigError::parse("Section array index mismatch", position))?;
                list.add_node(position);
                path.push(Step::Index(index));
            } else {
                let item = parent.as_item_mut().ok_or_else(|| {
                    ConfigError::parse(
                        format!(
                            "Section '{name}': section array '{parent_prefix}' must be followed by an index"
                        ),
                        position,
                    )
                })?;
                if parts.get(i + 1).is_some_and(|next| is_index(next)) {
                    item.add_node_list(*part, position)?;
                } else {
                    item.add_node(*part, position)?;
                }
                path.push(Step::Key((*part).to_owned()));
            }
            trace!(section = %prefix, "resolved INI section");
            self.paths.insert(prefix.clone(), path.clone());
        }
        Ok(path)
    }
}

fn is_index(part: &str) -> bool {
    part.bytes().all(|b| b.is_ascii_digit())
}

fn node_at<'t>(mut node: &'t mut TreeNode, path: &[Step]) -> Option<&'t mut TreeNode> {
    for step in path {
        node = match step {
            Step::Key(name) => node.as_item_mut()?.node_mut(name)?,
            Step::Index(index) => node.as_list_mut()?.node_mut(*index)?,
        };
    }
    Some(node)
}

fn add_entries(node: &mut TreeNode, section: &Section<'_>) -> Result<()> {
    if section.entries.is_empty() {
        return Ok(());
    }
    let item: &mut TreeItem = node.as_item_mut().ok_or_else(|| {
        ConfigError::parse(
            format!(
                "Section '{}' is a section array; its params belong in indexed sections",
                section.name.unwrap_or_default()
            ),
            section.position,
        )
    })?;

    for entry in &section.entries {
        match value::read_value(entry.key, entry.value, entry.value_position)? {
            Value::Scalar(value) => item.add_param(entry.key, value, entry.position)?,
            Value::List(values) => item.add_param_list(entry.key, values, entry.position)?,
        }
    }
    Ok(())
}
