//! Field descriptors: typed adapters between tree entries and config fields.

use tracing::trace;

use crate::convert::FromTreeValue;
use crate::error::{ConfigError, Result};
use crate::reader::target::{DictTarget, NodeListTarget, ParamListTarget};
use crate::reader::{Config, NameFormat, Reader};
use crate::tree::{Position, TreeNode, TreeParam};

/// How the elements of a node list are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeListMode {
    /// Each element is loaded from its own tree node only.
    Normal,
    /// Every element after the first is loaded from the first element's tree
    /// node and then from its own, inheriting whatever it leaves unset.
    Copy,
}

/// Loads one kind of tree entry into a config field.
///
/// A descriptor bound to a param rejects tree nodes and vice versa.
pub(crate) trait FieldLoader<C> {
    fn load_param(&mut self, param: &TreeParam, _cfg: &mut C, entity: &str) -> Result<()> {
        Err(ConfigError::Structural {
            entity: entity.to_owned(),
            expected: "node",
            found: "parameter",
            position: param.position(),
        })
    }

    fn load_node(&mut self, node: &TreeNode, _cfg: &mut C, entity: &str) -> Result<()> {
        Err(ConfigError::Structural {
            entity: entity.to_owned(),
            expected: "parameter",
            found: "node",
            position: node.position(),
        })
    }
}

/// Registered field: name, load state and the typed loader writing into it.
pub(crate) struct Field<C> {
    pub(crate) name: String,
    kind: &'static str,
    satisfied: bool,
    pub(crate) optional: bool,
    position: Position,
    pub(crate) default: Option<Box<dyn FnOnce(&mut C)>>,
    loader: Box<dyn FieldLoader<C>>,
}

impl<C> Field<C> {
    pub(crate) fn new(
        name: String,
        kind: &'static str,
        optional: bool,
        loader: Box<dyn FieldLoader<C>>,
    ) -> Self {
        Self {
            name,
            kind,
            satisfied: false,
            optional,
            position: Position::UNKNOWN,
            default: None,
            loader,
        }
    }

    pub(crate) fn description(&self) -> String {
        format!("{} '{}'", self.kind, self.name)
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn load_param(&mut self, param: &TreeParam, cfg: &mut C) -> Result<()> {
        trace!(field = %self.name, "loading parameter");
        self.satisfied = true;
        self.position = param.position();
        let entity = self.description();
        self.loader.load_param(param, cfg, &entity)
    }

    pub(crate) fn load_node(&mut self, node: &TreeNode, cfg: &mut C) -> Result<()> {
        trace!(field = %self.name, "loading node");
        self.satisfied = true;
        self.position = node.position();
        let entity = self.description();
        self.loader.load_node(node, cfg, &entity)
    }

    /// Settles a field the tree didn't mention: applies its default, or
    /// reports it missing unless it may be absent.
    pub(crate) fn complete(&mut self, cfg: &mut C) -> Result<()> {
        if self.satisfied {
            return Ok(());
        }
        if let Some(default) = self.default.take() {
            trace!(field = %self.name, "applying default");
            default(cfg);
            self.satisfied = true;
            return Ok(());
        }
        if self.optional {
            return Ok(());
        }
        Err(ConfigError::MissingField {
            entity: self.description(),
        })
    }
}

fn convert<T: FromTreeValue>(raw: &str, entity: &str, position: Position) -> Result<T> {
    T::from_tree_value(raw).map_err(|e| ConfigError::Conversion {
        entity: entity.to_owned(),
        value: raw.to_owned(),
        message: e.message().map(str::to_owned),
        position,
    })
}

pub(crate) struct ParamField<C, T> {
    pub(crate) access: fn(&mut C) -> &mut T,
}

impl<C, T: FromTreeValue> FieldLoader<C> for ParamField<C, T> {
    fn load_param(&mut self, param: &TreeParam, cfg: &mut C, entity: &str) -> Result<()> {
        let raw = param.value().ok_or_else(|| ConfigError::Structural {
            entity: entity.to_owned(),
            expected: "single value",
            found: "list",
            position: param.position(),
        })?;
        *(self.access)(cfg) = convert(raw, entity, param.position())?;
        Ok(())
    }
}

pub(crate) struct ParamListField<C, L> {
    pub(crate) access: fn(&mut C) -> &mut L,
}

impl<C, L: ParamListTarget> FieldLoader<C> for ParamListField<C, L> {
    fn load_param(&mut self, param: &TreeParam, cfg: &mut C, entity: &str) -> Result<()> {
        let raw_values = param.values().ok_or_else(|| ConfigError::Structural {
            entity: entity.to_owned(),
            expected: "list",
            found: "single value",
            position: param.position(),
        })?;
        let values = raw_values
            .iter()
            .map(|raw| convert(raw, entity, param.position()))
            .collect::<Result<Vec<L::Element>>>()?;
        (self.access)(cfg).replace(values);
        Ok(())
    }
}

pub(crate) struct DictField<C, M> {
    pub(crate) access: fn(&mut C) -> &mut M,
}

impl<C, M: DictTarget> FieldLoader<C> for DictField<C, M> {
    fn load_node(&mut self, node: &TreeNode, cfg: &mut C, entity: &str) -> Result<()> {
        let item = node.as_item().ok_or_else(|| ConfigError::Structural {
            entity: entity.to_owned(),
            expected: "item",
            found: "list",
            position: node.position(),
        })?;
        if let Some((key, nested)) = item.nodes().iter().next() {
            return Err(ConfigError::Structural {
                entity: format!("{entity} element '{key}'"),
                expected: "single value",
                found: "node",
                position: nested.position(),
            });
        }

        let mut entries = Vec::with_capacity(item.params().len());
        for (key, param) in item.params() {
            let element = format!("{entity} element '{key}'");
            let raw = param.value().ok_or_else(|| ConfigError::Structural {
                entity: element.clone(),
                expected: "single value",
                found: "list",
                position: param.position(),
            })?;
            entries.push((key.clone(), convert(raw, &element, param.position())?));
        }
        (self.access)(cfg).replace(entries);
        Ok(())
    }
}

pub(crate) struct NodeField<C, U> {
    pub(crate) access: fn(&mut C) -> &mut U,
    pub(crate) reader: Reader<U>,
}

impl<C, U: Config> FieldLoader<C> for NodeField<C, U> {
    fn load_node(&mut self, node: &TreeNode, cfg: &mut C, entity: &str) -> Result<()> {
        ensure_item(node, entity)?;
        self.reader
            .load(node, (self.access)(cfg))
            .map_err(|e| e.in_field(entity, node.position()))
    }
}

pub(crate) struct OptionalNodeField<C, U> {
    pub(crate) access: fn(&mut C) -> &mut Option<U>,
    pub(crate) reader: Reader<U>,
}

impl<C, U: Config> FieldLoader<C> for OptionalNodeField<C, U> {
    fn load_node(&mut self, node: &TreeNode, cfg: &mut C, entity: &str) -> Result<()> {
        ensure_item(node, entity)?;
        let target = (self.access)(cfg).get_or_insert_with(U::default);
        self.reader
            .load(node, target)
            .map_err(|e| e.in_field(entity, node.position()))
    }
}

pub(crate) struct NodeListField<C, L> {
    pub(crate) access: fn(&mut C) -> &mut L,
    pub(crate) mode: NodeListMode,
    pub(crate) name_format: NameFormat,
}

impl<C, L: NodeListTarget> FieldLoader<C> for NodeListField<C, L> {
    fn load_node(&mut self, node: &TreeNode, cfg: &mut C, entity: &str) -> Result<()> {
        let list = node.as_list().ok_or_else(|| ConfigError::Structural {
            entity: entity.to_owned(),
            expected: "list",
            found: "item",
            position: node.position(),
        })?;

        let mut elements = Vec::with_capacity(list.len());
        for (index, element) in list.iter().enumerate() {
            let mut target = L::Element::default();
            let mut reader = Reader::<L::Element>::new(self.name_format);
            let loaded = match (self.mode, list.node(0)) {
                (NodeListMode::Copy, Some(first)) if index > 0 => reader
                    .load(first, &mut target)
                    .and_then(|()| reader.load(element, &mut target)),
                _ => reader.load(element, &mut target),
            };
            loaded.map_err(|e| {
                e.in_field(format!("{entity}, element {index}"), element.position())
            })?;
            elements.push(target);
        }
        (self.access)(cfg).replace(elements);
        Ok(())
    }

    // Formats that can't tell an empty array of objects from an empty array
    // of scalars produce an empty param list.
    fn load_param(&mut self, param: &TreeParam, cfg: &mut C, entity: &str) -> Result<()> {
        match param.values() {
            Some([]) => {
                (self.access)(cfg).replace(Vec::new());
                Ok(())
            }
            _ => Err(ConfigError::Structural {
                entity: entity.to_owned(),
                expected: "list",
                found: "parameter",
                position: param.position(),
            }),
        }
    }
}

fn ensure_item(node: &TreeNode, entity: &str) -> Result<()> {
    if node.is_item() {
        Ok(())
    } else {
        Err(ConfigError::Structural {
            entity: entity.to_owned(),
            expected: "item",
            found: node.kind_name(),
            position: node.position(),
        })
    }
}
