//! Typed binding of configuration trees onto application config objects.
//!
//! A config type implements [`Config`] and registers its fields with a
//! [`Reader`] in [`Config::bind`]. The reader then walks a [`TreeNode`],
//! dispatches every named entry to the field registered under that name,
//! checks that nothing required was left out, and finally runs validators
//! in registration order.
//!
//! ```
//! use treeconf::{Config, ConfigReader, Reader, ValidationError};
//!
//! #[derive(Debug, Default)]
//! struct Thumbnails {
//!     enabled: bool,
//!     max_width: u32,
//! }
//!
//! impl Config for Thumbnails {
//!     fn bind(reader: &mut Reader<Self>) {
//!         reader.param("enabled", |c| &mut c.enabled).default(true);
//!         reader
//!             .param("max_width", |c| &mut c.max_width)
//!             .ensure(|width| match *width {
//!                 0 => Err(ValidationError::new("must be positive")),
//!                 _ => Ok(()),
//!             });
//!     }
//! }
//!
//! #[derive(Debug, Default)]
//! struct Viewer {
//!     root_dir: String,
//!     thumbnails: Thumbnails,
//! }
//!
//! impl Config for Viewer {
//!     fn bind(reader: &mut Reader<Self>) {
//!         reader.param("root_dir", |c| &mut c.root_dir);
//!         reader.node("thumbnails", |c| &mut c.thumbnails);
//!     }
//! }
//!
//! let viewer: Viewer = ConfigReader::new().read_toml(
//!     r#"
//!     root_dir = "~/Photos"
//!     [thumbnails]
//!     max_width = 256
//!     "#,
//! )?;
//! assert!(viewer.thumbnails.enabled);
//! assert_eq!(viewer.thumbnails.max_width, 256);
//! # Ok::<(), treeconf::ConfigError>(())
//! ```

mod field;
mod name;
mod target;

use std::collections::HashMap;
use std::marker::PhantomData;

use tracing::trace;

pub use name::NameFormat;
pub use target::{DictTarget, NodeListTarget, ParamListTarget};

use crate::convert::FromTreeValue;
use crate::error::{ConfigError, Result, ValidationError};
use crate::tree::{Position, TreeNode};
use field::{
    DictField, Field, FieldLoader, NodeField, NodeListField, NodeListMode, OptionalNodeField,
    ParamField, ParamListField,
};

/// An application-defined configuration object.
///
/// `bind` registers every field, in declaration order, with the reader that
/// is about to load the object. Registration order decides the order in
/// which validators run and missing fields are reported.
pub trait Config: Default + 'static {
    fn bind(reader: &mut Reader<Self>);
}

type Check<C> = Box<dyn Fn(&mut C) -> std::result::Result<(), ValidationError>>;

struct Validator<C> {
    field: Option<usize>,
    check: Check<C>,
}

/// Binding engine for one config object.
///
/// A reader is single-use per object: it is created with the object's field
/// registrations, loads one tree (twice for elements of a copy-mode node
/// list) and is dropped afterwards, leaving the object self-contained.
pub struct Reader<C> {
    name_format: NameFormat,
    fields: Vec<Field<C>>,
    index: HashMap<String, usize>,
    validators: Vec<Validator<C>>,
}

impl<C: Config> Reader<C> {
    /// Creates a reader with all of `C`'s fields registered.
    pub fn new(name_format: NameFormat) -> Self {
        let mut reader = Self {
            name_format,
            fields: Vec::new(),
            index: HashMap::new(),
            validators: Vec::new(),
        };
        C::bind(&mut reader);
        reader
    }
}

impl<C: 'static> Reader<C> {
    /// Registers a scalar parameter.
    ///
    /// `Option<T>` fields may be absent from the tree.
    pub fn param<T>(&mut self, name: &str, access: fn(&mut C) -> &mut T) -> FieldHandle<'_, C, T>
    where
        T: FromTreeValue + 'static,
    {
        self.register(
            name,
            "Parameter",
            T::OPTIONAL,
            Box::new(ParamField { access }),
            access,
        )
    }

    /// Registers a list-of-scalars parameter.
    pub fn param_list<L>(
        &mut self,
        name: &str,
        access: fn(&mut C) -> &mut L,
    ) -> FieldHandle<'_, C, L>
    where
        L: ParamListTarget,
    {
        self.register(
            name,
            "Parameter list",
            L::OPTIONAL,
            Box::new(ParamListField { access }),
            access,
        )
    }

    /// Registers a string-keyed dictionary, read from a node whose params
    /// become the entries.
    pub fn dict<M>(&mut self, name: &str, access: fn(&mut C) -> &mut M) -> FieldHandle<'_, C, M>
    where
        M: DictTarget,
    {
        self.register(
            name,
            "Dictionary",
            M::OPTIONAL,
            Box::new(DictField { access }),
            access,
        )
    }

    /// Registers a nested config object.
    pub fn node<U>(&mut self, name: &str, access: fn(&mut C) -> &mut U) -> FieldHandle<'_, C, U>
    where
        U: Config,
    {
        let reader = Reader::<U>::new(self.name_format);
        self.register(
            name,
            "Node",
            false,
            Box::new(NodeField { access, reader }),
            access,
        )
    }

    /// Registers a nested config object that may be absent; it is created
    /// from `U::default()` only when the tree contains it.
    pub fn optional_node<U>(
        &mut self,
        name: &str,
        access: fn(&mut C) -> &mut Option<U>,
    ) -> FieldHandle<'_, C, Option<U>>
    where
        U: Config,
    {
        let reader = Reader::<U>::new(self.name_format);
        self.register(
            name,
            "Node",
            true,
            Box::new(OptionalNodeField { access, reader }),
            access,
        )
    }

    /// Registers a list of nested config objects, each loaded independently.
    pub fn node_list<L>(&mut self, name: &str, access: fn(&mut C) -> &mut L) -> FieldHandle<'_, C, L>
    where
        L: NodeListTarget,
    {
        self.register_node_list(name, access, NodeListMode::Normal)
    }

    /// Registers a list of nested config objects where every element after
    /// the first starts out as a copy of the first one.
    pub fn copy_node_list<L>(
        &mut self,
        name: &str,
        access: fn(&mut C) -> &mut L,
    ) -> FieldHandle<'_, C, L>
    where
        L: NodeListTarget,
    {
        self.register_node_list(name, access, NodeListMode::Copy)
    }

    /// Adds an object-level validator, run after every field has loaded.
    pub fn validate<F>(&mut self, check: F)
    where
        F: Fn(&C) -> std::result::Result<(), ValidationError> + 'static,
    {
        self.validators.push(Validator {
            field: None,
            check: Box::new(move |cfg: &mut C| check(&*cfg)),
        });
    }

    fn register_node_list<L: NodeListTarget>(
        &mut self,
        name: &str,
        access: fn(&mut C) -> &mut L,
        mode: NodeListMode,
    ) -> FieldHandle<'_, C, L> {
        let loader = NodeListField {
            access,
            mode,
            name_format: self.name_format,
        };
        self.register(name, "Node list", L::OPTIONAL, Box::new(loader), access)
    }

    fn register<T>(
        &mut self,
        name: &str,
        kind: &'static str,
        optional: bool,
        loader: Box<dyn FieldLoader<C>>,
        access: fn(&mut C) -> &mut T,
    ) -> FieldHandle<'_, C, T> {
        assert!(!name.is_empty(), "config field name must not be empty");
        let name = self.name_format.apply(name);
        assert!(
            !self.index.contains_key(&name),
            "config field '{name}' is registered twice"
        );

        let id = self.fields.len();
        self.index.insert(name.clone(), id);
        self.fields.push(Field::new(name, kind, optional, loader));
        FieldHandle {
            field: &mut self.fields[id],
            validators: &mut self.validators,
            id,
            access,
            _value: PhantomData,
        }
    }
}

impl<C> Reader<C> {
    /// Loads `tree` into `cfg`.
    ///
    /// On error `cfg` may be partially written and should be discarded.
    pub fn load(&mut self, tree: &TreeNode, cfg: &mut C) -> Result<()> {
        let item = tree.as_item().ok_or_else(|| ConfigError::Structural {
            entity: "Config node".into(),
            expected: "item",
            found: "list",
            position: tree.position(),
        })?;

        for (name, node) in item.nodes() {
            let id = self.lookup(name, "node", node.position())?;
            self.fields[id].load_node(node, cfg)?;
        }
        for (name, param) in item.params() {
            let id = self.lookup(name, "param", param.position())?;
            self.fields[id].load_param(param, cfg)?;
        }

        for field in &mut self.fields {
            field.complete(cfg)?;
        }
        self.run_validators(cfg)
    }

    fn lookup(&self, name: &str, kind: &'static str, position: Position) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownField {
                kind,
                name: name.to_owned(),
                position,
            })
    }

    fn run_validators(&self, cfg: &mut C) -> Result<()> {
        for validator in &self.validators {
            if let Err(e) = (validator.check)(cfg) {
                let field = validator.field.map(|id| &self.fields[id]);
                trace!(field = ?field.map(|f| &f.name), "validation failed");
                return Err(ConfigError::Validation {
                    entity: field.map(Field::description),
                    message: e.message().to_owned(),
                    position: field.map(Field::position).unwrap_or_default(),
                });
            }
        }
        Ok(())
    }
}

/// Handle to a just-registered field, used to attach a default, mark it
/// optional or add validators.
pub struct FieldHandle<'r, C, T> {
    field: &'r mut Field<C>,
    validators: &'r mut Vec<Validator<C>>,
    id: usize,
    access: fn(&mut C) -> &mut T,
    _value: PhantomData<fn() -> T>,
}

impl<C: 'static, T: 'static> FieldHandle<'_, C, T> {
    /// Value the field takes when the tree doesn't mention it. A field with a
    /// default is never reported missing.
    pub fn default(self, value: T) -> Self {
        let access = self.access;
        self.field.default = Some(Box::new(move |cfg: &mut C| *access(cfg) = value));
        self
    }

    /// Lets the field be absent from the tree, keeping whatever value the
    /// object was constructed with.
    pub fn optional(self) -> Self {
        self.field.optional = true;
        self
    }

    /// Adds a validator over the loaded field value.
    pub fn ensure<F>(self, check: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<(), ValidationError> + 'static,
    {
        let access = self.access;
        self.validators.push(Validator {
            field: Some(self.id),
            check: Box::new(move |cfg: &mut C| check(&*access(cfg))),
        });
        self
    }
}
