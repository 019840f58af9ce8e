//! Typed configuration loading from JSON, YAML, TOML and INI.
//!
//! Sources are parsed into a format-agnostic [`TreeNode`] and then bound onto
//! application types implementing [`Config`]. Unknown names, missing fields,
//! failed conversions and failed validators are reported with the path of
//! the offending field and, where the format provides it, its line and
//! column.

pub mod config;
pub mod convert;
mod error;
pub mod parser;
pub mod reader;
pub mod tree;

pub use config::ConfigReader;
pub use convert::FromTreeValue;
pub use error::{ConfigError, ConversionError, ErrorKind, Result, ValidationError};
pub use parser::{Format, IniParser, JsonParser, Parser, TomlParser, YamlParser};
pub use reader::{
    Config, DictTarget, FieldHandle, NameFormat, NodeListTarget, ParamListTarget, Reader,
};
pub use tree::{Position, TreeItem, TreeList, TreeNode, TreeParam};
