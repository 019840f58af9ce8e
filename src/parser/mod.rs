//! Format parsers turning configuration text into a [`TreeNode`].

mod document;
mod ini;
mod json;
mod toml;
mod yaml;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::ini::IniParser;
pub use self::json::JsonParser;
pub use self::toml::TomlParser;
pub use self::yaml::YamlParser;

use crate::error::Result;
use crate::tree::TreeNode;

/// A configuration syntax.
///
/// Parsers never look at the config type being loaded; they only build the
/// tree, failing with a [`Parse`](crate::ConfigError::Parse) error that
/// carries the position of malformed input.
pub trait Parser: Send + Sync + fmt::Debug {
    fn parse(&self, text: &str) -> Result<TreeNode>;
}

/// The built-in configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Toml,
    Ini,
}

impl Format {
    /// Detects the format from a file extension, case-insensitively.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "ini" | "cfg" | "conf" => Some(Self::Ini),
            _ => None,
        }
    }

    pub fn parser(self) -> &'static dyn Parser {
        match self {
            Self::Json => &JsonParser,
            Self::Yaml => &YamlParser,
            Self::Toml => &TomlParser,
            Self::Ini => &IniParser,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Ini => "ini",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strips the " at line L column C" tail that format libraries append to
/// their messages; the position is reported separately.
fn strip_location(message: &str) -> &str {
    match message.rfind(" at line ") {
        Some(index) => &message[..index],
        None => message,
    }
}
