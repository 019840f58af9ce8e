use std::path::PathBuf;

use thiserror::Error;

use crate::tree::Position;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Error raised while reading a configuration.
///
/// Errors raised beneath a nested node are wrapped in [`ConfigError::InField`]
/// on their way up, so the rendered message reads as a path through the
/// configuration while [`position`](Self::position) still points at the
/// innermost source location.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{entity}: expected {expected}, got {found}{}", .position.suffix())]
    Structural {
        entity: String,
        expected: &'static str,
        found: &'static str,
        position: Position,
    },

    #[error("unknown {kind} '{name}'{}", .position.suffix())]
    UnknownField {
        kind: &'static str,
        name: String,
        position: Position,
    },

    #[error("{entity} is missing")]
    MissingField { entity: String },

    #[error("{entity}: couldn't convert value '{value}'{}{}", detail(.message), .position.suffix())]
    Conversion {
        entity: String,
        value: String,
        message: Option<String>,
        position: Position,
    },

    #[error("{}{message}{}", prefix(.entity), .position.suffix())]
    Validation {
        entity: Option<String>,
        message: String,
        position: Position,
    },

    #[error("{entity} already exists{}", .position.suffix())]
    DuplicateName { entity: String, position: Position },

    #[error("{message}{}", .position.suffix())]
    Parse { message: String, position: Position },

    #[error("config file {} doesn't exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("can't open config file {} which is not a regular file", .0.display())]
    NotAFile(PathBuf),

    #[error("can't open config file {} for reading: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("can't detect the format of config file {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("can't read config stream: {0}")]
    StreamError(#[source] std::io::Error),

    #[error("{field}: {source}{}", fallback(.position, .source))]
    InField {
        field: String,
        position: Position,
        source: Box<ConfigError>,
    },
}

/// Coarse classification of a [`ConfigError`], independent of nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    UnknownField,
    MissingField,
    Conversion,
    Validation,
    DuplicateName,
    Source,
}

impl ConfigError {
    pub(crate) fn parse(message: impl Into<String>, position: Position) -> Self {
        Self::Parse {
            message: message.into(),
            position,
        }
    }

    /// Wraps the error with the description of the field it was raised under.
    ///
    /// `position` is the field's own location, used only when the wrapped
    /// error carries none.
    pub(crate) fn in_field(self, field: impl Into<String>, position: Position) -> Self {
        Self::InField {
            field: field.into(),
            position,
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Structural { .. } => ErrorKind::Structural,
            Self::UnknownField { .. } => ErrorKind::UnknownField,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::Conversion { .. } => ErrorKind::Conversion,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::Parse { .. }
            | Self::FileNotFound(_)
            | Self::NotAFile(_)
            | Self::UnsupportedFormat(_)
            | Self::ReadError { .. }
            | Self::StreamError(_) => ErrorKind::Source,
            Self::InField { source, .. } => source.kind(),
        }
    }

    /// Returns the innermost known source position of the error.
    pub fn position(&self) -> Position {
        match self {
            Self::Structural { position, .. }
            | Self::UnknownField { position, .. }
            | Self::Conversion { position, .. }
            | Self::Validation { position, .. }
            | Self::DuplicateName { position, .. }
            | Self::Parse { position, .. } => *position,
            Self::InField { position, source, .. } => {
                let inner = source.position();
                if inner.is_known() {
                    inner
                } else {
                    *position
                }
            }
            Self::MissingField { .. }
            | Self::FileNotFound(_)
            | Self::NotAFile(_)
            | Self::UnsupportedFormat(_)
            | Self::ReadError { .. }
            | Self::StreamError(_) => Position::UNKNOWN,
        }
    }

    /// Returns the innermost error, skipping every field wrapper.
    pub fn root_cause(&self) -> &ConfigError {
        match self {
            Self::InField { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Error returned by validators registered with `ensure` or `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Error returned by a [`FromTreeValue`](crate::FromTreeValue) conversion.
///
/// The message is optional; an unspecified failure is reported with the raw
/// value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("invalid value"))]
pub struct ConversionError {
    message: Option<String>,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn unspecified() -> Self {
        Self::default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!(": {message}"),
        _ => String::new(),
    }
}

fn fallback(position: &Position, source: &ConfigError) -> String {
    if source.position().is_known() {
        String::new()
    } else {
        position.suffix()
    }
}

fn prefix(entity: &Option<String>) -> String {
    match entity {
        Some(entity) => format!("{entity}: "),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_error_renders_path() {
        let error = ConfigError::Conversion {
            entity: "Parameter 'port'".into(),
            value: "abc".into(),
            message: Some("invalid digit found in string".into()),
            position: Position::new(4, 3),
        }
        .in_field("Node 'database'", Position::new(3, 1));

        assert_eq!(
            error.to_string(),
            "Node 'database': Parameter 'port': couldn't convert value 'abc': \
             invalid digit found in string (line 4, column 3)"
        );
        assert_eq!(error.kind(), ErrorKind::Conversion);
        assert_eq!(error.position(), Position::new(4, 3));
    }

    #[test]
    fn test_missing_field_message() {
        let error = ConfigError::MissingField {
            entity: "Parameter 'host'".into(),
        };
        assert_eq!(error.to_string(), "Parameter 'host' is missing");
        assert_eq!(error.position(), Position::UNKNOWN);
    }

    #[test]
    fn test_source_errors_share_kind() {
        let missing = ConfigError::FileNotFound("app.toml".into());
        let not_file = ConfigError::NotAFile("/tmp".into());
        assert_eq!(missing.kind(), ErrorKind::Source);
        assert_eq!(not_file.kind(), ErrorKind::Source);
        assert_ne!(missing.to_string(), not_file.to_string());
    }

    #[test]
    fn test_root_cause_skips_wrappers() {
        let error = ConfigError::parse("Section array index mismatch", Position::at_line(3))
            .in_field("Node 'a'", Position::UNKNOWN)
            .in_field("Node 'b'", Position::UNKNOWN);
        assert!(matches!(error.root_cause(), ConfigError::Parse { .. }));
    }

    #[test]
    fn test_wrapper_position_fills_in_unknown_inner_position() {
        let error = ConfigError::MissingField {
            entity: "Parameter 'port'".into(),
        }
        .in_field("Node 'database'", Position::new(7, 1));

        assert_eq!(error.position(), Position::new(7, 1));
        assert_eq!(
            error.to_string(),
            "Node 'database': Parameter 'port' is missing (line 7, column 1)"
        );
    }

    #[test]
    fn test_conversion_error_default_message() {
        assert_eq!(ConversionError::unspecified().to_string(), "invalid value");
        assert_eq!(ConversionError::new("too large").message(), Some("too large"));
    }
}
