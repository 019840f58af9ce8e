use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::file::load_config_file;
use crate::error::{ConfigError, Result};
use crate::parser::{Format, IniParser, JsonParser, Parser, TomlParser, YamlParser};
use crate::reader::{Config, NameFormat, Reader};
use crate::tree::TreeNode;

/// Entry point for reading configuration objects.
///
/// Every read parses the source into a tree, creates a fresh [`Reader`] for
/// the requested type and loads a default-constructed object from it. The
/// object is returned only when the whole load succeeded.
///
/// ## Example
///
/// ```no_run
/// use treeconf::{Config, ConfigReader, NameFormat, Reader};
///
/// #[derive(Debug, Default)]
/// struct Server {
///     bind_address: String,
///     worker_threads: usize,
/// }
///
/// impl Config for Server {
///     fn bind(reader: &mut Reader<Self>) {
///         reader.param("bind_address", |c| &mut c.bind_address);
///         reader.param("worker_threads", |c| &mut c.worker_threads).default(4);
///     }
/// }
///
/// // Reads `bindAddress` and `workerThreads` keys.
/// let server: Server = ConfigReader::new()
///     .with_name_format(NameFormat::CamelCase)
///     .read_file_auto("config/server.json")?;
/// # Ok::<(), treeconf::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
#[must_use = "a reader does nothing until one of its read methods is called"]
pub struct ConfigReader {
    name_format: NameFormat,
}

impl ConfigReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the naming convention applied to registered field names.
    pub fn with_name_format(mut self, name_format: NameFormat) -> Self {
        self.name_format = name_format;
        self
    }

    pub fn name_format(&self) -> NameFormat {
        self.name_format
    }

    /// Loads an already parsed tree.
    pub fn load<C: Config>(&self, tree: &TreeNode) -> Result<C> {
        let mut cfg = C::default();
        Reader::<C>::new(self.name_format).load(tree, &mut cfg)?;
        Ok(cfg)
    }

    pub fn read<C: Config>(&self, text: &str, parser: &dyn Parser) -> Result<C> {
        debug!(?parser, "reading config from text");
        let tree = parser.parse(text)?;
        self.load(&tree)
    }

    pub fn read_from<C: Config>(&self, mut source: impl Read, parser: &dyn Parser) -> Result<C> {
        debug!(?parser, "reading config from stream");
        let mut text = String::new();
        source
            .read_to_string(&mut text)
            .map_err(ConfigError::StreamError)?;
        let tree = parser.parse(&text)?;
        self.load(&tree)
    }

    pub fn read_file<C: Config>(&self, path: impl AsRef<Path>, parser: &dyn Parser) -> Result<C> {
        let path = path.as_ref();
        debug!(path = %path.display(), ?parser, "reading config file");
        let text = load_config_file(path)?;
        let tree = parser.parse(&text)?;
        self.load(&tree)
    }

    /// Reads a file whose format is detected from its extension.
    pub fn read_file_auto<C: Config>(&self, path: impl AsRef<Path>) -> Result<C> {
        let path = path.as_ref();
        let format = Format::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        self.read_file(path, format.parser())
    }

    pub fn read_json<C: Config>(&self, text: &str) -> Result<C> {
        self.read(text, &JsonParser)
    }

    pub fn read_json_file<C: Config>(&self, path: impl AsRef<Path>) -> Result<C> {
        self.read_file(path, &JsonParser)
    }

    pub fn read_yaml<C: Config>(&self, text: &str) -> Result<C> {
        self.read(text, &YamlParser)
    }

    pub fn read_yaml_file<C: Config>(&self, path: impl AsRef<Path>) -> Result<C> {
        self.read_file(path, &YamlParser)
    }

    pub fn read_toml<C: Config>(&self, text: &str) -> Result<C> {
        self.read(text, &TomlParser)
    }

    pub fn read_toml_file<C: Config>(&self, path: impl AsRef<Path>) -> Result<C> {
        self.read_file(path, &TomlParser)
    }

    pub fn read_ini<C: Config>(&self, text: &str) -> Result<C> {
        self.read(text, &IniParser)
    }

    pub fn read_ini_file<C: Config>(&self, path: impl AsRef<Path>) -> Result<C> {
        self.read_file(path, &IniParser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Default)]
    struct Database {
        host: String,
        port: u16,
    }

    impl Config for Database {
        fn bind(reader: &mut Reader<Self>) {
            reader.param("host", |c| &mut c.host);
            reader.param("port", |c| &mut c.port).default(5432);
        }
    }

    #[test]
    fn test_read_text() {
        let db: Database = ConfigReader::new().read_ini("host = db.local\n").unwrap();
        assert_eq!(db.host, "db.local");
        assert_eq!(db.port, 5432);
    }

    #[test]
    fn test_read_stream() {
        let source = "host: db.local\nport: 6432\n".as_bytes();
        let db: Database = ConfigReader::new().read_from(source, &YamlParser).unwrap();
        assert_eq!(db.port, 6432);
    }

    #[test]
    fn test_stream_with_invalid_utf8() {
        let source: &[u8] = &[b'h', b'o', b's', b't', b'=', 0xff, 0xfe];
        let result: Result<Database> = ConfigReader::new().read_from(source, &IniParser);
        let error = result.unwrap_err();
        assert!(matches!(error, ConfigError::StreamError(_)));
        assert_eq!(error.kind(), ErrorKind::Source);
    }

    #[test]
    fn test_read_file_detects_format() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "host = \"db.local\"\nport = 7000").unwrap();

        let db: Database = ConfigReader::new().read_file_auto(file.path()).unwrap();
        assert_eq!(db.host, "db.local");
        assert_eq!(db.port, 7000);
    }

    #[test]
    fn test_unknown_extension() {
        let file = NamedTempFile::new().unwrap();
        let result: Result<Database> = ConfigReader::new().read_file_auto(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let result: Result<Database> =
            ConfigReader::new().read_json_file("/nonexistent/path/config.json");
        let error = result.unwrap_err();
        assert!(matches!(error, ConfigError::FileNotFound(_)));
        assert_eq!(error.kind(), ErrorKind::Source);
    }

    #[test]
    fn test_parse_error_is_reported_before_loading() {
        let result: Result<Database> = ConfigReader::new().read_json("{\"host\": }");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_name_format_applies_to_every_read() {
        let reader = ConfigReader::new().with_name_format(NameFormat::KebabCase);
        assert_eq!(reader.name_format(), NameFormat::KebabCase);

        #[derive(Debug, Default)]
        struct Pool {
            max_size: u32,
        }

        impl Config for Pool {
            fn bind(reader: &mut Reader<Self>) {
                reader.param("max_size", |c| &mut c.max_size);
            }
        }

        let pool: Pool = reader.read_yaml("max-size: 12\n").unwrap();
        assert_eq!(pool.max_size, 12);
    }
}
