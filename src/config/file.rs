//! Configuration files on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Reads a config file, telling a missing file, a path that isn't a regular
/// file and an unreadable file apart.
pub(crate) fn load_config_file(path: &Path) -> Result<String> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    if !metadata.is_file() {
        return Err(ConfigError::NotAFile(path.to_path_buf()));
    }

    fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind as ConfigErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_regular_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "key = value").unwrap();

        let contents = load_config_file(file.path()).unwrap();
        assert_eq!(contents, "key = value\n");
    }

    #[test]
    fn test_missing_file() {
        let result = load_config_file(Path::new("/nonexistent/path/config.ini"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = load_config_file(dir.path()).unwrap_err();

        assert!(matches!(error, ConfigError::NotAFile(_)));
        assert_eq!(error.kind(), ConfigErrorKind::Source);
        assert!(error.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_invalid_utf8_is_unreadable() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let error = load_config_file(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::ReadError { .. }));
    }
}
