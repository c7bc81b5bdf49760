//! notecast configuration.
//!
//! Loaded from `~/.notecast/config.toml`, or from the file named by
//! `NOTECAST_CONFIG`. A missing file means defaults.
//!
//! ```toml
//! corpus = "/path/to/corpus.json"
//! page-size = 10
//! image-pool-size = 20
//! image-offset = 8
//! animate = true
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::DEFAULT_PAGE_SIZE;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config at {path:?}: {reason}")]
    Invalid { path: PathBuf, reason: &'static str },
}

/// notecast configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Corpus file to load instead of the built-in one.
    pub corpus: Option<PathBuf>,

    /// Candidates per page.
    pub page_size: usize,

    /// Number of placeholder images, `/1.png` through `/<n>.png`.
    pub image_pool_size: usize,

    /// How far the image tab's pool is rotated relative to the note tab's.
    pub image_offset: usize,

    /// Play loading sequences in real time. When false they finish instantly.
    pub animate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus: None,
            page_size: DEFAULT_PAGE_SIZE,
            image_pool_size: 20,
            image_offset: 8,
            animate: true,
        }
    }
}

impl Config {
    /// Load config from `NOTECAST_CONFIG` or `~/.notecast/config.toml`.
    ///
    /// Falls back to defaults when no file exists or no home directory
    /// can be determined.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let invalid = |reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        };
        if config.page_size == 0 {
            return Err(invalid("page-size must be at least 1"));
        }
        if config.image_pool_size == 0 {
            return Err(invalid("image-pool-size must be at least 1"));
        }

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// The config file path: `NOTECAST_CONFIG`, else `~/.notecast/config.toml`.
    pub fn path() -> Option<PathBuf> {
        if let Ok(path) = env::var("NOTECAST_CONFIG")
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|h| h.join(".notecast").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let (_dir, path) = write_config("page-size = 4\nanimate = false\n");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.page_size, 4);
        assert!(!config.animate);
        assert_eq!(config.image_pool_size, 20);
        assert_eq!(config.image_offset, 8);
        assert!(config.corpus.is_none());
    }

    #[test]
    fn reads_corpus_path() {
        let (_dir, path) = write_config("corpus = \"/data/notes.json\"\n");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.corpus, Some(PathBuf::from("/data/notes.json")));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let (_dir, path) = write_config("page-size = \"ten\"\n");
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn zero_page_size_rejected() {
        let (_dir, path) = write_config("page-size = 0\n");
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn zero_pool_rejected() {
        let (_dir, path) = write_config("image-pool-size = 0\n");
        assert!(Config::load_from(&path).is_err());
    }
}
