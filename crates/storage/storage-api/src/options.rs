//! Database configuration: small today, in the same shape as this codebase's
//! `EngineConfig`/`ConfigError` so a future option has an obvious place to land.

use page::page_size::PageSize;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading [`DatabaseOptions`] from a TOML file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path} as TOML: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

/// Options governing how a [`crate::database::Database`] is opened.
///
/// Deliberately minimal: the only effective knob today is the page size used
/// for newly allocated pages, which is always [`PageSize::Small`]. No code
/// path currently selects [`PageSize::Medium`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseOptions {
    default_page_size: RawPageSize,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            default_page_size: RawPageSize::Small,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawPageSize {
    Small,
}

impl DatabaseOptions {
    /// Loads and validates options from a TOML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        let options: DatabaseOptions =
            toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
                path: path.clone(),
                source,
            })?;

        options.validate()?;
        Ok(options)
    }

    /// The page size newly allocated pages should use. Always [`PageSize::Small`] today.
    pub fn default_page_size(&self) -> PageSize {
        match self.default_page_size {
            RawPageSize::Small => PageSize::Small,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // Nothing to validate yet: `RawPageSize` only has one variant, so
        // deserialization itself already rejects anything else.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_small_pages() {
        let options = DatabaseOptions::default();
        assert!(matches!(options.default_page_size(), PageSize::Small));
    }

    #[test]
    fn load_from_file_parses_toml() {
        let dir = std::env::temp_dir().join(format!(
            "docstore-options-test-{:?}",
            std::thread::current().id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("options.toml");
        std::fs::write(&path, "default_page_size = \"small\"\n").unwrap();

        let options = DatabaseOptions::load_from_file(&path).unwrap();
        assert!(matches!(options.default_page_size(), PageSize::Small));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_from_file_missing_file_errors() {
        let result = DatabaseOptions::load_from_file("/nonexistent/path/options.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
