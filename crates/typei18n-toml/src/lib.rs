#![doc = include_str!("../README.md")]

use fs_err as fs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use typei18n_generate::Target;

/// Name of the configuration file looked up next to a manifest.
pub const CONFIG_FILENAME: &str = "typei18n.toml";

/// Default locale directory.
pub const DEFAULT_CONTEXT: &str = "./locales";

/// Default generated file, relative to the locale directory.
pub const DEFAULT_FILENAME: &str = "./index.ts";

#[derive(Debug, Error)]
pub enum TypeI18nConfigError {
    /// Configuration file not found.
    #[error("typei18n.toml configuration file not found")]
    NotFound,
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),
    /// An `exclude` entry is not a valid regular expression.
    #[error("Invalid exclude pattern '{pattern}'")]
    InvalidExclude {
        /// The offending pattern.
        pattern: String,
        /// The error produced by `regex`.
        #[source]
        source: regex::Error,
    },
}

/// The configuration for `typei18n`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeI18nConfig {
    /// Directory holding the locale files. Relative paths are resolved
    /// against the build context (the manifest directory).
    pub context: PathBuf,
    /// Generated provider file. Relative paths are resolved against `context`.
    pub filename: PathBuf,
    /// Regular expressions; a locale file whose absolute path matches any of
    /// them is ignored.
    pub exclude: Vec<String>,
    /// Report generation progress through the logger.
    pub verbose: bool,
    /// Code generation template.
    pub target: Target,
}

impl Default for TypeI18nConfig {
    fn default() -> Self {
        Self {
            context: PathBuf::from(DEFAULT_CONTEXT),
            filename: PathBuf::from(DEFAULT_FILENAME),
            exclude: Vec::new(),
            verbose: true,
            target: Target::default(),
        }
    }
}

impl TypeI18nConfig {
    /// Reads the configuration from a path.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, TypeI18nConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TypeI18nConfigError::NotFound);
        }

        let content = fs::read_to_string(path)?;

        let config: TypeI18nConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// Reads `typei18n.toml` from `dir`, falling back to the defaults when
    /// the file does not exist.
    pub fn read_from_dir_or_default(dir: &Path) -> Result<Self, TypeI18nConfigError> {
        match Self::read_from_path(dir.join(CONFIG_FILENAME)) {
            Err(TypeI18nConfigError::NotFound) => Ok(Self::default()),
            other => other,
        }
    }

    /// Reads the configuration from the manifest directory.
    pub fn read_from_manifest_dir() -> Result<Self, TypeI18nConfigError> {
        let manifest_dir =
            env::var("CARGO_MANIFEST_DIR").map_err(|_| TypeI18nConfigError::NotFound)?;

        Self::read_from_dir_or_default(Path::new(&manifest_dir))
    }

    /// Compiles the `exclude` list.
    pub fn exclude_patterns(&self) -> Result<Vec<Regex>, TypeI18nConfigError> {
        self.exclude
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| TypeI18nConfigError::InvalidExclude {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }
}
