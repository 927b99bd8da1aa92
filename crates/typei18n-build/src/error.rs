use std::path::PathBuf;
use thiserror::Error;
use typei18n_generate::error::GenerateError;

/// Listing the locale files failed. Fatal for the build cycle.
#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("Failed to walk locale directory {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read metadata of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A regeneration attempt failed. Reported as a diagnostic, never fatal.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("Failed to read locale {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse locale {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Locale identifier '{identifier}' is used by both {first} and {second}")]
    DuplicateIdentifier {
        identifier: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum TypeI18nBuildError {
    #[error("CARGO_MANIFEST_DIR is not set, typei18n-build must run inside a build script")]
    MissingManifestDir,

    #[error("Failed to load typei18n.toml configuration: {0}")]
    Config(#[from] typei18n_toml::TypeI18nConfigError),

    #[error(transparent)]
    Enumerate(#[from] EnumerateError),

    #[error("Failed to emit cargo directives: {0}")]
    Emit(#[from] std::io::Error),
}
