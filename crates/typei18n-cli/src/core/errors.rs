//! CLI error types rendered with miette.

// Fields in these structs are read by miette's Diagnostic derive macro
#![allow(unused)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::{Path, PathBuf};
use thiserror::Error;
use typei18n_build::{EnumerateError, GenerationFailure};
use typei18n_toml::TypeI18nConfigError;

/// Error when parsing the typei18n.toml configuration file.
#[derive(Debug, Diagnostic, Error)]
#[error("failed to parse typei18n.toml configuration")]
#[diagnostic(code(typei18n::config::parse_error))]
pub struct ConfigParseError {
    /// The source content of the config file.
    #[source_code]
    pub src: NamedSource<String>,

    /// The span where the error occurred.
    #[label("error occurred here")]
    pub span: Option<SourceSpan>,

    /// The underlying parse error message.
    #[help]
    pub help: String,
}

/// Error when an exclude pattern is not a valid regular expression.
#[derive(Debug, Diagnostic, Error)]
#[error("invalid exclude pattern '{pattern}'")]
#[diagnostic(code(typei18n::config::invalid_exclude))]
pub struct InvalidExcludeError {
    pub pattern: String,

    #[help]
    pub help: String,
}

/// Error when the locale directory cannot be watched.
#[derive(Debug, Diagnostic, Error)]
#[error("locale directory not found: {path}")]
#[diagnostic(
    code(typei18n::watch::context_not_found),
    help("Create the directory or point --context at an existing one")
)]
pub struct ContextNotFoundError {
    pub path: PathBuf,
}

/// Error when a build cycle could not generate the provider.
#[derive(Debug, Diagnostic, Error)]
#[error("failed to generate {output}")]
#[diagnostic(
    code(typei18n::generate::failed),
    help("Fix the locale files under {context}, the previous output was removed")
)]
pub struct GenerationError {
    pub output: String,

    pub context: String,

    #[source]
    pub failure: GenerationFailure,
}

impl GenerationError {
    pub fn new(output: &Path, context: &Path, failure: GenerationFailure) -> Self {
        Self {
            output: output.display().to_string(),
            context: context.display().to_string(),
            failure,
        }
    }
}

#[derive(Debug, Diagnostic, Error)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    ConfigParse(#[from] ConfigParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidExclude(#[from] InvalidExcludeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ContextNotFound(#[from] ContextNotFoundError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Generation(#[from] GenerationError),

    #[error("failed to list locale files")]
    #[diagnostic(code(typei18n::enumerate))]
    Enumerate(#[from] EnumerateError),

    #[error("IO error: {0}")]
    #[diagnostic(code(typei18n::io))]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(typei18n::other))]
    Other(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(format!("{err:#}"))
    }
}

impl CliError {
    /// Converts a configuration error, attaching the file content to parse errors.
    pub fn from_config(error: TypeI18nConfigError, config_path: &Path) -> Self {
        match error {
            TypeI18nConfigError::ParseError(e) => {
                let content = fs_err::read_to_string(config_path).unwrap_or_default();
                ConfigParseError {
                    src: NamedSource::new(config_path.display().to_string(), content),
                    span: e.span().map(SourceSpan::from),
                    help: e.message().to_string(),
                }
                .into()
            },
            TypeI18nConfigError::InvalidExclude { pattern, source } => InvalidExcludeError {
                pattern,
                help: source.to_string(),
            }
            .into(),
            TypeI18nConfigError::ReadError(e) => CliError::Io(e),
            other => CliError::Other(other.to_string()),
        }
    }
}
