use crate::enumerate::{self, LocaleRecord};
use crate::error::{EnumerateError, GenerationFailure};
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Where the orchestrator gets its locales from.
pub trait LocaleSource {
    /// Lists the current locales. Failure is fatal for the cycle.
    fn enumerate(&mut self) -> Result<Vec<LocaleRecord>, EnumerateError>;

    /// Loads the content of a record returned by the last `enumerate`.
    fn load(&mut self, record: &LocaleRecord) -> Result<Value, GenerationFailure>;
}

/// Reads YAML locale files straight from a directory.
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
    exclude: Vec<Regex>,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>, exclude: Vec<Regex>) -> Self {
        Self {
            root: root.into(),
            exclude,
        }
    }
}

impl LocaleSource for FsSource {
    fn enumerate(&mut self) -> Result<Vec<LocaleRecord>, EnumerateError> {
        enumerate::enumerate(&self.root, &self.exclude)
    }

    fn load(&mut self, record: &LocaleRecord) -> Result<Value, GenerationFailure> {
        let content =
            fs_err::read_to_string(&record.path).map_err(|source| GenerationFailure::Read {
                path: record.path.clone(),
                source,
            })?;

        parse_yaml(&record.path, &content)
    }
}

/// Parses YAML locale content. An empty document is an empty mapping.
pub(crate) fn parse_yaml(path: &Path, content: &str) -> Result<Value, GenerationFailure> {
    if content.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    serde_yaml::from_str(content).map_err(|e| GenerationFailure::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
