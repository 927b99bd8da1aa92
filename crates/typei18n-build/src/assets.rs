//! Asset extraction strategy.
//!
//! A [`ChildCompiler`] turns every locale file into a `<name>.lang.json`
//! asset, and an [`AssetSource`] later drains those assets from the output
//! set and hands them to the orchestrator.

use crate::enumerate::{self, Fingerprint, LocaleRecord};
use crate::error::{EnumerateError, GenerationFailure};
use crate::source::{self, LocaleSource};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Suffix of the intermediate assets.
pub const ASSET_SUFFIX: &str = ".lang.json";

/// Extensions the child compiler has a loader for.
pub const LOADER_EXTENSIONS: &[&str] = &["yaml", "yml", "json", "toml"];

/// A serialized locale produced by the child compiler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    /// The locale file it was produced from.
    pub source: PathBuf,
    /// Modification time of `source` when the asset was produced.
    pub modified: SystemTime,
    pub content: String,
}

/// A locale file the child compiler could not turn into an asset.
#[derive(Debug)]
pub struct LoaderError {
    pub source: PathBuf,
    pub modified: SystemTime,
    /// Digest of the raw file, so an unchanged broken file stays cached.
    pub digest: blake3::Hash,
    pub failure: GenerationFailure,
}

/// The host's output set.
#[derive(Debug, Default)]
pub struct AssetMap {
    pub assets: IndexMap<String, Asset>,
    pub errors: Vec<LoaderError>,
}

impl AssetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, asset: Asset) {
        self.assets.insert(name.into(), asset);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty() && self.errors.is_empty()
    }
}

/// Nested build that routes every locale file through a loader.
#[derive(Clone, Debug)]
pub struct ChildCompiler {
    root: PathBuf,
    exclude: Vec<Regex>,
}

impl ChildCompiler {
    pub fn new(root: impl Into<PathBuf>, exclude: Vec<Regex>) -> Self {
        Self {
            root: root.into(),
            exclude,
        }
    }

    /// Emits one asset per locale file into `assets`.
    ///
    /// Loader failures are recorded next to the assets and only surface when
    /// the assets are consumed.
    pub fn compile(&self, assets: &mut AssetMap) -> Result<(), EnumerateError> {
        let entries =
            enumerate::enumerate_with_extensions(&self.root, &self.exclude, LOADER_EXTENSIONS)?;

        for entry in entries {
            let name = format!("{}{ASSET_SUFFIX}", entry.identifier);
            let modified = entry.fingerprint.modified();

            let raw = match fs_err::read(&entry.path) {
                Ok(raw) => raw,
                Err(source) => {
                    assets.errors.push(LoaderError {
                        modified,
                        digest: blake3::hash(&[]),
                        failure: GenerationFailure::Read {
                            path: entry.path.clone(),
                            source,
                        },
                        source: entry.path,
                    });
                    continue;
                },
            };
            let digest = blake3::hash(&raw);

            if let Some(existing) = assets.assets.get(&name) {
                let failure = GenerationFailure::DuplicateIdentifier {
                    identifier: entry.identifier,
                    first: existing.source.clone(),
                    second: entry.path.clone(),
                };
                assets.errors.push(LoaderError {
                    source: entry.path,
                    modified,
                    digest,
                    failure,
                });
                continue;
            }

            match load(&entry.path, &String::from_utf8_lossy(&raw)) {
                Ok(content) => assets.insert(
                    name,
                    Asset {
                        source: entry.path,
                        modified,
                        content,
                    },
                ),
                Err(failure) => assets.errors.push(LoaderError {
                    source: entry.path,
                    modified,
                    digest,
                    failure,
                }),
            }
        }

        Ok(())
    }
}

fn load(path: &Path, content: &str) -> Result<String, GenerationFailure> {
    let parse_error = |message: String| GenerationFailure::Parse {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        Some("toml") => toml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        _ => source::parse_yaml(path, content)?,
    };

    serde_json::to_string(&value).map_err(|e| parse_error(e.to_string()))
}

enum Staged {
    Content(String),
    Failed(GenerationFailure),
}

/// Drains `*.lang.json` assets from an [`AssetMap`].
///
/// Records point at the originating locale file and are fingerprinted with
/// its modification time and a digest of the asset content.
pub struct AssetSource<'a> {
    assets: &'a mut AssetMap,
    staged: BTreeMap<PathBuf, Staged>,
}

impl<'a> AssetSource<'a> {
    pub fn new(assets: &'a mut AssetMap) -> Self {
        Self {
            assets,
            staged: BTreeMap::new(),
        }
    }
}

impl LocaleSource for AssetSource<'_> {
    fn enumerate(&mut self) -> Result<Vec<LocaleRecord>, EnumerateError> {
        self.staged.clear();
        let mut records = Vec::new();

        let names: Vec<String> = self
            .assets
            .assets
            .keys()
            .filter(|name| name.ends_with(ASSET_SUFFIX))
            .cloned()
            .collect();

        for name in names {
            let Some(asset) = self.assets.assets.shift_remove(&name) else {
                continue;
            };
            let identifier = name.trim_end_matches(ASSET_SUFFIX).to_string();

            records.push(LocaleRecord {
                identifier,
                path: asset.source.clone(),
                fingerprint: Fingerprint::Asset {
                    modified: asset.modified,
                    digest: blake3::hash(asset.content.as_bytes()),
                },
            });
            self.staged
                .insert(asset.source, Staged::Content(asset.content));
        }

        for error in self.assets.errors.drain(..) {
            records.push(LocaleRecord {
                identifier: enumerate::identifier_of(&error.source),
                path: error.source.clone(),
                fingerprint: Fingerprint::Asset {
                    modified: error.modified,
                    digest: error.digest,
                },
            });
            self.staged
                .insert(error.source, Staged::Failed(error.failure));
        }

        records.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(records)
    }

    fn load(&mut self, record: &LocaleRecord) -> Result<Value, GenerationFailure> {
        match self.staged.remove(&record.path) {
            Some(Staged::Content(content)) => {
                serde_json::from_str(&content).map_err(|e| GenerationFailure::Parse {
                    path: record.path.clone(),
                    message: e.to_string(),
                })
            },
            Some(Staged::Failed(failure)) => Err(failure),
            None => Err(GenerationFailure::Read {
                path: record.path.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "asset was not produced"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_child_compiler_emits_assets_per_loader() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.yaml"), "greeting: hello").unwrap();
        fs::write(dir.path().join("fr.json"), r#"{"greeting": "bonjour"}"#).unwrap();
        fs::write(dir.path().join("de.toml"), "greeting = \"hallo\"").unwrap();

        let mut assets = AssetMap::new();
        ChildCompiler::new(dir.path(), Vec::new())
            .compile(&mut assets)
            .unwrap();

        assert_eq!(assets.len(), 3);
        assert!(assets.errors.is_empty());
        assert_eq!(
            assets.assets["fr.lang.json"].content,
            r#"{"greeting":"bonjour"}"#
        );
        assert_eq!(
            assets.assets["de.lang.json"].source,
            dir.path().join("de.toml")
        );
    }

    #[test]
    fn test_child_compiler_records_loader_failures() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.json"), "{ not json").unwrap();

        let mut assets = AssetMap::new();
        ChildCompiler::new(dir.path(), Vec::new())
            .compile(&mut assets)
            .unwrap();

        assert!(assets.assets.is_empty());
        assert_eq!(assets.errors.len(), 1);
        assert!(matches!(
            assets.errors[0].failure,
            GenerationFailure::Parse { .. }
        ));
    }

    #[test]
    fn test_child_compiler_rejects_duplicate_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"a": "b"}"#).unwrap();
        fs::write(dir.path().join("en.yaml"), "a: b").unwrap();

        let mut assets = AssetMap::new();
        ChildCompiler::new(dir.path(), Vec::new())
            .compile(&mut assets)
            .unwrap();

        assert_eq!(assets.len(), 1);
        assert!(matches!(
            assets.errors[0].failure,
            GenerationFailure::DuplicateIdentifier { ref identifier, .. } if identifier == "en"
        ));
    }

    #[test]
    fn test_asset_source_drains_only_locale_assets() {
        let mut assets = AssetMap::new();
        assets.insert(
            "en.lang.json",
            Asset {
                source: PathBuf::from("/l/en.yaml"),
                modified: SystemTime::UNIX_EPOCH,
                content: r#"{"greeting":"hello"}"#.to_string(),
            },
        );
        assets.insert(
            "main.js",
            Asset {
                source: PathBuf::from("/src/main.ts"),
                modified: SystemTime::UNIX_EPOCH,
                content: "console.log()".to_string(),
            },
        );

        let mut source = AssetSource::new(&mut assets);
        let records = source.enumerate().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "en");
        assert_eq!(records[0].path, PathBuf::from("/l/en.yaml"));
        assert_eq!(
            source.load(&records[0]).unwrap(),
            json!({ "greeting": "hello" })
        );

        assert!(!assets.contains("en.lang.json"));
        assert!(assets.contains("main.js"));
    }

    #[test]
    fn test_asset_source_surfaces_loader_failures() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.yaml"), "a: [").unwrap();

        let mut assets = AssetMap::new();
        ChildCompiler::new(dir.path(), Vec::new())
            .compile(&mut assets)
            .unwrap();

        let mut source = AssetSource::new(&mut assets);
        let records = source.enumerate().unwrap();
        assert_eq!(records[0].identifier, "en");
        assert!(matches!(
            source.load(&records[0]),
            Err(GenerationFailure::Parse { .. })
        ));
        assert!(assets.is_empty());
    }
}
