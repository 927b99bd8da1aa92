//! Locale file discovery.

use crate::error::EnumerateError;
use fs_err as fs;
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Extensions recognised as locale files.
pub const LOCALE_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// What a locale looked like when it was last seen. Compared by exact equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fingerprint {
    /// Modification time of a file on disk.
    Modified(SystemTime),
    /// An in-memory asset: the modification time of the file it was
    /// produced from plus a digest of what the loader produced.
    Asset {
        modified: SystemTime,
        digest: blake3::Hash,
    },
}

impl Fingerprint {
    /// Modification time of the underlying locale file.
    pub fn modified(&self) -> SystemTime {
        match self {
            Self::Modified(modified) | Self::Asset { modified, .. } => *modified,
        }
    }
}

/// One locale input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleRecord {
    /// File name without its extension, e.g. `en` for `locales/en.yaml`.
    pub identifier: String,
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
}

/// Derives a locale identifier from its path.
pub fn identifier_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

fn is_excluded(path: &Path, exclude: &[Regex]) -> bool {
    let text = path.to_string_lossy();
    exclude.iter().any(|pattern| pattern.is_match(&text))
}

/// Lists every YAML locale file under `root`, skipping excluded paths.
pub fn enumerate(root: &Path, exclude: &[Regex]) -> Result<Vec<LocaleRecord>, EnumerateError> {
    enumerate_with_extensions(root, exclude, LOCALE_EXTENSIONS)
}

/// Lists every file under `root` with one of `extensions`, skipping excluded
/// paths, sorted by path.
///
/// A missing root yields no records. Any metadata failure aborts the whole
/// listing.
pub fn enumerate_with_extensions(
    root: &Path,
    exclude: &[Regex],
    extensions: &[&str],
) -> Result<Vec<LocaleRecord>, EnumerateError> {
    match fs::metadata(root) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(EnumerateError::Metadata {
                path: root.to_path_buf(),
                source,
            });
        },
        Ok(_) => {},
    }

    let mut records = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| EnumerateError::Walk {
            root: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !has_extension(path, extensions) || is_excluded(path, exclude) {
            continue;
        }

        let modified = fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(|source| EnumerateError::Metadata {
                path: path.to_path_buf(),
                source,
            })?;

        records.push(LocaleRecord {
            identifier: identifier_of(path),
            path: path.to_path_buf(),
            fingerprint: Fingerprint::Modified(modified),
        });
    }

    // Sort for deterministic ordering
    records.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_locales() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.yaml"), "greeting: hello").unwrap();
        fs::write(dir.path().join("fr.yml"), "greeting: bonjour").unwrap();
        fs::create_dir(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("drafts/de.yaml"), "greeting: hallo").unwrap();
        fs::write(dir.path().join("index.ts"), "export {}").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a locale").unwrap();
        dir
    }

    fn identifiers(records: &[LocaleRecord]) -> Vec<&str> {
        records.iter().map(|r| r.identifier.as_str()).collect()
    }

    #[test]
    fn test_enumerate_recurses_and_filters_extensions() {
        let dir = create_locales();

        let records = enumerate(dir.path(), &[]).unwrap();

        assert_eq!(identifiers(&records), vec!["de", "en", "fr"]);
        assert!(records.iter().all(|r| r.path.is_absolute()));
        assert!(
            records
                .iter()
                .all(|r| matches!(r.fingerprint, Fingerprint::Modified(_)))
        );
    }

    #[test]
    fn test_enumerate_applies_exclusions_to_full_path() {
        let dir = create_locales();
        let exclude = vec![Regex::new("drafts").unwrap(), Regex::new(r"\.yml$").unwrap()];

        let records = enumerate(dir.path(), &exclude).unwrap();

        assert_eq!(identifiers(&records), vec!["en"]);
    }

    #[test]
    fn test_enumerate_empty_root() {
        let dir = TempDir::new().unwrap();
        assert!(enumerate(dir.path(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_enumerate_missing_root() {
        let dir = TempDir::new().unwrap();
        assert!(enumerate(&dir.path().join("missing"), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_enumerate_with_extra_extensions() {
        let dir = create_locales();
        fs::write(dir.path().join("es.json"), "{}").unwrap();

        let records = enumerate_with_extensions(dir.path(), &[], &["json"]).unwrap();

        assert_eq!(identifiers(&records), vec!["es"]);
    }

    #[test]
    fn test_identifier_of_strips_extension_only() {
        assert_eq!(identifier_of(Path::new("/l/en.yaml")), "en");
        assert_eq!(identifier_of(Path::new("/l/pt-BR.yaml")), "pt-BR");
        assert_eq!(identifier_of(Path::new("/l/en.lang.json")), "en.lang");
    }
}
