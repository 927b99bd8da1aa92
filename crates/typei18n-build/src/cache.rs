//! Change detection between regeneration attempts.

use crate::enumerate::{Fingerprint, LocaleRecord};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Fingerprints of the locales seen by the last regeneration attempt.
///
/// Replaced wholesale on every attempt, so entries for deleted files never
/// linger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KnownState {
    entries: BTreeMap<PathBuf, Fingerprint>,
}

impl KnownState {
    pub fn from_records(records: &[LocaleRecord]) -> Self {
        Self {
            entries: records
                .iter()
                .map(|record| (record.path.clone(), record.fingerprint))
                .collect(),
        }
    }

    /// Whether regeneration can be skipped for `records`.
    ///
    /// True when there is nothing to generate from, or when the set of paths
    /// and every fingerprint are exactly what was recorded.
    pub fn can_skip(&self, records: &[LocaleRecord]) -> bool {
        if records.is_empty() {
            return true;
        }

        records.len() == self.entries.len()
            && records
                .iter()
                .all(|record| self.entries.get(&record.path) == Some(&record.fingerprint))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&Fingerprint> {
        self.entries.get(path)
    }

    /// Paths of the known locales, in path order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }
}
