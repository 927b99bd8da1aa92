use crate::cache::KnownState;
use crate::enumerate::LocaleRecord;
use crate::error::{EnumerateError, GenerationFailure};
use crate::options::{LOG_PREFIX, Logger};
use crate::source::LocaleSource;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use typei18n_generate::{NamedValue, Target};

/// Result of one regeneration attempt.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// Nothing changed since the last attempt, or there is nothing to generate from.
    Skipped,
    /// The artifact was written, or already had the generated content.
    Succeeded,
    /// The artifact was removed and the failure is this cycle's diagnostic.
    Failed(GenerationFailure),
}

impl GenerationOutcome {
    pub fn failure(&self) -> Option<&GenerationFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn into_failure(self) -> Option<GenerationFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Decides whether to regenerate, and writes or removes the artifact.
#[derive(Debug)]
pub struct Orchestrator {
    output: PathBuf,
    target: Target,
    logger: Logger,
    verbose: bool,
    known: KnownState,
}

impl Orchestrator {
    pub fn new(output: impl Into<PathBuf>, target: Target, logger: Logger, verbose: bool) -> Self {
        Self {
            output: output.into(),
            target,
            logger,
            verbose,
            known: KnownState::default(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The locales that produced the current artifact, or the failed attempt.
    pub fn known(&self) -> &KnownState {
        &self.known
    }

    /// Runs one regeneration attempt against `source`.
    ///
    /// Only enumeration errors are returned; every other failure is folded
    /// into [`GenerationOutcome::Failed`].
    pub fn run(
        &mut self,
        source: &mut dyn LocaleSource,
    ) -> Result<GenerationOutcome, EnumerateError> {
        let records = source.enumerate()?;

        if self.known.can_skip(&records) {
            tracing::debug!(locales = records.len(), "Locales unchanged, skipping generation");
            return Ok(GenerationOutcome::Skipped);
        }

        // A failed attempt is remembered too, so unchanged broken inputs are not retried
        self.known = KnownState::from_records(&records);

        match self.generate(source, records) {
            Ok(()) => {
                self.log("Successful");
                Ok(GenerationOutcome::Succeeded)
            },
            Err(failure) => {
                tracing::warn!(output = %self.output.display(), "Generation failed: {failure}");
                self.log("Failure");
                if let Err(e) = remove_artifact(&self.output) {
                    tracing::warn!(
                        output = %self.output.display(),
                        "Failed to remove stale artifact: {e}"
                    );
                }
                Ok(GenerationOutcome::Failed(failure))
            },
        }
    }

    fn generate(
        &self,
        source: &mut dyn LocaleSource,
        mut records: Vec<LocaleRecord>,
    ) -> Result<(), GenerationFailure> {
        check_unique(&records)?;
        records.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        let names = records
            .iter()
            .map(|record| record.identifier.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.log(&format!("Generating from {names}"));

        let mut values = Vec::with_capacity(records.len());
        for record in &records {
            let value = source.load(record)?;
            values.push(NamedValue::new(record.identifier.clone(), value));
        }

        let generated = typei18n_generate::generate(&values, self.target)?;
        self.write(&generated)
    }

    fn write(&self, generated: &str) -> Result<(), GenerationFailure> {
        let write_error = |source| GenerationFailure::Write {
            path: self.output.clone(),
            source,
        };

        if fs_err::read_to_string(&self.output).is_ok_and(|existing| existing == generated) {
            tracing::debug!(output = %self.output.display(), "Artifact unchanged");
            return Ok(());
        }

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(write_error)?;
        }
        fs_err::write(&self.output, generated).map_err(write_error)?;

        tracing::info!(output = %self.output.display(), "Wrote locale provider");
        Ok(())
    }

    fn log(&self, message: &str) {
        if self.verbose {
            self.logger.log(&format!("{LOG_PREFIX} {message}"));
        }
    }
}

fn check_unique(records: &[LocaleRecord]) -> Result<(), GenerationFailure> {
    let mut seen: HashMap<&str, &Path> = HashMap::with_capacity(records.len());
    for record in records {
        if let Some(first) = seen.insert(&record.identifier, &record.path) {
            return Err(GenerationFailure::DuplicateIdentifier {
                identifier: record.identifier.clone(),
                first: first.to_path_buf(),
                second: record.path.clone(),
            });
        }
    }
    Ok(())
}

fn remove_artifact(path: &Path) -> io::Result<()> {
    match fs_err::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FsSource;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        messages: Arc<Mutex<Vec<String>>>,
        orchestrator: Orchestrator,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let messages = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&messages);
            let logger = Logger::new(move |m| sink.lock().unwrap().push(m.to_string()));
            let orchestrator =
                Orchestrator::new(dir.path().join("index.ts"), Target::Provider, logger, true);
            Self {
                dir,
                messages,
                orchestrator,
            }
        }

        fn write(&self, name: &str, content: &str) {
            fs::write(self.dir.path().join(name), content).unwrap();
        }

        fn run(&mut self) -> GenerationOutcome {
            let mut source = FsSource::new(self.dir.path(), Vec::new());
            self.orchestrator.run(&mut source).unwrap()
        }

        fn artifact(&self) -> Option<String> {
            fs::read_to_string(self.dir.path().join("index.ts")).ok()
        }
    }

    #[test]
    fn test_generates_then_skips() {
        let mut fixture = Fixture::new();
        fixture.write("en.yaml", "greeting: hello");
        fixture.write("fr.yaml", "greeting: bonjour");

        assert!(matches!(fixture.run(), GenerationOutcome::Succeeded));
        let artifact = fixture.artifact().unwrap();
        assert!(artifact.contains("export const en: Locale"));
        assert!(artifact.contains("export const fr: Locale"));

        assert!(fixture.run().is_skipped());
        assert_eq!(
            *fixture.messages.lock().unwrap(),
            vec!["[typei18n] Generating from en, fr", "[typei18n] Successful"]
        );
    }

    #[test]
    fn test_touch_forces_regeneration() {
        let mut fixture = Fixture::new();
        fixture.write("en.yaml", "greeting: hello");
        assert!(matches!(fixture.run(), GenerationOutcome::Succeeded));

        let file = fs::File::options()
            .write(true)
            .open(fixture.dir.path().join("en.yaml"))
            .unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();

        assert!(matches!(fixture.run(), GenerationOutcome::Succeeded));
    }

    #[test]
    fn test_failure_removes_artifact_and_is_remembered() {
        let mut fixture = Fixture::new();
        fixture.write("en.yaml", "greeting: hello");
        assert!(matches!(fixture.run(), GenerationOutcome::Succeeded));
        assert!(fixture.artifact().is_some());

        fixture.write("fr.yaml", "greeting: [unclosed");
        let outcome = fixture.run();
        assert!(matches!(
            outcome.failure(),
            Some(GenerationFailure::Parse { .. })
        ));
        assert!(fixture.artifact().is_none());
        assert_eq!(fixture.orchestrator.known().len(), 2);

        assert!(fixture.run().is_skipped());
        assert!(
            fixture
                .messages
                .lock()
                .unwrap()
                .contains(&"[typei18n] Failure".to_string())
        );
    }

    #[test]
    fn test_generator_failure_is_soft() {
        let mut fixture = Fixture::new();
        fixture.write("en.yaml", "greeting: hello\nfarewell: bye");
        fixture.write("fr.yaml", "greeting: bonjour");

        let outcome = fixture.run();
        assert!(matches!(
            outcome.into_failure(),
            Some(GenerationFailure::Generate(_))
        ));
        assert!(fixture.artifact().is_none());
    }

    #[test]
    fn test_duplicate_identifiers_fail() {
        let mut fixture = Fixture::new();
        fixture.write("en.yaml", "greeting: hello");
        fs::create_dir(fixture.dir.path().join("nested")).unwrap();
        fixture.write("nested/en.yml", "greeting: hi");

        match fixture.run() {
            GenerationOutcome::Failed(GenerationFailure::DuplicateIdentifier {
                identifier,
                first,
                second,
            }) => {
                assert_eq!(identifier, "en");
                assert_ne!(first, second);
            },
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_unchanged_artifact_is_not_rewritten() {
        let mut fixture = Fixture::new();
        fixture.write("en.yaml", "greeting: hello");
        assert!(matches!(fixture.run(), GenerationOutcome::Succeeded));

        let output = fixture.dir.path().join("index.ts");
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        fs::File::options()
            .write(true)
            .open(&output)
            .unwrap()
            .set_modified(stamp)
            .unwrap();

        // New mtime, same content
        fixture.write("en.yaml", "greeting: hello\n");
        let file = fs::File::options()
            .write(true)
            .open(fixture.dir.path().join("en.yaml"))
            .unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();

        assert!(matches!(fixture.run(), GenerationOutcome::Succeeded));
        assert_eq!(fs::metadata(&output).unwrap().modified().unwrap(), stamp);
    }

    #[test]
    fn test_quiet_orchestrator_does_not_log() {
        let mut fixture = Fixture::new();
        fixture.orchestrator.verbose = false;
        fixture.write("en.yaml", "greeting: hello");

        assert!(matches!(fixture.run(), GenerationOutcome::Succeeded));
        assert!(fixture.messages.lock().unwrap().is_empty());
    }

    #[test]
    fn test_output_in_missing_directory_is_created() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.yaml"), "greeting: hello").unwrap();
        let output = dir.path().join("generated/i18n/index.ts");

        let mut orchestrator =
            Orchestrator::new(&output, Target::Types, Logger::new(|_| {}), false);
        let mut source = FsSource::new(dir.path(), Vec::new());

        assert!(matches!(
            orchestrator.run(&mut source).unwrap(),
            GenerationOutcome::Succeeded
        ));
        assert!(output.exists());
    }
}
