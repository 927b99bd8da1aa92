//! Binding of the orchestrator to a host build's lifecycle.

use crate::assets::{AssetMap, AssetSource, ChildCompiler};
use crate::cache::KnownState;
use crate::error::{EnumerateError, GenerationFailure};
use crate::options::Options;
use crate::orchestrator::{GenerationOutcome, Orchestrator};
use crate::source::FsSource;
use clap::ValueEnum;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// What a host build exposes to the adapter after compilation.
pub trait Compilation {
    /// Adds a non-fatal error to this cycle's diagnostics.
    fn push_error(&mut self, failure: GenerationFailure);
    fn add_file_dependency(&mut self, path: &Path);
    fn remove_file_dependency(&mut self, path: &Path);
    fn add_context_dependency(&mut self, path: &Path);
}

/// In-memory [`Compilation`].
#[derive(Debug, Default)]
pub struct CompilationReport {
    pub errors: Vec<GenerationFailure>,
    pub file_dependencies: BTreeSet<PathBuf>,
    pub context_dependencies: BTreeSet<PathBuf>,
}

impl CompilationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl Compilation for CompilationReport {
    fn push_error(&mut self, failure: GenerationFailure) {
        self.errors.push(failure);
    }

    fn add_file_dependency(&mut self, path: &Path) {
        self.file_dependencies.insert(path.to_path_buf());
    }

    fn remove_file_dependency(&mut self, path: &Path) {
        self.file_dependencies.remove(path);
    }

    fn add_context_dependency(&mut self, path: &Path) {
        self.context_dependencies.insert(path.to_path_buf());
    }
}

/// Host lifecycle points that start a build cycle.
///
/// The cycle they start is closed by [`BuildCycleAdapter::after_compile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    /// Before a one-off build.
    Run,
    /// Before each rebuild in watch mode.
    WatchRun,
    /// After the child compilation, when its assets are emitted.
    Emit,
}

/// How locales reach the generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Read the locale files directly.
    #[default]
    #[value(name = "fs")]
    Filesystem,
    /// Route the locale files through a child compilation as assets.
    Assets,
}

/// Result of running the orchestrator at one hook.
#[must_use = "a cycle must be handed to `after_compile` to report its diagnostic"]
#[derive(Debug)]
pub struct Cycle {
    hook: Hook,
    outcome: GenerationOutcome,
}

impl Cycle {
    pub fn hook(&self) -> Hook {
        self.hook
    }

    pub fn outcome(&self) -> &GenerationOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> GenerationOutcome {
        self.outcome
    }
}

/// Entry point: configure with [`Options`], then [`apply`](Self::apply) to a host.
#[derive(Clone, Debug, Default)]
pub struct TypeI18nPlugin {
    options: Options,
}

impl TypeI18nPlugin {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Binds to a host whose build context is `host_context`.
    ///
    /// A relative `context` is resolved against `host_context` and a relative
    /// `filename` against the resolved context. This happens once.
    pub fn apply(self, host_context: &Path) -> BuildCycleAdapter {
        let Options {
            context,
            filename,
            exclude,
            logger,
            verbose,
            target,
        } = self.options;

        let context = resolve(host_context, &context);
        let output = resolve(&context, &filename);

        tracing::debug!(
            context = %context.display(),
            output = %output.display(),
            "Resolved locale paths"
        );

        BuildCycleAdapter {
            orchestrator: Orchestrator::new(&output, target, logger, verbose),
            context,
            output,
            exclude,
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    base.join(path)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// A [`TypeI18nPlugin`] bound to a host, with resolved paths and its own cache.
#[derive(Debug)]
pub struct BuildCycleAdapter {
    context: PathBuf,
    output: PathBuf,
    exclude: Vec<Regex>,
    orchestrator: Orchestrator,
}

impl BuildCycleAdapter {
    pub fn context(&self) -> &Path {
        &self.context
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn known(&self) -> &KnownState {
        self.orchestrator.known()
    }

    /// Hook: before a build.
    pub fn run(&mut self) -> Result<Cycle, EnumerateError> {
        self.regenerate(Hook::Run)
    }

    /// Hook: before a watch rebuild.
    pub fn watch_run(&mut self) -> Result<Cycle, EnumerateError> {
        self.regenerate(Hook::WatchRun)
    }

    fn regenerate(&mut self, hook: Hook) -> Result<Cycle, EnumerateError> {
        let mut source = FsSource::new(&self.context, self.exclude.clone());
        let outcome = self.orchestrator.run(&mut source)?;
        Ok(Cycle { hook, outcome })
    }

    /// Runs the child compilation, adding one `<name>.lang.json` asset per
    /// locale file to `assets`.
    pub fn make(&self, assets: &mut AssetMap) -> Result<(), EnumerateError> {
        ChildCompiler::new(&self.context, self.exclude.clone()).compile(assets)
    }

    /// Consumes the `*.lang.json` assets and regenerates from them.
    pub fn emit(&mut self, assets: &mut AssetMap) -> Result<Cycle, EnumerateError> {
        let mut source = AssetSource::new(assets);
        let outcome = self.orchestrator.run(&mut source)?;
        Ok(Cycle {
            hook: Hook::Emit,
            outcome,
        })
    }

    /// Hook: after compilation. Reports the cycle's failure and declares
    /// dependencies.
    pub fn after_compile(&self, cycle: Cycle, compilation: &mut dyn Compilation) {
        if let Some(failure) = cycle.into_outcome().into_failure() {
            compilation.push_error(failure);
        }

        for path in self.orchestrator.known().paths() {
            compilation.add_file_dependency(path);
        }
        compilation.remove_file_dependency(&self.output);
        compilation.add_context_dependency(&self.context);
    }
}
