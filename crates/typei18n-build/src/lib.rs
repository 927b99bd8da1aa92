#![doc = include_str!("../README.md")]

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use typei18n_generate::Target;
use typei18n_toml::{CONFIG_FILENAME, TypeI18nConfig};

pub mod adapter;
pub mod assets;
pub mod cache;
pub mod cargo;
pub mod enumerate;
pub mod error;
pub mod options;
pub mod orchestrator;
pub mod source;

pub use adapter::{
    BuildCycleAdapter, Compilation, CompilationReport, Cycle, Hook, Strategy, TypeI18nPlugin,
};
pub use assets::{Asset, AssetMap, AssetSource, ChildCompiler};
pub use cache::KnownState;
pub use cargo::CargoCompilation;
pub use enumerate::{Fingerprint, LocaleRecord};
pub use error::{EnumerateError, GenerationFailure, TypeI18nBuildError};
pub use options::{Logger, Options};
pub use orchestrator::{GenerationOutcome, Orchestrator};
pub use source::{FsSource, LocaleSource};

/// Environment variable that disables generation in build scripts.
pub const SKIP_BUILD_ENV: &str = "TYPEI18N_SKIP_BUILD";

/// Runs one build cycle from a `build.rs`.
///
/// Settings come from `typei18n.toml` in the manifest directory; values set
/// on the builder take precedence.
#[derive(Clone, Debug, Default)]
pub struct TypeI18nBuilder {
    context: Option<PathBuf>,
    filename: Option<PathBuf>,
    target: Option<Target>,
}

impl TypeI18nBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn build(self) -> Result<(), TypeI18nBuildError> {
        println!("cargo:rerun-if-env-changed={SKIP_BUILD_ENV}");

        // Allow consumers to skip generation (e.g. during `cargo publish`)
        if skip_build() {
            println!(
                "cargo:warning=typei18n-build: skipping generation because {SKIP_BUILD_ENV} is set"
            );
            return Ok(());
        }

        let manifest_dir = env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .ok_or(TypeI18nBuildError::MissingManifestDir)?;

        self.build_in(&manifest_dir, io::stdout().lock())
    }

    /// Runs one build cycle for the crate at `manifest_dir`, writing cargo
    /// directives to `out`.
    pub fn build_in(
        self,
        manifest_dir: &Path,
        mut out: impl Write,
    ) -> Result<(), TypeI18nBuildError> {
        let config = TypeI18nConfig::read_from_dir_or_default(manifest_dir)?;
        writeln!(
            out,
            "cargo:rerun-if-changed={}",
            manifest_dir.join(CONFIG_FILENAME).display()
        )?;

        let mut options = Options::from_config(&config)?;
        if let Some(context) = self.context {
            options.context = context;
        }
        if let Some(filename) = self.filename {
            options.filename = filename;
        }
        if let Some(target) = self.target {
            options.target = target;
        }

        let mut adapter = TypeI18nPlugin::new(options).apply(manifest_dir);
        let cycle = adapter.run()?;

        let mut compilation = CargoCompilation::new();
        adapter.after_compile(cycle, &mut compilation);
        compilation.write_to(out)?;

        Ok(())
    }
}

fn skip_build() -> bool {
    env::var(SKIP_BUILD_ENV)
        .ok()
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            normalized.is_empty()
                || !(normalized == "0" || normalized == "false" || normalized == "no")
        })
        .unwrap_or(false)
}
