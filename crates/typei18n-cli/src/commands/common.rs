use crate::core::{CliError, CycleStatus, CycleSummary, GenerationError};
use crate::utils::ui;
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;
use typei18n_build::{
    AssetMap, BuildCycleAdapter, CompilationReport, Hook, Logger, Options, Strategy,
    TypeI18nPlugin,
};
use typei18n_generate::Target;
use typei18n_toml::{CONFIG_FILENAME, TypeI18nConfig};

#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Project root holding typei18n.toml (defaults to current directory).
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Locale directory, relative to the project root.
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Generated file, relative to the locale directory.
    #[arg(long)]
    pub filename: Option<PathBuf>,

    /// Ignore locale files whose path matches this regular expression.
    #[arg(long, value_name = "REGEX")]
    pub exclude: Vec<String>,

    /// Code generation template.
    #[arg(long, value_enum)]
    pub target: Option<Target>,

    /// How locale files reach the generator.
    #[arg(long, value_enum, default_value_t = Strategy::default())]
    pub strategy: Strategy,

    /// Hide progress messages.
    #[arg(short, long)]
    pub quiet: bool,
}

/// A configured project, bound to its locale directory.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub strategy: Strategy,
    pub adapter: BuildCycleAdapter,
}

impl Project {
    /// Reads `typei18n.toml` from the project root and applies the command line on top.
    pub fn load(args: ProjectArgs) -> Result<Self, CliError> {
        let root = std::path::absolute(args.path.unwrap_or_else(|| PathBuf::from(".")))?;
        let config_path = root.join(CONFIG_FILENAME);

        let mut config = TypeI18nConfig::read_from_dir_or_default(&root)
            .map_err(|e| CliError::from_config(e, &config_path))?;

        if let Some(context) = args.context {
            config.context = context;
        }
        if let Some(filename) = args.filename {
            config.filename = filename;
        }
        if let Some(target) = args.target {
            config.target = target;
        }
        config.exclude.extend(args.exclude);
        if args.quiet {
            config.verbose = false;
        }

        let options = Options {
            logger: Logger::new(ui::print_log),
            ..Options::from_config(&config).map_err(|e| CliError::from_config(e, &config_path))?
        };

        Ok(Self {
            adapter: TypeI18nPlugin::new(options).apply(&root),
            root,
            strategy: args.strategy,
        })
    }

    pub fn context(&self) -> &Path {
        self.adapter.context()
    }

    pub fn output(&self) -> &Path {
        self.adapter.output()
    }

    /// Runs one build cycle at `hook` and collects its diagnostics.
    pub fn cycle(&mut self, hook: Hook) -> Result<CycleSummary, CliError> {
        let start = Instant::now();

        let cycle = match self.strategy {
            Strategy::Filesystem => match hook {
                Hook::WatchRun => self.adapter.watch_run()?,
                _ => self.adapter.run()?,
            },
            Strategy::Assets => {
                let mut assets = AssetMap::new();
                self.adapter.make(&mut assets)?;
                self.adapter.emit(&mut assets)?
            },
        };
        let status = CycleStatus::from(cycle.outcome());

        let mut report = CompilationReport::new();
        self.adapter.after_compile(cycle, &mut report);

        tracing::debug!(
            ?status,
            dependencies = report.file_dependencies.len(),
            "Build cycle finished"
        );

        Ok(CycleSummary {
            status,
            duration: start.elapsed(),
            report,
        })
    }
}

/// Prints a cycle summary.
///
/// Returns the cycle's failure as an error so the caller can decide whether it is fatal.
pub fn render_cycle(project: &Project, summary: CycleSummary) -> Result<(), CliError> {
    match summary.status {
        CycleStatus::UpToDate => ui::print_up_to_date(project.output()),
        CycleStatus::Generated => ui::print_generated(
            project.output(),
            summary.duration,
            project.adapter.known().len(),
        ),
        CycleStatus::Failed => {},
    }

    match summary.report.errors.into_iter().next() {
        Some(failure) => {
            Err(GenerationError::new(project.output(), project.context(), failure).into())
        },
        None => Ok(()),
    }
}
