use clap::{Parser, Subcommand};
use miette::Result as MietteResult;
use typei18n_cli::commands::{GenerateArgs, WatchArgs, run_generate, run_watch};

#[derive(Parser)]
#[command(name = "typei18n")]
#[command(about = "Generate a typed TypeScript translation provider from YAML locale files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the provider once
    Generate(GenerateArgs),

    /// Watch the locale directory and regenerate on changes
    Watch(WatchArgs),
}

fn main() -> MietteResult<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    typei18n_cli::utils::ui::init_logging();

    let result = match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Watch(args) => run_watch(args),
    };

    result.map_err(miette::Report::new)
}
