//! Generate command implementation.

use crate::commands::{Project, ProjectArgs, render_cycle};
use crate::core::CliError;
use crate::utils::ui;
use clap::Parser;
use typei18n_build::Hook;

/// Arguments for the generate command.
#[derive(Parser)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Run the generate command.
pub fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let mut project = Project::load(args.project)?;

    ui::print_header();
    ui::print_paths(project.context(), project.output());

    let summary = project.cycle(Hook::Run)?;
    render_cycle(&project, summary)
}
