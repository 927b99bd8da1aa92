//! Watch command implementation.

use crate::commands::{Project, ProjectArgs};
use crate::core::{CliError, ContextNotFoundError};
use crate::utils::ui;
use crate::watcher::watch_project;
use clap::Parser;

/// Arguments for the watch command.
#[derive(Parser)]
pub struct WatchArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Run the watch command.
pub fn run_watch(args: WatchArgs) -> Result<(), CliError> {
    let project = Project::load(args.project)?;

    ui::print_header();
    ui::print_paths(project.context(), project.output());

    if !project.context().is_dir() {
        return Err(ContextNotFoundError {
            path: project.context().to_path_buf(),
        }
        .into());
    }

    watch_project(project).map_err(CliError::from)
}
