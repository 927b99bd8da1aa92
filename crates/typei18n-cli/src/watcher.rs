//! File watcher and watch-mode build loop.

use crate::commands::{Project, render_cycle};
use crate::core::CliError;
use crate::utils::ui;
use anyhow::{Context as _, Result};
use notify::RecursiveMode;
use notify_debouncer_full::new_debouncer;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use typei18n_build::Hook;

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs a first build cycle, then one watch cycle per batch of changes
/// under the locale directory. Returns when the watcher shuts down.
pub fn watch_project(mut project: Project) -> Result<()> {
    run_cycle(&mut project, Hook::Run)?;

    let (file_tx, file_rx) = mpsc::channel();
    let mut debouncer =
        new_debouncer(DEBOUNCE, None, file_tx).context("Failed to create file watcher")?;

    debouncer
        .watch(project.context(), RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", project.context().display()))?;

    ui::print_watching(project.context());

    for result in file_rx {
        match result {
            Ok(events) => {
                let changed = changed_paths(
                    events
                        .iter()
                        .flat_map(|event| event.paths.iter().map(PathBuf::as_path)),
                    project.output(),
                );

                // Writing the provider itself must not trigger another cycle
                if changed.is_empty() {
                    continue;
                }

                ui::print_change_detected(changed.len());
                run_cycle(&mut project, Hook::WatchRun)?;
            },
            Err(errors) => {
                for error in errors {
                    ui::print_watch_error(&error.to_string());
                }
            },
        }
    }

    Ok(())
}

/// Runs one cycle and prints its failures.
///
/// Only an enumeration failure in the first cycle is returned; later ones
/// fail that cycle and the watcher keeps going.
fn run_cycle(project: &mut Project, hook: Hook) -> Result<(), CliError> {
    match project.cycle(hook) {
        Ok(summary) => {
            if let Err(e) = render_cycle(project, summary) {
                ui::print_diagnostic(miette::Report::new(e));
            }
        },
        Err(e @ CliError::Enumerate(_)) if matches!(hook, Hook::WatchRun) => {
            ui::print_diagnostic(miette::Report::new(e));
        },
        Err(e) => return Err(e),
    }

    Ok(())
}

/// The distinct changed paths, ignoring the generated output.
fn changed_paths<'a>(
    paths: impl IntoIterator<Item = &'a Path>,
    output: &Path,
) -> BTreeSet<PathBuf> {
    paths
        .into_iter()
        .filter(|path| *path != output)
        .map(Path::to_path_buf)
        .collect()
}
