// CLI output formatting with consistent styling using colored.
// We stick to standard println!/eprintln! for textual output to ensure ANSI color compatibility.

use colored::Colorize as _;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Routes `tracing` events to stderr, filtered by `RUST_LOG` (warnings by default).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

pub fn print_header() {
    println!("{}", "TypeScript Locale Generator".dimmed());
}

pub fn print_paths(context: &Path, output: &Path) {
    println!(
        "{} {} {} {}",
        "Locales in".dimmed(),
        context.display().to_string().cyan(),
        "->".dimmed(),
        output.display().to_string().green()
    );
}

/// Progress message from the generator, already prefixed.
pub fn print_log(message: &str) {
    println!("{}", message.dimmed());
}

pub fn print_up_to_date(output: &Path) {
    println!(
        "{} {}",
        output.display().to_string().green(),
        "is up to date".dimmed()
    );
}

pub fn print_generated(output: &Path, duration: Duration, locale_count: usize) {
    println!(
        "{} {:.2?} ({} locales)",
        format!("{} generated in", output.display()).dimmed(),
        duration,
        locale_count.to_string().cyan()
    );
}

pub fn print_watching(context: &Path) {
    println!(
        "{} {} {}",
        "Watching".dimmed(),
        context.display().to_string().cyan(),
        "(press Ctrl-C to stop)".dimmed()
    );
}

pub fn print_change_detected(count: usize) {
    println!(
        "{} {}",
        "Change detected in".yellow(),
        format!("{count} file(s)").white().bold()
    );
}

pub fn print_watch_error(error: &str) {
    eprintln!("{} {}", "Watch error:".red(), error);
}

pub fn print_diagnostic(report: miette::Report) {
    eprintln!("{report:?}");
}
