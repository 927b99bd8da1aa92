//! CLI command implementations.

mod common;
mod generate;
mod watch;

pub use common::{Project, ProjectArgs, render_cycle};
pub use generate::{GenerateArgs, run_generate};
pub use watch::{WatchArgs, run_watch};
