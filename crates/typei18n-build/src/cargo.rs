use crate::adapter::{Compilation, CompilationReport};
use crate::error::GenerationFailure;
use crate::options::LOG_PREFIX;
use std::io::{self, Write};
use std::path::Path;

/// [`Compilation`] for a Cargo build script.
///
/// Errors become `cargo:warning` lines so the build continues, and
/// dependencies become `cargo:rerun-if-changed` directives.
#[derive(Debug, Default)]
pub struct CargoCompilation {
    report: CompilationReport,
}

impl CargoCompilation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_to(&self, mut out: impl Write) -> io::Result<()> {
        for failure in &self.report.errors {
            for line in failure.to_string().lines() {
                writeln!(out, "cargo:warning={LOG_PREFIX} {line}")?;
            }
        }

        for path in self
            .report
            .context_dependencies
            .iter()
            .chain(&self.report.file_dependencies)
        {
            writeln!(out, "cargo:rerun-if-changed={}", path.display())?;
        }

        Ok(())
    }
}

impl Compilation for CargoCompilation {
    fn push_error(&mut self, failure: GenerationFailure) {
        self.report.push_error(failure);
    }

    fn add_file_dependency(&mut self, path: &Path) {
        self.report.add_file_dependency(path);
    }

    fn remove_file_dependency(&mut self, path: &Path) {
        self.report.remove_file_dependency(path);
    }

    fn add_context_dependency(&mut self, path: &Path) {
        self.report.add_context_dependency(path);
    }
}
