//! SSL script compiler frontend.
//!
//! [`parse`] loads a preprocessed script, follows its `#include`s, parses and
//! resolves it, and lays out its namespaces. The result is an owned
//! [`CompilationUnit`] plus every diagnostic produced on the way. Only an
//! unreadable primary file stops the pipeline; everything else is reported
//! and parsing carries on.

mod namespace;
pub mod tracing_setup;
mod unit;

use std::io;
use std::path::{Path, PathBuf};

pub use namespace::{LayoutError, Namespace, Scope, SLOT_WIDTH};
pub use ssl_diagnostic::{Diagnostic, ErrorCode, Severity};
pub use ssl_parse::DEFAULT_MAX_INCLUDE_DEPTH;
pub use unit::{CompilationUnit, XRef};

use ssl_parse::SourceLoader;

/// Status reported when parsing produced no errors.
pub const STATUS_OK: i32 = 0;
/// Status reported when at least one error diagnostic was produced.
pub const STATUS_ERRORS: i32 = 1;
/// Status reported when the primary file could not be read.
pub const STATUS_FATAL: i32 = 2;

/// Failure that leaves nothing to report on.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("cannot read `{}`: {source}", path.display())]
    PrimaryFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FatalError {
    pub fn status_code(&self) -> i32 {
        STATUS_FATAL
    }
}

/// Knobs for one parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Searched before the including file's own directory.
    pub include_dir: Option<PathBuf>,
    pub max_include_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            include_dir: None,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }
}

/// A parsed unit and its diagnostics, sorted by position.
#[derive(Debug)]
pub struct ParseOutput {
    pub unit: CompilationUnit,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.code.is_warning()).count()
    }

    /// `STATUS_OK`, or `STATUS_ERRORS` if any diagnostic is an error.
    /// Warnings alone do not fail a parse.
    pub fn status_code(&self) -> i32 {
        if self.has_errors() {
            STATUS_ERRORS
        } else {
            STATUS_OK
        }
    }
}

/// Parse `file_path`, reporting positions in the primary file as
/// `orig_path`.
pub fn parse(
    file_path: &Path,
    orig_path: &Path,
    include_dir: Option<&Path>,
) -> Result<ParseOutput, FatalError> {
    let mut options = ParseOptions::new();
    options.include_dir = include_dir.map(Path::to_path_buf);
    parse_with(file_path, orig_path, &options)
}

#[tracing::instrument(level = "debug", skip(options), fields(file = %file_path.display()))]
pub fn parse_with(
    file_path: &Path,
    orig_path: &Path,
    options: &ParseOptions,
) -> Result<ParseOutput, FatalError> {
    let loaded = SourceLoader::new(options.include_dir.as_deref(), options.max_include_depth)
        .load_file(file_path, orig_path)
        .map_err(|source| FatalError::PrimaryFile {
            path: file_path.to_path_buf(),
            source,
        })?;
    Ok(finish(ssl_parse::parse(loaded)))
}

/// Parse in-memory text with no include directory.
pub fn parse_str(text: &str, display_path: &str) -> ParseOutput {
    finish(ssl_parse::parse_str(text, display_path))
}

fn finish(output: ssl_parse::ParseOutput) -> ParseOutput {
    ParseOutput {
        unit: CompilationUnit::new(output.module),
        diagnostics: output.diagnostics,
    }
}
