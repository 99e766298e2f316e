//! Diagnostic queue for collecting and ordering diagnostics.
//!
//! Unlike an interactive compiler, the host wants every problem the frontend
//! saw: nothing is deduplicated, limited, or suppressed here. Cascades are the
//! parser's job to avoid (it resynchronizes before reporting again).

use ssl_ir::SourcePos;

use crate::Diagnostic;

/// Queued diagnostic with its insertion order for stable sorting.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    pos: SourcePos,
}

/// Queue for collecting and sorting diagnostics.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.push(diagnostic);
/// // ... add more diagnostics
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic of any severity.
    pub fn push(&mut self, diag: Diagnostic) {
        if diag.is_error() {
            self.error_count += 1;
        } else if diag.code.is_warning() {
            self.warning_count += 1;
        }
        let pos = diag.pos();
        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            pos,
        });
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Move every diagnostic of `other` into this queue.
    pub fn extend(&mut self, other: DiagnosticQueue) {
        for queued in other.diagnostics {
            self.push(queued.diagnostic);
        }
    }

    /// Sort diagnostics by position and return them.
    ///
    /// The sort is stable, so diagnostics at the same position keep the order
    /// they were reported in. Clears the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self.diagnostics.windows(2).all(|w| w[0].pos <= w[1].pos);
        if !already_sorted {
            self.diagnostics.sort_by_key(|d| d.pos);
        }

        self.error_count = 0;
        self.warning_count = 0;
        self.diagnostics.drain(..).map(|d| d.diagnostic).collect()
    }

    /// Get diagnostics without clearing the queue, in insertion order.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|d| &d.diagnostic)
    }
}
