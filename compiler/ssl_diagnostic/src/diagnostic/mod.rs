use std::fmt;

use smallvec::SmallVec;
use ssl_ir::SourcePos;

use crate::{DiagnosticKind, ErrorCode};

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled position with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label {
    pub pos: SourcePos,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(pos: SourcePos, message: impl Into<String>) -> Self {
        Label {
            pos,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(pos: SourcePos, message: impl Into<String>) -> Self {
        Label {
            pos,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic with everything the host needs to show it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    pub severity: Severity,
    /// Main error message.
    pub message: String,
    /// Labeled positions; the first primary label is where the error is.
    pub labels: SmallVec<[Label; 2]>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: SmallVec::new(),
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, pos: SourcePos, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(pos, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, pos: SourcePos, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(pos, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Position of the first primary label.
    pub fn primary_pos(&self) -> Option<SourcePos> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.pos)
    }

    /// Primary position, or the start of the primary file when the
    /// diagnostic carries no position at all.
    pub fn pos(&self) -> SourcePos {
        self.primary_pos().unwrap_or_default()
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.code.kind()
    }

    /// Check if this is an error (vs warning/note).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {}: {}", marker, label.pos, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        Ok(())
    }
}

/// Create an "undeclared identifier" diagnostic.
pub fn undeclared_identifier(pos: SourcePos, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!("undeclared identifier `{name}`"))
        .with_label(pos, "not found in this scope")
}

/// Create a "redeclaration" diagnostic carrying both sites.
pub fn redeclaration(pos: SourcePos, first: SourcePos, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E3001)
        .with_message(format!(
            "`{name}` redeclared on line {}, first declared on line {}",
            pos.line, first.line
        ))
        .with_label(pos, "redeclared here")
        .with_secondary_label(first, "first declared here")
}

#[cfg(test)]
mod tests;
