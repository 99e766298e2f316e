use std::fmt;

/// Category of a diagnostic, as seen by the host.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// Malformed input: unexpected token, bad literal, unknown directive.
    Syntax,
    /// A name that no declaration resolves.
    UndeclaredIdentifier,
    /// A name declared twice in one scope.
    Redeclaration,
    /// A linkage rule broken: import with a body, export without one,
    /// conflicting triggers or qualifiers.
    ScopeViolation,
    /// An `#include` that could not be honored.
    IncludeResolution,
    /// The primary input could not be read.
    PrimaryFile,
    /// A resolved symbol used the wrong way: bad argument count, calling a
    /// variable, assigning to a procedure.
    InvalidUse,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Syntax => "syntax error",
            DiagnosticKind::UndeclaredIdentifier => "undeclared identifier",
            DiagnosticKind::Redeclaration => "redeclaration",
            DiagnosticKind::ScopeViolation => "scope violation",
            DiagnosticKind::IncludeResolution => "include resolution",
            DiagnosticKind::PrimaryFile => "primary file",
            DiagnosticKind::InvalidUse => "invalid use",
        };
        f.write_str(name)
    }
}

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates the category:
/// - E1xxx: Syntax errors
/// - E2xxx: Undeclared identifiers
/// - E3xxx: Redeclarations
/// - E4xxx: Scope and linkage violations
/// - E5xxx: Include resolution
/// - E6xxx: Invalid use of a resolved symbol
/// - E9xxx: Primary input errors
/// - W0xxx: Warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    // Syntax Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed block
    E1003,
    /// Expected identifier
    E1004,
    /// Non-constant initializer
    E1005,
    /// Invalid trigger time
    E1006,
    /// Required parameter after optional parameter
    E1007,
    /// Invalid character
    E1008,
    /// Unterminated string literal
    E1009,
    /// Unknown preprocessor directive
    E1010,
    /// Malformed number literal
    E1011,

    // Resolution Errors (E2xxx)
    /// Undeclared identifier
    E2001,

    // Redeclaration Errors (E3xxx)
    /// Name already declared in this scope
    E3001,
    /// Procedure definition conflicts with an earlier declaration
    E3002,

    // Scope Errors (E4xxx)
    /// Import procedure given a body
    E4001,
    /// Export procedure never given a body
    E4002,
    /// Conflicting trigger kinds
    E4003,
    /// Conflicting scope qualifiers
    E4004,
    /// Qualifier not allowed here
    E4005,
    /// Import variable given an initializer
    E4006,

    // Include Errors (E5xxx)
    /// Include file not found
    E5001,
    /// Include cycle
    E5002,
    /// Include nesting too deep
    E5003,

    // Use Errors (E6xxx)
    /// Wrong number of arguments
    E6001,
    /// Called something that is not a procedure
    E6002,
    /// Invalid assignment target
    E6003,

    // Input Errors (E9xxx)
    /// Primary input file unreadable
    E9001,

    // Warnings (W0xxx)
    /// Procedure declared but never defined
    W0001,
    /// Qualifier repeated
    W0002,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Syntax
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
            // Resolution
            ErrorCode::E2001 => "E2001",
            // Redeclaration
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            // Scope
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E4006 => "E4006",
            // Include
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E5003 => "E5003",
            // Use
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            // Input
            ErrorCode::E9001 => "E9001",
            // Warnings
            ErrorCode::W0001 => "W0001",
            ErrorCode::W0002 => "W0002",
        }
    }

    /// The taxonomy bucket this code belongs to.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ErrorCode::E1001
            | ErrorCode::E1002
            | ErrorCode::E1003
            | ErrorCode::E1004
            | ErrorCode::E1005
            | ErrorCode::E1006
            | ErrorCode::E1007
            | ErrorCode::E1008
            | ErrorCode::E1009
            | ErrorCode::E1010
            | ErrorCode::E1011 => DiagnosticKind::Syntax,
            ErrorCode::E2001 => DiagnosticKind::UndeclaredIdentifier,
            ErrorCode::E3001 | ErrorCode::E3002 => DiagnosticKind::Redeclaration,
            ErrorCode::E4001
            | ErrorCode::E4002
            | ErrorCode::E4003
            | ErrorCode::E4004
            | ErrorCode::E4005
            | ErrorCode::E4006
            | ErrorCode::W0001
            | ErrorCode::W0002 => DiagnosticKind::ScopeViolation,
            ErrorCode::E5001 | ErrorCode::E5002 | ErrorCode::E5003 => {
                DiagnosticKind::IncludeResolution
            }
            ErrorCode::E6001 | ErrorCode::E6002 | ErrorCode::E6003 => DiagnosticKind::InvalidUse,
            ErrorCode::E9001 => DiagnosticKind::PrimaryFile,
        }
    }

    /// Check if this is a syntax error (E1xxx range).
    pub fn is_syntax_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a warning code (Wxxx range).
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(ErrorCode::E2001.as_str(), "E2001");
    }

    #[test]
    fn test_kind_follows_range() {
        assert_eq!(ErrorCode::E1010.kind(), DiagnosticKind::Syntax);
        assert_eq!(ErrorCode::E2001.kind(), DiagnosticKind::UndeclaredIdentifier);
        assert_eq!(ErrorCode::E3002.kind(), DiagnosticKind::Redeclaration);
        assert_eq!(ErrorCode::E4001.kind(), DiagnosticKind::ScopeViolation);
        assert_eq!(ErrorCode::E5002.kind(), DiagnosticKind::IncludeResolution);
        assert_eq!(ErrorCode::E6001.kind(), DiagnosticKind::InvalidUse);
        assert_eq!(ErrorCode::E9001.kind(), DiagnosticKind::PrimaryFile);
    }

    #[test]
    fn test_warning_range() {
        assert!(ErrorCode::W0001.is_warning());
        assert!(!ErrorCode::E4002.is_warning());
        assert!(ErrorCode::E1004.is_syntax_error());
        assert!(!ErrorCode::E2001.is_syntax_error());
    }
}
