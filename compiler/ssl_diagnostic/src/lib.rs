//! Diagnostic system for SSL compiler error reporting.
//!
//! Every recoverable problem the frontend finds becomes a [`Diagnostic`]:
//! - An error code for searchability (`E1001`, `W0001`, ...)
//! - A message saying what went wrong
//! - A primary position (file, line, column) saying where
//! - Secondary labels for related sites (e.g. the first declaration)
//! - Notes for extra context
//!
//! Diagnostics are collected in a [`DiagnosticQueue`] and never dropped, so a
//! failed parse still reports everything it saw.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod queue;

pub use diagnostic::{redeclaration, undeclared_identifier, Diagnostic, Label, Severity};
pub use error_code::{DiagnosticKind, ErrorCode};
pub use queue::DiagnosticQueue;
