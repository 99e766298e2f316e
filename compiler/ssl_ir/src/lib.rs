//! SSL IR - data model shared by every compiler phase.
//!
//! This crate contains the core data structures for the SSL compiler:
//! - String pools with checked, pool-tagged offsets (`StrId`)
//! - Source positions that survive `#include` / `#line` boundaries
//! - Tokens produced by the lexer
//! - Postfix `Node`/`NodeList` bodies
//! - Variables, procedures and reference records
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifier and literal text lives in a `StringPool`,
//!   everything else refers to it through a `StrId`.
//! - **Tagged Handles**: a `StrId` remembers which pool it came from, so an
//!   offset can never be resolved against the wrong buffer.
//! - **Sum Types at the Boundary**: trigger kinds and value kinds are enums,
//!   never overlapping unions.

mod node;
mod pool;
mod source;
mod symbol;
mod token;
mod value;

pub use node::{Node, NodeKind, NodeList};
pub use pool::{PoolError, PoolId, StrId, StringPool};
pub use source::{FileId, SourceMap, SourcePos};
pub use symbol::{BodySpan, ProcFlags, Procedure, Reference, Trigger, VarScope, Variable};
pub use token::{Token, TokenKind};
pub use value::{Value, ValueKind};
