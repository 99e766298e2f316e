//! Parser tests.
//!
//! - `parser`: whole-script scenarios covering declarations, node shapes,
//!   resolution, references and recovery
