//! Stack growth for the recursive-descent parser.
//!
//! Generated scripts can nest parentheses, `if` chains and blocks far deeper
//! than hand-written code. Every recursive grammar entry point runs inside
//! [`ensure_sufficient_stack`], which moves onto a fresh stack segment when the
//! current one runs low instead of overflowing.
//!
//! On `wasm32` the call is a plain passthrough.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
