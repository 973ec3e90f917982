//! String-based C ABI over a small symbolic mathematics engine
//!
//! Every exported function takes expressions as text, runs one engine
//! operation and hands back an owned C string, a status code, or a matrix
//! handle. The crate is layered:
//!
//! - [`core`](crate::core), [`parser`], [`ops`], [`matrix`]: the engine itself
//! - [`ExpressionEngine`]: the capability the adapters need, implemented by
//!   [`NativeEngine`]
//! - [`ExpressionAdapter`] and [`MatrixManager`]: the safe request/response
//!   layer, returning [`BridgeError`] with the operation and stage that failed
//! - [`capi`]: `extern "C"` shims, panic containment and ownership transfer
//!
//! # Usage Examples
//!
//! ## Safe Rust API
//! ```
//! use symb_bridge::{ExpressionAdapter, NativeEngine};
//!
//! let adapter = ExpressionAdapter::new(NativeEngine::default());
//! assert_eq!(adapter.expand(Some("(x + 1)**2")).unwrap(), "1 + 2*x + x**2");
//! assert_eq!(adapter.differentiate(Some("sin(x)"), Some("x")).unwrap(), "cos(x)");
//! assert_eq!(adapter.solve(Some("x**2 - 4"), Some("x")).unwrap(), "[-2, 2]");
//!
//! let err = adapter.expand(Some("x +")).unwrap_err();
//! assert!(err.to_string().starts_with("Error in expand:"));
//! ```
//!
//! ## Matrices
//! ```
//! use symb_bridge::{MatrixManager, NativeEngine};
//!
//! let matrices = MatrixManager::new(NativeEngine::default());
//! let m = matrices.create(2, 2).unwrap();
//! for (row, col, value) in [(0, 0, "1"), (0, 1, "2"), (1, 0, "3"), (1, 1, "4")] {
//!     matrices.set_element(m, row, col, Some(value)).unwrap();
//! }
//! assert_eq!(matrices.det(m).unwrap(), "-2");
//! assert!(matrices.free(m));
//! ```

mod adapter;
pub mod capi;
mod config;
pub mod core;
mod engine;
mod error;
pub mod functions;
pub(crate) mod math;
pub mod matrix;
pub mod ops;
pub mod parser;

#[cfg(test)]
mod tests;

pub use adapter::{CONVERSION_ERROR, ExpressionAdapter, MatrixManager};
pub use config::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXACT_BITS, DEFAULT_MAX_FACTORIAL, DEFAULT_MAX_FIBONACCI,
    DEFAULT_MAX_NODES, DEFAULT_MAX_SYMBOLIC_MATRIX_DIM, EngineConfig,
};
pub use crate::core::{Constant, Expr, ExprKind, Number, Symbol, UniPoly};
pub use engine::{ExpressionEngine, NamedConstant, NativeEngine, Solutions};
pub use error::{BridgeError, EngineError, ErrorKind, ParseError, Span};
pub use functions::UnaryFunction;
pub use matrix::{DenseMatrix, MatrixHandle, NULL_HANDLE};
pub use parser::{parse, parse_symbol, parse_with};
