//! Core types for symbolic mathematics
//!
//! This module contains the fundamental types:
//! - `Expr` / `ExprKind` - Expression AST in canonical form
//! - `Number` - exact rationals and floats
//! - `Symbol` - validated variable names
//! - `UniPoly` - univariate polynomial view of an expression
//! - Display formatting (canonical text form)

mod display;
pub(crate) mod expr;
pub(crate) mod number;
pub(crate) mod poly;
pub(crate) mod symbol;

pub use expr::{Constant, Expr, ExprKind, expr_cmp, term_cmp};
pub use number::Number;
pub use poly::UniPoly;
pub use symbol::Symbol;
