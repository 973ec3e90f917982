//! Centralized mathematical function registry
//!
//! This module provides a single source of truth for all built-in functions,
//! including their numeric evaluation, derivative formulas and exact special
//! values, plus the [`UnaryFunction`] table the adapter exposes.

use crate::core::{Constant, Number};
use crate::{Expr, ExprKind};

pub(crate) mod definitions;
pub(crate) mod registry;

// ===== Helper functions for building derivative expressions =====

/// Create a single-argument function call
pub(crate) fn func(name: &str, arg: Expr) -> Expr {
    Expr::func(name, vec![arg])
}

/// Multiply, optimizing for common cases (0 and 1)
pub(crate) fn mul_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero() || b.is_zero() {
        return Expr::zero();
    }
    if a.is_one() {
        return b;
    }
    if b.is_one() {
        return a;
    }
    a * b
}

/// Negate an expression
pub(crate) fn neg(e: Expr) -> Expr {
    e.negate()
}

/// Argument is exactly the integer `n` (floats never match)
pub(crate) fn is_exact(e: &Expr, n: i64) -> bool {
    matches!(e.kind(), ExprKind::Number(num) if !num.is_float() && num.to_i64() == Some(n))
}

pub(crate) fn pi() -> Expr {
    Expr::constant(Constant::Pi)
}

/// Unary transforms the adapter applies through a single template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryFunction {
    Abs,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Exp,
    Log,
    Sqrt,
    Gamma,
}

impl UnaryFunction {
    pub const ALL: [UnaryFunction; 17] = [
        UnaryFunction::Abs,
        UnaryFunction::Sin,
        UnaryFunction::Cos,
        UnaryFunction::Tan,
        UnaryFunction::Asin,
        UnaryFunction::Acos,
        UnaryFunction::Atan,
        UnaryFunction::Sinh,
        UnaryFunction::Cosh,
        UnaryFunction::Tanh,
        UnaryFunction::Asinh,
        UnaryFunction::Acosh,
        UnaryFunction::Atanh,
        UnaryFunction::Exp,
        UnaryFunction::Log,
        UnaryFunction::Sqrt,
        UnaryFunction::Gamma,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnaryFunction::Abs => "abs",
            UnaryFunction::Sin => "sin",
            UnaryFunction::Cos => "cos",
            UnaryFunction::Tan => "tan",
            UnaryFunction::Asin => "asin",
            UnaryFunction::Acos => "acos",
            UnaryFunction::Atan => "atan",
            UnaryFunction::Sinh => "sinh",
            UnaryFunction::Cosh => "cosh",
            UnaryFunction::Tanh => "tanh",
            UnaryFunction::Asinh => "asinh",
            UnaryFunction::Acosh => "acosh",
            UnaryFunction::Atanh => "atanh",
            UnaryFunction::Exp => "exp",
            UnaryFunction::Log => "log",
            UnaryFunction::Sqrt => "sqrt",
            UnaryFunction::Gamma => "gamma",
        }
    }

    /// Apply symbolically. `exp` and `sqrt` produce powers.
    pub fn apply(self, arg: Expr) -> Expr {
        match self {
            UnaryFunction::Exp => Expr::pow(Expr::constant(Constant::E), arg),
            UnaryFunction::Sqrt => Expr::sqrt(arg),
            other => Expr::func(other.name(), vec![arg]),
        }
    }
}

/// `n!` as an exact number for small `n`
pub(crate) fn small_factorial(n: u32) -> Number {
    let mut acc = num_bigint::BigInt::from(1);
    for k in 2..=n {
        acc *= k;
    }
    Number::from_bigint(acc)
}
