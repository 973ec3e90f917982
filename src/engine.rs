//! Expression engine capability
//!
//! [`ExpressionEngine`] is everything the adapter layer needs from a symbolic
//! engine. [`NativeEngine`] implements it over this crate's own expression
//! tree; the adapters are generic, so a different engine can be plugged in.

use num_bigint::BigInt;

use crate::config::EngineConfig;
use crate::core::number::limit_exact_bits;
use crate::core::{Constant, Number, Symbol};
use crate::error::EngineError;
use crate::functions::UnaryFunction;
use crate::matrix::DenseMatrix;
use crate::ops::{self, SolutionSet};
use crate::parser;
use crate::Expr;

/// Result of solving a polynomial equation
#[derive(Debug, Clone, PartialEq)]
pub enum Solutions<X> {
    /// Every root, in the engine's order
    Finite(Vec<X>),
    /// Infinite or unsolved set, in the engine's own text form
    Symbolic(String),
}

/// Named constants available without input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedConstant {
    Pi,
    E,
    EulerGamma,
}

pub trait ExpressionEngine: Send + Sync {
    type Expr: Clone;
    type Symbol: Clone;
    type Matrix: Clone + Send;

    fn config(&self) -> &EngineConfig;

    fn parse(&self, text: &str) -> Result<Self::Expr, EngineError>;
    fn parse_symbol(&self, text: &str) -> Result<Self::Symbol, EngineError>;
    /// Canonical text form
    fn render(&self, expr: &Self::Expr) -> Result<String, EngineError>;

    fn expand(&self, expr: &Self::Expr) -> Result<Self::Expr, EngineError>;
    /// Numeric value, rendered
    fn evalf(&self, expr: &Self::Expr) -> Result<String, EngineError>;
    fn diff(&self, expr: &Self::Expr, var: &Self::Symbol) -> Result<Self::Expr, EngineError>;
    fn subs(
        &self,
        expr: &Self::Expr,
        var: &Self::Symbol,
        value: &Self::Expr,
    ) -> Result<Self::Expr, EngineError>;
    fn solve_poly(
        &self,
        expr: &Self::Expr,
        var: &Self::Symbol,
    ) -> Result<Solutions<Self::Expr>, EngineError>;
    fn apply_unary(&self, f: UnaryFunction, expr: &Self::Expr) -> Result<Self::Expr, EngineError>;

    fn gcd(&self, a: &Self::Expr, b: &Self::Expr) -> Result<Self::Expr, EngineError>;
    fn lcm(&self, a: &Self::Expr, b: &Self::Expr) -> Result<Self::Expr, EngineError>;
    fn factorial(&self, n: u64) -> Result<Self::Expr, EngineError>;
    fn fibonacci(&self, n: u64) -> Result<Self::Expr, EngineError>;
    fn constant(&self, c: NamedConstant) -> Self::Expr;

    fn matrix_new(&self, rows: i64, cols: i64) -> Result<Self::Matrix, EngineError>;
    fn matrix_set(
        &self,
        m: &mut Self::Matrix,
        row: i64,
        col: i64,
        value: Self::Expr,
    ) -> Result<(), EngineError>;
    fn matrix_get(&self, m: &Self::Matrix, row: i64, col: i64) -> Result<Self::Expr, EngineError>;
    fn matrix_render(&self, m: &Self::Matrix) -> Result<String, EngineError>;
    fn matrix_det(&self, m: &Self::Matrix) -> Result<Self::Expr, EngineError>;
    fn matrix_inv(&self, m: &Self::Matrix) -> Result<Self::Matrix, EngineError>;
    fn matrix_add(&self, a: &Self::Matrix, b: &Self::Matrix) -> Result<Self::Matrix, EngineError>;
    fn matrix_mul(&self, a: &Self::Matrix, b: &Self::Matrix) -> Result<Self::Matrix, EngineError>;
}

/// The built-in engine
///
/// # Example
/// ```
/// use symb_bridge::{ExpressionEngine, NativeEngine};
///
/// let engine = NativeEngine::default();
/// let e = engine.parse("(x + 1)**2").unwrap();
/// let e = engine.expand(&e).unwrap();
/// assert_eq!(engine.render(&e).unwrap(), "1 + 2*x + x**2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NativeEngine {
    config: EngineConfig,
}

impl NativeEngine {
    pub fn new(config: EngineConfig) -> Self {
        NativeEngine { config }
    }

    /// Engine with limits taken from `SYMB_*` environment variables
    pub fn from_env() -> Self {
        Self::new(EngineConfig::from_env())
    }

    /// Run `f` with this engine's exact-power bound in force
    fn bounded<T>(&self, f: impl FnOnce() -> T) -> T {
        let _guard = limit_exact_bits(self.config.max_exact_bits);
        f()
    }
}

fn integer_expr(n: num_bigint::BigUint) -> Expr {
    Expr::number(Number::from_bigint(BigInt::from(n)))
}

impl ExpressionEngine for NativeEngine {
    type Expr = Expr;
    type Symbol = Symbol;
    type Matrix = DenseMatrix;

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn parse(&self, text: &str) -> Result<Expr, EngineError> {
        self.bounded(|| parser::parse_with(text, &self.config))
            .map_err(EngineError::from)
    }

    fn parse_symbol(&self, text: &str) -> Result<Symbol, EngineError> {
        Ok(parser::parse_symbol(text)?)
    }

    fn render(&self, expr: &Expr) -> Result<String, EngineError> {
        Ok(self.bounded(|| expr.to_string()))
    }

    fn expand(&self, expr: &Expr) -> Result<Expr, EngineError> {
        self.bounded(|| ops::expand(expr, self.config.max_nodes))
    }

    fn evalf(&self, expr: &Expr) -> Result<String, EngineError> {
        ops::evalf(expr).map(ops::format_float)
    }

    fn diff(&self, expr: &Expr, var: &Symbol) -> Result<Expr, EngineError> {
        self.bounded(|| Ok(ops::diff(expr, var)))
    }

    fn subs(&self, expr: &Expr, var: &Symbol, value: &Expr) -> Result<Expr, EngineError> {
        self.bounded(|| Ok(ops::subs(expr, var, value)))
    }

    fn solve_poly(&self, expr: &Expr, var: &Symbol) -> Result<Solutions<Expr>, EngineError> {
        let set = self.bounded(|| ops::solve_poly(expr, var, self.config.max_nodes))?;
        Ok(match set {
            SolutionSet::Finite(roots) => Solutions::Finite(roots),
            other => Solutions::Symbolic(other.to_string()),
        })
    }

    fn apply_unary(&self, f: UnaryFunction, expr: &Expr) -> Result<Expr, EngineError> {
        self.bounded(|| Ok(f.apply(expr.clone())))
    }

    fn gcd(&self, a: &Expr, b: &Expr) -> Result<Expr, EngineError> {
        ops::gcd(a, b).map(|n| Expr::number(Number::from_bigint(n)))
    }

    fn lcm(&self, a: &Expr, b: &Expr) -> Result<Expr, EngineError> {
        ops::lcm(a, b).map(|n| Expr::number(Number::from_bigint(n)))
    }

    fn factorial(&self, n: u64) -> Result<Expr, EngineError> {
        if n > self.config.max_factorial {
            return Err(EngineError::TooLarge {
                limit: self.config.max_factorial as usize,
            });
        }
        Ok(integer_expr(ops::factorial(n)))
    }

    fn fibonacci(&self, n: u64) -> Result<Expr, EngineError> {
        if n > self.config.max_fibonacci {
            return Err(EngineError::TooLarge {
                limit: self.config.max_fibonacci as usize,
            });
        }
        Ok(integer_expr(ops::fibonacci(n)))
    }

    fn constant(&self, c: NamedConstant) -> Expr {
        Expr::constant(match c {
            NamedConstant::Pi => Constant::Pi,
            NamedConstant::E => Constant::E,
            NamedConstant::EulerGamma => Constant::EulerGamma,
        })
    }

    fn matrix_new(&self, rows: i64, cols: i64) -> Result<DenseMatrix, EngineError> {
        DenseMatrix::zeros(rows, cols)
    }

    fn matrix_set(
        &self,
        m: &mut DenseMatrix,
        row: i64,
        col: i64,
        value: Expr,
    ) -> Result<(), EngineError> {
        m.set(row, col, value)
    }

    fn matrix_get(&self, m: &DenseMatrix, row: i64, col: i64) -> Result<Expr, EngineError> {
        m.get(row, col).cloned()
    }

    fn matrix_render(&self, m: &DenseMatrix) -> Result<String, EngineError> {
        Ok(self.bounded(|| m.to_string()))
    }

    fn matrix_det(&self, m: &DenseMatrix) -> Result<Expr, EngineError> {
        self.bounded(|| m.det(self.config.max_symbolic_matrix_dim, self.config.max_nodes))
    }

    fn matrix_inv(&self, m: &DenseMatrix) -> Result<DenseMatrix, EngineError> {
        self.bounded(|| m.inv(self.config.max_symbolic_matrix_dim, self.config.max_nodes))
    }

    fn matrix_add(&self, a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix, EngineError> {
        self.bounded(|| a.add(b))
    }

    fn matrix_mul(&self, a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix, EngineError> {
        self.bounded(|| a.mul(b))
    }
}
