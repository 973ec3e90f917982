//! Expression tree.
//!
//! This module defines:
//! - `Expr` - The central AST node type
//! - `ExprKind` - The variants of expression nodes
//! - `Constant` - Named mathematical constants
//!
//! # Architecture
//!
//! ## N-ary Sum/Product
//! Instead of binary `Add(left, right)`, sums and products are n-ary and flat:
//! `a + b + c` is `Sum([a, b, c])`. Subtraction is a sum with a negated term,
//! division a product with a negative power.
//!
//! ## Canonical construction
//! Every constructor in [`constructors`] returns canonical form: numbers are
//! folded, like terms and like bases are combined, and children are sorted with
//! [`expr_cmp`]. Two mathematically-identical inputs that only differ in
//! ordering or grouping therefore build structurally equal trees.
//!
//! ## Structural hashing
//! Each `Expr` carries a pre-computed hash for O(1) equality rejection and for
//! use as a map key while collecting like terms.

mod constructors;
mod ordering;

use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use rustc_hash::FxHasher;

use crate::core::number::Number;
use crate::core::symbol::Symbol;

pub use ordering::{expr_cmp, term_cmp};

/// Named constants understood by the parser and the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    Pi,
    E,
    EulerGamma,
    /// Imaginary unit
    I,
    /// Complex infinity, the result of dividing by an exact zero
    ComplexInfinity,
}

impl Constant {
    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "E",
            Constant::EulerGamma => "EulerGamma",
            Constant::I => "I",
            Constant::ComplexInfinity => "zoo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Constant::Pi),
            "E" => Some(Constant::E),
            "EulerGamma" => Some(Constant::EulerGamma),
            "I" => Some(Constant::I),
            "zoo" => Some(Constant::ComplexInfinity),
            _ => None,
        }
    }

    /// Real value, if the constant has one
    pub fn to_f64(self) -> Option<f64> {
        match self {
            Constant::Pi => Some(std::f64::consts::PI),
            Constant::E => Some(std::f64::consts::E),
            Constant::EulerGamma => Some(0.577_215_664_901_532_9),
            Constant::I | Constant::ComplexInfinity => None,
        }
    }
}

/// A symbolic mathematical expression in canonical form.
///
/// # Example
/// ```
/// use symb_bridge::Expr;
///
/// let x = Expr::symbol_named("x");
/// let expr = Expr::sum(vec![x.clone(), x, Expr::integer(3)]);
/// assert_eq!(expr.to_string(), "3 + 2*x");
/// ```
#[derive(Debug, Clone)]
pub struct Expr {
    /// Structural hash for fast equality rejection
    pub(crate) hash: u64,
    pub(crate) kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;
    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl PartialEq for Expr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

/// The kind (structure) of an expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// Exact rational or float
    Number(Number),

    /// Free variable
    Symbol(Symbol),

    /// Named constant (pi, E, ...)
    Constant(Constant),

    /// N-ary sum, numeric term first, remaining terms sorted by [`term_cmp`]
    Sum(Vec<Arc<Expr>>),

    /// N-ary product, numeric coefficient first, remaining factors sorted by [`expr_cmp`]
    Product(Vec<Arc<Expr>>),

    /// Power: base ** exponent
    Pow(Arc<Expr>, Arc<Expr>),

    /// Function call (built-in or user-defined)
    FunctionCall { name: Arc<str>, args: Vec<Arc<Expr>> },

    /// Unevaluated derivative of `inner` with respect to `vars`, in order
    Derivative { inner: Arc<Expr>, vars: Vec<Symbol> },

    /// Equation `lhs = rhs`
    Equality(Arc<Expr>, Arc<Expr>),
}

impl ExprKind {
    fn tag(&self) -> u8 {
        match self {
            ExprKind::Number(_) => 0,
            ExprKind::Symbol(_) => 1,
            ExprKind::Constant(_) => 2,
            ExprKind::Sum(_) => 3,
            ExprKind::Product(_) => 4,
            ExprKind::Pow(_, _) => 5,
            ExprKind::FunctionCall { .. } => 6,
            ExprKind::Derivative { .. } => 7,
            ExprKind::Equality(_, _) => 8,
        }
    }
}

fn compute_hash(kind: &ExprKind) -> u64 {
    let mut h = FxHasher::default();
    kind.tag().hash(&mut h);
    match kind {
        ExprKind::Number(n) => n.hash(&mut h),
        ExprKind::Symbol(s) => s.hash(&mut h),
        ExprKind::Constant(c) => c.hash(&mut h),
        ExprKind::Sum(items) | ExprKind::Product(items) => {
            items.len().hash(&mut h);
            for item in items {
                item.hash.hash(&mut h);
            }
        }
        ExprKind::Pow(a, b) | ExprKind::Equality(a, b) => {
            a.hash.hash(&mut h);
            b.hash.hash(&mut h);
        }
        ExprKind::FunctionCall { name, args } => {
            name.hash(&mut h);
            for arg in args {
                arg.hash.hash(&mut h);
            }
        }
        ExprKind::Derivative { inner, vars } => {
            inner.hash.hash(&mut h);
            vars.hash(&mut h);
        }
    }
    h.finish()
}

impl Expr {
    /// Wrap a kind without canonicalizing it. Callers must already hold canonical parts.
    pub(crate) fn raw(kind: ExprKind) -> Self {
        Expr {
            hash: compute_hash(&kind),
            kind,
        }
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn as_number(&self) -> Option<&Number> {
        match &self.kind {
            ExprKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match &self.kind {
            ExprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Number::is_zero)
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(Number::is_one)
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind, ExprKind::Number(_))
    }

    pub fn is_constant(&self, c: Constant) -> bool {
        matches!(self.kind, ExprKind::Constant(k) if k == c)
    }

    /// True if `sym` occurs anywhere in the tree
    pub fn contains_symbol(&self, sym: &Symbol) -> bool {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Constant(_) => false,
            ExprKind::Symbol(s) => s == sym,
            ExprKind::Sum(items) | ExprKind::Product(items) => {
                items.iter().any(|e| e.contains_symbol(sym))
            }
            ExprKind::FunctionCall { args, .. } => args.iter().any(|e| e.contains_symbol(sym)),
            ExprKind::Pow(a, b) | ExprKind::Equality(a, b) => {
                a.contains_symbol(sym) || b.contains_symbol(sym)
            }
            ExprKind::Derivative { inner, vars } => {
                vars.contains(sym) || inner.contains_symbol(sym)
            }
        }
    }

    /// True if no symbol or user function occurs in the tree
    pub fn is_free_of_symbols(&self) -> bool {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Constant(_) => true,
            ExprKind::Symbol(_) | ExprKind::Derivative { .. } => false,
            ExprKind::Sum(items) | ExprKind::Product(items) => {
                items.iter().all(|e| e.is_free_of_symbols())
            }
            ExprKind::FunctionCall { args, .. } => args.iter().all(|e| e.is_free_of_symbols()),
            ExprKind::Pow(a, b) | ExprKind::Equality(a, b) => {
                a.is_free_of_symbols() && b.is_free_of_symbols()
            }
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        1 + match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => 0,
            ExprKind::Sum(items) | ExprKind::Product(items) => {
                items.iter().map(|e| e.node_count()).sum()
            }
            ExprKind::FunctionCall { args, .. } => args.iter().map(|e| e.node_count()).sum(),
            ExprKind::Pow(a, b) | ExprKind::Equality(a, b) => a.node_count() + b.node_count(),
            ExprKind::Derivative { inner, .. } => inner.node_count(),
        }
    }

    /// Split a term into numeric coefficient and the rest: `-3*x*y` → `(-3, x*y)`.
    /// A bare number splits into `(n, 1)`.
    pub fn split_coefficient(&self) -> (Number, Expr) {
        match &self.kind {
            ExprKind::Number(n) => (n.clone(), Expr::one()),
            ExprKind::Product(factors) => match factors.first().and_then(|f| f.as_number()) {
                Some(c) => {
                    let rest: Vec<Arc<Expr>> = factors[1..].to_vec();
                    let rest = if rest.len() == 1 {
                        Expr::unwrap_arc(Arc::clone(&rest[0]))
                    } else {
                        Expr::raw(ExprKind::Product(rest))
                    };
                    (c.clone(), rest)
                }
                None => (Number::one(), self.clone()),
            },
            _ => (Number::one(), self.clone()),
        }
    }

    /// Terms of a sum, or the expression itself as a single term
    pub fn terms(&self) -> Vec<Expr> {
        match &self.kind {
            ExprKind::Sum(items) => items.iter().map(|t| (**t).clone()).collect(),
            _ => vec![self.clone()],
        }
    }

    /// Factors of a product, or the expression itself as a single factor
    pub fn factors(&self) -> Vec<Expr> {
        match &self.kind {
            ExprKind::Product(items) => items.iter().map(|t| (**t).clone()).collect(),
            _ => vec![self.clone()],
        }
    }

    /// Rebuild this node from transformed children through the canonical constructors.
    ///
    /// Atoms are returned unchanged. `f` is applied to every direct child.
    pub fn map_children<F>(&self, mut f: F) -> Expr
    where
        F: FnMut(&Expr) -> Expr,
    {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => self.clone(),
            ExprKind::Sum(items) => Expr::sum(items.iter().map(|e| f(e)).collect()),
            ExprKind::Product(items) => Expr::product(items.iter().map(|e| f(e)).collect()),
            ExprKind::Pow(b, e) => Expr::pow(f(b), f(e)),
            ExprKind::FunctionCall { name, args } => {
                Expr::func(name, args.iter().map(|e| f(e)).collect())
            }
            ExprKind::Derivative { inner, vars } => Expr::derivative(f(inner), vars.clone()),
            ExprKind::Equality(l, r) => Expr::equality(f(l), f(r)),
        }
    }

    /// Take the value out of an `Arc` without cloning when it is unshared
    pub(crate) fn unwrap_arc(arc: Arc<Expr>) -> Expr {
        Arc::try_unwrap(arc).unwrap_or_else(|shared| (*shared).clone())
    }
}
