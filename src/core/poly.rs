//! Univariate polynomial view of an expression
//!
//! Reads an expanded expression as `c0 + c1*x + c2*x**2 + ...` in one symbol.
//! Coefficients are arbitrary expressions free of that symbol, so
//! `a*x**2 + b` is a quadratic in `x` with coefficients `[b, 0, a]`.

use num_rational::BigRational;

use crate::core::expr::{Expr, ExprKind};
use crate::core::symbol::Symbol;
use crate::error::EngineError;

/// Highest degree a polynomial view will allocate for
pub const MAX_DEGREE: usize = 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct UniPoly {
    var: Symbol,
    /// `coeffs[i]` multiplies `var**i`; no trailing zeros
    coeffs: Vec<Expr>,
}

impl UniPoly {
    /// Collect the coefficients of an expanded expression.
    ///
    /// Fails with [`EngineError::NotPolynomial`] when `var` occurs anywhere
    /// other than in a non-negative integer power of itself.
    pub fn from_expr(expr: &Expr, var: &Symbol) -> Result<Self, EngineError> {
        let mut buckets: Vec<Vec<Expr>> = Vec::new();
        for term in expr.terms() {
            let (degree, coeff) = split_term(&term, var)?;
            if buckets.len() <= degree {
                buckets.resize_with(degree + 1, Vec::new);
            }
            buckets[degree].push(coeff);
        }
        let mut coeffs: Vec<Expr> = buckets.into_iter().map(Expr::sum).collect();
        while coeffs.last().is_some_and(Expr::is_zero) {
            coeffs.pop();
        }
        Ok(UniPoly {
            var: var.clone(),
            coeffs,
        })
    }

    pub fn var(&self) -> &Symbol {
        &self.var
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Degree; the zero polynomial reports 0
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn coeffs(&self) -> &[Expr] {
        &self.coeffs
    }

    pub fn coeff(&self, i: usize) -> Expr {
        self.coeffs.get(i).cloned().unwrap_or_else(Expr::zero)
    }

    /// All coefficients as exact rationals, if they are
    pub fn rational_coeffs(&self) -> Option<Vec<BigRational>> {
        self.coeffs
            .iter()
            .map(|c| c.as_number().and_then(|n| n.as_rational()).cloned())
            .collect()
    }

    pub fn to_expr(&self) -> Expr {
        let x = Expr::symbol(self.var.clone());
        Expr::sum(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| c.clone() * Expr::pow(x.clone(), Expr::integer(i as i64)))
                .collect(),
        )
    }
}

/// `(degree, coefficient)` of one term of an expanded sum
fn split_term(term: &Expr, var: &Symbol) -> Result<(usize, Expr), EngineError> {
    if !term.contains_symbol(var) {
        return Ok((0, term.clone()));
    }
    let not_poly = || EngineError::NotPolynomial {
        symbol: var.name().to_string(),
    };

    let mut degree: usize = 0;
    let mut rest: Vec<Expr> = Vec::new();
    for factor in term.factors() {
        match &factor.kind {
            ExprKind::Symbol(s) if s == var => degree += 1,
            ExprKind::Pow(b, e) if b.as_symbol() == Some(var) => {
                let k = e.positive_integer().ok_or_else(not_poly)?;
                degree += k as usize;
            }
            _ if factor.contains_symbol(var) => return Err(not_poly()),
            _ => rest.push(factor.clone()),
        }
    }
    if degree > MAX_DEGREE {
        return Err(EngineError::TooLarge { limit: MAX_DEGREE });
    }
    Ok((degree, Expr::product(rest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol_named("x")
    }

    fn var() -> Symbol {
        Symbol::new("x").unwrap()
    }

    #[test]
    fn test_quadratic_coefficients() {
        // 3*x**2 - 4 + a*x
        let a = Expr::symbol_named("a");
        let e = Expr::sum(vec![
            Expr::integer(3) * Expr::pow(x(), Expr::integer(2)),
            Expr::integer(-4),
            a.clone() * x(),
        ]);
        let p = UniPoly::from_expr(&e, &var()).unwrap();
        assert_eq!(p.degree(), 2);
        assert_eq!(p.coeff(0), Expr::integer(-4));
        assert_eq!(p.coeff(1), a);
        assert_eq!(p.coeff(2), Expr::integer(3));
        assert!(p.rational_coeffs().is_none());
        assert_eq!(p.to_expr(), e);
    }

    #[test]
    fn test_zero_polynomial() {
        let p = UniPoly::from_expr(&Expr::zero(), &var()).unwrap();
        assert!(p.is_zero());
        assert_eq!(p.degree(), 0);
    }

    #[test]
    fn test_not_polynomial() {
        for e in [
            Expr::func("sin", vec![x()]),
            Expr::pow(x(), Expr::rational(1, 2)),
            Expr::pow(x(), Expr::integer(-1)),
        ] {
            assert!(matches!(
                UniPoly::from_expr(&e, &var()),
                Err(EngineError::NotPolynomial { .. })
            ));
        }
    }
}
