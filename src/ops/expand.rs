//! Algebraic expansion
//!
//! Products are distributed over sums and positive integer powers of sums are
//! multiplied out. Expansion recurses into function arguments, derivative
//! bodies and both sides of an equation.

use log::trace;

use crate::error::EngineError;
use crate::{Expr, ExprKind};

/// Pairwise products allowed per unit of `max_terms` when raising a sum to a power
const POWER_WORK_FACTOR: usize = 64;

/// Expand `expr`, failing once a sum would exceed `max_terms` terms
pub fn expand(expr: &Expr, max_terms: usize) -> Result<Expr, EngineError> {
    let result = expand_rec(expr, max_terms)?;
    trace!("expand: {} nodes -> {} nodes", expr.node_count(), result.node_count());
    Ok(result)
}

fn expand_rec(expr: &Expr, max_terms: usize) -> Result<Expr, EngineError> {
    match expr.kind() {
        ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => Ok(expr.clone()),

        ExprKind::Sum(items) => {
            let terms = items
                .iter()
                .map(|t| expand_rec(t, max_terms))
                .collect::<Result<Vec<_>, _>>()?;
            bounded(Expr::sum(terms), max_terms)
        }

        ExprKind::Product(items) => {
            let mut acc = vec![Expr::one()];
            for factor in items.iter() {
                let factor = expand_rec(factor, max_terms)?;
                acc = multiply_terms(&acc, &factor.terms(), max_terms)?;
            }
            bounded(Expr::sum(acc), max_terms)
        }

        ExprKind::Pow(base, exp) => {
            let base = expand_rec(base, max_terms)?;
            let exp = expand_rec(exp, max_terms)?;

            let (Some(n), ExprKind::Sum(_)) = (exp.positive_integer(), base.kind()) else {
                return Ok(Expr::pow(base, exp));
            };
            // A sum of k >= 2 terms to the n-th power has at least n + 1 terms
            if n as usize >= max_terms {
                return Err(EngineError::TooLarge { limit: max_terms });
            }

            let base_terms = base.terms();
            let n = n as usize;
            let k = base_terms.len();
            // n rounds, each at most (terms so far) x k pairwise products
            let work = n
                .saturating_mul(power_terms(n, k, max_terms))
                .saturating_mul(k);
            if work > max_terms.saturating_mul(POWER_WORK_FACTOR) {
                return Err(EngineError::TooLarge { limit: max_terms });
            }

            let mut acc = base_terms.clone();
            for _ in 1..n {
                acc = multiply_terms(&acc, &base_terms, max_terms)?;
            }
            bounded(Expr::sum(acc), max_terms)
        }

        ExprKind::FunctionCall { name, args } => {
            let args = args
                .iter()
                .map(|a| expand_rec(a, max_terms))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::func(name, args))
        }

        ExprKind::Derivative { inner, vars } => {
            Ok(Expr::derivative(expand_rec(inner, max_terms)?, vars.clone()))
        }

        ExprKind::Equality(lhs, rhs) => Ok(Expr::equality(
            expand_rec(lhs, max_terms)?,
            expand_rec(rhs, max_terms)?,
        )),
    }
}

/// Upper bound on the terms of a `k`-term sum raised to the `n`-th power,
/// `C(n + k - 1, k - 1)`, saturating at `cap`
fn power_terms(n: usize, k: usize, cap: usize) -> usize {
    let mut count: u128 = 1;
    for i in 1..k {
        // C(n + i, i) = C(n + i - 1, i - 1) * (n + i) / i, exact at every step
        count = count * (n + i) as u128 / i as u128;
        if count > cap as u128 {
            return cap;
        }
    }
    count as usize
}

/// All pairwise products of two term lists, with like terms collected
fn multiply_terms(a: &[Expr], b: &[Expr], max_terms: usize) -> Result<Vec<Expr>, EngineError> {
    // Pairwise products before collection; bounds the work per step
    if a.len().saturating_mul(b.len()) > max_terms.saturating_mul(4) {
        return Err(EngineError::TooLarge { limit: max_terms });
    }

    let mut products = Vec::with_capacity(a.len() * b.len());
    for s in a {
        for t in b {
            products.push(Expr::product(vec![s.clone(), t.clone()]));
        }
    }
    let collected = Expr::sum(products).terms();
    if collected.len() > max_terms {
        return Err(EngineError::TooLarge { limit: max_terms });
    }
    Ok(collected)
}

fn bounded(expr: Expr, max_terms: usize) -> Result<Expr, EngineError> {
    match expr.kind() {
        ExprKind::Sum(items) if items.len() > max_terms => {
            Err(EngineError::TooLarge { limit: max_terms })
        }
        _ => Ok(expr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn expanded(input: &str) -> String {
        expand(&parse(input).unwrap(), 10_000).unwrap().to_string()
    }

    #[test]
    fn test_square_of_binomial() {
        assert_eq!(expanded("(x + 1)**2"), "1 + 2*x + x**2");
        assert_eq!(expanded("(x - 2)*(x + 2)"), "-4 + x**2");
    }

    #[test]
    fn test_distributes_products() {
        assert_eq!(expanded("x*(y + 1)"), "x + x*y");
        assert_eq!(expanded("(a + b)*(c + d)"), "a*c + a*d + b*c + b*d");
    }

    #[test]
    fn test_cubes_cancel() {
        assert_eq!(expanded("(x + y)**3 - x**3 - y**3"), "3*x*y**2 + 3*x**2*y");
    }

    #[test]
    fn test_recurses_into_functions() {
        assert_eq!(expanded("sin((x + 1)**2)"), "sin(1 + 2*x + x**2)");
    }

    #[test]
    fn test_negative_power_kept() {
        assert_eq!(expanded("1/(x + 1)"), "1/(1 + x)");
    }

    #[test]
    fn test_too_large() {
        let e = parse("(x + y + z)**30").unwrap();
        assert_eq!(
            expand(&e, 100),
            Err(EngineError::TooLarge { limit: 100 })
        );
        let e = parse("(x + 1)**500").unwrap();
        assert_eq!(
            expand(&e, 100),
            Err(EngineError::TooLarge { limit: 100 })
        );
    }

    #[test]
    fn test_long_binomial_power_rejected_up_front() {
        // Only 3001 terms, but thousands of rounds of growing products
        let e = parse("(x + 1)**3000").unwrap();
        assert_eq!(
            expand(&e, 10_000),
            Err(EngineError::TooLarge { limit: 10_000 })
        );
        assert!(expand(&parse("(x + 1)**100").unwrap(), 10_000).is_ok());
    }

    #[test]
    fn test_power_terms_bound() {
        assert_eq!(power_terms(5, 2, 1_000), 6);
        assert_eq!(power_terms(4, 3, 1_000), 15);
        assert_eq!(power_terms(3000, 1, 1_000), 1);
        assert_eq!(power_terms(30, 3, 100), 100);
    }
}
