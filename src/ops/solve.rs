//! Univariate polynomial solving
//!
//! Linear and quadratic equations are solved in closed form. Higher degrees
//! with rational coefficients first have their rational roots peeled off; a
//! remainder of degree three or more is reported as a [`SolutionSet::ConditionSet`].

use std::fmt;

use log::trace;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::core::{Number, Symbol, UniPoly, term_cmp};
use crate::error::EngineError;
use crate::ops::expand::expand;
use crate::{Expr, ExprKind};

/// Largest |constant| or |leading| coefficient searched for rational roots
const MAX_ROOT_SEARCH: u64 = 1_000_000_000_000;
/// Largest number of `p/q` candidates tried
const MAX_CANDIDATES: usize = 10_000;

/// Solutions of `p(x) = 0` over the complex numbers
#[derive(Debug, Clone, PartialEq)]
pub enum SolutionSet {
    /// Distinct roots in canonical order
    Finite(Vec<Expr>),
    /// Every value is a solution (`p` is identically zero)
    Complexes,
    /// Roots of a polynomial no closed form was found for
    ConditionSet { var: Symbol, poly: Expr },
    /// Roots found so far together with an unsolved remainder
    Union(Vec<Expr>, Box<SolutionSet>),
}

impl fmt::Display for SolutionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionSet::Finite(roots) if roots.is_empty() => write!(f, "EmptySet"),
            SolutionSet::Finite(roots) => write!(f, "{{{}}}", join(roots)),
            SolutionSet::Complexes => write!(f, "Complexes"),
            SolutionSet::ConditionSet { var, poly } => {
                write!(f, "ConditionSet({var}, {poly} = 0)")
            }
            SolutionSet::Union(roots, rest) => write!(f, "Union({{{}}}, {rest})", join(roots)),
        }
    }
}

fn join(roots: &[Expr]) -> String {
    roots
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Solve `expr = 0` (or `lhs = rhs`) for `var`.
///
/// # Errors
/// [`EngineError::NotPolynomial`] when `var` appears other than in
/// non-negative integer powers, [`EngineError::TooLarge`] when expansion or the
/// degree exceeds the limits.
pub fn solve_poly(expr: &Expr, var: &Symbol, max_terms: usize) -> Result<SolutionSet, EngineError> {
    let target = match expr.kind() {
        ExprKind::Equality(lhs, rhs) => Expr::sub_expr((**lhs).clone(), (**rhs).clone()),
        _ => expr.clone(),
    };
    let expanded = expand(&target, max_terms)?;
    let poly = UniPoly::from_expr(&expanded, var)?;
    if poly.is_zero() {
        return Ok(SolutionSet::Complexes);
    }
    trace!("solve: degree {} in {}", poly.degree(), var);

    let mut coeffs = poly.coeffs().to_vec();
    let mut roots = Vec::new();

    // x**k * q(x): zero is a root
    let shift = coeffs.iter().take_while(|c| c.is_zero()).count();
    if shift > 0 {
        roots.push(Expr::zero());
        coeffs.drain(..shift);
    }

    let unsolved = solve_coeffs(coeffs, var, &mut roots, max_terms)?;

    roots.sort_by(term_cmp);
    roots.dedup();

    Ok(match unsolved {
        None => SolutionSet::Finite(roots),
        Some(poly) => {
            let rest = SolutionSet::ConditionSet {
                var: var.clone(),
                poly,
            };
            if roots.is_empty() {
                rest
            } else {
                SolutionSet::Union(roots, Box::new(rest))
            }
        }
    })
}

/// Push the roots of `sum(coeffs[i] * var**i)` that have a closed form and
/// return whatever polynomial is left unsolved
fn solve_coeffs(
    coeffs: Vec<Expr>,
    var: &Symbol,
    roots: &mut Vec<Expr>,
    max_terms: usize,
) -> Result<Option<Expr>, EngineError> {
    match coeffs.as_slice() {
        [] | [_] => Ok(None),
        [c0, c1] => {
            let root = Expr::div_expr(c0.clone().negate(), c1.clone());
            roots.push(expand(&root, max_terms)?);
            Ok(None)
        }
        [c, b, a] => {
            roots.extend(quadratic_roots(a, b, c, max_terms)?);
            Ok(None)
        }
        _ => {
            let Some(rational) = rational_coeffs(&coeffs) else {
                return Ok(Some(poly_expr(&coeffs, var)));
            };
            let (found, remaining) = peel_rational_roots(rational);
            trace!(
                "solve: {} rational root(s), remaining degree {}",
                found.len(),
                remaining.len().saturating_sub(1)
            );
            roots.extend(found.into_iter().map(|r| Expr::number(Number::Rational(r))));

            let remaining: Vec<Expr> = remaining
                .into_iter()
                .map(|r| Expr::number(Number::Rational(r)))
                .collect();
            if remaining.len() <= 3 {
                solve_coeffs(remaining, var, roots, max_terms)
            } else {
                Ok(Some(poly_expr(&remaining, var)))
            }
        }
    }
}

/// `(-b ± sqrt(b**2 - 4*a*c)) / (2*a)`
fn quadratic_roots(a: &Expr, b: &Expr, c: &Expr, max_terms: usize) -> Result<Vec<Expr>, EngineError> {
    let disc = expand(
        &Expr::sub_expr(
            Expr::pow(b.clone(), Expr::integer(2)),
            Expr::product(vec![Expr::integer(4), a.clone(), c.clone()]),
        ),
        max_terms,
    )?;
    let denom = Expr::product(vec![Expr::integer(2), a.clone()]);
    let neg_b = b.clone().negate();

    if disc.is_zero() {
        return Ok(vec![expand(&Expr::div_expr(neg_b, denom), max_terms)?]);
    }

    let root = Expr::sqrt(disc);
    let minus = Expr::div_expr(Expr::sub_expr(neg_b.clone(), root.clone()), denom.clone());
    let plus = Expr::div_expr(Expr::sum(vec![neg_b, root]), denom);
    Ok(vec![expand(&minus, max_terms)?, expand(&plus, max_terms)?])
}

fn rational_coeffs(coeffs: &[Expr]) -> Option<Vec<BigRational>> {
    coeffs
        .iter()
        .map(|c| c.as_number().and_then(Number::as_rational).cloned())
        .collect()
}

fn poly_expr(coeffs: &[Expr], var: &Symbol) -> Expr {
    let x = Expr::symbol(var.clone());
    Expr::sum(
        coeffs
            .iter()
            .enumerate()
            .map(|(i, c)| Expr::product(vec![c.clone(), Expr::pow(x.clone(), Expr::integer(i as i64))]))
            .collect(),
    )
}

/// Divide out every rational root. Coefficients are lowest degree first and
/// the constant term is nonzero.
fn peel_rational_roots(mut coeffs: Vec<BigRational>) -> (Vec<BigRational>, Vec<BigRational>) {
    let mut found = Vec::new();
    let integer = integer_coeffs(&coeffs);
    let (Some(first), Some(last)) = (integer.first(), integer.last()) else {
        return (found, coeffs);
    };

    let (Some(p_divs), Some(q_divs)) = (divisors(first), divisors(last)) else {
        return (found, coeffs);
    };
    if p_divs.len().saturating_mul(q_divs.len()) > MAX_CANDIDATES {
        return (found, coeffs);
    }

    for p in &p_divs {
        for q in &q_divs {
            for sign in [-1i64, 1] {
                let candidate = BigRational::new(BigInt::from(*p) * sign, BigInt::from(*q));
                // Repeat for multiplicity
                while coeffs.len() > 1 {
                    match divide_root(&coeffs, &candidate) {
                        Some(quotient) => {
                            coeffs = quotient;
                            if !found.contains(&candidate) {
                                found.push(candidate.clone());
                            }
                        }
                        None => break,
                    }
                }
            }
        }
    }
    (found, coeffs)
}

/// Scale by the common denominator so every coefficient is an integer
fn integer_coeffs(coeffs: &[BigRational]) -> Vec<BigInt> {
    let lcm = coeffs
        .iter()
        .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
    coeffs
        .iter()
        .map(|c| (c * BigRational::from_integer(lcm.clone())).to_integer())
        .collect()
}

/// Positive divisors of `|n|`, or `None` for zero or values too large to factor
fn divisors(n: &BigInt) -> Option<Vec<u64>> {
    if n.is_zero() {
        return None;
    }
    let n = n.abs().to_u64().filter(|n| *n <= MAX_ROOT_SEARCH)?;
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1u64;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d != n / d {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    Some(small)
}

/// Quotient of `p(x) / (x - r)` when `r` is a root
fn divide_root(coeffs: &[BigRational], r: &BigRational) -> Option<Vec<BigRational>> {
    let n = coeffs.len() - 1;
    let mut quotient = vec![BigRational::zero(); n];
    let mut carry = BigRational::zero();
    for k in (1..=n).rev() {
        carry = &coeffs[k] + r * &carry;
        quotient[k - 1] = carry.clone();
    }
    let remainder = &coeffs[0] + r * &carry;
    remainder.is_zero().then_some(quotient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn solve(input: &str) -> String {
        let x = Symbol::new("x").unwrap();
        solve_poly(&parse(input).unwrap(), &x, 10_000)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_quadratic() {
        assert_eq!(solve("x**2 - 4"), "{-2, 2}");
        assert_eq!(solve("x**2 + 1"), "{-I, I}");
        assert_eq!(solve("x**2 - 2"), "{-sqrt(2), sqrt(2)}");
        assert_eq!(solve("x**2 - 2*x + 1"), "{1}");
    }

    #[test]
    fn test_linear_and_degenerate() {
        assert_eq!(solve("2*x - 3"), "{3/2}");
        assert_eq!(solve("x + 1 = x + 2"), "EmptySet");
        assert_eq!(solve("x - x"), "Complexes");
        assert_eq!(solve("x**3"), "{0}");
    }

    #[test]
    fn test_symbolic_coefficients() {
        assert_eq!(solve("a*x - b"), "{b/a}");
    }

    #[test]
    fn test_rational_roots_of_cubic() {
        assert_eq!(solve("x**3 - 6*x**2 + 11*x - 6"), "{1, 2, 3}");
        assert_eq!(solve("2*x**3 - x**2 - 2*x + 1"), "{-1, 1/2, 1}");
    }

    #[test]
    fn test_unsolved_remainder() {
        assert_eq!(solve("x**3 - 2"), "ConditionSet(x, -2 + x**3 = 0)");
        assert_eq!(
            solve("x**4 - x**3 - 2*x + 2"),
            "Union({1}, ConditionSet(x, -2 + x**3 = 0))"
        );
    }

    #[test]
    fn test_not_polynomial() {
        let x = Symbol::new("x").unwrap();
        assert!(matches!(
            solve_poly(&parse("sin(x)").unwrap(), &x, 10_000),
            Err(EngineError::NotPolynomial { .. })
        ));
    }

    #[test]
    fn test_divide_root() {
        // x**2 - 1 = (x - 1)(x + 1)
        let p = vec![
            BigRational::from_integer((-1).into()),
            BigRational::zero(),
            BigRational::one(),
        ];
        let q = divide_root(&p, &BigRational::one()).unwrap();
        assert_eq!(q, vec![BigRational::one(), BigRational::one()]);
        assert!(divide_root(&p, &BigRational::from_integer(2.into())).is_none());
    }
}
