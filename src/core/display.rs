//! Canonical text form of expressions.
//!
//! The rendering is the universal output format of the crate and is chosen so
//! that it parses back to an equal expression:
//! - `1 + 2*x + x**2`
//! - `3*x/2`, `sqrt(2)/2`, `1/(x*y)`
//! - `exp(x)` for `E**x`, `sqrt(x)` for `x**(1/2)`
//!
//! # Display Behavior Notes for N-ary AST
//! - Sum displays terms with +/- signs based on leading coefficients
//! - Product splits into numerator and denominator; factors with a negative
//!   numeric exponent and the denominator of a rational coefficient go below
//!   the bar
//! - Equalities display as `lhs = rhs`

use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::Signed;

use crate::core::expr::{Constant, Expr, ExprKind};
use crate::core::number::Number;

/// If the leading coefficient is negative, the same term with its sign flipped
fn extract_negative(expr: &Expr) -> Option<Expr> {
    match &expr.kind {
        ExprKind::Number(n) if n.is_negative() => Some(Expr::number(n.neg())),
        ExprKind::Product(factors) => {
            let n = factors.first()?.as_number()?;
            if !n.is_negative() {
                return None;
            }
            let abs = n.neg();
            let rest = &factors[1..];
            if abs.is_one() && !abs.is_float() {
                if rest.len() == 1 {
                    return Some((*rest[0]).clone());
                }
                return Some(Expr::raw(ExprKind::Product(rest.to_vec())));
            }
            let mut new_factors: Vec<Arc<Expr>> = Vec::with_capacity(factors.len());
            new_factors.push(Arc::new(Expr::number(abs)));
            new_factors.extend_from_slice(rest);
            Some(Expr::raw(ExprKind::Product(new_factors)))
        }
        _ => None,
    }
}

/// Exponent is a negative number, so the power belongs in a denominator
fn negative_exponent(e: &Expr) -> Option<Number> {
    e.as_number().filter(|n| n.is_negative()).map(Number::neg)
}

fn needs_parens_as_factor(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Sum(_) | ExprKind::Equality(_, _))
}

/// Powers bind tighter than everything else except atoms and calls
fn needs_parens_as_base(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Number(n) => n.is_negative() || !(n.is_integer() || n.is_float()),
        ExprKind::Symbol(_) | ExprKind::Constant(_) | ExprKind::FunctionCall { .. } => false,
        ExprKind::Derivative { .. } => false,
        _ => true,
    }
}

fn needs_parens_as_exponent(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Number(n) => n.is_negative() || !(n.is_integer() || n.is_float()),
        ExprKind::Symbol(_) | ExprKind::Constant(_) | ExprKind::FunctionCall { .. } => false,
        _ => true,
    }
}

fn format_wrapped(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn format_sum_expr(f: &mut fmt::Formatter<'_>, terms: &[Arc<Expr>]) -> fmt::Result {
    if terms.is_empty() {
        return write!(f, "0");
    }
    for (i, term) in terms.iter().enumerate() {
        match extract_negative(term) {
            Some(positive) => {
                f.write_str(if i == 0 { "-" } else { " - " })?;
                format_wrapped(f, &positive, needs_parens_as_factor(&positive))?;
            }
            None => {
                if i > 0 {
                    f.write_str(" + ")?;
                }
                format_wrapped(f, term, needs_parens_as_factor(term))?;
            }
        }
    }
    Ok(())
}

fn format_factor_list(f: &mut fmt::Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    for (i, fac) in factors.iter().enumerate() {
        if i > 0 {
            f.write_str("*")?;
        }
        format_wrapped(f, fac, needs_parens_as_factor(fac))?;
    }
    Ok(())
}

/// `[-]numer/denom`, with `1` standing in for an empty numerator
fn format_fraction(
    f: &mut fmt::Formatter<'_>,
    negative: bool,
    numer: &[Expr],
    denom: &[Expr],
) -> fmt::Result {
    if negative {
        f.write_str("-")?;
    }
    if numer.is_empty() {
        f.write_str("1")?;
    } else {
        format_factor_list(f, numer)?;
    }
    match denom {
        [] => Ok(()),
        [single] if needs_parens_as_factor(single) => write!(f, "/({single})"),
        [single] if !matches!(single.kind, ExprKind::Product(_)) => write!(f, "/{single}"),
        _ => {
            f.write_str("/(")?;
            format_factor_list(f, denom)?;
            f.write_str(")")
        }
    }
}

fn format_product_expr(f: &mut fmt::Formatter<'_>, factors: &[Arc<Expr>]) -> fmt::Result {
    if factors.is_empty() {
        return write!(f, "1");
    }

    let mut negative = false;
    let mut numer: Vec<Expr> = Vec::with_capacity(factors.len());
    let mut denom: Vec<Expr> = Vec::new();

    for fac in factors {
        match &fac.kind {
            ExprKind::Number(Number::Rational(r)) => {
                negative = r.is_negative();
                let p = r.numer().abs();
                if p != BigInt::from(1) {
                    numer.push(Expr::number(Number::from_bigint(p)));
                }
                if !r.is_integer() {
                    denom.push(Expr::number(Number::from_bigint(r.denom().clone())));
                }
            }
            ExprKind::Number(n) => {
                negative = n.is_negative();
                numer.push(Expr::number(n.abs()));
            }
            ExprKind::Pow(b, e) => match negative_exponent(e) {
                Some(pos) => denom.push(Expr::pow((**b).clone(), Expr::number(pos))),
                None => numer.push((**fac).clone()),
            },
            _ => numer.push((**fac).clone()),
        }
    }

    format_fraction(f, negative, &numer, &denom)
}

fn format_pow_expr(f: &mut fmt::Formatter<'_>, base: &Expr, exp: &Expr) -> fmt::Result {
    if let Some(pos) = negative_exponent(exp) {
        let denom = Expr::pow(base.clone(), Expr::number(pos));
        return format_fraction(f, false, &[], &[denom]);
    }

    if base.is_constant(Constant::E) {
        return write!(f, "exp({exp})");
    }

    if let Some(Number::Rational(r)) = exp.as_number()
        && *r.numer() == BigInt::from(1)
        && *r.denom() == BigInt::from(2)
    {
        return write!(f, "sqrt({base})");
    }

    format_wrapped(f, base, needs_parens_as_base(base))?;
    f.write_str("**")?;
    format_wrapped(f, exp, needs_parens_as_exponent(exp))
}

fn format_args(f: &mut fmt::Formatter<'_>, args: &[Arc<Expr>]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write!(f, "{n}"),
            ExprKind::Symbol(s) => write!(f, "{s}"),
            ExprKind::Constant(c) => f.write_str(c.name()),
            ExprKind::Sum(terms) => format_sum_expr(f, terms),
            ExprKind::Product(factors) => format_product_expr(f, factors),
            ExprKind::Pow(b, e) => format_pow_expr(f, b, e),
            ExprKind::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                format_args(f, args)?;
                f.write_str(")")
            }
            ExprKind::Derivative { inner, vars } => {
                write!(f, "Derivative({inner}")?;
                for v in vars {
                    write!(f, ", {v}")?;
                }
                f.write_str(")")
            }
            ExprKind::Equality(l, r) => write!(f, "{l} = {r}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol::Symbol;

    fn x() -> Expr {
        Expr::symbol_named("x")
    }

    fn y() -> Expr {
        Expr::symbol_named("y")
    }

    #[test]
    fn test_display_number() {
        assert_eq!(Expr::integer(5).to_string(), "5");
        assert_eq!(Expr::rational(-1, 2).to_string(), "-1/2");
        assert_eq!(Expr::float(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_display_sum() {
        let e = Expr::sum(vec![
            Expr::pow(x(), Expr::integer(2)),
            Expr::integer(2) * x(),
            Expr::integer(1),
        ]);
        assert_eq!(e.to_string(), "1 + 2*x + x**2");
    }

    #[test]
    fn test_display_subtraction() {
        let e = Expr::pow(x(), Expr::integer(2)) - Expr::integer(4);
        assert_eq!(e.to_string(), "-4 + x**2");
        assert_eq!((x() - y()).to_string(), "x - y");
    }

    #[test]
    fn test_display_negation() {
        assert_eq!((-x()).to_string(), "-x");
        assert_eq!((Expr::integer(-3) * x() * y()).to_string(), "-3*x*y");
    }

    #[test]
    fn test_display_fractions() {
        assert_eq!((x() / Expr::integer(2)).to_string(), "x/2");
        assert_eq!(
            (Expr::integer(3) * x() / Expr::integer(2)).to_string(),
            "3*x/2"
        );
        assert_eq!((x() / y()).to_string(), "x/y");
        assert_eq!((Expr::integer(1) / (x() * y())).to_string(), "1/(x*y)");
        assert_eq!(Expr::sqrt(Expr::rational(1, 2)).to_string(), "sqrt(2)/2");
        assert_eq!(
            (Expr::integer(1) / (x() + Expr::integer(1))).to_string(),
            "1/(1 + x)"
        );
    }

    #[test]
    fn test_display_powers() {
        assert_eq!(Expr::sqrt(x()).to_string(), "sqrt(x)");
        assert_eq!(
            Expr::pow(Expr::constant(Constant::E), x()).to_string(),
            "exp(x)"
        );
        assert_eq!(Expr::pow(x(), Expr::rational(1, 3)).to_string(), "x**(1/3)");
        assert_eq!(
            Expr::pow(x() + Expr::integer(1), Expr::integer(2)).to_string(),
            "(1 + x)**2"
        );
        assert_eq!(Expr::pow(x(), Expr::integer(-2)).to_string(), "1/x**2");
    }

    #[test]
    fn test_display_product_with_sum() {
        let e = x() * (y() + Expr::integer(1));
        assert_eq!(e.to_string(), "x*(1 + y)");
    }

    #[test]
    fn test_display_calls_and_equations() {
        let f = Expr::func("f", vec![x(), y()]);
        assert_eq!(f.to_string(), "f(x, y)");
        let d = Expr::derivative(
            Expr::func("f", vec![x()]),
            vec![Symbol::new("x").unwrap()],
        );
        assert_eq!(d.to_string(), "Derivative(f(x), x)");
        assert_eq!(Expr::equality(x(), Expr::integer(2)).to_string(), "x = 2");
    }
}
