//! Canonical ordering for expressions.
//!
//! Provides the comparison functions used to sort the children of sums and
//! products (and solution sets) into canonical form.

use std::cmp::Ordering as CmpOrdering;
use std::sync::LazyLock;

use super::{Expr, ExprKind};

static EXPR_ONE: LazyLock<Expr> = LazyLock::new(Expr::one);

/// Compare expressions for canonical ordering.
///
/// Numbers always come first. Everything else is ordered by `(base, exponent)`,
/// where a non-power `e` counts as `e**1`, so `x < x**2 < y`. Two non-powers
/// fall back to a strict ranking by kind.
pub fn expr_cmp(a: &Expr, b: &Expr) -> CmpOrdering {
    use ExprKind::{Number, Pow};

    // (base, exponent); None means an implicit exponent of 1
    fn extract_key(e: &Expr) -> (&Expr, Option<&Expr>) {
        match &e.kind {
            Pow(b, exp) => (b.as_ref(), Some(exp.as_ref())),
            _ => (e, None),
        }
    }

    if let (Number(x), Number(y)) = (&a.kind, &b.kind) {
        return x.cmp_canonical(y);
    }
    if matches!(a.kind, Number(_)) {
        return CmpOrdering::Less;
    }
    if matches!(b.kind, Number(_)) {
        return CmpOrdering::Greater;
    }

    let (base_a, exp_a) = extract_key(a);
    let (base_b, exp_b) = extract_key(b);

    // Comparing x vs x would recurse forever
    if exp_a.is_none() && exp_b.is_none() {
        return expr_cmp_type_strict(a, b);
    }

    let base_cmp = expr_cmp(base_a, base_b);
    if base_cmp != CmpOrdering::Equal {
        return base_cmp;
    }

    let one: &Expr = &EXPR_ONE;
    expr_cmp(exp_a.unwrap_or(one), exp_b.unwrap_or(one))
}

/// Compare terms of a sum: numeric coefficients are ignored first, so
/// `x < 3*x**2 < y`, and only break ties (`x < 2*x`).
pub fn term_cmp(a: &Expr, b: &Expr) -> CmpOrdering {
    let (coeff_a, rest_a) = a.split_coefficient();
    let (coeff_b, rest_b) = b.split_coefficient();
    expr_cmp(&rest_a, &rest_b).then_with(|| coeff_a.cmp_canonical(&coeff_b))
}

fn kind_rank(e: &Expr) -> u8 {
    match &e.kind {
        ExprKind::Number(_) => 0,
        ExprKind::Constant(_) => 1,
        ExprKind::Symbol(_) => 2,
        ExprKind::FunctionCall { .. } => 3,
        ExprKind::Derivative { .. } => 4,
        ExprKind::Pow(_, _) => 5,
        ExprKind::Sum(_) => 6,
        ExprKind::Product(_) => 7,
        ExprKind::Equality(_, _) => 8,
    }
}

fn cmp_slices(a: &[std::sync::Arc<Expr>], b: &[std::sync::Arc<Expr>]) -> CmpOrdering {
    for (x, y) in a.iter().zip(b.iter()) {
        let c = expr_cmp(x, y);
        if c != CmpOrdering::Equal {
            return c;
        }
    }
    a.len().cmp(&b.len())
}

/// Fallback for two non-powers.
/// Order: Number < Constant < Symbol < `FunctionCall` < Derivative < Sum < Product < Equality
fn expr_cmp_type_strict(a: &Expr, b: &Expr) -> CmpOrdering {
    use ExprKind::{Constant, Derivative, Equality, FunctionCall, Number, Product, Sum, Symbol};

    match (&a.kind, &b.kind) {
        (Number(x), Number(y)) => x.cmp_canonical(y),
        (Constant(x), Constant(y)) => x.cmp(y),
        (Symbol(x), Symbol(y)) => x.cmp(y),
        (FunctionCall { name: n1, args: a1 }, FunctionCall { name: n2, args: a2 }) => {
            n1.cmp(n2).then_with(|| cmp_slices(a1, a2))
        }
        (
            Derivative {
                inner: i1,
                vars: v1,
            },
            Derivative {
                inner: i2,
                vars: v2,
            },
        ) => expr_cmp(i1, i2).then_with(|| v1.cmp(v2)),
        (Sum(t1), Sum(t2)) | (Product(t1), Product(t2)) => cmp_slices(t1, t2),
        (Equality(l1, r1), Equality(l2, r2)) => {
            expr_cmp(l1, l2).then_with(|| expr_cmp(r1, r2))
        }
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Expr {
        Expr::symbol_named(name)
    }

    #[test]
    fn test_numbers_first() {
        assert_eq!(expr_cmp(&Expr::integer(100), &sym("a")), CmpOrdering::Less);
        assert_eq!(
            expr_cmp(&Expr::integer(1), &Expr::integer(2)),
            CmpOrdering::Less
        );
    }

    #[test]
    fn test_powers_sort_by_base_then_exponent() {
        let x2 = Expr::pow(sym("x"), Expr::integer(2));
        let x3 = Expr::pow(sym("x"), Expr::integer(3));
        assert_eq!(expr_cmp(&sym("x"), &x2), CmpOrdering::Less);
        assert_eq!(expr_cmp(&x2, &x3), CmpOrdering::Less);
        assert_eq!(expr_cmp(&x3, &sym("y")), CmpOrdering::Less);
    }

    #[test]
    fn test_term_cmp_ignores_coefficient_first() {
        let three_x2 = Expr::product(vec![
            Expr::integer(3),
            Expr::pow(sym("x"), Expr::integer(2)),
        ]);
        let two_x = Expr::product(vec![Expr::integer(2), sym("x")]);
        assert_eq!(term_cmp(&two_x, &three_x2), CmpOrdering::Less);
        assert_eq!(term_cmp(&sym("x"), &two_x), CmpOrdering::Less);
    }

    #[test]
    fn test_kind_ranking() {
        let f = Expr::func("sin", vec![sym("x")]);
        assert_eq!(
            expr_cmp(&Expr::constant(crate::Constant::Pi), &sym("a")),
            CmpOrdering::Less
        );
        assert_eq!(expr_cmp(&sym("z"), &f), CmpOrdering::Less);
    }
}
