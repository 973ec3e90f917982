//! Expression constructors.
//!
//! Every public constructor returns canonical form. `sum` and `product` are the
//! workhorses: they flatten, fold numbers, merge like terms / like bases and sort.

use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive};
use rustc_hash::FxHashMap;

use super::{Constant, Expr, ExprKind, expr_cmp, term_cmp};
use crate::core::number::{MAX_EXACT_EXPONENT, Number, PowParts, exact_bits_limit};
use crate::core::symbol::Symbol;
use crate::functions::registry::Registry;

impl Expr {
    // -------------------------------------------------------------------------
    // Atoms
    // -------------------------------------------------------------------------

    pub fn number(n: Number) -> Self {
        Self::raw(ExprKind::Number(n))
    }

    pub fn integer(n: i64) -> Self {
        Self::number(Number::integer(n))
    }

    /// `numer/denom`; a zero denominator gives `zoo`
    pub fn rational(numer: i64, denom: i64) -> Self {
        Number::rational(numer, denom).map_or_else(Self::zoo, Self::number)
    }

    pub fn float(value: f64) -> Self {
        Self::number(Number::float(value))
    }

    pub fn zero() -> Self {
        Self::number(Number::zero())
    }

    pub fn one() -> Self {
        Self::number(Number::one())
    }

    pub fn symbol(s: Symbol) -> Self {
        Self::raw(ExprKind::Symbol(s))
    }

    /// Symbol from a name known to be a valid identifier. Untrusted names go
    /// through [`Symbol::new`] instead.
    pub fn symbol_named(name: &str) -> Self {
        Self::symbol(Symbol::from_identifier(name))
    }

    pub fn constant(c: Constant) -> Self {
        Self::raw(ExprKind::Constant(c))
    }

    pub fn zoo() -> Self {
        Self::constant(Constant::ComplexInfinity)
    }

    pub(crate) fn is_zoo(&self) -> bool {
        self.is_constant(Constant::ComplexInfinity)
    }

    fn is_exact_one(&self) -> bool {
        matches!(&self.kind, ExprKind::Number(Number::Rational(_))) && self.is_one()
    }

    // -------------------------------------------------------------------------
    // N-ary Sum constructor
    // -------------------------------------------------------------------------

    /// Canonical sum: flattens nested sums, folds numbers, combines like terms
    /// (`2*x + 3*x = 5*x`) and sorts the remaining terms.
    pub fn sum(terms: Vec<Expr>) -> Self {
        let mut flat: Vec<Expr> = Vec::with_capacity(terms.len());
        for t in terms {
            match t.kind {
                ExprKind::Sum(items) => flat.extend(items.into_iter().map(Self::unwrap_arc)),
                _ => flat.push(t),
            }
        }

        let mut constant = Number::zero();
        let mut order: Vec<Expr> = Vec::new();
        let mut coeffs: FxHashMap<Expr, Number> = FxHashMap::default();

        for term in flat {
            if term.is_zoo() {
                return Self::zoo();
            }
            if let ExprKind::Number(n) = &term.kind {
                constant = constant.add(n);
                continue;
            }
            let (c, rest) = term.split_coefficient();
            match coeffs.get_mut(&rest) {
                Some(existing) => *existing = existing.add(&c),
                None => {
                    coeffs.insert(rest.clone(), c);
                    order.push(rest);
                }
            }
        }

        let mut out: Vec<Expr> = Vec::with_capacity(order.len() + 1);
        for rest in order {
            let Some(c) = coeffs.remove(&rest) else {
                continue;
            };
            if c.is_zero() {
                continue;
            }
            out.push(Self::scaled(c, rest));
        }
        out.sort_by(term_cmp);

        if out.is_empty() {
            return Self::number(constant);
        }
        if !constant.is_zero() {
            out.insert(0, Self::number(constant));
        }
        if out.len() == 1 {
            return out.pop().unwrap_or_else(Self::zero);
        }
        Self::raw(ExprKind::Sum(out.into_iter().map(Arc::new).collect()))
    }

    /// `c * rest` for a canonical non-numeric `rest` that carries no coefficient
    fn scaled(c: Number, rest: Expr) -> Expr {
        if c.is_one() && !c.is_float() {
            return rest;
        }
        let mut factors = vec![Arc::new(Self::number(c))];
        match rest.kind {
            ExprKind::Product(items) => factors.extend(items),
            _ => factors.push(Arc::new(rest)),
        }
        Self::raw(ExprKind::Product(factors))
    }

    // -------------------------------------------------------------------------
    // N-ary Product constructor
    // -------------------------------------------------------------------------

    /// Canonical product: flattens nested products, folds the numeric
    /// coefficient, merges like bases by adding exponents (`x*x**2 = x**3`)
    /// and sorts the remaining factors.
    ///
    /// A numeric coefficient times a single sum is distributed: `2*(x + 1) = 2 + 2*x`.
    pub fn product(factors: Vec<Expr>) -> Self {
        let mut flat: Vec<Expr> = Vec::with_capacity(factors.len());
        for f in factors {
            match f.kind {
                ExprKind::Product(items) => flat.extend(items.into_iter().map(Self::unwrap_arc)),
                _ => flat.push(f),
            }
        }

        let mut coeff = Number::one();
        let mut has_zoo = false;
        let mut order: Vec<Expr> = Vec::new();
        let mut exponents: FxHashMap<Expr, Vec<Expr>> = FxHashMap::default();

        for f in flat {
            if f.is_zoo() {
                has_zoo = true;
                continue;
            }
            let (base, exp) = match f.kind {
                ExprKind::Number(n) => {
                    coeff = coeff.mul(&n);
                    continue;
                }
                ExprKind::Pow(b, e) => (Self::unwrap_arc(b), Self::unwrap_arc(e)),
                kind => (Self::raw(kind), Self::one()),
            };
            match exponents.get_mut(&base) {
                Some(list) => list.push(exp),
                None => {
                    exponents.insert(base.clone(), vec![exp]);
                    order.push(base);
                }
            }
        }

        if has_zoo {
            return Self::zoo();
        }
        if coeff.is_zero() {
            return Self::number(coeff);
        }

        let mut out: Vec<Expr> = Vec::with_capacity(order.len());
        let mut needs_merge = false;
        for base in order {
            let Some(exps) = exponents.remove(&base) else {
                continue;
            };
            let combined = if exps.len() == 1 {
                exps.into_iter().next().unwrap_or_else(Self::one)
            } else {
                Self::sum(exps)
            };
            let p = Self::pow(base, combined);
            if let ExprKind::Number(n) = &p.kind {
                coeff = coeff.mul(n);
                continue;
            }
            needs_merge |= matches!(p.kind, ExprKind::Product(_));
            out.push(p);
        }

        if needs_merge {
            // A power split into coefficient and factors (sqrt(8) = 2*sqrt(2), I**3 = -I)
            out.push(Self::number(coeff));
            return Self::product(out);
        }
        if out.iter().any(Expr::is_zoo) {
            return Self::zoo();
        }
        if coeff.is_zero() {
            return Self::number(coeff);
        }

        out.sort_by(expr_cmp);

        if out.is_empty() {
            return Self::number(coeff);
        }
        if out.len() == 1 {
            let single = out.pop().unwrap_or_else(Self::one);
            if coeff.is_one() && !coeff.is_float() {
                return single;
            }
            if let ExprKind::Sum(terms) = &single.kind {
                let c = Self::number(coeff);
                return Self::sum(
                    terms
                        .iter()
                        .map(|t| Self::product(vec![c.clone(), (**t).clone()]))
                        .collect(),
                );
            }
            out.push(single);
        }

        let mut items: Vec<Arc<Expr>> = Vec::with_capacity(out.len() + 1);
        if !(coeff.is_one() && !coeff.is_float()) {
            items.push(Arc::new(Self::number(coeff)));
        }
        items.extend(out.into_iter().map(Arc::new));
        Self::raw(ExprKind::Product(items))
    }

    // -------------------------------------------------------------------------
    // Power
    // -------------------------------------------------------------------------

    /// Canonical power `base**exp`.
    pub fn pow(base: Expr, exp: Expr) -> Self {
        if base.is_zoo() || exp.is_zoo() {
            return Self::zoo();
        }
        if let Some(e) = exp.as_number()
            && e.is_zero()
        {
            return if e.is_float() || base.as_number().is_some_and(Number::is_float) {
                Self::float(1.0)
            } else {
                Self::one()
            };
        }
        if exp.is_exact_one() {
            return base;
        }
        if base.is_exact_one() {
            return base;
        }

        if let (Some(b), Some(e)) = (base.as_number(), exp.as_number()) {
            return Self::pow_numbers(b, e).unwrap_or_else(|| Self::raw_pow(base, exp));
        }

        let int_exp = exp.as_number().and_then(Number::as_integer).cloned();
        if let Some(k) = &int_exp {
            if base.is_constant(Constant::I) {
                return match k.mod_floor(&BigInt::from(4)).to_u8().unwrap_or(0) {
                    0 => Self::one(),
                    1 => base,
                    2 => Self::integer(-1),
                    _ => Self::raw(ExprKind::Product(vec![
                        Arc::new(Self::integer(-1)),
                        Arc::new(base),
                    ])),
                };
            }
            match &base.kind {
                ExprKind::Pow(inner_base, inner_exp) => {
                    let e = Self::product(vec![(**inner_exp).clone(), exp]);
                    return Self::pow((**inner_base).clone(), e);
                }
                ExprKind::Product(factors) => {
                    return Self::product(
                        factors
                            .iter()
                            .map(|f| Self::pow((**f).clone(), exp.clone()))
                            .collect(),
                    );
                }
                _ => {}
            }
        }

        if base.is_constant(Constant::E)
            && let ExprKind::FunctionCall { name, args } = &exp.kind
            && &**name == "log"
            && args.len() == 1
        {
            return (*args[0]).clone();
        }

        Self::raw_pow(base, exp)
    }

    fn raw_pow(base: Expr, exp: Expr) -> Self {
        Self::raw(ExprKind::Pow(Arc::new(base), Arc::new(exp)))
    }

    /// Both operands numeric. `None` leaves the power unevaluated.
    fn pow_numbers(b: &Number, e: &Number) -> Option<Expr> {
        if b.is_zero() && !b.is_float() {
            return if e.is_negative() {
                Some(Self::zoo())
            } else {
                Some(Self::zero())
            };
        }

        // (-n)**(p/2) = I**p * n**(p/2)
        if let (Number::Rational(r), Number::Rational(q)) = (b, e)
            && r.is_negative()
            && *q.denom() == BigInt::from(2)
        {
            let i_part = Self::pow(
                Self::constant(Constant::I),
                Self::number(Number::from_bigint(q.numer().clone())),
            );
            let real_part = Self::pow(Self::number(b.abs()), Self::number(e.clone()));
            return Some(Self::product(vec![i_part, real_part]));
        }

        let PowParts { coeff, rest } = b.pow(e, MAX_EXACT_EXPONENT, exact_bits_limit())?;
        Some(match rest {
            None => Self::number(coeff),
            Some((rb, re)) => {
                let p = Self::raw_pow(Self::number(rb), Self::number(re));
                if coeff.is_one() {
                    p
                } else {
                    Self::raw(ExprKind::Product(vec![
                        Arc::new(Self::number(coeff)),
                        Arc::new(p),
                    ]))
                }
            }
        })
    }

    // -------------------------------------------------------------------------
    // Functions, derivatives, equations
    // -------------------------------------------------------------------------

    /// Function call by name. `sqrt` and `exp` become powers; built-ins get
    /// their special values and numeric evaluation on float arguments.
    pub fn func(name: &str, args: Vec<Expr>) -> Self {
        if args.len() == 1 {
            match name {
                "sqrt" => return Self::sqrt(args.into_iter().next().unwrap_or_else(Self::zero)),
                "exp" => {
                    return Self::pow(
                        Self::constant(Constant::E),
                        args.into_iter().next().unwrap_or_else(Self::zero),
                    );
                }
                _ => {}
            }
        }
        if args.iter().any(Expr::is_zoo) {
            return Self::zoo();
        }
        if let Some(def) = Registry::get(name)
            && def.validate_arity(args.len())
            && let Some(v) = def.simplify(&args)
        {
            return v;
        }
        Self::raw(ExprKind::FunctionCall {
            name: Arc::from(name),
            args: args.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn sqrt(arg: Expr) -> Self {
        Self::pow(arg, Self::rational(1, 2))
    }

    /// Unevaluated derivative; collapses to `0` when `inner` does not depend on any variable
    pub fn derivative(inner: Expr, vars: Vec<Symbol>) -> Self {
        if vars.is_empty() {
            return inner;
        }
        if !vars.iter().any(|v| inner.contains_symbol(v)) {
            return Self::zero();
        }
        Self::raw(ExprKind::Derivative {
            inner: Arc::new(inner),
            vars,
        })
    }

    pub fn equality(lhs: Expr, rhs: Expr) -> Self {
        Self::raw(ExprKind::Equality(Arc::new(lhs), Arc::new(rhs)))
    }

    // -------------------------------------------------------------------------
    // Arithmetic helpers
    // -------------------------------------------------------------------------

    pub fn negate(self) -> Self {
        Self::product(vec![Self::integer(-1), self])
    }

    pub fn sub_expr(a: Expr, b: Expr) -> Self {
        Self::sum(vec![a, b.negate()])
    }

    pub fn div_expr(a: Expr, b: Expr) -> Self {
        Self::product(vec![a, Self::pow(b, Self::integer(-1))])
    }

    pub fn recip(self) -> Self {
        Self::pow(self, Self::integer(-1))
    }

    /// Numeric coefficient is negative (`-3`, `-x`, `-2*x*y`)
    pub fn has_negative_coefficient(&self) -> bool {
        match &self.kind {
            ExprKind::Number(n) => n.is_negative(),
            ExprKind::Product(items) => items
                .first()
                .and_then(|f| f.as_number())
                .is_some_and(Number::is_negative),
            _ => false,
        }
    }

    /// `n` when this is an exact integer that fits in an `i64`
    pub fn as_small_integer(&self) -> Option<i64> {
        self.as_number().and_then(Number::to_i64)
    }

    /// Magnitude of an exact integer exponent, for expansion
    pub(crate) fn positive_integer(&self) -> Option<u32> {
        let n = self.as_number()?.as_integer()?;
        if n.is_positive() { n.to_u32() } else { None }
    }
}

impl std::ops::Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::sum(vec![self, rhs])
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::sub_expr(self, rhs)
    }
}

impl std::ops::Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::product(vec![self, rhs])
    }
}

impl std::ops::Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::div_expr(self, rhs)
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol_named("x")
    }

    fn y() -> Expr {
        Expr::symbol_named("y")
    }

    #[test]
    fn test_sum_folds_and_collects() {
        let e = Expr::sum(vec![x(), Expr::integer(2), x(), Expr::integer(-2)]);
        assert_eq!(e, Expr::product(vec![Expr::integer(2), x()]));

        let cancel = x() - x();
        assert!(cancel.is_zero());
    }

    #[test]
    fn test_sum_flattens() {
        let inner = x() + y();
        let outer = Expr::sum(vec![inner, Expr::integer(1)]);
        match outer.kind() {
            ExprKind::Sum(items) => assert_eq!(items.len(), 3),
            other => panic!("expected sum, got {other:?}"),
        }
    }

    #[test]
    fn test_product_merges_bases() {
        let e = x() * x() * Expr::pow(x(), Expr::integer(2));
        assert_eq!(e, Expr::pow(x(), Expr::integer(4)));

        let cancel = x() / x();
        assert!(cancel.is_one());
    }

    #[test]
    fn test_product_zero_and_zoo() {
        assert!((Expr::integer(0) * x()).is_zero());
        assert!(Expr::div_expr(Expr::integer(1), Expr::integer(0)).is_zoo());
    }

    #[test]
    fn test_coefficient_distributes_over_single_sum() {
        let e = Expr::integer(2) * (x() + Expr::integer(1));
        assert_eq!(
            e,
            Expr::sum(vec![
                Expr::integer(2),
                Expr::product(vec![Expr::integer(2), x()])
            ])
        );
    }

    #[test]
    fn test_numeric_powers() {
        assert_eq!(Expr::pow(Expr::integer(2), Expr::integer(10)), Expr::integer(1024));
        assert_eq!(
            Expr::pow(Expr::integer(2), Expr::integer(-1)),
            Expr::rational(1, 2)
        );
        // sqrt(8) = 2*sqrt(2)
        let s = Expr::sqrt(Expr::integer(8));
        assert_eq!(
            s,
            Expr::product(vec![Expr::integer(2), Expr::sqrt(Expr::integer(2))])
        );
        // sqrt(2)*sqrt(2) = 2
        assert_eq!(
            Expr::sqrt(Expr::integer(2)) * Expr::sqrt(Expr::integer(2)),
            Expr::integer(2)
        );
    }

    #[test]
    fn test_imaginary_unit() {
        let i = Expr::constant(Constant::I);
        assert_eq!(i.clone() * i.clone(), Expr::integer(-1));
        assert_eq!(Expr::pow(i.clone(), Expr::integer(4)), Expr::one());
        assert_eq!(
            Expr::sqrt(Expr::integer(-4)),
            Expr::product(vec![Expr::integer(2), i])
        );
    }

    #[test]
    fn test_power_of_power_and_product() {
        let e = Expr::pow(Expr::pow(x(), Expr::integer(2)), Expr::integer(3));
        assert_eq!(e, Expr::pow(x(), Expr::integer(6)));

        let e = Expr::pow(x() * y(), Expr::integer(2));
        assert_eq!(
            e,
            Expr::pow(x(), Expr::integer(2)) * Expr::pow(y(), Expr::integer(2))
        );
    }

    #[test]
    fn test_exp_of_log() {
        let e = Expr::func("exp", vec![Expr::func("log", vec![x()])]);
        assert_eq!(e, x());
    }

    #[test]
    fn test_derivative_of_constant_is_zero() {
        let s = Symbol::new("x").unwrap();
        assert!(Expr::derivative(y(), vec![s.clone()]).is_zero());
        assert!(matches!(
            Expr::derivative(Expr::func("f", vec![x()]), vec![s]).kind(),
            ExprKind::Derivative { .. }
        ));
    }
}
