//! Function definitions for the registry
//!
//! Contains evaluation, symbolic differentiation and special-value rules for
//! every built-in function.
//!
//! # Derivative References
//!
//! - Trigonometric and hyperbolic: DLMF §4.21, §4.35
//! - Inverse forms: DLMF §4.24, §4.37
//! - Gamma: DLMF §5.2.1 (Γ'(x) = Γ(x)ψ(x))
//! - Polygamma: DLMF §5.15 (d/dx ψ⁽ⁿ⁾(x) = ψ⁽ⁿ⁺¹⁾(x))

use super::registry::{FunctionDefinition, Parity};
use super::{func, is_exact, mul_opt, neg, pi, small_factorial};
use crate::Expr;
use crate::core::Constant;
use crate::math::{eval_gamma, eval_polygamma};

/// Largest integer argument for which `gamma(n)` is folded to `(n-1)!`
const GAMMA_EXACT_LIMIT: i64 = 171;

fn no_special(_: &[Expr]) -> Option<Expr> {
    None
}

/// Special value at 0 for functions with f(0) = 0
fn zero_at_zero(args: &[Expr]) -> Option<Expr> {
    is_exact(&args[0], 0).then(Expr::zero)
}

fn two() -> Expr {
    Expr::integer(2)
}

/// `1 - u**2`
fn one_minus_square(u: &Expr) -> Expr {
    Expr::integer(1) - Expr::pow(u.clone(), two())
}

/// `u**2 + 1`
fn square_plus_one(u: &Expr) -> Expr {
    Expr::pow(u.clone(), two()) + Expr::integer(1)
}

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            eval: |args| Some(args[0].abs()),
            derivative: |args, primes| {
                // d/dx |u| = u/|u| * u'
                let u = args[0].clone();
                mul_opt(u.clone() / func("abs", u), primes[0].clone())
            },
            special: |args| {
                let u = &args[0];
                if let Some(n) = u.as_number()
                    && !n.is_float()
                {
                    return Some(Expr::number(n.abs()));
                }
                match u.kind() {
                    crate::ExprKind::Constant(
                        Constant::Pi | Constant::E | Constant::EulerGamma,
                    ) => Some(u.clone()),
                    crate::ExprKind::Constant(Constant::I) => Some(Expr::one()),
                    _ => None,
                }
            },
            parity: Parity::Even,
        },
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            eval: |args| Some(args[0].sin()),
            derivative: |args, primes| {
                // d/dx sin(u) = cos(u) * u'
                mul_opt(func("cos", args[0].clone()), primes[0].clone())
            },
            special: |args| {
                let u = &args[0];
                (is_exact(u, 0) || u.is_constant(Constant::Pi)).then(Expr::zero)
            },
            parity: Parity::Odd,
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            eval: |args| Some(args[0].cos()),
            derivative: |args, primes| {
                // d/dx cos(u) = -sin(u) * u'
                mul_opt(neg(func("sin", args[0].clone())), primes[0].clone())
            },
            special: |args| {
                let u = &args[0];
                if is_exact(u, 0) {
                    Some(Expr::one())
                } else if u.is_constant(Constant::Pi) {
                    Some(Expr::integer(-1))
                } else {
                    None
                }
            },
            parity: Parity::Even,
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            eval: |args| Some(args[0].tan()),
            derivative: |args, primes| {
                // d/dx tan(u) = (1 + tan(u)^2) * u'
                let t = func("tan", args[0].clone());
                mul_opt(Expr::pow(t, two()) + Expr::integer(1), primes[0].clone())
            },
            special: |args| {
                let u = &args[0];
                (is_exact(u, 0) || u.is_constant(Constant::Pi)).then(Expr::zero)
            },
            parity: Parity::Odd,
        },
        // Inverse Trigonometric
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            eval: |args| (args[0].abs() <= 1.0).then(|| args[0].asin()),
            derivative: |args, primes| {
                // d/dx asin(u) = u' / sqrt(1 - u^2)
                let denom = Expr::sqrt(one_minus_square(&args[0]));
                mul_opt(denom.recip(), primes[0].clone())
            },
            special: |args| {
                let u = &args[0];
                if is_exact(u, 0) {
                    Some(Expr::zero())
                } else if is_exact(u, 1) {
                    Some(pi() / two())
                } else {
                    None
                }
            },
            parity: Parity::Odd,
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            eval: |args| (args[0].abs() <= 1.0).then(|| args[0].acos()),
            derivative: |args, primes| {
                // d/dx acos(u) = -u' / sqrt(1 - u^2)
                let denom = Expr::sqrt(one_minus_square(&args[0]));
                mul_opt(neg(denom.recip()), primes[0].clone())
            },
            special: |args| {
                let u = &args[0];
                if is_exact(u, 1) {
                    Some(Expr::zero())
                } else if is_exact(u, 0) {
                    Some(pi() / two())
                } else if is_exact(u, -1) {
                    Some(pi())
                } else {
                    None
                }
            },
            parity: Parity::None,
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            eval: |args| Some(args[0].atan()),
            derivative: |args, primes| {
                // d/dx atan(u) = u' / (1 + u^2)
                mul_opt(square_plus_one(&args[0]).recip(), primes[0].clone())
            },
            special: |args| {
                let u = &args[0];
                if is_exact(u, 0) {
                    Some(Expr::zero())
                } else if is_exact(u, 1) {
                    Some(pi() / Expr::integer(4))
                } else {
                    None
                }
            },
            parity: Parity::Odd,
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            eval: |args| Some(args[0].sinh()),
            derivative: |args, primes| {
                // d/dx sinh(u) = cosh(u) * u'
                mul_opt(func("cosh", args[0].clone()), primes[0].clone())
            },
            special: zero_at_zero,
            parity: Parity::Odd,
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            eval: |args| Some(args[0].cosh()),
            derivative: |args, primes| {
                // d/dx cosh(u) = sinh(u) * u'
                mul_opt(func("sinh", args[0].clone()), primes[0].clone())
            },
            special: |args| is_exact(&args[0], 0).then(Expr::one),
            parity: Parity::Even,
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            eval: |args| Some(args[0].tanh()),
            derivative: |args, primes| {
                // d/dx tanh(u) = (1 - tanh(u)^2) * u'
                let t = func("tanh", args[0].clone());
                mul_opt(one_minus_square(&t), primes[0].clone())
            },
            special: zero_at_zero,
            parity: Parity::Odd,
        },
        // Inverse Hyperbolic
        FunctionDefinition {
            name: "asinh",
            arity: 1..=1,
            eval: |args| Some(args[0].asinh()),
            derivative: |args, primes| {
                // d/dx asinh(u) = u' / sqrt(u^2 + 1)
                let denom = Expr::sqrt(square_plus_one(&args[0]));
                mul_opt(denom.recip(), primes[0].clone())
            },
            special: zero_at_zero,
            parity: Parity::Odd,
        },
        FunctionDefinition {
            name: "acosh",
            arity: 1..=1,
            eval: |args| (args[0] >= 1.0).then(|| args[0].acosh()),
            derivative: |args, primes| {
                // d/dx acosh(u) = u' / sqrt(u^2 - 1)
                let inner = Expr::pow(args[0].clone(), two()) - Expr::integer(1);
                mul_opt(Expr::sqrt(inner).recip(), primes[0].clone())
            },
            special: |args| is_exact(&args[0], 1).then(Expr::zero),
            parity: Parity::None,
        },
        FunctionDefinition {
            name: "atanh",
            arity: 1..=1,
            eval: |args| (args[0].abs() < 1.0).then(|| args[0].atanh()),
            derivative: |args, primes| {
                // d/dx atanh(u) = u' / (1 - u^2)
                mul_opt(one_minus_square(&args[0]).recip(), primes[0].clone())
            },
            special: zero_at_zero,
            parity: Parity::Odd,
        },
        // Logarithm
        FunctionDefinition {
            name: "log",
            arity: 1..=1,
            eval: |args| (args[0] > 0.0).then(|| args[0].ln()),
            derivative: |args, primes| {
                // d/dx log(u) = u' / u
                mul_opt(args[0].clone().recip(), primes[0].clone())
            },
            special: |args| {
                let u = &args[0];
                if is_exact(u, 1) {
                    Some(Expr::zero())
                } else if is_exact(u, 0) {
                    Some(Expr::zoo())
                } else if u.is_constant(Constant::E) {
                    Some(Expr::one())
                } else {
                    None
                }
            },
            parity: Parity::None,
        },
        // Gamma family
        FunctionDefinition {
            name: "gamma",
            arity: 1..=1,
            eval: |args| eval_gamma(args[0]),
            derivative: |args, primes| {
                // d/dx Γ(u) = Γ(u) * ψ(u) * u'
                let u = args[0].clone();
                let psi = Expr::func("polygamma", vec![Expr::zero(), u.clone()]);
                mul_opt(func("gamma", u) * psi, primes[0].clone())
            },
            special: |args| {
                let u = &args[0];
                if let Some(n) = u.as_number().filter(|n| !n.is_float()) {
                    if let Some(k) = n.to_i64() {
                        if k <= 0 {
                            return Some(Expr::zoo());
                        }
                        if k <= GAMMA_EXACT_LIMIT {
                            return Some(Expr::number(small_factorial((k - 1) as u32)));
                        }
                    } else if crate::core::Number::rational(1, 2).as_ref() == Some(n) {
                        return Some(Expr::sqrt(pi()));
                    }
                }
                None
            },
            parity: Parity::None,
        },
        FunctionDefinition {
            name: "polygamma",
            arity: 2..=2,
            eval: |args| {
                let n = args[0];
                if n.fract() != 0.0 || n < 0.0 {
                    return None;
                }
                eval_polygamma(n as i64, args[1])
            },
            derivative: |args, primes| {
                // d/dx ψ⁽ⁿ⁾(u) = ψ⁽ⁿ⁺¹⁾(u) * u', order held constant
                let next = args[0].clone() + Expr::integer(1);
                mul_opt(
                    Expr::func("polygamma", vec![next, args[1].clone()]),
                    primes[1].clone(),
                )
            },
            special: no_special,
            parity: Parity::None,
        },
    ]
}
