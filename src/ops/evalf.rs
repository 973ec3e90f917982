//! Numeric evaluation over the reals

use crate::core::Number;
use crate::error::EngineError;
use crate::functions::registry::Registry;
use crate::{Expr, ExprKind};

/// Evaluate to a finite `f64`.
///
/// Fails with [`EngineError::NotNumeric`] on free symbols, user functions,
/// unevaluated derivatives, equations, and anything whose value is not a
/// finite real.
pub fn evalf(expr: &Expr) -> Result<f64, EngineError> {
    eval_real(expr)
        .filter(|v| v.is_finite())
        .ok_or_else(|| EngineError::NotNumeric(expr.to_string()))
}

/// Shortest decimal that round-trips, without a trailing `.0` for whole values
pub fn format_float(value: f64) -> String {
    if value == 0.0 {
        // -0.0 renders as 0
        return "0".to_string();
    }
    format!("{value}")
}

fn eval_real(expr: &Expr) -> Option<f64> {
    match expr.kind() {
        ExprKind::Number(n) => Some(n.to_f64()),
        ExprKind::Constant(c) => c.to_f64(),
        ExprKind::Symbol(_) | ExprKind::Derivative { .. } | ExprKind::Equality(..) => None,

        ExprKind::Sum(items) => items.iter().try_fold(0.0, |acc, t| Some(acc + eval_real(t)?)),
        ExprKind::Product(items) => items.iter().try_fold(1.0, |acc, f| Some(acc * eval_real(f)?)),

        ExprKind::Pow(base, exp) => {
            let b = eval_real(base)?;
            // Odd roots of negative numbers stay real: (-8)**(1/3) = -2
            if b < 0.0
                && let Some(q) = exp.as_number().and_then(odd_denominator)
            {
                let e = exp.as_number().map_or(f64::NAN, Number::to_f64);
                let magnitude = (-b).powf(e);
                let numer_odd = (e * q).round() as i64 % 2 != 0;
                return Some(if numer_odd { -magnitude } else { magnitude });
            }
            let v = b.powf(eval_real(exp)?);
            (!v.is_nan()).then_some(v)
        }

        ExprKind::FunctionCall { name, args } => {
            let def = Registry::get(name).filter(|d| d.validate_arity(args.len()))?;
            let values = args.iter().map(|a| eval_real(a)).collect::<Option<Vec<_>>>()?;
            (def.eval)(&values)
        }
    }
}

/// Denominator of an exact rational exponent when it is odd and greater than 1
fn odd_denominator(n: &Number) -> Option<f64> {
    let r = n.as_rational()?;
    let d = num_traits::ToPrimitive::to_f64(r.denom())?;
    (d > 1.0 && d % 2.0 == 1.0).then_some(d)
}
