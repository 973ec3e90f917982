//! Numeric special functions
//!
//! Evaluations used by the function registry when an argument is a float.
//!
//! # Domain Validation
//!
//! Functions that can produce undefined results (poles, branch cuts) return
//! `Option<T>` and check their inputs:
//!
//! - **Gamma functions**: Non-positive integers are poles
//! - **Logarithms**: Non-positive inputs have no real value
//! - **Inverse trig**: |x| > 1 has no real value for asin/acos

use num_traits::{Float, FloatConst};

/// Scalar type the special functions are generic over
pub trait MathScalar: Float + FloatConst {}

impl<T: Float + FloatConst> MathScalar for T {}

#[inline]
fn lit<T: MathScalar>(v: f64) -> T {
    T::from(v).unwrap_or_else(T::nan)
}

fn is_pole<T: MathScalar>(x: T) -> bool {
    x <= T::zero() && x.fract() == T::zero()
}

/// Lanczos approximation (g = 7, n = 9) with reflection below 1/2
pub fn eval_gamma<T: MathScalar>(x: T) -> Option<T> {
    if is_pole(x) {
        return None;
    }
    const C: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    let g: T = lit(7.0);
    let half: T = lit(0.5);
    let one = T::one();
    let pi = T::PI();

    if x < half {
        Some(pi / ((pi * x).sin() * eval_gamma(one - x)?))
    } else {
        let x = x - one;
        let mut ag: T = lit(C[0]);
        for (i, &coeff) in C.iter().enumerate().skip(1) {
            ag = ag + lit::<T>(coeff) / (x + lit(i as f64));
        }
        let t = x + g + half;
        let two_pi_sqrt = (lit::<T>(2.0) * pi).sqrt();
        Some(two_pi_sqrt * t.powf(x + half) * (-t).exp() * ag)
    }
}

/// Digamma ψ(x) by recurrence up to 6 followed by the asymptotic series
pub fn eval_digamma<T: MathScalar>(x: T) -> Option<T> {
    if is_pole(x) {
        return None;
    }
    let half: T = lit(0.5);
    let one = T::one();
    let pi = T::PI();

    if x < half {
        return Some(eval_digamma(one - x)? - pi * (pi * x).cos() / (pi * x).sin());
    }
    let mut xv = x;
    let mut result = T::zero();
    let six: T = lit(6.0);
    while xv < six {
        result = result - one / xv;
        xv = xv + one;
    }
    result = result + xv.ln() - half / xv;
    let x2 = xv * xv;

    let t1 = one / (lit::<T>(12.0) * x2);
    let t2 = one / (lit::<T>(120.0) * x2 * x2);
    let t3 = one / (lit::<T>(252.0) * x2 * x2 * x2);

    Some(result - t1 + t2 - t3)
}

/// Trigamma ψ₁(x), same scheme as [`eval_digamma`]
pub fn eval_trigamma<T: MathScalar>(x: T) -> Option<T> {
    if is_pole(x) {
        return None;
    }
    let mut xv = x;
    let mut r = T::zero();
    let six: T = lit(6.0);
    let one = T::one();

    while xv < six {
        r = r + one / (xv * xv);
        xv = xv + one;
    }
    let x2 = xv * xv;
    let half: T = lit(0.5);

    Some(
        r + one / xv + half / x2 + one / (six * x2 * xv) - one / (lit::<T>(30.0) * x2 * x2 * xv)
            + one / (lit::<T>(42.0) * x2 * x2 * x2 * xv),
    )
}

/// ψ⁽ⁿ⁾(x) for the orders with a numeric evaluation (0 and 1)
pub fn eval_polygamma<T: MathScalar>(n: i64, x: T) -> Option<T> {
    match n {
        0 => eval_digamma(x),
        1 => eval_trigamma(x),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-8 * b.abs().max(1.0)
    }

    #[test]
    fn test_gamma_integers_and_half() {
        assert!(close(eval_gamma(5.0_f64).unwrap(), 24.0));
        assert!(close(eval_gamma(1.0_f64).unwrap(), 1.0));
        assert!(close(
            eval_gamma(0.5_f64).unwrap(),
            std::f64::consts::PI.sqrt()
        ));
        assert!(close(
            eval_gamma(-0.5_f64).unwrap(),
            -2.0 * std::f64::consts::PI.sqrt()
        ));
    }

    #[test]
    fn test_gamma_poles() {
        assert!(eval_gamma(0.0_f64).is_none());
        assert!(eval_gamma(-3.0_f64).is_none());
        assert!(eval_digamma(-1.0_f64).is_none());
    }

    #[test]
    fn test_digamma_and_trigamma() {
        // ψ(1) = -γ, ψ₁(1) = π²/6
        assert!(close(eval_digamma(1.0_f64).unwrap(), -0.577_215_664_901_532_9));
        let pi = std::f64::consts::PI;
        assert!(close(eval_trigamma(1.0_f64).unwrap(), pi * pi / 6.0));
        assert!(eval_polygamma(3, 1.0_f64).is_none());
    }
}
