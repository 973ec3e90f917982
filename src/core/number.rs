//! Numeric atoms: exact rationals and machine floats.
//!
//! Integer and rational literals stay exact (arbitrary precision); decimal
//! literals become `f64`. Any operation that touches a float yields a float.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::config::DEFAULT_MAX_EXACT_BITS;

/// Largest integer exponent evaluated exactly on rational bases
pub const MAX_EXACT_EXPONENT: u64 = 10_000;

/// Largest radicand we trial-divide when pulling square factors out of a root
const SQUARE_FACTOR_LIMIT: u64 = 1_000_000_000_000;

thread_local! {
    static EXACT_BITS_LIMIT: Cell<u64> = const { Cell::new(DEFAULT_MAX_EXACT_BITS) };
}

/// Restores the previous exact-power bound when dropped
pub struct ExactBitsGuard {
    previous: u64,
}

impl Drop for ExactBitsGuard {
    fn drop(&mut self) {
        EXACT_BITS_LIMIT.with(|limit| limit.set(self.previous));
    }
}

/// Bound the size of exact powers built on this thread until the guard drops.
///
/// A power whose result would need more than `bits` bits stays unevaluated.
pub fn limit_exact_bits(bits: u64) -> ExactBitsGuard {
    let previous = EXACT_BITS_LIMIT.with(|limit| limit.replace(bits));
    ExactBitsGuard { previous }
}

/// Bit bound currently in force on this thread
pub fn exact_bits_limit() -> u64 {
    EXACT_BITS_LIMIT.with(Cell::get)
}

#[derive(Debug, Clone)]
pub enum Number {
    Rational(BigRational),
    Float(f64),
}

/// `coeff * base^exp`, the exact decomposition of a numeric power.
/// `rest` is `None` when the power evaluated completely.
#[derive(Debug, Clone, PartialEq)]
pub struct PowParts {
    pub coeff: Number,
    pub rest: Option<(Number, Number)>,
}

impl Number {
    pub fn integer(n: i64) -> Self {
        Number::Rational(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn from_bigint(n: BigInt) -> Self {
        Number::Rational(BigRational::from_integer(n))
    }

    /// `numer / denom`, or `None` for a zero denominator
    pub fn rational(numer: i64, denom: i64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Some(Number::Rational(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    pub fn float(value: f64) -> Self {
        // Normalize -0.0 so structural equality and hashing agree
        if value == 0.0 {
            Number::Float(0.0)
        } else {
            Number::Float(value)
        }
    }

    pub fn zero() -> Self {
        Number::Rational(BigRational::zero())
    }

    pub fn one() -> Self {
        Number::Rational(BigRational::one())
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_zero(),
            Number::Float(f) => *f == 0.0,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_one(),
            Number::Float(f) => *f == 1.0,
        }
    }

    pub fn is_neg_one(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_integer() && *r.numer() == BigInt::from(-1),
            Number::Float(f) => *f == -1.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_negative(),
            Number::Float(f) => *f < 0.0,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Exact integer (floats never count, even when integral)
    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_integer())
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Number::Rational(r) if r.is_integer() => Some(r.numer()),
            _ => None,
        }
    }

    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            Number::Rational(r) => Some(r),
            Number::Float(_) => None,
        }
    }

    /// Small exact integer, when it fits in an `i64`
    pub fn to_i64(&self) -> Option<i64> {
        self.as_integer().and_then(|n| n.to_i64())
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Rational(r) => r.to_f64().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
        }
    }

    pub fn neg(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(-r),
            Number::Float(f) => Number::float(-f),
        }
    }

    pub fn abs(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(r.abs()),
            Number::Float(f) => Number::float(f.abs()),
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a + b),
            _ => Number::float(self.to_f64() + other.to_f64()),
        }
    }

    pub fn sub(&self, other: &Number) -> Number {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a * b),
            _ => Number::float(self.to_f64() * other.to_f64()),
        }
    }

    /// Division; `None` when dividing by an exact zero
    pub fn div(&self, other: &Number) -> Option<Number> {
        match (self, other) {
            (Number::Rational(_), Number::Rational(b)) if b.is_zero() => None,
            (Number::Rational(a), Number::Rational(b)) => Some(Number::Rational(a / b)),
            _ => Some(Number::float(self.to_f64() / other.to_f64())),
        }
    }

    /// Reciprocal; `None` for an exact zero
    pub fn recip(&self) -> Option<Number> {
        Number::one().div(self)
    }

    /// Decompose `self^exp` as far as exact arithmetic allows.
    ///
    /// Returns `None` when nothing can be said (the power stays symbolic as-is),
    /// e.g. a negative base under an even root, an exponent beyond
    /// `max_exponent`, or an exact result estimated above `max_bits` bits.
    /// The caller handles `0^negative` before getting here.
    pub fn pow(&self, exp: &Number, max_exponent: u64, max_bits: u64) -> Option<PowParts> {
        if self.is_float() || exp.is_float() {
            let value = self.to_f64().powf(exp.to_f64());
            if value.is_nan() {
                return None;
            }
            return Some(PowParts {
                coeff: Number::float(value),
                rest: None,
            });
        }

        let (Number::Rational(base), Number::Rational(e)) = (self, exp) else {
            return None;
        };

        if e.is_integer() {
            let k = e.numer();
            if k.abs() > BigInt::from(max_exponent) {
                return None;
            }
            let value = rational_int_pow(base, k, max_bits)?;
            return Some(PowParts {
                coeff: Number::Rational(value),
                rest: None,
            });
        }

        if base.is_negative() {
            // Handled by the expression layer (imaginary unit), or left alone
            return None;
        }

        // base^(p/q) = base^k * base^(r/q) with 0 < r < q
        let q = e.denom().to_u32()?;
        let (k, r) = e.numer().div_mod_floor(e.denom());
        if k.abs() > BigInt::from(max_exponent) {
            return None;
        }
        let whole = rational_int_pow(base, &k, max_bits)?;
        let r = r.to_u32()?;

        let numer = base.numer();
        let denom = base.denom();
        let root_n = numer.nth_root(q);
        let root_d = denom.nth_root(q);
        if root_n.pow(q) == *numer && root_d.pow(q) == *denom {
            let root = BigRational::new(root_n, root_d);
            let value = whole * rational_int_pow(&root, &BigInt::from(r), max_bits)?;
            return Some(PowParts {
                coeff: Number::Rational(value),
                rest: None,
            });
        }

        let rest_exp = Number::Rational(BigRational::new(BigInt::from(r), BigInt::from(q)));

        if q == 2 {
            // sqrt(a/b) = sqrt(a*b)/b, then pull square factors out of a*b
            let radicand = numer * denom;
            let (outside, inside) = split_square_factor(&radicand);
            let coeff = whole * BigRational::new(outside, denom.clone());
            if inside.is_one() {
                return Some(PowParts {
                    coeff: Number::Rational(coeff),
                    rest: None,
                });
            }
            return Some(PowParts {
                coeff: Number::Rational(coeff),
                rest: Some((Number::from_bigint(inside), rest_exp)),
            });
        }

        Some(PowParts {
            coeff: Number::Rational(whole),
            rest: Some((Number::Rational(base.clone()), rest_exp)),
        })
    }

    /// Total order used for canonical sorting (value, then float after exact)
    pub fn cmp_canonical(&self, other: &Number) -> Ordering {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a.cmp(b),
            _ => self
                .to_f64()
                .total_cmp(&other.to_f64())
                .then_with(|| self.is_float().cmp(&other.is_float())),
        }
    }
}

/// `base^k` for an integer `k`, `None` for `0^negative` or a result
/// estimated above `max_bits` bits
fn rational_int_pow(base: &BigRational, k: &BigInt, max_bits: u64) -> Option<BigRational> {
    let magnitude = k.abs().to_u32()?;
    let bits = (base.numer().bits() + base.denom().bits()).saturating_mul(u64::from(magnitude));
    if bits > max_bits {
        return None;
    }
    let numer = base.numer().pow(magnitude);
    let denom = base.denom().pow(magnitude);
    if k.is_negative() {
        if numer.is_zero() {
            return None;
        }
        Some(BigRational::new(denom, numer))
    } else {
        Some(BigRational::new(numer, denom))
    }
}

/// Split `n >= 0` as `outside^2 * inside` with `inside` free of small square factors
fn split_square_factor(n: &BigInt) -> (BigInt, BigInt) {
    let Some(mut rest) = n.to_u64().filter(|v| *v <= SQUARE_FACTOR_LIMIT) else {
        return (BigInt::one(), n.clone());
    };
    let mut outside: u64 = 1;
    let mut p: u64 = 2;
    while p * p <= rest {
        while rest % (p * p) == 0 {
            rest /= p * p;
            outside *= p;
        }
        p += if p == 2 { 1 } else { 2 };
    }
    (BigInt::from(outside), BigInt::from(rest))
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Number::Rational(r) => {
                0u8.hash(state);
                r.hash(state);
            }
            Number::Float(f) => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Rational(r) if r.is_integer() => write!(f, "{}", r.numer()),
            Number::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            // Debug formatting keeps the decimal point, so floats stay floats on re-parse
            Number::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::integer(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BITS: u64 = 1 << 16;

    fn q(n: i64, d: i64) -> Number {
        Number::rational(n, d).unwrap()
    }

    #[test]
    fn test_exact_arithmetic() {
        assert_eq!(q(1, 2).add(&q(1, 3)), q(5, 6));
        assert_eq!(q(2, 3).mul(&q(3, 4)), q(1, 2));
        assert_eq!(Number::integer(1).div(&Number::integer(0)), None);
        assert_eq!(Number::integer(7).sub(&Number::integer(9)), Number::integer(-2));
    }

    #[test]
    fn test_float_contaminates() {
        let sum = Number::integer(2).add(&Number::float(0.5));
        assert_eq!(sum, Number::float(2.5));
        assert!(sum.is_float());
        assert!(!Number::float(2.0).is_integer());
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::integer(-5).to_string(), "-5");
        assert_eq!(q(3, -6).to_string(), "-1/2");
        assert_eq!(Number::float(2.0).to_string(), "2.0");
        assert_eq!(Number::float(-0.0).to_string(), "0.0");
    }

    #[test]
    fn test_integer_powers() {
        let p = Number::integer(2).pow(&Number::integer(10), 100, BITS).unwrap();
        assert_eq!(p.coeff, Number::integer(1024));
        assert!(p.rest.is_none());

        let p = Number::integer(2).pow(&Number::integer(-2), 100, BITS).unwrap();
        assert_eq!(p.coeff, q(1, 4));

        assert!(Number::integer(2).pow(&Number::integer(1000), 100, BITS).is_none());
    }

    #[test]
    fn test_huge_results_stay_unevaluated() {
        let big = Number::integer(2).pow(&Number::integer(10_000), 100_000, BITS).unwrap();
        assert_eq!(big.coeff.as_integer().map(|n| n.bits()), Some(10_001));
        // 10_002 bits of base times 10_000 is far beyond the bound
        assert!(big.coeff.pow(&Number::integer(10_000), 100_000, BITS).is_none());
        assert!(big.coeff.pow(&Number::integer(-10_000), 100_000, BITS).is_none());
        assert!(big.coeff.pow(&q(20_001, 2), 100_000, BITS).is_none());
        // Unit bases are cheap whatever the exponent
        assert!(Number::integer(-1).pow(&Number::integer(9_999), 100_000, BITS).is_some());
    }

    #[test]
    fn test_exact_bits_guard_restores() {
        let outer = exact_bits_limit();
        {
            let _guard = limit_exact_bits(64);
            assert_eq!(exact_bits_limit(), 64);
            {
                let _inner = limit_exact_bits(8);
                assert_eq!(exact_bits_limit(), 8);
            }
            assert_eq!(exact_bits_limit(), 64);
        }
        assert_eq!(exact_bits_limit(), outer);
    }

    #[test]
    fn test_perfect_roots() {
        let p = Number::integer(4).pow(&q(1, 2), 100, BITS).unwrap();
        assert_eq!(p.coeff, Number::integer(2));
        assert!(p.rest.is_none());

        let p = q(8, 27).pow(&q(2, 3), 100, BITS).unwrap();
        assert_eq!(p.coeff, q(4, 9));
    }

    #[test]
    fn test_square_factor_extraction() {
        // sqrt(8) = 2*sqrt(2)
        let p = Number::integer(8).pow(&q(1, 2), 100, BITS).unwrap();
        assert_eq!(p.coeff, Number::integer(2));
        assert_eq!(p.rest, Some((Number::integer(2), q(1, 2))));

        // sqrt(1/2) = sqrt(2)/2
        let p = q(1, 2).pow(&q(1, 2), 100, BITS).unwrap();
        assert_eq!(p.coeff, q(1, 2));
        assert_eq!(p.rest, Some((Number::integer(2), q(1, 2))));

        // 2^(3/2) = 2*sqrt(2)
        let p = Number::integer(2).pow(&q(3, 2), 100, BITS).unwrap();
        assert_eq!(p.coeff, Number::integer(2));
        assert_eq!(p.rest, Some((Number::integer(2), q(1, 2))));
    }

    #[test]
    fn test_negative_base_root_is_left_alone() {
        assert!(Number::integer(-4).pow(&q(1, 3), 100, BITS).is_none());
    }

    #[test]
    fn test_canonical_order() {
        assert_eq!(q(1, 2).cmp_canonical(&Number::integer(1)), Ordering::Less);
        assert_eq!(
            Number::integer(2).cmp_canonical(&Number::float(2.0)),
            Ordering::Less
        );
    }
}
