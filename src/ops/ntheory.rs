//! Number theory over arbitrary-precision integers

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::EngineError;
use crate::{Expr, ExprKind};

fn as_integer(expr: &Expr) -> Result<BigInt, EngineError> {
    match expr.kind() {
        ExprKind::Number(n) => n
            .as_integer()
            .cloned()
            .ok_or_else(|| EngineError::NotInteger(expr.to_string())),
        _ => Err(EngineError::NotInteger(expr.to_string())),
    }
}

/// Greatest common divisor, always non-negative
pub fn gcd(a: &Expr, b: &Expr) -> Result<BigInt, EngineError> {
    Ok(as_integer(a)?.gcd(&as_integer(b)?))
}

/// Least common multiple, always non-negative
pub fn lcm(a: &Expr, b: &Expr) -> Result<BigInt, EngineError> {
    Ok(as_integer(a)?.lcm(&as_integer(b)?))
}

pub fn factorial(n: u64) -> BigUint {
    (2..=n).fold(BigUint::one(), |acc, k| acc * k)
}

/// `F(n)` with `F(0) = 0`, `F(1) = 1`, by fast doubling:
/// `F(2k) = F(k) * (2F(k+1) - F(k))`, `F(2k+1) = F(k)**2 + F(k+1)**2`
pub fn fibonacci(n: u64) -> BigUint {
    fib_pair(n).0
}

/// `(F(n), F(n+1))`
fn fib_pair(n: u64) -> (BigUint, BigUint) {
    if n == 0 {
        return (BigUint::zero(), BigUint::one());
    }
    let (a, b) = fib_pair(n / 2);
    let c = &a * (&b * 2u32 - &a);
    let d = &a * &a + &b * &b;
    if n % 2 == 0 { (c, d) } else { (d.clone(), c + d) }
}
