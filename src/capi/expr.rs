//! Exported expression functions
//!
//! Every function here returns an owned string that must be released exactly
//! once with [`symb_free_string`](super::symb_free_string), including on failure.

use std::ffi::c_char;

use super::{expressions, read_str, string_result};
use crate::engine::NamedConstant;

/// Numeric value of `expression`, or its expansion when it has no numeric value.
#[unsafe(no_mangle)]
pub extern "C" fn symb_evaluate(expression: *const c_char) -> *mut c_char {
    const OP: &str = "evaluate";
    string_result(OP, || {
        let expr = unsafe { read_str(OP, expression) }?;
        expressions().evaluate(expr)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_expand(expression: *const c_char) -> *mut c_char {
    const OP: &str = "expand";
    string_result(OP, || {
        let expr = unsafe { read_str(OP, expression) }?;
        expressions().expand(expr)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_simplify(expression: *const c_char) -> *mut c_char {
    const OP: &str = "simplify";
    string_result(OP, || {
        let expr = unsafe { read_str(OP, expression) }?;
        expressions().simplify(expr)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_factor(expression: *const c_char) -> *mut c_char {
    const OP: &str = "factor";
    string_result(OP, || {
        let expr = unsafe { read_str(OP, expression) }?;
        expressions().factor(expr)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_differentiate(
    expression: *const c_char,
    symbol: *const c_char,
) -> *mut c_char {
    const OP: &str = "differentiate";
    string_result(OP, || {
        let expr = unsafe { read_str(OP, expression) }?;
        let symbol = unsafe { read_str(OP, symbol) }?;
        expressions().differentiate(expr, symbol)
    })
}

/// Always returns the unsupported-operation error string.
#[unsafe(no_mangle)]
pub extern "C" fn symb_integrate(expression: *const c_char, symbol: *const c_char) -> *mut c_char {
    const OP: &str = "integrate";
    string_result(OP, || {
        let _ = (expression, symbol);
        expressions().integrate(None, None)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_substitute(
    expression: *const c_char,
    symbol: *const c_char,
    value: *const c_char,
) -> *mut c_char {
    const OP: &str = "substitute";
    string_result(OP, || {
        let expr = unsafe { read_str(OP, expression) }?;
        let symbol = unsafe { read_str(OP, symbol) }?;
        let value = unsafe { read_str(OP, value) }?;
        expressions().substitute(expr, symbol, value)
    })
}

/// Roots of a polynomial as `[r1, r2, ...]`.
#[unsafe(no_mangle)]
pub extern "C" fn symb_solve(expression: *const c_char, symbol: *const c_char) -> *mut c_char {
    const OP: &str = "solve";
    string_result(OP, || {
        let expr = unsafe { read_str(OP, expression) }?;
        let symbol = unsafe { read_str(OP, symbol) }?;
        expressions().solve(expr, symbol)
    })
}

impl_unary_functions!(
    (abs, Abs),
    (sin, Sin),
    (cos, Cos),
    (tan, Tan),
    (asin, Asin),
    (acos, Acos),
    (atan, Atan),
    (sinh, Sinh),
    (cosh, Cosh),
    (tanh, Tanh),
    (asinh, Asinh),
    (acosh, Acosh),
    (atanh, Atanh),
    (exp, Exp),
    (log, Log),
    (sqrt, Sqrt),
    (gamma, Gamma),
);

#[unsafe(no_mangle)]
pub extern "C" fn symb_gcd(a: *const c_char, b: *const c_char) -> *mut c_char {
    const OP: &str = "gcd";
    string_result(OP, || {
        let a = unsafe { read_str(OP, a) }?;
        let b = unsafe { read_str(OP, b) }?;
        expressions().gcd(a, b)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_lcm(a: *const c_char, b: *const c_char) -> *mut c_char {
    const OP: &str = "lcm";
    string_result(OP, || {
        let a = unsafe { read_str(OP, a) }?;
        let b = unsafe { read_str(OP, b) }?;
        expressions().lcm(a, b)
    })
}

/// `n!`; negative or oversized `n` yields an error string.
#[unsafe(no_mangle)]
pub extern "C" fn symb_factorial(n: libc::c_long) -> *mut c_char {
    string_result("factorial", || expressions().factorial(i64::from(n)))
}

/// `n`-th Fibonacci number; negative or oversized `n` yields an error string.
#[unsafe(no_mangle)]
pub extern "C" fn symb_fibonacci(n: libc::c_long) -> *mut c_char {
    string_result("fibonacci", || expressions().fibonacci(i64::from(n)))
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_get_pi() -> *mut c_char {
    string_result("get_pi", || Ok(expressions().constant(NamedConstant::Pi)))
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_get_e() -> *mut c_char {
    string_result("get_e", || Ok(expressions().constant(NamedConstant::E)))
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_get_euler_gamma() -> *mut c_char {
    string_result("get_euler_gamma", || {
        Ok(expressions().constant(NamedConstant::EulerGamma))
    })
}

/// `2 + 3` through the engine; a quick check that the library loaded.
#[unsafe(no_mangle)]
pub extern "C" fn symb_test_basic_operations() -> *mut c_char {
    string_result("test", || expressions().test_basic_operations())
}

/// Expansion of `x**2 + 2*x + 1` through the engine.
#[unsafe(no_mangle)]
pub extern "C" fn symb_test_symbolic() -> *mut c_char {
    string_result("test", || expressions().test_symbolic())
}
