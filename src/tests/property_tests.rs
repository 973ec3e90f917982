//! Property-Based and Fuzz Testing
//!
//! Uses quickcheck for property-based testing of:
//! - Parser robustness (fuzz testing)
//! - Expansion determinism and re-parseability
//! - Canonical rendering round-trips

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

use crate::{ExpressionAdapter, NativeEngine, ops, parse};

// ============================================================
// PART 1: EXPRESSION GENERATORS FOR PROPERTY TESTS
// ============================================================

/// Random well-formed polynomial text over `x` and `y`
fn random_poly_string(g: &mut Gen) -> String {
    let depth = g.size().min(3); // Limit depth so expansion stays small
    gen_poly_recursive(g, depth)
}

fn gen_poly_recursive(g: &mut Gen, depth: usize) -> String {
    if depth == 0 {
        return match u8::arbitrary(g) % 4 {
            0 => (i8::arbitrary(g) % 6).to_string(),
            1 => "x".to_string(),
            2 => "y".to_string(),
            _ => "2".to_string(),
        };
    }
    match u8::arbitrary(g) % 8 {
        0..=2 => {
            let ops = ["+", "-", "*"];
            let op = ops[usize::arbitrary(g) % ops.len()];
            let left = gen_poly_recursive(g, depth - 1);
            let right = gen_poly_recursive(g, depth - 1);
            format!("({left} {op} {right})")
        }
        3 => {
            let base = gen_poly_recursive(g, depth - 1);
            let exp = 1 + u8::arbitrary(g) % 3;
            format!("({base})**{exp}")
        }
        4 => format!("-({})", gen_poly_recursive(g, depth - 1)),
        _ => gen_poly_recursive(g, depth - 1),
    }
}

/// Random expression text including calls and division
fn random_expr_string(g: &mut Gen) -> String {
    let depth = g.size().min(4);
    gen_expr_recursive(g, depth)
}

fn gen_expr_recursive(g: &mut Gen, depth: usize) -> String {
    if depth == 0 {
        return match u8::arbitrary(g) % 5 {
            0 => (u8::arbitrary(g) % 10).to_string(),
            1 => "x".to_string(),
            2 => "y".to_string(),
            3 => "pi".to_string(),
            _ => "1/2".to_string(),
        };
    }
    match u8::arbitrary(g) % 10 {
        0..=3 => {
            let ops = ["+", "-", "*", "/", "^"];
            let op = ops[usize::arbitrary(g) % ops.len()];
            let left = gen_expr_recursive(g, depth - 1);
            let right = gen_expr_recursive(g, depth - 1);
            format!("({left} {op} {right})")
        }
        4..=6 => {
            let fns = ["sin", "cos", "tan", "exp", "log", "sqrt", "abs", "gamma"];
            let f = fns[usize::arbitrary(g) % fns.len()];
            format!("{f}({})", gen_expr_recursive(g, depth - 1))
        }
        7 => format!("-({})", gen_expr_recursive(g, depth - 1)),
        _ => gen_expr_recursive(g, depth - 1),
    }
}

// ============================================================
// PART 2: PARSER FUZZ TESTS
// ============================================================

#[cfg(test)]
mod parser_fuzz_tests {
    use super::*;

    /// Property: Parser should never panic on arbitrary input
    #[test]
    fn test_parser_never_panics_on_random_input() {
        fn prop_parser_no_panic(input: String) -> TestResult {
            let _ = parse(&input);
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(2000)
            .quickcheck(prop_parser_no_panic as fn(String) -> TestResult);
    }

    /// Property: the adapter turns any input into a value or an error message
    #[test]
    fn test_adapter_never_panics_on_random_input() {
        fn prop_adapter_no_panic(input: String) -> bool {
            let adapter = ExpressionAdapter::new(NativeEngine::default());
            match adapter.expand(Some(&input)) {
                Ok(_) => true,
                Err(err) => err.to_string().starts_with("Error in expand: "),
            }
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop_adapter_no_panic as fn(String) -> bool);
    }

    /// Fuzz test with specifically crafted edge cases
    #[test]
    fn test_parser_edge_cases() {
        let edge_cases = [
            "",
            "   ",
            "()",
            "((()))",
            "+++",
            "---x",
            "1+",
            "+1",
            "sin()",
            "sin(x,y)",
            "1..2",
            "1e999999",
            "1e-999999",
            "x^y^z",
            "x**-1",
            "((((x))))",
            "sin(cos(tan(exp(log(x)))))",
            "x+y*z^w/a-b",
            "x = y = z",
            "1/0",
            "0/0",
            "0**0",
            "(-0)",
            "Derivative(f(x), x)",
            "Derivative(x)",
            "∞",
            "π",
        ];

        for case in &edge_cases {
            // Should not panic - may succeed or fail with error
            let _ = parse(case);
        }
    }

    /// Test deeply nested expressions don't stack overflow
    #[test]
    fn test_parser_deep_nesting() {
        let mut expr = "x".to_string();
        for _ in 0..30 {
            expr = format!("({expr}+1)");
        }
        let result = parse(&expr);
        assert!(result.is_ok(), "Deep nesting should parse: {:?}", result.err());

        let mut expr = "x".to_string();
        for _ in 0..5_000 {
            expr = format!("({expr})");
        }
        assert!(parse(&expr).is_err());
    }
}

// ============================================================
// PART 3: ALGEBRAIC PROPERTIES
// ============================================================

#[cfg(test)]
mod algebraic_property_tests {
    use super::*;

    const MAX_TERMS: usize = 10_000;

    /// Property: expanding twice gives the same result, and that result re-parses
    #[test]
    fn test_expand_is_deterministic_and_reparses() {
        fn prop_expand(seed: u64) -> TestResult {
            let mut g = Gen::new(6 + (seed % 4) as usize);
            let text = random_poly_string(&mut g);
            let Ok(expr) = parse(&text) else {
                return TestResult::discard();
            };
            let Ok(first) = ops::expand(&expr, MAX_TERMS) else {
                return TestResult::discard();
            };
            let second = match ops::expand(&expr, MAX_TERMS) {
                Ok(e) => e,
                Err(_) => return TestResult::failed(),
            };
            if first != second {
                return TestResult::failed();
            }
            TestResult::from_bool(parse(&first.to_string()).is_ok())
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop_expand as fn(u64) -> TestResult);
    }

    /// Property: expansion is a fixed point after one application
    #[test]
    fn test_expand_is_idempotent() {
        let mut g = Gen::new(6);
        for _ in 0..200 {
            let text = random_poly_string(&mut g);
            let Ok(expr) = parse(&text) else { continue };
            let Ok(once) = ops::expand(&expr, MAX_TERMS) else { continue };
            let twice = ops::expand(&once, MAX_TERMS).unwrap();
            assert_eq!(once, twice, "expand not idempotent for {text}");
        }
    }

    /// Property: the rendered form of an expanded polynomial parses back to the same tree
    #[test]
    fn test_polynomial_render_round_trip() {
        let mut g = Gen::new(6);
        for _ in 0..200 {
            let text = random_poly_string(&mut g);
            let Ok(expr) = parse(&text) else { continue };
            let Ok(expanded) = ops::expand(&expr, MAX_TERMS) else { continue };
            let rendered = expanded.to_string();
            let reparsed = parse(&rendered).unwrap();
            assert_eq!(reparsed.to_string(), rendered, "round trip of {text}");
        }
    }

    /// Parsed expressions should round-trip through Display.
    /// Floats produced by calls on numeric arguments may print differently,
    /// so a small share of mismatches is tolerated.
    #[test]
    fn test_parse_display_consistency() {
        let mut g = Gen::new(6);
        let mut failed_cases = 0;
        let total_tests = 100;

        for _ in 0..total_tests {
            let text = random_expr_string(&mut g);
            if let Ok(expr) = parse(&text) {
                let displayed = expr.to_string();
                if parse(&displayed).is_err() {
                    failed_cases += 1;
                }
            }
        }

        assert!(
            failed_cases < total_tests / 4,
            "Too many display round-trip failures: {}/{}",
            failed_cases,
            total_tests
        );
    }

    /// Property: derivative of a polynomial has lower degree in the variable
    #[test]
    fn test_derivative_of_power_lowers_degree() {
        fn prop_power_rule(n: u8) -> TestResult {
            let n = n % 20 + 2;
            let expr = parse(&format!("x**{n}")).unwrap();
            let x = crate::parse_symbol("x").unwrap();
            let d = ops::diff(&expr, &x);
            let expected = if n == 2 {
                "2*x".to_string()
            } else {
                format!("{n}*x**{}", n - 1)
            };
            TestResult::from_bool(d.to_string() == expected)
        }
        QuickCheck::new()
            .tests(100)
            .quickcheck(prop_power_rule as fn(u8) -> TestResult);
    }
}
