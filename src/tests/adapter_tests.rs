//! End-to-end behaviour of the string adapter: parse, operate, render.

use crate::{
    EngineError, ErrorKind, ExpressionAdapter, NamedConstant, NativeEngine, UnaryFunction,
};

fn adapter() -> ExpressionAdapter<NativeEngine> {
    ExpressionAdapter::new(NativeEngine::default())
}

#[test]
fn test_expand_and_aliases_agree() {
    let a = adapter();
    let expected = "1 + 2*x + x**2";
    assert_eq!(a.expand(Some("(x + 1)^2")).unwrap(), expected);
    assert_eq!(a.simplify(Some("(x + 1)^2")).unwrap(), expected);
    assert_eq!(a.factor(Some("(x + 1)^2")).unwrap(), expected);
}

#[test]
fn test_nested_huge_powers_stay_symbolic() {
    let a = adapter();
    let out = a.expand(Some("((2**10000)**10000)**10000")).unwrap();
    assert!(out.starts_with("19950631168807583848"), "{}", &out[..40]);
    assert!(out.ends_with("**100000000"));
    // 2**10000 has 3011 digits; nothing bigger was materialized
    assert!(out.len() < 3100);

    let out = a.expand(Some("(2**10000)**10000")).unwrap();
    assert!(out.ends_with("**10000"));
}

#[test]
fn test_long_binomial_power_fails_fast() {
    let err = adapter().expand(Some("(x+1)**3000")).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::OperationFailure {
            source: EngineError::TooLarge { .. },
            ..
        }
    ));
    assert!(err.to_string().starts_with("Error in expand:"));
}

#[test]
fn test_evaluate_numeric() {
    let a = adapter();
    assert_eq!(a.evaluate(Some("1/3")).unwrap(), "0.3333333333333333");
    assert_eq!(a.evaluate(Some("pi")).unwrap(), "3.141592653589793");
    assert_eq!(a.evaluate(Some("sin(0) + 1")).unwrap(), "1");
}

#[test]
fn test_differentiate() {
    let a = adapter();
    assert_eq!(
        a.differentiate(Some("x**3 + 2*x"), Some("x")).unwrap(),
        "2 + 3*x**2"
    );
    assert_eq!(a.differentiate(Some("sin(x)"), Some("x")).unwrap(), "cos(x)");
    assert_eq!(a.differentiate(Some("y**2"), Some("x")).unwrap(), "0");
    // Whitespace around the symbol is ignored
    assert_eq!(a.differentiate(Some("x**2"), Some(" x ")).unwrap(), "2*x");
}

#[test]
fn test_symbol_must_be_a_name() {
    let a = adapter();
    for bad in ["2x", "x + y", "", "pi"] {
        let err = a.differentiate(Some("x"), Some(bad)).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::ParseFailure(_)),
            "{bad:?} accepted as a symbol"
        );
    }
}

#[test]
fn test_substitute() {
    let a = adapter();
    assert_eq!(
        a.substitute(Some("x**2 + y"), Some("x"), Some("3")).unwrap(),
        "9 + y"
    );
    assert_eq!(
        a.substitute(Some("x + 1"), Some("z"), Some("5")).unwrap(),
        "1 + x"
    );
    assert_eq!(
        a.substitute(Some("x"), Some("x"), None).unwrap_err().to_string(),
        "Error in substitute: null value"
    );
    assert!(matches!(
        a.substitute(Some("x"), Some("x"), Some("(")).unwrap_err().kind,
        ErrorKind::ParseFailure(_)
    ));
}

#[test]
fn test_solve_shapes() {
    let a = adapter();
    assert_eq!(a.solve(Some("x**2 - 4"), Some("x")).unwrap(), "[-2, 2]");
    assert_eq!(a.solve(Some("x**2 + 1"), Some("x")).unwrap(), "[-I, I]");
    assert_eq!(a.solve(Some("2*x - 3"), Some("x")).unwrap(), "[3/2]");
    assert_eq!(a.solve(Some("x**2 = 2"), Some("x")).unwrap(), "[-sqrt(2), sqrt(2)]");
    assert_eq!(a.solve(Some("1"), Some("x")).unwrap(), "[]");
    assert_eq!(a.solve(Some("x+1=x+2"), Some("x")).unwrap(), "[]");
    assert_eq!(a.solve(Some("0*x"), Some("x")).unwrap(), "Complexes");
}

#[test]
fn test_solve_rejects_non_polynomial() {
    let err = adapter().solve(Some("sin(x)"), Some("x")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::OperationFailure { .. }));
    assert!(err.to_string().starts_with("Error in solve: solve failed"));
}

#[test]
fn test_unary_table() {
    let a = adapter();
    let cases = [
        (UnaryFunction::Sin, "0", "0"),
        (UnaryFunction::Cos, "pi", "-1"),
        (UnaryFunction::Log, "1", "0"),
        (UnaryFunction::Log, "E", "1"),
        (UnaryFunction::Abs, "-3", "3"),
        (UnaryFunction::Gamma, "5", "24"),
        (UnaryFunction::Exp, "x", "exp(x)"),
        (UnaryFunction::Sqrt, "x", "sqrt(x)"),
        (UnaryFunction::Sinh, "x", "sinh(x)"),
    ];
    for (f, input, expected) in cases {
        assert_eq!(a.unary(f, Some(input)).unwrap(), expected, "{}({input})", f.name());
    }
}

#[test]
fn test_unary_errors_name_the_function() {
    let a = adapter();
    for f in UnaryFunction::ALL {
        let err = a.unary(f, Some("1 +")).unwrap_err();
        assert_eq!(err.operation, f.name());
    }
}

#[test]
fn test_integer_functions() {
    let a = adapter();
    assert_eq!(a.gcd(Some("12"), Some("18")).unwrap(), "6");
    assert_eq!(a.lcm(Some("4"), Some("6")).unwrap(), "12");
    assert_eq!(a.factorial(20).unwrap(), "2432902008176640000");
    assert_eq!(a.fibonacci(100).unwrap(), "354224848179261915075");
    assert!(matches!(
        a.gcd(Some("x"), Some("2")).unwrap_err().kind,
        ErrorKind::OperationFailure { .. }
    ));
    assert_eq!(
        a.gcd(None, Some("2")).unwrap_err().to_string(),
        "Error in gcd: null expression"
    );
}

#[test]
fn test_constants() {
    let a = adapter();
    assert_eq!(a.constant(NamedConstant::Pi), "pi");
    assert_eq!(a.constant(NamedConstant::E), "E");
    assert_eq!(a.constant(NamedConstant::EulerGamma), "EulerGamma");
}

#[test]
fn test_error_strings_name_operation_and_stage() {
    let a = adapter();
    let err = a.expand(Some("x +* 2")).unwrap_err();
    assert_eq!(err.operation, "expand");
    assert!(err.to_string().starts_with("Error in expand: parse failed ("));

    let err = a.factorial(-5).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "Error in factorial: input must be between 0 and {}, got -5",
            crate::DEFAULT_MAX_FACTORIAL
        )
    );
}
