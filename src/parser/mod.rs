//! Parser module - converts strings to expressions
//!
//! Pipeline: lex -> implicit multiplication -> Pratt parse. Every node is
//! built through the canonical constructors, so the result is already in
//! normal form.
mod implicit_mul;
mod lexer;
mod pratt;
mod tokens;

use crate::config::EngineConfig;
use crate::core::Symbol;
use crate::error::ParseError;
use crate::Expr;

/// Parse a formula with the default limits
///
/// # Example
/// ```
/// use symb_bridge::parse;
///
/// let expr = parse("x^2 + 2x + 1").unwrap();
/// assert_eq!(expr.to_string(), "1 + 2*x + x**2");
/// ```
///
/// # Errors
/// Returns `ParseError` if the input is empty, contains invalid syntax,
/// has unbalanced parentheses or calls a built-in with the wrong arity.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    parse_with(input, &EngineConfig::default())
}

/// Parse a formula, enforcing the depth and node limits of `config`
///
/// # Errors
/// As [`parse`], plus `MaxDepthExceeded` and `MaxNodesExceeded`.
pub fn parse_with(input: &str, config: &EngineConfig) -> Result<Expr, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::EmptyFormula);
    }

    let tokens = lexer::lex(input)?;
    let tokens = implicit_mul::insert_implicit_multiplication(tokens);
    pratt::parse_expression(&tokens, config.max_depth, config.max_nodes)
}

/// Parse a bare symbol name, ignoring surrounding whitespace
///
/// # Errors
/// `EmptyFormula` for blank input, `InvalidSymbol` for anything that is not
/// a plain identifier or that names a constant.
pub fn parse_symbol(input: &str) -> Result<Symbol, ParseError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(ParseError::EmptyFormula);
    }
    Symbol::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(input: &str) -> String {
        parse(input).unwrap().to_string()
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(show("1 + 2*3"), "7");
        assert_eq!(show("2**3**2"), "512");
        assert_eq!(show("-x**2"), "-x**2");
        assert_eq!(show("x^2"), "x**2");
        assert_eq!(show("x - y"), "x - y");
        assert_eq!(show("x/2"), "x/2");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(show("2x"), "2*x");
        assert_eq!(show("2(x + 1)"), "2 + 2*x");
        assert_eq!(show("x y"), "x*y");
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(show("sin(x)"), "sin(x)");
        assert_eq!(show("ln(x)"), "log(x)");
        assert_eq!(show("exp(x)"), "exp(x)");
        assert_eq!(show("sqrt(4)"), "2");
        assert_eq!(show("cos(pi)"), "-1");
        assert_eq!(show("f(x, y)"), "f(x, y)");
        assert_eq!(show("Derivative(f(x), x)"), "Derivative(f(x), x)");
    }

    #[test]
    fn test_equality() {
        assert_eq!(show("x = 2"), "x = 2");
        assert_eq!(show("x**2 == 4"), "x**2 = 4");
        assert!(parse("(x = 1) + 2").is_err());
        assert!(parse("a = b = c").is_err());
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("   "), Err(ParseError::EmptyFormula));
        assert!(matches!(
            parse("(x + 1"),
            Err(ParseError::UnbalancedParentheses { .. })
        ));
        assert!(matches!(
            parse("x + 1)"),
            Err(ParseError::UnbalancedParentheses { .. })
        ));
        assert!(matches!(
            parse("x +"),
            Err(ParseError::UnexpectedEndOfInput)
        ));
        assert!(matches!(
            parse("sin(x, y)"),
            Err(ParseError::WrongArity { .. })
        ));
        assert!(matches!(parse("x $ y"), Err(ParseError::InvalidToken { .. })));
    }

    #[test]
    fn test_limits() {
        let config = EngineConfig::new().max_depth(5);
        let deep = format!("{}x{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(parse_with(&deep, &config), Err(ParseError::MaxDepthExceeded));

        let config = EngineConfig::new().max_nodes(10);
        let long = vec!["x"; 20].join(" + ");
        assert_eq!(parse_with(&long, &config), Err(ParseError::MaxNodesExceeded));
    }

    #[test]
    fn test_parse_symbol() {
        assert_eq!(parse_symbol(" x ").unwrap().name(), "x");
        assert!(parse_symbol("x + 1").is_err());
        assert!(parse_symbol("").is_err());
    }
}
