//! Implicit multiplication insertion for natural notation
//!
//! Inserts `*` operators between tokens where multiplication is implied, e.g. `2x` → `2 * x`.

use crate::core::Constant;
use crate::parser::tokens::{Operator, Spanned, Token};

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    match (current, next) {
        // Identifier * (: a call, unless the name is a constant (pi(x+1) → pi * (x+1))
        (Token::Identifier(name), Token::LeftParen) => Constant::from_name(name).is_some(),

        // Coalesced arms for standard multiplication cases:
        // Number * Identifier: 2x
        // Number * (: 2(x)
        // Identifier * Identifier: x y
        // Identifier * Number: x 2
        // ) * Identifier: )x
        // ) * Number: )2
        // ) * (: )(
        (Token::Number(_) | Token::Identifier(_) | Token::RightParen, Token::Identifier(_))
        | (Token::Number(_) | Token::RightParen, Token::LeftParen)
        | (Token::Identifier(_) | Token::RightParen, Token::Number(_)) => true,

        _ => false,
    }
}

/// Insert implicit multiplication operators between appropriate tokens
///
/// Rules:
/// - Number * Identifier: `2 x` → `2 * x`
/// - Identifier * Identifier: `a x` → `a * x`
/// - ) * Identifier/Number/(: `(a) x` → `(a) * x`
/// - Number * (: `2 (y)` → `2 * (y)`
///
/// Exception: an identifier followed by ( is a function call
pub(crate) fn insert_implicit_multiplication(tokens: Vec<Spanned>) -> Vec<Spanned> {
    let needs_insertion = tokens
        .windows(2)
        .any(|w| should_insert_mul(&w[0].token, &w[1].token));

    if !needs_insertion {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();

    while let Some(current) = it.next() {
        let inserted = it
            .peek()
            .filter(|next| should_insert_mul(&current.token, &next.token))
            .map(|next| Spanned::new(Token::Operator(Operator::Mul), next.span));

        result.push(current);
        if let Some(mul) = inserted {
            result.push(mul);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Number;
    use crate::error::Span;

    fn spanned(tokens: Vec<Token>) -> Vec<Spanned> {
        tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| Spanned::new(t, Span::at(i)))
            .collect()
    }

    fn has_mul_at(result: &[Spanned], i: usize) -> bool {
        matches!(result[i].token, Token::Operator(Operator::Mul))
    }

    #[test]
    fn test_number_identifier() {
        let tokens = spanned(vec![
            Token::Number(Number::integer(2)),
            Token::Identifier("x".into()),
        ]);
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(has_mul_at(&result, 1));
    }

    #[test]
    fn test_paren_paren() {
        let tokens = spanned(vec![Token::RightParen, Token::LeftParen]);
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(has_mul_at(&result, 1));
    }

    #[test]
    fn test_function_call_untouched() {
        let tokens = spanned(vec![Token::Identifier("f".into()), Token::LeftParen]);
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_constant_before_paren_multiplies() {
        let tokens = spanned(vec![Token::Identifier("pi".into()), Token::LeftParen]);
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(has_mul_at(&result, 1));
    }
}
