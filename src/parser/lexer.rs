//! Lexer: source text to spanned tokens
//!
//! Integer literals stay exact; anything with a decimal point or exponent
//! becomes a float.

use num_bigint::BigInt;

use crate::core::Number;
use crate::error::{ParseError, Span};
use crate::parser::tokens::{Operator, Spanned, Token};

pub(crate) fn lex(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::with_capacity(input.len() / 2 + 1);
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit))
        {
            let (number, end) = lex_number(input, start)?;
            tokens.push(Spanned::new(Token::Number(number), Span::new(start, end)));
            pos = end;
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            tokens.push(Spanned::new(
                Token::Identifier(input[start..pos].to_string()),
                Span::new(start, pos),
            ));
            continue;
        }

        let (token, len) = match c {
            b'*' if bytes.get(pos + 1) == Some(&b'*') => (Token::Operator(Operator::Pow), 2),
            b'=' if bytes.get(pos + 1) == Some(&b'=') => (Token::Operator(Operator::Eq), 2),
            b'*' => (Token::Operator(Operator::Mul), 1),
            b'^' => (Token::Operator(Operator::Pow), 1),
            b'+' => (Token::Operator(Operator::Add), 1),
            b'-' => (Token::Operator(Operator::Sub), 1),
            b'/' => (Token::Operator(Operator::Div), 1),
            b'=' => (Token::Operator(Operator::Eq), 1),
            b'(' => (Token::LeftParen, 1),
            b')' => (Token::RightParen, 1),
            b',' => (Token::Comma, 1),
            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(ParseError::invalid_token_at(
                    ch.to_string(),
                    Span::new(start, start + ch.len_utf8()),
                ));
            }
        };
        tokens.push(Spanned::new(token, Span::new(start, start + len)));
        pos += len;
    }

    Ok(tokens)
}

/// Scan `digits [. digits] [(e|E) [+-] digits]` starting at `start`
fn lex_number(input: &str, start: usize) -> Result<(Number, usize), ParseError> {
    let bytes = input.as_bytes();
    let mut pos = start;
    let mut is_float = false;

    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'.' {
        is_float = true;
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    // An exponent needs at least one digit, otherwise `2e` is `2*e`
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut look = pos + 1;
        if look < bytes.len() && (bytes[look] == b'+' || bytes[look] == b'-') {
            look += 1;
        }
        if look < bytes.len() && bytes[look].is_ascii_digit() {
            is_float = true;
            pos = look;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }

    let text = &input[start..pos];
    let invalid = || ParseError::InvalidNumber {
        value: text.to_string(),
        span: Some(Span::new(start, pos)),
    };
    let number = if is_float {
        let value: f64 = text.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Number::float(value)
    } else {
        Number::from_bigint(text.parse::<BigInt>().map_err(|_| invalid())?)
    };
    Ok((number, pos))
}
