use crate::core::{Constant, Symbol};
use crate::error::{ParseError, Span};
use crate::functions::registry::Registry;
use crate::parser::tokens::{Operator, Spanned, Token};
use crate::{Expr, ExprKind};

/// Precedence of unary minus: binds tighter than `*` but looser than `**`,
/// so `-x**2` is `-(x**2)`
const UNARY_PRECEDENCE: u8 = 25;

/// Parse tokens into an expression using the Pratt parsing algorithm
pub(crate) fn parse_expression(
    tokens: &[Spanned],
    max_depth: usize,
    max_nodes: usize,
) -> Result<Expr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::UnexpectedEndOfInput);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
        nodes: 0,
        max_nodes,
    };

    let expr = parser.parse_expr(0)?;

    if let Some(extra) = parser.current_spanned() {
        return Err(match extra.token {
            Token::RightParen => ParseError::UnbalancedParentheses {
                span: Some(extra.span),
            },
            _ => ParseError::UnexpectedToken {
                expected: "end of input".to_string(),
                got: extra.token.to_user_string(),
                span: Some(extra.span),
            },
        });
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
    max_depth: usize,
    nodes: usize,
    max_nodes: usize,
}

impl<'a> Parser<'a> {
    fn current_spanned(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn current(&self) -> Option<&'a Token> {
        self.current_spanned().map(|s| &s.token)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Span of the last token, for errors at end of input
    fn end_span(&self) -> Span {
        self.tokens.last().map_or(Span::default(), |t| t.span)
    }

    fn count_node(&mut self) -> Result<(), ParseError> {
        self.nodes += 1;
        if self.nodes > self.max_nodes {
            return Err(ParseError::MaxNodesExceeded);
        }
        Ok(())
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::MaxDepthExceeded);
        }

        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(spanned) = self.current_spanned() {
            let op = match spanned.token {
                Token::Operator(op) => op,
                _ => break,
            };
            let precedence = op.precedence();

            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, op, spanned.span)?;
        }

        self.depth -= 1;
        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if let Some(Token::RightParen) = self.current() {
            return Ok(args); // Empty argument list
        }

        loop {
            args.push(self.parse_expr(0)?);

            match self.current_spanned() {
                Some(Spanned {
                    token: Token::Comma,
                    ..
                }) => {
                    self.advance(); // consume ,
                }
                Some(Spanned {
                    token: Token::RightParen,
                    ..
                }) => {
                    break;
                }
                Some(other) => {
                    return Err(ParseError::UnexpectedToken {
                        expected: ", or )".to_string(),
                        got: other.token.to_user_string(),
                        span: Some(other.span),
                    });
                }
                None => {
                    return Err(ParseError::UnbalancedParentheses {
                        span: Some(self.end_span()),
                    });
                }
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let Some(spanned) = self.current_spanned() else {
            return Err(ParseError::UnexpectedEndOfInput);
        };
        let span = spanned.span;

        match &spanned.token {
            Token::Number(n) => {
                self.count_node()?;
                self.advance();
                Ok(Expr::number(n.clone()))
            }

            Token::Identifier(name) => {
                self.count_node()?;
                self.advance();

                if let Some(Token::LeftParen) = self.current() {
                    self.advance(); // consume (
                    let args = self.parse_arguments()?;
                    self.advance(); // consume )
                    return build_call(name, args, span);
                }

                Ok(match Constant::from_name(name) {
                    Some(c) => Expr::constant(c),
                    None => Expr::symbol(Symbol::from_identifier(name)),
                })
            }

            Token::Operator(Operator::Sub) => {
                self.count_node()?;
                self.advance();
                let operand = self.parse_expr(UNARY_PRECEDENCE)?;
                Ok(operand.negate())
            }

            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(UNARY_PRECEDENCE)
            }

            Token::LeftParen => {
                self.advance(); // consume (
                let expr = self.parse_expr(0)?;

                match self.current() {
                    Some(Token::RightParen) => {
                        self.advance(); // consume )
                        Ok(expr)
                    }
                    Some(other) => Err(ParseError::UnexpectedToken {
                        expected: ")".to_string(),
                        got: other.to_user_string(),
                        span: self.current_spanned().map(|s| s.span),
                    }),
                    None => Err(ParseError::UnbalancedParentheses { span: Some(span) }),
                }
            }

            Token::RightParen => Err(ParseError::UnbalancedParentheses { span: Some(span) }),

            other => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                got: other.to_user_string(),
                span: Some(span),
            }),
        }
    }

    fn parse_infix(&mut self, left: Expr, op: Operator, span: Span) -> Result<Expr, ParseError> {
        self.count_node()?;
        self.advance(); // consume operator

        // Right-associative for **, left-associative for others
        let next_precedence = if op == Operator::Pow {
            op.precedence()
        } else {
            op.precedence() + 1
        };

        let right = self.parse_expr(next_precedence)?;

        Ok(match op {
            Operator::Add => Expr::sum(vec![left, right]),
            Operator::Sub => Expr::sub_expr(left, right),
            Operator::Mul => Expr::product(vec![left, right]),
            Operator::Div => Expr::div_expr(left, right),
            Operator::Pow => Expr::pow(left, right),
            Operator::Eq => {
                // Only one `=` and only outside parentheses or arguments
                if self.depth > 1 || matches!(left.kind(), ExprKind::Equality(..)) {
                    return Err(ParseError::invalid_syntax_at(
                        "'=' is only allowed once, at the top level",
                        span,
                    ));
                }
                Expr::equality(left, right)
            }
        })
    }
}

/// Resolve `name(args)` to a built-in, an unevaluated derivative, or a user function
fn build_call(name: &str, args: Vec<Expr>, span: Span) -> Result<Expr, ParseError> {
    let name = if name == "ln" { "log" } else { name };

    if name == "Derivative" {
        return build_derivative(args, span);
    }

    let expected = match name {
        "sqrt" | "exp" => Some(1),
        _ => Registry::get(name)
            .filter(|def| !def.validate_arity(args.len()))
            .map(|def| *def.arity.start()),
    };
    match expected {
        Some(n) if n != args.len() => {
            return Err(ParseError::WrongArity {
                name: name.to_string(),
                expected: n,
                got: args.len(),
            });
        }
        _ => {}
    }

    if args.is_empty() {
        return Err(ParseError::invalid_syntax_at(
            format!("function '{name}' needs at least one argument"),
            span,
        ));
    }

    Ok(Expr::func(name, args))
}

/// `Derivative(expr, x, y, ...)`
fn build_derivative(args: Vec<Expr>, span: Span) -> Result<Expr, ParseError> {
    let mut it = args.into_iter();
    let inner = it.next().ok_or(ParseError::WrongArity {
        name: "Derivative".to_string(),
        expected: 2,
        got: 0,
    })?;
    let vars = it
        .map(|v| {
            v.as_symbol().cloned().ok_or_else(|| {
                ParseError::invalid_syntax_at(
                    format!("Derivative variable must be a symbol, got '{v}'"),
                    span,
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if vars.is_empty() {
        return Err(ParseError::WrongArity {
            name: "Derivative".to_string(),
            expected: 2,
            got: 1,
        });
    }
    Ok(Expr::derivative(inner, vars))
}
