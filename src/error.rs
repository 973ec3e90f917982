//! Error types
//!
//! Two layers live here. [`ParseError`] and [`EngineError`] are produced by the
//! engine itself; [`BridgeError`] is what the adapter layer reports, classified
//! by [`ErrorKind`] and rendered as `Error in <operation>: <cause>`.

use thiserror::Error;

/// Source location span for error reporting
/// Represents a range of bytes in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map_or(String::new(), |s| s.display())
}

/// Errors raised while turning text into an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Formula cannot be empty")]
    EmptyFormula,

    #[error("Invalid syntax: {msg}{}", span_suffix(.span))]
    InvalidSyntax { msg: String, span: Option<Span> },

    #[error("Invalid number format: '{value}'{}", span_suffix(.span))]
    InvalidNumber { value: String, span: Option<Span> },

    #[error("Invalid token: '{token}'{}", span_suffix(.span))]
    InvalidToken { token: String, span: Option<Span> },

    #[error("Expected '{expected}', but got '{got}'{}", span_suffix(.span))]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },

    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("Unbalanced parentheses{}", span_suffix(.span))]
    UnbalancedParentheses { span: Option<Span> },

    #[error("'{name}' is not a valid symbol name")]
    InvalidSymbol { name: String },

    #[error("Function '{name}' expects {expected} argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Input is not valid UTF-8")]
    InvalidUtf8,

    #[error("Expression nesting depth exceeds maximum limit")]
    MaxDepthExceeded,

    #[error("Expression size exceeds maximum node count limit")]
    MaxNodesExceeded,
}

impl ParseError {
    /// Create InvalidSyntax without span
    pub fn invalid_syntax(msg: impl Into<String>) -> Self {
        ParseError::InvalidSyntax {
            msg: msg.into(),
            span: None,
        }
    }

    /// Create InvalidSyntax with span
    pub fn invalid_syntax_at(msg: impl Into<String>, span: Span) -> Self {
        ParseError::InvalidSyntax {
            msg: msg.into(),
            span: Some(span),
        }
    }

    /// Create InvalidToken with span
    pub fn invalid_token_at(token: impl Into<String>, span: Span) -> Self {
        ParseError::InvalidToken {
            token: token.into(),
            span: Some(span),
        }
    }
}

/// Errors raised by engine operations on already-parsed input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("expression is not numeric: {0}")]
    NotNumeric(String),

    #[error("expression is not a polynomial in {symbol}")]
    NotPolynomial { symbol: String },

    #[error("expected an integer, got {0}")]
    NotInteger(String),

    #[error("result exceeds {limit} terms")]
    TooLarge { limit: usize },

    #[error("index ({row}, {col}) is out of bounds for a {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },

    #[error("matrix dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: i64, cols: i64 },

    #[error("matrix of {rows}x{cols} exceeds the limit of {limit} elements")]
    TooManyElements {
        rows: usize,
        cols: usize,
        limit: usize,
    },

    #[error("dimension mismatch: {left_rows}x{left_cols} and {right_rows}x{right_cols}")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("matrix is not square ({rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },

    #[error("matrix is singular")]
    Singular,

    #[error("symbolic matrix of size {size} exceeds the limit of {limit}")]
    MatrixTooLarge { size: usize, limit: usize },
}

/// Classification of a failure seen by the adapter layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A required string or handle argument was not supplied
    #[error("null {0}")]
    InputAbsent(&'static str),

    /// A supplied expression or symbol could not be parsed
    #[error("parse failed ({0})")]
    ParseFailure(ParseError),

    /// The engine accepted the input but the transform itself failed
    #[error("{stage} failed ({source})")]
    OperationFailure {
        stage: &'static str,
        source: EngineError,
    },

    /// The capability does not exist in the engine interface
    #[error("{0}")]
    Unsupported(&'static str),

    /// A plain integer argument is outside the accepted domain
    #[error("input must be between 0 and {max}, got {value}")]
    RangeInvalid { value: i64, max: u64 },

    /// A panic was contained at the boundary
    #[error("internal error")]
    Internal,
}

/// Adapter-level error: which operation failed, and how
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error in {operation}: {kind}")]
pub struct BridgeError {
    pub operation: &'static str,
    pub kind: ErrorKind,
}

impl BridgeError {
    pub fn new(operation: &'static str, kind: ErrorKind) -> Self {
        BridgeError { operation, kind }
    }

    pub fn absent(operation: &'static str, what: &'static str) -> Self {
        Self::new(operation, ErrorKind::InputAbsent(what))
    }

    /// Classify an engine error raised while reading inputs.
    ///
    /// Anything that is not a parse error still counts as a parse-stage
    /// failure, since no operation has been attempted yet.
    pub fn parse(operation: &'static str, err: EngineError) -> Self {
        match err {
            EngineError::Parse(p) => Self::new(operation, ErrorKind::ParseFailure(p)),
            other => Self::operation(operation, "parse", other),
        }
    }

    pub fn operation(operation: &'static str, stage: &'static str, source: EngineError) -> Self {
        Self::new(operation, ErrorKind::OperationFailure { stage, source })
    }

    pub fn unsupported(operation: &'static str, detail: &'static str) -> Self {
        Self::new(operation, ErrorKind::Unsupported(detail))
    }

    pub fn internal(operation: &'static str) -> Self {
        Self::new(operation, ErrorKind::Internal)
    }
}
