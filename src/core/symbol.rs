//! Symbol names
//!
//! A [`Symbol`] is a validated identifier naming a free variable. Names are
//! reference-counted so cloning a symbol (or an expression holding one) never
//! copies the string.

use std::fmt;
use std::sync::Arc;

use crate::core::expr::Constant;
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Create a symbol, rejecting names that are not identifiers or that
    /// collide with a built-in constant.
    ///
    /// # Example
    /// ```
    /// use symb_bridge::Symbol;
    ///
    /// assert!(Symbol::new("x_1").is_ok());
    /// assert!(Symbol::new("2x").is_err());
    /// assert!(Symbol::new("pi").is_err());
    /// ```
    pub fn new(name: &str) -> Result<Self, ParseError> {
        if is_identifier(name) && Constant::from_name(name).is_none() {
            Ok(Symbol(Arc::from(name)))
        } else {
            Err(ParseError::InvalidSymbol {
                name: name.to_string(),
            })
        }
    }

    /// Create a symbol from a name the lexer already validated
    pub(crate) fn from_identifier(name: &str) -> Self {
        Symbol(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
