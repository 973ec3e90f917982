//! Engine limits
//!
//! Builder-style configuration for [`NativeEngine`](crate::NativeEngine), with
//! optional overrides from the process environment.

use log::warn;

/// Default maximum AST depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum AST node count (also bounds expansion output)
pub const DEFAULT_MAX_NODES: usize = 10_000;
/// Largest `n` accepted by `factorial`
pub const DEFAULT_MAX_FACTORIAL: u64 = 10_000;
/// Largest `n` accepted by `fibonacci`
pub const DEFAULT_MAX_FIBONACCI: u64 = 100_000;
/// Largest dimension for cofactor-based symbolic determinants and inverses
pub const DEFAULT_MAX_SYMBOLIC_MATRIX_DIM: usize = 8;
/// Largest estimated size, in bits, of an exact power evaluated eagerly
pub const DEFAULT_MAX_EXACT_BITS: u64 = 1 << 18;

/// Limits applied by the engine to keep every call bounded
///
/// # Example
/// ```
/// use symb_bridge::EngineConfig;
///
/// let config = EngineConfig::new().max_depth(50).max_factorial(500);
/// assert_eq!(config.max_depth, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_depth: usize,
    pub max_nodes: usize,
    pub max_factorial: u64,
    pub max_fibonacci: u64,
    pub max_symbolic_matrix_dim: usize,
    pub max_exact_bits: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        EngineConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            max_factorial: DEFAULT_MAX_FACTORIAL,
            max_fibonacci: DEFAULT_MAX_FIBONACCI,
            max_symbolic_matrix_dim: DEFAULT_MAX_SYMBOLIC_MATRIX_DIM,
            max_exact_bits: DEFAULT_MAX_EXACT_BITS,
        }
    }

    /// Defaults, overridden by `SYMB_MAX_DEPTH`, `SYMB_MAX_NODES`,
    /// `SYMB_MAX_FACTORIAL`, `SYMB_MAX_FIBONACCI` and `SYMB_MAX_EXACT_BITS`
    /// when they hold positive integers.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        if let Some(v) = read_positive(&lookup, "SYMB_MAX_DEPTH") {
            config.max_depth = v as usize;
        }
        if let Some(v) = read_positive(&lookup, "SYMB_MAX_NODES") {
            config.max_nodes = v as usize;
        }
        if let Some(v) = read_positive(&lookup, "SYMB_MAX_FACTORIAL") {
            config.max_factorial = v;
        }
        if let Some(v) = read_positive(&lookup, "SYMB_MAX_FIBONACCI") {
            config.max_fibonacci = v;
        }
        if let Some(v) = read_positive(&lookup, "SYMB_MAX_EXACT_BITS") {
            config.max_exact_bits = v;
        }
        config
    }

    /// Set maximum AST depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set maximum AST node count
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    pub fn max_factorial(mut self, n: u64) -> Self {
        self.max_factorial = n;
        self
    }

    pub fn max_fibonacci(mut self, n: u64) -> Self {
        self.max_fibonacci = n;
        self
    }

    pub fn max_symbolic_matrix_dim(mut self, dim: usize) -> Self {
        self.max_symbolic_matrix_dim = dim;
        self
    }

    /// Set the bit bound above which exact powers stay unevaluated
    pub fn max_exact_bits(mut self, bits: u64) -> Self {
        self.max_exact_bits = bits;
        self
    }
}

fn read_positive<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            warn!("ignoring {key}={raw:?}: expected a positive integer");
            None
        }
    }
}
