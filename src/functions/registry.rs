use crate::Expr;
use crate::core::Number;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Symmetry under negation of the (single) argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Parity {
    /// f(-x) = -f(x)
    Odd,
    /// f(-x) = f(x)
    Even,
    None,
}

/// Definition of a mathematical function including its evaluation and differentiation logic
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin", "gamma")
    pub name: &'static str,

    /// Acceptable argument count (arity)
    pub arity: RangeInclusive<usize>,

    /// Numerical evaluation over the reals; `None` outside the real domain
    pub eval: fn(&[f64]) -> Option<f64>,

    /// Symbolic differentiation function
    /// Arguments: (args of the function call, derivatives of the arguments)
    /// Returns the total derivative dA/dx = sum( (dA/d_arg_i) * (d_arg_i/dx) )
    pub derivative: fn(&[Expr], &[Expr]) -> Expr,

    /// Exact special values (`sin(0) = 0`, `gamma(5) = 24`)
    pub special: fn(&[Expr]) -> Option<Expr>,

    pub parity: Parity,
}

impl FunctionDefinition {
    /// Helper to check if argument count is valid
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }

    /// Value of `name(args)` when it reduces to something simpler than the call itself.
    ///
    /// Tries exact special values first, then numeric evaluation when every
    /// argument is a number and at least one is a float, then odd/even symmetry.
    pub(crate) fn simplify(&self, args: &[Expr]) -> Option<Expr> {
        if let Some(v) = (self.special)(args) {
            return Some(v);
        }

        let numeric = args.iter().all(Expr::is_number)
            && args
                .iter()
                .any(|a| a.as_number().is_some_and(Number::is_float));
        if numeric {
            let values: Vec<f64> = args
                .iter()
                .map(|a| a.as_number().map_or(f64::NAN, Number::to_f64))
                .collect();
            if let Some(v) = (self.eval)(&values)
                && v.is_finite()
            {
                return Some(Expr::float(v));
            }
        }

        if let [arg] = args
            && arg.has_negative_coefficient()
        {
            let flipped = arg.clone().negate();
            return match self.parity {
                Parity::Odd => Some(Expr::func(self.name, vec![flipped]).negate()),
                Parity::Even => Some(Expr::func(self.name, vec![flipped])),
                Parity::None => None,
            };
        }
        None
    }
}

/// Static registry storing all function definitions
static REGISTRY: OnceLock<HashMap<&'static str, FunctionDefinition>> = OnceLock::new();

/// Initialize the registry with all function definitions
fn init_registry() -> HashMap<&'static str, FunctionDefinition> {
    let mut map = HashMap::with_capacity(20);

    for def in crate::functions::definitions::all_definitions() {
        map.insert(def.name, def);
    }

    map
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Get a function definition by name - O(1) HashMap lookup
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }
}
