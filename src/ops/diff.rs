//! Differentiation engine - applies calculus rules
//!
//! Results are built through the canonical constructors, so `0 + x → x` and
//! `1 * x → x` fall out of construction instead of a separate pass.

use crate::core::{Constant, Symbol};
use crate::functions::registry::Registry;
use crate::{Expr, ExprKind};

/// Derivative of `expr` with respect to `var`
pub fn diff(expr: &Expr, var: &Symbol) -> Expr {
    expr.derive(var)
}

impl Expr {
    pub(crate) fn derive(&self, var: &Symbol) -> Expr {
        if !self.contains_symbol(var) {
            return Expr::zero();
        }

        match self.kind() {
            // Base cases
            ExprKind::Number(_) | ExprKind::Constant(_) => Expr::zero(),

            ExprKind::Symbol(s) => {
                if s == var {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }

            // Sum rule
            ExprKind::Sum(terms) => Expr::sum(terms.iter().map(|t| t.derive(var)).collect()),

            // Product rule: (f*g*h)' = f'*g*h + f*g'*h + f*g*h'
            ExprKind::Product(factors) => {
                let mut terms = Vec::with_capacity(factors.len());
                for (i, factor) in factors.iter().enumerate() {
                    let prime = factor.derive(var);
                    if prime.is_zero() {
                        continue;
                    }
                    let mut product: Vec<Expr> = Vec::with_capacity(factors.len());
                    product.push(prime);
                    product.extend(
                        factors
                            .iter()
                            .enumerate()
                            .filter(|(j, _)| *j != i)
                            .map(|(_, f)| (**f).clone()),
                    );
                    terms.push(Expr::product(product));
                }
                Expr::sum(terms)
            }

            ExprKind::Pow(base, exp) => {
                let base = &**base;
                let exp = &**exp;
                let base_prime = base.derive(var);
                let exp_prime = exp.derive(var);

                if exp_prime.is_zero() {
                    // Power rule: (u^n)' = n * u^(n-1) * u'
                    let reduced = Expr::pow(base.clone(), exp.clone() - Expr::one());
                    return Expr::product(vec![exp.clone(), reduced, base_prime]);
                }

                let power = self.clone();
                if base_prime.is_zero() {
                    // Exponential rule: (a^v)' = a^v * ln(a) * v'
                    let log_base = log_of(base);
                    return Expr::product(vec![power, log_base, exp_prime]);
                }

                // General rule: (u^v)' = u^v * (v' * ln(u) + v * u' / u)
                let inner = Expr::sum(vec![
                    Expr::product(vec![exp_prime, log_of(base)]),
                    Expr::product(vec![exp.clone(), base_prime, base.clone().recip()]),
                ]);
                Expr::product(vec![power, inner])
            }

            // Function call
            ExprKind::FunctionCall { name, args } => {
                // Check Registry (built-in functions like sin, cos, etc.)
                if let Some(def) = Registry::get(name)
                    && def.validate_arity(args.len())
                {
                    let plain_args: Vec<Expr> = args.iter().map(|a| (**a).clone()).collect();
                    let arg_primes: Vec<Expr> = args.iter().map(|a| a.derive(var)).collect();
                    return (def.derivative)(&plain_args, &arg_primes);
                }

                // Unknown function - stays symbolic
                Expr::derivative(self.clone(), vec![var.clone()])
            }

            ExprKind::Derivative { inner, vars } => {
                let mut vars = vars.clone();
                vars.push(var.clone());
                Expr::derivative((**inner).clone(), vars)
            }

            ExprKind::Equality(lhs, rhs) => Expr::equality(lhs.derive(var), rhs.derive(var)),
        }
    }
}

/// `log(u)`, with `log(E)` folding to 1 through the registry
fn log_of(u: &Expr) -> Expr {
    if u.is_constant(Constant::E) {
        return Expr::one();
    }
    Expr::func("log", vec![u.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn d(input: &str) -> String {
        let x = Symbol::new("x").unwrap();
        diff(&parse(input).unwrap(), &x).to_string()
    }

    #[test]
    fn test_polynomial() {
        assert_eq!(d("x**3 + 2*x"), "2 + 3*x**2");
        assert_eq!(d("y"), "0");
        assert_eq!(d("5"), "0");
        assert_eq!(d("x*y"), "y");
    }

    #[test]
    fn test_chain_rule_with_registry() {
        assert_eq!(d("sin(x)"), "cos(x)");
        assert_eq!(d("sin(2*x)"), "2*cos(2*x)");
        assert_eq!(d("log(x)"), "1/x");
    }

    #[test]
    fn test_exponentials() {
        assert_eq!(d("exp(x)"), "exp(x)");
        assert_eq!(d("exp(3*x)"), "3*exp(3*x)");
    }

    #[test]
    fn test_reciprocal() {
        assert_eq!(d("1/x"), "-1/x**2");
    }

    #[test]
    fn test_user_function_stays_symbolic() {
        assert_eq!(d("f(x)"), "Derivative(f(x), x)");
        assert_eq!(d("f(y)"), "0");
    }
}
