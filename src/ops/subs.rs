//! Symbol substitution

use crate::core::Symbol;
use crate::{Expr, ExprKind};

/// Replace every occurrence of `var` in `expr` with `value`, re-canonicalizing
/// on the way back up so `sin(x)` with `x = 0` becomes `0`.
///
/// Inside `Derivative(f, .., var, ..)` the variable is bound: it is renamed
/// when `value` is itself a symbol and left alone otherwise.
pub fn subs(expr: &Expr, var: &Symbol, value: &Expr) -> Expr {
    if !expr.contains_symbol(var) {
        return expr.clone();
    }
    match expr.kind() {
        ExprKind::Symbol(s) if s == var => value.clone(),
        ExprKind::Derivative { inner, vars } if vars.contains(var) => match value.as_symbol() {
            Some(new_var) => {
                let renamed = vars
                    .iter()
                    .map(|v| if v == var { new_var.clone() } else { v.clone() })
                    .collect();
                Expr::derivative(subs(inner, var, value), renamed)
            }
            None => expr.clone(),
        },
        _ => expr.map_children(|child| subs(child, var, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn sub(input: &str, value: &str) -> String {
        let x = Symbol::new("x").unwrap();
        subs(&parse(input).unwrap(), &x, &parse(value).unwrap()).to_string()
    }

    #[test]
    fn test_numeric_substitution_folds() {
        assert_eq!(sub("x**2 + 1", "3"), "10");
        assert_eq!(sub("sin(x)", "0"), "0");
        assert_eq!(sub("x/y", "2"), "2/y");
    }

    #[test]
    fn test_symbolic_substitution() {
        assert_eq!(sub("x + y", "y"), "2*y");
        assert_eq!(sub("x**2", "a + 1"), "(1 + a)**2");
    }

    #[test]
    fn test_derivative_variable_is_bound() {
        assert_eq!(sub("Derivative(f(x), x)", "t"), "Derivative(f(t), t)");
        assert_eq!(sub("Derivative(f(x), x)", "2"), "Derivative(f(x), x)");
    }
}
