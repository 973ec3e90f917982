//! Expression Engine Adapter and Matrix Handle Manager
//!
//! The safe core of the boundary: nullable inputs arrive as `Option`, every
//! failure is a [`BridgeError`] naming the operation and the stage, and
//! nothing here touches raw memory. The `capi` module turns these results
//! into owned C strings, status codes and null handles.

use log::debug;
use parking_lot::Mutex;

use crate::engine::{ExpressionEngine, NamedConstant, Solutions};
use crate::error::{BridgeError, EngineError, ErrorKind};
use crate::functions::UnaryFunction;
use crate::matrix::{MatrixArena, MatrixHandle};

/// Text returned when a computed value cannot be rendered
pub const CONVERSION_ERROR: &str = "conversion_error";

fn render_or_sentinel(rendered: Result<String, EngineError>) -> String {
    rendered.unwrap_or_else(|err| {
        debug!("rendering failed: {err}");
        CONVERSION_ERROR.to_string()
    })
}

/// String-in, string-out operations over an [`ExpressionEngine`]
///
/// # Example
/// ```
/// use symb_bridge::{ExpressionAdapter, NativeEngine};
///
/// let adapter = ExpressionAdapter::new(NativeEngine::default());
/// assert_eq!(adapter.evaluate(Some("2+3")).unwrap(), "5");
/// assert_eq!(adapter.solve(Some("x**2 - 4"), Some("x")).unwrap(), "[-2, 2]");
/// assert_eq!(
///     adapter.expand(None).unwrap_err().to_string(),
///     "Error in expand: null expression"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ExpressionAdapter<E> {
    engine: E,
}

impl<E: ExpressionEngine> ExpressionAdapter<E> {
    pub fn new(engine: E) -> Self {
        ExpressionAdapter { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn render(&self, expr: &E::Expr) -> String {
        render_or_sentinel(self.engine.render(expr))
    }

    fn read_expr(&self, op: &'static str, input: Option<&str>) -> Result<E::Expr, BridgeError> {
        let text = input.ok_or_else(|| BridgeError::absent(op, "expression"))?;
        self.engine.parse(text).map_err(|e| BridgeError::parse(op, e))
    }

    fn read_symbol(&self, op: &'static str, input: Option<&str>) -> Result<E::Symbol, BridgeError> {
        let text = input.ok_or_else(|| BridgeError::absent(op, "symbol"))?;
        self.engine
            .parse_symbol(text)
            .map_err(|e| BridgeError::parse(op, e))
    }

    /// Numeric value when there is one, otherwise the expanded expression
    pub fn evaluate(&self, expr: Option<&str>) -> Result<String, BridgeError> {
        const OP: &str = "evaluate";
        let e = self.read_expr(OP, expr)?;
        match self.engine.evalf(&e) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!("{OP}: no numeric value ({err}), expanding instead");
                let expanded = self
                    .engine
                    .expand(&e)
                    .map_err(|e| BridgeError::operation(OP, "expand", e))?;
                Ok(self.render(&expanded))
            }
        }
    }

    fn expand_as(&self, op: &'static str, expr: Option<&str>) -> Result<String, BridgeError> {
        let e = self.read_expr(op, expr)?;
        let expanded = self
            .engine
            .expand(&e)
            .map_err(|e| BridgeError::operation(op, "expand", e))?;
        Ok(self.render(&expanded))
    }

    pub fn expand(&self, expr: Option<&str>) -> Result<String, BridgeError> {
        self.expand_as("expand", expr)
    }

    /// Same transform as [`expand`](Self::expand)
    pub fn simplify(&self, expr: Option<&str>) -> Result<String, BridgeError> {
        self.expand_as("simplify", expr)
    }

    /// Same transform as [`expand`](Self::expand)
    pub fn factor(&self, expr: Option<&str>) -> Result<String, BridgeError> {
        self.expand_as("factor", expr)
    }

    pub fn differentiate(
        &self,
        expr: Option<&str>,
        symbol: Option<&str>,
    ) -> Result<String, BridgeError> {
        const OP: &str = "differentiate";
        let e = self.read_expr(OP, expr)?;
        let var = self.read_symbol(OP, symbol)?;
        let d = self
            .engine
            .diff(&e, &var)
            .map_err(|e| BridgeError::operation(OP, "differentiation", e))?;
        Ok(self.render(&d))
    }

    /// Always [`ErrorKind::Unsupported`]; inputs are not inspected
    pub fn integrate(
        &self,
        _expr: Option<&str>,
        _symbol: Option<&str>,
    ) -> Result<String, BridgeError> {
        Err(BridgeError::unsupported(
            "integrate",
            "integration is not supported by the engine",
        ))
    }

    pub fn substitute(
        &self,
        expr: Option<&str>,
        symbol: Option<&str>,
        value: Option<&str>,
    ) -> Result<String, BridgeError> {
        const OP: &str = "substitute";
        let e = self.read_expr(OP, expr)?;
        let var = self.read_symbol(OP, symbol)?;
        let value = value.ok_or_else(|| BridgeError::absent(OP, "value"))?;
        let value = self
            .engine
            .parse(value)
            .map_err(|e| BridgeError::parse(OP, e))?;
        let result = self
            .engine
            .subs(&e, &var, &value)
            .map_err(|e| BridgeError::operation(OP, "substitution", e))?;
        Ok(self.render(&result))
    }

    /// Roots as `[r1, r2, ...]`; infinite or unsolved sets in the engine's text form
    pub fn solve(&self, expr: Option<&str>, symbol: Option<&str>) -> Result<String, BridgeError> {
        const OP: &str = "solve";
        let e = self.read_expr(OP, expr)?;
        let var = self.read_symbol(OP, symbol)?;
        let solutions = self
            .engine
            .solve_poly(&e, &var)
            .map_err(|e| BridgeError::operation(OP, "solve", e))?;
        Ok(match solutions {
            Solutions::Finite(roots) => {
                let items: Vec<String> = roots.iter().map(|r| self.render(r)).collect();
                format!("[{}]", items.join(", "))
            }
            Solutions::Symbolic(text) => text,
        })
    }

    /// Apply one of the unary transforms (`sin`, `log`, `gamma`, ...)
    pub fn unary(&self, f: UnaryFunction, expr: Option<&str>) -> Result<String, BridgeError> {
        let op = f.name();
        let e = self.read_expr(op, expr)?;
        let result = self
            .engine
            .apply_unary(f, &e)
            .map_err(|e| BridgeError::operation(op, op, e))?;
        Ok(self.render(&result))
    }

    fn binary_integer(
        &self,
        op: &'static str,
        a: Option<&str>,
        b: Option<&str>,
        f: impl FnOnce(&E, &E::Expr, &E::Expr) -> Result<E::Expr, EngineError>,
    ) -> Result<String, BridgeError> {
        let a = self.read_expr(op, a)?;
        let b = self.read_expr(op, b)?;
        let result = f(&self.engine, &a, &b).map_err(|e| BridgeError::operation(op, op, e))?;
        Ok(self.render(&result))
    }

    pub fn gcd(&self, a: Option<&str>, b: Option<&str>) -> Result<String, BridgeError> {
        self.binary_integer("gcd", a, b, E::gcd)
    }

    pub fn lcm(&self, a: Option<&str>, b: Option<&str>) -> Result<String, BridgeError> {
        self.binary_integer("lcm", a, b, E::lcm)
    }

    fn checked_count(op: &'static str, n: i64, max: u64) -> Result<u64, BridgeError> {
        u64::try_from(n)
            .ok()
            .filter(|n| *n <= max)
            .ok_or_else(|| BridgeError::new(op, ErrorKind::RangeInvalid { value: n, max }))
    }

    pub fn factorial(&self, n: i64) -> Result<String, BridgeError> {
        const OP: &str = "factorial";
        let n = Self::checked_count(OP, n, self.engine.config().max_factorial)?;
        let result = self
            .engine
            .factorial(n)
            .map_err(|e| BridgeError::operation(OP, OP, e))?;
        Ok(self.render(&result))
    }

    pub fn fibonacci(&self, n: i64) -> Result<String, BridgeError> {
        const OP: &str = "fibonacci";
        let n = Self::checked_count(OP, n, self.engine.config().max_fibonacci)?;
        let result = self
            .engine
            .fibonacci(n)
            .map_err(|e| BridgeError::operation(OP, OP, e))?;
        Ok(self.render(&result))
    }

    pub fn constant(&self, c: NamedConstant) -> String {
        self.render(&self.engine.constant(c))
    }

    /// Smoke test: `2 + 3`
    pub fn test_basic_operations(&self) -> Result<String, BridgeError> {
        self.expand_as("test", Some("2 + 3"))
    }

    /// Smoke test: expansion of `x**2 + 2*x + 1`
    pub fn test_symbolic(&self) -> Result<String, BridgeError> {
        self.expand_as("test", Some("x**2 + 2*x + 1"))
    }
}

/// Owner of every live matrix handle
///
/// Matrices are cloned out of the arena before heavy work so the lock is
/// only held for lookups and inserts.
pub struct MatrixManager<E: ExpressionEngine> {
    engine: E,
    arena: Mutex<MatrixArena<E::Matrix>>,
}

impl<E: ExpressionEngine> MatrixManager<E> {
    pub fn new(engine: E) -> Self {
        MatrixManager {
            engine,
            arena: Mutex::new(MatrixArena::new()),
        }
    }

    /// Number of handles not yet freed
    pub fn live_handles(&self) -> usize {
        self.arena.lock().len()
    }

    fn snapshot(&self, op: &'static str, handle: MatrixHandle) -> Result<E::Matrix, BridgeError> {
        self.arena
            .lock()
            .get(handle)
            .cloned()
            .ok_or_else(|| BridgeError::absent(op, "matrix"))
    }

    pub fn create(&self, rows: i64, cols: i64) -> Result<MatrixHandle, BridgeError> {
        let m = self
            .engine
            .matrix_new(rows, cols)
            .map_err(|e| BridgeError::operation("matrix_new", "construction", e))?;
        Ok(self.arena.lock().insert(m))
    }

    /// Release a handle; returns whether it was live
    pub fn free(&self, handle: MatrixHandle) -> bool {
        self.arena.lock().remove(handle).is_some()
    }

    /// The one mutating operation: parse `value` and store it at `(row, col)`
    pub fn set_element(
        &self,
        handle: MatrixHandle,
        row: i64,
        col: i64,
        value: Option<&str>,
    ) -> Result<(), BridgeError> {
        const OP: &str = "matrix_set";
        let value = value.ok_or_else(|| BridgeError::absent(OP, "value"))?;
        if self.arena.lock().get(handle).is_none() {
            return Err(BridgeError::absent(OP, "matrix"));
        }
        let value = self
            .engine
            .parse(value)
            .map_err(|e| BridgeError::parse(OP, e))?;
        let mut arena = self.arena.lock();
        let m = arena
            .get_mut(handle)
            .ok_or_else(|| BridgeError::absent(OP, "matrix"))?;
        self.engine
            .matrix_set(m, row, col, value)
            .map_err(|e| BridgeError::operation(OP, "set element", e))
    }

    pub fn get_element(
        &self,
        handle: MatrixHandle,
        row: i64,
        col: i64,
    ) -> Result<String, BridgeError> {
        const OP: &str = "matrix_get";
        let arena = self.arena.lock();
        let m = arena
            .get(handle)
            .ok_or_else(|| BridgeError::absent(OP, "matrix"))?;
        let e = self
            .engine
            .matrix_get(m, row, col)
            .map_err(|e| BridgeError::operation(OP, "get element", e))?;
        Ok(render_or_sentinel(self.engine.render(&e)))
    }

    pub fn render(&self, handle: MatrixHandle) -> Result<String, BridgeError> {
        const OP: &str = "matrix_str";
        let arena = self.arena.lock();
        let m = arena
            .get(handle)
            .ok_or_else(|| BridgeError::absent(OP, "matrix"))?;
        Ok(render_or_sentinel(self.engine.matrix_render(m)))
    }

    pub fn det(&self, handle: MatrixHandle) -> Result<String, BridgeError> {
        const OP: &str = "matrix_det";
        let m = self.snapshot(OP, handle)?;
        let d = self
            .engine
            .matrix_det(&m)
            .map_err(|e| BridgeError::operation(OP, "determinant", e))?;
        Ok(render_or_sentinel(self.engine.render(&d)))
    }

    pub fn inv(&self, handle: MatrixHandle) -> Result<MatrixHandle, BridgeError> {
        const OP: &str = "matrix_inv";
        let m = self.snapshot(OP, handle)?;
        let inverse = self
            .engine
            .matrix_inv(&m)
            .map_err(|e| BridgeError::operation(OP, "inverse", e))?;
        Ok(self.arena.lock().insert(inverse))
    }

    fn binary(
        &self,
        op: &'static str,
        stage: &'static str,
        a: MatrixHandle,
        b: MatrixHandle,
        f: impl FnOnce(&E, &E::Matrix, &E::Matrix) -> Result<E::Matrix, EngineError>,
    ) -> Result<MatrixHandle, BridgeError> {
        let (a, b) = {
            let arena = self.arena.lock();
            let a = arena.get(a).cloned();
            let b = arena.get(b).cloned();
            (a, b)
        };
        let (Some(a), Some(b)) = (a, b) else {
            return Err(BridgeError::absent(op, "matrix"));
        };
        let result = f(&self.engine, &a, &b).map_err(|e| BridgeError::operation(op, stage, e))?;
        Ok(self.arena.lock().insert(result))
    }

    pub fn add(&self, a: MatrixHandle, b: MatrixHandle) -> Result<MatrixHandle, BridgeError> {
        self.binary("matrix_add", "addition", a, b, E::matrix_add)
    }

    pub fn mul(&self, a: MatrixHandle, b: MatrixHandle) -> Result<MatrixHandle, BridgeError> {
        self.binary("matrix_mul", "multiplication", a, b, E::matrix_mul)
    }
}
