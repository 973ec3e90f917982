//! Dense matrix of expressions
//!
//! Matrices whose entries are all numbers use exact elimination over
//! [`Number`]; anything symbolic falls back to cofactor expansion, which is
//! only attempted up to a configured dimension.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::core::Number;
use crate::error::EngineError;
use crate::ops::expand;
use crate::Expr;

/// Largest number of elements a matrix may hold
pub const MAX_ELEMENTS: usize = 1 << 20;

/// Dense matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    /// Matrix entries in row-major order.
    data: Vec<Expr>,
    num_rows: usize,
    num_cols: usize,
}

impl DenseMatrix {
    /// Creates a matrix filled with zeros.
    ///
    /// Both dimensions must be positive and the element count at most
    /// [`MAX_ELEMENTS`].
    pub fn zeros(rows: i64, cols: i64) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidDimensions { rows, cols };
        let num_rows = usize::try_from(rows).ok().filter(|r| *r > 0).ok_or_else(invalid)?;
        let num_cols = usize::try_from(cols).ok().filter(|c| *c > 0).ok_or_else(invalid)?;
        let len = num_rows
            .checked_mul(num_cols)
            .filter(|len| *len <= MAX_ELEMENTS)
            .ok_or(EngineError::TooManyElements {
                rows: num_rows,
                cols: num_cols,
                limit: MAX_ELEMENTS,
            })?;
        Ok(Self {
            data: vec![Expr::zero(); len],
            num_rows,
            num_cols,
        })
    }

    /// Builds a matrix from rows of equal length.
    pub fn from_rows(rows: Vec<Vec<Expr>>) -> Result<Self, EngineError> {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        if num_rows == 0 || num_cols == 0 || rows.iter().any(|r| r.len() != num_cols) {
            return Err(EngineError::InvalidDimensions {
                rows: num_rows as i64,
                cols: num_cols as i64,
            });
        }
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            num_rows,
            num_cols,
        })
    }

    fn identity(n: usize) -> Self {
        let mut m = Self {
            data: vec![Expr::zero(); n * n],
            num_rows: n,
            num_cols: n,
        };
        for i in 0..n {
            m[(i, i)] = Expr::one();
        }
        m
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn is_square(&self) -> bool {
        self.num_rows == self.num_cols
    }

    fn checked_index(&self, row: i64, col: i64) -> Result<usize, EngineError> {
        let out_of_bounds = || EngineError::IndexOutOfBounds {
            row,
            col,
            rows: self.num_rows,
            cols: self.num_cols,
        };
        let r = usize::try_from(row)
            .ok()
            .filter(|r| *r < self.num_rows)
            .ok_or_else(out_of_bounds)?;
        let c = usize::try_from(col)
            .ok()
            .filter(|c| *c < self.num_cols)
            .ok_or_else(out_of_bounds)?;
        Ok(r * self.num_cols + c)
    }

    pub fn get(&self, row: i64, col: i64) -> Result<&Expr, EngineError> {
        let idx = self.checked_index(row, col)?;
        Ok(&self.data[idx])
    }

    pub fn set(&mut self, row: i64, col: i64, value: Expr) -> Result<(), EngineError> {
        let idx = self.checked_index(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    fn mismatch(&self, other: &Self) -> EngineError {
        EngineError::DimensionMismatch {
            left_rows: self.num_rows,
            left_cols: self.num_cols,
            right_rows: other.num_rows,
            right_cols: other.num_cols,
        }
    }

    /// Element-wise sum; shapes must match
    pub fn add(&self, other: &Self) -> Result<Self, EngineError> {
        if self.num_rows != other.num_rows || self.num_cols != other.num_cols {
            return Err(self.mismatch(other));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| Expr::sum(vec![a.clone(), b.clone()]))
            .collect();
        Ok(Self {
            data,
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        })
    }

    /// Matrix product; requires `self.cols == other.rows`
    pub fn mul(&self, other: &Self) -> Result<Self, EngineError> {
        if self.num_cols != other.num_rows {
            return Err(self.mismatch(other));
        }
        let mut data = Vec::with_capacity(self.num_rows * other.num_cols);
        for i in 0..self.num_rows {
            for j in 0..other.num_cols {
                let terms = (0..self.num_cols)
                    .map(|k| Expr::product(vec![self[(i, k)].clone(), other[(k, j)].clone()]))
                    .collect();
                data.push(Expr::sum(terms));
            }
        }
        Ok(Self {
            data,
            num_rows: self.num_rows,
            num_cols: other.num_cols,
        })
    }

    fn require_square(&self) -> Result<usize, EngineError> {
        if self.is_square() {
            Ok(self.num_rows)
        } else {
            Err(EngineError::NotSquare {
                rows: self.num_rows,
                cols: self.num_cols,
            })
        }
    }

    /// All entries as numbers, if they are
    fn numeric_entries(&self) -> Option<Vec<Number>> {
        self.data.iter().map(|e| e.as_number().cloned()).collect()
    }

    /// Determinant. A singular matrix has determinant `0`; only a non-square
    /// or oversized symbolic matrix is an error.
    pub fn det(&self, max_symbolic_dim: usize, max_terms: usize) -> Result<Expr, EngineError> {
        let n = self.require_square()?;
        if let Some(entries) = self.numeric_entries() {
            return Ok(Expr::number(numeric_det(entries, n)));
        }
        if n > max_symbolic_dim {
            return Err(EngineError::MatrixTooLarge {
                size: n,
                limit: max_symbolic_dim,
            });
        }
        let rows: Vec<usize> = (0..n).collect();
        let cols: Vec<usize> = (0..n).collect();
        expand(&self.cofactor_det(&rows, &cols), max_terms)
    }

    /// Inverse. Fails with [`EngineError::Singular`] when no inverse exists.
    pub fn inv(&self, max_symbolic_dim: usize, max_terms: usize) -> Result<Self, EngineError> {
        let n = self.require_square()?;
        if let Some(entries) = self.numeric_entries() {
            let inverse = numeric_inverse(entries, n).ok_or(EngineError::Singular)?;
            return Ok(Self {
                data: inverse.into_iter().map(Expr::number).collect(),
                num_rows: n,
                num_cols: n,
            });
        }
        if n > max_symbolic_dim {
            return Err(EngineError::MatrixTooLarge {
                size: n,
                limit: max_symbolic_dim,
            });
        }

        let all: Vec<usize> = (0..n).collect();
        let det = expand(&self.cofactor_det(&all, &all), max_terms)?;
        if det.is_zero() {
            return Err(EngineError::Singular);
        }
        if n == 1 {
            return Ok(Self {
                data: vec![det.recip()],
                num_rows: 1,
                num_cols: 1,
            });
        }

        // inv = adj / det, adj[j][i] = (-1)^(i+j) * minor(i, j)
        let inv_det = det.recip();
        let mut result = Self::identity(n);
        for i in 0..n {
            for j in 0..n {
                let rows: Vec<usize> = all.iter().copied().filter(|r| *r != i).collect();
                let cols: Vec<usize> = all.iter().copied().filter(|c| *c != j).collect();
                let minor = expand(&self.cofactor_det(&rows, &cols), max_terms)?;
                let sign = if (i + j) % 2 == 0 { 1 } else { -1 };
                result[(j, i)] =
                    Expr::product(vec![Expr::integer(sign), minor, inv_det.clone()]);
            }
        }
        Ok(result)
    }

    /// Laplace expansion along the first of `rows`
    fn cofactor_det(&self, rows: &[usize], cols: &[usize]) -> Expr {
        match (rows, cols) {
            ([r], [c]) => self[(*r, *c)].clone(),
            ([r0, r1], [c0, c1]) => Expr::sub_expr(
                Expr::product(vec![self[(*r0, *c0)].clone(), self[(*r1, *c1)].clone()]),
                Expr::product(vec![self[(*r0, *c1)].clone(), self[(*r1, *c0)].clone()]),
            ),
            _ => {
                let (first, rest_rows) = (rows[0], &rows[1..]);
                let mut terms = Vec::with_capacity(cols.len());
                for (k, &c) in cols.iter().enumerate() {
                    let entry = &self[(first, c)];
                    if entry.is_zero() {
                        continue;
                    }
                    let sub_cols: Vec<usize> =
                        cols.iter().copied().filter(|&other| other != c).collect();
                    let sign = if k % 2 == 0 { 1 } else { -1 };
                    terms.push(Expr::product(vec![
                        Expr::integer(sign),
                        entry.clone(),
                        self.cofactor_det(rest_rows, &sub_cols),
                    ]));
                }
                Expr::sum(terms)
            }
        }
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = Expr;

    fn index(&self, (row, col): (usize, usize)) -> &Expr {
        &self.data[row * self.num_cols + col]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Expr {
        &mut self.data[row * self.num_cols + col]
    }
}

/// One bracketed row per line: `[1, 2]\n[3, 4]\n`
impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.num_cols) {
            let items: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(f, "[{}]", items.join(", "))?;
        }
        Ok(())
    }
}

/// Gaussian elimination with row swaps
fn numeric_det(mut a: Vec<Number>, n: usize) -> Number {
    let mut det = Number::one();
    for col in 0..n {
        let Some(pivot_row) = (col..n).find(|&r| !a[r * n + col].is_zero()) else {
            return Number::zero();
        };
        if pivot_row != col {
            for c in 0..n {
                a.swap(pivot_row * n + c, col * n + c);
            }
            det = det.neg();
        }
        let pivot = a[col * n + col].clone();
        det = det.mul(&pivot);
        for r in (col + 1)..n {
            let Some(factor) = a[r * n + col].div(&pivot) else {
                return Number::zero();
            };
            if factor.is_zero() {
                continue;
            }
            for c in col..n {
                a[r * n + c] = a[r * n + c].sub(&factor.mul(&a[col * n + c]));
            }
        }
    }
    det
}

/// Gauss-Jordan on `[A | I]`; `None` when a column has no pivot
fn numeric_inverse(a: Vec<Number>, n: usize) -> Option<Vec<Number>> {
    let width = 2 * n;
    let mut aug = vec![Number::zero(); n * width];
    for r in 0..n {
        for c in 0..n {
            aug[r * width + c] = a[r * n + c].clone();
        }
        aug[r * width + n + r] = Number::one();
    }

    for col in 0..n {
        let pivot_row = (col..n).find(|&r| !aug[r * width + col].is_zero())?;
        if pivot_row != col {
            for c in 0..width {
                aug.swap(pivot_row * width + c, col * width + c);
            }
        }
        let scale = aug[col * width + col].recip()?;
        for c in 0..width {
            aug[col * width + c] = aug[col * width + c].mul(&scale);
        }
        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = aug[r * width + col].clone();
            if factor.is_zero() {
                continue;
            }
            for c in 0..width {
                aug[r * width + c] = aug[r * width + c].sub(&factor.mul(&aug[col * width + c]));
            }
        }
    }

    Some(
        (0..n)
            .flat_map(|r| (0..n).map(move |c| (r, c)))
            .map(|(r, c)| aug[r * width + n + c].clone())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn matrix(rows: &[&[&str]]) -> DenseMatrix {
        DenseMatrix::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|s| parse(s).unwrap()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_zeros_rejects_non_positive() {
        assert!(DenseMatrix::zeros(0, 2).is_err());
        assert!(DenseMatrix::zeros(2, -1).is_err());
        let m = DenseMatrix::zeros(2, 3).unwrap();
        assert_eq!(m.to_string(), "[0, 0, 0]\n[0, 0, 0]\n");
    }

    #[test]
    fn test_zeros_rejects_oversized() {
        assert_eq!(
            DenseMatrix::zeros(100_000, 100_000),
            Err(EngineError::TooManyElements {
                rows: 100_000,
                cols: 100_000,
                limit: MAX_ELEMENTS,
            })
        );
        assert!(matches!(
            DenseMatrix::zeros(2048, 1024),
            Err(EngineError::TooManyElements { .. })
        ));
    }

    #[test]
    fn test_get_set_bounds() {
        let mut m = DenseMatrix::zeros(2, 2).unwrap();
        m.set(1, 0, parse("x").unwrap()).unwrap();
        assert_eq!(m.get(1, 0).unwrap().to_string(), "x");
        assert!(matches!(
            m.get(2, 0),
            Err(EngineError::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            m.set(-1, 0, Expr::one()),
            Err(EngineError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_numeric_det() {
        assert_eq!(matrix(&[&["1", "2"], &["3", "4"]]).det(8, 10_000).unwrap().to_string(), "-2");
        assert_eq!(
            matrix(&[&["0", "1", "2"], &["1", "0", "3"], &["4", "-3", "8"]])
                .det(8, 10_000)
                .unwrap()
                .to_string(),
            "-2"
        );
        assert!(matrix(&[&["1", "2"], &["2", "4"]]).det(8, 10_000).unwrap().is_zero());
    }

    #[test]
    fn test_symbolic_det() {
        let m = matrix(&[&["a", "b"], &["c", "d"]]);
        assert_eq!(m.det(8, 10_000).unwrap().to_string(), "a*d - b*c");
        assert!(matches!(
            m.det(1, 10_000),
            Err(EngineError::MatrixTooLarge { .. })
        ));
    }

    #[test]
    fn test_numeric_inverse() {
        let inv = matrix(&[&["1", "2"], &["3", "4"]]).inv(8, 10_000).unwrap();
        assert_eq!(inv.to_string(), "[-2, 1]\n[3/2, -1/2]\n");
        assert_eq!(
            matrix(&[&["1", "2"], &["2", "4"]]).inv(8, 10_000),
            Err(EngineError::Singular)
        );
    }

    #[test]
    fn test_symbolic_inverse() {
        let inv = matrix(&[&["x", "0"], &["0", "2"]]).inv(8, 10_000).unwrap();
        assert_eq!(inv.to_string(), "[1/x, 0]\n[0, 1/2]\n");
    }

    #[test]
    fn test_non_square() {
        let m = DenseMatrix::zeros(2, 3).unwrap();
        assert!(matches!(m.det(8, 10_000), Err(EngineError::NotSquare { .. })));
        assert!(matches!(m.inv(8, 10_000), Err(EngineError::NotSquare { .. })));
    }

    #[test]
    fn test_add_and_mul() {
        let a = matrix(&[&["1", "2"], &["3", "4"]]);
        let b = matrix(&[&["x", "0"], &["0", "1"]]);
        assert_eq!(a.add(&b).unwrap().to_string(), "[1 + x, 2]\n[3, 5]\n");
        assert_eq!(a.mul(&b).unwrap().to_string(), "[x, 2]\n[3*x, 4]\n");
        let c = DenseMatrix::zeros(3, 1).unwrap();
        assert!(matches!(a.add(&c), Err(EngineError::DimensionMismatch { .. })));
        assert!(matches!(a.mul(&c), Err(EngineError::DimensionMismatch { .. })));
    }
}
