//! Dense symbolic matrices and the handle arena that owns them

mod arena;
mod dense;

pub use arena::{MatrixArena, MatrixHandle, NULL_HANDLE};
pub use dense::{DenseMatrix, MAX_ELEMENTS};
