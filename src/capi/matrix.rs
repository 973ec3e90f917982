//! Exported matrix functions
//!
//! Matrices live in an arena behind integer handles. Every handle returned
//! here, including results of `inv`, `add` and `mul`, must be released once
//! with [`symb_matrix_free`]. A failed constructor returns `0`.

use std::ffi::{c_char, c_int};

use log::debug;

use super::{
    StatusCode, guarded, handle_result, matrices, read_str, status_result, string_result,
};
use crate::matrix::{MatrixHandle, NULL_HANDLE};

/// New `rows x cols` matrix of zeros, or `0` unless both are positive.
#[unsafe(no_mangle)]
pub extern "C" fn symb_matrix_new(rows: c_int, cols: c_int) -> MatrixHandle {
    handle_result("matrix_new", || {
        matrices().create(i64::from(rows), i64::from(cols))
    })
}

/// Release a matrix handle. Unknown and null handles are ignored.
#[unsafe(no_mangle)]
pub extern "C" fn symb_matrix_free(handle: MatrixHandle) {
    let freed = guarded("matrix_free", || Ok(matrices().free(handle)));
    if handle != NULL_HANDLE && !matches!(freed, Ok(true)) {
        debug!("matrix_free: handle {handle:#x} was not live");
    }
}

/// Parse `value` into element `(row, col)`.
///
/// Returns `SYMB_OK`, `SYMB_NULL_POINTER` for a null value or dead handle,
/// `SYMB_PARSE_ERROR`, or `SYMB_ENGINE_ERROR` for an out-of-range index.
#[unsafe(no_mangle)]
pub extern "C" fn symb_matrix_set_element(
    handle: MatrixHandle,
    row: c_int,
    col: c_int,
    value: *const c_char,
) -> StatusCode {
    const OP: &str = "matrix_set";
    status_result(OP, || {
        let value = unsafe { read_str(OP, value) }?;
        matrices().set_element(handle, i64::from(row), i64::from(col), value)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_matrix_get_element(
    handle: MatrixHandle,
    row: c_int,
    col: c_int,
) -> *mut c_char {
    string_result("matrix_get", || {
        matrices().get_element(handle, i64::from(row), i64::from(col))
    })
}

/// One bracketed line per row.
#[unsafe(no_mangle)]
pub extern "C" fn symb_matrix_to_string(handle: MatrixHandle) -> *mut c_char {
    string_result("matrix_str", || matrices().render(handle))
}

#[unsafe(no_mangle)]
pub extern "C" fn symb_matrix_det(handle: MatrixHandle) -> *mut c_char {
    string_result("matrix_det", || matrices().det(handle))
}

/// Inverse as a new handle; `0` for a singular or non-square matrix.
#[unsafe(no_mangle)]
pub extern "C" fn symb_matrix_inv(handle: MatrixHandle) -> MatrixHandle {
    handle_result("matrix_inv", || matrices().inv(handle))
}

/// `a + b` as a new handle; neither operand changes.
#[unsafe(no_mangle)]
pub extern "C" fn symb_matrix_add(a: MatrixHandle, b: MatrixHandle) -> MatrixHandle {
    handle_result("matrix_add", || matrices().add(a, b))
}

/// `a * b` as a new handle; neither operand changes.
#[unsafe(no_mangle)]
pub extern "C" fn symb_matrix_mul(a: MatrixHandle, b: MatrixHandle) -> MatrixHandle {
    handle_result("matrix_mul", || matrices().mul(a, b))
}
