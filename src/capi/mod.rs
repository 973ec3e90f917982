//! C API
//!
//! The outermost boundary. Every exported function:
//! - runs inside `catch_unwind`, so no panic crosses into the host
//! - returns an owned string (release with [`symb_free_string`]), a status
//!   code, or a matrix handle (release with `symb_matrix_free`)
//! - reports failures as `Error in <operation>: <cause>` strings, negative
//!   status codes, or the null handle `0`
//!
//! The engine behind it is built once, with limits read from the `SYMB_*`
//! environment variables.

// C API requires unsafe operations with raw pointers
#![allow(clippy::not_unsafe_ptr_arg_deref)]

#[macro_use]
mod macros;

mod expr;
mod matrix;

pub use expr::*;
pub use matrix::*;

use std::ffi::{CStr, CString, c_char};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::LazyLock;

use log::{debug, warn};

use crate::adapter::{ExpressionAdapter, MatrixManager};
use crate::engine::NativeEngine;
use crate::error::{BridgeError, ErrorKind, ParseError};
use crate::matrix::{MatrixHandle, NULL_HANDLE};

/// Status code type for C API
pub type StatusCode = libc::c_int;

/// Operation completed successfully.
pub const SYMB_OK: StatusCode = 0;
/// A null pointer or dead matrix handle was passed where a live one was required.
pub const SYMB_NULL_POINTER: StatusCode = -1;
/// An expression or symbol string could not be parsed.
pub const SYMB_PARSE_ERROR: StatusCode = -2;
/// The engine rejected the operation (bounds, dimensions, range).
pub const SYMB_ENGINE_ERROR: StatusCode = -3;
/// An internal error occurred (a panic was caught).
pub const SYMB_INTERNAL_ERROR: StatusCode = -4;

struct Bridge {
    expressions: ExpressionAdapter<NativeEngine>,
    matrices: MatrixManager<NativeEngine>,
}

static BRIDGE: LazyLock<Bridge> = LazyLock::new(|| {
    let engine = NativeEngine::from_env();
    Bridge {
        expressions: ExpressionAdapter::new(engine.clone()),
        matrices: MatrixManager::new(engine),
    }
});

fn expressions() -> &'static ExpressionAdapter<NativeEngine> {
    &BRIDGE.expressions
}

fn matrices() -> &'static MatrixManager<NativeEngine> {
    &BRIDGE.matrices
}

/// Borrow a nullable C string argument.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives the call.
unsafe fn read_str<'a>(
    op: &'static str,
    ptr: *const c_char,
) -> Result<Option<&'a str>, BridgeError> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(Some)
        .map_err(|_| BridgeError::new(op, ErrorKind::ParseFailure(ParseError::InvalidUtf8)))
}

/// Hand ownership of `text` to the caller
fn into_c_string(text: String) -> *mut c_char {
    CString::new(text)
        .unwrap_or_else(|_| {
            debug!("output contained an interior NUL");
            CString::from(c"conversion_error")
        })
        .into_raw()
}

fn panic_message(info: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Run `f`, returning its result or the contained panic as `Internal`
fn guarded<T>(op: &'static str, f: impl FnOnce() -> Result<T, BridgeError>) -> Result<T, BridgeError> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|panic| {
        warn!("{op}: panic contained at the C boundary: {}", panic_message(&panic));
        Err(BridgeError::internal(op))
    })
}

/// Owned result string; failures become their error message
pub(crate) fn string_result(
    op: &'static str,
    f: impl FnOnce() -> Result<String, BridgeError>,
) -> *mut c_char {
    match guarded(op, f) {
        Ok(text) => into_c_string(text),
        Err(err) => {
            debug!("{err}");
            into_c_string(err.to_string())
        }
    }
}

pub(crate) fn status_code(err: &BridgeError) -> StatusCode {
    match err.kind {
        ErrorKind::InputAbsent(_) => SYMB_NULL_POINTER,
        ErrorKind::ParseFailure(_) => SYMB_PARSE_ERROR,
        ErrorKind::OperationFailure { .. }
        | ErrorKind::Unsupported(_)
        | ErrorKind::RangeInvalid { .. } => SYMB_ENGINE_ERROR,
        ErrorKind::Internal => SYMB_INTERNAL_ERROR,
    }
}

pub(crate) fn status_result(
    op: &'static str,
    f: impl FnOnce() -> Result<(), BridgeError>,
) -> StatusCode {
    match guarded(op, f) {
        Ok(()) => SYMB_OK,
        Err(err) => {
            debug!("{err}");
            status_code(&err)
        }
    }
}

/// New handle, or the null handle on any failure
pub(crate) fn handle_result(
    op: &'static str,
    f: impl FnOnce() -> Result<MatrixHandle, BridgeError>,
) -> MatrixHandle {
    match guarded(op, f) {
        Ok(handle) => handle,
        Err(err) => {
            debug!("{err}");
            NULL_HANDLE
        }
    }
}

/// Release a string returned by any `symb_*` function.
///
/// # Safety
/// `text` must be null or a pointer obtained from this library that has not
/// been released yet.
#[unsafe(no_mangle)]
pub extern "C" fn symb_free_string(text: *mut c_char) {
    if text.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(text));
    }
}

/// Library version as a static string; do not free.
#[unsafe(no_mangle)]
pub extern "C" fn symb_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr().cast()
}

/// Install a `RUST_LOG`-driven logger. Safe to call more than once.
#[unsafe(no_mangle)]
pub extern "C" fn symb_init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();
}
