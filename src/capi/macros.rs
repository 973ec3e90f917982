//! Macros for the exported unary-function shims
//!
//! Each C symbol has to exist on its own, but they all forward to the single
//! [`ExpressionAdapter::unary`](crate::ExpressionAdapter::unary) template.

/// Generate `symb_<name>(expression)` for each `(name, UnaryFunction variant)` pair
///
/// # Example
/// ```ignore
/// impl_unary_functions!((sin, Sin), (cos, Cos));
/// // Generates: symb_sin, symb_cos
/// ```
macro_rules! impl_unary_functions {
    ($(($name:ident, $variant:ident)),+ $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("`", stringify!($name), "(expression)`; release the result with `symb_free_string`.")]
                #[unsafe(no_mangle)]
                pub extern "C" fn [<symb_ $name>](expression: *const std::ffi::c_char) -> *mut std::ffi::c_char {
                    const OP: &str = stringify!($name);
                    $crate::capi::string_result(OP, || {
                        let expr = unsafe { $crate::capi::read_str(OP, expression) }?;
                        $crate::capi::expressions()
                            .unary($crate::functions::UnaryFunction::$variant, expr)
                    })
                }
            )+
        }
    };
}
