#![doc = include_str!("../README.md")]

/// Derives `Reflect` for a `Copy`, `#[repr(C)]` struct.
///
/// See the `reflector` crate documentation for details.
#[proc_macro_derive(Reflect)]
pub fn reflect(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    reflector_macros_impl::reflect_derive(input.into()).into()
}
