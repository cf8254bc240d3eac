use proc_macro2::{Delimiter, TokenStream, TokenTree};

use crate::PStruct;
use crate::process_struct::{emit_errors, process_struct};

/// Recursively flattens transparent groups (groups with `Delimiter::None`) in a token stream.
///
/// Declarative macros wrap captured fragments such as `$ty:ty` in invisible groups;
/// the declaration is easier to split once they are gone.
fn flatten_transparent_groups(input: TokenStream) -> TokenStream {
    input
        .into_iter()
        .flat_map(|tt| match tt {
            TokenTree::Group(group) if group.delimiter() == Delimiter::None => {
                flatten_transparent_groups(group.stream())
            }
            TokenTree::Group(group) => {
                let flattened_stream = flatten_transparent_groups(group.stream());
                let mut new_group = proc_macro2::Group::new(group.delimiter(), flattened_stream);
                new_group.set_span(group.span());
                std::iter::once(TokenTree::Group(new_group)).collect()
            }
            other => std::iter::once(other).collect(),
        })
        .collect()
}

/// Main entry point for `#[derive(Reflect)]`.
pub fn reflect_derive(input: TokenStream) -> TokenStream {
    let input = flatten_transparent_groups(input);

    match PStruct::parse(input) {
        Ok(ps) => process_struct(ps),
        Err(errors) => emit_errors(&errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn invisible_groups_are_flattened() {
        let inner = quote! { pub };
        let group = proc_macro2::Group::new(Delimiter::None, inner);
        let input = quote! { #[repr(C)] #group struct S { x: u8 } };

        let flattened = flatten_transparent_groups(input);
        assert!(
            flattened
                .into_iter()
                .all(|tt| !matches!(tt, TokenTree::Group(g) if g.delimiter() == Delimiter::None))
        );
    }

    #[test]
    fn rejected_declarations_become_compile_errors() {
        let output = reflect_derive(quote! {
            #[repr(C)]
            union Bits { int: u32, float: f32 }
        })
        .to_string();
        assert!(output.contains("compile_error"));
        assert!(output.contains("union types cannot be reflected"));
        assert!(!output.contains("Reflect for"));
    }

    #[test]
    fn unparsable_input_is_reported() {
        let output = reflect_derive(quote! { fn not_a_type() {} }).to_string();
        assert!(output.contains("could not parse type declaration"));
    }

    #[test]
    fn accepted_struct_expands() {
        let output = reflect_derive(quote! {
            #[derive(Clone, Copy)]
            #[repr(C)]
            pub struct Point { pub x: f64, pub y: f64 }
        })
        .to_string();
        assert!(output.contains("unsafe impl :: reflector :: Reflect for Point"));
        assert!(output.contains("impl :: reflector :: Member for Point"));
    }
}
