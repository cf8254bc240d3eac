//! Code generation for `#[derive(Reflect)]` on structs.
//!
//! For
//!
//! ```ignore
//! #[derive(Clone, Copy, Reflect)]
//! #[repr(C)]
//! struct Circle {
//!     center: Point,
//!     radius: f64,
//! }
//! ```
//!
//! the derive emits an `unsafe impl Reflect` whose `Fields` folds every field type
//! through `Member::Flatten`, one `Anchor` per declared field carrying its real
//! offset, an `impl Member` so `Circle` can itself be a field, and, for types
//! without type or const parameters, a `const _` item that validates the
//! descriptor at the definition site.

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::{
    CapturedType, CompileError, FieldCounter, FieldTypeExtractor, FieldTypeRegistry, PStruct,
};

pub(crate) fn emit_errors(errors: &[CompileError]) -> TokenStream {
    let errors = errors.iter().map(|e| {
        let msg = &e.message;
        let span = e.span;
        quote_spanned! { span => ::core::compile_error!(#msg); }
    });
    quote! { #(#errors)* }
}

/// Captures the field types of `ps`, in declaration order.
fn capture_field_types(ps: &PStruct) -> Result<Vec<CapturedType>, CompileError> {
    let count = FieldCounter::default().count(&ps.fields)?;

    let mut registry = FieldTypeRegistry::new(count);
    FieldTypeExtractor::default().extract(&ps.fields, &mut registry);

    registry.sequence().map_err(|index| {
        CompileError::new(
            format!("could not capture the type of field {index}"),
            ps.name.span(),
        )
    })
}

/// Implements `Reflect` and `Member` for a parsed struct.
pub(crate) fn process_struct(ps: PStruct) -> TokenStream {
    let captured = match capture_field_types(&ps) {
        Ok(captured) => captured,
        Err(err) => return emit_errors(&[err]),
    };

    let name = &ps.name;
    let params = &ps.generics.params;
    let args = &ps.generics.args;
    let user_predicates = &ps.predicates;

    let tys: Vec<&TokenStream> = captured.iter().map(|c| &c.ty).collect();

    let fields_ty = tys.iter().rev().fold(quote! { ::reflector::HNil }, |tail, ty| {
        quote! { <#ty as ::reflector::Member>::Flatten<#tail> }
    });

    let member_bounds = captured.iter().map(|c| {
        let ty = &c.ty;
        let span = c.span;
        quote_spanned! { span => #ty: ::reflector::Member }
    });

    let anchors = captured.iter().map(|c| {
        let ty = &c.ty;
        let member = &c.member;
        quote! {
            ::reflector::Anchor::new::<#ty>(::core::mem::offset_of!(Self, #member))
        }
    });

    let trivial_bound = quote_spanned! { name.span() => Self: ::reflector::Trivial };

    let (impl_generics, self_ty) = if ps.generics.is_empty() {
        (quote! {}, quote! { #name })
    } else {
        (quote! { <#(#params),*> }, quote! { #name<#(#args),*> })
    };

    let validation = if ps.generics.has_type_or_const {
        quote! {}
    } else {
        let concrete = if args.is_empty() {
            quote! { #name }
        } else {
            let lifetimes = args.iter().map(|_| quote! { 'static });
            quote! { #name<#(#lifetimes),*> }
        };
        quote! {
            const _: () = ::reflector::Descriptor::<#concrete>::ASSERT_COMPATIBLE;
        }
    };

    quote! {
        #[automatically_derived]
        unsafe impl #impl_generics ::reflector::Reflect for #self_ty
        where
            #(#user_predicates,)*
            #(#member_bounds,)*
            #trivial_bound,
        {
            type Fields = #fields_ty;

            const MECHANISM: ::reflector::Mechanism = ::reflector::Mechanism::Automatic;

            const ANCHORS: &'static [::reflector::Anchor] = &[#(#anchors),*];
        }

        #[automatically_derived]
        impl #impl_generics ::reflector::Member for #self_ty
        where
            #(#user_predicates,)*
        {
            type Flatten<Tail: ::reflector::FieldList> = ::reflector::HCons<Self, Tail>;
        }

        #validation
    }
}
