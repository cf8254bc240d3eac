use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    /// Attributes, visibility and qualifiers in front of `fn`
    struct Prelude {
        tokens: Any<Cons<Except<KFn>, TokenTree>>,
    }

    /// Generics, arguments and return type, up to the body
    struct Signature {
        tokens: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct TestFn {
        prelude: Prelude,
        _fn: KFn,
        name: Ident,
        signature: Signature,
        body: BraceGroup,
    }
}

impl quote::ToTokens for Prelude {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.tokens.to_tokens(tokens)
    }
}

impl quote::ToTokens for Signature {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.tokens.to_tokens(tokens)
    }
}

fn is_async(prelude: &TokenStream) -> bool {
    prelude
        .clone()
        .into_iter()
        .any(|tt| matches!(&tt, TokenTree::Ident(ident) if ident == "async"))
}

/// Runs `reflector_testhelpers::setup()` before the test body.
///
/// ```ignore
/// #[reflector_testhelpers::test]
/// fn view_writes_through() {
///     // panics print colored backtraces, tracing events reach stderr
/// }
/// ```
///
/// The plain `#[test]` harness cannot drive an `async fn`; name the runtime's
/// attribute instead, e.g. `#[reflector_testhelpers::test(tokio::test)]`.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = TokenStream::from(item);
    let mut tokens = item.to_token_iter();
    let TestFn {
        prelude,
        _fn,
        name,
        signature,
        body,
    } = match tokens.parse::<TestFn>() {
        Ok(test_fn) => test_fn,
        Err(err) => {
            let message = format!("expected a test function: {err}");
            return quote::quote! { ::core::compile_error!(#message); }.into();
        }
    };

    let prelude = quote::quote! { #prelude };
    let test_attr = if attr.is_empty() {
        if is_async(&prelude) {
            let message = format!(
                "`{name}` is async; pass the runtime's test attribute, e.g. `#[reflector_testhelpers::test(tokio::test)]`"
            );
            return quote::quote_spanned! { name.span() => ::core::compile_error!(#message); }
                .into();
        }
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = TokenStream::from(attr);
        quote::quote! { #[#attr] }
    };

    let body = body.0.stream();
    quote::quote! {
        #test_attr
        #prelude fn #name #signature {
            ::reflector_testhelpers::setup();

            #body
        }
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::{TestFn, is_async};
    use unsynn::*;

    fn prelude_of(item: TokenStream) -> TokenStream {
        let mut tokens = item.to_token_iter();
        let test_fn = tokens.parse::<TestFn>().expect("a function should parse");
        let prelude = test_fn.prelude;
        quote::quote! { #prelude }
    }

    #[test]
    fn async_functions_are_recognized() {
        assert!(is_async(&prelude_of(quote::quote! { async fn waits() {} })));
        assert!(is_async(&prelude_of(
            quote::quote! { #[ignore] pub async unsafe fn waits() {} }
        )));
        assert!(!is_async(&prelude_of(quote::quote! { fn runs() {} })));
        assert!(!is_async(&prelude_of(
            quote::quote! { #[doc = "async"] fn runs() -> Result<(), ()> { Ok(()) } }
        )));
    }
}
