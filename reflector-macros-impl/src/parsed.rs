use proc_macro2::{Delimiter, Group, Span};
use quote::quote;
use std::result::Result;
use unsynn::*;

keyword! {
    KStruct = "struct";
    KEnum = "enum";
    KUnion = "union";
    KPub = "pub";
}

unsynn! {
    /// Visibility: `pub`, `pub(...)` or nothing
    enum Vis {
        PubIn(Cons<KPub, ParenthesisGroup>),
        Pub(KPub),
    }

    /// An outer attribute: `#[...]`
    struct Attribute {
        _pound: Pound,
        content: BracketGroup,
    }

    /// The keyword introducing the type
    enum AdtKeyword {
        Struct(KStruct),
        Enum(KEnum),
        Union(KUnion),
    }

    /// A type declaration, split after its name
    struct AdtDecl {
        attributes: Vec<Attribute>,
        _vis: Option<Vis>,
        keyword: AdtKeyword,
        name: Ident,
        rest: Vec<TokenTree>,
    }
}

/// A compile error to be emitted during code generation
#[derive(Debug, Clone)]
pub struct CompileError {
    /// The error message
    pub message: String,
    /// The span where the error occurred
    pub span: Span,
}

impl CompileError {
    pub(crate) fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// For struct fields, they can either be identifiers (`my_struct.foo`)
/// or literals (`my_struct.2`) for tuple structs.
#[derive(Debug, Clone)]
pub enum IdentOrLiteral {
    /// Named field identifier
    Ident(Ident),
    /// Tuple field index
    Literal(usize),
}

impl quote::ToTokens for IdentOrLiteral {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            IdentOrLiteral::Ident(ident) => tokens.extend(quote! { #ident }),
            IdentOrLiteral::Literal(index) => {
                let unsuffixed = proc_macro2::Literal::usize_unsuffixed(*index);
                tokens.extend(quote! { #unsuffixed })
            }
        }
    }
}

impl std::fmt::Display for IdentOrLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentOrLiteral::Ident(ident) => write!(f, "{ident}"),
            IdentOrLiteral::Literal(index) => write!(f, "{index}"),
        }
    }
}

/// One declared field
#[derive(Debug, Clone)]
pub struct PField {
    /// How to name the field in a place expression
    pub member: IdentOrLiteral,
    /// The declared type, as written
    pub ty: TokenStream,
    /// Span of the first token of the field
    pub span: Span,
}

/// Generic parameters of the struct, ready to be spliced into an impl
#[derive(Debug, Clone, Default)]
pub struct PGenerics {
    /// `<...>` of the impl: parameters with their bounds, defaults removed
    pub params: Vec<TokenStream>,
    /// `<...>` of the type: the parameter names only
    pub args: Vec<TokenStream>,
    /// Whether any type or const parameter is present
    pub has_type_or_const: bool,
}

impl PGenerics {
    /// Whether there is no generic parameter at all
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// A parsed struct declaration
#[derive(Debug, Clone)]
pub struct PStruct {
    /// The struct name
    pub name: Ident,
    /// Generic parameters
    pub generics: PGenerics,
    /// Predicates of the `where` clause, one per entry
    pub predicates: Vec<TokenStream>,
    /// Declared fields, in order
    pub fields: Vec<PField>,
}

impl PStruct {
    /// Parses a derive input, checks it and splits it into generics, predicates
    /// and fields.
    ///
    /// Every problem found in the declaration is reported, not only the first one.
    pub fn parse(input: TokenStream) -> Result<Self, Vec<CompileError>> {
        let mut i = input.to_token_iter();
        match i.parse::<Cons<AdtDecl, EndOfStream>>() {
            Ok(it) => Self::from_decl(it.first),
            Err(err) => Err(vec![CompileError::new(
                format!("could not parse type declaration: {err}"),
                Span::call_site(),
            )]),
        }
    }

    fn from_decl(decl: AdtDecl) -> Result<Self, Vec<CompileError>> {
        let mut errors = Vec::new();
        let name = decl.name;

        match decl.keyword {
            AdtKeyword::Struct(_) => {}
            AdtKeyword::Enum(_) => {
                errors.push(CompileError::new("only structs can be reflected", name.span()));
            }
            AdtKeyword::Union(_) => {
                errors.push(CompileError::new(
                    "union types cannot be reflected",
                    name.span(),
                ));
            }
        }

        if !has_layout_repr(&decl.attributes) {
            errors.push(CompileError::new(
                "reflected type must be #[repr(C)]",
                name.span(),
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let (generics, rest) = match split_generics(&decl.rest) {
            Ok(split) => split,
            Err(err) => return Err(vec![err]),
        };
        let (body, predicates) = match split_body(rest, name.span()) {
            Ok(split) => split,
            Err(err) => return Err(vec![err]),
        };
        let fields = match body {
            Body::Named(group) => named_fields(&group),
            Body::Tuple(group) => Ok(tuple_fields(&group)),
            Body::Unit => Ok(Vec::new()),
        };

        match fields {
            Ok(fields) => Ok(Self {
                name,
                generics,
                predicates,
                fields,
            }),
            Err(err) => Err(vec![err]),
        }
    }
}

enum Body {
    Named(Group),
    Tuple(Group),
    Unit,
}

/// Whether the attributes fix the field order: `#[repr(C)]` or `#[repr(transparent)]`.
fn has_layout_repr(attributes: &[Attribute]) -> bool {
    attributes.iter().any(|attr| {
        let mut tokens = attr.content.0.stream().into_iter();
        match (tokens.next(), tokens.next()) {
            (Some(TokenTree::Ident(ident)), Some(TokenTree::Group(args)))
                if ident == "repr" && args.delimiter() == Delimiter::Parenthesis =>
            {
                args.stream().into_iter().any(|tt| {
                    matches!(&tt, TokenTree::Ident(hint) if hint == "C" || hint == "transparent")
                })
            }
            _ => false,
        }
    })
}

fn is_punct(tt: &TokenTree, ch: char) -> bool {
    matches!(tt, TokenTree::Punct(p) if p.as_char() == ch)
}

/// Splits `tokens` on commas outside of `<...>`.
///
/// Parentheses, brackets and braces are already single token trees, so only angle
/// brackets need tracking; the `>` of `->` does not close one.
pub(crate) fn split_top_level(tokens: &[TokenTree]) -> Vec<Vec<TokenTree>> {
    let mut parts = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    let mut after_dash = false;

    for tt in tokens {
        let dash = is_punct(tt, '-');
        if is_punct(tt, '<') {
            depth += 1;
        } else if is_punct(tt, '>') && !after_dash {
            depth = depth.saturating_sub(1);
        } else if is_punct(tt, ',') && depth == 0 {
            parts.push(std::mem::take(&mut current));
            after_dash = false;
            continue;
        }
        after_dash = dash;
        current.push(tt.clone());
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Takes a leading `<...>` off `rest`.
fn split_generics(rest: &[TokenTree]) -> Result<(PGenerics, &[TokenTree]), CompileError> {
    let Some(first) = rest.first() else {
        return Ok((PGenerics::default(), rest));
    };
    if !is_punct(first, '<') {
        return Ok((PGenerics::default(), rest));
    }

    let mut depth = 0usize;
    let mut after_dash = false;
    let mut end = None;
    for (i, tt) in rest.iter().enumerate() {
        if is_punct(tt, '<') {
            depth += 1;
        } else if is_punct(tt, '>') && !after_dash {
            depth -= 1;
            if depth == 0 {
                end = Some(i);
                break;
            }
        }
        after_dash = is_punct(tt, '-');
    }
    let Some(end) = end else {
        return Err(CompileError::new("unclosed generic parameter list", first.span()));
    };

    let mut generics = PGenerics::default();
    for param in split_top_level(&rest[1..end]) {
        let (param, arg, is_lifetime) = generic_param(&param)?;
        generics.has_type_or_const |= !is_lifetime;
        generics.params.push(param);
        generics.args.push(arg);
    }
    Ok((generics, &rest[end + 1..]))
}

/// Returns the impl form, the argument form and whether the parameter is a lifetime.
fn generic_param(tokens: &[TokenTree]) -> Result<(TokenStream, TokenStream, bool), CompileError> {
    // defaults are not allowed on impl parameters
    let mut depth = 0usize;
    let mut declared = Vec::new();
    for tt in tokens {
        if is_punct(tt, '<') {
            depth += 1;
        } else if is_punct(tt, '>') {
            depth = depth.saturating_sub(1);
        } else if is_punct(tt, '=') && depth == 0 {
            break;
        }
        declared.push(tt.clone());
    }
    let param: TokenStream = declared.into_iter().collect();

    match tokens {
        [TokenTree::Punct(tick), TokenTree::Ident(lifetime), ..] if tick.as_char() == '\'' => {
            Ok((param, quote! { #tick #lifetime }, true))
        }
        [TokenTree::Ident(kw), TokenTree::Ident(name), ..] if kw == "const" => {
            Ok((param, quote! { #name }, false))
        }
        [TokenTree::Ident(name), ..] => Ok((param, quote! { #name }, false)),
        _ => {
            let span = tokens.first().map_or_else(Span::call_site, |tt| tt.span());
            Err(CompileError::new("unsupported generic parameter", span))
        }
    }
}

/// Separates the body from the `where` clause.
fn split_body(rest: &[TokenTree], name_span: Span) -> Result<(Body, Vec<TokenStream>), CompileError> {
    let mut body = None;
    let mut where_tokens = Vec::new();
    let mut in_where = false;

    for (i, tt) in rest.iter().enumerate() {
        match tt {
            TokenTree::Ident(ident) if ident == "where" => in_where = true,
            TokenTree::Group(group) if group.delimiter() == Delimiter::Brace => {
                body = Some(Body::Named(group.clone()));
                break;
            }
            TokenTree::Group(group) if group.delimiter() == Delimiter::Parenthesis && i == 0 => {
                body = Some(Body::Tuple(group.clone()));
            }
            TokenTree::Punct(p) if p.as_char() == ';' => {
                body.get_or_insert(Body::Unit);
                break;
            }
            other if in_where => where_tokens.push(other.clone()),
            other => {
                return Err(CompileError::new("unexpected token in struct declaration", other.span()));
            }
        }
    }

    let Some(body) = body else {
        return Err(CompileError::new("expected a struct body", name_span));
    };
    let predicates = split_top_level(&where_tokens)
        .into_iter()
        .map(|p| p.into_iter().collect())
        .collect();
    Ok((body, predicates))
}

/// Drops leading attributes and visibility from one field.
fn strip_field_prefix(mut tokens: &[TokenTree]) -> &[TokenTree] {
    loop {
        match tokens {
            [pound, TokenTree::Group(g), rest @ ..]
                if is_punct(pound, '#') && g.delimiter() == Delimiter::Bracket =>
            {
                tokens = rest;
            }
            [TokenTree::Ident(kw), TokenTree::Group(g), rest @ ..]
                if kw == "pub" && g.delimiter() == Delimiter::Parenthesis =>
            {
                tokens = rest;
            }
            [TokenTree::Ident(kw), rest @ ..] if kw == "pub" => {
                tokens = rest;
            }
            _ => return tokens,
        }
    }
}

fn named_fields(group: &Group) -> Result<Vec<PField>, CompileError> {
    let tokens: Vec<TokenTree> = group.stream().into_iter().collect();
    split_top_level(&tokens)
        .iter()
        .map(|field| match strip_field_prefix(field) {
            [TokenTree::Ident(name), colon, ty @ ..] if is_punct(colon, ':') && !ty.is_empty() => {
                Ok(PField {
                    member: IdentOrLiteral::Ident(name.clone()),
                    ty: ty.iter().cloned().collect(),
                    span: name.span(),
                })
            }
            other => {
                let span = other
                    .first()
                    .or(field.first())
                    .map_or_else(|| group.span(), |tt| tt.span());
                Err(CompileError::new("expected `name: Type`", span))
            }
        })
        .collect()
}

fn tuple_fields(group: &Group) -> Vec<PField> {
    let tokens: Vec<TokenTree> = group.stream().into_iter().collect();
    split_top_level(&tokens)
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let ty = strip_field_prefix(field);
            PField {
                member: IdentOrLiteral::Literal(index),
                ty: ty.iter().cloned().collect(),
                span: ty.first().map_or_else(|| group.span(), |tt| tt.span()),
            }
        })
        .collect()
}
