//! Derive macros for Courier.
//!
//! - `#[derive(Message)]` - marks a type as a message
//! - `#[derive(Request)]` - marks a type as a request, with the response
//!   declared by `#[request(response = Type)]` (defaults to `()`)

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, DeriveInput, Ident, Token, Type,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Derive macro for implementing `Message` trait.
#[proc_macro_derive(Message)]
pub fn derive_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::courier::Message for #name #ty_generics #where_clause {}
    };

    TokenStream::from(expanded)
}

/// Derive macro for implementing `Message` and `Request`.
///
/// ```rust,ignore
/// #[derive(Request)]
/// #[request(response = String)]
/// struct Greet { name: String }
///
/// #[derive(Request)] // Response = ()
/// struct Shutdown;
/// ```
#[proc_macro_derive(Request, attributes(request))]
pub fn derive_request(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let args = match RequestArgs::from_attrs(&input.attrs) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let response = match args.response {
        Some(ty) => quote! { #ty },
        None => quote! { () },
    };

    let expanded = quote! {
        impl #impl_generics ::courier::Message for #name #ty_generics #where_clause {}

        impl #impl_generics ::courier::Request for #name #ty_generics #where_clause {
            type Response = #response;
        }
    };

    TokenStream::from(expanded)
}

struct RequestArgs {
    response: Option<Type>,
}

impl RequestArgs {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut response = None;
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("request")) {
            let parsed: RequestArgs = attr.parse_args()?;
            if parsed.response.is_some() {
                if response.is_some() {
                    return Err(syn::Error::new_spanned(attr, "duplicate `response` argument"));
                }
                response = parsed.response;
            }
        }
        Ok(Self { response })
    }
}

impl Parse for RequestArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut response = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "response" => {
                    let ty: Type = input.parse()?;
                    response = Some(ty);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(RequestArgs { response })
    }
}
