use super::derived_traits;
use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Expr, ItemFn, ItemStruct, Lit, LitStr, Meta, Token, parse_quote};

const DEFAULT_RENAME: &str = "camelCase";

pub fn expand_model(args: TokenStream, mut input: ItemStruct) -> TokenStream {
    let rename_all = match parse_rename_all(args) {
        Ok(rename) => rename,
        Err(err) => return err.to_compile_error(),
    };

    let derives = derived_traits(&input.attrs);
    let mut missing = Vec::new();
    if !derives.contains("Debug") {
        missing.push(quote! { Debug });
    }
    if !derives.contains("Serialize") {
        missing.push(quote! { ::serde::Serialize });
    }
    if !derives.contains("Deserialize") {
        missing.push(quote! { ::serde::Deserialize });
    }
    let derive_attr = if missing.is_empty() { quote! {} } else { quote! { #[derive(#(#missing),*)] } };

    let schema_attr = if derives.contains("ToSchema") {
        quote! {}
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    };

    let rename_all =
        rename_all.unwrap_or_else(|| LitStr::new(DEFAULT_RENAME, proc_macro2::Span::call_site()));

    // Helper attributes must follow the derives that introduce them.
    input.attrs.push(parse_quote! { #[serde(rename_all = #rename_all)] });

    quote! {
        #derive_attr
        #schema_attr
        #input
    }
}

pub fn expand_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = &input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

fn parse_rename_all(args: TokenStream) -> syn::Result<Option<LitStr>> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
    let mut rename_all = None;

    for meta in metas {
        let Meta::NameValue(pair) = meta else {
            return Err(syn::Error::new_spanned(meta, "expected `rename_all = \"...\"`"));
        };
        if !pair.path.is_ident("rename_all") {
            return Err(syn::Error::new_spanned(pair.path, "only `rename_all` is supported"));
        }
        if rename_all.is_some() {
            return Err(syn::Error::new_spanned(pair, "duplicate `rename_all`"));
        }
        let Expr::Lit(syn::ExprLit { lit: Lit::Str(value), .. }) = &pair.value else {
            return Err(syn::Error::new_spanned(&pair.value, "`rename_all` takes a string literal"));
        };
        rename_all = Some(value.clone());
    }

    Ok(rename_all)
}
