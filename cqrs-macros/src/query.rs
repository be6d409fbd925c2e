use crate::derive_utils::apply_derives;
use crate::request_attr::RequestAttrConfig;
use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, Result};

/// #[query] 宏实现
/// - 实现 `Request`（NAME 默认为类型名）与 `Query`
/// - 参数：`#[query(result = T, name = "...", debug = true|false)]`，`result` 必填
/// - 支持任意结构体（具名、tuple、unit）
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    let cfg: RequestAttrConfig = syn::parse2(attr)?;
    let input: Item = syn::parse2(item)?;

    let mut st = match input {
        Item::Struct(s) => s,
        other => return Err(syn::Error::new(other.span(), "#[query] only on struct")),
    };

    let Some(result_ty) = cfg.result.clone() else {
        return Err(syn::Error::new(
            st.ident.span(),
            "missing key 'result' in #[query(...)]",
        ));
    };

    let mut required: Vec<syn::Path> = Vec::new();
    if cfg.derive_debug.unwrap_or(true) {
        required.push(syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let ident = &st.ident;
    let name = cfg.name_or(ident);
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    Ok(quote! {
        #st

        impl #impl_generics ::cqrs_common::request::Request for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            type Response = #result_ty;
        }

        impl #impl_generics ::cqrs_common::request::Query for #ident #ty_generics #where_clause {}
    })
}
