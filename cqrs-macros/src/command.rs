use crate::derive_utils::{apply_derives, derives_serde};
use crate::field_utils::ensure_required_fields;
use crate::request_attr::RequestAttrConfig;
use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Field, Item, Result, Type};

/// #[command] 宏实现
/// - 若缺失则在末尾追加 `status: StatusTracker` 字段；派生了 serde 时附带 `#[serde(skip)]`
/// - 实现 `Request`（NAME 默认为结构体名）、`StatusHolder` 与 `Command`
/// - 参数：`#[command(result = T, name = "...", debug = true|false)]`，`result` 默认 `()`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    let cfg: RequestAttrConfig = syn::parse2(attr)?;
    let input: Item = syn::parse2(item)?;

    let mut st = match input {
        Item::Struct(s) => s,
        other => return Err(syn::Error::new(other.span(), "#[command] only on struct")),
    };

    let skip_serde = derives_serde(&st.attrs);

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return Err(syn::Error::new(
                st.span(),
                "#[command] only supports named-field struct",
            ));
        }
    };

    let status_field: Field = if skip_serde {
        syn::parse_quote! {
            #[serde(skip)]
            status: ::cqrs_common::status::StatusTracker
        }
    } else {
        syn::parse_quote! { status: ::cqrs_common::status::StatusTracker }
    };
    ensure_required_fields(fields_named, vec![status_field]);

    let mut required: Vec<syn::Path> = Vec::new();
    if cfg.derive_debug.unwrap_or(true) {
        required.push(syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let ident = &st.ident;
    let name = cfg.name_or(ident);
    let result_ty: Type = cfg.result.clone().unwrap_or_else(|| syn::parse_quote! { () });
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    Ok(quote! {
        #st

        impl #impl_generics ::cqrs_common::request::Request for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            type Response = #result_ty;
        }

        impl #impl_generics ::cqrs_common::status::StatusHolder for #ident #ty_generics #where_clause {
            fn status_tracker(&self) -> &::cqrs_common::status::StatusTracker { &self.status }

            fn status_tracker_mut(&mut self) -> &mut ::cqrs_common::status::StatusTracker { &mut self.status }
        }

        impl #impl_generics ::cqrs_common::request::Command for #ident #ty_generics #where_clause {}
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_err(attr: TokenStream, item: TokenStream) -> String {
        expand(attr, item).unwrap_err().to_string()
    }

    #[test]
    fn adds_status_field_and_impls() {
        let out = expand(
            quote!(result = u64, name = "books.create"),
            quote!(
                struct CreateBook {
                    title: String,
                }
            ),
        )
        .unwrap()
        .to_string();

        assert!(out.contains("status : :: cqrs_common :: status :: StatusTracker"));
        assert!(out.contains("\"books.create\""));
        assert!(out.contains("type Response = u64"));
        assert!(out.contains("StatusHolder for CreateBook"));
        assert!(out.contains("Command for CreateBook"));
        assert!(!out.contains("serde"));
    }

    #[test]
    fn skips_status_in_serde_and_keeps_existing_field() {
        let out = expand(
            quote!(),
            quote!(
                #[derive(serde::Serialize)]
                struct Archive {
                    id: u32,
                }
            ),
        )
        .unwrap()
        .to_string();
        assert!(out.contains("# [serde (skip)]"));
        assert!(out.contains("const NAME : & 'static str = \"Archive\""));
        assert!(out.contains("type Response = ()"));

        let out = expand(
            quote!(),
            quote!(
                struct Touch {
                    status: ::cqrs_common::status::StatusTracker,
                }
            ),
        )
        .unwrap()
        .to_string();
        assert_eq!(out.matches("status : ").count(), 1);
    }

    #[test]
    fn rejects_enums_and_tuple_structs() {
        assert!(expand_err(quote!(), quote!(enum E { A })).contains("only on struct"));
        assert!(expand_err(quote!(), quote!(struct T(u8);)).contains("named-field"));
    }
}
