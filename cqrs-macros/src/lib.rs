mod command;
mod derive_utils;
mod field_utils;
mod query;
mod request_attr;

use proc_macro::TokenStream;

/// 命令宏
/// - 追加字段：`status: StatusTracker`（若缺失）
/// - 实现 `::cqrs_common::request::{Request, Command}` 与 `::cqrs_common::status::StatusHolder`
/// - 参数：`#[command(result = T, name = "...", debug = true|false)]`
///
/// 与 `#[derive(...)]` 同用时请把 `#[command]` 写在最上方，以便识别 serde 派生。
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    command::expand(attr.into(), item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 查询宏
/// - 实现 `::cqrs_common::request::{Request, Query}`
/// - 参数：`#[query(result = T, name = "...", debug = true|false)]`
#[proc_macro_attribute]
pub fn query(attr: TokenStream, item: TokenStream) -> TokenStream {
    query::expand(attr.into(), item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
