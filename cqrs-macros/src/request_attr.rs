use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Ident, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream};

/// `#[command(...)]` / `#[query(...)]` 共用参数
/// - `result = Type`：处理器返回类型
/// - `name = "..."`：请求名，默认取结构体名
/// - `debug = true|false`：是否派生 Debug，默认 true
#[derive(Default)]
pub(crate) struct RequestAttrConfig {
    pub(crate) result: Option<Type>,
    pub(crate) name: Option<LitStr>,
    pub(crate) derive_debug: Option<bool>,
}

impl RequestAttrConfig {
    pub(crate) fn name_or(&self, ident: &Ident) -> LitStr {
        self.name
            .clone()
            .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()))
    }
}

impl Parse for RequestAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();

        if input.is_empty() {
            return Ok(cfg);
        }

        let elems: Punctuated<RequestAttrElem, Token![,]> =
            Punctuated::<RequestAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                RequestAttrElem::Result(key, ty) => {
                    if cfg.result.is_some() {
                        return Err(duplicate(&key));
                    }
                    cfg.result = Some(*ty);
                }
                RequestAttrElem::Name(key, lit) => {
                    if cfg.name.is_some() {
                        return Err(duplicate(&key));
                    }
                    if lit.value().trim().is_empty() {
                        return Err(syn::Error::new(lit.span(), "'name' must not be empty"));
                    }
                    cfg.name = Some(lit);
                }
                RequestAttrElem::Debug(key, b) => {
                    if cfg.derive_debug.is_some() {
                        return Err(duplicate(&key));
                    }
                    cfg.derive_debug = Some(b);
                }
            }
        }

        Ok(cfg)
    }
}

fn duplicate(key: &Ident) -> syn::Error {
    syn::Error::new(key.span(), format!("duplicate key '{key}' in attribute"))
}

enum RequestAttrElem {
    Result(Ident, Box<Type>),
    Name(Ident, LitStr),
    Debug(Ident, bool),
}

impl Parse for RequestAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        if key == "result" {
            let ty: Type = input.parse()?;
            Ok(RequestAttrElem::Result(key, Box::new(ty)))
        } else if key == "name" {
            let expr: syn::Expr = input.parse()?;
            match expr {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(lit),
                    ..
                }) => Ok(RequestAttrElem::Name(key, lit)),
                other => Err(syn::Error::new(
                    other.span(),
                    "expected string literal for 'name'",
                )),
            }
        } else if key == "debug" {
            let expr: syn::Expr = input.parse()?;
            match expr {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(b),
                    ..
                }) => Ok(RequestAttrElem::Debug(key, b.value())),
                other => Err(syn::Error::new(
                    other.span(),
                    "expected boolean literal for 'debug'",
                )),
            }
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'result' | 'name' | 'debug'",
            ))
        }
    }
}
