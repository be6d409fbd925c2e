use syn::{Field, FieldsNamed, Token, punctuated::Punctuated};

pub(crate) fn has_field_named(fields: &FieldsNamed, name: &str) -> bool {
    fields
        .named
        .iter()
        .any(|f| f.ident.as_ref().map(|i| i == name).unwrap_or(false))
}

/// 确保具名字段结构体包含所需字段
/// - 缺失的字段按给定顺序追加在末尾；已存在的同名字段保持原定义与位置
/// - 返回实际追加的字段数
pub(crate) fn ensure_required_fields(fields_named: &mut FieldsNamed, required: Vec<Field>) -> usize {
    let mut added = 0;
    let mut new_named: Punctuated<Field, Token![,]> = fields_named.named.clone();

    for field in required {
        let exists = field
            .ident
            .as_ref()
            .map(|i| has_field_named(fields_named, &i.to_string()))
            .unwrap_or(false);
        if !exists {
            new_named.push(field);
            added += 1;
        }
    }

    fields_named.named = new_named;
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_only_missing_fields() {
        let mut fields: FieldsNamed = syn::parse_quote!({ title: String, status: u8 });
        let added = ensure_required_fields(
            &mut fields,
            vec![
                syn::parse_quote!(status: Tracker),
                syn::parse_quote!(extra: bool),
            ],
        );

        assert_eq!(added, 1);
        let names: Vec<String> = fields
            .named
            .iter()
            .filter_map(|f| f.ident.as_ref().map(|i| i.to_string()))
            .collect();
        assert_eq!(names, vec!["title", "status", "extra"]);
    }
}
