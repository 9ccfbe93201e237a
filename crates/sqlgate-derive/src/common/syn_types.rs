//! Type helper utilities for syn type analysis.

/// Extract the inner type T from Option<T>, or return None if not an Option type.
///
/// Recognizes `Option<T>`, `std::option::Option<T>`, and `core::option::Option<T>`.
pub fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    if seg.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    let syn::GenericArgument::Type(inner) = args.args.first()? else {
        return None;
    };
    Some(inner)
}

/// Broad column kind of a Rust field type, named after `sqlgate::FieldType`.
///
/// Matching is on the last path segment, so `chrono::DateTime<Utc>` and
/// `DateTime<Utc>` are the same. `Vec<u8>` is bytes; anything unrecognized
/// is `Other`.
pub fn field_type_name(ty: &syn::Type) -> &'static str {
    let syn::Type::Path(type_path) = ty else {
        return "Other";
    };
    let Some(seg) = type_path.path.segments.last() else {
        return "Other";
    };
    match seg.ident.to_string().as_str() {
        "bool" => "Bool",
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" => "Integer",
        "f32" | "f64" => "Float",
        "String" | "str" => "Text",
        "DateTime" | "NaiveDateTime" => "Timestamp",
        "Vec" if is_byte_vec(seg) => "Bytes",
        _ => "Other",
    }
}

fn is_byte_vec(seg: &syn::PathSegment) -> bool {
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return false;
    };
    matches!(
        args.args.first(),
        Some(syn::GenericArgument::Type(syn::Type::Path(p))) if p.path.is_ident("u8")
    )
}
