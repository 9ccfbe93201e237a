//! Model derive macro implementation

mod attrs;

use crate::common::syn_types::{field_type_name, option_inner};
use attrs::{field_attr, get_table_name};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let table_name = get_table_name(&input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    let mut field_defs = Vec::new();
    for field in fields {
        if !matches!(field.vis, syn::Visibility::Public(_)) {
            continue;
        }
        let attr = field_attr(field)?;
        if attr.skip {
            continue;
        }

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let column = attr
            .column
            .unwrap_or_else(|| ident.unraw().to_string());

        let (inner, nullable) = match option_inner(&field.ty) {
            Some(inner) => (inner, true),
            None => (&field.ty, false),
        };
        let ty = syn::Ident::new(field_type_name(inner), Span::call_site());

        let def = quote! { ::sqlgate::Field::new(#column, ::sqlgate::FieldType::#ty) };
        field_defs.push(if nullable {
            quote! { #def.nullable() }
        } else {
            def
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::sqlgate::Model for #name #ty_generics #where_clause {
            fn schema() -> &'static ::sqlgate::Schema {
                static SCHEMA: ::sqlgate::Schema = ::sqlgate::Schema::new(
                    #table_name,
                    &[#(#field_defs),*],
                );
                &SCHEMA
            }
        }
    })
}
