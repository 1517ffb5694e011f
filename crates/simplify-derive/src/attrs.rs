//! Attribute parsing shared by the derives.
//!
//! Struct level: `#[simplify(table = "User", naming = "pascal")]`.
//! Field level: `#[simplify(column = "user_name")]`, `#[simplify(relation)]`
//! or `#[simplify(skip)]`.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

/// Struct-level options.
#[derive(Default)]
pub(crate) struct StructAttr {
    pub table: Option<String>,
    pub naming: Option<syn::LitStr>,
}

impl syn::parse::Parse for StructAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = StructAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            let _: syn::Token![=] = input.parse()?;
            let value: syn::LitStr = input.parse()?;

            if ident == "table" {
                attr.table = Some(value.value());
            } else if ident == "naming" {
                attr.naming = Some(value);
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    "expected `table` or `naming`",
                ));
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

/// Field-level options.
#[derive(Default)]
pub(crate) struct FieldAttr {
    pub column: Option<String>,
    /// `relation` or `skip`: not a mapped property.
    pub unmapped: bool,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "relation" || ident == "skip" {
                attr.unmapped = true;
            } else if ident == "column" {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attr.column = Some(value.value());
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    "expected `column`, `relation` or `skip`",
                ));
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

pub(crate) fn struct_attr(input: &DeriveInput) -> Result<StructAttr> {
    let mut merged = StructAttr::default();
    for attr in &input.attrs {
        if attr.path().is_ident("simplify") {
            let parsed: StructAttr = attr.parse_args()?;
            if parsed.table.is_some() {
                merged.table = parsed.table;
            }
            if parsed.naming.is_some() {
                merged.naming = parsed.naming;
            }
        }
    }
    Ok(merged)
}

pub(crate) fn field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in &field.attrs {
        if attr.path().is_ident("simplify") {
            let parsed: FieldAttr = attr.parse_args()?;
            if parsed.column.is_some() {
                merged.column = parsed.column;
            }
            merged.unmapped |= parsed.unmapped;
        }
    }
    if merged.unmapped && merged.column.is_some() {
        return Err(syn::Error::new_spanned(
            field,
            "a relation or skipped field cannot have a column",
        ));
    }
    Ok(merged)
}

/// `::simplify::NamingConvention::<Variant>` for a `naming = "..."` literal.
pub(crate) fn naming_tokens(naming: Option<&syn::LitStr>) -> Result<TokenStream> {
    let Some(lit) = naming else {
        return Ok(quote! { ::simplify::NamingConvention::None });
    };
    let variant = match lit.value().to_ascii_lowercase().as_str() {
        "none" => "None",
        "camel" => "Camel",
        "pascal" => "Pascal",
        "snake" => "Snake",
        _ => {
            return Err(syn::Error::new(
                lit.span(),
                "naming must be one of \"none\", \"camel\", \"pascal\", \"snake\"",
            ));
        }
    };
    let variant = syn::Ident::new(variant, Span::call_site());
    Ok(quote! { ::simplify::NamingConvention::#variant })
}

pub(crate) fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> Result<&'a syn::punctuated::Punctuated<syn::Field, syn::Token![,]>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}
