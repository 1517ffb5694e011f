//! Entity derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::{field_attr, named_fields, naming_tokens, struct_attr};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let attr = struct_attr(&input)?;
    let table = attr.table.unwrap_or_else(|| name.to_string());
    if table.trim().is_empty() {
        return Err(syn::Error::new_spanned(&input, "table name cannot be empty"));
    }
    let naming = naming_tokens(attr.naming.as_ref())?;

    let mut properties = Vec::new();
    let mut values = Vec::new();
    let mut overrides = Vec::new();

    for field in named_fields(&input, "Entity")? {
        let fattr = field_attr(field)?;
        if fattr.unmapped {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let property = ident.to_string();

        values.push(quote! {
            ::simplify::Value::from(::core::clone::Clone::clone(&self.#ident))
        });
        if let Some(column) = fattr.column {
            overrides.push(quote! { .column(#property, #column) });
        }
        properties.push(property);
    }

    // inventory needs a concrete type
    let registration = if generics.params.is_empty() {
        quote! {
            ::simplify::inventory::submit! {
                ::simplify::EntityRegistration {
                    register_fn: |registry: &mut ::simplify::EntityRegistry| {
                        registry.register::<#name>().map(|_| ())
                    }
                }
            }
        }
    } else {
        TokenStream::new()
    };

    Ok(quote! {
        impl #impl_generics ::simplify::Entity for #name #ty_generics #where_clause {
            const PROPERTIES: &'static [&'static str] = &[#(#properties),*];

            fn column_values(&self) -> ::std::vec::Vec<::simplify::Value> {
                ::std::vec![#(#values),*]
            }

            fn table_meta() -> ::simplify::TableMeta {
                ::simplify::TableMeta::new(#table)
                    .naming(#naming)
                    #(#overrides)*
            }
        }

        #registration
    })
}
