//! FromRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::{field_attr, named_fields, naming_tokens, struct_attr};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let attr = struct_attr(&input)?;
    let naming = naming_tokens(attr.naming.as_ref())?;

    let mut field_extracts = Vec::new();
    for field in named_fields(&input, "FromRow")? {
        let fattr = field_attr(field)?;
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        if fattr.unmapped {
            field_extracts.push(quote! {
                #ident: ::core::default::Default::default()
            });
            continue;
        }

        let extract = match fattr.column {
            Some(column) => quote! { row.try_get(#column)? },
            None => {
                let property = ident.to_string();
                quote! { row.try_get(&#naming.apply(#property))? }
            }
        };
        field_extracts.push(quote! { #ident: #extract });
    }

    Ok(quote! {
        impl #impl_generics ::simplify::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &::simplify::Row) -> ::simplify::OrmResult<Self> {
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
