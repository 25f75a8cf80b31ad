use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Ident, LitStr, Result};

use super::ParsedField;

pub(crate) struct ParsedDocument {
    name: Ident,
    fields: Vec<ParsedField>,
    /// Field holding the embedded base document, when `#[es(extends)]` is used.
    extends: Option<usize>,
    id_field: Option<usize>,
}

impl ParsedDocument {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => {
                    let mut parsed = Vec::new();
                    for field in &named.named {
                        parsed.push(ParsedField::from_field(field)?);
                    }
                    parsed
                }
                _ => {
                    return Err(Error::new(
                        input.ident.span(),
                        "EsDocument requires named fields",
                    ))
                }
            },
            _ => {
                return Err(Error::new(
                    input.ident.span(),
                    "EsDocument can only be derived for structs",
                ))
            }
        };

        let mut extends: Option<usize> = None;
        let mut id_field: Option<usize> = None;
        for (index, field) in fields.iter().enumerate() {
            if field.is_extends {
                if extends.is_some() {
                    return Err(Error::new(
                        field.ident.span(),
                        "EsDocument allows exactly one #[es(extends)] field",
                    ));
                }
                extends = Some(index);
            }
            if field.is_id {
                if id_field.is_some() {
                    return Err(Error::new(
                        field.ident.span(),
                        "EsDocument allows exactly one #[es(id)] field",
                    ));
                }
                id_field = Some(index);
            }
        }

        Ok(Self {
            name: input.ident.clone(),
            fields,
            extends,
            id_field,
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let type_name = LitStr::new(&self.name.to_string(), Span::call_site());

        let field_descriptors: Vec<TokenStream2> = self
            .fields
            .iter()
            .filter(|field| field.has_descriptor())
            .map(|field| field.descriptor_tokens())
            .collect();

        let parent = match self.extends {
            Some(index) => {
                let base_ty = &self.fields[index].ty;
                quote! {
                    ::core::option::Option::Some(
                        <#base_ty as ::esom::types::DocumentMetadata>::descriptor,
                    )
                }
            }
            None => quote! { ::core::option::Option::None },
        };

        let id_field = match self.id_field {
            Some(index) => {
                let id_name = LitStr::new(&self.fields[index].name, Span::call_site());
                quote! { ::core::option::Option::Some(#id_name) }
            }
            None => quote! { ::core::option::Option::None },
        };

        let id_value_body = match self.id_field {
            Some(index) => {
                let id_ident = &self.fields[index].ident;
                quote! {
                    match ::esom::serde_json::to_value(&self.#id_ident) {
                        ::core::result::Result::Ok(value) if !value.is_null() => {
                            ::core::option::Option::Some(value)
                        }
                        _ => ::core::option::Option::None,
                    }
                }
            }
            None => quote! { ::core::option::Option::None },
        };

        let setter_arms: Vec<TokenStream2> = self
            .fields
            .iter()
            .filter_map(|field| field.setter_arm())
            .collect();

        let setter_fallback = match self.extends {
            Some(index) => {
                let base_ident = &self.fields[index].ident;
                quote! {
                    ::esom::types::EsDocument::write_text_field(&mut self.#base_ident, name, value)
                }
            }
            None => quote! { false },
        };

        let write_text_field_body = if setter_arms.is_empty() && self.extends.is_none() {
            quote! {
                let _ = (name, value);
                false
            }
        } else {
            quote! {
                match name {
                    #(#setter_arms)*
                    _ => #setter_fallback,
                }
            }
        };

        quote! {
            impl ::esom::types::DocumentMetadata for #name {
                fn descriptor() -> &'static ::esom::types::DocumentDescriptor {
                    static DESCRIPTOR: ::esom::types::DocumentDescriptor =
                        ::esom::types::DocumentDescriptor {
                            type_name: #type_name,
                            fields: &[#(#field_descriptors),*],
                            parent: #parent,
                            id_field: #id_field,
                        };
                    &DESCRIPTOR
                }
            }

            impl ::esom::types::EsDocument for #name {
                fn id_value(&self) -> ::core::option::Option<::esom::serde_json::Value> {
                    #id_value_body
                }

                fn write_text_field(&mut self, name: &str, value: &str) -> bool {
                    #write_text_field_body
                }
            }

            ::esom::inventory::submit! {
                ::esom::registry::DocumentRegistration {
                    type_name: #type_name,
                    descriptor: <#name as ::esom::types::DocumentMetadata>::descriptor,
                }
            }
        }
    }
}
