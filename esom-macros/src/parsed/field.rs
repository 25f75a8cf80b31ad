use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::Parse;
use syn::{
    Error, Field, GenericArgument, Ident, Lit, LitStr, Meta, PathArguments, Result, Type, TypePath,
};

/// A single struct field together with its parsed `#[es(...)]` options.
pub(crate) struct ParsedField {
    pub(crate) ident: Ident,
    pub(crate) name: String,
    pub(crate) is_id: bool,
    pub(crate) is_extends: bool,
    pub(crate) ty: Type,
    string_kind: StringKind,
    mapped: bool,
    types: Vec<String>,
    copy_to: Option<String>,
    analyzer: Option<String>,
    search_analyzer: Option<String>,
    format: Option<String>,
    scaling_factor: f64,
    dims: u32,
    relations: String,
    ignore_above: u32,
}

#[derive(Clone, Copy)]
enum StringKind {
    Plain,
    Optional,
    NotString,
}

impl ParsedField {
    pub(crate) fn from_field(field: &Field) -> Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "EsDocument requires named fields"))?;

        let mut parsed = Self {
            name: ident.to_string(),
            ident,
            is_id: false,
            is_extends: false,
            ty: field.ty.clone(),
            string_kind: string_kind(&field.ty),
            mapped: false,
            types: Vec::new(),
            copy_to: None,
            analyzer: None,
            search_analyzer: None,
            format: None,
            scaling_factor: 1.0,
            dims: 128,
            relations: String::new(),
            ignore_above: 0,
        };

        for attr in &field.attrs {
            if !attr.path().is_ident("es") {
                continue;
            }
            match &attr.meta {
                // Bare `#[es]` maps the field with the default type tags.
                Meta::Path(_) => parsed.mapped = true,
                Meta::List(_) => parsed.parse_attr_list(attr)?,
                Meta::NameValue(_) => {
                    return Err(Error::new_spanned(
                        attr,
                        "expected `#[es(...)]` attribute arguments in parentheses",
                    ));
                }
            }
        }

        if parsed.is_extends && (parsed.is_id || parsed.mapped) {
            return Err(Error::new(
                parsed.ident.span(),
                "#[es(extends)] cannot be combined with other es attributes",
            ));
        }

        if parsed.mapped && parsed.types.is_empty() {
            parsed.types = vec!["text".to_string(), "keyword".to_string()];
        }

        Ok(parsed)
    }

    fn parse_attr_list(&mut self, attr: &syn::Attribute) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                self.is_id = true;
            } else if meta.path.is_ident("extends") {
                self.is_extends = true;
            } else if meta.path.is_ident("types") {
                meta.input.parse::<syn::Token![=]>()?;
                let content;
                syn::bracketed!(content in meta.input);
                let parsed: syn::punctuated::Punctuated<LitStr, syn::Token![,]> =
                    content.parse_terminated(<LitStr as Parse>::parse, syn::Token![,])?;
                if parsed.is_empty() {
                    return Err(meta.error("types requires at least one type tag"));
                }
                self.mapped = true;
                self.types = parsed.into_iter().map(|lit| lit.value()).collect();
            } else if meta.path.is_ident("analyzer") {
                let lit: LitStr = meta.value()?.parse()?;
                self.mapped = true;
                self.analyzer = Some(lit.value());
            } else if meta.path.is_ident("search_analyzer") {
                let lit: LitStr = meta.value()?.parse()?;
                self.mapped = true;
                self.search_analyzer = Some(lit.value());
            } else if meta.path.is_ident("format") {
                let lit: LitStr = meta.value()?.parse()?;
                self.mapped = true;
                self.format = Some(lit.value());
            } else if meta.path.is_ident("copy_to") {
                let lit: LitStr = meta.value()?.parse()?;
                self.mapped = true;
                self.copy_to = Some(lit.value());
            } else if meta.path.is_ident("relations") {
                let lit: LitStr = meta.value()?.parse()?;
                self.mapped = true;
                self.relations = lit.value();
            } else if meta.path.is_ident("scaling_factor") {
                let lit: Lit = meta.value()?.parse()?;
                self.mapped = true;
                self.scaling_factor = match &lit {
                    Lit::Float(value) => value.base10_parse()?,
                    Lit::Int(value) => value.base10_parse::<u64>()? as f64,
                    _ => return Err(meta.error("scaling_factor expects a numeric literal")),
                };
            } else if meta.path.is_ident("dims") {
                let lit: syn::LitInt = meta.value()?.parse()?;
                self.mapped = true;
                self.dims = lit.base10_parse()?;
            } else if meta.path.is_ident("ignore_above") {
                let lit: syn::LitInt = meta.value()?.parse()?;
                self.mapped = true;
                self.ignore_above = lit.base10_parse()?;
            } else {
                return Err(meta.error(
                    "unknown es attribute; expected one of: id, extends, types, analyzer, \
                     search_analyzer, format, copy_to, relations, scaling_factor, dims, \
                     ignore_above",
                ));
            }
            Ok(())
        })
    }

    /// Whether this field contributes a `FieldDescriptor` entry.
    pub(crate) fn has_descriptor(&self) -> bool {
        self.is_id || self.mapped
    }

    pub(crate) fn descriptor_tokens(&self) -> TokenStream2 {
        let name = &self.name;
        let tags = &self.types;
        let copy_to = opt_str(&self.copy_to);
        let analyzer = opt_str(&self.analyzer);
        let search_analyzer = opt_str(&self.search_analyzer);
        let format = opt_str(&self.format);
        let scaling_factor = self.scaling_factor;
        let dims = self.dims;
        let relations = &self.relations;
        let ignore_above = self.ignore_above;
        let is_id = self.is_id;

        quote! {
            ::esom::types::FieldDescriptor {
                name: #name,
                types: &[#(#tags),*],
                copy_to: #copy_to,
                analyzer: #analyzer,
                search_analyzer: #search_analyzer,
                format: #format,
                scaling_factor: #scaling_factor,
                dims: #dims,
                relations: #relations,
                ignore_above: #ignore_above,
                is_id: #is_id,
            }
        }
    }

    /// Match arm for the generated `write_text_field` setter table. Only
    /// string-valued fields are writable; everything else behaves as absent.
    pub(crate) fn setter_arm(&self) -> Option<TokenStream2> {
        if self.is_extends {
            return None;
        }
        let name = &self.name;
        let ident = &self.ident;
        match self.string_kind {
            StringKind::Plain => Some(quote! {
                #name => {
                    self.#ident = value.to_owned();
                    true
                }
            }),
            StringKind::Optional => Some(quote! {
                #name => {
                    self.#ident = ::core::option::Option::Some(value.to_owned());
                    true
                }
            }),
            StringKind::NotString => None,
        }
    }
}

fn string_kind(ty: &Type) -> StringKind {
    if is_string_path(ty) {
        return StringKind::Plain;
    }
    if let Some(inner) = option_inner(ty) {
        if is_string_path(inner) {
            return StringKind::Optional;
        }
    }
    StringKind::NotString
}

fn is_string_path(ty: &Type) -> bool {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return false;
    };
    path.segments
        .last()
        .map(|segment| segment.ident == "String" && matches!(segment.arguments, PathArguments::None))
        .unwrap_or(false)
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    let segment = path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn opt_str(value: &Option<String>) -> TokenStream2 {
    match value {
        Some(value) => quote! { ::core::option::Option::Some(#value) },
        None => quote! { ::core::option::Option::None },
    }
}
