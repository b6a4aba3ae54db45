#![doc(html_root_url = "https://docs.rs/jossp-derive/0.1.0")]
// The `quote!` macro requires deep recursion.
#![recursion_limit = "256"]

extern crate proc_macro;

use anyhow::{bail, Context, Error};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    punctuated::Punctuated, Attribute, Data, DataStruct, DeriveInput, Expr, ExprLit, Fields,
    FieldsNamed, Ident, Lit, Meta, MetaNameValue, Path, Token,
};

/// A single struct field's projection binding, derived from its
/// `#[jossp(...)]` attribute (or its absence).
enum FieldBinding {
    /// No `#[jossp(skip)]`: project using this tag (explicit, or the
    /// field's own identifier when no `tag = "..."` was given).
    Tagged(String),
    Skip,
}

impl FieldBinding {
    fn new(ident: &Ident, attrs: Vec<Attribute>) -> Result<FieldBinding, Error> {
        let mut tag = None;
        let mut skip = false;

        for meta in jossp_attrs(attrs)? {
            match meta {
                Meta::Path(path) if path.is_ident("skip") => skip = true,
                Meta::NameValue(MetaNameValue {
                    path,
                    value:
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(lit), ..
                        }),
                    ..
                }) if path.is_ident("tag") => {
                    if tag.is_some() {
                        bail!("duplicate tag attributes for field {ident}");
                    }
                    tag = Some(lit.value());
                }
                other => bail!("unknown jossp field attribute: {:?}", other.path()),
            }
        }

        if skip {
            if tag.is_some() {
                bail!("field {ident} cannot be both tagged and skipped");
            }
            return Ok(FieldBinding::Skip);
        }

        Ok(FieldBinding::Tagged(tag.unwrap_or_else(|| ident.to_string())))
    }
}

/// Items belonging to a `#[jossp(...)]` list attribute.
fn jossp_attrs(attrs: Vec<Attribute>) -> Result<Vec<Meta>, Error> {
    let mut result = Vec::new();
    for attr in &attrs {
        if let Meta::List(meta_list) = &attr.meta {
            if meta_list.path.is_ident("jossp") {
                result.extend(
                    meta_list
                        .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?
                        .into_iter(),
                )
            }
        }
    }
    Ok(result)
}

/// Extracts `#[jossp(path = "...")]` from a container's attributes, the path
/// generated code uses to reach the `jossp` crate. Defaults to `::jossp`.
fn get_jossp_path(attrs: Vec<Attribute>) -> Result<Path, Error> {
    let mut jossp_path = None;

    for meta in jossp_attrs(attrs)? {
        if let Meta::NameValue(MetaNameValue {
            path,
            value:
                Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }),
            ..
        }) = meta
        {
            if path.is_ident("path") {
                let path: Path = syn::parse_str(&lit.value()).context("invalid jossp path")?;
                jossp_path = Some(path);
            }
        }
    }

    Ok(jossp_path.unwrap_or_else(|| syn::parse_str("::jossp").expect("default jossp path")))
}

fn try_project(input: TokenStream) -> Result<TokenStream, Error> {
    let input: DeriveInput = syn::parse2(input)?;
    let ident = input.ident;
    let jossp_path = get_jossp_path(input.attrs)?;

    let fields = match input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(FieldsNamed { named, .. }),
            ..
        }) => named,
        Data::Struct(..) => bail!("Project can only be derived for structs with named fields"),
        Data::Enum(..) => bail!("Project can not be derived for an enum"),
        Data::Union(..) => bail!("Project can not be derived for a union"),
    };

    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut calls = Vec::new();
    for field in fields {
        let field_ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::msg("Project requires named fields"))?;
        match FieldBinding::new(&field_ident, field.attrs)
            .with_context(|| format!("invalid jossp field {ident}.{field_ident}"))?
        {
            FieldBinding::Skip => {}
            FieldBinding::Tagged(tag) => calls.push(quote! {
                #jossp_path::project_member(
                    obj,
                    #tag,
                    module_path!(),
                    stringify!(#ident),
                    &mut self.#field_ident,
                )?;
            }),
        }
    }

    let target_kind = format!("{ident}");

    let expanded = quote! {
        impl #impl_generics #jossp_path::Project for #ident #ty_generics #where_clause {
            fn project(&mut self, content: &#jossp_path::Content) -> #jossp_path::Result<()> {
                let obj = #jossp_path::object_for_projection(content, #target_kind)?;
                #(#calls)*
                Ok(())
            }
        }
    };

    Ok(expanded)
}

#[proc_macro_derive(Project, attributes(jossp))]
pub fn project(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    match try_project(input.into()) {
        Ok(expanded) => expanded.into(),
        Err(err) => match err.downcast::<syn::Error>() {
            Ok(err) => err.into_compile_error().into(),
            Err(err) => {
                let msg = err.to_string();
                quote!(compile_error!(#msg);).into()
            }
        },
    }
}
