use crate::macro_utils;
use proc_macro2::Ident;
use std::collections::HashSet;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::token::Comma;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Member, Token, Type, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    Verbatim,
    CamelCase,
    PascalCase,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> Result<RenameRule, syn::Error> {
        match lit.value().as_str() {
            "snake_case" => Ok(RenameRule::Verbatim),
            "camelCase" => Ok(RenameRule::CamelCase),
            "PascalCase" => Ok(RenameRule::PascalCase),
            other => Err(syn::Error::new(lit.span(), format!("unsupported rename_all rule `{}`, expected one of snake_case, camelCase, PascalCase", other))),
        }
    }

    pub fn apply(&self, name: &str) -> String {
        match self {
            RenameRule::Verbatim => name.to_string(),
            RenameRule::CamelCase => macro_utils::to_camel_case(name, false),
            RenameRule::PascalCase => macro_utils::to_camel_case(name, true),
        }
    }
}

#[derive(Clone)]
pub enum MemberDef {
    Field { name: String, member: Member, tpe: Type },
    Property { name: String, method: Ident, tpe: Type },
}

impl MemberDef {
    pub fn name(&self) -> &str {
        match self {
            MemberDef::Field { name, .. } => name,
            MemberDef::Property { name, .. } => name,
        }
    }
}

/// `name: Type` entry of `#[accessors(properties(..))]`.
pub struct PropertyDecl {
    pub method: Ident,
    pub tpe: Type,
}

impl Parse for PropertyDecl {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let method: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let tpe: Type = input.parse()?;
        Ok(PropertyDecl { method, tpe })
    }
}

struct StructAttrs {
    rename_all: RenameRule,
    properties: Vec<PropertyDecl>,
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    rename: Option<String>,
}

fn parse_struct_attrs(attrs: &[Attribute]) -> Result<StructAttrs, syn::Error> {
    let mut result = StructAttrs { rename_all: RenameRule::Verbatim, properties: Vec::new() };
    for attr in attrs.iter().filter(|a| a.path().is_ident("accessors")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                result.rename_all = RenameRule::parse(&lit)?;
                Ok(())
            } else if meta.path.is_ident("properties") {
                let content;
                syn::parenthesized!(content in meta.input);
                let decls: Punctuated<PropertyDecl, Comma> = content.parse_terminated(PropertyDecl::parse, Token![,])?;
                result.properties.extend(decls);
                Ok(())
            } else {
                Err(meta.error("unsupported #[accessors(..)] struct attribute, expected `rename_all` or `properties`"))
            }
        })?;
    }
    Ok(result)
}

fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs, syn::Error> {
    let mut result = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("accessors")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                result.rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported #[accessors(..)] field attribute, expected `skip` or `rename`"))
            }
        })?;
    }
    Ok(result)
}

fn is_public(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

/// Collects public fields in declaration order followed by declared properties.
pub fn get_members(ast: &DeriveInput) -> Result<Vec<MemberDef>, syn::Error> {
    if let Some(lifetime) = ast.generics.lifetimes().next() {
        return Err(syn::Error::new(lifetime.span(), "`#[derive(Accessors)]` does not support lifetime parameters, accessible types must be 'static"));
    }
    let fields = match &ast.data {
        Data::Struct(data) => &data.fields,
        _ => return Err(syn::Error::new(ast.span(), "`#[derive(Accessors)]` only supports structs.")),
    };
    let struct_attrs = parse_struct_attrs(&ast.attrs)?;
    let mut members: Vec<MemberDef> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    let mut push = |member: MemberDef, span: proc_macro2::Span| -> Result<(), syn::Error> {
        if !seen.insert(member.name().to_string()) {
            return Err(syn::Error::new(span, format!("duplicate accessor member name `{}`", member.name())));
        }
        members.push(member);
        Ok(())
    };

    match fields {
        Fields::Named(named) => {
            for field in named.named.iter() {
                let field_attrs = parse_field_attrs(&field.attrs)?;
                if !is_public(&field.vis) || field_attrs.skip {
                    continue;
                }
                let ident = field.ident.clone().ok_or_else(|| syn::Error::new(field.span(), "Unnamed field in named struct"))?;
                let name = field_attrs.rename.unwrap_or_else(|| struct_attrs.rename_all.apply(&ident.unraw().to_string()));
                push(MemberDef::Field { name, member: Member::Named(ident), tpe: field.ty.clone() }, field.span())?;
            }
        }
        Fields::Unnamed(unnamed) => {
            for (index, field) in unnamed.unnamed.iter().enumerate() {
                let field_attrs = parse_field_attrs(&field.attrs)?;
                if !is_public(&field.vis) || field_attrs.skip {
                    continue;
                }
                let name = field_attrs.rename.unwrap_or_else(|| index.to_string());
                let member = Member::Unnamed(syn::Index { index: index as u32, span: field.span() });
                push(MemberDef::Field { name, member, tpe: field.ty.clone() }, field.span())?;
            }
        }
        Fields::Unit => {}
    }

    for property in struct_attrs.properties {
        let name = struct_attrs.rename_all.apply(&property.method.unraw().to_string());
        let span = property.method.span();
        push(MemberDef::Property { name, method: property.method, tpe: property.tpe }, span)?;
    }

    Ok(members)
}
