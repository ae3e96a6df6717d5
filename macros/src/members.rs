use crate::field_parser::MemberDef;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, DeriveInput, GenericParam};

fn member_call(member: &MemberDef) -> TokenStream {
    match member {
        MemberDef::Field { name, member, tpe } => quote! {
            .field::<#tpe, _>(#name, |source: &Self| &source.#member)
        },
        MemberDef::Property { name, method, tpe } => quote! {
            .property::<#tpe, _>(#name, |source: &Self| source.#method())
        },
    }
}

/// `impl Accessible` plus an inventory registration for non-generic types.
pub fn expand(ast: &DeriveInput, members: &[MemberDef]) -> TokenStream {
    let struct_ident = &ast.ident;
    let mut generics = ast.generics.clone();
    let type_params: Vec<_> = generics.params.iter().filter_map(|p| match p {
        GenericParam::Type(t) => Some(t.ident.clone()),
        _ => None,
    }).collect();
    {
        let where_clause = generics.make_where_clause();
        for param in type_params.iter() {
            where_clause.predicates.push(parse_quote!(#param: 'static));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let len = members.len();
    let member_calls = members.iter().map(member_call);

    let registration = if ast.generics.params.is_empty() {
        quote! {
            ::accessors::inventory::submit! {
                ::accessors::AccessibleInfo {
                    name: stringify!(#struct_ident),
                    preload_fn: ::accessors::preload::<#struct_ident>,
                }
            }
        }
    } else {
        quote! {}
    };

    quote! {
        impl #impl_generics ::accessors::Accessible for #struct_ident #ty_generics #where_clause {
            fn members() -> ::accessors::Members<Self> {
                ::accessors::Members::with_capacity(#len)
                    #(#member_calls)*
            }
        }
        #registration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_parser;

    fn expand_str(ast: DeriveInput) -> String {
        let members = field_parser::get_members(&ast).unwrap();
        expand(&ast, &members).to_string()
    }

    #[test]
    fn fields_and_properties_become_builder_calls() {
        let out = expand_str(parse_quote! {
            #[accessors(properties(full_name: String))]
            pub struct Person { pub name: String, pub age: i32 }
        });
        assert!(out.contains("Members :: with_capacity (3usize)"));
        assert!(out.contains(". field :: < String , _ > (\"name\" , | source : & Self | & source . name)"));
        assert!(out.contains(". field :: < i32 , _ > (\"age\" , | source : & Self | & source . age)"));
        assert!(out.contains(". property :: < String , _ > (\"full_name\" , | source : & Self | source . full_name ())"));
        assert!(out.contains("inventory :: submit !"));
    }

    #[test]
    fn generic_structs_get_static_bounds_and_no_registration() {
        let out = expand_str(parse_quote! {
            pub struct Wrapper<T> { pub inner: T }
        });
        assert!(out.contains("T : 'static"));
        assert!(!out.contains("inventory"));
    }

    #[test]
    fn tuple_fields_are_read_by_index() {
        let out = expand_str(parse_quote! {
            pub struct Pair(pub u32, pub u64);
        });
        assert!(out.contains("& source . 0"));
        assert!(out.contains("& source . 1"));
    }
}
