extern crate proc_macro;
mod field_parser;
mod macro_utils;
mod members;

use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;
use syn::{parse_macro_input, DeriveInput};

/// Derives `accessors::Accessible`, emitting the member table of a struct.
///
/// Members are the `pub` fields in declaration order, followed by the zero-argument
/// `&self` methods listed in `#[accessors(properties(name: Type, ..))]`.
///
/// Attributes:
/// - `#[accessors(rename_all = "camelCase" | "PascalCase" | "snake_case")]` on the struct
/// - `#[accessors(rename = "Name")]` and `#[accessors(skip)]` on fields
#[proc_macro_derive(Accessors, attributes(accessors))]
#[proc_macro_error]
pub fn derive_accessors(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let struct_ident = &ast.ident;

    let stream = match field_parser::get_members(&ast) {
        Ok(members) => members::expand(&ast, &members),
        Err(e) => return e.to_compile_error().into(),
    };

    macro_utils::submit_struct_to_stream(stream, "accessors", struct_ident, "_derive.rs")
}
