use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;

pub fn write_to_local_file(lines: Vec<String>, dir_name: &str, file_name: &str) {
    if cfg!(test) {
        return;
    }
    let dir_path = match env::current_dir() {
        Ok(dir) => dir.join("target").join("macros").join(dir_name),
        Err(e) => {
            eprintln!("Current dir inaccessible: {}", e);
            return;
        }
    };
    let full_path = dir_path.join(file_name);
    let written = std::fs::create_dir_all(&dir_path).and_then(|_| {
        OpenOptions::new().create(true).write(true).truncate(true).open(&full_path)?.write_all(lines.join("\n").as_bytes())
    });
    if let Err(e) = written {
        eprintln!("Failed to write expansion to {:?}: {}", full_path, e);
    }
}

pub fn submit_struct_to_stream(stream: proc_macro2::TokenStream, dir: &str, struct_ident: &Ident, suffix: &str) -> TokenStream {
    let formatted_token_stream =
        match syn::parse2::<syn::File>(stream.clone()) {
            Ok(ast) => prettyplease::unparse(&ast),
            Err(_) => stream.to_string(),
        };

    write_to_local_file(vec![formatted_token_stream], dir, &format!("{}{}", struct_ident, suffix));

    quote! {
        #stream
    }.into()
}

pub fn to_camel_case(input: &str, upper_first_char: bool) -> String {
    let mut result = String::with_capacity(input.len());
    for word in input.split('_').filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if result.is_empty() && !upper_first_char {
                result.push_str(&first.to_lowercase().to_string());
            } else {
                result.push_str(&first.to_uppercase().to_string());
            }
            result.push_str(&chars.as_str().to_lowercase());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{to_camel_case, write_to_local_file};

    #[test]
    fn camel_case_from_snake_case() {
        assert_eq!(to_camel_case("first_name", false), "firstName");
        assert_eq!(to_camel_case("first_name", true), "FirstName");
        assert_eq!(to_camel_case("age", true), "Age");
        assert_eq!(to_camel_case("__tx__hash", false), "txHash");
    }

    #[test]
    fn expansions_are_not_dumped_from_unit_tests() {
        write_to_local_file(vec!["struct Dumped;".to_string()], "accessors_unit", "Dumped_derive.rs");
        let dumped = std::env::current_dir().unwrap().join("target").join("macros").join("accessors_unit");
        assert!(!dumped.exists());
    }
}
