use darling::ast::NestedMeta;
use darling::{Error, FromMeta};

mod codegen;

/// Traces entry into the annotated function, printing its full signature in
/// place of the enclosing function name.
///
/// - `exit`: also trace when the function returns or unwinds
/// - `error`: use the error marker
/// - `name = "..."`: print this text instead of the signature; it may not
///   contain `": "`, which separates the function from the message
///
/// Without the `enable` feature the function is left untouched.
#[proc_macro_attribute]
pub fn traced(
    attr: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(v) => v,
        Err(e) => {
            return proc_macro::TokenStream::from(Error::from(e).write_errors());
        }
    };

    let args = match TracedAttrs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => {
            return proc_macro::TokenStream::from(e.write_errors());
        }
    };

    if let Err(e) = check_name(args.name.as_deref()) {
        return proc_macro::TokenStream::from(e.write_errors());
    }

    let item: syn::ItemFn = match syn::parse(input) {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };

    if !cfg!(feature = "enable") {
        return quote::quote!(#item).into();
    }

    codegen::instrument_fn(item, args.name, args.error, args.exit).into()
}

#[derive(Debug, FromMeta)]
struct TracedAttrs {
    #[darling(default)]
    exit: bool,
    #[darling(default)]
    error: bool,
    #[darling(default)]
    name: Option<String>,
}

fn check_name(name: Option<&str>) -> Result<(), Error> {
    match name {
        Some(name) if name.contains(": ") => Err(Error::custom(format!(
            "traced name {:?} must not contain \": \"",
            name
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_with_message_separator_are_rejected() {
        assert!(check_name(None).is_ok());
        assert!(check_name(Some("TIMER1_COMPA")).is_ok());
        assert!(check_name(Some("uart::rx")).is_ok());
        assert!(check_name(Some("isr: uart")).is_err());
    }
}
