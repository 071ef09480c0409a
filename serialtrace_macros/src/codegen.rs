use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};
use quote::{quote, ToTokens};

/// Renders a signature the way a person would write it, e.g.
/// `fn scale<T: Copy>(v: T, k: u8) -> T`.
pub fn signature_text(sig: &syn::Signature) -> String {
    let mut atoms = Vec::new();
    collect_atoms(sig.to_token_stream(), &mut atoms);

    let mut out = String::new();
    let mut prev: Option<&str> = None;
    for atom in &atoms {
        if let Some(prev) = prev {
            if needs_space(prev, atom) {
                out.push(' ');
            }
        }
        out.push_str(atom);
        prev = Some(atom);
    }
    out
}

fn collect_atoms(tokens: TokenStream, atoms: &mut Vec<String>) {
    let mut pending_punct = String::new();

    for tt in tokens {
        match tt {
            TokenTree::Punct(p) => {
                pending_punct.push(p.as_char());
                // A lone quote starts a lifetime and binds to the next ident.
                if p.spacing() == Spacing::Alone && pending_punct != "'" {
                    atoms.push(std::mem::take(&mut pending_punct));
                }
            }
            TokenTree::Ident(ident) => {
                if pending_punct == "'" {
                    atoms.push(format!("'{}", ident));
                    pending_punct.clear();
                } else {
                    flush(&mut pending_punct, atoms);
                    atoms.push(ident.to_string());
                }
            }
            TokenTree::Literal(lit) => {
                flush(&mut pending_punct, atoms);
                atoms.push(lit.to_string());
            }
            TokenTree::Group(group) => {
                flush(&mut pending_punct, atoms);
                let (open, close) = match group.delimiter() {
                    Delimiter::Parenthesis => ("(", ")"),
                    Delimiter::Bracket => ("[", "]"),
                    Delimiter::Brace => ("{", "}"),
                    Delimiter::None => ("", ""),
                };
                if !open.is_empty() {
                    atoms.push(open.to_owned());
                }
                collect_atoms(group.stream(), atoms);
                if !close.is_empty() {
                    atoms.push(close.to_owned());
                }
            }
        }
    }

    flush(&mut pending_punct, atoms);
}

fn flush(pending: &mut String, atoms: &mut Vec<String>) {
    if !pending.is_empty() {
        atoms.push(std::mem::take(pending));
    }
}

fn is_word(atom: &str) -> bool {
    atom.chars()
        .last()
        .map_or(false, |c| c.is_alphanumeric() || c == '_')
}

fn needs_space(prev: &str, next: &str) -> bool {
    if matches!(next, "," | ";" | ")" | "]" | ">" | "." | "?" | ":" | "::") {
        return false;
    }
    if matches!(prev, "(" | "[" | "<" | "&" | "::" | "#" | "*") {
        return false;
    }
    if next == "[" {
        return true;
    }
    if matches!(next, "(" | "<") {
        let keyword = matches!(prev, "mut" | "dyn" | "impl" | "in" | "as" | "where");
        return keyword || !(is_word(prev) || prev == ">");
    }
    true
}

pub fn instrument_fn(
    item: syn::ItemFn,
    name: Option<String>,
    error: bool,
    trace_exit: bool,
) -> TokenStream {
    let syn::ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = item;

    let function = name.unwrap_or_else(|| signature_text(&sig));

    let marker = if error {
        quote! { ::serialtrace::Marker::Error }
    } else {
        quote! { ::serialtrace::Marker::Plain }
    };

    quote! {
        #(#attrs)*
        #vis #sig {
            let _serialtrace_tracer = ::serialtrace::Tracer::enter(
                #marker,
                ::serialtrace::__location_with!(#function),
                #trace_exit,
            );
            #block
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use syn::parse_quote;

    fn render(item: syn::ItemFn) -> String {
        signature_text(&item.sig)
    }

    #[test]
    fn plain_function() {
        assert_eq!(render(parse_quote! { fn setup() {} }), "fn setup()");
    }

    #[test]
    fn parameters_and_return() {
        assert_eq!(
            render(parse_quote! { fn read(addr: u8, buf: &mut [u8; 4]) -> Result<usize, ()> { todo!() } }),
            "fn read(addr: u8, buf: &mut [u8; 4]) -> Result<usize, ()>"
        );
    }

    #[test]
    fn generics_and_lifetimes() {
        assert_eq!(
            render(parse_quote! { pub fn pick<'a, T: Copy + 'a>(xs: &'a [T]) -> Option<&'a T> { None } }),
            "fn pick<'a, T: Copy + 'a>(xs: &'a [T]) -> Option<&'a T>"
        );
    }

    #[test]
    fn methods_and_qualifiers() {
        assert_eq!(
            render(parse_quote! { async unsafe fn poll(&mut self, cx: &mut core::task::Context<'_>) -> bool { true } }),
            "async unsafe fn poll(&mut self, cx: &mut core::task::Context<'_>) -> bool"
        );
    }

    #[test]
    fn tuple_return_keeps_arrow_spacing() {
        assert_eq!(
            render(parse_quote! { fn split(v: u16) -> (u8, u8) { (0, 0) } }),
            "fn split(v: u16) -> (u8, u8)"
        );
    }

    #[test]
    fn where_clause() {
        assert_eq!(
            render(parse_quote! { fn show<W>(w: W) where W: core::fmt::Write {} }),
            "fn show<W>(w: W) where W: core::fmt::Write"
        );
    }

    #[test]
    fn instrumented_body_keeps_signature() {
        let item: syn::ItemFn = parse_quote! {
            #[inline]
            pub fn twice(v: u8) -> u8 { v * 2 }
        };
        let out = instrument_fn(item, None, false, true).to_string();

        assert!(out.starts_with("# [inline] pub fn twice"));
        assert!(out.contains("Tracer :: enter"));
        assert!(out.contains("\"fn twice(v: u8) -> u8\""));
        assert!(out.contains("Marker :: Plain"));
    }

    #[test]
    fn name_override_and_error_marker() {
        let item: syn::ItemFn = parse_quote! { fn isr() {} };
        let out = instrument_fn(item, Some("TIMER1_COMPA".into()), true, false).to_string();

        assert!(out.contains("\"TIMER1_COMPA\""));
        assert!(out.contains("Marker :: Error"));
        assert!(out.contains("false"));
    }
}
