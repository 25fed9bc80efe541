//! Assembles the generated artifact: header, imports, and method impls.
//!
//! Method signatures are fully determined by the request, never by the copy
//! plan. The assembled token stream is parsed back as a `syn::File` and
//! formatted with `prettyplease`; a parse failure here means the synthesizer
//! produced invalid tokens and is reported as an internal error rather than
//! written out.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::deps::DependencyTracker;
use crate::error::Error;
use crate::request::{GenerationOptions, ReceiverKind};

const HEADER: &str = "// Code generated by deepcopy-gen. DO NOT EDIT.";

/// Renders one `impl` block with the configured method for `type_name`.
pub(crate) fn render_method(
    type_name: &str,
    statements: &[TokenStream],
    options: &GenerationOptions,
    deps: &mut DependencyTracker,
) -> TokenStream {
    let ty = format_ident!("{type_name}");
    let method = format_ident!("{}", options.method);
    let doc = format!(" Generated deep copy of `{type_name}`.");

    if options.copy_into {
        let body = if statements.is_empty() {
            quote!(*target = self.clone();)
        } else {
            quote! {
                let mut cp = self.clone();
                #(#statements)*
                *target = cp;
            }
        };
        return quote! {
            impl #ty {
                #[doc = #doc]
                pub fn #method(&self, target: &mut #ty) {
                    #body
                }
            }
        };
    }

    // The destination form above has no return type, so the interface
    // dependency is only recorded here on the returning path.
    let interface = interface_tokens(options, deps);
    let ret = match (&interface, options.receiver) {
        (Some(iface), _) => quote!(Box<dyn #iface>),
        (None, ReceiverKind::Value) => quote!(#ty),
        (None, ReceiverKind::Pointer) => quote!(Box<#ty>),
    };
    let wrap_final = |value: TokenStream| match (&interface, options.receiver) {
        (None, ReceiverKind::Value) => value,
        _ => quote!(Box::new(#value)),
    };
    let body = if statements.is_empty() {
        let result = wrap_final(quote!(self.clone()));
        quote!(#result)
    } else {
        let result = wrap_final(quote!(cp));
        quote! {
            let mut cp = self.clone();
            #(#statements)*
            #result
        }
    };
    quote! {
        impl #ty {
            #[doc = #doc]
            pub fn #method(&self) -> #ret {
                #body
            }
        }
    }
}

/// Renders the complete artifact text: header comment, optional feature-tag
/// attribute, import block in tracker order, and the impls in request order.
pub(crate) fn render_file(
    impls: &[TokenStream],
    options: &GenerationOptions,
    deps: &DependencyTracker,
) -> Result<String, Error> {
    let mut tokens = TokenStream::new();
    if !options.build_tags.is_empty() {
        let tags = &options.build_tags;
        tokens.extend(quote!(#![cfg(all(#(feature = #tags),*))]));
    }
    for (alias, path) in deps.entries() {
        let parsed: syn::Path = syn::parse_str(path)
            .map_err(|err| Error::Internal(format!("invalid tracked path `{path}`: {err}")))?;
        let default = parsed
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default();
        if *alias == default {
            tokens.extend(quote!(use #parsed;));
        } else {
            let alias = format_ident!("{alias}");
            tokens.extend(quote!(use #parsed as #alias;));
        }
    }
    tokens.extend(impls.iter().cloned());
    let file: syn::File = syn::parse2(tokens)
        .map_err(|err| Error::Internal(format!("generated output failed to parse: {err}")))?;
    Ok(format!("{HEADER}\n{}", prettyplease::unparse(&file)))
}

fn interface_tokens(
    options: &GenerationOptions,
    deps: &mut DependencyTracker,
) -> Option<TokenStream> {
    options.return_interface.as_ref().map(|interface| {
        let name = format_ident!("{}", interface.name);
        match &interface.dep {
            Some(dep) => {
                let alias = deps.record_with_alias(&dep.path, &dep.name);
                quote!(#alias::#name)
            }
            None => quote!(#name),
        }
    })
}
