use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, ItemFn, ReturnType, Type};

const PROFILES: &str = "server, compact, or default";

/// Expands `#[orgdir_runtime::main]` into a synchronous entry point.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            &input.sig.ident,
            "#[orgdir_runtime::main] can only be used on async functions",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "#[orgdir_runtime::main] requires a Result return type",
        )
        .to_compile_error();
    }

    let profile = match runtime_profile(args) {
        Ok(profile) => profile,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = #profile;
            let rt = ::orgdir_runtime::build_runtime_with_config(&config)?;
            rt.block_on(async #block)
        }
    }
}

fn runtime_profile(args: TokenStream) -> syn::Result<TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::orgdir_runtime::RuntimeConfig::default() });
    }

    let ident: syn::Ident = syn::parse2(args)?;
    let constructor = match ident.to_string().as_str() {
        "server" => quote! { server },
        "compact" => quote! { compact },
        "default" => quote! { default },
        _ => {
            return Err(Error::new_spanned(
                ident,
                format!("Unknown runtime profile. Use: {PROFILES}"),
            ));
        },
    };

    Ok(quote! { ::orgdir_runtime::RuntimeConfig::#constructor() })
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}
