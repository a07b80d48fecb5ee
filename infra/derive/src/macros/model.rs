use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, ItemStruct, LitStr};

/// Parsed `api = "...", model = "..."` arguments.
#[derive(Default)]
struct ModelArgs {
    api: Option<LitStr>,
    model: Option<LitStr>,
}

impl ModelArgs {
    fn parse(args: TokenStream) -> syn::Result<Self> {
        let mut parsed = Self::default();
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("api") {
                parsed.api = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("model") {
                parsed.model = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported argument; expected `api = \"..\"` or `model = \"..\"`"))
            }
        });
        syn::parse::Parser::parse2(parser, args)?;
        Ok(parsed)
    }
}

/// Expands `#[modkit_derive::model(...)]` into a `Modeled` implementation.
pub fn expand_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    let args = match ModelArgs::parse(args) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error(),
    };

    let Some(model) = args.model else {
        return Error::new_spanned(&input.ident, "missing `model = \"namespace:family:name\"`")
            .to_compile_error();
    };
    let Some(api) = args.api else {
        return Error::new_spanned(&input.ident, "missing `api = \"namespace:type:subtype\"`")
            .to_compile_error();
    };

    let [api_ns, api_kind, api_subtype] = match triplet(&api) {
        Ok(parts) => parts,
        Err(err) => return err.to_compile_error(),
    };
    let [model_ns, model_family, model_name] = match triplet(&model) {
        Ok(parts) => parts,
        Err(err) => return err.to_compile_error(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        #input

        #[automatically_derived]
        impl #impl_generics ::modkit_kernel::registry::Modeled for #ident #ty_generics #where_clause {
            const API: ::modkit_kernel::domain::names::Api =
                ::modkit_kernel::domain::names::Api::from_static(#api_ns, #api_kind, #api_subtype);
            const MODEL: ::modkit_kernel::domain::names::Model =
                ::modkit_kernel::domain::names::Model::from_static(#model_ns, #model_family, #model_name);
        }
    }
}

/// Splits and checks a colon-delimited triplet at compile time.
fn triplet(lit: &LitStr) -> syn::Result<[String; 3]> {
    let value = lit.value();
    let parts: Vec<&str> = value.split(':').collect();
    let valid_part =
        |p: &&str| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    match parts.as_slice() {
        [a, b, c] if [a, b, c].into_iter().all(valid_part) => {
            Ok([(*a).to_owned(), (*b).to_owned(), (*c).to_owned()])
        },
        _ => Err(Error::new_spanned(lit, format!("`{value}` is not a `namespace:family:name` triplet"))),
    }
}
