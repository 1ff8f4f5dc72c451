use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Variant};

pub(crate) fn handle_derive_slot(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "Slot can be derived only for enums",
        ));
    };

    let mut idents = Vec::with_capacity(data.variants.len());
    let mut labels = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Slot supports only fieldless enum variants",
            ));
        }
        idents.push(variant.ident.clone());
        labels.push(variant_label(variant)?);
    }

    let count = idents.len();
    let all = idents.iter().map(|v| quote! { #name::#v });
    let slot_arms = idents.iter().enumerate().map(|(i, v)| {
        quote! { #name::#v => #i }
    });
    let from_slot_arms = idents.iter().enumerate().map(|(i, v)| {
        quote! { #i => ::core::option::Option::Some(#name::#v) }
    });
    let name_arms = idents.iter().zip(labels.iter()).map(|(v, label)| {
        quote! { #name::#v => #label }
    });
    let from_name_checks = idents.iter().zip(labels.iter()).map(|(v, label)| {
        quote! {
            if name.eq_ignore_ascii_case(#label) {
                return ::core::option::Option::Some(#name::#v);
            }
        }
    });

    Ok(quote! {
        impl ::padstate::SlotMapped for #name {
            const COUNT: usize = #count;
            const ALL: &'static [Self] = &[ #( #all, )* ];

            #[inline]
            fn slot(&self) -> usize {
                match self { #( #slot_arms, )* }
            }

            #[inline]
            fn from_slot(slot: usize) -> ::core::option::Option<Self> {
                match slot {
                    #( #from_slot_arms, )*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn name(&self) -> &'static str {
                match self { #( #name_arms, )* }
            }

            fn from_name(name: &str) -> ::core::option::Option<Self> {
                #( #from_name_checks )*
                ::core::option::Option::None
            }
        }
    })
}

fn variant_label(variant: &Variant) -> syn::Result<String> {
    let mut label = None;
    for attr in &variant.attrs {
        if !attr.path().is_ident("slot") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                label = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    Ok(label.unwrap_or_else(|| variant.ident.to_string().to_uppercase()))
}
