use std::collections::{BTreeMap, HashSet};

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, LitInt, Pat,
    PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

/// Receiver methods, named after the value type they accept.
const METHODS: [&str; 6] = ["u256", "i256", "u128", "address", "i32", "bool"];

pub(crate) fn expand_from_record(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromRecord` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromRecord` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    type Case = (LitInt, Ident, Option<(Type, ExprClosure)>);
    let mut methods: BTreeMap<String, (Type, Vec<Case>)> = BTreeMap::new();
    let mut seen = HashSet::new();

    for field in fields {
        if !seen.insert(field.index.base10_parse::<usize>()?) {
            Err(Error::new_spanned(
                &field.index,
                "Field indices must be unique.",
            ))?
        }

        methods
            .entry(field.method)
            .or_insert_with(|| (field.value.clone(), Vec::new()))
            .1
            .push((field.index, field.name, field.handler));
    }

    let methods = methods.into_iter().map(|(method, (value_type, cases))| {
        let cases = cases.into_iter().map(|(index, name, handler)| {
            let assignment = if let Some((field_type, handler)) = handler {
                let body = handler.body;
                let acc = handler.inputs.iter().nth(0).unwrap();
                let val = handler.inputs.iter().nth(1).unwrap();

                quote! {
                    (|#acc: &mut #field_type, #val| {#body})(&mut self.#name, value)
                }
            } else {
                quote! {
                    self.#name = Some(value)
                }
            };

            quote! { #index => { #assignment } }
        });

        let method = format_ident!("add_{}", method);

        quote! {
            fn #method(&mut self, field: usize, value: #value_type) {
                match field {
                    #(#cases)*
                    _ => {}
                };
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl FromRecord for #name {
            #(#methods)*
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    value: Type,
    method: String,
    index: LitInt,
    handler: Option<(Type, ExprClosure)>,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let name = field.ident.clone().unwrap();

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("field")) else {
            return Ok(None);
        };

        let FieldAttribute { index, handler } = attr.meta.require_list()?.parse_args()?;

        let value = if let Some(handler) = &handler {
            let Some(parameter) = handler.inputs.iter().nth(1) else {
                Err(Error::new_spanned(
                    handler,
                    "Handler closure must have two parameters.",
                ))?
            };

            let Pat::Type(pat_type) = parameter else {
                Err(Error::new_spanned(
                    parameter,
                    "Handler closure's second parameter must be annotated with the expected value type.",
                ))?
            };

            (*pat_type.ty).clone()
        } else {
            option_inner(&field.ty)?
        };

        let method = method_for(&value)?;
        let handler = handler.map(|h| (field.ty.clone(), h));

        Ok(Some(Self {
            name,
            value,
            method,
            index,
            handler,
        }))
    }
}

/// Extract `T` from a field of type `Option<T>`.
fn option_inner(ty: &Type) -> Result<Type> {
    let Type::Path(path) = ty else {
        Err(Error::new_spanned(ty, "Field must have a type annotation."))?
    };

    let Some(segment) = path.path.segments.last() else {
        Err(Error::new_spanned(
            &path.path.segments,
            "Field must have a type annotation.",
        ))?
    };

    if segment.ident != "Option" {
        Err(Error::new_spanned(
            &segment.ident,
            "Field without a handler must have type `Option<T>`.",
        ))?
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        Err(Error::new_spanned(
            &segment.arguments,
            "Field of type `Option<T>` must have a generic parameter.",
        ))?
    };

    let Some(GenericArgument::Type(inner)) = arguments.args.first() else {
        Err(Error::new_spanned(
            &arguments.args,
            "Generic argument of a field of type `Option<T>` must be a type.",
        ))?
    };

    Ok(inner.clone())
}

/// Name the receiver method accepting a value type, from the last segment of
/// its path.
fn method_for(value: &Type) -> Result<String> {
    let method = match value {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|s| s.ident.to_string().to_lowercase()),
        _ => None,
    };

    match method {
        Some(method) if METHODS.contains(&method.as_str()) => Ok(method),
        _ => Err(Error::new_spanned(
            value,
            "Value type must be one of `U256`, `I256`, `u128`, `Address`, `i32` or `bool`.",
        )),
    }
}

#[derive(Debug)]
struct FieldAttribute {
    index: LitInt,
    handler: Option<ExprClosure>,
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let index = input.parse::<LitInt>()?;

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self { index, handler })
    }
}
