use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields, LitStr, Result};

pub(crate) fn generate_entity_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let fields = match &data.fields {
        Fields::Named(named) => &named.named,
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                format!(
                    "Cannot derive Entity for '{}': only structs with named fields are supported",
                    name
                ),
            ))
        }
    };

    let mut entity_name = name.to_string();
    let mut id_field = "id".to_string();
    let mut etag_field: Option<String> = None;
    let mut timestamp_field: Option<String> = None;

    for attr in &ast.attrs {
        if attr.path().is_ident("entity") {
            attr.parse_nested_meta(|meta| {
                let value: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("name") {
                    entity_name = value.value();
                    Ok(())
                } else if meta.path.is_ident("id") {
                    id_field = value.value();
                    Ok(())
                } else if meta.path.is_ident("etag") {
                    etag_field = Some(value.value());
                    Ok(())
                } else if meta.path.is_ident("timestamp") {
                    timestamp_field = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("Unknown entity attribute, expected one of: name, id, etag, timestamp"))
                }
            })?
        }
    }

    let field_ident = |field_name: &str| -> Result<Ident> {
        fields
            .iter()
            .filter_map(|field| field.ident.as_ref())
            .find(|ident| *ident == field_name)
            .cloned()
            .ok_or_else(|| {
                syn::Error::new_spanned(
                    ast,
                    format!("Field {} not found in struct {}", field_name, name),
                )
            })
    };

    let id = field_ident(&id_field)?;

    let etag_code = match etag_field {
        Some(field_name) => {
            let etag = field_ident(&field_name)?;
            quote! {
                fn etag(&self) -> Option<&str> {
                    self.#etag.as_deref()
                }

                fn set_etag(&mut self, etag: Option<String>) {
                    self.#etag = etag;
                }
            }
        }
        None => quote! {},
    };

    let timestamp_code = match timestamp_field {
        Some(field_name) => {
            let timestamp = field_ident(&field_name)?;
            quote! {
                fn timestamp(&self) -> Option<anystore::entity::Timestamp> {
                    self.#timestamp
                }

                fn set_timestamp(&mut self, timestamp: Option<anystore::entity::Timestamp>) {
                    self.#timestamp = timestamp;
                }
            }
        }
        None => quote! {},
    };

    let gen = quote! {
        impl #impl_generics anystore::entity::Entity for #name #ty_generics #where_clause {
            fn entity_name() -> &'static str {
                #entity_name
            }

            fn id(&self) -> &str {
                &self.#id
            }

            fn set_id(&mut self, id: String) {
                self.#id = id;
            }

            #etag_code
            #timestamp_code
        }
    };

    Ok(TokenStream::from(gen))
}
