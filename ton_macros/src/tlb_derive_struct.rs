use crate::tlb_derive::TLBHeaderAttrs;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DataStruct, Fields, Index};

/// Returns (read_definition body, write_definition body). `TLB` is expected to be in scope.
pub(crate) fn tlb_derive_struct(header_attrs: &TLBHeaderAttrs, data: &DataStruct) -> (TokenStream, TokenStream) {
    let ensure_empty = match header_attrs.ensure_empty {
        Some(true) => quote! { parser.ensure_empty()?; },
        _ => quote! {},
    };

    match &data.fields {
        Fields::Named(fields) => {
            let idents: Vec<_> = fields.named.iter().filter_map(|f| f.ident.as_ref()).collect();
            let types: Vec<_> = fields.named.iter().map(|f| &f.ty).collect();
            let read = quote! {
                #(let #idents = <#types as TLB>::read(parser)?;)*
                #ensure_empty
                Ok(Self { #(#idents),* })
            };
            let write = quote! {
                #(TLB::write(&self.#idents, builder)?;)*
                Ok(())
            };
            (read, write)
        }
        Fields::Unnamed(fields) => {
            let types: Vec<_> = fields.unnamed.iter().map(|f| &f.ty).collect();
            let vars: Vec<_> = (0..types.len()).map(|i| format_ident!("field_{i}")).collect();
            let indices: Vec<_> = (0..types.len()).map(Index::from).collect();
            let read = quote! {
                #(let #vars = <#types as TLB>::read(parser)?;)*
                #ensure_empty
                Ok(Self(#(#vars),*))
            };
            let write = quote! {
                #(TLB::write(&self.#indices, builder)?;)*
                Ok(())
            };
            (read, write)
        }
        Fields::Unit => {
            let read = quote! {
                #ensure_empty
                Ok(Self)
            };
            (read, quote! { Ok(()) })
        }
    }
}
