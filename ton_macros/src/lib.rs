mod tlb_derive;
mod tlb_derive_struct;

use crate::tlb_derive::tlb_derive_impl;
use proc_macro::TokenStream;

/// Automatic `TLB` implementation for structs.
///
/// Fields are read and written in declaration order, each through its own `TLB` impl.
/// Header attributes: `#[tlb(prefix = 0x0f8a7ea5, bits_len = 32, ensure_empty = true)]`.
#[proc_macro_derive(TLB, attributes(tlb))]
pub fn tlb_derive(input: TokenStream) -> TokenStream { tlb_derive_impl(input).into() }
