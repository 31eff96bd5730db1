pub mod tlb_core;

mod ton_address;

pub use ton_address::*;
