mod tlb_coins;
mod tlb_ref;
mod var_len;

pub use tlb_coins::*;
pub use tlb_ref::*;
pub use var_len::*;
