pub use ton_macros::*; // re-export
pub mod cell;
pub mod errors;
#[cfg(feature = "serde")]
pub mod serde;
pub mod traits;
pub mod types;
