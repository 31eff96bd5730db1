pub use ton_core; // re-export
pub mod address;
pub mod config;
pub mod errors;
pub mod payload;
pub mod payment_data;
pub mod price;
pub mod resolver;
pub mod tep;
pub mod transfer;
pub mod units;
