/// The lowest brick in the library stack
/// Provides the basic types to build and serialize TON cells:
/// TonHash, TonCell, CellBuilder, CellParser, BoC
///
mod boc;
mod cell_builder;
mod cell_meta;
mod cell_parser;
mod ton_cell;
mod ton_cell_num;
mod ton_hash;

pub use boc::*;
pub use cell_builder::*;
pub use cell_meta::*;
pub use cell_parser::*;
pub use ton_cell::*;
pub use ton_cell_num::*;
pub use ton_hash::*;
