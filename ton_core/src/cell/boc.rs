mod raw_boc;
mod raw_cell;
mod read_var_size;

use crate::bail_ton_core_data;
use crate::cell::TonCell;
use crate::cell::boc::raw_boc::RawBoC;
use crate::errors::TonCoreResult;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Bag of Cells: the standard binary serialization of cell trees
#[derive(Debug, Clone, PartialEq)]
pub struct BoC {
    roots: Vec<TonCell>,
}

impl BoC {
    pub fn new(root: TonCell) -> Self { Self { roots: vec![root] } }

    pub fn from_bytes<T: AsRef<[u8]>>(data: T) -> TonCoreResult<Self> {
        let roots = RawBoC::from_bytes(data.as_ref())?.into_ton_cells()?;
        Ok(Self { roots })
    }

    pub fn single_root(self) -> TonCoreResult<TonCell> {
        let roots_len = self.roots.len();
        match <[TonCell; 1]>::try_from(self.roots) {
            Ok([root]) => Ok(root),
            Err(_) => bail_ton_core_data!("Expected 1 root, got {roots_len}"),
        }
    }

    pub fn to_bytes(&self, add_crc32: bool) -> TonCoreResult<Vec<u8>> {
        RawBoC::from_ton_cells(&self.roots)?.to_bytes(add_crc32)
    }

    pub fn to_base64(&self, add_crc32: bool) -> TonCoreResult<String> {
        Ok(STANDARD.encode(self.to_bytes(add_crc32)?))
    }
}
