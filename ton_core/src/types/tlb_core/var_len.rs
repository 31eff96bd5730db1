use crate::cell::{CellBuilder, CellParser, TonCellNum};
use crate::errors::TonCoreResult;
use crate::traits::tlb::TLB;
use std::ops::{Deref, DerefMut};

/// Number with a length prefix: `len:(## L) value:(uint (len * 8))`
///
/// `bits_len` is the length of the value in bits, always a multiple of 8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarLenBytes<T, const L: usize> {
    pub data: T,
    pub bits_len: usize,
}

impl<T, const L: usize> VarLenBytes<T, L> {
    pub const fn from_value(data: T, bits_len: usize) -> Self { Self { data, bits_len } }
}

impl<T: TonCellNum, const L: usize> TLB for VarLenBytes<T, L> {
    fn read_definition(parser: &mut CellParser) -> TonCoreResult<Self> {
        let len_bytes: usize = parser.read_num(L)?;
        let bits_len = len_bytes * 8;
        let data = parser.read_num(bits_len)?;
        Ok(Self { data, bits_len })
    }

    fn write_definition(&self, builder: &mut CellBuilder) -> TonCoreResult<()> {
        builder.write_num(&(self.bits_len.div_ceil(8)), L)?;
        builder.write_num(&self.data, self.bits_len)
    }
}

impl<T, const L: usize> Deref for VarLenBytes<T, L> {
    type Target = T;
    fn deref(&self) -> &Self::Target { &self.data }
}

impl<T, const L: usize> DerefMut for VarLenBytes<T, L> {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.data }
}
