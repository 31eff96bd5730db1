use crate::cell::{CellBuilder, CellParser, TonCell};
use crate::errors::TonCoreResult;
use crate::traits::tlb::TLB;
use std::ops::Deref;

/// `^T`: the value lives in a child cell of the one being written.
///
/// Standalone conversions (`to_cell`, `to_boc`) produce the inner value's own cell.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TLBRef<T>(T);

impl<T: TLB> TLBRef<T> {
    pub const fn new(val: T) -> Self { Self(val) }
    pub fn into_inner(self) -> T { self.0 }
}

impl<T: TLB> TLB for TLBRef<T> {
    fn read_definition(parser: &mut CellParser) -> TonCoreResult<Self> {
        T::from_cell(parser.read_next_ref()?).map(Self)
    }

    fn write_definition(&self, builder: &mut CellBuilder) -> TonCoreResult<()> { builder.write_ref(self.0.to_cell()?) }

    fn from_cell(cell: &TonCell) -> TonCoreResult<Self> { T::from_cell(cell).map(Self) }

    fn to_cell(&self) -> TonCoreResult<TonCell> { self.0.to_cell() }
}

impl<T> Deref for TLBRef<T> {
    type Target = T;
    fn deref(&self) -> &T { &self.0 }
}

impl<T: TLB> From<T> for TLBRef<T> {
    fn from(value: T) -> Self { Self::new(value) }
}
