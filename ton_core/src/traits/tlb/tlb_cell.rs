use crate::cell::{CellBuilder, CellParser, TonCell, TonHash};
use crate::errors::TonCoreResult;
use crate::traits::tlb::TLB;

// Inline cell: everything left in the parser, or the whole cell written in place.
impl TLB for TonCell {
    fn read_definition(parser: &mut CellParser) -> TonCoreResult<Self> {
        let bits_len = parser.data_bits_left();
        let mut builder = TonCell::builder();
        builder.write_bits(parser.read_bits(bits_len)?, bits_len)?;
        while parser.refs_left() > 0 {
            builder.write_ref(parser.read_next_ref()?.clone())?;
        }
        builder.build()
    }

    fn write_definition(&self, builder: &mut CellBuilder) -> TonCoreResult<()> {
        builder.write_bits(self.data(), self.data_len_bits())?;
        self.refs().iter().try_for_each(|child| builder.write_ref(child.clone()))
    }

    fn from_cell(cell: &TonCell) -> TonCoreResult<Self> { Ok(cell.clone()) }

    fn to_cell(&self) -> TonCoreResult<TonCell> { Ok(self.clone()) }
}

impl TLB for TonHash {
    fn read_definition(parser: &mut CellParser) -> TonCoreResult<Self> {
        TonHash::from_vec(parser.read_bits(TonHash::BITS_LEN)?)
    }

    fn write_definition(&self, builder: &mut CellBuilder) -> TonCoreResult<()> {
        builder.write_bits(self.as_slice(), TonHash::BITS_LEN)
    }
}
