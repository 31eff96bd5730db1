use crate::cell::CellBuilder;
use crate::cell::CellParser;
use crate::errors::TonCoreResult;
use crate::traits::tlb::TLB;

impl TLB for bool {
    fn read_definition(parser: &mut CellParser) -> TonCoreResult<Self> { parser.read_bit() }
    fn write_definition(&self, builder: &mut CellBuilder) -> TonCoreResult<()> { builder.write_bit(*self) }
}
