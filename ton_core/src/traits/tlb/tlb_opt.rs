use crate::cell::CellBuilder;
use crate::cell::CellParser;
use crate::errors::TonCoreResult;
use crate::traits::tlb::TLB;

// Maybe X: nothing$0 {X:Type} = Maybe X; just$1 {X:Type} value:X = Maybe X;
impl<T: TLB> TLB for Option<T> {
    fn read_definition(parser: &mut CellParser) -> TonCoreResult<Self> {
        match parser.read_bit()? {
            true => Ok(Some(T::read(parser)?)),
            false => Ok(None),
        }
    }

    fn write_definition(&self, builder: &mut CellBuilder) -> TonCoreResult<()> {
        match self {
            Some(val) => {
                builder.write_bit(true)?;
                val.write(builder)
            }
            None => builder.write_bit(false),
        }
    }
}
