mod tlb_bool;
mod tlb_cell;
mod tlb_num;
mod tlb_opt;

use crate::bail_ton_core_data;
use crate::cell::{BoC, CellBuilder, CellParser, TonCell};
use crate::errors::{TonCoreError, TonCoreResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::any::type_name;

/// Typed view of cell contents, following a TL-B scheme.
///
/// Implementors describe the fields only; the constructor tag in `PREFIX`
/// is written and checked by [`TLB::write`] and [`TLB::read`].
pub trait TLB: Sized {
    const PREFIX: TLBPrefix = TLBPrefix::NULL;

    fn read_definition(parser: &mut CellParser) -> TonCoreResult<Self>;
    fn write_definition(&self, builder: &mut CellBuilder) -> TonCoreResult<()>;

    fn read(parser: &mut CellParser) -> TonCoreResult<Self> {
        Self::PREFIX.check(parser)?;
        Self::read_definition(parser)
    }

    fn write(&self, builder: &mut CellBuilder) -> TonCoreResult<()> {
        Self::PREFIX.store(builder)?;
        self.write_definition(builder)
    }

    fn from_cell(cell: &TonCell) -> TonCoreResult<Self> { Self::read(&mut cell.parser()) }

    fn to_cell(&self) -> TonCoreResult<TonCell> {
        let mut builder = TonCell::builder();
        self.write(&mut builder)?;
        builder.build()
    }

    /// Single-root BoC; the error names the target type
    fn from_boc(boc: &[u8]) -> TonCoreResult<Self> {
        let root = BoC::from_bytes(boc).and_then(|boc| boc.single_root());
        match root.and_then(|cell| Self::from_cell(&cell)) {
            Ok(value) => Ok(value),
            Err(err) => bail_ton_core_data!("Fail to read {} from BoC {}: {err}", type_name::<Self>(), hex::encode(boc)),
        }
    }

    fn from_boc_base64(boc: &str) -> TonCoreResult<Self> { Self::from_boc(&STANDARD.decode(boc)?) }

    fn to_boc(&self, add_crc32: bool) -> TonCoreResult<Vec<u8>> { BoC::new(self.to_cell()?).to_bytes(add_crc32) }

    fn to_boc_base64(&self, add_crc32: bool) -> TonCoreResult<String> { Ok(STANDARD.encode(self.to_boc(add_crc32)?)) }
}

/// Constructor tag: `value` stored in `bits_len` bits
#[derive(Debug, Clone, PartialEq)]
pub struct TLBPrefix {
    pub value: usize,
    pub bits_len: usize,
}

impl TLBPrefix {
    pub const NULL: TLBPrefix = TLBPrefix::new(0, 0);
    pub const fn new(value: usize, bits_len: usize) -> Self { TLBPrefix { value, bits_len } }

    fn check(&self, parser: &mut CellParser) -> TonCoreResult<()> {
        if self.bits_len == 0 {
            return Ok(());
        }
        let bits_left = parser.data_bits_left();
        let given = match bits_left >= self.bits_len {
            true => parser.read_num::<usize>(self.bits_len)?,
            false => 0,
        };
        if bits_left < self.bits_len || given != self.value {
            return Err(TonCoreError::TLBWrongPrefix {
                exp: self.value,
                given,
                bits_exp: self.bits_len,
                bits_left,
            });
        }
        Ok(())
    }

    fn store(&self, builder: &mut CellBuilder) -> TonCoreResult<()> {
        match self.bits_len {
            0 => Ok(()),
            bits_len => builder.write_num(&self.value, bits_len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;
    use ton_macros::TLB;

    #[test]
    fn test_tlb_derive() -> anyhow::Result<()> {
        #[derive(TLB)]
        #[tlb(prefix = 0x01, bits_len = 8)]
        struct TestTLBObject(u32);
        let cell = TestTLBObject(42).to_cell()?;
        let parsed = TestTLBObject::from_cell(&cell)?;
        assert_eq!(parsed.0, 42);

        let parser = &mut cell.parser();
        let prefix: u32 = parser.read_num(8)?;
        assert_eq!(prefix, 0x01);

        let data: u32 = parser.read_num(32)?;
        assert_eq!(data, 42);
        Ok(())
    }

    #[test]
    fn test_tlb_derive_const_prefix() -> anyhow::Result<()> {
        const PREFIX: usize = 0x02;

        #[derive(TLB)]
        #[tlb(prefix = PREFIX, bits_len = 8)]
        struct TestTLBObject(u32);
        let cell = TestTLBObject(42).to_cell()?;
        let parsed = TestTLBObject::from_cell(&cell)?;
        assert_eq!(parsed.0, 42);
        Ok(())
    }

    #[test]
    fn test_tlb_wrong_prefix() -> anyhow::Result<()> {
        #[derive(Debug, TLB)]
        #[tlb(prefix = 0x0f8a7ea5, bits_len = 32)]
        struct WithOpcode {
            query_id: u64,
        }
        #[derive(Debug, TLB)]
        #[tlb(prefix = 0x7362d09c, bits_len = 32)]
        struct OtherOpcode {
            query_id: u64,
        }
        let cell = WithOpcode { query_id: 7 }.to_cell()?;
        assert_eq!(WithOpcode::from_cell(&cell)?.query_id, 7);
        let err = assert_err!(OtherOpcode::from_cell(&cell));
        assert!(matches!(err, TonCoreError::TLBWrongPrefix { given: 0x0f8a7ea5, bits_left: 96, .. }), "{err}");

        let mut builder = TonCell::builder();
        builder.write_num(&0x0fu8, 8)?;
        let err = assert_err!(WithOpcode::from_cell(&builder.build()?));
        assert!(matches!(err, TonCoreError::TLBWrongPrefix { given: 0, bits_left: 8, .. }), "{err}");
        Ok(())
    }

    #[test]
    fn test_tlb_ensure_empty() -> anyhow::Result<()> {
        #[derive(Debug, TLB)]
        #[tlb(ensure_empty = true)]
        struct Strict {
            value: u8,
        }
        let mut builder = TonCell::builder();
        builder.write_num(&1u8, 8)?;
        assert_eq!(Strict::from_cell(&builder.build()?)?.value, 1);

        let mut builder = TonCell::builder();
        builder.write_num(&1u16, 16)?;
        assert_err!(Strict::from_cell(&builder.build()?));
        Ok(())
    }

    #[test]
    fn test_tlb_from_boc_nice_error() -> anyhow::Result<()> {
        #[derive(Debug, PartialEq, TLB)]
        struct TestStruct;
        let err = assert_err!(TestStruct::from_boc(&[0x00, 0x01, 0x02]));
        assert!(err.to_string().contains("Fail to read"), "Actual error: {err}");
        assert!(err.to_string().contains("TestStruct"), "Actual error: {err}");
        Ok(())
    }
}
