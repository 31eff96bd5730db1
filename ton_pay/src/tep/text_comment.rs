use ton_core::bail_ton_core_data;
use ton_core::cell::{CellBuilder, CellParser};
use ton_core::errors::TonCoreResult;
use ton_core::traits::tlb::{TLB, TLBPrefix};

/// Plain-text comment: 32 zero bits followed by UTF-8 text as a snake string.
///
/// ```raw
/// text_comment#00000000 text:SnakeData = InternalMsgBody;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextComment {
    pub text: String,
}

impl TextComment {
    pub fn new<T: Into<String>>(text: T) -> Self { Self { text: text.into() } }
}

impl TLB for TextComment {
    const PREFIX: TLBPrefix = TLBPrefix::new(0, 32);

    fn read_definition(parser: &mut CellParser) -> TonCoreResult<Self> {
        let text = parser.read_string_tail()?;
        Ok(Self { text })
    }

    fn write_definition(&self, builder: &mut CellBuilder) -> TonCoreResult<()> {
        if self.text.is_empty() {
            bail_ton_core_data!("Text comment can't be empty");
        }
        builder.write_string_tail(&self.text)
    }
}
