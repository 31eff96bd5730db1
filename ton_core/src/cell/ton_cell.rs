use crate::cell::cell_builder::INITIAL_STORAGE_CAPACITY;
use crate::cell::cell_meta::CellMeta;
use crate::cell::ton_hash::TonHash;
use crate::cell::{CellBuilder, CellParser};
use bitstream_io::{BigEndian, BitReader, BitWriter, ByteReader};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt::Formatter;
use std::io::Cursor;
use std::ops::Deref;
use std::sync::{Arc, LazyLock};

/// Immutable ordinary cell: up to 1023 data bits and up to 4 refs.
/// Cheap to clone, children are shared.
///
/// ```rust
/// let mut builder = ton_core::cell::TonCell::builder();
/// builder.write_bits([1,2,3], 24).unwrap();
/// let cell = builder.build().unwrap();
/// assert_eq!(cell.data_len_bits(), 24);
/// let mut parser = cell.parser();
/// let data = parser.read_bits(24).unwrap();
/// assert_eq!(data, [1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct TonCell {
    pub(super) cell_data: Arc<CellData>,
    pub(super) meta: Arc<CellMeta>,
}

impl TonCell {
    pub const MAX_DATA_LEN_BITS: usize = 1023;
    pub const MAX_REFS_COUNT: usize = 4;
    pub const EMPTY_CELL_HASH: TonHash = TonHash::from_slice_sized(&[
        150, 162, 150, 210, 36, 242, 133, 198, 123, 238, 147, 195, 15, 138, 48, 145, 87, 240, 218, 163, 93, 197, 184,
        126, 65, 11, 120, 99, 10, 9, 207, 199,
    ]);
    pub const EMPTY_BOC: &'static [u8] = &[181, 238, 156, 114, 1, 1, 1, 1, 0, 2, 0, 0, 0];

    pub fn empty() -> &'static Self { EMPTY_CELL.deref() }

    pub fn builder() -> CellBuilder { CellBuilder::new(INITIAL_STORAGE_CAPACITY) }

    /// bits after `data_len_bits` must be zeroed
    pub(crate) fn new(data: Vec<u8>, data_len_bits: usize, refs: RefStorage) -> Self {
        Self {
            cell_data: Arc::new(CellData {
                data,
                data_len_bits,
                refs,
            }),
            meta: Arc::new(CellMeta::default()),
        }
    }

    pub fn parser(&'_ self) -> CellParser<'_> { CellParser::new(self) }

    pub fn hash(&self) -> &TonHash { self.meta.hash(self) }
    pub fn depth(&self) -> u16 { self.meta.depth(self) }
    pub fn refs(&self) -> &[TonCell] { &self.cell_data.refs }
    pub fn data(&self) -> &[u8] { &self.cell_data.data }
    pub fn data_len_bits(&self) -> usize { self.cell_data.data_len_bits }
    pub fn data_len_bytes(&self) -> usize { self.data_len_bits().div_ceil(8) }

    /// d1 & d2 descriptor bytes of an ordinary cell
    pub(crate) fn descriptors(&self) -> [u8; 2] {
        let d1 = self.refs().len() as u8;
        let d2 = (self.data_len_bits() / 8 + self.data_len_bytes()) as u8;
        [d1, d2]
    }

    // https://github.com/ton-blockchain/ton/blob/05bea13375448a401d8e07c6132b7f709f5e3a32/crypto/vm/cells/DataCell.cpp#L362
    pub(crate) fn data_with_completion_tag(&self) -> Cow<'_, [u8]> {
        let data = &self.cell_data.data[..self.data_len_bytes()];
        let rest_bits = self.data_len_bits() % 8;
        if rest_bits == 0 {
            return Cow::Borrowed(data);
        }
        let mut tagged = data.to_vec();
        if let Some(last_byte) = tagged.last_mut() {
            *last_byte |= 1 << (7 - rest_bits);
        }
        Cow::Owned(tagged)
    }
}

pub(super) type RefStorage = SmallVec<[TonCell; TonCell::MAX_REFS_COUNT]>;

pub(super) struct CellData {
    pub data: Vec<u8>,
    pub data_len_bits: usize,
    pub refs: RefStorage,
}

static EMPTY_CELL: LazyLock<TonCell> = LazyLock::new(|| TonCell::new(vec![], 0, RefStorage::new()));

pub(super) type CellBytesReader<'a> = ByteReader<Cursor<&'a [u8]>, BigEndian>;
pub(super) type CellBitsReader<'a> = BitReader<Cursor<&'a [u8]>, BigEndian>;
pub(super) type CellBitWriter = BitWriter<Vec<u8>, BigEndian>;

#[rustfmt::skip]
mod traits_impl {
    use std::fmt::{Debug, Display, Formatter};
    use crate::cell::TonCell;
    use crate::cell::ton_cell::write_cell_display;

    impl PartialEq for TonCell { fn eq(&self, other: &Self) -> bool { self.hash() == other.hash() } }
    impl Eq for TonCell {}
    impl Display for TonCell { fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write_cell_display(f, self, 0) } }
    // expensive
    impl Debug for TonCell { fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{self}") } }
}

fn write_cell_display(f: &mut Formatter<'_>, cell: &TonCell, indent_level: usize) -> std::fmt::Result {
    use std::fmt::Write;
    let indent = "    ".repeat(indent_level);
    let mut data_display = cell.data()[..cell.data_len_bytes()].iter().fold(String::new(), |mut res, byte| {
        let _ = write!(res, "{byte:02X}");
        res
    });
    // completion tag
    if cell.data_len_bits() % 8 != 0 {
        data_display.push('_');
    }

    if cell.refs().is_empty() {
        writeln!(f, "{indent}Cell {{data: [{data_display}], bit_len: {}, refs (0): []}}", cell.data_len_bits())
    } else {
        writeln!(
            f,
            "{indent}Cell x{{data: [{data_display}], bit_len: {}, refs({}): [",
            cell.data_len_bits(),
            cell.refs().len()
        )?;
        for cell_ref in cell.refs() {
            write_cell_display(f, cell_ref, indent_level + 1)?;
        }
        writeln!(f, "{indent}]}}")
    }
}
