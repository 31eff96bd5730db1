use crate::bail_ton_core_data;
use crate::cell::TonCell;
use crate::cell::boc::read_var_size::read_var_size;
use crate::cell::ton_cell::{CellBitWriter, CellBytesReader};
use crate::errors::TonCoreResult;
use bitstream_io::{BitWrite, ByteRead};
use smallvec::SmallVec;

/// References are stored as indices in BagOfCells.
/// `data` bits after `data_len_bits` are zeroed (completion tag is stripped).
#[derive(PartialEq, Debug, Clone)]
pub(super) struct RawCell {
    pub(super) data: Vec<u8>,
    pub(super) data_len_bits: usize,
    pub(super) refs_positions: RefPosStorage,
}

pub(super) type RefPosStorage = SmallVec<[usize; TonCell::MAX_REFS_COUNT]>;

impl RawCell {
    pub(super) fn from_cell(cell: &TonCell, refs_positions: RefPosStorage) -> Self {
        Self {
            data: cell.data_with_completion_tag().into_owned(),
            data_len_bits: cell.data_len_bits(),
            refs_positions,
        }
    }

    pub fn data_len_bytes(&self) -> usize { self.data_len_bits.div_ceil(8) }

    pub fn size_in_boc_bytes(&self, ref_size_bytes: u32) -> u32 {
        2 + self.data_len_bytes() as u32 + self.refs_positions.len() as u32 * ref_size_bytes
    }

    /// `data` is expected to carry the completion tag already (see [`RawCell::from_cell`])
    pub fn write_to(&self, writer: &mut CellBitWriter, ref_size_bytes: u32) -> std::io::Result<()> {
        let d1 = self.refs_positions.len() as u32;
        let d2 = (self.data_len_bits / 8 + self.data_len_bytes()) as u32;

        writer.write_var(8, d1)?;
        writer.write_var(8, d2)?;
        writer.write_bytes(&self.data[..self.data_len_bytes()])?;

        for r in &self.refs_positions {
            writer.write_var(8 * ref_size_bytes, *r as u32)?;
        }
        Ok(())
    }

    pub fn new(reader: &mut CellBytesReader, ref_pos_size_bytes: u8) -> TonCoreResult<Self> {
        let d1 = reader.read::<u8>()?;
        let d2 = reader.read::<u8>()?;

        let refs_count = d1 & 0b111;
        let is_exotic = (d1 & 0b1000) != 0;
        let has_hashes = (d1 & 0b10000) != 0;
        let level_mask = d1 >> 5;
        let full_bytes = (d2 & 0x01) == 0;
        let data_len_bytes = ((d2 >> 1) + (d2 & 1)) as usize;

        if is_exotic || level_mask != 0 {
            bail_ton_core_data!("Only ordinary cells are supported: d1={d1:#010b}");
        }
        if has_hashes {
            bail_ton_core_data!("Cells with stored hashes are not supported: d1={d1:#010b}");
        }
        if refs_count as usize > TonCell::MAX_REFS_COUNT {
            bail_ton_core_data!("Too many refs in cell: {refs_count}");
        }

        let mut data = reader.read_to_vec(data_len_bytes)?;
        let padding_len_bits = match data.last_mut() {
            Some(last_byte) if !full_bytes => {
                let num_zeros = last_byte.trailing_zeros();
                if num_zeros >= 8 {
                    bail_ton_core_data!("Last byte can't be zero if full_byte flag is not set");
                }
                *last_byte &= !(1 << num_zeros); // strip completion tag
                num_zeros as usize + 1
            }
            _ => 0,
        };
        let data_len_bits = data_len_bytes * 8 - padding_len_bits;
        if data_len_bits > TonCell::MAX_DATA_LEN_BITS {
            bail_ton_core_data!("Too many data bits in cell: {data_len_bits}");
        }

        let mut refs_positions = RefPosStorage::with_capacity(refs_count as usize);
        for _ in 0..refs_count {
            refs_positions.push(read_var_size(reader, ref_pos_size_bytes)?);
        }

        Ok(RawCell {
            data,
            data_len_bits,
            refs_positions,
        })
    }
}
