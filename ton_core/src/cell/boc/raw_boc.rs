use crate::bail_ton_core_data;
use crate::cell::boc::raw_cell::{RawCell, RefPosStorage};
use crate::cell::boc::read_var_size::read_var_size;
use crate::cell::ton_cell::{CellBytesReader, RefStorage};
use crate::cell::{TonCell, TonHash};
use crate::errors::{TonCoreError, TonCoreResult};
use bitstream_io::BigEndian;
use bitstream_io::{BitWrite, BitWriter, ByteRead};
use crc::Crc;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

const GENERIC_BOC_MAGIC: u32 = 0xb5ee9c72;
const CRC_32_ISCSI: Crc<u32> = Crc::<u32>::new(&crc::CRC_32_ISCSI);

/// `cells` must be topologically sorted: parents first.
#[derive(PartialEq, Debug, Clone)]
pub(super) struct RawBoC {
    pub(super) cells: Vec<RawCell>,
    pub(super) roots_positions: RefPosStorage, // Usually one, sometimes two. Haven't seen more in practice.
}

impl RawBoC {
    // https://github.com/ton-blockchain/ton/blob/24dc184a2ea67f9c47042b4104bbb4d82289fac1/crypto/tl/boc.tlb#L25
    pub(super) fn from_bytes(data: &[u8]) -> TonCoreResult<RawBoC> {
        let cursor = Cursor::new(data);
        let mut reader = CellBytesReader::new(cursor);
        let magic = reader.read::<u32>()?;

        if magic != GENERIC_BOC_MAGIC {
            bail_ton_core_data!("Unexpected magic: {magic:#x}");
        };

        let (has_idx, has_crc32c, ref_pos_size_bytes) = {
            // has_idx:(## 1) has_crc32c:(## 1) has_cache_bits:(## 1) flags:(## 2) { flags = 0 }
            let header = reader.read::<u8>()?;
            let has_idx = (header & 0b1000_0000) != 0;
            let has_crc32c = (header & 0b0100_0000) != 0;

            // size:(## 3) { size <= 4 }
            let ref_pos_size = header & 0b0000_0111;
            if ref_pos_size > 4 {
                bail_ton_core_data!("Invalid BoC header: ref_pos_size={ref_pos_size} (must be <= 4)");
            }
            (has_idx, has_crc32c, ref_pos_size)
        };

        //   off_bytes:(## 8) { off_bytes <= 8 }
        let off_bytes = reader.read::<u8>()?;
        if off_bytes > 8 {
            bail_ton_core_data!("Invalid BoC header: off_bytes({off_bytes}) <= 8");
        }
        //cells:(##(size * 8))
        let cells_cnt = read_var_size(&mut reader, ref_pos_size_bytes)?;
        //   roots:(##(size * 8)) { roots >= 1 }
        let roots_cnt = read_var_size(&mut reader, ref_pos_size_bytes)?;
        if roots_cnt < 1 {
            bail_ton_core_data!("Invalid BoC header: roots({roots_cnt}) >= 1");
        }
        //   absent:(##(size * 8)) { roots + absent <= cells }
        let absent = read_var_size(&mut reader, ref_pos_size_bytes)?;
        if roots_cnt + absent > cells_cnt {
            bail_ton_core_data!("Invalid header: roots({roots_cnt}) + absent({absent}) <= cells({cells_cnt})");
        }
        //   tot_cells_size:(##(off_bytes * 8))
        let _tot_cells_size = read_var_size(&mut reader, off_bytes)?;
        //   root_list:(roots * ##(size * 8))
        let mut roots_positions = RefPosStorage::with_capacity(roots_cnt);
        for _ in 0..roots_cnt {
            roots_positions.push(read_var_size(&mut reader, ref_pos_size_bytes)?)
        }
        //   index:has_idx?(cells * ##(off_bytes * 8))
        if has_idx {
            log::trace!("skipping BoC index: {cells_cnt} entries, {off_bytes} bytes each");
            reader.skip(cells_cnt as u32 * off_bytes as u32)?;
        }
        //   cell_data:(tot_cells_size * [ uint8 ])
        let mut cells = Vec::with_capacity(cells_cnt.min(data.len()));
        for _ in 0..cells_cnt {
            cells.push(RawCell::new(&mut reader, ref_pos_size_bytes)?);
        }
        //   crc32c:has_crc32c?uint32
        if has_crc32c {
            let payload_len = reader.reader().position() as usize;
            let mut crc_bytes = [0u8; 4];
            reader.read_bytes(&mut crc_bytes)?;
            let expected = u32::from_le_bytes(crc_bytes);
            let actual = CRC_32_ISCSI.checksum(&data[..payload_len]);
            if expected != actual {
                bail_ton_core_data!("BoC crc32c mismatch: expected {expected:#x}, actual {actual:#x}");
            }
        }

        Ok(RawBoC { cells, roots_positions })
    }

    //Based on https://github.com/toncenter/tonweb/blob/c2d5d0fc23d2aec55a0412940ce6e580344a288c/src/boc/Cell.js#L198
    pub(super) fn to_bytes(&self, add_crc32: bool) -> TonCoreResult<Vec<u8>> {
        let root_count = self.roots_positions.len();
        let ref_size_bits = 32 - (self.cells.len() as u32).leading_zeros();
        let ref_pos_size_bytes = ref_size_bits.div_ceil(8).max(1);
        let has_idx = false;

        let mut full_size = 0u32;
        for cell in &self.cells {
            full_size += cell.size_in_boc_bytes(ref_pos_size_bytes);
        }

        let num_offset_bits = 32 - full_size.leading_zeros();
        let num_offset_bytes = num_offset_bits.div_ceil(8).max(1);

        let total_size = 4 + // magic
            1 + // flags and s_bytes
            1 + // offset_bytes
            3 * ref_pos_size_bytes + // cells_num, roots, complete
            num_offset_bytes + // full_size
            root_count as u32 * ref_pos_size_bytes + // root_idx
            full_size +
            (if add_crc32 { 4 } else { 0 });

        let mut writer = BitWriter::endian(Vec::with_capacity(total_size as usize), BigEndian);
        writer.write_var(32, GENERIC_BOC_MAGIC)?;
        writer.write_bit(has_idx)?;
        writer.write_bit(add_crc32)?;
        writer.write_bit(false)?; // has_cache_bits
        writer.write_var(2, 0u8)?; // flags
        writer.write_var(3, ref_pos_size_bytes)?;
        writer.write_var(8, num_offset_bytes)?;
        writer.write_var(8 * ref_pos_size_bytes, self.cells.len() as u32)?;
        writer.write_var(8 * ref_pos_size_bytes, root_count as u32)?;
        writer.write_var(8 * ref_pos_size_bytes, 0u32)?; // Complete BOCs only
        writer.write_var(8 * num_offset_bytes, full_size)?;

        for &root in &self.roots_positions {
            writer.write_var(8 * ref_pos_size_bytes, root as u32)?;
        }

        for cell in &self.cells {
            cell.write_to(&mut writer, ref_pos_size_bytes)?;
        }
        writer.byte_align()?;
        let mut bytes = writer.into_writer();
        if add_crc32 {
            bytes.extend(CRC_32_ISCSI.checksum(&bytes).to_le_bytes());
        }
        Ok(bytes)
    }

    /// Flattens cell trees into a topologically ordered list.
    /// Cells with equal hashes are stored once.
    pub(super) fn from_ton_cells(roots: &[TonCell]) -> TonCoreResult<RawBoC> {
        // reversed post-order of a dfs walking children right-to-left:
        // for a tree it's exactly the pre-order (root, then first child subtree, ...)
        let mut visited: HashSet<&TonHash> = HashSet::new();
        let mut post_order: Vec<&TonCell> = vec![];
        let mut stack: Vec<(&TonCell, usize)> = vec![];

        for root in roots.iter().rev() {
            if !visited.insert(root.hash()) {
                continue;
            }
            stack.push((root, root.refs().len()));
            while let Some((cell, refs_left)) = stack.pop() {
                if refs_left == 0 {
                    post_order.push(cell);
                    continue;
                }
                stack.push((cell, refs_left - 1));
                let child = &cell.refs()[refs_left - 1];
                if visited.insert(child.hash()) {
                    stack.push((child, child.refs().len()));
                }
            }
        }
        post_order.reverse();

        let positions: HashMap<&TonHash, usize> =
            post_order.iter().enumerate().map(|(pos, cell)| (cell.hash(), pos)).collect();
        let position_of = |cell: &TonCell| -> TonCoreResult<usize> {
            match positions.get(cell.hash()) {
                Some(pos) => Ok(*pos),
                None => Err(TonCoreError::SerializationError(format!("cell {} is not indexed", cell.hash()))),
            }
        };

        let mut cells = Vec::with_capacity(post_order.len());
        for cell in &post_order {
            let mut refs_positions = RefPosStorage::with_capacity(cell.refs().len());
            for cell_ref in cell.refs() {
                refs_positions.push(position_of(cell_ref)?);
            }
            cells.push(RawCell::from_cell(cell, refs_positions));
        }
        let mut roots_positions = RefPosStorage::with_capacity(roots.len());
        for root in roots {
            roots_positions.push(position_of(root)?);
        }
        Ok(RawBoC { cells, roots_positions })
    }

    pub(super) fn into_ton_cells(self) -> TonCoreResult<Vec<TonCell>> {
        let cells_len = self.cells.len();
        let mut cells: Vec<TonCell> = Vec::with_capacity(cells_len);

        // children have larger indices, so build from the tail
        for (cell_index, raw_cell) in self.cells.into_iter().enumerate().rev() {
            let mut refs = RefStorage::with_capacity(raw_cell.refs_positions.len());
            for ref_index in raw_cell.refs_positions {
                if ref_index <= cell_index || ref_index >= cells_len {
                    bail_ton_core_data!("Bad ref position {ref_index} in cell {cell_index} (cells: {cells_len})");
                }
                refs.push(cells[cells_len - 1 - ref_index].clone());
            }
            cells.push(TonCell::new(raw_cell.data, raw_cell.data_len_bits, refs));
        }

        let mut roots = Vec::with_capacity(self.roots_positions.len());
        for root_index in self.roots_positions {
            if root_index >= cells_len {
                bail_ton_core_data!("Bad root position {root_index} (cells: {cells_len})");
            }
            roots.push(cells[cells_len - 1 - root_index].clone());
        }
        Ok(roots)
    }
}
