use crate::bail_ton_core_data;
use crate::cell::TonCell;
use crate::cell::ton_cell::CellBitsReader;
use crate::cell::ton_cell_num::TonCellNum;
use crate::errors::TonCoreResult;
use bitstream_io::{BigEndian, BitRead, BitReader};
use std::io::Cursor;

/// Sequential reader over the bits and refs of a single cell.
/// Reads never go past the cell boundary: running out of data is a `DataError`.
#[derive(Debug)]
pub struct CellParser<'a> {
    cell: &'a TonCell,
    reader: CellBitsReader<'a>,
    bits_consumed: usize,
    refs_consumed: usize,
}

impl<'a> CellParser<'a> {
    pub(super) fn new(cell: &'a TonCell) -> Self {
        Self {
            cell,
            reader: BitReader::endian(Cursor::new(cell.data()), BigEndian),
            bits_consumed: 0,
            refs_consumed: 0,
        }
    }

    pub fn read_bit(&mut self) -> TonCoreResult<bool> {
        self.take_bits(1)?;
        Ok(self.reader.read_bit()?)
    }

    /// Result is left-aligned: the last byte is padded with zero bits
    pub fn read_bits(&mut self, bits_len: usize) -> TonCoreResult<Vec<u8>> {
        self.take_bits(bits_len)?;
        let mut dst = vec![0; bits_len.div_ceil(8)];
        let tail_bits = bits_len % 8;
        self.reader.read_bytes(&mut dst[..bits_len / 8])?;
        if tail_bits != 0 {
            let tail = self.reader.read_var::<u8>(tail_bits as u32)?;
            dst[bits_len / 8] = tail << (8 - tail_bits);
        }
        Ok(dst)
    }

    pub fn read_num<N: TonCellNum>(&mut self, bits_len: usize) -> TonCoreResult<N> {
        self.take_bits(bits_len)?;
        N::tcn_read_bits(&mut self.reader, bits_len as u32)
    }

    /// Snake data: remaining bytes of this cell, then the first ref of every cell down the chain
    pub fn read_bytes_tail(&mut self) -> TonCoreResult<Vec<u8>> {
        let mut result = self.read_bits(whole_bytes_bits(self.data_bits_left())?)?;
        if self.refs_left() == 0 {
            return Ok(result);
        }
        let mut next = Some(self.read_next_ref()?);
        while let Some(cell) = next {
            let bits_len = whole_bytes_bits(cell.data_len_bits())?;
            result.extend_from_slice(&cell.data()[..bits_len / 8]);
            next = cell.refs().first();
        }
        Ok(result)
    }

    pub fn read_string_tail(&mut self) -> TonCoreResult<String> { Ok(String::from_utf8(self.read_bytes_tail()?)?) }

    pub fn read_next_ref(&mut self) -> TonCoreResult<&'a TonCell> {
        let cell: &'a TonCell = self.cell;
        let Some(next) = cell.refs().get(self.refs_consumed) else {
            bail_ton_core_data!("No more refs in cell: {} of {} consumed", self.refs_consumed, cell.refs().len());
        };
        self.refs_consumed += 1;
        Ok(next)
    }

    pub fn data_bits_left(&self) -> usize { self.cell.data_len_bits() - self.bits_consumed }

    pub fn refs_left(&self) -> usize { self.cell.refs().len() - self.refs_consumed }

    pub fn ensure_empty(&self) -> TonCoreResult<()> {
        let (bits_left, refs_left) = (self.data_bits_left(), self.refs_left());
        if bits_left != 0 || refs_left != 0 {
            bail_ton_core_data!("Cell is not empty: {bits_left} bits left, {refs_left} refs left");
        }
        Ok(())
    }

    fn take_bits(&mut self, bits_len: usize) -> TonCoreResult<()> {
        let bits_left = self.data_bits_left();
        if bits_len > bits_left {
            bail_ton_core_data!("Not enough bits in cell: required {bits_len}, left {bits_left}");
        }
        self.bits_consumed += bits_len;
        Ok(())
    }
}

fn whole_bytes_bits(bits_len: usize) -> TonCoreResult<usize> {
    if bits_len % 8 != 0 {
        bail_ton_core_data!("Expected whole bytes in snake cell, got {bits_len} bits");
    }
    Ok(bits_len)
}
