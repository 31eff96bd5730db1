use crate::bail_ton_core_data;
use crate::cell::ton_cell::{CellBitWriter, RefStorage, TonCell};
use crate::cell::ton_cell_num::TonCellNum;
use crate::errors::{TonCoreError, TonCoreResult};
use bitstream_io::{BigEndian, BitWrite, BitWriter};
use std::cmp::min;
use std::mem;
use std::ops::Deref;

pub(crate) const INITIAL_STORAGE_CAPACITY: usize = 128;

/// Accumulates bits & refs of a single cell.
///
/// Once [`CellBuilder::build`] is called, the builder is closed:
/// repeated `build` returns the same cell, any write fails with [`TonCoreError::BuilderClosed`].
pub struct CellBuilder {
    data_writer: CellBitWriter,
    data_len_bits: usize,
    refs: RefStorage,
    built: Option<TonCell>,
}

impl CellBuilder {
    pub(super) fn new(initial_capacity: usize) -> Self {
        let data_store = Vec::with_capacity(initial_capacity);
        Self {
            data_writer: BitWriter::endian(data_store, BigEndian),
            data_len_bits: 0,
            refs: RefStorage::new(),
            built: None,
        }
    }

    pub fn build(&mut self) -> TonCoreResult<TonCell> {
        if let Some(cell) = &self.built {
            return Ok(cell.clone());
        }
        let writer = mem::replace(&mut self.data_writer, BitWriter::endian(Vec::new(), BigEndian));
        let data = build_cell_data(writer)?;
        let cell = TonCell::new(data, self.data_len_bits, mem::take(&mut self.refs));
        self.built = Some(cell.clone());
        Ok(cell)
    }

    pub fn is_closed(&self) -> bool { self.built.is_some() }

    pub fn write_bit(&mut self, data: bool) -> TonCoreResult<()> {
        self.ensure_capacity(1)?;
        self.data_writer.write_bit(data)?;
        Ok(())
    }

    /// Writes the first `bits_len` bits of `data`, most significant bit first
    pub fn write_bits<T: AsRef<[u8]>>(&mut self, data: T, bits_len: usize) -> TonCoreResult<()> {
        let data = data.as_ref();
        if bits_len.div_ceil(8) > data.len() {
            bail_ton_core_data!("Can't take {bits_len} bits from {} bytes", data.len());
        }
        self.ensure_capacity(bits_len)?;
        let (full_bytes, tail_bits) = (bits_len / 8, bits_len % 8);
        self.data_writer.write_bytes(&data[..full_bytes])?;
        if tail_bits != 0 {
            self.data_writer.write_var(tail_bits as u32, data[full_bytes] >> (8 - tail_bits))?;
        }
        Ok(())
    }

    /// Raw bytes, 8 bits each. Fails if they don't fit into the current cell.
    pub fn write_bytes<T: AsRef<[u8]>>(&mut self, data: T) -> TonCoreResult<()> {
        let data_ref = data.as_ref();
        self.write_bits(data_ref, data_ref.len() * 8)
    }

    /// Writes as many bytes as fit into the current cell,
    /// the rest goes to a chain of child cells (each one is the only ref of its parent).
    pub fn write_bytes_tail<T: AsRef<[u8]>>(&mut self, data: T) -> TonCoreResult<()> {
        self.ensure_open()?;
        let data_ref = data.as_ref();
        let fits_here = min(self.data_bits_left() / 8, data_ref.len());
        let (head, mut rest) = data_ref.split_at(fits_here);
        self.write_bytes(head)?;
        if rest.is_empty() {
            return Ok(());
        }

        let mut chunks = vec![];
        while !rest.is_empty() {
            let (chunk, tail) = rest.split_at(min(TonCell::MAX_DATA_LEN_BITS / 8, rest.len()));
            chunks.push(chunk);
            rest = tail;
        }
        // build the chain bottom-up
        let mut child: Option<TonCell> = None;
        for chunk in chunks.into_iter().rev() {
            let mut builder = TonCell::builder();
            builder.write_bytes(chunk)?;
            if let Some(next) = child.take() {
                builder.write_ref(next)?;
            }
            child = Some(builder.build()?);
        }
        match child {
            Some(cell) => self.write_ref(cell),
            None => Ok(()),
        }
    }

    /// UTF-8 text, continued in child cells if needed
    pub fn write_string_tail(&mut self, text: &str) -> TonCoreResult<()> { self.write_bytes_tail(text.as_bytes()) }

    pub fn write_ref<T: Into<TonCell>>(&mut self, cell: T) -> TonCoreResult<()> {
        self.ensure_open()?;
        if self.refs.len() >= TonCell::MAX_REFS_COUNT {
            return Err(TonCoreError::TooManyReferences {
                max: TonCell::MAX_REFS_COUNT,
            });
        }
        self.refs.push(cell.into());
        Ok(())
    }

    pub fn write_num<N, D>(&mut self, data: D, bits_len: usize) -> TonCoreResult<()>
    where
        N: TonCellNum,
        D: Deref<Target = N>,
    {
        self.ensure_open()?;
        let data_ref = data.deref();
        // handling it like ton-core
        // https://github.com/ton-core/ton-core/blob/main/src/boc/BitBuilder.ts#L122
        if bits_len == 0 {
            if data_ref.tcn_is_zero() {
                return Ok(());
            }
            return Err(TonCoreError::out_of_range(data_ref, 0));
        }
        if data_ref.tcn_min_bits_len() as usize > bits_len {
            return Err(TonCoreError::out_of_range(data_ref, bits_len));
        }

        self.ensure_capacity(bits_len)?;
        data_ref.tcn_write_bits(&mut self.data_writer, bits_len as u32)
    }

    pub fn data_bits_left(&self) -> usize { TonCell::MAX_DATA_LEN_BITS - self.data_len_bits }

    pub fn refs_left(&self) -> usize { TonCell::MAX_REFS_COUNT - self.refs.len() }

    fn ensure_open(&self) -> TonCoreResult<()> {
        match self.built {
            Some(_) => Err(TonCoreError::BuilderClosed),
            None => Ok(()),
        }
    }

    fn ensure_capacity(&mut self, bits_len: usize) -> TonCoreResult<()> {
        self.ensure_open()?;
        let new_bits_len = self.data_len_bits + bits_len;
        if new_bits_len <= TonCell::MAX_DATA_LEN_BITS {
            self.data_len_bits = new_bits_len;
            return Ok(());
        }
        Err(TonCoreError::TooManyBits {
            requested: bits_len,
            available: self.data_bits_left(),
        })
    }
}

fn build_cell_data(mut bit_writer: CellBitWriter) -> TonCoreResult<Vec<u8>> {
    while !bit_writer.byte_aligned() {
        bit_writer.write_bit(false)?;
    }
    Ok(bit_writer.into_writer())
}
