use crate::cell::ton_cell::{CellBitWriter, CellBitsReader};
use crate::errors::{TonCoreError, TonCoreResult};
use bitstream_io::{BitRead, BitWrite};
use std::fmt::Display;

/// Allows generic read/write operation for any numeric type
pub trait TonCellNum: Display + Sized + Clone {
    /// CellBuilder guarantees 0 < bits_len <= 1023
    fn tcn_write_bits(&self, writer: &mut CellBitWriter, bits_len: u32) -> TonCoreResult<()>;
    /// CellParser guarantees 0 <= bits_len <= 1023
    fn tcn_read_bits(reader: &mut CellBitsReader, bits_len: u32) -> TonCoreResult<Self>;
    fn tcn_is_zero(&self) -> bool;
    fn tcn_min_bits_len(&self) -> u32;
}

fn write_fill(writer: &mut CellBitWriter, bit: bool, count: u32) -> TonCoreResult<()> {
    for _ in 0..count {
        writer.write_bit(bit)?;
    }
    Ok(())
}

fn skip_fill(reader: &mut CellBitsReader, count: u32) -> TonCoreResult<bool> {
    let mut any_set = false;
    for _ in 0..count {
        any_set |= reader.read_bit()?;
    }
    Ok(any_set)
}

macro_rules! ton_cell_num_unsigned_impl {
    ($t:ty) => {
        impl TonCellNum for $t {
            fn tcn_write_bits(&self, writer: &mut CellBitWriter, bits_len: u32) -> TonCoreResult<()> {
                if self.tcn_min_bits_len() > bits_len {
                    return Err(TonCoreError::out_of_range(self, bits_len as usize));
                }
                let value_bits = bits_len.min(<$t>::BITS);
                write_fill(writer, false, bits_len - value_bits)?;
                writer.write_var(value_bits, *self)?;
                Ok(())
            }

            fn tcn_read_bits(reader: &mut CellBitsReader, bits_len: u32) -> TonCoreResult<Self> {
                if bits_len == 0 {
                    return Ok(0);
                }
                let value_bits = bits_len.min(<$t>::BITS);
                if skip_fill(reader, bits_len - value_bits)? {
                    return Err(TonCoreError::data(
                        module_path!(),
                        format!("value stored in {bits_len} bits doesn't fit into {}", stringify!($t)),
                    ));
                }
                Ok(reader.read_var(value_bits)?)
            }

            fn tcn_is_zero(&self) -> bool { *self == 0 }

            fn tcn_min_bits_len(&self) -> u32 { <$t>::BITS - self.leading_zeros() }
        }
    };
}

// two's complement, sign is extended to the requested width
macro_rules! ton_cell_num_signed_impl {
    ($t:ty, $u:ty) => {
        impl TonCellNum for $t {
            fn tcn_write_bits(&self, writer: &mut CellBitWriter, bits_len: u32) -> TonCoreResult<()> {
                if self.tcn_min_bits_len() > bits_len {
                    return Err(TonCoreError::out_of_range(self, bits_len as usize));
                }
                let value_bits = bits_len.min(<$t>::BITS);
                write_fill(writer, *self < 0, bits_len - value_bits)?;
                let mut unsigned = *self as $u;
                if value_bits < <$u>::BITS {
                    unsigned &= (1 << value_bits) - 1;
                }
                writer.write_var(value_bits, unsigned)?;
                Ok(())
            }

            fn tcn_read_bits(reader: &mut CellBitsReader, bits_len: u32) -> TonCoreResult<Self> {
                if bits_len == 0 {
                    return Ok(0);
                }
                let value_bits = bits_len.min(<$t>::BITS);
                skip_fill(reader, bits_len - value_bits)?;
                let unsigned: $u = reader.read_var(value_bits)?;
                if value_bits == <$u>::BITS {
                    return Ok(unsigned as $t);
                }
                let sign_bit = 1 << (value_bits - 1);
                match unsigned & sign_bit != 0 {
                    true => Ok((unsigned | (<$u>::MAX << value_bits)) as $t),
                    false => Ok(unsigned as $t),
                }
            }

            fn tcn_is_zero(&self) -> bool { *self == 0 }

            fn tcn_min_bits_len(&self) -> u32 {
                match *self < 0 {
                    true => <$t>::BITS - self.leading_ones() + 1,
                    false => <$t>::BITS - self.leading_zeros() + 1,
                }
            }
        }
    };
}

ton_cell_num_unsigned_impl!(u8);
ton_cell_num_unsigned_impl!(u16);
ton_cell_num_unsigned_impl!(u32);
ton_cell_num_unsigned_impl!(u64);
ton_cell_num_unsigned_impl!(u128);

ton_cell_num_signed_impl!(i8, u8);
ton_cell_num_signed_impl!(i16, u16);
ton_cell_num_signed_impl!(i32, u32);
ton_cell_num_signed_impl!(i64, u64);
ton_cell_num_signed_impl!(i128, u128);

impl TonCellNum for usize {
    fn tcn_write_bits(&self, writer: &mut CellBitWriter, bits_len: u32) -> TonCoreResult<()> {
        (*self as u64).tcn_write_bits(writer, bits_len)
    }
    fn tcn_read_bits(reader: &mut CellBitsReader, bits_len: u32) -> TonCoreResult<Self> {
        Ok(u64::tcn_read_bits(reader, bits_len)? as usize)
    }
    fn tcn_is_zero(&self) -> bool { *self == 0 }
    fn tcn_min_bits_len(&self) -> u32 { (*self as u64).tcn_min_bits_len() }
}
