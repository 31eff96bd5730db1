use crate::cell::ton_cell::CellBytesReader;
use crate::errors::TonCoreResult;
use bitstream_io::ByteRead;

pub(super) fn read_var_size(reader: &mut CellBytesReader, bytes_len: u8) -> TonCoreResult<usize> {
    let bytes = reader.read_to_vec(bytes_len.into())?;

    let mut result = 0;
    for &byte in &bytes {
        result <<= 8;
        result |= usize::from(byte);
    }
    Ok(result)
}
