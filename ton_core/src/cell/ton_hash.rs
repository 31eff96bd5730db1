use crate::bail_ton_core_data;
use crate::errors::{TonCoreError, TonCoreResult};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// 256-bit hash: cell representation hash or account id
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TonHash([u8; 32]);

impl TonHash {
    pub const BYTES_LEN: usize = 32;
    pub const BITS_LEN: usize = 256;
    pub const ZERO: TonHash = TonHash([0u8; 32]);

    pub const fn from_slice_sized(data: &[u8; 32]) -> Self { Self(*data) }

    pub fn from_slice(data: &[u8]) -> TonCoreResult<Self> {
        match <[u8; 32]>::try_from(data) {
            Ok(bytes) => Ok(Self(bytes)),
            Err(_) => bail_ton_core_data!("Expected {} bytes, got {}", Self::BYTES_LEN, data.len()),
        }
    }

    pub fn from_vec(data: Vec<u8>) -> TonCoreResult<Self> { Self::from_slice(&data) }

    pub fn as_slice(&self) -> &[u8] { &self.0 }
    pub fn as_slice_sized(&self) -> &[u8; 32] { &self.0 }

    pub fn to_hex(&self) -> String { hex::encode(self.0) }
    pub fn to_base64(&self) -> String { STANDARD.encode(self.0) }
}

impl FromStr for TonHash {
    type Err = TonCoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = match s.len() {
            64 => hex::decode(s)?,
            44 if s.contains(['-', '_']) => URL_SAFE.decode(s)?,
            44 => STANDARD.decode(s)?,
            _ => bail_ton_core_data!("Can't parse TonHash from string of len {}: {s}", s.len()),
        };
        Self::from_vec(bytes)
    }
}

impl From<[u8; 32]> for TonHash {
    fn from(value: [u8; 32]) -> Self { Self(value) }
}

impl AsRef<[u8]> for TonHash {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl Display for TonHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.to_hex()) }
}

impl Debug for TonHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "TonHash[{}]", self.to_hex()) }
}
