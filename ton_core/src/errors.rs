use hex::FromHexError;
use std::sync::Arc;
use thiserror::Error;

#[macro_export]
macro_rules! bail_ton_core {
    ($($arg:tt)*) => {
        return Err($crate::errors::TonCoreError::Custom(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! bail_ton_core_data {
    ($($arg:tt)*) => {
        return Err($crate::errors::TonCoreError::data(module_path!(), format!($($arg)*)))
    };
}

pub type TonCoreResult<T> = Result<T, TonCoreError>;

#[derive(Error, Debug)]
pub enum TonCoreError {
    #[error("DataError: [{producer}] {msg}")]
    DataError { producer: String, msg: String },

    // builder
    #[error("BuilderClosed: cell is already built, no more writes allowed")]
    BuilderClosed,
    #[error("OutOfRange: value {value} doesn't fit into {bits_len} bits")]
    OutOfRange { value: String, bits_len: usize },
    #[error("TooManyBits: can't write {requested} bits, only {available} bits available")]
    TooManyBits { requested: usize, available: usize },
    #[error("TooManyReferences: cell can't hold more than {max} refs")]
    TooManyReferences { max: usize },

    // boc
    #[error("SerializationError: {0}")]
    SerializationError(String),

    // tlb
    #[error("TLBWrongPrefix: expected={exp}, given={given}, exp_bits={bits_exp}, left_bits={bits_left}")]
    TLBWrongPrefix {
        exp: usize,
        given: usize,
        bits_exp: usize,
        bits_left: usize,
    },

    // General errors
    #[error("Custom: {0}")]
    Custom(String),

    // handling external errors
    #[error("{0}")]
    IO(#[from] std::io::Error),
    #[error("{0}")]
    FromHex(#[from] FromHexError),
    #[error("{0}")]
    Base64Error(#[from] base64::DecodeError),
    #[error("{0}")]
    ParseInt(#[from] std::num::ParseIntError),
    #[error("{0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),
    #[error("{0}")]
    Utf8Error(#[from] std::str::Utf8Error),
    #[error("{0}")]
    ParseBigIntError(#[from] num_bigint::ParseBigIntError),
    #[error("{0}")]
    ArcSelf(#[from] Arc<TonCoreError>),
}

impl TonCoreError {
    pub fn data<P: Into<String>, M: Into<String>>(producer: P, msg: M) -> Self {
        Self::DataError {
            producer: producer.into(),
            msg: msg.into(),
        }
    }

    pub fn out_of_range<V: ToString>(value: V, bits_len: usize) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            bits_len,
        }
    }
}
