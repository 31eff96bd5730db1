use std::sync::Arc;
use thiserror::Error;
use ton_core::errors::TonCoreError;
use ton_core::types::TonAddress;

#[macro_export]
macro_rules! bail_ton_pay {
    ($($arg:tt)*) => {
        return Err($crate::errors::TonPayError::Custom(format!($($arg)*)))
    };
}

pub type TonPayResult<T> = Result<T, TonPayError>;

#[derive(Error, Debug)]
pub enum TonPayError {
    // user input
    #[error("InvalidAmount: '{input}' is not a valid amount: {reason}")]
    InvalidAmount { input: String, reason: String },
    #[error("InvalidAddress: '{input}' is not a valid address: {reason}")]
    InvalidAddress { input: String, reason: String },
    #[error("InvalidPaymentData: {0}")]
    InvalidPaymentData(String),

    // external collaborators
    #[error("ResolutionFailed: no token account for owner={owner}, master={master}: {reason}")]
    ResolutionFailed {
        owner: TonAddress,
        master: TonAddress,
        reason: String,
    },
    #[error("PriceUnavailable: {0}")]
    PriceUnavailable(String),

    // handling system errors such as system_time
    #[error("SystemError: {0}")]
    SystemError(String),
    #[error("TonCoreError: {0}")]
    TonCoreError(#[from] TonCoreError),
    #[error("{0}")]
    ArcSelf(Arc<TonPayError>),
    #[error("CustomError: {0}")]
    Custom(String),

    #[error("{0}")]
    DecodeError(#[from] base64::DecodeError),
    #[error("{0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),
    #[error("{0}")]
    IO(#[from] std::io::Error),
    #[error("{0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Transport error ({0})")]
    TransportError(#[from] reqwest::Error),
}

/// Coarse classification for callers deciding how to report a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input: report as a validation failure
    Validation,
    /// External dependency failed: the caller may offer a retry
    External,
    /// Cell/BoC misuse or other internal defect
    Internal,
}

impl TonPayError {
    pub fn system<T: ToString>(msg: T) -> Self { TonPayError::SystemError(msg.to_string()) }

    pub fn invalid_amount<I: Into<String>, R: ToString>(input: I, reason: R) -> Self {
        TonPayError::InvalidAmount {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_address<I: Into<String>, R: ToString>(input: I, reason: R) -> Self {
        TonPayError::InvalidAddress {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TonPayError::InvalidAmount { .. }
            | TonPayError::InvalidAddress { .. }
            | TonPayError::InvalidPaymentData(_)
            | TonPayError::DecodeError(_)
            | TonPayError::FromUtf8(_) => ErrorKind::Validation,
            TonPayError::ResolutionFailed { .. } | TonPayError::PriceUnavailable(_) | TonPayError::TransportError(_) => {
                ErrorKind::External
            }
            TonPayError::ArcSelf(inner) => inner.kind(),
            _ => ErrorKind::Internal,
        }
    }

    pub fn is_validation(&self) -> bool { self.kind() == ErrorKind::Validation }

    pub fn is_retryable(&self) -> bool { self.kind() == ErrorKind::External }
}

impl From<Arc<TonPayError>> for TonPayError {
    fn from(err: Arc<TonPayError>) -> Self { Self::ArcSelf(err) }
}
