use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ton_core::cell::{BoC, TonCell};
use ton_core::errors::TonCoreResult;
use ton_core::traits::tlb::TLB;

/// base64 BoC of an empty cell
pub fn empty_payload(add_crc32: bool) -> String {
    match BoC::new(TonCell::empty().clone()).to_base64(add_crc32) {
        Ok(boc) => boc,
        Err(err) => {
            log::error!("failed to serialize empty cell: {err}");
            STANDARD.encode(TonCell::EMPTY_BOC)
        }
    }
}

/// Serializes `body` into a base64 BoC. Never fails: on error, the empty-cell payload is returned.
pub fn serialize_payload<T: TLB>(body: &T, add_crc32: bool) -> String {
    match try_serialize_payload(body, add_crc32) {
        Ok(boc) => boc,
        Err(err) => {
            log::error!("payload serialization failed, using empty cell instead: {err}");
            empty_payload(add_crc32)
        }
    }
}

pub fn try_serialize_payload<T: TLB>(body: &T, add_crc32: bool) -> TonCoreResult<String> {
    body.to_boc_base64(add_crc32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tep::TextComment;

    #[test]
    fn test_serialize_payload() {
        let payload = serialize_payload(&TextComment::new("Payment ID: 42"), true);
        assert_eq!(payload, "te6cckEBAQEAFAAAJAAAAABQYXltZW50IElEOiA0MtTUlvg=");
    }

    #[test]
    fn test_serialize_payload_fallback() {
        // empty comments are rejected by the encoder
        assert!(try_serialize_payload(&TextComment::new(""), true).is_err());
        assert_eq!(serialize_payload(&TextComment::new(""), true), "te6cckEBAQEAAgAAAEysuc0=");
        assert_eq!(serialize_payload(&TextComment::new(""), false), "te6ccgEBAQEAAgAAAA==");
    }
}
