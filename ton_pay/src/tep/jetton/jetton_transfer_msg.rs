use ton_core::TLB;
use ton_core::cell::TonCell;
use ton_core::types::TonAddress;
use ton_core::types::tlb_core::{TLBCoins, TLBRef};

/// ```raw
/// transfer#0f8a7ea5 query_id:uint64 amount:(VarUInteger 16) destination:MsgAddress
///     response_destination:MsgAddress custom_payload:(Maybe ^Cell)
///     forward_ton_amount:(VarUInteger 16) forward_payload:(Either Cell ^Cell)
///     = InternalMsgBody;
/// ```
/// `forward_payload` is always stored by reference: the flag bit is set only when it's present.
#[derive(Debug, Clone, PartialEq, TLB)]
#[tlb(prefix = 0x0f8a7ea5, bits_len = 32, ensure_empty = true)]
pub struct JettonTransferMsg {
    pub query_id: u64,
    pub amount: TLBCoins,
    pub destination: TonAddress,
    pub response_destination: TonAddress,
    pub custom_payload: Option<TLBRef<TonCell>>,
    pub forward_ton_amount: TLBCoins,
    pub forward_payload: Option<TLBRef<TonCell>>,
}

impl JettonTransferMsg {
    pub const OPCODE: u32 = 0x0f8a7ea5;

    pub fn new(destination: TonAddress, amount: TLBCoins, response_destination: TonAddress) -> Self {
        Self {
            query_id: 0,
            amount,
            destination,
            response_destination,
            custom_payload: None,
            forward_ton_amount: TLBCoins::ONE,
            forward_payload: None,
        }
    }

    pub fn with_query_id(mut self, query_id: u64) -> Self {
        self.query_id = query_id;
        self
    }

    pub fn with_forward_ton_amount(mut self, forward_ton_amount: TLBCoins) -> Self {
        self.forward_ton_amount = forward_ton_amount;
        self
    }

    pub fn with_forward_payload(mut self, payload: TonCell) -> Self {
        self.forward_payload = Some(TLBRef::new(payload));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tep::TextComment;
    use std::str::FromStr;
    use ton_core::cell::TonHash;
    use ton_core::traits::tlb::TLB;

    fn addresses() -> anyhow::Result<(TonAddress, TonAddress)> {
        let destination = TonAddress::from_str("EQABAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAc3j")?;
        let response = TonAddress::from_str("EQACAgICAgICAgICAgICAgICAgICAgICAgICAgICAgICAsoi")?;
        Ok((destination, response))
    }

    #[test]
    fn test_jetton_transfer_msg_with_comment() -> anyhow::Result<()> {
        let (destination, response) = addresses()?;
        let comment = TextComment::new("Payment ID: 42").to_cell()?;
        let msg = JettonTransferMsg::new(destination, TLBCoins::new(10_250_000), response).with_forward_payload(comment);

        let cell = msg.to_cell()?;
        assert_eq!(cell.data_len_bits(), 672);
        assert_eq!(cell.refs().len(), 1);
        assert_eq!(cell.parser().read_num::<u32>(32)?, JettonTransferMsg::OPCODE);
        let expected = TonHash::from_str("6dc40633b18e82af03b9f9e63f5f1ae79db777a6e1d129a72064072e2747c295")?;
        assert_eq!(cell.hash(), &expected);

        let boc = msg.to_boc_base64(true)?;
        assert_eq!(
            boc,
            "te6cckEBAgEAawABqA+KfqUAAAAAAAAAADnGcQgAAgICAgICAgICAgICAgICAgICAgICAgICAgICAgICAgMAAICAgICAgICAgICAgICAgICAgICAgICAgICAgICAgICCAwEAJAAAAABQYXltZW50IElEOiA0MqT9dAI="
        );
        let parsed = JettonTransferMsg::from_boc_base64(&boc)?;
        assert_eq!(parsed, msg);
        let forward = parsed.forward_payload.as_ref().map(|x| TextComment::from_cell(x)).transpose()?;
        assert_eq!(forward.map(|x| x.text).as_deref(), Some("Payment ID: 42"));
        Ok(())
    }

    #[test]
    fn test_jetton_transfer_msg_without_payload() -> anyhow::Result<()> {
        let (destination, response) = addresses()?;
        let msg = JettonTransferMsg::new(destination, TLBCoins::new(10_250_000), response);
        let cell = msg.to_cell()?;
        assert_eq!(cell.data_len_bits(), 672);
        assert!(cell.refs().is_empty());
        let expected = TonHash::from_str("c1af8a0ddf5760bbf6381ecfb424fb0df4b4042023c265049097e2356a51663a")?;
        assert_eq!(cell.hash(), &expected);
        assert_eq!(JettonTransferMsg::from_cell(&cell)?, msg);
        Ok(())
    }
}
