use crate::tests::utils::init_logging;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::str::FromStr;
use std::sync::Arc;
use tokio_test::assert_err;
use ton_core::cell::TonCell;
use ton_core::traits::tlb::TLB;
use ton_core::types::TonAddress;
use ton_pay::config::PaymentConfig;
use ton_pay::errors::{TonPayError, TonPayResult};
use ton_pay::payment_data::PaymentData;
use ton_pay::resolver::TokenAccountResolver;
use ton_pay::tep::TextComment;
use ton_pay::tep::jetton::JettonTransferMsg;
use ton_pay::transfer::TransferAssembler;

const MERCHANT: &str = "UQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_p0p";
const PAYER: &str = "EQACAgICAgICAgICAgICAgICAgICAgICAgICAgICAgICAsoi";
const PAYER_TOKEN_ACCOUNT: &str = "EQABAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAc3j";

struct MockResolver {
    known_owner: TonAddress,
}

#[async_trait]
impl TokenAccountResolver for MockResolver {
    async fn resolve_token_account(&self, owner: &TonAddress, master: &TonAddress) -> TonPayResult<TonAddress> {
        if owner != &self.known_owner {
            return Err(TonPayError::ResolutionFailed {
                owner: *owner,
                master: *master,
                reason: "unknown owner".to_string(),
            });
        }
        Ok(TonAddress::from_str(PAYER_TOKEN_ACCOUNT)?)
    }
}

fn make_assembler() -> anyhow::Result<TransferAssembler> {
    init_logging();
    let resolver = MockResolver {
        known_owner: TonAddress::from_str(PAYER)?,
    };
    Ok(TransferAssembler::new(PaymentConfig::new_default()?, Arc::new(resolver)))
}

fn encode_payment_data(json: &str) -> String { STANDARD.encode(json) }

#[tokio::test]
async fn test_token_payment_flow() -> anyhow::Result<()> {
    let assembler = make_assembler()?;
    // address arrives with a platform-appended suffix
    let encoded = encode_payment_data(&format!(
        r#"{{"amount":"10.25","address":"{MERCHANT}/startapp","payment_id":"order-17","type":"USDT"}}"#
    ));
    let intent = PaymentData::from_base64(&encoded)?.into_intent();
    let request = assembler.build_transfer(&intent, Some(PAYER)).await?;

    let message = &request.messages[0];
    assert_eq!(message.address, PAYER_TOKEN_ACCOUNT);
    assert_eq!(message.amount, "50000000");

    let payload = message.payload.clone().unwrap_or_default();
    let root = TonCell::from_boc_base64(&payload)?;
    assert_eq!(root.parser().read_num::<u32>(32)?, JettonTransferMsg::OPCODE);

    let body = JettonTransferMsg::from_cell(&root)?;
    assert_eq!(body.query_id, 0);
    assert_eq!(body.amount.to_u128(), 10_250_000);
    assert_eq!(body.destination, TonAddress::from_str(MERCHANT)?);
    assert_eq!(body.response_destination, TonAddress::from_str(PAYER)?);
    assert_eq!(body.custom_payload, None);
    assert_eq!(body.forward_ton_amount.to_u128(), 1);
    let comment = body.forward_payload.map(|x| TextComment::from_cell(&x)).transpose()?;
    assert_eq!(comment.map(|x| x.text).as_deref(), Some("Payment ID: order-17"));

    let json = serde_json::to_value(&request)?;
    assert!(json["validUntil"].as_u64().is_some());
    assert_eq!(json["messages"][0]["payload"], payload);
    Ok(())
}

#[tokio::test]
async fn test_native_payment_flow() -> anyhow::Result<()> {
    let assembler = make_assembler()?;
    let encoded = encode_payment_data(&format!(r#"{{"amount":"1.5","address":"{MERCHANT}","type":"TON"}}"#));
    let intent = PaymentData::from_base64(&encoded)?.into_intent();
    let request = assembler.build_transfer(&intent, None).await?;

    let message = &request.messages[0];
    assert_eq!(message.amount, "1500000000");
    // canonical form is bounceable
    assert_eq!(message.address, "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs");
    assert_eq!(message.payload, None);
    Ok(())
}

#[tokio::test]
async fn test_payment_flow_errors() -> anyhow::Result<()> {
    let assembler = make_assembler()?;

    let intent = PaymentData::from_json(&format!(r#"{{"amount":"5","address":"{MERCHANT}","type":"USDT"}}"#))?
        .into_intent();
    let err = assert_err!(assembler.build_transfer(&intent, Some(MERCHANT)).await);
    assert!(matches!(err, TonPayError::ResolutionFailed { .. }));
    assert!(err.is_retryable());

    let intent = PaymentData::from_json(r#"{"amount":"5","address":"not-an-address","type":"TON"}"#)?.into_intent();
    let err = assert_err!(assembler.build_transfer(&intent, None).await);
    assert!(matches!(err, TonPayError::InvalidAddress { .. }));
    assert!(err.is_validation());
    Ok(())
}
