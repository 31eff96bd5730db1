use crate::address::normalize;
use crate::config::PaymentConfig;
use crate::errors::{TonPayError, TonPayResult};
use crate::payload::serialize_payload;
use crate::resolver::TokenAccountResolver;
use crate::tep::TextComment;
use crate::tep::jetton::JettonTransferMsg;
use crate::units::to_minimal_units;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use strum::{Display, EnumString};
use ton_core::traits::tlb::TLB;
use ton_core::types::TonAddress;
use ton_core::types::tlb_core::TLBCoins;

// VarUInteger 16 holds at most 15 bytes
const MAX_COINS_BITS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum AssetKind {
    #[serde(rename = "TON")]
    #[strum(serialize = "TON")]
    Native,
    #[serde(rename = "USDT")]
    #[strum(serialize = "USDT")]
    Token,
}

/// What the user wants to pay: human-readable amount, destination and optional memo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    pub asset: AssetKind,
    pub amount: String,
    pub destination: String,
    pub memo: Option<String>,
}

/// Wallet-connect `sendTransaction` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub valid_until: u64,
    pub messages: Vec<TransferMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferMessage {
    pub address: String,
    /// nanoTON attached to the message, decimal integer
    pub amount: String,
    /// base64 BoC of the message body
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payload: Option<String>,
}

/// Turns transfer intents into wallet-connect requests.
///
/// Holds no mutable state: concurrent calls are independent.
#[derive(Clone)]
pub struct TransferAssembler {
    config: PaymentConfig,
    resolver: Arc<dyn TokenAccountResolver>,
}

impl TransferAssembler {
    pub fn new(config: PaymentConfig, resolver: Arc<dyn TokenAccountResolver>) -> Self { Self { config, resolver } }

    pub fn config(&self) -> &PaymentConfig { &self.config }

    pub async fn build_transfer(&self, intent: &TransferIntent, sender: Option<&str>) -> TonPayResult<TransferRequest> {
        let memo = intent.memo.as_deref();
        match intent.asset {
            AssetKind::Native => self.build_native_transfer(&intent.amount, &intent.destination, memo),
            AssetKind::Token => {
                let Some(sender) = sender else {
                    return Err(TonPayError::invalid_address("", "sender address is required for token transfers"));
                };
                self.build_token_transfer(&intent.amount, &intent.destination, sender, memo).await
            }
        }
    }

    pub fn build_native_transfer(
        &self,
        amount: &str,
        destination: &str,
        memo: Option<&str>,
    ) -> TonPayResult<TransferRequest> {
        let value = to_minimal_units(amount, self.config.native_decimals)?;
        let destination = normalize(destination)?.address;
        let payload = non_empty(memo).map(|text| serialize_payload(&TextComment::new(text), self.config.boc_with_crc32));

        let message = TransferMessage {
            address: self.config.format_address(&destination),
            amount: value.to_string(),
            payload,
        };
        log::info!("native transfer: {} nanoTON to {}", message.amount, message.address);
        self.make_request(message)
    }

    /// `sender` owns the token account the transfer is sent from and receives the excess TON
    pub async fn build_token_transfer(
        &self,
        amount: &str,
        destination: &str,
        sender: &str,
        memo: Option<&str>,
    ) -> TonPayResult<TransferRequest> {
        let destination = normalize(destination)?.address;
        let sender = normalize(sender)?.address;
        let token_amount = self.token_amount(amount)?;

        let token_account = self.resolver.resolve_token_account(&sender, &self.config.token_master).await?;
        let body = self.build_transfer_body(&destination, token_amount, &sender, memo)?;
        let payload = serialize_payload(&body, self.config.boc_with_crc32);

        let message = TransferMessage {
            address: self.config.format_address(&token_account),
            amount: self.config.token_transfer_value.to_string(),
            payload: Some(payload),
        };
        log::info!("token transfer: {token_amount} units to {destination} via {}", message.address);
        self.make_request(message)
    }

    /// Token transfer operation body. A comment, if any, goes into the forward payload by reference.
    pub fn build_transfer_body(
        &self,
        destination: &TonAddress,
        amount: TLBCoins,
        response_destination: &TonAddress,
        memo: Option<&str>,
    ) -> TonPayResult<JettonTransferMsg> {
        let mut body = JettonTransferMsg::new(*destination, amount, *response_destination)
            .with_query_id(self.config.query_id)
            .with_forward_ton_amount(TLBCoins::new(self.config.forward_ton_amount as u128));
        let comment = non_empty(memo).or(self.config.token_default_comment.as_deref());
        if let Some(text) = comment {
            body = body.with_forward_payload(TextComment::new(text).to_cell()?);
        }
        Ok(body)
    }

    fn token_amount(&self, amount: &str) -> TonPayResult<TLBCoins> {
        let value: BigUint = to_minimal_units(amount, self.config.token_decimals)?;
        if value.bits() > MAX_COINS_BITS {
            return Err(TonPayError::invalid_amount(amount, "amount is too large"));
        }
        TLBCoins::from_num(&value).map_err(|err| TonPayError::invalid_amount(amount, err))
    }

    fn make_request(&self, message: TransferMessage) -> TonPayResult<TransferRequest> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).map_err(TonPayError::system)?;
        let valid_until = (now + self.config.validity).as_secs();
        log::debug!("transfer request valid until {valid_until}");
        Ok(TransferRequest {
            valid_until,
            messages: vec![message],
        })
    }
}

fn non_empty(memo: Option<&str>) -> Option<&str> { memo.filter(|text| !text.is_empty()) }
