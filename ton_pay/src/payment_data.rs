use crate::errors::{TonPayError, TonPayResult};
use crate::transfer::{AssetKind, TransferIntent};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use serde::{Deserialize, Serialize};

/// Payment request handed to the mini-app as a base64-encoded JSON query parameter:
/// `{"amount": "10", "address": "EQ...", "payment_id": "42", "type": "USDT"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentData {
    pub amount: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(rename = "type")]
    pub asset: AssetKind,
}

impl PaymentData {
    pub fn from_json(json: &str) -> TonPayResult<Self> {
        let data: PaymentData =
            serde_json::from_str(json).map_err(|err| TonPayError::InvalidPaymentData(err.to_string()))?;
        if data.amount.trim().is_empty() {
            return Err(TonPayError::InvalidPaymentData("amount is empty".to_string()));
        }
        if data.address.trim().is_empty() {
            return Err(TonPayError::InvalidPaymentData("address is empty".to_string()));
        }
        Ok(data)
    }

    /// Accepts both standard and url-safe alphabets
    pub fn from_base64(encoded: &str) -> TonPayResult<Self> {
        let encoded = encoded.trim();
        let bytes = match encoded.contains(['-', '_']) {
            true => URL_SAFE.decode(encoded)?,
            false => STANDARD.decode(encoded)?,
        };
        Self::from_json(&String::from_utf8(bytes)?)
    }

    pub fn to_base64(&self) -> TonPayResult<String> { Ok(STANDARD.encode(serde_json::to_vec(self)?)) }

    /// Comment attached to the transfer: `Payment ID: <id>`
    pub fn memo(&self) -> Option<String> {
        self.payment_id.as_deref().filter(|id| !id.is_empty()).map(|id| format!("Payment ID: {id}"))
    }

    pub fn into_intent(self) -> TransferIntent {
        let memo = self.memo();
        TransferIntent {
            asset: self.asset,
            amount: self.amount,
            destination: self.address,
            memo,
        }
    }
}
