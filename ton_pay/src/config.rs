use crate::errors::TonPayResult;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
use std::fs::exists;
use std::time::Duration;
use ton_core::types::TonAddress;

pub const TON_PAY_CONFIG_DEFAULT: &str = include_str!("../resources/config/default.json");
pub const TON_PAY_CONFIG_PATH_ENV: &str = "TON_PAY_CONFIG_PATH";

/// Everything the assembler treats as policy: decimals, fees, the token master, validity window.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(prefix = "with_", strip_option)]
pub struct PaymentConfig {
    /// Output addresses carry the testnet flag when false
    pub mainnet: bool,
    pub native_decimals: u32,
    pub token_decimals: u32,
    pub token_master: TonAddress,
    /// nanoTON attached to the token-transfer message to pay for gas and forwarding
    pub token_transfer_value: u64,
    /// nanoTON forwarded with the transfer notification
    pub forward_ton_amount: u64,
    pub query_id: u64,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "validity_sec")]
    pub validity: Duration,
    pub boc_with_crc32: bool,
    /// Forward comment for token transfers without a memo
    pub token_default_comment: Option<String>,
    pub toncenter_url: String,
}

impl PaymentConfig {
    pub fn from_json(json: &str) -> TonPayResult<Self> { Ok(serde_json::from_str(json)?) }

    pub fn from_path(path: &str) -> TonPayResult<Self> { Self::from_json(&std::fs::read_to_string(path)?) }

    /// Takes `TON_PAY_CONFIG_PATH` from env if set, otherwise uses the built-in config
    pub fn new_default() -> TonPayResult<Self> {
        if let Ok(path) = std::env::var(TON_PAY_CONFIG_PATH_ENV) {
            if exists(&path)? {
                log::info!("Using payment config from {path}");
                return Self::from_path(&path);
            }
            log::warn!("env_var {TON_PAY_CONFIG_PATH_ENV} is set, but path {path} is not available");
        }
        Self::from_json(TON_PAY_CONFIG_DEFAULT)
    }

    pub fn to_json(&self) -> TonPayResult<String> { Ok(serde_json::to_string_pretty(self)?) }

    /// Address as it goes into a transfer message
    pub fn format_address(&self, address: &TonAddress) -> String { address.to_base64(self.mainnet, true, true) }
}
