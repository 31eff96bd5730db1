use crate::errors::{TonPayError, TonPayResult};
use crate::units::{NATIVE_DECIMALS, from_minimal_units, to_minimal_units};
use async_trait::async_trait;
use derive_setters::Setters;
use num_bigint::BigUint;
use num_traits::Zero;
use serde_json::Value;
use std::time::Duration;

// price precision: micro-USD
const PRICE_DECIMALS: u32 = 6;

/// Source of the current TON/USD rate, as a decimal string
#[async_trait]
pub trait TonPriceSource: Send + Sync {
    async fn ton_usd_price(&self) -> TonPayResult<String>;
}

/// Converts a USD-denominated amount into TON at `ton_usd_price`.
///
/// Result has at most 9 decimals and is floored, so the payer never sends more than quoted.
pub fn quote_native_amount(usd_amount: &str, ton_usd_price: &str) -> TonPayResult<String> {
    let usd_micro = to_minimal_units(usd_amount, PRICE_DECIMALS)?;
    let price_micro = to_minimal_units(ton_usd_price, PRICE_DECIMALS)
        .map_err(|err| TonPayError::PriceUnavailable(format!("bad price '{ton_usd_price}': {err}")))?;
    if price_micro.is_zero() {
        return Err(TonPayError::PriceUnavailable(format!("price '{ton_usd_price}' rounds to zero")));
    }
    let nano = usd_micro * BigUint::from(10u32).pow(NATIVE_DECIMALS) / price_micro;
    Ok(from_minimal_units(&nano, NATIVE_DECIMALS))
}

/// `GET /api/v3/simple/price?ids=toncoin&vs_currencies=usd`
pub struct CoinGeckoPriceSource {
    base_url: String,
    http_client: reqwest::Client,
    fallback_price: Option<String>,
}

#[derive(Setters)]
#[setters(prefix = "with_", strip_option)]
pub struct CoinGeckoPriceSourceBuilder {
    base_url: String,
    http_client: Option<reqwest::Client>,
    timeout: Duration,
    /// Used (with a warning) when the API can't be reached
    fallback_price: Option<String>,
}

impl CoinGeckoPriceSource {
    pub fn builder() -> CoinGeckoPriceSourceBuilder {
        CoinGeckoPriceSourceBuilder {
            base_url: "https://api.coingecko.com".to_string(),
            http_client: None,
            timeout: Duration::from_secs(10),
            fallback_price: None,
        }
    }

    async fn fetch_price(&self) -> TonPayResult<String> {
        let url = format!(
            "{}/api/v3/simple/price?ids=toncoin&vs_currencies=usd",
            self.base_url.trim_end_matches('/')
        );
        let resp = self.http_client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TonPayError::PriceUnavailable(format!("{url} responded with {status}")));
        }
        parse_price_response(&resp.text().await?)
    }
}

impl CoinGeckoPriceSourceBuilder {
    pub fn build(self) -> TonPayResult<CoinGeckoPriceSource> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().timeout(self.timeout).build()?,
        };
        Ok(CoinGeckoPriceSource {
            base_url: self.base_url,
            http_client,
            fallback_price: self.fallback_price,
        })
    }
}

#[async_trait]
impl TonPriceSource for CoinGeckoPriceSource {
    async fn ton_usd_price(&self) -> TonPayResult<String> {
        match self.fetch_price().await {
            Ok(price) => Ok(price),
            Err(err) => match &self.fallback_price {
                Some(fallback) => {
                    log::warn!("failed to get TON price: {err}, using fallback price {fallback}");
                    Ok(fallback.clone())
                }
                None => Err(err),
            },
        }
    }
}

fn parse_price_response(body: &str) -> TonPayResult<String> {
    let json: Value = serde_json::from_str(body)?;
    match &json["toncoin"]["usd"] {
        Value::Number(price) => Ok(price.to_string()),
        other => Err(TonPayError::PriceUnavailable(format!("unexpected toncoin.usd value: {other}"))),
    }
}
