use crate::tests::utils::{MockHttpServer, init_logging};
use std::str::FromStr;
use tokio_test::{assert_err, assert_ok};
use ton_core::types::TonAddress;
use ton_pay::errors::TonPayError;
use ton_pay::price::{CoinGeckoPriceSource, TonPriceSource, quote_native_amount};
use ton_pay::resolver::{CachedTokenAccountResolver, TokenAccountResolver, ToncenterResolver};

const OWNER: &str = "EQACAgICAgICAgICAgICAgICAgICAgICAgICAgICAgICAsoi";
const MASTER: &str = "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs";

#[tokio::test]
async fn test_toncenter_resolver() -> anyhow::Result<()> {
    init_logging();
    let body = r#"{"jetton_wallets":[{"address":"0:0101010101010101010101010101010101010101010101010101010101010101","balance":"0","owner":"x","jetton":"y"}]}"#;
    let server = MockHttpServer::start(200, body).await?;
    let resolver = ToncenterResolver::builder()
        .with_base_url(server.base_url.clone())
        .with_api_key("secret".to_string())
        .build()?;
    let resolver = CachedTokenAccountResolver::new(resolver, 8);

    let owner = TonAddress::from_str(OWNER)?;
    let master = TonAddress::from_str(MASTER)?;
    for _ in 0..2 {
        let wallet = assert_ok!(resolver.resolve_token_account(&owner, &master).await);
        assert_eq!(wallet.to_string(), "EQABAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAc3j");
    }

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].target,
        format!("GET /api/v3/jetton/wallets?owner_address={OWNER}&jetton_address={MASTER}&limit=1")
    );
    assert_eq!(requests[0].api_key.as_deref(), Some("secret"));
    Ok(())
}

#[tokio::test]
async fn test_toncenter_resolver_failures() -> anyhow::Result<()> {
    init_logging();
    let owner = TonAddress::from_str(OWNER)?;
    let master = TonAddress::from_str(MASTER)?;

    let server = MockHttpServer::start(500, r#"{"error":"internal"}"#).await?;
    let resolver = ToncenterResolver::builder().with_base_url(server.base_url.clone()).build()?;
    let err = assert_err!(resolver.resolve_token_account(&owner, &master).await);
    assert!(matches!(err, TonPayError::ResolutionFailed { .. }));
    assert!(err.is_retryable());

    let server = MockHttpServer::start(200, r#"{"jetton_wallets":[]}"#).await?;
    let resolver = ToncenterResolver::builder().with_base_url(server.base_url.clone()).build()?;
    let err = assert_err!(resolver.resolve_token_account(&owner, &master).await);
    assert!(matches!(err, TonPayError::ResolutionFailed { .. }));
    Ok(())
}

#[tokio::test]
async fn test_coingecko_price_source() -> anyhow::Result<()> {
    init_logging();
    let server = MockHttpServer::start(200, r#"{"toncoin":{"usd":2.5}}"#).await?;
    let source = CoinGeckoPriceSource::builder().with_base_url(server.base_url.clone()).build()?;
    let price = source.ton_usd_price().await?;
    assert_eq!(price, "2.5");
    assert_eq!(quote_native_amount("10", &price)?, "4");
    assert_eq!(server.requests()[0].target, "GET /api/v3/simple/price?ids=toncoin&vs_currencies=usd");
    assert_eq!(server.requests()[0].api_key, None);

    let server = MockHttpServer::start(429, "{}").await?;
    let source = CoinGeckoPriceSource::builder().with_base_url(server.base_url.clone()).build()?;
    let err = assert_err!(source.ton_usd_price().await);
    assert!(matches!(err, TonPayError::PriceUnavailable(_)));
    Ok(())
}
