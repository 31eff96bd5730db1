use crate::errors::{TonPayError, TonPayResult};
use async_trait::async_trait;
use derive_setters::Setters;
use moka::future::Cache;
use reqwest::header;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use ton_core::types::TonAddress;

/// Finds the token account (jetton wallet) an owner holds for a given token master
#[async_trait]
pub trait TokenAccountResolver: Send + Sync {
    async fn resolve_token_account(&self, owner: &TonAddress, master: &TonAddress) -> TonPayResult<TonAddress>;
}

/// Looks up token accounts in the toncenter v3 index (`/api/v3/jetton/wallets`)
pub struct ToncenterResolver {
    base_url: String,
    http_client: reqwest::Client,
}

#[derive(Setters)]
#[setters(prefix = "with_", strip_option)]
pub struct ToncenterResolverBuilder {
    base_url: String,
    api_key: Option<String>,
    http_client: Option<reqwest::Client>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct JettonWalletsResponse {
    jetton_wallets: Vec<JettonWalletRecord>,
}

#[derive(Debug, Deserialize)]
struct JettonWalletRecord {
    address: TonAddress,
    #[serde(default)]
    balance: Option<String>,
}

impl ToncenterResolver {
    pub fn builder() -> ToncenterResolverBuilder {
        ToncenterResolverBuilder {
            base_url: "https://toncenter.com".to_string(),
            api_key: None,
            http_client: None,
            timeout: Duration::from_secs(10),
        }
    }

    fn wallets_url(&self, owner: &TonAddress, master: &TonAddress) -> String {
        format!(
            "{}/api/v3/jetton/wallets?owner_address={owner}&jetton_address={master}&limit=1",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl ToncenterResolverBuilder {
    pub fn build(self) -> TonPayResult<ToncenterResolver> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut headers = HeaderMap::from_iter([(header::ACCEPT, HeaderValue::from_static("application/json"))]);
                if let Some(api_key) = &self.api_key {
                    let value = HeaderValue::from_str(api_key).map_err(|err| TonPayError::Custom(err.to_string()))?;
                    headers.insert("x-api-key", value);
                }
                reqwest::Client::builder().default_headers(headers).timeout(self.timeout).build()?
            }
        };
        Ok(ToncenterResolver {
            base_url: self.base_url,
            http_client,
        })
    }
}

#[async_trait]
impl TokenAccountResolver for ToncenterResolver {
    async fn resolve_token_account(&self, owner: &TonAddress, master: &TonAddress) -> TonPayResult<TonAddress> {
        let url = self.wallets_url(owner, master);
        log::trace!("resolving token account: {url}");
        let resp = self.http_client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TonPayError::ResolutionFailed {
                owner: *owner,
                master: *master,
                reason: format!("response status {status}"),
            });
        }
        let body = resp.text().await?;
        parse_wallets_response(&body, owner, master)
    }
}

fn parse_wallets_response(body: &str, owner: &TonAddress, master: &TonAddress) -> TonPayResult<TonAddress> {
    let response: JettonWalletsResponse = serde_json::from_str(body).map_err(|err| TonPayError::ResolutionFailed {
        owner: *owner,
        master: *master,
        reason: format!("malformed response: {err}"),
    })?;
    let Some(wallet) = response.jetton_wallets.into_iter().next() else {
        return Err(TonPayError::ResolutionFailed {
            owner: *owner,
            master: *master,
            reason: "no jetton wallets found".to_string(),
        });
    };
    log::debug!("token account for owner {owner}: {}, balance: {:?}", wallet.address, wallet.balance);
    Ok(wallet.address)
}

/// Memoizes successful lookups: a token account address never changes for a given (owner, master)
pub struct CachedTokenAccountResolver<R> {
    inner: R,
    cache: Cache<(TonAddress, TonAddress), TonAddress>,
}

impl<R: TokenAccountResolver> CachedTokenAccountResolver<R> {
    pub fn new(inner: R, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }
}

#[async_trait]
impl<R: TokenAccountResolver> TokenAccountResolver for CachedTokenAccountResolver<R> {
    async fn resolve_token_account(&self, owner: &TonAddress, master: &TonAddress) -> TonPayResult<TonAddress> {
        let key = (*owner, *master);
        let lookup = self.inner.resolve_token_account(owner, master);
        Ok(self.cache.try_get_with(key, lookup).await?)
    }
}

#[async_trait]
impl<T: TokenAccountResolver + ?Sized> TokenAccountResolver for Arc<T> {
    async fn resolve_token_account(&self, owner: &TonAddress, master: &TonAddress) -> TonPayResult<TonAddress> {
        self.as_ref().resolve_token_account(owner, master).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    const OWNER: &str = "UQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_p0p";
    const MASTER: &str = "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs";

    struct CountingResolver {
        calls: AtomicUsize,
        result: Option<TonAddress>,
    }

    #[async_trait]
    impl TokenAccountResolver for CountingResolver {
        async fn resolve_token_account(&self, owner: &TonAddress, master: &TonAddress) -> TonPayResult<TonAddress> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.ok_or_else(|| TonPayError::ResolutionFailed {
                owner: *owner,
                master: *master,
                reason: "not found".to_string(),
            })
        }
    }

    #[test]
    fn test_parse_wallets_response() -> anyhow::Result<()> {
        let owner = TonAddress::from_str(OWNER)?;
        let master = TonAddress::from_str(MASTER)?;
        let body = r#"{
            "jetton_wallets": [{
                "address": "0:0101010101010101010101010101010101010101010101010101010101010101",
                "balance": "1000000",
                "owner": "0:B113A994B5024A16719F69139328EB759596C38A25F59028B146FECDC3621DFE",
                "jetton": "0:B113A994B5024A16719F69139328EB759596C38A25F59028B146FECDC3621DFE"
            }],
            "address_book": {}
        }"#;
        let wallet = parse_wallets_response(body, &owner, &master)?;
        assert_eq!(wallet.to_string(), "EQABAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAc3j");

        let err = assert_err!(parse_wallets_response(r#"{"jetton_wallets": []}"#, &owner, &master));
        assert!(matches!(err, TonPayError::ResolutionFailed { .. }));
        assert!(err.is_retryable());
        assert_err!(parse_wallets_response("not json", &owner, &master));
        Ok(())
    }

    #[test]
    fn test_toncenter_wallets_url() -> anyhow::Result<()> {
        let resolver = ToncenterResolver::builder().with_base_url("https://example.org/".to_string()).build()?;
        let url = resolver.wallets_url(&TonAddress::from_str(OWNER)?, &TonAddress::from_str(MASTER)?);
        assert_eq!(
            url,
            format!("https://example.org/api/v3/jetton/wallets?owner_address={MASTER}&jetton_address={MASTER}&limit=1")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_cached_resolver() -> anyhow::Result<()> {
        let owner = TonAddress::from_str(OWNER)?;
        let master = TonAddress::from_str(MASTER)?;
        let wallet = TonAddress::from_str("EQABAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAc3j")?;
        let inner = CountingResolver {
            calls: AtomicUsize::new(0),
            result: Some(wallet),
        };
        let resolver = CachedTokenAccountResolver::new(inner, 16);
        for _ in 0..3 {
            let resolved = assert_ok!(resolver.resolve_token_account(&owner, &master).await);
            assert_eq!(resolved, wallet);
        }
        assert_eq!(resolver.inner.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_cached_resolver_doesnt_cache_errors() -> anyhow::Result<()> {
        let owner = TonAddress::from_str(OWNER)?;
        let master = TonAddress::from_str(MASTER)?;
        let inner = CountingResolver {
            calls: AtomicUsize::new(0),
            result: None,
        };
        let resolver = CachedTokenAccountResolver::new(inner, 16);
        let err = assert_err!(resolver.resolve_token_account(&owner, &master).await);
        assert!(err.is_retryable());
        assert_err!(resolver.resolve_token_account(&owner, &master).await);
        assert_eq!(resolver.inner.calls.load(Ordering::SeqCst), 2);
        Ok(())
    }
}
