use crate::errors::{TonPayError, TonPayResult};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use ton_core::types::TonAddress;

const SEPARATOR: char = '/';
// bounceable / non-bounceable, mainnet / testnet
const KNOWN_PREFIXES: [&str; 4] = ["EQ", "UQ", "kQ", "0Q"];

/// How the address was obtained from the raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// Parsed as given
    Clean,
    /// Parsed after cutting a trailing `/...` suffix
    Sanitized,
    /// Parsed by the known-prefix recovery path
    Recovered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedAddress {
    pub address: TonAddress,
    pub outcome: NormalizeOutcome,
}

impl NormalizedAddress {
    /// Mainnet bounceable url-safe form
    pub fn canonical(&self) -> String { self.address.to_string() }
}

impl Display for NormalizedAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.address) }
}

/// Cuts everything starting from the first `/`.
pub fn sanitize(raw: &str) -> &str {
    match raw.split_once(SEPARATOR) {
        Some((head, _)) => head,
        None => raw,
    }
}

/// Parses an address that may carry a platform-appended `/suffix`.
///
/// A single recovery attempt is made for inputs that start with a known user-friendly prefix:
/// the first 48 characters are parsed as the address. Any other failure is `InvalidAddress`.
pub fn normalize(raw: &str) -> TonPayResult<NormalizedAddress> {
    let trimmed = raw.trim();
    let sanitized = sanitize(trimmed);
    let outcome = match sanitized.len() == trimmed.len() {
        true => NormalizeOutcome::Clean,
        false => NormalizeOutcome::Sanitized,
    };
    let first_err = match TonAddress::from_str(sanitized) {
        Ok(address) => {
            if outcome == NormalizeOutcome::Sanitized {
                log::debug!("address '{raw}' sanitized to '{sanitized}'");
            }
            return Ok(NormalizedAddress { address, outcome });
        }
        Err(err) => err,
    };

    if let Some(candidate) = recovery_candidate(trimmed) {
        match TonAddress::from_str(candidate) {
            Ok(address) => {
                log::warn!("address '{raw}' recovered as '{address}'");
                return Ok(NormalizedAddress {
                    address,
                    outcome: NormalizeOutcome::Recovered,
                });
            }
            Err(err) => log::warn!("address recovery failed for '{raw}': {err}"),
        }
    }
    Err(TonPayError::invalid_address(raw, first_err))
}

/// Shortcut for callers that don't care how the address was obtained
pub fn parse_address(raw: &str) -> TonPayResult<TonAddress> { Ok(normalize(raw)?.address) }

fn recovery_candidate(input: &str) -> Option<&str> {
    if !KNOWN_PREFIXES.iter().any(|prefix| input.starts_with(prefix)) {
        return None;
    }
    input.get(..TonAddress::USER_FRIENDLY_LEN)
}
