use crate::cell::TonHash;
use crate::types::TonAddress;
use ::serde::de::Error;
use ::serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

impl Serialize for TonHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_ton_hash_hex::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for TonHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_ton_hash_hex::deserialize(deserializer)
    }
}

impl Serialize for TonAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_ton_address_base64_url::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for TonAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_ton_address_base64_url::deserialize(deserializer)
    }
}

pub mod serde_ton_hash_hex {
    use super::*;

    pub fn serialize<S: Serializer>(hash: &TonHash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(hash.to_hex().as_str())
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TonHash, D::Error> {
        TonHash::from_str(&String::deserialize(deserializer)?).map_err(Error::custom)
    }
}

/// Writes `wc:hex`, reads any supported form
pub mod serde_ton_address_hex {
    use super::*;

    pub fn serialize<S: Serializer>(address: &TonAddress, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(address.to_hex().as_str())
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TonAddress, D::Error> {
        TonAddress::from_str(&String::deserialize(deserializer)?).map_err(Error::custom)
    }
}

/// Writes the mainnet bounceable url-safe form, reads any supported form
pub mod serde_ton_address_base64_url {
    use super::*;

    pub fn serialize<S: Serializer>(address: &TonAddress, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&address.to_base64(true, true, true))
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TonAddress, D::Error> {
        TonAddress::from_str(&String::deserialize(deserializer)?).map_err(Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct WalletRecord {
        #[serde(with = "serde_ton_address_hex")]
        owner: TonAddress,
        master: TonAddress,
        code_hash: TonHash,
        code_hash_opt: Option<TonHash>,
    }

    #[test]
    fn test_serde_address_and_hash() -> anyhow::Result<()> {
        let master = TonAddress::from_str("EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs")?;
        let owner = TonAddress::new(-1, TonHash::from_slice(&[7u8; 32])?);
        let code_hash = TonHash::from_str("9bb54a40af36ff58e865c6cca0bf3be3897054c962cb4a54c3b60962cb2a3041")?;
        let record = WalletRecord {
            owner,
            master,
            code_hash,
            code_hash_opt: None,
        };

        let value = serde_json::to_value(&record)?;
        let expected = json!({
            "owner": "-1:0707070707070707070707070707070707070707070707070707070707070707",
            "master": "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs",
            "code_hash": "9bb54a40af36ff58e865c6cca0bf3be3897054c962cb4a54c3b60962cb2a3041",
            "code_hash_opt": null,
        });
        assert_eq!(value, expected);
        assert_eq!(serde_json::from_value::<WalletRecord>(value)?, record);
        Ok(())
    }

    #[test]
    fn test_serde_address_accepts_raw_uppercase() -> anyhow::Result<()> {
        let raw = "\"0:B113A994B5024A16719F69139328EB759596C38A25F59028B146FECDC3621DFE\"";
        let address: TonAddress = serde_json::from_str(raw)?;
        assert_eq!(address.to_string(), "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs");
        assert!(serde_json::from_str::<TonAddress>("\"garbage\"").is_err());
        Ok(())
    }
}
