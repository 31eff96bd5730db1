use crate::bail_ton_core_data;
use crate::cell::{CellBuilder, CellParser, TonHash};
use crate::errors::{TonCoreError, TonCoreResult};
use crate::traits::tlb::{TLB, TLBPrefix};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use crc::Crc;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

const CRC_16_XMODEM: Crc<u16> = Crc::<u16>::new(&crc::CRC_16_XMODEM);

/// Internal account address: workchain + 256-bit account id.
///
/// Parsed from raw (`0:b113...`) or user-friendly base64 forms (url-safe or standard).
/// `Display` renders the canonical mainnet bounceable url-safe form (`EQ...`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TonAddress {
    pub workchain: i32,
    pub hash: TonHash,
}

/// Flags carried by the tag byte of a user-friendly address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserFriendlyFlags {
    pub bounceable: bool,
    pub testnet: bool,
    pub url_safe: bool,
}

impl TonAddress {
    pub const ZERO: TonAddress = TonAddress::new(0, TonHash::ZERO);
    pub const USER_FRIENDLY_LEN: usize = 48;

    const TAG_BOUNCEABLE: u8 = 0x11;
    const TAG_NON_BOUNCEABLE: u8 = 0x51;
    const TAG_TESTNET: u8 = 0x80;

    pub const fn new(workchain: i32, hash: TonHash) -> Self { Self { workchain, hash } }

    /// `workchain:hex_account_id`
    pub fn from_hex_str(s: &str) -> TonCoreResult<Self> {
        let Some((wc_str, hash_str)) = s.split_once(':') else {
            bail_ton_core_data!("Raw address must be in form wc:hex, got {s}");
        };
        let workchain = i32::from_str(wc_str)?;
        if i8::try_from(workchain).is_err() {
            bail_ton_core_data!("Workchain {workchain} doesn't fit into int8: {s}");
        }
        if hash_str.len() != TonHash::BYTES_LEN * 2 {
            bail_ton_core_data!("Raw address hash must be 64 hex chars, got {}: {s}", hash_str.len());
        }
        Ok(Self::new(workchain, TonHash::from_vec(hex::decode(hash_str)?)?))
    }

    pub fn from_base64(s: &str) -> TonCoreResult<Self> { Ok(Self::from_base64_with_flags(s)?.0) }

    pub fn from_base64_with_flags(s: &str) -> TonCoreResult<(Self, UserFriendlyFlags)> {
        if s.len() != Self::USER_FRIENDLY_LEN {
            bail_ton_core_data!("User-friendly address must be {} chars, got {}: {s}", Self::USER_FRIENDLY_LEN, s.len());
        }
        let url_safe = !s.contains(['+', '/']);
        let bytes = match url_safe {
            true => URL_SAFE.decode(s)?,
            false => STANDARD.decode(s)?,
        };
        if bytes.len() != 36 {
            bail_ton_core_data!("User-friendly address must be 36 bytes, got {}: {s}", bytes.len());
        }

        let expected_crc = u16::from_be_bytes([bytes[34], bytes[35]]);
        let actual_crc = CRC_16_XMODEM.checksum(&bytes[..34]);
        if expected_crc != actual_crc {
            bail_ton_core_data!("CRC16 mismatch in {s}: expected {expected_crc:04x}, got {actual_crc:04x}");
        }

        let tag = bytes[0];
        let testnet = tag & Self::TAG_TESTNET != 0;
        let bounceable = match tag & !Self::TAG_TESTNET {
            Self::TAG_BOUNCEABLE => true,
            Self::TAG_NON_BOUNCEABLE => false,
            _ => bail_ton_core_data!("Unknown address tag {tag:#04x}: {s}"),
        };
        let workchain = bytes[1] as i8 as i32;
        let hash = TonHash::from_slice(&bytes[2..34])?;
        let flags = UserFriendlyFlags {
            bounceable,
            testnet,
            url_safe,
        };
        Ok((Self::new(workchain, hash), flags))
    }

    pub fn to_hex(&self) -> String { format!("{}:{}", self.workchain, self.hash.to_hex()) }

    pub fn to_base64(&self, mainnet: bool, bounceable: bool, url_safe: bool) -> String {
        let mut tag = match bounceable {
            true => Self::TAG_BOUNCEABLE,
            false => Self::TAG_NON_BOUNCEABLE,
        };
        if !mainnet {
            tag |= Self::TAG_TESTNET;
        }
        let mut bytes = Vec::with_capacity(36);
        bytes.push(tag);
        bytes.push(self.workchain as i8 as u8);
        bytes.extend_from_slice(self.hash.as_slice());
        bytes.extend(CRC_16_XMODEM.checksum(&bytes).to_be_bytes());
        match url_safe {
            true => URL_SAFE.encode(bytes),
            false => STANDARD.encode(bytes),
        }
    }
}

impl FromStr for TonAddress {
    type Err = TonCoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            return Self::from_hex_str(s);
        }
        Self::from_base64(s)
    }
}

impl Display for TonAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.to_base64(true, true, true)) }
}

impl Debug for TonAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "TonAddress[{}]", self.to_hex()) }
}

// addr_std$10 anycast:(Maybe Anycast) workchain_id:int8 address:bits256 = MsgAddressInt;
impl TLB for TonAddress {
    const PREFIX: TLBPrefix = TLBPrefix::new(0b10, 2);

    fn read_definition(parser: &mut CellParser) -> TonCoreResult<Self> {
        if parser.read_bit()? {
            bail_ton_core_data!("Anycast addresses are not supported");
        }
        let workchain: i8 = parser.read_num(8)?;
        let hash = TonHash::read(parser)?;
        Ok(Self::new(workchain as i32, hash))
    }

    fn write_definition(&self, builder: &mut CellBuilder) -> TonCoreResult<()> {
        let Ok(workchain) = i8::try_from(self.workchain) else {
            return Err(TonCoreError::out_of_range(self.workchain, 8));
        };
        builder.write_bit(false)?; // anycast
        builder.write_num(&workchain, 8)?;
        self.hash.write(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::TonCell;
    use tokio_test::assert_err;

    const USDT_MASTER: &str = "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs";
    const USDT_MASTER_HEX: &str = "0:b113a994b5024a16719f69139328eb759596c38a25f59028b146fecdc3621dfe";

    #[test]
    fn test_ton_address_from_base64() -> anyhow::Result<()> {
        let (address, flags) = TonAddress::from_base64_with_flags(USDT_MASTER)?;
        assert_eq!(address.to_hex(), USDT_MASTER_HEX);
        assert!(flags.bounceable);
        assert!(!flags.testnet);
        assert!(flags.url_safe);
        assert_eq!(address.to_string(), USDT_MASTER);
        Ok(())
    }

    #[test]
    fn test_ton_address_all_forms() -> anyhow::Result<()> {
        let address = TonAddress::from_str(USDT_MASTER_HEX)?;
        assert_eq!(address.to_base64(true, false, true), "UQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_p0p");
        assert_eq!(address.to_base64(false, true, true), "kQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_ntm");
        assert_eq!(address.to_base64(false, false, true), "0QCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_iaj");
        assert_eq!(address.to_base64(true, true, false), "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id/sDs");

        for form in [
            "UQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_p0p",
            "kQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_ntm",
            "0QCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_iaj",
            "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id/sDs",
        ] {
            assert_eq!(TonAddress::from_str(form)?, address, "form: {form}");
        }
        let (_, flags) = TonAddress::from_base64_with_flags("0QCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_iaj")?;
        assert!(!flags.bounceable);
        assert!(flags.testnet);
        Ok(())
    }

    #[test]
    fn test_ton_address_masterchain() -> anyhow::Result<()> {
        let hash = TonHash::from_vec((0u8..32).collect())?;
        let address = TonAddress::new(-1, hash);
        assert_eq!(address.to_string(), "Ef8AAQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eH-Lr");
        assert_eq!(TonAddress::from_str(&address.to_string())?, address);
        assert_eq!(TonAddress::from_str(&address.to_hex())?, address);
        Ok(())
    }

    #[test]
    fn test_ton_address_invalid() {
        assert_err!(TonAddress::from_str(""));
        assert_err!(TonAddress::from_str("not-an-address"));
        assert_err!(TonAddress::from_str("EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id"));
        // broken crc
        assert_err!(TonAddress::from_str("EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDt"));
        assert_err!(TonAddress::from_str("0:b113"));
        assert_err!(TonAddress::from_str("x:b113a994b5024a16719f69139328eb759596c38a25f59028b146fecdc3621dfe"));
        // workchain must fit into int8
        assert_err!(TonAddress::from_str("1000:b113a994b5024a16719f69139328eb759596c38a25f59028b146fecdc3621dfe"));
        assert_err!(TonAddress::from_str("-129:b113a994b5024a16719f69139328eb759596c38a25f59028b146fecdc3621dfe"));
    }

    #[test]
    fn test_ton_address_tlb() -> anyhow::Result<()> {
        let address = TonAddress::from_str(USDT_MASTER)?;
        let cell = address.to_cell()?;
        assert_eq!(cell.data_len_bits(), 267);
        // 10 0 00000000 b1...
        assert_eq!(cell.data()[0], 0b1000_0000);
        assert_eq!(cell.data()[1], 0b0001_0110);
        assert_eq!(TonAddress::from_cell(&cell)?, address);

        let mut builder = TonCell::builder();
        assert_err!(TonAddress::new(300, TonHash::ZERO).write(&mut builder));
        Ok(())
    }
}
