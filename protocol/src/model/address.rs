//! # Addresses
//!
//! An address is 25 bytes:
//!
//! ```text
//! network (1) || RIPEMD-160(SHA3-256(public key)) (20) || checksum (4)
//! ```
//!
//! where the checksum is the first four bytes of SHA3-256 over the first
//! 21. The text form is unpadded RFC 4648 base32, 40 uppercase
//! characters; the "pretty" form inserts a dash every six characters.

use base32::Alphabet;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::namespace::NamespaceId;
use super::network::NetworkType;
use crate::crypto::hash::{ripemd160, sha3_256};
use crate::crypto::PublicKey;
use crate::error::ValidationError;

pub const ADDRESS_LENGTH: usize = 25;

const ADDRESS_TEXT_LENGTH: usize = 40;
const CHECKSUM_LENGTH: usize = 4;
const BASE32: Alphabet = Alphabet::RFC4648 { padding: false };

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Derives the address of `public_key` on `network_type`.
    pub fn from_public_key(public_key: &PublicKey, network_type: NetworkType) -> Self {
        let key_hash = ripemd160(&sha3_256(&[&public_key.as_bytes()[..]]));

        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[0] = network_type.code();
        bytes[1..21].copy_from_slice(&key_hash);
        let checksum = sha3_256(&[&bytes[..21]]);
        bytes[21..].copy_from_slice(&checksum[..CHECKSUM_LENGTH]);
        Self(bytes)
    }

    /// Validates raw address bytes: known network and matching checksum.
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Result<Self, ValidationError> {
        if NetworkType::from_code(bytes[0]).is_none() {
            return Err(ValidationError::invalid(
                "address",
                format!("unknown network byte 0x{:02x}", bytes[0]),
            ));
        }
        let checksum = sha3_256(&[&bytes[..21]]);
        if checksum[..CHECKSUM_LENGTH] != bytes[21..] {
            return Err(ValidationError::invalid("address", "checksum mismatch"));
        }
        Ok(Self(bytes))
    }

    /// Parses the plain or pretty text form, in either case.
    pub fn from_raw(raw: &str) -> Result<Self, ValidationError> {
        let plain: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if plain.len() != ADDRESS_TEXT_LENGTH {
            return Err(ValidationError::invalid(
                "address",
                format!("expected {ADDRESS_TEXT_LENGTH} characters, got {}", plain.len()),
            ));
        }
        let decoded = base32::decode(BASE32, &plain)
            .ok_or_else(|| ValidationError::invalid("address", "not base32"))?;
        let bytes: [u8; ADDRESS_LENGTH] = decoded
            .try_into()
            .map_err(|_| ValidationError::invalid("address", "wrong decoded length"))?;
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn network_type(&self) -> NetworkType {
        // Construction guarantees a known network byte.
        NetworkType::from_code(self.0[0]).unwrap_or(NetworkType::MainNet)
    }

    /// 40-character base32 form.
    pub fn plain(&self) -> String {
        base32::encode(BASE32, &self.0)
    }

    /// Base32 form with a dash every six characters.
    pub fn pretty(&self) -> String {
        let plain = self.plain();
        plain
            .as_bytes()
            .chunks(6)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// `true` if this address belongs to `public_key`.
    pub fn is_derived_from(&self, public_key: &PublicKey) -> bool {
        Self::from_public_key(public_key, self.network_type()) == *self
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.plain())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.plain()
    }
}

impl TryFrom<String> for Address {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_raw(&value)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Where a transfer or secret lock sends funds: an address, or a namespace
/// linked to one.
///
/// Both encode to 25 bytes. A namespace recipient is the network byte with
/// its low bit set, then the namespace id (little-endian), then zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    Address(Address),
    Namespace(NamespaceId),
}

impl Recipient {
    pub fn to_bytes(&self, network_type: NetworkType) -> [u8; ADDRESS_LENGTH] {
        match self {
            Self::Address(address) => address.0,
            Self::Namespace(id) => {
                let mut bytes = [0u8; ADDRESS_LENGTH];
                bytes[0] = network_type.code() | 0x01;
                bytes[1..9].copy_from_slice(&id.value().to_le_bytes());
                bytes
            }
        }
    }

    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Result<Self, ValidationError> {
        if bytes[0] & 0x01 == 0 {
            return Address::from_bytes(bytes).map(Self::Address);
        }
        if NetworkType::from_code(bytes[0] & 0xfe).is_none() {
            return Err(ValidationError::invalid("recipient", "unknown network byte"));
        }
        if bytes[9..].iter().any(|b| *b != 0) {
            return Err(ValidationError::invalid("recipient", "non-zero alias padding"));
        }
        let mut id = [0u8; 8];
        id.copy_from_slice(&bytes[1..9]);
        Ok(Self::Namespace(NamespaceId::new(u64::from_le_bytes(id))))
    }
}

impl From<Address> for Recipient {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl From<NamespaceId> for Recipient {
    fn from(id: NamespaceId) -> Self {
        Self::Namespace(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    #[test]
    fn test_address_from_public_key() {
        let kp = KeyPair::generate();
        let address = Address::from_public_key(&kp.public_key(), NetworkType::MijinTest);
        assert_eq!(address.network_type(), NetworkType::MijinTest);
        assert_eq!(address.plain().len(), 40);
        assert!(address.plain().starts_with('S'));
        assert!(address.is_derived_from(&kp.public_key()));
    }

    #[test]
    fn test_first_character_tracks_network() {
        let kp = KeyPair::generate();
        let first = |network| {
            Address::from_public_key(&kp.public_key(), network)
                .plain()
                .chars()
                .next()
        };
        assert_eq!(first(NetworkType::MainNet), Some('X'));
        assert_eq!(first(NetworkType::TestNet), Some('V'));
        assert_eq!(first(NetworkType::Mijin), Some('M'));
    }

    #[test]
    fn test_raw_roundtrip_plain_and_pretty() {
        let kp = KeyPair::generate();
        let address = Address::from_public_key(&kp.public_key(), NetworkType::TestNet);
        assert_eq!(Address::from_raw(&address.plain()).unwrap(), address);
        assert_eq!(Address::from_raw(&address.pretty()).unwrap(), address);
        assert_eq!(
            Address::from_raw(&address.plain().to_lowercase()).unwrap(),
            address
        );
        assert_eq!(address.pretty().matches('-').count(), 6);
    }

    #[test]
    fn test_checksum_detects_typos() {
        let kp = KeyPair::generate();
        let address = Address::from_public_key(&kp.public_key(), NetworkType::TestNet);
        let mut bytes = *address.as_bytes();
        bytes[5] ^= 0x10;
        assert!(Address::from_bytes(bytes).is_err());
    }

    #[test]
    fn test_bad_text_rejected() {
        assert!(Address::from_raw("TOO-SHORT").is_err());
        assert!(Address::from_raw(&"1".repeat(40)).is_err());
    }

    #[test]
    fn test_namespace_recipient_bytes() {
        let id = NamespaceId::new(0x84B3_552D_375F_FA4B);
        let recipient = Recipient::Namespace(id);
        let bytes = recipient.to_bytes(NetworkType::MijinTest);
        assert_eq!(bytes[0], 0x91);
        assert_eq!(Recipient::from_bytes(bytes).unwrap(), recipient);
    }

    #[test]
    fn test_address_recipient_bytes() {
        let kp = KeyPair::generate();
        let address = Address::from_public_key(&kp.public_key(), NetworkType::MijinTest);
        let bytes = Recipient::from(address).to_bytes(NetworkType::MijinTest);
        assert_eq!(Recipient::from_bytes(bytes).unwrap(), Recipient::Address(address));
    }

    #[test]
    fn test_address_serde_as_plain_text() {
        let kp = KeyPair::generate();
        let address = Address::from_public_key(&kp.public_key(), NetworkType::MainNet);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address.plain()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
