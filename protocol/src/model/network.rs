//! Network identifiers.
//!
//! The network type byte is embedded in every address and in the version
//! word of every transaction, so a payload built for one network can never
//! be replayed on another. The generation hash, when a network defines one,
//! salts every signing and transaction hash for the same reason.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::error::{decode_hex_array, CryptoError};

/// The network a transaction or address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NetworkType {
    MainNet = 0xb8,
    TestNet = 0xa8,
    Private = 0xc8,
    PrivateTest = 0xb0,
    Mijin = 0x60,
    MijinTest = 0x90,
}

impl NetworkType {
    pub const ALL: [NetworkType; 6] = [
        Self::MainNet,
        Self::TestNet,
        Self::Private,
        Self::PrivateTest,
        Self::Mijin,
        Self::MijinTest,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|network| network.code() == code)
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MainNet => "MAIN_NET",
            Self::TestNet => "TEST_NET",
            Self::Private => "PRIVATE",
            Self::PrivateTest => "PRIVATE_TEST",
            Self::Mijin => "MIJIN",
            Self::MijinTest => "MIJIN_TEST",
        };
        f.write_str(name)
    }
}

/// The 32-byte hash of a network's nemesis block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct GenerationHash([u8; 32]);

impl GenerationHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        decode_hex_array(input).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for GenerationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenerationHash({})", self.to_hex())
    }
}

impl From<GenerationHash> for String {
    fn from(hash: GenerationHash) -> Self {
        hash.to_hex()
    }
}

impl TryFrom<String> for GenerationHash {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for network in NetworkType::ALL {
            assert_eq!(NetworkType::from_code(network.code()), Some(network));
        }
        assert_eq!(NetworkType::from_code(0x00), None);
        assert_eq!(NetworkType::MainNet.code(), 0xb8);
        assert_eq!(NetworkType::MijinTest.code(), 0x90);
    }

    #[test]
    fn test_codes_are_even() {
        // The low bit marks namespace-alias recipients.
        for network in NetworkType::ALL {
            assert_eq!(network.code() & 1, 0);
        }
    }

    #[test]
    fn test_generation_hash_hex() {
        let hex = "7B631D803F912B00DC0CBED3014BBD17A302BA50B99D233B9C2D9533B842ABDF";
        let hash = GenerationHash::from_hex(hex).unwrap();
        assert_eq!(hash.to_hex(), hex);
        assert!(GenerationHash::from_hex("abcd").is_err());
    }
}
