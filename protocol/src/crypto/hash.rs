//! # Hashing Utilities
//!
//! Every digest the network relies on, in one place:
//!
//! - **SHA3-256**: transaction hashes, signing hashes, identifier
//!   derivation, address checksums.
//! - **SHA3-512**: key expansion and nonce/challenge derivation inside the
//!   signature scheme.
//! - **Keccak-256**, **SHA-256** and **RIPEMD-160**: the alternatives a
//!   secret lock may commit to (see [`HashType`]), plus the RIPEMD-160 step
//!   of address derivation.

use bitcoin_hashes::{ripemd160, Hash as _};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::{Digest, Keccak256, Sha3_256, Sha3_512};

/// SHA3-256 of the concatenation of `parts`.
///
/// Taking a slice of parts avoids building temporary buffers when hashing
/// prefixed data such as `generation_hash || payload`.
pub fn sha3_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// SHA3-512 of the concatenation of `parts`.
pub fn sha3_512(parts: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Sha3_512::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Original Keccak-256 (pre-NIST padding).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// `SHA-256(SHA-256(data))`.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    ripemd160::Hash::hash(data).into_inner()
}

/// `RIPEMD-160(SHA-256(data))`, the Bitcoin-style hash160.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

// ---------------------------------------------------------------------------
// HashType
// ---------------------------------------------------------------------------

/// Hash algorithm a secret lock commits to.
///
/// The wire value is a single byte. Every variant yields a 32-byte secret;
/// the 20-byte [`HashType::Hash160`] output is zero padded on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HashType {
    Sha3_256 = 0,
    Keccak256 = 1,
    Hash160 = 2,
    Hash256 = 3,
}

impl HashType {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Sha3_256),
            1 => Some(Self::Keccak256),
            2 => Some(Self::Hash160),
            3 => Some(Self::Hash256),
            _ => None,
        }
    }

    /// Hashes a proof into the 32-byte secret form used on the wire.
    pub fn digest(self, proof: &[u8]) -> [u8; 32] {
        match self {
            Self::Sha3_256 => sha3_256(&[proof]),
            Self::Keccak256 => keccak256(proof),
            Self::Hash160 => {
                let mut out = [0u8; 32];
                out[..20].copy_from_slice(&hash160(proof));
                out
            }
            Self::Hash256 => double_sha256(proof),
        }
    }
}

impl std::fmt::Display for HashType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sha3_256 => "SHA3_256",
            Self::Keccak256 => "KECCAK_256",
            Self::Hash160 => "HASH_160",
            Self::Hash256 => "HASH_256",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_256_empty() {
        assert_eq!(
            hex::encode(sha3_256(&[])),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_sha3_256_parts_concatenate() {
        assert_eq!(sha3_256(&[&b"ab"[..], &b"c"[..]]), sha3_256(&[&b"abc"[..]]));
    }

    #[test]
    fn test_sha3_512_abc() {
        assert_eq!(
            hex::encode(sha3_512(&[&b"abc"[..]])),
            "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e\
             10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0"
        );
    }

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_ripemd160_abc() {
        assert_eq!(
            hex::encode(ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn test_hash_type_codes() {
        for code in 0..4u8 {
            assert_eq!(HashType::from_code(code).unwrap().code(), code);
        }
        assert!(HashType::from_code(4).is_none());
    }

    #[test]
    fn test_hash160_digest_is_padded() {
        let secret = HashType::Hash160.digest(b"proof");
        assert_eq!(&secret[..20], &hash160(b"proof"));
        assert_eq!(&secret[20..], &[0u8; 12]);
    }

    #[test]
    fn test_hash256_is_double_sha() {
        assert_eq!(HashType::Hash256.digest(b"x"), sha256(&sha256(b"x")));
    }
}
