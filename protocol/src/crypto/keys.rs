//! # Key Management
//!
//! Private keys, public keys, key pairs and signatures for the network's
//! Ed25519 variant, which expands keys and derives nonces with SHA3-512
//! instead of SHA-512.
//!
//! ## Key derivation
//!
//! A private key is a 32-byte seed. Expanding it gives
//! `h = SHA3-512(seed)`; the lower half, clamped, is the secret scalar
//! `a` and the upper half is the nonce prefix. The public key is the
//! compressed point `a·B`.
//!
//! ## Security considerations
//!
//! - Key generation draws from `OsRng` unless the caller supplies an RNG.
//! - Private key bytes never appear in `Debug` output and private keys do
//!   not implement `Serialize`. Export is an explicit call to
//!   [`PrivateKey::to_hex`].
//! - Private key seeds and expanded secrets are wiped with `zeroize` when
//!   they are dropped.

use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::{decode_hex_array, CryptoError};
use super::group::GroupElement;
use super::hash::sha3_512;
use super::signatures;

pub const PRIVATE_KEY_LENGTH: usize = 32;
pub const PUBLIC_KEY_LENGTH: usize = 32;
pub const SIGNATURE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// A 32-byte private key seed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; PRIVATE_KEY_LENGTH]);

impl PrivateKey {
    pub fn from_bytes(bytes: [u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses a hex-encoded private key (either case).
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        decode_hex_array(hex_str)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPrivateKey)
    }

    /// Draws a fresh seed from the given cryptographic RNG.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        let mut seed = [0u8; PRIVATE_KEY_LENGTH];
        rng.fill_bytes(&mut seed);
        Self(seed)
    }

    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LENGTH] {
        &self.0
    }

    /// Exports the seed as uppercase hex. Handle the result like the key
    /// itself.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// The result of expanding a private key with SHA3-512.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct ExpandedSecret {
    /// Clamped lower half of the hash, used as a raw 255-bit integer for
    /// point multiplication.
    pub(crate) clamped: [u8; 32],
    /// `clamped mod L`, used when computing the response scalar.
    pub(crate) scalar: Scalar,
    /// Upper half of the hash, mixed into every nonce.
    pub(crate) prefix: [u8; 32],
}

impl ExpandedSecret {
    pub(crate) fn from_private_key(private_key: &PrivateKey) -> Self {
        let mut hash = sha3_512(&[&private_key.0[..]]);

        let mut clamped = [0u8; 32];
        clamped.copy_from_slice(&hash[..32]);
        clamped[0] &= 248;
        clamped[31] &= 127;
        clamped[31] |= 64;

        let mut prefix = [0u8; 32];
        prefix.copy_from_slice(&hash[32..]);
        hash.zeroize();

        Self {
            scalar: Scalar::from_bytes_mod_order(clamped),
            clamped,
            prefix,
        }
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A compressed curve point identifying an account.
///
/// Construction always checks that the bytes decode to a curve point.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Validates and wraps a compressed point.
    ///
    /// # Errors
    ///
    /// [`CryptoError::InvalidPublicKey`] when the bytes are not a canonical
    /// point encoding.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Result<Self, CryptoError> {
        GroupElement::decode(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = decode_hex_array(hex_str).map_err(|_| CryptoError::InvalidPublicKey)?;
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Decompresses the key into a group element.
    pub(crate) fn to_point(self) -> Result<GroupElement, CryptoError> {
        GroupElement::decode(&self.0).map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Verifies a signature made by the matching private key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        signatures::verify(self, message, signature)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_hex()
    }
}

impl TryFrom<String> for PublicKey {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A 64-byte signature: the encoded nonce point `R` followed by the
/// little-endian response scalar `S`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Wraps raw signature bytes. No validation happens here; malformed
    /// signatures simply fail verification.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        decode_hex_array(hex_str)
            .map(Self)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// The encoded nonce point.
    pub fn r_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0[..32]);
        out
    }

    /// The encoded response scalar.
    pub fn s_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0[32..]);
        out
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        signature.to_hex()
    }
}

impl TryFrom<String> for Signature {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// A private key together with its derived public key.
///
/// The expanded secret is cached so signing does not re-hash the seed.
///
/// ```
/// use sirius_protocol::crypto::KeyPair;
///
/// let kp = KeyPair::generate();
/// let sig = kp.sign(b"announce");
/// assert!(kp.public_key().verify(b"announce", &sig));
/// ```
#[derive(Clone)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
    expanded: ExpandedSecret,
}

impl KeyPair {
    /// Generates a key pair from the operating system RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    pub fn generate_with<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self::from_private_key(PrivateKey::generate(rng))
    }

    /// Derives the public key from a private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let expanded = ExpandedSecret::from_private_key(&private_key);
        let public_key = PublicKey(GroupElement::mul_base(&expanded.clamped).encode());
        Self {
            private_key,
            public_key,
            expanded,
        }
    }

    pub fn from_hex(private_key_hex: &str) -> Result<Self, CryptoError> {
        Ok(Self::from_private_key(PrivateKey::from_hex(private_key_hex)?))
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub(crate) fn expanded(&self) -> &ExpandedSecret {
        &self.expanded
    }

    /// Signs a message. Deterministic for a given key and message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        signatures::sign(self, message)
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public_key.verify(message, signature)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(pub={})", self.public_key.to_hex())
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for KeyPair {}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY: &str = "575DBB3062267EFF57C970A336EBBC8FBCFE12C5BD3ED7BC11EB0481D7704CED";

    #[test]
    fn test_generate_unique() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_public_key_is_deterministic() {
        let a = KeyPair::from_hex(PRIVATE_KEY).unwrap();
        let b = KeyPair::from_hex(&PRIVATE_KEY.to_lowercase()).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.private_key().to_hex(), PRIVATE_KEY);
    }

    #[test]
    fn test_known_public_key() {
        let kp = KeyPair::from_hex(PRIVATE_KEY).unwrap();
        assert_eq!(
            kp.public_key().to_hex(),
            "BD8D3F8B7E1B3839C650F458234AB1FF87CDB1EDA36338D9E446E27D454717F2"
        );
    }

    #[test]
    fn test_public_key_hex_roundtrip() {
        let kp = KeyPair::generate();
        let hex = kp.public_key().to_hex();
        assert_eq!(hex, hex.to_uppercase());
        assert_eq!(PublicKey::from_hex(&hex).unwrap(), kp.public_key());
    }

    #[test]
    fn test_invalid_public_key_rejected() {
        // y = 2 is not on the curve.
        let mut bytes = [0u8; 32];
        bytes[0] = 2;
        assert_eq!(
            PublicKey::from_bytes(bytes),
            Err(CryptoError::InvalidPublicKey)
        );
        assert_eq!(
            PublicKey::from_hex("zz"),
            Err(CryptoError::InvalidPublicKey)
        );
    }

    #[test]
    fn test_invalid_private_key_hex() {
        assert!(KeyPair::from_hex("1234").is_err());
        assert!(KeyPair::from_hex("not hex at all").is_err());
    }

    #[test]
    fn test_debug_hides_private_key() {
        let kp = KeyPair::from_hex(PRIVATE_KEY).unwrap();
        let debug = format!("{:?} {:?}", kp, kp.private_key());
        assert!(!debug.contains(PRIVATE_KEY));
        assert!(!debug.contains(&PRIVATE_KEY.to_lowercase()));
    }

    #[test]
    fn test_clamping() {
        let expanded = ExpandedSecret::from_private_key(&PrivateKey::from_bytes([7u8; 32]));
        assert_eq!(expanded.clamped[0] & 7, 0);
        assert_eq!(expanded.clamped[31] & 0x80, 0);
        assert_eq!(expanded.clamped[31] & 0x40, 0x40);
    }

    #[test]
    fn test_secrets_zeroize() {
        let mut key = PrivateKey::from_bytes([7u8; 32]);
        let mut expanded = ExpandedSecret::from_private_key(&key);
        key.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; 32]);

        expanded.zeroize();
        assert_eq!(expanded.clamped, [0u8; 32]);
        assert_eq!(expanded.prefix, [0u8; 32]);
        assert_eq!(expanded.scalar, Scalar::ZERO);
    }

    #[test]
    fn test_public_key_serde_hex() {
        let kp = KeyPair::from_hex(PRIVATE_KEY).unwrap();
        let json = serde_json::to_string(&kp.public_key()).unwrap();
        assert_eq!(json, format!("\"{}\"", kp.public_key().to_hex()));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kp.public_key());
    }
}
