//! # Cryptographic Primitives
//!
//! Everything the signing pipeline needs from cryptography lives here,
//! leaf first:
//!
//! - **field** / **group**: arithmetic on edwards25519, written out so
//!   the network's SHA3-512 signature variant can sit directly on top.
//! - **hash**: SHA3, Keccak, SHA-256 and RIPEMD-160 helpers.
//! - **keys** / **signatures**: key pairs and the Ed25519-SHA3 scheme.
//! - **encryption**: shared-key derivation and AES-256-CBC secure messages.
//!
//! Scalars modulo the group order come from `curve25519-dalek`; points
//! and field elements are our own.

pub mod encryption;
pub mod error;
pub mod field;
pub mod group;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use encryption::{decrypt_message, derive_shared_key, encrypt_message};
pub use error::CryptoError;
pub use group::GroupElement;
pub use hash::{sha3_256, HashType};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use signatures::{sign, verify, verify_strict};
