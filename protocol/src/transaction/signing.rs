//! Transaction signing and payload verification.
//!
//! Two hashes are taken over a serialized payload. With `G` the optional
//! generation hash and `end` the end of the body (before any aggregate
//! cosignatures):
//!
//! ```text
//! signing hash     = SHA3-256(G || payload[100..end])
//! transaction hash = SHA3-256(G || signature || signer || type || payload[124..end])
//! ```
//!
//! The signer signs the 32-byte signing hash, which leaves out the size,
//! signature and signer fields. The transaction hash is the network-visible
//! identity of the transaction and is what cosigners sign.
//!
//! Signing never mutates the input: it serializes, splices the signature
//! and signer into the fresh payload, and returns a [`SignedTransaction`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, warn};

use super::codec::{self, body_end};
use super::model::{Transaction, TransactionBody};
use super::types::TransactionType;
use crate::config::{
    RESERVED_OFFSET, SIGNATURE_OFFSET, SIGNER_OFFSET, TRANSACTION_HEADER_SIZE, TYPE_OFFSET,
};
use crate::crypto::error::decode_hex_array;
use crate::crypto::hash::sha3_256;
use crate::crypto::signatures::verify_strict;
use crate::crypto::{CryptoError, KeyPair, PublicKey};
use crate::error::Error;
use crate::model::{GenerationHash, NetworkType};
use crate::schema::EncodingError;

// ---------------------------------------------------------------------------
// TransactionHash
// ---------------------------------------------------------------------------

/// The 32-byte identity of a signed transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TransactionHash([u8; 32]);

impl TransactionHash {
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

impl fmt::Debug for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionHash({})", self.to_hex())
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<TransactionHash> for String {
    fn from(hash: TransactionHash) -> Self {
        hash.to_hex()
    }
}

impl TryFrom<String> for TransactionHash {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A signed payload ready to announce. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    hash: TransactionHash,
    #[serde(with = "hex_payload")]
    payload: Vec<u8>,
    signer: PublicKey,
    transaction_type: TransactionType,
    network_type: NetworkType,
}

impl SignedTransaction {
    pub(crate) fn from_parts(
        hash: TransactionHash,
        payload: Vec<u8>,
        signer: PublicKey,
        transaction_type: TransactionType,
        network_type: NetworkType,
    ) -> Self {
        Self {
            hash,
            payload,
            signer,
            transaction_type,
            network_type,
        }
    }

    pub fn hash(&self) -> &TransactionHash {
        &self.hash
    }

    pub fn hash_hex(&self) -> String {
        self.hash.to_hex()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The payload as uppercase hex, the form announced to nodes.
    pub fn payload_hex(&self) -> String {
        hex::encode_upper(&self.payload)
    }

    pub fn signer(&self) -> &PublicKey {
        &self.signer
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

mod hex_payload {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode_upper(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Hashes
// ---------------------------------------------------------------------------

/// The hash the primary signer signs.
pub fn signing_hash(
    payload: &[u8],
    generation_hash: Option<&GenerationHash>,
) -> Result<[u8; 32], EncodingError> {
    let end = body_end(payload)?;
    Ok(sha3_256(&[
        salt(generation_hash),
        &payload[RESERVED_OFFSET..end],
    ]))
}

/// The network-visible hash of a signed payload.
pub fn transaction_hash(
    payload: &[u8],
    generation_hash: Option<&GenerationHash>,
) -> Result<TransactionHash, EncodingError> {
    let end = body_end(payload)?;
    Ok(TransactionHash(sha3_256(&[
        salt(generation_hash),
        &payload[SIGNATURE_OFFSET..RESERVED_OFFSET],
        &payload[TYPE_OFFSET..TYPE_OFFSET + 2],
        &payload[TRANSACTION_HEADER_SIZE..end],
    ])))
}

fn salt(generation_hash: Option<&GenerationHash>) -> &[u8] {
    generation_hash.map(|g| &g.as_bytes()[..]).unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Signs `tx` with `key_pair`.
///
/// Cosignatures already attached to an aggregate are dropped: they were
/// made over a different hash and would not verify against the new one.
pub fn sign(
    tx: &Transaction,
    key_pair: &KeyPair,
    generation_hash: Option<&GenerationHash>,
) -> Result<SignedTransaction, EncodingError> {
    let tx = strip_cosignatures(tx);
    let mut payload = codec::serialize(&tx)?;

    let to_sign = signing_hash(&payload, generation_hash)?;
    let signature = key_pair.sign(&to_sign);
    let signer = key_pair.public_key();
    payload[SIGNATURE_OFFSET..SIGNER_OFFSET].copy_from_slice(signature.as_bytes());
    payload[SIGNER_OFFSET..RESERVED_OFFSET].copy_from_slice(signer.as_bytes());

    let hash = transaction_hash(&payload, generation_hash)?;
    debug!(
        transaction_type = %tx.transaction_type(),
        hash = %hash,
        signer = %signer.to_hex(),
        size = payload.len(),
        "signed transaction"
    );

    Ok(SignedTransaction::from_parts(
        hash,
        payload,
        signer,
        tx.transaction_type(),
        tx.network_type,
    ))
}

fn strip_cosignatures(tx: &Transaction) -> Cow<'_, Transaction> {
    match &tx.body {
        TransactionBody::Aggregate(aggregate) if !aggregate.cosignatures.is_empty() => {
            warn!(
                count = aggregate.cosignatures.len(),
                "dropping cosignatures made over a previous signature"
            );
            let mut owned = tx.clone();
            if let TransactionBody::Aggregate(aggregate) = &mut owned.body {
                aggregate.cosignatures.clear();
            }
            Cow::Owned(owned)
        }
        _ => Cow::Borrowed(tx),
    }
}

/// Checks a signed payload end to end: it decodes, its hash is the one
/// recorded, and the primary signature and every cosignature verify.
pub fn verify_signed(
    signed: &SignedTransaction,
    generation_hash: Option<&GenerationHash>,
) -> Result<(), Error> {
    let tx = codec::deserialize(&signed.payload)?;
    let info = tx.signature.ok_or(CryptoError::InvalidSignature)?;
    if info.signer != signed.signer || tx.transaction_type() != signed.transaction_type {
        return Err(CryptoError::VerificationFailed.into());
    }

    let to_sign = signing_hash(&signed.payload, generation_hash)?;
    verify_strict(&info.signer, &to_sign, &info.signature)?;

    let hash = transaction_hash(&signed.payload, generation_hash)?;
    if hash != signed.hash {
        return Err(CryptoError::VerificationFailed.into());
    }

    if let TransactionBody::Aggregate(aggregate) = &tx.body {
        for cosignature in &aggregate.cosignatures {
            verify_strict(&cosignature.signer, hash.as_bytes(), &cosignature.signature)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
