//! Aggregate cosigning.
//!
//! A cosigner signs the 32-byte hash of an already signed aggregate. The
//! initiator collects those cosignatures and appends them, 96 bytes each
//! (signer then signature), after the aggregate body. The signed region and
//! therefore the aggregate hash are unchanged by this; only the size field
//! at the start of the payload grows.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::model::Transaction;
use super::signing::{sign, SignedTransaction, TransactionHash};
use crate::config::{COSIGNATURE_SIZE, SIZE_OFFSET};
use crate::crypto::signatures::verify_strict;
use crate::crypto::{CryptoError, KeyPair, PublicKey, Signature};
use crate::error::{Error, ValidationError};
use crate::model::GenerationHash;
use crate::schema::EncodingError;

/// One cosigner's detached signature over an aggregate hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosignatureSignedTransaction {
    parent_hash: TransactionHash,
    signature: Signature,
    signer: PublicKey,
}

impl CosignatureSignedTransaction {
    pub fn new(parent_hash: TransactionHash, signature: Signature, signer: PublicKey) -> Self {
        Self {
            parent_hash,
            signature,
            signer,
        }
    }

    pub fn parent_hash(&self) -> &TransactionHash {
        &self.parent_hash
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn signer(&self) -> &PublicKey {
        &self.signer
    }

    /// Checks the signature against the parent hash.
    pub fn verify(&self) -> Result<(), CryptoError> {
        verify_strict(&self.signer, self.parent_hash.as_bytes(), &self.signature)
    }
}

/// Cosigns the aggregate identified by `hash`.
pub fn cosign(hash: &TransactionHash, key_pair: &KeyPair) -> CosignatureSignedTransaction {
    let signer = key_pair.public_key();
    debug!(parent = %hash, signer = %signer.to_hex(), "cosigned aggregate");
    CosignatureSignedTransaction {
        parent_hash: *hash,
        signature: key_pair.sign(hash.as_bytes()),
        signer,
    }
}

/// Appends `cosignatures` to a signed aggregate, in the order given.
///
/// # Errors
///
/// - [`ValidationError`] on `transaction_type` when `signed` is not an
///   aggregate.
/// - [`CryptoError::CosignatureMismatch`] when a cosignature was made over
///   a different hash.
/// - [`EncodingError::TooLarge`] when the grown payload no longer fits the
///   size field.
pub fn assemble(
    signed: &SignedTransaction,
    cosignatures: &[CosignatureSignedTransaction],
) -> Result<SignedTransaction, Error> {
    if !signed.transaction_type().is_aggregate() {
        return Err(ValidationError::invalid(
            "transaction_type",
            format!("{} cannot carry cosignatures", signed.transaction_type()),
        )
        .into());
    }

    let mut payload = signed.payload().to_vec();
    payload.reserve(cosignatures.len() * COSIGNATURE_SIZE);
    for cosignature in cosignatures {
        if cosignature.parent_hash != *signed.hash() {
            return Err(CryptoError::CosignatureMismatch {
                expected: signed.hash_hex(),
                actual: cosignature.parent_hash.to_hex(),
            }
            .into());
        }
        payload.extend_from_slice(cosignature.signer.as_bytes());
        payload.extend_from_slice(cosignature.signature.as_bytes());
    }

    let size = u32::try_from(payload.len()).map_err(|_| EncodingError::TooLarge)?;
    payload[SIZE_OFFSET..SIZE_OFFSET + 4].copy_from_slice(&size.to_le_bytes());

    info!(
        hash = %signed.hash(),
        cosignatures = cosignatures.len(),
        size = payload.len(),
        "assembled aggregate"
    );

    Ok(SignedTransaction::from_parts(
        *signed.hash(),
        payload,
        *signed.signer(),
        signed.transaction_type(),
        signed.network_type(),
    ))
}

/// Signs an aggregate with `initiator` and cosigns it with every key in
/// `cosigners`, in order.
pub fn sign_with_cosigners(
    tx: &Transaction,
    initiator: &KeyPair,
    cosigners: &[&KeyPair],
    generation_hash: Option<&GenerationHash>,
) -> Result<SignedTransaction, Error> {
    let signed = sign(tx, initiator, generation_hash)?;
    let cosignatures: Vec<_> = cosigners
        .iter()
        .map(|key_pair| cosign(signed.hash(), key_pair))
        .collect();
    assemble(&signed, &cosignatures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Address, Deadline, Message, Mosaic, MosaicId, NetworkType, Recipient, UInt64,
    };
    use crate::transaction::codec;
    use crate::transaction::model::{
        AggregateTransaction, EmbeddedTransaction, TransactionBody, TransferTransaction,
    };
    use crate::transaction::signing::verify_signed;

    fn inner_transfer(from: &KeyPair) -> EmbeddedTransaction {
        EmbeddedTransaction {
            network_type: NetworkType::MijinTest,
            version: 3,
            body: TransactionBody::Transfer(TransferTransaction {
                recipient: Recipient::Address(Address::from_public_key(
                    &from.public_key(),
                    NetworkType::MijinTest,
                )),
                mosaics: vec![Mosaic::new(MosaicId::new(42), 10)],
                message: Message::empty(),
            }),
        }
    }

    fn aggregate(bonded: bool, inner: Vec<EmbeddedTransaction>) -> Transaction {
        Transaction {
            network_type: NetworkType::MijinTest,
            version: 2,
            max_fee: UInt64::ZERO,
            deadline: Deadline::from_network_millis(5_000),
            signature: None,
            body: TransactionBody::Aggregate(AggregateTransaction {
                bonded,
                inner,
                cosignatures: Vec::new(),
            }),
        }
    }

    #[test]
    fn test_cosignature_verifies() {
        let kp = KeyPair::generate();
        let hash = TransactionHash::from_bytes([9; 32]);
        let cosignature = cosign(&hash, &kp);
        assert_eq!(cosignature.parent_hash(), &hash);
        assert_eq!(cosignature.signer(), &kp.public_key());
        cosignature.verify().unwrap();

        let forged = CosignatureSignedTransaction::new(
            TransactionHash::from_bytes([8; 32]),
            *cosignature.signature(),
            kp.public_key(),
        );
        assert_eq!(forged.verify(), Err(CryptoError::VerificationFailed));
    }

    #[test]
    fn test_assemble_appends_in_order_and_keeps_hash() {
        let initiator = KeyPair::generate();
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let tx = aggregate(
            false,
            vec![inner_transfer(&initiator), inner_transfer(&alice), inner_transfer(&bob)],
        );

        let signed = sign(&tx, &initiator, None).unwrap();
        let cosignatures = [cosign(signed.hash(), &alice), cosign(signed.hash(), &bob)];
        let complete = assemble(&signed, &cosignatures).unwrap();

        assert_eq!(complete.hash(), signed.hash());
        assert_eq!(complete.size(), signed.size() + 2 * COSIGNATURE_SIZE);
        let declared = u32::from_le_bytes([
            complete.payload()[0],
            complete.payload()[1],
            complete.payload()[2],
            complete.payload()[3],
        ]);
        assert_eq!(declared as usize, complete.size());

        let tail = &complete.payload()[signed.size()..];
        assert_eq!(&tail[..32], alice.public_key().as_bytes());
        assert_eq!(&tail[96..128], bob.public_key().as_bytes());

        let decoded = codec::deserialize(complete.payload()).unwrap();
        assert!(decoded.is_signed_by(&initiator.public_key()));
        assert!(decoded.is_signed_by(&alice.public_key()));
        assert!(decoded.is_signed_by(&bob.public_key()));
        verify_signed(&complete, None).unwrap();
    }

    #[test]
    fn test_assemble_rejects_foreign_cosignature() {
        let initiator = KeyPair::generate();
        let signed = sign(&aggregate(true, vec![inner_transfer(&initiator)]), &initiator, None)
            .unwrap();
        let stray = cosign(&TransactionHash::from_bytes([1; 32]), &KeyPair::generate());

        match assemble(&signed, &[stray]) {
            Err(Error::Crypto(CryptoError::CosignatureMismatch { expected, actual })) => {
                assert_eq!(expected, signed.hash_hex());
                assert_eq!(actual, "01".repeat(32));
            }
            other => panic!("expected cosignature mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_assemble_rejects_non_aggregate() {
        let kp = KeyPair::generate();
        let tx = Transaction {
            body: inner_transfer(&kp).body,
            ..aggregate(false, Vec::new())
        };
        let signed = sign(&tx, &kp, None).unwrap();

        match assemble(&signed, &[]) {
            Err(Error::Validation(err)) => assert_eq!(err.field(), "transaction_type"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_sign_with_cosigners_with_no_cosigners() {
        let initiator = KeyPair::generate();
        let tx = aggregate(false, vec![inner_transfer(&initiator)]);
        let generation_hash = GenerationHash::from_bytes([3; 32]);

        let alone = sign_with_cosigners(&tx, &initiator, &[], Some(&generation_hash)).unwrap();
        let plain = sign(&tx, &initiator, Some(&generation_hash)).unwrap();
        assert_eq!(alone.payload(), plain.payload());
        assert_eq!(alone.hash(), plain.hash());
    }

    #[test]
    fn test_tampered_cosignature_fails_full_verification() {
        let initiator = KeyPair::generate();
        let cosigner = KeyPair::generate();
        let tx = aggregate(false, vec![inner_transfer(&cosigner)]);
        let signed = sign_with_cosigners(&tx, &initiator, &[&cosigner], None).unwrap();

        let mut payload = signed.payload().to_vec();
        let last = payload.len() - 1;
        payload[last] ^= 0x01;
        let tampered = SignedTransaction::from_parts(
            *signed.hash(),
            payload,
            *signed.signer(),
            signed.transaction_type(),
            signed.network_type(),
        );
        assert!(verify_signed(&tampered, None).is_err());
    }

    #[test]
    fn test_cosignature_serde() {
        let cosignature = cosign(&TransactionHash::from_bytes([5; 32]), &KeyPair::generate());
        let json = serde_json::to_string(&cosignature).unwrap();
        let back: CosignatureSignedTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cosignature);
    }
}
