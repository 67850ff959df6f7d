//! # Digital Signatures
//!
//! Ed25519 over SHA3-512, the signature scheme every account, transaction
//! and cosignature on the network uses.
//!
//! ```text
//! r = SHA3-512(prefix || M) mod L        R = r·B
//! k = SHA3-512(R || A || M) mod L        S = r + k·a mod L
//! signature = R || S
//! ```
//!
//! Verification recomputes `k` and checks `S·B - k·A == R`. Every step
//! runs even when an earlier one already failed, so a rejection costs the
//! same as an acceptance.

use curve25519_dalek::scalar::Scalar;

use super::error::CryptoError;
use super::field::ct_bytes_eq;
use super::group::GroupElement;
use super::hash::sha3_512;
use super::keys::{KeyPair, PublicKey, Signature, SIGNATURE_LENGTH};

/// Signs `message` with the key pair.
///
/// The nonce is derived from the key's prefix and the message, so no
/// randomness is consumed and the same input always yields the same
/// signature.
pub fn sign(key_pair: &KeyPair, message: &[u8]) -> Signature {
    let expanded = key_pair.expanded();
    let public_key = key_pair.public_key();

    let r = Scalar::from_bytes_mod_order_wide(&sha3_512(&[&expanded.prefix[..], message]));
    let encoded_r = GroupElement::mul_base(&r.to_bytes()).encode();

    let k = challenge(&encoded_r, &public_key, message);
    let s = r + k * expanded.scalar;

    let mut bytes = [0u8; SIGNATURE_LENGTH];
    bytes[..32].copy_from_slice(&encoded_r);
    bytes[32..].copy_from_slice(s.as_bytes());
    Signature::from_bytes(bytes)
}

/// `k = SHA3-512(R || A || M) mod L`.
fn challenge(encoded_r: &[u8; 32], public_key: &PublicKey, message: &[u8]) -> Scalar {
    Scalar::from_bytes_mod_order_wide(&sha3_512(&[
        &encoded_r[..],
        &public_key.as_bytes()[..],
        message,
    ]))
}

/// Returns `true` iff `signature` is valid for `message` under
/// `public_key`.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    verify_strict(public_key, message, signature).is_ok()
}

/// Verifies a signature, reporting why it was rejected.
///
/// # Errors
///
/// - [`CryptoError::InvalidPublicKey`] when the key does not decode.
/// - [`CryptoError::VerificationFailed`] for every other rejection: a
///   non-canonical `S`, an `R` that is not a point, or an equation that
///   does not hold.
pub fn verify_strict(
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), CryptoError> {
    let encoded_r = signature.r_bytes();

    let s: Option<Scalar> = Scalar::from_canonical_bytes(signature.s_bytes()).into();
    let a = public_key.to_point();
    let r_is_point = GroupElement::decode(&encoded_r).is_ok();

    let k = challenge(&encoded_r, public_key, message);
    let s_scalar = s.unwrap_or(Scalar::ZERO);
    let a_point = a.clone().unwrap_or(GroupElement::IDENTITY);

    let expected_r = &GroupElement::mul_base(&s_scalar.to_bytes()) - &a_point.mul(&k.to_bytes());
    let equation_holds = ct_bytes_eq(&expected_r.encode(), &encoded_r);

    a?;
    if s.is_some() & r_is_point & equation_holds {
        Ok(())
    } else {
        Err(CryptoError::VerificationFailed)
    }
}

/// Verifies a signature given as raw byte arrays, as read off a payload.
pub fn verify_raw(
    public_key_bytes: &[u8; 32],
    message: &[u8],
    signature_bytes: &[u8; SIGNATURE_LENGTH],
) -> Result<(), CryptoError> {
    let public_key = PublicKey::from_bytes(*public_key_bytes)?;
    verify_strict(&public_key, message, &Signature::from_bytes(*signature_bytes))
}

/// Verifies every `(public key, message, signature)` triple.
///
/// Fails on the first invalid entry without saying which one it was.
pub fn batch_verify(items: &[(PublicKey, Vec<u8>, Signature)]) -> Result<(), CryptoError> {
    for (public_key, message, signature) in items {
        if !verify(public_key, message, signature) {
            return Err(CryptoError::VerificationFailed);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::PrivateKey;

    fn fixed_pair() -> KeyPair {
        KeyPair::from_private_key(PrivateKey::from_bytes([0x2a; 32]))
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = KeyPair::generate();
        let msg = b"hello, catapult";
        let sig = sign(&kp, msg);
        assert!(verify(&kp.public_key(), msg, &sig));
        assert!(verify_strict(&kp.public_key(), msg, &sig).is_ok());
    }

    #[test]
    fn test_empty_message() {
        let kp = fixed_pair();
        let sig = sign(&kp, b"");
        assert!(verify(&kp.public_key(), b"", &sig));
    }

    #[test]
    fn test_deterministic_signatures() {
        let kp = fixed_pair();
        assert_eq!(sign(&kp, b"same"), sign(&kp, b"same"));
        assert_ne!(sign(&kp, b"same"), sign(&kp, b"other"));
    }

    #[test]
    fn test_wrong_message_fails() {
        let kp = fixed_pair();
        let sig = sign(&kp, b"correct message");
        assert!(!verify(&kp.public_key(), b"wrong message", &sig));
    }

    #[test]
    fn test_wrong_key_fails() {
        let kp1 = fixed_pair();
        let kp2 = KeyPair::generate();
        let sig = sign(&kp1, b"msg");
        assert_eq!(
            verify_strict(&kp2.public_key(), b"msg", &sig),
            Err(CryptoError::VerificationFailed)
        );
    }

    #[test]
    fn test_every_signature_bit_matters() {
        let kp = fixed_pair();
        let msg = b"bit flips";
        let sig = sign(&kp, msg);
        for byte in 0..SIGNATURE_LENGTH {
            for bit in 0..8 {
                let mut bytes = *sig.as_bytes();
                bytes[byte] ^= 1 << bit;
                assert!(
                    !verify(&kp.public_key(), msg, &Signature::from_bytes(bytes)),
                    "flip of bit {bit} in byte {byte} was accepted"
                );
            }
        }
    }

    #[test]
    fn test_message_bit_flips_fail() {
        let kp = fixed_pair();
        let msg = b"flip me".to_vec();
        let sig = sign(&kp, &msg);
        for i in 0..msg.len() * 8 {
            let mut tampered = msg.clone();
            tampered[i / 8] ^= 1 << (i % 8);
            assert!(!verify(&kp.public_key(), &tampered, &sig));
        }
    }

    #[test]
    fn test_public_key_bit_flips_fail() {
        let kp = fixed_pair();
        let msg = b"key flips";
        let sig = sign(&kp, msg);
        for i in 0..256 {
            let mut bytes = *kp.public_key().as_bytes();
            bytes[i / 8] ^= 1 << (i % 8);
            match PublicKey::from_bytes(bytes) {
                Ok(key) => assert!(!verify(&key, msg, &sig)),
                Err(err) => assert_eq!(err, CryptoError::InvalidPublicKey),
            }
        }
    }

    #[test]
    fn test_non_canonical_s_rejected() {
        let kp = fixed_pair();
        let msg = b"malleability";
        let sig = sign(&kp, msg);

        // S + L encodes the same scalar but is not canonical.
        let s = Scalar::from_canonical_bytes(sig.s_bytes()).unwrap();
        let l_minus_one = -Scalar::ONE;
        let s_plus_l = {
            // Add L = (L - 1) + 1 as little-endian integers.
            let mut out = [0u8; 32];
            let mut carry = 1u16;
            for (i, byte) in out.iter_mut().enumerate() {
                let sum = s.as_bytes()[i] as u16 + l_minus_one.as_bytes()[i] as u16 + carry;
                *byte = sum as u8;
                carry = sum >> 8;
            }
            out
        };
        let mut bytes = *sig.as_bytes();
        bytes[32..].copy_from_slice(&s_plus_l);
        assert!(!verify(&kp.public_key(), msg, &Signature::from_bytes(bytes)));
    }

    #[test]
    fn test_verify_raw() {
        let kp = fixed_pair();
        let sig = sign(&kp, b"raw");
        assert!(verify_raw(kp.public_key().as_bytes(), b"raw", sig.as_bytes()).is_ok());
        assert!(verify_raw(kp.public_key().as_bytes(), b"raw!", sig.as_bytes()).is_err());
    }

    #[test]
    fn test_batch_verify() {
        let items: Vec<_> = (0..5)
            .map(|i| {
                let kp = KeyPair::generate();
                let msg = format!("tx-{i}").into_bytes();
                let sig = kp.sign(&msg);
                (kp.public_key(), msg, sig)
            })
            .collect();
        assert!(batch_verify(&items).is_ok());

        let mut bad = items.clone();
        bad[3].1 = b"tampered".to_vec();
        assert!(batch_verify(&bad).is_err());
    }
}
