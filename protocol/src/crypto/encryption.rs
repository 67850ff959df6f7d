//! # Shared Keys and Secure Messages
//!
//! Two accounts can agree on a symmetric key without talking to each other:
//! each multiplies the other's public point by its own secret scalar, and
//! both land on the same shared point. The point is mixed with a random
//! salt and hashed with SHA3-256 into an AES-256 key.
//!
//! ## Wire format
//!
//! ```text
//! salt (32) || iv (16) || AES-256-CBC ciphertext, PKCS#7 padded
//! ```
//!
//! The salt travels with the message so the recipient can derive the same
//! key. Salt and IV are fresh random bytes from `OsRng` for every message.
//! CBC carries no authentication tag: a corrupted ciphertext is caught only
//! when its padding fails to check, so callers must not treat a successful
//! decryption as proof of authorship.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;

use super::error::CryptoError;
use super::hash::sha3_256;
use super::keys::{KeyPair, PublicKey};
use crate::config::{AES_IV_LENGTH, AES_KEY_LENGTH, SHARED_KEY_SALT_LENGTH};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Derives the symmetric key shared between `key_pair` and `peer`.
///
/// `key = SHA3-256(encode(a · P) XOR salt)`. Both sides obtain the same key
/// when they use the same salt.
///
/// # Errors
///
/// [`CryptoError::InvalidPublicKey`] if `peer` does not decode.
pub fn derive_shared_key(
    key_pair: &KeyPair,
    peer: &PublicKey,
    salt: &[u8; SHARED_KEY_SALT_LENGTH],
) -> Result<[u8; AES_KEY_LENGTH], CryptoError> {
    let peer_point = peer.to_point()?;
    let mut shared = peer_point.mul(&key_pair.expanded().clamped).encode();
    for (byte, salt_byte) in shared.iter_mut().zip(salt.iter()) {
        *byte ^= salt_byte;
    }
    Ok(sha3_256(&[&shared[..]]))
}

/// Encrypts `plaintext` with AES-256-CBC under a random IV.
///
/// Returns `iv || ciphertext`.
pub fn encrypt(key: &[u8; AES_KEY_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut iv = [0u8; AES_IV_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut iv);
    encrypt_with_iv(key, &iv, plaintext)
}

fn encrypt_with_iv(
    key: &[u8; AES_KEY_LENGTH],
    iv: &[u8; AES_IV_LENGTH],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher =
        Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| CryptoError::EncryptionFailed)?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut out = Vec::with_capacity(AES_IV_LENGTH + ciphertext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypts `iv || ciphertext` produced by [`encrypt`].
///
/// The ciphertext must be a non-empty whole number of blocks with valid
/// padding.
pub fn decrypt(key: &[u8; AES_KEY_LENGTH], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if data.len() < 2 * AES_IV_LENGTH {
        return Err(CryptoError::DecryptionFailed);
    }

    let (iv, ciphertext) = data.split_at(AES_IV_LENGTH);
    let cipher =
        Aes256CbcDec::new_from_slices(key, iv).map_err(|_| CryptoError::DecryptionFailed)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}

/// Encrypts a message from `sender` that only `recipient` can read.
pub fn encrypt_message(
    sender: &KeyPair,
    recipient: &PublicKey,
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SHARED_KEY_SALT_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let key = derive_shared_key(sender, recipient, &salt)?;
    let sealed = encrypt(&key, plaintext)?;

    let mut out = Vec::with_capacity(SHARED_KEY_SALT_LENGTH + sealed.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Decrypts a message produced by [`encrypt_message`].
///
/// `recipient` is the reader's own key pair, `sender` the author's public
/// key. The author can read their own message back by swapping the roles.
pub fn decrypt_message(
    recipient: &KeyPair,
    sender: &PublicKey,
    data: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if data.len() < SHARED_KEY_SALT_LENGTH + 2 * AES_IV_LENGTH {
        return Err(CryptoError::DecryptionFailed);
    }
    let (salt_bytes, sealed) = data.split_at(SHARED_KEY_SALT_LENGTH);
    let mut salt = [0u8; SHARED_KEY_SALT_LENGTH];
    salt.copy_from_slice(salt_bytes);

    let key = derive_shared_key(recipient, sender, &salt)?;
    decrypt(&key, sealed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENDER_PRIVATE_KEY: &str =
        "8374B5915AEAB6308C34368B15ABF33C79FD7FEFC0DEAF9CC51BA57F120F1190";
    const SENDER_PUBLIC_KEY: &str =
        "9E7930144DA0845361F650BF78A36791ABF2577E251706ECA45480998FE61D18";
    const RECIPIENT_PRIVATE_KEY: &str =
        "369CB3195F88A16F8326DABBD37DA5F8458B55AA5DA6F7E2F756A12BE6CAA546";
    const RECIPIENT_PUBLIC_KEY: &str =
        "8E1A94D534EA6A3B02B0B967701549C21724C7644B2E4C20BF15D01D50097ACB";
    const OTHER_PRIVATE_KEY: &str =
        "8534E476C13A736645035D535EDF2759295FF1EF65E7FFBDA31501A3C1F3CB99";

    /// "test-message" sealed for the recipient with salt 00..1f and IV a0..af.
    const SEALED: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f\
                          a0a1a2a3a4a5a6a7a8a9aaabacadaeaf\
                          5c7a0b0d8f3ae22aa77950999cee2ec5";

    #[test]
    fn test_decrypts_known_message() {
        let sealed = hex::decode(SEALED).unwrap();
        let recipient = KeyPair::from_hex(RECIPIENT_PRIVATE_KEY).unwrap();
        let sender = PublicKey::from_hex(SENDER_PUBLIC_KEY).unwrap();
        assert_eq!(
            decrypt_message(&recipient, &sender, &sealed).unwrap(),
            b"test-message"
        );

        // the author reads it back with the roles swapped
        let author = KeyPair::from_hex(SENDER_PRIVATE_KEY).unwrap();
        let reader = PublicKey::from_hex(RECIPIENT_PUBLIC_KEY).unwrap();
        assert_eq!(
            decrypt_message(&author, &reader, &sealed).unwrap(),
            b"test-message"
        );

        let other = KeyPair::from_hex(OTHER_PRIVATE_KEY).unwrap();
        assert!(decrypt_message(&other, &sender, &sealed).is_err());
    }

    #[test]
    fn test_known_message_encrypts_to_same_bytes() {
        let sealed = hex::decode(SEALED).unwrap();
        let sender = KeyPair::from_hex(SENDER_PRIVATE_KEY).unwrap();
        let recipient = PublicKey::from_hex(RECIPIENT_PUBLIC_KEY).unwrap();
        let salt: [u8; 32] = sealed[..32].try_into().unwrap();
        let iv: [u8; 16] = sealed[32..48].try_into().unwrap();

        let key = derive_shared_key(&sender, &recipient, &salt).unwrap();
        let body = encrypt_with_iv(&key, &iv, b"test-message").unwrap();
        assert_eq!(body, sealed[32..]);
    }

    #[test]
    fn test_shared_key_is_symmetric() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let salt = [9u8; SHARED_KEY_SALT_LENGTH];

        let k1 = derive_shared_key(&alice, &bob.public_key(), &salt).unwrap();
        let k2 = derive_shared_key(&bob, &alice.public_key(), &salt).unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn test_salt_changes_key() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let k1 = derive_shared_key(&alice, &bob.public_key(), &[1u8; 32]).unwrap();
        let k2 = derive_shared_key(&alice, &bob.public_key(), &[2u8; 32]).unwrap();
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = [0x42u8; AES_KEY_LENGTH];
        let sealed = encrypt(&key, b"payload").unwrap();
        assert_eq!(sealed.len(), AES_IV_LENGTH + 16);
        assert_eq!(decrypt(&key, &sealed).unwrap(), b"payload");

        // a full block of plaintext gains a full block of padding
        let sealed = encrypt(&key, &[7u8; 16]).unwrap();
        assert_eq!(sealed.len(), AES_IV_LENGTH + 32);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = encrypt_with_iv(&[1u8; 32], &[3u8; 16], b"payload").unwrap();
        assert_eq!(
            decrypt(&[2u8; 32], &sealed),
            Err(CryptoError::DecryptionFailed)
        );
    }

    #[test]
    fn test_truncated_ciphertext() {
        assert!(decrypt(&[1u8; 32], &[0u8; 5]).is_err());
        assert!(decrypt(&[1u8; 32], &[0u8; 20]).is_err());
        assert!(decrypt_message(
            &KeyPair::generate(),
            &KeyPair::generate().public_key(),
            &[0u8; 63]
        )
        .is_err());
    }

    #[test]
    fn test_message_roundtrip_between_accounts() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let sealed = encrypt_message(&alice, &bob.public_key(), b"meet at block 1000").unwrap();
        let opened = decrypt_message(&bob, &alice.public_key(), &sealed).unwrap();
        assert_eq!(opened, b"meet at block 1000");
    }

    #[test]
    fn test_third_party_cannot_read() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let eve = KeyPair::generate();
        let sealed = encrypt_message(&alice, &bob.public_key(), b"secret").unwrap();
        assert_ne!(
            decrypt_message(&eve, &alice.public_key(), &sealed).ok(),
            Some(b"secret".to_vec())
        );
    }
}
