//! Error type shared by every cryptographic operation in the crate.
//!
//! Messages stay deliberately coarse. A verifier learns that a signature
//! was rejected, not which intermediate check tripped.

use thiserror::Error;

/// Failures raised by curve arithmetic, key handling, signing, and the
/// secure-message cipher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid point encoding: not canonical or not on the curve")]
    InvalidPointEncoding,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("invalid signature encoding")]
    InvalidSignature,

    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid hex encoding")]
    InvalidHex,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed: wrong key or corrupted ciphertext")]
    DecryptionFailed,

    #[error("cosignature is over {actual}, expected aggregate hash {expected}")]
    CosignatureMismatch { expected: String, actual: String },
}

/// Decodes a hex string into a fixed-size array.
///
/// Accepts either case. Used by every `from_hex` constructor in the crate.
pub(crate) fn decode_hex_array<const N: usize>(input: &str) -> Result<[u8; N], CryptoError> {
    let bytes = hex::decode(input).map_err(|_| CryptoError::InvalidHex)?;
    if bytes.len() != N {
        return Err(CryptoError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}
