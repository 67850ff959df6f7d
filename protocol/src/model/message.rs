//! Messages attached to transfers.

use serde::{Deserialize, Serialize};

use crate::crypto::encryption::{decrypt_message, encrypt_message};
use crate::crypto::{CryptoError, KeyPair, PublicKey};

pub const MESSAGE_TYPE_PLAIN: u8 = 0;
pub const MESSAGE_TYPE_SECURE: u8 = 1;

/// A transfer message: readable text, or bytes only the sender and
/// recipient can decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    Plain(String),
    Secure(Vec<u8>),
}

impl Message {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    pub fn empty() -> Self {
        Self::Plain(String::new())
    }

    /// Encrypts `text` from `sender` to `recipient`.
    pub fn secure(
        sender: &KeyPair,
        recipient: &PublicKey,
        text: &str,
    ) -> Result<Self, CryptoError> {
        encrypt_message(sender, recipient, text.as_bytes()).map(Self::Secure)
    }

    pub fn message_type(&self) -> u8 {
        match self {
            Self::Plain(_) => MESSAGE_TYPE_PLAIN,
            Self::Secure(_) => MESSAGE_TYPE_SECURE,
        }
    }

    /// The bytes carried on the wire.
    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Plain(text) => text.as_bytes(),
            Self::Secure(bytes) => bytes,
        }
    }

    /// Reads a secure message addressed to `reader`, written by `author`.
    /// Plain messages are returned as-is.
    pub fn decrypt(&self, reader: &KeyPair, author: &PublicKey) -> Result<String, CryptoError> {
        match self {
            Self::Plain(text) => Ok(text.clone()),
            Self::Secure(bytes) => {
                let plain = decrypt_message(reader, author, bytes)?;
                String::from_utf8(plain).map_err(|_| CryptoError::DecryptionFailed)
            }
        }
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message() {
        let message = Message::plain("hello");
        assert_eq!(message.message_type(), MESSAGE_TYPE_PLAIN);
        assert_eq!(message.payload(), b"hello");
    }

    #[test]
    fn test_secure_message_roundtrip() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let message = Message::secure(&alice, &bob.public_key(), "for bob").unwrap();
        assert_eq!(message.message_type(), MESSAGE_TYPE_SECURE);
        assert_ne!(message.payload(), b"for bob");
        assert_eq!(message.decrypt(&bob, &alice.public_key()).unwrap(), "for bob");
    }
}
