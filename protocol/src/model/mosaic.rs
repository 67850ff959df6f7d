//! Mosaics: ids, nonces, amounts and definition properties.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::id_generator::{self, IdentifierCollisionError};
use super::uint64::UInt64;
use crate::crypto::PublicKey;
use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// MosaicNonce
// ---------------------------------------------------------------------------

/// The 4-byte nonce mixed into a mosaic id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MosaicNonce(u32);

impl MosaicNonce {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// A random nonce from the operating system RNG.
    pub fn random() -> Self {
        Self(OsRng.next_u32())
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// The next nonce, wrapping at `u32::MAX`.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

// ---------------------------------------------------------------------------
// MosaicId
// ---------------------------------------------------------------------------

/// A 64-bit mosaic id. Derived ids never carry the namespace flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MosaicId(UInt64);

impl MosaicId {
    /// Wraps an id already known to the caller, e.g. read from the chain.
    pub const fn new(value: u64) -> Self {
        Self(UInt64::new(value))
    }

    /// Derives the id `owner` gets for `nonce`, stepping the nonce past
    /// reserved ids. Returns the id with the nonce that produced it.
    pub fn from_nonce(
        owner: &PublicKey,
        nonce: MosaicNonce,
    ) -> Result<(Self, MosaicNonce), IdentifierCollisionError> {
        id_generator::derive_mosaic_id(owner, nonce)
    }

    pub fn from_hex(input: &str) -> Result<Self, ValidationError> {
        UInt64::from_hex(input).map(Self)
    }

    pub fn id(self) -> UInt64 {
        self.0
    }

    pub fn value(self) -> u64 {
        self.0.value()
    }

    pub fn to_hex(self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for MosaicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Mosaic
// ---------------------------------------------------------------------------

/// An amount of a mosaic, in its smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mosaic {
    pub id: MosaicId,
    pub amount: UInt64,
}

impl Mosaic {
    pub fn new(id: MosaicId, amount: u64) -> Self {
        Self {
            id,
            amount: UInt64::new(amount),
        }
    }
}

// ---------------------------------------------------------------------------
// MosaicProperties
// ---------------------------------------------------------------------------

pub const FLAG_SUPPLY_MUTABLE: u8 = 0x01;
pub const FLAG_TRANSFERABLE: u8 = 0x02;
pub const FLAG_LEVY_MUTABLE: u8 = 0x04;

/// Id of the optional duration property.
pub const PROPERTY_DURATION: u8 = 2;

/// Properties fixed when a mosaic is defined.
///
/// Flags and divisibility are always present on the wire; the duration
/// is an optional property and a mosaic without one never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MosaicProperties {
    pub supply_mutable: bool,
    pub transferable: bool,
    pub levy_mutable: bool,
    pub divisibility: u8,
    pub duration: Option<u64>,
}

impl MosaicProperties {
    pub fn new(supply_mutable: bool, transferable: bool, divisibility: u8) -> Self {
        Self {
            supply_mutable,
            transferable,
            levy_mutable: false,
            divisibility,
            duration: None,
        }
    }

    pub fn with_duration(mut self, blocks: u64) -> Self {
        self.duration = Some(blocks);
        self
    }

    pub fn with_levy_mutable(mut self, levy_mutable: bool) -> Self {
        self.levy_mutable = levy_mutable;
        self
    }

    pub fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.supply_mutable {
            flags |= FLAG_SUPPLY_MUTABLE;
        }
        if self.transferable {
            flags |= FLAG_TRANSFERABLE;
        }
        if self.levy_mutable {
            flags |= FLAG_LEVY_MUTABLE;
        }
        flags
    }

    pub fn from_flags(flags: u8, divisibility: u8, duration: Option<u64>) -> Self {
        Self {
            supply_mutable: flags & FLAG_SUPPLY_MUTABLE != 0,
            transferable: flags & FLAG_TRANSFERABLE != 0,
            levy_mutable: flags & FLAG_LEVY_MUTABLE != 0,
            divisibility,
            duration,
        }
    }
}
