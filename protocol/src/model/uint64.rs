//! 64-bit unsigned values as the network's JSON speaks them.
//!
//! REST responses carry amounts, ids and heights as `[lower, higher]` pairs
//! of 32-bit words. [`UInt64`] keeps a native `u64` inside and converts at
//! the edges, so comparison and arithmetic always treat the pair as one
//! value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct UInt64(u64);

impl UInt64 {
    pub const ZERO: UInt64 = UInt64(0);

    pub const MAX: UInt64 = UInt64(u64::MAX);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Joins a `[lower, higher]` word pair.
    pub const fn from_parts(lower: u32, higher: u32) -> Self {
        Self(((higher as u64) << 32) | lower as u64)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    pub const fn lower(self) -> u32 {
        self.0 as u32
    }

    pub const fn higher(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub const fn to_parts(self) -> [u32; 2] {
        [self.lower(), self.higher()]
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }

    /// 16 uppercase hex digits, most significant first.
    pub fn to_hex(self) -> String {
        format!("{:016X}", self.0)
    }

    /// Parses up to 16 hex digits, most significant first.
    pub fn from_hex(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() || input.len() > 16 {
            return Err(ValidationError::invalid("uint64", "expected 1 to 16 hex digits"));
        }
        u64::from_str_radix(input, 16)
            .map(Self)
            .map_err(|_| ValidationError::invalid("uint64", format!("not hex: {input}")))
    }

    pub fn checked_add(self, rhs: UInt64) -> Option<UInt64> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: UInt64) -> Option<UInt64> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_mul(self, rhs: UInt64) -> Option<UInt64> {
        self.0.checked_mul(rhs.0).map(Self)
    }
}

impl From<u64> for UInt64 {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<UInt64> for u64 {
    fn from(value: UInt64) -> Self {
        value.0
    }
}

impl From<[u32; 2]> for UInt64 {
    fn from(parts: [u32; 2]) -> Self {
        Self::from_parts(parts[0], parts[1])
    }
}

impl From<UInt64> for [u32; 2] {
    fn from(value: UInt64) -> Self {
        value.to_parts()
    }
}

impl fmt::Display for UInt64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
