//! Namespace identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::id_generator;
use super::uint64::UInt64;
use crate::config::NAMESPACE_FLAG;
use crate::error::ValidationError;

/// A 64-bit namespace id. Derived ids always carry [`NAMESPACE_FLAG`].
///
/// [`NamespaceId::ROOT`] (zero) is the parent of every root namespace and
/// is not itself a registered namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceId(UInt64);

impl NamespaceId {
    pub const ROOT: NamespaceId = NamespaceId(UInt64::new(0));

    /// Wraps an id already known to the caller, e.g. read from the chain.
    pub const fn new(value: u64) -> Self {
        Self(UInt64::new(value))
    }

    /// Derives the id of a full dotted name such as `"prx.xpx"`.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        id_generator::derive_namespace_id(NamespaceId::ROOT, name)
    }

    /// Derives the id of `name` under `parent`.
    pub fn from_parent(parent: NamespaceId, name: &str) -> Result<Self, ValidationError> {
        id_generator::derive_namespace_id(parent, name)
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

    /// `true` for ids with the namespace flag set.
    pub fn is_namespace(self) -> bool {
        self.value() & NAMESPACE_FLAG != 0
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
