//! # Identifier Generation
//!
//! Mosaic and namespace ids are never chosen freely; they are derived from
//! SHA3-256 so that every client computes the same id for the same input.
//!
//! ## Namespaces
//!
//! ```text
//! h  = SHA3-256(parent id as u64 LE || name part)
//! id = u64 LE of h[0..8] | 2^63
//! ```
//!
//! A dotted name is resolved one part at a time, each part's id becoming
//! the next part's parent. Root namespaces have parent id 0.
//!
//! ## Mosaics
//!
//! ```text
//! h  = SHA3-256(nonce as u32 LE || owner public key)
//! id = u64 LE of h[0..8] & (2^63 - 1)
//! ```
//!
//! If the id falls in the reserved range the nonce is incremented and the
//! derivation repeated, up to [`MOSAIC_ID_MAX_ATTEMPTS`] times.

use thiserror::Error;
use tracing::debug;

use super::mosaic::{MosaicId, MosaicNonce};
use super::namespace::NamespaceId;
use super::uint64::UInt64;
use crate::config::{
    MOSAIC_ID_MAX_ATTEMPTS, NAMESPACE_FLAG, NAMESPACE_MAX_DEPTH, NAMESPACE_MAX_NAME_LENGTH,
};
use crate::crypto::hash::sha3_256;
use crate::crypto::PublicKey;
use crate::error::ValidationError;

/// Every nonce in the retry window produced a reserved id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no usable mosaic id after {attempts} nonces starting at {start_nonce}")]
pub struct IdentifierCollisionError {
    pub start_nonce: u32,
    pub attempts: u32,
}

/// Mosaic ids the network will not accept. Zero is the "no mosaic" marker.
pub fn is_reserved_mosaic_id(id: u64) -> bool {
    id == 0
}

/// Reads a little-endian u64 from the first eight bytes of a digest, as a
/// `(lower, higher)` word pair.
fn truncate_digest(digest: &[u8; 32]) -> UInt64 {
    let lower = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let higher = u32::from_le_bytes([digest[4], digest[5], digest[6], digest[7]]);
    UInt64::from_parts(lower, higher)
}

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

/// Checks one part of a namespace name: `^[a-z0-9][a-z0-9_-]*$`, at most
/// [`NAMESPACE_MAX_NAME_LENGTH`] bytes.
pub fn validate_namespace_part(part: &str) -> Result<(), ValidationError> {
    let mut chars = part.chars();
    let first = chars
        .next()
        .ok_or_else(|| ValidationError::invalid("name", "namespace name is empty"))?;

    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return Err(ValidationError::invalid(
            "name",
            format!("`{part}` must start with a lowercase letter or digit"),
        ));
    }
    if let Some(bad) = chars.find(|c| {
        !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
    }) {
        return Err(ValidationError::invalid(
            "name",
            format!("`{part}` contains invalid character `{bad}`"),
        ));
    }
    if part.len() > NAMESPACE_MAX_NAME_LENGTH {
        return Err(ValidationError::invalid(
            "name",
            format!("`{part}` is longer than {NAMESPACE_MAX_NAME_LENGTH} bytes"),
        ));
    }
    Ok(())
}

fn namespace_part_id(parent: NamespaceId, part: &str) -> NamespaceId {
    let parent_bytes = parent.value().to_le_bytes();
    let digest = sha3_256(&[&parent_bytes[..], part.as_bytes()]);
    NamespaceId::new(truncate_digest(&digest).value() | NAMESPACE_FLAG)
}

/// Derives the id of `name` under `parent`. `name` may be dotted, in which
/// case each part is resolved below the previous one.
pub fn derive_namespace_id(parent: NamespaceId, name: &str) -> Result<NamespaceId, ValidationError> {
    let parts = split_namespace_name(name)?;
    Ok(parts
        .into_iter()
        .fold(parent, |parent, part| namespace_part_id(parent, part)))
}

/// Ids of every level of a dotted name, root first.
///
/// `namespace_path("a.b")` returns `[id(a), id(a.b)]`.
pub fn namespace_path(name: &str) -> Result<Vec<NamespaceId>, ValidationError> {
    let parts = split_namespace_name(name)?;
    let mut path = Vec::with_capacity(parts.len());
    let mut parent = NamespaceId::ROOT;
    for part in parts {
        parent = namespace_part_id(parent, part);
        path.push(parent);
    }
    Ok(path)
}

fn split_namespace_name(name: &str) -> Result<Vec<&str>, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::invalid("name", "namespace name is empty"));
    }
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > NAMESPACE_MAX_DEPTH {
        return Err(ValidationError::invalid(
            "name",
            format!("`{name}` has more than {NAMESPACE_MAX_DEPTH} levels"),
        ));
    }
    for part in &parts {
        validate_namespace_part(part)?;
    }
    Ok(parts)
}

// ---------------------------------------------------------------------------
// Mosaics
// ---------------------------------------------------------------------------

fn mosaic_id_for(owner: &PublicKey, nonce: MosaicNonce) -> u64 {
    let digest = sha3_256(&[&nonce.to_le_bytes()[..], &owner.as_bytes()[..]]);
    truncate_digest(&digest).value() & !NAMESPACE_FLAG
}

/// Derives the mosaic id for `owner` and `nonce`.
///
/// Returns the id and the nonce that produced it, which differs from the
/// input only when the input nonce mapped to a reserved id.
pub fn derive_mosaic_id(
    owner: &PublicKey,
    nonce: MosaicNonce,
) -> Result<(MosaicId, MosaicNonce), IdentifierCollisionError> {
    derive_mosaic_id_with(owner, nonce, is_reserved_mosaic_id)
}

pub(crate) fn derive_mosaic_id_with(
    owner: &PublicKey,
    start: MosaicNonce,
    is_reserved: impl Fn(u64) -> bool,
) -> Result<(MosaicId, MosaicNonce), IdentifierCollisionError> {
    let mut nonce = start;
    for attempt in 0..MOSAIC_ID_MAX_ATTEMPTS {
        let id = mosaic_id_for(owner, nonce);
        if !is_reserved(id) {
            if attempt > 0 {
                debug!(
                    start_nonce = start.value(),
                    nonce = nonce.value(),
                    "stepped past reserved mosaic ids"
                );
            }
            return Ok((MosaicId::new(id), nonce));
        }
        nonce = nonce.next();
    }
    Err(IdentifierCollisionError {
        start_nonce: start.value(),
        attempts: MOSAIC_ID_MAX_ATTEMPTS,
    })
}
