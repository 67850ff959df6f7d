//! # Protocol Configuration & Constants
//!
//! Every fixed number of the wire format and of the client-side defaults
//! lives here, plus [`NetworkContext`], the explicit bundle of per-network
//! settings handed to transaction builders.
//!
//! Nothing in this module is global state. A host that talks to several
//! networks builds one `NetworkContext` per network.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::model::{GenerationHash, NetworkType};
use crate::transaction::fee::FeeStrategy;

// ---------------------------------------------------------------------------
// Transaction Layout
// ---------------------------------------------------------------------------

/// Offset of the little-endian `u32` payload size.
pub const SIZE_OFFSET: usize = 0;

/// Offset of the 64-byte signature.
pub const SIGNATURE_OFFSET: usize = 4;

/// Offset of the 32-byte signer public key.
pub const SIGNER_OFFSET: usize = 68;

/// Offset of the reserved word. The signing hash covers the payload from
/// here to the end of the body.
pub const RESERVED_OFFSET: usize = 100;

/// Offset of the `u16` holding `network << 8 | version`.
pub const VERSION_OFFSET: usize = 104;

/// Offset of the `u16` transaction type code.
pub const TYPE_OFFSET: usize = 106;

pub const MAX_FEE_OFFSET: usize = 108;

pub const DEADLINE_OFFSET: usize = 116;

/// Size of the full header; the kind-specific body starts here.
pub const TRANSACTION_HEADER_SIZE: usize = 124;

/// Size of the reduced header of an embedded transaction: size, reserved,
/// version/network and type.
pub const EMBEDDED_HEADER_SIZE: usize = 12;

/// A cosignature on the wire: 32-byte public key then 64-byte signature.
pub const COSIGNATURE_SIZE: usize = 96;

/// Alignment of every variable-length item in an encoded table.
pub const SCHEMA_ALIGNMENT: usize = 4;

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Network epoch, 2016-04-01T00:00:00Z, in Unix milliseconds. Deadlines
/// count milliseconds from this instant.
pub const NETWORK_EPOCH_MILLIS: i64 = 1_459_468_800_000;

/// Deadline horizon used when a builder is given none.
pub const DEFAULT_DEADLINE_HORIZON: Duration = Duration::from_secs(2 * 60 * 60);

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

pub const FEE_MULTIPLIER_LOW: u64 = 25_000;

pub const FEE_MULTIPLIER_MEDIUM: u64 = 250_000;

pub const FEE_MULTIPLIER_HIGH: u64 = 2_500_000;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Deepest namespace path (`root.sub.leaf`).
pub const NAMESPACE_MAX_DEPTH: usize = 3;

/// Longest namespace name part, in bytes.
pub const NAMESPACE_MAX_NAME_LENGTH: usize = 64;

/// Bit set in every namespace id and clear in every mosaic id.
pub const NAMESPACE_FLAG: u64 = 1 << 63;

/// Nonces tried when deriving a mosaic id before giving up.
pub const MOSAIC_ID_MAX_ATTEMPTS: u32 = 256;

// ---------------------------------------------------------------------------
// Field Limits
// ---------------------------------------------------------------------------

pub const MAX_MOSAIC_DIVISIBILITY: u8 = 6;

pub const MAX_TRANSFER_MOSAICS: usize = 255;

pub const MAX_MESSAGE_SIZE: usize = 1024;

pub const MAX_PROPERTY_MODIFICATIONS: usize = 255;

pub const MAX_MULTISIG_MODIFICATIONS: usize = 255;

pub const MAX_METADATA_KEY_SIZE: usize = 128;

pub const MAX_METADATA_VALUE_SIZE: usize = 1024;

pub const MAX_EXCHANGE_OFFERS: usize = 255;

pub const MAX_CONTRACT_MODIFICATIONS: usize = 255;

/// Percentile levy fee meaning one percent of the transferred amount.
pub const MOSAIC_LEVY_PERCENT: u64 = 100_000;

// ---------------------------------------------------------------------------
// Cryptography
// ---------------------------------------------------------------------------

pub const AES_KEY_LENGTH: usize = 32;

/// AES block and CBC initialization vector length.
pub const AES_IV_LENGTH: usize = 16;

pub const SHARED_KEY_SALT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// NetworkContext
// ---------------------------------------------------------------------------

/// Per-network defaults threaded into every builder.
///
/// ```
/// use sirius_protocol::config::NetworkContext;
/// use sirius_protocol::model::NetworkType;
/// use sirius_protocol::transaction::FeeStrategy;
///
/// let ctx = NetworkContext::new(NetworkType::TestNet).with_fee_strategy(FeeStrategy::low());
/// assert_eq!(ctx.network_type, NetworkType::TestNet);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkContext {
    pub network_type: NetworkType,
    /// Salt prepended to signing and transaction hashes, if the network
    /// defines one.
    pub generation_hash: Option<GenerationHash>,
    pub deadline_horizon: Duration,
    pub fee_strategy: FeeStrategy,
}

impl NetworkContext {
    /// A context with no generation hash, the default horizon and zero
    /// fees.
    pub fn new(network_type: NetworkType) -> Self {
        Self {
            network_type,
            generation_hash: None,
            deadline_horizon: DEFAULT_DEADLINE_HORIZON,
            fee_strategy: FeeStrategy::Zero,
        }
    }

    pub fn with_generation_hash(mut self, generation_hash: GenerationHash) -> Self {
        self.generation_hash = Some(generation_hash);
        self
    }

    pub fn with_deadline_horizon(mut self, horizon: Duration) -> Self {
        self.deadline_horizon = horizon;
        self
    }

    pub fn with_fee_strategy(mut self, fee_strategy: FeeStrategy) -> Self {
        self.fee_strategy = fee_strategy;
        self
    }
}
