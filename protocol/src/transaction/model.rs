//! # Transaction Model
//!
//! A [`Transaction`] is the shared envelope (network, version, fee,
//! deadline, optional signature) around a [`TransactionBody`], a closed
//! set of per-kind structs. Everything here is plain data: builders
//! create it, the codec turns it into bytes and back, and signing reads
//! it without ever mutating it.

use super::types::{
    AccountLinkAction, AccountPropertyType, AliasAction, ExchangeOfferType,
    MetadataModificationType, MetadataType, MosaicLevyType, MosaicSupplyType,
    MultisigModificationType, NamespaceType, PropertyModificationType, PropertyTarget,
    TransactionType,
};
use crate::config::MOSAIC_LEVY_PERCENT;
use crate::crypto::hash::{sha3_256, HashType};
use crate::crypto::{PublicKey, Signature};
use crate::error::ValidationError;
use crate::model::{
    Address, Deadline, Message, Mosaic, MosaicId, MosaicNonce, MosaicProperties, NamespaceId,
    NetworkType, Recipient, UInt64,
};
use crate::schema::EncodingError;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The signature and signer public key written into a signed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureInfo {
    pub signature: Signature,
    pub signer: PublicKey,
}

/// A top-level transaction.
///
/// `signature` is `None` for a transaction fresh from a builder and
/// `Some` for one decoded from a signed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub network_type: NetworkType,
    pub version: u8,
    pub max_fee: UInt64,
    pub deadline: Deadline,
    pub signature: Option<SignatureInfo>,
    pub body: TransactionBody,
}

impl Transaction {
    pub fn transaction_type(&self) -> TransactionType {
        self.body.transaction_type()
    }

    /// The `u16` header value `network << 8 | version`.
    pub fn version_field(&self) -> u16 {
        version_field(self.network_type, self.version)
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Whether `public_key` signed this transaction, as the primary
    /// signer or as an aggregate cosigner.
    pub fn is_signed_by(&self, public_key: &PublicKey) -> bool {
        let primary = self
            .signature
            .map(|info| info.signer == *public_key)
            .unwrap_or(false);
        let cosigner = match &self.body {
            TransactionBody::Aggregate(aggregate) => aggregate.is_signed_by(public_key),
            _ => false,
        };
        primary || cosigner
    }

    /// Serialized size in bytes.
    pub fn size(&self) -> Result<usize, EncodingError> {
        super::codec::serialize(self).map(|bytes| bytes.len())
    }

    pub fn serialize(&self) -> Result<Vec<u8>, EncodingError> {
        super::codec::serialize(self)
    }

    /// Drops the envelope fields an inner transaction does not carry.
    /// Aggregates cannot be embedded.
    pub fn into_embedded(self) -> Option<EmbeddedTransaction> {
        if self.transaction_type().is_aggregate() {
            return None;
        }
        Some(EmbeddedTransaction {
            network_type: self.network_type,
            version: self.version,
            body: self.body,
        })
    }
}

/// A transaction carried inside an aggregate: no signature, fee or
/// deadline of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedTransaction {
    pub network_type: NetworkType,
    pub version: u8,
    pub body: TransactionBody,
}

impl EmbeddedTransaction {
    pub fn transaction_type(&self) -> TransactionType {
        self.body.transaction_type()
    }

    pub fn version_field(&self) -> u16 {
        version_field(self.network_type, self.version)
    }

    pub fn serialize(&self) -> Result<Vec<u8>, EncodingError> {
        super::codec::serialize_embedded(self)
    }
}

pub(crate) fn version_field(network_type: NetworkType, version: u8) -> u16 {
    (u16::from(network_type.code()) << 8) | u16::from(version)
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionBody {
    Transfer(TransferTransaction),
    MosaicDefinition(MosaicDefinitionTransaction),
    MosaicSupplyChange(MosaicSupplyChangeTransaction),
    RegisterNamespace(RegisterNamespaceTransaction),
    Alias(AliasTransaction),
    AccountProperty(AccountPropertyTransaction),
    ModifyMultisigAccount(ModifyMultisigAccountTransaction),
    LockFunds(LockFundsTransaction),
    SecretLock(SecretLockTransaction),
    SecretProof(SecretProofTransaction),
    ModifyMetadata(ModifyMetadataTransaction),
    AccountLink(AccountLinkTransaction),
    Metadata(MetadataTransaction),
    ModifyMosaicLevy(ModifyMosaicLevyTransaction),
    RemoveMosaicLevy(RemoveMosaicLevyTransaction),
    ExchangeOfferAdd(ExchangeOfferAddTransaction),
    ExchangeOffer(ExchangeOfferTransaction),
    ExchangeOfferRemove(ExchangeOfferRemoveTransaction),
    ModifyContract(ModifyContractTransaction),
    BlockchainConfig(BlockchainConfigTransaction),
    BlockchainUpgrade(BlockchainUpgradeTransaction),
    DrivePrepare(DrivePrepareTransaction),
    Aggregate(AggregateTransaction),
}

impl TransactionBody {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Transfer(_) => TransactionType::Transfer,
            Self::MosaicDefinition(_) => TransactionType::MosaicDefinition,
            Self::MosaicSupplyChange(_) => TransactionType::MosaicSupplyChange,
            Self::RegisterNamespace(_) => TransactionType::RegisterNamespace,
            Self::Alias(alias) => match alias.target {
                AliasTarget::Address(_) => TransactionType::AddressAlias,
                AliasTarget::Mosaic(_) => TransactionType::MosaicAlias,
            },
            Self::AccountProperty(property) => match property.modifications.target() {
                PropertyTarget::Address => TransactionType::AccountPropertiesAddress,
                PropertyTarget::Mosaic => TransactionType::AccountPropertiesMosaic,
                PropertyTarget::EntityType => TransactionType::AccountPropertiesEntityType,
            },
            Self::ModifyMultisigAccount(_) => TransactionType::ModifyMultisigAccount,
            Self::LockFunds(_) => TransactionType::LockFunds,
            Self::SecretLock(_) => TransactionType::SecretLock,
            Self::SecretProof(_) => TransactionType::SecretProof,
            Self::ModifyMetadata(metadata) => match metadata.target {
                MetadataTarget::Address(_) => TransactionType::ModifyAddressMetadata,
                MetadataTarget::Mosaic(_) => TransactionType::ModifyMosaicMetadata,
                MetadataTarget::Namespace(_) => TransactionType::ModifyNamespaceMetadata,
            },
            Self::AccountLink(_) => TransactionType::AccountLink,
            Self::Metadata(metadata) => match metadata.target {
                MetadataEntity::Account => TransactionType::AccountMetadata,
                MetadataEntity::Mosaic(_) => TransactionType::MosaicMetadata,
                MetadataEntity::Namespace(_) => TransactionType::NamespaceMetadata,
            },
            Self::ModifyMosaicLevy(_) => TransactionType::ModifyMosaicLevy,
            Self::RemoveMosaicLevy(_) => TransactionType::RemoveMosaicLevy,
            Self::ExchangeOfferAdd(_) => TransactionType::ExchangeOfferAdd,
            Self::ExchangeOffer(_) => TransactionType::ExchangeOffer,
            Self::ExchangeOfferRemove(_) => TransactionType::ExchangeOfferRemove,
            Self::ModifyContract(_) => TransactionType::ModifyContract,
            Self::BlockchainConfig(_) => TransactionType::BlockchainConfig,
            Self::BlockchainUpgrade(_) => TransactionType::BlockchainUpgrade,
            Self::DrivePrepare(_) => TransactionType::DrivePrepare,
            Self::Aggregate(aggregate) => {
                if aggregate.bonded {
                    TransactionType::AggregateBonded
                } else {
                    TransactionType::AggregateComplete
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTransaction {
    pub recipient: Recipient,
    pub mosaics: Vec<Mosaic>,
    pub message: Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicDefinitionTransaction {
    pub nonce: MosaicNonce,
    pub mosaic_id: MosaicId,
    pub properties: MosaicProperties,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicSupplyChangeTransaction {
    pub mosaic_id: MosaicId,
    pub supply_type: MosaicSupplyType,
    pub delta: UInt64,
}

/// How a namespace is registered: a root rents for a number of blocks, a
/// child lives under an existing parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceRegistration {
    Root { duration: UInt64 },
    Sub { parent_id: NamespaceId },
}

impl NamespaceRegistration {
    pub fn namespace_type(&self) -> NamespaceType {
        match self {
            Self::Root { .. } => NamespaceType::Root,
            Self::Sub { .. } => NamespaceType::Sub,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterNamespaceTransaction {
    pub name: String,
    pub namespace_id: NamespaceId,
    pub registration: NamespaceRegistration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTarget {
    Address(Address),
    Mosaic(MosaicId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTransaction {
    pub action: AliasAction,
    pub namespace_id: NamespaceId,
    pub target: AliasTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyModification<T> {
    pub modification_type: PropertyModificationType,
    pub value: T,
}

impl<T> PropertyModification<T> {
    pub fn add(value: T) -> Self {
        Self {
            modification_type: PropertyModificationType::Add,
            value,
        }
    }

    pub fn remove(value: T) -> Self {
        Self {
            modification_type: PropertyModificationType::Remove,
            value,
        }
    }
}

/// A property modification list. The variant picks the transaction type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyModifications {
    Address(Vec<PropertyModification<Address>>),
    Mosaic(Vec<PropertyModification<MosaicId>>),
    EntityType(Vec<PropertyModification<TransactionType>>),
}

impl PropertyModifications {
    pub fn target(&self) -> PropertyTarget {
        match self {
            Self::Address(_) => PropertyTarget::Address,
            Self::Mosaic(_) => PropertyTarget::Mosaic,
            Self::EntityType(_) => PropertyTarget::EntityType,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Address(list) => list.len(),
            Self::Mosaic(list) => list.len(),
            Self::EntityType(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPropertyTransaction {
    pub property_type: AccountPropertyType,
    pub modifications: PropertyModifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CosignatoryModification {
    pub modification_type: MultisigModificationType,
    pub cosignatory: PublicKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyMultisigAccountTransaction {
    pub min_approval_delta: i8,
    pub min_removal_delta: i8,
    pub modifications: Vec<CosignatoryModification>,
}

/// Locks funds as a deposit for an announced aggregate-bonded
/// transaction, identified by its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockFundsTransaction {
    pub mosaic: Mosaic,
    pub duration: UInt64,
    pub hash: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretLockTransaction {
    pub mosaic: Mosaic,
    pub duration: UInt64,
    pub hash_type: HashType,
    pub secret: [u8; 32],
    pub recipient: Recipient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretProofTransaction {
    pub hash_type: HashType,
    pub secret: [u8; 32],
    pub recipient: Recipient,
    pub proof: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataTarget {
    Address(Address),
    Mosaic(MosaicId),
    Namespace(NamespaceId),
}

impl MetadataTarget {
    pub fn metadata_type(&self) -> MetadataType {
        match self {
            Self::Address(_) => MetadataType::Address,
            Self::Mosaic(_) => MetadataType::Mosaic,
            Self::Namespace(_) => MetadataType::Namespace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataModification {
    pub modification_type: MetadataModificationType,
    pub key: String,
    /// Empty for removals.
    pub value: String,
}

impl MetadataModification {
    pub fn add(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            modification_type: MetadataModificationType::Add,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self {
            modification_type: MetadataModificationType::Remove,
            key: key.into(),
            value: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyMetadataTransaction {
    pub target: MetadataTarget,
    pub modifications: Vec<MetadataModification>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLinkTransaction {
    pub remote_public_key: PublicKey,
    pub action: AccountLinkAction,
}

/// The entity a key-value metadata entry hangs off. Account entries are
/// addressed by the target key alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataEntity {
    Account,
    Mosaic(MosaicId),
    Namespace(NamespaceId),
}

/// Sets one metadata value owned by `target_key`.
///
/// `value` is not the new value itself: it is the new value XOR-ed with
/// the current one, both zero-padded to the longer length. Nodes apply
/// the same XOR to recover the new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTransaction {
    pub target_key: PublicKey,
    pub scoped_metadata_key: u64,
    pub target: MetadataEntity,
    /// New length minus old length.
    pub value_size_delta: i16,
    pub value: Vec<u8>,
}

/// The 64-bit key a metadata entry is stored under, derived from a
/// readable name: the low eight bytes of its SHA3-256 digest, read
/// big-endian.
pub fn scoped_metadata_key(name: &str) -> u64 {
    let digest = sha3_256(&[name.as_bytes()]);
    let mut low = [0u8; 8];
    low.copy_from_slice(&digest[24..]);
    u64::from_be_bytes(low)
}

/// A fee charged on every transfer of a mosaic, paid in `mosaic_id` to
/// `recipient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicLevy {
    pub levy_type: MosaicLevyType,
    pub recipient: Recipient,
    pub mosaic_id: MosaicId,
    pub fee: UInt64,
}

impl MosaicLevy {
    /// A fixed `amount` of `mosaic_id` per transfer.
    pub fn absolute(recipient: Recipient, mosaic_id: MosaicId, amount: u64) -> Self {
        Self {
            levy_type: MosaicLevyType::Absolute,
            recipient,
            mosaic_id,
            fee: UInt64::new(amount),
        }
    }

    /// `percent` whole percent of every transferred amount.
    pub fn percentile(
        recipient: Recipient,
        mosaic_id: MosaicId,
        percent: u64,
    ) -> Result<Self, ValidationError> {
        let fee = percent
            .checked_mul(MOSAIC_LEVY_PERCENT)
            .ok_or_else(|| ValidationError::invalid("fee", format!("{percent}% overflows")))?;
        Ok(Self {
            levy_type: MosaicLevyType::Percentile,
            recipient,
            mosaic_id,
            fee: UInt64::new(fee),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyMosaicLevyTransaction {
    pub mosaic_id: MosaicId,
    pub levy: MosaicLevy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveMosaicLevyTransaction {
    pub mosaic_id: MosaicId,
}

/// A new offer to sell or buy `mosaic` for `cost`, open for `duration`
/// blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddExchangeOffer {
    pub mosaic: Mosaic,
    pub cost: UInt64,
    pub offer_type: ExchangeOfferType,
    pub duration: UInt64,
}

/// Accepts (part of) an existing offer published by `owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeOffer {
    pub mosaic: Mosaic,
    pub cost: UInt64,
    pub offer_type: ExchangeOfferType,
    pub owner: PublicKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveExchangeOffer {
    pub mosaic_id: MosaicId,
    pub offer_type: ExchangeOfferType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOfferAddTransaction {
    pub offers: Vec<AddExchangeOffer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOfferTransaction {
    pub offers: Vec<ExchangeOffer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOfferRemoveTransaction {
    pub offers: Vec<RemoveExchangeOffer>,
}

/// Changes a contract's duration and content hash and its customer,
/// executor and verifier lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyContractTransaction {
    pub duration_delta: i64,
    pub content_hash: [u8; 32],
    pub customers: Vec<CosignatoryModification>,
    pub executors: Vec<CosignatoryModification>,
    pub verifiers: Vec<CosignatoryModification>,
}

/// Network configuration taking effect `apply_height_delta` blocks after
/// inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockchainConfigTransaction {
    pub apply_height_delta: UInt64,
    pub config: String,
    pub supported_entity_versions: String,
}

/// A node software version: four 16-bit parts packed into one `u64`,
/// major first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockchainVersion {
    pub major: u16,
    pub minor: u16,
    pub revision: u16,
    pub build: u16,
}

impl BlockchainVersion {
    pub fn new(major: u16, minor: u16, revision: u16, build: u16) -> Self {
        Self {
            major,
            minor,
            revision,
            build,
        }
    }

    pub fn value(self) -> u64 {
        (u64::from(self.major) << 48)
            | (u64::from(self.minor) << 32)
            | (u64::from(self.revision) << 16)
            | u64::from(self.build)
    }

    pub fn from_value(value: u64) -> Self {
        Self {
            major: (value >> 48) as u16,
            minor: (value >> 32) as u16,
            revision: (value >> 16) as u16,
            build: value as u16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockchainUpgradeTransaction {
    pub upgrade_period: UInt64,
    pub new_version: BlockchainVersion,
}

/// Prepares a storage drive owned by `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrivePrepareTransaction {
    pub owner: PublicKey,
    pub duration: UInt64,
    pub billing_period: UInt64,
    pub billing_price: UInt64,
    pub drive_size: UInt64,
    pub replicas: u16,
    pub min_replicators: u16,
    pub percent_approvers: u8,
}

/// A cosigner's public key and signature over the aggregate hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cosignature {
    pub signer: PublicKey,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateTransaction {
    /// Bonded aggregates are announced before every cosignature is
    /// collected; complete ones arrive fully signed.
    pub bonded: bool,
    pub inner: Vec<EmbeddedTransaction>,
    pub cosignatures: Vec<Cosignature>,
}

impl AggregateTransaction {
    /// Whether `public_key` appears among the cosigners.
    pub fn is_signed_by(&self, public_key: &PublicKey) -> bool {
        self.cosignatures.iter().any(|c| c.signer == *public_key)
    }
}
