//! Type codes and the small enumerations carried inside transaction bodies.
//!
//! Every enum here maps to a fixed byte (or `u16` for transaction types)
//! on the wire. `from_code` returns `None` for unknown codes; the codec
//! turns that into an [`EncodingError`](crate::schema::EncodingError)
//! naming the field it was read from.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// The kind of a transaction, as written in the `type` header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    Transfer,
    MosaicDefinition,
    MosaicSupplyChange,
    RegisterNamespace,
    AddressAlias,
    MosaicAlias,
    ModifyMultisigAccount,
    AggregateComplete,
    AggregateBonded,
    LockFunds,
    AccountPropertiesAddress,
    AccountPropertiesMosaic,
    AccountPropertiesEntityType,
    SecretLock,
    SecretProof,
    AccountLink,
    ModifyAddressMetadata,
    ModifyMosaicMetadata,
    ModifyNamespaceMetadata,
    AccountMetadata,
    MosaicMetadata,
    NamespaceMetadata,
    ModifyMosaicLevy,
    RemoveMosaicLevy,
    ExchangeOfferAdd,
    ExchangeOffer,
    ExchangeOfferRemove,
    ModifyContract,
    BlockchainConfig,
    BlockchainUpgrade,
    DrivePrepare,
}

impl TransactionType {
    pub const ALL: [TransactionType; 31] = [
        Self::Transfer,
        Self::MosaicDefinition,
        Self::MosaicSupplyChange,
        Self::RegisterNamespace,
        Self::AddressAlias,
        Self::MosaicAlias,
        Self::ModifyMultisigAccount,
        Self::AggregateComplete,
        Self::AggregateBonded,
        Self::LockFunds,
        Self::AccountPropertiesAddress,
        Self::AccountPropertiesMosaic,
        Self::AccountPropertiesEntityType,
        Self::SecretLock,
        Self::SecretProof,
        Self::AccountLink,
        Self::ModifyAddressMetadata,
        Self::ModifyMosaicMetadata,
        Self::ModifyNamespaceMetadata,
        Self::AccountMetadata,
        Self::MosaicMetadata,
        Self::NamespaceMetadata,
        Self::ModifyMosaicLevy,
        Self::RemoveMosaicLevy,
        Self::ExchangeOfferAdd,
        Self::ExchangeOffer,
        Self::ExchangeOfferRemove,
        Self::ModifyContract,
        Self::BlockchainConfig,
        Self::BlockchainUpgrade,
        Self::DrivePrepare,
    ];

    pub fn code(self) -> u16 {
        match self {
            Self::Transfer => 0x4154,
            Self::MosaicDefinition => 0x414D,
            Self::MosaicSupplyChange => 0x424D,
            Self::RegisterNamespace => 0x414E,
            Self::AddressAlias => 0x424E,
            Self::MosaicAlias => 0x434E,
            Self::ModifyMultisigAccount => 0x4155,
            Self::AggregateComplete => 0x4141,
            Self::AggregateBonded => 0x4241,
            Self::LockFunds => 0x4148,
            Self::AccountPropertiesAddress => 0x4150,
            Self::AccountPropertiesMosaic => 0x4250,
            Self::AccountPropertiesEntityType => 0x4350,
            Self::SecretLock => 0x4152,
            Self::SecretProof => 0x4252,
            Self::AccountLink => 0x414C,
            Self::ModifyAddressMetadata => 0x413D,
            Self::ModifyMosaicMetadata => 0x423D,
            Self::ModifyNamespaceMetadata => 0x433D,
            Self::AccountMetadata => 0x413F,
            Self::MosaicMetadata => 0x423F,
            Self::NamespaceMetadata => 0x433F,
            Self::ModifyMosaicLevy => 0x434D,
            Self::RemoveMosaicLevy => 0x444D,
            Self::ExchangeOfferAdd => 0x415D,
            Self::ExchangeOffer => 0x425D,
            Self::ExchangeOfferRemove => 0x435D,
            Self::ModifyContract => 0x4157,
            Self::BlockchainConfig => 0x4159,
            Self::BlockchainUpgrade => 0x4158,
            Self::DrivePrepare => 0x415A,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// The body version builders write unless told otherwise.
    pub fn default_version(self) -> u8 {
        match self {
            Self::ExchangeOfferAdd => 4,
            Self::Transfer
            | Self::MosaicDefinition
            | Self::ModifyMultisigAccount
            | Self::AggregateComplete
            | Self::AggregateBonded
            | Self::ModifyContract => 3,
            Self::MosaicSupplyChange
            | Self::RegisterNamespace
            | Self::AccountLink
            | Self::ExchangeOffer
            | Self::ExchangeOfferRemove => 2,
            Self::AddressAlias
            | Self::MosaicAlias
            | Self::LockFunds
            | Self::AccountPropertiesAddress
            | Self::AccountPropertiesMosaic
            | Self::AccountPropertiesEntityType
            | Self::SecretLock
            | Self::SecretProof
            | Self::ModifyAddressMetadata
            | Self::ModifyMosaicMetadata
            | Self::ModifyNamespaceMetadata
            | Self::AccountMetadata
            | Self::MosaicMetadata
            | Self::NamespaceMetadata
            | Self::ModifyMosaicLevy
            | Self::RemoveMosaicLevy
            | Self::BlockchainConfig
            | Self::BlockchainUpgrade
            | Self::DrivePrepare => 1,
        }
    }

    pub fn is_aggregate(self) -> bool {
        matches!(self, Self::AggregateComplete | Self::AggregateBonded)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(0x{:04X})", self, self.code())
    }
}

// ---------------------------------------------------------------------------
// Body enumerations
// ---------------------------------------------------------------------------

/// Direction of a supply change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MosaicSupplyType {
    Decrease,
    Increase,
}

impl MosaicSupplyType {
    pub fn code(self) -> u8 {
        match self {
            Self::Decrease => 0,
            Self::Increase => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Decrease),
            1 => Some(Self::Increase),
            _ => None,
        }
    }
}

/// A root namespace carries a duration; a sub-namespace carries its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamespaceType {
    Root,
    Sub,
}

impl NamespaceType {
    pub fn code(self) -> u8 {
        match self {
            Self::Root => 0,
            Self::Sub => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Root),
            1 => Some(Self::Sub),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AliasAction {
    Link,
    Unlink,
}

impl AliasAction {
    pub fn code(self) -> u8 {
        match self {
            Self::Link => 0,
            Self::Unlink => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Link),
            1 => Some(Self::Unlink),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultisigModificationType {
    Add,
    Remove,
}

impl MultisigModificationType {
    pub fn code(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Remove => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Add),
            1 => Some(Self::Remove),
            _ => None,
        }
    }
}

/// Add or remove one entry of an account property list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyModificationType {
    Add,
    Remove,
}

impl PropertyModificationType {
    pub fn code(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Remove => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Add),
            1 => Some(Self::Remove),
            _ => None,
        }
    }
}

/// What an account property list filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyTarget {
    Address,
    Mosaic,
    EntityType,
}

/// An allow or block list over addresses, mosaics or transaction types.
/// The high bit of the code marks a block list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountPropertyType {
    AllowAddress,
    AllowMosaic,
    AllowTransaction,
    BlockAddress,
    BlockMosaic,
    BlockTransaction,
}

impl AccountPropertyType {
    pub fn code(self) -> u8 {
        match self {
            Self::AllowAddress => 0x01,
            Self::AllowMosaic => 0x02,
            Self::AllowTransaction => 0x04,
            Self::BlockAddress => 0x81,
            Self::BlockMosaic => 0x82,
            Self::BlockTransaction => 0x84,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::AllowAddress),
            0x02 => Some(Self::AllowMosaic),
            0x04 => Some(Self::AllowTransaction),
            0x81 => Some(Self::BlockAddress),
            0x82 => Some(Self::BlockMosaic),
            0x84 => Some(Self::BlockTransaction),
            _ => None,
        }
    }

    pub fn target(self) -> PropertyTarget {
        match self {
            Self::AllowAddress | Self::BlockAddress => PropertyTarget::Address,
            Self::AllowMosaic | Self::BlockMosaic => PropertyTarget::Mosaic,
            Self::AllowTransaction | Self::BlockTransaction => PropertyTarget::EntityType,
        }
    }

    pub fn is_block(self) -> bool {
        self.code() & 0x80 != 0
    }
}

/// The entity a metadata modification is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataType {
    Address,
    Mosaic,
    Namespace,
}

impl MetadataType {
    pub fn code(self) -> u8 {
        match self {
            Self::Address => 1,
            Self::Mosaic => 2,
            Self::Namespace => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Address),
            2 => Some(Self::Mosaic),
            3 => Some(Self::Namespace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataModificationType {
    Add,
    Remove,
}

impl MetadataModificationType {
    pub fn code(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Remove => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Add),
            1 => Some(Self::Remove),
            _ => None,
        }
    }
}

/// Link or unlink a remote (delegated harvesting) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountLinkAction {
    Link,
    Unlink,
}

impl AccountLinkAction {
    pub fn code(self) -> u8 {
        match self {
            Self::Link => 0,
            Self::Unlink => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Link),
            1 => Some(Self::Unlink),
            _ => None,
        }
    }
}

/// How a mosaic levy fee is computed from a transferred amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MosaicLevyType {
    /// A fixed amount of the levy mosaic per transfer.
    Absolute,
    /// A share of the transferred amount, in units of
    /// 1/[`MOSAIC_LEVY_PERCENT`](crate::config::MOSAIC_LEVY_PERCENT) percent.
    Percentile,
}

impl MosaicLevyType {
    pub fn code(self) -> u8 {
        match self {
            Self::Absolute => 1,
            Self::Percentile => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Absolute),
            2 => Some(Self::Percentile),
            _ => None,
        }
    }
}

/// Side of an exchange offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExchangeOfferType {
    Sell,
    Buy,
}

impl ExchangeOfferType {
    pub fn code(self) -> u8 {
        match self {
            Self::Sell => 0,
            Self::Buy => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Sell),
            1 => Some(Self::Buy),
            _ => None,
        }
    }

    /// The side a counterparty takes against this offer.
    pub fn opposite(self) -> Self {
        match self {
            Self::Sell => Self::Buy,
            Self::Buy => Self::Sell,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes_are_unique_and_roundtrip() {
        let mut codes: Vec<u16> = TransactionType::ALL.iter().map(|t| t.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), TransactionType::ALL.len());

        for ty in TransactionType::ALL {
            assert_eq!(TransactionType::from_code(ty.code()), Some(ty));
        }
        assert_eq!(TransactionType::from_code(0xFFFF), None);
    }

    #[test]
    fn test_known_codes_and_versions() {
        assert_eq!(TransactionType::Transfer.code(), 0x4154);
        assert_eq!(TransactionType::Transfer.default_version(), 3);
        assert_eq!(TransactionType::AggregateBonded.code(), 0x4241);
        assert_eq!(TransactionType::MosaicSupplyChange.default_version(), 2);
        assert_eq!(TransactionType::SecretProof.default_version(), 1);
        assert!(TransactionType::AggregateComplete.is_aggregate());
        assert!(!TransactionType::LockFunds.is_aggregate());
        assert_eq!(TransactionType::ExchangeOfferAdd.code(), 0x415D);
        assert_eq!(TransactionType::ExchangeOfferAdd.default_version(), 4);
        assert_eq!(TransactionType::ExchangeOfferRemove.default_version(), 2);
        assert_eq!(TransactionType::ModifyContract.default_version(), 3);
        assert_eq!(TransactionType::MosaicMetadata.code(), 0x423F);
        assert_eq!(TransactionType::RemoveMosaicLevy.code(), 0x444D);
    }

    #[test]
    fn test_display_includes_code() {
        assert_eq!(TransactionType::Transfer.to_string(), "Transfer(0x4154)");
    }

    #[test]
    fn test_property_types() {
        assert!(AccountPropertyType::BlockMosaic.is_block());
        assert!(!AccountPropertyType::AllowMosaic.is_block());
        assert_eq!(
            AccountPropertyType::BlockTransaction.target(),
            PropertyTarget::EntityType
        );
        assert_eq!(AccountPropertyType::from_code(0x05), None);
    }

    #[test]
    fn test_levy_and_offer_codes() {
        assert_eq!(MosaicLevyType::from_code(2), Some(MosaicLevyType::Percentile));
        assert_eq!(MosaicLevyType::from_code(0), None);
        assert_eq!(ExchangeOfferType::Buy.code(), 1);
        assert_eq!(ExchangeOfferType::Sell.opposite(), ExchangeOfferType::Buy);
    }
}
