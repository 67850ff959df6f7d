//! # Transaction Module
//!
//! Construction, encoding, signing and cosigning of Sirius transactions.
//! Every operation a client can announce (transfers, namespace and mosaic
//! management, multisig changes, locks, metadata, levies, exchange offers,
//! contracts, network upgrades, drives, aggregates) is one
//! variant of [`TransactionBody`] inside a [`Transaction`].
//!
//! ## Architecture
//!
//! ```text
//! types.rs      - type codes, default versions and the small wire enums
//! model.rs      - Transaction, EmbeddedTransaction and per-kind bodies
//! schemas.rs    - the binary layout of every kind
//! codec.rs      - model <-> bytes through the schema encoder
//! fee.rs        - default max-fee strategies
//! builder.rs    - per-kind validating builders and their factory
//! signing.rs    - signing hash, transaction hash, SignedTransaction
//! aggregate.rs  - cosignatures and their assembly onto an aggregate
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: a [`TransactionBuilderFactory`] hands out a builder bound
//!    to a network context; `build()` validates and freezes the model.
//! 2. **Sign**: [`sign`] serializes the model and signs it, returning a new
//!    [`SignedTransaction`]. The model is never mutated.
//! 3. **Cosign** (aggregates): each cosigner calls [`cosign`] on the
//!    aggregate hash; the initiator [`assemble`]s the results.
//! 4. **Announce**: the payload hex goes to a node. Transport is the
//!    caller's business.

pub mod aggregate;
pub mod builder;
pub mod codec;
pub mod fee;
pub mod model;
pub mod schemas;
pub mod signing;
pub mod types;

pub use aggregate::{assemble, cosign, sign_with_cosigners, CosignatureSignedTransaction};
pub use builder::{
    AccountLinkBuilder, AccountPropertyBuilder, AggregateBuilder, AliasBuilder,
    BlockchainConfigBuilder, BlockchainUpgradeBuilder, BuilderBase, DrivePrepareBuilder,
    ExchangeOfferAddBuilder, ExchangeOfferBuilder, ExchangeOfferRemoveBuilder, LockFundsBuilder,
    MetadataBuilder, ModifyContractBuilder, ModifyMetadataBuilder, ModifyMosaicLevyBuilder,
    ModifyMultisigAccountBuilder, MosaicDefinitionBuilder, MosaicSupplyChangeBuilder,
    RegisterNamespaceBuilder, RemoveMosaicLevyBuilder, SecretLockBuilder, SecretProofBuilder,
    TransactionBuilder, TransactionBuilderFactory, TransferBuilder,
};
pub use codec::{deserialize, deserialize_embedded, serialize, serialize_embedded};
pub use fee::FeeStrategy;
pub use model::{
    scoped_metadata_key, AddExchangeOffer, AggregateTransaction, BlockchainVersion, Cosignature,
    EmbeddedTransaction, ExchangeOffer, MetadataEntity, MetadataModification, MetadataTarget,
    MosaicLevy, PropertyModification, PropertyModifications, RemoveExchangeOffer, SignatureInfo,
    Transaction, TransactionBody,
};
pub use signing::{
    sign, signing_hash, transaction_hash, verify_signed, SignedTransaction, TransactionHash,
};
pub use types::{
    AccountLinkAction, AccountPropertyType, AliasAction, ExchangeOfferType, MosaicLevyType,
    MosaicSupplyType, TransactionType,
};
