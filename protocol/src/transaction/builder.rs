//! Transaction construction via the builder pattern.
//!
//! Every kind has its own builder. A builder is handed out by a
//! [`TransactionBuilderFactory`], which binds it to a [`NetworkContext`]:
//! network type, deadline horizon and fee strategy come from the context
//! unless the caller overrides them. Required fields are constructor
//! arguments; optional ones are fluent setters. `build()` is the single
//! validating step and yields an immutable [`Transaction`].
//!
//! The builder does not sign. That happens in [`super::signing`], which
//! keeps construction testable without key material.
//!
//! ```
//! use sirius_protocol::config::NetworkContext;
//! use sirius_protocol::crypto::KeyPair;
//! use sirius_protocol::model::{Address, Deadline, Message, Mosaic, MosaicId, NetworkType};
//! use sirius_protocol::transaction::{TransactionBuilder, TransactionBuilderFactory};
//!
//! let factory = TransactionBuilderFactory::new(NetworkContext::new(NetworkType::MijinTest));
//! let recipient = Address::from_public_key(&KeyPair::generate().public_key(), NetworkType::MijinTest);
//! let tx = factory
//!     .transfer(recipient.into())
//!     .mosaic(Mosaic::new(MosaicId::new(0x0DC6_7FBE_1CAD_29E3), 10))
//!     .message(Message::plain("hello"))
//!     .deadline(Deadline::from_network_millis(1))
//!     .build()
//!     .unwrap();
//! assert!(tx.max_fee.is_zero());
//! ```

use std::collections::HashSet;
use tracing::debug;

use super::model::{
    AccountLinkTransaction, AccountPropertyTransaction, AddExchangeOffer, AggregateTransaction,
    AliasTarget, AliasTransaction, BlockchainConfigTransaction, BlockchainUpgradeTransaction,
    BlockchainVersion, CosignatoryModification, DrivePrepareTransaction, EmbeddedTransaction,
    ExchangeOffer, ExchangeOfferAddTransaction, ExchangeOfferRemoveTransaction,
    ExchangeOfferTransaction, LockFundsTransaction, MetadataEntity, MetadataModification,
    MetadataTarget, MetadataTransaction, ModifyContractTransaction, ModifyMetadataTransaction,
    ModifyMosaicLevyTransaction, ModifyMultisigAccountTransaction, MosaicDefinitionTransaction,
    MosaicLevy, MosaicSupplyChangeTransaction, NamespaceRegistration, PropertyModifications,
    RegisterNamespaceTransaction, RemoveExchangeOffer, RemoveMosaicLevyTransaction,
    SecretLockTransaction, SecretProofTransaction, Transaction, TransactionBody,
    TransferTransaction,
};
use super::signing::{SignedTransaction, TransactionHash};
use super::types::{
    AccountLinkAction, AccountPropertyType, AliasAction, ExchangeOfferType, MetadataModificationType,
    MosaicLevyType, MosaicSupplyType, MultisigModificationType, TransactionType,
};
use crate::config::{
    NetworkContext, MAX_CONTRACT_MODIFICATIONS, MAX_EXCHANGE_OFFERS, MAX_MESSAGE_SIZE,
    MAX_METADATA_KEY_SIZE, MAX_METADATA_VALUE_SIZE, MAX_MOSAIC_DIVISIBILITY,
    MAX_MULTISIG_MODIFICATIONS, MAX_PROPERTY_MODIFICATIONS, MAX_TRANSFER_MOSAICS,
    MOSAIC_LEVY_PERCENT,
};
use crate::crypto::{HashType, PublicKey};
use crate::error::{IdentifierCollisionError, ValidationError};
use crate::model::id_generator::{derive_mosaic_id, validate_namespace_part};
use crate::model::{
    Address, Deadline, Message, Mosaic, MosaicId, MosaicNonce, MosaicProperties, NamespaceId,
    NetworkType, Recipient, UInt64,
};

// ---------------------------------------------------------------------------
// Common fields
// ---------------------------------------------------------------------------

/// Envelope settings shared by every builder. Unset values fall back to
/// the bound [`NetworkContext`] when the transaction is built.
#[derive(Debug, Clone)]
pub struct BuilderBase {
    context: NetworkContext,
    network_type: Option<NetworkType>,
    version: Option<u8>,
    max_fee: Option<UInt64>,
    deadline: Option<Deadline>,
}

impl BuilderBase {
    pub fn new(context: NetworkContext) -> Self {
        Self {
            context,
            network_type: None,
            version: None,
            max_fee: None,
            deadline: None,
        }
    }

    fn network_type_or_default(&self) -> NetworkType {
        self.network_type.unwrap_or(self.context.network_type)
    }

    /// Resolves the envelope defaults around `body`.
    ///
    /// The default max fee is computed last, from the size of the fully
    /// resolved transaction.
    fn finish(self, body: TransactionBody) -> Result<Transaction, ValidationError> {
        let transaction_type = body.transaction_type();
        let network_type = self.network_type_or_default();
        if let TransactionBody::Aggregate(aggregate) = &body {
            check_inner_networks(aggregate, network_type)?;
        }
        let deadline = match self.deadline {
            Some(deadline) => deadline,
            None => Deadline::after(self.context.deadline_horizon)?,
        };

        let mut tx = Transaction {
            network_type,
            version: self
                .version
                .unwrap_or_else(|| transaction_type.default_version()),
            max_fee: UInt64::ZERO,
            deadline,
            signature: None,
            body,
        };
        tx.max_fee = match self.max_fee {
            Some(max_fee) => max_fee,
            None => {
                let size = tx.size().map_err(|e| {
                    ValidationError::invalid("max_fee", format!("cannot size transaction: {e}"))
                })?;
                self.context.fee_strategy.calculate(transaction_type, size)?
            }
        };

        debug!(
            transaction_type = %transaction_type,
            network = ?network_type,
            max_fee = tx.max_fee.value(),
            deadline = tx.deadline.network_millis().value(),
            "built transaction"
        );
        Ok(tx)
    }

    fn finish_embedded(self, body: TransactionBody) -> Result<EmbeddedTransaction, ValidationError> {
        let transaction_type = body.transaction_type();
        if transaction_type.is_aggregate() {
            return Err(ValidationError::invalid(
                "transactions",
                "an aggregate cannot be embedded in another aggregate",
            ));
        }
        debug!(transaction_type = %transaction_type, "built embedded transaction");
        Ok(EmbeddedTransaction {
            network_type: self.network_type_or_default(),
            version: self
                .version
                .unwrap_or_else(|| transaction_type.default_version()),
            body,
        })
    }
}

fn check_inner_networks(
    aggregate: &AggregateTransaction,
    network_type: NetworkType,
) -> Result<(), ValidationError> {
    match aggregate
        .inner
        .iter()
        .find(|inner| inner.network_type != network_type)
    {
        Some(inner) => Err(ValidationError::invalid(
            "transactions",
            format!(
                "inner {} is for {:?}, aggregate is for {:?}",
                inner.transaction_type(),
                inner.network_type,
                network_type
            ),
        )),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Behaviour shared by every per-kind builder.
pub trait TransactionBuilder: Sized {
    /// The envelope settings of this builder.
    fn base_mut(&mut self) -> &mut BuilderBase;

    /// Validates the kind-specific fields and produces the body.
    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError>;

    fn network_type(mut self, network_type: NetworkType) -> Self {
        self.base_mut().network_type = Some(network_type);
        self
    }

    fn version(mut self, version: u8) -> Self {
        self.base_mut().version = Some(version);
        self
    }

    /// Overrides the fee strategy with an explicit maximum fee.
    fn max_fee(mut self, max_fee: u64) -> Self {
        self.base_mut().max_fee = Some(UInt64::new(max_fee));
        self
    }

    fn deadline(mut self, deadline: Deadline) -> Self {
        self.base_mut().deadline = Some(deadline);
        self
    }

    /// Validates and freezes the transaction.
    fn build(self) -> Result<Transaction, ValidationError> {
        let (base, body) = self.into_body()?;
        base.finish(body)
    }

    /// Validates and produces a transaction to place inside an aggregate.
    /// Fee and deadline settings are ignored: embedded transactions carry
    /// neither.
    fn build_embedded(self) -> Result<EmbeddedTransaction, ValidationError> {
        let (base, body) = self.into_body()?;
        base.finish_embedded(body)
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Hands out builders bound to one network context.
#[derive(Debug, Clone)]
pub struct TransactionBuilderFactory {
    context: NetworkContext,
}

impl TransactionBuilderFactory {
    pub fn new(context: NetworkContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &NetworkContext {
        &self.context
    }

    fn base(&self) -> BuilderBase {
        BuilderBase::new(self.context.clone())
    }

    pub fn transfer(&self, recipient: Recipient) -> TransferBuilder {
        TransferBuilder {
            base: self.base(),
            recipient,
            mosaics: Vec::new(),
            message: Message::empty(),
        }
    }

    /// A mosaic definition for an id the caller already holds. `mosaic_id`
    /// must be the id `owner` derives from `nonce`; `build()` re-derives it
    /// and rejects a mismatch.
    pub fn mosaic_definition(
        &self,
        owner: PublicKey,
        nonce: MosaicNonce,
        mosaic_id: MosaicId,
        properties: MosaicProperties,
    ) -> MosaicDefinitionBuilder {
        MosaicDefinitionBuilder {
            base: self.base(),
            owner,
            nonce,
            mosaic_id,
            properties,
        }
    }

    /// A mosaic definition whose id is derived from `owner` and `nonce`.
    /// The nonce is stepped past reserved ids.
    pub fn derived_mosaic_definition(
        &self,
        owner: &PublicKey,
        nonce: MosaicNonce,
        properties: MosaicProperties,
    ) -> Result<MosaicDefinitionBuilder, IdentifierCollisionError> {
        let (mosaic_id, nonce) = derive_mosaic_id(owner, nonce)?;
        Ok(self.mosaic_definition(*owner, nonce, mosaic_id, properties))
    }

    pub fn modify_mosaic_levy(&self, mosaic_id: MosaicId, levy: MosaicLevy) -> ModifyMosaicLevyBuilder {
        ModifyMosaicLevyBuilder {
            base: self.base(),
            mosaic_id,
            levy,
        }
    }

    pub fn remove_mosaic_levy(&self, mosaic_id: MosaicId) -> RemoveMosaicLevyBuilder {
        RemoveMosaicLevyBuilder {
            base: self.base(),
            mosaic_id,
        }
    }

    pub fn mosaic_supply_change(
        &self,
        mosaic_id: MosaicId,
        supply_type: MosaicSupplyType,
        delta: u64,
    ) -> MosaicSupplyChangeBuilder {
        MosaicSupplyChangeBuilder {
            base: self.base(),
            mosaic_id,
            supply_type,
            delta: UInt64::new(delta),
        }
    }

    /// Rents the root namespace `name` for `duration` blocks.
    pub fn register_root_namespace(
        &self,
        name: impl Into<String>,
        duration: u64,
    ) -> RegisterNamespaceBuilder {
        RegisterNamespaceBuilder {
            base: self.base(),
            name: name.into(),
            registration: NamespaceRegistration::Root {
                duration: UInt64::new(duration),
            },
        }
    }

    pub fn register_sub_namespace(
        &self,
        name: impl Into<String>,
        parent_id: NamespaceId,
    ) -> RegisterNamespaceBuilder {
        RegisterNamespaceBuilder {
            base: self.base(),
            name: name.into(),
            registration: NamespaceRegistration::Sub { parent_id },
        }
    }

    pub fn address_alias(
        &self,
        action: AliasAction,
        namespace_id: NamespaceId,
        address: Address,
    ) -> AliasBuilder {
        AliasBuilder {
            base: self.base(),
            action,
            namespace_id,
            target: AliasTarget::Address(address),
        }
    }

    pub fn mosaic_alias(
        &self,
        action: AliasAction,
        namespace_id: NamespaceId,
        mosaic_id: MosaicId,
    ) -> AliasBuilder {
        AliasBuilder {
            base: self.base(),
            action,
            namespace_id,
            target: AliasTarget::Mosaic(mosaic_id),
        }
    }

    pub fn account_properties(
        &self,
        property_type: AccountPropertyType,
        modifications: PropertyModifications,
    ) -> AccountPropertyBuilder {
        AccountPropertyBuilder {
            base: self.base(),
            property_type,
            modifications,
        }
    }

    pub fn modify_multisig_account(&self) -> ModifyMultisigAccountBuilder {
        ModifyMultisigAccountBuilder {
            base: self.base(),
            min_approval_delta: 0,
            min_removal_delta: 0,
            modifications: Vec::new(),
        }
    }

    /// Locks `mosaic` for `duration` blocks as the deposit for a bonded
    /// aggregate. Set the aggregate with
    /// [`LockFundsBuilder::signed_transaction`] or [`LockFundsBuilder::hash`].
    pub fn lock_funds(&self, mosaic: Mosaic, duration: u64) -> LockFundsBuilder {
        LockFundsBuilder {
            base: self.base(),
            mosaic,
            duration: UInt64::new(duration),
            hash: None,
        }
    }

    pub fn secret_lock(
        &self,
        mosaic: Mosaic,
        duration: u64,
        hash_type: HashType,
        secret: [u8; 32],
        recipient: Recipient,
    ) -> SecretLockBuilder {
        SecretLockBuilder {
            base: self.base(),
            mosaic,
            duration: UInt64::new(duration),
            hash_type,
            secret,
            recipient,
        }
    }

    pub fn secret_proof(
        &self,
        hash_type: HashType,
        secret: [u8; 32],
        recipient: Recipient,
        proof: Vec<u8>,
    ) -> SecretProofBuilder {
        SecretProofBuilder {
            base: self.base(),
            hash_type,
            secret,
            recipient,
            proof,
        }
    }

    pub fn modify_metadata(&self, target: MetadataTarget) -> ModifyMetadataBuilder {
        ModifyMetadataBuilder {
            base: self.base(),
            target,
            modifications: Vec::new(),
        }
    }

    /// Metadata stored on the account of `target_key`.
    pub fn account_metadata(&self, target_key: PublicKey, scoped_metadata_key: u64) -> MetadataBuilder {
        self.metadata(target_key, MetadataEntity::Account, scoped_metadata_key)
    }

    /// Metadata stored on a mosaic; `target_key` is the mosaic owner.
    pub fn mosaic_metadata(
        &self,
        target_key: PublicKey,
        mosaic_id: MosaicId,
        scoped_metadata_key: u64,
    ) -> MetadataBuilder {
        self.metadata(target_key, MetadataEntity::Mosaic(mosaic_id), scoped_metadata_key)
    }

    /// Metadata stored on a namespace; `target_key` is the namespace owner.
    pub fn namespace_metadata(
        &self,
        target_key: PublicKey,
        namespace_id: NamespaceId,
        scoped_metadata_key: u64,
    ) -> MetadataBuilder {
        self.metadata(
            target_key,
            MetadataEntity::Namespace(namespace_id),
            scoped_metadata_key,
        )
    }

    fn metadata(&self, target_key: PublicKey, target: MetadataEntity, scoped_metadata_key: u64) -> MetadataBuilder {
        MetadataBuilder {
            base: self.base(),
            target_key,
            target,
            scoped_metadata_key,
            value: Vec::new(),
            old_value: Vec::new(),
        }
    }

    pub fn exchange_offer_add(&self) -> ExchangeOfferAddBuilder {
        ExchangeOfferAddBuilder {
            base: self.base(),
            offers: Vec::new(),
        }
    }

    pub fn exchange_offer(&self) -> ExchangeOfferBuilder {
        ExchangeOfferBuilder {
            base: self.base(),
            offers: Vec::new(),
        }
    }

    pub fn exchange_offer_remove(&self) -> ExchangeOfferRemoveBuilder {
        ExchangeOfferRemoveBuilder {
            base: self.base(),
            offers: Vec::new(),
        }
    }

    pub fn modify_contract(&self, content_hash: [u8; 32]) -> ModifyContractBuilder {
        ModifyContractBuilder {
            base: self.base(),
            duration_delta: 0,
            content_hash,
            customers: Vec::new(),
            executors: Vec::new(),
            verifiers: Vec::new(),
        }
    }

    /// Network configuration applied `apply_height_delta` blocks after
    /// inclusion.
    pub fn blockchain_config(
        &self,
        apply_height_delta: u64,
        config: impl Into<String>,
        supported_entity_versions: impl Into<String>,
    ) -> BlockchainConfigBuilder {
        BlockchainConfigBuilder {
            base: self.base(),
            apply_height_delta: UInt64::new(apply_height_delta),
            config: config.into(),
            supported_entity_versions: supported_entity_versions.into(),
        }
    }

    pub fn blockchain_upgrade(
        &self,
        upgrade_period: u64,
        new_version: BlockchainVersion,
    ) -> BlockchainUpgradeBuilder {
        BlockchainUpgradeBuilder {
            base: self.base(),
            upgrade_period: UInt64::new(upgrade_period),
            new_version,
        }
    }

    /// A drive of `drive_size` bytes held for `duration` blocks. Billing
    /// defaults to one free period over the whole duration with a single
    /// replica.
    pub fn drive_prepare(&self, owner: PublicKey, drive_size: u64, duration: u64) -> DrivePrepareBuilder {
        DrivePrepareBuilder {
            base: self.base(),
            owner,
            drive_size: UInt64::new(drive_size),
            duration: UInt64::new(duration),
            billing_period: UInt64::new(duration),
            billing_price: UInt64::ZERO,
            replicas: 1,
            min_replicators: 1,
            percent_approvers: 100,
        }
    }

    pub fn account_link(
        &self,
        remote_public_key: PublicKey,
        action: AccountLinkAction,
    ) -> AccountLinkBuilder {
        AccountLinkBuilder {
            base: self.base(),
            remote_public_key,
            action,
        }
    }

    pub fn aggregate_complete(&self) -> AggregateBuilder {
        AggregateBuilder {
            base: self.base(),
            bonded: false,
            inner: Vec::new(),
        }
    }

    pub fn aggregate_bonded(&self) -> AggregateBuilder {
        AggregateBuilder {
            base: self.base(),
            bonded: true,
            inner: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TransferBuilder {
    base: BuilderBase,
    recipient: Recipient,
    mosaics: Vec<Mosaic>,
    message: Message,
}

impl TransferBuilder {
    pub fn mosaic(mut self, mosaic: Mosaic) -> Self {
        self.mosaics.push(mosaic);
        self
    }

    pub fn mosaics(mut self, mosaics: impl IntoIterator<Item = Mosaic>) -> Self {
        self.mosaics.extend(mosaics);
        self
    }

    pub fn message(mut self, message: Message) -> Self {
        self.message = message;
        self
    }
}

impl TransactionBuilder for TransferBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.mosaics.len() > MAX_TRANSFER_MOSAICS {
            return Err(ValidationError::invalid(
                "mosaics",
                format!("at most {MAX_TRANSFER_MOSAICS} mosaics per transfer"),
            ));
        }
        let mut seen = HashSet::with_capacity(self.mosaics.len());
        if let Some(duplicate) = self.mosaics.iter().find(|m| !seen.insert(m.id)) {
            return Err(ValidationError::invalid(
                "mosaics",
                format!("mosaic {} appears more than once", duplicate.id),
            ));
        }
        if self.message.payload().len() > MAX_MESSAGE_SIZE {
            return Err(ValidationError::invalid(
                "message",
                format!("payload exceeds {MAX_MESSAGE_SIZE} bytes"),
            ));
        }
        Ok((
            self.base,
            TransactionBody::Transfer(TransferTransaction {
                recipient: self.recipient,
                mosaics: self.mosaics,
                message: self.message,
            }),
        ))
    }
}

// ---------------------------------------------------------------------------
// Mosaics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MosaicDefinitionBuilder {
    base: BuilderBase,
    owner: PublicKey,
    nonce: MosaicNonce,
    mosaic_id: MosaicId,
    properties: MosaicProperties,
}

impl TransactionBuilder for MosaicDefinitionBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.properties.divisibility > MAX_MOSAIC_DIVISIBILITY {
            return Err(ValidationError::invalid(
                "divisibility",
                format!(
                    "{} exceeds the maximum of {MAX_MOSAIC_DIVISIBILITY}",
                    self.properties.divisibility
                ),
            ));
        }
        if self.properties.duration == Some(0) {
            return Err(ValidationError::invalid(
                "duration",
                "must be positive when present",
            ));
        }
        let (derived_id, derived_nonce) = derive_mosaic_id(&self.owner, self.nonce)
            .map_err(|e| ValidationError::invalid("nonce", e.to_string()))?;
        if derived_id != self.mosaic_id {
            return Err(ValidationError::invalid(
                "mosaic_id",
                format!(
                    "{} is not the id nonce {} derives for the owner (expected {derived_id})",
                    self.mosaic_id,
                    self.nonce.value()
                ),
            ));
        }
        if derived_nonce != self.nonce {
            return Err(ValidationError::invalid(
                "nonce",
                format!(
                    "{} maps to a reserved id, use {}",
                    self.nonce.value(),
                    derived_nonce.value()
                ),
            ));
        }
        Ok((
            self.base,
            TransactionBody::MosaicDefinition(MosaicDefinitionTransaction {
                nonce: self.nonce,
                mosaic_id: self.mosaic_id,
                properties: self.properties,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct MosaicSupplyChangeBuilder {
    base: BuilderBase,
    mosaic_id: MosaicId,
    supply_type: MosaicSupplyType,
    delta: UInt64,
}

impl TransactionBuilder for MosaicSupplyChangeBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.delta.is_zero() {
            return Err(ValidationError::invalid("delta", "must be positive"));
        }
        Ok((
            self.base,
            TransactionBody::MosaicSupplyChange(MosaicSupplyChangeTransaction {
                mosaic_id: self.mosaic_id,
                supply_type: self.supply_type,
                delta: self.delta,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ModifyMosaicLevyBuilder {
    base: BuilderBase,
    mosaic_id: MosaicId,
    levy: MosaicLevy,
}

impl TransactionBuilder for ModifyMosaicLevyBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.levy.fee.is_zero() {
            return Err(ValidationError::invalid("fee", "must be positive"));
        }
        let max_percentile = 100 * MOSAIC_LEVY_PERCENT;
        if self.levy.levy_type == MosaicLevyType::Percentile && self.levy.fee.value() > max_percentile {
            return Err(ValidationError::invalid(
                "fee",
                format!("{} exceeds 100% ({max_percentile})", self.levy.fee.value()),
            ));
        }
        Ok((
            self.base,
            TransactionBody::ModifyMosaicLevy(ModifyMosaicLevyTransaction {
                mosaic_id: self.mosaic_id,
                levy: self.levy,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct RemoveMosaicLevyBuilder {
    base: BuilderBase,
    mosaic_id: MosaicId,
}

impl TransactionBuilder for RemoveMosaicLevyBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        Ok((
            self.base,
            TransactionBody::RemoveMosaicLevy(RemoveMosaicLevyTransaction {
                mosaic_id: self.mosaic_id,
            }),
        ))
    }
}

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RegisterNamespaceBuilder {
    base: BuilderBase,
    name: String,
    registration: NamespaceRegistration,
}

impl TransactionBuilder for RegisterNamespaceBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        validate_namespace_part(&self.name)?;
        let parent = match self.registration {
            NamespaceRegistration::Root { duration } => {
                if duration.is_zero() {
                    return Err(ValidationError::invalid("duration", "must be positive"));
                }
                NamespaceId::ROOT
            }
            NamespaceRegistration::Sub { parent_id } => parent_id,
        };
        let namespace_id = NamespaceId::from_parent(parent, &self.name)?;
        Ok((
            self.base,
            TransactionBody::RegisterNamespace(RegisterNamespaceTransaction {
                name: self.name,
                namespace_id,
                registration: self.registration,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct AliasBuilder {
    base: BuilderBase,
    action: AliasAction,
    namespace_id: NamespaceId,
    target: AliasTarget,
}

impl TransactionBuilder for AliasBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if !self.namespace_id.is_namespace() {
            return Err(ValidationError::invalid(
                "namespace_id",
                format!("{} is not a namespace id", self.namespace_id),
            ));
        }
        Ok((
            self.base,
            TransactionBody::Alias(AliasTransaction {
                action: self.action,
                namespace_id: self.namespace_id,
                target: self.target,
            }),
        ))
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AccountPropertyBuilder {
    base: BuilderBase,
    property_type: AccountPropertyType,
    modifications: PropertyModifications,
}

impl TransactionBuilder for AccountPropertyBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.property_type.target() != self.modifications.target() {
            return Err(ValidationError::invalid(
                "property_type",
                format!(
                    "{:?} does not apply to {:?} modifications",
                    self.property_type,
                    self.modifications.target()
                ),
            ));
        }
        let count = self.modifications.len();
        if count == 0 || count > MAX_PROPERTY_MODIFICATIONS {
            return Err(ValidationError::invalid(
                "modifications",
                format!("expected 1 to {MAX_PROPERTY_MODIFICATIONS}, got {count}"),
            ));
        }
        Ok((
            self.base,
            TransactionBody::AccountProperty(AccountPropertyTransaction {
                property_type: self.property_type,
                modifications: self.modifications,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ModifyMultisigAccountBuilder {
    base: BuilderBase,
    min_approval_delta: i32,
    min_removal_delta: i32,
    modifications: Vec<CosignatoryModification>,
}

impl ModifyMultisigAccountBuilder {
    pub fn min_approval_delta(mut self, delta: i32) -> Self {
        self.min_approval_delta = delta;
        self
    }

    pub fn min_removal_delta(mut self, delta: i32) -> Self {
        self.min_removal_delta = delta;
        self
    }

    pub fn add_cosignatory(mut self, cosignatory: PublicKey) -> Self {
        self.modifications.push(CosignatoryModification {
            modification_type: MultisigModificationType::Add,
            cosignatory,
        });
        self
    }

    pub fn remove_cosignatory(mut self, cosignatory: PublicKey) -> Self {
        self.modifications.push(CosignatoryModification {
            modification_type: MultisigModificationType::Remove,
            cosignatory,
        });
        self
    }
}

impl TransactionBuilder for ModifyMultisigAccountBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        let min_approval_delta = i8::try_from(self.min_approval_delta).map_err(|_| {
            ValidationError::invalid(
                "min_approval_delta",
                format!("{} does not fit in i8", self.min_approval_delta),
            )
        })?;
        let min_removal_delta = i8::try_from(self.min_removal_delta).map_err(|_| {
            ValidationError::invalid(
                "min_removal_delta",
                format!("{} does not fit in i8", self.min_removal_delta),
            )
        })?;
        if self.modifications.len() > MAX_MULTISIG_MODIFICATIONS {
            return Err(ValidationError::invalid(
                "modifications",
                format!("at most {MAX_MULTISIG_MODIFICATIONS} cosignatory changes"),
            ));
        }
        let mut seen = HashSet::with_capacity(self.modifications.len());
        if let Some(duplicate) = self
            .modifications
            .iter()
            .find(|m| !seen.insert(m.cosignatory))
        {
            return Err(ValidationError::invalid(
                "modifications",
                format!("cosignatory {} appears more than once", duplicate.cosignatory.to_hex()),
            ));
        }
        if self.modifications.is_empty() && min_approval_delta == 0 && min_removal_delta == 0 {
            return Err(ValidationError::invalid(
                "modifications",
                "the transaction changes nothing",
            ));
        }
        Ok((
            self.base,
            TransactionBody::ModifyMultisigAccount(ModifyMultisigAccountTransaction {
                min_approval_delta,
                min_removal_delta,
                modifications: self.modifications,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct AccountLinkBuilder {
    base: BuilderBase,
    remote_public_key: PublicKey,
    action: AccountLinkAction,
}

impl TransactionBuilder for AccountLinkBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        Ok((
            self.base,
            TransactionBody::AccountLink(AccountLinkTransaction {
                remote_public_key: self.remote_public_key,
                action: self.action,
            }),
        ))
    }
}

// ---------------------------------------------------------------------------
// Locks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LockFundsBuilder {
    base: BuilderBase,
    mosaic: Mosaic,
    duration: UInt64,
    hash: Option<Result<[u8; 32], TransactionType>>,
}

impl LockFundsBuilder {
    /// Locks funds for `signed`, which must be an aggregate-bonded
    /// transaction. Checked at build time.
    pub fn signed_transaction(mut self, signed: &SignedTransaction) -> Self {
        self.hash = Some(match signed.transaction_type() {
            TransactionType::AggregateBonded => Ok(*signed.hash().as_bytes()),
            other => Err(other),
        });
        self
    }

    /// Locks funds for an aggregate known only by its hash.
    pub fn hash(mut self, hash: TransactionHash) -> Self {
        self.hash = Some(Ok(*hash.as_bytes()));
        self
    }
}

impl TransactionBuilder for LockFundsBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        let hash = match self.hash {
            None => return Err(ValidationError::missing("hash")),
            Some(Err(other)) => {
                return Err(ValidationError::invalid(
                    "hash",
                    format!("{other} is not an aggregate bonded transaction"),
                ))
            }
            Some(Ok(hash)) => hash,
        };
        Ok((
            self.base,
            TransactionBody::LockFunds(LockFundsTransaction {
                mosaic: self.mosaic,
                duration: self.duration,
                hash,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct SecretLockBuilder {
    base: BuilderBase,
    mosaic: Mosaic,
    duration: UInt64,
    hash_type: HashType,
    secret: [u8; 32],
    recipient: Recipient,
}

impl TransactionBuilder for SecretLockBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        Ok((
            self.base,
            TransactionBody::SecretLock(SecretLockTransaction {
                mosaic: self.mosaic,
                duration: self.duration,
                hash_type: self.hash_type,
                secret: self.secret,
                recipient: self.recipient,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct SecretProofBuilder {
    base: BuilderBase,
    hash_type: HashType,
    secret: [u8; 32],
    recipient: Recipient,
    proof: Vec<u8>,
}

impl TransactionBuilder for SecretProofBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.proof.is_empty() {
            return Err(ValidationError::missing("proof"));
        }
        if self.hash_type.digest(&self.proof) != self.secret {
            return Err(ValidationError::invalid(
                "proof",
                format!("does not hash to the secret under {:?}", self.hash_type),
            ));
        }
        Ok((
            self.base,
            TransactionBody::SecretProof(SecretProofTransaction {
                hash_type: self.hash_type,
                secret: self.secret,
                recipient: self.recipient,
                proof: self.proof,
            }),
        ))
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ModifyMetadataBuilder {
    base: BuilderBase,
    target: MetadataTarget,
    modifications: Vec<MetadataModification>,
}

impl ModifyMetadataBuilder {
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.modifications.push(MetadataModification::add(key, value));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.modifications.push(MetadataModification::remove(key));
        self
    }

    pub fn modification(mut self, modification: MetadataModification) -> Self {
        self.modifications.push(modification);
        self
    }
}

impl TransactionBuilder for ModifyMetadataBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.modifications.is_empty() {
            return Err(ValidationError::missing("modifications"));
        }
        for modification in &self.modifications {
            check_metadata_modification(modification)?;
        }
        Ok((
            self.base,
            TransactionBody::ModifyMetadata(ModifyMetadataTransaction {
                target: self.target,
                modifications: self.modifications,
            }),
        ))
    }
}

fn check_metadata_modification(modification: &MetadataModification) -> Result<(), ValidationError> {
    let key_len = modification.key.len();
    if key_len == 0 || key_len > MAX_METADATA_KEY_SIZE {
        return Err(ValidationError::invalid(
            "key",
            format!("must be 1 to {MAX_METADATA_KEY_SIZE} bytes, got {key_len}"),
        ));
    }
    match modification.modification_type {
        MetadataModificationType::Add if modification.value.len() > MAX_METADATA_VALUE_SIZE => {
            Err(ValidationError::invalid(
                "value",
                format!("exceeds {MAX_METADATA_VALUE_SIZE} bytes"),
            ))
        }
        MetadataModificationType::Remove if !modification.value.is_empty() => Err(
            ValidationError::invalid("value", "a removal carries no value"),
        ),
        _ => Ok(()),
    }
}

/// Sets a key-value metadata entry. The transaction carries the XOR of
/// the new value against the current one, so the current value must be
/// supplied when one exists.
#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    base: BuilderBase,
    target_key: PublicKey,
    target: MetadataEntity,
    scoped_metadata_key: u64,
    value: Vec<u8>,
    old_value: Vec<u8>,
}

impl MetadataBuilder {
    pub fn value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = value.into();
        self
    }

    /// The value currently stored under the key.
    pub fn old_value(mut self, old_value: impl Into<Vec<u8>>) -> Self {
        self.old_value = old_value.into();
        self
    }
}

impl TransactionBuilder for MetadataBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        for (field, value) in [("value", &self.value), ("old_value", &self.old_value)] {
            if value.len() > MAX_METADATA_VALUE_SIZE {
                return Err(ValidationError::invalid(
                    field,
                    format!("exceeds {MAX_METADATA_VALUE_SIZE} bytes"),
                ));
            }
        }
        if self.value == self.old_value {
            return Err(ValidationError::invalid(
                "value",
                "equals the current value, the transaction changes nothing",
            ));
        }
        // Both lengths are bounded by MAX_METADATA_VALUE_SIZE.
        let value_size_delta = self.value.len() as i16 - self.old_value.len() as i16;
        Ok((
            self.base,
            TransactionBody::Metadata(MetadataTransaction {
                target_key: self.target_key,
                scoped_metadata_key: self.scoped_metadata_key,
                target: self.target,
                value_size_delta,
                value: xor_padded(&self.value, &self.old_value),
            }),
        ))
    }
}

/// XOR of `a` and `b`, the shorter one zero-padded to the longer.
fn xor_padded(a: &[u8], b: &[u8]) -> Vec<u8> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| a.get(i).copied().unwrap_or(0) ^ b.get(i).copied().unwrap_or(0))
        .collect()
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

fn check_offer_count(count: usize) -> Result<(), ValidationError> {
    if count == 0 {
        return Err(ValidationError::missing("offers"));
    }
    if count > MAX_EXCHANGE_OFFERS {
        return Err(ValidationError::invalid(
            "offers",
            format!("at most {MAX_EXCHANGE_OFFERS} offers per transaction"),
        ));
    }
    Ok(())
}

/// One offer per mosaic and side.
fn check_unique_offers(
    keys: impl Iterator<Item = (MosaicId, ExchangeOfferType)>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (mosaic_id, offer_type) in keys {
        if !seen.insert((mosaic_id, offer_type)) {
            return Err(ValidationError::invalid(
                "offers",
                format!("{offer_type:?} offer for mosaic {mosaic_id} appears more than once"),
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ExchangeOfferAddBuilder {
    base: BuilderBase,
    offers: Vec<AddExchangeOffer>,
}

impl ExchangeOfferAddBuilder {
    pub fn offer(mut self, offer: AddExchangeOffer) -> Self {
        self.offers.push(offer);
        self
    }
}

impl TransactionBuilder for ExchangeOfferAddBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        check_offer_count(self.offers.len())?;
        check_unique_offers(self.offers.iter().map(|o| (o.mosaic.id, o.offer_type)))?;
        for offer in &self.offers {
            if offer.mosaic.amount.is_zero() {
                return Err(ValidationError::invalid("mosaic_amount", "must be positive"));
            }
            if offer.duration.is_zero() {
                return Err(ValidationError::invalid("duration", "must be positive"));
            }
        }
        Ok((
            self.base,
            TransactionBody::ExchangeOfferAdd(ExchangeOfferAddTransaction {
                offers: self.offers,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ExchangeOfferBuilder {
    base: BuilderBase,
    offers: Vec<ExchangeOffer>,
}

impl ExchangeOfferBuilder {
    /// Accepts an offer; `offer.offer_type` is the side of the offer being
    /// accepted, not the side the signer takes.
    pub fn offer(mut self, offer: ExchangeOffer) -> Self {
        self.offers.push(offer);
        self
    }
}

impl TransactionBuilder for ExchangeOfferBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        check_offer_count(self.offers.len())?;
        if self.offers.iter().any(|o| o.mosaic.amount.is_zero()) {
            return Err(ValidationError::invalid("mosaic_amount", "must be positive"));
        }
        Ok((
            self.base,
            TransactionBody::ExchangeOffer(ExchangeOfferTransaction {
                offers: self.offers,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ExchangeOfferRemoveBuilder {
    base: BuilderBase,
    offers: Vec<RemoveExchangeOffer>,
}

impl ExchangeOfferRemoveBuilder {
    pub fn offer(mut self, offer: RemoveExchangeOffer) -> Self {
        self.offers.push(offer);
        self
    }
}

impl TransactionBuilder for ExchangeOfferRemoveBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        check_offer_count(self.offers.len())?;
        check_unique_offers(self.offers.iter().map(|o| (o.mosaic_id, o.offer_type)))?;
        Ok((
            self.base,
            TransactionBody::ExchangeOfferRemove(ExchangeOfferRemoveTransaction {
                offers: self.offers,
            }),
        ))
    }
}

// ---------------------------------------------------------------------------
// Contracts, network and storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ModifyContractBuilder {
    base: BuilderBase,
    duration_delta: i64,
    content_hash: [u8; 32],
    customers: Vec<CosignatoryModification>,
    executors: Vec<CosignatoryModification>,
    verifiers: Vec<CosignatoryModification>,
}

impl ModifyContractBuilder {
    pub fn duration_delta(mut self, delta: i64) -> Self {
        self.duration_delta = delta;
        self
    }

    pub fn customers(mut self, modifications: impl IntoIterator<Item = CosignatoryModification>) -> Self {
        self.customers.extend(modifications);
        self
    }

    pub fn executors(mut self, modifications: impl IntoIterator<Item = CosignatoryModification>) -> Self {
        self.executors.extend(modifications);
        self
    }

    pub fn verifiers(mut self, modifications: impl IntoIterator<Item = CosignatoryModification>) -> Self {
        self.verifiers.extend(modifications);
        self
    }
}

fn check_contract_list(
    field: &'static str,
    modifications: &[CosignatoryModification],
) -> Result<(), ValidationError> {
    if modifications.len() > MAX_CONTRACT_MODIFICATIONS {
        return Err(ValidationError::invalid(
            field,
            format!("at most {MAX_CONTRACT_MODIFICATIONS} changes"),
        ));
    }
    let mut seen = HashSet::with_capacity(modifications.len());
    match modifications.iter().find(|m| !seen.insert(m.cosignatory)) {
        Some(duplicate) => Err(ValidationError::invalid(
            field,
            format!("{} appears more than once", duplicate.cosignatory.to_hex()),
        )),
        None => Ok(()),
    }
}

impl TransactionBuilder for ModifyContractBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        check_contract_list("customers", &self.customers)?;
        check_contract_list("executors", &self.executors)?;
        check_contract_list("verifiers", &self.verifiers)?;
        Ok((
            self.base,
            TransactionBody::ModifyContract(ModifyContractTransaction {
                duration_delta: self.duration_delta,
                content_hash: self.content_hash,
                customers: self.customers,
                executors: self.executors,
                verifiers: self.verifiers,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct BlockchainConfigBuilder {
    base: BuilderBase,
    apply_height_delta: UInt64,
    config: String,
    supported_entity_versions: String,
}

impl TransactionBuilder for BlockchainConfigBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.config.is_empty() {
            return Err(ValidationError::missing("config"));
        }
        for (field, text) in [
            ("config", &self.config),
            ("entity_versions", &self.supported_entity_versions),
        ] {
            if text.len() > usize::from(u16::MAX) {
                return Err(ValidationError::invalid(
                    field,
                    format!("exceeds {} bytes", u16::MAX),
                ));
            }
        }
        Ok((
            self.base,
            TransactionBody::BlockchainConfig(BlockchainConfigTransaction {
                apply_height_delta: self.apply_height_delta,
                config: self.config,
                supported_entity_versions: self.supported_entity_versions,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct BlockchainUpgradeBuilder {
    base: BuilderBase,
    upgrade_period: UInt64,
    new_version: BlockchainVersion,
}

impl TransactionBuilder for BlockchainUpgradeBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.upgrade_period.is_zero() {
            return Err(ValidationError::invalid("upgrade_period", "must be positive"));
        }
        Ok((
            self.base,
            TransactionBody::BlockchainUpgrade(BlockchainUpgradeTransaction {
                upgrade_period: self.upgrade_period,
                new_version: self.new_version,
            }),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct DrivePrepareBuilder {
    base: BuilderBase,
    owner: PublicKey,
    drive_size: UInt64,
    duration: UInt64,
    billing_period: UInt64,
    billing_price: UInt64,
    replicas: u16,
    min_replicators: u16,
    percent_approvers: u8,
}

impl DrivePrepareBuilder {
    pub fn billing(mut self, period: u64, price: u64) -> Self {
        self.billing_period = UInt64::new(period);
        self.billing_price = UInt64::new(price);
        self
    }

    pub fn replicas(mut self, replicas: u16, min_replicators: u16) -> Self {
        self.replicas = replicas;
        self.min_replicators = min_replicators;
        self
    }

    pub fn percent_approvers(mut self, percent: u8) -> Self {
        self.percent_approvers = percent;
        self
    }
}

impl TransactionBuilder for DrivePrepareBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.drive_size.is_zero() {
            return Err(ValidationError::invalid("drive_size", "must be positive"));
        }
        if self.duration.is_zero() {
            return Err(ValidationError::invalid("duration", "must be positive"));
        }
        if self.billing_period.is_zero() || self.billing_period > self.duration {
            return Err(ValidationError::invalid(
                "billing_period",
                "must be positive and no longer than the duration",
            ));
        }
        if self.replicas == 0 {
            return Err(ValidationError::invalid("replicas", "must be positive"));
        }
        if self.min_replicators == 0 || self.min_replicators > self.replicas {
            return Err(ValidationError::invalid(
                "min_replicators",
                format!("must be between 1 and {} replicas", self.replicas),
            ));
        }
        if self.percent_approvers > 100 {
            return Err(ValidationError::invalid(
                "percent_approvers",
                format!("{} is not a percentage", self.percent_approvers),
            ));
        }
        Ok((
            self.base,
            TransactionBody::DrivePrepare(DrivePrepareTransaction {
                owner: self.owner,
                duration: self.duration,
                billing_period: self.billing_period,
                billing_price: self.billing_price,
                drive_size: self.drive_size,
                replicas: self.replicas,
                min_replicators: self.min_replicators,
                percent_approvers: self.percent_approvers,
            }),
        ))
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AggregateBuilder {
    base: BuilderBase,
    bonded: bool,
    inner: Vec<EmbeddedTransaction>,
}

impl AggregateBuilder {
    pub fn inner(mut self, tx: EmbeddedTransaction) -> Self {
        self.inner.push(tx);
        self
    }

    pub fn inner_transactions(mut self, txs: impl IntoIterator<Item = EmbeddedTransaction>) -> Self {
        self.inner.extend(txs);
        self
    }
}

impl TransactionBuilder for AggregateBuilder {
    fn base_mut(&mut self) -> &mut BuilderBase {
        &mut self.base
    }

    fn into_body(self) -> Result<(BuilderBase, TransactionBody), ValidationError> {
        if self.inner.is_empty() {
            return Err(ValidationError::missing("transactions"));
        }
        if let Some(nested) = self
            .inner
            .iter()
            .find(|tx| tx.transaction_type().is_aggregate())
        {
            return Err(ValidationError::invalid(
                "transactions",
                format!("{} cannot be nested", nested.transaction_type()),
            ));
        }
        Ok((
            self.base,
            TransactionBody::Aggregate(AggregateTransaction {
                bonded: self.bonded,
                inner: self.inner,
                cosignatures: Vec::new(),
            }),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::transaction::fee::FeeStrategy;
    use crate::transaction::model::{scoped_metadata_key, PropertyModification};
    use crate::transaction::signing::sign;
    use std::time::Duration;

    const DEADLINE: Deadline = Deadline::from_network_millis(86_400_000);

    fn factory() -> TransactionBuilderFactory {
        TransactionBuilderFactory::new(NetworkContext::new(NetworkType::MijinTest))
    }

    fn recipient() -> Recipient {
        Recipient::Address(Address::from_public_key(
            &KeyPair::generate().public_key(),
            NetworkType::MijinTest,
        ))
    }

    fn field_of<T: std::fmt::Debug>(result: Result<T, ValidationError>) -> &'static str {
        result.unwrap_err().field()
    }

    #[test]
    fn test_defaults_come_from_context() {
        let tx = factory()
            .transfer(recipient())
            .deadline(DEADLINE)
            .build()
            .unwrap();
        assert_eq!(tx.network_type, NetworkType::MijinTest);
        assert_eq!(tx.version, 3);
        assert_eq!(tx.version_field(), 0x9003);
        assert!(tx.max_fee.is_zero());
        assert!(!tx.is_signed());
    }

    #[test]
    fn test_overrides_win_over_context() {
        let tx = factory()
            .transfer(recipient())
            .network_type(NetworkType::TestNet)
            .version(2)
            .max_fee(77)
            .deadline(DEADLINE)
            .build()
            .unwrap();
        assert_eq!(tx.network_type, NetworkType::TestNet);
        assert_eq!(tx.version, 2);
        assert_eq!(tx.max_fee.value(), 77);
        assert_eq!(tx.deadline, DEADLINE);
    }

    #[test]
    fn test_default_deadline_uses_horizon() {
        let context = NetworkContext::new(NetworkType::MijinTest)
            .with_deadline_horizon(Duration::from_secs(60));
        let before = Deadline::after(Duration::from_secs(60)).unwrap();
        let tx = TransactionBuilderFactory::new(context)
            .transfer(recipient())
            .build()
            .unwrap();
        let after = Deadline::after(Duration::from_secs(60)).unwrap();
        assert!(before <= tx.deadline && tx.deadline <= after);
    }

    #[test]
    fn test_default_fee_scales_with_size() {
        let context =
            NetworkContext::new(NetworkType::MijinTest).with_fee_strategy(FeeStrategy::Multiplier(3));
        let tx = TransactionBuilderFactory::new(context)
            .transfer(recipient())
            .message(Message::plain("fee"))
            .deadline(DEADLINE)
            .build()
            .unwrap();
        assert_eq!(tx.max_fee.value(), 3 * tx.size().unwrap() as u64);
    }

    #[test]
    fn test_fee_overflow_names_max_fee() {
        let context = NetworkContext::new(NetworkType::MijinTest)
            .with_fee_strategy(FeeStrategy::Multiplier(u64::MAX));
        let result = TransactionBuilderFactory::new(context)
            .transfer(recipient())
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(result), "max_fee");
    }

    #[test]
    fn test_transfer_rejects_duplicate_mosaics() {
        let id = MosaicId::new(7);
        let result = factory()
            .transfer(recipient())
            .mosaics([Mosaic::new(id, 1), Mosaic::new(id, 2)])
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(result), "mosaics");
    }

    #[test]
    fn test_transfer_rejects_too_many_mosaics() {
        let mosaics = (0..=MAX_TRANSFER_MOSAICS as u64).map(|i| Mosaic::new(MosaicId::new(i), 1));
        let result = factory()
            .transfer(recipient())
            .mosaics(mosaics)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(result), "mosaics");
    }

    #[test]
    fn test_transfer_rejects_oversized_message() {
        let result = factory()
            .transfer(recipient())
            .message(Message::plain("x".repeat(MAX_MESSAGE_SIZE + 1)))
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(result), "message");
    }

    #[test]
    fn test_mosaic_definition_validation() {
        let owner = KeyPair::generate().public_key();
        let (id, nonce) = derive_mosaic_id(&owner, MosaicNonce::new(1)).unwrap();
        let too_divisible = factory()
            .mosaic_definition(owner, nonce, id, MosaicProperties::new(true, true, 7))
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(too_divisible), "divisibility");

        let zero_duration = factory()
            .mosaic_definition(
                owner,
                nonce,
                id,
                MosaicProperties::new(true, true, 0).with_duration(0),
            )
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(zero_duration), "duration");
    }

    #[test]
    fn test_mosaic_definition_rejects_id_not_derived_from_owner() {
        let owner = KeyPair::generate().public_key();
        let nonce = MosaicNonce::new(7);
        let (derived, _) = derive_mosaic_id(&owner, nonce).unwrap();
        assert_ne!(derived, MosaicId::new(0x1234));

        let forged = factory()
            .mosaic_definition(owner, nonce, MosaicId::new(0x1234), MosaicProperties::new(true, true, 0))
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(forged), "mosaic_id");

        let other_owner = factory()
            .mosaic_definition(
                KeyPair::generate().public_key(),
                nonce,
                derived,
                MosaicProperties::new(true, true, 0),
            )
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(other_owner), "mosaic_id");

        let tx = factory()
            .mosaic_definition(owner, nonce, derived, MosaicProperties::new(true, true, 0))
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::MosaicDefinition(definition) = tx.body else {
            panic!("expected a mosaic definition");
        };
        assert_eq!(definition.mosaic_id, derived);
    }

    #[test]
    fn test_derived_mosaic_definition_uses_owner() {
        let owner = KeyPair::generate().public_key();
        let nonce = MosaicNonce::new(42);
        let tx = factory()
            .derived_mosaic_definition(&owner, nonce, MosaicProperties::new(false, true, 3))
            .unwrap()
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::MosaicDefinition(definition) = tx.body else {
            panic!("expected a mosaic definition");
        };
        let (expected_id, expected_nonce) = derive_mosaic_id(&owner, nonce).unwrap();
        assert_eq!(definition.mosaic_id, expected_id);
        assert_eq!(definition.nonce, expected_nonce);
    }

    #[test]
    fn test_supply_change_rejects_zero_delta() {
        let result = factory()
            .mosaic_supply_change(MosaicId::new(1), MosaicSupplyType::Increase, 0)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(result), "delta");
    }

    #[test]
    fn test_namespace_registration() {
        let root = factory()
            .register_root_namespace("prx", 1000)
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::RegisterNamespace(root) = root.body else {
            panic!("expected a namespace registration");
        };
        assert_eq!(root.namespace_id, NamespaceId::from_name("prx").unwrap());

        let sub = factory()
            .register_sub_namespace("xpx", root.namespace_id)
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::RegisterNamespace(sub) = sub.body else {
            panic!("expected a namespace registration");
        };
        assert_eq!(sub.namespace_id, NamespaceId::from_name("prx.xpx").unwrap());
    }

    #[test]
    fn test_namespace_validation() {
        let dotted = factory()
            .register_root_namespace("a.b", 10)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(dotted), "name");

        let uppercase = factory()
            .register_root_namespace("Prx", 10)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(uppercase), "name");

        let no_duration = factory()
            .register_root_namespace("prx", 0)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(no_duration), "duration");
    }

    #[test]
    fn test_alias_requires_namespace_id() {
        let result = factory()
            .mosaic_alias(AliasAction::Link, NamespaceId::new(5), MosaicId::new(6))
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(result), "namespace_id");

        let tx = factory()
            .mosaic_alias(
                AliasAction::Link,
                NamespaceId::from_name("prx").unwrap(),
                MosaicId::new(6),
            )
            .deadline(DEADLINE)
            .build()
            .unwrap();
        assert_eq!(tx.transaction_type(), TransactionType::MosaicAlias);
    }

    #[test]
    fn test_account_properties_validation() {
        let mismatch = factory()
            .account_properties(
                AccountPropertyType::AllowAddress,
                PropertyModifications::Mosaic(vec![PropertyModification::add(MosaicId::new(1))]),
            )
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(mismatch), "property_type");

        let empty = factory()
            .account_properties(
                AccountPropertyType::BlockMosaic,
                PropertyModifications::Mosaic(Vec::new()),
            )
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(empty), "modifications");

        let tx = factory()
            .account_properties(
                AccountPropertyType::BlockTransaction,
                PropertyModifications::EntityType(vec![PropertyModification::add(
                    TransactionType::Transfer,
                )]),
            )
            .deadline(DEADLINE)
            .build()
            .unwrap();
        assert_eq!(
            tx.transaction_type(),
            TransactionType::AccountPropertiesEntityType
        );
    }

    #[test]
    fn test_multisig_validation() {
        let cosigner = KeyPair::generate().public_key();

        let out_of_range = factory()
            .modify_multisig_account()
            .min_approval_delta(200)
            .add_cosignatory(cosigner)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(out_of_range), "min_approval_delta");

        let duplicate = factory()
            .modify_multisig_account()
            .add_cosignatory(cosigner)
            .remove_cosignatory(cosigner)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(duplicate), "modifications");

        let nothing = factory().modify_multisig_account().deadline(DEADLINE).build();
        assert_eq!(field_of(nothing), "modifications");

        let tx = factory()
            .modify_multisig_account()
            .min_approval_delta(1)
            .min_removal_delta(-1)
            .add_cosignatory(cosigner)
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::ModifyMultisigAccount(body) = tx.body else {
            panic!("expected a multisig modification");
        };
        assert_eq!(body.min_removal_delta, -1);
    }

    #[test]
    fn test_lock_funds_requires_bonded_aggregate() {
        let kp = KeyPair::generate();
        let mosaic = Mosaic::new(MosaicId::new(1), 10_000_000);

        let transfer = factory()
            .transfer(recipient())
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let signed_transfer = sign(&transfer, &kp, None).unwrap();
        let wrong = factory()
            .lock_funds(mosaic, 480)
            .signed_transaction(&signed_transfer)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(wrong), "hash");

        let missing = factory().lock_funds(mosaic, 480).deadline(DEADLINE).build();
        assert_eq!(field_of(missing), "hash");

        let inner = factory()
            .transfer(recipient())
            .build_embedded()
            .unwrap();
        let bonded = factory()
            .aggregate_bonded()
            .inner(inner)
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let signed_bonded = sign(&bonded, &kp, None).unwrap();
        let tx = factory()
            .lock_funds(mosaic, 480)
            .signed_transaction(&signed_bonded)
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::LockFunds(lock) = tx.body else {
            panic!("expected a lock");
        };
        assert_eq!(&lock.hash, signed_bonded.hash().as_bytes());
    }

    #[test]
    fn test_secret_proof_must_match_secret() {
        let proof = b"open sesame".to_vec();
        let secret = HashType::Sha3_256.digest(&proof);

        let tx = factory()
            .secret_proof(HashType::Sha3_256, secret, recipient(), proof.clone())
            .deadline(DEADLINE)
            .build();
        assert!(tx.is_ok());

        let wrong = factory()
            .secret_proof(HashType::Keccak256, secret, recipient(), proof)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(wrong), "proof");

        let empty = factory()
            .secret_proof(HashType::Sha3_256, secret, recipient(), Vec::new())
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(empty), "proof");
    }

    #[test]
    fn test_metadata_validation() {
        let target = MetadataTarget::Mosaic(MosaicId::new(3));

        let empty_key = factory()
            .modify_metadata(target)
            .add("", "v")
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(empty_key), "key");

        let long_value = factory()
            .modify_metadata(target)
            .add("k", "v".repeat(MAX_METADATA_VALUE_SIZE + 1))
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(long_value), "value");

        let removal_with_value = factory()
            .modify_metadata(target)
            .modification(MetadataModification {
                modification_type: MetadataModificationType::Remove,
                key: "k".into(),
                value: "v".into(),
            })
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(removal_with_value), "value");

        let nothing = factory().modify_metadata(target).deadline(DEADLINE).build();
        assert_eq!(field_of(nothing), "modifications");

        let tx = factory()
            .modify_metadata(target)
            .add("name", "token")
            .remove("old")
            .deadline(DEADLINE)
            .build()
            .unwrap();
        assert_eq!(tx.transaction_type(), TransactionType::ModifyMosaicMetadata);
    }

    #[test]
    fn test_metadata_value_is_xor_against_current() {
        let owner = KeyPair::generate().public_key();
        let key = scoped_metadata_key("name");

        let tx = factory()
            .account_metadata(owner, key)
            .value([0x0f, 0xf0, 0xaa])
            .old_value([0xff])
            .deadline(DEADLINE)
            .build()
            .unwrap();
        assert_eq!(tx.transaction_type(), TransactionType::AccountMetadata);
        let TransactionBody::Metadata(body) = tx.body else {
            panic!("expected a metadata transaction");
        };
        assert_eq!(body.value, vec![0xf0, 0xf0, 0xaa]);
        assert_eq!(body.value_size_delta, 2);
        assert_eq!(body.scoped_metadata_key, key);

        let shrink = factory()
            .mosaic_metadata(owner, MosaicId::new(4), key)
            .value("ab")
            .old_value("abcd")
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::Metadata(body) = shrink.body else {
            panic!("expected a metadata transaction");
        };
        assert_eq!(body.value_size_delta, -2);
        assert_eq!(body.value, vec![0, 0, b'c', b'd']);
        assert_eq!(body.target, MetadataEntity::Mosaic(MosaicId::new(4)));
    }

    #[test]
    fn test_metadata_v2_validation() {
        let owner = KeyPair::generate().public_key();
        let namespace = NamespaceId::new(11);

        let unchanged = factory()
            .namespace_metadata(owner, namespace, 1)
            .value("same")
            .old_value("same")
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(unchanged), "value");

        let nothing = factory()
            .namespace_metadata(owner, namespace, 1)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(nothing), "value");

        let long_old = factory()
            .namespace_metadata(owner, namespace, 1)
            .value("v")
            .old_value(vec![1; MAX_METADATA_VALUE_SIZE + 1])
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(long_old), "old_value");
    }

    #[test]
    fn test_mosaic_levy_validation() {
        let mosaic_id = MosaicId::new(0x56CE_0000_2B67);

        let free = factory()
            .modify_mosaic_levy(mosaic_id, MosaicLevy::absolute(recipient(), mosaic_id, 0))
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(free), "fee");

        let over_everything = factory()
            .modify_mosaic_levy(
                mosaic_id,
                MosaicLevy::percentile(recipient(), mosaic_id, 101).unwrap(),
            )
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(over_everything), "fee");

        let tx = factory()
            .modify_mosaic_levy(
                mosaic_id,
                MosaicLevy::percentile(recipient(), mosaic_id, 5).unwrap(),
            )
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::ModifyMosaicLevy(body) = tx.body else {
            panic!("expected a levy modification");
        };
        assert_eq!(body.levy.fee.value(), 500_000);

        let removal = factory()
            .remove_mosaic_levy(mosaic_id)
            .deadline(DEADLINE)
            .build()
            .unwrap();
        assert_eq!(removal.transaction_type(), TransactionType::RemoveMosaicLevy);
    }

    #[test]
    fn test_exchange_offer_validation() {
        let xpx = MosaicId::new(0x0DC6_7FBE_1CAD_29E3);
        let sell = AddExchangeOffer {
            mosaic: Mosaic::new(xpx, 100),
            cost: UInt64::new(50),
            offer_type: ExchangeOfferType::Sell,
            duration: UInt64::new(1000),
        };

        let nothing = factory().exchange_offer_add().deadline(DEADLINE).build();
        assert_eq!(field_of(nothing), "offers");

        let twice = factory()
            .exchange_offer_add()
            .offer(sell)
            .offer(sell)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(twice), "offers");

        let empty_offer = factory()
            .exchange_offer_add()
            .offer(AddExchangeOffer {
                mosaic: Mosaic::new(xpx, 0),
                ..sell
            })
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(empty_offer), "mosaic_amount");

        let both_sides = factory()
            .exchange_offer_add()
            .offer(sell)
            .offer(AddExchangeOffer {
                offer_type: ExchangeOfferType::Buy,
                ..sell
            })
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::ExchangeOfferAdd(body) = both_sides.body else {
            panic!("expected offers");
        };
        assert_eq!(body.offers.len(), 2);

        let accept = factory()
            .exchange_offer()
            .offer(ExchangeOffer {
                mosaic: Mosaic::new(xpx, 10),
                cost: UInt64::new(5),
                offer_type: ExchangeOfferType::Sell,
                owner: KeyPair::generate().public_key(),
            })
            .deadline(DEADLINE)
            .build()
            .unwrap();
        assert_eq!(accept.transaction_type(), TransactionType::ExchangeOffer);

        let remove_twice = factory()
            .exchange_offer_remove()
            .offer(RemoveExchangeOffer {
                mosaic_id: xpx,
                offer_type: ExchangeOfferType::Buy,
            })
            .offer(RemoveExchangeOffer {
                mosaic_id: xpx,
                offer_type: ExchangeOfferType::Buy,
            })
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(remove_twice), "offers");
    }

    #[test]
    fn test_modify_contract_rejects_duplicate_members() {
        let executor = KeyPair::generate().public_key();
        let add = CosignatoryModification {
            modification_type: MultisigModificationType::Add,
            cosignatory: executor,
        };

        let duplicate = factory()
            .modify_contract([1; 32])
            .executors([add, add])
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(duplicate), "executors");

        let tx = factory()
            .modify_contract([1; 32])
            .duration_delta(-10)
            .executors([add])
            .verifiers([add])
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::ModifyContract(body) = tx.body else {
            panic!("expected a contract modification");
        };
        assert_eq!(body.duration_delta, -10);
        assert!(body.customers.is_empty());
    }

    #[test]
    fn test_network_upgrade_validation() {
        let no_config = factory()
            .blockchain_config(10, "", "")
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(no_config), "config");

        let huge = factory()
            .blockchain_config(10, "x".repeat(usize::from(u16::MAX) + 1), "")
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(huge), "config");

        let immediate = factory()
            .blockchain_upgrade(0, BlockchainVersion::new(0, 2, 0, 0))
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(immediate), "upgrade_period");

        let tx = factory()
            .blockchain_upgrade(100, BlockchainVersion::new(0, 2, 0, 0))
            .deadline(DEADLINE)
            .build()
            .unwrap();
        assert_eq!(tx.transaction_type(), TransactionType::BlockchainUpgrade);
    }

    #[test]
    fn test_drive_prepare_validation() {
        let owner = KeyPair::generate().public_key();

        let long_billing = factory()
            .drive_prepare(owner, 1 << 20, 100)
            .billing(101, 5)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(long_billing), "billing_period");

        let too_few = factory()
            .drive_prepare(owner, 1 << 20, 100)
            .replicas(2, 3)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(too_few), "min_replicators");

        let over_hundred = factory()
            .drive_prepare(owner, 1 << 20, 100)
            .percent_approvers(101)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(over_hundred), "percent_approvers");

        let tx = factory()
            .drive_prepare(owner, 1 << 20, 100)
            .billing(10, 5)
            .replicas(3, 2)
            .percent_approvers(66)
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let TransactionBody::DrivePrepare(body) = tx.body else {
            panic!("expected a drive");
        };
        assert_eq!(body.billing_period.value(), 10);
        assert_eq!(body.min_replicators, 2);
    }

    #[test]
    fn test_aggregate_validation() {
        let empty = factory().aggregate_complete().deadline(DEADLINE).build();
        assert_eq!(field_of(empty), "transactions");

        let foreign = factory()
            .transfer(recipient())
            .network_type(NetworkType::MainNet)
            .build_embedded()
            .unwrap();
        let mismatched = factory()
            .aggregate_complete()
            .inner(foreign)
            .deadline(DEADLINE)
            .build();
        assert_eq!(field_of(mismatched), "transactions");

        let nested = factory()
            .aggregate_complete()
            .inner(factory().transfer(recipient()).build_embedded().unwrap())
            .build_embedded();
        assert_eq!(field_of(nested), "transactions");
    }

    #[test]
    fn test_embedded_build_keeps_network_and_version() {
        let embedded = factory()
            .account_link(KeyPair::generate().public_key(), AccountLinkAction::Link)
            .build_embedded()
            .unwrap();
        assert_eq!(embedded.network_type, NetworkType::MijinTest);
        assert_eq!(embedded.version, 2);
        assert_eq!(embedded.transaction_type(), TransactionType::AccountLink);
    }

    #[test]
    fn test_built_transactions_roundtrip_through_codec() {
        let tx = factory()
            .secret_lock(
                Mosaic::new(MosaicId::new(9), 5),
                100,
                HashType::Hash160,
                [4; 32],
                recipient(),
            )
            .deadline(DEADLINE)
            .build()
            .unwrap();
        let bytes = tx.serialize().unwrap();
        assert_eq!(crate::transaction::codec::deserialize(&bytes).unwrap(), tx);
    }
}
