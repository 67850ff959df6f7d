//! # Transaction Codec
//!
//! Maps [`Transaction`] and [`EmbeddedTransaction`] onto field sets, runs
//! them through the schema encoder and flattens the result into the bytes
//! nodes sign and accept. Parsing goes the other way through
//! [`parse`](crate::schema::parse).
//!
//! ## Full payload
//!
//! ```text
//! 0    size u32              signature [64]        signer [32]
//! 100  reserved u32          version u16           type u16
//! 108  max_fee u64           deadline u64
//! 124  body (per kind schema, flat)
//!      [aggregates only] cosignatures: (signer [32] | signature [64])*
//! ```
//!
//! ## Embedded payload
//!
//! ```text
//! 0    size u32   reserved u32   version u16   type u16
//! 12   body (per kind schema, flat)
//! ```
//!
//! An aggregate body is `transactions_size` followed by its embedded
//! payloads back to back, so the size always equals the sum of theirs.

use tracing::debug;

use super::model::{
    AccountLinkTransaction, AccountPropertyTransaction, AddExchangeOffer, AggregateTransaction,
    AliasTarget, AliasTransaction, BlockchainConfigTransaction, BlockchainUpgradeTransaction,
    BlockchainVersion, Cosignature, CosignatoryModification, DrivePrepareTransaction,
    EmbeddedTransaction, ExchangeOffer, ExchangeOfferAddTransaction,
    ExchangeOfferRemoveTransaction, ExchangeOfferTransaction, LockFundsTransaction,
    MetadataEntity, MetadataModification, MetadataTarget, MetadataTransaction,
    ModifyContractTransaction, ModifyMetadataTransaction, ModifyMosaicLevyTransaction,
    ModifyMultisigAccountTransaction, MosaicDefinitionTransaction, MosaicLevy,
    MosaicSupplyChangeTransaction, NamespaceRegistration, PropertyModification,
    PropertyModifications, RegisterNamespaceTransaction, RemoveExchangeOffer,
    RemoveMosaicLevyTransaction, SecretLockTransaction, SecretProofTransaction, SignatureInfo,
    Transaction, TransactionBody, TransferTransaction,
};
use super::schemas::{body_schema, EMBEDDED_HEADER, TRANSACTION_HEADER};
use super::types::{
    AccountLinkAction, AccountPropertyType, AliasAction, ExchangeOfferType,
    MetadataModificationType, MosaicLevyType, MosaicSupplyType, MultisigModificationType,
    NamespaceType, PropertyModificationType, TransactionType,
};
use crate::config::{COSIGNATURE_SIZE, EMBEDDED_HEADER_SIZE, TRANSACTION_HEADER_SIZE, TYPE_OFFSET};
use crate::crypto::hash::HashType;
use crate::crypto::{PublicKey, Signature};
use crate::model::message::{MESSAGE_TYPE_PLAIN, MESSAGE_TYPE_SECURE};
use crate::model::mosaic::PROPERTY_DURATION;
use crate::model::{
    Address, Deadline, Message, Mosaic, MosaicId, MosaicNonce, MosaicProperties, NamespaceId,
    NetworkType, Recipient, UInt64,
};
use crate::schema::{encode, flatten, parse, EncodingError, FieldSet, Schema};

/// Fixed part of a metadata modification: size, type, key and value sizes.
const METADATA_MODIFICATION_HEADER: usize = 8;

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Serializes a full transaction. Unsigned transactions get zeroed
/// signature and signer fields.
pub fn serialize(tx: &Transaction) -> Result<Vec<u8>, EncodingError> {
    let transaction_type = tx.transaction_type();
    let (signature, signer) = match &tx.signature {
        Some(info) => (*info.signature.as_bytes(), *info.signer.as_bytes()),
        None => ([0u8; 64], [0u8; 32]),
    };

    let header = FieldSet::new()
        .with_scalar("size", 0)
        .with_array("signature", &signature)
        .with_array("signer", &signer)
        .with_scalar("reserved", 0)
        .with_scalar("version", u64::from(tx.version_field()))
        .with_scalar("type", u64::from(transaction_type.code()))
        .with_scalar("max_fee", tx.max_fee.value())
        .with_scalar("deadline", tx.deadline.network_millis().value());
    let fields = header.merge(body_fields(&tx.body, tx.network_type)?);

    let mut bytes = encode_flat(&[&TRANSACTION_HEADER, body_schema(transaction_type)], &fields)?;
    if let TransactionBody::Aggregate(aggregate) = &tx.body {
        for cosignature in &aggregate.cosignatures {
            bytes.extend_from_slice(cosignature.signer.as_bytes());
            bytes.extend_from_slice(cosignature.signature.as_bytes());
        }
    }
    write_size(&mut bytes)?;

    debug!(
        transaction_type = %transaction_type,
        size = bytes.len(),
        signed = tx.is_signed(),
        "serialized transaction"
    );
    Ok(bytes)
}

/// Serializes an inner transaction with the reduced header.
pub fn serialize_embedded(tx: &EmbeddedTransaction) -> Result<Vec<u8>, EncodingError> {
    let transaction_type = tx.transaction_type();
    if transaction_type.is_aggregate() {
        return Err(nested_aggregate());
    }

    let header = FieldSet::new()
        .with_scalar("size", 0)
        .with_scalar("reserved", 0)
        .with_scalar("version", u64::from(tx.version_field()))
        .with_scalar("type", u64::from(transaction_type.code()));
    let fields = header.merge(body_fields(&tx.body, tx.network_type)?);

    let mut bytes = encode_flat(&[&EMBEDDED_HEADER, body_schema(transaction_type)], &fields)?;
    write_size(&mut bytes)?;
    Ok(bytes)
}

fn encode_flat(schemas: &[&Schema], fields: &FieldSet) -> Result<Vec<u8>, EncodingError> {
    let table = encode(schemas, fields)?;
    flatten(schemas, &table)
}

fn write_size(bytes: &mut [u8]) -> Result<(), EncodingError> {
    let size = u32::try_from(bytes.len()).map_err(|_| EncodingError::TooLarge)?;
    bytes[..4].copy_from_slice(&size.to_le_bytes());
    Ok(())
}

/// A length or count as a scalar. Values too wide for their field are
/// rejected when the table is flattened.
fn len(n: usize) -> u64 {
    n as u64
}

fn body_fields(body: &TransactionBody, network_type: NetworkType) -> Result<FieldSet, EncodingError> {
    let fields = match body {
        TransactionBody::Transfer(t) => FieldSet::new()
            .with_array("recipient", &t.recipient.to_bytes(network_type))
            .with_scalar("message_size", len(t.message.payload().len() + 1))
            .with_scalar("mosaics_count", len(t.mosaics.len()))
            .with_table(
                "message",
                FieldSet::new()
                    .with_scalar("type", u64::from(t.message.message_type()))
                    .with_vector("payload", t.message.payload()),
            )
            .with_table_array(
                "mosaics",
                t.mosaics
                    .iter()
                    .map(|m| {
                        FieldSet::new()
                            .with_scalar("id", m.id.value())
                            .with_scalar("amount", m.amount.value())
                    })
                    .collect(),
            ),

        TransactionBody::MosaicDefinition(t) => {
            let properties: Vec<FieldSet> = t
                .properties
                .duration
                .map(|duration| {
                    vec![FieldSet::new()
                        .with_scalar("id", u64::from(PROPERTY_DURATION))
                        .with_scalar("value", duration)]
                })
                .unwrap_or_default();
            FieldSet::new()
                .with_scalar("nonce", u64::from(t.nonce.value()))
                .with_scalar("mosaic_id", t.mosaic_id.value())
                .with_scalar("properties_count", len(properties.len()))
                .with_scalar("flags", u64::from(t.properties.flags()))
                .with_scalar("divisibility", u64::from(t.properties.divisibility))
                .with_table_array("properties", properties)
        }

        TransactionBody::MosaicSupplyChange(t) => FieldSet::new()
            .with_scalar("mosaic_id", t.mosaic_id.value())
            .with_scalar("direction", u64::from(t.supply_type.code()))
            .with_scalar("delta", t.delta.value()),

        TransactionBody::RegisterNamespace(t) => {
            let duration_or_parent = match t.registration {
                NamespaceRegistration::Root { duration } => duration.value(),
                NamespaceRegistration::Sub { parent_id } => parent_id.value(),
            };
            FieldSet::new()
                .with_scalar(
                    "namespace_type",
                    u64::from(t.registration.namespace_type().code()),
                )
                .with_scalar("duration_or_parent", duration_or_parent)
                .with_scalar("namespace_id", t.namespace_id.value())
                .with_scalar("name_size", len(t.name.len()))
                .with_vector("name", t.name.as_bytes())
        }

        TransactionBody::Alias(t) => {
            let fields = FieldSet::new()
                .with_scalar("action", u64::from(t.action.code()))
                .with_scalar("namespace_id", t.namespace_id.value());
            match t.target {
                AliasTarget::Address(address) => fields.with_array("address", address.as_bytes()),
                AliasTarget::Mosaic(mosaic_id) => fields.with_scalar("mosaic_id", mosaic_id.value()),
            }
        }

        TransactionBody::AccountProperty(t) => {
            let modifications: Vec<FieldSet> = match &t.modifications {
                PropertyModifications::Address(list) => list
                    .iter()
                    .map(|m| property_fields(m).with_array("value", m.value.as_bytes()))
                    .collect(),
                PropertyModifications::Mosaic(list) => list
                    .iter()
                    .map(|m| property_fields(m).with_scalar("value", m.value.value()))
                    .collect(),
                PropertyModifications::EntityType(list) => list
                    .iter()
                    .map(|m| property_fields(m).with_scalar("value", u64::from(m.value.code())))
                    .collect(),
            };
            FieldSet::new()
                .with_scalar("property_type", u64::from(t.property_type.code()))
                .with_scalar("modifications_count", len(modifications.len()))
                .with_table_array("modifications", modifications)
        }

        TransactionBody::ModifyMultisigAccount(t) => FieldSet::new()
            .with_scalar("min_removal_delta", u64::from(t.min_removal_delta as u8))
            .with_scalar("min_approval_delta", u64::from(t.min_approval_delta as u8))
            .with_scalar("modifications_count", len(t.modifications.len()))
            .with_table_array("modifications", cosignatory_fields(&t.modifications)),

        TransactionBody::LockFunds(t) => FieldSet::new()
            .with_scalar("mosaic_id", t.mosaic.id.value())
            .with_scalar("amount", t.mosaic.amount.value())
            .with_scalar("duration", t.duration.value())
            .with_array("hash", &t.hash),

        TransactionBody::SecretLock(t) => FieldSet::new()
            .with_scalar("mosaic_id", t.mosaic.id.value())
            .with_scalar("amount", t.mosaic.amount.value())
            .with_scalar("duration", t.duration.value())
            .with_scalar("hash_type", u64::from(t.hash_type.code()))
            .with_array("secret", &t.secret)
            .with_array("recipient", &t.recipient.to_bytes(network_type)),

        TransactionBody::SecretProof(t) => FieldSet::new()
            .with_scalar("hash_type", u64::from(t.hash_type.code()))
            .with_array("secret", &t.secret)
            .with_array("recipient", &t.recipient.to_bytes(network_type))
            .with_scalar("proof_size", len(t.proof.len()))
            .with_vector("proof", &t.proof),

        TransactionBody::ModifyMetadata(t) => {
            let fields = FieldSet::new()
                .with_scalar("metadata_type", u64::from(t.target.metadata_type().code()))
                .with_table_array(
                    "modifications",
                    t.modifications
                        .iter()
                        .map(|m| {
                            let size = METADATA_MODIFICATION_HEADER + m.key.len() + m.value.len();
                            FieldSet::new()
                                .with_scalar("size", len(size))
                                .with_scalar("type", u64::from(m.modification_type.code()))
                                .with_scalar("key_size", len(m.key.len()))
                                .with_scalar("value_size", len(m.value.len()))
                                .with_vector("key", m.key.as_bytes())
                                .with_vector("value", m.value.as_bytes())
                        })
                        .collect(),
                );
            match t.target {
                MetadataTarget::Address(address) => fields.with_array("target", address.as_bytes()),
                MetadataTarget::Mosaic(id) => fields.with_scalar("target", id.value()),
                MetadataTarget::Namespace(id) => fields.with_scalar("target", id.value()),
            }
        }

        TransactionBody::AccountLink(t) => FieldSet::new()
            .with_array("remote_public_key", t.remote_public_key.as_bytes())
            .with_scalar("action", u64::from(t.action.code())),

        TransactionBody::Metadata(t) => {
            let fields = FieldSet::new()
                .with_array("target_key", t.target_key.as_bytes())
                .with_scalar("scoped_metadata_key", t.scoped_metadata_key)
                .with_scalar("value_size_delta", u64::from(t.value_size_delta as u16))
                .with_scalar("value_size", len(t.value.len()))
                .with_vector("value", &t.value);
            match t.target {
                MetadataEntity::Account => fields,
                MetadataEntity::Mosaic(id) => fields.with_scalar("target_id", id.value()),
                MetadataEntity::Namespace(id) => fields.with_scalar("target_id", id.value()),
            }
        }

        TransactionBody::ModifyMosaicLevy(t) => FieldSet::new()
            .with_scalar("mosaic_id", t.mosaic_id.value())
            .with_table(
                "levy",
                FieldSet::new()
                    .with_scalar("type", u64::from(t.levy.levy_type.code()))
                    .with_array("recipient", &t.levy.recipient.to_bytes(network_type))
                    .with_scalar("mosaic_id", t.levy.mosaic_id.value())
                    .with_scalar("fee", t.levy.fee.value()),
            ),

        TransactionBody::RemoveMosaicLevy(t) => {
            FieldSet::new().with_scalar("mosaic_id", t.mosaic_id.value())
        }

        TransactionBody::ExchangeOfferAdd(t) => FieldSet::new()
            .with_scalar("offers_count", len(t.offers.len()))
            .with_table_array(
                "offers",
                t.offers
                    .iter()
                    .map(|o| {
                        offer_fields(&o.mosaic, o.cost, o.offer_type)
                            .with_scalar("duration", o.duration.value())
                    })
                    .collect(),
            ),

        TransactionBody::ExchangeOffer(t) => FieldSet::new()
            .with_scalar("offers_count", len(t.offers.len()))
            .with_table_array(
                "offers",
                t.offers
                    .iter()
                    .map(|o| {
                        offer_fields(&o.mosaic, o.cost, o.offer_type)
                            .with_array("owner", o.owner.as_bytes())
                    })
                    .collect(),
            ),

        TransactionBody::ExchangeOfferRemove(t) => FieldSet::new()
            .with_scalar("offers_count", len(t.offers.len()))
            .with_table_array(
                "offers",
                t.offers
                    .iter()
                    .map(|o| {
                        FieldSet::new()
                            .with_scalar("mosaic_id", o.mosaic_id.value())
                            .with_scalar("type", u64::from(o.offer_type.code()))
                    })
                    .collect(),
            ),

        TransactionBody::ModifyContract(t) => FieldSet::new()
            .with_scalar("duration_delta", t.duration_delta as u64)
            .with_array("hash", &t.content_hash)
            .with_scalar("customers_count", len(t.customers.len()))
            .with_scalar("executors_count", len(t.executors.len()))
            .with_scalar("verifiers_count", len(t.verifiers.len()))
            .with_table_array("customers", cosignatory_fields(&t.customers))
            .with_table_array("executors", cosignatory_fields(&t.executors))
            .with_table_array("verifiers", cosignatory_fields(&t.verifiers)),

        TransactionBody::BlockchainConfig(t) => FieldSet::new()
            .with_scalar("apply_height_delta", t.apply_height_delta.value())
            .with_scalar("config_size", len(t.config.len()))
            .with_scalar(
                "entity_versions_size",
                len(t.supported_entity_versions.len()),
            )
            .with_vector("config", t.config.as_bytes())
            .with_vector("entity_versions", t.supported_entity_versions.as_bytes()),

        TransactionBody::BlockchainUpgrade(t) => FieldSet::new()
            .with_scalar("upgrade_period", t.upgrade_period.value())
            .with_scalar("new_version", t.new_version.value()),

        TransactionBody::DrivePrepare(t) => FieldSet::new()
            .with_array("owner", t.owner.as_bytes())
            .with_scalar("duration", t.duration.value())
            .with_scalar("billing_period", t.billing_period.value())
            .with_scalar("billing_price", t.billing_price.value())
            .with_scalar("drive_size", t.drive_size.value())
            .with_scalar("replicas", u64::from(t.replicas))
            .with_scalar("min_replicators", u64::from(t.min_replicators))
            .with_scalar("percent_approvers", u64::from(t.percent_approvers)),

        TransactionBody::Aggregate(t) => {
            let mut inner = Vec::new();
            for embedded in &t.inner {
                inner.extend_from_slice(&serialize_embedded(embedded)?);
            }
            FieldSet::new()
                .with_scalar("transactions_size", len(inner.len()))
                .with_vector("transactions", &inner)
        }
    };
    Ok(fields)
}

fn cosignatory_fields(modifications: &[CosignatoryModification]) -> Vec<FieldSet> {
    modifications
        .iter()
        .map(|m| {
            FieldSet::new()
                .with_scalar("type", u64::from(m.modification_type.code()))
                .with_array("cosignatory", m.cosignatory.as_bytes())
        })
        .collect()
}

fn offer_fields(mosaic: &Mosaic, cost: UInt64, offer_type: ExchangeOfferType) -> FieldSet {
    FieldSet::new()
        .with_scalar("mosaic_id", mosaic.id.value())
        .with_scalar("mosaic_amount", mosaic.amount.value())
        .with_scalar("cost", cost.value())
        .with_scalar("type", u64::from(offer_type.code()))
}

fn property_fields<T>(modification: &PropertyModification<T>) -> FieldSet {
    FieldSet::new().with_scalar("type", u64::from(modification.modification_type.code()))
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

/// Parses a full payload.
///
/// The declared size must equal the buffer length. Bytes after the body
/// are only accepted for aggregates, and only as whole cosignatures.
pub fn deserialize(bytes: &[u8]) -> Result<Transaction, EncodingError> {
    let transaction_type = read_type(bytes, TRANSACTION_HEADER_SIZE)?;
    check_declared_size(bytes)?;

    let decoded = parse(&[&TRANSACTION_HEADER, body_schema(transaction_type)], bytes)?;
    let fields = &decoded.fields;
    let (network_type, version) = read_version(fields)?;
    let trailing = &bytes[decoded.extent..];

    let body = match read_body(transaction_type, fields)? {
        TransactionBody::Aggregate(mut aggregate) => {
            aggregate.cosignatures = read_cosignatures(trailing)?;
            TransactionBody::Aggregate(aggregate)
        }
        body => {
            if !trailing.is_empty() {
                return Err(EncodingError::TrailingBytes {
                    count: trailing.len(),
                });
            }
            body
        }
    };

    Ok(Transaction {
        network_type,
        version,
        max_fee: UInt64::new(fields.scalar("max_fee")?),
        deadline: Deadline::from_network_millis(fields.scalar("deadline")?),
        signature: read_signature_info(fields)?,
        body,
    })
}

/// Parses one embedded payload; `bytes` must be exactly its size.
pub fn deserialize_embedded(bytes: &[u8]) -> Result<EmbeddedTransaction, EncodingError> {
    let transaction_type = read_type(bytes, EMBEDDED_HEADER_SIZE)?;
    if transaction_type.is_aggregate() {
        return Err(nested_aggregate());
    }
    check_declared_size(bytes)?;

    let decoded = parse(&[&EMBEDDED_HEADER, body_schema(transaction_type)], bytes)?;
    if decoded.extent != bytes.len() {
        return Err(EncodingError::TrailingBytes {
            count: bytes.len() - decoded.extent,
        });
    }
    let (network_type, version) = read_version(&decoded.fields)?;
    Ok(EmbeddedTransaction {
        network_type,
        version,
        body: read_body(transaction_type, &decoded.fields)?,
    })
}

/// End of the signed region of a full payload: everything the schema
/// describes, without trailing cosignatures.
pub(crate) fn body_end(payload: &[u8]) -> Result<usize, EncodingError> {
    let transaction_type = read_type(payload, TRANSACTION_HEADER_SIZE)?;
    Ok(parse(&[&TRANSACTION_HEADER, body_schema(transaction_type)], payload)?.extent)
}

/// Reads the type code of a payload whose header is `header_size` long.
/// The type is always the header's last two bytes.
pub(crate) fn read_type(bytes: &[u8], header_size: usize) -> Result<TransactionType, EncodingError> {
    if bytes.len() < header_size {
        return Err(EncodingError::Truncated {
            needed: header_size,
            available: bytes.len(),
        });
    }
    let at = if header_size == TRANSACTION_HEADER_SIZE {
        TYPE_OFFSET
    } else {
        header_size - 2
    };
    let code = u16::from_le_bytes([bytes[at], bytes[at + 1]]);
    TransactionType::from_code(code).ok_or(EncodingError::UnknownTransactionType(code))
}

fn check_declared_size(bytes: &[u8]) -> Result<(), EncodingError> {
    let declared = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    if declared != bytes.len() {
        return Err(EncodingError::SizeMismatch {
            declared,
            actual: bytes.len(),
        });
    }
    Ok(())
}

fn read_version(fields: &FieldSet) -> Result<(NetworkType, u8), EncodingError> {
    let raw: u16 = fields.scalar_as("version")?;
    let network_code = (raw >> 8) as u8;
    let network_type = NetworkType::from_code(network_code).ok_or_else(|| {
        invalid("version", format!("unknown network type 0x{network_code:02X}"))
    })?;
    Ok((network_type, (raw & 0xff) as u8))
}

fn read_signature_info(fields: &FieldSet) -> Result<Option<SignatureInfo>, EncodingError> {
    let signature: [u8; 64] = fields.array_fixed("signature")?;
    let signer: [u8; 32] = fields.array_fixed("signer")?;
    if signature.iter().chain(signer.iter()).all(|b| *b == 0) {
        return Ok(None);
    }
    Ok(Some(SignatureInfo {
        signature: Signature::from_bytes(signature),
        signer: public_key("signer", signer)?,
    }))
}

fn read_cosignatures(bytes: &[u8]) -> Result<Vec<Cosignature>, EncodingError> {
    if bytes.len() % COSIGNATURE_SIZE != 0 {
        return Err(EncodingError::TrailingBytes {
            count: bytes.len() % COSIGNATURE_SIZE,
        });
    }
    bytes
        .chunks_exact(COSIGNATURE_SIZE)
        .map(|chunk| {
            let mut signer = [0u8; 32];
            let mut signature = [0u8; 64];
            signer.copy_from_slice(&chunk[..32]);
            signature.copy_from_slice(&chunk[32..]);
            Ok(Cosignature {
                signer: public_key("cosignatures", signer)?,
                signature: Signature::from_bytes(signature),
            })
        })
        .collect()
}

fn read_inner(bytes: &[u8]) -> Result<Vec<EmbeddedTransaction>, EncodingError> {
    let mut inner = Vec::new();
    let mut cursor = 0;
    while cursor < bytes.len() {
        let rest = &bytes[cursor..];
        if rest.len() < EMBEDDED_HEADER_SIZE {
            return Err(EncodingError::Truncated {
                needed: EMBEDDED_HEADER_SIZE,
                available: rest.len(),
            });
        }
        let size = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        if size < EMBEDDED_HEADER_SIZE {
            return Err(invalid(
                "transactions",
                format!("embedded size {size} is smaller than its header"),
            ));
        }
        if size > rest.len() {
            return Err(EncodingError::Truncated {
                needed: size,
                available: rest.len(),
            });
        }
        inner.push(deserialize_embedded(&rest[..size])?);
        cursor += size;
    }
    Ok(inner)
}

fn read_body(transaction_type: TransactionType, fields: &FieldSet) -> Result<TransactionBody, EncodingError> {
    let body = match transaction_type {
        TransactionType::Transfer => {
            let mosaics = fields
                .table_array("mosaics")?
                .iter()
                .map(|m| {
                    Ok(Mosaic {
                        id: MosaicId::new(m.scalar("id")?),
                        amount: UInt64::new(m.scalar("amount")?),
                    })
                })
                .collect::<Result<Vec<_>, EncodingError>>()?;
            TransactionBody::Transfer(TransferTransaction {
                recipient: recipient(fields, "recipient")?,
                mosaics,
                message: read_message(fields.table("message")?)?,
            })
        }

        TransactionType::MosaicDefinition => {
            let mut duration = None;
            for property in fields.table_array("properties")? {
                let id: u8 = property.scalar_as("id")?;
                if id != PROPERTY_DURATION {
                    return Err(invalid("properties", format!("unknown mosaic property {id}")));
                }
                duration = Some(property.scalar("value")?);
            }
            TransactionBody::MosaicDefinition(MosaicDefinitionTransaction {
                nonce: MosaicNonce::new(fields.scalar_as("nonce")?),
                mosaic_id: MosaicId::new(fields.scalar("mosaic_id")?),
                properties: MosaicProperties::from_flags(
                    fields.scalar_as("flags")?,
                    fields.scalar_as("divisibility")?,
                    duration,
                ),
            })
        }

        TransactionType::MosaicSupplyChange => {
            TransactionBody::MosaicSupplyChange(MosaicSupplyChangeTransaction {
                mosaic_id: MosaicId::new(fields.scalar("mosaic_id")?),
                supply_type: code(fields, "direction", MosaicSupplyType::from_code)?,
                delta: UInt64::new(fields.scalar("delta")?),
            })
        }

        TransactionType::RegisterNamespace => {
            let value = fields.scalar("duration_or_parent")?;
            let registration = match code(fields, "namespace_type", NamespaceType::from_code)? {
                NamespaceType::Root => NamespaceRegistration::Root {
                    duration: UInt64::new(value),
                },
                NamespaceType::Sub => NamespaceRegistration::Sub {
                    parent_id: NamespaceId::new(value),
                },
            };
            TransactionBody::RegisterNamespace(RegisterNamespaceTransaction {
                name: utf8("name", fields.vector("name")?)?,
                namespace_id: NamespaceId::new(fields.scalar("namespace_id")?),
                registration,
            })
        }

        TransactionType::AddressAlias | TransactionType::MosaicAlias => {
            let target = if transaction_type == TransactionType::AddressAlias {
                AliasTarget::Address(address(fields, "address")?)
            } else {
                AliasTarget::Mosaic(MosaicId::new(fields.scalar("mosaic_id")?))
            };
            TransactionBody::Alias(AliasTransaction {
                action: code(fields, "action", AliasAction::from_code)?,
                namespace_id: NamespaceId::new(fields.scalar("namespace_id")?),
                target,
            })
        }

        TransactionType::AccountPropertiesAddress
        | TransactionType::AccountPropertiesMosaic
        | TransactionType::AccountPropertiesEntityType => {
            let list = fields.table_array("modifications")?;
            let modifications = match transaction_type {
                TransactionType::AccountPropertiesAddress => PropertyModifications::Address(
                    read_property_modifications(list, |m| address(m, "value"))?,
                ),
                TransactionType::AccountPropertiesMosaic => PropertyModifications::Mosaic(
                    read_property_modifications(list, |m| Ok(MosaicId::new(m.scalar("value")?)))?,
                ),
                _ => PropertyModifications::EntityType(read_property_modifications(list, |m| {
                    code(m, "value", TransactionType::from_code)
                })?),
            };
            TransactionBody::AccountProperty(AccountPropertyTransaction {
                property_type: code(fields, "property_type", AccountPropertyType::from_code)?,
                modifications,
            })
        }

        TransactionType::ModifyMultisigAccount => {
            TransactionBody::ModifyMultisigAccount(ModifyMultisigAccountTransaction {
                min_approval_delta: fields.scalar_as::<u8>("min_approval_delta")? as i8,
                min_removal_delta: fields.scalar_as::<u8>("min_removal_delta")? as i8,
                modifications: read_cosignatory_modifications(fields.table_array("modifications")?)?,
            })
        }

        TransactionType::LockFunds => TransactionBody::LockFunds(LockFundsTransaction {
            mosaic: read_mosaic(fields)?,
            duration: UInt64::new(fields.scalar("duration")?),
            hash: fields.array_fixed("hash")?,
        }),

        TransactionType::SecretLock => TransactionBody::SecretLock(SecretLockTransaction {
            mosaic: read_mosaic(fields)?,
            duration: UInt64::new(fields.scalar("duration")?),
            hash_type: code(fields, "hash_type", HashType::from_code)?,
            secret: fields.array_fixed("secret")?,
            recipient: recipient(fields, "recipient")?,
        }),

        TransactionType::SecretProof => TransactionBody::SecretProof(SecretProofTransaction {
            hash_type: code(fields, "hash_type", HashType::from_code)?,
            secret: fields.array_fixed("secret")?,
            recipient: recipient(fields, "recipient")?,
            proof: fields.vector("proof")?.to_vec(),
        }),

        TransactionType::ModifyAddressMetadata
        | TransactionType::ModifyMosaicMetadata
        | TransactionType::ModifyNamespaceMetadata => {
            let target = match transaction_type {
                TransactionType::ModifyAddressMetadata => {
                    MetadataTarget::Address(address(fields, "target")?)
                }
                TransactionType::ModifyMosaicMetadata => {
                    MetadataTarget::Mosaic(MosaicId::new(fields.scalar("target")?))
                }
                _ => MetadataTarget::Namespace(NamespaceId::new(fields.scalar("target")?)),
            };
            let metadata_type: u8 = fields.scalar_as("metadata_type")?;
            if metadata_type != target.metadata_type().code() {
                return Err(invalid(
                    "metadata_type",
                    format!("{metadata_type} does not match {transaction_type}"),
                ));
            }
            let modifications = fields
                .table_array("modifications")?
                .iter()
                .map(|m| {
                    let key = m.vector("key")?;
                    let value = m.vector("value")?;
                    let size = m.scalar("size")?;
                    let expected = len(METADATA_MODIFICATION_HEADER + key.len() + value.len());
                    if size != expected {
                        return Err(invalid(
                            "modifications",
                            format!("modification size {size}, content needs {expected}"),
                        ));
                    }
                    Ok(MetadataModification {
                        modification_type: code(m, "type", MetadataModificationType::from_code)?,
                        key: utf8("key", key)?,
                        value: utf8("value", value)?,
                    })
                })
                .collect::<Result<Vec<_>, EncodingError>>()?;
            TransactionBody::ModifyMetadata(ModifyMetadataTransaction {
                target,
                modifications,
            })
        }

        TransactionType::AccountLink => TransactionBody::AccountLink(AccountLinkTransaction {
            remote_public_key: public_key(
                "remote_public_key",
                fields.array_fixed("remote_public_key")?,
            )?,
            action: code(fields, "action", AccountLinkAction::from_code)?,
        }),

        TransactionType::AccountMetadata
        | TransactionType::MosaicMetadata
        | TransactionType::NamespaceMetadata => {
            let target = match transaction_type {
                TransactionType::AccountMetadata => MetadataEntity::Account,
                TransactionType::MosaicMetadata => {
                    MetadataEntity::Mosaic(MosaicId::new(fields.scalar("target_id")?))
                }
                _ => MetadataEntity::Namespace(NamespaceId::new(fields.scalar("target_id")?)),
            };
            TransactionBody::Metadata(MetadataTransaction {
                target_key: public_key("target_key", fields.array_fixed("target_key")?)?,
                scoped_metadata_key: fields.scalar("scoped_metadata_key")?,
                target,
                value_size_delta: fields.scalar_as::<u16>("value_size_delta")? as i16,
                value: fields.vector("value")?.to_vec(),
            })
        }

        TransactionType::ModifyMosaicLevy => {
            let levy = fields.table("levy")?;
            TransactionBody::ModifyMosaicLevy(ModifyMosaicLevyTransaction {
                mosaic_id: MosaicId::new(fields.scalar("mosaic_id")?),
                levy: MosaicLevy {
                    levy_type: code(levy, "type", MosaicLevyType::from_code)?,
                    recipient: recipient(levy, "recipient")?,
                    mosaic_id: MosaicId::new(levy.scalar("mosaic_id")?),
                    fee: UInt64::new(levy.scalar("fee")?),
                },
            })
        }

        TransactionType::RemoveMosaicLevy => {
            TransactionBody::RemoveMosaicLevy(RemoveMosaicLevyTransaction {
                mosaic_id: MosaicId::new(fields.scalar("mosaic_id")?),
            })
        }

        TransactionType::ExchangeOfferAdd => {
            let offers = fields
                .table_array("offers")?
                .iter()
                .map(|o| {
                    Ok(AddExchangeOffer {
                        mosaic: read_offer_mosaic(o)?,
                        cost: UInt64::new(o.scalar("cost")?),
                        offer_type: code(o, "type", ExchangeOfferType::from_code)?,
                        duration: UInt64::new(o.scalar("duration")?),
                    })
                })
                .collect::<Result<Vec<_>, EncodingError>>()?;
            TransactionBody::ExchangeOfferAdd(ExchangeOfferAddTransaction { offers })
        }

        TransactionType::ExchangeOffer => {
            let offers = fields
                .table_array("offers")?
                .iter()
                .map(|o| {
                    Ok(ExchangeOffer {
                        mosaic: read_offer_mosaic(o)?,
                        cost: UInt64::new(o.scalar("cost")?),
                        offer_type: code(o, "type", ExchangeOfferType::from_code)?,
                        owner: public_key("owner", o.array_fixed("owner")?)?,
                    })
                })
                .collect::<Result<Vec<_>, EncodingError>>()?;
            TransactionBody::ExchangeOffer(ExchangeOfferTransaction { offers })
        }

        TransactionType::ExchangeOfferRemove => {
            let offers = fields
                .table_array("offers")?
                .iter()
                .map(|o| {
                    Ok(RemoveExchangeOffer {
                        mosaic_id: MosaicId::new(o.scalar("mosaic_id")?),
                        offer_type: code(o, "type", ExchangeOfferType::from_code)?,
                    })
                })
                .collect::<Result<Vec<_>, EncodingError>>()?;
            TransactionBody::ExchangeOfferRemove(ExchangeOfferRemoveTransaction { offers })
        }

        TransactionType::ModifyContract => {
            TransactionBody::ModifyContract(ModifyContractTransaction {
                duration_delta: fields.scalar("duration_delta")? as i64,
                content_hash: fields.array_fixed("hash")?,
                customers: read_cosignatory_modifications(fields.table_array("customers")?)?,
                executors: read_cosignatory_modifications(fields.table_array("executors")?)?,
                verifiers: read_cosignatory_modifications(fields.table_array("verifiers")?)?,
            })
        }

        TransactionType::BlockchainConfig => {
            TransactionBody::BlockchainConfig(BlockchainConfigTransaction {
                apply_height_delta: UInt64::new(fields.scalar("apply_height_delta")?),
                config: utf8("config", fields.vector("config")?)?,
                supported_entity_versions: utf8(
                    "entity_versions",
                    fields.vector("entity_versions")?,
                )?,
            })
        }

        TransactionType::BlockchainUpgrade => {
            TransactionBody::BlockchainUpgrade(BlockchainUpgradeTransaction {
                upgrade_period: UInt64::new(fields.scalar("upgrade_period")?),
                new_version: BlockchainVersion::from_value(fields.scalar("new_version")?),
            })
        }

        TransactionType::DrivePrepare => TransactionBody::DrivePrepare(DrivePrepareTransaction {
            owner: public_key("owner", fields.array_fixed("owner")?)?,
            duration: UInt64::new(fields.scalar("duration")?),
            billing_period: UInt64::new(fields.scalar("billing_period")?),
            billing_price: UInt64::new(fields.scalar("billing_price")?),
            drive_size: UInt64::new(fields.scalar("drive_size")?),
            replicas: fields.scalar_as("replicas")?,
            min_replicators: fields.scalar_as("min_replicators")?,
            percent_approvers: fields.scalar_as("percent_approvers")?,
        }),

        TransactionType::AggregateComplete | TransactionType::AggregateBonded => {
            TransactionBody::Aggregate(AggregateTransaction {
                bonded: transaction_type == TransactionType::AggregateBonded,
                inner: read_inner(fields.vector("transactions")?)?,
                cosignatures: Vec::new(),
            })
        }
    };
    Ok(body)
}

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

fn invalid(field: &'static str, reason: impl Into<String>) -> EncodingError {
    EncodingError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn nested_aggregate() -> EncodingError {
    invalid("type", "aggregate transactions cannot be embedded")
}

/// Reads a `u8`/`u16` code and maps it to its enum.
fn code<C, T>(fields: &FieldSet, field: &'static str, from_code: impl Fn(C) -> Option<T>) -> Result<T, EncodingError>
where
    C: TryFrom<u64> + std::fmt::Display + Copy,
{
    let raw: C = fields.scalar_as(field)?;
    from_code(raw).ok_or_else(|| invalid(field, format!("unknown code {raw}")))
}

fn utf8(field: &'static str, bytes: &[u8]) -> Result<String, EncodingError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| invalid(field, "not valid UTF-8"))
}

fn public_key(field: &'static str, bytes: [u8; 32]) -> Result<PublicKey, EncodingError> {
    PublicKey::from_bytes(bytes).map_err(|e| invalid(field, e.to_string()))
}

fn address(fields: &FieldSet, field: &'static str) -> Result<Address, EncodingError> {
    Address::from_bytes(fields.array_fixed(field)?).map_err(|e| invalid(field, e.to_string()))
}

fn recipient(fields: &FieldSet, field: &'static str) -> Result<Recipient, EncodingError> {
    Recipient::from_bytes(fields.array_fixed(field)?).map_err(|e| invalid(field, e.to_string()))
}

fn read_mosaic(fields: &FieldSet) -> Result<Mosaic, EncodingError> {
    Ok(Mosaic {
        id: MosaicId::new(fields.scalar("mosaic_id")?),
        amount: UInt64::new(fields.scalar("amount")?),
    })
}

fn read_message(fields: &FieldSet) -> Result<Message, EncodingError> {
    let payload = fields.vector("payload")?;
    match fields.scalar_as::<u8>("type")? {
        MESSAGE_TYPE_PLAIN => Ok(Message::Plain(utf8("message", payload)?)),
        MESSAGE_TYPE_SECURE => Ok(Message::Secure(payload.to_vec())),
        other => Err(invalid("message", format!("unknown message type {other}"))),
    }
}

fn read_offer_mosaic(fields: &FieldSet) -> Result<Mosaic, EncodingError> {
    Ok(Mosaic {
        id: MosaicId::new(fields.scalar("mosaic_id")?),
        amount: UInt64::new(fields.scalar("mosaic_amount")?),
    })
}

fn read_cosignatory_modifications(list: &[FieldSet]) -> Result<Vec<CosignatoryModification>, EncodingError> {
    list.iter()
        .map(|m| {
            Ok(CosignatoryModification {
                modification_type: code(m, "type", MultisigModificationType::from_code)?,
                cosignatory: public_key("cosignatory", m.array_fixed("cosignatory")?)?,
            })
        })
        .collect()
}

fn read_property_modifications<T>(
    list: &[FieldSet],
    value: impl Fn(&FieldSet) -> Result<T, EncodingError>,
) -> Result<Vec<PropertyModification<T>>, EncodingError> {
    list.iter()
        .map(|m| {
            Ok(PropertyModification {
                modification_type: code(m, "type", PropertyModificationType::from_code)?,
                value: value(m)?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
