//! Binary layouts of every transaction kind.
//!
//! A transaction is encoded as one table: [`TRANSACTION_HEADER`] (or
//! [`EMBEDDED_HEADER`] inside an aggregate) followed by the body schema
//! returned by [`body_schema`]. Field order is the order of the flat
//! payload, so every count and size field sits before the content it
//! describes.

use super::types::TransactionType;
use crate::schema::{Count, Field, Len, Schema, Width};

pub static TRANSACTION_HEADER: Schema = Schema {
    name: "transaction_header",
    fields: &[
        Field::scalar("size", Width::U32),
        Field::array("signature", 64),
        Field::array("signer", 32),
        Field::scalar("reserved", Width::U32),
        Field::scalar("version", Width::U16),
        Field::scalar("type", Width::U16),
        Field::scalar("max_fee", Width::U64),
        Field::scalar("deadline", Width::U64),
    ],
};

pub static EMBEDDED_HEADER: Schema = Schema {
    name: "embedded_header",
    fields: &[
        Field::scalar("size", Width::U32),
        Field::scalar("reserved", Width::U32),
        Field::scalar("version", Width::U16),
        Field::scalar("type", Width::U16),
    ],
};

// ---------------------------------------------------------------------------
// Nested tables
// ---------------------------------------------------------------------------

static MOSAIC: Schema = Schema {
    name: "mosaic",
    fields: &[
        Field::scalar("id", Width::U64),
        Field::scalar("amount", Width::U64),
    ],
};

/// `message_size` in the enclosing transfer counts the type byte.
static MESSAGE: Schema = Schema {
    name: "message",
    fields: &[
        Field::scalar("type", Width::U8),
        Field::vector("payload", Len::Field { name: "message_size", bias: 1 }),
    ],
};

static MOSAIC_PROPERTY: Schema = Schema {
    name: "mosaic_property",
    fields: &[
        Field::scalar("id", Width::U8),
        Field::scalar("value", Width::U64),
    ],
};

static COSIGNATORY_MODIFICATION: Schema = Schema {
    name: "cosignatory_modification",
    fields: &[
        Field::scalar("type", Width::U8),
        Field::array("cosignatory", 32),
    ],
};

static ADDRESS_PROPERTY_MODIFICATION: Schema = Schema {
    name: "address_property_modification",
    fields: &[Field::scalar("type", Width::U8), Field::array("value", 25)],
};

static MOSAIC_PROPERTY_MODIFICATION: Schema = Schema {
    name: "mosaic_property_modification",
    fields: &[
        Field::scalar("type", Width::U8),
        Field::scalar("value", Width::U64),
    ],
};

static ENTITY_TYPE_PROPERTY_MODIFICATION: Schema = Schema {
    name: "entity_type_property_modification",
    fields: &[
        Field::scalar("type", Width::U8),
        Field::scalar("value", Width::U16),
    ],
};

/// `size` covers the whole modification, its own four bytes included.
static METADATA_MODIFICATION: Schema = Schema {
    name: "metadata_modification",
    fields: &[
        Field::scalar("size", Width::U32),
        Field::scalar("type", Width::U8),
        Field::scalar("key_size", Width::U8),
        Field::scalar("value_size", Width::U16),
        Field::vector("key", Len::of("key_size")),
        Field::vector("value", Len::of("value_size")),
    ],
};

static MOSAIC_LEVY: Schema = Schema {
    name: "mosaic_levy",
    fields: &[
        Field::scalar("type", Width::U8),
        Field::array("recipient", 25),
        Field::scalar("mosaic_id", Width::U64),
        Field::scalar("fee", Width::U64),
    ],
};

static ADD_EXCHANGE_OFFER: Schema = Schema {
    name: "add_exchange_offer",
    fields: &[
        Field::scalar("mosaic_id", Width::U64),
        Field::scalar("mosaic_amount", Width::U64),
        Field::scalar("cost", Width::U64),
        Field::scalar("type", Width::U8),
        Field::scalar("duration", Width::U64),
    ],
};

static EXCHANGE_OFFER: Schema = Schema {
    name: "exchange_offer",
    fields: &[
        Field::scalar("mosaic_id", Width::U64),
        Field::scalar("mosaic_amount", Width::U64),
        Field::scalar("cost", Width::U64),
        Field::scalar("type", Width::U8),
        Field::array("owner", 32),
    ],
};

static REMOVE_EXCHANGE_OFFER: Schema = Schema {
    name: "remove_exchange_offer",
    fields: &[
        Field::scalar("mosaic_id", Width::U64),
        Field::scalar("type", Width::U8),
    ],
};

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

static TRANSFER: Schema = Schema {
    name: "transfer",
    fields: &[
        Field::array("recipient", 25),
        Field::scalar("message_size", Width::U16),
        Field::scalar("mosaics_count", Width::U8),
        Field::table("message", &MESSAGE),
        Field::table_array("mosaics", &MOSAIC, Count::Field("mosaics_count")),
    ],
};

static MOSAIC_DEFINITION: Schema = Schema {
    name: "mosaic_definition",
    fields: &[
        Field::scalar("nonce", Width::U32),
        Field::scalar("mosaic_id", Width::U64),
        Field::scalar("properties_count", Width::U8),
        Field::scalar("flags", Width::U8),
        Field::scalar("divisibility", Width::U8),
        Field::table_array("properties", &MOSAIC_PROPERTY, Count::Field("properties_count")),
    ],
};

static MOSAIC_SUPPLY_CHANGE: Schema = Schema {
    name: "mosaic_supply_change",
    fields: &[
        Field::scalar("mosaic_id", Width::U64),
        Field::scalar("direction", Width::U8),
        Field::scalar("delta", Width::U64),
    ],
};

static REGISTER_NAMESPACE: Schema = Schema {
    name: "register_namespace",
    fields: &[
        Field::scalar("namespace_type", Width::U8),
        Field::scalar("duration_or_parent", Width::U64),
        Field::scalar("namespace_id", Width::U64),
        Field::scalar("name_size", Width::U8),
        Field::vector("name", Len::of("name_size")),
    ],
};

static ADDRESS_ALIAS: Schema = Schema {
    name: "address_alias",
    fields: &[
        Field::scalar("action", Width::U8),
        Field::scalar("namespace_id", Width::U64),
        Field::array("address", 25),
    ],
};

static MOSAIC_ALIAS: Schema = Schema {
    name: "mosaic_alias",
    fields: &[
        Field::scalar("action", Width::U8),
        Field::scalar("namespace_id", Width::U64),
        Field::scalar("mosaic_id", Width::U64),
    ],
};

static MODIFY_MULTISIG_ACCOUNT: Schema = Schema {
    name: "modify_multisig_account",
    fields: &[
        Field::scalar("min_removal_delta", Width::U8),
        Field::scalar("min_approval_delta", Width::U8),
        Field::scalar("modifications_count", Width::U8),
        Field::table_array(
            "modifications",
            &COSIGNATORY_MODIFICATION,
            Count::Field("modifications_count"),
        ),
    ],
};

static ACCOUNT_PROPERTIES_ADDRESS: Schema = Schema {
    name: "account_properties_address",
    fields: &[
        Field::scalar("property_type", Width::U8),
        Field::scalar("modifications_count", Width::U8),
        Field::table_array(
            "modifications",
            &ADDRESS_PROPERTY_MODIFICATION,
            Count::Field("modifications_count"),
        ),
    ],
};

static ACCOUNT_PROPERTIES_MOSAIC: Schema = Schema {
    name: "account_properties_mosaic",
    fields: &[
        Field::scalar("property_type", Width::U8),
        Field::scalar("modifications_count", Width::U8),
        Field::table_array(
            "modifications",
            &MOSAIC_PROPERTY_MODIFICATION,
            Count::Field("modifications_count"),
        ),
    ],
};

static ACCOUNT_PROPERTIES_ENTITY_TYPE: Schema = Schema {
    name: "account_properties_entity_type",
    fields: &[
        Field::scalar("property_type", Width::U8),
        Field::scalar("modifications_count", Width::U8),
        Field::table_array(
            "modifications",
            &ENTITY_TYPE_PROPERTY_MODIFICATION,
            Count::Field("modifications_count"),
        ),
    ],
};

static LOCK_FUNDS: Schema = Schema {
    name: "lock_funds",
    fields: &[
        Field::scalar("mosaic_id", Width::U64),
        Field::scalar("amount", Width::U64),
        Field::scalar("duration", Width::U64),
        Field::array("hash", 32),
    ],
};

static SECRET_LOCK: Schema = Schema {
    name: "secret_lock",
    fields: &[
        Field::scalar("mosaic_id", Width::U64),
        Field::scalar("amount", Width::U64),
        Field::scalar("duration", Width::U64),
        Field::scalar("hash_type", Width::U8),
        Field::array("secret", 32),
        Field::array("recipient", 25),
    ],
};

static SECRET_PROOF: Schema = Schema {
    name: "secret_proof",
    fields: &[
        Field::scalar("hash_type", Width::U8),
        Field::array("secret", 32),
        Field::array("recipient", 25),
        Field::scalar("proof_size", Width::U16),
        Field::vector("proof", Len::of("proof_size")),
    ],
};

/// Modifications carry their own sizes and run to the end of the body.
static MODIFY_ADDRESS_METADATA: Schema = Schema {
    name: "modify_address_metadata",
    fields: &[
        Field::scalar("metadata_type", Width::U8),
        Field::array("target", 25),
        Field::table_array("modifications", &METADATA_MODIFICATION, Count::Rest),
    ],
};

static MODIFY_MOSAIC_METADATA: Schema = Schema {
    name: "modify_mosaic_metadata",
    fields: &[
        Field::scalar("metadata_type", Width::U8),
        Field::scalar("target", Width::U64),
        Field::table_array("modifications", &METADATA_MODIFICATION, Count::Rest),
    ],
};

static MODIFY_NAMESPACE_METADATA: Schema = Schema {
    name: "modify_namespace_metadata",
    fields: &[
        Field::scalar("metadata_type", Width::U8),
        Field::scalar("target", Width::U64),
        Field::table_array("modifications", &METADATA_MODIFICATION, Count::Rest),
    ],
};

static ACCOUNT_METADATA: Schema = Schema {
    name: "account_metadata",
    fields: &[
        Field::array("target_key", 32),
        Field::scalar("scoped_metadata_key", Width::U64),
        Field::scalar("value_size_delta", Width::U16),
        Field::scalar("value_size", Width::U16),
        Field::vector("value", Len::of("value_size")),
    ],
};

/// Shared by mosaic and namespace metadata; `target_id` is the mosaic or
/// namespace id.
static ENTITY_METADATA: Schema = Schema {
    name: "entity_metadata",
    fields: &[
        Field::array("target_key", 32),
        Field::scalar("scoped_metadata_key", Width::U64),
        Field::scalar("target_id", Width::U64),
        Field::scalar("value_size_delta", Width::U16),
        Field::scalar("value_size", Width::U16),
        Field::vector("value", Len::of("value_size")),
    ],
};

static MODIFY_MOSAIC_LEVY: Schema = Schema {
    name: "modify_mosaic_levy",
    fields: &[
        Field::scalar("mosaic_id", Width::U64),
        Field::table("levy", &MOSAIC_LEVY),
    ],
};

static REMOVE_MOSAIC_LEVY: Schema = Schema {
    name: "remove_mosaic_levy",
    fields: &[Field::scalar("mosaic_id", Width::U64)],
};

static EXCHANGE_OFFER_ADD: Schema = Schema {
    name: "exchange_offer_add",
    fields: &[
        Field::scalar("offers_count", Width::U8),
        Field::table_array("offers", &ADD_EXCHANGE_OFFER, Count::Field("offers_count")),
    ],
};

static EXCHANGE_OFFER_ACCEPT: Schema = Schema {
    name: "exchange_offer",
    fields: &[
        Field::scalar("offers_count", Width::U8),
        Field::table_array("offers", &EXCHANGE_OFFER, Count::Field("offers_count")),
    ],
};

static EXCHANGE_OFFER_REMOVE: Schema = Schema {
    name: "exchange_offer_remove",
    fields: &[
        Field::scalar("offers_count", Width::U8),
        Field::table_array("offers", &REMOVE_EXCHANGE_OFFER, Count::Field("offers_count")),
    ],
};

static MODIFY_CONTRACT: Schema = Schema {
    name: "modify_contract",
    fields: &[
        Field::scalar("duration_delta", Width::U64),
        Field::array("hash", 32),
        Field::scalar("customers_count", Width::U8),
        Field::scalar("executors_count", Width::U8),
        Field::scalar("verifiers_count", Width::U8),
        Field::table_array(
            "customers",
            &COSIGNATORY_MODIFICATION,
            Count::Field("customers_count"),
        ),
        Field::table_array(
            "executors",
            &COSIGNATORY_MODIFICATION,
            Count::Field("executors_count"),
        ),
        Field::table_array(
            "verifiers",
            &COSIGNATORY_MODIFICATION,
            Count::Field("verifiers_count"),
        ),
    ],
};

static BLOCKCHAIN_CONFIG: Schema = Schema {
    name: "blockchain_config",
    fields: &[
        Field::scalar("apply_height_delta", Width::U64),
        Field::scalar("config_size", Width::U16),
        Field::scalar("entity_versions_size", Width::U16),
        Field::vector("config", Len::of("config_size")),
        Field::vector("entity_versions", Len::of("entity_versions_size")),
    ],
};

static BLOCKCHAIN_UPGRADE: Schema = Schema {
    name: "blockchain_upgrade",
    fields: &[
        Field::scalar("upgrade_period", Width::U64),
        Field::scalar("new_version", Width::U64),
    ],
};

static DRIVE_PREPARE: Schema = Schema {
    name: "drive_prepare",
    fields: &[
        Field::array("owner", 32),
        Field::scalar("duration", Width::U64),
        Field::scalar("billing_period", Width::U64),
        Field::scalar("billing_price", Width::U64),
        Field::scalar("drive_size", Width::U64),
        Field::scalar("replicas", Width::U16),
        Field::scalar("min_replicators", Width::U16),
        Field::scalar("percent_approvers", Width::U8),
    ],
};

/// Inner transactions, back to back. Cosignatures follow the table and are
/// not part of the schema.
static AGGREGATE: Schema = Schema {
    name: "aggregate",
    fields: &[
        Field::scalar("transactions_size", Width::U32),
        Field::vector("transactions", Len::of("transactions_size")),
    ],
};

pub fn body_schema(transaction_type: TransactionType) -> &'static Schema {
    match transaction_type {
        TransactionType::Transfer => &TRANSFER,
        TransactionType::MosaicDefinition => &MOSAIC_DEFINITION,
        TransactionType::MosaicSupplyChange => &MOSAIC_SUPPLY_CHANGE,
        TransactionType::RegisterNamespace => &REGISTER_NAMESPACE,
        TransactionType::AddressAlias => &ADDRESS_ALIAS,
        TransactionType::MosaicAlias => &MOSAIC_ALIAS,
        TransactionType::ModifyMultisigAccount => &MODIFY_MULTISIG_ACCOUNT,
        TransactionType::AggregateComplete | TransactionType::AggregateBonded => &AGGREGATE,
        TransactionType::LockFunds => &LOCK_FUNDS,
        TransactionType::AccountPropertiesAddress => &ACCOUNT_PROPERTIES_ADDRESS,
        TransactionType::AccountPropertiesMosaic => &ACCOUNT_PROPERTIES_MOSAIC,
        TransactionType::AccountPropertiesEntityType => &ACCOUNT_PROPERTIES_ENTITY_TYPE,
        TransactionType::SecretLock => &SECRET_LOCK,
        TransactionType::SecretProof => &SECRET_PROOF,
        TransactionType::AccountLink => &ACCOUNT_LINK,
        TransactionType::ModifyAddressMetadata => &MODIFY_ADDRESS_METADATA,
        TransactionType::ModifyMosaicMetadata => &MODIFY_MOSAIC_METADATA,
        TransactionType::ModifyNamespaceMetadata => &MODIFY_NAMESPACE_METADATA,
        TransactionType::AccountMetadata => &ACCOUNT_METADATA,
        TransactionType::MosaicMetadata | TransactionType::NamespaceMetadata => &ENTITY_METADATA,
        TransactionType::ModifyMosaicLevy => &MODIFY_MOSAIC_LEVY,
        TransactionType::RemoveMosaicLevy => &REMOVE_MOSAIC_LEVY,
        TransactionType::ExchangeOfferAdd => &EXCHANGE_OFFER_ADD,
        TransactionType::ExchangeOffer => &EXCHANGE_OFFER_ACCEPT,
        TransactionType::ExchangeOfferRemove => &EXCHANGE_OFFER_REMOVE,
        TransactionType::ModifyContract => &MODIFY_CONTRACT,
        TransactionType::BlockchainConfig => &BLOCKCHAIN_CONFIG,
        TransactionType::BlockchainUpgrade => &BLOCKCHAIN_UPGRADE,
        TransactionType::DrivePrepare => &DRIVE_PREPARE,
    }
}

static ACCOUNT_LINK: Schema = Schema {
    name: "account_link",
    fields: &[
        Field::array("remote_public_key", 32),
        Field::scalar("action", Width::U8),
    ],
};
