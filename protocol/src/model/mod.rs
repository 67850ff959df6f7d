//! # Value Types
//!
//! The vocabulary transactions are written in: 64-bit values, network
//! identifiers, deadlines, addresses, mosaics, namespaces and messages,
//! plus the deterministic id generator for the last two.

pub mod address;
pub mod deadline;
pub mod id_generator;
pub mod message;
pub mod mosaic;
pub mod namespace;
pub mod network;
pub mod uint64;

pub use address::{Address, Recipient, ADDRESS_LENGTH};
pub use deadline::Deadline;
pub use id_generator::{derive_mosaic_id, derive_namespace_id, namespace_path};
pub use message::Message;
pub use mosaic::{Mosaic, MosaicId, MosaicNonce, MosaicProperties};
pub use namespace::NamespaceId;
pub use network::{GenerationHash, NetworkType};
pub use uint64::UInt64;
