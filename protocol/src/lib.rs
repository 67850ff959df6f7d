// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Sirius Protocol Core
//!
//! Client-side construction, encoding and signing of transactions for
//! Catapult-family networks. Nothing here talks to a node: the output is a
//! signed payload and its hash, ready for whatever transport the caller
//! uses.
//!
//! ## Architecture
//!
//! - **crypto**: edwards25519 arithmetic, keys, the SHA3-512 signature
//!   scheme, hashes and secure-message encryption.
//! - **model**: value types shared by every transaction (addresses, ids,
//!   deadlines, mosaics, messages) and the identifier generator.
//! - **schema**: the schema-driven binary encoder and decoder.
//! - **transaction**: kinds, builders, codec, signing and cosigning.
//! - **config**: wire layout constants, limits and `NetworkContext`.
//! - **logging**: optional `tracing` subscriber setup.
//!
//! ## Example
//!
//! ```
//! use sirius_protocol::config::NetworkContext;
//! use sirius_protocol::crypto::KeyPair;
//! use sirius_protocol::model::{Address, Mosaic, MosaicId, NetworkType};
//! use sirius_protocol::transaction::{sign, TransactionBuilder, TransactionBuilderFactory};
//!
//! let sender = KeyPair::generate();
//! let factory = TransactionBuilderFactory::new(NetworkContext::new(NetworkType::TestNet));
//! let to = Address::from_public_key(&KeyPair::generate().public_key(), NetworkType::TestNet);
//!
//! let tx = factory
//!     .transfer(to.into())
//!     .mosaic(Mosaic::new(MosaicId::new(0x0DC6_7FBE_1CAD_29E3), 1_000_000))
//!     .build()
//!     .unwrap();
//! let signed = sign(&tx, &sender, None).unwrap();
//! assert_eq!(signed.hash_hex().len(), 64);
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod model;
pub mod schema;
pub mod transaction;

pub use error::{Error, Result};
