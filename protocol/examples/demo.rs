//! Walkthrough of the client pipeline: keys, a transfer, and a bonded
//! aggregate with a funds lock and two cosigners.
//!
//! Run with:
//!   RUST_LOG=sirius_protocol=debug cargo run --example demo

use std::time::Instant;

use sirius_protocol::config::NetworkContext;
use sirius_protocol::crypto::KeyPair;
use sirius_protocol::logging::{init_logging, LogFormat};
use sirius_protocol::model::{Address, GenerationHash, Message, Mosaic, MosaicId, NetworkType};
use sirius_protocol::transaction::{
    assemble, cosign, sign, verify_signed, FeeStrategy, TransactionBuilder,
    TransactionBuilderFactory,
};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}[{num}]{RESET} {BOLD}{WHITE}{title}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}  [{label}: {ms:.2} ms]{RESET}");
}

const XPX: MosaicId = MosaicId::new(0x0DC6_7FBE_1CAD_29E3);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("info", LogFormat::Pretty)?;

    let network = NetworkType::MijinTest;
    let generation_hash =
        GenerationHash::from_hex("7B631D803F912B00DC0CBED3014BBD17A302BA50B99D233B9C2D9533B842ABB6")?;
    let context = NetworkContext::new(network)
        .with_generation_hash(generation_hash)
        .with_fee_strategy(FeeStrategy::low());
    let factory = TransactionBuilderFactory::new(context);

    section(1, "Accounts");
    let alice = KeyPair::generate();
    let bob = KeyPair::generate();
    let carol = KeyPair::generate();
    for (name, kp) in [("alice", &alice), ("bob", &bob), ("carol", &carol)] {
        let address = Address::from_public_key(&kp.public_key(), network);
        info(name, &address.pretty());
    }

    section(2, "Transfer");
    let start = Instant::now();
    let transfer = factory
        .transfer(Address::from_public_key(&bob.public_key(), network).into())
        .mosaic(Mosaic::new(XPX, 1_000_000))
        .message(Message::plain("lunch"))
        .build()?;
    let signed = sign(&transfer, &alice, Some(&generation_hash))?;
    timing("build + sign", start.elapsed());
    info("max fee", &transfer.max_fee.to_string());
    info("hash", &signed.hash_hex());
    info("size", &signed.size().to_string());
    verify_signed(&signed, Some(&generation_hash))?;
    success("transfer verifies");

    section(3, "Bonded aggregate");
    let inner = [&carol, &alice]
        .into_iter()
        .map(|to| {
            factory
                .transfer(Address::from_public_key(&to.public_key(), network).into())
                .mosaic(Mosaic::new(XPX, 10))
                .build_embedded()
        })
        .collect::<Result<Vec<_>, _>>()?;
    let aggregate = factory.aggregate_bonded().inner_transactions(inner).build()?;
    let signed_aggregate = sign(&aggregate, &alice, Some(&generation_hash))?;
    info("aggregate hash", &signed_aggregate.hash_hex());

    let lock = factory
        .lock_funds(Mosaic::new(XPX, 10_000_000), 480)
        .signed_transaction(&signed_aggregate)
        .build()?;
    let signed_lock = sign(&lock, &alice, Some(&generation_hash))?;
    info("lock hash", &signed_lock.hash_hex());

    let cosignatures = [
        cosign(signed_aggregate.hash(), &bob),
        cosign(signed_aggregate.hash(), &carol),
    ];
    let complete = assemble(&signed_aggregate, &cosignatures)?;
    verify_signed(&complete, Some(&generation_hash))?;
    info("final size", &complete.size().to_string());
    success("aggregate carries every cosignature");

    Ok(())
}
