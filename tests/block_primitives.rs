//! Integration tests for block, header, and locator wire behavior
//!
//! These exercise the public surface the way a node would: build blocks from
//! headers and transactions, push them through each serialization channel,
//! and classify them.

use std::sync::Arc;

use heliocoin::block::{Block, BlockHeader, BlockLocator};
use heliocoin::serialize::{ByteReader, Channel, WireDecode, WireEncode};
use heliocoin::transaction::{OutPoint, Transaction, TxInput, TxOutput};

/// Helper to build a current-version header with distinct field values.
fn sample_header(nonce: u32) -> BlockHeader {
    BlockHeader {
        version: BlockHeader::CURRENT_VERSION,
        parent_hash: [0x55; 32],
        merkle_root: [0x66; 32],
        time: 1_700_100_000,
        bits: 0x1c00_ffff,
        nonce,
    }
}

fn coinbase_tx(time: u32) -> Arc<Transaction> {
    Arc::new(Transaction::new(
        time,
        vec![TxInput::new(OutPoint::null(), vec![0x04, 0x01, 0x02, 0x03, 0x04])],
        vec![TxOutput::new(100_000_000, vec![0x76, 0xa9, 0x14])],
    ))
}

fn coinstake_tx(time: u32, kernel: OutPoint) -> Arc<Transaction> {
    Arc::new(Transaction::new(
        time,
        vec![TxInput::new(kernel, vec![0x47])],
        vec![
            TxOutput::new(0, Vec::new()),
            TxOutput::new(55_000_000, vec![0x21]),
            TxOutput::new(55_000_000, vec![0x21]),
        ],
    ))
}

#[test]
fn staked_block_full_cycle() {
    let kernel = OutPoint::new([0x42; 32], 1);
    let mut block = Block::from_header(&sample_header(0));
    block.transactions.push(coinbase_tx(1_700_100_000));
    block.transactions.push(coinstake_tx(1_700_100_060, kernel));
    block.signature = vec![0x30, 0x45, 0x02, 0x21];

    assert!(block.is_proof_of_stake());
    assert_eq!(block.proof_of_stake(), (kernel, 1_700_100_060));

    let bytes = block.wire_bytes(Channel::Full);
    let decoded = Block::from_wire_bytes(&bytes, Channel::Full).unwrap();
    assert_eq!(decoded, block);
    assert!(decoded.is_proof_of_stake());
    assert_eq!(decoded.proof_of_stake(), (kernel, 1_700_100_060));
    assert_eq!(decoded.hash(), block.hash());
}

#[test]
fn mined_block_full_cycle() {
    let mut block = Block::from_header(&sample_header(7));
    block.transactions.push(coinbase_tx(1_700_100_000));
    block.signature = vec![0x30];

    assert!(block.is_proof_of_work());
    assert_eq!(block.proof_of_stake(), (OutPoint::null(), 0));

    let bytes = block.wire_bytes(Channel::Full);
    let decoded = Block::from_wire_bytes(&bytes, Channel::Full).unwrap();
    assert_eq!(decoded, block);
    assert!(decoded.is_proof_of_work());
}

#[test]
fn header_announcement_carries_no_body() {
    let mut block = Block::from_header(&sample_header(7));
    block.transactions.push(coinbase_tx(1_700_100_000));
    block
        .transactions
        .push(coinstake_tx(1_700_100_060, OutPoint::new([0x42; 32], 1)));
    block.signature = vec![1; 64];

    let announcement = block.wire_bytes(Channel::HeaderOnly);
    assert_eq!(announcement.len(), BlockHeader::WIRE_SIZE);

    let received = Block::from_wire_bytes(&announcement, Channel::HeaderOnly).unwrap();
    assert!(received.transactions.is_empty());
    assert!(received.signature.is_empty());
    // The identity is intact even though the body was never sent.
    assert_eq!(received.hash(), block.hash());
}

#[test]
fn identity_and_pow_hashes_are_distinct_functions() {
    let header = sample_header(123_456);
    assert_ne!(header.hash(), header.pow_hash());

    // Both react to any header change.
    let mut other = header;
    other.nonce += 1;
    assert_ne!(other.hash(), header.hash());
    assert_ne!(other.pow_hash(), header.pow_hash());
}

#[test]
fn header_projection_matches_embedded_header() {
    let mut block = Block::from_header(&sample_header(9));
    block.transactions.push(coinbase_tx(1_700_100_000));
    let projected = block.header();
    assert_eq!(projected, sample_header(9));
    assert_eq!(projected.hash(), block.hash());
}

#[test]
fn locator_describes_chain_position_across_versions() {
    // Most recent first, with growing gaps, as chain traversal supplies them.
    let hashes: Vec<[u8; 32]> = (0u8..10).map(|i| [i; 32]).collect();
    let locator = BlockLocator::from_hashes(hashes.clone());

    for protocol_version in [60_002, 70_015] {
        let bytes = locator.wire_bytes(Channel::Full, protocol_version);
        let mut reader = ByteReader::new(&bytes);
        let (decoded, version) = BlockLocator::wire_decode(&mut reader, Channel::Full).unwrap();
        assert!(reader.is_empty());
        assert_eq!(version, protocol_version);
        assert_eq!(decoded.have, hashes);
    }
}

#[test]
fn truncated_streams_are_rejected_not_defaulted() {
    let mut block = Block::from_header(&sample_header(7));
    block.transactions.push(coinbase_tx(1_700_100_000));
    block.signature = vec![0xab; 16];
    let bytes = block.wire_bytes(Channel::Full);

    // Every proper prefix must fail to decode as a full block.
    for cut in 0..bytes.len() {
        assert!(
            Block::from_wire_bytes(&bytes[..cut], Channel::Full).is_err(),
            "prefix of {} bytes decoded unexpectedly",
            cut
        );
    }
}

#[test]
fn display_is_diagnostic_only() {
    let mut block = Block::from_header(&sample_header(7));
    block.transactions.push(coinbase_tx(1_700_100_000));
    let dump = block.to_string();
    assert!(dump.contains(&hex::encode(block.hash())));
    assert!(dump.contains("txs=1"));
}
