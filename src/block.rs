//! Block, header, and locator primitives
//!
//! Nodes collect transactions into a block, commit to them through the merkle
//! root, and search nonce values until the block's proof-of-work hash meets
//! the difficulty target encoded in `bits`. Staked blocks skip the search and
//! instead carry a coinstake transaction at index 1 whose first input is the
//! stake kernel. The block's identity hash is computed over the 80 header
//! bytes only; the body never contributes to identity.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::DiagnosticsConfig;
use crate::error::Result;
use crate::hashing::{double_sha256, scrypt_pow_hash, Hash256, NULL_HASH};
use crate::serialize::{
    write_compact_size, write_var_bytes, ByteReader, Channel, WireDecode, WireEncode,
};
use crate::transaction::{OutPoint, Transaction, TransactionRef};

/// The fixed-size identity record of a block. Everything needed for chain
/// linkage and difficulty verification lives here; the body is carried
/// separately by [`Block`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: i32,
    pub parent_hash: Hash256,
    pub merkle_root: Hash256,
    pub time: u32,
    /// Compact difficulty target. `0` is the null-header sentinel.
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    pub const LEGACY_VERSION_1: i32 = 1;
    pub const LEGACY_VERSION_2: i32 = 2;
    /// Blocks at this version and above carry an issuer signature.
    pub const CURRENT_VERSION: i32 = 3;

    /// Encoded size on the wire: 4 + 32 + 32 + 4 + 4 + 4.
    pub const WIRE_SIZE: usize = 80;

    pub fn set_null(&mut self) {
        self.version = 0;
        self.parent_hash = NULL_HASH;
        self.merkle_root = NULL_HASH;
        self.time = 0;
        self.bits = 0;
        self.nonce = 0;
    }

    /// `bits` is the sole determinant of nullity.
    pub fn is_null(&self) -> bool {
        self.bits == 0
    }

    /// Identity hash: double SHA-256 over the 80 header bytes. Used for chain
    /// linkage and referencing, never for difficulty comparison.
    pub fn hash(&self) -> Hash256 {
        double_sha256(&self.wire_bytes(Channel::IdentityHash))
    }

    /// Proof-of-work hash: scrypt over the same 80 bytes. This, not
    /// [`BlockHeader::hash`], is what difficulty comparisons run against.
    pub fn pow_hash(&self) -> Hash256 {
        scrypt_pow_hash(&self.wire_bytes(Channel::IdentityHash))
    }

    pub fn block_time(&self) -> i64 {
        i64::from(self.time)
    }
}

impl WireEncode for BlockHeader {
    fn wire_encode(&self, out: &mut Vec<u8>, _channel: Channel) {
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.parent_hash);
        out.extend_from_slice(&self.merkle_root);
        out.extend_from_slice(&self.time.to_le_bytes());
        out.extend_from_slice(&self.bits.to_le_bytes());
        out.extend_from_slice(&self.nonce.to_le_bytes());
    }
}

impl WireDecode for BlockHeader {
    fn wire_decode(reader: &mut ByteReader<'_>, _channel: Channel) -> Result<Self> {
        Ok(Self {
            version: reader.read_i32_le()?,
            parent_hash: reader.read_hash()?,
            merkle_root: reader.read_hash()?,
            time: reader.read_u32_le()?,
            bits: reader.read_u32_le()?,
            nonce: reader.read_u32_le()?,
        })
    }
}

/// A header plus its body: the transaction list and, from
/// [`BlockHeader::CURRENT_VERSION`] on, the issuer signature that
/// authenticates a staked block.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    /// Index 0 is the coinbase; for proof-of-stake blocks index 1 is the
    /// coinstake transaction.
    pub transactions: Vec<TransactionRef>,
    /// Issuer signature; on the wire only when `version >= CURRENT_VERSION`.
    pub signature: Vec<u8>,
    /// Memoizes "contextual validity already verified". Not part of identity,
    /// equality, or the wire form; single writer or external synchronization.
    #[serde(skip)]
    checked: AtomicBool,
}

impl Block {
    pub fn from_header(header: &BlockHeader) -> Self {
        Self {
            header: *header,
            transactions: Vec::new(),
            signature: Vec::new(),
            checked: AtomicBool::new(false),
        }
    }

    pub fn set_null(&mut self) {
        self.header.set_null();
        self.transactions.clear();
        self.signature.clear();
        self.checked.store(false, Ordering::Relaxed);
    }

    /// Pure projection of the header fields.
    pub fn header(&self) -> BlockHeader {
        self.header
    }

    pub fn hash(&self) -> Hash256 {
        self.header.hash()
    }

    pub fn pow_hash(&self) -> Hash256 {
        self.header.pow_hash()
    }

    pub fn block_time(&self) -> i64 {
        self.header.block_time()
    }

    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::Relaxed)
    }

    /// Mutable through a shared view: this is a memoization cell, not state.
    pub fn mark_checked(&self, checked: bool) {
        self.checked.store(checked, Ordering::Relaxed);
    }

    /// A block is proof-of-stake iff it has a coinstake transaction at
    /// index 1. The length check must happen first: a block with fewer than
    /// two transactions has no index 1 to classify.
    pub fn is_proof_of_stake(&self) -> bool {
        match self.transactions.get(1) {
            Some(tx) => tx.is_coinstake(),
            None => false,
        }
    }

    pub fn is_proof_of_work(&self) -> bool {
        !self.is_proof_of_stake()
    }

    /// The stake kernel: the coinstake's first-input prevout and its declared
    /// time. Null outpoint and `0` for proof-of-work blocks.
    pub fn proof_of_stake(&self) -> (OutPoint, u32) {
        match self.transactions.get(1) {
            Some(tx) if tx.is_coinstake() => (tx.inputs[0].prevout, tx.time),
            _ => (OutPoint::null(), 0),
        }
    }

    /// One bit of this block's contribution to the chain-wide stake modifier:
    /// the least-significant bit of the identity hash's low 64 bits. A pure
    /// function of the block hash; `time` and `diag` only feed the optional
    /// diagnostic line.
    pub fn stake_entropy_bit(&self, time: u32, diag: Option<&DiagnosticsConfig>) -> u32 {
        let hash = self.hash();
        let mut low = [0u8; 8];
        low.copy_from_slice(&hash[..8]);
        let bit = (u64::from_le_bytes(low) & 1) as u32;
        if diag.is_some_and(|d| d.print_stake_modifier) {
            tracing::debug!(
                time,
                block_hash = %hex::encode(hash),
                entropy_bit = bit,
                "stake entropy bit"
            );
        }
        bit
    }
}

impl Clone for Block {
    fn clone(&self) -> Self {
        Self {
            header: self.header,
            transactions: self.transactions.clone(),
            signature: self.signature.clone(),
            checked: AtomicBool::new(self.checked.load(Ordering::Relaxed)),
        }
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        // `checked` is a transient cache and never part of equality.
        self.header == other.header
            && self.transactions == other.transactions
            && self.signature == other.signature
    }
}

impl Eq for Block {}

impl WireEncode for Block {
    fn wire_encode(&self, out: &mut Vec<u8>, channel: Channel) {
        self.header.wire_encode(out, channel);
        if channel.is_header_only() {
            return;
        }
        // The transaction list follows the header directly so disk positions
        // can be derived while connecting a block.
        write_compact_size(out, self.transactions.len() as u64);
        for tx in &self.transactions {
            tx.wire_encode(out, channel);
        }
        if self.header.version >= BlockHeader::CURRENT_VERSION {
            write_var_bytes(out, &self.signature);
        }
    }
}

impl WireDecode for Block {
    fn wire_decode(reader: &mut ByteReader<'_>, channel: Channel) -> Result<Self> {
        let header = BlockHeader::wire_decode(reader, channel)?;
        let mut block = Block::from_header(&header);
        if channel.is_header_only() {
            // Body fields stay cleared regardless of what the sender held.
            return Ok(block);
        }
        let tx_count = reader.read_compact_size()?;
        block.transactions.reserve(tx_count as usize);
        for _ in 0..tx_count {
            block
                .transactions
                .push(Arc::new(Transaction::wire_decode(reader, channel)?));
        }
        // Legacy-version blocks have no signature field in the stream at all.
        if header.version >= BlockHeader::CURRENT_VERSION {
            block.signature = reader.read_var_bytes()?;
        }
        Ok(block)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Block(hash={}, ver={}, parent={}, merkle={}, time={}, bits={:08x}, nonce={}, txs={}, sig={} bytes)",
            hex::encode(self.hash()),
            self.header.version,
            hex::encode(self.header.parent_hash),
            hex::encode(self.header.merkle_root),
            self.header.time,
            self.header.bits,
            self.header.nonce,
            self.transactions.len(),
            self.signature.len(),
        )?;
        for tx in &self.transactions {
            writeln!(f, "  {}", tx.hash_str())?;
        }
        Ok(())
    }
}

/// Describes a place in the chain to another node: a sparse, ordered list of
/// ancestor hashes, most recent first with growing gaps further back. If the
/// other node is on a different branch it can still find a recent common
/// trunk. The back-off walk that produces the sequence lives in the chain
/// traversal logic; this type only carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLocator {
    pub have: Vec<Hash256>,
}

impl BlockLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_hashes(have: Vec<Hash256>) -> Self {
        Self { have }
    }

    pub fn set_null(&mut self) {
        self.have.clear();
    }

    pub fn is_null(&self) -> bool {
        self.have.is_empty()
    }

    /// Locators are never hashed as identity objects, so only the
    /// identity-hash channel omits the protocol-version prefix; every other
    /// channel carries it for wire compatibility across protocol revisions.
    pub fn wire_encode(&self, out: &mut Vec<u8>, channel: Channel, protocol_version: i32) {
        if !channel.is_identity_hash() {
            out.extend_from_slice(&protocol_version.to_le_bytes());
        }
        write_compact_size(out, self.have.len() as u64);
        for hash in &self.have {
            out.extend_from_slice(hash);
        }
    }

    pub fn wire_bytes(&self, channel: Channel, protocol_version: i32) -> Vec<u8> {
        let mut out = Vec::new();
        self.wire_encode(&mut out, channel, protocol_version);
        out
    }

    /// Decodes a locator and surfaces the protocol version read from the
    /// stream (`0` on the identity-hash channel, which carries none).
    pub fn wire_decode(reader: &mut ByteReader<'_>, channel: Channel) -> Result<(Self, i32)> {
        let protocol_version = if channel.is_identity_hash() {
            0
        } else {
            reader.read_i32_le()?
        };
        let count = reader.read_compact_size()?;
        let mut have = Vec::with_capacity(count as usize);
        for _ in 0..count {
            have.push(reader.read_hash()?);
        }
        Ok((Self { have }, protocol_version))
    }
}
