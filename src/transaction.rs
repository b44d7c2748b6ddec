//! Transaction types consumed by the block core
//!
//! The block primitives only need a thin slice of the transaction model:
//! coinbase/coinstake classification, the first input's previous-output
//! reference (the stake kernel), the declared transaction time, and a
//! canonical wire form so blocks round-trip byte-exactly. Script execution
//! and signature checking live elsewhere.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hashing::{double_sha256, is_null_hash, Hash256, NULL_HASH};
use crate::serialize::{
    write_compact_size, write_var_bytes, ByteReader, Channel, WireDecode, WireEncode,
};

/// Shared reference to an immutable transaction. Multiple blocks may hold the
/// same transaction during a reorganization; the longest-lived holder governs
/// the lifetime.
pub type TransactionRef = Arc<Transaction>;

/// Reference to a specific output of a previous transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash256,
    pub index: u32,
}

impl OutPoint {
    pub fn new(hash: Hash256, index: u32) -> Self {
        Self { hash, index }
    }

    /// The null sentinel: all-zero hash, index `u32::MAX`.
    pub fn null() -> Self {
        Self {
            hash: NULL_HASH,
            index: u32::MAX,
        }
    }

    pub fn is_null(&self) -> bool {
        is_null_hash(&self.hash) && self.index == u32::MAX
    }
}

impl Default for OutPoint {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", &hex::encode(self.hash)[..16], self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    pub prevout: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

impl TxInput {
    pub fn new(prevout: OutPoint, script_sig: Vec<u8>) -> Self {
        Self {
            prevout,
            script_sig,
            sequence: u32::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub value: i64,
    pub script_pubkey: Vec<u8>,
}

impl TxOutput {
    pub fn new(value: i64, script_pubkey: Vec<u8>) -> Self {
        Self {
            value,
            script_pubkey,
        }
    }

    /// The coinstake marker output: no value, no script.
    pub fn is_empty(&self) -> bool {
        self.value == 0 && self.script_pubkey.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    /// Declared transaction time; for a coinstake this is the stake kernel
    /// timestamp.
    pub time: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u32,
}

impl Transaction {
    pub const CURRENT_VERSION: i32 = 1;

    pub fn new(time: u32, inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            time,
            inputs,
            outputs,
            lock_time: 0,
        }
    }

    /// A coinbase spends nothing: exactly one input with a null prevout.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_null()
    }

    /// A coinstake spends a real output and marks itself with an empty first
    /// output followed by the stake payout(s).
    pub fn is_coinstake(&self) -> bool {
        !self.inputs.is_empty()
            && !self.inputs[0].prevout.is_null()
            && self.outputs.len() >= 2
            && self.outputs[0].is_empty()
    }

    /// Identity hash of the full wire form.
    pub fn hash(&self) -> Hash256 {
        double_sha256(&self.wire_bytes(Channel::Full))
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash())
    }
}

impl WireEncode for TxInput {
    fn wire_encode(&self, out: &mut Vec<u8>, _channel: Channel) {
        out.extend_from_slice(&self.prevout.hash);
        out.extend_from_slice(&self.prevout.index.to_le_bytes());
        write_var_bytes(out, &self.script_sig);
        out.extend_from_slice(&self.sequence.to_le_bytes());
    }
}

impl WireDecode for TxInput {
    fn wire_decode(reader: &mut ByteReader<'_>, _channel: Channel) -> Result<Self> {
        let hash = reader.read_hash()?;
        let index = reader.read_u32_le()?;
        let script_sig = reader.read_var_bytes()?;
        let sequence = reader.read_u32_le()?;
        Ok(Self {
            prevout: OutPoint::new(hash, index),
            script_sig,
            sequence,
        })
    }
}

impl WireEncode for TxOutput {
    fn wire_encode(&self, out: &mut Vec<u8>, _channel: Channel) {
        out.extend_from_slice(&self.value.to_le_bytes());
        write_var_bytes(out, &self.script_pubkey);
    }
}

impl WireDecode for TxOutput {
    fn wire_decode(reader: &mut ByteReader<'_>, _channel: Channel) -> Result<Self> {
        let value = reader.read_i64_le()?;
        let script_pubkey = reader.read_var_bytes()?;
        Ok(Self {
            value,
            script_pubkey,
        })
    }
}

impl WireEncode for Transaction {
    fn wire_encode(&self, out: &mut Vec<u8>, channel: Channel) {
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.time.to_le_bytes());
        write_compact_size(out, self.inputs.len() as u64);
        for input in &self.inputs {
            input.wire_encode(out, channel);
        }
        write_compact_size(out, self.outputs.len() as u64);
        for output in &self.outputs {
            output.wire_encode(out, channel);
        }
        out.extend_from_slice(&self.lock_time.to_le_bytes());
    }
}

impl WireDecode for Transaction {
    fn wire_decode(reader: &mut ByteReader<'_>, channel: Channel) -> Result<Self> {
        let version = reader.read_i32_le()?;
        let time = reader.read_u32_le()?;
        let input_count = reader.read_compact_size()?;
        let mut inputs = Vec::with_capacity(input_count as usize);
        for _ in 0..input_count {
            inputs.push(TxInput::wire_decode(reader, channel)?);
        }
        let output_count = reader.read_compact_size()?;
        let mut outputs = Vec::with_capacity(output_count as usize);
        for _ in 0..output_count {
            outputs.push(TxOutput::wire_decode(reader, channel)?);
        }
        let lock_time = reader.read_u32_le()?;
        Ok(Self {
            version,
            time,
            inputs,
            outputs,
            lock_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coinbase() -> Transaction {
        Transaction::new(
            1_700_000_000,
            vec![TxInput::new(OutPoint::null(), vec![0x51])],
            vec![TxOutput::new(50_000_000, vec![0xaa; 25])],
        )
    }

    fn coinstake() -> Transaction {
        Transaction::new(
            1_700_000_600,
            vec![TxInput::new(OutPoint::new([7u8; 32], 0), vec![0x52])],
            vec![
                TxOutput::new(0, Vec::new()),
                TxOutput::new(60_000_000, vec![0xbb; 25]),
            ],
        )
    }

    #[test]
    fn coinbase_classification() {
        let tx = coinbase();
        assert!(tx.is_coinbase());
        assert!(!tx.is_coinstake());
    }

    #[test]
    fn coinstake_classification() {
        let tx = coinstake();
        assert!(tx.is_coinstake());
        assert!(!tx.is_coinbase());
    }

    #[test]
    fn coinstake_requires_empty_marker_output() {
        let mut tx = coinstake();
        tx.outputs[0].value = 1;
        assert!(!tx.is_coinstake());
    }

    #[test]
    fn empty_transaction_is_neither() {
        let tx = Transaction::new(0, Vec::new(), Vec::new());
        assert!(!tx.is_coinbase());
        assert!(!tx.is_coinstake());
    }

    #[test]
    fn wire_round_trip_preserves_hash() {
        let tx = coinstake();
        let bytes = tx.wire_bytes(Channel::Full);
        let decoded = Transaction::from_wire_bytes(&bytes, Channel::Full).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.hash(), tx.hash());
    }

    #[test]
    fn truncated_transaction_fails_to_decode() {
        let tx = coinbase();
        let bytes = tx.wire_bytes(Channel::Full);
        assert!(Transaction::from_wire_bytes(&bytes[..bytes.len() - 2], Channel::Full).is_err());
    }

    #[test]
    fn null_outpoint_sentinel() {
        assert!(OutPoint::null().is_null());
        assert!(!OutPoint::new([1u8; 32], 0).is_null());
        // Index matters: a zero hash alone is not the sentinel.
        assert!(!OutPoint::new(NULL_HASH, 0).is_null());
    }
}
