//! Channel-aware wire codec for consensus types
//!
//! Consensus bytes are encoded by hand: every integer is fixed-width
//! little-endian and every variable-length sequence carries a compact-size
//! prefix, so the layout is bit-exact across implementations. The channel a
//! value is being encoded for decides which fields travel; passing it as an
//! explicit parameter keeps the header-encoding logic in one place while
//! guaranteeing the hash and header-only forms are byte-compatible prefixes
//! of the full form.

use crate::error::{ChainError, Result};

/// Destination of an encoding (or source of a decoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Network or disk: the full payload, body included.
    Full,
    /// Input to an identity-hash computation: header fields only, and no
    /// wire-compatibility prefixes.
    IdentityHash,
    /// Header-first relay and block announcements: header fields only.
    HeaderOnly,
}

impl Channel {
    /// True when the channel carries header fields only.
    pub fn is_header_only(self) -> bool {
        !matches!(self, Channel::Full)
    }

    /// True for the identity-hash channel, which omits protocol-version
    /// prefixes that only matter for wire compatibility.
    pub fn is_identity_hash(self) -> bool {
        matches!(self, Channel::IdentityHash)
    }
}

/// Upper bound on any compact-size length prefix. Rejecting oversize claims
/// before allocation keeps a truncated or hostile stream from reserving
/// gigabytes.
pub const MAX_WIRE_LEN: u64 = 1_000_000;

/// Cursor over a byte slice with explicit truncation errors.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(ChainError::TruncatedStream {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        let mut bytes = [0u8; 2];
        bytes.copy_from_slice(self.take(2)?);
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(self.read_u32_le()? as i32)
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn read_i64_le(&mut self) -> Result<i64> {
        Ok(self.read_u64_le()? as i64)
    }

    pub fn read_hash(&mut self) -> Result<[u8; 32]> {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(self.take(32)?);
        Ok(hash)
    }

    /// Read a compact-size prefix, enforcing the minimal encoding.
    pub fn read_compact_size(&mut self) -> Result<u64> {
        let tag = self.read_u8()?;
        let value = match tag {
            0..=0xfc => u64::from(tag),
            0xfd => {
                let v = u64::from(self.read_u16_le()?);
                if v < 0xfd {
                    return Err(ChainError::NonCanonicalCompactSize);
                }
                v
            }
            0xfe => {
                let v = u64::from(self.read_u32_le()?);
                if v <= u64::from(u16::MAX) {
                    return Err(ChainError::NonCanonicalCompactSize);
                }
                v
            }
            0xff => {
                let v = self.read_u64_le()?;
                if v <= u64::from(u32::MAX) {
                    return Err(ChainError::NonCanonicalCompactSize);
                }
                v
            }
        };
        if value > MAX_WIRE_LEN {
            return Err(ChainError::OversizedField {
                claimed: value,
                max: MAX_WIRE_LEN,
            });
        }
        Ok(value)
    }

    /// Read a compact-size-prefixed byte sequence.
    pub fn read_var_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_compact_size()? as usize;
        Ok(self.take(len)?.to_vec())
    }
}

/// Append a compact-size prefix in its minimal encoding.
pub fn write_compact_size(out: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}

/// Append a compact-size-prefixed byte sequence.
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_compact_size(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Types with a canonical, channel-sensitive wire encoding.
pub trait WireEncode {
    fn wire_encode(&self, out: &mut Vec<u8>, channel: Channel);

    fn wire_bytes(&self, channel: Channel) -> Vec<u8> {
        let mut out = Vec::new();
        self.wire_encode(&mut out, channel);
        out
    }
}

/// The decoding half of [`WireEncode`].
pub trait WireDecode: Sized {
    fn wire_decode(reader: &mut ByteReader<'_>, channel: Channel) -> Result<Self>;

    /// Decode a value from a complete buffer; trailing bytes are an error.
    fn from_wire_bytes(bytes: &[u8], channel: Channel) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);
        let value = Self::wire_decode(&mut reader, channel)?;
        if !reader.is_empty() {
            return Err(ChainError::TrailingBytes(reader.remaining()));
        }
        Ok(value)
    }
}
