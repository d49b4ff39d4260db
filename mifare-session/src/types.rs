// mifare-session/src/types.rs

use crate::constants::{BLOCK_SIZE, KEY_SIZE};
use crate::{Error, utils};
use derive_more::Display;
use std::convert::TryFrom;

/// Card identity - Newtype Pattern (4, 7 or 10 bytes on real cards, opaque here)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uid(Vec<u8>);

impl Uid {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        utils::bytes_to_hex(self.as_bytes())
    }
}

/// Sector authentication key - Newtype Pattern (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MifareKey([u8; KEY_SIZE]);

impl MifareKey {
    /// Transport key shipped on blank cards.
    pub const DEFAULT: Self = Self(crate::constants::DEFAULT_KEY);

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Parse a key from its 12-hex-character wire form.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = utils::parse_hex(s)?;
        Self::try_from(&bytes[..])
    }
}

impl TryFrom<&[u8]> for MifareKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != KEY_SIZE {
            return Err(Error::Argument(format!(
                "key must be {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            )));
        }
        let mut arr = [0u8; KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

/// BlockData (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockData([u8; BLOCK_SIZE]);

impl BlockData {
    pub fn from_bytes(bytes: [u8; BLOCK_SIZE]) -> Self {
        Self(bytes)
    }

    /// All-zero payload, used when wiping sectors.
    pub fn zeroed() -> Self {
        Self([0u8; BLOCK_SIZE])
    }

    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        utils::bytes_to_hex(self.as_bytes())
    }

    /// Parse a payload from its 32-hex-character wire form.
    ///
    /// Anything that does not decode to exactly 16 bytes is rejected with
    /// `DATA_LENGTH_ERROR`.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = utils::parse_hex(s)?;
        Self::try_from(&bytes[..])
    }

    /// Build a payload from plain text: UTF-8 bytes padded with spaces to a
    /// full block, truncated if longer.
    pub fn from_plain_text(s: &str) -> Self {
        let mut arr = [0x20u8; BLOCK_SIZE];
        let src = s.as_bytes();
        let n = src.len().min(BLOCK_SIZE);
        arr[..n].copy_from_slice(&src[..n]);
        Self(arr)
    }
}

impl TryFrom<&[u8]> for BlockData {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != BLOCK_SIZE {
            return Err(Error::DataLength {
                expected: BLOCK_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; BLOCK_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

/// Kind of batch operation a session performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OperationKind {
    #[display(fmt = "read")]
    Read,
    #[display(fmt = "write")]
    Write,
    #[display(fmt = "reset")]
    Reset,
}

/// One block to read: a sector index plus a sector-local block index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadTarget {
    pub sector: u8,
    pub block: u8,
}

impl ReadTarget {
    pub fn new(sector: u8, block: u8) -> Self {
        Self { sector, block }
    }
}

/// One block to write, payload already decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteTarget {
    pub sector: u8,
    pub block: u8,
    pub data: BlockData,
}

impl WriteTarget {
    pub fn new(sector: u8, block: u8, data: BlockData) -> Self {
        Self {
            sector,
            block,
            data,
        }
    }
}

/// Caller-side description of one write target, payload still in hex form.
///
/// Decoded into a [`WriteTarget`] at preparation time; a payload that is not
/// exactly 32 hex characters is rejected before any session state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteSpec {
    pub sector: u8,
    pub block: u8,
    pub data_hex: String,
}

impl WriteSpec {
    pub fn new(sector: u8, block: u8, data_hex: impl Into<String>) -> Self {
        Self {
            sector,
            block,
            data_hex: data_hex.into(),
        }
    }

    /// Decode the hex payload into a concrete target.
    pub fn decode(&self) -> Result<WriteTarget, Error> {
        let data = BlockData::from_hex(&self.data_hex)?;
        Ok(WriteTarget::new(self.sector, self.block, data))
    }
}

/// Successful read of one block. Read sessions accumulate only successes;
/// an unreadable block stays pending and is retried on the next tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadRecord {
    pub sector: u8,
    pub block: u8,
    pub data: BlockData,
}

impl ReadRecord {
    /// Payload in the uppercase hex wire form.
    pub fn data_hex(&self) -> String {
        self.data.to_hex()
    }
}

/// Terminal outcome of one write target. `error: None` means the block was
/// written; protected blocks finalize with the system-block error string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WriteRecord {
    pub sector: u8,
    pub block: u8,
    pub error: Option<String>,
}

impl WriteRecord {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}
