// mifare-session/src/tag/mod.rs

//! Capability boundary toward the physical card.
//!
//! The session protocol only ever talks to a presented card through the
//! [`MifareTag`] trait; the platform radio layer (reader-mode wiring, tag
//! discovery, anti-collision) lives behind it. [`MockTag`] is the in-memory
//! implementation used by the test suite.

use crate::types::{BlockData, MifareKey};
use crate::Result;

pub mod mock;
pub use mock::MockTag;

/// One presented sector/block memory card.
///
/// Failure contract: [`crate::Error::Io`] means a single transfer failed and
/// the same call may succeed on retry; [`crate::Error::TagLost`] means the
/// card left the field and the current round must stop.
pub trait MifareTag {
    /// Stable identifier of the card, readable without authentication.
    fn uid(&self) -> &[u8];

    /// Open the channel to the card. Returns
    /// [`crate::Error::TagNotSupported`] when the presented tag is not a
    /// sector/block memory card.
    fn connect(&mut self) -> Result<()>;

    /// Close the channel. Idempotent; errors while closing are swallowed by
    /// the implementation.
    fn close(&mut self);

    /// Number of sectors on the card.
    fn sector_count(&self) -> usize;

    /// Number of blocks in the given sector (the last one is the trailer).
    fn block_count_in_sector(&self, sector: u8) -> usize;

    /// Absolute block index of the sector's first block.
    fn sector_to_block(&self, sector: u8) -> usize;

    /// Authenticate a sector with key A. `Ok(false)` means the card cleanly
    /// rejected the key; the caller decides whether to retry on a later tap.
    /// [`crate::Error::AuthFailed`] means the authentication exchange itself
    /// broke down and the failure should be surfaced to the caller.
    fn authenticate(&mut self, sector: u8, key: &MifareKey) -> Result<bool>;

    /// Read one block by absolute index.
    fn read_block(&mut self, block: usize) -> Result<BlockData>;

    /// Write one block by absolute index.
    fn write_block(&mut self, block: usize, data: &BlockData) -> Result<()>;
}

/// Scoped connection to a tag: `close` runs on every exit path, so the
/// channel is never left open after a round.
pub struct Connection<'a> {
    tag: &'a mut dyn MifareTag,
}

impl<'a> Connection<'a> {
    /// Connect and wrap the tag; dropping the guard closes the channel.
    pub fn open(tag: &'a mut dyn MifareTag) -> Result<Self> {
        tag.connect()?;
        Ok(Self { tag })
    }
}

impl<'a> std::ops::Deref for Connection<'a> {
    type Target = dyn MifareTag + 'a;

    fn deref(&self) -> &Self::Target {
        self.tag
    }
}

impl<'a> std::ops::DerefMut for Connection<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.tag
    }
}

impl Drop for Connection<'_> {
    fn drop(&mut self) {
        self.tag.close();
    }
}
