// mifare-session/src/tag/mock.rs

use std::collections::{HashMap, HashSet};

use crate::constants::{CLASSIC_1K_SECTORS, SMALL_SECTOR_BLOCKS};
use crate::tag::MifareTag;
use crate::types::{BlockData, MifareKey};
use crate::{Error, Result};

/// Mock tag for unit tests: an in-memory sector/block array with scripted
/// failures and call recording.
#[derive(Debug)]
pub struct MockTag {
    uid: Vec<u8>,
    blocks: Vec<BlockData>,
    keys: Vec<MifareKey>,
    /// When false, `connect` refuses with `TagNotSupported`.
    pub supported: bool,
    /// Channel state; card operations assert it in debug builds.
    pub connected: bool,
    /// Every `authenticate` invocation, in call order.
    pub auth_calls: Vec<u8>,
    /// Absolute indices of every write that reached the card.
    pub write_calls: Vec<usize>,
    fail_reads: HashMap<usize, u32>,
    fail_writes: HashMap<usize, u32>,
    fail_auths: HashMap<u8, u32>,
    deny_auth: HashSet<u8>,
    ops_until_lost: Option<u32>,
    lost: bool,
}

impl MockTag {
    /// A blank Classic 1K card: 16 sectors of 4 blocks, transport keys.
    pub fn classic_1k(uid: &[u8]) -> Self {
        Self::with_sectors(uid, CLASSIC_1K_SECTORS)
    }

    /// A blank card with an arbitrary sector count (4 blocks per sector).
    pub fn with_sectors(uid: &[u8], sectors: usize) -> Self {
        Self {
            uid: uid.to_vec(),
            blocks: vec![BlockData::zeroed(); sectors * SMALL_SECTOR_BLOCKS],
            keys: vec![MifareKey::DEFAULT; sectors],
            supported: true,
            connected: false,
            auth_calls: Vec::new(),
            write_calls: Vec::new(),
            fail_reads: HashMap::new(),
            fail_writes: HashMap::new(),
            fail_auths: HashMap::new(),
            deny_auth: HashSet::new(),
            ops_until_lost: None,
            lost: false,
        }
    }

    /// Install a sector key other than the transport default.
    pub fn set_key(&mut self, sector: u8, key: MifareKey) {
        self.keys[sector as usize] = key;
    }

    /// Seed a block's content by absolute index.
    pub fn set_block(&mut self, block: usize, data: BlockData) {
        self.blocks[block] = data;
    }

    /// Current content of a block by absolute index.
    pub fn block(&self, block: usize) -> &BlockData {
        &self.blocks[block]
    }

    /// Script the next `n` reads of `block` to fail transiently.
    pub fn fail_next_reads(&mut self, block: usize, n: u32) {
        self.fail_reads.insert(block, n);
    }

    /// Script the next `n` writes of `block` to fail transiently.
    pub fn fail_next_writes(&mut self, block: usize, n: u32) {
        self.fail_writes.insert(block, n);
    }

    /// Script the next `n` authentications of `sector` to break down hard
    /// (`Error::AuthFailed`), as opposed to a clean key rejection.
    pub fn fail_next_auths(&mut self, sector: u8, n: u32) {
        self.fail_auths.insert(sector, n);
    }

    /// Make `authenticate` reject the key for `sector` until allowed again.
    pub fn deny_auth(&mut self, sector: u8) {
        self.deny_auth.insert(sector);
    }

    /// Undo [`MockTag::deny_auth`].
    pub fn allow_auth(&mut self, sector: u8) {
        self.deny_auth.remove(&sector);
    }

    /// Simulate the card leaving the field after `n` further card
    /// operations (authenticate/read/write). Cleared on the next connect.
    pub fn lose_after(&mut self, n: u32) {
        self.ops_until_lost = Some(n);
        self.lost = false;
    }

    fn card_op(&mut self) -> Result<()> {
        debug_assert!(self.connected, "card operation without connect");
        if self.lost {
            return Err(Error::TagLost);
        }
        if let Some(n) = self.ops_until_lost.as_mut() {
            if *n == 0 {
                self.lost = true;
                return Err(Error::TagLost);
            }
            *n -= 1;
        }
        Ok(())
    }

    fn take_fault<K: std::hash::Hash + Eq>(faults: &mut HashMap<K, u32>, key: K) -> bool {
        match faults.get_mut(&key) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }
}

impl MifareTag for MockTag {
    fn uid(&self) -> &[u8] {
        &self.uid
    }

    fn connect(&mut self) -> Result<()> {
        if !self.supported {
            return Err(Error::TagNotSupported);
        }
        self.connected = true;
        // A fresh tap recovers a lost tag
        if self.lost {
            self.lost = false;
            self.ops_until_lost = None;
        }
        Ok(())
    }

    fn close(&mut self) {
        self.connected = false;
    }

    fn sector_count(&self) -> usize {
        self.keys.len()
    }

    fn block_count_in_sector(&self, _sector: u8) -> usize {
        SMALL_SECTOR_BLOCKS
    }

    fn sector_to_block(&self, sector: u8) -> usize {
        sector as usize * SMALL_SECTOR_BLOCKS
    }

    fn authenticate(&mut self, sector: u8, key: &MifareKey) -> Result<bool> {
        self.card_op()?;
        self.auth_calls.push(sector);
        if Self::take_fault(&mut self.fail_auths, sector) {
            return Err(Error::AuthFailed { sector });
        }
        if self.deny_auth.contains(&sector) {
            return Ok(false);
        }
        Ok(self.keys[sector as usize] == *key)
    }

    fn read_block(&mut self, block: usize) -> Result<BlockData> {
        self.card_op()?;
        if Self::take_fault(&mut self.fail_reads, block) {
            return Err(Error::Io(format!("transient read fault on block {}", block)));
        }
        self.blocks
            .get(block)
            .copied()
            .ok_or_else(|| Error::Io(format!("block {} out of range", block)))
    }

    fn write_block(&mut self, block: usize, data: &BlockData) -> Result<()> {
        self.card_op()?;
        if Self::take_fault(&mut self.fail_writes, block) {
            return Err(Error::Io(format!(
                "transient write fault on block {}",
                block
            )));
        }
        match self.blocks.get_mut(block) {
            Some(slot) => {
                *slot = *data;
                self.write_calls.push(block);
                Ok(())
            }
            None => Err(Error::Io(format!("block {} out of range", block))),
        }
    }
}
