// mifare-session/src/constants.rs
//! Common card-geometry constants used across the crate

/// Bytes in one data block
pub const BLOCK_SIZE: usize = 16;

/// Bytes in a sector authentication key
pub const KEY_SIZE: usize = 6;

/// Transport key shipped on blank cards (FF FF FF FF FF FF)
pub const DEFAULT_KEY: [u8; KEY_SIZE] = [0xFF; KEY_SIZE];

/// Sector count of a Classic 1K card, the common case in tests
pub const CLASSIC_1K_SECTORS: usize = 16;

/// Blocks per sector on 1K cards (and the first 32 sectors of 4K cards)
pub const SMALL_SECTOR_BLOCKS: usize = 4;

/// Error string attached to write results that hit a protected block
pub const SYSTEM_BLOCK_ERROR: &str = "system block";
