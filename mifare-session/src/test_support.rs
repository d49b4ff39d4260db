// mifare-session/src/test_support.rs
//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common MockTag/driver setup so tests across the
//! crate and tests/ directory can reuse the same logic.
#![allow(dead_code)]

use crate::reporter::RecordingReporter;
use crate::session::SessionDriver;
use crate::tag::MockTag;
use crate::types::BlockData;

/// Hex form of the transport key, as callers would pass it.
#[doc(hidden)]
pub const DEFAULT_KEY_HEX: &str = "FFFFFFFFFFFF";

/// Driver wired to a recording reporter; the returned clone shares the
/// event buffer so tests can assert on emissions.
#[doc(hidden)]
pub fn recording_driver() -> (SessionDriver<RecordingReporter>, RecordingReporter) {
    let rec = RecordingReporter::default();
    (SessionDriver::new(rec.clone()), rec)
}

/// A Classic 1K mock with every data block seeded to a recognizable
/// per-block pattern (block index repeated through the payload).
#[doc(hidden)]
pub fn patterned_1k_tag(uid: &[u8]) -> MockTag {
    let mut tag = MockTag::classic_1k(uid);
    for block in 0..64 {
        tag.set_block(block, BlockData::from_bytes([block as u8; 16]));
    }
    tag
}
