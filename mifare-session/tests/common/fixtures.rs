// fixtures.rs — commonly used uids, keys and seeded tags

use mifare_session::prelude::*;
use mifare_session::test_support;

pub const KEY_HEX: &str = test_support::DEFAULT_KEY_HEX;

pub fn uid_a() -> Vec<u8> {
    vec![0xDE, 0xAD, 0xBE, 0xEF]
}

pub fn uid_b() -> Vec<u8> {
    vec![0x01, 0x02, 0x03, 0x04]
}

/// Classic 1K mock owned by card A, every block seeded with its own index.
pub fn patterned_tag() -> MockTag {
    test_support::patterned_1k_tag(&uid_a())
}

pub fn driver() -> (SessionDriver<RecordingReporter>, RecordingReporter) {
    test_support::recording_driver()
}
