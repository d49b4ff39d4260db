#[path = "../common/mod.rs"]
mod common;

use common::fixtures;
use mifare_session::prelude::*;

#[test]
fn trailer_and_manufacturer_blocks_finalize_without_auth() {
    let (driver, rec) = fixtures::driver();
    let specs = vec![
        // Sector 1 trailer (last block of a 4-block sector)
        WriteSpec::new(1, 3, "AA".repeat(16)),
        // Manufacturer block
        WriteSpec::new(0, 0, "BB".repeat(16)),
    ];
    driver.prepare_write(specs, fixtures::KEY_HEX).unwrap();

    let mut tag = MockTag::classic_1k(&fixtures::uid_a());
    driver.on_tag(&mut tag);

    // Protected targets never reach authentication, let alone the card
    assert!(tag.auth_calls.is_empty());
    assert!(tag.write_calls.is_empty());

    match rec.take().as_slice() {
        [Event::WriteComplete { records }] => {
            assert_eq!(records.len(), 2);
            for record in records {
                assert!(!record.success());
                assert_eq!(record.error.as_deref(), Some("system block"));
            }
        }
        other => panic!("unexpected events: {:?}", other),
    }
    assert!(driver.is_idle());
}

#[test]
fn mixed_batch_reports_each_target_and_authenticates_once() {
    let (driver, rec) = fixtures::driver();
    let specs = vec![
        WriteSpec::new(1, 0, "11".repeat(16)),
        WriteSpec::new(1, 1, "22".repeat(16)),
        WriteSpec::new(1, 3, "33".repeat(16)), // trailer, rejected up front
    ];
    driver.prepare_write(specs, fixtures::KEY_HEX).unwrap();

    let mut tag = MockTag::classic_1k(&fixtures::uid_a());
    driver.on_tag(&mut tag);

    // One auth covers both data-block writes in sector 1
    assert_eq!(tag.auth_calls, vec![1]);
    assert_eq!(tag.write_calls, vec![4, 5]);
    assert_eq!(tag.block(4), &BlockData::from_bytes([0x11; 16]));
    assert_eq!(tag.block(5), &BlockData::from_bytes([0x22; 16]));
    // The trailer itself is untouched
    assert_eq!(tag.block(7), &BlockData::zeroed());

    match rec.take().as_slice() {
        [Event::WriteComplete { records }] => {
            assert_eq!(records.len(), 3);
            assert!(records[0].success());
            assert!(records[1].success());
            assert_eq!(records[2].error.as_deref(), Some("system block"));
        }
        other => panic!("unexpected events: {:?}", other),
    }
}

#[test]
fn transient_write_failure_stays_pending_for_next_tap() {
    let (driver, rec) = fixtures::driver();
    let specs = vec![WriteSpec::new(2, 0, "5A".repeat(16))];
    driver.prepare_write(specs, fixtures::KEY_HEX).unwrap();

    let mut tag = MockTag::classic_1k(&fixtures::uid_a());
    tag.fail_next_writes(8, 1);

    driver.on_tag(&mut tag);
    assert_eq!(
        rec.take(),
        vec![Event::Progress {
            kind: OperationKind::Write,
            total: 1,
            completed: 0,
        }]
    );
    assert_eq!(tag.block(8), &BlockData::zeroed());

    driver.on_tag(&mut tag);
    match rec.take().as_slice() {
        [Event::WriteComplete { records }] => {
            assert_eq!(records.len(), 1);
            assert!(records[0].success());
        }
        other => panic!("unexpected events: {:?}", other),
    }
    assert_eq!(tag.block(8), &BlockData::from_bytes([0x5A; 16]));
}

#[test]
fn rejected_key_leaves_targets_pending() {
    let (driver, rec) = fixtures::driver();
    let specs = vec![WriteSpec::new(2, 1, "0F".repeat(16))];
    driver.prepare_write(specs, fixtures::KEY_HEX).unwrap();

    let mut tag = MockTag::classic_1k(&fixtures::uid_a());
    tag.set_key(2, MifareKey::from_bytes([1, 2, 3, 4, 5, 6]));

    driver.on_tag(&mut tag);
    assert_eq!(
        rec.take(),
        vec![Event::Progress {
            kind: OperationKind::Write,
            total: 1,
            completed: 0,
        }]
    );
    // No terminal failure is recorded for an auth miss; the batch waits
    assert_eq!(driver.kind(), Some(OperationKind::Write));
}
