#[path = "../common/mod.rs"]
mod common;

use common::fixtures;
use mifare_session::prelude::*;

#[test]
fn reset_discovers_sector_range_and_zeroes_data_blocks() {
    let (driver, rec) = fixtures::driver();
    driver.prepare_reset(fixtures::KEY_HEX).unwrap();

    let mut tag = fixtures::patterned_tag();
    tag.set_block(0, BlockData::from_bytes([0xA5; 16]));
    driver.on_tag(&mut tag);

    assert_eq!(rec.take(), vec![Event::ResetComplete { sectors_reset: 16 }]);
    assert!(driver.is_idle());

    // Data blocks zeroed
    assert_eq!(tag.block(1), &BlockData::zeroed());
    assert_eq!(tag.block(62), &BlockData::zeroed());
    // Manufacturer block and trailers untouched
    assert_eq!(tag.block(0), &BlockData::from_bytes([0xA5; 16]));
    assert_eq!(tag.block(3), &BlockData::from_bytes([3; 16]));
    assert_eq!(tag.block(63), &BlockData::from_bytes([63; 16]));
}

#[test]
fn failed_block_abandons_only_that_sector_for_the_round() {
    let (driver, rec) = fixtures::driver();
    driver.prepare_reset(fixtures::KEY_HEX).unwrap();

    let mut tag = fixtures::patterned_tag();
    // Sector 5, second writable block (absolute 21) fails once
    tag.fail_next_writes(21, 1);

    driver.on_tag(&mut tag);
    assert_eq!(
        rec.take(),
        vec![Event::Progress {
            kind: OperationKind::Reset,
            total: 16,
            completed: 15,
        }]
    );
    // The rest of sector 5 was abandoned after the failure...
    assert!(tag.write_calls.contains(&20));
    assert!(!tag.write_calls.contains(&22));
    // ...while later sectors still ran this round
    assert!(tag.write_calls.contains(&24));

    // Next tap re-zeroes sector 5 from scratch, not just the failed block
    tag.write_calls.clear();
    driver.on_tag(&mut tag);
    assert_eq!(rec.take(), vec![Event::ResetComplete { sectors_reset: 16 }]);
    assert_eq!(tag.write_calls, vec![20, 21, 22]);
    assert!(driver.is_idle());
}

#[test]
fn denied_sector_is_retried_on_a_later_tap() {
    let (driver, rec) = fixtures::driver();
    driver.prepare_reset(fixtures::KEY_HEX).unwrap();

    let mut tag = fixtures::patterned_tag();
    tag.deny_auth(3);

    driver.on_tag(&mut tag);
    assert_eq!(
        rec.take(),
        vec![Event::Progress {
            kind: OperationKind::Reset,
            total: 16,
            completed: 15,
        }]
    );

    tag.allow_auth(3);
    driver.on_tag(&mut tag);
    assert_eq!(rec.take(), vec![Event::ResetComplete { sectors_reset: 16 }]);
}

#[test]
fn lost_tag_aborts_the_round_but_keeps_pending_work() {
    let (driver, rec) = fixtures::driver();
    driver.prepare_reset(fixtures::KEY_HEX).unwrap();

    let mut tag = fixtures::patterned_tag();
    // Card leaves the field after two operations (one auth, one write)
    tag.lose_after(2);

    driver.on_tag(&mut tag);
    // Connection loss is not an error to surface; the next tap retries
    assert!(rec.take().is_empty());
    assert_eq!(driver.kind(), Some(OperationKind::Reset));

    driver.on_tag(&mut tag);
    assert_eq!(rec.take(), vec![Event::ResetComplete { sectors_reset: 16 }]);
    assert!(driver.is_idle());
}
