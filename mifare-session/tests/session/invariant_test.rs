#[path = "../common/mod.rs"]
mod common;

use common::fixtures;
use mifare_session::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// No target is ever lost or duplicated: every round reports
    /// `completed + pending == original` (pending is `total - completed`),
    /// progress is monotonic, and the session converges once the scripted
    /// transient faults are exhausted.
    #[test]
    fn read_session_conserves_targets_under_transient_faults(
        raw_targets in prop::collection::vec((0u8..16, 0u8..4), 1..12),
        faults in prop::collection::vec(0u32..3, 12),
    ) {
        let targets: Vec<ReadTarget> = raw_targets
            .iter()
            .map(|&(sector, block)| ReadTarget::new(sector, block))
            .collect();
        let total = targets.len();

        let (driver, rec) = fixtures::driver();
        driver.prepare_read(targets.clone(), fixtures::KEY_HEX).unwrap();

        let mut tag = fixtures::patterned_tag();
        for (target, &n) in targets.iter().zip(&faults) {
            let abs = target.sector as usize * 4 + target.block as usize;
            tag.fail_next_reads(abs, n);
        }

        let mut last_completed = 0;
        let mut rounds = 0;
        loop {
            rounds += 1;
            prop_assert!(rounds <= 8, "session did not converge");
            driver.on_tag(&mut tag);

            let events = rec.take();
            prop_assert_eq!(events.len(), 1);
            match &events[0] {
                Event::Progress { total: reported, completed, .. } => {
                    prop_assert_eq!(*reported, total);
                    prop_assert!(*completed >= last_completed);
                    prop_assert!(*completed < total);
                    last_completed = *completed;
                }
                Event::ReadComplete { records } => {
                    prop_assert_eq!(records.len(), total);
                    break;
                }
                other => prop_assert!(false, "unexpected event: {:?}", other),
            }
        }
        prop_assert!(driver.is_idle());
    }
}
