// mifare-session/src/session/reset.rs

use crate::reporter::Event;
use crate::session::round;
use crate::session::{ResetSession, RoundOutcome};
use crate::tag::{Connection, MifareTag};
use crate::types::{BlockData, OperationKind};
use crate::{Error, Result};

/// One round of a full-card reset.
///
/// The sector range is a property of the physical card, so it is discovered
/// on the first presentation. Every block except the sector trailer and the
/// manufacturer block is zeroed. A sector counts as completed only if every
/// writable block in it succeeded within one round; a failed block write
/// abandons the rest of that sector for this round and moves on, leaving the
/// sector pending to be re-zeroed from scratch on the next tap.
pub(crate) fn run_round(
    session: &mut ResetSession,
    conn: &mut Connection<'_>,
) -> Result<RoundOutcome> {
    if session.total_sectors.is_none() {
        let count = conn.sector_count();
        session.pending_sectors = (0..count).map(|s| s as u8).collect();
        session.total_sectors = Some(count);
        log::debug!("reset: card reports {} sectors", count);
    }
    let total = session.total_sectors.unwrap_or_default();

    let zero = BlockData::zeroed();
    let snapshot = session.pending_sectors.clone();

    'sectors: for &sector in &snapshot {
        if !conn.authenticate(sector, &session.key)? {
            log::debug!("reset: sector {} rejected the key; retried next tap", sector);
            continue;
        }
        let block_count = conn.block_count_in_sector(sector);
        let trailer = block_count - 1;
        let base = conn.sector_to_block(sector);
        for block in 0..block_count {
            if block == trailer || (sector == 0 && block == 0) {
                continue;
            }
            match conn.write_block(base + block, &zero) {
                Ok(()) => {}
                Err(Error::Io(err)) => {
                    // Partial sector wipes are never marked complete
                    log::debug!(
                        "reset: zeroing block {} failed: {}; sector {} retried next tap",
                        base + block,
                        err,
                        sector
                    );
                    continue 'sectors;
                }
                Err(err) => return Err(err),
            }
        }
        round::remove_first(&mut session.pending_sectors, &sector);
        session.completed_sectors.push(sector);
    }

    debug_assert_eq!(
        session.pending_sectors.len() + session.completed_sectors.len(),
        total
    );

    if session.pending_sectors.is_empty() {
        Ok(RoundOutcome::Finished(Event::ResetComplete {
            sectors_reset: session.completed_sectors.len(),
        }))
    } else {
        Ok(RoundOutcome::Progress {
            kind: OperationKind::Reset,
            total,
            completed: session.completed_sectors.len(),
        })
    }
}
