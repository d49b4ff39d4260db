// mifare-session/src/session/write.rs

use crate::constants::SYSTEM_BLOCK_ERROR;
use crate::reporter::Event;
use crate::session::round::{self, Attempt, AuthCache};
use crate::session::{RoundOutcome, WriteSession};
use crate::tag::{Connection, MifareTag};
use crate::types::{OperationKind, WriteRecord, WriteTarget};
use crate::{Error, Result};

/// The sector trailer and the manufacturer block (sector 0, block 0) are
/// never user-writable.
fn is_protected(conn: &Connection<'_>, target: &WriteTarget) -> bool {
    let trailer = conn.block_count_in_sector(target.sector) - 1;
    target.block as usize == trailer || (target.sector == 0 && target.block == 0)
}

/// One round of a write session.
///
/// Protected blocks finalize as failures before authentication is even
/// attempted; everything else follows the shared auth-then-attempt shape
/// with transient write failures left pending for the next tap.
pub(crate) fn run_round(
    session: &mut WriteSession,
    conn: &mut Connection<'_>,
) -> Result<RoundOutcome> {
    let WriteSession {
        original,
        pending,
        completed,
        key,
    } = session;
    let mut cache = AuthCache::new();

    round::drive_targets(pending, |target| {
        if is_protected(conn, target) {
            completed.push(WriteRecord {
                sector: target.sector,
                block: target.block,
                error: Some(SYSTEM_BLOCK_ERROR.to_string()),
            });
            return Ok(Attempt::Done);
        }
        if !cache.ensure(conn, target.sector, key)? {
            return Ok(Attempt::Retry);
        }
        let abs = conn.sector_to_block(target.sector) + target.block as usize;
        match conn.write_block(abs, &target.data) {
            Ok(()) => {
                completed.push(WriteRecord {
                    sector: target.sector,
                    block: target.block,
                    error: None,
                });
                Ok(Attempt::Done)
            }
            Err(Error::Io(err)) => {
                log::debug!(
                    "write of block {} failed: {}; will retry next tap",
                    abs,
                    err
                );
                Ok(Attempt::Retry)
            }
            Err(err) => Err(err),
        }
    })?;

    debug_assert_eq!(pending.len() + completed.len(), original.len());

    if pending.is_empty() {
        Ok(RoundOutcome::Finished(Event::WriteComplete {
            records: std::mem::take(completed),
        }))
    } else {
        Ok(RoundOutcome::Progress {
            kind: OperationKind::Write,
            total: original.len(),
            completed: completed.len(),
        })
    }
}
