// mifare-session/src/session/read.rs

use crate::reporter::Event;
use crate::session::round::{self, Attempt, AuthCache};
use crate::session::{ReadSession, RoundOutcome};
use crate::tag::{Connection, MifareTag};
use crate::types::{OperationKind, ReadRecord};
use crate::{Error, Result};

/// One round of a read session.
///
/// Read accumulates only successes: a target that cannot complete this round
/// stays pending and is silently retried on the next tap.
pub(crate) fn run_round(
    session: &mut ReadSession,
    conn: &mut Connection<'_>,
) -> Result<RoundOutcome> {
    let ReadSession {
        original,
        pending,
        completed,
        key,
    } = session;
    let mut cache = AuthCache::new();

    round::drive_targets(pending, |target| {
        if !cache.ensure(conn, target.sector, key)? {
            return Ok(Attempt::Retry);
        }
        let abs = conn.sector_to_block(target.sector) + target.block as usize;
        match conn.read_block(abs) {
            Ok(data) => {
                completed.push(ReadRecord {
                    sector: target.sector,
                    block: target.block,
                    data,
                });
                Ok(Attempt::Done)
            }
            Err(Error::Io(err)) => {
                log::debug!("read of block {} failed: {}; will retry next tap", abs, err);
                Ok(Attempt::Retry)
            }
            Err(err) => Err(err),
        }
    })?;

    debug_assert_eq!(pending.len() + completed.len(), original.len());

    if pending.is_empty() {
        Ok(RoundOutcome::Finished(Event::ReadComplete {
            records: std::mem::take(completed),
        }))
    } else {
        Ok(RoundOutcome::Progress {
            kind: OperationKind::Read,
            total: original.len(),
            completed: completed.len(),
        })
    }
}
