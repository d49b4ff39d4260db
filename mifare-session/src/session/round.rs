// mifare-session/src/session/round.rs

//! Shared plumbing for one round of session work: the per-presentation
//! authentication cache and the snapshot-driven target loop.

use std::collections::HashSet;

use crate::tag::{Connection, MifareTag};
use crate::types::MifareKey;
use crate::Result;

/// Outcome of one attempt at a single pending item.
pub(crate) enum Attempt {
    /// Finalized (success or terminal failure); remove from pending.
    Done,
    /// Not finalized this round; keep pending and retry on the next tap.
    Retry,
}

/// Sectors already authenticated during the current presentation.
///
/// Authenticated state does not survive the card leaving the field, so the
/// cache is rebuilt empty at the start of every round.
pub(crate) struct AuthCache {
    sectors: HashSet<u8>,
}

impl AuthCache {
    pub(crate) fn new() -> Self {
        Self {
            sectors: HashSet::new(),
        }
    }

    /// Authenticate `sector` unless already done this round. `Ok(false)`
    /// means the key was rejected and the caller should retry later.
    pub(crate) fn ensure(
        &mut self,
        conn: &mut Connection<'_>,
        sector: u8,
        key: &MifareKey,
    ) -> Result<bool> {
        if self.sectors.contains(&sector) {
            return Ok(true);
        }
        if conn.authenticate(sector, key)? {
            self.sectors.insert(sector);
            Ok(true)
        } else {
            log::debug!("sector {} rejected the key; will retry next tap", sector);
            Ok(false)
        }
    }
}

/// Drive one round over a snapshot of the pending list.
///
/// The live list is mutated only after an item's outcome for this round is
/// known; iterating it directly while removing entries is forbidden. Errors
/// from `attempt` abort the round with pending state intact.
pub(crate) fn drive_targets<T, F>(pending: &mut Vec<T>, mut attempt: F) -> Result<()>
where
    T: Clone + PartialEq,
    F: FnMut(&T) -> Result<Attempt>,
{
    let snapshot = pending.clone();
    for item in &snapshot {
        match attempt(item)? {
            Attempt::Done => remove_first(pending, item),
            Attempt::Retry => {}
        }
    }
    Ok(())
}

/// Remove the first occurrence of `item`. Duplicate targets are legal and
/// processed independently, so exactly one instance goes per finalization.
pub(crate) fn remove_first<T: PartialEq>(pending: &mut Vec<T>, item: &T) {
    if let Some(pos) = pending.iter().position(|p| p == item) {
        pending.remove(pos);
    }
}
