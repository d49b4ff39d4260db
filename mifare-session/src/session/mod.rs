// mifare-session/src/session/mod.rs

//! The incremental multi-tap session protocol.
//!
//! A [`SessionDriver`] holds at most one active [`Session`]. Callers prepare
//! a batch (read, write or full-card reset), then feed it one presented tag
//! per physical tap via [`SessionDriver::on_tag`]; each presentation runs one
//! round, finalizing as many targets as the card allows and keeping the rest
//! pending for the next tap. Progress and results cross to the caller
//! through a [`Reporter`].

use std::sync::Mutex;

use crate::reporter::{Event, Reporter};
use crate::tag::{Connection, MifareTag};
use crate::types::{MifareKey, OperationKind, ReadRecord, ReadTarget, Uid, WriteRecord,
    WriteSpec, WriteTarget};
use crate::{Error, Result};

mod read;
mod reset;
mod round;
mod write;

/// In-flight state of a batch read.
#[derive(Debug, Clone)]
pub struct ReadSession {
    pub(crate) original: Vec<ReadTarget>,
    pub(crate) pending: Vec<ReadTarget>,
    pub(crate) completed: Vec<ReadRecord>,
    pub(crate) key: MifareKey,
}

/// In-flight state of a batch write.
#[derive(Debug, Clone)]
pub struct WriteSession {
    pub(crate) original: Vec<WriteTarget>,
    pub(crate) pending: Vec<WriteTarget>,
    pub(crate) completed: Vec<WriteRecord>,
    pub(crate) key: MifareKey,
}

/// In-flight state of a full-card reset. The sector range is unknown until
/// the first presentation.
#[derive(Debug, Clone)]
pub struct ResetSession {
    pub(crate) total_sectors: Option<usize>,
    pub(crate) pending_sectors: Vec<u8>,
    pub(crate) completed_sectors: Vec<u8>,
    pub(crate) key: MifareKey,
}

/// The single unit of mutable session state: exactly one variant is active,
/// or none.
#[derive(Debug, Clone, Default)]
pub enum Session {
    /// No work pending.
    #[default]
    Idle,
    /// Batch read in flight.
    Read(ReadSession),
    /// Batch write in flight.
    Write(WriteSession),
    /// Full-card reset in flight.
    Reset(ResetSession),
}

impl Session {
    /// True when no work is pending.
    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }

    /// Operation kind of the active session, if any.
    pub fn kind(&self) -> Option<OperationKind> {
        match self {
            Session::Idle => None,
            Session::Read(_) => Some(OperationKind::Read),
            Session::Write(_) => Some(OperationKind::Write),
            Session::Reset(_) => Some(OperationKind::Reset),
        }
    }
}

/// What one round produced.
pub(crate) enum RoundOutcome {
    /// Work remains; emit progress and wait for the next tap.
    Progress {
        kind: OperationKind,
        total: usize,
        completed: usize,
    },
    /// Pending set emptied; emit the final event and clear the session.
    Finished(Event),
}

/// Session state plus identity binding, guarded by one mutex.
///
/// The epoch counter increments on every `prepare`/`cancel`, so a round that
/// raced with either can detect that its session was replaced and drop its
/// outcome instead of resurrecting dead state.
#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    uid: Option<Uid>,
    epoch: u64,
}

impl SessionState {
    fn replace(&mut self, session: Session) {
        self.session = session;
        self.uid = None;
        self.epoch += 1;
    }
}

/// Drives batch sessions across tag presentations and pushes progress and
/// results to a [`Reporter`].
pub struct SessionDriver<R: Reporter> {
    state: Mutex<SessionState>,
    round_gate: Mutex<()>,
    reporter: R,
}

impl<R: Reporter> SessionDriver<R> {
    /// Create an idle driver.
    pub fn new(reporter: R) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            round_gate: Mutex::new(()),
            reporter,
        }
    }

    /// Begin a batch read session, replacing any session in flight.
    ///
    /// Returns an acknowledgement immediately; results arrive through the
    /// reporter once every target has been read. A target that is
    /// authenticable but never readable keeps the session pending forever;
    /// [`SessionDriver::cancel`] is the escape hatch.
    pub fn prepare_read(&self, targets: Vec<ReadTarget>, key_hex: &str) -> Result<String> {
        if targets.is_empty() {
            return Err(Error::Argument("empty target batch".into()));
        }
        let key = MifareKey::from_hex(key_hex)?;
        let mut st = self.lock_state();
        st.replace(Session::Read(ReadSession {
            pending: targets.clone(),
            original: targets,
            completed: Vec::new(),
            key,
        }));
        Ok("read session started; present the tag".to_string())
    }

    /// Begin a batch write session, replacing any session in flight.
    ///
    /// Every payload must decode to exactly 16 bytes; otherwise the whole
    /// batch is rejected with `DATA_LENGTH_ERROR` and no session state
    /// changes.
    pub fn prepare_write(&self, specs: Vec<WriteSpec>, key_hex: &str) -> Result<String> {
        if specs.is_empty() {
            return Err(Error::Argument("empty target batch".into()));
        }
        let key = MifareKey::from_hex(key_hex)?;
        let targets = specs
            .iter()
            .map(WriteSpec::decode)
            .collect::<Result<Vec<WriteTarget>>>()?;
        let mut st = self.lock_state();
        st.replace(Session::Write(WriteSession {
            pending: targets.clone(),
            original: targets,
            completed: Vec::new(),
            key,
        }));
        Ok("write session started; present the tag".to_string())
    }

    /// Begin a full-card reset session, replacing any session in flight.
    pub fn prepare_reset(&self, key_hex: &str) -> Result<String> {
        let key = MifareKey::from_hex(key_hex)?;
        let mut st = self.lock_state();
        st.replace(Session::Reset(ResetSession {
            total_sectors: None,
            pending_sectors: Vec::new(),
            completed_sectors: Vec::new(),
            key,
        }));
        Ok("reset session started; present the tag".to_string())
    }

    /// Cancel whatever is in flight. Idempotent; cancelling an idle driver
    /// is a no-op success.
    pub fn cancel(&self) -> String {
        let mut st = self.lock_state();
        st.replace(Session::Idle);
        "operation cancelled".to_string()
    }

    /// True when no session is active.
    pub fn is_idle(&self) -> bool {
        self.lock_state().session.is_idle()
    }

    /// Operation kind of the active session, if any.
    pub fn kind(&self) -> Option<OperationKind> {
        self.lock_state().session.kind()
    }

    /// Identity the active session is bound to, once a tag has been seen.
    pub fn bound_uid(&self) -> Option<Uid> {
        self.lock_state().uid.clone()
    }

    /// Run one round against a presented tag.
    ///
    /// Called once per physical presentation. Presentations arriving while a
    /// round is still running are rejected by the gate and dropped; the
    /// session fields stay single-writer.
    pub fn on_tag(&self, tag: &mut dyn MifareTag) {
        let Ok(_round) = self.round_gate.try_lock() else {
            log::warn!("presentation ignored: a round is already running");
            return;
        };

        // Bind or check the card identity, then take the session out for
        // the duration of the round.
        let (mut session, epoch) = {
            let mut st = self.lock_state();
            if st.session.is_idle() {
                return;
            }
            match &st.uid {
                None => st.uid = Some(Uid::from_bytes(tag.uid())),
                Some(bound) if bound.as_bytes() != tag.uid() => {
                    st.replace(Session::Idle);
                    drop(st);
                    self.reporter.report(Event::Error {
                        code: Error::WrongTag.code(),
                        message: "a different tag was presented; session aborted".into(),
                    });
                    return;
                }
                Some(_) => {}
            }
            let epoch = st.epoch;
            (std::mem::take(&mut st.session), epoch)
        };

        let outcome = run_round(&mut session, tag);

        // Commit only if nobody replaced the session mid-round; otherwise
        // the round's outcome and events belong to a cancelled session.
        let mut st = self.lock_state();
        if st.epoch != epoch {
            log::debug!("round outcome dropped; session was replaced mid-round");
            return;
        }
        match outcome {
            RoundResult::Continue(event) => {
                st.session = session;
                drop(st);
                if let Some(event) = event {
                    self.reporter.report(event);
                }
            }
            RoundResult::Finished(event) => {
                st.replace(Session::Idle);
                drop(st);
                self.reporter.report(event);
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state lock poisoned")
    }
}

/// Round result as seen by the driver: either the session survives (with an
/// optional progress/error event) or it finished.
enum RoundResult {
    Continue(Option<Event>),
    Finished(Event),
}

fn run_round(session: &mut Session, tag: &mut dyn MifareTag) -> RoundResult {
    let mut conn = match Connection::open(tag) {
        Ok(conn) => conn,
        Err(err @ Error::TagNotSupported) => {
            return RoundResult::Continue(Some(Event::from_error(&err)));
        }
        Err(err) => {
            log::warn!("tag connect failed: {}; session kept for retry", err);
            return RoundResult::Continue(None);
        }
    };

    let result = match session {
        Session::Idle => return RoundResult::Continue(None),
        Session::Read(s) => read::run_round(s, &mut conn),
        Session::Write(s) => write::run_round(s, &mut conn),
        Session::Reset(s) => reset::run_round(s, &mut conn),
    };
    drop(conn);

    match result {
        Ok(RoundOutcome::Finished(event)) => RoundResult::Finished(event),
        Ok(RoundOutcome::Progress {
            kind,
            total,
            completed,
        }) => RoundResult::Continue(Some(Event::Progress {
            kind,
            total,
            completed,
        })),
        Err(Error::TagLost) => {
            log::debug!("tag left the field mid-round; pending work kept");
            RoundResult::Continue(None)
        }
        Err(err) => {
            log::warn!("round aborted: {}; session kept for retry", err);
            RoundResult::Continue(Some(Event::from_error(&err)))
        }
    }
}
