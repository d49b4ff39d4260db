// mifare-session/src/prelude.rs

#![allow(missing_docs)]
//! Convenience re-exports of the types most callers need.

pub use crate::reporter::{ChannelReporter, Event, RecordingReporter, Reporter};
pub use crate::session::{ReadSession, ResetSession, Session, SessionDriver, WriteSession};
pub use crate::tag::{Connection, MifareTag, MockTag};
pub use crate::{
    BlockData, Error, MifareKey, OperationKind, ReadRecord, ReadTarget, Result, Uid, WriteRecord,
    WriteSpec, WriteTarget,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, parse_hex};
