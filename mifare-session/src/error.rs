// mifare-session/src/error.rs

use thiserror::Error;

/// Crate-wide error type.
///
/// Variants map 1:1 onto the wire-level error codes delivered to callers via
/// [`crate::reporter::Event::Error`]; see [`Error::code`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("block payload must be {expected} bytes, got {actual}")]
    DataLength { expected: usize, actual: usize },

    #[error("a different tag was presented mid-session")]
    WrongTag,

    #[error("authentication failed for sector {sector}")]
    AuthFailed { sector: u8 },

    #[error("tag is not a supported sector/block memory card")]
    TagNotSupported,

    // Transient single-transfer failure; the affected item stays pending.
    #[error("tag i/o error: {0}")]
    Io(String),

    // Total communication loss; the running round must stop, not spin.
    #[error("tag left the field")]
    TagLost,

    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl Error {
    /// Fixed-vocabulary error code reported to callers.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Argument(_) => "ARGUMENT_ERROR",
            Error::DataLength { .. } => "DATA_LENGTH_ERROR",
            Error::WrongTag => "WRONG_TAG",
            Error::AuthFailed { .. } => "AUTH_ERROR",
            Error::TagNotSupported => "TAG_NOT_SUPPORTED",
            Error::Io(_) | Error::TagLost => "IO_ERROR",
            Error::Unknown(_) => "UNKNOWN_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
