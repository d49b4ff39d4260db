// mifare-session/src/lib.rs

//! mifare-session
//!
//! Incremental multi-tap batch session protocol for MIFARE Classic style
//! memory cards. A batch of block-level read or write targets (or a
//! full-card reset) is executed across as many physical tag presentations as
//! it takes: each tap runs one round, the still-pending subset persists
//! between taps, per-sector authentication is cached within a tap, and
//! progress/results are pushed to an asynchronous reporter. The physical
//! radio layer stays behind the [`tag::MifareTag`] capability trait.
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod prelude;
pub mod reporter;
pub mod session;
pub mod tag;
pub mod test_support;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
