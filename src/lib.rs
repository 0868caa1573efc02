#![forbid(unsafe_code)]
//! atomwrite: crash-safe, atomically visible file writes.
//!
//! Write model:
//! - Content is written to a uniquely named staging file in the destination's
//!   own directory, so the final step is a same-filesystem rename.
//! - On normal exit the staging file is flushed, fsynced and renamed over the
//!   destination; readers see either the old content or the complete new
//!   content, never a mix.
//! - On any other exit (error, `?`, panic unwinding) the staging file is
//!   deleted and the destination is left byte-for-byte unchanged.
//! - `force` commits the staged content even on abnormal exit. This trades
//!   "never partial" for "keep whatever was written"; it is off by default.
//! - Concurrent writers to the same destination are last-writer-wins.
//!
//! ```no_run
//! use atomwrite::{with_atomic_write, WriteOptions};
//!
//! with_atomic_write("config.toml", "w", WriteOptions::default(), |f| {
//!     f.write_text("[server]\nport = 8080\n")?;
//!     Ok::<_, std::io::Error>(())
//! })?;
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod constants;
pub mod api;
pub mod fs;
pub mod logging;
pub mod policy;
pub mod types;

pub use api::*;
pub use policy::Policy;
pub use types::{Error, ErrorKind, Mode, Newline, Result, WriteOptions, WriteReport};
