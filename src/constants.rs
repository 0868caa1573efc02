//! Shared crate-wide constants for atomwrite.
//!
//! Centralizes magic values and default labels used across modules.
//! Adjusting these here will propagate through the crate.

/// Default suffix appended to staging file names.
/// The full name is `{basename}.{random}{STAGING_SUFFIX}`; e.g., `out.txt.a1B2c3.atomwrite.tmp`.
pub const STAGING_SUFFIX: &str = ".atomwrite.tmp";

/// Number of random characters tempfile inserts between prefix and suffix.
pub const STAGING_RAND_LEN: usize = 8;

/// Threshold in milliseconds above which an fsync duration is annotated with a WARN severity
/// on the `write.commit` fact.
pub const FSYNC_WARN_MS: u64 = 50;

/// Schema version stamped into every emitted fact.
pub const SCHEMA_VERSION: i64 = 1;

/// Subsystem label passed to `FactsEmitter::emit`.
pub const SUBSYSTEM: &str = "atomwrite";

/// UUIDv5 namespace tag for write-session identifiers.
pub const NS_TAG: &str = "https://atomwrite/write-session";

/// Gate for the env overrides below; without it they are ignored.
pub const ENV_ALLOW_OVERRIDES: &str = "ATOMWRITE_ALLOW_ENV_OVERRIDES";

/// When set to `1` (and overrides are allowed) all fsync calls are skipped.
pub const ENV_NO_FSYNC: &str = "ATOMWRITE_NO_FSYNC";

/// Pseudo paths that name a file descriptor or stream rather than a file.
pub const FD_PSEUDO_PATHS: &[&str] = &["-", "/dev/stdin", "/dev/stdout", "/dev/stderr"];

/// Directory prefixes whose entries are file-descriptor aliases.
pub const FD_PSEUDO_DIRS: &[&str] = &["/dev/fd", "/proc/self/fd"];
