//! Error types used across atomwrite.
use std::io;

use thiserror::Error;

/// High-level error categories for the atomic writer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The destination is not a normal, file-backed path.
    #[error("invalid target")]
    InvalidTarget,
    /// The requested mode does not carry write intent.
    #[error("invalid mode")]
    InvalidMode,
    /// Staging creation, write, flush, sync or rename failed.
    #[error("io error")]
    Io,
}

/// Structured error with a kind, a human message and the underlying I/O error, if any.
#[derive(Debug, Error)]
#[error("{kind:?}: {msg}")]
pub struct Error {
    pub kind: ErrorKind,
    pub msg: String,
    #[source]
    pub source: Option<io::Error>,
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_target(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidTarget,
            msg: msg.into(),
            source: None,
        }
    }

    pub fn invalid_mode(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidMode,
            msg: msg.into(),
            source: None,
        }
    }

    /// Wrap an I/O error with the step that produced it.
    pub fn io(step: IoStep, source: io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            msg: format!("{} failed: {source}", step.as_str()),
            source: Some(source),
        }
    }

    /// The `io::ErrorKind` of the underlying failure, if this wraps one.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        self.source.as_ref().map(io::Error::kind)
    }

    /// Stable identifier for facts and callers that route on error class.
    #[must_use]
    pub fn id(&self) -> ErrorId {
        match self.kind {
            ErrorKind::InvalidTarget => ErrorId::E_INVALID_TARGET,
            ErrorKind::InvalidMode => ErrorId::E_INVALID_MODE,
            ErrorKind::Io if self.msg.starts_with(IoStep::CreateStaging.as_str()) => {
                ErrorId::E_STAGING
            }
            ErrorKind::Io if self.msg.starts_with(IoStep::Rename.as_str()) => ErrorId::E_COMMIT,
            ErrorKind::Io => ErrorId::E_IO,
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        let kind = match e.kind {
            ErrorKind::InvalidTarget | ErrorKind::InvalidMode => io::ErrorKind::InvalidInput,
            ErrorKind::Io => e.io_kind().unwrap_or(io::ErrorKind::Other),
        };
        io::Error::new(kind, e)
    }
}

/// The step of a write session an I/O error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStep {
    CreateStaging,
    Write,
    Flush,
    Sync,
    Rename,
    Discard,
    SyncParent,
}

impl IoStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            IoStep::CreateStaging => "create staging",
            IoStep::Write => "write",
            IoStep::Flush => "flush",
            IoStep::Sync => "sync",
            IoStep::Rename => "rename",
            IoStep::Discard => "discard",
            IoStep::SyncParent => "sync parent",
        }
    }
}

// Stable identifiers emitted on facts.
// We intentionally keep SCREAMING_SNAKE_CASE to match emitted IDs.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_INVALID_TARGET,
    E_INVALID_MODE,
    E_STAGING,
    E_COMMIT,
    E_IO,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_INVALID_TARGET => "E_INVALID_TARGET",
        ErrorId::E_INVALID_MODE => "E_INVALID_MODE",
        ErrorId::E_STAGING => "E_STAGING",
        ErrorId::E_COMMIT => "E_COMMIT",
        ErrorId::E_IO => "E_IO",
    }
}
