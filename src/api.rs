// Facade for API module; delegates to submodules under src/api/

use std::path::Path;
use std::sync::OnceLock;

use log::Level;

use crate::fs::{default_backend, StagingBackend};
use crate::logging::{AuditSink, FactsEmitter, LogSink};
use crate::policy::Policy;
use crate::types::{Error, IntoMode, Mode, Result, WriteOptions, WriteReport};

#[path = "api/builder.rs"]
mod builder;
#[path = "api/session.rs"]
mod session;

pub use builder::WriterBuilder;
pub use session::AtomicFile;

/// Entry point for atomic writes.
///
/// Holds the sinks facts and audit lines go to, the [`Policy`], and the
/// [`StagingBackend`] for the current platform. A writer is cheap to share:
/// sessions borrow it, and it is `Sync` whenever its sinks are.
///
/// Concurrent sessions targeting the same destination each stage into their
/// own file; whichever commits last wins. There is no locking or merging.
pub struct AtomicWriter<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    policy: Policy,
    backend: Box<dyn StagingBackend>,
}

impl<E: FactsEmitter, A: AuditSink> AtomicWriter<E, A> {
    pub fn new(facts: E, audit: A, policy: Policy) -> Self {
        Self {
            facts,
            audit,
            policy: policy.with_env_overrides(),
            backend: default_backend(),
        }
    }

    /// Replace the platform-default staging backend.
    pub fn with_backend(mut self, backend: Box<dyn StagingBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn backend(&self) -> &dyn StagingBackend {
        self.backend.as_ref()
    }

    fn parts(&self) -> session::Parts<'_> {
        session::Parts {
            facts: &self.facts,
            audit: &self.audit,
            policy: &self.policy,
            backend: self.backend.as_ref(),
        }
    }

    /// Open a write session for `path`.
    ///
    /// Nothing is visible at `path` until [`AtomicFile::commit`]. Dropping the
    /// handle without committing discards the staged content, unless
    /// `options.force` is set, in which case it is committed anyway.
    ///
    /// # Errors
    ///
    /// - `InvalidMode` if `mode` does not request write access.
    /// - `InvalidTarget` if `path` is not a regular, file-backed path.
    /// - `Io` if the staging file cannot be created.
    ///
    /// No staging file exists after any of these.
    pub fn open(
        &self,
        path: impl AsRef<Path>,
        mode: impl IntoMode,
        options: WriteOptions,
    ) -> Result<AtomicFile<'_>> {
        AtomicFile::open(self.parts(), path.as_ref(), mode, options)
    }

    /// Run `body` against a write session and commit if it returns `Ok`.
    ///
    /// An `Err` from `body` is returned unchanged after the session is cleaned
    /// up: the staging file is discarded, or committed when `options.force`
    /// is set. Errors from that cleanup are reported to the audit sink and
    /// never replace the body's error.
    ///
    /// # Errors
    ///
    /// The body's error, or this crate's [`Error`] converted into `Err`.
    pub fn with_atomic_write<T, BodyErr, F>(
        &self,
        path: impl AsRef<Path>,
        mode: impl IntoMode,
        options: WriteOptions,
        body: F,
    ) -> std::result::Result<T, BodyErr>
    where
        F: FnOnce(&mut AtomicFile<'_>) -> std::result::Result<T, BodyErr>,
        BodyErr: From<Error>,
    {
        let mut file = self.open(path, mode, options)?;
        match body(&mut file) {
            Ok(value) => {
                file.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(cleanup) = file.abort() {
                    self.audit.log(
                        Level::Error,
                        &format!("cleanup after failed write body also failed: {cleanup}"),
                    );
                }
                Err(e)
            }
        }
    }

    /// Atomically replace `path` with `text` (text mode, newline translation applies).
    ///
    /// # Errors
    ///
    /// See [`AtomicWriter::open`] and [`AtomicFile::commit`].
    pub fn write_text(&self, path: impl AsRef<Path>, text: &str) -> Result<WriteReport> {
        let mut file = self.open(path, Mode::TEXT, WriteOptions::default())?;
        write_step(file.write_text(text))?;
        file.commit()
    }

    /// Atomically replace `path` with `bytes`.
    ///
    /// # Errors
    ///
    /// See [`AtomicWriter::open`] and [`AtomicFile::commit`].
    pub fn write_bytes(&self, path: impl AsRef<Path>, bytes: &[u8]) -> Result<WriteReport> {
        use std::io::Write as _;
        let mut file = self.open(path, Mode::BINARY, WriteOptions::default())?;
        write_step(file.write_all(bytes))?;
        file.commit()
    }
}

fn write_step<T>(r: std::io::Result<T>) -> Result<T> {
    r.map_err(|e| Error::io(crate::types::IoStep::Write, e))
}

/// The writer behind the free functions: default policy, facts and audit
/// lines forwarded to the `log` facade.
pub fn default_writer() -> &'static AtomicWriter<LogSink, LogSink> {
    static DEFAULT: OnceLock<AtomicWriter<LogSink, LogSink>> = OnceLock::new();
    DEFAULT.get_or_init(|| AtomicWriter::new(LogSink, LogSink, Policy::default()))
}

/// Open a write session on the [`default_writer`].
///
/// ```no_run
/// use atomwrite::{open_atomic, WriteOptions};
///
/// let mut f = open_atomic("results.csv", "w", WriteOptions::default())?;
/// f.write_text("epoch,loss\n")?;
/// f.write_text("1,0.25\n")?;
/// f.commit()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// See [`AtomicWriter::open`].
pub fn open_atomic(
    path: impl AsRef<Path>,
    mode: impl IntoMode,
    options: WriteOptions,
) -> Result<AtomicFile<'static>> {
    default_writer().open(path, mode, options)
}

/// [`AtomicWriter::with_atomic_write`] on the [`default_writer`].
///
/// # Errors
///
/// See [`AtomicWriter::with_atomic_write`].
pub fn with_atomic_write<T, BodyErr, F>(
    path: impl AsRef<Path>,
    mode: impl IntoMode,
    options: WriteOptions,
    body: F,
) -> std::result::Result<T, BodyErr>
where
    F: FnOnce(&mut AtomicFile<'_>) -> std::result::Result<T, BodyErr>,
    BodyErr: From<Error>,
{
    default_writer().with_atomic_write(path, mode, options, body)
}

/// Atomically replace `path` with `text`.
///
/// # Errors
///
/// See [`AtomicWriter::write_text`].
pub fn write_text_atomic(path: impl AsRef<Path>, text: &str) -> Result<WriteReport> {
    default_writer().write_text(path, text)
}

/// Atomically replace `path` with `bytes`.
///
/// # Errors
///
/// See [`AtomicWriter::write_bytes`].
pub fn write_bytes_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<WriteReport> {
    default_writer().write_bytes(path, bytes)
}
