//! The write session handle.
//!
//! An [`AtomicFile`] owns one staging file from `open` until exactly one of
//! `commit`, `abort` or `Drop` runs. Normal exit commits; every other exit
//! (early return, `?`, panic unwinding, explicit abort) discards the staging
//! file, or commits it anyway when `force` is set.
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::constants::FSYNC_WARN_MS;
use crate::fs::{sha256_hex_of, Staging, StagingBackend};
use crate::logging::{AuditCtx, AuditSink, FactsEmitter, StageLogger};
use crate::policy::Policy;
use crate::types::errors::{id_str, Error, IoStep, Result};
use crate::types::{write_id, IntoMode, Mode, TargetPath, WriteOptions, WriteReport};

/// Borrowed collaborators of a session, handed out by [`AtomicWriter`](crate::AtomicWriter).
#[derive(Clone, Copy)]
pub(crate) struct Parts<'w> {
    pub facts: &'w dyn FactsEmitter,
    pub audit: &'w dyn AuditSink,
    pub policy: &'w Policy,
    pub backend: &'w dyn StagingBackend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exit {
    Normal,
    Abnormal,
}

/// Scoped writable handle onto a staging file.
///
/// Implements [`Write`] and [`Seek`] (bytes are written verbatim in every
/// mode) and [`Read`] for `+` modes. [`AtomicFile::write_text`] applies the
/// session's newline translation and is only available in text mode.
pub struct AtomicFile<'w> {
    out: Option<BufWriter<Staging>>,
    target: TargetPath,
    staging_path: PathBuf,
    mode: Mode,
    options: WriteOptions,
    parts: Parts<'w>,
    ctx: AuditCtx<'w>,
    started: Instant,
}

impl<'w> AtomicFile<'w> {
    pub(crate) fn open(
        parts: Parts<'w>,
        path: &Path,
        mode: impl IntoMode,
        options: WriteOptions,
    ) -> Result<Self> {
        let mut ctx = AuditCtx::new(
            parts.facts,
            write_id(path).to_string(),
            path.display().to_string(),
            parts.policy.audit.redact,
        );
        match Self::stage(parts, path, mode) {
            Ok((target, mode, staging)) => {
                let staging_path = staging.path().to_path_buf();
                ctx.path = target.as_path().display().to_string();
                StageLogger::new(&ctx)
                    .attempt()
                    .field("staging", json!(staging_path.display().to_string()))
                    .field("mode", json!(mode.to_string()))
                    .field("force", json!(options.force))
                    .field("backend", json!(parts.backend.name()))
                    .emit_success();
                let out = match options.buffer_capacity {
                    Some(cap) => BufWriter::with_capacity(cap, staging),
                    None => BufWriter::new(staging),
                };
                Ok(Self {
                    out: Some(out),
                    target,
                    staging_path,
                    mode,
                    options,
                    parts,
                    ctx,
                    started: Instant::now(),
                })
            }
            Err(e) => {
                parts.audit.log(
                    Level::Warn,
                    &format!("refusing atomic write to {}: {e}", path.display()),
                );
                StageLogger::new(&ctx)
                    .attempt()
                    .field("error_id", json!(id_str(e.id())))
                    .field("error", json!(e.msg))
                    .emit_failure();
                Err(e)
            }
        }
    }

    fn stage(
        parts: Parts<'w>,
        path: &Path,
        mode: impl IntoMode,
    ) -> Result<(TargetPath, Mode, Staging)> {
        let mode = mode.into_mode()?.require_write()?;
        let target = TargetPath::new(path)?;
        let staging = parts
            .backend
            .create_staging(&target, &parts.policy.staging.suffix)
            .map_err(|e| Error::io(IoStep::CreateStaging, e))?;
        Ok((target, mode, staging))
    }

    /// Destination this session will replace.
    pub fn target(&self) -> PathBuf {
        self.target.as_path()
    }

    /// Path of the staging file; its name starts with the destination's basename.
    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Write `text`, translating `\n` per the session's newline option.
    ///
    /// Returns the number of characters written.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on a binary-mode handle; otherwise the underlying write error.
    pub fn write_text(&mut self, text: &str) -> io::Result<usize> {
        if self.mode.is_binary() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "write_text on a binary-mode handle",
            ));
        }
        match self.options.newline.replacement() {
            Some(nl) if text.contains('\n') => self.write_all(text.replace('\n', nl).as_bytes())?,
            _ => self.write_all(text.as_bytes())?,
        }
        Ok(text.chars().count())
    }

    /// End the session normally: flush, sync and atomically replace the destination.
    ///
    /// # Errors
    ///
    /// Returns `Io` if flushing, syncing or the rename fails; the staging file
    /// is removed and the destination left untouched in that case.
    pub fn commit(mut self) -> Result<WriteReport> {
        self.finish(Exit::Normal)
            .map(|report| report.unwrap_or_default())
    }

    /// End the session abnormally: discard the staging file, or commit it
    /// anyway when `force` is set.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the discard or the forced commit.
    pub fn abort(mut self) -> Result<()> {
        self.finish(Exit::Abnormal).map(|_| ())
    }

    fn out_mut(&mut self) -> io::Result<&mut BufWriter<Staging>> {
        self.out
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "write session already finished"))
    }

    fn finish(&mut self, exit: Exit) -> Result<Option<WriteReport>> {
        let Some(out) = self.out.take() else {
            return Ok(None);
        };
        if exit == Exit::Normal || self.options.force {
            let forced = exit == Exit::Abnormal;
            if forced {
                self.parts.audit.log(
                    Level::Warn,
                    &format!(
                        "force-committing {} after an abnormal exit",
                        self.target.as_path().display()
                    ),
                );
            }
            self.commit_staging(out, forced).map(Some)
        } else {
            self.discard_staging(out).map(|()| None)
        }
    }

    fn commit_staging(&self, out: BufWriter<Staging>, forced: bool) -> Result<WriteReport> {
        let durability = self.parts.policy.durability;
        let staging = match out.into_inner() {
            Ok(s) => s,
            Err(e) => {
                let (error, buf) = e.into_parts();
                let (staging, _) = buf.into_parts();
                self.discard_quietly(staging);
                return Err(self.commit_failed(Error::io(IoStep::Flush, error), forced));
            }
        };
        let len = staging.as_file().metadata().map(|m| m.len()).unwrap_or(0);

        let t_sync = Instant::now();
        if durability.sync_file {
            if let Err(e) = staging.as_file().sync_all() {
                self.discard_quietly(staging);
                return Err(self.commit_failed(Error::io(IoStep::Sync, e), forced));
            }
        }
        let fsync_ms = u64::try_from(t_sync.elapsed().as_millis()).unwrap_or(u64::MAX);

        if let Err(e) = self.parts.backend.commit(staging, &self.target) {
            return Err(self.commit_failed(Error::io(IoStep::Rename, e), forced));
        }

        // The rename already happened; a failed directory sync only weakens durability.
        let mut degraded = false;
        if durability.sync_parent_dir {
            if let Err(e) = self.parts.backend.sync_dir(self.target.dir()) {
                degraded = true;
                self.parts.audit.log(
                    Level::Warn,
                    &format!(
                        "{} failed for {}: {e}",
                        IoStep::SyncParent.as_str(),
                        self.target.dir().display()
                    ),
                );
            }
        }

        let path = self.target.as_path();
        let content_hash = if self.parts.policy.audit.hash_content {
            sha256_hex_of(&path)
        } else {
            None
        };
        let report = WriteReport {
            path,
            len,
            fsync_ms,
            content_hash,
            forced,
        };
        let duration_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut ev = StageLogger::new(&self.ctx)
            .commit()
            .merge(serde_json::to_value(&report).unwrap_or_default())
            .field("path", json!(self.ctx.path))
            .field("bytes", json!(report.len))
            .field("duration_ms", json!(duration_ms))
            .field("backend", json!(self.parts.backend.name()));
        if fsync_ms > FSYNC_WARN_MS {
            ev = ev.field("severity", json!("warn"));
        }
        if degraded {
            ev.field("degraded", json!(true)).emit_warn();
        } else {
            ev.emit_success();
        }
        Ok(report)
    }

    fn commit_failed(&self, e: Error, forced: bool) -> Error {
        StageLogger::new(&self.ctx)
            .commit()
            .field("forced", json!(forced))
            .field("error_id", json!(id_str(e.id())))
            .field("error", json!(e.msg))
            .emit_failure();
        e
    }

    fn discard_staging(&self, out: BufWriter<Staging>) -> Result<()> {
        // Buffered bytes are dropped unwritten.
        let (staging, _) = out.into_parts();
        let duration_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match self.parts.backend.discard(staging) {
            Ok(()) => {
                StageLogger::new(&self.ctx)
                    .discard()
                    .field("staging", json!(self.staging_path.display().to_string()))
                    .field("duration_ms", json!(duration_ms))
                    .emit_success();
                Ok(())
            }
            Err(e) => {
                let e = Error::io(IoStep::Discard, e);
                StageLogger::new(&self.ctx)
                    .discard()
                    .field("staging", json!(self.staging_path.display().to_string()))
                    .field("error_id", json!(id_str(e.id())))
                    .field("error", json!(e.msg))
                    .emit_failure();
                Err(e)
            }
        }
    }

    fn discard_quietly(&self, staging: Staging) {
        if let Err(e) = self.parts.backend.discard(staging) {
            self.parts.audit.log(
                Level::Warn,
                &format!(
                    "failed to remove staging file {}: {e}",
                    self.staging_path.display()
                ),
            );
        }
    }
}

impl Write for AtomicFile<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out_mut()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out_mut()?.flush()
    }
}

impl Seek for AtomicFile<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.out_mut()?.seek(pos)
    }
}

impl Read for AtomicFile<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.mode.update {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("handle opened with mode {} is not readable", self.mode),
            ));
        }
        let out = self.out_mut()?;
        out.flush()?;
        out.get_mut().read(buf)
    }
}

impl Drop for AtomicFile<'_> {
    fn drop(&mut self) {
        if self.out.is_none() {
            return;
        }
        if let Err(e) = self.finish(Exit::Abnormal) {
            self.parts.audit.log(
                Level::Error,
                &format!(
                    "cleanup of write session for {} failed: {e}",
                    self.target.as_path().display()
                ),
            );
        }
    }
}

impl std::fmt::Debug for AtomicFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicFile")
            .field("target", &self.target.as_path())
            .field("staging", &self.staging_path)
            .field("mode", &self.mode)
            .field("force", &self.options.force)
            .field("finished", &self.out.is_none())
            .finish()
    }
}
