//! Staging files and the platform seam that commits or discards them.
//!
//! A staging file is created next to its destination so the final rename
//! never crosses a filesystem. What differs between platforms is only the
//! order of "close" and "rename", and who deletes the file on failure; that
//! difference lives behind [`StagingBackend`]:
//!
//! - [`RenameOpen`]: the handle stays open through the rename and is closed
//!   afterwards. The temp file's delete-on-drop stays armed until the rename
//!   succeeded, so any early exit removes it.
//! - [`CloseFirst`]: for platforms that cannot rename or replace an open
//!   file. The handle is closed and the delete-on-drop disarmed before the
//!   rename; failures delete the staging file explicitly.
//!
//! Both backends are plain portable code so either can be exercised anywhere.
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Seek, Write};
use std::path::Path;

use tempfile::{NamedTempFile, PersistError};

use super::atomic::fsync_dir;
use crate::constants::STAGING_RAND_LEN;
use crate::types::TargetPath;

/// An open, uniquely named file in the destination's directory.
pub struct Staging {
    file: NamedTempFile,
}

impl Staging {
    /// Create a staging file for `target`, named `{basename}.{random}{suffix}`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from creating the file (missing directory,
    /// permissions, read-only filesystem).
    pub fn create(target: &TargetPath, suffix: &str) -> io::Result<Self> {
        let mut prefix = OsString::from(target.file_name());
        prefix.push(".");
        let file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(suffix)
            .rand_bytes(STAGING_RAND_LEN)
            .tempfile_in(target.dir())?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn as_file(&self) -> &File {
        self.file.as_file()
    }

    pub fn as_file_mut(&mut self) -> &mut File {
        self.file.as_file_mut()
    }
}

impl Write for Staging {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Read for Staging {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for Staging {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl fmt::Debug for Staging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Staging").field("path", &self.path()).finish()
    }
}

/// Capability interface between the write session and the platform.
///
/// `commit` and `discard` consume the staging file; whichever is called is
/// the single cleanup of a session. A failed `commit` must still leave no
/// staging artifact behind (best effort) and must not touch the destination.
pub trait StagingBackend: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Create the staging file for `target`.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O error; nothing is left on disk.
    fn create_staging(&self, target: &TargetPath, suffix: &str) -> io::Result<Staging> {
        Staging::create(target, suffix)
    }

    /// Atomically replace the destination with the (already synced) staging file.
    ///
    /// # Errors
    ///
    /// Propagates the rename error after removing the staging file.
    fn commit(&self, staging: Staging, target: &TargetPath) -> io::Result<()>;

    /// Delete the staging file.
    ///
    /// # Errors
    ///
    /// Propagates the removal error.
    fn discard(&self, staging: Staging) -> io::Result<()>;

    /// Make the rename durable by syncing the destination's directory.
    ///
    /// # Errors
    ///
    /// Propagates the open or fsync error; the rename itself already happened.
    fn sync_dir(&self, dir: &Path) -> io::Result<()> {
        fsync_dir(dir)
    }
}

/// Rename while the staging handle is still open; close afterwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenameOpen;

impl StagingBackend for RenameOpen {
    fn name(&self) -> &'static str {
        "rename_open"
    }

    fn commit(&self, staging: Staging, target: &TargetPath) -> io::Result<()> {
        match staging.file.persist(target.as_path()) {
            Ok(file) => {
                drop(file);
                Ok(())
            }
            Err(PersistError { error, file }) => {
                if let Err(e) = file.close() {
                    log::warn!("failed to remove staging file after rename error: {e}");
                }
                Err(error)
            }
        }
    }

    fn discard(&self, staging: Staging) -> io::Result<()> {
        staging.file.close()
    }
}

/// Close the staging handle before renaming; delete explicitly on failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct CloseFirst;

impl StagingBackend for CloseFirst {
    fn name(&self) -> &'static str {
        "close_first"
    }

    fn commit(&self, staging: Staging, target: &TargetPath) -> io::Result<()> {
        // Closing the handle here; from now on nothing deletes the file for us.
        let kept = staging.file.into_temp_path().keep().map_err(|e| e.error)?;
        match fs::rename(&kept, target.as_path()) {
            Ok(()) => Ok(()),
            Err(error) => {
                if let Err(e) = fs::remove_file(&kept) {
                    log::warn!(
                        "failed to remove staging file {} after rename error: {e}",
                        kept.display()
                    );
                }
                Err(error)
            }
        }
    }

    fn discard(&self, staging: Staging) -> io::Result<()> {
        let kept = staging.file.into_temp_path().keep().map_err(|e| e.error)?;
        fs::remove_file(kept)
    }
}

/// The backend matching the current platform's rename semantics.
#[must_use]
pub fn default_backend() -> Box<dyn StagingBackend> {
    if cfg!(windows) {
        Box::new(CloseFirst)
    } else {
        Box::new(RenameOpen)
    }
}
