//! Directory durability helpers.
//!
//! After a rename the directory entry change lives in the parent directory;
//! on unix it is made durable by fsyncing a handle to that directory, opened
//! with `O_DIRECTORY` so only a real directory (or a link to one) qualifies.
//! Other platforms do not expose directory fsync and treat it as a no-op.
use std::path::Path;

#[cfg(unix)]
use rustix::fd::OwnedFd;
#[cfg(unix)]
use rustix::fs::{openat, Mode, OFlags, CWD};

#[cfg(unix)]
fn errno_to_io(e: rustix::io::Errno) -> std::io::Error {
    std::io::Error::from_raw_os_error(e.raw_os_error())
}

/// Open a directory read-only with `O_DIRECTORY`.
///
/// # Errors
///
/// Returns an IO error if the path cannot be opened or is not a directory.
#[cfg(unix)]
pub fn open_dir(dir: &Path) -> std::io::Result<OwnedFd> {
    openat(
        CWD,
        dir,
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
        Mode::empty(),
    )
    .map_err(errno_to_io)
}

/// Fsync the directory `dir` so a completed rename survives a crash.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be opened or fsynced.
#[cfg(unix)]
pub fn fsync_dir(dir: &Path) -> std::io::Result<()> {
    let dirfd = open_dir(dir)?;
    rustix::fs::fsync(&dirfd).map_err(errno_to_io)
}

#[cfg(not(unix))]
pub fn fsync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
