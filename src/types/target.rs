use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

use super::errors::{Error, Result};
use crate::constants::{FD_PSEUDO_DIRS, FD_PSEUDO_PATHS};
use crate::fs::meta::resolved_kind_of;

/// A validated destination for an atomic write.
///
/// The path is absolute with `.` components removed, ends in a normal file
/// name, and does not name a stream, a file descriptor alias or an existing
/// non-regular file. Its parent directory is where the staging file lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetPath {
    /// Directory that holds both the destination and its staging file
    dir: PathBuf,
    /// Final path component
    name: OsString,
}

impl TargetPath {
    /// Normalizes `candidate` and checks that it is a file-backed path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` if the path is empty, has no file name, names a
    /// stream or fd alias, or already exists as something other than a regular
    /// file (directory, FIFO, socket, device). Symlinks are resolved for that check.
    pub fn new(candidate: &Path) -> Result<Self> {
        if candidate.as_os_str().is_empty() {
            return Err(Error::invalid_target("empty path"));
        }
        reject_fd_alias(candidate)?;

        let absolute = std::path::absolute(candidate).map_err(|e| {
            Error::invalid_target(format!("cannot resolve {}: {e}", candidate.display()))
        })?;
        let mut norm = PathBuf::new();
        for seg in absolute.components() {
            match seg {
                Component::CurDir => {}
                other => norm.push(other.as_os_str()),
            }
        }
        reject_fd_alias(&norm)?;

        let name = match norm.components().next_back() {
            Some(Component::Normal(n)) => n.to_os_string(),
            _ => {
                return Err(Error::invalid_target(format!(
                    "{} has no file name",
                    candidate.display()
                )))
            }
        };
        let dir = norm
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::invalid_target("path has no parent directory"))?;

        let target = TargetPath { dir, name };
        match resolved_kind_of(&target.as_path()) {
            "file" | "missing" => Ok(target),
            kind => Err(Error::invalid_target(format!(
                "{} is a {kind}, not a regular file",
                target.as_path().display()
            ))),
        }
    }

    /// Returns the full destination path.
    pub fn as_path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    /// Directory the staging file is created in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self) -> &OsStr {
        &self.name
    }
}

fn reject_fd_alias(p: &Path) -> Result<()> {
    let is_alias = FD_PSEUDO_PATHS.iter().any(|a| p == Path::new(a))
        || FD_PSEUDO_DIRS
            .iter()
            .any(|d| p.starts_with(d) && p != Path::new(d));
    if is_alias {
        return Err(Error::invalid_target(format!(
            "{} names a stream or file descriptor, not a file",
            p.display()
        )));
    }
    Ok(())
}
