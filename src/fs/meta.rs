//! Filesystem metadata helpers used for target validation and facts.
//!
//! This module provides conservative, non-mutating probes for:
//! - `resolved_kind_of(path)`: classify the node a path resolves to
//! - `sha256_hex_of(path)`: content hash recorded on commit facts
use sha2::{Digest, Sha256};
use std::fs::FileType;
use std::path::Path;

/// Compute SHA-256 of a file at `path`, returning a lowercase hex string.
pub fn sha256_hex_of(path: &Path) -> Option<String> {
    let mut f = std::fs::File::open(path).ok()?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut f, &mut hasher).ok()?;
    let out = hasher.finalize();
    Some(hex::encode(out))
}

/// Describe the kind of node `path` resolves to; a dangling link reports `missing`.
pub fn resolved_kind_of(path: &Path) -> &'static str {
    match std::fs::metadata(path) {
        Ok(md) => classify(md.file_type()),
        Err(_) => "missing",
    }
}

fn classify(ft: FileType) -> &'static str {
    if ft.is_file() {
        return "file";
    }
    if ft.is_dir() {
        return "dir";
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if ft.is_fifo() {
            return "fifo";
        }
        if ft.is_socket() {
            return "socket";
        }
        if ft.is_char_device() {
            return "char_device";
        }
        if ft.is_block_device() {
            return "block_device";
        }
    }
    "unknown"
}
