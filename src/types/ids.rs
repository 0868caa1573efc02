//! UUIDv5 identifiers for write sessions.
//!
//! The UUID namespace is derived from a stable tag (`NS_TAG`). A session id
//! hashes the destination together with the process id and a per-process
//! sequence number, so ids are unique within a run and reproducible for the
//! same sequence of writes in the same process.
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::constants::NS_TAG;

static NEXT_SESSION: AtomicU64 = AtomicU64::new(0);

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Allocate the id of a new write session targeting `path`.
pub fn write_id(path: &Path) -> Uuid {
    let seq = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
    let name = format!("{}#{}#{seq}", path.display(), std::process::id());
    Uuid::new_v5(&namespace(), name.as_bytes())
}
