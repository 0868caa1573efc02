use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a committed write session.
#[derive(Clone, Debug, Default, Serialize)]
pub struct WriteReport {
    pub path: PathBuf,
    pub len: u64,
    pub fsync_ms: u64,
    /// SHA-256 of the committed content, when `policy.audit.hash_content` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// Whether the commit happened on an abnormal exit because `force` was set.
    pub forced: bool,
}
