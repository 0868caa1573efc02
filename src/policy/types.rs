use serde::{Deserialize, Serialize};

use crate::constants::STAGING_SUFFIX;

/// Which fsync calls a commit performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Durability {
    /// `sync_all` on the staging file before it is renamed into place.
    pub sync_file: bool,
    /// fsync the destination directory after the rename (unix only).
    pub sync_parent_dir: bool,
}

impl Default for Durability {
    fn default() -> Self {
        Self {
            sync_file: true,
            sync_parent_dir: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Audit {
    /// Zero timestamps and drop volatile fields on emitted facts.
    pub redact: bool,
    /// Record the SHA-256 of committed content on the report and commit fact.
    pub hash_content: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Staging {
    /// Suffix of staging file names; the destination basename is always the prefix.
    pub suffix: String,
}

impl Default for Staging {
    fn default() -> Self {
        Self {
            suffix: STAGING_SUFFIX.to_string(),
        }
    }
}
