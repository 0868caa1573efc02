use serde::{Deserialize, Serialize};

use super::types::{Audit, Durability, Staging};
use crate::constants::{ENV_ALLOW_OVERRIDES, ENV_NO_FSYNC};

/// Policy governs durability, staging naming and audit output for an
/// [`AtomicWriter`](crate::AtomicWriter).
///
/// Grouped fields provide clearer ownership and ergonomics. The default
/// policy syncs the staging file and its directory and emits unredacted facts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub durability: Durability,
    pub audit: Audit,
    pub staging: Staging,
}

impl Policy {
    /// Construct a Policy that skips every fsync.
    ///
    /// Visibility stays atomic (readers still see old or new content), but a
    /// power loss right after the rename may leave an empty or stale file.
    /// Suited to caches and scratch output that can be regenerated.
    #[must_use]
    pub fn fast_preset() -> Self {
        let mut p = Self::default();
        p.durability.sync_file = false;
        p.durability.sync_parent_dir = false;
        p
    }

    /// Construct a Policy that keeps full durability and records a content
    /// hash for every commit.
    ///
    /// # Example
    /// ```rust
    /// use atomwrite::policy::Policy;
    /// use atomwrite::{logging::JsonlSink, AtomicWriter};
    ///
    /// let writer = AtomicWriter::new(JsonlSink, JsonlSink, Policy::hardened_preset());
    /// # let _ = writer;
    /// ```
    #[must_use]
    pub fn hardened_preset() -> Self {
        let mut p = Self::default();
        p.audit.hash_content = true;
        p
    }

    /// Parse a policy from JSON; missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Return this policy with environment overrides applied.
    ///
    /// Overrides are only honored when `ATOMWRITE_ALLOW_ENV_OVERRIDES=1`;
    /// `ATOMWRITE_NO_FSYNC=1` then disables both fsync steps.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        let on = |k: &str| std::env::var_os(k).is_some_and(|v| v == "1");
        if on(ENV_ALLOW_OVERRIDES) && on(ENV_NO_FSYNC) {
            self.durability.sync_file = false;
            self.durability.sync_parent_dir = false;
        }
        self
    }
}
