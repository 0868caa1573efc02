//! Policy configuration for durability, staging and audit behavior.
//!
//! Consumers typically construct a [`Policy`](crate::policy::Policy) via
//! presets (`fast_preset`, `hardened_preset`) and then customize fields
//! before building an [`AtomicWriter`](crate::AtomicWriter).
//!
//! Submodules:
//! - `config`: policy struct, presets and env overrides
//! - `types`: grouped policy sections

pub mod config;
pub mod types;

pub use config::Policy;
