pub mod atomic;
pub mod meta;
pub mod staging;

pub use atomic::fsync_dir;
pub use meta::{resolved_kind_of, sha256_hex_of};
pub use staging::{default_backend, CloseFirst, RenameOpen, Staging, StagingBackend};
