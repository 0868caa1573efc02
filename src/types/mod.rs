pub mod errors;
pub mod ids;
pub mod mode;
pub mod options;
pub mod report;
pub mod target;

pub use errors::*;
pub use ids::*;
pub use mode::*;
pub use options::*;
pub use report::*;
pub use target::*;
