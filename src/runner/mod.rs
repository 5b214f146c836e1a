//! Bootstrap orchestration.

pub mod bootstrap;
pub mod cleanup;
pub mod plan;

pub use bootstrap::{Bootstrap, COMPLETION_MESSAGE};
pub use cleanup::DownloadDir;
