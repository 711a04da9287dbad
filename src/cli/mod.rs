//! CLI command implementations

mod chains;
pub mod context;
mod create;
mod push;
mod rename;
mod review;
mod select;
pub mod style;
mod sync;

pub use chains::run_chains;
pub use context::CommandContext;
pub use create::run_create;
pub use push::run_push;
pub use rename::run_rename;
pub use review::run_review;
pub use sync::{SyncOptions, run_sync};
