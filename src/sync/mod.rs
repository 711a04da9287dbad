//! Stacked sync engine
//!
//! Brings a selected [`PrChain`](crate::types::PrChain) up to date by merging
//! each base into its head, then publishes the heads:
//! 1. Refresh - optionally fast-forward every branch from its remote
//! 2. Sync - cascade merges from the trunk outwards (idempotent)
//! 3. Publish - push every head, in chain order

mod execute;
mod publish;

pub use execute::{SyncReport, find_unmerged, refresh_chain, sync_chain};
pub use publish::{PublishReport, push_chain};
