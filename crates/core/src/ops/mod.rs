//! Request-level operations
//!
//! Each operation takes its backend collaborators explicitly and issues
//! backend calls one at a time. A failure stops the operation; calls that
//! already succeeded are not undone.

mod purge;
mod reorder;

pub use purge::{purge_account, AccountAction, PurgeReport};
pub use reorder::{reassign_order, ReorderOptions};
