//! Core library for the todo reorder functions
//!
//! This crate contains the core business logic, including:
//! - Task records and the status-grouped reindexing
//! - User records and avatar references
//! - Backend clients (Appwrite REST, in-memory)
//! - The reorder and account purge operations

pub mod appwrite;
pub mod error;
pub mod memory;
pub mod ops;
pub mod task;
pub mod user;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
