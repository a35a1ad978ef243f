//! Appwrite backend module
//!
//! REST client for the hosted database, storage and users APIs.

mod client;
mod query;

pub use client::{AppwriteClient, AppwriteConfig, DEFAULT_ENDPOINT, LIST_PAGE_SIZE};
pub use query::Query;
