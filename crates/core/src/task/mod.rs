//! Task module
//!
//! This module contains task record types, the reindexing logic and the
//! repository interface used to read and write records.

mod model;
mod reindex;
mod repository;

pub use model::*;
pub use reindex::*;
pub use repository::TaskRepository;
