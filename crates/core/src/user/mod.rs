//! User module
//!
//! User accounts, their preferences and the storage they reference.

mod model;
mod repository;

pub use model::*;
pub use repository::{FileStorage, UserDirectory};
