//! Route handlers

pub mod account;
pub mod health;
pub mod reorder;
mod response;

pub use response::FunctionResponse;
