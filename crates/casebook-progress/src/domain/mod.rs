//! Progress domain types.

pub mod advance;
pub mod retry;
