//! Content domain types.

pub mod check;
pub mod model;
pub mod paper;
pub mod source;
