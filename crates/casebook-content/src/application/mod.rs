//! Content resolution and caching.

pub mod cache;
pub mod resolver;
