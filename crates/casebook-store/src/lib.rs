//! Casebook — Progress stores.
//!
//! Implementations of [`casebook_core::store::ProgressStore`]: a client for
//! the remote session store and an in-memory store for local play.

pub mod http;
pub mod memory;

pub use http::HttpProgressStore;
pub use memory::MemoryProgressStore;
