//! Casebook — Progress tracking.
//!
//! Owns the canonical progress cursor of one player: access validation,
//! level and session wrap-around, per-scene retry counting, and commits to
//! the progress store with timeouts and backoff.

pub mod application;
pub mod domain;
