//! Casebook Core — shared domain abstractions.
//!
//! This crate defines the value types and collaborator traits that every
//! other crate depends on: geometry, the progress cursor, the progress store
//! boundary, and the clock/RNG seams. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod geometry;
pub mod progress;
pub mod rng;
pub mod store;
