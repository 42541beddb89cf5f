//! The director and its screen builders.

pub mod director;
pub mod screens;
