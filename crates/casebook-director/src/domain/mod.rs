//! Director domain types.

pub mod config;
pub mod gate;
pub mod layout;
pub mod messages;
pub mod screen;
pub mod stage;
