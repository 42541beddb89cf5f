//! Casebook — Scene director.
//!
//! The progression state machine: decides which screen to show, enforces
//! reading, timing and selection gates, counts retries, tells first play
//! from replay, and asks the progress tracker to persist. Each screen is an
//! explicit [`domain::stage::Stage`] built by a transition function; input is
//! routed by hit-testing the stage and mapped to [`domain::stage::Action`]s.

pub mod application;
pub mod domain;

pub use application::director::Director;
pub use domain::config::DirectorConfig;
pub use domain::gate::{ClientEnvironment, EnvironmentGate, GateRefusal, UserAgentGate};
pub use domain::screen::{Overlay, Screen};
