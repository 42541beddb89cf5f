//! Casebook — Course content.
//!
//! Responsible for the static definition of the game: the course map, its
//! sessions, levels and scenes. Sessions are authored as YAML with Markdown
//! reading material and are materialized lazily, once per session index.

pub mod application;
pub mod domain;
