//! Casebook UI — the component capability contract and the renderer boundary.
//!
//! Widgets resolve into [`render::DrawOp`]s; a [`render::Renderer`] receives
//! one ordered [`render::Frame`] per screen update. Later draw operations
//! layer above earlier ones.

pub mod component;
pub mod input;
pub mod render;
pub mod widget;
pub mod widgets;

pub use component::{Component, DrawContext, Interaction};
pub use input::{Input, Key};
pub use render::{DrawOp, Frame, FrameRecorder, Renderer, Tone};
pub use widget::Widget;
