//! Widget implementations.
//!
//! Each widget lives in its own module with its struct definition and
//! `Component` implementation side by side.

mod button;
mod choice;
mod dialog;
mod drag;
mod label;
mod paper;
mod selector;
mod timer;

pub use button::Button;
pub use choice::Choice;
pub use dialog::Dialog;
pub use drag::{Drag, DragItem};
pub use label::{Label, Picture};
pub use paper::{Paper, PaperBlock};
pub use selector::Selector;
pub use timer::Timer;
