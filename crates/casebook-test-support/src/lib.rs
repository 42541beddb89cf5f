//! Shared test mocks and fixtures for the Casebook learning game.

mod clock;
mod content;
mod render;
mod rng;
mod store;

pub use clock::{FixedClock, ManualClock};
pub use content::{
    CHOICE_BOUNDS, CourseFixture, RIGHT_ANSWER, StaticContentResolver, WRONG_ANSWER, choice_scene,
    level_fixture,
};
pub use render::RecordingRenderer;
pub use rng::{MockRng, SequenceRng};
pub use store::{
    FailingProgressStore, FlakyProgressStore, RecordingProgressStore, StallingProgressStore,
};
