//! Transition targets: one function per screen, each building a whole stage.

use casebook_content::domain::model::{Course, Level, Scene, Session};
use casebook_core::progress::{Progress, ScenePosition};
use casebook_ui::widgets::{Button, Dialog, Label, Paper, Picture, Selector, Timer};
use casebook_ui::Tone;
use chrono::{DateTime, Duration, Utc};

use crate::domain::layout::Layout;
use crate::domain::screen::{Overlay, Screen};
use crate::domain::stage::{Action, Layer, OverlayStage, Stage};

fn with_menu(mut stage: Stage, layout: Layout) -> Stage {
    stage
        .layer
        .bind(Button::new(layout.menu_button(), "Menu"), Action::OpenMenu);
    stage
}

fn marker_tone(unlocked: bool, frontier: bool) -> Tone {
    match (unlocked, frontier) {
        (false, _) => Tone::Muted,
        (true, true) => Tone::Flashing,
        (true, false) => Tone::Normal,
    }
}

/// The course map. Every session marker is clickable; locked ones are muted
/// and rejected by access validation. The frontier session flashes.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn course_map(layout: Layout, course: &Course, progress: Progress) -> Stage {
    let mut stage = Stage::new(Screen::PickingSession);
    stage.layer.push(Label::new(layout.title(), course.title.clone()));
    for (index, entry) in course.sessions.iter().enumerate() {
        let index = index as u32;
        let tone = marker_tone(progress.allows(index, 0), progress.session == index);
        stage.layer.bind(
            Button::new(entry.marker, entry.title.clone()).with_tone(tone),
            Action::OpenSession(index),
        );
    }
    with_menu(stage, layout)
}

/// A session's level map. Levels up to the frontier are unlocked; the
/// frontier level flashes.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn level_map(layout: Layout, index: u32, session: &Session, progress: Progress) -> Stage {
    let mut stage = Stage::new(Screen::PickingLevel { session: index });
    if let Some(background) = &session.background {
        stage.layer.push(Picture::new(layout.canvas(), background.clone()));
    }
    stage.layer.push(Label::new(layout.title(), session.title.clone()));
    for (level, entry) in session.levels.iter().enumerate() {
        let level = level as u32;
        let frontier = progress.session == index && progress.level == level;
        let tone = marker_tone(progress.allows(index, level), frontier);
        stage.layer.bind(
            Button::new(entry.marker, entry.title.clone()).with_tone(tone),
            Action::OpenLevel {
                session: index,
                level,
            },
        );
    }
    with_menu(stage, layout)
}

/// The reading gate. The timer starts when the stage is built.
#[must_use]
pub fn reading(
    layout: Layout,
    (session, level_index): (u32, u32),
    level: &Level,
    line_height: f32,
    timer: (DateTime<Utc>, Duration),
    forced_review: bool,
) -> Stage {
    let mut stage = Stage::new(Screen::ReadingPaper {
        session,
        level: level_index,
        forced_review,
    });
    stage.layer.push(Label::new(layout.title(), level.paper.title.clone()));
    stage.layer.push(Paper::new(
        layout.paper(),
        level.paper.title.clone(),
        &level.paper.blocks,
        line_height,
    ));
    stage
        .layer
        .push(Timer::start(layout.timer(), timer.0, timer.1));
    stage.layer.bind(
        Button::new(layout.primary_button(), "Done reading").with_tone(Tone::Accent),
        Action::FinishReading,
    );
    stage.layer.primary = Some(Action::FinishReading);
    with_menu(stage, layout)
}

/// The object selection check over the level picture.
#[must_use]
pub fn selecting(layout: Layout, (session, level_index): (u32, u32), level: &Level) -> Stage {
    let mut stage = Stage::new(Screen::SelectingObjects {
        session,
        level: level_index,
    });
    let area = level
        .slots
        .iter()
        .copied()
        .reduce(|a, b| a.union(&b))
        .unwrap_or_else(|| layout.paper());
    stage.layer.push(Picture::new(area, level.picture.clone()));
    stage.layer.push(Label::new(layout.title(), level.prompt.clone()));
    stage.layer.push(Selector::new(area, level.slots.clone()));
    stage.layer.bind(
        Button::new(layout.primary_button(), "Confirm").with_tone(Tone::Accent),
        Action::ConfirmSelection,
    );
    stage.layer.primary = Some(Action::ConfirmSelection);
    with_menu(stage, layout)
}

fn backdrop(stage: &mut Stage, layout: Layout, scene: &Scene) {
    if let Some(backdrop) = &scene.backdrop {
        stage.layer.push(Picture::new(layout.canvas(), backdrop.clone()));
    }
}

/// A scene before the reveal. Replays have no attempt timer.
#[must_use]
pub fn playing(
    layout: Layout,
    position: ScenePosition,
    scene: &Scene,
    replay: bool,
    attempt: Option<(DateTime<Utc>, Duration)>,
) -> Stage {
    let mut stage = Stage::new(Screen::PlayingScene { position, replay });
    backdrop(&mut stage, layout, scene);
    stage.layer.push(Label::new(
        layout.title(),
        format!("Scene {}", position.scene + 1),
    ));
    if let Some((started_at, duration)) = attempt {
        stage
            .layer
            .push(Timer::start(layout.timer(), started_at, duration));
    }
    stage.layer.push(
        Label::new(layout.hint(), "Look closely, then click to answer.").with_tone(Tone::Muted),
    );
    stage.layer.background = Some(Action::RevealQuestion);
    with_menu(stage, layout)
}

/// The revealed scene: question, fresh components and the submit control,
/// all drawn above the freeze line.
#[must_use]
pub fn post_answer(layout: Layout, position: ScenePosition, scene: &Scene, replay: bool) -> Stage {
    let mut stage = Stage::new(Screen::ScenePostAnswer { position, replay });
    backdrop(&mut stage, layout, scene);
    stage.layer.freeze_below();
    stage
        .layer
        .push(Dialog::new(layout.question(), "Question", scene.question.clone()));
    let first = stage.layer.widgets.len();
    for widget in scene.instantiate() {
        stage.layer.push(widget);
    }
    stage.components = first..stage.layer.widgets.len();
    stage.layer.bind(
        Button::new(layout.primary_button(), "Submit answer").with_tone(Tone::Accent),
        Action::SubmitAnswer,
    );
    stage.layer.primary = Some(Action::SubmitAnswer);
    with_menu(stage, layout)
}

/// An alert with an OK button.
#[must_use]
pub fn alert(layout: Layout, message: impl Into<String>) -> OverlayStage {
    let message = message.into();
    let mut layer = Layer::default();
    layer.push(Dialog::new(layout.alert(), "", message.clone()).with_tone(Tone::Alert));
    layer.bind(Button::new(layout.alert_button(), "OK"), Action::DismissAlert);
    layer.primary = Some(Action::DismissAlert);
    layer.escape = Some(Action::DismissAlert);
    OverlayStage {
        overlay: Overlay::Alert { message },
        layer,
    }
}

/// The navigation menu. "Level map" is offered only inside a session.
#[must_use]
pub fn menu(layout: Layout, in_session: bool) -> OverlayStage {
    let mut entries = vec![("Course map", Action::MenuCourseMap)];
    if in_session {
        entries.push(("Level map", Action::MenuLevelMap));
    }
    entries.push(("Resume", Action::CloseMenu));

    let mut layer = Layer::default();
    layer.push(Dialog::new(layout.menu_panel(), "Menu", ""));
    for (rect, (caption, action)) in layout.menu_items(entries.len()).into_iter().zip(entries) {
        layer.bind(Button::new(rect, caption), action);
    }
    layer.primary = Some(Action::CloseMenu);
    layer.escape = Some(Action::CloseMenu);
    OverlayStage {
        overlay: Overlay::Menu,
        layer,
    }
}

/// The fatal reconnect prompt. It cannot be dismissed.
#[must_use]
pub fn disconnected(layout: Layout, message: impl Into<String>) -> OverlayStage {
    let message = message.into();
    let mut layer = Layer::default();
    layer.push(Dialog::new(layout.alert(), "Connection lost", message.clone()).with_tone(Tone::Alert));
    layer.bind(Button::new(layout.alert_button(), "Reconnect"), Action::Reconnect);
    layer.primary = Some(Action::Reconnect);
    OverlayStage {
        overlay: Overlay::Disconnected { message },
        layer,
    }
}

#[cfg(test)]
mod tests {
    use casebook_core::geometry::{Point, Scale};
    use casebook_test_support::{CourseFixture, RIGHT_ANSWER};
    use casebook_ui::{Component, DrawOp, Input, Widget};
    use chrono::TimeZone;

    use super::*;
    use crate::domain::stage::Routed;

    fn layout() -> Layout {
        Layout::new(Scale::IDENTITY)
    }

    fn tone_of(stage: &Stage, action: Action) -> Tone {
        let mut layer = stage.layer.clone();
        layer.button_mut(action).unwrap().tone
    }

    #[test]
    fn test_course_map_marks_frontier_and_locked_sessions() {
        let fixture = CourseFixture::new(&[&[1], &[1], &[1]]);
        let progress = Progress::at(ScenePosition::new(1, 0, 0));

        let stage = course_map(layout(), &fixture.course, progress);

        assert_eq!(tone_of(&stage, Action::OpenSession(0)), Tone::Normal);
        assert_eq!(tone_of(&stage, Action::OpenSession(1)), Tone::Flashing);
        assert_eq!(tone_of(&stage, Action::OpenSession(2)), Tone::Muted);
    }

    #[test]
    fn test_completed_course_flashes_nothing() {
        let fixture = CourseFixture::new(&[&[1], &[1]]);
        let progress = Progress::at(ScenePosition::new(2, 0, 0));

        let stage = course_map(layout(), &fixture.course, progress);

        assert_eq!(tone_of(&stage, Action::OpenSession(0)), Tone::Normal);
        assert_eq!(tone_of(&stage, Action::OpenSession(1)), Tone::Normal);
    }

    #[test]
    fn test_level_map_flashes_frontier_level_only_in_frontier_session() {
        let fixture = CourseFixture::new(&[&[1, 1, 1], &[1]]);
        let progress = Progress::at(ScenePosition::new(0, 1, 0));

        let stage = level_map(layout(), 0, &fixture.sessions[0], progress);

        let open = |level| Action::OpenLevel { session: 0, level };
        assert_eq!(tone_of(&stage, open(0)), Tone::Normal);
        assert_eq!(tone_of(&stage, open(1)), Tone::Flashing);
        assert_eq!(tone_of(&stage, open(2)), Tone::Muted);
    }

    #[test]
    fn test_post_answer_components_are_fresh_and_live_above_freeze() {
        // Arrange
        let fixture = CourseFixture::new(&[&[1]]);
        let scene = &fixture.sessions[0].levels[0].scenes[0];
        let position = ScenePosition::new(0, 0, 0);

        // Act
        let mut stage = post_answer(layout(), position, scene, false);

        // Assert
        assert_eq!(stage.components().len(), 1);
        assert!(stage.components.start >= stage.layer.live_from);
        assert_eq!(
            stage.layer.route(Input::click(RIGHT_ANSWER), true),
            Routed::Redraw
        );
        assert_eq!(stage.components()[0].is_correct(), Some(true));
        assert!(matches!(stage.layer.widgets.last(), Some(Widget::Button(_))));
    }

    #[test]
    fn test_playing_without_timer_on_replay() {
        let fixture = CourseFixture::new(&[&[1]]);
        let scene = &fixture.sessions[0].levels[0].scenes[0];

        let stage = playing(layout(), ScenePosition::default(), scene, true, None);

        assert!(stage.layer.timer().is_none());
        assert_eq!(stage.layer.background, Some(Action::RevealQuestion));
    }

    #[test]
    fn test_reading_stage_draws_paper_and_countdown() {
        let fixture = CourseFixture::new(&[&[1]]);
        let level = &fixture.sessions[0].levels[0];
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();

        let stage = reading(layout(), (0, 0), level, 24.0, (now, Duration::seconds(60)), false);

        let mut ops = Vec::new();
        for widget in &stage.layer.widgets {
            widget.draw(&casebook_ui::DrawContext { now }, &mut ops);
        }
        assert!(ops.iter().any(|op| matches!(op, DrawOp::Text { text, .. } if text == "60s")));
        assert!(stage.layer.paper().unwrap().reached_end());
    }

    #[test]
    fn test_menu_offers_level_map_only_in_session() {
        let outside = menu(layout(), false);
        let inside = menu(layout(), true);

        let count = |o: &OverlayStage| {
            o.layer
                .widgets
                .iter()
                .filter(|w| matches!(w, Widget::Button(_)))
                .count()
        };
        assert_eq!(count(&outside), 2);
        assert_eq!(count(&inside), 3);
    }

    #[test]
    fn test_alert_dismisses_on_escape_and_ok() {
        let mut overlay = alert(layout(), "hello");

        assert_eq!(
            overlay
                .layer
                .route(Input::Key { key: casebook_ui::Key::Escape }, false),
            Routed::Action(Action::DismissAlert)
        );
        assert_eq!(
            overlay
                .layer
                .route(Input::click(layout().alert_button().center()), false),
            Routed::Action(Action::DismissAlert)
        );
        assert_eq!(
            overlay.layer.route(Input::click(Point::new(1.0, 700.0)), false),
            Routed::Nothing
        );
    }
}
