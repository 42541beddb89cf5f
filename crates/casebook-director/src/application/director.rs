//! The scene director.
//!
//! One director drives one player's game. It owns the progress tracker, the
//! retry counter and the session cache, builds a stage per screen, routes
//! input to it, and turns activated actions into transitions.

use std::sync::Arc;

use casebook_content::application::cache::ContentCache;
use casebook_content::application::resolver::ContentResolver;
use casebook_content::domain::model::{Course, Session};
use casebook_core::clock::Clock;
use casebook_core::error::DomainError;
use casebook_core::progress::{Progress, ScenePosition};
use casebook_core::rng::DeterministicRng;
use casebook_progress::application::tracker::ProgressTracker;
use casebook_progress::domain::advance::{Advance, Boundary, LevelShape};
use casebook_progress::domain::retry::{RetryCounter, RetryVerdict};
use casebook_ui::widgets::Paper;
use casebook_ui::{DrawContext, Input, Renderer};
use tracing::{debug, error, info, warn};

use super::screens;
use crate::domain::config::DirectorConfig;
use crate::domain::layout::Layout;
use crate::domain::messages::{self, Congratulation};
use crate::domain::screen::{Overlay, Screen};
use crate::domain::stage::{self, Action, OverlayStage, Routed, Stage};

/// Sequence used for routing when a replay skips the store.
const REPLAY_SEQUENCE: u64 = 1;

/// What to do once a commit lands.
#[derive(Debug, Clone, Copy)]
enum Continuation {
    /// A scene was answered correctly.
    Cleared {
        from: ScenePosition,
        advance: Advance,
    },
    /// A scene was answered incorrectly; the verdict was taken before the
    /// commit so a reconnect does not count the failure twice.
    Failed {
        position: ScenePosition,
        verdict: RetryVerdict,
    },
    /// A level was entered past its last scene.
    Wrapped { advance: Advance },
}

#[derive(Debug, Clone)]
struct PendingCommit {
    progress: Progress,
    summaries: Vec<serde_json::Value>,
    then: Continuation,
}

/// The progression state machine for one player.
pub struct Director<R: Renderer> {
    config: DirectorConfig,
    layout: Layout,
    course: Arc<Course>,
    content: ContentCache,
    tracker: ProgressTracker,
    retries: RetryCounter,
    clock: Arc<dyn Clock>,
    rng: Box<dyn DeterministicRng>,
    renderer: R,
    stage: Stage,
    overlay: Option<OverlayStage>,
    pending: Option<PendingCommit>,
}

impl<R: Renderer> std::fmt::Debug for Director<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Director")
            .field("screen", &self.stage.screen)
            .field("overlay", &self.overlay.as_ref().map(|o| &o.overlay))
            .field("tracker", &self.tracker)
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> Director<R> {
    /// Creates a director and draws the course map.
    pub fn new(
        config: DirectorConfig,
        course: Arc<Course>,
        resolver: Arc<dyn ContentResolver>,
        tracker: ProgressTracker,
        clock: Arc<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
        renderer: R,
    ) -> Self {
        let layout = Layout::new(config.scale);
        let stage = screens::course_map(layout, &course, tracker.progress());
        let retries = RetryCounter::new(config.retry_limit);
        let mut director = Self {
            config,
            layout,
            course,
            content: ContentCache::new(resolver),
            tracker,
            retries,
            clock,
            rng,
            renderer,
            stage: Stage::new(Screen::PickingSession),
            overlay: None,
            pending: None,
        };
        info!(
            player_id = %director.tracker.player_id(),
            position = %director.tracker.progress().position(),
            "director started"
        );
        director.show(stage);
        director
    }

    /// The active screen.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.stage.screen
    }

    /// The active overlay, if any.
    #[must_use]
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref().map(|o| &o.overlay)
    }

    /// The live stage.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The player's cursor.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.tracker.progress()
    }

    /// Failed attempts recorded at `position`.
    #[must_use]
    pub fn retry_count(&self, position: ScenePosition) -> u32 {
        self.retries.count(position)
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Redraws the current stage and overlay.
    pub fn redraw(&mut self) {
        let ctx = DrawContext {
            now: self.clock.now(),
        };
        let frame = stage::compose(&self.stage, self.overlay.as_ref(), &ctx);
        self.renderer.draw(frame);
    }

    /// Handles one input event.
    ///
    /// An overlay takes all input while it is up. Otherwise the stage routes
    /// the event, honoring the renderer's freeze.
    pub async fn handle(&mut self, input: Input) {
        let routed = match &mut self.overlay {
            Some(overlay) => overlay.layer.route(input, false),
            None => {
                let frozen = self.renderer.is_frozen();
                self.stage.layer.route(input, frozen)
            }
        };
        match routed {
            Routed::Action(action) => self.perform(action).await,
            Routed::Redraw => self.redraw(),
            Routed::Nothing => {}
        }
    }

    async fn perform(&mut self, action: Action) {
        debug!(?action, screen = ?self.stage.screen, "action");
        match action {
            Action::OpenSession(session) => self.open_session(session).await,
            Action::OpenLevel { session, level } => self.open_level(session, level),
            Action::FinishReading => self.finish_reading(),
            Action::ConfirmSelection => self.confirm_selection().await,
            Action::RevealQuestion => self.reveal_question(),
            Action::SubmitAnswer => self.submit_answer().await,
            Action::DismissAlert | Action::CloseMenu => self.close_overlay(),
            Action::OpenMenu => {
                let in_session = self.stage.screen.session().is_some();
                self.show_overlay(screens::menu(self.layout, in_session));
            }
            Action::MenuCourseMap => self.show_course_map(),
            Action::MenuLevelMap => match self.stage.screen.session() {
                Some(session) => self.show_level_map(session),
                None => self.close_overlay(),
            },
            Action::Reconnect => self.reconnect().await,
        }
    }

    // Screens

    fn show(&mut self, stage: Stage) {
        info!(screen = ?stage.screen, "screen shown");
        self.overlay = None;
        self.renderer.set_frozen(stage.screen.freezes());
        self.stage = stage;
        self.redraw();
    }

    fn show_overlay(&mut self, overlay: OverlayStage) {
        info!(overlay = ?overlay.overlay, "overlay shown");
        self.overlay = Some(overlay);
        self.renderer.set_frozen(true);
        self.redraw();
    }

    fn show_alert(&mut self, message: impl Into<String>) {
        self.show_overlay(screens::alert(self.layout, message));
    }

    fn close_overlay(&mut self) {
        if matches!(self.overlay(), Some(Overlay::Disconnected { .. })) {
            return;
        }
        self.overlay = None;
        self.renderer.set_frozen(self.stage.screen.freezes());
        self.redraw();
    }

    fn show_course_map(&mut self) {
        let stage = screens::course_map(self.layout, &self.course, self.tracker.progress());
        self.show(stage);
    }

    fn show_level_map(&mut self, session: u32) {
        let Some(resolved) = self.session(session) else {
            self.show_course_map();
            return;
        };
        let stage = screens::level_map(self.layout, session, &resolved, self.tracker.progress());
        self.show(stage);
    }

    fn session(&self, index: u32) -> Option<Arc<Session>> {
        let session = self.content.get(index);
        if session.is_none() {
            error!(session = index, "session not resolved");
        }
        session
    }

    fn shape(&self, session: &Session, level: u32) -> LevelShape {
        LevelShape {
            scene_count: session.level(level).map_or(0, |l| l.scene_count()),
            level_count: session.level_count(),
            session_count: self.course.session_count(),
        }
    }

    // Transitions

    async fn open_session(&mut self, session: u32) {
        if let Err(e) = self.tracker.check_access(session, 0) {
            warn!(error = %e, position = %self.tracker.progress().position(), "navigation ignored");
            return;
        }
        match self.content.resolve(&self.course, session).await {
            Ok(_) => self.show_level_map(session),
            Err(e) => {
                error!(session, error = %e, "session failed to resolve");
                self.show_alert(messages::CONTENT_FAILED);
            }
        }
    }

    fn open_level(&mut self, session: u32, level: u32) {
        if let Err(e) = self.tracker.check_access(session, level) {
            warn!(error = %e, position = %self.tracker.progress().position(), "navigation ignored");
            return;
        }
        self.enter_reading(session, level, false);
    }

    fn enter_reading(&mut self, session: u32, level: u32, forced_review: bool) {
        let Some(resolved) = self.session(session) else {
            return;
        };
        let Some(content) = resolved.level(level) else {
            warn!(session, level, "unknown level");
            return;
        };
        let duration = if forced_review || self.tracker.is_level_replay(session, level) {
            self.config.review_reading_time
        } else {
            self.config.reading_time
        };
        let stage = screens::reading(
            self.layout,
            (session, level),
            content,
            self.config.scale.apply(self.config.paper_line_height),
            (self.clock.now(), duration),
            forced_review,
        );
        self.show(stage);
    }

    fn finish_reading(&mut self) {
        let Screen::ReadingPaper { session, level, .. } = self.stage.screen else {
            return;
        };
        let now = self.clock.now();
        if !self.stage.layer.paper().is_some_and(Paper::reached_end) {
            debug!(session, level, "reading gate: paper not finished");
            self.show_alert(messages::READ_TO_END);
            return;
        }
        if let Some(timer) = self.stage.layer.timer().filter(|t| !t.is_finished(now)) {
            let remaining = timer.remaining_secs(now);
            debug!(session, level, remaining, "reading gate: timer running");
            self.show_alert(messages::read_longer(remaining));
            return;
        }
        let Some(resolved) = self.session(session) else {
            return;
        };
        if let Some(content) = resolved.level(level) {
            let stage = screens::selecting(self.layout, (session, level), content);
            self.show(stage);
        }
    }

    async fn confirm_selection(&mut self) {
        let Screen::SelectingObjects { session, level } = self.stage.screen else {
            return;
        };
        let Some(resolved) = self.session(session) else {
            return;
        };
        let Some(content) = resolved.level(level) else {
            return;
        };
        let selection = self
            .stage
            .layer
            .selector()
            .map(|s| s.selection().clone())
            .unwrap_or_default();
        if !content.is_correct_selection(&selection) {
            info!(session, level, ?selection, "selection rejected");
            self.show_alert(messages::SELECTION_WRONG);
            return;
        }

        let position = ScenePosition::new(session, level, self.tracker.resume_scene(session, level));
        let shape = self.shape(&resolved, level);
        match self.tracker.advance_on_scene_overflow(position, shape).await {
            Ok(None) => self.play(position),
            Ok(Some(advance)) => self.resume(Continuation::Wrapped { advance }, REPLAY_SEQUENCE, false),
            Err(e) => {
                let advance = Advance::normalize(position, shape);
                let pending = PendingCommit {
                    progress: Progress::at(advance.next),
                    summaries: Vec::new(),
                    then: Continuation::Wrapped { advance },
                };
                self.commit_failed(pending, &e);
            }
        }
    }

    fn play(&mut self, position: ScenePosition) {
        let Some(resolved) = self.session(position.session) else {
            return;
        };
        let Some(scene) = resolved
            .level(position.level)
            .and_then(|level| level.scene(position.scene))
        else {
            warn!(%position, "unknown scene");
            return;
        };
        let replay = self.tracker.is_replay(position);
        let attempt = (!replay).then(|| {
            let duration = if self.tracker.is_retrying(position) {
                self.config.retry_attempt_time
            } else {
                self.config.attempt_time
            };
            (self.clock.now(), duration)
        });
        let stage = screens::playing(self.layout, position, scene, replay, attempt);
        self.show(stage);
    }

    fn reveal_question(&mut self) {
        let Screen::PlayingScene { position, replay } = self.stage.screen else {
            return;
        };
        let now = self.clock.now();
        if let Some(timer) = self.stage.layer.timer().filter(|t| !t.is_finished(now)) {
            debug!(%position, remaining = timer.remaining_secs(now), "attempt timer running");
            return;
        }
        let Some(resolved) = self.session(position.session) else {
            return;
        };
        if let Some(scene) = resolved
            .level(position.level)
            .and_then(|level| level.scene(position.scene))
        {
            let stage = screens::post_answer(self.layout, position, scene, replay);
            self.show(stage);
        }
    }

    async fn submit_answer(&mut self) {
        let Screen::ScenePostAnswer { position, replay } = self.stage.screen else {
            return;
        };
        match self.stage.layer.button_mut(Action::SubmitAnswer) {
            Some(button) if button.enabled => button.disable(),
            _ => {
                debug!(%position, "submit ignored while in flight");
                return;
            }
        }
        let Some(resolved) = self.session(position.session) else {
            return;
        };
        let Some(scene) = resolved
            .level(position.level)
            .and_then(|level| level.scene(position.scene))
        else {
            return;
        };
        let solved = scene.is_solved(self.stage.components());
        let summaries = self.stage.summaries();
        let advance = Advance::after(position, self.shape(&resolved, position.level));
        info!(%position, solved, replay, "answer submitted");

        match (solved, replay) {
            (true, false) => {
                self.commit(PendingCommit {
                    progress: Progress::at(advance.next),
                    summaries,
                    then: Continuation::Cleared {
                        from: position,
                        advance,
                    },
                })
                .await;
            }
            (true, true) => self.resume(
                Continuation::Cleared {
                    from: position,
                    advance,
                },
                REPLAY_SEQUENCE,
                true,
            ),
            (false, true) => {
                self.play(position);
                self.show_alert(messages::REPLAY_WRONG);
            }
            (false, false) => {
                let verdict = self.retries.record_failure(position);
                self.commit(PendingCommit {
                    progress: Progress::at(position).with_failed_attempt(),
                    summaries,
                    then: Continuation::Failed { position, verdict },
                })
                .await;
            }
        }
    }

    // Persistence

    async fn commit(&mut self, pending: PendingCommit) {
        match self
            .tracker
            .commit(pending.progress, pending.summaries.clone())
            .await
        {
            Ok(sequence) => self.resume(pending.then, sequence, false),
            Err(e) => self.commit_failed(pending, &e),
        }
    }

    fn commit_failed(&mut self, pending: PendingCommit, e: &DomainError) {
        if let DomainError::Persistence(_) = e {
            error!(error = %e, position = %pending.progress.position(), "progress not saved, waiting for reconnect");
            self.pending = Some(pending);
            self.show_overlay(screens::disconnected(self.layout, messages::DISCONNECTED));
        } else {
            error!(error = %e, "commit rejected");
            self.show_course_map();
        }
    }

    async fn reconnect(&mut self) {
        match self.pending.take() {
            Some(pending) => {
                info!(position = %pending.progress.position(), "retrying commit");
                self.commit(pending).await;
            }
            None => {
                self.overlay = None;
                self.renderer.set_frozen(self.stage.screen.freezes());
                self.redraw();
            }
        }
    }

    fn resume(&mut self, then: Continuation, sequence: u64, replay: bool) {
        match then {
            Continuation::Cleared { from, advance } => {
                self.retries.reset(from);
                let message = if replay {
                    Some(messages::REPLAY_RIGHT)
                } else if sequence != 0 {
                    Some(Congratulation::for_boundary(advance.boundary).pick(self.rng.as_mut()))
                } else {
                    None
                };
                self.route_after_advance(from, advance, sequence);
                if let Some(message) = message {
                    self.show_alert(message);
                }
            }
            Continuation::Failed { position, verdict } => match verdict {
                RetryVerdict::Remaining(left) => {
                    self.play(position);
                    self.show_alert(messages::attempts_left(left));
                }
                RetryVerdict::Exhausted => {
                    info!(%position, "retry limit reached, forcing review");
                    self.enter_reading(position.session, position.level, true);
                    self.show_alert(messages::REVIEW_FORCED);
                }
            },
            Continuation::Wrapped { advance } => {
                if advance.boundary.closes_session() {
                    self.show_course_map();
                } else {
                    self.show_level_map(advance.next.session);
                }
            }
        }
    }

    /// Session and course boundaries go to the course map only on a genuine
    /// commit; with sequence `0` the player stays on the finished session's
    /// level map.
    fn route_after_advance(&mut self, from: ScenePosition, advance: Advance, sequence: u64) {
        match advance.boundary {
            Boundary::Session | Boundary::Course if sequence != 0 => self.show_course_map(),
            Boundary::Session | Boundary::Course | Boundary::Level => {
                self.show_level_map(from.session);
            }
            Boundary::Scene => self.play(advance.next),
        }
    }
}
