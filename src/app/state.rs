//! Application state definitions

use std::time::{Duration, Instant};

use rand::Rng;
use ratatui::layout::{Position, Rect};

use super::input::Action;
use crate::config::Config;
use crate::deck::{DeckBuilder, Filter, Item};
use crate::nav::{DragOutcome, SwipeableCard, Transition, Visual};
use crate::practice::{Answer, PracticeCard, SessionState};
use crate::speech::{PlayOutcome, SpeechStatus};

/// Distance, in units, at which an eased card is fully transparent
const FADE_OUT_AT: f32 = 350.0;

/// Extra time the busy indicator is held past the speaker's own timeout
const SPEECH_GRACE: Duration = Duration::from_secs(1);

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Browse,
    Practice,
}

impl Screen {
    pub fn toggle(self) -> Self {
        match self {
            Screen::Browse => Screen::Practice,
            Screen::Practice => Screen::Browse,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Browse => "Browse",
            Screen::Practice => "Practice",
        }
    }
}

/// Status line under the card
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    /// Status/error message to display
    pub message: Option<String>,
    /// Whether message is an error
    pub is_error: bool,
}

impl StatusLine {
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.is_error = false;
    }
}

/// A clickable on-screen button (rect updated on render)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub area: Rect,
    pub action: Action,
}

/// Where the renderer should draw the card this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shown {
    pub translate_x: f32,
    pub opacity: f32,
}

/// Eases the drawn card toward the target visual
#[derive(Debug, Clone, Copy)]
pub struct CardTween {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl CardTween {
    pub fn new(now: Instant) -> Self {
        Self { from: 0.0, to: 0.0, started: now, duration: Duration::ZERO }
    }

    /// Retarget if the visual moved, then sample the current position
    pub fn sample(&mut self, visual: &Visual, now: Instant) -> Shown {
        if visual.translate_x != self.to {
            self.from = match visual.transition {
                Transition::None => visual.translate_x,
                Transition::EaseOut(_) => self.position(now),
            };
            self.duration = match visual.transition {
                Transition::None => Duration::ZERO,
                Transition::EaseOut(duration) => duration,
            };
            self.to = visual.translate_x;
            self.started = now;
        }

        let translate_x = self.position(now);
        let opacity = match visual.transition {
            Transition::None => visual.opacity,
            Transition::EaseOut(_) => (1.0 - translate_x.abs() / FADE_OUT_AT).clamp(0.0, 1.0),
        };
        Shown { translate_x, opacity }
    }

    /// Ease-out cubic between `from` and `to`
    fn position(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).min(1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }
}

/// What the app loop must do after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Play this text in the background; the outcome is reported back
    /// with the same ticket
    Pronounce { text: String, ticket: u64 },
}

/// Full application state
#[derive(Debug)]
pub struct AppState {
    /// Current screen
    pub screen: Screen,

    /// Filter for the browse deck
    pub filter: Filter,

    /// Filter used when a practice session starts
    pub practice_filter: Filter,

    pub browse: SwipeableCard,
    pub practice: PracticeCard,

    pub browse_tween: CardTween,
    pub practice_tween: CardTween,

    /// Buttons laid out on the last frame
    pub buttons: Vec<Button>,

    /// Units per terminal column, for drawing drag offsets
    pub units_per_column: f32,

    /// Pronunciation busy indicator
    pub speech: SpeechStatus,

    /// Whether `p` does anything
    pub audio_enabled: bool,

    /// h/l navigate too
    pub vim_mode: bool,

    pub status: StatusLine,

    /// Help overlay visible
    pub show_help: bool,
}

impl AppState {
    pub fn new<R: Rng>(config: &Config, builder: &mut DeckBuilder<'_, R>, now: Instant) -> Self {
        let deck = builder.build_deck(config.default_filter);
        let speech_limit = Duration::from_millis(config.audio.timeout_ms) + SPEECH_GRACE;

        Self {
            screen: Screen::Browse,
            filter: config.default_filter,
            practice_filter: config.default_filter,
            browse: SwipeableCard::new(deck, config.browse_options()),
            practice: PracticeCard::new(config.practice_options()),
            browse_tween: CardTween::new(now),
            practice_tween: CardTween::new(now),
            buttons: Vec::new(),
            units_per_column: config.units_per_column,
            speech: SpeechStatus::new(speech_limit),
            audio_enabled: config.audio.enabled,
            vim_mode: config.vim_mode,
            status: StatusLine::default(),
            show_help: false,
        }
    }

    /// The item on the active screen, if there is one worth showing
    pub fn current_item(&self) -> Option<&Item> {
        let item = match self.screen {
            Screen::Browse => self.browse.current(),
            Screen::Practice if self.practice.session().state() == SessionState::InProgress => {
                self.practice.session().current_item()
            }
            Screen::Practice => return None,
        };
        (!item.is_placeholder()).then_some(item)
    }

    /// Apply one user action
    pub fn apply<R: Rng>(
        &mut self,
        action: Action,
        builder: &mut DeckBuilder<'_, R>,
        now: Instant,
    ) -> Effect {
        match action {
            Action::Quit => return Effect::Quit,
            Action::Help => self.show_help = !self.show_help,
            Action::SwitchScreen => {
                self.show(self.screen.toggle());
                self.status.clear();
            }
            Action::Pronounce => return self.pronounce(now),
            _ => match self.screen {
                Screen::Browse => self.apply_browse(action, builder, now),
                Screen::Practice => self.apply_practice(action, builder, now),
            },
        }
        Effect::None
    }

    fn apply_browse<R: Rng>(&mut self, action: Action, builder: &mut DeckBuilder<'_, R>, now: Instant) {
        match action {
            Action::Next => {
                self.browse.animate_next(now);
            }
            Action::Prev => {
                self.browse.animate_prev(now);
            }
            Action::Flip => self.browse.toggle_flip(),
            Action::Reset => self.browse.reset(),
            Action::CycleFilter => {
                self.filter = self.filter.next();
                self.rebuild_browse(builder);
            }
            Action::NewSession => {
                self.rebuild_browse(builder);
            }
            _ => {}
        }
    }

    fn rebuild_browse<R: Rng>(&mut self, builder: &mut DeckBuilder<'_, R>) {
        let deck = builder.build_deck(self.filter);
        if deck.is_empty() {
            self.status.set_error(format!("No cards for filter '{}'", self.filter));
        } else {
            self.status.set_message(format!("Filter: {} ({} cards)", self.filter, deck.len()));
        }
        self.browse.replace_deck(deck);
    }

    fn apply_practice<R: Rng>(
        &mut self,
        action: Action,
        builder: &mut DeckBuilder<'_, R>,
        now: Instant,
    ) {
        let state = self.practice.session().state();
        match action {
            Action::Correct | Action::Next => {
                self.practice.answer(Answer::Correct, now);
            }
            Action::Incorrect | Action::Prev => {
                self.practice.answer(Answer::Incorrect, now);
            }
            Action::Flip if state == SessionState::InProgress => self.practice.toggle_flip(),
            Action::CycleFilter if state != SessionState::InProgress => {
                self.practice_filter = self.practice_filter.next();
                self.status.set_message(format!("Practice filter: {}", self.practice_filter));
            }
            Action::NewSession if state != SessionState::InProgress => self.start_practice(builder),
            Action::RetryMissed if state == SessionState::Finished => {
                if self.practice.retry_missed(builder) {
                    self.status.set_message("Retrying missed cards");
                } else {
                    self.status.set_message("Nothing missed, nothing to retry");
                }
            }
            Action::Reset => {
                self.practice.reset();
                self.status.clear();
            }
            _ => {}
        }
    }

    /// Change screens. A drag on the outgoing card is dropped, since its
    /// release would land on the other screen.
    fn show(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        match self.screen {
            Screen::Browse => self.browse.cancel_drag(),
            Screen::Practice => self.practice.cancel_drag(),
        }
        self.screen = screen;
    }

    /// Start a session with a fresh deck for the practice filter
    pub fn start_practice<R: Rng>(&mut self, builder: &mut DeckBuilder<'_, R>) {
        self.show(Screen::Practice);
        let deck = builder.build_deck(self.practice_filter);
        if deck.is_empty() {
            self.status.set_error(format!("No cards for filter '{}'", self.practice_filter));
            return;
        }
        self.status.clear();
        self.practice.start(deck);
    }

    fn pronounce(&mut self, now: Instant) -> Effect {
        if !self.audio_enabled {
            self.status.set_message("Audio is disabled");
            return Effect::None;
        }
        let Some(text) = self.current_item().map(|item| item.spoken_text().to_string()) else {
            return Effect::None;
        };
        match self.speech.begin(&text, now) {
            Some(ticket) => Effect::Pronounce { text, ticket },
            None => Effect::None,
        }
    }

    /// Record how a background pronunciation ended. Failures only clear
    /// the busy indicator; they are logged, never shown. Outcomes from a
    /// request whose indicator already expired are ignored.
    pub fn speech_finished(&mut self, ticket: u64, outcome: PlayOutcome) {
        if !self.speech.finish(ticket) {
            tracing::debug!(ticket, ?outcome, "stale pronunciation outcome");
            return;
        }
        if !outcome.is_success() {
            tracing::info!(?outcome, "pronunciation did not play");
        }
    }

    /// Mouse press: buttons first, then the card surface
    pub fn pointer_down(&mut self, column: u16, row: u16) -> Option<Action> {
        let position = Position::new(column, row);
        if let Some(button) = self.buttons.iter().find(|b| b.area.contains(position)) {
            return Some(button.action);
        }
        match self.screen {
            Screen::Browse => self.browse.pointer_down(column, row),
            Screen::Practice => self.practice.pointer_down(column, row),
        }
        None
    }

    pub fn pointer_drag(&mut self, column: u16, row: u16) {
        match self.screen {
            Screen::Browse => self.browse.pointer_drag(column, row),
            Screen::Practice => self.practice.pointer_drag(column, row),
        }
    }

    pub fn pointer_up(&mut self, column: u16, row: u16, now: Instant) -> DragOutcome {
        let outcome = match self.screen {
            Screen::Browse => self.browse.pointer_up(column, row, now),
            Screen::Practice => self.practice.pointer_up(column, row, now),
        };
        if outcome != DragOutcome::Ignored {
            tracing::debug!(?outcome, screen = self.screen.title(), "swipe released");
        }
        outcome
    }

    /// Fire due animation steps and expire a stuck speech indicator
    pub fn tick(&mut self, now: Instant) {
        self.browse.tick(now);

        if self.practice.tick(now).is_some() && self.practice.session().is_finished() {
            let session = self.practice.session();
            self.status.set_message(format!(
                "Session complete: {}/{} ({}%)",
                session.stats().correct,
                session.total(),
                session.percentage()
            ));
        }

        if self.speech.expire(now) {
            tracing::warn!("speech indicator expired");
        }
    }

    /// Called once per drawn frame
    pub fn frame_rendered(&mut self) {
        self.browse.frame_rendered();
        self.practice.frame_rendered();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::deck::ContentPool;
    use crate::nav::Phase;

    const EXIT: Duration = Duration::from_millis(200);

    fn setup(pool: &ContentPool) -> (AppState, DeckBuilder<'_, StdRng>, Instant) {
        let now = Instant::now();
        let mut builder = DeckBuilder::with_rng(pool, StdRng::seed_from_u64(11));
        let state = AppState::new(&Config::default(), &mut builder, now);
        (state, builder, now)
    }

    #[test]
    fn starts_on_browse_with_full_deck() {
        let pool = ContentPool::builtin();
        let (state, _, _) = setup(&pool);
        assert_eq!(state.screen, Screen::Browse);
        assert_eq!(state.browse.total(), pool.len());
    }

    #[test]
    fn next_moves_after_exit() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, now) = setup(&pool);

        state.apply(Action::Next, &mut builder, now);
        assert_eq!(state.browse.index(), 0);
        state.tick(now + EXIT);
        assert_eq!(state.browse.index(), 1);
    }

    #[test]
    fn cycling_filter_rebuilds_deck() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, now) = setup(&pool);

        state.apply(Action::Next, &mut builder, now);
        state.apply(Action::CycleFilter, &mut builder, now);
        assert_eq!(state.filter, Filter::Consonants);
        assert_eq!(state.browse.total(), 10);
        assert_eq!(state.browse.motion().phase(), Phase::Resting);

        // The cancelled exit must not move the new deck
        state.tick(now + EXIT);
        assert_eq!(state.browse.index(), 0);
    }

    #[test]
    fn switching_screens_drops_active_drag() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, now) = setup(&pool);
        state.browse.attach(Rect::new(0, 0, 60, 10));

        assert_eq!(state.pointer_down(30, 5), None);
        state.pointer_drag(25, 5);
        assert_eq!(state.browse.motion().phase(), Phase::Dragging);

        state.apply(Action::SwitchScreen, &mut builder, now);
        assert_eq!(state.pointer_up(25, 5, now), DragOutcome::Ignored);
        state.apply(Action::SwitchScreen, &mut builder, now);

        assert_eq!(state.browse.motion().phase(), Phase::Resting);
        assert_eq!(state.browse.visual().translate_x, 0.0);
        assert_eq!(state.pointer_up(25, 5, now), DragOutcome::Ignored);

        state.apply(Action::Next, &mut builder, now);
        state.tick(now + EXIT);
        assert_eq!(state.browse.index(), 1);
    }

    #[test]
    fn practice_flow_reaches_results() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, mut now) = setup(&pool);

        state.apply(Action::SwitchScreen, &mut builder, now);
        state.apply(Action::CycleFilter, &mut builder, now);
        state.apply(Action::CycleFilter, &mut builder, now);
        assert_eq!(state.practice_filter, Filter::Vowels);
        state.apply(Action::NewSession, &mut builder, now);
        assert_eq!(state.practice.session().total(), 5);

        for _ in 0..5 {
            state.apply(Action::Incorrect, &mut builder, now);
            now += EXIT;
            state.tick(now);
            state.frame_rendered();
            state.frame_rendered();
        }
        assert!(state.practice.session().is_finished());
        assert_eq!(state.status.message.as_deref(), Some("Session complete: 0/5 (0%)"));

        state.apply(Action::RetryMissed, &mut builder, now);
        assert_eq!(state.practice.session().state(), SessionState::InProgress);
        assert_eq!(state.practice.session().total(), 5);
    }

    #[test]
    fn new_session_ignored_mid_session() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, now) = setup(&pool);

        state.start_practice(&mut builder);
        state.apply(Action::Correct, &mut builder, now);
        state.tick(now + EXIT);
        state.apply(Action::NewSession, &mut builder, now + EXIT);
        assert_eq!(state.practice.session().total_answered(), 1);
    }

    #[test]
    fn pronounce_refuses_overlap() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, now) = setup(&pool);

        let Effect::Pronounce { ticket, .. } = state.apply(Action::Pronounce, &mut builder, now)
        else {
            panic!("expected a pronounce effect");
        };
        assert_eq!(state.apply(Action::Pronounce, &mut builder, now), Effect::None);

        state.speech_finished(ticket, PlayOutcome::Failed);
        assert!(!state.speech.is_busy());
        assert_eq!(state.status.message, None);
    }

    #[test]
    fn expired_request_cannot_clear_the_next_one() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, now) = setup(&pool);
        let limit = Duration::from_millis(Config::default().audio.timeout_ms) + SPEECH_GRACE;

        let Effect::Pronounce { ticket: first, .. } =
            state.apply(Action::Pronounce, &mut builder, now)
        else {
            panic!("expected a pronounce effect");
        };
        state.tick(now + limit);
        assert!(!state.speech.is_busy());

        let later = now + limit;
        let Effect::Pronounce { ticket: second, .. } =
            state.apply(Action::Pronounce, &mut builder, later)
        else {
            panic!("expected a pronounce effect");
        };

        state.speech_finished(first, PlayOutcome::Fallback);
        assert!(state.speech.is_busy());
        state.speech_finished(second, PlayOutcome::Primary);
        assert!(!state.speech.is_busy());
    }

    #[test]
    fn pronounce_needs_a_card() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, now) = setup(&pool);

        state.apply(Action::SwitchScreen, &mut builder, now);
        assert_eq!(state.apply(Action::Pronounce, &mut builder, now), Effect::None);
    }

    #[test]
    fn stuck_speech_clears_on_tick() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, now) = setup(&pool);

        state.apply(Action::Pronounce, &mut builder, now);
        let limit = Duration::from_millis(Config::default().audio.timeout_ms) + SPEECH_GRACE;
        state.tick(now + limit);
        assert!(!state.speech.is_busy());
    }

    #[test]
    fn disabled_audio_does_nothing() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, now) = setup(&pool);
        state.audio_enabled = false;
        assert_eq!(state.apply(Action::Pronounce, &mut builder, now), Effect::None);
        assert!(!state.speech.is_busy());
    }

    #[test]
    fn buttons_take_clicks_before_the_card() {
        let pool = ContentPool::builtin();
        let (mut state, _, _) = setup(&pool);
        state.buttons.push(Button { area: Rect::new(0, 20, 10, 1), action: Action::Next });
        assert_eq!(state.pointer_down(3, 20), Some(Action::Next));
        assert_eq!(state.pointer_down(3, 5), None);
    }

    #[test]
    fn quit_is_an_effect() {
        let pool = ContentPool::builtin();
        let (mut state, mut builder, now) = setup(&pool);
        assert_eq!(state.apply(Action::Quit, &mut builder, now), Effect::Quit);
    }

    #[test]
    fn tween_jumps_without_transition() {
        let now = Instant::now();
        let mut tween = CardTween::new(now);
        let dragged = Visual { translate_x: 40.0, rotation: 4.0, opacity: 0.9, transition: Transition::None };
        assert_eq!(tween.sample(&dragged, now), Shown { translate_x: 40.0, opacity: 0.9 });
    }

    #[test]
    fn tween_eases_to_target() {
        let now = Instant::now();
        let mut tween = CardTween::new(now);
        let exit = Visual {
            translate_x: -350.0,
            rotation: 0.0,
            opacity: 0.0,
            transition: Transition::EaseOut(EXIT),
        };
        let start = tween.sample(&exit, now);
        assert_eq!(start.translate_x, 0.0);

        let mid = tween.sample(&exit, now + EXIT / 2);
        assert!(mid.translate_x < 0.0 && mid.translate_x > -350.0);

        let end = tween.sample(&exit, now + EXIT);
        assert_eq!(end.translate_x, -350.0);
        assert_eq!(end.opacity, 0.0);
    }
}
