//! A deck browsed one card at a time with animated navigation
//!
//! Pairs a [`NavigationController`] with an [`AnimationStateMachine`] and a
//! [`GestureTracker`]. Buttons, keys and swipes all go through the same
//! timed exit sequence; the index only changes when the exit completes.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use super::animation::{AnimationConfig, AnimationStateMachine, DragOutcome, Visual};
use super::gesture::{GestureEvent, GestureTracker, SwipeDirection};
use super::navigation::NavigationController;
use crate::deck::{Deck, Item};

/// Options for a swipeable card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardOptions {
    /// Wrap from the last card to the first (and back) instead of stopping
    pub wrap_around: bool,
    /// Minimum swipe, in units, that navigates
    pub threshold: f32,
    /// Exit animation length before the index changes
    pub exit_duration: Duration,
    /// Units per terminal column for drag offsets
    pub units_per_column: f32,
}

impl Default for CardOptions {
    fn default() -> Self {
        let animation = AnimationConfig::default();
        Self {
            wrap_around: false,
            threshold: animation.threshold,
            exit_duration: animation.exit_duration,
            units_per_column: 8.0,
        }
    }
}

impl CardOptions {
    pub fn animation(&self) -> AnimationConfig {
        AnimationConfig {
            threshold: self.threshold,
            exit_duration: self.exit_duration,
            ..AnimationConfig::default()
        }
    }
}

/// Deferred navigation applied when an exit completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Advance,
    Retreat,
}

/// The browse-mode card surface
#[derive(Debug)]
pub struct SwipeableCard {
    deck: Deck,
    nav: NavigationController,
    motion: AnimationStateMachine<Step>,
    gesture: GestureTracker,
    flipped: bool,
}

impl SwipeableCard {
    pub fn new(deck: Deck, options: CardOptions) -> Self {
        let nav = NavigationController::new(deck.len(), options.wrap_around);
        Self {
            deck,
            nav,
            motion: AnimationStateMachine::new(options.animation()),
            gesture: GestureTracker::new(options.units_per_column),
            flipped: false,
        }
    }

    /// Swap in a new deck. Any in-flight animation is cancelled so it can
    /// never move the new deck's index.
    pub fn replace_deck(&mut self, deck: Deck) {
        self.motion.cancel();
        self.gesture.cancel();
        self.nav.set_total(deck.len());
        self.deck = deck;
        self.flipped = false;
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The card at the current index, or the placeholder
    pub fn current(&self) -> &Item {
        self.deck.get(self.nav.index()).unwrap_or_else(|| Item::placeholder())
    }

    pub fn index(&self) -> usize {
        self.nav.index()
    }

    pub fn total(&self) -> usize {
        self.nav.total()
    }

    pub fn can_advance(&self) -> bool {
        self.nav.can_advance()
    }

    pub fn can_retreat(&self) -> bool {
        self.nav.can_retreat()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn motion(&self) -> &AnimationStateMachine<Step> {
        &self.motion
    }

    pub fn visual(&self) -> Visual {
        self.motion.visual()
    }

    pub fn toggle_flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Move forward immediately, without animation
    pub fn advance(&mut self) {
        if self.nav.advance() {
            self.flipped = false;
        }
    }

    /// Move back immediately, without animation
    pub fn retreat(&mut self) {
        if self.nav.retreat() {
            self.flipped = false;
        }
    }

    /// Back to the first card
    pub fn reset(&mut self) {
        self.motion.cancel();
        self.gesture.cancel();
        self.nav.reset();
        self.flipped = false;
    }

    /// Next card; the current one exits left and the next enters from the
    /// right. Ignored at the boundary or mid-transition.
    pub fn animate_next(&mut self, now: Instant) -> bool {
        self.can_advance() && self.motion.trigger_exit(SwipeDirection::Left, Step::Advance, now)
    }

    /// Previous card; exits right, enters from the left
    pub fn animate_prev(&mut self, now: Instant) -> bool {
        self.can_retreat() && self.motion.trigger_exit(SwipeDirection::Right, Step::Retreat, now)
    }

    /// Track the card surface as laid out by the renderer
    pub fn attach(&mut self, surface: Rect) {
        self.gesture.attach(surface);
    }

    pub fn pointer_down(&mut self, column: u16, row: u16) {
        if !self.motion.is_resting() {
            return;
        }
        if let Some(GestureEvent::Started) = self.gesture.press(column, row) {
            self.motion.begin_drag();
        }
    }

    pub fn pointer_drag(&mut self, column: u16, row: u16) {
        if let Some(GestureEvent::Moved { offset }) = self.gesture.drag(column, row) {
            self.motion.drag_to(offset);
        }
    }

    /// Abandon a drag in progress; the card springs back and a running
    /// exit is left alone
    pub fn cancel_drag(&mut self) {
        self.gesture.cancel();
        if self.motion.abort_drag() {
            tracing::trace!("drag abandoned");
        }
    }

    /// Swipe left for the next card, right for the previous one
    pub fn pointer_up(&mut self, column: u16, row: u16, now: Instant) -> DragOutcome {
        let Some(GestureEvent::Ended(end)) = self.gesture.release(column, row) else {
            return DragOutcome::Ignored;
        };
        let (can_advance, can_retreat) = (self.can_advance(), self.can_retreat());
        self.motion.end_drag(end, now, |direction| match direction {
            SwipeDirection::Left if can_advance => Some(Step::Advance),
            SwipeDirection::Right if can_retreat => Some(Step::Retreat),
            _ => None,
        })
    }

    /// Fire the deferred step once its exit has elapsed. Returns whether
    /// the index moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(step) = self.motion.tick(now) else {
            return false;
        };
        let before = self.nav.index();
        match step {
            Step::Advance => self.advance(),
            Step::Retreat => self.retreat(),
        }
        tracing::debug!(?step, from = before, to = self.nav.index(), "card step");
        self.nav.index() != before
    }

    pub fn frame_rendered(&mut self) {
        self.motion.frame_rendered();
    }
}
