//! Practice card: answers drive the same exit/enter animation as browsing

use std::time::Instant;

use rand::Rng;
use ratatui::layout::Rect;

use super::{PracticeSession, SessionState};
use crate::deck::{Deck, DeckBuilder};
use crate::nav::{
    AnimationStateMachine, CardOptions, DragOutcome, GestureEvent, GestureTracker, SwipeDirection,
    Visual,
};

/// Deferred answer recorded when the card finishes exiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Correct,
    Incorrect,
}

impl Answer {
    /// Correct cards leave to the right, missed ones to the left
    pub fn exit_direction(self) -> SwipeDirection {
        match self {
            Answer::Correct => SwipeDirection::Right,
            Answer::Incorrect => SwipeDirection::Left,
        }
    }

    fn is_correct(self) -> bool {
        self == Answer::Correct
    }
}

#[derive(Debug)]
pub struct PracticeCard {
    session: PracticeSession,
    motion: AnimationStateMachine<Answer>,
    gesture: GestureTracker,
}

impl PracticeCard {
    pub fn new(options: CardOptions) -> Self {
        Self {
            session: PracticeSession::new(),
            motion: AnimationStateMachine::new(options.animation()),
            gesture: GestureTracker::new(options.units_per_column),
        }
    }

    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    pub fn motion(&self) -> &AnimationStateMachine<Answer> {
        &self.motion
    }

    pub fn visual(&self) -> Visual {
        self.motion.visual()
    }

    /// Begin a fresh session on `deck`, dropping any animation in flight
    pub fn start(&mut self, deck: Deck) {
        self.motion.cancel();
        self.gesture.cancel();
        self.session.start(deck);
    }

    pub fn reset(&mut self) {
        self.motion.cancel();
        self.gesture.cancel();
        self.session.reset();
    }

    /// Start over with a shuffled deck of the cards missed so far. Returns
    /// false (and changes nothing) when nothing was missed.
    pub fn retry_missed<R: Rng>(&mut self, builder: &mut DeckBuilder<'_, R>) -> bool {
        let missed = self.session.missed_items();
        if missed.is_empty() {
            return false;
        }
        let deck = builder.build_from_cards(missed);
        self.start(deck);
        true
    }

    pub fn toggle_flip(&mut self) {
        self.session.toggle_flip();
    }

    /// Animate the current card out and record `answer` once it has left
    pub fn answer(&mut self, answer: Answer, now: Instant) -> bool {
        if self.session.state() != SessionState::InProgress {
            return false;
        }
        self.motion.trigger_exit(answer.exit_direction(), answer, now)
    }

    pub fn attach(&mut self, surface: Rect) {
        self.gesture.attach(surface);
    }

    pub fn pointer_down(&mut self, column: u16, row: u16) {
        if !self.motion.is_resting() || self.session.state() != SessionState::InProgress {
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

    /// Abandon a drag in progress without answering
    pub fn cancel_drag(&mut self) {
        self.gesture.cancel();
        self.motion.abort_drag();
    }

    /// Swipe right for "knew it", left for "missed it"
    pub fn pointer_up(&mut self, column: u16, row: u16, now: Instant) -> DragOutcome {
        let Some(GestureEvent::Ended(end)) = self.gesture.release(column, row) else {
            return DragOutcome::Ignored;
        };
        self.motion.end_drag(end, now, |direction| match direction {
            SwipeDirection::Right => Some(Answer::Correct),
            SwipeDirection::Left => Some(Answer::Incorrect),
            SwipeDirection::None => None,
        })
    }

    /// Record the deferred answer once the exit has elapsed
    pub fn tick(&mut self, now: Instant) -> Option<Answer> {
        let answer = self.motion.tick(now)?;
        self.session.record_answer(answer.is_correct());
        tracing::debug!(?answer, index = self.session.index(), "answer recorded");
        Some(answer)
    }

    pub fn frame_rendered(&mut self) {
        self.motion.frame_rendered();
    }
}
