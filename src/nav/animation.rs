//! Exit/enter transition state machine
//!
//! Card navigation is split into a timed exit, a single deferred action
//! (the index change), and an enter phase that settles after two rendered
//! frames:
//!
//! ```text
//!  Resting ──begin_drag──▶ Dragging ──end_drag (< threshold)──▶ Resting
//!     │                        │
//!     │ trigger_exit           │ end_drag (>= threshold)
//!     ▼                        ▼
//!  Exiting{Left,Right} ──tick, exit_duration elapsed──▶ EnteringFrom{opposite}
//!                                                            │
//!                                         two frame_rendered │
//!                                                            ▼
//!                                                         Resting
//! ```
//!
//! The deferred action is handed back from [`AnimationStateMachine::tick`]
//! exactly once; the owner applies it. Every scheduled continuation carries
//! the generation it was created in, and [`AnimationStateMachine::cancel`]
//! bumps the generation so nothing scheduled earlier can fire.

use std::time::{Duration, Instant};

use super::gesture::{SwipeDirection, SwipeEnd};

/// Distance (units) a card travels off-screen when exiting or entering
const OFFSCREEN: f32 = 350.0;
/// Degrees of rotation per unit of horizontal offset
const ROTATION_PER_UNIT: f32 = 0.1;
/// Offset over which a dragged card fades
const FADE_DISTANCE: f32 = 300.0;
/// Dragged cards never fade below this
const MIN_DRAG_OPACITY: f32 = 0.5;

/// Visual phase of the card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Resting,
    Dragging,
    ExitingLeft,
    ExitingRight,
    EnteringFromLeft,
    EnteringFromRight,
}

impl Phase {
    /// Exiting or entering; triggers are ignored until the card rests
    pub fn is_transitioning(self) -> bool {
        matches!(
            self,
            Phase::ExitingLeft
                | Phase::ExitingRight
                | Phase::EnteringFromLeft
                | Phase::EnteringFromRight
        )
    }

    fn exiting(direction: SwipeDirection) -> Option<Phase> {
        match direction {
            SwipeDirection::Left => Some(Phase::ExitingLeft),
            SwipeDirection::Right => Some(Phase::ExitingRight),
            SwipeDirection::None => None,
        }
    }

    /// The next card comes in from the side opposite the exit
    fn entering_after(exit: SwipeDirection) -> Phase {
        match exit.opposite() {
            SwipeDirection::Right => Phase::EnteringFromRight,
            _ => Phase::EnteringFromLeft,
        }
    }
}

/// Snapshot of the machine. `offset` is only non-zero while dragging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationState {
    pub phase: Phase,
    pub offset: f32,
    pub direction: SwipeDirection,
}

/// Tunables for the transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Minimum |displacement| (units) for a drag to navigate
    pub threshold: f32,
    /// Time between an exit starting and the deferred action firing
    pub exit_duration: Duration,
    /// Rendered frames to wait after the action before resting
    pub settle_frames: u8,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { threshold: 80.0, exit_duration: Duration::from_millis(200), settle_frames: 2 }
    }
}

/// How the renderer should move toward the current visual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Jump straight there
    None,
    /// Ease out over the given duration
    EaseOut(Duration),
}

/// Render parameters, a pure function of phase and offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub translate_x: f32,
    pub rotation: f32,
    pub opacity: f32,
    pub transition: Transition,
}

/// Result of releasing a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No drag was active
    Ignored,
    /// Too short, or refused by the owner; the card returns to rest
    SnappedBack,
    /// The card is leaving in this direction
    Exiting(SwipeDirection),
}

#[derive(Debug)]
enum Pending<A> {
    Exit { due: Instant, action: A, generation: u64 },
    Settle { frames_left: u8, generation: u64 },
}

/// Owns the card's exit/enter phase and drag offset
#[derive(Debug)]
pub struct AnimationStateMachine<A> {
    config: AnimationConfig,
    state: AnimationState,
    generation: u64,
    pending: Option<Pending<A>>,
}

impl<A> AnimationStateMachine<A> {
    pub fn new(config: AnimationConfig) -> Self {
        Self { config, state: AnimationState::default(), generation: 0, pending: None }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_resting(&self) -> bool {
        self.state.phase == Phase::Resting
    }

    /// Start following a drag. Only a resting card can be picked up.
    pub fn begin_drag(&mut self) -> bool {
        if self.state.phase != Phase::Resting {
            return false;
        }
        self.state = AnimationState { phase: Phase::Dragging, ..AnimationState::default() };
        true
    }

    /// Update the live drag offset
    pub fn drag_to(&mut self, offset: f32) -> bool {
        if self.state.phase != Phase::Dragging {
            return false;
        }
        self.state.offset = offset;
        self.state.direction = SwipeDirection::classify(offset);
        true
    }

    /// Release the drag. `resolve` maps the swipe direction to the deferred
    /// action, or refuses it (e.g. at a deck boundary), which snaps back.
    pub fn end_drag<F>(&mut self, end: SwipeEnd, now: Instant, resolve: F) -> DragOutcome
    where
        F: FnOnce(SwipeDirection) -> Option<A>,
    {
        if self.state.phase != Phase::Dragging {
            return DragOutcome::Ignored;
        }

        if end.magnitude() < self.config.threshold || end.direction == SwipeDirection::None {
            tracing::trace!(displacement = end.displacement, "drag below threshold, snapping back");
            self.settle();
            return DragOutcome::SnappedBack;
        }

        match resolve(end.direction) {
            Some(action) => {
                self.start_exit(end.direction, action, now);
                DragOutcome::Exiting(end.direction)
            }
            None => {
                self.settle();
                DragOutcome::SnappedBack
            }
        }
    }

    /// Run the exit sequence without a drag (buttons, keys). Ignored unless
    /// the card is resting.
    pub fn trigger_exit(&mut self, direction: SwipeDirection, action: A, now: Instant) -> bool {
        if self.state.phase != Phase::Resting || direction == SwipeDirection::None {
            tracing::trace!(phase = ?self.state.phase, "exit trigger ignored");
            return false;
        }
        self.start_exit(direction, action, now);
        true
    }

    /// Advance timers. Returns the deferred action once the exit duration
    /// has elapsed; never returns the same action twice.
    pub fn tick(&mut self, now: Instant) -> Option<A> {
        let due = matches!(self.pending, Some(Pending::Exit { due, .. }) if now >= due);
        if !due {
            return None;
        }

        let Some(Pending::Exit { action, generation, .. }) = self.pending.take() else {
            return None;
        };
        if generation != self.generation {
            return None;
        }

        let exited = self.state.direction;
        self.state = AnimationState {
            phase: Phase::entering_after(exited),
            offset: 0.0,
            direction: exited,
        };
        tracing::debug!(phase = ?self.state.phase, "exit complete");

        if self.config.settle_frames == 0 {
            self.settle();
        } else {
            self.pending = Some(Pending::Settle {
                frames_left: self.config.settle_frames,
                generation: self.generation,
            });
        }
        Some(action)
    }

    /// Call after each rendered frame; lets the entering card settle
    pub fn frame_rendered(&mut self) {
        let Some(Pending::Settle { frames_left, generation }) = &mut self.pending else {
            return;
        };
        if *generation != self.generation {
            self.pending = None;
            return;
        }
        *frames_left = frames_left.saturating_sub(1);
        if *frames_left == 0 {
            self.settle();
        }
    }

    /// Drop an active drag without navigating. Scheduled exits and the
    /// settle countdown are left running.
    pub fn abort_drag(&mut self) -> bool {
        if self.state.phase != Phase::Dragging {
            return false;
        }
        self.state = AnimationState::default();
        true
    }

    /// Force the card back to rest and drop anything scheduled
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.settle();
    }

    /// Visual parameters for the current phase and offset
    pub fn visual(&self) -> Visual {
        let ease = Transition::EaseOut(self.config.exit_duration);
        match self.state.phase {
            Phase::Resting => {
                Visual { translate_x: 0.0, rotation: 0.0, opacity: 1.0, transition: ease }
            }
            Phase::Dragging => {
                let offset = self.state.offset;
                Visual {
                    translate_x: offset,
                    rotation: offset * ROTATION_PER_UNIT,
                    opacity: (1.0 - offset.abs() / FADE_DISTANCE).max(MIN_DRAG_OPACITY),
                    transition: Transition::None,
                }
            }
            Phase::ExitingLeft => offscreen(-OFFSCREEN, ease),
            Phase::ExitingRight => offscreen(OFFSCREEN, ease),
            Phase::EnteringFromLeft => offscreen(-OFFSCREEN, Transition::None),
            Phase::EnteringFromRight => offscreen(OFFSCREEN, Transition::None),
        }
    }

    fn start_exit(&mut self, direction: SwipeDirection, action: A, now: Instant) {
        let Some(phase) = Phase::exiting(direction) else {
            return;
        };
        self.state = AnimationState { phase, offset: 0.0, direction };
        self.pending = Some(Pending::Exit {
            due: now + self.config.exit_duration,
            action,
            generation: self.generation,
        });
        tracing::debug!(?phase, "exit started");
    }

    fn settle(&mut self) {
        self.state = AnimationState::default();
        self.pending = None;
    }
}

impl<A> Default for AnimationStateMachine<A> {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

fn offscreen(x: f32, transition: Transition) -> Visual {
    Visual { translate_x: x, rotation: x * ROTATION_PER_UNIT, opacity: 0.0, transition }
}
