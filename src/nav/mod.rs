//! Card navigation: index bookkeeping, drag gestures and the exit/enter
//! animation that ties them together

pub mod animation;
pub mod card;
pub mod gesture;
pub mod navigation;

pub use animation::{
    AnimationConfig, AnimationState, AnimationStateMachine, DragOutcome, Phase, Transition, Visual,
};
pub use card::{CardOptions, Step, SwipeableCard};
pub use gesture::{GestureEvent, GestureTracker, SwipeDirection, SwipeEnd};
pub use navigation::{NavigationController, NavigationState};
