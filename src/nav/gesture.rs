//! Horizontal drag tracking on a single card surface
//!
//! Positions arrive as terminal cells and are reported in units
//! (`units_per_column` per cell). The tracker only classifies; deciding
//! whether a drag was long enough to navigate is left to the animation
//! state machine.

use ratatui::layout::{Position, Rect};

/// Minimum |displacement| in units for a drag to have a direction
const DIRECTION_EPSILON: f32 = 0.5;

/// Horizontal direction of a swipe or exit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    #[default]
    None,
}

impl SwipeDirection {
    pub fn classify(displacement: f32) -> Self {
        if displacement < -DIRECTION_EPSILON {
            SwipeDirection::Left
        } else if displacement > DIRECTION_EPSILON {
            SwipeDirection::Right
        } else {
            SwipeDirection::None
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            SwipeDirection::Left => SwipeDirection::Right,
            SwipeDirection::Right => SwipeDirection::Left,
            SwipeDirection::None => SwipeDirection::None,
        }
    }
}

/// Reported when a drag is released
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeEnd {
    /// Net horizontal movement in units, negative to the left
    pub displacement: f32,
    pub direction: SwipeDirection,
}

impl SwipeEnd {
    pub fn magnitude(&self) -> f32 {
        self.displacement.abs()
    }
}

/// Something the tracker observed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Started,
    Moved { offset: f32 },
    Ended(SwipeEnd),
}

/// Follows one pointer drag at a time on the attached surface
#[derive(Debug, Clone)]
pub struct GestureTracker {
    surface: Rect,
    units_per_column: f32,
    /// Column where the active drag started
    origin: Option<u16>,
    offset: f32,
}

impl GestureTracker {
    pub fn new(units_per_column: f32) -> Self {
        Self { surface: Rect::default(), units_per_column, origin: None, offset: 0.0 }
    }

    /// Attach to (or move along with) the card surface. Called on render.
    pub fn attach(&mut self, surface: Rect) {
        self.surface = surface;
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    /// Live offset of the active drag, 0 when idle
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Pointer pressed. Starts a drag only on the surface.
    pub fn press(&mut self, column: u16, row: u16) -> Option<GestureEvent> {
        if !self.surface.contains(Position::new(column, row)) {
            return None;
        }
        self.origin = Some(column);
        self.offset = 0.0;
        Some(GestureEvent::Started)
    }

    /// Pointer moved while pressed. Rows are ignored, the drag may leave
    /// the surface vertically.
    pub fn drag(&mut self, column: u16, _row: u16) -> Option<GestureEvent> {
        let origin = self.origin?;
        self.offset = self.to_units(origin, column);
        Some(GestureEvent::Moved { offset: self.offset })
    }

    /// Pointer released. A release without a press is ignored.
    pub fn release(&mut self, column: u16, _row: u16) -> Option<GestureEvent> {
        let origin = self.origin.take()?;
        let displacement = self.to_units(origin, column);
        self.offset = 0.0;
        Some(GestureEvent::Ended(SwipeEnd {
            displacement,
            direction: SwipeDirection::classify(displacement),
        }))
    }

    /// Abandon any drag in progress without reporting an end
    pub fn cancel(&mut self) {
        self.origin = None;
        self.offset = 0.0;
    }

    fn to_units(&self, origin: u16, column: u16) -> f32 {
        (f32::from(column) - f32::from(origin)) * self.units_per_column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> GestureTracker {
        let mut t = GestureTracker::new(8.0);
        t.attach(Rect::new(10, 5, 40, 10));
        t
    }

    #[test]
    fn press_outside_surface_is_ignored() {
        let mut t = tracker();
        assert_eq!(t.press(2, 2), None);
        assert!(!t.is_dragging());
    }

    #[test]
    fn drag_reports_offset_in_units() {
        let mut t = tracker();
        assert_eq!(t.press(30, 8), Some(GestureEvent::Started));
        assert_eq!(t.drag(25, 8), Some(GestureEvent::Moved { offset: -40.0 }));
        assert_eq!(t.offset(), -40.0);
    }

    #[test]
    fn release_classifies_direction() {
        let mut t = tracker();
        t.press(30, 8);
        let ended = t.release(19, 8);
        assert_eq!(
            ended,
            Some(GestureEvent::Ended(SwipeEnd { displacement: -88.0, direction: SwipeDirection::Left }))
        );
        assert!(!t.is_dragging());
        assert_eq!(t.offset(), 0.0);
    }

    #[test]
    fn release_in_place_has_no_direction() {
        let mut t = tracker();
        t.press(30, 8);
        match t.release(30, 12) {
            Some(GestureEvent::Ended(end)) => {
                assert_eq!(end.direction, SwipeDirection::None);
                assert_eq!(end.magnitude(), 0.0);
            }
            other => panic!("expected end, got {other:?}"),
        }
    }

    #[test]
    fn drag_or_release_without_press_is_noop() {
        let mut t = tracker();
        assert_eq!(t.drag(20, 8), None);
        assert_eq!(t.release(20, 8), None);
    }

    #[test]
    fn drag_may_leave_surface() {
        let mut t = tracker();
        t.press(12, 8);
        assert_eq!(t.drag(70, 30), Some(GestureEvent::Moved { offset: 464.0 }));
    }

    #[test]
    fn cancel_drops_active_drag() {
        let mut t = tracker();
        t.press(30, 8);
        t.cancel();
        assert_eq!(t.release(10, 8), None);
    }

    #[test]
    fn classify_respects_epsilon() {
        assert_eq!(SwipeDirection::classify(0.2), SwipeDirection::None);
        assert_eq!(SwipeDirection::classify(3.0), SwipeDirection::Right);
        assert_eq!(SwipeDirection::Left.opposite(), SwipeDirection::Right);
    }
}
