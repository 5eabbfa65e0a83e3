//! Index bookkeeping for a deck under a wrap or clamp boundary policy

/// Current position within a deck
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub index: usize,
    pub total: usize,
    pub wrap_around: bool,
}

/// Owns the current index. Never touches animation state, so it is safe to
/// call at any time.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    state: NavigationState,
}

impl NavigationController {
    pub fn new(total: usize, wrap_around: bool) -> Self {
        Self { state: NavigationState { index: 0, total, wrap_around } }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.state.index
    }

    pub fn total(&self) -> usize {
        self.state.total
    }

    /// Install a new deck length and go back to the first item
    pub fn set_total(&mut self, total: usize) {
        self.state.total = total;
        self.state.index = 0;
    }

    pub fn can_advance(&self) -> bool {
        let NavigationState { index, total, wrap_around } = self.state;
        if total == 0 {
            return false;
        }
        wrap_around || index + 1 < total
    }

    pub fn can_retreat(&self) -> bool {
        let NavigationState { index, total, wrap_around } = self.state;
        if total == 0 {
            return false;
        }
        wrap_around || index > 0
    }

    /// Move forward one item. Returns whether the index changed.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        let before = self.state.index;
        self.state.index = (before + 1) % self.state.total;
        self.state.index != before
    }

    /// Move back one item. Returns whether the index changed.
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        let before = self.state.index;
        let total = self.state.total;
        self.state.index = (before + total - 1) % total;
        self.state.index != before
    }

    pub fn reset(&mut self) {
        self.state.index = 0;
    }
}
