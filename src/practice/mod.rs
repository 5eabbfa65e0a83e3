//! Scored practice sessions with a missed-card retry loop

pub mod card;

use crate::deck::{Deck, Item};

pub use card::{Answer, PracticeCard};

/// One answered card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub item: Item,
    pub was_correct: bool,
}

/// Running score. `correct + incorrect == seen.len()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PracticeStats {
    pub correct: usize,
    pub incorrect: usize,
    pub seen: Vec<Seen>,
}

impl PracticeStats {
    pub fn answered(&self) -> usize {
        self.correct + self.incorrect
    }

    /// Rounded share of correct answers, 0 when nothing has been answered
    pub fn percentage(&self) -> u8 {
        let answered = self.answered();
        if answered == 0 {
            return 0;
        }
        ((self.correct as f64 / answered as f64) * 100.0).round() as u8
    }

    fn record(&mut self, item: Item, was_correct: bool) {
        if was_correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.seen.push(Seen { item, was_correct });
    }
}

/// Where the session is, derived from deck length and index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Finished,
}

/// A single pass over a deck, scoring each answer
#[derive(Debug, Clone, Default)]
pub struct PracticeSession {
    deck: Deck,
    /// Next card to answer; equals `deck.len()` once finished
    index: usize,
    stats: PracticeStats,
    flipped: bool,
}

impl PracticeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a deck and clear the score
    pub fn start(&mut self, deck: Deck) {
        tracing::info!(cards = deck.len(), "practice session started");
        self.deck = deck;
        self.index = 0;
        self.stats = PracticeStats::default();
        self.flipped = false;
    }

    /// Drop the deck and score; back to `NotStarted`
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn state(&self) -> SessionState {
        if self.deck.is_empty() {
            SessionState::NotStarted
        } else if self.index < self.deck.len() {
            SessionState::InProgress
        } else {
            SessionState::Finished
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == SessionState::Finished
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.deck.len()
    }

    /// The card being answered, or the placeholder
    pub fn current_item(&self) -> &Item {
        self.deck.get(self.index).unwrap_or_else(|| Item::placeholder())
    }

    pub fn stats(&self) -> &PracticeStats {
        &self.stats
    }

    pub fn total_answered(&self) -> usize {
        self.stats.answered()
    }

    pub fn percentage(&self) -> u8 {
        self.stats.percentage()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn toggle_flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Score the current card and move to the next. Ignored unless a card
    /// is in progress.
    pub fn record_answer(&mut self, was_correct: bool) {
        if self.state() != SessionState::InProgress {
            return;
        }
        let item = self.current_item().clone();
        self.stats.record(item, was_correct);
        self.flipped = false;
        self.index += 1;

        if self.is_finished() {
            tracing::info!(
                correct = self.stats.correct,
                incorrect = self.stats.incorrect,
                percentage = self.percentage(),
                "practice session finished"
            );
        }
    }

    /// Cards answered incorrectly, in the order they were seen
    pub fn missed_items(&self) -> Vec<Item> {
        self.stats.seen.iter().filter(|s| !s.was_correct).map(|s| s.item.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::deck::Category;

    fn deck(n: usize) -> Deck {
        (0..n).map(|i| Item::new(Category::Consonant, &format!("c{i}"), "name", "")).collect()
    }

    #[test]
    fn new_session_is_not_started() {
        let session = PracticeSession::new();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.percentage(), 0);
        assert!(session.current_item().is_placeholder());
    }

    #[test]
    fn scoring_pattern_matches_expected_totals() {
        let mut session = PracticeSession::new();
        session.start(deck(3));
        assert_eq!(session.state(), SessionState::InProgress);

        session.record_answer(true);
        session.record_answer(false);
        session.record_answer(true);

        assert_eq!(session.stats().correct, 2);
        assert_eq!(session.stats().incorrect, 1);
        assert_eq!(session.percentage(), 67);
        assert_eq!(session.state(), SessionState::Finished);

        let missed = session.missed_items();
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].front, "c1");
    }

    #[test]
    fn answers_after_finish_are_ignored() {
        let mut session = PracticeSession::new();
        session.start(deck(1));
        session.record_answer(true);
        session.record_answer(false);
        assert_eq!(session.total_answered(), 1);
        assert_eq!(session.index(), 1);
    }

    #[test]
    fn answer_clears_flip() {
        let mut session = PracticeSession::new();
        session.start(deck(2));
        session.toggle_flip();
        assert!(session.is_flipped());
        session.record_answer(true);
        assert!(!session.is_flipped());
    }

    #[test]
    fn double_flip_is_identity() {
        let mut session = PracticeSession::new();
        session.start(deck(2));
        session.toggle_flip();
        session.toggle_flip();
        assert!(!session.is_flipped());
    }

    #[test]
    fn restart_clears_stats() {
        let mut session = PracticeSession::new();
        session.start(deck(2));
        session.record_answer(false);
        session.start(deck(4));
        assert_eq!(session.stats(), &PracticeStats::default());
        assert_eq!(session.index(), 0);
        assert_eq!(session.total(), 4);
    }

    #[test]
    fn reset_returns_to_not_started() {
        let mut session = PracticeSession::new();
        session.start(deck(2));
        session.record_answer(true);
        session.reset();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.total_answered(), 0);
    }

    #[test]
    fn missed_items_keep_encounter_order() {
        let mut session = PracticeSession::new();
        session.start(deck(4));
        for correct in [false, true, false, false] {
            session.record_answer(correct);
        }
        let fronts: Vec<_> = session.missed_items().into_iter().map(|i| i.front).collect();
        assert_eq!(fronts, vec!["c0", "c2", "c3"]);
    }

    proptest! {
        #[test]
        fn stats_stay_consistent(answers in proptest::collection::vec(any::<bool>(), 0..40)) {
            let mut session = PracticeSession::new();
            session.start(deck(25));
            for answer in &answers {
                session.record_answer(*answer);
            }

            let stats = session.stats();
            prop_assert_eq!(stats.correct + stats.incorrect, stats.seen.len());
            prop_assert!(session.percentage() <= 100);

            let missed = session.missed_items();
            let wrong: Vec<_> = stats.seen.iter().filter(|s| !s.was_correct).map(|s| s.item.clone()).collect();
            prop_assert_eq!(missed, wrong);
            prop_assert_eq!(stats.incorrect, session.missed_items().len());
        }
    }
}
