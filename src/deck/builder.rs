//! Deck construction: filter the pool, then shuffle

use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;

use super::{ContentPool, Deck, Filter, Item};

/// Builds shuffled decks from a read-only content pool
pub struct DeckBuilder<'a, R = ThreadRng> {
    pool: &'a ContentPool,
    rng: R,
}

impl<'a> DeckBuilder<'a> {
    /// Builder backed by the thread-local RNG
    pub fn new(pool: &'a ContentPool) -> Self {
        Self { pool, rng: rand::rng() }
    }
}

impl<'a, R: Rng> DeckBuilder<'a, R> {
    /// Builder backed by a caller-supplied RNG (seeded in tests)
    pub fn with_rng(pool: &'a ContentPool, rng: R) -> Self {
        Self { pool, rng }
    }

    /// Every pool item matching `filter`, uniformly shuffled.
    ///
    /// An empty match is a valid, empty deck.
    pub fn build_deck(&mut self, filter: Filter) -> Deck {
        let items: Vec<Item> =
            self.pool.items().iter().filter(|item| filter.matches(item.category)).cloned().collect();
        tracing::debug!(%filter, size = items.len(), "building deck");
        self.shuffled(items)
    }

    /// Shuffle a caller-supplied list, e.g. the cards missed last session
    pub fn build_from_cards(&mut self, items: Vec<Item>) -> Deck {
        tracing::debug!(size = items.len(), "building deck from cards");
        self.shuffled(items)
    }

    fn shuffled(&mut self, mut items: Vec<Item>) -> Deck {
        // Fisher-Yates, O(n)
        items.shuffle(&mut self.rng);
        Deck::new(items)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::deck::Category;

    fn multiset(items: &[Item]) -> HashMap<&Item, usize> {
        let mut counts = HashMap::new();
        for item in items {
            *counts.entry(item).or_insert(0) += 1;
        }
        counts
    }

    fn matching(pool: &ContentPool, filter: Filter) -> Vec<Item> {
        pool.items().iter().filter(|i| filter.matches(i.category)).cloned().collect()
    }

    #[test]
    fn build_all_contains_every_item_once() {
        let pool = ContentPool::builtin();
        let deck = DeckBuilder::with_rng(&pool, StdRng::seed_from_u64(7)).build_deck(Filter::All);

        assert_eq!(deck.len(), 23);
        let counts = multiset(&deck);
        for item in pool.items() {
            assert_eq!(counts.get(item), Some(&1), "missing or duplicated {}", item.front);
        }
    }

    #[test]
    fn build_filtered_only_contains_category() {
        let pool = ContentPool::builtin();
        let deck = DeckBuilder::new(&pool).build_deck(Filter::Vowels);
        assert_eq!(deck.len(), 5);
        assert!(deck.iter().all(|item| item.category == Category::Vowel));
    }

    #[test]
    fn build_does_not_touch_pool_order() {
        let pool = ContentPool::builtin();
        let before = pool.items().to_vec();
        let _ = DeckBuilder::new(&pool).build_deck(Filter::All);
        assert_eq!(pool.items(), before.as_slice());
    }

    #[test]
    fn empty_pool_yields_empty_deck() {
        let pool = ContentPool::default();
        let deck = DeckBuilder::new(&pool).build_deck(Filter::Words);
        assert!(deck.is_empty());
    }

    #[test]
    fn build_from_cards_keeps_the_cards() {
        let pool = ContentPool::builtin();
        let missed = pool.items()[..3].to_vec();
        let deck = DeckBuilder::new(&pool).build_from_cards(missed.clone());
        assert_eq!(multiset(&deck), multiset(&missed));
    }

    #[test]
    fn shuffle_reaches_more_than_one_order() {
        let pool = ContentPool::builtin();
        let mut builder = DeckBuilder::with_rng(&pool, StdRng::seed_from_u64(1));
        let first = builder.build_deck(Filter::Words);
        let differs = (0..20).any(|_| builder.build_deck(Filter::Words) != first);
        assert!(differs);
    }

    proptest! {
        #[test]
        fn shuffle_is_a_permutation(seed in any::<u64>(), which in 0usize..4) {
            let pool = ContentPool::builtin();
            let filter = Filter::CYCLE[which];
            let deck = DeckBuilder::with_rng(&pool, StdRng::seed_from_u64(seed)).build_deck(filter);
            let expected = matching(&pool, filter);
            prop_assert_eq!(multiset(&deck), multiset(&expected));
        }
    }
}
