//! swipedeck - swipeable flashcards in the terminal
//!
//! Browse shuffled decks of Thai consonants, vowels and words by swiping
//! cards with the mouse or the arrow keys, then test yourself in scored
//! practice sessions that loop back over the cards you missed.

pub mod app;
pub mod config;
pub mod deck;
pub mod nav;
pub mod practice;
pub mod speech;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use deck::{ContentPool, Deck, DeckBuilder, Filter, Item};
pub use theme::Theme;
