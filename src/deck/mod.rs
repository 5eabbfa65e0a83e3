//! Study items, content pools and shuffled decks

pub mod builder;
pub mod content;

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub use builder::DeckBuilder;
pub use content::{ContentError, ContentPool};

/// Which table an item comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Consonant,
    Vowel,
    Word,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Consonant, Category::Vowel, Category::Word];

    pub fn label(self) -> &'static str {
        match self {
            Category::Consonant => "consonant",
            Category::Vowel => "vowel",
            Category::Word => "word",
        }
    }
}

/// A single flashcard. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub category: Category,

    /// Shown on the face of the card (the glyph or word)
    pub front: String,

    /// Shown once the card is flipped (name or meaning)
    pub back: String,

    /// Latin transliteration
    #[serde(default)]
    pub romanization: String,

    /// Text sent to pronunciation, when it differs from `front`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speak: Option<String>,
}

static PLACEHOLDER: Lazy<Item> = Lazy::new(|| Item {
    category: Category::Word,
    front: String::new(),
    back: String::new(),
    romanization: String::new(),
    speak: None,
});

impl Item {
    pub fn new(category: Category, front: &str, back: &str, romanization: &str) -> Self {
        Self {
            category,
            front: front.to_string(),
            back: back.to_string(),
            romanization: romanization.to_string(),
            speak: None,
        }
    }

    /// The empty item shown when there is nothing at the current index
    pub fn placeholder() -> &'static Item {
        &PLACEHOLDER
    }

    pub fn is_placeholder(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }

    /// Text to pronounce for this item
    pub fn spoken_text(&self) -> &str {
        self.speak.as_deref().unwrap_or(&self.front)
    }
}

/// Category filter used when building a deck
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Consonants,
    Vowels,
    Words,
}

impl Filter {
    pub const CYCLE: [Filter; 4] = [Filter::All, Filter::Consonants, Filter::Vowels, Filter::Words];

    pub fn matches(self, category: Category) -> bool {
        match self {
            Filter::All => true,
            Filter::Consonants => category == Category::Consonant,
            Filter::Vowels => category == Category::Vowel,
            Filter::Words => category == Category::Word,
        }
    }

    /// The filter after this one, wrapping back to `All`
    pub fn next(self) -> Filter {
        let pos = Self::CYCLE.iter().position(|f| *f == self).unwrap_or(0);
        Self::CYCLE[(pos + 1) % Self::CYCLE.len()]
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Filter::All => "all",
            Filter::Consonants => "consonants",
            Filter::Vowels => "vowels",
            Filter::Words => "words",
        };
        f.write_str(name)
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "a" => Ok(Filter::All),
            "consonants" | "consonant" | "c" => Ok(Filter::Consonants),
            "vowels" | "vowel" | "v" => Ok(Filter::Vowels),
            "words" | "word" | "w" => Ok(Filter::Words),
            other => Err(format!("unknown filter '{other}' (expected all, consonants, vowels or words)")),
        }
    }
}

/// An ordered sequence of items. Never mutated in place; rebuild instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    items: Vec<Item>,
}

impl Deck {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }
}

impl Deref for Deck {
    type Target = [Item];

    fn deref(&self) -> &[Item] {
        &self.items
    }
}

impl FromIterator<Item> for Deck {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}
