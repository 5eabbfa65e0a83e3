//! Read-only content pools
//!
//! The built-in pool is a small Thai sample. A larger pool can be loaded
//! from a JSON file shaped like `{ "consonants": [...], "vowels": [...],
//! "words": [...] }`, where each entry has `front`, `back` and optionally
//! `romanization` and `speak`. The category is implied by the table.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Category, Item};

/// Errors raised while loading a content file
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read content file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse content file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Content file has no items")]
    Empty,
}

/// One table entry in the on-disk format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    front: String,
    back: String,
    #[serde(default)]
    romanization: String,
    #[serde(default)]
    speak: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ContentFile {
    #[serde(default)]
    consonants: Vec<Entry>,
    #[serde(default)]
    vowels: Vec<Entry>,
    #[serde(default)]
    words: Vec<Entry>,
}

/// All loaded items, in table order
#[derive(Debug, Clone, Default)]
pub struct ContentPool {
    items: Vec<Item>,
}

impl ContentPool {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, category: Category) -> usize {
        self.items.iter().filter(|item| item.category == category).count()
    }

    /// Load a pool from a JSON file
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let file: ContentFile = serde_json::from_str(json)?;

        let tables = [
            (Category::Consonant, file.consonants),
            (Category::Vowel, file.vowels),
            (Category::Word, file.words),
        ];
        let items: Vec<Item> = tables
            .into_iter()
            .flat_map(|(category, entries)| {
                entries.into_iter().map(move |e| Item {
                    category,
                    front: e.front,
                    back: e.back,
                    romanization: e.romanization,
                    speak: e.speak,
                })
            })
            .collect();

        if items.is_empty() {
            return Err(ContentError::Empty);
        }
        tracing::debug!(items = items.len(), "loaded content pool");
        Ok(Self::new(items))
    }

    /// The sample pool shipped with the binary
    pub fn builtin() -> Self {
        use Category::*;

        let table: &[(Category, &str, &str, &str)] = &[
            (Consonant, "ก", "gor gai (chicken)", "g"),
            (Consonant, "ข", "khor khai (egg)", "kh"),
            (Consonant, "ค", "khor khwai (buffalo)", "kh"),
            (Consonant, "ง", "ngor nguu (snake)", "ng"),
            (Consonant, "จ", "jor jaan (plate)", "j"),
            (Consonant, "ฉ", "chor ching (cymbals)", "ch"),
            (Consonant, "ช", "chor chaang (elephant)", "ch"),
            (Consonant, "ซ", "sor soh (chain)", "s"),
            (Consonant, "ด", "dor dek (child)", "d"),
            (Consonant, "ต", "dtor dtao (turtle)", "dt"),
            (Vowel, "อะ", "sara a (short)", "a"),
            (Vowel, "อา", "sara aa (long)", "aa"),
            (Vowel, "อิ", "sara i (short)", "i"),
            (Vowel, "อี", "sara ii (long)", "ii"),
            (Vowel, "อุ", "sara u (short)", "u"),
            (Word, "สวัสดี", "hello", "sawatdee"),
            (Word, "ขอบคุณ", "thank you", "khop khun"),
            (Word, "น้ำ", "water", "nam"),
            (Word, "ข้าว", "rice", "khao"),
            (Word, "บ้าน", "house", "baan"),
            (Word, "แมว", "cat", "maew"),
            (Word, "หมา", "dog", "maa"),
            (Word, "ไก่", "chicken", "gai"),
        ];

        let items = table
            .iter()
            .map(|&(category, front, back, roman)| Item::new(category, front, back, roman))
            .collect();
        Self::new(items)
    }
}
