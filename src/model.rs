//! Interlinear data model.
//!
//! These types are what the front end displays and what the FlexText export
//! consumes. The JSON form locates a verse by a single `verse_ref` string
//! (`"John 1:1"`) rather than separate book/chapter/verse fields.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::reference::VerseRef;

/// All extracted interlinear data for a single Greek word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterlinearWord {
    pub greek_word: String,
    pub lemma: String,
    pub morphology: String,
    pub strongs_number: String,
    pub en_gloss: String,
    pub tr_transliteration: String,
    pub part_of_speech: String,
}

impl InterlinearWord {
    /// Look up a field by its data key.
    ///
    /// Export configuration names word fields by these keys (e.g. the
    /// baseline line defaults to `greek_word`). Unknown keys yield `None`.
    pub fn field(&self, key: &str) -> Option<&str> {
        Some(match key {
            "greek_word" => &self.greek_word,
            "lemma" => &self.lemma,
            "morphology" => &self.morphology,
            "strongs_number" => &self.strongs_number,
            "en_gloss" => &self.en_gloss,
            "tr_transliteration" => &self.tr_transliteration,
            "part_of_speech" => &self.part_of_speech,
            _ => return None,
        })
    }
}

/// All interlinear data for a single verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterlinearVerse {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub words: Vec<InterlinearWord>,
    pub free_translation: String,
    pub literal_translation: String,
}

impl InterlinearVerse {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
            words: Vec::new(),
            free_translation: String::new(),
            literal_translation: String::new(),
        }
    }

    pub fn verse_ref(&self) -> VerseRef {
        VerseRef::new(self.book.clone(), self.chapter, self.verse)
    }

    pub fn add_word(&mut self, word: InterlinearWord) {
        self.words.push(word);
    }

    /// Values of `key` for every word, joined by single spaces.
    pub fn joined(&self, key: &str) -> String {
        self.words
            .iter()
            .map(|w| w.field(key).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

#[derive(Serialize, Deserialize)]
struct VerseRepr {
    verse_ref: String,
    #[serde(default)]
    free_translation: String,
    #[serde(default)]
    literal_translation: String,
    #[serde(default)]
    words: Vec<InterlinearWord>,
}

impl Serialize for InterlinearVerse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        VerseRepr {
            verse_ref: self.verse_ref().to_string(),
            free_translation: self.free_translation.clone(),
            literal_translation: self.literal_translation.clone(),
            words: self.words.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InterlinearVerse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = VerseRepr::deserialize(deserializer)?;
        let loc = VerseRef::parse(&repr.verse_ref).map_err(serde::de::Error::custom)?;
        Ok(Self {
            book: loc.book,
            chapter: loc.chapter,
            verse: loc.verse,
            words: repr.words,
            free_translation: repr.free_translation,
            literal_translation: repr.literal_translation,
        })
    }
}

/// A fetched reference: one or more consecutive verses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub passage_ref: String,
    pub verses: Vec<InterlinearVerse>,
}
