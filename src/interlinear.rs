//! Verse and passage assembly.
//!
//! [`Interlinear`] ties a Greek text source to the gloss lexicon and any
//! number of translation modules, and produces the model the export
//! consumes.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::lexicon::GlossLexicon;
use crate::markup::{self, TaggedWord};
use crate::model::{InterlinearVerse, InterlinearWord, Passage};
use crate::reference::{PassageRange, VerseRef, parse_reference_range};
use crate::source::TextSource;

/// Upper bound on verses visited while walking one passage.
pub const MAX_PASSAGE_VERSES: usize = 5000;

/// Translation id that disables phrase translations.
pub const NO_TRANSLATION: &str = "NONE";

pub struct Interlinear {
    text: Box<dyn TextSource>,
    lexicon: GlossLexicon,
    translations: BTreeMap<String, Box<dyn TextSource>>,
    selected: Option<String>,
}

impl Interlinear {
    pub fn new(text: Box<dyn TextSource>, lexicon: GlossLexicon) -> Self {
        Self {
            text,
            lexicon,
            translations: BTreeMap::new(),
            selected: None,
        }
    }

    pub fn lexicon(&self) -> &GlossLexicon {
        &self.lexicon
    }

    pub fn text_source(&self) -> &dyn TextSource {
        self.text.as_ref()
    }

    /// Register a translation module. The first one registered is selected.
    pub fn add_translation(&mut self, id: impl Into<String>, source: Box<dyn TextSource>) {
        let id = id.into();
        if self.selected.is_none() {
            self.selected = Some(id.clone());
        }
        self.translations.insert(id, source);
    }

    pub fn available_translations(&self) -> Vec<&str> {
        self.translations.keys().map(String::as_str).collect()
    }

    pub fn selected_translation(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a translation by id, or disable translations with `"NONE"`.
    pub fn set_translation(&mut self, id: &str) -> Result<Option<&str>> {
        if id == NO_TRANSLATION {
            self.selected = None;
        } else if self.translations.contains_key(id) {
            self.selected = Some(id.to_string());
        } else {
            return Err(Error::UnknownTranslation(id.to_string()));
        }
        Ok(self.selected_translation())
    }

    fn word(&self, tagged: TaggedWord) -> InterlinearWord {
        let en_gloss = if tagged.gloss.trim().is_empty() {
            self.lexicon.gloss(&tagged.strongs)
        } else {
            tagged.gloss.trim().to_string()
        };
        InterlinearWord {
            tr_transliteration: markup::transliterate(&tagged.form),
            part_of_speech: markup::part_of_speech(&tagged.morph).to_string(),
            greek_word: tagged.form,
            lemma: tagged.lemma,
            morphology: tagged.morph,
            strongs_number: tagged.strongs,
            en_gloss,
        }
    }

    /// Fetch one verse with glosses attached.
    ///
    /// A verse the source does not have comes back with no words.
    pub fn fetch_verse(&self, book: &str, chapter: u32, verse: u32) -> Result<InterlinearVerse> {
        let loc = VerseRef::new(book, chapter, verse);
        let words = self
            .text
            .words(&loc)
            .map_err(|e| Error::lookup(&loc, e))?
            .unwrap_or_default();

        let mut data = InterlinearVerse::new(book, chapter, verse);
        for tagged in words {
            data.add_word(self.word(tagged));
        }
        debug!(verse = %loc, words = data.words.len(), "fetched verse");
        Ok(data)
    }

    /// Fetch every verse of a range, inclusive.
    ///
    /// Verse numbers are walked upward; a verse that fails or has no words
    /// is taken as the end of its chapter, and the walk continues at verse 1
    /// of the next chapter.
    pub fn fetch_passage(&self, range: &PassageRange) -> Vec<InterlinearVerse> {
        let mut verses = Vec::new();
        let (mut chapter, mut verse) = range.start;
        let mut visited = 0;

        while (chapter, verse) <= range.end {
            visited += 1;
            if visited > MAX_PASSAGE_VERSES {
                warn!(passage = %range, "verse limit reached, passage truncated");
                break;
            }
            let next = match self.fetch_verse(&range.book, chapter, verse) {
                Ok(data) if !data.words.is_empty() => {
                    verses.push(data);
                    verse.checked_add(1).map(|v| (chapter, v))
                }
                Ok(_) => chapter.checked_add(1).map(|c| (c, 1)),
                Err(e) => {
                    debug!(error = %e, "lookup failed, moving to next chapter");
                    chapter.checked_add(1).map(|c| (c, 1))
                }
            };
            // Numbering is exhausted at u32::MAX.
            let Some(position) = next else { break };
            (chapter, verse) = position;
        }

        verses
    }

    /// Text of the selected translation for a verse, or an empty string.
    pub fn phrase_translation(&self, verse: &VerseRef) -> String {
        let Some(module) = self
            .selected
            .as_ref()
            .and_then(|id| self.translations.get(id))
        else {
            return String::new();
        };
        match module.plain_text(verse) {
            Ok(text) => text.unwrap_or_default().trim().to_string(),
            Err(e) => {
                debug!(%verse, error = %e, "translation lookup failed");
                String::new()
            }
        }
    }

    /// Parse a reference and fetch everything it names.
    pub fn lookup(&self, reference: &str) -> Result<Passage> {
        let range = parse_reference_range(reference)?;
        if range.is_single() {
            let first = range.first();
            let verse = self.fetch_verse(&first.book, first.chapter, first.verse)?;
            return Ok(Passage {
                passage_ref: first.to_string(),
                verses: vec![verse],
            });
        }

        let verses = self.fetch_passage(&range);
        if verses.is_empty() {
            return Err(Error::NoData(reference.trim().to_string()));
        }
        Ok(Passage {
            passage_ref: reference.trim().to_string(),
            verses,
        })
    }
}
