//! Per-book JSON text source.
//!
//! Reads the files written by the web-data export: one `<Book>.json` per
//! book, keyed by `"chapter:verse"`. Books are loaded on first use.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::TextSource;
use crate::books::{Book, book_key};
use crate::error::{Error, Result};
use crate::markup::TaggedWord;
use crate::reference::VerseRef;
use crate::util::decode_text;

/// One word in the web-data format. Field names are kept short on purpose
/// for the browser payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebWord {
    #[serde(default)]
    pub g: String,
    #[serde(rename = "S", default)]
    pub strongs: String,
    #[serde(default)]
    pub gls: String,
    #[serde(default)]
    pub l: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub m: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebVerse {
    #[serde(default)]
    pub words: Vec<WebWord>,
    #[serde(default)]
    pub translation: String,
}

/// A whole book, `"C:V"` → verse. Ordered by key for stable output.
pub type WebBook = BTreeMap<String, WebVerse>;

pub struct JsonBookSource {
    id: String,
    dir: PathBuf,
    books: Mutex<HashMap<String, Option<Arc<WebBook>>>>,
}

impl JsonBookSource {
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", dir.display()),
            )));
        }
        let id = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("json")
            .to_string();
        Ok(Self {
            id,
            dir: dir.to_path_buf(),
            books: Mutex::new(HashMap::new()),
        })
    }

    fn candidate_files(&self, book: &str) -> Vec<PathBuf> {
        let mut names = vec![book.to_string(), book.replace(' ', "")];
        if let Some(known) = Book::lookup(book) {
            names.push(known.name.to_string());
            names.push(known.osis.to_string());
        }
        names.dedup();
        names
            .into_iter()
            .map(|n| self.dir.join(format!("{n}.json")))
            .collect()
    }

    fn book(&self, book: &str) -> Result<Option<Arc<WebBook>>> {
        let key = book_key(book);
        let mut books = self.books.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = books.get(&key) {
            return Ok(cached.clone());
        }

        let mut loaded = None;
        for path in self.candidate_files(book) {
            if !path.is_file() {
                continue;
            }
            let bytes = std::fs::read(&path)?;
            let data: WebBook = serde_json::from_str(&decode_text(&bytes, None))?;
            info!(path = %path.display(), verses = data.len(), "loaded book data");
            loaded = Some(Arc::new(data));
            break;
        }
        books.insert(key, loaded.clone());
        Ok(loaded)
    }

    fn verse(&self, verse: &VerseRef) -> Result<Option<WebVerse>> {
        let Some(book) = self.book(&verse.book)? else {
            debug!(source = %self.id, book = %verse.book, "no data file for book");
            return Ok(None);
        };
        Ok(book.get(&format!("{}:{}", verse.chapter, verse.verse)).cloned())
    }
}

impl TextSource for JsonBookSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn words(&self, verse: &VerseRef) -> Result<Option<Vec<TaggedWord>>> {
        Ok(self.verse(verse)?.map(|v| {
            v.words
                .into_iter()
                .map(|w| TaggedWord {
                    form: w.g,
                    lemma: w.l,
                    morph: w.m,
                    strongs: w.strongs,
                    gloss: w.gls,
                })
                .collect()
        }))
    }

    fn plain_text(&self, verse: &VerseRef) -> Result<Option<String>> {
        Ok(self.verse(verse)?.map(|v| v.translation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_book(dir: &Path, name: &str, json: &str) {
        std::fs::write(dir.join(format!("{name}.json")), json).unwrap();
    }

    #[test]
    fn test_reads_words_and_translation() {
        let dir = tempfile::tempdir().unwrap();
        write_book(
            dir.path(),
            "Matthew",
            r#"{"1:1": {"words": [{"g": "Βίβλος", "S": "G976", "gls": "book", "l": "βίβλος", "m": "N-NSF"}],
                        "translation": "The book of the genealogy"}}"#,
        );
        let source = JsonBookSource::open(dir.path()).unwrap();

        // Book names resolve through the alias table.
        let words = source.words(&VerseRef::new("Mt", 1, 1)).unwrap().unwrap();
        assert_eq!(
            words[0],
            TaggedWord {
                form: "Βίβλος".into(),
                lemma: "βίβλος".into(),
                morph: "N-NSF".into(),
                strongs: "G976".into(),
                gloss: "book".into(),
            }
        );
        assert_eq!(
            source.plain_text(&VerseRef::new("Matthew", 1, 1)).unwrap(),
            Some("The book of the genealogy".to_string())
        );
        assert_eq!(source.words(&VerseRef::new("Matthew", 1, 2)).unwrap(), None);
    }

    #[test]
    fn test_missing_book_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonBookSource::open(dir.path()).unwrap();
        assert_eq!(source.words(&VerseRef::new("Jude", 1, 1)).unwrap(), None);
    }

    #[test]
    fn test_malformed_book_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_book(dir.path(), "Jude", "[not json");
        let source = JsonBookSource::open(dir.path()).unwrap();
        assert!(source.words(&VerseRef::new("Jude", 1, 1)).is_err());
    }

    #[test]
    fn test_open_requires_directory() {
        assert!(JsonBookSource::open(Path::new("/nonexistent/dir")).is_err());
    }
}
