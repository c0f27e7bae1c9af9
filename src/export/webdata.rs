//! Per-book JSON export for the browser-only app.
//!
//! Sources carry no chapter/verse manifest, so a book's extent is
//! discovered by probing: three empty verses in a row end a chapter, two
//! chapters without any verse end the book.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::interlinear::Interlinear;
use crate::reference::VerseRef;
use crate::source::{WebBook, WebVerse, WebWord};

const EMPTY_VERSES_PER_CHAPTER_END: u32 = 3;
const EMPTY_CHAPTERS_PER_BOOK_END: u32 = 2;
const MAX_CHAPTERS: u32 = 200;

/// Collect every verse of `book` in the web-data shape.
pub fn collect_book(interlinear: &Interlinear, book: &str) -> WebBook {
    let mut result = WebBook::new();
    let mut empty_chapters = 0;
    let mut chapter = 1;

    while chapter <= MAX_CHAPTERS {
        let mut empty_in_row = 0;
        let mut any_verse = false;
        let mut verse = 1;

        while empty_in_row < EMPTY_VERSES_PER_CHAPTER_END {
            let data = interlinear.fetch_verse(book, chapter, verse).ok();
            match data.filter(|d| !d.words.is_empty()) {
                Some(data) => {
                    empty_in_row = 0;
                    any_verse = true;
                    let words = data
                        .words
                        .into_iter()
                        .map(|w| WebWord {
                            g: w.greek_word,
                            strongs: w.strongs_number,
                            gls: w.en_gloss,
                            l: w.lemma,
                            m: w.morphology,
                        })
                        .collect();
                    let translation =
                        interlinear.phrase_translation(&VerseRef::new(book, chapter, verse));
                    result.insert(format!("{chapter}:{verse}"), WebVerse { words, translation });
                }
                None => empty_in_row += 1,
            }
            verse += 1;
        }

        if any_verse {
            empty_chapters = 0;
        } else {
            empty_chapters += 1;
            if empty_chapters >= EMPTY_CHAPTERS_PER_BOOK_END {
                break;
            }
        }
        debug!(book, chapter, verses = result.len(), "scanned chapter");
        chapter += 1;
    }

    result
}

/// Write `<out_dir>/<book>.json` and return its path.
pub fn export_book(interlinear: &Interlinear, book: &str, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{book}.json"));
    let data = collect_book(interlinear, book);
    std::fs::write(&path, serde_json::to_string(&data)?)?;
    info!(book, verses = data.len(), path = %path.display(), "exported web data");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::GlossLexicon;
    use crate::source::JsonBookSource;

    fn interlinear_with(dir: &Path, json: &str) -> Interlinear {
        std::fs::write(dir.join("Jude.json"), json).unwrap();
        let source = JsonBookSource::open(dir).unwrap();
        let lexicon = GlossLexicon::from_json(r#"{"2455": "Judas"}"#).unwrap();
        Interlinear::new(Box::new(source), lexicon)
    }

    #[test]
    fn test_collects_with_gaps() {
        let dir = tempfile::tempdir().unwrap();
        // 1:3 missing (a gap shorter than three verses), chapter 2 absent,
        // chapter 3 present: the book continues across one empty chapter.
        let il = interlinear_with(
            dir.path(),
            r#"{
                "1:1": {"words": [{"g": "Ἰούδας", "S": "G2455"}]},
                "1:2": {"words": [{"g": "ἔλεος"}]},
                "1:4": {"words": [{"g": "παρεισέδυσαν"}]},
                "3:1": {"words": [{"g": "τέλος"}], "translation": "end"}
            }"#,
        );

        let book = collect_book(&il, "Jude");
        let keys: Vec<&str> = book.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1:1", "1:2", "1:4", "3:1"]);
        assert_eq!(book["1:1"].words[0].gls, "Judas");
        assert_eq!(book["1:1"].words[0].strongs, "G2455");
    }

    #[test]
    fn test_stops_after_long_gap() {
        let dir = tempfile::tempdir().unwrap();
        let il = interlinear_with(
            dir.path(),
            r#"{
                "1:1": {"words": [{"g": "α"}]},
                "1:5": {"words": [{"g": "ε"}]},
                "4:1": {"words": [{"g": "δ"}]}
            }"#,
        );
        let book = collect_book(&il, "Jude");
        assert_eq!(book.keys().collect::<Vec<_>>(), vec!["1:1"]);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let il = interlinear_with(dir.path(), r#"{"1:1": {"words": [{"g": "Ἰούδας"}]}}"#);
        let out = dir.path().join("out");
        let path = export_book(&il, "Jude", &out).unwrap();
        assert_eq!(path, out.join("Jude.json"));

        let written: WebBook = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["1:1"].words[0].g, "Ἰούδας");
        assert_eq!(written["1:1"].translation, "");
    }
}
