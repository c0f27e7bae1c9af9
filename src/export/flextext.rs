//! FlexText writer.
//!
//! Produces the interlinear-text document FLEx imports:
//!
//! ```text
//! document
//! └─ interlinear-text       title, title-abbreviation
//!    └─ paragraphs / paragraph / phrases
//!       └─ phrase           one per verse: txt, segnum, words, gls [, lit]
//!          └─ word          txt, gls [, pos] [, morphemes/morph/msa]
//! ```

use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::model::{InterlinearVerse, InterlinearWord};
use crate::reference::{VerseRef, range_title};
use crate::util::escape_xml;

pub const FLEXTEXT_EXTENSION: &str = "flextext";

type TranslationFn<'a> = Box<dyn Fn(&VerseRef) -> String + 'a>;

pub struct FlexTextWriter<'a> {
    config: ExportConfig,
    translation: Option<TranslationFn<'a>>,
}

impl<'a> FlexTextWriter<'a> {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            translation: None,
        }
    }

    /// Phrase translation provider, consulted before the verse's own
    /// translations. An empty string means "none".
    pub fn with_translation(mut self, f: impl Fn(&VerseRef) -> String + 'a) -> Self {
        self.translation = Some(Box::new(f));
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn write_verse(&self, verse: &InterlinearVerse) -> String {
        self.write_passage(std::slice::from_ref(verse))
    }

    /// Render a passage as one interlinear text, one phrase per verse.
    pub fn write_passage(&self, verses: &[InterlinearVerse]) -> String {
        let title = passage_title(verses);
        let abbrev = title.replace(' ', "").replace(':', "_");
        let en = &self.config.gloss_lang;

        let mut out = XmlOut::default();
        out.raw("<?xml version=\"1.0\" encoding=\"utf-8\"?>");
        out.open("document", &[("version", "2")]);
        out.open("interlinear-text", &[("guid", &guid())]);
        out.item("title", en, &title);
        out.item("title-abbreviation", en, &abbrev);
        out.open("paragraphs", &[]);
        out.open("paragraph", &[]);
        if verses.is_empty() {
            out.empty("phrases");
        } else {
            out.open("phrases", &[]);
            for verse in verses {
                self.write_phrase(&mut out, verse);
            }
            out.close("phrases");
        }
        out.close("paragraph");
        out.close("paragraphs");
        out.close("interlinear-text");
        out.close("document");
        out.finish()
    }

    fn write_phrase(&self, out: &mut XmlOut, verse: &InterlinearVerse) {
        let cfg = &self.config;

        out.open("phrase", &[("guid", &guid())]);
        out.item("txt", &cfg.baseline_lang, &verse.joined(&cfg.baseline_data_key));
        out.item("segnum", &cfg.gloss_lang, &verse.verse.to_string());

        if verse.words.is_empty() {
            out.empty("words");
        } else {
            out.open("words", &[]);
            for word in &verse.words {
                self.write_word(out, word);
            }
            out.close("words");
        }

        out.item("gls", &cfg.gloss_lang, &self.phrase_gloss(verse));

        let literal = verse.literal_translation.trim();
        if cfg.include_literal && !literal.is_empty() {
            out.item("lit", &cfg.gloss_lang, literal);
        }
        out.close("phrase");
    }

    fn write_word(&self, out: &mut XmlOut, word: &InterlinearWord) {
        let cfg = &self.config;
        let field = |key: &str| word.field(key).unwrap_or("");

        out.open("word", &[("guid", &guid())]);
        out.item("txt", &cfg.baseline_lang, field(&cfg.baseline_data_key));
        out.item("gls", &cfg.gloss_lang, field(&cfg.word_gloss_data_key));
        if cfg.include_pos && !word.part_of_speech.is_empty() {
            out.item("pos", &cfg.gloss_lang, &word.part_of_speech);
        }

        let analyses: Vec<(&str, &str)> = cfg
            .analysis_map
            .iter()
            .filter_map(|(key, ws)| {
                let value = field(key);
                (!value.is_empty()).then_some((ws.as_str(), value))
            })
            .collect();
        if !analyses.is_empty() {
            out.open("morphemes", &[]);
            out.open("morph", &[]);
            for (ws, value) in analyses {
                out.item("msa", ws, value);
            }
            out.close("morph");
            out.close("morphemes");
        }
        out.close("word");
    }

    /// Translation provider, then the verse's free and literal translations,
    /// then the word glosses strung together.
    fn phrase_gloss(&self, verse: &InterlinearVerse) -> String {
        if let Some(f) = &self.translation {
            let text = f(&verse.verse_ref());
            if !text.trim().is_empty() {
                return text.trim().to_string();
            }
        }
        [&verse.free_translation, &verse.literal_translation]
            .into_iter()
            .map(|t| t.trim())
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| verse.joined(&self.config.word_gloss_data_key))
    }
}

fn passage_title(verses: &[InterlinearVerse]) -> String {
    match (verses.first(), verses.last()) {
        (Some(first), Some(last)) => range_title(
            &first.book,
            (first.chapter, first.verse),
            (last.chapter, last.verse),
        ),
        _ => String::new(),
    }
}

fn guid() -> String {
    Uuid::new_v4().to_string()
}

/// Indented XML text builder.
#[derive(Default)]
struct XmlOut {
    buf: String,
    depth: usize,
}

impl XmlOut {
    fn line(&mut self, s: &str) {
        for _ in 0..self.depth {
            self.buf.push_str("  ");
        }
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    fn raw(&mut self, s: &str) {
        self.line(s);
    }

    fn start_tag(name: &str, attrs: &[(&str, &str)]) -> String {
        let mut tag = format!("<{name}");
        for (key, value) in attrs {
            tag.push_str(&format!(" {key}=\"{}\"", escape_xml(value)));
        }
        tag
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) {
        let tag = Self::start_tag(name, attrs);
        self.line(&format!("{tag}>"));
        self.depth += 1;
    }

    fn close(&mut self, name: &str) {
        self.depth -= 1;
        self.line(&format!("</{name}>"));
    }

    fn empty(&mut self, name: &str) {
        self.line(&format!("<{name} />"));
    }

    fn item(&mut self, kind: &str, lang: &str, text: &str) {
        let tag = Self::start_tag("item", &[("type", kind), ("lang", lang)]);
        self.line(&format!("{tag}>{}</item>", escape_xml(text)));
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// Default file name for an export: `John 1:1-5` → `John_1-1-5.flextext`.
pub fn default_filename(reference: &str) -> String {
    format!(
        "{}.{FLEXTEXT_EXTENSION}",
        reference.trim().replace(' ', "_").replace(':', "-")
    )
}

/// Write an export to disk and return where it landed.
///
/// A directory target receives the default file name inside it; a missing
/// `.flextext` extension is appended; parent directories are created.
pub fn save_flextext(xml: &str, target: &Path, reference: &str) -> Result<PathBuf> {
    let mut path = if target.is_dir() {
        target.join(default_filename(reference))
    } else {
        target.to_path_buf()
    };

    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(FLEXTEXT_EXTENSION));
    if !has_extension {
        let mut name = path.into_os_string();
        name.push(".");
        name.push(FLEXTEXT_EXTENSION);
        path = PathBuf::from(name);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, xml)?;
    info!(path = %path.display(), bytes = xml.len(), "saved FlexText");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(greek: &str, gloss: &str, pos: &str) -> InterlinearWord {
        InterlinearWord {
            greek_word: greek.into(),
            en_gloss: gloss.into(),
            morphology: "N-NSM".into(),
            part_of_speech: pos.into(),
            ..Default::default()
        }
    }

    fn verse(chapter: u32, number: u32) -> InterlinearVerse {
        let mut v = InterlinearVerse::new("John", chapter, number);
        v.add_word(word("ὁ", "the", "article"));
        v.add_word(word("λόγος", "word", "noun"));
        v
    }

    #[test]
    fn test_single_verse_document() {
        let xml = FlexTextWriter::new(ExportConfig::default()).write_verse(&verse(1, 1));

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<document version=\"2\">\n"));
        assert!(xml.contains("    <item type=\"title\" lang=\"en\">John 1:1</item>\n"));
        assert!(xml.contains("<item type=\"title-abbreviation\" lang=\"en\">John1_1</item>"));
        assert!(xml.contains("<item type=\"txt\" lang=\"grc\">ὁ λόγος</item>"));
        assert!(xml.contains("<item type=\"segnum\" lang=\"en\">1</item>"));
        assert!(xml.contains("<item type=\"gls\" lang=\"en\">the word</item>"));
        assert_eq!(xml.matches("<word guid=").count(), 2);
        assert!(!xml.contains("type=\"pos\""));
        assert!(!xml.contains("<morphemes>"));
        assert!(xml.ends_with("</document>\n"));
    }

    #[test]
    fn test_passage_title_spans_first_to_last() {
        let verses = [verse(1, 51), verse(2, 1), verse(2, 2)];
        let xml = FlexTextWriter::new(ExportConfig::default()).write_passage(&verses);
        assert!(xml.contains(">John 1:51-2:2</item>"));
        assert!(xml.contains(">John1_51-2_2</item>"));
        assert_eq!(xml.matches("<phrase guid=").count(), 3);
    }

    #[test]
    fn test_guids_are_unique() {
        let xml = FlexTextWriter::new(ExportConfig::default()).write_passage(&[verse(1, 1), verse(1, 2)]);
        let guids: Vec<&str> = xml
            .split("guid=\"")
            .skip(1)
            .map(|s| &s[..36])
            .collect();
        // interlinear-text + 2 phrases + 4 words
        assert_eq!(guids.len(), 7);
        let unique: std::collections::HashSet<_> = guids.iter().collect();
        assert_eq!(unique.len(), 7);
        assert!(guids.iter().all(|g| Uuid::parse_str(g).is_ok()));
    }

    #[test]
    fn test_phrase_gloss_priority() {
        let mut v = verse(1, 1);
        v.literal_translation = "literal".into();

        let plain = FlexTextWriter::new(ExportConfig::default());
        assert_eq!(plain.phrase_gloss(&v), "literal");

        v.free_translation = " free ".into();
        assert_eq!(plain.phrase_gloss(&v), "free");

        let with_module = FlexTextWriter::new(ExportConfig::default())
            .with_translation(|r| format!("module {r}"));
        assert_eq!(with_module.phrase_gloss(&v), "module John 1:1");

        let empty_module = FlexTextWriter::new(ExportConfig::default()).with_translation(|_| String::new());
        assert_eq!(empty_module.phrase_gloss(&v), "free");
    }

    #[test]
    fn test_optional_layers() {
        let mut config = ExportConfig {
            include_literal: true,
            include_pos: true,
            ..Default::default()
        };
        config.analysis_map.insert("morphology".into(), "en-x-morph".into());
        config.analysis_map.insert("lemma".into(), "grc".into());

        let mut v = verse(1, 1);
        v.literal_translation = "the word".into();
        let xml = FlexTextWriter::new(config).write_verse(&v);

        assert!(xml.contains("<item type=\"pos\" lang=\"en\">noun</item>"));
        assert!(xml.contains("<item type=\"msa\" lang=\"en-x-morph\">N-NSM</item>"));
        // empty lemma produces no msa item
        assert!(!xml.contains("<item type=\"msa\" lang=\"grc\">"));
        assert!(xml.contains("<item type=\"lit\" lang=\"en\">the word</item>"));
        assert_eq!(xml.matches("<morphemes>").count(), 2);
    }

    #[test]
    fn test_configured_keys() {
        let config = ExportConfig {
            baseline_data_key: "tr_transliteration".into(),
            word_gloss_data_key: "part_of_speech".into(),
            ..Default::default()
        };
        let mut v = InterlinearVerse::new("John", 1, 1);
        v.add_word(InterlinearWord {
            tr_transliteration: "logos".into(),
            part_of_speech: "noun".into(),
            ..Default::default()
        });
        let xml = FlexTextWriter::new(config).write_verse(&v);
        assert!(xml.contains("<item type=\"txt\" lang=\"grc\">logos</item>"));
        assert!(xml.contains("<item type=\"gls\" lang=\"en\">noun</item>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut v = InterlinearVerse::new("John", 1, 1);
        v.add_word(word("<&>", "a \"b\"", ""));
        let xml = FlexTextWriter::new(ExportConfig::default()).write_verse(&v);
        assert!(xml.contains(">&lt;&amp;&gt;</item>"));
        assert!(xml.contains(">a &quot;b&quot;</item>"));
    }

    #[test]
    fn test_empty_passage() {
        let xml = FlexTextWriter::new(ExportConfig::default()).write_passage(&[]);
        assert!(xml.contains("<item type=\"title\" lang=\"en\"></item>"));
        assert!(xml.contains("<phrases />"));
        assert!(!xml.contains("<phrase "));
    }

    #[test]
    fn test_default_filename() {
        assert_eq!(default_filename("John 1:1-5:14"), "John_1-1-5-14.flextext");
        assert_eq!(default_filename(" 1 John 4:8 "), "1_John_4-8.flextext");
    }

    #[test]
    fn test_save_into_directory_and_extension() {
        let dir = tempfile::tempdir().unwrap();

        let path = save_flextext("<x/>", dir.path(), "John 1:1").unwrap();
        assert_eq!(path, dir.path().join("John_1-1.flextext"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<x/>");

        let path = save_flextext("<x/>", &dir.path().join("nested/deeper/out"), "John 1:1").unwrap();
        assert_eq!(path, dir.path().join("nested/deeper/out.flextext"));
        assert!(path.is_file());

        let path = save_flextext("<x/>", &dir.path().join("kept.FLEXTEXT"), "John 1:1").unwrap();
        assert_eq!(path, dir.path().join("kept.FLEXTEXT"));
    }
}
