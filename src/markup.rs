//! OSIS-style verse markup.
//!
//! Tagged Greek texts (MorphGNT, SBLGNT) wrap every word in a `<w>` element:
//!
//! ```text
//! <w lemma="strong:G0746 lemma.Strong:ἀρχή" morph="robinson:N-DSF">ἀρχῇ</w>
//! ```
//!
//! This module pulls the word-level data out of that markup and derives the
//! per-word extras the export needs (transliteration, part of speech).

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static WORD_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w\b([^>]*)>([^<]+)</w>").expect("valid regex"));

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z_][\w.:-]*)\s*=\s*"([^"]*)""#).expect("valid regex"));

static LEMMA_STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"lemma\.Strong:(\S+)").expect("valid regex"));

static STRONG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)strong: *G0*(\d+)").expect("valid regex"));

static BARE_STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)G?0*(\d+)$").expect("valid regex"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One `<w>` element as found in a source text, before glossing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedWord {
    /// Surface form as printed in the text.
    pub form: String,
    /// Dictionary form, from `lemma.Strong:` in the lemma attribute.
    pub lemma: String,
    /// Morphology code, verbatim.
    pub morph: String,
    /// Strong's number as `G<digits>`, without leading zeros.
    pub strongs: String,
    /// Gloss carried by the source itself, if any. Markup never has one.
    pub gloss: String,
}

/// Extract every `<w>` element from a verse's raw markup, in order.
pub fn extract_words(raw: &str) -> Vec<TaggedWord> {
    WORD_TAG
        .captures_iter(raw)
        .map(|caps| {
            let attrs: HashMap<&str, &str> = ATTRIBUTE
                .captures_iter(&caps[1])
                .filter_map(|a| Some((a.get(1)?.as_str(), a.get(2)?.as_str())))
                .collect();

            let lemma_attr = attrs.get("lemma").map(|s| s.trim()).unwrap_or("");

            let lemma = LEMMA_STRONG
                .captures(lemma_attr)
                .map(|c| unescape(&c[1]).into_owned())
                .unwrap_or_default();

            let strongs = STRONG_NUMBER
                .captures(lemma_attr)
                .map(|c| format!("G{}", &c[1]))
                .or_else(|| attrs.get("strong").and_then(|s| normalize_strongs(s)))
                .unwrap_or_default();

            TaggedWord {
                form: unescape(caps[2].trim()).into_owned(),
                lemma,
                morph: attrs
                    .get("morph")
                    .map(|s| unescape(s.trim()).into_owned())
                    .unwrap_or_default(),
                strongs,
                gloss: String::new(),
            }
        })
        .collect()
}

/// Normalize a bare Strong's number (`G0746`, `746`, `g746`) to `G746`.
fn normalize_strongs(s: &str) -> Option<String> {
    BARE_STRONG
        .captures(s.trim())
        .map(|c| format!("G{}", &c[1]))
}

/// Remove all tags and collapse whitespace, leaving readable verse text.
pub fn strip_tags(raw: &str) -> String {
    let text = TAG.replace_all(raw, " ");
    let text = unescape(&text);
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn unescape(s: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(s).unwrap_or(Cow::Borrowed(s))
}

/// Rough Latin transliteration of Greek text.
///
/// Accents and breathings are dropped; punctuation passes through unchanged.
pub fn transliterate(greek: &str) -> String {
    let mut out = String::with_capacity(greek.len());
    for c in greek.chars() {
        let base = base_letter(c);
        let lower = base.to_lowercase().next().unwrap_or(base);
        match translit_char(lower) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Strip diacritics from a precomposed Greek letter.
fn base_letter(c: char) -> char {
    match c {
        'ά' => 'α',
        'έ' => 'ε',
        'ή' => 'η',
        'ί' | 'ϊ' | 'ΐ' => 'ι',
        'ό' => 'ο',
        'ύ' | 'ϋ' | 'ΰ' => 'υ',
        'ώ' => 'ω',
        'Ά' => 'Α',
        'Έ' => 'Ε',
        'Ή' => 'Η',
        'Ί' => 'Ι',
        'Ό' => 'Ο',
        'Ύ' => 'Υ',
        'Ώ' => 'Ω',
        '\u{1F00}'..='\u{1FFF}' => polytonic_base(c as u32 - 0x1F00).unwrap_or(c),
        _ => c,
    }
}

/// Base letter for an offset into the Greek Extended block.
fn polytonic_base(offset: u32) -> Option<char> {
    Some(match offset {
        0x00..=0x07 | 0x70..=0x71 | 0x80..=0x87 | 0xB0..=0xB7 => 'α',
        0x08..=0x0F | 0x88..=0x8F | 0xB8..=0xBC => 'Α',
        0x10..=0x15 | 0x72..=0x73 => 'ε',
        0x18..=0x1D | 0xC8..=0xC9 => 'Ε',
        0x20..=0x27 | 0x74..=0x75 | 0x90..=0x97 | 0xC2..=0xC7 => 'η',
        0x28..=0x2F | 0x98..=0x9F | 0xCA..=0xCC => 'Η',
        0x30..=0x37 | 0x76..=0x77 | 0xD0..=0xD7 => 'ι',
        0x38..=0x3F | 0xD8..=0xDB => 'Ι',
        0x40..=0x45 | 0x78..=0x79 => 'ο',
        0x48..=0x4D | 0xF8..=0xF9 => 'Ο',
        0x50..=0x57 | 0x7A..=0x7B | 0xE0..=0xE3 | 0xE6..=0xE7 => 'υ',
        0x59..=0x5F | 0xE8..=0xEB => 'Υ',
        0xE4..=0xE5 => 'ρ',
        0xEC => 'Ρ',
        0x60..=0x67 | 0x7C..=0x7D | 0xA0..=0xA7 | 0xF2..=0xF7 => 'ω',
        0x68..=0x6F | 0xA8..=0xAF | 0xFA..=0xFC => 'Ω',
        _ => return None,
    })
}

fn translit_char(c: char) -> Option<&'static str> {
    Some(match c {
        'α' => "a",
        'β' => "b",
        'γ' => "g",
        'δ' => "d",
        'ε' => "e",
        'ζ' => "z",
        'η' => "ē",
        'θ' => "th",
        'ι' => "i",
        'κ' => "k",
        'λ' => "l",
        'μ' => "m",
        'ν' => "n",
        'ξ' => "x",
        'ο' => "o",
        'π' => "p",
        'ρ' => "r",
        'σ' | 'ς' => "s",
        'τ' => "t",
        'υ' => "u",
        'φ' => "ph",
        'χ' => "ch",
        'ψ' => "ps",
        'ω' => "ō",
        _ => return None,
    })
}

/// English part-of-speech label for a Robinson morphology code.
///
/// Accepts an optional scheme prefix (`robinson:N-NSM`). Returns an empty
/// string for codes it does not recognize.
pub fn part_of_speech(morph: &str) -> &'static str {
    let code = morph.trim();
    let code = code.rsplit_once(':').map(|(_, c)| c).unwrap_or(code);
    let (head, declined) = match code.split_once('-') {
        Some((head, _)) => (head, true),
        None => (code, false),
    };
    let head = head.to_ascii_uppercase();

    match head.as_str() {
        "PREP" => "preposition",
        "CONJ" => "conjunction",
        "ADV" => "adverb",
        "PRT" => "particle",
        "INJ" => "interjection",
        "COND" => "conditional",
        "HEB" => "Hebrew word",
        "ARAM" => "Aramaic word",
        // Short tags used by some simplified texts.
        "P" if !declined => "preposition",
        "C" if !declined => "conjunction",
        _ if !declined => "",
        "N" => "noun",
        "V" => "verb",
        "A" => "adjective",
        "T" => "article",
        "P" => "personal pronoun",
        "R" => "relative pronoun",
        "C" => "reciprocal pronoun",
        "D" => "demonstrative pronoun",
        "K" => "correlative pronoun",
        "I" => "interrogative pronoun",
        "X" => "indefinite pronoun",
        "Q" => "correlative or interrogative pronoun",
        "F" => "reflexive pronoun",
        "S" => "possessive pronoun",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MORPHGNT: &str = r#"<w lemma="strong:G1722 lemma.Strong:ἐν" morph="robinson:PREP">Ἐν</w> <w lemma="strong:G0746 lemma.Strong:ἀρχή" morph="robinson:N-DSF">ἀρχῇ</w>"#;

    const SBLGNT: &str = r#"<w lemma="G3588" morph="T-NSM" strong="G3588">ὁ</w> <w lemma="G3056" morph="N-NSM" strong="G3056">λόγος</w>."#;

    #[test]
    fn test_extract_morphgnt_words() {
        let words = extract_words(MORPHGNT);
        assert_eq!(words.len(), 2);
        assert_eq!(
            words[1],
            TaggedWord {
                form: "ἀρχῇ".into(),
                lemma: "ἀρχή".into(),
                morph: "robinson:N-DSF".into(),
                strongs: "G746".into(),
                gloss: String::new(),
            }
        );
        assert_eq!(words[0].strongs, "G1722");
    }

    #[test]
    fn test_extract_strong_attribute() {
        let words = extract_words(SBLGNT);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].form, "ὁ");
        assert_eq!(words[0].strongs, "G3588");
        assert_eq!(words[0].lemma, "");
        assert_eq!(words[1].morph, "N-NSM");
    }

    #[test]
    fn test_attribute_order_is_free() {
        let words = extract_words(r#"<w morph="V-IAI-3S" lemma="strong:G2258">ἦν</w>"#);
        assert_eq!(words[0].morph, "V-IAI-3S");
        assert_eq!(words[0].strongs, "G2258");
    }

    #[test]
    fn test_word_without_attributes() {
        let words = extract_words("<w>καί</w>");
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].form, "καί");
        assert!(words[0].strongs.is_empty());
        assert!(words[0].morph.is_empty());
    }

    #[test]
    fn test_no_words() {
        assert!(extract_words("").is_empty());
        assert!(extract_words("<note>no words here</note>").is_empty());
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags(MORPHGNT), "Ἐν ἀρχῇ");
        assert_eq!(
            strip_tags("<p>In the <hi>beginning</hi>\n  was &amp; is</p>"),
            "In the beginning was & is"
        );
    }

    #[test]
    fn test_transliterate() {
        assert_eq!(transliterate("λογος"), "logos");
        assert_eq!(transliterate("Θεος"), "theos");
        assert_eq!(transliterate("ψυχη"), "psuchē");
        assert_eq!(transliterate("λόγος"), "logos");
        assert_eq!(transliterate("ἀρχῇ"), "archē");
        assert_eq!(transliterate("Ἰησοῦς"), "iēsous");
        assert_eq!(transliterate("δι’"), "di’");
    }

    #[test]
    fn test_part_of_speech() {
        assert_eq!(part_of_speech("robinson:N-DSF"), "noun");
        assert_eq!(part_of_speech("V-IXA-3S"), "verb");
        assert_eq!(part_of_speech("T-NSM"), "article");
        assert_eq!(part_of_speech("P-GSM"), "personal pronoun");
        assert_eq!(part_of_speech("robinson:PREP"), "preposition");
        assert_eq!(part_of_speech("CONJ"), "conjunction");
        assert_eq!(part_of_speech("P"), "preposition");
        assert_eq!(part_of_speech("C"), "conjunction");
        assert_eq!(part_of_speech("ADV-I"), "adverb");
        assert_eq!(part_of_speech(""), "");
        assert_eq!(part_of_speech("Z-XYZ"), "");
        assert_eq!(part_of_speech("N"), "");
    }
}
