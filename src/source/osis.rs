//! OSIS XML text source.
//!
//! The whole document is kept in memory and indexed once: each verse maps to
//! the byte span of its content. Both verse encodings OSIS allows are
//! handled:
//!
//! ```text
//! <verse osisID="John.1.1">...</verse>
//! <verse sID="John.1.1" osisID="John.1.1"/>...<verse eID="John.1.1"/>
//! ```

use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info};

use super::TextSource;
use crate::books::book_key;
use crate::error::{Error, Result};
use crate::markup::{self, TaggedWord};
use crate::reference::VerseRef;
use crate::util::{decode_text, xml_encoding};

type VerseKey = (String, u32, u32);

pub struct OsisSource {
    id: String,
    content: String,
    verses: HashMap<VerseKey, Range<usize>>,
}

impl OsisSource {
    /// Load and index an OSIS file.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let content = decode_text(&bytes, xml_encoding(&bytes)).into_owned();
        let id = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.split('.').next().unwrap_or(n).to_string())
            .unwrap_or_else(|| "osis".to_string());
        Self::from_string(id, content)
    }

    /// Index an OSIS document already in memory.
    pub fn from_string(id: impl Into<String>, content: String) -> Result<Self> {
        let id = id.into();
        let verses = index_verses(&content)?;
        if verses.is_empty() {
            return Err(Error::lookup(&id, "OSIS document contains no verses"));
        }
        info!(source = %id, verses = verses.len(), "indexed OSIS document");
        Ok(Self {
            id,
            content,
            verses,
        })
    }

    /// Number of indexed verses.
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Raw markup between a verse's start and end.
    pub fn raw_verse(&self, verse: &VerseRef) -> Option<&str> {
        let key = (book_key(&verse.book), verse.chapter, verse.verse);
        let span = self.verses.get(&key)?;
        self.content.get(span.clone())
    }
}

impl TextSource for OsisSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn words(&self, verse: &VerseRef) -> Result<Option<Vec<TaggedWord>>> {
        let raw = self.raw_verse(verse);
        debug!(source = %self.id, %verse, found = raw.is_some(), "osis lookup");
        Ok(raw.map(markup::extract_words))
    }

    fn plain_text(&self, verse: &VerseRef) -> Result<Option<String>> {
        Ok(self.raw_verse(verse).map(markup::strip_tags))
    }
}

fn index_verses(content: &str) -> Result<HashMap<VerseKey, Range<usize>>> {
    let mut reader = Reader::from_str(content);

    let mut verses = HashMap::new();
    // Container verses currently open, innermost last.
    let mut open_containers: Vec<(Vec<VerseKey>, usize)> = Vec::new();
    // Milestone verses keyed by sID, waiting for their eID.
    let mut open_milestones: HashMap<String, (Vec<VerseKey>, usize)> = HashMap::new();

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"verse" => {
                let keys = osis_keys(&e)?;
                open_containers.push((keys, reader.buffer_position() as usize));
            }
            Event::End(e) if e.local_name().as_ref() == b"verse" => {
                if let Some((keys, start)) = open_containers.pop() {
                    for key in keys {
                        verses.insert(key, start..before);
                    }
                }
            }
            Event::Empty(e) if e.local_name().as_ref() == b"verse" => {
                let after = reader.buffer_position() as usize;
                if let Some(sid) = attribute(&e, b"sID")? {
                    let mut keys = osis_keys(&e)?;
                    if keys.is_empty() {
                        keys = parse_osis_ids(&sid);
                    }
                    open_milestones.insert(sid, (keys, after));
                } else if let Some(eid) = attribute(&e, b"eID")?
                    && let Some((keys, start)) = open_milestones.remove(&eid)
                {
                    for key in keys {
                        verses.insert(key, start..before);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(verses)
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name {
            return Ok(Some(String::from_utf8(attr.value.to_vec())?));
        }
    }
    Ok(None)
}

fn osis_keys(e: &BytesStart<'_>) -> Result<Vec<VerseKey>> {
    Ok(attribute(e, b"osisID")?
        .map(|ids| parse_osis_ids(&ids))
        .unwrap_or_default())
}

/// Parse a space-separated `osisID` list such as `"Bible:John.1.1 John.1.2!a"`.
fn parse_osis_ids(ids: &str) -> Vec<VerseKey> {
    ids.split_whitespace()
        .filter_map(|id| {
            let id = id.rsplit_once(':').map(|(_, r)| r).unwrap_or(id);
            let id = id.split('!').next().unwrap_or(id);
            let mut parts = id.rsplitn(3, '.');
            let verse = parts.next()?.parse().ok()?;
            let chapter = parts.next()?.parse().ok()?;
            let book = parts.next()?;
            Some((book_key(book), chapter, verse))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osis><osisText osisIDWork="Test"><div type="book" osisID="John">
<chapter osisID="John.1">
<verse osisID="John.1.1"><w lemma="strong:G1722 lemma.Strong:ἐν" morph="robinson:PREP">Ἐν</w> <w lemma="strong:G0746 lemma.Strong:ἀρχή" morph="robinson:N-DSF">ἀρχῇ</w></verse>
<verse osisID="John.1.2 John.1.3">joined &amp; merged</verse>
</chapter></div></osisText></osis>"#;

    const MILESTONE: &str = r#"<osis><osisText>
<chapter sID="Matt.1"/>
<verse sID="Matt.1.1" osisID="Matt.1.1"/>In the beginning<verse eID="Matt.1.1"/>
<verse sID="Matt.1.2"/>second <hi>verse</hi><verse eID="Matt.1.2"/>
<chapter eID="Matt.1"/>
</osisText></osis>"#;

    #[test]
    fn test_container_verses() {
        let source = OsisSource::from_string("test", CONTAINER.to_string()).unwrap();
        assert_eq!(source.len(), 3);

        let words = source
            .words(&VerseRef::new("John", 1, 1))
            .unwrap()
            .unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].strongs, "G746");

        assert_eq!(
            source.plain_text(&VerseRef::new("John", 1, 3)).unwrap(),
            Some("joined & merged".to_string())
        );
        assert_eq!(source.words(&VerseRef::new("John", 1, 4)).unwrap(), None);
    }

    #[test]
    fn test_milestone_verses() {
        let source = OsisSource::from_string("test", MILESTONE.to_string()).unwrap();
        assert_eq!(
            source.plain_text(&VerseRef::new("Matthew", 1, 1)).unwrap(),
            Some("In the beginning".to_string())
        );
        assert_eq!(
            source.plain_text(&VerseRef::new("Mt", 1, 2)).unwrap(),
            Some("second verse".to_string())
        );
    }

    #[test]
    fn test_open_uses_declared_encoding() {
        let doc = r#"<?xml version="1.0" encoding="ISO-8859-7"?>
<osis><verse osisID="John.1.1"><w lemma="strong:G3056" morph="robinson:N-NSM">λόγος</w></verse></osis>"#;
        let (bytes, _, unmappable) = encoding_rs::ISO_8859_7.encode(doc);
        assert!(!unmappable);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Greek.osis.xml");
        std::fs::write(&path, &bytes).unwrap();

        let source = OsisSource::open(&path).unwrap();
        assert_eq!(source.id(), "Greek");
        let words = source.words(&VerseRef::new("John", 1, 1)).unwrap().unwrap();
        assert_eq!(words[0].form, "λόγος");
    }

    #[test]
    fn test_empty_document_is_an_error() {
        assert!(OsisSource::from_string("empty", "<osis/>".to_string()).is_err());
    }

    #[test]
    fn test_attribute_must_be_utf8() {
        let start = BytesStart::new("verse")
            .with_attributes([(b"sID".as_slice(), b"John.1.\xFF".as_slice())]);
        assert!(matches!(attribute(&start, b"sID"), Err(Error::Utf8(_))));
        assert_eq!(attribute(&start, b"eID").unwrap(), None);
    }

    #[test]
    fn test_parse_osis_ids() {
        assert_eq!(
            parse_osis_ids("Bible:1John.4.8 1John.4.9!a"),
            vec![("1John".to_string(), 4, 8), ("1John".to_string(), 4, 9)]
        );
        assert!(parse_osis_ids("John.1").is_empty());
    }
}
