//! Bible reference parsing.
//!
//! Three grammars are accepted, tried from most to least specific:
//!
//! - cross-chapter range: `John 1:1-5:14`
//! - intra-chapter range: `John 1:1-18`
//! - single verse: `John 1:1`
//!
//! The book token is an optional numeric prefix (`1`-`3`) followed by ASCII
//! letters, e.g. `1John` or `1 John`. It is kept as typed; mapping to a
//! source's own book ids happens in [`crate::books`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

const BOOK: &str = r"(?P<book>[1-3]? ?[A-Za-z]+)";

static CROSS_CHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^{BOOK} (?P<sc>\d+):(?P<sv>\d+)\s*-\s*(?P<ec>\d+):(?P<ev>\d+)$"
    ))
    .expect("valid regex")
});

static SAME_CHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{BOOK} (?P<sc>\d+):(?P<sv>\d+)\s*-\s*(?P<ev>\d+)$"))
        .expect("valid regex")
});

static SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{BOOK} (?P<sc>\d+):(?P<sv>\d+)$")).expect("valid regex")
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// A single verse location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerseRef {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseRef {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }

    /// Parse the `"Book C:V"` form produced by [`VerseRef`]'s `Display`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidReference(s.to_string());

        let (book, loc) = s.rsplit_once(' ').ok_or_else(invalid)?;
        let (chapter, verse) = loc.split_once(':').ok_or_else(invalid)?;
        let chapter = chapter.parse().map_err(|_| invalid())?;
        let verse = verse.parse().map_err(|_| invalid())?;

        let book = book.trim();
        if book.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(book, chapter, verse))
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// An inclusive range of verses within one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageRange {
    pub book: String,
    /// (chapter, verse) of the first verse.
    pub start: (u32, u32),
    /// (chapter, verse) of the last verse.
    pub end: (u32, u32),
}

impl PassageRange {
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, chapter: u32, verse: u32) -> bool {
        (chapter, verse) >= self.start && (chapter, verse) <= self.end
    }

    pub fn first(&self) -> VerseRef {
        VerseRef::new(self.book.clone(), self.start.0, self.start.1)
    }

    /// `"Book C:V"` for a single verse, `"Book C:V-C:V"` otherwise.
    pub fn title(&self) -> String {
        range_title(&self.book, self.start, self.end)
    }
}

impl fmt::Display for PassageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title())
    }
}

pub(crate) fn range_title(book: &str, start: (u32, u32), end: (u32, u32)) -> String {
    if start == end {
        format!("{} {}:{}", book, start.0, start.1)
    } else {
        format!("{} {}:{}-{}:{}", book, start.0, start.1, end.0, end.1)
    }
}

/// Parse a human-entered reference into a [`PassageRange`].
///
/// # Examples
///
/// ```
/// use sword2flex::parse_reference_range;
///
/// let range = parse_reference_range("John 1:1-18").unwrap();
/// assert_eq!(range.book, "John");
/// assert_eq!(range.start, (1, 1));
/// assert_eq!(range.end, (1, 18));
/// ```
pub fn parse_reference_range(input: &str) -> Result<PassageRange> {
    let normalized = WHITESPACE.replace_all(input.trim(), " ");
    let s = normalized.as_ref();
    let invalid = || Error::InvalidReference(input.trim().to_string());

    let num = |caps: &regex::Captures<'_>, name: &str| -> Result<u32> {
        caps[name].parse::<u32>().map_err(|_| invalid())
    };

    let range = if let Some(caps) = CROSS_CHAPTER.captures(s) {
        PassageRange {
            book: caps["book"].to_string(),
            start: (num(&caps, "sc")?, num(&caps, "sv")?),
            end: (num(&caps, "ec")?, num(&caps, "ev")?),
        }
    } else if let Some(caps) = SAME_CHAPTER.captures(s) {
        let chapter = num(&caps, "sc")?;
        PassageRange {
            book: caps["book"].to_string(),
            start: (chapter, num(&caps, "sv")?),
            end: (chapter, num(&caps, "ev")?),
        }
    } else if let Some(caps) = SINGLE.captures(s) {
        let start = (num(&caps, "sc")?, num(&caps, "sv")?);
        PassageRange {
            book: caps["book"].to_string(),
            start,
            end: start,
        }
    } else {
        return Err(invalid());
    };

    let (sc, sv) = range.start;
    let (ec, ev) = range.end;
    if sc == 0 || sv == 0 || ec == 0 || ev == 0 || range.end < range.start {
        return Err(invalid());
    }

    Ok(range)
}
