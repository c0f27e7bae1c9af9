//! Text sources for verse data.
//!
//! A [`TextSource`] answers two questions about a verse: which tagged words
//! it contains, and what its plain text reads. Greek texts are mostly asked
//! the first; translation modules the second.
//!
//! Two backends exist:
//! - [`OsisSource`]: an OSIS XML file, the format SWORD modules are built from
//! - [`JsonBookSource`]: a directory of per-book JSON files as written by
//!   [`crate::export::export_book`]
//!
//! [`SourceChain`] picks the first backend that opens.

mod json;
mod osis;

pub use json::{JsonBookSource, WebBook, WebVerse, WebWord};
pub use osis::OsisSource;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::markup::TaggedWord;
use crate::reference::VerseRef;

/// Polymorphic interface over verse-text backends.
pub trait TextSource: Send + Sync {
    /// Short identifier (module or file name).
    fn id(&self) -> &str;

    /// Tagged words of a verse. `Ok(None)` if the source has no such verse.
    fn words(&self, verse: &VerseRef) -> Result<Option<Vec<TaggedWord>>>;

    /// Readable text of a verse. `Ok(None)` if the source has no such verse.
    fn plain_text(&self, verse: &VerseRef) -> Result<Option<String>>;
}

/// Open a source, choosing the backend from what `path` is.
///
/// Directories are read as per-book JSON, files as OSIS XML.
pub fn open_source(path: &Path) -> Result<Box<dyn TextSource>> {
    let source: Box<dyn TextSource> = if path.is_dir() {
        Box::new(JsonBookSource::open(path)?)
    } else {
        Box::new(OsisSource::open(path)?)
    };
    info!(source = source.id(), path = %path.display(), "opened text source");
    Ok(source)
}

/// Candidate source locations in order of preference.
#[derive(Debug, Clone, Default)]
pub struct SourceChain {
    candidates: Vec<PathBuf>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<PathBuf>) -> Self {
        self.candidates.push(path.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Open the first candidate that loads; later ones are fallbacks.
    pub fn open(&self) -> Result<Box<dyn TextSource>> {
        let mut failures = Vec::new();
        for path in &self.candidates {
            match open_source(path) {
                Ok(source) => return Ok(source),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "text source unavailable, trying next");
                    failures.push(format!("{}: {e}", path.display()));
                }
            }
        }
        if failures.is_empty() {
            failures.push("no candidates configured".to_string());
        }
        Err(Error::NoBackend(failures.join("; ")))
    }
}
