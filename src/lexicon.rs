//! Strong's-number gloss lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::util::decode_text;

/// File names tried by [`GlossLexicon::discover`], most preferred first.
pub const GLOSS_FILES: [&str; 2] = ["strongs_greek.json", "strongs_greek.sample.json"];

/// English glosses keyed by digits-only Strong's number (`"3056"`).
#[derive(Debug, Clone, Default)]
pub struct GlossLexicon {
    entries: HashMap<String, String>,
    origin: Option<PathBuf>,
}

impl GlossLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping Strong's numbers to glosses.
    ///
    /// Keys may carry a `G`/`g` prefix; it is stripped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .filter_map(|(k, v)| {
                let gloss = match v {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => return None,
                    other => other.to_string(),
                };
                Some((strip_prefix(&k).to_string(), gloss))
            })
            .collect();
        Ok(Self {
            entries,
            origin: None,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mut lexicon = Self::from_json(&decode_text(&bytes, None)).map_err(|e| match e {
            Error::Json(e) => Error::Convert(format!("{}: {e}", path.display())),
            other => other,
        })?;
        lexicon.origin = Some(path.to_path_buf());
        info!(path = %path.display(), entries = lexicon.len(), "loaded Strong's lexicon");
        Ok(lexicon)
    }

    /// Load the first gloss file found in `data_dir`.
    ///
    /// A file that fails to parse is skipped with a warning. Finding nothing
    /// is not an error: the lexicon is empty and glosses fall back to the
    /// Strong's number.
    pub fn discover(data_dir: &Path) -> Self {
        for name in GLOSS_FILES {
            let path = data_dir.join(name);
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(lexicon) => return lexicon,
                Err(e) => warn!(path = %path.display(), error = %e, "failed to load Strong's JSON"),
            }
        }
        info!(dir = %data_dir.display(), "no local Strong's JSON found; glosses will show Strong's numbers");
        Self::new()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Where the entries came from, if loaded from disk.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// The local entry for a Strong's number, if any.
    pub fn entry(&self, strongs: &str) -> Option<&str> {
        self.entries
            .get(strip_prefix(strongs.trim()))
            .map(String::as_str)
    }

    /// Gloss for a Strong's number.
    ///
    /// Falls back to the number itself so the export always shows something.
    /// Empty input gives an empty gloss.
    pub fn gloss(&self, strongs: &str) -> String {
        let num = strongs.trim();
        if num.is_empty() {
            return String::new();
        }
        self.entry(num).unwrap_or(num).to_string()
    }
}

/// `G0746` → `746`.
fn strip_prefix(s: &str) -> &str {
    let digits = s.trim_start_matches(['G', 'g']);
    match digits.trim_start_matches('0') {
        "" => digits,
        trimmed => trimmed,
    }
}
