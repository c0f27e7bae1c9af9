//! Export options and data-path settings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tracing::{info, warn};

use crate::error::Result;
use crate::interlinear::Interlinear;
use crate::lexicon::GlossLexicon;
use crate::source::{SourceChain, TextSource, open_source};
use crate::util::decode_text;

/// Environment variable naming the data directory.
pub const ENV_DATA_DIR: &str = "SWORD2FLEX_DATA";
/// Environment variable naming the Greek text source.
pub const ENV_SOURCE: &str = "SWORD2FLEX_SOURCE";
/// Environment variable naming the gloss JSON file.
pub const ENV_GLOSSES: &str = "SWORD2FLEX_GLOSSES";

/// Source names tried inside the data directory, most preferred first.
pub const SOURCE_CANDIDATES: [&str; 4] = [
    "MorphGNT.osis.xml",
    "SBLGNT.osis.xml",
    "gnt.osis.xml",
    "web",
];

/// Configuration for FlexText export.
///
/// Word fields are chosen by data key (see
/// [`InterlinearWord::field`](crate::model::InterlinearWord::field)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Word field for the baseline (`txt`) line.
    pub baseline_data_key: String,
    /// Word field for the word gloss (`gls`) line.
    pub word_gloss_data_key: String,
    /// Emit the verse's literal translation as a phrase `lit` item.
    pub include_literal: bool,
    /// Emit a word-level `pos` item from the morphology code.
    pub include_pos: bool,
    /// Word field → writing system, one `msa` item per entry.
    pub analysis_map: BTreeMap<String, String>,
    /// Writing system of the baseline text.
    pub baseline_lang: String,
    /// Writing system of glosses and translations.
    pub gloss_lang: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            baseline_data_key: "greek_word".to_string(),
            word_gloss_data_key: "en_gloss".to_string(),
            include_literal: false,
            include_pos: false,
            analysis_map: BTreeMap::new(),
            baseline_lang: "grc".to_string(),
            gloss_lang: "en".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&decode_text(&bytes, None))
    }
}

/// Where input data lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// Explicit Greek text source; otherwise searched for in `data_dir`.
    pub source: Option<PathBuf>,
    /// Explicit gloss file; otherwise discovered in `data_dir`.
    pub glosses: Option<PathBuf>,
    /// Translation modules as (id, path).
    pub translations: Vec<(String, PathBuf)>,
}

impl Settings {
    /// Resolve settings from explicit values, then the environment, then
    /// defaults.
    ///
    /// The default data directory is `data/` next to the executable if that
    /// exists, else `./data`.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        source: Option<PathBuf>,
        glosses: Option<PathBuf>,
    ) -> Self {
        Self::resolve_with(data_dir, source, glosses, |key| std::env::var_os(key))
    }

    fn resolve_with(
        data_dir: Option<PathBuf>,
        source: Option<PathBuf>,
        glosses: Option<PathBuf>,
        env: impl Fn(&str) -> Option<std::ffi::OsString>,
    ) -> Self {
        let data_dir = data_dir
            .or_else(|| env(ENV_DATA_DIR).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);
        Self {
            data_dir,
            source: source.or_else(|| env(ENV_SOURCE).map(PathBuf::from)),
            glosses: glosses.or_else(|| env(ENV_GLOSSES).map(PathBuf::from)),
            translations: Vec::new(),
        }
    }

    /// Text source locations to try, in order.
    pub fn source_candidates(&self) -> Vec<PathBuf> {
        match &self.source {
            Some(path) => vec![path.clone()],
            None => SOURCE_CANDIDATES
                .iter()
                .map(|name| self.data_dir.join(name))
                .collect(),
        }
    }

    /// Load the gloss lexicon.
    ///
    /// An explicit file must load; otherwise the data directory is searched
    /// and an empty lexicon is acceptable.
    pub fn load_lexicon(&self) -> Result<GlossLexicon> {
        match &self.glosses {
            Some(path) => GlossLexicon::load(path),
            None => Ok(GlossLexicon::discover(&self.data_dir)),
        }
    }

    /// Open the text source, lexicon, and translation modules.
    pub fn open(&self) -> Result<Interlinear> {
        let chain = self
            .source_candidates()
            .into_iter()
            .fold(SourceChain::new(), |chain, path| chain.with(path));
        let mut interlinear = Interlinear::new(chain.open()?, self.load_lexicon()?);

        for (id, source) in self.open_translations() {
            interlinear.add_translation(id, source);
        }
        Ok(interlinear)
    }

    /// Open the translation modules alone, in configured order.
    ///
    /// A module that fails to open is logged and left out. No Greek text
    /// source is needed.
    pub fn open_translations(&self) -> Vec<(String, Box<dyn TextSource>)> {
        self.translations
            .iter()
            .filter_map(|(id, path)| match open_source(path) {
                Ok(source) => {
                    info!(translation = %id, "detected translation module");
                    Some((id.clone(), source))
                }
                Err(e) => {
                    warn!(translation = %id, error = %e, "translation module unavailable");
                    None
                }
            })
            .collect()
    }
}

fn default_data_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("data")))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("data"))
}
