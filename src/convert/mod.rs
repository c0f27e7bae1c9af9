//! Conversion of open Strong's datasets into the gloss JSON format.
//!
//! Input formats:
//! - CSV/TSV with a number column and a gloss column (header row optional)
//! - JSON object mapping number → gloss
//! - JSON array of objects (keys given explicitly or detected)
//!
//! Output is a JSON object mapping digits-only Strong's numbers (`"3056"`)
//! to a short English gloss.

mod delimited;

pub use delimited::{load_delimited, parse_rows};

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::util::decode_text;

/// Digits-only Strong's number → gloss, sorted for stable output.
pub type GlossMap = BTreeMap<String, String>;

pub(crate) const NUM_FIELDS: [&str; 6] = ["estrong#", "strong", "strongs", "id", "num", "key"];
pub(crate) const GLOSS_FIELDS: [&str; 5] = ["gloss", "definition", "def", "short", "english"];

static STRONGS_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[Gg]?\s*").expect("valid regex"));
static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").expect("valid regex"));
static GLOSS_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[;\n\r]+").expect("valid regex"));
static LOOKS_LIKE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[Gg]?\d+$").expect("valid regex"));

/// Options for dataset conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// The CSV/TSV input has no header row.
    pub no_header: bool,
    /// Treat the input as tab-separated regardless of extension.
    pub tsv: bool,
    /// Name of the Strong's number column or key.
    pub num_field: Option<String>,
    /// Name of the gloss column or key.
    pub gloss_field: Option<String>,
}

impl ConvertOptions {
    pub(crate) fn num_candidates(&self) -> Vec<&str> {
        self.num_field
            .as_deref()
            .into_iter()
            .chain(NUM_FIELDS)
            .collect()
    }

    pub(crate) fn gloss_candidates(&self) -> Vec<&str> {
        self.gloss_field
            .as_deref()
            .into_iter()
            .chain(GLOSS_FIELDS)
            .collect()
    }
}

/// `"G0746"`, `"g 746"`, `"0746"` → `"746"`. An all-zero number stays `"0"`.
pub fn normalize_strongs(num: &str) -> String {
    let s = STRONGS_PREFIX.replace(num.trim(), "");
    let digits = NON_DIGIT.replace_all(&s, "");
    match digits.trim_start_matches('0') {
        "" if !digits.is_empty() => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Trim and keep only the first segment before `;` or a line break.
pub fn normalize_gloss(text: &str) -> String {
    GLOSS_BREAK
        .split(text.trim())
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Load a JSON dataset: a number → gloss object or an array of records.
pub fn load_json(text: &str, options: &ConvertOptions) -> Result<GlossMap> {
    let data: Value = serde_json::from_str(text)?;
    let mut out = GlossMap::new();

    match data {
        Value::Object(map) => {
            for (k, v) in map {
                let num = normalize_strongs(&k);
                let gloss = value_text(&v).map(|g| normalize_gloss(&g)).unwrap_or_default();
                if !num.is_empty() {
                    out.insert(num, gloss);
                }
            }
        }
        Value::Array(items) => {
            let num_keys = options.num_candidates();
            let gloss_keys = options.gloss_candidates();
            // "estrong#" is a column heading, not a record key.
            let num_keys: Vec<&str> = num_keys.into_iter().filter(|k| *k != "estrong#").collect();

            for item in items {
                let Value::Object(obj) = item else {
                    continue;
                };
                let mut num_val = num_keys.iter().find_map(|k| obj.get(*k)).and_then(value_text);
                let mut gloss_val = gloss_keys.iter().find_map(|k| obj.get(*k)).and_then(value_text);

                if num_val.is_none() || gloss_val.is_none() {
                    for v in obj.values() {
                        if num_val.is_none()
                            && matches!(v, Value::String(_) | Value::Number(_))
                            && let Some(text) = value_text(v)
                            && LOOKS_LIKE_NUMBER.is_match(&text)
                        {
                            num_val = Some(text);
                            continue;
                        }
                        if gloss_val.is_none()
                            && let Value::String(s) = v
                            && !s.is_empty()
                        {
                            gloss_val = Some(s.clone());
                        }
                    }
                }

                let num = normalize_strongs(num_val.as_deref().unwrap_or(""));
                let gloss = normalize_gloss(gloss_val.as_deref().unwrap_or(""));
                if !num.is_empty() {
                    out.insert(num, gloss);
                }
            }
        }
        _ => return Err(Error::Convert("Unsupported JSON structure".to_string())),
    }

    Ok(out)
}

/// Convert `input` to gloss JSON at `output`. Returns the entry count.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<usize> {
    if !input.exists() {
        return Err(Error::Convert(format!(
            "Input file not found: {}",
            input.display()
        )));
    }

    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let bytes = std::fs::read(input)?;
    let text = decode_text(&bytes, None);

    let data = if ext == "csv" || ext == "tsv" || options.tsv {
        let delimiter = if ext == "tsv" || options.tsv { '\t' } else { ',' };
        load_delimited(&text, delimiter, options)?
    } else if ext == "json" {
        load_json(&text, options)?
    } else {
        return Err(Error::Convert(
            "Unsupported input extension. Use .csv, .tsv, or .json".to_string(),
        ));
    };

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, serde_json::to_string_pretty(&data)?)?;
    info!(entries = data.len(), path = %output.display(), "wrote gloss JSON");
    Ok(data.len())
}
