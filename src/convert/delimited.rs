//! CSV/TSV Strong's datasets.
//!
//! Published lexicon tables are messy: preamble lines before the header,
//! separator rows, and in some STEPBible files column labels that do not
//! match the data beneath them. The gloss column is therefore chosen by
//! looking at the content, not only the header.

use std::sync::LazyLock;

use regex::Regex;

use super::{ConvertOptions, GlossMap, normalize_gloss, normalize_strongs};
use crate::error::{Error, Result};

/// Rows inspected when choosing the gloss column.
const SAMPLE_ROWS: usize = 100;

static ASCII_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]").expect("valid regex"));
static MORPH_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+[:\-]").expect("valid regex"));
static TRANSLIT_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ĀāĒēĪīŌōŪūḗḕḖȳȲ]").expect("valid regex"));

/// Split delimited text into rows, honouring double-quoted fields.
///
/// Quotes may wrap delimiters and line breaks; `""` inside quotes is a
/// literal quote. A blank line yields an empty row.
pub fn parse_rows(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                if field_started || !row.is_empty() {
                    row.push(std::mem::take(&mut field));
                }
                rows.push(std::mem::take(&mut row));
                field_started = false;
            }
            c if c == delimiter => {
                row.push(std::mem::take(&mut field));
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    if field_started || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

fn is_greek_text(s: &str) -> bool {
    s.chars()
        .any(|c| ('\u{0370}'..='\u{03FF}').contains(&c) || ('\u{1F00}'..='\u{1FFF}').contains(&c))
}

fn looks_like_gloss(s: &str) -> bool {
    if s.is_empty() || is_greek_text(s) || !ASCII_LETTER.is_match(s) {
        return false;
    }
    // Morphology tags such as "N-NSM" or "V:AAI" are not glosses.
    !(s.contains(':') && MORPH_LIKE.is_match(s))
}

fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str)
}

fn frac_has_greek(rows: &[Vec<String>], idx: usize) -> f64 {
    let cells: Vec<&str> = rows.iter().filter_map(|r| cell(r, idx)).collect();
    if cells.is_empty() {
        return 0.0;
    }
    let hits = cells.iter().filter(|c| is_greek_text(c)).count();
    hits as f64 / cells.len() as f64
}

fn score_column(rows: &[Vec<String>], idx: usize) -> i64 {
    let mut score = 0;
    for s in rows.iter().filter_map(|r| cell(r, idx)).map(str::trim) {
        if s.is_empty() {
            continue;
        }
        if looks_like_gloss(s) {
            score += 1;
        }
        if s.contains(' ') || s.contains('-') {
            score += 1;
        }
        if TRANSLIT_MARKS.is_match(s) {
            score -= 1;
        }
    }
    score
}

/// Index of the first candidate name present in the header.
fn index_of(header: &[String], names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        let name = name.to_lowercase();
        header.iter().position(|h| *h == name)
    })
}

/// Index of the header line, skipping any preamble.
fn find_header(lines: &[&str], delimiter: char, options: &ConvertOptions) -> Option<usize> {
    let nums = options.num_candidates();
    let glosses = options.gloss_candidates();
    lines.iter().position(|line| {
        let cols: Vec<String> = line
            .split(delimiter)
            .map(|c| c.trim().to_lowercase())
            .collect();
        cols.len() >= 2 && index_of(&cols, &nums).is_some() && index_of(&cols, &glosses).is_some()
    })
}

/// Load a CSV (`,`) or TSV (`\t`) dataset.
pub fn load_delimited(text: &str, delimiter: char, options: &ConvertOptions) -> Result<GlossMap> {
    let lines: Vec<&str> = text.lines().collect();

    let mut has_header = !options.no_header;
    let mut start = 0;
    if has_header {
        if let Some(idx) = find_header(&lines, delimiter, options) {
            start = idx;
        } else if let Some(idx) = lines
            .iter()
            .position(|l| l.starts_with('G') || l.starts_with('g'))
        {
            // No recognizable header: data rows start at the first G-number.
            start = idx;
            has_header = false;
        }
    }

    let body = lines[start.min(lines.len())..].join("\n");
    let mut rows = parse_rows(&body, delimiter).into_iter();
    let mut out = GlossMap::new();

    if !has_header {
        for row in rows {
            if row.len() < 2 {
                continue;
            }
            let num = normalize_strongs(&row[0]);
            if !num.is_empty() {
                out.insert(num, normalize_gloss(&row[1]));
            }
        }
        return Ok(out);
    }

    let header = rows.next().unwrap_or_default();
    let header_lower: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();

    let (Some(ni), Some(mut gi)) = (
        index_of(&header_lower, &options.num_candidates()),
        index_of(&header_lower, &options.gloss_candidates()),
    ) else {
        return Err(Error::Convert(format!(
            "Could not detect num/gloss columns. Header: {header:?}"
        )));
    };
    let greek_i = index_of(&header_lower, &["greek"]);
    let translit_i = index_of(&header_lower, &["transliteration", "translit"]);

    let rows: Vec<Vec<String>> = rows.collect();
    let sample = &rows[..rows.len().min(SAMPLE_ROWS)];

    // Some files are labelled "Greek, Transliteration, Gloss" while the data
    // is ordered "Gloss, Greek, Transliteration".
    if let Some(greek_i) = greek_i
        && frac_has_greek(sample, greek_i) < 0.3
        && frac_has_greek(sample, gi) < 0.1
    {
        gi = greek_i;
    }

    let mut candidates = vec![gi];
    candidates.extend(greek_i);
    candidates.extend(translit_i);
    let mut best = (gi, score_column(sample, gi));
    for &c in &candidates[1..] {
        let score = score_column(sample, c);
        if score > best.1 {
            best = (c, score);
        }
    }
    gi = best.0;

    for row in &rows {
        let Some(first) = row.first().map(|s| s.trim()) else {
            continue;
        };
        if first.is_empty() || first.starts_with('=') || first.starts_with('-') {
            continue;
        }
        if row.len() <= ni.max(gi) {
            continue;
        }
        let num = normalize_strongs(&row[ni]);
        if !num.is_empty() {
            out.insert(num, normalize_gloss(&row[gi]));
        }
    }

    Ok(out)
}
