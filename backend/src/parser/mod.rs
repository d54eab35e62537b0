//! Telemetry CSV tabulator.
//!
//! Splits raw delimited text into a header plus string rows. No numeric
//! interpretation happens here; see [`crate::analysis`] for that.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How fields are tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// RFC 4180: quoted fields may hold delimiters, newlines and `""`.
    #[default]
    Rfc4180,
    /// Plain split on newlines and delimiters. Quotes are kept literally.
    Naive,
}

impl FromStr for Quoting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rfc4180" | "quoted" => Ok(Quoting::Rfc4180),
            "naive" | "plain" => Ok(Quoting::Naive),
            other => Err(format!("unknown quoting mode '{}'", other)),
        }
    }
}

/// Tabulator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabulateOptions {
    pub delimiter: u8,
    pub quoting: Quoting,
}

impl Default for TabulateOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quoting: Quoting::Rfc4180,
        }
    }
}

/// One data row as read from the source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    /// 1-based line in the original text
    pub line: usize,
    pub fields: Vec<String>,
}

/// Header names plus data rows, all still strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    /// Column names from the first line, trimmed
    pub headers: Vec<String>,
    /// Data rows in source order
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// True when the input had no header line at all.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Tabulate with default options (comma, RFC 4180 quoting).
///
/// # Example
/// ```ignore
/// use mission_control::tabulate;
///
/// let table = tabulate("altitude,velocity\n100,50\n200,80");
/// assert_eq!(table.headers, vec!["altitude", "velocity"]);
/// assert_eq!(table.rows[1].fields, vec!["200", "80"]);
/// ```
pub fn tabulate(text: &str) -> RawTable {
    tabulate_with(text, &TabulateOptions::default())
}

/// Tabulate with explicit options.
///
/// The input is trimmed first; blank lines are skipped and the first
/// remaining line is the header. Never fails: empty input gives an empty
/// table, and an unreadable record becomes a row with no fields.
pub fn tabulate_with(text: &str, options: &TabulateOptions) -> RawTable {
    let text = strip_bom(text);
    let content = text.trim();
    if content.is_empty() {
        return RawTable::default();
    }

    // Lines dropped by the leading trim, so reported lines match the source
    let leading = &text[..text.len() - text.trim_start().len()];
    let line_offset = leading.matches('\n').count();

    let records = match options.quoting {
        Quoting::Naive => split_naive(content, options.delimiter as char),
        Quoting::Rfc4180 => split_quoted(content, options.delimiter),
    };

    let mut records = records
        .into_iter()
        .filter(|(_, fields)| !is_blank(fields))
        .map(|(line, fields)| RawRow { line: line + line_offset, fields });

    let headers = match records.next() {
        Some(header) => header.fields.iter().map(|h| h.trim().to_string()).collect(),
        None => return RawTable::default(),
    };

    RawTable {
        headers,
        rows: records.collect(),
    }
}

/// Drop a leading byte order mark, which `trim` leaves in place.
fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

fn is_blank(fields: &[String]) -> bool {
    fields.len() == 1 && fields[0].trim().is_empty()
}

fn split_naive(content: &str, delimiter: char) -> Vec<(usize, Vec<String>)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.split(delimiter).map(str::to_string).collect()))
        .collect()
}

fn split_quoted(content: &str, delimiter: u8) -> Vec<(usize, Vec<String>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    rdr.records()
        .map(|result| match result {
            Ok(record) => {
                let line = record.position().map_or(0, |p| p.line() as usize);
                (line, record.iter().map(str::to_string).collect())
            }
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line() as usize);
                (line, Vec::new())
            }
        })
        .collect()
}

// =============================================================================
// Byte input
// =============================================================================

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes using the given encoding. Unknown encodings and invalid
/// UTF-8 fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        // WHATWG maps the latin1 labels onto windows-1252
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Decode uploaded bytes, returning the text and the encoding used.
///
/// Valid UTF-8 is taken as-is without consulting chardet, minus any BOM.
pub fn decode_bytes(bytes: &[u8]) -> (String, String) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (strip_bom(text).to_string(), "utf-8".to_string());
    }
    let encoding = detect_encoding(bytes);
    let text = decode_content(bytes, &encoding);
    (text, encoding)
}
