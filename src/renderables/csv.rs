//! CSV and TSV files as tables.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::extension;
use crate::error::{Error, Result};
use crate::render::{Color, Justify, Style, Text};

use super::boxes::BoxKind;
use super::table::{Column, Table};

const SNIFF_BYTES: usize = 1024;
const DELIMITERS: [u8; 4] = [b',', b'\t', b'|', b';'];

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]*\.?[0-9]*$").expect("number regex is valid"));

/// Delimiter and header presence guessed from a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub has_header: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CsvOptions {
    pub head: Option<usize>,
    pub tail: Option<usize>,
    pub title: Option<Text>,
    pub caption: Option<Text>,
}

fn parse_records(text: &str, delimiter: u8) -> std::result::Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Sample of whole lines from the start of the text.
fn sample(text: &str) -> &str {
    if text.len() <= SNIFF_BYTES {
        return text;
    }
    let mut end = SNIFF_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    match text[..end].rfind('\n') {
        Some(newline) => &text[..newline],
        None => &text[..end],
    }
}

/// Guess the delimiter and whether the first row is a header.
///
/// A delimiter qualifies when it splits every sampled row into the same
/// number (at least two) of fields. Candidates are tried in the order
/// comma, tab, pipe, semicolon.
pub fn sniff(text: &str) -> Option<Dialect> {
    let sample = sample(text);
    let delimiter = DELIMITERS.into_iter().find(|delimiter| {
        let Ok(rows) = parse_records(sample, *delimiter) else {
            return false;
        };
        let Some(first) = rows.first() else {
            return false;
        };
        first.len() > 1 && rows.iter().all(|row| row.len() == first.len())
    })?;
    let rows = parse_records(sample, delimiter).ok()?;
    Some(Dialect { delimiter, has_header: has_header(&rows) })
}

fn is_number(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().is_ok()
}

/// Each column votes: if its data cells share a type (numeric) or a
/// length that the first row's cell doesn't, the first row looks like a
/// header.
fn has_header(rows: &[Vec<String>]) -> bool {
    let Some((header, data)) = rows.split_first() else {
        return false;
    };
    if data.is_empty() {
        return false;
    }
    let mut votes: i32 = 0;
    for (index, title) in header.iter().enumerate() {
        let values: Vec<&str> = data.iter().filter_map(|row| row.get(index)).map(String::as_str).collect();
        if values.is_empty() {
            continue;
        }
        if values.iter().all(|value| is_number(value)) {
            votes += if is_number(title) { -1 } else { 1 };
            continue;
        }
        let length = values[0].chars().count();
        if values.iter().all(|value| value.chars().count() == length) {
            votes += if title.chars().count() == length { -1 } else { 1 };
        }
    }
    votes > 0
}

/// Dialect for text that couldn't be sniffed, judged by extension.
fn fallback_dialect(resource: &str) -> Option<Dialect> {
    match extension(resource).as_deref() {
        Some("csv") => Some(Dialect { delimiter: b',', has_header: true }),
        Some("tsv") => Some(Dialect { delimiter: b'\t', has_header: true }),
        _ => None,
    }
}

/// True when every non-empty cell of the column looks like a number.
fn numeric_column(rows: &[Vec<String>], index: usize) -> bool {
    let mut seen = false;
    for value in rows.iter().filter_map(|row| row.get(index)) {
        if value.is_empty() {
            continue;
        }
        if !NUMBER_RE.is_match(value) {
            return false;
        }
        seen = true;
    }
    seen
}

/// Build a table from delimited text.
pub fn build(text: &str, resource: &str, options: CsvOptions) -> Result<Table> {
    let dialect = match sniff(text) {
        Some(dialect) => dialect,
        None => fallback_dialect(resource).ok_or_else(|| {
            Error::parse("csv", resource, "could not determine the delimiter")
        })?,
    };
    tracing::debug!(
        "csv dialect: delimiter {:?}, header {}",
        dialect.delimiter as char,
        dialect.has_header
    );

    let mut rows = parse_records(text, dialect.delimiter).map_err(|e| Error::parse("csv", resource, e))?;
    let header = if dialect.has_header && !rows.is_empty() { Some(rows.remove(0)) } else { None };

    if let Some(head) = options.head {
        rows.truncate(head);
    } else if let Some(tail) = options.tail {
        let skip = rows.len().saturating_sub(tail);
        rows.drain(..skip);
    }

    let kind = if header.is_some() { BoxKind::HeavyHead } else { BoxKind::Square };
    let mut table = Table::new(kind)
        .border_style(Style::new().fg(Color::Standard(4)))
        .show_header(header.is_some())
        .title(options.title)
        .caption(options.caption, Justify::Right);

    let columns = header
        .as_ref()
        .map_or(0, Vec::len)
        .max(rows.iter().map(Vec::len).max().unwrap_or(0));
    let number_style = Style::new().bold().fg(Color::Standard(2));
    for index in 0..columns {
        let title = header.as_ref().and_then(|header| header.get(index)).cloned().unwrap_or_default();
        let mut column = Column::new(title);
        if numeric_column(&rows, index) {
            column = column
                .justify(Justify::Right)
                .style(number_style.clone())
                .header_style(number_style.clone());
        }
        table.add_column(column);
    }
    for row in rows {
        table.add_row(row.into_iter().map(Text::plain).collect());
    }
    tracing::debug!("csv table: {} columns, {} rows", columns, table.row_count());
    Ok(table)
}
