//! First-column list extraction from delimited text.

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Options for reading a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Field delimiter. `None` detects it from the first non-empty line.
    pub delimiter: Option<u8>,
}

impl IngestOptions {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }
}

/// Trimmed non-empty values of the first column, in input order.
///
/// There is no header row: every record contributes its first field.
///
/// # Errors
///
/// [`IngestError::NoItems`] when no value survives, [`IngestError::Csv`]
/// when the text is not valid delimited data.
pub fn parse_first_column(raw: &str) -> Result<Vec<String>> {
    parse_first_column_with_options(raw, IngestOptions::default())
}

pub fn parse_first_column_with_options(raw: &str, options: IngestOptions) -> Result<Vec<String>> {
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(raw));
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(raw.as_bytes());

    let mut items = Vec::new();
    let mut records = 0usize;
    for record in reader.records() {
        let record = record?;
        records += 1;
        if let Some(value) = record.get(0).map(normalize_cell)
            && !value.is_empty()
        {
            items.push(value);
        }
    }

    debug!(
        delimiter = %char::from(delimiter).escape_default(),
        records,
        items = items.len(),
        "parsed first column"
    );

    if items.is_empty() {
        return Err(IngestError::NoItems);
    }
    Ok(items)
}

/// Reads a file and extracts its first column.
pub fn read_list_file(path: &Path, options: IngestOptions) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_first_column_with_options(&raw, options)
}

/// Picks the delimiter from the first non-empty line.
///
/// A comma anywhere on that line wins; otherwise a tab, then a semicolon.
pub fn detect_delimiter(raw: &str) -> u8 {
    let first = raw
        .lines()
        .map(|line| line.trim_matches('\u{feff}'))
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();
    if first.contains(',') {
        b','
    } else if first.contains('\t') {
        b'\t'
    } else if first.contains(';') {
        b';'
    } else {
        b','
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_column_only() {
        let items = parse_first_column("Apple,red\nBanana,yellow,long\nCherry\n").unwrap();
        assert_eq!(items, vec!["Apple", "Banana", "Cherry"]);
    }

    #[test]
    fn skips_blank_values_and_trims() {
        let items = parse_first_column("  Apple  \n\n   \n,orphan\nBanana\n").unwrap();
        assert_eq!(items, vec!["Apple", "Banana"]);
    }

    #[test]
    fn strips_byte_order_mark() {
        let items = parse_first_column("\u{feff}Apple\nBanana").unwrap();
        assert_eq!(items, vec!["Apple", "Banana"]);
    }

    #[test]
    fn honours_quotes() {
        let items = parse_first_column("\"Smith, John\",42\n\"Doe, Jane\",7\n").unwrap();
        assert_eq!(items, vec!["Smith, John", "Doe, Jane"]);
    }

    #[test]
    fn detects_delimiters() {
        assert_eq!(detect_delimiter("a\tb\nc\td"), b'\t');
        assert_eq!(detect_delimiter("\n\na;b\n"), b';');
        assert_eq!(detect_delimiter("a;b,c"), b',');
        assert_eq!(detect_delimiter("single"), b',');
        assert_eq!(detect_delimiter(""), b',');

        let items = parse_first_column("Apple\tred\nBanana\tyellow").unwrap();
        assert_eq!(items, vec!["Apple", "Banana"]);
        let items = parse_first_column("Apple;red\nBanana;yellow").unwrap();
        assert_eq!(items, vec!["Apple", "Banana"]);
    }

    #[test]
    fn forced_delimiter_overrides_detection() {
        let items =
            parse_first_column_with_options("a|b,c\nd|e", IngestOptions::with_delimiter(b'|'))
                .unwrap();
        assert_eq!(items, vec!["a", "d"]);
    }

    #[test]
    fn empty_input_has_no_items() {
        assert!(matches!(parse_first_column(""), Err(IngestError::NoItems)));
        assert!(matches!(
            parse_first_column(" \n,\n ,x\n"),
            Err(IngestError::NoItems)
        ));
    }
}
