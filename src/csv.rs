//! Minimal CSV/TSV reader that produces a [`Table`].
//!
//! Quoted fields may span lines, as in spreadsheet exports of multi-line
//! cells.

use crate::types::{CellValue, Table};

/// Delimiter for parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// Parse CSV/TSV bytes into a [`Table`]. The first non-blank record is the
/// header row. Fields that parse as numbers become numeric cells.
#[must_use]
pub fn parse_delimited(data: &[u8], delim: Delimiter) -> Table {
    let text = String::from_utf8_lossy(data);
    // Spreadsheet tools often prepend a byte-order mark to CSV exports.
    let text = text.trim_start_matches('\u{feff}');

    let mut records = split_records(text, delim.as_char()).into_iter();
    let Some(headers) = records.next() else {
        return Table::default();
    };

    let rows = records
        .map(|record| record.iter().map(|field| parse_field(field)).collect())
        .collect();

    Table::new(headers, rows)
}

/// Numbers become [`CellValue::Number`], blanks `None`, the rest text.
fn parse_field(field: &str) -> Option<CellValue> {
    let value = field.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
        _ => CellValue::text(value),
    }
}

/// Split text into records of fields. Quoted fields may contain the
/// separator, `""` for a literal quote, and line breaks. Records whose
/// fields are all blank are skipped.
fn split_records(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => end_record(&mut records, &mut fields, &mut current),
            c if c == sep => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    end_record(&mut records, &mut fields, &mut current);
    records
}

fn end_record(records: &mut Vec<Vec<String>>, fields: &mut Vec<String>, current: &mut String) {
    fields.push(std::mem::take(current));
    let record = std::mem::take(fields);
    if record.iter().any(|field| !field.trim().is_empty()) {
        records.push(record);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let data = b"Room Number,Number of Rows,Left Name\nA101,5,Left\nB7,4,";
        let table = parse_delimited(data, Delimiter::Comma);
        assert_eq!(
            table.headers,
            vec!["Room Number", "Number of Rows", "Left Name"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 0), Some(&CellValue::Text("A101".into())));
        assert_eq!(table.cell(0, 1), Some(&CellValue::Number(5.0)));
        assert_eq!(table.cell(1, 2), None);
    }

    #[test]
    fn test_parse_tsv() {
        let data = b"Roll Number\n1001\n\n1002\n";
        let table = parse_delimited(data, Delimiter::Tab);
        assert_eq!(table.headers, vec!["Roll Number"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 0), Some(&CellValue::Number(1002.0)));
    }

    #[test]
    fn test_quoted_csv() {
        let data = b"\"Name, Full\",Roll Number\n\"She said \"\"hi\"\"\",0";
        let table = parse_delimited(data, Delimiter::Comma);
        assert_eq!(table.headers[0], "Name, Full");
        assert_eq!(
            table.cell(0, 0),
            Some(&CellValue::Text("She said \"hi\"".into()))
        );
    }

    #[test]
    fn test_bom_and_crlf() {
        let data = "\u{feff}Roll Number\r\n21CS01\r\n".as_bytes();
        let table = parse_delimited(data, Delimiter::Comma);
        assert_eq!(table.headers, vec!["Roll Number"]);
        assert_eq!(table.cell(0, 0), Some(&CellValue::Text("21CS01".into())));
    }

    #[test]
    fn test_quoted_field_spans_lines() {
        let data = b"Roll Number,Note\r\n1001,\"first line\r\nsecond line\"\r\n1002,plain\r\n";
        let table = parse_delimited(data, Delimiter::Comma);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.cell(0, 1),
            Some(&CellValue::Text("first line\r\nsecond line".into()))
        );
        assert_eq!(table.cell(1, 0), Some(&CellValue::Number(1002.0)));
    }

    #[test]
    fn test_blank_records_are_skipped() {
        let data = b"\n  \nRoll Number\n,\n1001\n";
        let table = parse_delimited(data, Delimiter::Comma);
        assert_eq!(table.headers, vec!["Roll Number"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_csv() {
        let table = parse_delimited(b"", Delimiter::Comma);
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }
}
