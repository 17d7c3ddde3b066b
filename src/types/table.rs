use serde::{Deserialize, Serialize};

use crate::error::{Result, SeatplanError};

/// A single non-empty cell value read from an input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Build a text value, returning `None` for blank strings.
    #[must_use]
    pub fn text(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::Text(trimmed.to_string()))
        }
    }

    /// Integral value if this is a whole number (or text spelling one).
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Number(n) => f64_to_i64_exact(*n),
            Self::Text(s) => s.trim().parse::<i64>().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Display form used for labels and identifiers. Whole numbers drop
    /// their fractional part (`101`, not `101.0`).
    #[must_use]
    pub fn to_label(&self) -> String {
        match self {
            Self::Number(n) => match f64_to_i64_exact(*n) {
                Some(i) => i.to_string(),
                None => n.to_string(),
            },
            Self::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Convert an `f64` to `i64` only when it holds a whole number in range.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn f64_to_i64_exact(v: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or beyond it overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if v.is_finite() && v.fract() == 0.0 && v >= -LIMIT && v < LIMIT {
        Some(v as i64)
    } else {
        None
    }
}

/// A fully materialised input table: one header row plus data rows.
///
/// Rows never extend past the header width but may stop short of it;
/// [`Table::cell`] reads missing cells as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl Table {
    /// Build a table from a header row and data rows. Headers are trimmed,
    /// rows are truncated to the header width and fully blank rows are
    /// dropped.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<CellValue>>>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .filter(|row| row.iter().take(width).any(Option::is_some))
            .map(|mut row| {
                row.truncate(width);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Index of the column with the given header.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve every named column, failing with a schema error that lists
    /// all the missing ones.
    pub fn require_columns(&self, names: &[&str], context: &str) -> Result<Vec<usize>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column(name) {
                Some(idx) => found.push(idx),
                None => missing.push((*name).to_string()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(SeatplanError::schema(context, missing))
        }
    }

    /// Cell at `(row, col)`, `None` when empty or out of range.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(col)?.as_ref()
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;

    fn num(n: f64) -> Option<CellValue> {
        Some(CellValue::Number(n))
    }

    #[test]
    fn test_new_trims_headers_and_drops_blank_rows() {
        let table = Table::new(
            vec![" Room Number ".to_string(), "Number of Rows".to_string()],
            vec![
                vec![num(1.0), num(4.0), num(9.0)],
                vec![None, None],
                vec![num(2.0)],
            ],
        );
        assert_eq!(table.headers[0], "Room Number");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], vec![num(1.0), num(4.0)]);
        assert_eq!(table.rows[1], vec![num(2.0)]);
        assert_eq!(table.cell(1, 1), None);
    }

    #[test]
    fn test_require_columns_reports_every_missing_header() {
        let table = Table::new(vec!["A".to_string()], Vec::new());
        let err = table.require_columns(&["A", "B", "C"], "rooms").unwrap_err();
        match err {
            SeatplanError::Schema { missing, .. } => assert_eq!(missing, vec!["B", "C"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_label_drops_integral_fraction() {
        assert_eq!(CellValue::Number(101.0).to_label(), "101");
        assert_eq!(CellValue::Number(1.5).to_label(), "1.5");
        assert_eq!(CellValue::Text("B-12".into()).to_label(), "B-12");
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(CellValue::Number(3.0).as_integer(), Some(3));
        assert_eq!(CellValue::Number(3.25).as_integer(), None);
        assert_eq!(CellValue::Text(" 7 ".into()).as_integer(), Some(7));
        assert_eq!(CellValue::Text("seven".into()).as_integer(), None);
        assert_eq!(CellValue::Number(f64::NAN).as_integer(), None);
    }

    #[test]
    fn test_blank_text_is_missing() {
        assert_eq!(CellValue::text("   "), None);
        assert_eq!(CellValue::text(" x "), Some(CellValue::Text("x".into())));
    }
}
