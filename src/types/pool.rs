use std::fmt;

use serde::{Deserialize, Serialize};

use super::table::{f64_to_i64_exact, CellValue};

/// A student roll number. Numeric roll numbers stay numeric so the
/// exported sheets keep them as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RollNumber {
    Integer(i64),
    Text(String),
}

impl RollNumber {
    /// Convert a table cell into a roll number.
    ///
    /// Whole numbers become [`RollNumber::Integer`]; everything else is kept
    /// as its text form.
    #[must_use]
    pub fn from_cell(value: &CellValue) -> Self {
        match value {
            CellValue::Number(n) => match f64_to_i64_exact(*n) {
                Some(i) => Self::Integer(i),
                None => Self::Text(n.to_string()),
            },
            other => Self::Text(other.to_label()),
        }
    }
}

impl fmt::Display for RollNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RollNumber {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for RollNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RollNumber {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Ordered roll numbers waiting to be seated in one seat position.
///
/// The pool is append-only and keeps insertion order and duplicates. A
/// read cursor advances with every [`pull`](Self::pull) and is never reset:
/// a pool that has been drained by one run must be rebuilt for the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollPool {
    entries: Vec<RollNumber>,
    cursor: usize,
}

impl RollPool {
    /// Build a pool from possibly-missing values, dropping the missing ones.
    pub fn build<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<RollNumber>>,
    {
        Self {
            entries: values.into_iter().flatten().collect(),
            cursor: 0,
        }
    }

    /// Build a pool from values that are all present.
    pub fn from_values<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RollNumber>,
    {
        Self::build(values.into_iter().map(|v| Some(v.into())))
    }

    /// Append a roll number at the end of the pool.
    pub fn push(&mut self, value: RollNumber) {
        self.entries.push(value);
    }

    /// Next unread roll number, advancing the cursor. `None` once exhausted.
    pub fn pull(&mut self) -> Option<RollNumber> {
        let value = self.entries.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(value)
    }

    /// Entries left to pull.
    #[must_use]
    pub fn peek_remaining(&self) -> usize {
        self.entries.len().saturating_sub(self.cursor)
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Index of the next unread entry.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total entries, pulled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[RollNumber] {
        &self.entries
    }

    /// Entries that have not been pulled yet.
    #[must_use]
    pub fn remaining(&self) -> &[RollNumber] {
        self.entries.get(self.cursor..).unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_build_drops_missing_and_keeps_order() {
        let pool = RollPool::build(vec![
            Some(RollNumber::from(3)),
            None,
            Some(RollNumber::from("A1")),
            Some(RollNumber::from(3)),
        ]);
        assert_eq!(
            pool.entries(),
            &[
                RollNumber::Integer(3),
                RollNumber::Text("A1".into()),
                RollNumber::Integer(3)
            ]
        );
        assert_eq!(pool.peek_remaining(), 3);
    }

    #[test]
    fn test_pull_advances_until_exhausted() {
        let mut pool = RollPool::from_values(["a", "b"]);
        assert_eq!(pool.pull(), Some(RollNumber::from("a")));
        assert_eq!(pool.cursor(), 1);
        assert_eq!(pool.remaining(), &[RollNumber::from("b")]);
        assert_eq!(pool.pull(), Some(RollNumber::from("b")));
        assert!(pool.is_exhausted());
        assert_eq!(pool.pull(), None);
        assert_eq!(pool.pull(), None);
        assert_eq!(pool.cursor(), 2);
        assert_eq!(pool.peek_remaining(), 0);
        assert!(pool.remaining().is_empty());
    }

    #[test]
    fn test_empty_pool() {
        let mut pool = RollPool::default();
        assert!(pool.is_empty());
        assert!(pool.is_exhausted());
        assert_eq!(pool.pull(), None);
    }

    #[test]
    fn test_from_cell() {
        assert_eq!(
            RollNumber::from_cell(&CellValue::Number(21_001.0)),
            RollNumber::Integer(21_001)
        );
        assert_eq!(
            RollNumber::from_cell(&CellValue::Text("21CS001".into())),
            RollNumber::Text("21CS001".into())
        );
        assert_eq!(RollNumber::Integer(42).to_string(), "42");
    }
}
