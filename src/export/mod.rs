//! XLSX export pipeline.
//!
//! Builds a fresh OOXML package from a [`WorkbookSpec`]: a list of sparse,
//! styled sheets. Strings are written inline, so no shared string table is
//! produced.

mod package;
pub(crate) mod sheet_writer;
pub mod styles;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::RollNumber;

pub use styles::CellStyle;

/// Maximum sheet-name length accepted by spreadsheet applications.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Value written into a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    Integer(i64),
    Number(f64),
    /// No value; the cell is written only for its style.
    Blank,
}

impl From<&str> for CellContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<usize> for CellContent {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or_else(|_| Self::Text(n.to_string()), Self::Integer)
    }
}

impl From<&RollNumber> for CellContent {
    fn from(roll: &RollNumber) -> Self {
        match roll {
            RollNumber::Integer(n) => Self::Integer(*n),
            RollNumber::Text(s) => Self::Text(s.clone()),
        }
    }
}

/// A merged range (0-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRange {
    /// A single-row merge from `start_col` through `end_col`.
    #[must_use]
    pub fn row_span(row: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            start_row: row,
            start_col,
            end_row: row,
            end_col,
        }
    }

    fn is_single_cell(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

/// One worksheet to be written. Cells are addressed 0-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetSpec {
    pub name: String,
    cells: BTreeMap<(u32, u32), (CellContent, CellStyle)>,
    merges: Vec<MergeRange>,
    col_widths: BTreeMap<u32, f64>,
}

impl SheetSpec {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set a cell, replacing any earlier value at the same address.
    pub fn set(&mut self, row: u32, col: u32, content: impl Into<CellContent>, style: CellStyle) {
        self.cells.insert((row, col), (content.into(), style));
    }

    /// Merge a range. Single-cell ranges are ignored.
    pub fn merge(&mut self, range: MergeRange) {
        if !range.is_single_cell() {
            self.merges.push(range);
        }
    }

    /// Column width in character units.
    pub fn set_col_width(&mut self, col: u32, width: f64) {
        self.col_widths.insert(col, width);
    }

    #[must_use]
    pub fn cell(&self, row: u32, col: u32) -> Option<(&CellContent, CellStyle)> {
        self.cells.get(&(row, col)).map(|(c, s)| (c, *s))
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &CellContent, CellStyle)> + '_ {
        self.cells
            .iter()
            .map(|(&(row, col), (content, style))| (row, col, content, *style))
    }

    #[must_use]
    pub fn merges(&self) -> &[MergeRange] {
        &self.merges
    }

    pub fn col_widths(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.col_widths.iter().map(|(&c, &w)| (c, w))
    }

    /// Last used (row, col), counting merges, or `None` for an empty sheet.
    #[must_use]
    pub fn extent(&self) -> Option<(u32, u32)> {
        let cells = self.cells.keys().copied();
        let merges = self.merges.iter().map(|m| (m.end_row, m.end_col));
        cells
            .chain(merges)
            .fold(None, |acc: Option<(u32, u32)>, (r, c)| {
                Some(acc.map_or((r, c), |(mr, mc)| (mr.max(r), mc.max(c))))
            })
    }
}

/// An ordered list of sheets with unique, valid names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookSpec {
    sheets: Vec<SheetSpec>,
}

impl WorkbookSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet. Its name is sanitized and, if already taken,
    /// suffixed with ` (n)`.
    pub fn push(&mut self, mut sheet: SheetSpec) {
        let base = sanitize_sheet_name(&sheet.name);
        let mut name = base.clone();
        let mut n = 2_usize;
        while self.is_taken(&name) {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            name = format!("{}{suffix}", truncate_chars(&base, keep));
            n += 1;
        }
        sheet.name = name;
        self.sheets.push(sheet);
    }

    fn is_taken(&self, name: &str) -> bool {
        self.sheets
            .iter()
            .any(|s| s.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn sheets(&self) -> &[SheetSpec] {
        &self.sheets
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&SheetSpec> {
        self.sheets.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Replace characters spreadsheets forbid in sheet names and clamp the
/// length. An empty result becomes `Sheet`.
#[must_use]
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    // Names may not start or end with an apostrophe.
    let cleaned = truncate_chars(cleaned.trim().trim_matches('\''), MAX_SHEET_NAME_LEN);
    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.trim_end().to_string()
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Serialize a workbook to XLSX bytes.
///
/// A workbook with no sheets still gets one empty sheet, since the format
/// requires at least one.
pub fn write_xlsx(workbook: &WorkbookSpec) -> Result<Vec<u8>> {
    let bytes = if workbook.is_empty() {
        let mut fallback = WorkbookSpec::new();
        fallback.push(SheetSpec::new("Sheet1"));
        package::write_package(&fallback)?
    } else {
        package::write_package(workbook)?
    };
    log::info!(
        "wrote workbook: {} sheet(s), {} byte(s)",
        workbook.len().max(1),
        bytes.len()
    );
    Ok(bytes)
}

/// Write a workbook to disk.
pub fn save_xlsx(workbook: &WorkbookSpec, path: &std::path::Path) -> Result<()> {
    let bytes = write_xlsx(workbook)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
