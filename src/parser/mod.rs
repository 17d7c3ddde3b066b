//! XLSX table reader
//!
//! Reads one worksheet of a workbook into a [`Table`]. The first row that
//! holds any value is the header row; every later row is data.

mod relationships;
mod worksheet;

use std::collections::BTreeMap;
use std::io::Cursor;
use zip::ZipArchive;

use crate::error::{Result, SeatplanError};
use crate::types::{CellValue, Table};

use relationships::{get_sheet_info, parse_shared_strings, parse_workbook_relationships};
use worksheet::{parse_sheet_cells, SheetCell};

/// Names of the sheets in workbook order.
pub fn sheet_names(data: &[u8]) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let rels = parse_workbook_relationships(&mut archive)?;
    let sheets = get_sheet_info(&mut archive, &rels.worksheets)?;
    Ok(sheets.into_iter().map(|s| s.name).collect())
}

/// Read a worksheet as a table: the named sheet, or the first one.
///
/// # Errors
/// Fails if the archive or its XML is malformed, the workbook has no
/// sheets, or the named sheet does not exist.
pub fn read_table(data: &[u8], sheet: Option<&str>) -> Result<Table> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let rels = parse_workbook_relationships(&mut archive)?;
    let sheets = get_sheet_info(&mut archive, &rels.worksheets)?;

    let info = match sheet {
        Some(name) => sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SeatplanError::Parse(format!("workbook has no sheet named '{name}'")))?,
        None => sheets
            .first()
            .ok_or_else(|| SeatplanError::Parse("workbook has no sheets".to_string()))?,
    };

    let shared_strings = parse_shared_strings(&mut archive, rels.shared_strings.as_deref())?;
    let cells = parse_sheet_cells(&mut archive, &info.path, &shared_strings)?;

    log::debug!(
        "read sheet '{}': {} non-empty cell(s)",
        info.name,
        cells.len()
    );

    Ok(cells_to_table(cells))
}

/// Arrange sparse cells into a header row plus data rows.
///
/// Only rows holding a value are materialised, and each row is only as wide
/// as its last value. Cells right of the last header cell have no column
/// name and are dropped.
fn cells_to_table(cells: Vec<SheetCell>) -> Table {
    let mut by_row: BTreeMap<u32, Vec<(usize, CellValue)>> = BTreeMap::new();
    for cell in cells {
        by_row
            .entry(cell.row)
            .or_default()
            .push((cell.col as usize, cell.value));
    }

    let mut rows_iter = by_row.into_values();
    let Some(header_cells) = rows_iter.next() else {
        return Table::default();
    };
    let width = header_cells.iter().map(|(col, _)| col + 1).max().unwrap_or(0);
    let mut headers = vec![String::new(); width];
    for (col, value) in header_cells {
        if let Some(slot) = headers.get_mut(col) {
            *slot = value.to_label();
        }
    }

    let rows = rows_iter
        .map(|cells| {
            let row_width = cells
                .iter()
                .map(|(col, _)| col + 1)
                .filter(|end| *end <= width)
                .max()
                .unwrap_or(0);
            let mut row = vec![None; row_width];
            for (col, value) in cells {
                if let Some(slot) = row.get_mut(col) {
                    *slot = Some(value);
                }
            }
            row
        })
        .collect();

    Table::new(headers, rows)
}
