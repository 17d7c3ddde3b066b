//! Sheet layouts for engine output.
//!
//! Each builder turns one room's [`RoomOutcome`] into a [`SheetSpec`];
//! [`render_workbook`] picks the builders for the configured
//! [`OutputLayout`] and collects the sheets in room order.

mod attendance_sheet;
mod seating_sheet;

use crate::config::{OutputLayout, SeatplanConfig};
use crate::engine::RoomOutcome;
use crate::error::{Result, SeatplanError};
use crate::export::{CellStyle, SheetSpec, WorkbookSpec};
use crate::types::RoomCatalog;

pub use attendance_sheet::{flat_roster_sheet, sectioned_roster_sheet};
pub use seating_sheet::seating_grid_sheet;

/// Worksheet size limits.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Convert a 0-based layout coordinate to a sheet address, rejecting
/// anything outside the worksheet grid.
pub(crate) fn sheet_pos(row: usize, col: usize) -> Result<(u32, u32)> {
    if row >= MAX_ROWS || col >= MAX_COLS {
        return Err(SeatplanError::Configuration(format!(
            "layout needs cell at row {} column {}, beyond worksheet limits",
            row + 1,
            col + 1
        )));
    }
    match (u32::try_from(row), u32::try_from(col)) {
        (Ok(r), Ok(c)) => Ok((r, c)),
        _ => Err(SeatplanError::Configuration(
            "layout coordinate overflow".to_string(),
        )),
    }
}

/// Seat code of a position. Codes are checked up front, so a miss here
/// means the caller skipped [`SeatplanConfig::check_seat_codes`].
pub(crate) fn seat_code(codes: &[String], position: usize) -> Result<&str> {
    codes.get(position).map(String::as_str).ok_or_else(|| {
        SeatplanError::Configuration(format!("no seat code for position {}", position + 1))
    })
}

/// Render all outcomes of a run into one workbook.
///
/// `outcomes` must be the engine output for `catalog`, in catalog order.
/// Outcomes are only read; a failure here leaves them intact.
pub fn render_workbook(
    catalog: &RoomCatalog,
    outcomes: &[RoomOutcome],
    config: &SeatplanConfig,
) -> Result<WorkbookSpec> {
    config.check_seat_codes(catalog.seats_per_bench())?;
    if outcomes.len() != catalog.len() {
        return Err(SeatplanError::Configuration(format!(
            "{} room(s) in catalog but {} outcome(s) to render",
            catalog.len(),
            outcomes.len()
        )));
    }

    let mut workbook = WorkbookSpec::new();
    if catalog.is_empty() {
        workbook.push(summary_sheet());
        return Ok(workbook);
    }

    let codes = &config.seat_codes;
    for (room, outcome) in catalog.iter().zip(outcomes) {
        if room.room_id != outcome.assignment.room_id {
            return Err(SeatplanError::Configuration(format!(
                "outcome for room '{}' does not match catalog room '{}'",
                outcome.assignment.room_id, room.room_id
            )));
        }
        match config.layout {
            OutputLayout::GridWithRoster => {
                workbook.push(seating_grid_sheet(room, &outcome.assignment, codes)?);
                workbook.push(sectioned_roster_sheet(room, &outcome.roster, codes)?);
            }
            OutputLayout::GridOnly => {
                workbook.push(seating_grid_sheet(room, &outcome.assignment, codes)?);
            }
            OutputLayout::AttendanceOnly => {
                workbook.push(flat_roster_sheet(room, &outcome.roster, codes)?);
            }
        }
    }

    log::debug!(
        "rendered {} sheet(s) for {} room(s)",
        workbook.len(),
        catalog.len()
    );
    Ok(workbook)
}

fn summary_sheet() -> SheetSpec {
    let mut sheet = SheetSpec::new("Summary");
    sheet.set(0, 0, "No rooms to seat", CellStyle::PlainTitle);
    sheet
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::engine::SeatingEngine;
    use crate::types::{CellValue, RawRoomRow, RollPool};

    pub(super) fn room_row(id: &str, rows: f64, benches: f64) -> RawRoomRow {
        RawRoomRow {
            room_id: CellValue::text(id),
            row_count: Some(CellValue::Number(rows)),
            bench_count: Some(CellValue::Number(benches)),
            seats_per_bench: Some(CellValue::Number(2.0)),
            position_names: vec![CellValue::text("CSE"), CellValue::text("ECE")],
            field_names: None,
        }
    }

    fn run(rows: &[RawRoomRow], pools: &mut [RollPool]) -> (RoomCatalog, Vec<RoomOutcome>) {
        let catalog = RoomCatalog::build(rows).unwrap();
        let outcomes = SeatingEngine::new(&catalog, pools).unwrap().run_to_end();
        (catalog, outcomes)
    }

    fn sheet_names(workbook: &WorkbookSpec) -> Vec<&str> {
        workbook.sheets().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_layout_selects_sheets() {
        let mut pools = vec![RollPool::from_values(1..=4_i64), RollPool::from_values(5..=8_i64)];
        let (catalog, outcomes) = run(&[room_row("101", 2.0, 1.0), room_row("102", 2.0, 1.0)], &mut pools);

        let mut config = SeatplanConfig::default();
        let wb = render_workbook(&catalog, &outcomes, &config).unwrap();
        assert_eq!(
            sheet_names(&wb),
            vec![
                "Room 101",
                "Attendance - Room 101",
                "Room 102",
                "Attendance - Room 102"
            ]
        );

        config.layout = OutputLayout::GridOnly;
        let wb = render_workbook(&catalog, &outcomes, &config).unwrap();
        assert_eq!(sheet_names(&wb), vec!["Room 101", "Room 102"]);

        config.layout = OutputLayout::AttendanceOnly;
        let wb = render_workbook(&catalog, &outcomes, &config).unwrap();
        assert_eq!(
            sheet_names(&wb),
            vec!["Attendance - Room 101", "Attendance - Room 102"]
        );
    }

    #[test]
    fn test_empty_catalog_gets_summary_sheet() {
        let (catalog, outcomes) = run(&[], &mut []);
        let wb = render_workbook(&catalog, &outcomes, &SeatplanConfig::default()).unwrap();
        assert_eq!(sheet_names(&wb), vec!["Summary"]);
    }

    #[test]
    fn test_missing_seat_codes_rejected() {
        let mut pools = vec![RollPool::default(), RollPool::default()];
        let (catalog, outcomes) = run(&[room_row("101", 1.0, 1.0)], &mut pools);
        let config = SeatplanConfig {
            seat_codes: vec!["F-1".to_string()],
            ..SeatplanConfig::default()
        };
        let err = render_workbook(&catalog, &outcomes, &config).unwrap_err();
        assert!(matches!(err, SeatplanError::Configuration(_)));
    }

    #[test]
    fn test_outcome_count_mismatch() {
        let mut pools = vec![RollPool::default(), RollPool::default()];
        let (catalog, outcomes) = run(&[room_row("101", 1.0, 1.0)], &mut pools);
        let err = render_workbook(&catalog, &outcomes[..0], &SeatplanConfig::default()).unwrap_err();
        assert!(matches!(err, SeatplanError::Configuration(_)));
    }

    #[test]
    fn test_sheet_pos_limits() {
        assert_eq!(sheet_pos(0, 0).unwrap(), (0, 0));
        assert!(sheet_pos(MAX_ROWS, 0).is_err());
        assert!(sheet_pos(0, MAX_COLS).is_err());
    }
}
