//! Seating grid sheet: one column group per bench, one column per seat
//! position, one row per bench row.
//!
//! ```text
//! row 0   ROOM {id}                      (merged over every column)
//! row 1   position names                 (repeated per bench)
//! row 2   Row 1 | Row 2 | ...            (merged over each bench group)
//! row 3   seat codes                     (repeated per bench)
//! row 4+  roll numbers
//! ```
//!
//! Bench groups are separated by one blank spacer column.

use crate::error::Result;
use crate::export::{CellContent, CellStyle, MergeRange, SheetSpec};
use crate::types::{RoomAssignment, RoomRecord, Seat};

use super::{seat_code, sheet_pos};

const TITLE_ROW: usize = 0;
const NAME_ROW: usize = 1;
const BENCH_ROW: usize = 2;
const CODE_ROW: usize = 3;
const FIRST_SEAT_ROW: usize = 4;

const SEAT_COL_WIDTH: f64 = 14.0;
const SPACER_COL_WIDTH: f64 = 3.0;

/// Build the `Room {id}` sheet for one room's assignment.
pub fn seating_grid_sheet(
    room: &RoomRecord,
    assignment: &RoomAssignment,
    seat_codes: &[String],
) -> Result<SheetSpec> {
    let seats = assignment.seats_per_bench();
    let benches = assignment.bench_count();
    let stride = seats + 1;

    let mut sheet = SheetSpec::new(format!("Room {}", room.room_id));

    let (title_row, _) = sheet_pos(TITLE_ROW, 0)?;
    let (_, last_col) = sheet_pos(TITLE_ROW, (benches * stride).saturating_sub(1))?;
    sheet.set(
        title_row,
        0,
        format!("ROOM {}", room.room_id),
        CellStyle::Title,
    );
    sheet.merge(MergeRange::row_span(title_row, 0, last_col));

    for bench in 0..benches {
        let first = bench * stride;

        let (row, start) = sheet_pos(BENCH_ROW, first)?;
        let (_, end) = sheet_pos(BENCH_ROW, first + seats - 1)?;
        sheet.set(row, start, format!("Row {}", bench + 1), CellStyle::Band);
        sheet.merge(MergeRange::row_span(row, start, end));

        for position in 0..seats {
            let col = first + position;

            let name = room.position_name(position);
            if !name.is_empty() {
                let (r, c) = sheet_pos(NAME_ROW, col)?;
                sheet.set(r, c, name, CellStyle::PositionName);
            }

            let (r, c) = sheet_pos(CODE_ROW, col)?;
            sheet.set(r, c, seat_code(seat_codes, position)?, CellStyle::SeatCode);
            sheet.set_col_width(c, SEAT_COL_WIDTH);

            for grid_row in 0..assignment.row_count() {
                let (r, c) = sheet_pos(FIRST_SEAT_ROW + grid_row, col)?;
                let content = match assignment.get(bench, grid_row, position) {
                    Some(Seat::Assigned(roll)) => CellContent::from(roll),
                    Some(Seat::Unassigned) | None => CellContent::Blank,
                };
                let style = if (grid_row + bench) % 2 == 0 {
                    CellStyle::SeatShaded
                } else {
                    CellStyle::SeatPlain
                };
                sheet.set(r, c, content, style);
            }
        }

        if bench + 1 < benches {
            let (_, spacer) = sheet_pos(TITLE_ROW, first + seats)?;
            sheet.set_col_width(spacer, SPACER_COL_WIDTH);
        }
    }

    Ok(sheet)
}
