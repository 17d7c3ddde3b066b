//! Attendance roster sheets.
//!
//! Two shapes of the same roster:
//! - sectioned: one `Serial Number | Student Roll Number | Signature` block
//!   per seat position, side by side, blocks separated by a spacer column;
//! - flat: a single four-column table with one line per roster entry.
//!
//! Only seated entries appear; unassigned slots have no roster line.

use crate::error::Result;
use crate::export::{CellContent, CellStyle, MergeRange, SheetSpec};
use crate::types::{AttendanceRoster, RoomRecord};

use super::{seat_code, sheet_pos};

const SECTION_HEADERS: [&str; 3] = ["Serial Number", "Student Roll Number", "Signature"];
const SECTION_WIDTHS: [f64; 3] = [14.0, 20.0, 18.0];
/// Block width plus the spacer column.
const SECTION_STRIDE: usize = SECTION_HEADERS.len() + 1;
const SPACER_COL_WIDTH: f64 = 3.0;

const FLAT_HEADERS: [&str; 4] = ["Seat Position", "Serial Number", "Roll Number", "Signature"];
const FLAT_WIDTHS: [f64; 4] = [14.0, 14.0, 20.0, 20.0];

fn sheet_name(room: &RoomRecord) -> String {
    format!("Attendance - Room {}", room.room_id)
}

/// Build the sectioned `Attendance - Room {id}` sheet.
pub fn sectioned_roster_sheet(
    room: &RoomRecord,
    roster: &AttendanceRoster,
    seat_codes: &[String],
) -> Result<SheetSpec> {
    let positions = room.position_names.len();
    let mut sheet = SheetSpec::new(sheet_name(room));

    let (_, last_col) = sheet_pos(0, (positions * SECTION_STRIDE).saturating_sub(2))?;
    sheet.set(
        0,
        0,
        format!("Attendance - ROOM {}", room.room_id),
        CellStyle::Title,
    );
    sheet.merge(MergeRange::row_span(0, 0, last_col));

    for position in 0..positions {
        let first = position * SECTION_STRIDE;

        let (_, start) = sheet_pos(1, first)?;
        let (_, end) = sheet_pos(1, first + SECTION_HEADERS.len() - 1)?;
        sheet.set(1, start, seat_code(seat_codes, position)?, CellStyle::Band);
        sheet.merge(MergeRange::row_span(1, start, end));

        for (offset, (header, width)) in SECTION_HEADERS.iter().zip(SECTION_WIDTHS).enumerate() {
            let (row, col) = sheet_pos(2, first + offset)?;
            sheet.set(row, col, *header, CellStyle::ColumnHeader);
            sheet.set_col_width(col, width);
        }
        if position + 1 < positions {
            let (_, spacer) = sheet_pos(0, first + SECTION_HEADERS.len())?;
            sheet.set_col_width(spacer, SPACER_COL_WIDTH);
        }

        for (line, entry) in roster.for_position(position).enumerate() {
            let (row, col) = sheet_pos(3 + line, first)?;
            sheet.set(row, col, entry.serial, CellStyle::Centered);
            sheet.set(row, col + 1, &entry.roll_number, CellStyle::Centered);
            sheet.set(row, col + 2, CellContent::Blank, CellStyle::Centered);
        }
    }

    Ok(sheet)
}

/// Build the flat `Attendance - Room {id}` sheet, one line per roster
/// entry in roster order.
pub fn flat_roster_sheet(
    room: &RoomRecord,
    roster: &AttendanceRoster,
    seat_codes: &[String],
) -> Result<SheetSpec> {
    let mut sheet = SheetSpec::new(sheet_name(room));

    sheet.set(
        0,
        0,
        format!("Attendance Sheet - Room {}", room.room_id),
        CellStyle::PlainTitle,
    );
    sheet.merge(MergeRange::row_span(0, 0, 3));

    for (col, (header, width)) in (0_u32..).zip(FLAT_HEADERS.iter().zip(FLAT_WIDTHS)) {
        sheet.set(1, col, *header, CellStyle::ColumnHeader);
        sheet.set_col_width(col, width);
    }

    for (line, entry) in roster.entries().iter().enumerate() {
        let (row, _) = sheet_pos(2 + line, 0)?;
        sheet.set(row, 0, seat_code(seat_codes, entry.position)?, CellStyle::Bordered);
        sheet.set(row, 1, entry.serial, CellStyle::Bordered);
        sheet.set(row, 2, &entry.roll_number, CellStyle::Bordered);
        sheet.set(row, 3, CellContent::Blank, CellStyle::Bordered);
    }

    Ok(sheet)
}
