//! Common test utilities: input fixtures for rooms and roll lists, and
//! readers for the generated workbook.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::io::{Cursor, Read};

use seatplan::types::{CellValue, RawRoomRow, RollPool, RoomCatalog};

pub use super::fixtures::*;

/// Default room-table headers.
pub const ROOM_HEADERS: [&str; 7] = [
    "Room Number",
    "Number of Rows",
    "Number of Bench",
    "Number of Student per Bench",
    "Left Name",
    "Middle Name",
    "Right Name",
];

// ============================================================================
// Input Builders
// ============================================================================

/// A room-table workbook with one data row per `(id, rows, benches)`, all
/// rooms sharing `seats_per_bench`.
#[must_use]
pub fn rooms_xlsx(rooms: &[(&str, i32, i32)], seats_per_bench: i32) -> Vec<u8> {
    let rows: Vec<Vec<FixtureValue>> = rooms
        .iter()
        .map(|&(id, rows, benches)| {
            vec![
                id.into(),
                rows.into(),
                benches.into(),
                seats_per_bench.into(),
                "CSE".into(),
                "ECE".into(),
                "".into(),
            ]
        })
        .collect();
    XlsxBuilder::new()
        .sheet(SheetBuilder::new("Rooms").table(&ROOM_HEADERS, &rows))
        .build()
}

/// A roll-number workbook holding `values` under `Roll Number`.
#[must_use]
pub fn rolls_xlsx(values: &[FixtureValue]) -> Vec<u8> {
    let rows: Vec<Vec<FixtureValue>> = values
        .iter()
        .map(|v| vec![FixtureValue::String("Student".into()), v.clone()])
        .collect();
    XlsxBuilder::new()
        .sheet(SheetBuilder::new("Sheet1").table(&["Name", "Roll Number"], &rows))
        .build()
}

/// Integer roll numbers `start..start + count`.
#[must_use]
pub fn numeric_rolls(start: i32, count: i32) -> Vec<FixtureValue> {
    (start..start + count).map(FixtureValue::from).collect()
}

/// A catalog of rooms with `seats_per_bench` positions, built directly.
#[must_use]
pub fn catalog(rooms: &[(usize, usize)], seats_per_bench: usize) -> RoomCatalog {
    let rows: Vec<RawRoomRow> = rooms
        .iter()
        .enumerate()
        .map(|(idx, &(rows, benches))| room_row(&format!("R{}", idx + 1), rows, benches, seats_per_bench))
        .collect();
    RoomCatalog::build(&rows).unwrap()
}

/// One raw room row with unnamed positions.
#[must_use]
pub fn room_row(id: &str, rows: usize, benches: usize, seats_per_bench: usize) -> RawRoomRow {
    let count = |n: usize| Some(CellValue::Number(f64::from(u32::try_from(n).unwrap())));
    RawRoomRow {
        room_id: CellValue::text(id),
        row_count: count(rows),
        bench_count: count(benches),
        seats_per_bench: count(seats_per_bench),
        position_names: vec![None; seats_per_bench],
        field_names: None,
    }
}

/// One pool per size, entries numbered `position * 1000 + 1..`.
#[must_use]
pub fn pools(sizes: &[usize]) -> Vec<RollPool> {
    sizes
        .iter()
        .enumerate()
        .map(|(position, &size)| {
            let base = i64::try_from(position * 1000).unwrap();
            RollPool::from_values((1..=i64::try_from(size).unwrap()).map(|n| base + n))
        })
        .collect()
}

// ============================================================================
// Output Readers
// ============================================================================

/// Read a part of a generated package as text.
#[must_use]
pub fn read_part(xlsx: &[u8], path: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(xlsx)).expect("Failed to open ZIP archive");
    let mut out = String::new();
    archive
        .by_name(path)
        .unwrap_or_else(|_| panic!("missing part {path}"))
        .read_to_string(&mut out)
        .unwrap();
    out
}

/// Worksheet XML of the `n`th sheet (1-based).
#[must_use]
pub fn sheet_xml(xlsx: &[u8], n: usize) -> String {
    read_part(xlsx, &format!("xl/worksheets/sheet{n}.xml"))
}

/// Assert that a sheet XML contains a `<c>` at `cell_ref` holding `value`.
pub fn assert_inline_text(xml: &str, cell_ref: &str, value: &str) {
    let needle = format!("<c r=\"{cell_ref}\"");
    let start = xml
        .find(&needle)
        .unwrap_or_else(|| panic!("no cell {cell_ref} in sheet"));
    let cell = &xml[start..];
    let cell = &cell[..cell.find("</c>").unwrap_or(cell.len())];
    assert!(
        cell.contains(&format!("<t>{value}</t>")),
        "cell {cell_ref} does not hold '{value}': {cell}"
    );
}

/// Assert that a sheet XML contains a numeric `<c>` at `cell_ref`.
pub fn assert_number(xml: &str, cell_ref: &str, value: i64) {
    let needle = format!("<c r=\"{cell_ref}\"");
    let start = xml
        .find(&needle)
        .unwrap_or_else(|| panic!("no cell {cell_ref} in sheet"));
    let cell = &xml[start..];
    let cell = &cell[..cell.find("</c>").unwrap_or(cell.len())];
    assert!(
        cell.contains(&format!("<v>{value}</v>")),
        "cell {cell_ref} does not hold {value}: {cell}"
    );
}

/// Assert that `range` is merged in a sheet XML.
pub fn assert_merge_exists(xml: &str, range: &str) {
    assert!(
        xml.contains(&format!("<mergeCell ref=\"{range}\"/>")),
        "merge {range} not found"
    );
}
