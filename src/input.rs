//! Input boundary: loads tables from disk and maps their columns onto
//! room rows and roll-number sequences.

use std::path::Path;

use crate::config::RoomColumns;
use crate::csv::{parse_delimited, Delimiter};
use crate::error::{Result, SeatplanError};
use crate::parser;
use crate::types::{RawRoomRow, RollNumber, RollPool, RoomCatalog, RoomFieldNames, Table};

/// Supported input file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Xlsx,
    Delimited(Delimiter),
}

impl InputFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Delimited(Delimiter::Comma)),
            "tsv" | "tab" => Ok(Self::Delimited(Delimiter::Tab)),
            _ => Err(SeatplanError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse table bytes in the given format. `sheet` only applies to xlsx.
pub fn read_table(data: &[u8], format: InputFormat, sheet: Option<&str>) -> Result<Table> {
    match format {
        InputFormat::Xlsx => parser::read_table(data, sheet),
        InputFormat::Delimited(delim) => Ok(parse_delimited(data, delim)),
    }
}

/// Read a table file, picking the reader from its extension.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let format = InputFormat::from_path(path)?;
    let data = std::fs::read(path)?;
    let table = read_table(&data, format, sheet)?;
    log::debug!(
        "loaded {}: {} column(s), {} data row(s)",
        path.display(),
        table.headers.len(),
        table.len()
    );
    Ok(table)
}

/// Map a room table onto raw room rows.
///
/// Every configured column must be present; the error lists all that are
/// missing. Cell-level validation is left to [`RoomCatalog::build`].
pub fn room_rows(table: &Table, columns: &RoomColumns) -> Result<Vec<RawRoomRow>> {
    let idx = table.require_columns(&columns.required(), "room table")?;
    let (fixed, names) = idx.split_at(4.min(idx.len()));
    let [id_col, rows_col, benches_col, seats_col] = <[usize; 4]>::try_from(fixed)
        .map_err(|_| SeatplanError::Configuration("room columns are incomplete".to_string()))?;

    let field_names = RoomFieldNames {
        room_id: columns.room_id.clone(),
        row_count: columns.rows.clone(),
        bench_count: columns.benches.clone(),
        seats_per_bench: columns.seats_per_bench.clone(),
    };

    Ok((0..table.len())
        .map(|row| RawRoomRow {
            room_id: table.cell(row, id_col).cloned(),
            row_count: table.cell(row, rows_col).cloned(),
            bench_count: table.cell(row, benches_col).cloned(),
            seats_per_bench: table.cell(row, seats_col).cloned(),
            position_names: names
                .iter()
                .map(|&col| table.cell(row, col).cloned())
                .collect(),
            field_names: Some(field_names.clone()),
        })
        .collect())
}

/// The roll-number column in row order, blanks kept as `None`.
pub fn roll_values(table: &Table, column: &str) -> Result<Vec<Option<RollNumber>>> {
    let col = table
        .column(column)
        .ok_or_else(|| SeatplanError::schema("roll number table", vec![column.to_string()]))?;
    Ok((0..table.len())
        .map(|row| table.cell(row, col).map(RollNumber::from_cell))
        .collect())
}

/// Build a catalog straight from a room table.
pub fn catalog_from_table(table: &Table, columns: &RoomColumns) -> Result<RoomCatalog> {
    RoomCatalog::build(&room_rows(table, columns)?)
}

/// Build a pool straight from a roll-number table, dropping blanks.
pub fn pool_from_table(table: &Table, column: &str) -> Result<RollPool> {
    Ok(RollPool::build(roll_values(table, column)?))
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
    use crate::types::CellValue;
    use std::path::PathBuf;
    use test_case::test_case;

    fn rooms_csv() -> Table {
        parse_delimited(
            b"Room Number,Number of Rows,Number of Bench,Number of Student per Bench,Left Name,Middle Name,Right Name\n\
              101,2,3,2,CSE,ECE,\n\
              102,4,1,2,,,\n",
            Delimiter::Comma,
        )
    }

    #[test]
    fn test_room_rows_map_columns() {
        let rows = room_rows(&rooms_csv(), &RoomColumns::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].room_id, Some(CellValue::Number(101.0)));
        assert_eq!(rows[0].bench_count, Some(CellValue::Number(3.0)));
        assert_eq!(rows[0].position_names.len(), 3);
        assert_eq!(rows[0].position_names[2], None);
    }

    #[test]
    fn test_catalog_from_table() {
        let catalog = catalog_from_table(&rooms_csv(), &RoomColumns::default()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.rooms()[0].room_id, "101");
        assert_eq!(catalog.rooms()[0].position_names, vec!["CSE", "ECE"]);
        assert_eq!(catalog.rooms()[1].position_names, vec!["", ""]);
        assert_eq!(catalog.demand_per_position(), 6 + 4);
    }

    #[test]
    fn test_missing_room_columns_are_listed() {
        let table = parse_delimited(b"Room Number,Number of Rows\n1,2\n", Delimiter::Comma);
        let err = room_rows(&table, &RoomColumns::default()).unwrap_err();
        match err {
            SeatplanError::Schema { missing, .. } => {
                assert_eq!(
                    missing,
                    vec![
                        "Number of Bench",
                        "Number of Student per Bench",
                        "Left Name",
                        "Middle Name",
                        "Right Name"
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_count_names_the_column() {
        let table = parse_delimited(
            b"Room Number,Number of Rows,Number of Bench,Number of Student per Bench,Left Name,Middle Name,Right Name\n\
              101,,3,2,,,\n",
            Delimiter::Comma,
        );
        let err = catalog_from_table(&table, &RoomColumns::default()).unwrap_err();
        assert!(err.to_string().contains("Number of Rows"));
    }

    #[test]
    fn test_roll_values_keep_blanks_until_pool_build() {
        let table = parse_delimited(b"Name,Roll Number\na,1001\nb,\nc,21CS7\n", Delimiter::Comma);
        let values = roll_values(&table, "Roll Number").unwrap();
        assert_eq!(
            values,
            vec![
                Some(RollNumber::Integer(1001)),
                None,
                Some(RollNumber::Text("21CS7".into()))
            ]
        );
        let pool = pool_from_table(&table, "Roll Number").unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_missing_roll_column() {
        let table = parse_delimited(b"Roll\n1\n", Delimiter::Comma);
        let err = roll_values(&table, "Roll Number").unwrap_err();
        assert!(matches!(err, SeatplanError::Schema { .. }));
    }

    #[test_case("rooms.xlsx", InputFormat::Xlsx ; "xlsx")]
    #[test_case("ROOMS.XLSM", InputFormat::Xlsx ; "xlsm upper")]
    #[test_case("left.csv", InputFormat::Delimited(Delimiter::Comma) ; "csv")]
    #[test_case("left.tsv", InputFormat::Delimited(Delimiter::Tab) ; "tsv")]
    fn test_format_detection(name: &str, expected: InputFormat) {
        assert_eq!(InputFormat::from_path(&PathBuf::from(name)).unwrap(), expected);
    }

    #[test_case("rooms.xls" ; "legacy xls")]
    #[test_case("rooms" ; "no extension")]
    fn test_unsupported_format(name: &str) {
        let err = InputFormat::from_path(&PathBuf::from(name)).unwrap_err();
        assert!(matches!(err, SeatplanError::UnsupportedFormat(_)));
    }
}
