use std::collections::HashSet;

use serde::Serialize;

use super::table::CellValue;
use crate::error::{Result, SeatplanError};

/// Field names used in schema and coercion errors.
pub mod field {
    pub const ROOM_ID: &str = "room_id";
    pub const ROW_COUNT: &str = "row_count";
    pub const BENCH_COUNT: &str = "bench_count";
    pub const SEATS_PER_BENCH: &str = "seats_per_bench";
}

/// Most seats one room may hold, one worksheet row each.
pub const MAX_ROOM_SEATS: usize = 1_048_576;

/// One unvalidated row of the room table.
///
/// Every field is optional so that missing values surface as schema errors
/// naming the field instead of failing earlier at the table boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRoomRow {
    pub room_id: Option<CellValue>,
    pub row_count: Option<CellValue>,
    pub bench_count: Option<CellValue>,
    pub seats_per_bench: Option<CellValue>,
    /// One display-name cell per seat-position column, blank cells as `None`.
    pub position_names: Vec<Option<CellValue>>,
    /// Display names of the fields, used in error messages. Defaults to the
    /// names in [`field`].
    pub field_names: Option<RoomFieldNames>,
}

/// Caller-facing names of the room fields (usually the table headers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomFieldNames {
    pub room_id: String,
    pub row_count: String,
    pub bench_count: String,
    pub seats_per_bench: String,
}

impl Default for RoomFieldNames {
    fn default() -> Self {
        Self {
            room_id: field::ROOM_ID.to_string(),
            row_count: field::ROW_COUNT.to_string(),
            bench_count: field::BENCH_COUNT.to_string(),
            seats_per_bench: field::SEATS_PER_BENCH.to_string(),
        }
    }
}

/// A validated exam room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub room_id: String,
    pub row_count: usize,
    pub bench_count: usize,
    /// Exactly `seats_per_bench` labels, one per seat position.
    pub position_names: Vec<String>,
}

impl RoomRecord {
    /// Seat slots per position (`row_count × bench_count`).
    #[must_use]
    pub fn slots_per_position(&self) -> usize {
        self.row_count.saturating_mul(self.bench_count)
    }

    /// Display name of a seat position, empty when unnamed.
    #[must_use]
    pub fn position_name(&self, position: usize) -> &str {
        self.position_names.get(position).map_or("", String::as_str)
    }
}

/// Ordered, validated set of rooms sharing one seats-per-bench value.
///
/// Every room holds at most [`MAX_ROOM_SEATS`] seats and the catalog total
/// fits in `usize`. Only [`RoomCatalog::build`] creates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCatalog {
    rooms: Vec<RoomRecord>,
    seats_per_bench: usize,
}

impl RoomCatalog {
    /// Validate raw rows into a catalog.
    ///
    /// `seats_per_bench` is taken from the first row and every later row
    /// must agree. Each row needs a display-name entry for every seat
    /// position and at most [`MAX_ROOM_SEATS`] seats. No partial catalog is
    /// produced on failure.
    pub fn build(rows: &[RawRoomRow]) -> Result<Self> {
        let mut rooms = Vec::with_capacity(rows.len());
        let mut total_seats: usize = 0;
        let mut seen = HashSet::with_capacity(rows.len());
        let mut seats_per_bench: Option<usize> = None;

        for (idx, raw) in rows.iter().enumerate() {
            let row_no = idx + 1;
            let default_names = RoomFieldNames::default();
            let names = raw.field_names.as_ref().unwrap_or(&default_names);

            let missing: Vec<String> = [
                (raw.room_id.is_none(), &names.room_id),
                (raw.row_count.is_none(), &names.row_count),
                (raw.bench_count.is_none(), &names.bench_count),
                (raw.seats_per_bench.is_none(), &names.seats_per_bench),
            ]
            .into_iter()
            .filter(|(absent, _)| *absent)
            .map(|(_, name)| name.clone())
            .collect();

            let (Some(room_id), Some(row_count), Some(bench_count), Some(seats)) = (
                raw.room_id.as_ref(),
                raw.row_count.as_ref(),
                raw.bench_count.as_ref(),
                raw.seats_per_bench.as_ref(),
            ) else {
                return Err(SeatplanError::schema(format!("room row {row_no}"), missing));
            };

            let row_count = positive_count(row_count, row_no, &names.row_count)?;
            let bench_count = positive_count(bench_count, row_no, &names.bench_count)?;
            let seats = positive_count(seats, row_no, &names.seats_per_bench)?;

            let seats = match seats_per_bench {
                None => {
                    seats_per_bench = Some(seats);
                    seats
                }
                Some(expected) if expected == seats => expected,
                Some(expected) => {
                    return Err(SeatplanError::Configuration(format!(
                        "room row {row_no}: {} is {seats}, but the catalog uses {expected}",
                        names.seats_per_bench
                    )));
                }
            };

            let room_seats = row_count
                .checked_mul(bench_count)
                .and_then(|n| n.checked_mul(seats))
                .filter(|n| *n <= MAX_ROOM_SEATS);
            let Some(room_seats) = room_seats else {
                return Err(SeatplanError::Coercion {
                    row: row_no,
                    field: names.row_count.clone(),
                    value: format!("{row_count} rows x {bench_count} benches x {seats} seats"),
                    reason: "room too large",
                });
            };
            total_seats = total_seats.checked_add(room_seats).ok_or_else(|| {
                SeatplanError::Configuration(format!(
                    "room row {row_no}: catalog seat total overflows"
                ))
            })?;

            if raw.position_names.len() < seats {
                return Err(SeatplanError::Configuration(format!(
                    "room row {row_no}: {seats} seat position(s) but only {} display-name column(s)",
                    raw.position_names.len()
                )));
            }

            let room_id = room_id.to_label();
            if !seen.insert(room_id.clone()) {
                return Err(SeatplanError::Configuration(format!(
                    "room row {row_no}: duplicate room id '{room_id}'"
                )));
            }

            let position_names = raw
                .position_names
                .iter()
                .take(seats)
                .map(|cell| cell.as_ref().map(CellValue::to_label).unwrap_or_default())
                .collect();

            rooms.push(RoomRecord {
                room_id,
                row_count,
                bench_count,
                position_names,
            });
        }

        Ok(Self {
            rooms,
            seats_per_bench: seats_per_bench.unwrap_or(0),
        })
    }

    /// Seats per bench shared by every room. Zero for an empty catalog.
    #[must_use]
    pub fn seats_per_bench(&self) -> usize {
        self.seats_per_bench
    }

    #[must_use]
    pub fn rooms(&self) -> &[RoomRecord] {
        &self.rooms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RoomRecord> {
        self.rooms.iter()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&RoomRecord> {
        self.rooms.get(idx)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Seats demanded from each position's pool across all rooms.
    #[must_use]
    pub fn demand_per_position(&self) -> usize {
        self.rooms
            .iter()
            .map(RoomRecord::slots_per_position)
            .fold(0, usize::saturating_add)
    }

    /// Physical seats across all rooms.
    #[must_use]
    pub fn total_seats(&self) -> usize {
        self.demand_per_position()
            .saturating_mul(self.seats_per_bench)
    }
}

impl<'a> IntoIterator for &'a RoomCatalog {
    type Item = &'a RoomRecord;
    type IntoIter = std::slice::Iter<'a, RoomRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rooms.iter()
    }
}

fn positive_count(value: &CellValue, row: usize, field: &str) -> Result<usize> {
    let coercion = |reason| SeatplanError::Coercion {
        row,
        field: field.to_string(),
        value: value.to_label(),
        reason,
    };
    let n = value
        .as_integer()
        .ok_or_else(|| coercion("expected a whole number"))?;
    if n <= 0 {
        return Err(coercion("must be a positive integer"));
    }
    usize::try_from(n).map_err(|_| coercion("value out of range"))
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
    use test_case::test_case;

    fn num(n: f64) -> Option<CellValue> {
        Some(CellValue::Number(n))
    }

    fn text(s: &str) -> Option<CellValue> {
        CellValue::text(s)
    }

    fn room(id: &str, rows: f64, benches: f64, seats: f64) -> RawRoomRow {
        RawRoomRow {
            room_id: text(id),
            row_count: num(rows),
            bench_count: num(benches),
            seats_per_bench: num(seats),
            position_names: vec![text("Left"), text("Middle"), text("Right")],
            field_names: None,
        }
    }

    #[test]
    fn test_build_keeps_catalog_order() {
        let catalog =
            RoomCatalog::build(&[room("B2", 4.0, 3.0, 2.0), room("A1", 5.0, 2.0, 2.0)]).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|r| r.room_id.as_str()).collect();
        assert_eq!(ids, vec!["B2", "A1"]);
        assert_eq!(catalog.seats_per_bench(), 2);
        assert_eq!(catalog.rooms()[0].position_names, vec!["Left", "Middle"]);
        assert_eq!(catalog.demand_per_position(), 12 + 10);
        assert_eq!(catalog.total_seats(), 44);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = RoomCatalog::build(&[]).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.seats_per_bench(), 0);
        assert_eq!(catalog.demand_per_position(), 0);
    }

    #[test]
    fn test_numeric_room_id_is_labelled_without_fraction() {
        let mut raw = room("x", 1.0, 1.0, 1.0);
        raw.room_id = num(101.0);
        let catalog = RoomCatalog::build(&[raw]).unwrap();
        assert_eq!(catalog.rooms()[0].room_id, "101");
    }

    #[test]
    fn test_missing_fields_are_all_named() {
        let mut raw = room("A", 1.0, 1.0, 1.0);
        raw.row_count = None;
        raw.seats_per_bench = None;
        let err = RoomCatalog::build(&[room("Z", 1.0, 1.0, 1.0), raw]).unwrap_err();
        match err {
            SeatplanError::Schema { context, missing } => {
                assert_eq!(context, "room row 2");
                assert_eq!(missing, vec!["row_count", "seats_per_bench"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_field_names_appear_in_errors() {
        let mut raw = room("A", 1.0, 1.0, 1.0);
        raw.bench_count = None;
        raw.field_names = Some(RoomFieldNames {
            bench_count: "Number of Bench".to_string(),
            ..RoomFieldNames::default()
        });
        let err = RoomCatalog::build(&[raw]).unwrap_err();
        assert!(err.to_string().contains("Number of Bench"));
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-2.0 ; "negative")]
    #[test_case(2.5 ; "fractional")]
    fn test_non_positive_or_fractional_counts_are_rejected(rows: f64) {
        let err = RoomCatalog::build(&[room("A", rows, 2.0, 2.0)]).unwrap_err();
        assert!(matches!(err, SeatplanError::Coercion { row: 1, .. }));
    }

    #[test]
    fn test_text_counts_are_coerced() {
        let mut raw = room("A", 1.0, 1.0, 1.0);
        raw.row_count = text(" 6 ");
        let catalog = RoomCatalog::build(&[raw]).unwrap();
        assert_eq!(catalog.rooms()[0].row_count, 6);
    }

    #[test]
    fn test_unparseable_count_is_coercion_error() {
        let mut raw = room("A", 1.0, 1.0, 1.0);
        raw.bench_count = text("three");
        let err = RoomCatalog::build(&[raw]).unwrap_err();
        match err {
            SeatplanError::Coercion { field, value, .. } => {
                assert_eq!(field, "bench_count");
                assert_eq!(value, "three");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_inconsistent_seats_per_bench() {
        let err = RoomCatalog::build(&[room("A", 2.0, 2.0, 2.0), room("B", 2.0, 2.0, 3.0)])
            .unwrap_err();
        assert!(matches!(err, SeatplanError::Configuration(_)));
    }

    #[test]
    fn test_missing_position_name_columns() {
        let err = RoomCatalog::build(&[room("A", 2.0, 2.0, 4.0)]).unwrap_err();
        assert!(matches!(err, SeatplanError::Configuration(_)));
    }

    #[test]
    fn test_blank_position_names_are_empty_strings() {
        let mut raw = room("A", 1.0, 1.0, 3.0);
        raw.position_names = vec![None, text("Mid"), None];
        let catalog = RoomCatalog::build(&[raw]).unwrap();
        assert_eq!(catalog.rooms()[0].position_names, vec!["", "Mid", ""]);
        assert_eq!(catalog.rooms()[0].position_name(1), "Mid");
        assert_eq!(catalog.rooms()[0].position_name(7), "");
    }

    #[test]
    fn test_catalog_serializes_for_reports() {
        let catalog = RoomCatalog::build(&[room("A", 2.0, 3.0, 1.0)]).unwrap();
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json["seatsPerBench"], 1);
        assert_eq!(json["rooms"][0]["roomId"], "A");
        assert_eq!(json["rooms"][0]["benchCount"], 3);
    }

    #[test]
    fn test_count_product_overflow_is_rejected() {
        let huge = 4_294_967_296.0;
        let err = RoomCatalog::build(&[room("A", huge, huge, 1.0)]).unwrap_err();
        match err {
            SeatplanError::Coercion { row, reason, .. } => {
                assert_eq!(row, 1);
                assert_eq!(reason, "room too large");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_room_seat_limit() {
        let rows = 1_048_576.0;
        assert!(RoomCatalog::build(&[room("A", rows, 1.0, 1.0)]).is_ok());
        let err = RoomCatalog::build(&[room("A", rows, 1.0, 2.0)]).unwrap_err();
        assert!(err.to_string().contains("room too large"));
    }

    #[test]
    fn test_duplicate_room_ids() {
        let err = RoomCatalog::build(&[room("A", 1.0, 1.0, 1.0), room("A", 1.0, 1.0, 1.0)])
            .unwrap_err();
        assert!(err.to_string().contains("duplicate room id 'A'"));
    }
}
