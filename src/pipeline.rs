//! End-to-end run: input tables in, seating plan out.

use std::path::Path;

use serde::Serialize;

use crate::config::SeatplanConfig;
use crate::engine::{supply_report, RoomOutcome, SeatingEngine, SupplyReport};
use crate::error::Result;
use crate::export::WorkbookSpec;
use crate::input::{catalog_from_table, load_table, pool_from_table};
use crate::layout::render_workbook;
use crate::types::{RollPool, RoomCatalog, Table};

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatingPlan {
    pub catalog: RoomCatalog,
    /// Supply as measured before the run.
    pub supply: SupplyReport,
    pub outcomes: Vec<RoomOutcome>,
}

impl SeatingPlan {
    /// Lay the plan out as a workbook.
    pub fn render(&self, config: &SeatplanConfig) -> Result<WorkbookSpec> {
        render_workbook(&self.catalog, &self.outcomes, config)
    }
}

/// Seat every room of `rooms` from one roll table per seat position.
///
/// Everything that can fail is checked before the first room is seated:
/// configuration, table columns, cell values, pool count, seat codes and,
/// with `strict_supply`, pool sizes. `on_room` is called after each room
/// with `(outcome, rooms completed, total rooms)`.
pub fn plan_from_tables(
    config: &SeatplanConfig,
    rooms: &Table,
    rolls: &[Table],
    mut on_room: impl FnMut(&RoomOutcome, usize, usize),
) -> Result<SeatingPlan> {
    config.validate()?;
    let catalog = catalog_from_table(rooms, &config.room_columns)?;
    if !catalog.is_empty() {
        config.check_seat_codes(catalog.seats_per_bench())?;
    }

    let mut pools = rolls
        .iter()
        .map(|table| pool_from_table(table, &config.roll_column))
        .collect::<Result<Vec<RollPool>>>()?;

    let supply = supply_report(&catalog, &pools);
    if config.strict_supply {
        supply.ensure_sufficient()?;
    }

    let engine = SeatingEngine::new(&catalog, &mut pools)?;
    let total = catalog.len();
    let mut outcomes = Vec::with_capacity(total);
    for (idx, outcome) in engine.run().enumerate() {
        on_room(&outcome, idx + 1, total);
        outcomes.push(outcome);
    }

    Ok(SeatingPlan {
        catalog,
        supply,
        outcomes,
    })
}

/// Load the room file and one roll file per seat position, then run.
///
/// `rooms_sheet` selects a worksheet of the room workbook; roll workbooks
/// are always read from their first sheet.
pub fn plan_from_files<P: AsRef<Path>>(
    config: &SeatplanConfig,
    rooms_path: &Path,
    roll_paths: &[P],
    rooms_sheet: Option<&str>,
    on_room: impl FnMut(&RoomOutcome, usize, usize),
) -> Result<SeatingPlan> {
    let rooms = load_table(rooms_path, rooms_sheet)?;
    let rolls = roll_paths
        .iter()
        .map(|p| load_table(p.as_ref(), None))
        .collect::<Result<Vec<Table>>>()?;
    plan_from_tables(config, &rooms, &rolls, on_room)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::csv::{parse_delimited, Delimiter};
    use crate::error::SeatplanError;
    use crate::types::{RollNumber, Seat};

    const ROOMS: &[u8] = b"Room Number,Number of Rows,Number of Bench,Number of Student per Bench,Left Name,Middle Name,Right Name\n\
        101,2,2,2,CSE,ECE,\n\
        102,1,2,2,,,\n";

    fn rolls(range: std::ops::RangeInclusive<i64>) -> Table {
        let mut csv = String::from("Roll Number\n");
        for n in range {
            csv.push_str(&format!("{n}\n"));
        }
        parse_delimited(csv.as_bytes(), Delimiter::Comma)
    }

    fn rooms() -> Table {
        parse_delimited(ROOMS, Delimiter::Comma)
    }

    #[test]
    fn test_plan_reports_progress_per_room() {
        let mut seen = Vec::new();
        let plan = plan_from_tables(
            &SeatplanConfig::default(),
            &rooms(),
            &[rolls(1..=6), rolls(101..=106)],
            |outcome, done, total| seen.push((outcome.assignment.room_id.clone(), done, total)),
        )
        .unwrap();

        assert_eq!(seen, vec![("101".to_string(), 1, 2), ("102".to_string(), 2, 2)]);
        assert_eq!(plan.outcomes.len(), 2);
        assert_eq!(plan.outcomes[1].progress, 1.0);
        assert!(plan.supply.is_sufficient());
        assert_eq!(
            plan.outcomes[1].assignment.get(1, 0, 1),
            Some(&Seat::Assigned(RollNumber::Integer(106)))
        );
    }

    #[test]
    fn test_shortfall_tolerated_unless_strict() {
        let mut config = SeatplanConfig::default();
        let plan =
            plan_from_tables(&config, &rooms(), &[rolls(1..=6), rolls(101..=103)], |_, _, _| {})
                .unwrap();
        assert_eq!(plan.supply.positions[1].shortfall(), 3);
        assert_eq!(plan.outcomes[1].roster.count_for(1), 0);

        config.strict_supply = true;
        let err = plan_from_tables(&config, &rooms(), &[rolls(1..=6), rolls(101..=103)], |_, _, _| {})
            .unwrap_err();
        assert!(matches!(
            err,
            SeatplanError::SupplyShortfall {
                position: 1,
                demand: 6,
                available: 3
            }
        ));
    }

    #[test]
    fn test_pool_count_mismatch_aborts_before_any_room() {
        let mut calls = 0;
        let err = plan_from_tables(&SeatplanConfig::default(), &rooms(), &[rolls(1..=6)], |_, _, _| {
            calls += 1;
        })
        .unwrap_err();
        assert!(matches!(err, SeatplanError::Configuration(_)));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_oversized_room_is_rejected_before_seating() {
        let rooms = parse_delimited(
            b"Room Number,Number of Rows,Number of Bench,Number of Student per Bench,Left Name,Middle Name,Right Name\n\
              1,4294967296,4294967296,1,,,\n",
            Delimiter::Comma,
        );
        let mut calls = 0;
        let err = plan_from_tables(&SeatplanConfig::default(), &rooms, &[rolls(1..=2)], |_, _, _| {
            calls += 1;
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SeatplanError::Coercion {
                reason: "room too large",
                ..
            }
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_render_plan() {
        let config = SeatplanConfig::default();
        let plan =
            plan_from_tables(&config, &rooms(), &[rolls(1..=6), rolls(101..=106)], |_, _, _| {})
                .unwrap();
        let workbook = plan.render(&config).unwrap();
        assert_eq!(workbook.len(), 4);
        assert!(workbook.sheet("Attendance - Room 102").is_some());
    }
}
