//! Seat assignment engine.
//!
//! Maps each position's flat roll-number sequence onto the bench/row grid of
//! every room, in catalog order. Within a room, positions are filled in index
//! order; for each position benches are filled in order and, inside a bench,
//! rows are the fastest-varying axis. Pool cursors carry over from one room
//! to the next, so a list spanning several rooms is consumed contiguously.
//!
//! Exhausted pools leave slots [`Seat::Unassigned`] and add no roster line.
//! Leftover entries are never pulled. Neither case is an error here; use
//! [`supply_report`] to check supply before running.

use std::iter::FusedIterator;

use serde::Serialize;

use crate::error::{Result, SeatplanError};
use crate::types::{
    AttendanceRoster, RollPool, RoomAssignment, RoomCatalog, RoomRecord, Seat, SlotIndex,
};

/// Everything produced for one room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomOutcome {
    pub assignment: RoomAssignment,
    pub roster: AttendanceRoster,
    /// `rooms completed / total rooms` after this room; exactly 1.0 for the last.
    pub progress: f64,
}

/// A validated pairing of a catalog with one pool per seat position.
#[derive(Debug)]
pub struct SeatingEngine<'a> {
    catalog: &'a RoomCatalog,
    pools: &'a mut [RollPool],
}

impl<'a> SeatingEngine<'a> {
    /// Check that there is exactly one pool per seat position.
    ///
    /// The check runs once, before any room is processed. An empty catalog
    /// accepts any pools since nothing will be pulled.
    pub fn new(catalog: &'a RoomCatalog, pools: &'a mut [RollPool]) -> Result<Self> {
        let expected = catalog.seats_per_bench();
        if !catalog.is_empty() && pools.len() != expected {
            return Err(SeatplanError::Configuration(format!(
                "{expected} seat position(s) per bench but {} roll-number pool(s) supplied",
                pools.len()
            )));
        }
        Ok(Self { catalog, pools })
    }

    /// Start the run. The returned iterator yields one [`RoomOutcome`] per
    /// room, lazily; dropping it early leaves already-pulled entries consumed.
    #[must_use]
    pub fn run(self) -> Run<'a> {
        Run {
            rooms: self.catalog.rooms(),
            seats_per_bench: self.catalog.seats_per_bench(),
            pools: self.pools,
            next: 0,
        }
    }

    /// Run to completion and collect every room's outcome.
    #[must_use]
    pub fn run_to_end(self) -> Vec<RoomOutcome> {
        self.run().collect()
    }
}

/// Lazy, finite, non-restartable sequence of room outcomes.
#[derive(Debug)]
pub struct Run<'a> {
    rooms: &'a [RoomRecord],
    seats_per_bench: usize,
    pools: &'a mut [RollPool],
    next: usize,
}

impl Run<'_> {
    /// Rooms processed so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.next
    }

    /// Rooms in the catalog.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rooms.len()
    }
}

impl Iterator for Run<'_> {
    type Item = RoomOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        let room = self.rooms.get(self.next)?;
        let (assignment, roster) = seat_room(room, self.seats_per_bench, self.pools);
        self.next += 1;

        #[allow(clippy::cast_precision_loss)]
        let progress = self.next as f64 / self.rooms.len() as f64;

        log::debug!(
            "room {} seated: {} of {} slot(s) assigned, progress {:.3}",
            room.room_id,
            roster.len(),
            assignment.len(),
            progress
        );

        Some(RoomOutcome {
            assignment,
            roster,
            progress,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.rooms.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Run<'_> {}

impl FusedIterator for Run<'_> {}

/// Fill one room: position-major, then bench, then row.
fn seat_room(
    room: &RoomRecord,
    seats_per_bench: usize,
    pools: &mut [RollPool],
) -> (RoomAssignment, AttendanceRoster) {
    let mut assignment = RoomAssignment::new(
        room.room_id.clone(),
        room.bench_count,
        room.row_count,
        seats_per_bench,
    );
    let mut roster = AttendanceRoster::new(room.room_id.clone());

    for (position, pool) in pools.iter_mut().enumerate().take(seats_per_bench) {
        for bench in 0..room.bench_count {
            for row in 0..room.row_count {
                // Exhausted: the slot stays unassigned.
                let Some(roll) = pool.pull() else {
                    continue;
                };
                roster.record(position, roll.clone());
                assignment.set(
                    SlotIndex {
                        bench,
                        row,
                        position,
                    },
                    Seat::Assigned(roll),
                );
            }
        }
    }

    (assignment, roster)
}

/// Demand versus supply for one seat position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionSupply {
    pub position: usize,
    /// Slots this position must fill across the whole catalog.
    pub demand: usize,
    /// Entries left in the position's pool.
    pub available: usize,
}

impl PositionSupply {
    /// Slots that will be left unassigned.
    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.demand.saturating_sub(self.available)
    }

    /// Entries that will never be pulled.
    #[must_use]
    pub fn surplus(&self) -> usize {
        self.available.saturating_sub(self.demand)
    }
}

/// Supply check across all positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyReport {
    pub positions: Vec<PositionSupply>,
}

impl SupplyReport {
    /// `true` when no position is short.
    #[must_use]
    pub fn is_sufficient(&self) -> bool {
        self.positions.iter().all(|p| p.shortfall() == 0)
    }

    /// Fail on the first position whose pool cannot cover its demand.
    pub fn ensure_sufficient(&self) -> Result<()> {
        match self.positions.iter().find(|p| p.shortfall() > 0) {
            Some(p) => Err(SeatplanError::SupplyShortfall {
                position: p.position,
                demand: p.demand,
                available: p.available,
            }),
            None => Ok(()),
        }
    }
}

/// Compare each pool's remaining entries with the catalog's demand.
///
/// Advisory only: the engine tolerates shortfall and surplus.
#[must_use]
pub fn supply_report(catalog: &RoomCatalog, pools: &[RollPool]) -> SupplyReport {
    let demand = catalog.demand_per_position();
    SupplyReport {
        positions: pools
            .iter()
            .enumerate()
            .map(|(position, pool)| PositionSupply {
                position,
                demand,
                available: pool.peek_remaining(),
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{CellValue, RawRoomRow, RollNumber};

    fn catalog(rooms: &[(&str, usize, usize)], seats: usize) -> RoomCatalog {
        let rows: Vec<RawRoomRow> = rooms
            .iter()
            .map(|(id, benches, rows)| RawRoomRow {
                room_id: CellValue::text(id),
                row_count: Some(CellValue::Number(*rows as f64)),
                bench_count: Some(CellValue::Number(*benches as f64)),
                seats_per_bench: Some(CellValue::Number(seats as f64)),
                position_names: vec![None; seats],
                field_names: None,
            })
            .collect();
        RoomCatalog::build(&rows).unwrap()
    }

    fn roll(s: &str) -> Option<RollNumber> {
        Some(RollNumber::from(s))
    }

    #[test]
    fn test_shortfall_scenario() {
        let catalog = catalog(&[("R1", 2, 2)], 2);
        let mut pools = vec![
            RollPool::from_values(["A1", "A2", "A3"]),
            RollPool::from_values(["B1"]),
        ];
        let outcomes = SeatingEngine::new(&catalog, &mut pools).unwrap().run_to_end();
        assert_eq!(outcomes.len(), 1);
        let grid = &outcomes[0].assignment;

        let at = |b, r, p| grid.get(b, r, p).unwrap().roll_number().map(ToString::to_string);
        assert_eq!(at(0, 0, 0).as_deref(), Some("A1"));
        assert_eq!(at(0, 1, 0).as_deref(), Some("A2"));
        assert_eq!(at(1, 0, 0).as_deref(), Some("A3"));
        assert_eq!(at(1, 1, 0), None);
        assert_eq!(at(0, 0, 1).as_deref(), Some("B1"));
        assert_eq!(at(0, 1, 1), None);
        assert_eq!(at(1, 0, 1), None);
        assert_eq!(at(1, 1, 1), None);

        let roster = &outcomes[0].roster;
        let p0: Vec<(usize, String)> = roster
            .for_position(0)
            .map(|e| (e.serial, e.roll_number.to_string()))
            .collect();
        assert_eq!(
            p0,
            vec![(1, "A1".into()), (2, "A2".into()), (3, "A3".into())]
        );
        let p1: Vec<(usize, String)> = roster
            .for_position(1)
            .map(|e| (e.serial, e.roll_number.to_string()))
            .collect();
        assert_eq!(p1, vec![(1, "B1".into())]);
        assert_eq!(outcomes[0].progress, 1.0);
    }

    #[test]
    fn test_cursor_carries_across_rooms() {
        let catalog = catalog(&[("R1", 2, 2), ("R2", 2, 2)], 1);
        let mut pools = vec![RollPool::from_values(1..=8_i64)];
        let outcomes = SeatingEngine::new(&catalog, &mut pools).unwrap().run_to_end();

        let second: Vec<String> = outcomes[1]
            .roster
            .entries()
            .iter()
            .map(|e| e.roll_number.to_string())
            .collect();
        assert_eq!(second, vec!["5", "6", "7", "8"]);
        assert_eq!(outcomes[1].roster.entries()[0].serial, 1);
        assert!(outcomes
            .iter()
            .all(|o| o.assignment.slots().all(|(_, s)| s.is_assigned())));
        assert!(pools[0].is_exhausted());
    }

    #[test]
    fn test_surplus_is_left_in_pool() {
        let catalog = catalog(&[("R1", 1, 2)], 1);
        let mut pools = vec![RollPool::build(vec![roll("a"), roll("b"), roll("c")])];
        let outcomes = SeatingEngine::new(&catalog, &mut pools).unwrap().run_to_end();
        assert_eq!(outcomes[0].roster.len(), 2);
        assert_eq!(pools[0].peek_remaining(), 1);
    }

    #[test]
    fn test_empty_catalog_yields_nothing() {
        let catalog = catalog(&[], 2);
        let mut pools: Vec<RollPool> = Vec::new();
        let mut run = SeatingEngine::new(&catalog, &mut pools).unwrap().run();
        assert_eq!(run.len(), 0);
        assert!(run.next().is_none());
    }

    #[test]
    fn test_pool_count_mismatch_is_configuration_error() {
        let catalog = catalog(&[("R1", 1, 1)], 2);
        let mut pools = vec![RollPool::from_values(["x"])];
        let err = SeatingEngine::new(&catalog, &mut pools).unwrap_err();
        assert!(matches!(err, SeatplanError::Configuration(_)));
        assert_eq!(pools[0].cursor(), 0);
    }

    #[test]
    fn test_progress_is_monotonic_and_ends_at_one() {
        let catalog = catalog(&[("A", 1, 1), ("B", 1, 1), ("C", 1, 1)], 1);
        let mut pools = vec![RollPool::default()];
        let mut run = SeatingEngine::new(&catalog, &mut pools).unwrap().run();
        assert_eq!(run.total(), 3);
        let first = run.next().unwrap();
        assert_eq!(run.completed(), 1);
        assert_eq!(run.len(), 2);
        let rest: Vec<f64> = run.map(|o| o.progress).collect();
        assert!(first.progress < rest[0] && rest[0] < rest[1]);
        assert_eq!(rest[1], 1.0);
    }

    #[test]
    fn test_abandoned_run_keeps_pulled_entries_consumed() {
        let catalog = catalog(&[("A", 1, 2), ("B", 1, 2)], 1);
        let mut pools = vec![RollPool::from_values(["1", "2", "3", "4"])];
        {
            let mut run = SeatingEngine::new(&catalog, &mut pools).unwrap().run();
            let _ = run.next();
        }
        assert_eq!(pools[0].cursor(), 2);
    }

    #[test]
    fn test_supply_report() {
        let catalog = catalog(&[("A", 2, 2), ("B", 1, 2)], 2);
        let pools = vec![
            RollPool::from_values(1..=10_i64),
            RollPool::from_values(1..=4_i64),
        ];
        let report = supply_report(&catalog, &pools);
        assert_eq!(report.positions[0].demand, 6);
        assert_eq!(report.positions[0].surplus(), 4);
        assert_eq!(report.positions[1].shortfall(), 2);
        assert!(!report.is_sufficient());
        match report.ensure_sufficient().unwrap_err() {
            SeatplanError::SupplyShortfall {
                position,
                demand,
                available,
            } => assert_eq!((position, demand, available), (1, 6, 4)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
