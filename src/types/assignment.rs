use serde::{Deserialize, Serialize};

use super::pool::RollNumber;

/// Content of one seat slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seat {
    Assigned(RollNumber),
    /// The position's pool was exhausted before this slot was reached.
    Unassigned,
}

impl Seat {
    #[must_use]
    pub fn roll_number(&self) -> Option<&RollNumber> {
        match self {
            Self::Assigned(roll) => Some(roll),
            Self::Unassigned => None,
        }
    }

    #[must_use]
    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

/// Location of a slot inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotIndex {
    pub bench: usize,
    pub row: usize,
    pub position: usize,
}

/// Seat grid of one room.
///
/// Dense storage: every `(bench, row, position)` in range holds a [`Seat`],
/// so there are no missing keys. Built only by the engine, from catalog
/// rooms whose seat count is bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAssignment {
    pub room_id: String,
    bench_count: usize,
    row_count: usize,
    seats_per_bench: usize,
    /// Indexed by `(bench * row_count + row) * seats_per_bench + position`.
    seats: Vec<Seat>,
}

impl RoomAssignment {
    /// A grid with every slot unassigned.
    #[must_use]
    pub(crate) fn new(
        room_id: impl Into<String>,
        bench_count: usize,
        row_count: usize,
        seats_per_bench: usize,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            bench_count,
            row_count,
            seats_per_bench,
            seats: vec![
                Seat::Unassigned;
                bench_count
                    .saturating_mul(row_count)
                    .saturating_mul(seats_per_bench)
            ],
        }
    }

    fn offset(&self, bench: usize, row: usize, position: usize) -> Option<usize> {
        if bench >= self.bench_count || row >= self.row_count || position >= self.seats_per_bench
        {
            return None;
        }
        Some((bench * self.row_count + row) * self.seats_per_bench + position)
    }

    /// Seat at `(bench, row, position)`, `None` only when out of range.
    #[must_use]
    pub fn get(&self, bench: usize, row: usize, position: usize) -> Option<&Seat> {
        self.seats.get(self.offset(bench, row, position)?)
    }

    /// Store a seat. Returns `false` when the index is out of range.
    pub fn set(&mut self, index: SlotIndex, seat: Seat) -> bool {
        let slot = self
            .offset(index.bench, index.row, index.position)
            .and_then(|offset| self.seats.get_mut(offset));
        match slot {
            Some(slot) => {
                *slot = seat;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn bench_count(&self) -> usize {
        self.bench_count
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn seats_per_bench(&self) -> usize {
        self.seats_per_bench
    }

    /// Number of slots (`bench_count × row_count × seats_per_bench`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Every slot with its index, bench-major, then row, then position.
    pub fn slots(&self) -> impl Iterator<Item = (SlotIndex, &Seat)> + '_ {
        let rows = self.row_count;
        let seats = self.seats_per_bench;
        self.seats.iter().enumerate().map(move |(offset, seat)| {
            let position = offset % seats;
            let row = (offset / seats) % rows;
            let bench = offset / (seats * rows);
            (
                SlotIndex {
                    bench,
                    row,
                    position,
                },
                seat,
            )
        })
    }

    /// Number of slots holding a roll number for `position`.
    #[must_use]
    pub fn assigned_count(&self, position: usize) -> usize {
        self.slots()
            .filter(|(idx, seat)| idx.position == position && seat.is_assigned())
            .count()
    }
}

/// One attendance line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEntry {
    pub position: usize,
    /// 1-based, restarting for each position within a room.
    pub serial: usize,
    pub roll_number: RollNumber,
}

/// Attendance roster of one room, grouped by position in position order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRoster {
    pub room_id: String,
    entries: Vec<AttendanceEntry>,
    /// Entries recorded so far, per position.
    #[serde(skip)]
    counts: Vec<usize>,
}

impl AttendanceRoster {
    #[must_use]
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            entries: Vec::new(),
            counts: Vec::new(),
        }
    }

    /// Append a roll number for `position` and return its serial.
    pub fn record(&mut self, position: usize, roll_number: RollNumber) -> usize {
        if self.counts.len() <= position {
            self.counts.resize(position + 1, 0);
        }
        let serial = match self.counts.get_mut(position) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => 1,
        };
        self.entries.push(AttendanceEntry {
            position,
            serial,
            roll_number,
        });
        serial
    }

    #[must_use]
    pub fn entries(&self) -> &[AttendanceEntry] {
        &self.entries
    }

    /// Entries of one position, in serial order.
    pub fn for_position(&self, position: usize) -> impl Iterator<Item = &AttendanceEntry> + '_ {
        self.entries.iter().filter(move |e| e.position == position)
    }

    #[must_use]
    pub fn count_for(&self, position: usize) -> usize {
        self.counts.get(position).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_fully_unassigned() {
        let grid = RoomAssignment::new("R1", 3, 2, 2);
        assert_eq!(grid.len(), 12);
        assert!(grid.slots().all(|(_, seat)| *seat == Seat::Unassigned));
        assert_eq!(grid.get(2, 1, 1), Some(&Seat::Unassigned));
        assert_eq!(grid.get(3, 0, 0), None);
        assert_eq!(grid.get(0, 2, 0), None);
        assert_eq!(grid.get(0, 0, 2), None);
    }

    #[test]
    fn test_slots_enumerate_bench_row_position() {
        let grid = RoomAssignment::new("R1", 2, 2, 2);
        let order: Vec<(usize, usize, usize)> = grid
            .slots()
            .map(|(i, _)| (i.bench, i.row, i.position))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, 0, 0),
                (0, 0, 1),
                (0, 1, 0),
                (0, 1, 1),
                (1, 0, 0),
                (1, 0, 1),
                (1, 1, 0),
                (1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = RoomAssignment::new("R1", 2, 3, 1);
        let idx = SlotIndex {
            bench: 1,
            row: 2,
            position: 0,
        };
        assert!(grid.set(idx, Seat::Assigned(RollNumber::from(9))));
        assert_eq!(
            grid.get(1, 2, 0).and_then(Seat::roll_number),
            Some(&RollNumber::Integer(9))
        );
        assert_eq!(grid.assigned_count(0), 1);
        assert!(!grid.set(
            SlotIndex {
                bench: 2,
                row: 0,
                position: 0
            },
            Seat::Unassigned
        ));
    }

    #[test]
    fn test_roster_serials_restart_per_position() {
        let mut roster = AttendanceRoster::new("R1");
        assert_eq!(roster.record(0, RollNumber::from("a")), 1);
        assert_eq!(roster.record(0, RollNumber::from("b")), 2);
        assert_eq!(roster.record(1, RollNumber::from("c")), 1);
        let serials: Vec<usize> = roster.for_position(0).map(|e| e.serial).collect();
        assert_eq!(serials, vec![1, 2]);
        assert_eq!(roster.count_for(1), 1);
        assert_eq!(roster.count_for(5), 0);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn test_roster_counts_follow_interleaved_positions() {
        let mut roster = AttendanceRoster::new("R1");
        for n in 0..1000_i64 {
            roster.record(2, RollNumber::from(n));
        }
        assert_eq!(roster.record(0, RollNumber::from("x")), 1);
        assert_eq!(roster.record(2, RollNumber::from("y")), 1001);
        assert_eq!(roster.count_for(1), 0);
        assert_eq!(roster.count_for(2), roster.for_position(2).count());
    }

    #[test]
    fn test_unassigned_serializes_as_null() {
        let json = serde_json::to_string(&[Seat::Assigned(RollNumber::from(5)), Seat::Unassigned])
            .unwrap();
        assert_eq!(json, "[5,null]");
    }
}
