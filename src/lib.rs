//! seatplan - exam seating charts and attendance sheets
//!
//! Reads a room table and one roll-number list per seat position, seats the
//! lists room by room, and writes the result as an XLSX workbook:
//! - Room catalog with per-room rows, benches and position names
//! - Deterministic bench-major, row-fastest seat filling across rooms
//! - Seating grid and attendance roster sheets per room
//! - XLSX and CSV/TSV input, XLSX output
//!
//! # Usage
//!
//! ```
//! use seatplan::csv::{parse_delimited, Delimiter};
//! use seatplan::{export, pipeline, SeatplanConfig};
//!
//! let mut config = SeatplanConfig::default();
//! config.room_columns.position_names = vec!["Left Name".into()];
//!
//! let rooms = parse_delimited(
//!     b"Room Number,Number of Rows,Number of Bench,Number of Student per Bench,Left Name\n\
//!       101,2,2,1,CSE\n",
//!     Delimiter::Comma,
//! );
//! let rolls = parse_delimited(b"Roll Number\n1\n2\n3\n", Delimiter::Comma);
//!
//! let plan = pipeline::plan_from_tables(&config, &rooms, &[rolls], |_, _, _| {})?;
//! assert_eq!(plan.outcomes[0].roster.len(), 3);
//!
//! let bytes = export::write_xlsx(&plan.render(&config)?)?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), seatplan::SeatplanError>(())
//! ```

// Input
pub mod cell_ref;
pub mod csv;
pub mod input;
pub mod parser;
pub mod xml_helpers;

// Seating
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;

// Output
pub mod export;
pub mod layout;

pub use config::{OutputLayout, RoomColumns, SeatplanConfig};
pub use engine::{supply_report, PositionSupply, RoomOutcome, SeatingEngine, SupplyReport};
pub use error::{Result, SeatplanError};
pub use types::*;
