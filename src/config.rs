//! Run configuration.
//!
//! Every field has a default matching the usual room/roll spreadsheet
//! layout, so an empty JSON object is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeatplanError};

/// Header names of the room table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomColumns {
    pub room_id: String,
    pub rows: String,
    pub benches: String,
    pub seats_per_bench: String,
    /// One display-name column per seat position, in position order.
    pub position_names: Vec<String>,
}

impl Default for RoomColumns {
    fn default() -> Self {
        Self {
            room_id: "Room Number".to_string(),
            rows: "Number of Rows".to_string(),
            benches: "Number of Bench".to_string(),
            seats_per_bench: "Number of Student per Bench".to_string(),
            position_names: vec![
                "Left Name".to_string(),
                "Middle Name".to_string(),
                "Right Name".to_string(),
            ],
        }
    }
}

impl RoomColumns {
    /// Every column the room table must contain.
    #[must_use]
    pub fn required(&self) -> Vec<&str> {
        let mut cols = vec![
            self.room_id.as_str(),
            self.rows.as_str(),
            self.benches.as_str(),
            self.seats_per_bench.as_str(),
        ];
        cols.extend(self.position_names.iter().map(String::as_str));
        cols
    }
}

/// Which sheets the workbook gets for each room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputLayout {
    /// Seating grid followed by a sectioned attendance roster.
    #[default]
    GridWithRoster,
    /// Seating grid only.
    GridOnly,
    /// Flat attendance roster only.
    AttendanceOnly,
}

/// Settings for one end-to-end run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeatplanConfig {
    pub room_columns: RoomColumns,
    pub roll_column: String,
    /// Short per-position codes used in sheet headers.
    pub seat_codes: Vec<String>,
    pub layout: OutputLayout,
    pub output: PathBuf,
    /// Refuse to run when any position's pool is shorter than its demand.
    pub strict_supply: bool,
}

impl Default for SeatplanConfig {
    fn default() -> Self {
        Self {
            room_columns: RoomColumns::default(),
            roll_column: "Roll Number".to_string(),
            seat_codes: vec!["F-1".to_string(), "S-1".to_string(), "T-1".to_string()],
            layout: OutputLayout::default(),
            output: PathBuf::from("SeatingChart_Output.xlsx"),
            strict_supply: false,
        }
    }
}

impl SeatplanConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject configurations no input could satisfy.
    pub fn validate(&self) -> Result<()> {
        let blank_column = self
            .room_columns
            .required()
            .into_iter()
            .chain(std::iter::once(self.roll_column.as_str()))
            .any(|c| c.trim().is_empty());
        if blank_column {
            return Err(SeatplanError::Configuration(
                "column names must not be empty".to_string(),
            ));
        }
        if self.room_columns.position_names.is_empty() {
            return Err(SeatplanError::Configuration(
                "at least one position name column is required".to_string(),
            ));
        }
        if self.seat_codes.is_empty() {
            return Err(SeatplanError::Configuration(
                "at least one seat code is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that every seat position has a seat code.
    pub fn check_seat_codes(&self, seats_per_bench: usize) -> Result<()> {
        if self.seat_codes.len() < seats_per_bench {
            return Err(SeatplanError::Configuration(format!(
                "{seats_per_bench} seat position(s) per bench but only {} seat code(s) configured",
                self.seat_codes.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = SeatplanConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SeatplanConfig::default());
        assert_eq!(config.room_columns.required().len(), 7);
    }

    #[test]
    fn test_partial_override() {
        let config = SeatplanConfig::from_json_str(
            r#"{
                "rollColumn": "Roll No",
                "seatCodes": ["L", "R"],
                "layout": "attendanceOnly",
                "roomColumns": { "positionNames": ["Left", "Right"] },
                "strictSupply": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.roll_column, "Roll No");
        assert_eq!(config.layout, OutputLayout::AttendanceOnly);
        assert_eq!(config.room_columns.room_id, "Room Number");
        assert_eq!(config.room_columns.position_names, vec!["Left", "Right"]);
        assert!(config.strict_supply);
    }

    #[test]
    fn test_validation_rejects_empty_seat_codes() {
        let err = SeatplanConfig::from_json_str(r#"{ "seatCodes": [] }"#).unwrap_err();
        assert!(matches!(err, SeatplanError::Configuration(_)));
    }

    #[test]
    fn test_validation_rejects_blank_column() {
        let err = SeatplanConfig::from_json_str(r#"{ "rollColumn": "  " }"#).unwrap_err();
        assert!(matches!(err, SeatplanError::Configuration(_)));
    }

    #[test]
    fn test_unknown_layout_is_json_error() {
        let err = SeatplanConfig::from_json_str(r#"{ "layout": "poster" }"#).unwrap_err();
        assert!(matches!(err, SeatplanError::Json(_)));
    }

    #[test]
    fn test_check_seat_codes() {
        let config = SeatplanConfig::default();
        assert!(config.check_seat_codes(3).is_ok());
        assert!(config.check_seat_codes(4).is_err());
    }
}
