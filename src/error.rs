//! Structured error types for seatplan.
//!
//! Construction-time failures (schema, coercion, configuration) abort a run
//! before the engine produces any output. Supply shortfall is not an error
//! unless the caller asks for the strict check.

/// All errors that can occur while reading inputs, building the catalog,
/// running the engine or writing the workbook.
#[derive(Debug, thiserror::Error)]
pub enum SeatplanError {
    /// A required column or field is absent.
    #[error("missing required field(s) in {context}: {}", .missing.join(", "))]
    Schema {
        /// Where the fields were expected (file, table or row).
        context: String,
        /// Every missing field name.
        missing: Vec<String>,
    },

    /// A field could not be coerced to its expected type.
    #[error("row {row}: field '{field}' has invalid value '{value}': {reason}")]
    Coercion {
        /// 1-based data row number.
        row: usize,
        field: String,
        value: String,
        reason: &'static str,
    },

    /// Structural mismatch between catalog, pools and labels.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Raised only by the opt-in strict supply check.
    #[error("position {position}: {available} roll number(s) available for {demand} seat(s)")]
    SupplyShortfall {
        position: usize,
        demand: usize,
        available: usize,
    },

    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON (config or summary) error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed input document.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input file extension not recognised.
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SeatplanError>;

impl SeatplanError {
    pub(crate) fn schema(context: impl Into<String>, missing: Vec<String>) -> Self {
        Self::Schema {
            context: context.into(),
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_message_lists_all_fields() {
        let err = SeatplanError::schema(
            "room table",
            vec!["Room Number".to_string(), "Number of Bench".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "missing required field(s) in room table: Room Number, Number of Bench"
        );
    }

    #[test]
    fn test_coercion_message() {
        let err = SeatplanError::Coercion {
            row: 3,
            field: "Number of Rows".to_string(),
            value: "0".to_string(),
            reason: "must be a positive integer",
        };
        assert_eq!(
            err.to_string(),
            "row 3: field 'Number of Rows' has invalid value '0': must be a positive integer"
        );
    }
}
