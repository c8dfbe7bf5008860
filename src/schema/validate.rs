use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use crate::schema::columns::{Column, COLUMN_COUNT};

/// Number of ordering mismatches quoted in a diagnostic.
const MAX_REPORTED_MISMATCHES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionMismatch {
    /// One-based column position.
    pub position: usize,
    pub expected: String,
    pub found: String,
}

impl Display for PositionMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Position {}: Expected '{}', found '{}'",
            self.position, self.expected, self.found
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Expected {expected} columns, but found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("Missing columns: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("Column order issues: {}", format_mismatches(.0))]
    ColumnOrder(Vec<PositionMismatch>),
}

fn format_mismatches(mismatches: &[PositionMismatch]) -> String {
    let quoted = mismatches
        .iter()
        .map(|m| format!("\"{m}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{quoted}]")
}

/// Checks an uploaded header row against the template: count first, then
/// missing names, then position-by-position order.
pub fn validate_columns<S: AsRef<str>>(headers: &[S]) -> Result<(), SchemaError> {
    if headers.len() != COLUMN_COUNT {
        return Err(SchemaError::ColumnCount {
            expected: COLUMN_COUNT,
            found: headers.len(),
        });
    }

    let found: Vec<&str> = headers.iter().map(|h| h.as_ref()).collect();

    let missing = Column::headers()
        .filter(|expected| !found.contains(expected))
        .map(str::to_string)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns(missing));
    }

    let mismatches = Column::headers()
        .zip(found.iter().copied())
        .enumerate()
        .filter(|(_, (expected, actual))| expected != actual)
        .take(MAX_REPORTED_MISMATCHES)
        .map(|(idx, (expected, actual))| PositionMismatch {
            position: idx + 1,
            expected: expected.to_string(),
            found: actual.to_string(),
        })
        .collect::<Vec<_>>();
    if !mismatches.is_empty() {
        return Err(SchemaError::ColumnOrder(mismatches));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Vec<String> {
        Column::headers().map(str::to_string).collect()
    }

    #[test]
    fn accepts_exact_template() {
        assert!(validate_columns(&template()).is_ok());
    }

    #[test]
    fn rejects_short_header_citing_expected_count() {
        let mut headers = template();
        headers.pop();
        let err = validate_columns(&headers).expect_err("62 columns must fail");
        assert_eq!(
            err,
            SchemaError::ColumnCount {
                expected: 63,
                found: 62
            }
        );
        assert_eq!(err.to_string(), "Expected 63 columns, but found 62");
    }

    #[test]
    fn rejects_swapped_columns_citing_first_position() {
        let mut headers = template();
        headers.swap(2, 5);
        let err = validate_columns(&headers).expect_err("swap must fail");
        let SchemaError::ColumnOrder(mismatches) = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(mismatches.len(), 2);
        assert_eq!(mismatches[0].position, 3);
        assert_eq!(mismatches[0].expected, "MEGA_BAG_LOT_NO_BAG");
        assert_eq!(mismatches[0].found, "EXPORT_MINE_LOADING_MONTH_BAG");
        assert_eq!(mismatches[1].position, 6);
        assert!(err
            .to_string()
            .starts_with("Column order issues: [\"Position 3: Expected 'MEGA_BAG_LOT_NO_BAG'"));
    }

    #[test]
    fn reports_renamed_column_as_missing() {
        let mut headers = template();
        headers[10] = "TRUCK_LOADING_POINT".to_string();
        let err = validate_columns(&headers).expect_err("rename must fail");
        assert_eq!(
            err,
            SchemaError::MissingColumns(vec!["TRUCK_LOADING_POINT_BAG_MIRROR".to_string()])
        );
    }

    #[test]
    fn caps_reported_mismatches() {
        let mut headers = template();
        headers.reverse();
        let err = validate_columns(&headers).expect_err("reversed must fail");
        let SchemaError::ColumnOrder(mismatches) = err else {
            panic!("expected order error");
        };
        assert_eq!(mismatches.len(), MAX_REPORTED_MISMATCHES);
        assert_eq!(mismatches[0].position, 1);
    }
}
