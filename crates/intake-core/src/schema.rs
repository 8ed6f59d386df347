//! Table schema — the canonical layout of the request table.
//!
//! [`TableLayout::requests`] is what a freshly provisioned store gets: the
//! header row, cosmetic header styling and column widths, one frozen row, and
//! the allowed-value rules on the staff columns. Backends persist the layout
//! next to the table and call [`TableLayout::check_row`] on every append.

use crate::types::Column;
use serde::{Deserialize, Serialize};

/// Name of the table inside a provisioned store.
pub const REQUESTS_TABLE: &str = "Requests";

pub const PRIORITY_VALUES: [&str; 4] = ["Low", "Medium", "High", "Urgent"];

pub const DEPARTMENT_VALUES: [&str; 6] = [
    "Sales",
    "Customer Service",
    "Technical Support",
    "Billing",
    "Gunsmithing",
    "Other",
];

pub const STATUS_VALUES: [&str; 5] = [
    "New",
    "In Progress",
    "Waiting on Customer",
    "Resolved",
    "Closed",
];

/// First and last 1-based row covered by the validation rules. Row 1 is the
/// header; rows past the ceiling are not checked.
pub const VALIDATED_ROWS: RowRange = RowRange { first: 2, last: 1000 };

const COLUMN_WIDTHS: [u16; Column::COUNT] = [
    160, 150, 200, 130, 150, 180, 160, 120, 100, 120, 140, 130, 130, 150, 100, 200, 300, 140, 250,
    100, 140, 100, 130, 250,
];

// ---------------------------------------------------------------------------
// Layout types
// ---------------------------------------------------------------------------

/// Everything a backend needs to provision and police one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    pub table_name: String,
    pub headers: Vec<String>,
    pub header_style: HeaderStyle,
    /// Display widths in pixels, one per header. Cosmetic.
    pub column_widths: Vec<u16>,
    pub frozen_rows: u32,
    pub validations: Vec<ValidationRule>,
}

/// Cosmetic styling of the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderStyle {
    pub bold: bool,
    pub background: String,
    pub font_color: String,
    pub font_family: String,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            bold: true,
            background: "#1a2a3a".to_string(),
            font_color: "#ffffff".to_string(),
            font_family: "Arial".to_string(),
        }
    }
}

/// Inclusive range of 1-based row numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub first: u64,
    pub last: u64,
}

impl RowRange {
    pub fn contains(&self, row: u64) -> bool {
        (self.first..=self.last).contains(&row)
    }
}

/// Allowed-value list on one column.
///
/// With `allow_invalid` the rule is advisory (a violation is reported but the
/// write goes through); without it, the write is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub column: Column,
    pub allowed: Vec<String>,
    pub allow_invalid: bool,
    pub rows: RowRange,
}

impl ValidationRule {
    fn new(column: Column, allowed: &[&str], allow_invalid: bool) -> Self {
        Self {
            column,
            allowed: allowed.iter().map(|v| v.to_string()).collect(),
            allow_invalid,
            rows: VALIDATED_ROWS,
        }
    }

    /// Empty cells always pass.
    pub fn accepts(&self, value: &str) -> bool {
        value.is_empty() || self.allowed.iter().any(|v| v == value)
    }
}

/// A cell that failed a [`ValidationRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub column: Column,
    pub row: u64,
    pub value: String,
    pub allowed: Vec<String>,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} is not an allowed {} (row {}); expected one of: {}",
            self.value,
            self.column,
            self.row,
            self.allowed.join(", ")
        )
    }
}

/// Why a row may not be written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowRejection {
    #[error("row has {actual} cells but the table has {expected} columns")]
    Width { expected: usize, actual: usize },
    #[error("{0}")]
    Invalid(Violation),
}

// ---------------------------------------------------------------------------
// Canonical layout
// ---------------------------------------------------------------------------

impl TableLayout {
    /// Layout of the `Requests` table.
    pub fn requests() -> Self {
        Self {
            table_name: REQUESTS_TABLE.to_string(),
            headers: Column::ALL.iter().map(|c| c.header().to_string()).collect(),
            header_style: HeaderStyle::default(),
            column_widths: COLUMN_WIDTHS.to_vec(),
            frozen_rows: 1,
            validations: vec![
                ValidationRule::new(Column::Priority, &PRIORITY_VALUES, true),
                ValidationRule::new(Column::Department, &DEPARTMENT_VALUES, true),
                ValidationRule::new(Column::Status, &STATUS_VALUES, false),
            ],
        }
    }

    /// Check a row about to be written at 1-based position `row`.
    ///
    /// Returns the advisory violations on success; a hard violation or a
    /// width mismatch rejects the row.
    pub fn check_row(&self, row: u64, cells: &[String]) -> Result<Vec<Violation>, RowRejection> {
        if cells.len() != self.headers.len() {
            return Err(RowRejection::Width {
                expected: self.headers.len(),
                actual: cells.len(),
            });
        }

        let mut advisory = Vec::new();
        for rule in &self.validations {
            if !rule.rows.contains(row) {
                continue;
            }
            let Some(value) = cells.get(rule.column.index()) else {
                continue;
            };
            if rule.accepts(value) {
                continue;
            }
            let violation = Violation {
                column: rule.column,
                row,
                value: value.clone(),
                allowed: rule.allowed.clone(),
            };
            if rule.allow_invalid {
                advisory.push(violation);
            } else {
                return Err(RowRejection::Invalid(violation));
            }
        }
        Ok(advisory)
    }

    /// True when `headers` is exactly this layout's header row.
    pub fn matches_headers(&self, headers: &[String]) -> bool {
        self.headers.as_slice() == headers
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn row_with(column: Column, value: &str) -> Vec<String> {
        let mut cells = vec![String::new(); Column::COUNT];
        cells[column.index()] = value.to_string();
        cells
    }

    #[test]
    fn requests_layout_headers() {
        let layout = TableLayout::requests();
        assert_eq!(layout.table_name, "Requests");
        assert_eq!(layout.headers.len(), 24);
        assert_eq!(layout.headers[0], "Timestamp");
        assert_eq!(layout.headers[13], "Color(s)");
        assert_eq!(layout.headers[14], "Type");
        assert_eq!(layout.headers[23], "Internal Notes");
        assert_eq!(layout.column_widths.len(), layout.headers.len());
        assert_eq!(layout.frozen_rows, 1);
    }

    #[rstest]
    #[case::status_ok(Column::Status, "In Progress")]
    #[case::status_empty(Column::Status, "")]
    #[case::priority_ok(Column::Priority, "Urgent")]
    #[case::department_ok(Column::Department, "Gunsmithing")]
    fn allowed_values_pass_cleanly(#[case] column: Column, #[case] value: &str) {
        let layout = TableLayout::requests();
        assert_eq!(layout.check_row(2, &row_with(column, value)), Ok(vec![]));
    }

    #[rstest]
    #[case::priority(Column::Priority, "Whenever")]
    #[case::department(Column::Department, "Marketing")]
    fn soft_rules_report_but_accept(#[case] column: Column, #[case] value: &str) {
        let layout = TableLayout::requests();
        let advisory = layout.check_row(5, &row_with(column, value)).unwrap();
        assert_eq!(advisory.len(), 1);
        assert_eq!(advisory[0].column, column);
        assert_eq!(advisory[0].value, value);
    }

    #[test]
    fn hard_rule_rejects_unknown_status() {
        let layout = TableLayout::requests();
        let err = layout.check_row(2, &row_with(Column::Status, "Pending")).unwrap_err();
        assert!(matches!(err, RowRejection::Invalid(ref v) if v.column == Column::Status));
    }

    #[test]
    fn rules_stop_at_the_row_ceiling() {
        let layout = TableLayout::requests();
        let cells = row_with(Column::Status, "Pending");
        assert!(layout.check_row(1000, &cells).is_err());
        assert_eq!(layout.check_row(1001, &cells), Ok(vec![]));
    }

    #[test]
    fn wrong_width_is_rejected() {
        let layout = TableLayout::requests();
        let err = layout.check_row(2, &vec![String::new(); 20]).unwrap_err();
        assert_eq!(err, RowRejection::Width { expected: 24, actual: 20 });
    }

    #[test]
    fn layout_survives_json() {
        let layout = TableLayout::requests();
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.contains(r#""column":"status""#));
        let back: TableLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
