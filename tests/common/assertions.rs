//! Domain-specific assertion macros for intake harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! column (not just its index) so a misaligned row is obvious.

use intake_core::Column;

/// Assert that one cell of a stored row has an expected value.
///
/// ```rust
/// assert_cell!(rows[1], Column::Status, "New");
/// ```
#[macro_export]
macro_rules! assert_cell {
    ($row:expr, $column:expr, $value:expr) => {{
        let row: &[String] = &$row;
        let column: intake_core::Column = $column;
        let expected: &str = $value;
        match row.get(column.index()) {
            Some(actual) => pretty_assertions::assert_eq!(
                actual.as_str(),
                expected,
                "assert_cell! failed for column {:?} ({})",
                column,
                column.header()
            ),
            None => panic!(
                "assert_cell! failed: row has {} cells, no {:?} column",
                row.len(),
                column
            ),
        }
    }};
}

/// Assert that a `SubmitResponse` is the error variant and its message
/// contains `$needle`.
#[macro_export]
macro_rules! assert_error_response {
    ($response:expr, $needle:expr) => {{
        match &$response {
            intake::SubmitResponse::Error { message } => assert!(
                message.contains($needle),
                "assert_error_response! failed: {:?} does not contain {:?}",
                message,
                $needle
            ),
            other => panic!("assert_error_response! failed: got {:?}", other),
        }
    }};
}

/// Every listed column is empty in `row`.
pub fn assert_empty_cells(row: &[String], columns: &[Column]) {
    let filled: Vec<(Column, &str)> = columns
        .iter()
        .map(|c| (*c, row[c.index()].as_str()))
        .filter(|(_, v)| !v.is_empty())
        .collect();
    assert!(filled.is_empty(), "expected empty cells, found {filled:?}");
}

/// `row` is exactly the canonical header row.
pub fn assert_header_row(row: &[String]) {
    let expected: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
    let actual: Vec<&str> = row.iter().map(String::as_str).collect();
    pretty_assertions::assert_eq!(actual, expected, "header row does not match schema");
}
