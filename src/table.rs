//! Key-value data table extraction for steps with tabular input.
//!
//! Several step patterns declare many pairs at once (headers, validation
//! expressions, file properties) through a two-column Gherkin table.

use cucumber::gherkin::Step;

use crate::error::StepError;

/// Collect `(key, value)` pairs from a step's data table.
///
/// # Errors
///
/// Returns [`StepError::Table`] when the step carries no table or a row is
/// not exactly two cells wide.
pub fn from_step(step: &Step) -> Result<Vec<(String, String)>, StepError> {
    let table = step
        .table
        .as_ref()
        .ok_or_else(|| StepError::Table("step requires a data table".to_string()))?;
    key_value_rows(&table.rows)
}

/// Collect `(key, value)` pairs from raw table rows.
///
/// # Errors
///
/// Returns [`StepError::Table`] when a row is not exactly two cells wide.
pub fn key_value_rows(rows: &[Vec<String>]) -> Result<Vec<(String, String)>, StepError> {
    rows.iter()
        .map(|row| match row.as_slice() {
            [key, value] => Ok((key.clone(), value.clone())),
            cells => Err(StepError::Table(format!(
                "expected key and value cells, found {} cells",
                cells.len()
            ))),
        })
        .collect()
}
