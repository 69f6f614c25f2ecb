//! Cell value normalization and row identity.
//!
//! Implements the value normalizer (collapse whitespace, trim, lowercase)
//! and the row-level wrapper that applies it across every column, plus the
//! `same_row` equivalence used throughout the aligner to decide whether two
//! rows from different extractors describe the same fact.

use crate::model::{ColumnValue, Row, ValueWithAgreement};

/// Collapses all runs of whitespace (including embedded newlines) to a
/// single space, trims the ends, and lowercases the result.
fn normalize_string(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Normalizes a single column's value. Plain strings are normalized in
/// place; an annotated list is normalized element-wise, preserving order and
/// agreement weights.
pub fn normalize_value(value: &ColumnValue) -> ColumnValue {
    match value {
        ColumnValue::Plain(s) => ColumnValue::Plain(normalize_string(s)),
        ColumnValue::Annotated(items) => ColumnValue::Annotated(
            items
                .iter()
                .map(|item| ValueWithAgreement::new(normalize_string(&item.value), item.agreement_level))
                .collect(),
        ),
    }
}

/// Normalizes every column of a row.
///
/// When `row_agreement` is `true`, `agreement_level_` is overwritten with
/// the row's effective weight (so an unweighted row becomes weight 1);
/// otherwise it is passed through unchanged.
pub fn normalize_row(row: &Row, row_agreement: bool) -> Row {
    let columns = row
        .columns
        .iter()
        .map(|(column, value)| (column.clone(), normalize_value(value)))
        .collect();

    let agreement_level = if row_agreement {
        Some(row.effective_weight())
    } else {
        row.agreement_level
    };

    Row { agreement_level, columns }
}

/// Two rows are the same row iff their normalized column maps are equal —
/// key-set equality and per-key value equality. `agreement_level_` never
/// participates: two extractors that agree on every column but carry
/// different weights are still the same row.
pub fn same_row(left: &Row, right: &Row) -> bool {
    normalize_row(left, false).columns == normalize_row(right, false).columns
}
