//! Combining two matched rows into one, with optional row- and
//! column-level agreement annotation.

use crate::model::{ColumnValue, Row, ValueWithAgreement};
use crate::normalize::normalize_row;

/// Expresses a column value as the list of weighted entries it stands for:
/// a plain string becomes a single entry at the caller-supplied weight; an
/// already-annotated list is returned as-is.
fn weighted_entries(value: &ColumnValue, weight: u64) -> Vec<ValueWithAgreement> {
    match value {
        ColumnValue::Plain(s) => vec![ValueWithAgreement::new(s.clone(), weight)],
        ColumnValue::Annotated(items) => items.clone(),
    }
}

/// Folds `right`'s weighted entries into `left`'s, adding weight to any
/// matching value and appending new ones, left-to-right.
fn fold_column_agreement(left: &ColumnValue, left_weight: u64, right: &ColumnValue, right_weight: u64) -> ColumnValue {
    let mut entries = weighted_entries(left, left_weight);
    for incoming in weighted_entries(right, right_weight) {
        match entries.iter_mut().find(|entry| entry.value == incoming.value) {
            Some(entry) => entry.agreement_level += incoming.agreement_level,
            None => entries.push(incoming),
        }
    }
    ColumnValue::Annotated(entries)
}

/// Merges `left` and `right` into one row.
///
/// The result's columns are the union of both sides'. A key present on only
/// one side is taken (normalized) from that side. A key present on both
/// sides is either overwritten by the right value (`column_agreement ==
/// false`) or folded into a weighted list (`column_agreement == true`).
///
/// `left` is assumed to already be the accumulated result of prior merges;
/// `right` is the newly observed sample — each side's effective weight
/// drives the weights recorded under column agreement and the row's own
/// `agreement_level_`.
pub fn merge_rows(left: &Row, right: &Row, row_agreement: bool, column_agreement: bool) -> Row {
    let left_weight = left.effective_weight();
    let right_weight = right.effective_weight();

    let left_norm = normalize_row(left, false);
    let right_norm = normalize_row(right, false);

    let mut columns = left_norm.columns;
    for (key, right_value) in right_norm.columns {
        let merged_value = match columns.remove(&key) {
            None => right_value,
            Some(left_value) if column_agreement => {
                fold_column_agreement(&left_value, left_weight, &right_value, right_weight)
            }
            Some(_) => right_value,
        };
        columns.insert(key, merged_value);
    }

    let agreement_level = row_agreement.then_some(left_weight + right_weight);

    Row { agreement_level, columns }
}
