//! One-pass, order-preserving alignment of a right fragment's rows onto a
//! builder's accumulated left rows.

use crate::builder::FragmentBuilder;
use crate::error::MergeError;
use crate::model::{Row, TableFragment};
use crate::normalize::same_row;

/// Aligns `right_fragment`'s rows onto `left_rows`, pushing the result into
/// `builder`.
///
/// `left_rows` is normally the output of `builder.next_left_rows()` taken
/// just before this call — the builder starts empty and this function
/// refills it. Every row from `right_fragment` that is not consumed by a
/// match is appended verbatim (after normalization); every row from
/// `left_rows` that finds no match is appended unless an already-emitted
/// row already covers it.
///
/// Returns [`MergeError::PageMismatch`] if the two sides carry different
/// pages — the caller is expected to have already bucketed fragments by
/// page, so this is a defensive invariant check rather than a path hit in
/// normal orchestration.
pub fn align_into_builder(
    builder: &mut FragmentBuilder,
    left_rows: &[Row],
    right_fragment: &TableFragment,
) -> Result<(), MergeError> {
    if right_fragment.page != builder.page() {
        return Err(MergeError::PageMismatch {
            left: builder.page(),
            right: right_fragment.page,
        });
    }

    let right_rows = &right_fragment.rows;
    let mut next_right = 0usize;

    for left_row in left_rows {
        let found = (next_right..right_rows.len()).find(|&j| same_row(left_row, &right_rows[j]));

        match found {
            Some(j) => {
                builder.append_skipped(&right_rows[next_right..j]);
                builder.merge_and_append(left_row, &right_rows[j]);
                next_right = j + 1;
            }
            None => builder.append_unmatched(left_row),
        }
    }

    builder.append_skipped(&right_rows[next_right..]);
    Ok(())
}
