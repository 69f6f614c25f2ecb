//! Stateful accumulator that drives successive pairwise alignments of
//! fragments sharing a page.

use crate::merge_rows::merge_rows;
use crate::model::{Row, TableFragment};
use crate::normalize::{normalize_row, same_row};

/// Owns the growing row list for one output fragment while the aligner
/// works its way through the fragments sharing that fragment's page.
pub struct FragmentBuilder {
    rows: Vec<Row>,
    page: u32,
    row_agreement: bool,
    column_agreement: bool,
}

impl FragmentBuilder {
    /// Seeds the builder from the first (leftmost) fragment in a page
    /// bucket, normalizing its rows up front.
    pub fn new(initial: TableFragment, row_agreement: bool, column_agreement: bool) -> Self {
        let rows = initial
            .rows
            .iter()
            .map(|row| normalize_row(row, row_agreement))
            .collect();
        Self {
            rows,
            page: initial.page,
            row_agreement,
            column_agreement,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn row_agreement(&self) -> bool {
        self.row_agreement
    }

    pub fn column_agreement(&self) -> bool {
        self.column_agreement
    }

    /// Takes the current accumulated rows, leaving the builder empty. The
    /// next alignment pass appends its output back into the builder.
    pub fn next_left_rows(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }

    /// Appends a run of right-only rows verbatim (after normalization).
    pub fn append_skipped(&mut self, rows: &[Row]) {
        self.rows
            .extend(rows.iter().map(|row| normalize_row(row, self.row_agreement)));
    }

    /// Appends a left row that found no match in the right fragment, unless
    /// some already-accumulated row is already the same row (it was already
    /// covered by a skipped window).
    pub fn append_unmatched(&mut self, row: &Row) {
        if !self.rows.iter().any(|existing| same_row(existing, row)) {
            self.rows.push(normalize_row(row, self.row_agreement));
        }
    }

    /// Appends the merge of a matched left/right pair.
    pub fn merge_and_append(&mut self, left: &Row, right: &Row) {
        self.rows
            .push(merge_rows(left, right, self.row_agreement, self.column_agreement));
    }

    pub fn build(self) -> TableFragment {
        TableFragment {
            rows: self.rows,
            page: self.page,
        }
    }
}
