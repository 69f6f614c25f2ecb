//! Corpus-level statistics: per-paper table/row counts and how often rows
//! carry more than one extractor's agreement, rolled up across a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{TablesFile, table_fragments};

/// Table, row, and agreement counts for a single paper's merged output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperStats {
    pub tables: usize,
    pub rows: usize,
    pub rows_with_agreement: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub agreement_percentage: Option<f64>,
}

/// Counts every row across every table of `file`, regardless of whether the
/// table is expressed as a flat row list or as page fragments.
///
/// A row "has agreement" when `agreement_level_` is present and greater
/// than one — i.e. it was produced by merging at least two source rows.
/// `agreement_percentage` is `None` when the paper has no rows at all.
pub fn compute_paper_stats(file: &TablesFile) -> PaperStats {
    let tables = file.tables.len();
    let mut rows = 0usize;
    let mut rows_with_agreement = 0usize;

    for table in &file.tables {
        for fragment in table_fragments(table) {
            rows += fragment.rows.len();
            rows_with_agreement += fragment
                .rows
                .iter()
                .filter(|row| row.agreement_level.is_some_and(|level| level > 1))
                .count();
        }
    }

    let agreement_percentage =
        (rows > 0).then(|| rows_with_agreement as f64 / rows as f64 * 100.0);

    PaperStats {
        tables,
        rows,
        rows_with_agreement,
        agreement_percentage,
    }
}

/// Running totals across every paper processed in a run, keyed by whatever
/// filename identifies each paper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub papers: usize,
    pub tables: usize,
    pub rows: usize,
    pub papers_stats: BTreeMap<String, PaperStats>,
}

/// Computes `paper`'s stats and folds them into `stats`, keyed by `paper_filename`.
pub fn update_global_stats(stats: &mut GlobalStats, paper_filename: &str, paper: &TablesFile) {
    let paper_stats = compute_paper_stats(paper);

    stats.papers += 1;
    stats.tables += paper_stats.tables;
    stats.rows += paper_stats.rows;
    stats.papers_stats.insert(paper_filename.to_owned(), paper_stats);
}
