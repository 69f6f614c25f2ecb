//! The top-level merge orchestrator: iterates table clusters and page
//! buckets, delegates to the aligner and fragment builder, and assembles
//! the merged `TablesFile`.

use crate::align::align_into_builder;
use crate::builder::FragmentBuilder;
use crate::cluster::{cluster_fragments_by_page, cluster_tables};
use crate::error::MergeError;
use crate::model::{Table, TableFragment, TableWithFragments, TablesFile};

/// Toggles controlling how agreement is recorded in the merged output.
///
/// Both default to `false`: a plain merge keeps only the union of columns
/// with no provenance bookkeeping, matching the behavior of merging with
/// neither flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeConfig {
    /// Record how many source rows merged into each output row in
    /// `agreement_level_`.
    pub row_agreement: bool,
    /// Record, per conflicting column, every distinct value observed and
    /// the number of source rows that contributed it.
    pub column_agreement: bool,
}

/// Merges N independent extractions of the same paper's tables into one
/// consensus `TablesFile`.
///
/// Tables are clustered positionally across `files` (see
/// [`crate::cluster::cluster_tables`]); within each cluster, fragments are
/// grouped by page and aligned pairwise, left-to-right, via
/// [`FragmentBuilder`] and [`align_into_builder`]. The result's citation is
/// always taken from `files[0]`.
///
/// # Errors
///
/// Returns [`MergeError::EmptyInput`] if `files` is empty, or
/// [`MergeError::PageMismatch`] if a page bucket somehow contains fragments
/// with inconsistent pages (cannot happen through ordinary bucketing, but
/// is checked defensively by the aligner).
pub fn merge_tablesfiles(files: &[TablesFile], config: MergeConfig) -> Result<TablesFile, MergeError> {
    if files.is_empty() {
        return Err(MergeError::EmptyInput);
    }

    let table_clusters = cluster_tables(files);
    let mut merged_tables = Vec::with_capacity(table_clusters.len());

    for cluster in &table_clusters {
        let buckets = cluster_fragments_by_page(cluster);
        let mut merged_fragments: Vec<TableFragment> = Vec::with_capacity(buckets.len());

        for fragments in buckets.values() {
            let (seed, rest) = fragments.split_first().ok_or(MergeError::EmptyCluster)?;
            let mut builder = FragmentBuilder::new(seed.clone(), config.row_agreement, config.column_agreement);
            for fragment in rest {
                let left_rows = builder.next_left_rows();
                align_into_builder(&mut builder, &left_rows, fragment)?;
            }
            merged_fragments.push(builder.build());
        }

        merged_tables.push(Table::WithFragments(TableWithFragments { table_fragments: merged_fragments }));
    }

    Ok(TablesFile {
        tables: merged_tables,
        citation: files[0].citation.clone(),
        metadata: None,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::model::{Citation, ColumnValue, Row, Table, TableFragment, TableWithFragments};
    use std::collections::BTreeMap;

    fn row(pairs: &[(&str, &str)]) -> Row {
        Row::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), ColumnValue::Plain(v.to_string())))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn wrap(rows: Vec<Row>, page: u32) -> TablesFile {
        TablesFile {
            tables: vec![Table::WithFragments(TableWithFragments {
                table_fragments: vec![TableFragment { rows, page }],
            })],
            citation: Citation::Text(None),
            metadata: None,
        }
    }

    fn only_fragment(file: &TablesFile) -> &TableFragment {
        match &file.tables[0] {
            Table::WithFragments(t) => &t.table_fragments[0],
            Table::WithRows(_) => panic!("expected fragments table"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = merge_tablesfiles(&[], MergeConfig::default()).unwrap_err();
        assert_eq!(err, MergeError::EmptyInput);
    }

    #[test]
    fn single_file_is_normalized() {
        let file = wrap(vec![row(&[("family", " Apiaceae "), ("scientific_name", "Ammi majus L.")])], 1);
        let merged = merge_tablesfiles(std::slice::from_ref(&file), MergeConfig::default()).unwrap();
        assert_eq!(
            only_fragment(&merged).rows,
            vec![row(&[("family", "apiaceae"), ("scientific_name", "ammi majus l.")])]
        );
    }

    #[test]
    fn single_file_with_row_agreement_gets_weight_one() {
        let file = wrap(vec![row(&[("family", "Apiaceae")])], 1);
        let merged = merge_tablesfiles(
            std::slice::from_ref(&file),
            MergeConfig { row_agreement: true, column_agreement: false },
        )
        .unwrap();
        assert_eq!(only_fragment(&merged).rows[0].agreement_level, Some(1));
    }

    #[test]
    fn identical_inputs_do_not_duplicate_rows() {
        let file = wrap(vec![row(&[("family", "Apiaceae")])], 1);
        let merged = merge_tablesfiles(&[file.clone(), file], MergeConfig::default()).unwrap();
        assert_eq!(only_fragment(&merged).rows, vec![row(&[("family", "apiaceae")])]);
    }

    #[test]
    fn identical_inputs_with_row_agreement_double_the_weight() {
        let file = wrap(vec![row(&[("family", "Apiaceae")])], 1);
        let merged = merge_tablesfiles(
            &[file.clone(), file],
            MergeConfig { row_agreement: true, column_agreement: false },
        )
        .unwrap();
        assert_eq!(only_fragment(&merged).rows[0].agreement_level, Some(2));
    }

    #[test]
    fn three_disjoint_files_preserve_order() {
        let a = wrap(vec![row(&[("family", "Apiaceae")])], 1);
        let r = wrap(vec![row(&[("family", "Rosaceae")])], 1);
        let l = wrap(vec![row(&[("family", "Lamiaceae")])], 1);
        let merged = merge_tablesfiles(&[a, r, l], MergeConfig::default()).unwrap();
        assert_eq!(
            only_fragment(&merged).rows,
            vec![
                row(&[("family", "apiaceae")]),
                row(&[("family", "rosaceae")]),
                row(&[("family", "lamiaceae")]),
            ]
        );
    }

    #[test]
    fn different_column_names_never_match() {
        let a = wrap(vec![row(&[("family", "Apiaceae"), ("scientific_name", "Ammi majus L.")])], 1);
        let b = wrap(vec![row(&[("0", "apiaceae"), ("1", "ammi majus l.")])], 1);
        let merged = merge_tablesfiles(&[a, b], MergeConfig::default()).unwrap();
        assert_eq!(only_fragment(&merged).rows.len(), 2);
    }

    #[test]
    fn cross_page_fragments_stay_separate_and_ordered() {
        let a = wrap(vec![row(&[("family", "Apiaceae")])], 1);
        let b = wrap(vec![row(&[("family", "Rosaceae")])], 2);
        let merged = merge_tablesfiles(&[a, b], MergeConfig::default()).unwrap();
        let Table::WithFragments(fragments) = &merged.tables[0] else {
            panic!("expected fragments table");
        };
        assert_eq!(fragments.table_fragments.len(), 2);
        assert_eq!(fragments.table_fragments[0].page, 1);
        assert_eq!(fragments.table_fragments[1].page, 2);
    }

    #[test]
    fn citation_is_taken_from_the_first_file() {
        let mut a = wrap(vec![row(&[("family", "Apiaceae")])], 1);
        a.citation = Citation::Text(Some("Smith et al.".to_owned()));
        let b = wrap(vec![row(&[("family", "Rosaceae")])], 1);
        let merged = merge_tablesfiles(&[a, b], MergeConfig::default()).unwrap();
        assert_eq!(merged.citation, Citation::Text(Some("Smith et al.".to_owned())));
    }

    #[test]
    fn conflicting_central_row_produces_two_rows_in_order() {
        let a_full = wrap(vec![row(&[("family", "Apiaceae"), ("scientific_name", "Ammi majus L.")])], 1);
        let a_plus_r = wrap(
            vec![
                row(&[("family", "Apiaceae"), ("scientific_name", "Ammi majus L.")]),
                row(&[("family", "Rosaceae"), ("scientific_name", "Rosa canina L.")]),
            ],
            1,
        );
        let a_short_r_l = wrap(
            vec![
                row(&[("family", "Apiaceae"), ("scientific_name", "Ammi")]),
                row(&[("family", "Rosaceae"), ("scientific_name", "Rosa canina L.")]),
                row(&[("family", "Lamiaceae"), ("scientific_name", "Mentha spicata L.")]),
            ],
            1,
        );

        let merged = merge_tablesfiles(&[a_full, a_plus_r, a_short_r_l], MergeConfig::default()).unwrap();
        assert_eq!(
            only_fragment(&merged).rows,
            vec![
                row(&[("family", "apiaceae"), ("scientific_name", "ammi majus l.")]),
                row(&[("family", "apiaceae"), ("scientific_name", "ammi")]),
                row(&[("family", "rosaceae"), ("scientific_name", "rosa canina l.")]),
                row(&[("family", "lamiaceae"), ("scientific_name", "mentha spicata l.")]),
            ]
        );
    }

    #[test]
    fn conflicting_central_row_with_row_agreement_counts_weights() {
        let a_full = wrap(vec![row(&[("family", "Apiaceae"), ("scientific_name", "Ammi majus L.")])], 1);
        let a_plus_r = wrap(
            vec![
                row(&[("family", "Apiaceae"), ("scientific_name", "Ammi majus L.")]),
                row(&[("family", "Rosaceae"), ("scientific_name", "Rosa canina L.")]),
            ],
            1,
        );
        let a_short_r_l = wrap(
            vec![
                row(&[("family", "Apiaceae"), ("scientific_name", "Ammi")]),
                row(&[("family", "Rosaceae"), ("scientific_name", "Rosa canina L.")]),
                row(&[("family", "Lamiaceae"), ("scientific_name", "Mentha spicata L.")]),
            ],
            1,
        );

        let merged = merge_tablesfiles(
            &[a_full, a_plus_r, a_short_r_l],
            MergeConfig { row_agreement: true, column_agreement: false },
        )
        .unwrap();
        let weights: Vec<Option<u64>> = only_fragment(&merged).rows.iter().map(|r| r.agreement_level).collect();
        assert_eq!(weights, vec![Some(2), Some(1), Some(2), Some(1)]);
    }
}
