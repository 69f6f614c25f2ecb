//! Grouping tables across input files positionally, then grouping their
//! fragments by page within each group.

use std::collections::BTreeMap;

use crate::model::{Table, TableFragment, TablesFile, table_fragments};

/// Zips the `tables` sequences of every input file by index, padding
/// shorter inputs with `None`. Each element of the returned sequence is one
/// "table cluster": the table at a given position in every input, in input
/// order.
///
/// Extractors are assumed to emit tables in corresponding order across
/// runs; this positional pairing is a deliberate simplification (see the
/// design notes on clustering order).
pub fn cluster_tables(files: &[TablesFile]) -> Vec<Vec<Option<Table>>> {
    let width = files.iter().map(|file| file.tables.len()).max().unwrap_or(0);
    (0..width)
        .map(|index| files.iter().map(|file| file.tables.get(index).cloned()).collect())
        .collect()
}

/// Canonicalizes every table in a cluster into fragments and groups them by
/// page number. Fragments sharing a page are bucketed together, in the
/// input order of the tables that contributed them; buckets are returned in
/// ascending page order.
pub fn cluster_fragments_by_page(cluster: &[Option<Table>]) -> BTreeMap<u32, Vec<TableFragment>> {
    let mut buckets: BTreeMap<u32, Vec<TableFragment>> = BTreeMap::new();
    for table in cluster.iter().flatten() {
        for fragment in table_fragments(table) {
            buckets.entry(fragment.page).or_default().push(fragment);
        }
    }
    buckets
}
