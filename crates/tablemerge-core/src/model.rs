//! The `TablesFile` JSON data model shared by every extraction backend.
//!
//! Mirrors the wire format produced by upstream table extractors: an open
//! record (`Row`) with one reserved field and arbitrary column keys, nested
//! inside tables that are either a flat list of rows on one page or an
//! ordered list of page fragments. All types round-trip through `serde_json`
//! without loss — unknown `metadata` keys are preserved, and the
//! `agreement_level_` field never collides with a column name because it
//! lives in its own typed slot rather than the flattened map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single value contributed by one extractor, with its agreement weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueWithAgreement {
    pub value: String,
    pub agreement_level: u64,
}

impl ValueWithAgreement {
    pub fn new(value: impl Into<String>, agreement_level: u64) -> Self {
        Self {
            value: value.into(),
            agreement_level,
        }
    }
}

/// The value of a single column: a plain string, or — once column-level
/// agreement has been recorded — an ordered list of distinct values and the
/// number of source rows that contributed each one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Plain(String),
    Annotated(Vec<ValueWithAgreement>),
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

/// An open record: a reserved `agreement_level_` slot plus arbitrary
/// column name → value pairs.
///
/// `agreement_level_` is never treated as a column; [`Row::columns`] never
/// contains that key and `same_row` never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Row {
    #[serde(rename = "agreement_level_", skip_serializing_if = "Option::is_none", default)]
    pub agreement_level: Option<u64>,
    #[serde(flatten)]
    pub columns: BTreeMap<String, ColumnValue>,
}

impl Row {
    pub fn new(columns: BTreeMap<String, ColumnValue>) -> Self {
        Self {
            agreement_level: None,
            columns,
        }
    }

    /// `agreement_level_` if present, else 1 — the weight a row contributes
    /// to a merge when it has never itself been merged before.
    pub fn effective_weight(&self) -> u64 {
        self.agreement_level.unwrap_or(1)
    }
}

/// A contiguous span of a table's rows on a single (1-based) page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFragment {
    pub rows: Vec<Row>,
    pub page: u32,
}

/// A table expressed as a single page of rows, with no fragment structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableWithRows {
    pub rows: Vec<Row>,
    pub page: u32,
}

/// A table expressed as an ordered sequence of page fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableWithFragments {
    pub table_fragments: Vec<TableFragment>,
}

/// One table from an extraction result, in either representation a backend
/// may emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Table {
    WithFragments(TableWithFragments),
    WithRows(TableWithRows),
}

/// Canonicalizes a [`Table`] into its fragment list, regardless of which
/// variant it was expressed in.
///
/// A `TableWithRows` with no rows, or a `TableWithFragments` with no
/// fragments, canonicalizes to an empty list — there is nothing to merge on
/// either side.
pub fn table_fragments(table: &Table) -> Vec<TableFragment> {
    match table {
        Table::WithRows(t) => {
            if t.rows.is_empty() {
                Vec::new()
            } else {
                vec![TableFragment { rows: t.rows.clone(), page: t.page }]
            }
        }
        Table::WithFragments(t) => t.table_fragments.clone(),
    }
}

/// A paper's citation: absent, a plain string, or a list of values annotated
/// with per-extractor agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Citation {
    Text(Option<String>),
    WithAgreement(Vec<ValueWithAgreement>),
}

/// Free-form metadata accompanying an extraction result. `filename` is the
/// only field the merge engine or its CLI ever reads; all other keys are
/// preserved verbatim for downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One extraction result for one paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesFile {
    pub tables: Vec<Table>,
    pub citation: Citation,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<Metadata>,
}
