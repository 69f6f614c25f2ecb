//! Errors raised by the merge pipeline.

/// Failures the merge engine can raise. The engine never swallows an error
/// and never produces a partial output — any `MergeError` aborts the whole
/// `merge_tablesfiles` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// `merge_tablesfiles` was called with zero input files.
    EmptyInput,
    /// Two fragments placed in the same page bucket carry inconsistent pages.
    PageMismatch {
        /// The page already accumulated into the fragment builder.
        left: u32,
        /// The page carried by the fragment being aligned against it.
        right: u32,
    },
    /// A fragment cluster had no seed (leftmost) fragment to build from.
    EmptyCluster,
}

impl std::fmt::Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("merge requires at least one input TablesFile"),
            Self::PageMismatch { left, right } => {
                write!(f, "fragment page mismatch: expected page {left}, found page {right}")
            }
            Self::EmptyCluster => f.write_str("fragment cluster has no seed fragment"),
        }
    }
}

impl std::error::Error for MergeError {}
