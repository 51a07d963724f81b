pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("malformed input in subgraph {subgraph}: {reason}")]
    MalformedInput { subgraph: usize, reason: String },

    #[error("dataset contains no subgraphs")]
    EmptyDataset,

    #[error("frequency `{frequency}` has no interval data")]
    InconsistentIntervals { frequency: String },

    #[error("invalid itemset on line {line}: {reason}")]
    Ingest { line: usize, reason: String },
}

impl Error {
    pub(crate) fn malformed(subgraph: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            subgraph,
            reason: reason.into(),
        }
    }
}
