use thiserror::Error;

/// Result alias for `modsplit`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by graph construction, matrix building and partitioning.
#[derive(Debug, Error)]
pub enum Error {
    /// Edge input was empty or malformed (self-loop, bad weight, conflicting duplicate).
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Total edge weight is zero, so modularity is undefined.
    #[error("degenerate graph: total edge weight is zero")]
    DegenerateGraph,

    /// The symmetric eigensolver failed to converge.
    #[error("numeric instability: {0}")]
    NumericInstability(String),

    /// Refinement needed more flips than the configured cap.
    #[error("refinement did not converge after {iterations} flips")]
    RefinementNotConverged {
        /// Number of flips applied before giving up.
        iterations: usize,
    },

    /// Vector or matrix dimension mismatch.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Failure reading an edge list.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_graph(msg: impl Into<String>) -> Self {
        Error::InvalidGraph(msg.into())
    }
}
