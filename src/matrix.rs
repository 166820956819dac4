//! Dense adjacency and modularity matrices.
//!
//! ```text
//! A_ij = weight of edge (i, j), 0 if absent
//! k_i  = Σ_j A_ij
//! m    = Σ_i k_i / 2
//! B_ij = A_ij - k_i k_j / (2m)
//! ```
//!
//! Every row of B sums to zero. The check is kept as a diagnostic: a large
//! residual means the input weights span too many orders of magnitude for
//! `f64`, and the run continues with a warning.

use faer::{Mat, MatRef};

use crate::error::{Error, Result};
use crate::graph::Graph;

/// Relative bound on `max_i |Σ_j B_ij|` before a warning is logged.
const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Dense symmetric adjacency matrix.
#[derive(Debug, Clone)]
pub struct AdjacencyMatrix {
    inner: Mat<f64>,
}

impl AdjacencyMatrix {
    /// Build from a graph.
    pub fn from_graph<N>(graph: &Graph<N>) -> Self {
        let n = graph.node_count();
        let mut inner = Mat::<f64>::zeros(n, n);
        for (i, j, w) in graph.edges() {
            inner[(i, j)] = w;
            inner[(j, i)] = w;
        }
        Self { inner }
    }

    /// Wrap an existing matrix. It must be square and symmetric, with
    /// non-negative finite entries and a zero diagonal.
    pub fn from_mat(inner: Mat<f64>) -> Result<Self> {
        let n = inner.nrows();
        if inner.ncols() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: inner.ncols(),
            });
        }
        for i in 0..n {
            if inner[(i, i)] != 0.0 {
                return Err(Error::invalid_graph(format!("self-loop on node {i}")));
            }
            for j in (i + 1)..n {
                let w = inner[(i, j)];
                if !w.is_finite() || w < 0.0 {
                    return Err(Error::invalid_graph(format!(
                        "entry ({i}, {j}) has invalid weight {w}"
                    )));
                }
                if inner[(j, i)] != w {
                    return Err(Error::invalid_graph(format!(
                        "adjacency is not symmetric at ({i}, {j})"
                    )));
                }
            }
        }
        Ok(Self { inner })
    }

    /// Dimension.
    pub fn n(&self) -> usize {
        self.inner.nrows()
    }

    /// Entry `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    /// Weighted degrees, each summed over `j` in index order.
    pub fn degrees(&self) -> Vec<f64> {
        let n = self.n();
        (0..n)
            .map(|i| (0..n).map(|j| self.inner[(i, j)]).sum())
            .collect()
    }

    /// Matrix view.
    pub fn as_ref(&self) -> MatRef<'_, f64> {
        self.inner.as_ref()
    }
}

/// Modularity matrix `B` together with the total weight `m` it was built for.
#[derive(Debug, Clone)]
pub struct ModularityMatrix {
    inner: Mat<f64>,
    total_weight: f64,
}

impl ModularityMatrix {
    /// Build `B` from a graph.
    pub fn from_graph<N>(graph: &Graph<N>) -> Result<Self> {
        Self::from_adjacency(&AdjacencyMatrix::from_graph(graph))
    }

    /// Build `B` from an adjacency matrix.
    pub fn from_adjacency(adjacency: &AdjacencyMatrix) -> Result<Self> {
        let n = adjacency.n();
        let degrees = adjacency.degrees();
        let total_weight = degrees.iter().sum::<f64>() / 2.0;
        if total_weight <= 0.0 {
            return Err(Error::DegenerateGraph);
        }

        let two_m = 2.0 * total_weight;
        let inner = Mat::from_fn(n, n, |i, j| {
            adjacency.get(i, j) - degrees[i] * degrees[j] / two_m
        });
        let matrix = Self {
            inner,
            total_weight,
        };

        let residual = matrix.row_sum_residual();
        let tolerance = ROW_SUM_TOLERANCE * two_m;
        if residual > tolerance {
            tracing::warn!(
                residual,
                tolerance,
                "modularity matrix rows do not sum to zero"
            );
        }
        tracing::debug!(n, total_weight, residual, "built modularity matrix");

        Ok(matrix)
    }

    /// Generalized matrix for the subgroup `members` (Newman 2006):
    ///
    /// ```text
    /// B^(g)_ij = B_ij - δ_ij Σ_{k∈g} B_ik
    /// ```
    ///
    /// Rows and columns follow the order of `members`. The total weight is
    /// kept, so scores on the result are modularity changes of the full graph.
    pub fn restrict(&self, members: &[usize]) -> Result<Self> {
        let n = self.n();
        if let Some(&bad) = members.iter().find(|&&i| i >= n) {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: bad + 1,
            });
        }

        let row_sums: Vec<f64> = members
            .iter()
            .map(|&i| members.iter().map(|&k| self.inner[(i, k)]).sum())
            .collect();
        let size = members.len();
        let inner = Mat::from_fn(size, size, |a, b| {
            let value = self.inner[(members[a], members[b])];
            if a == b {
                value - row_sums[a]
            } else {
                value
            }
        });

        Ok(Self {
            inner,
            total_weight: self.total_weight,
        })
    }

    /// Dimension.
    pub fn n(&self) -> usize {
        self.inner.nrows()
    }

    /// Total edge weight `m` of the graph.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Entry `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    /// `max_i |Σ_j B_ij|`.
    pub fn row_sum_residual(&self) -> f64 {
        let n = self.n();
        (0..n)
            .map(|i| (0..n).map(|j| self.inner[(i, j)]).sum::<f64>().abs())
            .fold(0.0, f64::max)
    }

    /// Matrix view.
    pub fn as_ref(&self) -> MatRef<'_, f64> {
        self.inner.as_ref()
    }
}

/// Build both matrices for a graph.
pub fn build_matrices<N>(graph: &Graph<N>) -> Result<(AdjacencyMatrix, ModularityMatrix)> {
    let adjacency = AdjacencyMatrix::from_graph(graph);
    let modularity = ModularityMatrix::from_adjacency(&adjacency)?;
    Ok((adjacency, modularity))
}
