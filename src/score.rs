//! Modularity of a partition.
//!
//! For a bipartition `s ∈ {±1}ⁿ`:
//!
//! ```text
//! Q(s) = sᵀ B s / (4m)
//! ```
//!
//! computed as two reductions, `w = B s` then `Q = s·w / (4m)`. Only the
//! two-community form is scored here; [`modularity`] covers label vectors with
//! any number of communities, evaluated directly from the graph.
//!
//! Flipping node `i` changes `sᵀBs` by `4(B_ii - s_i w_i)`, so a single-flip
//! gain costs O(1) once `w` is known ([`flip_gain`]).

use std::collections::HashMap;

use faer::Col;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::matrix::ModularityMatrix;
use crate::partition::Partition;

fn check_len(partition: &Partition, matrix: &ModularityMatrix) -> Result<()> {
    if partition.len() != matrix.n() {
        return Err(Error::DimensionMismatch {
            expected: matrix.n(),
            found: partition.len(),
        });
    }
    Ok(())
}

/// `w = B s`.
pub fn product(partition: &Partition, matrix: &ModularityMatrix) -> Result<Vec<f64>> {
    check_len(partition, matrix)?;
    let s = Col::<f64>::from_fn(partition.len(), |i| f64::from(partition.sign(i)));
    let w = matrix.as_ref() * s.as_ref();
    Ok((0..partition.len()).map(|i| w[i]).collect())
}

/// `Q(s) = sᵀ B s / (4m)`.
pub fn score(partition: &Partition, matrix: &ModularityMatrix) -> Result<f64> {
    let w = product(partition, matrix)?;
    let quadratic: f64 = partition
        .as_slice()
        .iter()
        .zip(&w)
        .map(|(&s, &wi)| f64::from(s) * wi)
        .sum();
    Ok(quadratic / (4.0 * matrix.total_weight()))
}

/// Change in `Q` from flipping node `i`, given `w = B s`.
pub fn flip_gain(partition: &Partition, matrix: &ModularityMatrix, w: &[f64], i: usize) -> f64 {
    let s_i = f64::from(partition.sign(i));
    (matrix.get(i, i) - s_i * w[i]) / matrix.total_weight()
}

/// Newman's modularity for arbitrary community labels.
///
/// ```text
/// Q = Σ_c [ L_c / m - (d_c / 2m)² ]
/// ```
///
/// where `L_c` is the weight inside community `c` and `d_c` its total degree.
pub fn modularity<N>(graph: &Graph<N>, labels: &[usize]) -> Result<f64> {
    let n = graph.node_count();
    if labels.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            found: labels.len(),
        });
    }
    let m = graph.total_weight();
    if m <= 0.0 {
        return Err(Error::DegenerateGraph);
    }

    let mut internal: HashMap<usize, f64> = HashMap::new();
    for (i, j, w) in graph.edges() {
        if labels[i] == labels[j] {
            *internal.entry(labels[i]).or_insert(0.0) += w;
        }
    }
    let mut degree_sums: HashMap<usize, f64> = HashMap::new();
    for (i, &k) in graph.degrees().iter().enumerate() {
        *degree_sums.entry(labels[i]).or_insert(0.0) += k;
    }

    let mut communities: Vec<usize> = degree_sums.keys().copied().collect();
    communities.sort_unstable();

    Ok(communities
        .into_iter()
        .map(|c| {
            let inside = internal.get(&c).copied().unwrap_or(0.0);
            let share = degree_sums[&c] / (2.0 * m);
            inside / m - share * share
        })
        .sum())
}
