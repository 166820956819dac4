//! Spectral bisection from the leading eigenvector of the modularity matrix.
//!
//! Writing `s = Σ_i a_i u_i` in the eigenbasis of B gives
//! `Q = Σ_i a_i² β_i / (4m)`, so the best continuous split points along the
//! eigenvector of the largest eigenvalue β₁. Rounding it to signs gives the
//! initial partition:
//!
//! ```text
//! s_i = +1 if u_1[i] >= 0
//! s_i = -1 otherwise
//! ```
//!
//! `sign(0) = +1`. Components within `zero_tol` of zero also count as zero.
//!
//! If β₁ is not positive, no split has positive modularity and the group is
//! indivisible; the result is the single-community partition. This is the
//! stopping rule for recursive bisection.
//!
//! Eigenvector signs are arbitrary, so the vector is normalized to make its
//! largest-magnitude component positive (lowest index on ties). `Q` does not
//! depend on the global sign, but the labels do.
//!
//! ## References
//!
//! Newman (2006). "Modularity and community structure in networks." PNAS 103(23).

use faer::Side;

use crate::error::{Error, Result};
use crate::matrix::ModularityMatrix;
use crate::partition::Partition;

/// Largest eigenvalue of B and its unit eigenvector.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadingEigenpair {
    /// Largest eigenvalue.
    pub value: f64,
    /// Associated eigenvector, sign-normalized.
    pub vector: Vec<f64>,
    /// Largest eigenvalue magnitude over the whole spectrum.
    pub spectral_radius: f64,
}

/// Outcome of a spectral split.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralSplit {
    /// Initial partition (trivial if indivisible).
    pub partition: Partition,
    /// Leading eigenvalue of B.
    pub eigenvalue: f64,
    /// False if no positive eigenvalue exists.
    pub divisible: bool,
}

/// Compute the leading eigenpair with a dense symmetric eigensolver.
pub fn leading_eigenpair(matrix: &ModularityMatrix) -> Result<LeadingEigenpair> {
    let n = matrix.n();
    if n == 0 {
        return Err(Error::invalid_graph("cannot bisect an empty node set"));
    }

    let evd = matrix
        .as_ref()
        .self_adjoint_eigen(Side::Lower)
        .map_err(|e| Error::NumericInstability(format!("eigendecomposition failed: {e:?}")))?;
    let values = evd.S().column_vector();
    let vectors = evd.U();

    let mut top = 0;
    let mut spectral_radius = 0.0f64;
    for i in 0..n {
        let value = values[i];
        if !value.is_finite() {
            return Err(Error::NumericInstability(format!(
                "eigenvalue {i} is not finite"
            )));
        }
        spectral_radius = spectral_radius.max(value.abs());
        if value > values[top] {
            top = i;
        }
    }

    let mut vector: Vec<f64> = (0..n).map(|i| vectors[(i, top)]).collect();
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(Error::NumericInstability(
            "leading eigenvector has non-finite entries".to_string(),
        ));
    }

    let mut pivot = 0;
    for (i, v) in vector.iter().enumerate() {
        if v.abs() > vector[pivot].abs() {
            pivot = i;
        }
    }
    if vector[pivot] < 0.0 {
        for v in &mut vector {
            *v = -*v;
        }
    }

    Ok(LeadingEigenpair {
        value: values[top],
        vector,
        spectral_radius,
    })
}

/// Round a vector to a ±1 partition with `sign(0) = +1`.
pub fn sign_partition(vector: &[f64], zero_tol: f64) -> Partition {
    let mut partition = Partition::trivial(vector.len());
    for (i, &v) in vector.iter().enumerate() {
        if v < 0.0 && v.abs() > zero_tol {
            partition.flip(i);
        }
    }
    partition
}

/// Leading-eigenvector bisection.
#[derive(Debug, Clone)]
pub struct SpectralBisector {
    /// Relative threshold below which the leading eigenvalue counts as non-positive.
    eigen_tol: f64,
    /// Eigenvector components with `|v| <= zero_tol` are treated as zero.
    zero_tol: f64,
}

impl SpectralBisector {
    /// Create a bisector with default tolerances.
    pub fn new() -> Self {
        Self {
            eigen_tol: 1e-10,
            zero_tol: 0.0,
        }
    }

    /// Set the eigenvalue threshold, relative to the spectral radius.
    pub fn with_eigen_tol(mut self, eigen_tol: f64) -> Self {
        self.eigen_tol = eigen_tol;
        self
    }

    /// Set the zero threshold for eigenvector components.
    pub fn with_zero_tol(mut self, zero_tol: f64) -> Self {
        self.zero_tol = zero_tol;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.eigen_tol.is_finite() || self.eigen_tol < 0.0 {
            return Err(Error::InvalidParameter {
                name: "eigen_tol",
                message: "must be finite and non-negative",
            });
        }
        if !self.zero_tol.is_finite() || self.zero_tol < 0.0 {
            return Err(Error::InvalidParameter {
                name: "zero_tol",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Split by the sign pattern of the leading eigenvector.
    pub fn split(&self, matrix: &ModularityMatrix) -> Result<SpectralSplit> {
        self.validate()?;
        let pair = leading_eigenpair(matrix)?;
        // Relative to the spectrum, so scaling every weight keeps the decision.
        let threshold = self.eigen_tol * pair.spectral_radius;

        if pair.value <= threshold {
            tracing::debug!(
                eigenvalue = pair.value,
                threshold,
                "no positive eigenvalue, group is indivisible"
            );
            return Ok(SpectralSplit {
                partition: Partition::trivial(matrix.n()),
                eigenvalue: pair.value,
                divisible: false,
            });
        }

        let partition = sign_partition(&pair.vector, self.zero_tol);
        let (plus, minus) = partition.sizes();
        tracing::debug!(eigenvalue = pair.value, plus, minus, "spectral split");

        Ok(SpectralSplit {
            partition,
            eigenvalue: pair.value,
            divisible: true,
        })
    }
}

impl Default for SpectralBisector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeRecord, Graph};
    use approx::assert_abs_diff_eq;

    fn matrix(edges: &[(usize, usize, f64)]) -> ModularityMatrix {
        let graph = Graph::from_edges(
            edges
                .iter()
                .map(|&(u, v, w)| EdgeRecord::weighted(u, v, w)),
        )
        .unwrap();
        ModularityMatrix::from_graph(&graph).unwrap()
    }

    #[test]
    fn test_sign_of_zero_is_positive() {
        let p = sign_partition(&[0.0, -0.0, 0.3, -0.2], 0.0);
        assert_eq!(p.as_slice(), &[1, 1, 1, -1]);
    }

    #[test]
    fn test_zero_tol_absorbs_small_negatives() {
        let p = sign_partition(&[-1e-14, -0.5, 0.5], 1e-12);
        assert_eq!(p.as_slice(), &[1, -1, 1]);
    }

    #[test]
    fn test_triangle_is_indivisible() {
        let b = matrix(&[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
        let split = SpectralBisector::new().split(&b).unwrap();

        assert!(!split.divisible);
        assert!(split.partition.is_trivial());
        assert_abs_diff_eq!(split.eigenvalue, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_single_weighted_edge_is_indivisible() {
        let b = matrix(&[(0, 1, 5.0)]);
        let split = SpectralBisector::new().split(&b).unwrap();

        assert!(!split.divisible);
        assert_eq!(split.partition.as_slice(), &[1, 1]);
    }

    #[test]
    fn test_two_triangles_split() {
        let b = matrix(&[
            (0, 1, 1.0),
            (1, 2, 1.0),
            (2, 0, 1.0),
            (3, 4, 1.0),
            (4, 5, 1.0),
            (5, 3, 1.0),
            (2, 3, 1.0),
        ]);
        let split = SpectralBisector::new().split(&b).unwrap();

        assert!(split.divisible);
        assert!(split.eigenvalue > 0.0);
        let s = split.partition.as_slice();
        assert_eq!(s[0], s[1]);
        assert_eq!(s[1], s[2]);
        assert_eq!(s[3], s[4]);
        assert_eq!(s[4], s[5]);
        assert_ne!(s[0], s[3]);
    }

    #[test]
    fn test_split_ignores_weight_scale() {
        let bridged = |w: f64| {
            matrix(&[
                (0, 1, w),
                (1, 2, w),
                (2, 0, w),
                (3, 4, w),
                (4, 5, w),
                (5, 3, w),
                (2, 3, w),
            ])
        };
        let unit = SpectralBisector::new().split(&bridged(1.0)).unwrap();
        let tiny = SpectralBisector::new().split(&bridged(1e-12)).unwrap();

        assert!(unit.divisible);
        assert!(tiny.divisible);
        assert_eq!(unit.partition, tiny.partition);
        assert_abs_diff_eq!(tiny.eigenvalue / unit.eigenvalue, 1e-12, epsilon = 1e-18);
    }

    #[test]
    fn test_eigenpair_is_normalized() {
        let b = matrix(&[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        let pair = leading_eigenpair(&b).unwrap();

        let norm: f64 = pair.vector.iter().map(|v| v * v).sum();
        assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-10);

        let pivot = pair
            .vector
            .iter()
            .copied()
            .fold(0.0f64, |acc, v| if v.abs() > acc.abs() { v } else { acc });
        assert!(pivot > 0.0);

        // B u = λ u
        for i in 0..4 {
            let bu: f64 = (0..4).map(|j| b.get(i, j) * pair.vector[j]).sum();
            assert_abs_diff_eq!(bu, pair.value * pair.vector[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_invalid_tolerance() {
        let b = matrix(&[(0, 1, 1.0)]);
        let result = SpectralBisector::new().with_eigen_tol(-1.0).split(&b);
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }
}
