//! Multi-way communities by repeated bisection.
//!
//! Each group `g` is split with the generalized modularity matrix
//!
//! ```text
//! B^(g)_ij = B_ij - δ_ij Σ_{k∈g} B_ik
//! ```
//!
//! whose quadratic form `sᵀB^(g)s / 4m` is exactly the change in the whole
//! graph's modularity from splitting `g`. A group is final once its best
//! refined split no longer gains more than `min_gain` (default `1e-5`).

use std::collections::VecDeque;

use super::newman::NewmanBisection;
use super::traits::CommunityDetection;
use crate::error::{Error, Result};
use crate::graph::{EdgeWeight, Graph};
use crate::matrix::ModularityMatrix;
use crate::score::modularity;
use petgraph::graph::UnGraph;

/// Final multi-way partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Communities {
    /// Community id per node, numbered by lowest member.
    pub labels: Vec<usize>,
    /// Number of communities.
    pub count: usize,
    /// Modularity of `labels`.
    pub modularity: f64,
}

/// Recursive spectral bisection.
#[derive(Debug, Clone)]
pub struct RecursiveBisection {
    /// Per-group bisection.
    bisection: NewmanBisection,
    /// Stop once this many communities exist.
    max_communities: Option<usize>,
    /// Minimum modularity gain for a split to be kept.
    min_gain: f64,
}

impl RecursiveBisection {
    /// Create with default settings.
    pub fn new() -> Self {
        Self {
            bisection: NewmanBisection::new(),
            max_communities: None,
            min_gain: 1e-5,
        }
    }

    /// Set the per-group bisection.
    pub fn with_bisection(mut self, bisection: NewmanBisection) -> Self {
        self.bisection = bisection;
        self
    }

    /// Cap the number of communities.
    pub fn with_max_communities(mut self, max: usize) -> Self {
        self.max_communities = Some(max);
        self
    }

    /// Set the minimum gain for accepting a split.
    pub fn with_min_gain(mut self, min_gain: f64) -> Self {
        self.min_gain = min_gain;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_communities == Some(0) {
            return Err(Error::InvalidParameter {
                name: "max_communities",
                message: "must be at least 1",
            });
        }
        if !self.min_gain.is_finite() || self.min_gain < 0.0 {
            return Err(Error::InvalidParameter {
                name: "min_gain",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Partition a graph into communities.
    pub fn partition<N>(&self, graph: &Graph<N>) -> Result<Communities> {
        self.validate()?;
        let matrix = ModularityMatrix::from_graph(graph)?;
        let n = graph.node_count();

        let mut queue: VecDeque<Vec<usize>> = VecDeque::from([(0..n).collect::<Vec<_>>()]);
        let mut done: Vec<Vec<usize>> = Vec::new();

        while let Some(group) = queue.pop_front() {
            let at_cap = self
                .max_communities
                .is_some_and(|max| done.len() + queue.len() + 1 >= max);
            if at_cap || group.len() < 2 {
                done.push(group);
                continue;
            }

            let restricted = matrix.restrict(&group)?;
            let split = self.bisection.bisect_matrix(&restricted)?;
            if !split.is_split() || split.modularity <= self.min_gain {
                tracing::debug!(
                    size = group.len(),
                    gain = split.modularity,
                    "group is final"
                );
                done.push(group);
                continue;
            }

            let (mut first, mut second): (Vec<usize>, Vec<usize>) = (Vec::new(), Vec::new());
            let lead = split.partition.sign(0);
            for (pos, &node) in group.iter().enumerate() {
                if split.partition.sign(pos) == lead {
                    first.push(node);
                } else {
                    second.push(node);
                }
            }
            tracing::debug!(
                left = first.len(),
                right = second.len(),
                gain = split.modularity,
                "split group"
            );
            queue.push_back(first);
            queue.push_back(second);
        }

        // Groups keep ascending member order, so `g[0]` is the lowest member.
        done.sort_by_key(|g| g[0]);
        let mut labels = vec![0; n];
        for (id, group) in done.iter().enumerate() {
            for &node in group {
                labels[node] = id;
            }
        }

        let modularity = modularity(graph, &labels)?;
        Ok(Communities {
            labels,
            count: done.len(),
            modularity,
        })
    }
}

impl Default for RecursiveBisection {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for RecursiveBisection {
    fn detect<N, E: EdgeWeight>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>> {
        let graph = Graph::from_petgraph(graph)?;
        Ok(self.partition(&graph)?.labels)
    }
}
