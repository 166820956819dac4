//! Community detection traits.

use crate::error::Result;
use crate::graph::EdgeWeight;
use petgraph::graph::UnGraph;

/// Trait for community detection algorithms.
pub trait CommunityDetection {
    /// Detect communities in a graph.
    ///
    /// Returns a mapping from node index to community ID. IDs are dense,
    /// starting at 0, and numbered in order of each community's lowest node.
    fn detect<N, E: EdgeWeight>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>>;
}
