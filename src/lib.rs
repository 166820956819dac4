//! # modsplit
//!
//! Two-way community structure by maximizing Newman's modularity on
//! undirected, optionally weighted graphs.
//!
//! The pipeline is:
//!
//! 1. [`graph`]: edge records → [`Graph`] with a fixed node order.
//! 2. [`matrix`]: dense adjacency `A` and modularity matrix `B = A - kkᵀ/2m`.
//! 3. [`bisect`]: signs of B's leading eigenvector as the initial split.
//! 4. [`refine`]: greedy single-node flips while modularity increases.
//!
//! [`community::NewmanBisection`] runs all four; [`community::RecursiveBisection`]
//! repeats it per group for more than two communities.
//!
//! ```rust
//! use modsplit::{io::parse_edge_list, Graph, NewmanBisection};
//!
//! let input = "% two triangles\n0 1\n1 2\n2 0\n3 4\n4 5\n5 3\n2 3\n";
//! let graph = Graph::from_edges(parse_edge_list(input.as_bytes()).unwrap()).unwrap();
//!
//! let result = NewmanBisection::new().bisect(&graph).unwrap();
//! assert!(result.is_split());
//! assert!((result.modularity - 5.0 / 14.0).abs() < 1e-12);
//! ```

pub mod bisect;
pub mod community;
/// Error types used across `modsplit`.
pub mod error;
pub mod graph;
pub mod io;
pub mod matrix;
pub mod partition;
pub mod refine;
pub mod score;

#[cfg(test)]
mod pipeline_tests;

pub use bisect::{sign_partition, LeadingEigenpair, SpectralBisector, SpectralSplit};
pub use community::{
    Bisection, Communities, CommunityDetection, NewmanBisection, RecursiveBisection,
};
pub use error::{Error, Result};
pub use graph::{EdgeRecord, EdgeWeight, Graph, GraphBuilder};
pub use matrix::{build_matrices, AdjacencyMatrix, ModularityMatrix};
pub use partition::Partition;
pub use refine::{refine, Flip, RefineConfig, Refinement, RefinementEngine, ScoreMode};
pub use score::{modularity, score};
