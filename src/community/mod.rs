//! Community detection by spectral modularity bisection.
//!
//! ## The Modularity Objective
//!
//! Modularity Q compares the weight inside communities with the weight
//! expected in a random graph with the same degree sequence:
//!
//! ```text
//! Q = (1/2m) × Σ[A_ij - (k_i × k_j)/(2m)] × δ(c_i, c_j)
//! ```
//!
//! Where:
//! - m = total edge weight
//! - A_ij = edge weight between i and j
//! - k_i = weighted degree of node i
//! - δ(c_i, c_j) = 1 if i and j are in same community
//!
//! For two communities encoded as `s_i = ±1` this is `Q = sᵀBs / 4m` with
//! `B = A - kkᵀ/2m`.
//!
//! ## Algorithms
//!
//! ### Newman bisection
//!
//! Split by the signs of B's leading eigenvector, then move single nodes
//! greedily while Q improves, each node at most once. A graph whose B has no
//! positive eigenvalue is left whole.
//!
//! ### Recursive bisection
//!
//! Apply Newman bisection to each resulting group using the generalized
//! matrix `B^(g)`, until no split increases Q.
//!
//! ## Usage
//!
//! ```rust
//! use petgraph::graph::UnGraph;
//! use modsplit::community::{CommunityDetection, NewmanBisection};
//!
//! let mut graph = UnGraph::<(), ()>::new_undirected();
//! let n: Vec<_> = (0..6).map(|_| graph.add_node(())).collect();
//! for (a, b) in [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)] {
//!     graph.add_edge(n[a], n[b], ());
//! }
//!
//! let communities = NewmanBisection::new().detect(&graph).unwrap();
//! assert_eq!(communities, vec![0, 0, 0, 1, 1, 1]);
//! ```
//!
//! ## References
//!
//! - Newman (2006). "Modularity and community structure in networks." PNAS 103(23).
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."
//! - Kernighan & Lin (1970). "An efficient heuristic procedure for partitioning graphs."

mod newman;
mod recursive;
mod traits;

pub use newman::{Bisection, NewmanBisection};
pub use recursive::{Communities, RecursiveBisection};
pub use traits::CommunityDetection;
