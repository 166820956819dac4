//! Weighted undirected graph with a stable node-index mapping.
//!
//! Nodes are indexed `0..n` in order of first appearance. That order is the
//! one every later step uses for tie-breaking, so building the same edge list
//! twice always yields the same matrices and the same partition.
//!
//! ```rust
//! use modsplit::graph::{EdgeRecord, Graph};
//!
//! let graph = Graph::from_edges(vec![
//!     EdgeRecord::new("a", "b"),
//!     EdgeRecord::weighted("b", "c", 2.0),
//! ])
//! .unwrap();
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.degree(1), 3.0);
//! assert_eq!(graph.total_weight(), 3.0);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::error::{Error, Result};
use crate::partition::Partition;

/// One line of edge input: an unordered pair with an optional weight.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord<N> {
    /// First endpoint.
    pub source: N,
    /// Second endpoint.
    pub target: N,
    /// Edge weight; `None` means 1.
    pub weight: Option<f64>,
}

impl<N> EdgeRecord<N> {
    /// Unweighted record (weight 1).
    pub fn new(source: N, target: N) -> Self {
        Self {
            source,
            target,
            weight: None,
        }
    }

    /// Weighted record.
    pub fn weighted(source: N, target: N, weight: f64) -> Self {
        Self {
            source,
            target,
            weight: Some(weight),
        }
    }

    /// Effective weight.
    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

/// Edge payloads that can be read as a modularity weight.
///
/// `()` counts as an unweighted edge.
pub trait EdgeWeight {
    /// Weight as `f64`.
    fn weight(&self) -> f64;
}

impl EdgeWeight for () {
    fn weight(&self) -> f64 {
        1.0
    }
}

// Only types that convert to `f64` without rounding.
macro_rules! numeric_edge_weight {
    ($($t:ty),*) => {
        $(
            impl EdgeWeight for $t {
                fn weight(&self) -> f64 {
                    f64::from(*self)
                }
            }
        )*
    };
}

numeric_edge_weight!(f64, f32, u8, u16, u32, i8, i16, i32);

/// Incremental graph construction.
///
/// Validation happens per edge, so the first offending record is reported.
#[derive(Debug, Clone)]
pub struct GraphBuilder<N> {
    graph: UnGraph<N, f64>,
    index: HashMap<N, NodeIndex>,
}

impl<N> GraphBuilder<N>
where
    N: Clone + Eq + Hash + fmt::Debug,
{
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            index: HashMap::new(),
        }
    }

    /// Add a node if it is not present yet; returns its index.
    pub fn add_node(&mut self, id: N) -> usize {
        self.node_index(id).index()
    }

    fn node_index(&mut self, id: N) -> NodeIndex {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.index.insert(id, idx);
        idx
    }

    /// Add an undirected edge.
    ///
    /// Repeating a pair (in either direction) with the same weight is a no-op;
    /// repeating it with a different weight is an error.
    pub fn add_edge(&mut self, source: N, target: N, weight: f64) -> Result<()> {
        if source == target {
            return Err(Error::invalid_graph(format!(
                "self-loop on node {source:?} is not supported"
            )));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::invalid_graph(format!(
                "edge {source:?}-{target:?} has invalid weight {weight}"
            )));
        }

        let a = self.node_index(source);
        let b = self.node_index(target);

        if let Some(existing) = self.graph.find_edge(a, b) {
            let previous = self.graph[existing];
            if previous != weight {
                return Err(Error::invalid_graph(format!(
                    "edge {:?}-{:?} repeated with conflicting weights {previous} and {weight}",
                    self.graph[a], self.graph[b]
                )));
            }
            return Ok(());
        }

        let _ = self.graph.add_edge(a, b, weight);
        Ok(())
    }

    /// Add an [`EdgeRecord`].
    pub fn add_record(&mut self, record: EdgeRecord<N>) -> Result<()> {
        let weight = record.weight();
        self.add_edge(record.source, record.target, weight)
    }

    /// Finish construction and derive degrees.
    pub fn build(self) -> Result<Graph<N>> {
        if self.graph.edge_count() == 0 {
            return Err(Error::invalid_graph("edge list is empty"));
        }

        let n = self.graph.node_count();
        let mut degrees = Vec::with_capacity(n);
        for i in 0..n {
            // Summed in neighbor-index order, independent of adjacency list order.
            let mut incident: Vec<(usize, f64)> = self
                .graph
                .edges(NodeIndex::new(i))
                .map(|e| {
                    let other = if e.source().index() == i {
                        e.target().index()
                    } else {
                        e.source().index()
                    };
                    (other, *e.weight())
                })
                .collect();
            incident.sort_by_key(|&(j, _)| j);
            degrees.push(incident.iter().map(|&(_, w)| w).sum::<f64>());
        }
        let total_weight = degrees.iter().sum::<f64>() / 2.0;

        Ok(Graph {
            inner: self.graph,
            index: self.index,
            degrees,
            total_weight,
        })
    }
}

impl<N> Default for GraphBuilder<N>
where
    N: Clone + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable weighted undirected graph.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    inner: UnGraph<N, f64>,
    index: HashMap<N, NodeIndex>,
    degrees: Vec<f64>,
    total_weight: f64,
}

impl<N> Graph<N>
where
    N: Clone + Eq + Hash + fmt::Debug,
{
    /// Build a graph from edge records, indexing nodes by first appearance.
    pub fn from_edges<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = EdgeRecord<N>>,
    {
        let mut builder = GraphBuilder::new();
        for record in records {
            builder.add_record(record)?;
        }
        builder.build()
    }

    /// Index of a node id.
    pub fn index_of(&self, id: &N) -> Option<usize> {
        self.index.get(id).map(|idx| idx.index())
    }

    /// Attach partition signs to node ids, in index order.
    pub fn labeled<'a>(&'a self, partition: &Partition) -> Result<Vec<(&'a N, i8)>> {
        if partition.len() != self.node_count() {
            return Err(Error::DimensionMismatch {
                expected: self.node_count(),
                found: partition.len(),
            });
        }
        Ok(self
            .inner
            .node_indices()
            .map(|idx| (&self.inner[idx], partition.sign(idx.index())))
            .collect())
    }
}

impl<N> Graph<N> {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Weighted degree of node `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= node_count()`.
    pub fn degree(&self, i: usize) -> f64 {
        self.degrees[i]
    }

    /// All weighted degrees, in index order.
    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    /// Total edge weight `m` (each edge counted once).
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Weight of edge `(i, j)`, if present.
    pub fn has_edge(&self, i: usize, j: usize) -> Option<f64> {
        let n = self.node_count();
        if i >= n || j >= n {
            return None;
        }
        self.inner
            .find_edge(NodeIndex::new(i), NodeIndex::new(j))
            .map(|e| self.inner[e])
    }

    /// Node id at index `i`.
    pub fn node(&self, i: usize) -> Option<&N> {
        self.inner.node_weight(NodeIndex::new(i))
    }

    /// Node ids in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.inner.node_indices().map(move |idx| &self.inner[idx])
    }

    /// Edges as `(i, j, weight)` with `i < j`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.inner.edge_references().map(|e| {
            let (a, b) = (e.source().index(), e.target().index());
            (a.min(b), a.max(b), *e.weight())
        })
    }

    /// Underlying petgraph storage.
    pub fn as_petgraph(&self) -> &UnGraph<N, f64> {
        &self.inner
    }
}

impl Graph<usize> {
    /// Convert a petgraph graph, keeping its node indices.
    ///
    /// Isolated nodes are kept (degree 0).
    pub fn from_petgraph<N, E: EdgeWeight>(graph: &UnGraph<N, E>) -> Result<Self> {
        let mut builder = GraphBuilder::new();
        for idx in graph.node_indices() {
            let _ = builder.add_node(idx.index());
        }
        for edge in graph.edge_references() {
            builder.add_edge(
                edge.source().index(),
                edge.target().index(),
                edge.weight().weight(),
            )?;
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_follows_first_appearance() {
        let graph = Graph::from_edges(vec![
            EdgeRecord::new("c", "a"),
            EdgeRecord::new("a", "b"),
        ])
        .unwrap();

        assert_eq!(graph.index_of(&"c"), Some(0));
        assert_eq!(graph.index_of(&"a"), Some(1));
        assert_eq!(graph.index_of(&"b"), Some(2));
        assert_eq!(graph.node(2), Some(&"b"));
    }

    #[test]
    fn test_degrees_and_total_weight() {
        let graph = Graph::from_edges(vec![
            EdgeRecord::weighted(0, 1, 2.0),
            EdgeRecord::weighted(1, 2, 0.5),
            EdgeRecord::new(2, 0),
        ])
        .unwrap();

        assert_eq!(graph.degrees(), &[3.0, 2.5, 1.5]);
        assert_eq!(graph.total_weight(), 3.5);
        assert_eq!(graph.has_edge(1, 0), Some(2.0));
        assert_eq!(graph.has_edge(0, 0), None);
        assert_eq!(graph.has_edge(0, 9), None);
    }

    #[test]
    fn test_identical_duplicate_collapses() {
        let graph = Graph::from_edges(vec![
            EdgeRecord::weighted("a", "b", 2.0),
            EdgeRecord::weighted("b", "a", 2.0),
        ])
        .unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.total_weight(), 2.0);
    }

    #[test]
    fn test_conflicting_duplicate_rejected() {
        let result = Graph::from_edges(vec![
            EdgeRecord::weighted("a", "b", 2.0),
            EdgeRecord::weighted("b", "a", 3.0),
        ]);
        assert!(matches!(result, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn test_empty_edge_list_rejected() {
        let result = Graph::<&str>::from_edges(Vec::new());
        assert!(matches!(result, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn test_self_loop_rejected() {
        let result = Graph::from_edges(vec![EdgeRecord::new(1, 1)]);
        assert!(matches!(result, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn test_negative_and_nan_weight_rejected() {
        let negative = Graph::from_edges(vec![EdgeRecord::weighted(0, 1, -1.0)]);
        assert!(matches!(negative, Err(Error::InvalidGraph(_))));

        let nan = Graph::from_edges(vec![EdgeRecord::weighted(0, 1, f64::NAN)]);
        assert!(matches!(nan, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn test_from_petgraph_keeps_isolated_nodes() {
        let mut pg = UnGraph::<(), u32>::new_undirected();
        let a = pg.add_node(());
        let b = pg.add_node(());
        let _ = pg.add_node(());
        let _ = pg.add_edge(a, b, 4);

        let graph = Graph::from_petgraph(&pg).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.degrees(), &[4.0, 4.0, 0.0]);
        assert_eq!(graph.total_weight(), 4.0);
    }

    #[test]
    fn test_numeric_weights_convert_exactly() {
        assert_eq!(EdgeWeight::weight(&u32::MAX), 4_294_967_295.0);
        assert_eq!(EdgeWeight::weight(&-3i16), -3.0);
        assert_eq!(EdgeWeight::weight(&0.5f32), 0.5);
        assert_eq!(EdgeWeight::weight(&()), 1.0);
    }

    #[test]
    fn test_labeled_length_mismatch() {
        let graph = Graph::from_edges(vec![EdgeRecord::new(0, 1)]).unwrap();
        let partition = Partition::trivial(3);
        assert!(matches!(
            graph.labeled(&partition),
            Err(Error::DimensionMismatch { expected: 2, found: 3 })
        ));
    }
}
