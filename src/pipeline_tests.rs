#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::community::{NewmanBisection, RecursiveBisection};
    use crate::graph::{EdgeRecord, Graph};
    use crate::io::parse_edge_list;
    use crate::matrix::{build_matrices, ModularityMatrix};
    use crate::partition::Partition;
    use crate::refine::{refine, RefineConfig};
    use crate::score::{modularity, score};
    use crate::{Error, Result};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn from_text(text: &str) -> Result<Graph<String>> {
        Graph::from_edges(parse_edge_list(text.as_bytes())?)
    }

    #[test]
    fn test_triangle_stays_whole() -> Result<()> {
        let graph = from_text("A B\nB C\nC A\n")?;
        let (_, b) = build_matrices(&graph)?;
        assert_eq!(b.total_weight(), 3.0);
        assert_abs_diff_eq!(b.get(0, 1), 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.get(2, 2), -2.0 / 3.0, epsilon = 1e-12);

        let result = NewmanBisection::new().bisect(&graph)?;
        assert!(!result.divisible);
        assert!(!result.is_split());
        assert!(result.flips.is_empty());
        assert_abs_diff_eq!(result.modularity, 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_bridged_triangles_split() -> Result<()> {
        let text = "% two triangles and a bridge\na b\nb c\nc a\nd e\ne f\nf d\nc d\n";
        let graph = from_text(text)?;
        let result = NewmanBisection::new().bisect(&graph)?;

        assert!(result.is_split());
        assert_abs_diff_eq!(result.modularity, 5.0 / 14.0, epsilon = 1e-12);

        let labeled = graph.labeled(&result.partition)?;
        let side = |id: &str| labeled.iter().find(|(n, _)| n.as_str() == id).unwrap().1;
        assert_eq!(side("a"), side("b"));
        assert_eq!(side("b"), side("c"));
        assert_eq!(side("d"), side("e"));
        assert_eq!(side("e"), side("f"));
        assert_ne!(side("a"), side("d"));
        Ok(())
    }

    #[test]
    fn test_tiny_weights_split_like_unit_weights() -> Result<()> {
        let bridged = |w: f64| {
            let pairs = [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)];
            Graph::from_edges(pairs.iter().map(|&(u, v)| EdgeRecord::weighted(u, v, w)))
        };
        let unit = NewmanBisection::new().bisect(&bridged(1.0)?)?;
        let tiny = NewmanBisection::new().bisect(&bridged(1e-12)?)?;

        assert!(tiny.is_split());
        assert_eq!(tiny.partition, unit.partition);
        assert_abs_diff_eq!(tiny.modularity, 5.0 / 14.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_single_heavy_edge_stays_whole() -> Result<()> {
        let graph = from_text("x y 5\n")?;
        assert_eq!(graph.total_weight(), 5.0);

        let result = NewmanBisection::new().bisect(&graph)?;
        assert_eq!(result.partition, Partition::trivial(2));
        assert_abs_diff_eq!(result.modularity, 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_zero_weight_input_is_degenerate() -> Result<()> {
        let graph = from_text("x y 0\ny z 0\n")?;
        assert!(matches!(
            NewmanBisection::new().bisect(&graph),
            Err(Error::DegenerateGraph)
        ));
        assert!(matches!(
            RecursiveBisection::new().partition(&graph),
            Err(Error::DegenerateGraph)
        ));
        Ok(())
    }

    #[test]
    fn test_refining_converged_output_is_noop() -> Result<()> {
        let graph = Graph::from_edges(vec![
            EdgeRecord::weighted(0, 1, 3.0),
            EdgeRecord::weighted(1, 2, 2.5),
            EdgeRecord::weighted(0, 2, 1.7),
            EdgeRecord::weighted(3, 4, 2.9),
            EdgeRecord::weighted(4, 5, 3.3),
            EdgeRecord::weighted(3, 5, 2.1),
            EdgeRecord::weighted(2, 3, 0.4),
            EdgeRecord::weighted(1, 4, 0.3),
        ])?;
        let b = ModularityMatrix::from_graph(&graph)?;
        let first = NewmanBisection::new().bisect_matrix(&b)?;
        let again = refine(&b, first.partition.clone(), RefineConfig::new())?;

        assert!(again.flips.is_empty());
        assert_eq!(again.partition, first.partition);
        assert_eq!(first.labels(), vec![0, 0, 0, 1, 1, 1]);
        Ok(())
    }

    #[test]
    fn test_recursive_agrees_with_bisection_on_two_groups() -> Result<()> {
        let graph = from_text("a b\nb c\nc a\nd e\ne f\nf d\nc d\n")?;
        let split = NewmanBisection::new().bisect(&graph)?;
        let communities = RecursiveBisection::new().partition(&graph)?;

        assert_eq!(communities.count, 2);
        assert_eq!(communities.labels, split.labels());
        assert_abs_diff_eq!(communities.modularity, split.modularity, epsilon = 1e-12);
        Ok(())
    }

    fn random_graph() -> impl Strategy<Value = Graph<usize>> {
        (2usize..12).prop_flat_map(|n| {
            proptest::collection::vec((0..n, 0..n, 1u32..6), 1..40).prop_filter_map(
                "needs a non-loop edge",
                |raw| {
                    let mut edges = std::collections::BTreeMap::new();
                    for (u, v, w) in raw {
                        if u != v {
                            edges.insert((u.min(v), u.max(v)), f64::from(w));
                        }
                    }
                    if edges.is_empty() {
                        return None;
                    }
                    Graph::from_edges(
                        edges
                            .into_iter()
                            .map(|((u, v), w)| EdgeRecord::weighted(u, v, w)),
                    )
                    .ok()
                },
            )
        })
    }

    proptest! {
        #[test]
        fn bisection_is_consistent(graph in random_graph()) {
            let n = graph.node_count();
            let b = ModularityMatrix::from_graph(&graph).unwrap();
            let result = NewmanBisection::new().bisect_matrix(&b).unwrap();

            prop_assert!(result.flips.len() <= n);
            prop_assert!(result.modularity >= result.spectral_modularity);
            prop_assert!((score(&result.partition, &b).unwrap() - result.modularity).abs() < 1e-9);
            let general = modularity(&graph, &result.partition.labels()).unwrap();
            prop_assert!((general - result.modularity).abs() < 1e-9);
            if !result.divisible {
                prop_assert!(result.partition.is_trivial());
            }
        }

        #[test]
        fn bisection_is_deterministic(graph in random_graph()) {
            let first = NewmanBisection::new().bisect(&graph).unwrap();
            let second = NewmanBisection::new().bisect(&graph).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn recursion_never_loses_modularity(graph in random_graph()) {
            let communities = RecursiveBisection::new().partition(&graph).unwrap();
            prop_assert!(communities.count >= 1);
            prop_assert!(communities.count <= graph.node_count());
            prop_assert!(communities.modularity >= -1e-9);
            prop_assert_eq!(communities.labels[0], 0);
        }
    }
}
