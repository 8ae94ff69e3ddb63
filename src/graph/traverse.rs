//! Cycle detection over relation-filtered adjacency.
//!
//! A three-color depth-first search visits every node in insertion order (so
//! disconnected components are covered) and reports each back edge as a
//! closed path `[start, ..., start]` in source-to-target order.

use std::collections::HashMap;

use crate::node::NodeId;
use crate::relation::RelationType;

use super::index::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet reached.
    White,
    /// On the current DFS path.
    Gray,
    /// Fully explored.
    Black,
}

/// Find the cycles of the subgraph made of edges whose relation passes `filter`.
///
/// Traversal order is deterministic: roots in node insertion order, neighbors
/// in edge insertion order. The search is iterative, so deep chains cannot
/// overflow the call stack.
pub fn find_cycles(graph: &Graph, filter: impl Fn(RelationType) -> bool) -> Vec<Vec<NodeId>> {
    let nodes = graph.nodes();
    let index: HashMap<&NodeId, usize> =
        nodes.iter().enumerate().map(|(i, n)| (&n.id, i)).collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in graph.edges().iter().filter(|e| filter(e.relation)) {
        if let (Some(&s), Some(&t)) = (index.get(&edge.source), index.get(&edge.target)) {
            adjacency[s].push(t);
        }
    }

    let mut color = vec![Color::White; nodes.len()];
    let mut parent: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut cycles = Vec::new();

    for root in 0..nodes.len() {
        if color[root] != Color::White {
            continue;
        }
        color[root] = Color::Gray;
        // (node, position of the next neighbor to examine)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let Some(&next) = adjacency[node].get(cursor) else {
                color[node] = Color::Black;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match color[next] {
                Color::Gray => {
                    let path = close_cycle(&parent, node, next);
                    cycles.push(path.into_iter().map(|i| nodes[i].id.clone()).collect());
                }
                Color::White => {
                    parent[next] = Some(node);
                    color[next] = Color::Gray;
                    stack.push((next, 0));
                }
                Color::Black => {}
            }
        }
    }

    cycles
}

/// Rebuild the loop closed by the back edge `from -> to`.
fn close_cycle(parent: &[Option<usize>], from: usize, to: usize) -> Vec<usize> {
    let mut path = vec![to];
    let mut current = Some(from);
    while let Some(c) = current {
        if c == to {
            break;
        }
        path.push(c);
        current = parent[c];
    }
    path.push(to);
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use crate::node::{Node, NodeType};

    fn build(ids: &[&str], edges: &[(&str, &str, RelationType)]) -> Graph {
        let mut g = Graph::new();
        for &id in ids {
            g.add_node(Node::with_id(id, id, NodeType::Concept).unwrap()).unwrap();
        }
        for &(s, t, r) in edges {
            g.add_edge(Edge::new(s, t, r).unwrap()).unwrap();
        }
        g
    }

    fn names(cycles: &[Vec<NodeId>]) -> Vec<Vec<&str>> {
        cycles
            .iter()
            .map(|c| c.iter().map(|n| n.as_str()).collect())
            .collect()
    }

    #[test]
    fn two_node_cycle() {
        use RelationType::Causes;
        let g = build(&["a", "b"], &[("a", "b", Causes), ("b", "a", Causes)]);
        let cycles = find_cycles(&g, RelationType::is_causal);
        assert_eq!(names(&cycles), vec![vec!["a", "b", "a"]]);
    }

    #[test]
    fn three_node_cycle_in_source_order() {
        use RelationType::Requires;
        let g = build(
            &["a", "b", "c"],
            &[("a", "b", Requires), ("b", "c", Requires), ("c", "a", Requires)],
        );
        let cycles = find_cycles(&g, RelationType::is_causal);
        assert_eq!(names(&cycles), vec![vec!["a", "b", "c", "a"]]);
    }

    #[test]
    fn filter_excludes_other_relations() {
        let g = build(
            &["a", "b"],
            &[("a", "b", RelationType::Causes), ("b", "a", RelationType::Supports)],
        );
        assert!(find_cycles(&g, RelationType::is_causal).is_empty());
        assert!(find_cycles(&g, |_| true).len() == 1);
    }

    #[test]
    fn dag_with_shared_descendant_has_no_cycle() {
        use RelationType::Contains;
        let g = build(
            &["a", "b", "c", "d"],
            &[
                ("a", "b", Contains),
                ("a", "c", Contains),
                ("b", "d", Contains),
                ("c", "d", Contains),
            ],
        );
        assert!(find_cycles(&g, RelationType::is_hierarchical).is_empty());
    }

    #[test]
    fn disconnected_components_are_covered() {
        use RelationType::Causes;
        let g = build(
            &["a", "b", "x", "y"],
            &[("a", "b", Causes), ("x", "y", Causes), ("y", "x", Causes)],
        );
        let cycles = find_cycles(&g, RelationType::is_causal);
        assert_eq!(names(&cycles), vec![vec!["x", "y", "x"]]);
    }

    #[test]
    fn paths_are_closed_and_simple() {
        use RelationType::DependsOn;
        let g = build(
            &["a", "b", "c", "d"],
            &[
                ("a", "b", DependsOn),
                ("b", "c", DependsOn),
                ("c", "a", DependsOn),
                ("c", "d", DependsOn),
                ("d", "b", DependsOn),
            ],
        );
        let cycles = find_cycles(&g, RelationType::is_causal);
        assert_eq!(cycles.len(), 2);
        for cycle in &cycles {
            assert_eq!(cycle.first(), cycle.last());
            let distinct: std::collections::HashSet<_> = cycle.iter().collect();
            assert_eq!(distinct.len(), cycle.len() - 1);
        }
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let mut g = Graph::new();
        let n = 50_000;
        for i in 0..n {
            g.add_node(Node::with_id(format!("n{i}"), "x", NodeType::State).unwrap())
                .unwrap();
        }
        for i in 0..n - 1 {
            let edge = Edge::new(format!("n{i}"), format!("n{}", i + 1), RelationType::Causes);
            g.add_edge(edge.unwrap()).unwrap();
        }
        g.add_edge(Edge::new(format!("n{}", n - 1), "n0", RelationType::Causes).unwrap())
            .unwrap();
        let cycles = find_cycles(&g, RelationType::is_causal);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), n + 1);
    }
}
