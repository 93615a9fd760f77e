//! Graph algorithms behind the dependency tree: a minimum spanning forest over
//! weighted edges, re-rooting it as a directed tree, and the breadth-first
//! order in which positions can be sampled.

use std::collections::VecDeque;

use tracing::trace;

/// An undirected weighted edge between two positions, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

/// Disjoint-set forest with path halving and union by size.
struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `x` and `y`; returns false if they were already joined.
    fn union(&mut self, x: usize, y: usize) -> bool {
        let (mut rx, mut ry) = (self.find(x), self.find(y));
        if rx == ry {
            return false;
        }
        if self.size[rx] < self.size[ry] {
            std::mem::swap(&mut rx, &mut ry);
        }
        self.parent[ry] = rx;
        self.size[rx] += self.size[ry];
        true
    }
}

/// Kruskal's algorithm over `edges` on `n` nodes.
///
/// Edges are considered in order of `(weight, a, b)`, so ties are broken
/// deterministically by position. Nodes that no edge connects stay isolated,
/// giving a spanning forest.
pub fn minimum_spanning_forest(n: usize, edges: &[Edge]) -> Vec<Edge> {
    let mut sorted = edges.to_vec();
    sorted.sort_by(|x, y| {
        x.weight
            .total_cmp(&y.weight)
            .then(x.a.cmp(&y.a))
            .then(x.b.cmp(&y.b))
    });

    let mut sets = UnionFind::new(n);
    let mut forest = Vec::with_capacity(n.saturating_sub(1));
    for edge in sorted {
        if sets.union(edge.a, edge.b) {
            trace!(a = edge.a, b = edge.b, weight = edge.weight, "spanning edge");
            forest.push(edge);
            if forest.len() + 1 == n {
                break;
            }
        }
    }
    forest
}

/// Directs a forest away from `root` and returns the parent of every node.
///
/// The root gets `None`. Nodes reached by the depth-first traversal get their
/// traversal predecessor; nodes in other components are attached directly to
/// the root, so the result is always a single tree.
pub fn root_forest(n: usize, forest: &[Edge], root: usize) -> Vec<Option<usize>> {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for edge in forest {
        adjacency[edge.a].push(edge.b);
        adjacency[edge.b].push(edge.a);
    }

    let mut parent = vec![None; n];
    let mut visited = vec![false; n];
    let mut stack = vec![root];
    visited[root] = true;

    while let Some(node) = stack.pop() {
        for &next in &adjacency[node] {
            if !visited[next] {
                visited[next] = true;
                parent[next] = Some(node);
                stack.push(next);
            }
        }
    }

    for (node, seen) in visited.iter().enumerate() {
        if !seen {
            parent[node] = Some(root);
        }
    }

    parent
}

/// Breadth-first order of the tree described by `parent`, starting at the
/// node without a parent. Children are visited in increasing index order.
pub fn sample_order(parent: &[Option<usize>]) -> Vec<usize> {
    let n = parent.len();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut roots = Vec::new();
    for (node, p) in parent.iter().enumerate() {
        match p {
            Some(p) => children[*p].push(node),
            None => roots.push(node),
        }
    }

    let mut order = Vec::with_capacity(n);
    let mut queue: VecDeque<usize> = roots.into_iter().collect();
    while let Some(node) = queue.pop_front() {
        order.push(node);
        queue.extend(children[node].iter().copied());
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: usize, b: usize, weight: f64) -> Edge {
        Edge { a, b, weight }
    }

    #[test]
    fn test_minimum_spanning_forest_picks_lightest_edges() {
        let edges = [
            edge(0, 1, -1.0),
            edge(0, 2, -0.1),
            edge(1, 2, -0.5),
            edge(2, 3, -0.9),
            edge(1, 3, -0.2),
        ];
        let forest = minimum_spanning_forest(4, &edges);

        assert_eq!(forest.len(), 3);
        let total: f64 = forest.iter().map(|e| e.weight).sum();
        assert!((total - (-2.4)).abs() < 1e-12);
    }

    #[test]
    fn test_minimum_spanning_forest_ties_are_deterministic() {
        let edges = [edge(1, 2, -1.0), edge(0, 2, -1.0), edge(0, 1, -1.0)];
        let forest = minimum_spanning_forest(3, &edges);
        assert_eq!(forest, vec![edge(0, 1, -1.0), edge(0, 2, -1.0)]);
    }

    #[test]
    fn test_minimum_spanning_forest_without_edges() {
        assert!(minimum_spanning_forest(5, &[]).is_empty());
    }

    #[test]
    fn test_root_forest_directs_away_from_root() {
        // Path 2 - 0 - 1 - 3
        let forest = [edge(0, 2, -1.0), edge(0, 1, -1.0), edge(1, 3, -1.0)];
        let parent = root_forest(4, &forest, 0);
        assert_eq!(parent, vec![None, Some(0), Some(0), Some(1)]);
    }

    #[test]
    fn test_root_forest_reroots_deep_path() {
        // Path 0 - 3 - 2 - 1 given in arbitrary edge order
        let forest = [edge(1, 2, -1.0), edge(2, 3, -1.0), edge(0, 3, -1.0)];
        let parent = root_forest(4, &forest, 0);
        assert_eq!(parent, vec![None, Some(2), Some(3), Some(0)]);
    }

    #[test]
    fn test_root_forest_attaches_unreachable_nodes_to_root() {
        let forest = [edge(2, 3, -1.0)];
        let parent = root_forest(4, &forest, 0);
        assert_eq!(parent, vec![None, Some(0), Some(0), Some(0)]);
    }

    #[test]
    fn test_sample_order_is_breadth_first() {
        //      0
        //     / \
        //    2   3
        //    |
        //    1
        let parent = vec![None, Some(2), Some(0), Some(0)];
        assert_eq!(sample_order(&parent), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_sample_order_single_node() {
        assert_eq!(sample_order(&[None]), vec![0]);
    }
}
