/*!
# All-Pairs Shortest Paths

[`AllPairs`] precomputes the minimum cost between every ordered pair of nodes together with a
*next-hop* table using the Floyd–Warshall algorithm in `O(n^3)` time and `O(n^2)` memory.
Afterwards, a shortest path between any two nodes can be reconstructed in time linear in its
length.

Unreachable pairs have an infinite distance, represented as `None`.

# Precondition
Costs must be non-negative (or at least free of negative cycles). This is **not** checked.
*/

use super::*;
use tracing::debug;

/// Distance and next-hop tables of all pairs of nodes.
///
/// # Examples
/// ```
/// use wgraphs::{prelude::*, algo::*};
///
/// let g: Graph<char, u32> =
///     Graph::from_links(['A', 'B', 'C'], [(0, 1, 1), (1, 2, 1), (0, 2, 5)]).unwrap();
/// let pairs = AllPairs::new(&g);
///
/// assert_eq!(pairs.distance(0, 2), Some(&2));
/// assert_eq!(pairs.distance(2, 0), None);
/// assert_eq!(pairs.find_path(0, 2), vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AllPairs<C> {
    distance: Vec<Vec<Option<C>>>,
    next_hop: Vec<Vec<Option<OptionalNode>>>,
}

impl<C: Cost> AllPairs<C> {
    /// Computes the distance and next-hop tables of `graph`
    pub fn new<G>(graph: &G) -> Self
    where
        G: AdjacencyList<LinkCost = C>,
    {
        let n = graph.len();
        let mut distance: Vec<Vec<Option<C>>> = vec![vec![None; n]; n];
        let mut next_hop: Vec<Vec<Option<OptionalNode>>> = vec![vec![None; n]; n];

        for u in graph.vertices() {
            distance[u as usize][u as usize] = Some(C::zero());

            for link in graph.links_of(u) {
                // self-loops never beat the empty path; of multiple links keep the cheapest
                if link.to == u {
                    continue;
                }

                let entry = &mut distance[u as usize][link.to as usize];
                if entry
                    .as_ref()
                    .is_none_or(|current| link.cost.is_cheaper_than(current))
                {
                    *entry = Some(link.cost.clone());
                    next_hop[u as usize][link.to as usize] = OptionalNode::new(link.to);
                }
            }
        }

        let mut improvements = 0usize;
        for via in 0..n {
            for from in 0..n {
                let Some(first) = distance[from][via].clone() else {
                    continue;
                };

                for to in 0..n {
                    let Some(second) = distance[via][to].as_ref() else {
                        continue;
                    };

                    let candidate = first.accumulate(second);
                    if distance[from][to]
                        .as_ref()
                        .is_none_or(|current| candidate.is_cheaper_than(current))
                    {
                        distance[from][to] = Some(candidate);
                        next_hop[from][to] = OptionalNode::new(via as Node);
                        improvements += 1;
                    }
                }
            }
        }

        debug!(nodes = n, improvements, "computed all-pairs distances");
        Self { distance, next_hop }
    }

    /// Returns the number of nodes covered by the tables
    pub fn number_of_nodes(&self) -> NumNodes {
        self.distance.len() as NumNodes
    }

    /// Returns the minimum cost of a path from `from` to `to` or `None` if `to` is not
    /// reachable from `from`.
    /// ** Panics if `from >= n` or `to >= n` **
    pub fn distance(&self, from: Node, to: Node) -> Option<&C> {
        self.distance[from as usize][to as usize].as_ref()
    }

    /// Returns the nodes of a shortest path from `from` to `to` (both included).
    ///
    /// The path is empty if `to` is not reachable from `from`, and `[from]` if `from == to`.
    /// ** Panics if `from >= n` or `to >= n` **
    pub fn find_path(&self, from: Node, to: Node) -> Vec<Node> {
        if self.distance(from, to).is_none() {
            return Vec::new();
        }

        let mut path = vec![from];
        if from == to {
            return path;
        }

        // segments still to unfold; the left segment is always on top
        let mut segments = vec![(from, to)];
        while let Some((u, v)) = segments.pop() {
            let Some(hop) = self.next_hop[u as usize][v as usize].map(|h| h.get()) else {
                return Vec::new();
            };

            if hop == v {
                path.push(v);
            } else {
                segments.push((hop, v));
                segments.push((u, hop));
            }
        }

        path
    }
}

/// Provides all-pairs shortest paths directly on graphs.
pub trait AllPairsShortestPaths: AdjacencyList {
    /// Computes the distance and next-hop tables of all pairs of nodes
    fn all_pairs(&self) -> AllPairs<Self::LinkCost>
    where
        Self::LinkCost: Cost,
    {
        AllPairs::new(self)
    }
}

impl<G> AllPairsShortestPaths for G where G: AdjacencyList {}
