/*!
# Topological Sorting

Computes an order of the nodes in which every link points forward, using Kahn's algorithm:
- count the in-degree of every node (multi-links count multiple times),
- seed a FIFO queue with all nodes of in-degree 0 in index order,
- repeatedly dequeue a node, append it to the order, and decrement the in-degrees of its
  targets, enqueuing every target whose in-degree drops to 0.

If some node keeps a positive in-degree, the graph contains a directed cycle (self-loops
included). The order is deterministic given the link order of the graph.
*/

use super::*;
use std::collections::VecDeque;
use tracing::debug;

/// Iterator yielding nodes in topological order.
///
/// If the graph has a cycle, iteration terminates early without covering all nodes; use
/// [`TopoSearch::is_complete`] after exhaustion or [`Topological::topological_order`]
/// to distinguish both cases.
pub struct TopoSearch<'a, G> {
    graph: &'a G,
    in_degs: Vec<NumNodes>,
    queue: VecDeque<Node>,
    emitted: NumNodes,
}

impl<'a, G> TopoSearch<'a, G>
where
    G: AdjacencyList,
{
    /// Constructs a new topological search, initializing in-degree counts and collecting the
    /// initial set of zero in-degree nodes.
    pub fn new(graph: &'a G) -> Self {
        let in_degs = graph.in_degrees();

        let queue: VecDeque<Node> = in_degs
            .iter()
            .enumerate()
            .filter_map(|(i, d)| if *d == 0 { Some(i as Node) } else { None })
            .collect();

        Self {
            graph,
            in_degs,
            queue,
            emitted: 0,
        }
    }

    /// Returns *true* if every node of the graph has been emitted
    pub fn is_complete(&self) -> bool {
        self.emitted == self.graph.number_of_nodes()
    }

    /// Returns the number of nodes that still have a positive in-degree
    pub fn number_of_blocked_nodes(&self) -> usize {
        self.in_degs.iter().filter(|&&d| d > 0).count()
    }
}

impl<G> Iterator for TopoSearch<'_, G>
where
    G: AdjacencyList,
{
    type Item = Node;

    /// Returns the next node in topological order, if available.
    fn next(&mut self) -> Option<Self::Item> {
        let u = self.queue.pop_front()?;

        for v in self.graph.neighbors_of(u) {
            self.in_degs[v as usize] -= 1;
            if self.in_degs[v as usize] == 0 {
                self.queue.push_back(v);
            }
        }

        self.emitted += 1;
        Some(u)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.graph.len()))
    }
}

/// Provides topological sorting directly on graphs.
pub trait Topological: AdjacencyList {
    /// Returns an iterator yielding nodes in topological order.
    /// Terminates early if the graph contains a cycle.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g: Graph<char> = Graph::from_links(['A', 'B', 'C'], [(0, 1), (0, 2)]).unwrap();
    /// let order: Vec<_> = g.topo_search().collect();
    /// assert_eq!(order, vec![0, 1, 2]);
    /// ```
    fn topo_search(&self) -> TopoSearch<'_, Self> {
        TopoSearch::new(self)
    }

    /// Returns all nodes in topological order or [`CycleDetected`] if the graph has a
    /// directed cycle. An empty graph has the empty order.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g: Graph<char> = Graph::from_links(['A', 'B'], [(0, 1), (1, 0)]).unwrap();
    /// assert!(g.topological_order().is_err());
    /// ```
    fn topological_order(&self) -> Result<Vec<Node>, CycleDetected> {
        let mut search = self.topo_search();
        let order: Vec<Node> = search.by_ref().collect();

        if search.is_complete() {
            Ok(order)
        } else {
            let unordered = search.number_of_blocked_nodes();
            debug!(unordered, "topological sort found a cycle");
            Err(CycleDetected { unordered })
        }
    }

    /// Returns a vector `ranking` where `ranking[u]` is the position of `u` in the
    /// topological order, or [`CycleDetected`] if the graph has a directed cycle.
    fn topological_ranking(&self) -> Result<Vec<NumNodes>, CycleDetected> {
        let order = self.topological_order()?;

        let mut ranking = vec![INVALID_NODE; self.len()];
        for (rank, u) in order.into_iter().enumerate() {
            ranking[u as usize] = rank as NumNodes;
        }
        Ok(ranking)
    }

    /// Returns *true* if the graph has no directed cycle
    fn is_acyclic(&self) -> bool {
        let mut search = self.topo_search();
        search.by_ref().for_each(drop);
        search.is_complete()
    }
}

impl<G> Topological for G where G: AdjacencyList {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn two_cycle() {
        let g: Graph<char> = Graph::from_links(['A', 'B'], [(0, 1), (1, 0)]).unwrap();
        assert_eq!(g.topological_order(), Err(CycleDetected { unordered: 2 }));
        assert!(!g.is_acyclic());
    }

    #[test]
    fn fork() {
        let g: Graph<char> = Graph::from_links(['A', 'B', 'C'], [(0, 1), (0, 2)]).unwrap();
        let order = g.topological_order().unwrap();
        assert_eq!(order[0], 0);
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn fifo_order() {
        // 3 -> 0, 3 -> 1, 2 -> 1, 0 -> 4
        let g: Graph<u8> =
            Graph::from_links([0, 1, 2, 3, 4], [(3, 0), (3, 1), (2, 1), (0, 4)]).unwrap();
        assert_eq!(g.topological_order().unwrap(), vec![2, 3, 0, 1, 4]);
        assert_eq!(g.topological_ranking().unwrap(), vec![2, 3, 0, 1, 4]);
    }

    #[test]
    fn self_loop_and_multi_links() {
        let g: Graph<u8> = Graph::from_links([0, 1], [(0, 1), (0, 1)]).unwrap();
        assert_eq!(g.topological_order().unwrap(), vec![0, 1]);

        let g: Graph<u8> = Graph::from_links([0, 1], [(0, 1), (1, 1)]).unwrap();
        assert_eq!(g.topological_order(), Err(CycleDetected { unordered: 1 }));
    }

    #[test]
    fn empty_graph() {
        let g: Graph<u8> = Graph::from_links(Vec::new(), Vec::<(Node, Node)>::new()).unwrap();
        assert_eq!(g.topological_order().unwrap(), Vec::<Node>::new());
    }

    #[test]
    fn random_dags() {
        let rng = &mut Pcg64Mcg::seed_from_u64(13);

        for n in [5, 20, 50] {
            for _ in 0..10 {
                let g = random_dag(rng, n, 3 * n);
                let order = g.topological_order().unwrap();

                assert_eq!(order.iter().copied().sorted().collect_vec(), g.vertices().collect_vec());

                let ranking = g.topological_ranking().unwrap();
                assert!(g.edges().all(|Edge(u, v)| ranking[u as usize] < ranking[v as usize]));

                // idempotent
                assert_eq!(g.topological_order().unwrap(), order);
            }
        }
    }

    #[test]
    fn random_cycles_detected() {
        let rng = &mut Pcg64Mcg::seed_from_u64(17);

        for n in [5, 20, 50] {
            let g = random_dag(rng, n, 2 * n);
            let mut links = g.edges().map(|Edge(u, v)| (u, v)).collect_vec();
            links.push((n - 1, 0));
            links.extend((0..n - 1).map(|u| (u, u + 1)));

            let g: Graph<Node> = Graph::from_links(0..n, links).unwrap();
            assert!(g.topological_order().is_err());
        }
    }
}
