/*!
Graph traversal strategies.

This module provides four interchangeable strategies that walk a graph from a root node and
report the **links** they take, each reachable node being reached by at most one reported
link (the root by none):

- [`Traverse::Width`]: breadth-first; a FIFO frontier of links.
- [`Traverse::Depth`]: depth-first; a LIFO frontier of links.
- [`Traverse::Mark`]: greedy shortest-path (Dijkstra-style); repeatedly commits the frontier
  link minimizing `mark(from) + cost(link)`.
- [`Traverse::Remark`]: relaxation-based (Bellman–Ford-style); relaxes marks until stable and
  then reports the shortest-path tree ordered by final mark.

All strategies are exposed as iterators yielding [`LinkId`]s, so traversals can be consumed
lazily or stopped early. The [`Traversal`] trait exposes them directly on graphs; a
visitor-style interface is available via [`Traversal::traverse`].

Scratch state (visited flags, marks) lives in the iterators, never in the graph.

# Precondition
`Mark` and `Remark` assume non-negative costs. Negative costs are not detected; with
negative cycles `Remark` does not terminate.
*/

use super::*;
use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, VecDeque},
};
use tracing::trace;

/// Closed set of traversal strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Traverse {
    /// Breadth-first search
    #[default]
    Width,
    /// Depth-first search
    Depth,
    /// Greedy shortest-path search (Dijkstra-style)
    Mark,
    /// Relaxation-based shortest-path search (Bellman–Ford-style)
    Remark,
}

/// Common interface for querying visited-states during a traversal.
pub trait TraversalState {
    /// Checks if a given node `u` has already been reached.
    fn did_visit_node(&self, u: Node) -> bool;
}

/// Abstraction for the traversal frontier data structure.
///
/// A `LinkSequencer` stores the links still to be taken during a traversal.
/// Different implementations determine the traversal order:
///
/// - [`VecDeque`] -> queue semantics -> **Width**
/// - [`Vec`] -> stack semantics -> **Depth**
pub trait LinkSequencer<T> {
    /// Creates a new, empty sequencer.
    fn init() -> Self;

    /// Pushes a link into the frontier.
    fn push(&mut self, item: T);

    /// Removes and returns the next link from the frontier.
    fn pop(&mut self) -> Option<T>;

    /// Returns the number of items currently in the frontier.
    fn cardinality(&self) -> usize;
}

impl<T> LinkSequencer<T> for VecDeque<T> {
    fn init() -> Self {
        VecDeque::new()
    }
    fn push(&mut self, u: T) {
        self.push_back(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl<T> LinkSequencer<T> for Vec<T> {
    fn init() -> Self {
        Vec::new()
    }
    fn push(&mut self, u: T) {
        self.push(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

/// Generic frontier-based traversal supporting the `Width` and `Depth` strategies.
///
/// A link is added to the frontier when its target is discovered for the first time; the
/// target is marked as visited at that moment. Popping a link reports it and expands the
/// links of its target. The root is expanded on the first call to `next`.
pub struct LinkSearch<'a, G, S>
where
    G: AdjacencyList,
    S: LinkSequencer<LinkId>,
{
    graph: &'a G,
    visited: NodeBitSet,
    sequencer: S,
    root: Option<Node>,
}

/// A breadth-first traversal reporting links in FIFO order.
pub type WidthSearch<'a, G> = LinkSearch<'a, G, VecDeque<LinkId>>;

/// A depth-first traversal reporting links in LIFO order.
pub type DepthSearch<'a, G> = LinkSearch<'a, G, Vec<LinkId>>;

impl<'a, G, S> LinkSearch<'a, G, S>
where
    G: AdjacencyList,
    S: LinkSequencer<LinkId>,
{
    /// Creates a new traversal starting at `root`.
    /// ** Panics if `root >= n` **
    pub fn new(graph: &'a G, root: Node) -> Self {
        assert!(root < graph.number_of_nodes(), "root {root} is not a node");

        let mut visited = graph.vertex_bitset_unset();
        visited.insert(root as usize);

        Self {
            graph,
            visited,
            sequencer: S::init(),
            root: Some(root),
        }
    }

    fn expand(&mut self, u: Node) {
        for (slot, link) in self.graph.links_of(u).iter().enumerate() {
            if !self.visited.put(link.to as usize) {
                self.sequencer.push(LinkId::new(u, slot as NumLinks));
            }
        }
    }

    /// Excludes a node from the search. It will be treated as if it was already visited,
    /// i.e. no links into that node will be taken.
    ///
    /// # Warning
    /// Calling this method has no effect if a link into the node is already in the frontier.
    /// It is therefore highly recommended to call this method before the first call to `next`.
    pub fn exclude_node(&mut self, u: Node) {
        self.visited.insert(u as usize);
    }

    /// Chainable version of [`LinkSearch::exclude_node`].
    pub fn with_node_excluded(mut self, u: Node) -> Self {
        self.exclude_node(u);
        self
    }
}

impl<G, S> TraversalState for LinkSearch<'_, G, S>
where
    G: AdjacencyList,
    S: LinkSequencer<LinkId>,
{
    fn did_visit_node(&self, u: Node) -> bool {
        self.visited.contains(u as usize)
    }
}

impl<G, S> Iterator for LinkSearch<'_, G, S>
where
    G: AdjacencyList,
    S: LinkSequencer<LinkId>,
{
    type Item = LinkId;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            self.expand(root);
        }

        let id = self.sequencer.pop()?;
        self.expand(self.graph.link(id).to);
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.sequencer.cardinality(), Some(self.graph.len()))
    }
}

/// Frontier entry of the `Mark` strategy ordered by tentative mark and then discovery order.
struct Candidate<C> {
    mark: C,
    discovered: u64,
    link: LinkId,
}

impl<C: PartialOrd> PartialEq for Candidate<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: PartialOrd> Eq for Candidate<C> {}

impl<C: PartialOrd> PartialOrd for Candidate<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: PartialOrd> Ord for Candidate<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.mark
            .partial_cmp(&other.mark)
            .unwrap_or(Ordering::Equal)
            .then(self.discovered.cmp(&other.discovered))
    }
}

/// Greedy shortest-path traversal (`Traverse::Mark`).
///
/// Maintains a pool of frontier links and repeatedly commits the link minimizing
/// `mark(from) + cost(link)`. Ties are broken by discovery order, i.e. the link found first
/// wins. Links whose target got committed in the meantime are discarded.
pub struct MarkSearch<'a, G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    graph: &'a G,
    visited: NodeBitSet,
    marks: Vec<Option<G::LinkCost>>,
    pool: BinaryHeap<Reverse<Candidate<G::LinkCost>>>,
    discovered: u64,
}

impl<'a, G> MarkSearch<'a, G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    /// Creates a new traversal starting at `root`.
    /// ** Panics if `root >= n` **
    pub fn new(graph: &'a G, root: Node) -> Self {
        assert!(root < graph.number_of_nodes(), "root {root} is not a node");

        let mut visited = graph.vertex_bitset_unset();
        visited.insert(root as usize);

        let mut marks = vec![None; graph.len()];
        marks[root as usize] = Some(G::LinkCost::zero());

        let mut search = Self {
            graph,
            visited,
            marks,
            pool: BinaryHeap::new(),
            discovered: 0,
        };
        search.expand(root);
        search
    }

    fn expand(&mut self, u: Node) {
        let Some(base) = self.marks[u as usize].clone() else {
            return;
        };

        for (slot, link) in self.graph.links_of(u).iter().enumerate() {
            if self.visited.contains(link.to as usize) {
                continue;
            }

            self.pool.push(Reverse(Candidate {
                mark: base.accumulate(&link.cost),
                discovered: self.discovered,
                link: LinkId::new(u, slot as NumLinks),
            }));
            self.discovered += 1;
        }
    }

    /// Returns the final mark (cost of the cheapest path from the root) of a committed node
    pub fn mark_of(&self, u: Node) -> Option<&G::LinkCost> {
        self.marks[u as usize]
            .as_ref()
            .filter(|_| self.visited.contains(u as usize))
    }
}

impl<G> TraversalState for MarkSearch<'_, G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    fn did_visit_node(&self, u: Node) -> bool {
        self.visited.contains(u as usize)
    }
}

impl<G> Iterator for MarkSearch<'_, G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    type Item = LinkId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Reverse(Candidate { mark, link, .. })) = self.pool.pop() {
            let to = self.graph.link(link).to;
            if self.visited.put(to as usize) {
                continue;
            }

            self.marks[to as usize] = Some(mark);
            self.expand(to);
            return Some(link);
        }

        None
    }
}

/// Relaxation-based shortest-path traversal (`Traverse::Remark`).
///
/// Processes a FIFO queue of links, relaxing `mark(to)` whenever `mark(from) + cost(link)` is
/// strictly smaller (or `to` has no mark yet) and re-expanding the improved node. Once the
/// queue drains, the best parent link of every reached node is reported in order of
/// increasing final mark. The computation is carried out eagerly by [`RemarkSearch::new`].
pub struct RemarkSearch<G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    marks: Vec<Option<G::LinkCost>>,
    tree: std::vec::IntoIter<LinkId>,
}

impl<G> RemarkSearch<G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    /// Runs the relaxation from `root`.
    /// ** Panics if `root >= n` **
    pub fn new(graph: &G, root: Node) -> Self {
        assert!(root < graph.number_of_nodes(), "root {root} is not a node");

        let mut marks: Vec<Option<G::LinkCost>> = vec![None; graph.len()];
        let mut parents: Vec<Option<LinkId>> = vec![None; graph.len()];
        let mut queue: VecDeque<LinkId> = graph.link_ids_of(root).collect();
        marks[root as usize] = Some(G::LinkCost::zero());

        let mut relaxations = 0usize;
        while let Some(id) = queue.pop_front() {
            let link = graph.link(id);
            let Some(remark) = marks[link.from as usize]
                .as_ref()
                .map(|m| m.accumulate(&link.cost))
            else {
                continue;
            };

            let improves = marks[link.to as usize]
                .as_ref()
                .is_none_or(|current| remark.is_cheaper_than(current));

            if improves {
                marks[link.to as usize] = Some(remark);
                parents[link.to as usize] = Some(id);
                queue.extend(graph.link_ids_of(link.to));
                relaxations += 1;
            }
        }

        let mut tree: Vec<(Node, LinkId)> = parents
            .iter()
            .enumerate()
            .filter_map(|(u, p)| p.map(|p| (u as Node, p)))
            .collect();
        tree.sort_by(|(u, _), (v, _)| {
            marks[*u as usize]
                .partial_cmp(&marks[*v as usize])
                .unwrap_or(Ordering::Equal)
        });

        trace!(root, relaxations, reached = tree.len(), "remark traversal done");

        Self {
            marks,
            tree: tree
                .into_iter()
                .map(|(_, id)| id)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }

    /// Returns the final mark (cost of the cheapest path from the root) of a reached node
    pub fn mark_of(&self, u: Node) -> Option<&G::LinkCost> {
        self.marks[u as usize].as_ref()
    }
}

impl<G> TraversalState for RemarkSearch<G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    fn did_visit_node(&self, u: Node) -> bool {
        self.marks[u as usize].is_some()
    }
}

impl<G> Iterator for RemarkSearch<G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    type Item = LinkId;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree.size_hint()
    }
}

/// A traversal with a strategy chosen at runtime via [`Traverse`].
pub enum Search<'a, G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    Width(WidthSearch<'a, G>),
    Depth(DepthSearch<'a, G>),
    Mark(MarkSearch<'a, G>),
    Remark(RemarkSearch<G>),
}

impl<'a, G> Search<'a, G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    /// Starts a traversal of `graph` at `root` with the given strategy.
    /// ** Panics if `root >= n` **
    pub fn new(graph: &'a G, root: Node, strategy: Traverse) -> Self {
        match strategy {
            Traverse::Width => Self::Width(WidthSearch::new(graph, root)),
            Traverse::Depth => Self::Depth(DepthSearch::new(graph, root)),
            Traverse::Mark => Self::Mark(MarkSearch::new(graph, root)),
            Traverse::Remark => Self::Remark(RemarkSearch::new(graph, root)),
        }
    }
}

impl<G> Iterator for Search<'_, G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    type Item = LinkId;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Width(s) => s.next(),
            Self::Depth(s) => s.next(),
            Self::Mark(s) => s.next(),
            Self::Remark(s) => s.next(),
        }
    }
}

/// Provides traversal methods directly on graphs.
pub trait Traversal: AdjacencyList {
    /// Returns an iterator over the links taken by a **breadth-first search** from `root`.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g: Graph<u8> = Graph::from_links([0, 1, 2], [(0, 1), (0, 2), (1, 2)]).unwrap();
    ///
    /// let reached: Vec<_> = g.width_search(0).map(|id| g[id].to).collect();
    /// assert_eq!(reached, vec![1, 2]);
    /// ```
    fn width_search(&self, root: Node) -> WidthSearch<'_, Self> {
        WidthSearch::new(self, root)
    }

    /// Returns an iterator over the links taken by a **depth-first search** from `root`.
    fn depth_search(&self, root: Node) -> DepthSearch<'_, Self> {
        DepthSearch::new(self, root)
    }

    /// Returns an iterator over the links of a greedy **shortest-path** traversal from
    /// `root`, in the order in which their targets are committed.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g: Graph<u8, u32> =
    ///     Graph::from_links([0, 1, 2], [(0, 2, 5), (0, 1, 1), (1, 2, 1)]).unwrap();
    ///
    /// let reached: Vec<_> = g.mark_search(0).map(|id| g[id].edge()).collect();
    /// assert_eq!(reached, vec![Edge(0, 1), Edge(1, 2)]);
    /// ```
    fn mark_search(&self, root: Node) -> MarkSearch<'_, Self>
    where
        Self::LinkCost: Cost,
    {
        MarkSearch::new(self, root)
    }

    /// Returns the shortest-path tree from `root` computed by relaxation, ordered by
    /// increasing distance from `root`.
    fn remark_search(&self, root: Node) -> RemarkSearch<Self>
    where
        Self::LinkCost: Cost,
    {
        RemarkSearch::new(self, root)
    }

    /// Returns an iterator over the links taken by the given strategy from `root`.
    fn search(&self, root: Node, strategy: Traverse) -> Search<'_, Self>
    where
        Self::LinkCost: Cost,
    {
        Search::new(self, root, strategy)
    }

    /// Calls `visitor` for every link taken by the given strategy from `root`.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g: Graph<char> = Graph::from_links(['A', 'B', 'C'], [(0, 1), (1, 2)]).unwrap();
    ///
    /// let mut values = Vec::new();
    /// g.traverse(0, Traverse::Depth, |_, link| values.push(*g.value(link.to)));
    /// assert_eq!(values, vec!['B', 'C']);
    /// ```
    fn traverse<F>(&self, root: Node, strategy: Traverse, mut visitor: F)
    where
        Self::LinkCost: Cost,
        F: FnMut(LinkId, &Link<Self::LinkCost>),
    {
        for id in self.search(root, strategy) {
            visitor(id, self.link(id));
        }
    }

    /// Returns *true* if there exists a directed path from `from` to `to`.
    /// Every node can reach itself.
    fn is_reachable(&self, from: Node, to: Node) -> bool {
        from == to || self.width_search(from).any(|id| self.link(id).to == to)
    }

    /// Returns the set of nodes reachable from `root` (including `root` itself).
    fn reachable_from(&self, root: Node) -> NodeBitSet {
        let mut search = self.width_search(root);
        search.by_ref().for_each(drop);
        search.visited
    }
}

impl<G> Traversal for G where G: AdjacencyList {}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::testing::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    //  / 2 --- \
    // 1         4 - 3
    //  \ 0 - 5 /
    fn diamond() -> Graph<Node> {
        Graph::from_links(0..6, [(1, 2), (1, 0), (4, 3), (0, 5), (2, 4), (5, 4)]).unwrap()
    }

    fn targets<G: AdjacencyList>(graph: &G, ids: impl Iterator<Item = LinkId>) -> Vec<Node> {
        ids.map(|id| graph.link(id).to).collect()
    }

    #[test]
    fn width_order() {
        let graph = diamond();

        assert_eq!(targets(&graph, graph.width_search(1)), vec![2, 0, 4, 5, 3]);
        assert_eq!(targets(&graph, graph.width_search(5)), vec![4, 3]);
        assert_eq!(targets(&graph, graph.width_search(3)), vec![]);
    }

    #[test]
    fn width_reports_first_discovery() {
        let graph = diamond();

        // 4 is discovered via 2 first, the link (5, 4) is never taken
        let edges = graph.width_search(1).map(|id| graph[id].edge()).collect_vec();
        assert!(edges.contains(&Edge(2, 4)));
        assert!(!edges.contains(&Edge(5, 4)));
    }

    #[test]
    fn depth_order() {
        let graph = diamond();

        // the frontier after expanding 1 is [(1,2), (1,0)], the LIFO takes (1,0) first
        assert_eq!(targets(&graph, graph.depth_search(1)), vec![0, 5, 4, 3, 2]);
    }

    #[test]
    fn excluded_node() {
        let graph = diamond();
        let reached = targets(&graph, graph.width_search(1).with_node_excluded(2));
        assert_eq!(reached, vec![0, 5, 4, 3]);
    }

    #[test]
    fn mark_prefers_cheap_detour() {
        let graph: Graph<char, u32> = Graph::from_links(
            ['A', 'B', 'C', 'D'],
            [(0, 3, 10), (0, 1, 1), (1, 2, 1), (2, 3, 1)],
        )
        .unwrap();

        let mut search = graph.mark_search(0);
        let edges = search.by_ref().map(|id| graph[id].edge()).collect_vec();
        assert_eq!(edges, vec![Edge(0, 1), Edge(1, 2), Edge(2, 3)]);
        assert_eq!(search.mark_of(3), Some(&3));
        assert_eq!(search.mark_of(0), Some(&0));
    }

    #[test]
    fn mark_ties_broken_by_discovery() {
        let graph: Graph<u8, u32> =
            Graph::from_links([0, 1, 2, 3], [(0, 1, 1), (0, 2, 1), (1, 3, 1), (2, 3, 1)]).unwrap();

        let edges = graph.mark_search(0).map(|id| graph[id].edge()).collect_vec();
        assert_eq!(edges, vec![Edge(0, 1), Edge(0, 2), Edge(1, 3)]);
    }

    #[test]
    fn remark_sorted_by_mark() {
        let graph: Graph<char, u32> = Graph::from_links(
            ['A', 'B', 'C', 'D'],
            [(0, 3, 10), (0, 2, 4), (0, 1, 1), (1, 2, 1), (2, 3, 1)],
        )
        .unwrap();

        let mut search = graph.remark_search(0);
        let edges = search.by_ref().map(|id| graph[id].edge()).collect_vec();
        assert_eq!(edges, vec![Edge(0, 1), Edge(1, 2), Edge(2, 3)]);
        assert_eq!(search.mark_of(2), Some(&2));
        assert_eq!(search.mark_of(3), Some(&3));
    }

    #[test]
    fn width_hop_counts_non_decreasing() {
        let rng = &mut Pcg64Mcg::seed_from_u64(31);

        for n in [5, 10, 30] {
            for _ in 0..10 {
                let graph = random_weighted_graph(rng, n, 3 * n, 10);
                let mut hops = vec![None; n as usize];
                hops[0] = Some(0u32);

                let mut last = 0;
                for id in graph.width_search(0) {
                    let link = &graph[id];
                    let from = hops[link.from as usize].unwrap();
                    assert!(hops[link.to as usize].is_none());

                    hops[link.to as usize] = Some(from + 1);
                    assert!(from + 1 >= last);
                    last = from + 1;
                }

                // hop counts are distances: no link shortcuts a reached node
                for Edge(u, v) in graph.edges() {
                    if let (Some(hu), Some(hv)) = (hops[u as usize], hops[v as usize]) {
                        assert!(hv <= hu + 1);
                    }
                }
            }
        }
    }

    #[test]
    fn strategies_visit_each_node_once() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for n in [5, 10, 30] {
            for _ in 0..10 {
                let graph = random_weighted_graph(rng, n, 3 * n, 10);

                for strategy in [
                    Traverse::Width,
                    Traverse::Depth,
                    Traverse::Mark,
                    Traverse::Remark,
                ] {
                    let reached = targets(&graph, graph.search(0, strategy))
                        .into_iter()
                        .sorted()
                        .collect_vec();
                    let mut expected = graph.reachable_from(0);
                    expected.set(0, false);

                    assert_eq!(
                        reached,
                        expected.ones().map(|u| u as Node).collect_vec(),
                        "{strategy:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn mark_and_remark_agree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);

        for _ in 0..20 {
            let graph = random_weighted_graph(rng, 20, 60, 9);

            let mut mark = graph.mark_search(0);
            mark.by_ref().for_each(drop);
            let remark = graph.remark_search(0);

            for u in graph.vertices() {
                assert_eq!(mark.mark_of(u), remark.mark_of(u));
            }
        }
    }

    #[test]
    fn visitor() {
        let graph = diamond();
        let mut count = 0;
        graph.traverse(1, Traverse::Width, |id, link| {
            assert_eq!(graph[id], *link);
            count += 1;
        });
        assert_eq!(count, 5);
    }

    #[test]
    fn reachability() {
        let graph = diamond();
        assert!(graph.is_reachable(1, 3));
        assert!(graph.is_reachable(3, 3));
        assert!(!graph.is_reachable(3, 1));
        assert_eq!(graph.reachable_from(5).ones().collect_vec(), vec![3, 4, 5]);
    }

    #[test]
    #[should_panic]
    fn root_out_of_range() {
        let graph = diamond();
        graph.width_search(6);
    }
}
