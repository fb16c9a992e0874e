/*!
# Path Finding

Finds a path between two nodes by running one of the [`Traverse`] strategies from the source
and recording, for every node, the link that reached it first ([`TraversalRecord`]).
The path is then obtained by walking the recorded links backwards from the target.

Depending on the strategy, the path has the following properties:
- `Width`: fewest links,
- `Depth`: some path,
- `Mark` / `Remark`: minimum total cost (for non-negative costs).

Traversals are consumed lazily, i.e. the search stops as soon as the target is reached
(except for `Remark`, which computes its whole tree upfront).
*/

use super::*;

/// Records, for every node, the link over which a traversal reached it first.
#[derive(Debug, Clone)]
pub struct TraversalRecord {
    parents: Vec<Option<LinkId>>,
}

impl TraversalRecord {
    /// Creates an empty record for a graph with `n` nodes
    pub fn new(n: NumNodes) -> Self {
        Self {
            parents: vec![None; n as usize],
        }
    }

    /// Records that `id` reached its target. Returns *false* (and keeps the old entry) if the
    /// target was already reached.
    pub fn record<G: AdjacencyList>(&mut self, graph: &G, id: LinkId) -> bool {
        let entry = &mut self.parents[graph.link(id).to as usize];
        if entry.is_some() {
            return false;
        }

        *entry = Some(id);
        true
    }

    /// Returns the link that reached `u` first
    pub fn parent_of(&self, u: Node) -> Option<LinkId> {
        self.parents[u as usize]
    }

    /// Returns *true* if some link reached `u`
    pub fn is_reached(&self, u: Node) -> bool {
        self.parents[u as usize].is_some()
    }

    /// Walks the recorded links back from `to` until `from` is hit and returns them in
    /// forward order. Returns an empty path if `to` cannot be traced back to `from` or if
    /// `from == to`.
    pub fn path_to<G: AdjacencyList>(&self, graph: &G, from: Node, to: Node) -> Vec<LinkId> {
        let mut path = Vec::new();
        let mut current = to;

        while current != from {
            let Some(id) = self.parent_of(current) else {
                return Vec::new();
            };

            // guards against records that do not form a tree rooted at `from`
            if path.len() >= self.parents.len() {
                return Vec::new();
            }

            path.push(id);
            current = graph.link(id).from;
        }

        path.reverse();
        path
    }
}

/// Path finder with a configurable traversal strategy.
///
/// # Examples
/// ```
/// use wgraphs::{prelude::*, algo::*};
///
/// let g: Graph<char, u32> =
///     Graph::from_links(['A', 'B', 'C'], [(0, 2, 5), (0, 1, 1), (1, 2, 1)]).unwrap();
///
/// let finder = PathFinder::new(&g).strategy(Traverse::Width);
/// assert_eq!(path_nodes(&g, &finder.find(0, 2)), vec![0, 2]);
///
/// let finder = finder.strategy(Traverse::Mark);
/// assert_eq!(path_nodes(&g, &finder.find(0, 2)), vec![0, 1, 2]);
/// ```
pub struct PathFinder<'a, G> {
    graph: &'a G,
    strategy: Traverse,
}

impl<'a, G> PathFinder<'a, G>
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    /// Creates a path finder using [`Traverse::Width`]
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: Traverse::default(),
        }
    }

    /// Sets the traversal strategy
    pub fn set_strategy(&mut self, strategy: Traverse) {
        self.strategy = strategy;
    }

    /// Sets the traversal strategy
    pub fn strategy(mut self, strategy: Traverse) -> Self {
        self.set_strategy(strategy);
        self
    }

    /// Runs the configured strategy from `from` until `to` is reached and returns the record.
    /// ** Panics if `from >= n` or `to >= n` **
    pub fn record(&self, from: Node, to: Node) -> TraversalRecord {
        assert!(to < self.graph.number_of_nodes(), "target {to} is not a node");

        // `Remark` reports links ordered by mark, so an ancestor of `to` with an equal mark may
        // be reported after `to` itself
        let stop_early = self.strategy != Traverse::Remark;

        let mut record = TraversalRecord::new(self.graph.number_of_nodes());
        for id in self.graph.search(from, self.strategy) {
            record.record(self.graph, id);
            if stop_early && self.graph.link(id).to == to {
                break;
            }
        }
        record
    }

    /// Returns the links of a path from `from` to `to`, or an empty path if `to` is not
    /// reachable or `from == to`.
    /// ** Panics if `from >= n` or `to >= n` **
    pub fn find(&self, from: Node, to: Node) -> Vec<LinkId> {
        self.record(from, to).path_to(self.graph, from, to)
    }
}

/// Provides path finding directly on graphs.
pub trait FindPath: AdjacencyList {
    /// Returns the links of a path from `from` to `to` found with the given strategy.
    /// The path is empty if `to` is not reachable from `from` or if `from == to`.
    ///
    /// ** Panics if `from >= n` or `to >= n` **
    fn find_path(&self, from: Node, to: Node, strategy: Traverse) -> Vec<LinkId>
    where
        Self::LinkCost: Cost,
    {
        PathFinder::new(self).strategy(strategy).find(from, to)
    }
}

impl<G> FindPath for G where G: AdjacencyList {}

/// Returns the nodes visited by a path of links, i.e. the source of the first link followed by
/// the target of every link. An empty path has no nodes.
pub fn path_nodes<G: AdjacencyList>(graph: &G, path: &[LinkId]) -> Vec<Node> {
    let Some(first) = path.first() else {
        return Vec::new();
    };

    std::iter::once(first.from)
        .chain(path.iter().map(|&id| graph.link(id).to))
        .collect()
}

/// Returns the accumulated cost of a path of links. An empty path has cost zero.
pub fn path_cost<G>(graph: &G, path: &[LinkId]) -> G::LinkCost
where
    G: AdjacencyList,
    G::LinkCost: Cost,
{
    path.iter().fold(G::LinkCost::zero(), |acc, &id| {
        acc.accumulate(&graph.link(id).cost)
    })
}
