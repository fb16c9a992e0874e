/*!
# Maximum Flow and Minimum Cut

This module computes a **maximum flow** between a source and a sink of a graph whose links
carry [`Pipe`]s (a capacity, called *volume*, and the current flow), following the
Ford–Fulkerson scheme with an explicit residual network:

1. **Build** the residual network: links without residual capacity are hidden; for every
   remaining link and every hidden link with nonzero flow, a reverse *residual* link is added
   at its target, referring back to its origin.
2. **Find** an augmenting path from source to sink with one of the [`Traverse`] strategies
   (`Width` by default, which makes this Edmonds–Karp).
3. **Improve** the flow along the path by its bottleneck, i.e. the minimum residual capacity:
   real links gain flow, residual links take flow back from their origin.
4. **Tear down** the residual network: residual links are removed and hidden links are
   restored at their original positions.

These steps are repeated until no augmenting path exists. Afterwards, every link of the graph
carries its final flow. The procedure terminates for integer capacities.

A **minimum cut** is obtained from the converged graph by collecting all nodes reachable from
the source in the residual network ([`MinCut`]).

The solver rewrites link costs (and, temporarily, link lists) of the graph and therefore
borrows it mutably for the duration of each call.
*/

use super::*;
use num::{Integer, traits::SaturatingAdd};
use std::fmt::{Debug, Display};
use tracing::{debug, trace};

/// Numeric types usable as pipe volumes
pub trait Volume: Integer + SaturatingAdd + Copy + Debug {}

impl<V> Volume for V where V: Integer + SaturatingAdd + Copy + Debug {}

/// Origin of a residual link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResidualOf {
    /// A live link of the residual network
    Live(LinkId),
    /// The `i`-th hidden (saturated) link of the residual network
    Saturated(usize),
}

/// Link cost of flow networks: a capacity (`volume`) and the flow currently sent through it.
///
/// Pipes are compared by their residual capacity `volume - flow`.
///
/// # Examples
/// ```
/// use wgraphs::algo::Pipe;
///
/// let pipe = Pipe::with_flow(5, 2);
/// assert_eq!(pipe.residual_flow(), 3);
/// assert_eq!(pipe.to_string(), "2/5");
/// assert_eq!(Pipe::from(4), Pipe::with_flow(7, 3));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Pipe<V> {
    pub volume: V,
    pub flow: V,
    pub(crate) residual: Option<ResidualOf>,
}

impl<V: Volume> Pipe<V> {
    /// Creates an empty pipe with the given capacity
    pub fn new(volume: V) -> Self {
        Self::with_flow(volume, V::zero())
    }

    /// Creates a pipe with the given capacity and initial flow
    /// ** Panics if `flow > volume` (debug builds) **
    pub fn with_flow(volume: V, flow: V) -> Self {
        debug_assert!(flow <= volume, "flow {flow:?} exceeds volume {volume:?}");
        Self {
            volume,
            flow,
            residual: None,
        }
    }

    /// Returns the remaining capacity of the pipe
    pub fn residual_flow(&self) -> V {
        self.volume - self.flow
    }

    /// Returns *true* if this is a residual pipe of a residual network
    pub fn is_residual(&self) -> bool {
        self.residual.is_some()
    }

    /// Returns *true* if no more flow fits into the pipe
    pub fn is_saturated(&self) -> bool {
        self.residual_flow().is_zero()
    }

    /// Returns the reverse pipe of a residual network: its residual capacity is the flow of
    /// `self`, i.e. the amount of flow that can be sent back.
    pub(crate) fn residual_pipe(&self, origin: ResidualOf) -> Self {
        Self {
            volume: self.volume,
            flow: self.residual_flow(),
            residual: Some(origin),
        }
    }
}

impl<V: Volume> From<V> for Pipe<V> {
    fn from(volume: V) -> Self {
        Self::new(volume)
    }
}

impl<V: Volume> Default for Pipe<V> {
    fn default() -> Self {
        Self::new(V::zero())
    }
}

impl<V: Display> Display for Pipe<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.flow, self.volume)
    }
}

impl<V: Volume> PartialEq for Pipe<V> {
    fn eq(&self, other: &Self) -> bool {
        self.residual_flow() == other.residual_flow()
    }
}

impl<V: Volume> PartialOrd for Pipe<V> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.residual_flow().cmp(&other.residual_flow()))
    }
}

impl<V: Volume> Cost for Pipe<V> {
    fn zero() -> Self {
        Self::new(V::zero())
    }

    /// Sums saturate at the maximum of `V`
    fn accumulate(&self, other: &Self) -> Self {
        Self::with_flow(
            self.volume.saturating_add(&other.volume),
            self.flow.saturating_add(&other.flow),
        )
    }
}

/// A saturated link taken out of the graph while the residual network exists
struct HiddenLink<V> {
    slot: NumLinks,
    link: Link<Pipe<V>>,
}

/// Residual network overlaid on a flow graph.
///
/// The overlay is torn down (residual links removed, hidden links restored at their original
/// positions) when the network is dropped.
struct ResidualNetwork<'a, T, V: Volume> {
    graph: &'a mut Graph<T, Pipe<V>>,
    hidden: Vec<HiddenLink<V>>,
}

impl<'a, T, V: Volume> ResidualNetwork<'a, T, V> {
    fn build(graph: &'a mut Graph<T, Pipe<V>>) -> Self {
        let mut hidden = Vec::new();
        for u in graph.vertices_range() {
            let links = graph.links_mut(u);
            let mut live = Vec::with_capacity(links.len());

            for (slot, link) in links.drain(..).enumerate() {
                if link.cost.is_saturated() {
                    hidden.push(HiddenLink {
                        slot: slot as NumLinks,
                        link,
                    });
                } else {
                    live.push(link);
                }
            }

            *links = live;
        }

        // residual links are appended after all live links, so live slots stay valid
        let mut residuals = Vec::new();
        for id in graph.link_ids() {
            let link = graph.link(id);
            let pipe = link.cost.residual_pipe(ResidualOf::Live(id));
            if !pipe.is_saturated() {
                residuals.push(Link::new(link.to, link.from, pipe));
            }
        }
        for (i, HiddenLink { link, .. }) in hidden.iter().enumerate() {
            let pipe = link.cost.residual_pipe(ResidualOf::Saturated(i));
            if !pipe.is_saturated() {
                residuals.push(Link::new(link.to, link.from, pipe));
            }
        }

        trace!(
            hidden = hidden.len(),
            residual = residuals.len(),
            "built residual network"
        );

        for link in residuals {
            graph.links_mut(link.from).push(link);
        }

        Self { graph, hidden }
    }

    fn graph(&self) -> &Graph<T, Pipe<V>> {
        &*self.graph
    }

    /// Returns the minimum residual capacity along a non-empty path
    fn bottleneck(&self, path: &[LinkId]) -> V {
        path.iter()
            .map(|&id| self.graph[id].cost.residual_flow())
            .min()
            .unwrap_or_else(V::zero)
    }

    /// Sends `additional` units of flow along `path`
    fn improve(&mut self, path: &[LinkId], additional: V) {
        for &id in path {
            match self.graph[id].cost.residual {
                Some(ResidualOf::Live(origin)) => {
                    let pipe = self.graph.cost_mut(origin);
                    pipe.flow = pipe.flow - additional;
                }
                Some(ResidualOf::Saturated(i)) => {
                    let pipe = &mut self.hidden[i].link.cost;
                    pipe.flow = pipe.flow - additional;
                }
                None => {
                    let pipe = self.graph.cost_mut(id);
                    pipe.flow = pipe.flow + additional;
                }
            }
        }
    }
}

impl<T, V: Volume> Drop for ResidualNetwork<'_, T, V> {
    fn drop(&mut self) {
        for u in self.graph.vertices_range() {
            self.graph.links_mut(u).retain(|l| !l.cost.is_residual());
        }

        // hidden links are ordered by (from, slot), so inserting in order recreates the
        // original link lists
        for HiddenLink { slot, link } in self.hidden.drain(..) {
            let links = self.graph.links_mut(link.from);
            let slot = (slot as usize).min(links.len());
            links.insert(slot, link);
        }
    }
}

/// Source side of a minimum cut together with the links crossing it.
#[derive(Debug, Clone)]
pub struct MinCut {
    source_side: NodeBitSet,
    links: Vec<LinkId>,
}

impl MinCut {
    /// Returns *true* if `u` is on the source side of the cut
    pub fn is_on_source_side(&self, u: Node) -> bool {
        self.source_side.contains(u as usize)
    }

    /// Returns the nodes on the source side of the cut (always including the source)
    pub fn source_side(&self) -> impl Iterator<Item = Node> + '_ {
        self.source_side.ones().map(|u| u as Node)
    }

    /// Returns the nodes on the sink side of the cut
    pub fn sink_side(&self) -> impl Iterator<Item = Node> + '_ {
        self.source_side.zeroes().map(|u| u as Node)
    }

    /// Returns all links from the source side to the sink side
    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    /// Returns the total volume of all cut links
    pub fn capacity<T, V: Volume>(&self, graph: &Graph<T, Pipe<V>>) -> V {
        self.links
            .iter()
            .fold(V::zero(), |acc, &id| acc + graph[id].cost.volume)
    }

    /// Restricts the link list of every node on the source side to links staying on the
    /// source side. Links of nodes on the sink side are left untouched.
    pub fn apply<T, C>(&self, graph: &mut Graph<T, C>) {
        for u in self.source_side() {
            graph
                .links_mut(u)
                .retain(|l| self.source_side.contains(l.to as usize));
        }
    }
}

/// Maximum flow solver.
///
/// By default, the flow is sent from the first to the last node of the graph and augmenting
/// paths are found by [`Traverse::Width`].
///
/// # Examples
/// ```
/// use wgraphs::{prelude::*, algo::*};
///
/// let mut g: Graph<char, Pipe<u32>> = Graph::from_links(
///     ['S', 'A', 'B', 'T'],
///     [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3)].map(|(u, v, c)| (u, v, Pipe::new(c))),
/// )
/// .unwrap();
///
/// assert_eq!(MaxFlow::new().strategy(Traverse::Depth).run(&mut g), 4);
/// assert_eq!(g[LinkId::new(1, 0)].cost.to_string(), "2/2");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFlow {
    source: Option<Node>,
    sink: Option<Node>,
    strategy: Traverse,
}

impl MaxFlow {
    /// Creates a solver with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source (default: first node)
    pub fn set_source(&mut self, source: Node) {
        self.source = Some(source);
    }

    /// Sets the source (default: first node)
    pub fn source(mut self, source: Node) -> Self {
        self.set_source(source);
        self
    }

    /// Sets the sink (default: last node)
    pub fn set_sink(&mut self, sink: Node) {
        self.sink = Some(sink);
    }

    /// Sets the sink (default: last node)
    pub fn sink(mut self, sink: Node) -> Self {
        self.set_sink(sink);
        self
    }

    /// Sets the strategy used to find augmenting paths (default: `Width`)
    pub fn set_strategy(&mut self, strategy: Traverse) {
        self.strategy = strategy;
    }

    /// Sets the strategy used to find augmenting paths (default: `Width`)
    pub fn strategy(mut self, strategy: Traverse) -> Self {
        self.set_strategy(strategy);
        self
    }

    /// Returns the source and sink for `graph`, or `None` for an empty graph.
    /// ** Panics if a configured terminal is not a node of `graph` **
    fn terminals<G: GraphNodeOrder>(&self, graph: &G) -> Option<(Node, Node)> {
        let n = graph.number_of_nodes();
        if n == 0 {
            return None;
        }

        let source = self.source.unwrap_or(0);
        let sink = self.sink.unwrap_or(n - 1);
        assert!(source < n, "source {source} is not a node");
        assert!(sink < n, "sink {sink} is not a node");

        Some((source, sink))
    }

    /// Maximizes the flow from source to sink and returns the amount of flow that was added.
    /// For a graph without initial flow, this is the value of the maximum flow. Afterwards,
    /// every link carries its final flow.
    ///
    /// A sink that is unreachable from the source (or equal to it) yields no flow.
    pub fn run<T, V: Volume>(&self, graph: &mut Graph<T, Pipe<V>>) -> V {
        let Some((source, sink)) = self.terminals(graph) else {
            return V::zero();
        };

        let mut total = V::zero();
        let mut augmentations = 0usize;
        loop {
            let mut network = ResidualNetwork::build(graph);
            let path = network.graph().find_path(source, sink, self.strategy);
            if path.is_empty() {
                break;
            }

            let bottleneck = network.bottleneck(&path);
            network.improve(&path, bottleneck);

            total = total + bottleneck;
            augmentations += 1;
            trace!(augmentations, ?bottleneck, length = path.len(), "augmented flow");
        }

        debug!(source, sink, augmentations, ?total, "maximized flow");
        total
    }

    /// Computes a minimum cut of a graph whose flow has been maximized, i.e. the set of nodes
    /// reachable from the source in the residual network and the links leaving it.
    pub fn min_cut<T, V: Volume>(&self, graph: &mut Graph<T, Pipe<V>>) -> MinCut {
        let Some((source, _)) = self.terminals(graph) else {
            return MinCut {
                source_side: NodeBitSet::new(),
                links: Vec::new(),
            };
        };

        let source_side = {
            let network = ResidualNetwork::build(graph);
            network.graph().reachable_from(source)
        };

        let links = graph
            .link_ids()
            .filter(|&id| {
                let link = graph.link(id);
                source_side.contains(link.from as usize) && !source_side.contains(link.to as usize)
            })
            .collect();

        MinCut { source_side, links }
    }

    /// Computes a minimum cut of a graph whose flow has been maximized and removes every
    /// link leaving the source side from the graph (see [`MinCut::apply`]).
    pub fn cut_subgraph<T, V: Volume>(&self, graph: &mut Graph<T, Pipe<V>>) -> MinCut {
        let cut = self.min_cut(graph);
        cut.apply(graph);
        cut
    }
}

/// Provides maximum flow computations with default settings directly on flow graphs.
pub trait MaximizeFlow {
    type Volume;

    /// Maximizes the flow from the first to the last node and returns its value.
    /// See [`MaxFlow::run`].
    fn maximize_flow(&mut self) -> Self::Volume;

    /// Computes a minimum cut between the first and the last node of a graph whose flow has
    /// been maximized. See [`MaxFlow::min_cut`].
    fn min_cut(&mut self) -> MinCut;
}

impl<T, V: Volume> MaximizeFlow for Graph<T, Pipe<V>> {
    type Volume = V;

    fn maximize_flow(&mut self) -> V {
        MaxFlow::new().run(self)
    }

    fn min_cut(&mut self) -> MinCut {
        MaxFlow::new().min_cut(self)
    }
}
