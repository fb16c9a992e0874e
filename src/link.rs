/*!
# Links

A [`Link`] is a directed, weighted connection stored in the link list of its source node.
Links only reference their endpoints by index; a graph therefore never contains
ownership cycles.

A link is addressed by a [`LinkId`], i.e. its source node and its position (slot) in the
source node's link list. Traversals and paths report `LinkId`s and the link itself is
obtained via `graph[id]`.

Graphs are built from [`LinkSpec`]s, which can be created from `(from, to, cost)` triples or,
for costs implementing `Default`, from `(from, to)` pairs.
*/

use std::fmt::Display;

use crate::{Edge, Node};

/// We limit the number of links per node to `2^32 - 1`.
pub type NumLinks = u32;

/// A directed link from `from` to `to` carrying a cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Link<C> {
    pub from: Node,
    pub to: Node,
    pub cost: C,
}

impl<C> Link<C> {
    /// Creates a new link
    pub fn new(from: Node, to: Node, cost: C) -> Self {
        Self { from, to, cost }
    }

    /// Returns the endpoints of the link
    pub fn edge(&self) -> Edge {
        Edge(self.from, self.to)
    }
}

/// Stable address of a link: the source node and the position in its link list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId {
    pub from: Node,
    pub slot: NumLinks,
}

impl LinkId {
    pub fn new(from: Node, slot: NumLinks) -> Self {
        Self { from, slot }
    }
}

impl Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.from, self.slot)
    }
}

/// Description of a link used during graph construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpec<C> {
    pub from: Node,
    pub to: Node,
    pub cost: C,
}

impl<C> From<(Node, Node, C)> for LinkSpec<C> {
    fn from((from, to, cost): (Node, Node, C)) -> Self {
        Self { from, to, cost }
    }
}

impl<C: Clone> From<&(Node, Node, C)> for LinkSpec<C> {
    fn from((from, to, cost): &(Node, Node, C)) -> Self {
        Self {
            from: *from,
            to: *to,
            cost: cost.clone(),
        }
    }
}

impl<C: Default> From<(Node, Node)> for LinkSpec<C> {
    fn from((from, to): (Node, Node)) -> Self {
        Self {
            from,
            to,
            cost: C::default(),
        }
    }
}

impl<C: Default> From<&(Node, Node)> for LinkSpec<C> {
    fn from((from, to): &(Node, Node)) -> Self {
        Self {
            from: *from,
            to: *to,
            cost: C::default(),
        }
    }
}

impl<C: Default> From<Edge> for LinkSpec<C> {
    fn from(Edge(from, to): Edge) -> Self {
        Self {
            from,
            to,
            cost: C::default(),
        }
    }
}
