use std::ops::Range;
use itertools::Itertools;

use crate::*;

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices_range()
    }

    /// Returns the range of all nodes.
    /// In contrast to `self.vertices()`, the range does not borrow `self` and hence
    /// may be used where mutable references of `self` are needed.
    fn vertices_range(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns empty bitset with one entry per node
    fn vertex_bitset_unset(&self) -> NodeBitSet {
        node_bitset(self.number_of_nodes())
    }

    /// Returns *true* if the graph has no nodes (and thus no links)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provides getters pertaining to the link-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of links of the graph
    fn number_of_links(&self) -> NumEdges;

    /// Returns *true* if the graph has no links
    fn is_singleton(&self) -> bool {
        self.number_of_links() == 0
    }
}

/// Access to the stored, ordered links of every node.
///
/// All algorithms of this crate are implemented on top of this trait, i.e. a graph only
/// has to expose its outgoing link lists to be traversed, sorted or colored.
pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// The cost type stored on every link
    type LinkCost;

    /// Returns the outgoing links of a given vertex in insertion order.
    /// ** Panics if `u >= n` **
    fn links_of(&self, u: Node) -> &[Link<Self::LinkCost>];

    /// Returns the link addressed by `id`.
    /// ** Panics if the link does not exist **
    fn link(&self, id: LinkId) -> &Link<Self::LinkCost> {
        &self.links_of(id.from)[id.slot as usize]
    }

    /// Returns the ids of all outgoing links of a given vertex.
    /// ** Panics if `u >= n` **
    fn link_ids_of(&self, u: Node) -> impl Iterator<Item = LinkId> + '_ {
        (0..self.links_of(u).len() as NumLinks).map(move |slot| LinkId::new(u, slot))
    }

    /// Returns an iterator over the (out-)neighbors of a given vertex.
    /// Multi-links yield the same neighbor multiple times.
    /// ** Panics if `u >= n` **
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.links_of(u).iter().map(|l| l.to)
    }

    /// Returns the number of outgoing links of `u`
    /// ** Panics if `u >= n` **
    fn degree_of(&self, u: Node) -> NumNodes {
        self.links_of(u).len() as NumNodes
    }

    /// Returns the maximum out-degree in the graph
    fn max_degree(&self) -> NumNodes {
        self.vertices().map(|u| self.degree_of(u)).max().unwrap_or(0)
    }

    /// Returns the in-degree of every node
    fn in_degrees(&self) -> Vec<NumNodes> {
        let mut in_degs = vec![0; self.len()];
        for u in self.vertices() {
            for v in self.neighbors_of(u) {
                in_degs[v as usize] += 1;
            }
        }
        in_degs
    }

    /// Returns *true* if a link `(u, v)` exists.
    /// ** Panics if `u >= n` **
    fn has_link(&self, u: Node, v: Node) -> bool {
        self.neighbors_of(u).contains(&v)
    }

    /// Returns an iterator over the endpoints of all outgoing links of `u`.
    /// ** Panics if `u >= n` **
    fn edges_of(&self, u: Node) -> impl Iterator<Item = Edge> + '_ {
        self.links_of(u).iter().map(|l| l.edge())
    }

    /// Returns an iterator over the endpoints of all links in the graph, grouped by source
    /// node and in link order.
    fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices_range().flat_map(move |u| self.edges_of(u))
    }

    /// Returns an iterator over all link ids in the graph
    fn link_ids(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.vertices_range().flat_map(move |u| self.link_ids_of(u))
    }
}
