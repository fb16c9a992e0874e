use std::{cmp::Ordering, ops::Index};

use tracing::trace;

use super::*;

/// Payload and outgoing links of a single node.
#[derive(Debug, Clone)]
struct Vertex<T, C> {
    value: T,
    links: Vec<Link<C>>,
}

/// A directed graph with node payloads of type `T` and link costs of type `C`.
///
/// Nodes are stored in an arena and addressed by their position `0..n`; links are stored in
/// the link list of their source node and reference both endpoints by index. The set of
/// nodes is fixed after construction.
#[derive(Debug, Clone)]
pub struct Graph<T, C = ()> {
    vertices: Vec<Vertex<T, C>>,
}

impl<T, C> Graph<T, C> {
    /// Creates a graph with one node per value and the given links.
    ///
    /// Nodes are created in the order of `values`; links are appended to the link list of
    /// their source node in the order given. No implicit reverse links are created.
    ///
    /// # Errors
    /// Returns [`GraphError::NodeOutOfRange`] if a link references an index `>= values.len()`.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::prelude::*;
    ///
    /// let g: Graph<char, u32> = Graph::from_links(['A', 'B', 'C'], [(0, 1, 1), (1, 2, 1)]).unwrap();
    /// assert_eq!(g.number_of_nodes(), 3);
    /// assert_eq!(g.number_of_links(), 2);
    ///
    /// assert!(Graph::<char, u32>::from_links(['A'], [(0, 1, 1)]).is_err());
    /// ```
    pub fn from_links<V, L>(values: V, links: L) -> Result<Self, GraphError>
    where
        V: IntoIterator<Item = T>,
        L: IntoIterator,
        L::Item: Into<LinkSpec<C>>,
    {
        let mut vertices: Vec<Vertex<T, C>> = values
            .into_iter()
            .map(|value| Vertex {
                value,
                links: Vec::new(),
            })
            .collect();

        let len = vertices.len();
        if len > INVALID_NODE as usize {
            return Err(GraphError::TooManyNodes(len));
        }

        for LinkSpec { from, to, cost } in links.into_iter().map(Into::into) {
            if let Some(&index) = [from, to].iter().find(|&&x| x as usize >= len) {
                return Err(GraphError::NodeOutOfRange {
                    from,
                    to,
                    index,
                    len,
                });
            }

            vertices[from as usize].links.push(Link::new(from, to, cost));
        }

        trace!(nodes = len, "constructed graph");
        Ok(Self { vertices })
    }

    /// Same as [`Graph::from_links`] but afterwards (stably) sorts the link list of every node
    /// with the given cost comparator. This makes choices that depend on link order
    /// (e.g. augmenting paths of the max-flow solver) reproducible regardless of input order.
    pub fn from_links_sorted_by<V, L, F>(values: V, links: L, mut cmp: F) -> Result<Self, GraphError>
    where
        V: IntoIterator<Item = T>,
        L: IntoIterator,
        L::Item: Into<LinkSpec<C>>,
        F: FnMut(&C, &C) -> Ordering,
    {
        let mut graph = Self::from_links(values, links)?;
        for vertex in &mut graph.vertices {
            vertex.links.sort_by(|a, b| cmp(&a.cost, &b.cost));
        }
        Ok(graph)
    }

    /// Returns the payload of a node
    /// ** Panics if `u >= n` **
    pub fn value(&self, u: Node) -> &T {
        &self.vertices[u as usize].value
    }

    /// Returns an iterator over all payloads in node order
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.vertices.iter().map(|v| &v.value)
    }

    /// Returns a mutable reference to the cost of a link
    /// ** Panics if the link does not exist **
    pub fn cost_mut(&mut self, id: LinkId) -> &mut C {
        &mut self.vertices[id.from as usize].links[id.slot as usize].cost
    }

    /// Returns the first node whose payload equals `value`
    pub fn find_node(&self, value: &T) -> Option<Node>
    where
        T: PartialEq,
    {
        self.vertices
            .iter()
            .position(|v| v.value == *value)
            .map(|u| u as Node)
    }

    /// Direct access to the link list of a node for algorithms that temporarily rewrite the
    /// topology (e.g. residual networks). Callers must only add links between existing nodes.
    pub(crate) fn links_mut(&mut self, u: Node) -> &mut Vec<Link<C>> {
        &mut self.vertices[u as usize].links
    }
}

impl<T, C> GraphNodeOrder for Graph<T, C> {
    fn number_of_nodes(&self) -> NumNodes {
        self.vertices.len() as NumNodes
    }
}

impl<T, C> GraphEdgeOrder for Graph<T, C> {
    fn number_of_links(&self) -> NumEdges {
        self.vertices.iter().map(|v| v.links.len() as NumEdges).sum()
    }
}

impl<T, C> AdjacencyList for Graph<T, C> {
    type LinkCost = C;

    fn links_of(&self, u: Node) -> &[Link<C>] {
        &self.vertices[u as usize].links
    }
}

impl<T, C> Index<LinkId> for Graph<T, C> {
    type Output = Link<C>;

    fn index(&self, id: LinkId) -> &Self::Output {
        self.link(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn construction_keeps_order() {
        let g: Graph<char, u32> =
            Graph::from_links(['A', 'B', 'C'], [(0, 2, 5), (0, 1, 1), (1, 2, 1)]).unwrap();

        assert_eq!(g.number_of_nodes(), 3);
        assert_eq!(g.number_of_links(), 3);
        assert_eq!(g.values().copied().collect_vec(), vec!['A', 'B', 'C']);
        assert_eq!(g.neighbors_of(0).collect_vec(), vec![2, 1]);
        assert_eq!(g[LinkId::new(0, 1)], Link::new(0, 1, 1));
        assert_eq!(*g.value(2), 'C');
        assert_eq!(g.find_node(&'B'), Some(1));
        assert_eq!(g.find_node(&'Z'), None);
    }

    #[test]
    fn no_implicit_reverse_links() {
        let g: Graph<u8> = Graph::from_links([0, 1], [(0, 1)]).unwrap();
        assert!(g.has_link(0, 1));
        assert!(!g.has_link(1, 0));
        assert_eq!(g.in_degrees(), vec![0, 1]);
    }

    #[test]
    fn out_of_range() {
        let err = Graph::<char, u32>::from_links(['A', 'B'], [(0, 1, 1), (1, 2, 1)]).unwrap_err();
        assert_eq!(
            err,
            GraphError::NodeOutOfRange {
                from: 1,
                to: 2,
                index: 2,
                len: 2
            }
        );

        let err = Graph::<char, u32>::from_links(['A'], [(3, 0, 1)]).unwrap_err();
        assert!(matches!(err, GraphError::NodeOutOfRange { index: 3, .. }));
    }

    #[test]
    fn sorted_construction() {
        let g: Graph<(), u32> = Graph::from_links_sorted_by(
            [(), (), (), ()],
            [(0, 1, 3), (0, 2, 1), (0, 3, 2), (1, 0, 1)],
            |a, b| a.cmp(b),
        )
        .unwrap();

        assert_eq!(g.neighbors_of(0).collect_vec(), vec![2, 3, 1]);
        assert_eq!(g.neighbors_of(1).collect_vec(), vec![0]);
    }

    #[test]
    fn empty_graph() {
        let g: Graph<u8> = Graph::from_links(Vec::new(), Vec::<(Node, Node)>::new()).unwrap();
        assert!(g.is_empty());
        assert!(g.is_singleton());
        assert_eq!(g.edges().count(), 0);
    }

    #[test]
    fn cost_mut() {
        let mut g: Graph<u8, u32> = Graph::from_links([0, 1], [(0, 1, 4)]).unwrap();
        *g.cost_mut(LinkId::new(0, 0)) += 1;
        assert_eq!(g[LinkId::new(0, 0)].cost, 5);
    }
}
