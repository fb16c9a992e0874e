/*!
# Graph Coloring

Assigns colors from a fixed palette to the nodes of a graph such that no two adjacent nodes
share a color. Links are treated as undirected (a link `(u, v)` makes `u` and `v` adjacent in
both directions) and self-loops are ignored.

Colors are written into an injectable [`ColorAssignment`], implemented for `Vec<Option<K>>`
and `FxHashMap<Node, K>`. If coloring fails, the colors assigned so far are left in place.

Depending on the size of the palette, [`Colorizer::paint`] uses
- *1 color*: every node receives the single color,
- *2 colors*: a breadth-first two-coloring restarted for every component; a link between two
  nodes forced onto the same color is reported as [`ColoringError::Conflict`],
- *3 or more colors*: the graph is first reduced by a [`Simplifier`] (removal of low-degree
  nodes and, for 5 colors, Kempe-style packing of degree-5 nodes) and then colored greedily
  by replaying the reduction in reverse.

[`Colorizer::paint_greedy`] colors all nodes greedily in index order without simplification.
*/

mod simplifier;

use super::*;
use fxhash::FxHashMap;
use itertools::Itertools;
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

pub use simplifier::*;

/// Read/write access to the color of every node.
pub trait ColorAssignment<K> {
    /// Returns the color of `u`, if any
    fn color_of(&self, u: Node) -> Option<&K>;

    /// Assigns `color` to `u`, replacing a previous color
    fn set_color(&mut self, u: Node, color: K);
}

impl<K: Clone> ColorAssignment<K> for Vec<Option<K>> {
    fn color_of(&self, u: Node) -> Option<&K> {
        self.get(u as usize).and_then(Option::as_ref)
    }

    fn set_color(&mut self, u: Node, color: K) {
        if self.len() <= u as usize {
            self.resize(u as usize + 1, None);
        }
        self[u as usize] = Some(color);
    }
}

impl<K> ColorAssignment<K> for FxHashMap<Node, K> {
    fn color_of(&self, u: Node) -> Option<&K> {
        self.get(&u)
    }

    fn set_color(&mut self, u: Node, color: K) {
        self.insert(u, color);
    }
}

/// Colors the nodes of a graph.
///
/// # Examples
/// ```
/// use wgraphs::{prelude::*, algo::*};
///
/// // a 4-cycle given by both directions of every edge
/// let g: Graph<char> = Graph::from_links(
///     ['A', 'B', 'C', 'D'],
///     [(0, 1), (1, 0), (1, 2), (2, 1), (2, 3), (3, 2), (3, 0), (0, 3)],
/// )
/// .unwrap();
///
/// let mut colors: Vec<Option<&str>> = Vec::new();
/// Colorizer::new(&g).paint(&["red", "blue"], &mut colors).unwrap();
/// assert_eq!(colors, vec![Some("red"), Some("blue"), Some("red"), Some("blue")]);
/// ```
#[derive(Debug, Clone)]
pub struct Colorizer {
    adjacency: Vec<Vec<Node>>,
    packing_degree: usize,
    partner_degree: usize,
}

impl Colorizer {
    /// Creates a colorizer for the given graph
    pub fn new<G: AdjacencyList>(graph: &G) -> Self {
        let mut adjacency = vec![Vec::new(); graph.len()];
        for Edge(u, v) in graph.edges().filter(|e| !e.is_loop()) {
            adjacency[u as usize].push(v);
            adjacency[v as usize].push(u);
        }

        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        Self {
            adjacency,
            packing_degree: 5,
            partner_degree: 8,
        }
    }

    /// Sets the palette size for which Kempe-style packing is used (default: 5).
    /// See [`Simplifier::set_packing_degree`].
    pub fn set_packing_degree(&mut self, degree: usize) {
        self.packing_degree = degree;
    }

    /// Sets the palette size for which Kempe-style packing is used (default: 5).
    pub fn packing_degree(mut self, degree: usize) -> Self {
        self.set_packing_degree(degree);
        self
    }

    /// Sets the strict degree bound of packing partners (default: 8).
    /// See [`Simplifier::set_partner_degree`].
    pub fn set_partner_degree(&mut self, degree: usize) {
        self.partner_degree = degree;
    }

    /// Sets the strict degree bound of packing partners (default: 8).
    pub fn partner_degree(mut self, degree: usize) -> Self {
        self.set_partner_degree(degree);
        self
    }

    /// Returns the number of nodes
    pub fn number_of_nodes(&self) -> NumNodes {
        self.adjacency.len() as NumNodes
    }

    /// Returns the (undirected) neighbors of `u` in increasing order
    /// ** Panics if `u >= n` **
    pub fn neighbors_of(&self, u: Node) -> &[Node] {
        &self.adjacency[u as usize]
    }

    fn are_adjacent(&self, u: Node, v: Node) -> bool {
        self.adjacency[u as usize].binary_search(&v).is_ok()
    }

    fn has_colored_neighbor<K, A>(&self, u: Node, color: &K, colors: &A) -> bool
    where
        K: PartialEq,
        A: ColorAssignment<K>,
    {
        self.neighbors_of(u)
            .iter()
            .any(|&v| colors.color_of(v) == Some(color))
    }

    /// Colors the graph with the given palette, choosing the procedure by palette size.
    ///
    /// # Errors
    /// - [`ColoringError::EmptyPalette`] if the palette is empty but the graph is not,
    /// - [`ColoringError::Conflict`] if two colors do not suffice,
    /// - [`ColoringError::Uncolorable`] for the first node that could not be colored.
    pub fn paint<K, A>(&self, palette: &[K], colors: &mut A) -> Result<(), ColoringError>
    where
        K: Clone + PartialEq,
        A: ColorAssignment<K>,
    {
        match palette {
            [] if self.adjacency.is_empty() => Ok(()),
            [] => Err(ColoringError::EmptyPalette),
            [color] => {
                self.paint_uniform(color, colors);
                Ok(())
            }
            [first, second] => self.paint_two(first, second, colors),
            _ => self.paint_simplified(palette, colors),
        }
    }

    /// Assigns `color` to every node
    pub fn paint_uniform<K, A>(&self, color: &K, colors: &mut A)
    where
        K: Clone,
        A: ColorAssignment<K>,
    {
        for u in 0..self.number_of_nodes() {
            colors.set_color(u, color.clone());
        }
    }

    /// Two-colors the graph breadth-first, starting a new search at the first uncolored node of
    /// every component with color `first`.
    ///
    /// Pre-assigned colors `first` and `second` are kept. A node reached by the search that
    /// holds any other color is recolored and searched from; such a node is never used as a
    /// starting point, so components reached from no uncolored node keep their colors.
    ///
    /// # Errors
    /// Returns [`ColoringError::Conflict`] as soon as a neighbor of a node has the same color as
    /// the node itself.
    pub fn paint_two<K, A>(&self, first: &K, second: &K, colors: &mut A) -> Result<(), ColoringError>
    where
        K: Clone + PartialEq,
        A: ColorAssignment<K>,
    {
        let mut queue = VecDeque::new();

        for root in 0..self.number_of_nodes() {
            if colors.color_of(root).is_some() {
                continue;
            }

            colors.set_color(root, first.clone());
            queue.push_back(root);

            while let Some(u) = queue.pop_front() {
                let Some(own) = colors.color_of(u).cloned() else {
                    continue;
                };
                let other = if own == *first { second } else { first };

                for &v in self.neighbors_of(u) {
                    let color = colors.color_of(v);
                    if color == Some(&own) {
                        warn!(u, v, "impossible to color: adjacent nodes have the same color");
                        return Err(ColoringError::Conflict { u, v });
                    }

                    if color != Some(other) {
                        colors.set_color(v, other.clone());
                        queue.push_back(v);
                    }
                }
            }
        }

        Ok(())
    }

    /// Colors every node in index order with the first color not used by a neighbor.
    ///
    /// # Errors
    /// Returns [`ColoringError::Uncolorable`] for the first node without a free color.
    pub fn paint_greedy<K, A>(&self, palette: &[K], colors: &mut A) -> Result<(), ColoringError>
    where
        K: Clone + PartialEq,
        A: ColorAssignment<K>,
    {
        (0..self.number_of_nodes()).try_for_each(|u| self.paint_one(u, palette, colors))
    }

    /// Reduces the graph with a [`Simplifier`] and colors the base followed by all extracted
    /// nodes, most recently extracted first.
    ///
    /// # Errors
    /// Returns [`ColoringError::Uncolorable`] for the first node without a free color.
    pub fn paint_simplified<K, A>(&self, palette: &[K], colors: &mut A) -> Result<(), ColoringError>
    where
        K: Clone + PartialEq,
        A: ColorAssignment<K>,
    {
        let mut simplifier = Simplifier::new(&self.adjacency)
            .packing_degree(self.packing_degree)
            .partner_degree(self.partner_degree);
        simplifier.simplify(palette.len());

        let order = simplifier
            .base()
            .iter()
            .copied()
            .chain(simplifier.extracted())
            .collect_vec();

        for v in order {
            self.paint_reduced(&simplifier, v, palette, colors)?;
        }

        debug!(nodes = self.number_of_nodes(), "colored graph");
        Ok(())
    }

    /// Colors an original node with the first color not used by a colored neighbor
    fn paint_one<K, A>(&self, u: Node, palette: &[K], colors: &mut A) -> Result<(), ColoringError>
    where
        K: Clone + PartialEq,
        A: ColorAssignment<K>,
    {
        let Some(color) = palette
            .iter()
            .find(|&color| !self.has_colored_neighbor(u, color, &*colors))
        else {
            warn!(node = u, "impossible to color node");
            return Err(ColoringError::Uncolorable { node: u });
        };

        trace!(node = u, "colored node");
        colors.set_color(u, color.clone());
        Ok(())
    }

    fn paint_reduced<K, A>(
        &self,
        simplifier: &Simplifier,
        v: ReducedNode,
        palette: &[K],
        colors: &mut A,
    ) -> Result<(), ColoringError>
    where
        K: Clone + PartialEq,
        A: ColorAssignment<K>,
    {
        let (k, m, n) = match simplifier.kind_of(v) {
            Reduced::Original(u) => return self.paint_one(u, palette, colors),
            Reduced::Packed { k, m, n } => (k, m, n),
        };

        // all original nodes that receive the color of `v`
        let mut leaves = Vec::new();
        collect_leaves(simplifier, m, &mut leaves);
        collect_leaves(simplifier, n, &mut leaves);

        let independent = leaves
            .iter()
            .tuple_combinations()
            .all(|(&a, &b)| !self.are_adjacent(a, b));

        let color = palette.iter().find(|&color| {
            independent
                && !simplifier
                    .neighbors_of(v)
                    .any(|w| representative_color(simplifier, w, &*colors) == Some(color))
                && leaves
                    .iter()
                    .all(|&u| !self.has_colored_neighbor(u, color, &*colors))
        });

        let Some(color) = color else {
            let node = leaves.first().copied().unwrap_or(INVALID_NODE);
            warn!(node, "impossible to color packed node");
            return Err(ColoringError::Uncolorable { node });
        };

        for &u in &leaves {
            colors.set_color(u, color.clone());
        }
        trace!(?leaves, "colored packed node");

        // centers of nested packs first, `k` last
        let mut centers = Vec::new();
        collect_centers(simplifier, m, &mut centers);
        collect_centers(simplifier, n, &mut centers);
        centers.push(k);

        centers
            .into_iter()
            .try_for_each(|c| self.paint_reduced(simplifier, c, palette, colors))
    }
}

/// Collects the original nodes merged into `v` (excluding the centers `k` of packs)
fn collect_leaves(simplifier: &Simplifier, v: ReducedNode, leaves: &mut Vec<Node>) {
    match simplifier.kind_of(v) {
        Reduced::Original(u) => leaves.push(u),
        Reduced::Packed { m, n, .. } => {
            collect_leaves(simplifier, m, leaves);
            collect_leaves(simplifier, n, leaves);
        }
    }
}

/// Collects the centers `k` of all packs nested in `v`, innermost first
fn collect_centers(simplifier: &Simplifier, v: ReducedNode, centers: &mut Vec<ReducedNode>) {
    if let Reduced::Packed { k, m, n } = simplifier.kind_of(v) {
        collect_centers(simplifier, m, centers);
        collect_centers(simplifier, n, centers);
        centers.push(k);
    }
}

/// The color of a packed node is the color of its partners
fn representative_color<'a, K, A>(simplifier: &Simplifier, v: ReducedNode, colors: &'a A) -> Option<&'a K>
where
    A: ColorAssignment<K>,
{
    match simplifier.kind_of(v) {
        Reduced::Original(u) => colors.color_of(u),
        Reduced::Packed { m, .. } => representative_color(simplifier, m, colors),
    }
}

/// Provides graph coloring directly on graphs.
pub trait Coloring: AdjacencyList {
    /// Colors the graph with the given palette. See [`Colorizer::paint`].
    fn paint<K, A>(&self, palette: &[K], colors: &mut A) -> Result<(), ColoringError>
    where
        K: Clone + PartialEq,
        A: ColorAssignment<K>,
    {
        Colorizer::new(self).paint(palette, colors)
    }

    /// Returns *true* if no link connects two distinct nodes of the same color
    fn is_properly_colored<K, A>(&self, colors: &A) -> bool
    where
        K: PartialEq,
        A: ColorAssignment<K>,
    {
        self.edges()
            .filter(|e| !e.is_loop())
            .all(|Edge(u, v)| match (colors.color_of(u), colors.color_of(v)) {
                (Some(a), Some(b)) => a != b,
                _ => false,
            })
    }
}

impl<G> Coloring for G where G: AdjacencyList {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    const PALETTE: [char; 5] = ['r', 'g', 'b', 'o', 'v'];

    fn undirected(n: Node, edges: &[(Node, Node)]) -> Graph<Node> {
        Graph::from_links(
            0..n,
            edges.iter().flat_map(|&(u, v)| [(u, v), (v, u)]),
        )
        .unwrap()
    }

    #[test]
    fn four_cycle_two_colors() {
        let g = undirected(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let mut colors = Vec::new();

        g.paint(&PALETTE[..2], &mut colors).unwrap();
        assert_eq!(colors, vec![Some('r'), Some('g'), Some('r'), Some('g')]);
        assert!(g.is_properly_colored(&colors));
    }

    #[test]
    fn triangle_two_colors() {
        let g = undirected(3, &[(0, 1), (1, 2), (2, 0)]);
        let mut colors = Vec::new();

        assert_eq!(
            g.paint(&PALETTE[..2], &mut colors),
            Err(ColoringError::Conflict { u: 1, v: 2 })
        );

        // partial coloring stays in place
        assert_eq!(colors, vec![Some('r'), Some('g'), Some('g')]);
    }

    #[test]
    fn two_colors_per_component() {
        // directed links suffice, 0 - 1 and 2 - 3 - 4
        let g: Graph<u8> = Graph::from_links([0, 1, 2, 3, 4], [(1, 0), (2, 3), (4, 3)]).unwrap();
        let mut colors = FxHashMap::default();

        g.paint(&[1u8, 2], &mut colors).unwrap();
        assert_eq!(colors.color_of(0), Some(&1));
        assert_eq!(colors.color_of(1), Some(&2));
        assert_eq!(colors.color_of(2), Some(&1));
        assert_eq!(colors.color_of(3), Some(&2));
        assert_eq!(colors.color_of(4), Some(&1));
    }

    #[test]
    fn two_colors_replace_foreign_colors() {
        let g = undirected(4, &[(0, 1), (1, 2)]);
        let mut colors = vec![None, Some('x'), None, Some('x')];

        g.paint(&PALETTE[..2], &mut colors).unwrap();
        assert_eq!(colors, vec![Some('r'), Some('g'), Some('r'), Some('x')]);

        // kept palette colors still constrain their neighbors
        let mut colors = vec![None, Some('r'), None];
        assert_eq!(
            g.paint(&PALETTE[..2], &mut colors),
            Err(ColoringError::Conflict { u: 0, v: 1 })
        );
    }

    #[test]
    fn single_and_empty_palette() {
        let g = undirected(3, &[(0, 1)]);

        let mut colors = Vec::new();
        g.paint(&['x'], &mut colors).unwrap();
        assert_eq!(colors, vec![Some('x'); 3]);

        let mut colors: Vec<Option<char>> = Vec::new();
        assert_eq!(g.paint(&[], &mut colors), Err(ColoringError::EmptyPalette));

        let empty: Graph<u8> = Graph::from_links(Vec::new(), Vec::<(Node, Node)>::new()).unwrap();
        assert_eq!(empty.paint::<char, _>(&[], &mut colors), Ok(()));
    }

    #[test]
    fn wheel_four_colors() {
        // hub 0 with rim 1..=5
        let g = undirected(
            6,
            &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (1, 2), (2, 3), (3, 4), (4, 5), (5, 1)],
        );
        let mut colors = Vec::new();

        g.paint(&PALETTE[..4], &mut colors).unwrap();
        assert!(g.is_properly_colored(&colors));

        // an odd wheel needs four colors
        let mut colors = Vec::new();
        assert!(g.paint(&PALETTE[..3], &mut colors).is_err());
    }

    #[test]
    fn five_colors_fixture() {
        #[rustfmt::skip]
        let links = [
            (0, 1), (0, 2), (0, 3),
            (1, 0), (1, 2), (1, 8),
            (2, 0), (2, 1), (2, 3), (2, 6), (2, 8),
            (3, 0), (3, 2), (3, 4), (3, 5), (3, 6), (3, 7), (3, 8),
            (4, 3),
            (5, 3), (5, 9),
            (6, 2), (6, 3),
            (7, 3), (7, 8), (7, 10), (7, 11), (7, 12), (7, 13), (7, 15),
            (8, 1), (8, 2), (8, 3), (8, 7),
            (9, 5),
            (10, 7), (10, 11), (10, 12), (10, 13),
            (11, 7), (11, 10), (11, 12), (11, 13),
            (12, 7), (12, 10), (12, 11), (12, 13),
            (13, 7), (13, 10), (13, 11), (13, 12), (13, 14),
            (14, 13),
            (15, 7),
        ];
        let g: Graph<char, bool> = Graph::from_links("0123456789ABCDEF".chars(), links).unwrap();

        let mut colors = Vec::new();
        g.paint(&PALETTE, &mut colors).unwrap();
        assert!(g.is_properly_colored(&colors));
    }

    #[test]
    fn icosahedron_with_packing() {
        let g = undirected(12, &icosahedron());
        let mut colors = FxHashMap::default();

        g.paint(&PALETTE, &mut colors).unwrap();
        assert!(g.is_properly_colored(&colors));
        assert_eq!(colors.len(), 12);

        // the packed partners 1 and 3 share their color
        assert_eq!(colors.color_of(1), colors.color_of(3));
    }

    #[test]
    fn greedy_in_index_order() {
        let g = undirected(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
        let mut colors = Vec::new();

        Colorizer::new(&g).paint_greedy(&PALETTE, &mut colors).unwrap();
        assert_eq!(colors, vec![Some('r'), Some('g'), Some('b'), Some('g')]);

        let mut colors = Vec::new();
        assert_eq!(
            Colorizer::new(&g).paint_greedy(&PALETTE[..2], &mut colors),
            Err(ColoringError::Uncolorable { node: 2 })
        );
    }

    #[test]
    fn self_loops_ignored() {
        let g: Graph<u8> = Graph::from_links([0, 1], [(0, 0), (0, 1)]).unwrap();
        let mut colors = Vec::new();
        g.paint(&PALETTE[..2], &mut colors).unwrap();
        assert!(g.is_properly_colored(&colors));
    }

    #[test]
    fn triangulated_grids() {
        let rng = &mut Pcg64Mcg::seed_from_u64(23);

        for _ in 0..10 {
            let rows = rng.random_range(2..8);
            let cols = rng.random_range(2..8);
            let g = triangulated_grid(rows, cols);

            // the top-right node of every subgraph has at most 3 neighbors in it, so
            // extraction always empties the grid for 4 colors
            for palette in [4, 5] {
                let mut colors = Vec::new();
                g.paint(&PALETTE[..palette], &mut colors).unwrap();
                assert!(g.is_properly_colored(&colors));
                assert_eq!(colors.len(), (rows * cols) as usize);
            }
        }
    }

    #[test]
    fn random_graphs_colored_properly_on_success() {
        let rng = &mut Pcg64Mcg::seed_from_u64(29);

        for _ in 0..30 {
            let n = rng.random_range(1..40);
            let g = random_weighted_graph(rng, n, 2 * n, 1);

            for palette in 1..=5 {
                let mut colors = Vec::new();
                let result = g.paint(&PALETTE[..palette], &mut colors);
                if palette >= 2 && result.is_ok() {
                    assert!(g.is_properly_colored(&colors), "palette {palette}");
                }
            }
        }
    }
}
