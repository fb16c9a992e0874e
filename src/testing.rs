//! Graph generators and fixtures shared by the unit tests.

use crate::{ops::*, repr::*, *};
use itertools::Itertools;
use rand::Rng;

/// Creates a list of `m` random links for nodes `0..n` with costs in `0..=max_cost`.
/// Multi-links and self-loops may occur.
pub fn random_links<R: Rng>(
    rng: &mut R,
    n: NumNodes,
    m: NumEdges,
    max_cost: u32,
) -> Vec<(Node, Node, u32)> {
    (0..m)
        .map(|_| {
            (
                rng.random_range(0..n),
                rng.random_range(0..n),
                rng.random_range(0..=max_cost),
            )
        })
        .collect_vec()
}

/// Creates a random directed graph with `m` links and costs in `0..=max_cost`
pub fn random_weighted_graph<R: Rng>(
    rng: &mut R,
    n: NumNodes,
    m: NumEdges,
    max_cost: u32,
) -> Graph<Node, u32> {
    Graph::from_links(0..n, random_links(rng, n, m, max_cost)).unwrap()
}

/// Creates a random graph containing both directions of each of its `m` random edges
pub fn random_symmetric_graph<R: Rng>(
    rng: &mut R,
    n: NumNodes,
    m: NumEdges,
    max_cost: u32,
) -> Graph<Node, u32> {
    let links = random_links(rng, n, m, max_cost)
        .into_iter()
        .flat_map(|(u, v, c)| [(u, v, c), (v, u, c)])
        .collect_vec();

    Graph::from_links(0..n, links).unwrap()
}

/// Creates a random acyclic graph with `m` links, each pointing from a smaller to a larger
/// node. Requires `n >= 2`.
pub fn random_dag<R: Rng>(rng: &mut R, n: NumNodes, m: NumEdges) -> Graph<Node> {
    let links = (0..m)
        .map(|_| {
            let u = rng.random_range(0..n - 1);
            let v = rng.random_range(u + 1..n);
            (u, v)
        })
        .collect_vec();

    Graph::from_links(0..n, links).unwrap()
}

/// Creates a `rows x cols` grid in which every cell `(r, c)` is split by the diagonal
/// `(r, c) - (r + 1, c + 1)`. Both directions of every edge are present.
pub fn triangulated_grid(rows: Node, cols: Node) -> Graph<Node> {
    let id = |r: Node, c: Node| r * cols + c;

    let mut edges = Vec::new();
    for (r, c) in (0..rows).cartesian_product(0..cols) {
        if c + 1 < cols {
            edges.push((id(r, c), id(r, c + 1)));
        }
        if r + 1 < rows {
            edges.push((id(r, c), id(r + 1, c)));
        }
        if r + 1 < rows && c + 1 < cols {
            edges.push((id(r, c), id(r + 1, c + 1)));
        }
    }

    let links = edges.into_iter().flat_map(|(u, v)| [(u, v), (v, u)]);
    Graph::from_links(0..rows * cols, links).unwrap()
}

/// The 30 edges of the icosahedron: apex `0`, upper ring `1..=5`, lower ring `6..=10` and
/// bottom `11`. Every node has degree 5.
pub fn icosahedron() -> Vec<(Node, Node)> {
    let mut edges = Vec::with_capacity(30);
    for i in 1..=5 {
        let next = i % 5 + 1;
        edges.push((0, i));
        edges.push((i, next));
        edges.push((i + 5, next + 5));
        edges.push((11, i + 5));
        edges.push((i, i + 5));
        edges.push((i, next + 5));
    }
    edges
}

/// Returns sorted symmetric adjacency lists of the given edges
pub fn symmetric_adjacency(n: NumNodes, edges: &[(Node, Node)]) -> Vec<Vec<Node>> {
    let mut adjacency = vec![Vec::new(); n as usize];
    for &(u, v) in edges {
        adjacency[u as usize].push(v);
        adjacency[v as usize].push(u);
    }

    for neighbors in &mut adjacency {
        neighbors.sort_unstable();
        neighbors.dedup();
    }
    adjacency
}

#[test]
fn icosahedron_is_five_regular() {
    let adjacency = symmetric_adjacency(12, &icosahedron());
    assert!(adjacency.iter().all(|neighbors| neighbors.len() == 5));
}

#[test]
fn triangulated_grid_degrees() {
    let g = triangulated_grid(4, 5);
    assert_eq!(g.number_of_nodes(), 20);
    // 4 * 4 horizontal, 3 * 5 vertical and 3 * 4 diagonal edges, both directions
    assert_eq!(g.number_of_links(), 2 * (16 + 15 + 12));
    assert_eq!(g.max_degree(), 6);
}
