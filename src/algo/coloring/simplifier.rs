use super::*;
use fixedbitset::FixedBitSet;
use std::collections::{BTreeSet, VecDeque};

/// Index of a node of the reduced graph
pub type ReducedNode = usize;

/// A node of the reduced graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduced {
    /// A node of the original graph
    Original(Node),
    /// A synthetic node merging the non-adjacent neighbors `m` and `n` of `k`
    Packed {
        k: ReducedNode,
        m: ReducedNode,
        n: ReducedNode,
    },
}

#[derive(Debug, Clone)]
struct ReducedVertex {
    kind: Reduced,
    neighbors: BTreeSet<ReducedNode>,
}

/// Reduces a graph for coloring by repeatedly
/// - *extracting* nodes whose live degree is in `[1, palette)`, and
/// - (only if the palette has exactly `packing_degree` colors and extraction stalls) *packing*
///   a node `k` of live degree `packing_degree` with two of its non-adjacent neighbors `m` and
///   `n` into a synthetic node with neighbors `N(m) ∪ N(n) \ {k}`.
///
/// What remains is the *base*. Extracted nodes are stored most-recently removed first, so that
/// replaying base followed by extracted nodes colors every node after its live neighbors.
///
/// The reduced graph is kept in an arena: synthetic nodes are appended after the original nodes
/// and never removed; the neighbor set of a node is frozen once it leaves the active set.
#[derive(Debug, Clone)]
pub struct Simplifier {
    adjacency: Vec<BTreeSet<ReducedNode>>,
    vertices: Vec<ReducedVertex>,
    active: Vec<ReducedNode>,
    extracted: VecDeque<ReducedNode>,
    packing_degree: usize,
    partner_degree: usize,
}

impl Simplifier {
    /// Creates a simplifier for a graph given as symmetric adjacency lists without self-loops
    pub fn new(adjacency: &[Vec<Node>]) -> Self {
        let adjacency = adjacency
            .iter()
            .map(|neighbors| neighbors.iter().map(|&v| v as ReducedNode).collect())
            .collect();

        Self {
            adjacency,
            vertices: Vec::new(),
            active: Vec::new(),
            extracted: VecDeque::new(),
            packing_degree: 5,
            partner_degree: 8,
        }
    }

    /// Sets the degree of nodes that can be packed with two of their neighbors (default: 5).
    /// Packing is only attempted if the palette has exactly this many colors.
    pub fn set_packing_degree(&mut self, degree: usize) {
        self.packing_degree = degree;
    }

    /// Sets the degree of nodes that can be packed with two of their neighbors (default: 5).
    pub fn packing_degree(mut self, degree: usize) -> Self {
        self.set_packing_degree(degree);
        self
    }

    /// Sets the strict upper bound on the live degree of packing partners `m` and `n`
    /// (default: 8).
    pub fn set_partner_degree(&mut self, degree: usize) {
        self.partner_degree = degree;
    }

    /// Sets the strict upper bound on the live degree of packing partners `m` and `n`
    /// (default: 8).
    pub fn partner_degree(mut self, degree: usize) -> Self {
        self.set_partner_degree(degree);
        self
    }

    /// Reduces the graph for a palette of the given size
    pub fn simplify(&mut self, palette: usize) {
        self.vertices = self
            .adjacency
            .iter()
            .enumerate()
            .map(|(u, neighbors)| ReducedVertex {
                kind: Reduced::Original(u as Node),
                neighbors: neighbors.clone(),
            })
            .collect();
        self.active = (0..self.vertices.len()).collect();
        self.extracted.clear();

        let mut rounds = 0usize;
        let mut packed = 0usize;
        loop {
            rounds += 1;
            if self.extract(palette) {
                continue;
            }

            if palette == self.packing_degree && self.pack() {
                packed += 1;
                continue;
            }

            break;
        }

        debug!(
            rounds,
            packed,
            base = self.active.len(),
            extracted = self.extracted.len(),
            "simplified graph for coloring"
        );
    }

    /// Returns the nodes that remained after simplification
    pub fn base(&self) -> &[ReducedNode] {
        &self.active
    }

    /// Returns the extracted nodes, most recently extracted first
    pub fn extracted(&self) -> impl Iterator<Item = ReducedNode> + '_ {
        self.extracted.iter().copied()
    }

    /// Returns the kind of a node of the reduced graph
    pub fn kind_of(&self, v: ReducedNode) -> Reduced {
        self.vertices[v].kind
    }

    /// Returns the neighbors a node had when it left the active set
    pub fn neighbors_of(&self, v: ReducedNode) -> impl Iterator<Item = ReducedNode> + '_ {
        self.vertices[v].neighbors.iter().copied()
    }

    /// Returns the number of synthetic nodes created by packing
    pub fn number_of_packed(&self) -> usize {
        self.vertices
            .iter()
            .filter(|v| matches!(v.kind, Reduced::Packed { .. }))
            .count()
    }

    fn degree_of(&self, v: ReducedNode) -> usize {
        self.vertices[v].neighbors.len()
    }

    /// Pulls all active nodes with degree in `[1, limit)` (degrees as of the start of the scan)
    /// and returns *true* if any node was pulled.
    fn extract(&mut self, limit: usize) -> bool {
        let (batch, active): (Vec<_>, Vec<_>) = self
            .active
            .iter()
            .copied()
            .partition(|&v| (1..limit).contains(&self.degree_of(v)));

        if batch.is_empty() {
            return false;
        }

        self.active = active;
        self.unbind(&batch);

        // the batch is prepended in reverse scan order
        for v in batch {
            self.extracted.push_front(v);
        }

        true
    }

    /// Finds a node `k` of degree `packing_degree` with two non-adjacent neighbors of degree
    /// below `partner_degree` and merges them into a new active node.
    fn pack(&mut self) -> bool {
        let Some((k, m, n)) = self.find_triple() else {
            return false;
        };

        self.active.retain(|&v| v != k && v != m && v != n);

        let neighbors: BTreeSet<ReducedNode> = self.vertices[m]
            .neighbors
            .union(&self.vertices[n].neighbors)
            .copied()
            .filter(|&v| v != k)
            .collect();

        self.unbind(&[k, m, n]);

        let packed = self.vertices.len();
        for &v in &neighbors {
            self.vertices[v].neighbors.insert(packed);
        }
        self.vertices.push(ReducedVertex {
            kind: Reduced::Packed { k, m, n },
            neighbors,
        });
        self.active.push(packed);

        trace!(k, m, n, packed, "packed nodes");
        true
    }

    fn find_triple(&self) -> Option<(ReducedNode, ReducedNode, ReducedNode)> {
        self.active
            .iter()
            .filter(|&&k| self.degree_of(k) == self.packing_degree)
            .find_map(|&k| {
                self.vertices[k]
                    .neighbors
                    .iter()
                    .tuple_combinations()
                    .find(|&(&m, &n)| {
                        !self.vertices[m].neighbors.contains(&n)
                            && self.degree_of(m) < self.partner_degree
                            && self.degree_of(n) < self.partner_degree
                    })
                    .map(|(&m, &n)| (k, m, n))
            })
    }

    /// Removes every node of `group` from the neighbor sets of its neighbors outside of
    /// `group`. Neighbor sets of the group itself stay untouched.
    fn unbind(&mut self, group: &[ReducedNode]) {
        let mut members = FixedBitSet::with_capacity(self.vertices.len());
        members.extend(group.iter().copied());

        for &v in group {
            let neighbors = std::mem::take(&mut self.vertices[v].neighbors);
            for &u in &neighbors {
                if !members.contains(u) {
                    self.vertices[u].neighbors.remove(&v);
                }
            }
            self.vertices[v].neighbors = neighbors;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn extraction_order() {
        // path 0 - 1 - 2 - 3
        let adjacency = vec![vec![1], vec![0, 2], vec![1, 3], vec![2]];
        let mut simplifier = Simplifier::new(&adjacency);
        simplifier.simplify(2);

        // first round pulls 0 and 3 (degree 1), second round 1 and 2
        assert_eq!(simplifier.extracted().collect_vec(), vec![2, 1, 3, 0]);
        assert!(simplifier.base().is_empty());
    }

    #[test]
    fn isolated_nodes_stay_in_base() {
        let adjacency = vec![vec![], vec![2], vec![1]];
        let mut simplifier = Simplifier::new(&adjacency);
        simplifier.simplify(3);

        assert_eq!(simplifier.base(), &[0]);
        assert_eq!(simplifier.extracted().collect_vec(), vec![2, 1]);
    }

    #[test]
    fn high_degree_stays_in_base() {
        // K4 cannot be reduced for three colors
        let adjacency = (0..4)
            .map(|u| (0..4).filter(|&v| v != u).collect_vec())
            .collect_vec();
        let mut simplifier = Simplifier::new(&adjacency);
        simplifier.simplify(3);

        assert_eq!(simplifier.base(), &[0, 1, 2, 3]);
        assert_eq!(simplifier.extracted().count(), 0);
    }

    #[test]
    fn packs_icosahedron() {
        let adjacency = symmetric_adjacency(12, &icosahedron());
        let mut simplifier = Simplifier::new(&adjacency);
        simplifier.simplify(5);

        assert_eq!(simplifier.number_of_packed(), 1);
        assert_eq!(
            simplifier.kind_of(12),
            Reduced::Packed { k: 0, m: 1, n: 3 }
        );
        assert_eq!(
            simplifier.neighbors_of(12).collect_vec(),
            vec![6, 7, 8, 9]
        );
        assert_eq!(simplifier.base(), &[11]);
        assert_eq!(simplifier.extracted().count(), 9);

        // no packing for other palette sizes
        simplifier.simplify(4);
        assert_eq!(simplifier.number_of_packed(), 0);
        assert_eq!(simplifier.base().len(), 12);

        let mut simplifier = Simplifier::new(&adjacency).packing_degree(4);
        simplifier.simplify(5);
        assert_eq!(simplifier.number_of_packed(), 0);
    }
}
