/*!
# Node Representation

We choose `Node = u32` as almost all use-cases involve less than `2^32` nodes.
Nodes are positions in the node arena of a [`Graph`](crate::repr::Graph): they are assigned
in construction order, never reused, and carry no ownership of the payload they index.
*/

use std::num::NonZero;

use fixedbitset::FixedBitSet;

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// BitSet for Nodes
pub type NodeBitSet = FixedBitSet;

/// As `Option<Node>` uses additional bytes for padding, it can be inefficient
/// since we often need `n x n` tables of optional nodes. This instead uses the
/// `NonZero`-Wrapper to assign a constant value as the niche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OptionalNodeImpl<const N: Node>(NonZero<Node>);

/// Often, `INVALID_NODE` is safe to pick as the `None`-Value
pub type OptionalNode = OptionalNodeImpl<INVALID_NODE>;

impl<const N: Node> OptionalNodeImpl<N> {
    /// Returns `Some(OptionalNodeImpl)` if `n != N` and `None` otherwise
    pub const fn new(n: Node) -> Option<Self> {
        match NonZero::new(n ^ N) {
            Some(inner) => Some(OptionalNodeImpl(inner)),
            None => None,
        }
    }

    /// Gets the underlying Node-Value
    pub const fn get(&self) -> Node {
        self.0.get() ^ N
    }
}

/// Returns an empty bitset with one entry per node of a graph with `n` nodes
pub fn node_bitset(n: NumNodes) -> NodeBitSet {
    NodeBitSet::with_capacity(n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_node_niche() {
        assert_eq!(
            std::mem::size_of::<Option<OptionalNode>>(),
            std::mem::size_of::<Node>()
        );

        assert!(OptionalNode::new(INVALID_NODE).is_none());
        for u in [0, 1, 17, INVALID_NODE - 1] {
            assert_eq!(OptionalNode::new(u).unwrap().get(), u);
        }
    }
}
