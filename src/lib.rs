/*!
`wgraphs` is a small graph algorithms library for **w**eighted, directed graphs whose nodes
carry a payload.

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of nodes in the graph.
Every node owns a payload value and an ordered list of outgoing [`Link`]s; a link references
its endpoints by index and carries a cost of a generic type implementing [`Cost`].
Links are addressed by a [`LinkId`] (source node and position in its link list).

Undirected graphs are represented by supplying both directions of every edge explicitly.

# Design

All algorithms are provided as configurable structs that one can alter to their needs using
the *Builder* / *Setter* pattern before running them on a provided graph.
The most commonly used functionality is also implemented via traits on the graph itself,
making it usable without configuring the algorithm beforehand.

Algorithms never store scratch state in the graph. The only solver that rewrites a graph is
the max-flow solver, which borrows it mutably for the duration of one call.

# Usage

There are *2* core modules you probably want to interact with:
- [`prelude`] includes definitions for nodes, links, costs, basic graph operations and [`Graph`],
- [`algo`] includes traversals (`Width`, `Depth`, `Mark`, `Remark`), path finding, all-pairs
  shortest paths, topological sorting, maximum flow / minimum cut, and graph coloring.

In most use-cases, `use wgraphs::{prelude::*, algo::*};` suffices for your needs.

```
use wgraphs::{prelude::*, algo::*};

let g: Graph<char, u32> =
    Graph::from_links(['A', 'B', 'C'], [(0, 1, 1), (1, 2, 1), (0, 2, 5)]).unwrap();

let path = g.find_path(0, 2, Traverse::Mark);
assert_eq!(path.iter().map(|&id| g[id].to).collect::<Vec<_>>(), vec![1, 2]);
```
*/

pub mod algo;
pub mod cost;
pub mod edge;
pub mod error;
pub mod link;
pub mod node;
pub mod ops;
pub mod repr;
#[cfg(test)]
pub(crate) mod testing;

pub use cost::*;
pub use edge::*;
pub use error::*;
pub use link::*;
pub use node::*;

/// `wgraphs::prelude` includes definitions for nodes, links, costs and errors, all basic graph
/// operation traits as well as the graph representation.
pub mod prelude {
    pub use super::{cost::*, edge::*, error::*, link::*, node::*, ops::*, repr::*};
}
