/*!
# Graph Algorithms

This module provides the **graph algorithms** of this crate, built on top of [`AdjacencyList`].
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use wgraphs::algo::*;
```
and gain access to traversals, path finding, all-pairs shortest paths, topological sorting,
maximum flow / minimum cut and graph coloring.
If possible, algorithms are provided as **iterators**, making it easy to consume results lazily.
*/

mod all_pairs;
mod coloring;
mod network_flow;
mod path;
mod topological;
mod traversal;

use crate::prelude::*;

pub use all_pairs::*;
pub use coloring::*;
pub use network_flow::*;
pub use path::*;
pub use topological::*;
pub use traversal::*;
