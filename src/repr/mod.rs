/*!
# Graph Representation

This crate uses a single storage backend, [`Graph`]: an arena of nodes where every node owns
its payload and the ordered list of its outgoing [`Link`]s.

- Nodes are addressed by their position `0..n` ([`Node`]), assigned in construction order.
- Links reference both endpoints by index and are addressed by [`LinkId`].
- Per-algorithm scratch state (visited flags, marks, flows under construction) is never
  stored in the graph but in side tables owned by the running algorithm; only the
  max-flow solver rewrites link costs and (temporarily) link lists.
*/

use crate::{ops::*, *};

mod graph;

pub use graph::*;
