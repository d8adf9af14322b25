//! Directory graph model and construction
//!
//! - `node` - node ids, node/edge kinds
//! - `model` - the immutable `Graph`
//! - `builder` - folds walker entries into a `Graph`

mod builder;
mod model;
mod node;

pub use builder::{GraphBuilder, build};
pub use model::{Graph, GraphStats};
pub use node::{Annotation, Edge, EdgeKind, Node, NodeId, NodeKind};
