//! 图核心模块
//!
//! 定义顶点、边、邻接索引和图的核心数据结构

mod edge;
mod graph;
mod index;
mod shared;
mod snapshot;
mod vertex;

pub use edge::{Edge, DEFAULT_WEIGHT};
pub use graph::Graph;
pub use index::AdjacencyIndex;
pub use shared::SharedGraph;
pub use snapshot::GraphSnapshot;
pub use vertex::{Vertex, VertexKey};
