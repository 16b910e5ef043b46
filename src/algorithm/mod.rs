//! 图算法模块
//!
//! 包含最短路径、连通性、中心性、聚类、最小生成树和最大流算法。
//! 所有算法借用 `&Graph`，调用期间图不可变。

mod centrality;
mod clustering;
mod connectivity;
mod max_flow;
mod path_finder;
mod spanning_tree;
mod topology;
mod traversal;
mod union_find;

pub use centrality::Centrality;
pub use clustering::Clustering;
pub use connectivity::Connectivity;
pub use max_flow::{EdmondsKarp, MaxFlow, MinCut};
pub use path_finder::{PathFinder, PathResult};
pub use spanning_tree::Kruskal;
