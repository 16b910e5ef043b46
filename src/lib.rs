//! graphkit - 内存图分析库
//!
//! 面向中小规模图的通用分析工具，支持：
//! - 有向/无向图存储，顶点与边携带任意属性
//! - 遍历与最短路径（BFS、Dijkstra、全源最短路径）
//! - 连通性、中心性与聚类分析
//! - 最小生成树、最大流与最小割
//! - JSON / 二进制快照导出

pub mod algorithm;
pub mod config;
pub mod error;
pub mod graph;
pub mod types;

// 重导出常用类型
pub use algorithm::{
    Centrality, Clustering, Connectivity, EdmondsKarp, Kruskal, MaxFlow, MinCut, PathFinder,
    PathResult,
};
pub use config::{AnalysisConfig, PageRankConfig, PowerIterationConfig};
pub use error::{Error, ErrorKind, Result};
pub use graph::{Edge, Graph, GraphSnapshot, SharedGraph, Vertex, VertexKey, DEFAULT_WEIGHT};
pub use types::{
    Direction, GraphMode, MissingVertexPolicy, PathMetric, Properties, PropertyValue,
};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
