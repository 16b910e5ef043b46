//! 图快照
//!
//! 供外部渲染器或序列化器消费的导出格式：模式、缺失顶点策略、顶点列表与带权边列表。

use super::edge::Edge;
use super::graph::Graph;
use super::vertex::{Vertex, VertexKey};
use crate::error::Result;
use crate::types::{GraphMode, MissingVertexPolicy};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 图快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot<K> {
    pub mode: GraphMode,
    /// 缺少该字段的旧快照按 `Reject` 处理
    #[serde(default)]
    pub policy: MissingVertexPolicy,
    pub vertices: Vec<Vertex<K>>,
    pub edges: Vec<Edge<K>>,
}

impl<K: VertexKey> Graph<K> {
    /// 导出快照，顶点与边保持插入顺序
    pub fn snapshot(&self) -> GraphSnapshot<K> {
        GraphSnapshot {
            mode: self.mode(),
            policy: self.policy(),
            vertices: self.vertices().cloned().collect(),
            edges: self.edges().cloned().collect(),
        }
    }

    /// 由快照重建图，沿用快照记录的缺失顶点策略
    pub fn from_snapshot(snapshot: GraphSnapshot<K>) -> Result<Self> {
        let mut graph = Graph::with_policy(snapshot.mode, snapshot.policy);
        for vertex in snapshot.vertices {
            let key = vertex.key().clone();
            graph.add_vertex_with(key, vertex.properties().clone());
        }
        for edge in snapshot.edges {
            let (u, v) = edge.endpoints();
            graph.add_edge_with(u.clone(), v.clone(), edge.weight(), edge.properties().clone())?;
        }
        Ok(graph)
    }
}

impl<K: Serialize> GraphSnapshot<K> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 序列化为字节
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}

impl<K: DeserializeOwned> GraphSnapshot<K> {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// 从字节反序列化
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
