//! 图数据结构
//!
//! 内存中的有向/无向图，维护顶点、边以及与边集合一致的邻接索引

use super::edge::{validate_weight, Edge, DEFAULT_WEIGHT};
use super::index::AdjacencyIndex;
use super::vertex::{Vertex, VertexKey};
use crate::error::{Error, Result};
use crate::types::{GraphMode, MissingVertexPolicy, Properties};
use indexmap::{Equivalent, IndexMap};

/// 以引用形式查找 `(K, K)` 键，避免克隆顶点标识
#[derive(Hash)]
struct PairRef<'a, K>(&'a K, &'a K);

impl<K: Eq> Equivalent<(K, K)> for PairRef<'_, K> {
    fn equivalent(&self, key: &(K, K)) -> bool {
        self.0 == &key.0 && self.1 == &key.1
    }
}

/// 图
#[derive(Debug, Clone)]
pub struct Graph<K: VertexKey> {
    /// 图模式
    mode: GraphMode,
    /// 缺失端点策略
    policy: MissingVertexPolicy,
    /// 顶点（按插入顺序）
    vertices: IndexMap<K, Vertex<K>>,
    /// 边，无向图只按插入方向保存一份
    edges: IndexMap<(K, K), Edge<K>>,
    /// 邻接索引
    index: AdjacencyIndex<K>,
}

impl<K: VertexKey> Graph<K> {
    /// 创建空图
    pub fn new(mode: GraphMode) -> Self {
        Self::with_policy(mode, MissingVertexPolicy::default())
    }

    /// 创建空图并指定缺失端点策略
    pub fn with_policy(mode: GraphMode, policy: MissingVertexPolicy) -> Self {
        Self {
            mode,
            policy,
            vertices: IndexMap::new(),
            edges: IndexMap::new(),
            index: AdjacencyIndex::new(mode),
        }
    }

    pub fn directed() -> Self {
        Self::new(GraphMode::Directed)
    }

    pub fn undirected() -> Self {
        Self::new(GraphMode::Undirected)
    }

    /// 由初始顶点列表和 `(u, v, weight)` 边列表构造
    ///
    /// 边的端点必须出现在顶点列表中，否则返回 `VertexNotFound`。
    pub fn from_parts<V, E>(mode: GraphMode, vertices: V, edges: E) -> Result<Self>
    where
        V: IntoIterator<Item = K>,
        E: IntoIterator<Item = (K, K, f64)>,
    {
        let mut graph = Self::new(mode);
        for key in vertices {
            graph.add_vertex(key);
        }
        for (u, v, weight) in edges {
            graph.add_edge(u, v, weight)?;
        }
        Ok(graph)
    }

    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    pub fn policy(&self) -> MissingVertexPolicy {
        self.policy
    }

    pub fn is_directed(&self) -> bool {
        self.mode.is_directed()
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点，已存在时保持原样并返回 false
    pub fn add_vertex(&mut self, key: K) -> bool {
        self.add_vertex_with(key, Properties::new())
    }

    /// 添加带属性的顶点，已存在时合并属性并返回 false
    pub fn add_vertex_with(&mut self, key: K, properties: Properties) -> bool {
        if let Some(vertex) = self.vertices.get_mut(&key) {
            vertex.merge_properties(properties);
            return false;
        }
        self.index.add_vertex(key.clone());
        self.vertices
            .insert(key.clone(), Vertex::with_properties(key, properties));
        true
    }

    /// 获取顶点
    pub fn vertex(&self, key: &K) -> Option<&Vertex<K>> {
        self.vertices.get(key)
    }

    pub fn vertex_mut(&mut self, key: &K) -> Option<&mut Vertex<K>> {
        self.vertices.get_mut(key)
    }

    pub fn has_vertex(&self, key: &K) -> bool {
        self.vertices.contains_key(key)
    }

    /// 删除顶点，同时删除所有关联边
    pub fn remove_vertex(&mut self, key: &K) -> Result<Vertex<K>> {
        if !self.has_vertex(key) {
            return Err(Error::vertex_not_found(key));
        }

        // 只查该顶点的邻居；有向自环同时出现在后继与前驱中，只取一次
        let mut incident: Vec<(K, K)> = Vec::new();
        if let Some(succs) = self.index.successors(key) {
            incident.extend(succs.iter().map(|w| (key.clone(), w.clone())));
        }
        if self.is_directed() {
            if let Some(preds) = self.index.predecessors(key) {
                incident.extend(
                    preds
                        .iter()
                        .filter(|w| *w != key)
                        .map(|w| (w.clone(), key.clone())),
                );
            }
        }
        let mut removed = 0;
        for (u, v) in &incident {
            if let Some(slot) = self.edge_slot(u, v) {
                self.edges.shift_remove_index(slot);
                removed += 1;
            }
        }
        tracing::trace!(vertex = ?key, removed_edges = removed, "级联删除关联边");

        self.index.remove_vertex(key);
        self.vertices
            .shift_remove(key)
            .ok_or_else(|| Error::vertex_not_found(key))
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 按插入顺序遍历顶点
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<K>> {
        self.vertices.values()
    }

    /// 按插入顺序遍历顶点标识
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.vertices.keys()
    }

    // ==================== 边操作 ====================

    /// 添加边
    ///
    /// 边已存在时更新权重。端点缺失时按 [`MissingVertexPolicy`] 处理。
    pub fn add_edge(&mut self, u: K, v: K, weight: f64) -> Result<()> {
        self.add_edge_with(u, v, weight, Properties::new())
    }

    /// 添加带属性的边，边已存在时更新权重并合并属性
    pub fn add_edge_with(&mut self, u: K, v: K, weight: f64, properties: Properties) -> Result<()> {
        validate_weight(weight)?;
        if self.policy == MissingVertexPolicy::Reject {
            for key in [&u, &v] {
                if !self.has_vertex(key) {
                    return Err(Error::vertex_not_found(key));
                }
            }
        }

        if let Some(edge) = self.edge_mut(&u, &v) {
            edge.set_weight(weight)?;
            edge.merge_properties(properties);
            return Ok(());
        }

        self.add_vertex(u.clone());
        self.add_vertex(v.clone());
        self.index.add_edge(&u, &v);
        self.edges.insert(
            (u.clone(), v.clone()),
            Edge::with_properties(u, v, weight, properties),
        );
        Ok(())
    }

    /// 添加权重为 1.0 的边
    pub fn add_unweighted_edge(&mut self, u: K, v: K) -> Result<()> {
        self.add_edge(u, v, DEFAULT_WEIGHT)
    }

    /// 查找边的存储位置（无向图两个方向都查）
    fn edge_slot(&self, u: &K, v: &K) -> Option<usize> {
        self.edges.get_index_of(&PairRef(u, v)).or_else(|| {
            if self.is_directed() {
                None
            } else {
                self.edges.get_index_of(&PairRef(v, u))
            }
        })
    }

    /// 获取边
    pub fn edge(&self, u: &K, v: &K) -> Option<&Edge<K>> {
        let slot = self.edge_slot(u, v)?;
        self.edges.get_index(slot).map(|(_, e)| e)
    }

    pub fn edge_mut(&mut self, u: &K, v: &K) -> Option<&mut Edge<K>> {
        let slot = self.edge_slot(u, v)?;
        self.edges.get_index_mut(slot).map(|(_, e)| e)
    }

    pub fn has_edge(&self, u: &K, v: &K) -> bool {
        self.index.contains_edge(u, v)
    }

    /// 删除边
    pub fn remove_edge(&mut self, u: &K, v: &K) -> Result<Edge<K>> {
        for key in [u, v] {
            if !self.has_vertex(key) {
                return Err(Error::vertex_not_found(key));
            }
        }
        let slot = self
            .edge_slot(u, v)
            .ok_or_else(|| Error::EdgeNotFound(format!("({:?}, {:?})", u, v)))?;
        let (_, edge) = self
            .edges
            .shift_remove_index(slot)
            .ok_or_else(|| Error::EdgeNotFound(format!("({:?}, {:?})", u, v)))?;
        self.index.remove_edge(edge.source(), edge.target());
        Ok(edge)
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 按插入顺序遍历边
    pub fn edges(&self) -> impl Iterator<Item = &Edge<K>> {
        self.edges.values()
    }

    /// 是否存在权重不为 1.0 的边
    pub fn is_weighted(&self) -> bool {
        self.edges().any(|e| e.weight() != DEFAULT_WEIGHT)
    }

    pub fn has_negative_weight(&self) -> bool {
        self.edges().any(|e| e.weight() < 0.0)
    }

    /// 所有边的权重之和
    pub fn total_weight(&self) -> f64 {
        self.edges().map(|e| e.weight()).sum()
    }

    // ==================== 邻居查询 ====================

    /// 获取邻居（有向图中为后继）
    pub fn neighbors(&self, key: &K) -> Result<Vec<&K>> {
        self.successors(key)
    }

    /// 获取后继
    pub fn successors(&self, key: &K) -> Result<Vec<&K>> {
        self.index
            .successors(key)
            .map(|set| set.iter().collect())
            .ok_or_else(|| Error::vertex_not_found(key))
    }

    /// 获取前驱
    pub fn predecessors(&self, key: &K) -> Result<Vec<&K>> {
        self.index
            .predecessors(key)
            .map(|set| set.iter().collect())
            .ok_or_else(|| Error::vertex_not_found(key))
    }

    /// 获取度数
    pub fn degree(&self, key: &K) -> Result<usize> {
        self.ensure_vertex(key)?;
        Ok(self.index.degree(key))
    }

    /// 获取出度
    pub fn out_degree(&self, key: &K) -> Result<usize> {
        self.ensure_vertex(key)?;
        Ok(self.index.out_degree(key))
    }

    /// 获取入度
    pub fn in_degree(&self, key: &K) -> Result<usize> {
        self.ensure_vertex(key)?;
        Ok(self.index.in_degree(key))
    }

    pub(crate) fn ensure_vertex(&self, key: &K) -> Result<()> {
        if self.has_vertex(key) {
            Ok(())
        } else {
            Err(Error::vertex_not_found(key))
        }
    }

    /// 获取邻接索引引用
    pub fn adjacency(&self) -> &AdjacencyIndex<K> {
        &self.index
    }

    // ==================== 子图 ====================

    /// 由给定顶点集合导出的子图，保留顶点与边的属性
    pub fn subgraph<'a, I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut sub = Self::with_policy(self.mode, self.policy);
        for key in keys {
            if let Some(vertex) = self.vertex(key) {
                sub.add_vertex_with(key.clone(), vertex.properties().clone());
            }
        }
        for ((u, v), edge) in &self.edges {
            if sub.has_vertex(u) && sub.has_vertex(v) {
                sub.index.add_edge(u, v);
                sub.edges.insert((u.clone(), v.clone()), edge.clone());
            }
        }
        sub
    }
}

impl<K: VertexKey> PartialEq for Graph<K> {
    /// 模式、顶点集合（含属性）与边集合（含权重）一致即视为相等
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode
            && self.vertex_count() == other.vertex_count()
            && self.edge_count() == other.edge_count()
            && self
                .vertices()
                .all(|v| other.vertex(v.key()) == Some(v))
            && self.edges().all(|e| {
                other
                    .edge(e.source(), e.target())
                    .map(|o| o.weight() == e.weight() && o.properties() == e.properties())
                    .unwrap_or(false)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample_graph() -> Graph<&'static str> {
        Graph::from_parts(
            GraphMode::Undirected,
            ["A", "B", "C", "D", "E"],
            [
                ("A", "B", 1.0),
                ("A", "C", 1.0),
                ("B", "D", 1.0),
                ("C", "D", 1.0),
                ("D", "E", 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_graph_basic() {
        let graph = sample_graph();

        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(graph.edge_count(), 5);
        assert!(graph.has_edge(&"A", &"B"));
        assert!(graph.has_edge(&"B", &"A"));
        assert!(!graph.has_edge(&"A", &"E"));
        assert_eq!(graph.neighbors(&"D").unwrap(), vec![&"B", &"C", &"E"]);
        assert_eq!(graph.degree(&"D").unwrap(), 3);
        assert!(!graph.is_weighted());
    }

    #[test]
    fn test_graph_degrees() {
        let mut graph = Graph::directed();
        for v in 1..=3u32 {
            graph.add_vertex(v);
        }
        graph.add_edge(1, 2, 1.0).unwrap();
        graph.add_edge(1, 3, 1.0).unwrap();
        graph.add_edge(2, 3, 1.0).unwrap();

        assert_eq!(graph.out_degree(&1).unwrap(), 2);
        assert_eq!(graph.in_degree(&3).unwrap(), 2);
        assert_eq!(graph.degree(&2).unwrap(), 2);
        assert_eq!(graph.predecessors(&3).unwrap(), vec![&1, &2]);
        assert!(!graph.has_edge(&2, &1));
    }

    #[test]
    fn test_missing_vertex_rejected() {
        let mut graph = Graph::undirected();
        graph.add_vertex("A");

        let err = graph.add_edge("A", "Z", 1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        // 失败时不产生部分修改
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.degree(&"A").unwrap(), 0);
    }

    #[test]
    fn test_missing_vertex_auto_insert() {
        let mut graph = Graph::with_policy(GraphMode::Directed, MissingVertexPolicy::AutoInsert);
        graph.add_edge("x", "y", 2.0).unwrap();
        assert_eq!(graph.vertex_count(), 2);
        assert!(graph.has_edge(&"x", &"y"));
        assert!(graph.is_weighted());
    }

    #[test]
    fn test_duplicate_edge_updates_weight() {
        let mut graph = sample_graph();
        graph.add_edge("B", "A", 4.0).unwrap();

        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.edge(&"A", &"B").unwrap().weight(), 4.0);
        assert_eq!(graph.neighbors(&"A").unwrap(), vec![&"B", &"C"]);
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let mut graph = sample_graph();
        let err = graph.add_edge("A", "E", f64::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidWeight);
        assert!(!graph.has_edge(&"A", &"E"));
    }

    #[test]
    fn test_remove_vertex_cascades() {
        let mut graph = sample_graph();
        let removed = graph.remove_vertex(&"D").unwrap();

        assert_eq!(removed.key(), &"D");
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree(&"E").unwrap(), 0);
        assert_eq!(graph.neighbors(&"B").unwrap(), vec![&"A"]);

        let err = graph.remove_vertex(&"D").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_vertex_reversed_and_self_loop() {
        let mut graph = Graph::undirected();
        for v in 1..=4u32 {
            graph.add_vertex(v);
        }
        // (3, 2) 按反向存储，删除 2 时仍须找到
        graph.add_edge(3, 2, 1.0).unwrap();
        graph.add_edge(2, 2, 1.0).unwrap();
        graph.add_edge(2, 4, 1.0).unwrap();
        graph.add_edge(1, 4, 1.0).unwrap();

        graph.remove_vertex(&2).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edge(&1, &4).is_some());
        assert_eq!(graph.degree(&3).unwrap(), 0);

        let mut directed = Graph::directed();
        for v in 1..=3u32 {
            directed.add_vertex(v);
        }
        directed.add_edge(1, 2, 1.0).unwrap();
        directed.add_edge(2, 2, 1.0).unwrap();
        directed.add_edge(2, 3, 1.0).unwrap();
        directed.add_edge(3, 1, 1.0).unwrap();

        directed.remove_vertex(&2).unwrap();
        assert_eq!(directed.edge_count(), 1);
        assert!(directed.has_edge(&3, &1));
        assert_eq!(directed.degree(&1).unwrap(), 1);
    }

    #[test]
    fn test_unweighted_edges_and_total_weight() {
        let mut graph = Graph::undirected();
        for v in ["x", "y", "z"] {
            graph.add_vertex(v);
        }
        graph.add_unweighted_edge("x", "y").unwrap();
        graph.add_unweighted_edge("y", "z").unwrap();
        assert_eq!(graph.edge(&"y", &"x").unwrap().weight(), DEFAULT_WEIGHT);
        assert!(!graph.is_weighted());
        assert_eq!(graph.total_weight(), 2.0);

        graph.add_edge("x", "z", 2.5).unwrap();
        assert!(graph.is_weighted());
        assert_eq!(graph.total_weight(), 4.5);

        let err = graph.add_unweighted_edge("x", "w").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = sample_graph();
        let edge = graph.remove_edge(&"D", &"B").unwrap();
        assert_eq!(edge.endpoints(), (&"B", &"D"));
        assert!(!graph.has_edge(&"B", &"D"));
        assert_eq!(graph.degree(&"D").unwrap(), 2);

        let err = graph.remove_edge(&"B", &"D").unwrap_err();
        assert!(matches!(err, Error::EdgeNotFound(_)));
        let err = graph.remove_edge(&"B", &"Q").unwrap_err();
        assert!(matches!(err, Error::VertexNotFound(_)));
    }

    #[test]
    fn test_directed_edge_orientation() {
        let mut graph = Graph::directed();
        graph.add_vertex("a");
        graph.add_vertex("b");
        graph.add_edge("a", "b", 1.0).unwrap();

        assert!(graph.edge(&"b", &"a").is_none());
        assert!(graph.remove_edge(&"b", &"a").is_err());
        graph.add_edge("b", "a", 3.0).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge(&"b", &"a").unwrap().weight(), 3.0);
    }

    #[test]
    fn test_subgraph() {
        let graph = sample_graph();
        let sub = graph.subgraph(&["A", "B", "D"]);

        assert_eq!(sub.vertex_count(), 3);
        assert_eq!(sub.edge_count(), 2);
        assert!(sub.has_edge(&"B", &"D"));
        assert!(!sub.has_vertex(&"C"));
    }

    #[test]
    fn test_vertex_properties_merge() {
        let mut graph: Graph<String> = Graph::undirected();
        let mut props = Properties::new();
        props.insert("team".to_string(), "red".into());
        assert!(graph.add_vertex_with("n1".to_string(), props));
        assert!(!graph.add_vertex("n1".to_string()));

        let v = graph.vertex(&"n1".to_string()).unwrap();
        assert_eq!(v.property("team").and_then(|p| p.as_string()), Some("red"));

        graph
            .vertex_mut(&"n1".to_string())
            .unwrap()
            .set_property("score", 0.5);
        assert_eq!(
            graph
                .vertex(&"n1".to_string())
                .unwrap()
                .property("score")
                .and_then(|p| p.as_float()),
            Some(0.5)
        );
    }

    #[test]
    fn test_graph_equality() {
        let a = sample_graph();
        let mut b = sample_graph();
        assert_eq!(a, b);
        b.add_edge("A", "B", 2.0).unwrap();
        assert_ne!(a, b);
    }
}
