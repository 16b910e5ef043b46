//! 最大流与最小割
//!
//! 实现 Edmonds-Karp 算法（基于 BFS 的 Ford-Fulkerson），边权重作为容量。
//! 无向边在两个方向上都提供该容量。

use super::topology::Topology;
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, VertexKey};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 残余容量低于该值视为饱和
const FLOW_EPSILON: f64 = 1e-12;

/// 最大流结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxFlow<K: VertexKey> {
    /// 最大流量值
    pub value: f64,
    /// 流量分配（边 -> 流量），只保留正流量，键的方向即流动方向
    #[serde(with = "flow_entries")]
    pub flow: IndexMap<(K, K), f64>,
    /// 残余网络中源点可达的顶点
    pub source_side: Vec<K>,
}

/// 以 `[[u, v], flow]` 列表序列化流量表，JSON 不支持元组作为对象键
mod flow_entries {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::hash::Hash;

    pub fn serialize<K, S>(flow: &IndexMap<(K, K), f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(flow.iter())
    }

    pub fn deserialize<'de, K, D>(deserializer: D) -> Result<IndexMap<(K, K), f64>, D::Error>
    where
        K: Deserialize<'de> + Hash + Eq,
        D: Deserializer<'de>,
    {
        let entries: Vec<((K, K), f64)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

/// 最小割结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinCut<K> {
    /// 割容量，等于最大流量
    pub value: f64,
    pub source_side: Vec<K>,
    pub sink_side: Vec<K>,
    /// 从源侧指向汇侧的割边
    pub cut_edges: Vec<(K, K)>,
}

#[derive(Debug, Clone)]
struct FlowArc {
    to: usize,
    capacity: f64,
    flow: f64,
}

/// 残余网络
///
/// 弧成对存放：编号 `e` 与 `e ^ 1` 互为反向弧。
#[derive(Debug, Clone)]
pub(crate) struct ResidualNetwork {
    arcs: Vec<FlowArc>,
    adj: Vec<Vec<usize>>,
}

impl ResidualNetwork {
    pub fn new(n: usize) -> Self {
        Self {
            arcs: Vec::new(),
            adj: vec![Vec::new(); n],
        }
    }

    fn push_pair(&mut self, u: usize, v: usize, forward: f64, backward: f64) -> usize {
        let id = self.arcs.len();
        self.arcs.push(FlowArc {
            to: v,
            capacity: forward,
            flow: 0.0,
        });
        self.arcs.push(FlowArc {
            to: u,
            capacity: backward,
            flow: 0.0,
        });
        self.adj[u].push(id);
        self.adj[v].push(id + 1);
        id
    }

    /// 添加有向弧，返回正向弧编号
    pub fn add_arc(&mut self, u: usize, v: usize, capacity: f64) -> usize {
        self.push_pair(u, v, capacity, 0.0)
    }

    /// 添加无向弧（两个方向容量相同）
    pub fn add_undirected(&mut self, u: usize, v: usize, capacity: f64) -> usize {
        self.push_pair(u, v, capacity, capacity)
    }

    fn residual(&self, arc: usize) -> f64 {
        self.arcs[arc].capacity - self.arcs[arc].flow
    }

    /// 弧上的净流量，负值表示反向流动
    pub fn flow_on(&self, arc: usize) -> f64 {
        self.arcs[arc].flow
    }

    /// 清零所有流量，以便复用网络
    pub fn reset(&mut self) {
        for arc in &mut self.arcs {
            arc.flow = 0.0;
        }
    }

    /// BFS 找增广路径，返回沿路径的弧编号
    fn augmenting_path(&self, source: usize, sink: usize) -> Option<Vec<usize>> {
        let mut parent_arc: Vec<Option<usize>> = vec![None; self.adj.len()];
        let mut visited = vec![false; self.adj.len()];
        let mut queue = VecDeque::new();

        visited[source] = true;
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            if u == sink {
                break;
            }
            for &arc in &self.adj[u] {
                let v = self.arcs[arc].to;
                if !visited[v] && self.residual(arc) > FLOW_EPSILON {
                    visited[v] = true;
                    parent_arc[v] = Some(arc);
                    queue.push_back(v);
                }
            }
        }

        if !visited[sink] {
            return None;
        }

        let mut path = Vec::new();
        let mut current = sink;
        while let Some(arc) = parent_arc[current] {
            path.push(arc);
            current = self.arcs[arc ^ 1].to;
        }
        path.reverse();
        Some(path)
    }

    /// 计算最大流，返回 (流量值, 增广次数)
    pub fn max_flow(&mut self, source: usize, sink: usize) -> (f64, usize) {
        let mut value = 0.0;
        let mut augmentations = 0;

        while let Some(path) = self.augmenting_path(source, sink) {
            let bottleneck = path
                .iter()
                .map(|&arc| self.residual(arc))
                .fold(f64::INFINITY, f64::min);
            for &arc in &path {
                self.arcs[arc].flow += bottleneck;
                self.arcs[arc ^ 1].flow -= bottleneck;
            }
            value += bottleneck;
            augmentations += 1;
        }

        (value, augmentations)
    }

    /// 残余网络中从 source 可达的顶点
    pub fn reachable_from(&self, source: usize) -> Vec<bool> {
        let mut visited = vec![false; self.adj.len()];
        let mut queue = VecDeque::new();
        visited[source] = true;
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            for &arc in &self.adj[u] {
                let v = self.arcs[arc].to;
                if !visited[v] && self.residual(arc) > FLOW_EPSILON {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }

        visited
    }
}

/// 一次求解的中间状态
struct Solved<'g, K: VertexKey> {
    topo: Topology<'g, K>,
    network: ResidualNetwork,
    /// 原图边及其正向弧
    edge_arcs: Vec<(&'g Edge<K>, usize)>,
    value: f64,
    source: usize,
}

/// Edmonds-Karp 最大流算法
pub struct EdmondsKarp<'g, K: VertexKey> {
    graph: &'g Graph<K>,
}

impl<'g, K: VertexKey> EdmondsKarp<'g, K> {
    /// 创建算法实例
    pub fn new(graph: &'g Graph<K>) -> Self {
        Self { graph }
    }

    fn solve(&self, source: &K, sink: &K) -> Result<Solved<'g, K>> {
        let topo = Topology::new(self.graph);
        let s = topo.index_of(source)?;
        let t = topo.index_of(sink)?;
        if s == t {
            return Err(Error::InvalidArgument(format!(
                "源点与汇点相同: {:?}",
                source
            )));
        }

        let mut network = ResidualNetwork::new(topo.len());
        let mut edge_arcs = Vec::with_capacity(self.graph.edge_count());
        for edge in self.graph.edges() {
            if edge.weight() < 0.0 {
                return Err(Error::InvalidWeight(format!(
                    "边 {} 的容量为负: {}",
                    edge.describe(),
                    edge.weight()
                )));
            }
            let u = topo.index_of(edge.source())?;
            let v = topo.index_of(edge.target())?;
            if u == v {
                continue;
            }
            let arc = if self.graph.is_directed() {
                network.add_arc(u, v, edge.weight())
            } else {
                network.add_undirected(u, v, edge.weight())
            };
            edge_arcs.push((edge, arc));
        }

        let (value, augmentations) = network.max_flow(s, t);
        tracing::debug!(value, augmentations, "最大流计算完成");

        Ok(Solved {
            topo,
            network,
            edge_arcs,
            value,
            source: s,
        })
    }

    /// 计算从 source 到 sink 的最大流
    pub fn max_flow(&self, source: &K, sink: &K) -> Result<MaxFlow<K>> {
        let solved = self.solve(source, sink)?;

        let mut flow = IndexMap::new();
        for &(edge, arc) in &solved.edge_arcs {
            let f = solved.network.flow_on(arc);
            let (u, v) = edge.endpoints();
            if f > FLOW_EPSILON {
                flow.insert((u.clone(), v.clone()), f);
            } else if f < -FLOW_EPSILON {
                flow.insert((v.clone(), u.clone()), -f);
            }
        }

        let reach = solved.network.reachable_from(solved.source);
        let source_side = (0..solved.topo.len())
            .filter(|&i| reach[i])
            .map(|i| solved.topo.key(i).clone())
            .collect();

        Ok(MaxFlow {
            value: solved.value,
            flow,
            source_side,
        })
    }

    /// 最小割：残余网络中源点可达集合与其余顶点的划分
    pub fn minimum_cut(&self, source: &K, sink: &K) -> Result<MinCut<K>> {
        let solved = self.solve(source, sink)?;
        let reach = solved.network.reachable_from(solved.source);
        let topo = &solved.topo;

        let mut source_side = Vec::new();
        let mut sink_side = Vec::new();
        for i in 0..topo.len() {
            let key = topo.key(i).clone();
            if reach[i] {
                source_side.push(key);
            } else {
                sink_side.push(key);
            }
        }

        let mut cut_edges = Vec::new();
        let mut value = 0.0;
        for &(edge, _) in &solved.edge_arcs {
            let (u, v) = edge.endpoints();
            let (iu, iv) = (topo.index_of(u)?, topo.index_of(v)?);
            let crossing = if reach[iu] && !reach[iv] {
                Some((u.clone(), v.clone()))
            } else if !self.graph.is_directed() && reach[iv] && !reach[iu] {
                Some((v.clone(), u.clone()))
            } else {
                None
            };
            if let Some(pair) = crossing {
                value += edge.weight();
                cut_edges.push(pair);
            }
        }

        Ok(MinCut {
            value,
            source_side,
            sink_side,
            cut_edges,
        })
    }
}
