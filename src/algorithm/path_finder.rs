//! 最短路径查询
//!
//! 无权图使用 BFS（保证边数最少），带权图使用 Dijkstra（要求权重非负）。

use super::topology::Topology;
use super::traversal::{bfs, dfs_preorder, search, SearchTree};
use crate::error::{Error, Result};
use crate::graph::{Graph, VertexKey};
use crate::types::{Direction, PathMetric};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// 路径结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult<K> {
    /// 路径上的顶点序列（含起点与终点）
    pub vertices: Vec<K>,
    /// 边数
    pub hops: usize,
    /// 路径上边权重之和
    pub cost: f64,
}

/// 路径查找器
pub struct PathFinder<'g, K: VertexKey> {
    graph: &'g Graph<K>,
    metric: PathMetric,
    /// 遍历查询（可达性、BFS/DFS 顺序）沿边的方向
    direction: Direction,
}

impl<'g, K: VertexKey> PathFinder<'g, K> {
    /// 创建路径查找器，默认 [`PathMetric::Auto`]
    pub fn new(graph: &'g Graph<K>) -> Self {
        Self {
            graph,
            metric: PathMetric::Auto,
            direction: Direction::Outgoing,
        }
    }

    pub fn with_metric(mut self, metric: PathMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// 实际使用的度量：`Auto` 在图带权时解析为 `Weight`
    pub fn effective_metric(&self) -> PathMetric {
        resolve_metric(self.metric, self.graph)
    }

    fn prepare(&self) -> Result<(Topology<'g, K>, PathMetric)> {
        let metric = self.effective_metric();
        let topo = Topology::new(self.graph);
        if metric == PathMetric::Weight && topo.has_negative_weight() {
            return Err(Error::InvalidWeight(
                "Dijkstra 最短路径要求边权重非负".to_string(),
            ));
        }
        Ok((topo, metric))
    }

    /// 最短路径
    pub fn shortest_path(&self, source: &K, target: &K) -> Result<PathResult<K>> {
        let (topo, metric) = self.prepare()?;
        let s = topo.index_of(source)?;
        let t = topo.index_of(target)?;

        let tree = search(&topo, s, metric, Direction::Outgoing);
        let path = tree
            .path_to(t)
            .ok_or_else(|| Error::disconnected(source, target))?;
        Ok(self.path_result(&topo, &path))
    }

    /// 最短路径长度：BFS 下为边数，Dijkstra 下为权重之和
    pub fn shortest_path_length(&self, source: &K, target: &K) -> Result<f64> {
        let (topo, metric) = self.prepare()?;
        let s = topo.index_of(source)?;
        let t = topo.index_of(target)?;

        search(&topo, s, metric, Direction::Outgoing).dist[t]
            .ok_or_else(|| Error::disconnected(source, target))
    }

    /// 单源最短路径，按顶点被确定的顺序排列
    pub fn single_source_shortest_paths(&self, source: &K) -> Result<IndexMap<K, Vec<K>>> {
        let (topo, metric) = self.prepare()?;
        let s = topo.index_of(source)?;
        let tree = search(&topo, s, metric, Direction::Outgoing);
        Ok(paths_from(&topo, &tree))
    }

    /// 单源最短路径长度
    pub fn single_source_shortest_path_lengths(&self, source: &K) -> Result<IndexMap<K, f64>> {
        let (topo, metric) = self.prepare()?;
        let s = topo.index_of(source)?;
        let tree = search(&topo, s, metric, Direction::Outgoing);
        Ok(lengths_from(&topo, &tree))
    }

    /// 所有顶点对的最短路径，不可达的顶点对不出现在结果中
    pub fn all_pairs_shortest_paths(&self) -> Result<IndexMap<K, IndexMap<K, Vec<K>>>> {
        let (topo, metric) = self.prepare()?;
        let rows: Vec<IndexMap<K, Vec<K>>> = (0..topo.len())
            .into_par_iter()
            .map(|s| paths_from(&topo, &search(&topo, s, metric, Direction::Outgoing)))
            .collect();
        tracing::debug!(sources = rows.len(), ?metric, "全源最短路径完成");
        Ok(topo.keys().iter().map(|&k| k.clone()).zip(rows).collect())
    }

    /// 所有顶点对的最短路径长度
    pub fn all_pairs_shortest_path_lengths(&self) -> Result<IndexMap<K, IndexMap<K, f64>>> {
        let (topo, metric) = self.prepare()?;
        let rows: Vec<IndexMap<K, f64>> = (0..topo.len())
            .into_par_iter()
            .map(|s| lengths_from(&topo, &search(&topo, s, metric, Direction::Outgoing)))
            .collect();
        Ok(topo.keys().iter().map(|&k| k.clone()).zip(rows).collect())
    }

    /// 判断两点是否可达
    pub fn has_path(&self, source: &K, target: &K) -> Result<bool> {
        let topo = Topology::new(self.graph);
        let s = topo.index_of(source)?;
        let t = topo.index_of(target)?;
        Ok(bfs(&topo, s, self.direction).reached(t))
    }

    /// 广度优先遍历顺序
    pub fn breadth_first(&self, source: &K) -> Result<Vec<K>> {
        let topo = Topology::new(self.graph);
        let s = topo.index_of(source)?;
        let tree = bfs(&topo, s, self.direction);
        Ok(tree.order.iter().map(|&i| topo.key(i).clone()).collect())
    }

    /// 深度优先先序遍历顺序
    pub fn depth_first(&self, source: &K) -> Result<Vec<K>> {
        let topo = Topology::new(self.graph);
        let s = topo.index_of(source)?;
        Ok(dfs_preorder(&topo, s, self.direction)
            .into_iter()
            .map(|i| topo.key(i).clone())
            .collect())
    }

    fn path_result(&self, topo: &Topology<'g, K>, path: &[usize]) -> PathResult<K> {
        let vertices: Vec<K> = path.iter().map(|&i| topo.key(i).clone()).collect();
        let cost = vertices
            .windows(2)
            .filter_map(|pair| self.graph.edge(&pair[0], &pair[1]))
            .map(|e| e.weight())
            .sum();
        PathResult {
            hops: vertices.len().saturating_sub(1),
            vertices,
            cost,
        }
    }
}

pub(crate) fn resolve_metric<K: VertexKey>(metric: PathMetric, graph: &Graph<K>) -> PathMetric {
    match metric {
        PathMetric::Auto if graph.is_weighted() => PathMetric::Weight,
        PathMetric::Auto => PathMetric::Hops,
        other => other,
    }
}

fn paths_from<K: VertexKey>(topo: &Topology<'_, K>, tree: &SearchTree) -> IndexMap<K, Vec<K>> {
    tree.order
        .iter()
        .filter_map(|&v| {
            let path = tree.path_to(v)?;
            let keys = path.into_iter().map(|i| topo.key(i).clone()).collect();
            Some((topo.key(v).clone(), keys))
        })
        .collect()
}

fn lengths_from<K: VertexKey>(topo: &Topology<'_, K>, tree: &SearchTree) -> IndexMap<K, f64> {
    tree.order
        .iter()
        .filter_map(|&v| tree.dist[v].map(|d| (topo.key(v).clone(), d)))
        .collect()
}
