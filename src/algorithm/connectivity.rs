//! 连通性分析
//!
//! 连通分量、强/弱连通分量、割点以及顶点/边连通度。
//! 分量内部按顶点标识排序，分量之间按最小成员排序。

use super::max_flow::ResidualNetwork;
use super::topology::Topology;
use super::traversal::bfs;
use super::union_find::UnionFind;
use crate::error::{Error, Result};
use crate::graph::{Graph, VertexKey};
use crate::types::Direction;
use indexmap::IndexMap;
use rayon::prelude::*;

/// 连通性分析器
pub struct Connectivity<'g, K: VertexKey> {
    graph: &'g Graph<K>,
}

impl<'g, K: VertexKey> Connectivity<'g, K> {
    pub fn new(graph: &'g Graph<K>) -> Self {
        Self { graph }
    }

    fn require_undirected(&self, operation: &str) -> Result<()> {
        if self.graph.is_directed() {
            return Err(Error::UnsupportedOperation(format!(
                "{} 仅适用于无向图",
                operation
            )));
        }
        Ok(())
    }

    fn require_directed(&self, operation: &str) -> Result<()> {
        if !self.graph.is_directed() {
            return Err(Error::UnsupportedOperation(format!(
                "{} 仅适用于有向图",
                operation
            )));
        }
        Ok(())
    }

    fn require_vertices(&self, operation: &str) -> Result<()> {
        if self.graph.vertex_count() == 0 {
            return Err(Error::DegenerateGraph(format!("{} 对空图无定义", operation)));
        }
        Ok(())
    }

    // ==================== 连通分量 ====================

    /// 无向图的连通分量
    pub fn connected_components(&self) -> Result<Vec<Vec<K>>> {
        self.require_undirected("connected_components")?;
        Ok(self.union_components())
    }

    pub fn number_connected_components(&self) -> Result<usize> {
        Ok(self.connected_components()?.len())
    }

    /// 每个连通分量导出的子图
    pub fn connected_component_subgraphs(&self) -> Result<Vec<Graph<K>>> {
        Ok(self
            .connected_components()?
            .iter()
            .map(|component| self.graph.subgraph(component))
            .collect())
    }

    /// 无向图是否连通
    pub fn is_connected(&self) -> Result<bool> {
        self.require_undirected("is_connected")?;
        self.require_vertices("is_connected")?;
        let topo = Topology::new(self.graph);
        Ok(bfs(&topo, 0, Direction::Outgoing).order.len() == topo.len())
    }

    /// 有向图的弱连通分量
    pub fn weakly_connected_components(&self) -> Result<Vec<Vec<K>>> {
        self.require_directed("weakly_connected_components")?;
        Ok(self.union_components())
    }

    pub fn is_weakly_connected(&self) -> Result<bool> {
        self.require_directed("is_weakly_connected")?;
        self.require_vertices("is_weakly_connected")?;
        let topo = Topology::new(self.graph);
        Ok(bfs(&topo, 0, Direction::Both).order.len() == topo.len())
    }

    /// 有向图的强连通分量（迭代式 Tarjan）
    pub fn strongly_connected_components(&self) -> Result<Vec<Vec<K>>> {
        self.require_directed("strongly_connected_components")?;
        let topo = Topology::new(self.graph);
        let groups = tarjan_scc(&topo);
        tracing::debug!(components = groups.len(), "强连通分量计算完成");
        Ok(sorted_partition(&topo, groups))
    }

    /// 从任一顶点出发正向与反向都能到达全部顶点即为强连通
    pub fn is_strongly_connected(&self) -> Result<bool> {
        self.require_directed("is_strongly_connected")?;
        self.require_vertices("is_strongly_connected")?;
        let topo = Topology::new(self.graph);
        let n = topo.len();
        Ok(bfs(&topo, 0, Direction::Outgoing).order.len() == n
            && bfs(&topo, 0, Direction::Incoming).order.len() == n)
    }

    fn union_components(&self) -> Vec<Vec<K>> {
        let topo = Topology::new(self.graph);
        let mut uf = UnionFind::new(topo.len());
        for u in 0..topo.len() {
            for &(v, _) in topo.successors(u) {
                uf.union(u, v);
            }
        }
        tracing::debug!(components = uf.components(), "连通分量计算完成");
        sorted_partition(&topo, uf.groups())
    }

    // ==================== 双连通性 ====================

    /// 割点：删除后使连通分量数增加的顶点，按顶点标识排序
    pub fn articulation_points(&self) -> Result<Vec<K>> {
        self.require_undirected("articulation_points")?;
        let topo = Topology::new(self.graph);
        let mut points: Vec<K> = cut_vertices(&topo)
            .into_iter()
            .enumerate()
            .filter(|&(_, is_cut)| is_cut)
            .map(|(i, _)| topo.key(i).clone())
            .collect();
        points.sort();
        Ok(points)
    }

    /// 至少两个顶点、连通且没有割点
    pub fn is_biconnected(&self) -> Result<bool> {
        self.require_undirected("is_biconnected")?;
        if self.graph.vertex_count() < 2 {
            return Ok(false);
        }
        Ok(self.is_connected()? && self.articulation_points()?.is_empty())
    }

    /// 所有顶点度数相同；有向图要求入度一致且出度一致
    pub fn is_regular(&self) -> Result<bool> {
        self.require_vertices("is_regular")?;
        let index = self.graph.adjacency();
        let uniform = |degree: &dyn Fn(&K) -> usize| {
            let mut degrees = self.graph.keys().map(degree);
            match degrees.next() {
                Some(first) => degrees.all(|d| d == first),
                None => true,
            }
        };

        if self.graph.is_directed() {
            Ok(uniform(&|k| index.in_degree(k)) && uniform(&|k| index.out_degree(k)))
        } else {
            Ok(uniform(&|k| index.degree(k)))
        }
    }

    // ==================== 连通度 ====================

    /// 每个有序顶点对之间内部顶点不相交路径的数量
    ///
    /// 每个顶点拆分为入点与出点，中间连一条单位容量弧。
    pub fn all_pairs_node_connectivity(&self) -> Result<IndexMap<K, IndexMap<K, usize>>> {
        let topo = Topology::new(self.graph);
        let n = topo.len();
        let (inner, outer) = (|i: usize| 2 * i, |i: usize| 2 * i + 1);

        let mut network = ResidualNetwork::new(2 * n);
        for u in 0..n {
            network.add_arc(inner(u), outer(u), 1.0);
        }
        for u in 0..n {
            for &(v, _) in topo.successors(u) {
                if u == v || (!topo.is_directed() && v < u) {
                    continue;
                }
                network.add_arc(outer(u), inner(v), 1.0);
                if !topo.is_directed() {
                    network.add_arc(outer(v), inner(u), 1.0);
                }
            }
        }

        Ok(self.pairwise(&topo, &network, |s, t| (outer(s), inner(t))))
    }

    /// 每个有序顶点对之间边不相交路径的数量
    pub fn all_pairs_edge_connectivity(&self) -> Result<IndexMap<K, IndexMap<K, usize>>> {
        let topo = Topology::new(self.graph);
        let n = topo.len();

        let mut network = ResidualNetwork::new(n);
        for u in 0..n {
            for &(v, _) in topo.successors(u) {
                if u == v {
                    continue;
                }
                if topo.is_directed() {
                    network.add_arc(u, v, 1.0);
                } else if u < v {
                    network.add_undirected(u, v, 1.0);
                }
            }
        }

        Ok(self.pairwise(&topo, &network, |s, t| (s, t)))
    }

    /// 对每个有序顶点对在网络副本上求单位容量最大流
    fn pairwise<F>(
        &self,
        topo: &Topology<'g, K>,
        network: &ResidualNetwork,
        terminals: F,
    ) -> IndexMap<K, IndexMap<K, usize>>
    where
        F: Fn(usize, usize) -> (usize, usize) + Sync,
    {
        let n = topo.len();
        let rows: Vec<IndexMap<K, usize>> = (0..n)
            .into_par_iter()
            .map(|s| {
                let mut local = network.clone();
                (0..n)
                    .filter(|&t| t != s)
                    .map(|t| {
                        local.reset();
                        let (source, sink) = terminals(s, t);
                        let (value, _) = local.max_flow(source, sink);
                        (topo.key(t).clone(), value.round() as usize)
                    })
                    .collect()
            })
            .collect();
        tracing::debug!(vertices = n, "全顶点对连通度计算完成");
        topo.keys().iter().map(|&k| k.clone()).zip(rows).collect()
    }
}

fn sorted_partition<K: VertexKey>(topo: &Topology<'_, K>, groups: Vec<Vec<usize>>) -> Vec<Vec<K>> {
    let mut components: Vec<Vec<K>> = groups
        .into_iter()
        .map(|group| {
            let mut keys: Vec<K> = group.into_iter().map(|i| topo.key(i).clone()).collect();
            keys.sort();
            keys
        })
        .collect();
    components.sort();
    components
}

fn tarjan_scc<K: VertexKey>(topo: &Topology<'_, K>) -> Vec<Vec<usize>> {
    const UNVISITED: usize = usize::MAX;
    let n = topo.len();
    let mut index = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut counter = 0usize;
    let mut components = Vec::new();

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }
        // (顶点, 下一个待检查的后继位置)
        let mut calls: Vec<(usize, usize)> = vec![(root, 0)];
        index[root] = counter;
        low[root] = counter;
        counter += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(&(u, next)) = calls.last() {
            if let Some(&(v, _)) = topo.successors(u).get(next) {
                if let Some(top) = calls.last_mut() {
                    top.1 += 1;
                }
                if index[v] == UNVISITED {
                    index[v] = counter;
                    low[v] = counter;
                    counter += 1;
                    stack.push(v);
                    on_stack[v] = true;
                    calls.push((v, 0));
                } else if on_stack[v] {
                    low[u] = low[u].min(index[v]);
                }
                continue;
            }

            calls.pop();
            if let Some(&(parent, _)) = calls.last() {
                low[parent] = low[parent].min(low[u]);
            }
            if low[u] == index[u] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == u {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }

    components
}

/// 迭代式 DFS 计算 low-link，返回每个顶点是否为割点
fn cut_vertices<K: VertexKey>(topo: &Topology<'_, K>) -> Vec<bool> {
    const UNVISITED: usize = usize::MAX;
    let n = topo.len();
    let mut disc = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut is_cut = vec![false; n];
    let mut timer = 0usize;

    for root in 0..n {
        if disc[root] != UNVISITED {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;
        let mut root_children = 0usize;
        let mut calls: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(&(u, next)) = calls.last() {
            if let Some(&(v, _)) = topo.successors(u).get(next) {
                if let Some(top) = calls.last_mut() {
                    top.1 += 1;
                }
                if v == u {
                    continue;
                }
                if disc[v] == UNVISITED {
                    parent[v] = Some(u);
                    disc[v] = timer;
                    low[v] = timer;
                    timer += 1;
                    if u == root {
                        root_children += 1;
                    }
                    calls.push((v, 0));
                } else if parent[u] != Some(v) {
                    low[u] = low[u].min(disc[v]);
                }
                continue;
            }

            calls.pop();
            if let Some(p) = parent[u] {
                low[p] = low[p].min(low[u]);
                if p != root && low[u] >= disc[p] {
                    is_cut[p] = true;
                }
            }
        }

        if root_children > 1 {
            is_cut[root] = true;
        }
    }

    is_cut
}
