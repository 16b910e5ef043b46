//! 中心性分析
//!
//! 度中心性、接近中心性、介数中心性（Brandes）、特征向量中心性与 PageRank。
//! 所有结果按顶点插入顺序返回。

use super::path_finder::resolve_metric;
use super::topology::Topology;
use super::traversal::{search, Distance};
use crate::config::{AnalysisConfig, PowerIterationConfig};
use crate::error::{Error, Result};
use crate::graph::{Graph, VertexKey};
use crate::types::{Direction, PathMetric};
use indexmap::IndexMap;
use priority_queue::PriorityQueue;
use rayon::prelude::*;
use smallvec::SmallVec;
use std::cmp::Reverse;
use std::collections::VecDeque;

/// Brandes 前驱列表，绝大多数顶点只有少量最短路径前驱
type Predecessors = SmallVec<[usize; 4]>;

/// 中心性计算器
pub struct Centrality<'g, K: VertexKey> {
    graph: &'g Graph<K>,
    config: AnalysisConfig,
}

impl<'g, K: VertexKey> Centrality<'g, K> {
    /// 使用默认配置创建
    pub fn new(graph: &'g Graph<K>) -> Self {
        Self {
            graph,
            config: AnalysisConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    // ==================== 度中心性 ====================

    /// 度数除以 n-1；有向图使用入度与出度之和
    pub fn degree_centrality(&self) -> Result<IndexMap<K, f64>> {
        let index = self.graph.adjacency();
        self.scaled_degrees("degree_centrality", |k| index.degree(k))
    }

    /// 入度中心性，仅适用于有向图
    pub fn in_degree_centrality(&self) -> Result<IndexMap<K, f64>> {
        self.require_directed("in_degree_centrality")?;
        let index = self.graph.adjacency();
        self.scaled_degrees("in_degree_centrality", |k| index.in_degree(k))
    }

    /// 出度中心性，仅适用于有向图
    pub fn out_degree_centrality(&self) -> Result<IndexMap<K, f64>> {
        self.require_directed("out_degree_centrality")?;
        let index = self.graph.adjacency();
        self.scaled_degrees("out_degree_centrality", |k| index.out_degree(k))
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

    fn scaled_degrees<F>(&self, operation: &str, degree: F) -> Result<IndexMap<K, f64>>
    where
        F: Fn(&K) -> usize,
    {
        let n = self.graph.vertex_count();
        if n <= 1 {
            return Err(Error::DegenerateGraph(format!(
                "{} 需要至少两个顶点, 当前 {}",
                operation, n
            )));
        }
        let scale = 1.0 / (n - 1) as f64;
        Ok(self
            .graph
            .keys()
            .map(|k| (k.clone(), degree(k) as f64 * scale))
            .collect())
    }

    // ==================== 基于最短路径的中心性 ====================

    fn distance_metric(&self) -> Result<PathMetric> {
        let metric = resolve_metric(self.config.metric, self.graph);
        if metric == PathMetric::Weight && self.graph.has_negative_weight() {
            return Err(Error::InvalidWeight(
                "加权最短路径要求边权重非负".to_string(),
            ));
        }
        Ok(metric)
    }

    /// 接近中心性（Wasserman-Faust 修正）
    ///
    /// `C(u) = (r-1)/Σd · (r-1)/(n-1)`，其中 r 为能到达 u 的顶点数（含 u）。
    /// 有向图使用到达 u 的距离；没有其他顶点可达时为 0。
    pub fn closeness_centrality(&self) -> Result<IndexMap<K, f64>> {
        let metric = self.distance_metric()?;
        let topo = Topology::new(self.graph);
        let n = topo.len();
        let direction = if topo.is_directed() {
            Direction::Incoming
        } else {
            Direction::Outgoing
        };

        let scores: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|u| {
                let tree = search(&topo, u, metric, direction);
                let reached = tree.order.len();
                let total: f64 = tree.dist.iter().flatten().sum();
                if total > 0.0 && n > 1 {
                    let others = (reached - 1) as f64;
                    (others / total) * (others / (n - 1) as f64)
                } else {
                    0.0
                }
            })
            .collect();

        Ok(zip_keys(&topo, scores))
    }

    /// 介数中心性（Brandes 算法）
    ///
    /// 归一化时乘以 `1/((n-1)(n-2))`；不归一化的无向图结果减半。
    pub fn betweenness_centrality(&self) -> Result<IndexMap<K, f64>> {
        let metric = self.distance_metric()?;
        let topo = Topology::new(self.graph);
        let n = topo.len();

        let partials: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|s| {
                let walk = match metric {
                    PathMetric::Weight => brandes_dijkstra(&topo, s),
                    PathMetric::Hops | PathMetric::Auto => brandes_bfs(&topo, s),
                };
                walk.dependencies(s)
            })
            .collect();

        // 按源点顺序累加，保证结果与线程调度无关
        let mut scores = vec![0.0; n];
        for partial in &partials {
            for (score, delta) in scores.iter_mut().zip(partial) {
                *score += delta;
            }
        }

        let scale = if self.config.normalized {
            (n > 2).then(|| 1.0 / ((n - 1) * (n - 2)) as f64)
        } else if !topo.is_directed() {
            Some(0.5)
        } else {
            None
        };
        if let Some(scale) = scale {
            scores.iter_mut().for_each(|score| *score *= scale);
        }

        tracing::debug!(vertices = n, ?metric, "介数中心性计算完成");
        Ok(zip_keys(&topo, scores))
    }

    // ==================== 谱方法 ====================

    /// 特征向量中心性
    ///
    /// 在 `A + I` 上做幂迭代，每步按欧氏范数归一化；有向图沿入边累积。
    pub fn eigenvector_centrality(&self) -> Result<IndexMap<K, f64>> {
        let topo = Topology::new(self.graph);
        let n = topo.len();
        if n == 0 {
            return Err(Error::DegenerateGraph(
                "特征向量中心性对空图无定义".to_string(),
            ));
        }

        let PowerIterationConfig {
            max_iterations,
            tolerance,
        } = self.config.power_iteration;
        let weighted = self.config.weighted_eigenvector;
        let mut x = vec![1.0 / n as f64; n];

        for iteration in 1..=max_iterations {
            let last = x.clone();
            for (u, &xu) in last.iter().enumerate() {
                for &(v, w) in topo.successors(u) {
                    x[v] += xu * if weighted { w } else { 1.0 };
                }
            }

            let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
            let norm = if norm > 0.0 { norm } else { 1.0 };
            x.iter_mut().for_each(|v| *v /= norm);

            let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
            if err < n as f64 * tolerance {
                tracing::debug!(iterations = iteration, "特征向量中心性收敛");
                return Ok(zip_keys(&topo, x));
            }
        }

        tracing::warn!(max_iterations, "特征向量中心性未收敛");
        Err(Error::Convergence {
            algorithm: "eigenvector_centrality",
            iterations: max_iterations,
        })
    }

    /// PageRank
    ///
    /// 转移概率按出边权重归一化；无出边顶点的质量均匀分配给所有顶点。
    /// 无向边在两个方向上各算一次。
    pub fn pagerank(&self) -> Result<IndexMap<K, f64>> {
        let topo = Topology::new(self.graph);
        let n = topo.len();
        if n == 0 {
            return Ok(IndexMap::new());
        }
        if topo.has_negative_weight() {
            return Err(Error::InvalidWeight(
                "PageRank 要求边权重非负".to_string(),
            ));
        }

        let alpha = self.config.pagerank.damping;
        let PowerIterationConfig {
            max_iterations,
            tolerance,
        } = self.config.pagerank.iteration;
        let uniform = 1.0 / n as f64;

        let out_weight: Vec<f64> = (0..n)
            .map(|u| topo.successors(u).iter().map(|&(_, w)| w).sum())
            .collect();
        let dangling: Vec<usize> = (0..n).filter(|&u| out_weight[u] == 0.0).collect();

        let mut x = vec![uniform; n];
        for iteration in 1..=max_iterations {
            let last = std::mem::replace(&mut x, vec![0.0; n]);
            let dangling_mass: f64 = dangling.iter().map(|&u| last[u]).sum();

            for u in 0..n {
                if out_weight[u] == 0.0 {
                    continue;
                }
                let share = last[u] / out_weight[u];
                for &(v, w) in topo.successors(u) {
                    x[v] += share * w;
                }
            }
            let base = (1.0 - alpha) * uniform + alpha * dangling_mass * uniform;
            x.iter_mut().for_each(|v| *v = alpha * *v + base);

            let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
            if err < n as f64 * tolerance {
                tracing::debug!(iterations = iteration, "PageRank 收敛");
                return Ok(zip_keys(&topo, x));
            }
        }

        tracing::warn!(max_iterations, "PageRank 未收敛");
        Err(Error::Convergence {
            algorithm: "pagerank",
            iterations: max_iterations,
        })
    }
}

fn zip_keys<K: VertexKey>(topo: &Topology<'_, K>, values: Vec<f64>) -> IndexMap<K, f64> {
    topo.keys().iter().map(|&k| k.clone()).zip(values).collect()
}

/// 单源最短路径计数，供依赖累积使用
struct ShortestPathDag {
    /// 按距离非递减的确定顺序
    order: Vec<usize>,
    preds: Vec<Predecessors>,
    sigma: Vec<f64>,
}

impl ShortestPathDag {
    fn new(n: usize) -> Self {
        Self {
            order: Vec::with_capacity(n),
            preds: vec![Predecessors::new(); n],
            sigma: vec![0.0; n],
        }
    }

    /// 逆序累积源点 s 对其他顶点的依赖
    fn dependencies(mut self, s: usize) -> Vec<f64> {
        let mut delta = vec![0.0; self.sigma.len()];
        let mut betweenness = vec![0.0; self.sigma.len()];
        while let Some(w) = self.order.pop() {
            let coeff = (1.0 + delta[w]) / self.sigma[w];
            for &v in &self.preds[w] {
                delta[v] += self.sigma[v] * coeff;
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }
        betweenness
    }
}

fn brandes_bfs<K: VertexKey>(topo: &Topology<'_, K>, s: usize) -> ShortestPathDag {
    let n = topo.len();
    let mut dag = ShortestPathDag::new(n);
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut queue = VecDeque::new();

    dag.sigma[s] = 1.0;
    dist[s] = Some(0);
    queue.push_back(s);

    while let Some(v) = queue.pop_front() {
        dag.order.push(v);
        let dv = dist[v].unwrap_or(0);
        for &(w, _) in topo.successors(v) {
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back(w);
            }
            if dist[w] == Some(dv + 1) {
                dag.sigma[w] += dag.sigma[v];
                dag.preds[w].push(v);
            }
        }
    }

    dag
}

fn brandes_dijkstra<K: VertexKey>(topo: &Topology<'_, K>, s: usize) -> ShortestPathDag {
    let n = topo.len();
    let mut dag = ShortestPathDag::new(n);
    let mut seen: Vec<Option<f64>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut queue: PriorityQueue<usize, Reverse<(Distance, u64)>> = PriorityQueue::new();
    let mut seq = 0u64;

    dag.sigma[s] = 1.0;
    seen[s] = Some(0.0);
    queue.push(s, Reverse((Distance(0.0), seq)));

    while let Some((v, Reverse((Distance(dv), _)))) = queue.pop() {
        settled[v] = true;
        dag.order.push(v);

        for &(w, weight) in topo.successors(v) {
            if settled[w] {
                continue;
            }
            let candidate = dv + weight;
            match seen[w] {
                Some(old) if candidate == old => {
                    dag.sigma[w] += dag.sigma[v];
                    dag.preds[w].push(v);
                }
                Some(old) if candidate > old => {}
                _ => {
                    seen[w] = Some(candidate);
                    dag.sigma[w] = dag.sigma[v];
                    dag.preds[w] = Predecessors::from_slice(&[v]);
                    seq += 1;
                    queue.push(w, Reverse((Distance(candidate), seq)));
                }
            }
        }
    }

    dag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::GraphMode;

    const EPS: f64 = 1e-6;

    fn create_test_graph() -> Graph<&'static str> {
        // A - B - D - E
        //  \- C -/
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

    fn star() -> Graph<u32> {
        Graph::from_parts(
            GraphMode::Undirected,
            [0u32, 1, 2, 3],
            [(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_degree_centrality() {
        let graph = create_test_graph();
        let dc = Centrality::new(&graph).degree_centrality().unwrap();

        assert!((dc["D"] - 0.75).abs() < EPS);
        assert!((dc["E"] - 0.25).abs() < EPS);
        assert_eq!(dc.keys().copied().collect::<Vec<_>>(), vec!["A", "B", "C", "D", "E"]);

        let single = graph.subgraph(["A"].iter());
        assert_eq!(
            Centrality::new(&single).degree_centrality().unwrap_err().kind(),
            ErrorKind::DegenerateGraph
        );
    }

    #[test]
    fn test_directed_degree_centrality() {
        let graph = Graph::from_parts(
            GraphMode::Directed,
            [1u32, 2, 3],
            [(1, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)],
        )
        .unwrap();
        let c = Centrality::new(&graph);

        assert!((c.degree_centrality().unwrap()[&1] - 1.0).abs() < EPS);
        assert!((c.in_degree_centrality().unwrap()[&3] - 1.0).abs() < EPS);
        assert!((c.out_degree_centrality().unwrap()[&3]).abs() < EPS);

        let undirected = star();
        assert_eq!(
            Centrality::new(&undirected)
                .in_degree_centrality()
                .unwrap_err()
                .kind(),
            ErrorKind::UnsupportedOperation
        );
    }

    #[test]
    fn test_closeness_centrality() {
        let graph = create_test_graph();
        let cc = Centrality::new(&graph).closeness_centrality().unwrap();

        // D 到 A,B,C,E 的距离为 2,1,1,1
        assert!((cc["D"] - 0.8).abs() < EPS);
        // E 到 A,B,C,D 的距离为 3,2,2,1
        assert!((cc["E"] - 0.5).abs() < EPS);
    }

    #[test]
    fn test_closeness_disconnected() {
        let mut graph = star();
        graph.add_vertex(9);
        let cc = Centrality::new(&graph).closeness_centrality().unwrap();

        assert_eq!(cc[&9], 0.0);
        // 中心可达 3 个顶点，总距离 3，缩放 3/4
        assert!((cc[&0] - 0.75).abs() < EPS);
    }

    #[test]
    fn test_betweenness_centrality() {
        let graph = star();
        let bc = Centrality::new(&graph).betweenness_centrality().unwrap();
        assert!((bc[&0] - 1.0).abs() < EPS);
        assert!(bc[&1].abs() < EPS);

        let mut config = AnalysisConfig::default();
        config.normalized = false;
        let raw = Centrality::new(&graph)
            .with_config(config)
            .betweenness_centrality()
            .unwrap();
        assert!((raw[&0] - 3.0).abs() < EPS);
    }

    #[test]
    fn test_betweenness_splits_equal_paths() {
        let graph = create_test_graph();
        let mut config = AnalysisConfig::default();
        config.normalized = false;
        let bc = Centrality::new(&graph)
            .with_config(config)
            .betweenness_centrality()
            .unwrap();

        // A-D 的两条最短路径平分给 B 和 C，A-E 同理
        assert!((bc["B"] - 1.0).abs() < EPS);
        assert!((bc["C"] - 1.0).abs() < EPS);
        // D 位于 {A,B,C} 与 E 之间的全部最短路径上，另有 B-C 的一半
        assert!((bc["D"] - 3.5).abs() < EPS);
    }

    #[test]
    fn test_weighted_betweenness() {
        // 直连 a-c 权重很大，最短加权路径经过 b
        let graph = Graph::from_parts(
            GraphMode::Undirected,
            ["a", "b", "c"],
            [("a", "b", 1.0), ("b", "c", 1.0), ("a", "c", 5.0)],
        )
        .unwrap();

        let hops = Centrality::new(&graph).betweenness_centrality().unwrap();
        assert!(hops["b"].abs() < EPS);

        let mut config = AnalysisConfig::default();
        config.metric = PathMetric::Weight;
        let weighted = Centrality::new(&graph)
            .with_config(config)
            .betweenness_centrality()
            .unwrap();
        assert!((weighted["b"] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_eigenvector_centrality() {
        let triangle = Graph::from_parts(
            GraphMode::Undirected,
            [1u32, 2, 3],
            [(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0)],
        )
        .unwrap();
        let ec = Centrality::new(&triangle).eigenvector_centrality().unwrap();
        let expected = 1.0 / 3f64.sqrt();
        for value in ec.values() {
            assert!((value - expected).abs() < EPS);
        }

        let graph = star();
        let ec = Centrality::new(&graph).eigenvector_centrality().unwrap();
        let norm: f64 = ec.values().map(|v| v * v).sum();
        assert!((norm - 1.0).abs() < EPS);
        assert!(ec[&0] > ec[&1]);
        assert!((ec[&1] - ec[&3]).abs() < EPS);
    }

    #[test]
    fn test_weighted_closeness() {
        let graph = Graph::from_parts(
            GraphMode::Undirected,
            ["a", "b", "c"],
            [("a", "b", 1.0), ("b", "c", 1.0), ("a", "c", 5.0)],
        )
        .unwrap();

        let hops = Centrality::new(&graph).closeness_centrality().unwrap();
        assert!((hops["a"] - 1.0).abs() < EPS);

        // 加权距离 a->b = 1, a->c = 2
        let mut config = AnalysisConfig::default();
        config.metric = PathMetric::Weight;
        let weighted = Centrality::new(&graph)
            .with_config(config)
            .closeness_centrality()
            .unwrap();
        assert!((weighted["a"] - 2.0 / 3.0).abs() < EPS);
        assert!((weighted["b"] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_directed_closeness_and_betweenness() {
        let graph = Graph::from_parts(
            GraphMode::Directed,
            [1u32, 2, 3],
            [(1, 2, 1.0), (2, 3, 1.0)],
        )
        .unwrap();
        let c = Centrality::new(&graph);

        // 有向图按到达该顶点的距离计算
        let closeness = c.closeness_centrality().unwrap();
        assert_eq!(closeness[&1], 0.0);
        assert!((closeness[&2] - 0.5).abs() < EPS);
        assert!((closeness[&3] - 2.0 / 3.0).abs() < EPS);

        let betweenness = c.betweenness_centrality().unwrap();
        assert!(betweenness[&1].abs() < EPS);
        assert!((betweenness[&2] - 0.5).abs() < EPS);
        assert!(betweenness[&3].abs() < EPS);
    }

    #[test]
    fn test_weighted_eigenvector() {
        let graph = Graph::from_parts(
            GraphMode::Undirected,
            [0u32, 1, 2, 3],
            [(0, 1, 5.0), (0, 2, 1.0), (0, 3, 1.0)],
        )
        .unwrap();

        let plain = Centrality::new(&graph).eigenvector_centrality().unwrap();
        assert!((plain[&1] - plain[&2]).abs() < EPS);

        let mut config = AnalysisConfig::default();
        config.weighted_eigenvector = true;
        let weighted = Centrality::new(&graph)
            .with_config(config)
            .eigenvector_centrality()
            .unwrap();
        assert!(weighted[&1] > weighted[&2]);
        assert!((weighted[&2] - weighted[&3]).abs() < EPS);
        let norm: f64 = weighted.values().map(|v| v * v).sum();
        assert!((norm - 1.0).abs() < EPS);
    }

    #[test]
    fn test_pagerank_convergence_cap() {
        let graph = create_test_graph();
        let mut config = AnalysisConfig::default();
        config.pagerank.iteration.max_iterations = 1;
        let err = Centrality::new(&graph)
            .with_config(config)
            .pagerank()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Convergence);
    }

    #[test]
    fn test_eigenvector_errors() {
        let empty: Graph<u32> = Graph::undirected();
        assert_eq!(
            Centrality::new(&empty)
                .eigenvector_centrality()
                .unwrap_err()
                .kind(),
            ErrorKind::DegenerateGraph
        );

        let graph = create_test_graph();
        let mut config = AnalysisConfig::default();
        config.power_iteration.max_iterations = 1;
        let err = Centrality::new(&graph)
            .with_config(config)
            .eigenvector_centrality()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Convergence);
    }

    #[test]
    fn test_pagerank() {
        let graph = create_test_graph();
        let pr = Centrality::new(&graph).pagerank().unwrap();

        let total: f64 = pr.values().sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!(pr["D"] > pr["A"]);
        assert!((pr["B"] - pr["C"]).abs() < EPS);
    }

    #[test]
    fn test_pagerank_dangling_and_edge_cases() {
        // 3 没有出边
        let graph = Graph::from_parts(
            GraphMode::Directed,
            [1u32, 2, 3],
            [(1, 2, 1.0), (2, 3, 1.0)],
        )
        .unwrap();
        let pr = Centrality::new(&graph).pagerank().unwrap();
        let total: f64 = pr.values().sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!(pr[&3] > pr[&2] && pr[&2] > pr[&1]);

        let empty: Graph<u32> = Graph::directed();
        assert!(Centrality::new(&empty).pagerank().unwrap().is_empty());

        let negative =
            Graph::from_parts(GraphMode::Directed, [1u32, 2], [(1, 2, -1.0)]).unwrap();
        assert_eq!(
            Centrality::new(&negative).pagerank().unwrap_err().kind(),
            ErrorKind::InvalidWeight
        );
    }
}
