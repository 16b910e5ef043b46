//! 聚类系数与三角形计数

use super::topology::Topology;
use crate::error::{Error, Result};
use crate::graph::{Graph, VertexKey};
use indexmap::IndexMap;

/// 聚类分析器
pub struct Clustering<'g, K: VertexKey> {
    graph: &'g Graph<K>,
}

impl<'g, K: VertexKey> Clustering<'g, K> {
    pub fn new(graph: &'g Graph<K>) -> Self {
        Self { graph }
    }

    /// 局部聚类系数，自环不参与计算
    ///
    /// 无向图为 `2T/(d(d-1))`；有向图按有向三角形计数，
    /// `T / (2·(d_tot(d_tot-1) - 2·d_recip))`。
    pub fn clustering(&self) -> Result<IndexMap<K, f64>> {
        let topo = Topology::new(self.graph);
        let values = if topo.is_directed() {
            directed_clustering(&topo)
        } else {
            undirected_clustering(&topo)
        };
        Ok(topo.keys().iter().map(|&k| k.clone()).zip(values).collect())
    }

    /// 每个顶点参与的三角形数量，仅适用于无向图
    pub fn triangles(&self) -> Result<IndexMap<K, usize>> {
        if self.graph.is_directed() {
            return Err(Error::UnsupportedOperation(
                "triangles 仅适用于无向图".to_string(),
            ));
        }
        let topo = Topology::new(self.graph);
        let counts = (0..topo.len()).map(|u| {
            let (_, links) = neighbor_links(&topo, u);
            links / 2
        });
        Ok(topo.keys().iter().map(|&k| k.clone()).zip(counts).collect())
    }

    /// 所有顶点聚类系数的平均值
    pub fn average_clustering(&self) -> Result<f64> {
        let n = self.graph.vertex_count();
        if n == 0 {
            return Err(Error::DegenerateGraph(
                "average_clustering 对空图无定义".to_string(),
            ));
        }
        let total: f64 = self.clustering()?.values().sum();
        Ok(total / n as f64)
    }
}

/// 去掉自环后的邻居
fn proper<'a>(slots: &'a [(usize, f64)], u: usize) -> impl Iterator<Item = usize> + 'a {
    slots.iter().map(|&(v, _)| v).filter(move |&v| v != u)
}

/// 返回 (邻居数, 邻居之间相连的有序对数量)
fn neighbor_links<K: VertexKey>(topo: &Topology<'_, K>, u: usize) -> (usize, usize) {
    let neighbors: Vec<usize> = proper(topo.successors(u), u).collect();
    let mut marked = vec![false; topo.len()];
    for &v in &neighbors {
        marked[v] = true;
    }
    let links = neighbors
        .iter()
        .map(|&v| proper(topo.successors(v), v).filter(|&w| marked[w]).count())
        .sum();
    (neighbors.len(), links)
}

fn undirected_clustering<K: VertexKey>(topo: &Topology<'_, K>) -> Vec<f64> {
    (0..topo.len())
        .map(|u| {
            let (degree, links) = neighbor_links(topo, u);
            if links == 0 {
                0.0
            } else {
                links as f64 / (degree * (degree - 1)) as f64
            }
        })
        .collect()
}

fn directed_clustering<K: VertexKey>(topo: &Topology<'_, K>) -> Vec<f64> {
    let n = topo.len();
    let mut is_pred = vec![false; n];
    let mut is_succ = vec![false; n];

    (0..n)
        .map(|i| {
            let preds: Vec<usize> = proper(topo.predecessors(i), i).collect();
            let succs: Vec<usize> = proper(topo.successors(i), i).collect();
            preds.iter().for_each(|&p| is_pred[p] = true);
            succs.iter().for_each(|&s| is_succ[s] = true);

            let hits = |k: usize| is_pred[k] as usize + is_succ[k] as usize;
            let triangles: usize = preds
                .iter()
                .chain(&succs)
                .map(|&j| {
                    proper(topo.predecessors(j), j)
                        .chain(proper(topo.successors(j), j))
                        .map(hits)
                        .sum::<usize>()
                })
                .sum();
            let reciprocal = preds.iter().filter(|&&p| is_succ[p]).count();

            preds.iter().for_each(|&p| is_pred[p] = false);
            succs.iter().for_each(|&s| is_succ[s] = false);

            if triangles == 0 {
                return 0.0;
            }
            let total = preds.len() + succs.len();
            let possible = (total * (total - 1) - 2 * reciprocal) * 2;
            triangles as f64 / possible as f64
        })
        .collect()
}
