//! 只读的稠密拓扑视图
//!
//! 算法在调用开始时把图转换为以 `0..n` 编号的邻接表，编号顺序即顶点插入顺序，
//! 邻居顺序即边插入顺序。

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexKey, DEFAULT_WEIGHT};
use crate::types::Direction;
use std::collections::HashMap;

pub(crate) struct Topology<'g, K> {
    directed: bool,
    keys: Vec<&'g K>,
    position: HashMap<&'g K, usize>,
    /// 后继及边权重（无向图中即全部邻居）
    succ: Vec<Vec<(usize, f64)>>,
    /// 前驱及边权重，仅有向图填充
    pred: Vec<Vec<(usize, f64)>>,
}

impl<'g, K: VertexKey> Topology<'g, K> {
    pub fn new(graph: &'g Graph<K>) -> Self {
        let keys: Vec<&K> = graph.keys().collect();
        let position: HashMap<&K, usize> =
            keys.iter().enumerate().map(|(i, &k)| (k, i)).collect();
        let adjacency = graph.adjacency();
        let weight = |u: &K, v: &K| {
            graph
                .edge(u, v)
                .map(|e| e.weight())
                .unwrap_or(DEFAULT_WEIGHT)
        };

        let succ = keys
            .iter()
            .map(|&u| {
                adjacency
                    .successors(u)
                    .map(|set| {
                        set.iter()
                            .filter_map(|v| position.get(v).map(|&j| (j, weight(u, v))))
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();

        let pred = if graph.is_directed() {
            keys.iter()
                .map(|&v| {
                    adjacency
                        .predecessors(v)
                        .map(|set| {
                            set.iter()
                                .filter_map(|u| position.get(u).map(|&i| (i, weight(u, v))))
                                .collect()
                        })
                        .unwrap_or_default()
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            directed: graph.is_directed(),
            keys,
            position,
            succ,
            pred,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn key(&self, i: usize) -> &'g K {
        self.keys[i]
    }

    pub fn keys(&self) -> &[&'g K] {
        &self.keys
    }

    /// 顶点标识转编号
    pub fn index_of(&self, key: &K) -> Result<usize> {
        self.position
            .get(key)
            .copied()
            .ok_or_else(|| Error::vertex_not_found(key))
    }

    pub fn successors(&self, i: usize) -> &[(usize, f64)] {
        &self.succ[i]
    }

    pub fn predecessors(&self, i: usize) -> &[(usize, f64)] {
        if self.directed {
            &self.pred[i]
        } else {
            &self.succ[i]
        }
    }

    /// 按方向遍历邻居；`Both` 在有向图中先后继后前驱，可能重复
    pub fn neighbors(
        &self,
        i: usize,
        direction: Direction,
    ) -> impl Iterator<Item = &(usize, f64)> + '_ {
        let (first, second): (&[(usize, f64)], &[(usize, f64)]) = match direction {
            Direction::Outgoing => (self.successors(i), &[]),
            Direction::Incoming => (self.predecessors(i), &[]),
            Direction::Both if self.directed => (&self.succ[i], &self.pred[i]),
            Direction::Both => (&self.succ[i], &[]),
        };
        first.iter().chain(second.iter())
    }

    pub fn has_negative_weight(&self) -> bool {
        self.succ.iter().flatten().any(|&(_, w)| w < 0.0)
    }
}
