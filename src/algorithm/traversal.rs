//! 遍历原语
//!
//! BFS、Dijkstra 与 DFS，作用于 [`Topology`] 的顶点编号上。
//! 邻居按插入顺序展开；距离相同的候选者中先发现的前驱胜出。

use super::topology::Topology;
use crate::graph::VertexKey;
use crate::types::{Direction, PathMetric};
use priority_queue::PriorityQueue;
use std::cmp::{Ordering, Reverse};
use std::collections::VecDeque;

/// 可排序的浮点距离
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Distance(pub f64);

impl Eq for Distance {}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// 单源搜索树
#[derive(Debug, Clone)]
pub(crate) struct SearchTree {
    /// 到各顶点的距离，不可达为 None
    pub dist: Vec<Option<f64>>,
    /// 最短路径树中的前驱
    pub parent: Vec<Option<usize>>,
    /// 顶点的发现（BFS）或确定（Dijkstra）顺序
    pub order: Vec<usize>,
}

impl SearchTree {
    fn new(n: usize) -> Self {
        Self {
            dist: vec![None; n],
            parent: vec![None; n],
            order: Vec::with_capacity(n),
        }
    }

    /// 重构从源点到 target 的路径
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        self.dist.get(target).copied().flatten()?;
        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self.parent[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }

    pub fn reached(&self, i: usize) -> bool {
        self.dist[i].is_some()
    }
}

/// 按度量选择 BFS 或 Dijkstra；`Auto` 由调用方事先解析
pub(crate) fn search<K: VertexKey>(
    topo: &Topology<'_, K>,
    source: usize,
    metric: PathMetric,
    direction: Direction,
) -> SearchTree {
    match metric {
        PathMetric::Weight => dijkstra(topo, source, direction),
        PathMetric::Hops | PathMetric::Auto => bfs(topo, source, direction),
    }
}

/// 广度优先搜索，距离为跳数
pub(crate) fn bfs<K: VertexKey>(
    topo: &Topology<'_, K>,
    source: usize,
    direction: Direction,
) -> SearchTree {
    let mut tree = SearchTree::new(topo.len());
    let mut queue = VecDeque::new();

    tree.dist[source] = Some(0.0);
    queue.push_back((source, 0usize));

    while let Some((u, depth)) = queue.pop_front() {
        tree.order.push(u);
        for &(v, _) in topo.neighbors(u, direction) {
            if tree.dist[v].is_none() {
                tree.dist[v] = Some((depth + 1) as f64);
                tree.parent[v] = Some(u);
                queue.push_back((v, depth + 1));
            }
        }
    }

    tree
}

/// Dijkstra 最短路径，调用方保证权重非负
pub(crate) fn dijkstra<K: VertexKey>(
    topo: &Topology<'_, K>,
    source: usize,
    direction: Direction,
) -> SearchTree {
    let n = topo.len();
    let mut tree = SearchTree::new(n);
    let mut settled = vec![false; n];
    // 距离相同时按入队序号出队
    let mut queue: PriorityQueue<usize, Reverse<(Distance, u64)>> = PriorityQueue::new();
    let mut seq = 0u64;

    tree.dist[source] = Some(0.0);
    queue.push(source, Reverse((Distance(0.0), seq)));

    while let Some((u, Reverse((Distance(d), _)))) = queue.pop() {
        settled[u] = true;
        tree.order.push(u);

        for &(v, w) in topo.neighbors(u, direction) {
            if settled[v] {
                continue;
            }
            let candidate = d + w;
            let improves = tree.dist[v].map_or(true, |old| candidate < old);
            if improves {
                tree.dist[v] = Some(candidate);
                tree.parent[v] = Some(u);
                seq += 1;
                queue.push(v, Reverse((Distance(candidate), seq)));
            }
        }
    }

    tree
}

/// 深度优先先序遍历
pub(crate) fn dfs_preorder<K: VertexKey>(
    topo: &Topology<'_, K>,
    source: usize,
    direction: Direction,
) -> Vec<usize> {
    let mut visited = vec![false; topo.len()];
    let mut order = Vec::new();
    // (顶点, 下一个待检查的邻居位置)
    let mut stack: Vec<(usize, usize)> = vec![(source, 0)];
    visited[source] = true;
    order.push(source);

    while let Some(&(u, next)) = stack.last() {
        let neighbor = topo.neighbors(u, direction).nth(next).map(|&(v, _)| v);
        match neighbor {
            Some(v) => {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                if !visited[v] {
                    visited[v] = true;
                    order.push(v);
                    stack.push((v, 0));
                }
            }
            None => {
                stack.pop();
            }
        }
    }

    order
}
