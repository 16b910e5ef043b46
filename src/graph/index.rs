//! 邻接索引
//!
//! 顶点到邻居集合的映射，与边集合保持一致。邻居按插入顺序保存，
//! 算法据此获得确定的遍历顺序。

use super::vertex::VertexKey;
use crate::types::GraphMode;
use indexmap::{IndexMap, IndexSet};

/// 邻接索引
#[derive(Debug, Clone)]
pub struct AdjacencyIndex<K> {
    mode: GraphMode,
    /// 顶点到后继（无向图中即全部邻居）的映射
    outgoing: IndexMap<K, IndexSet<K>>,
    /// 顶点到前驱的映射，仅有向图维护
    incoming: IndexMap<K, IndexSet<K>>,
}

impl<K: VertexKey> AdjacencyIndex<K> {
    /// 创建新索引
    pub fn new(mode: GraphMode) -> Self {
        Self {
            mode,
            outgoing: IndexMap::new(),
            incoming: IndexMap::new(),
        }
    }

    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    /// 添加顶点，已存在时返回 false
    pub fn add_vertex(&mut self, key: K) -> bool {
        if self.outgoing.contains_key(&key) {
            return false;
        }
        if self.mode.is_directed() {
            self.incoming.insert(key.clone(), IndexSet::new());
        }
        self.outgoing.insert(key, IndexSet::new());
        true
    }

    /// 移除顶点及其在其他顶点邻居集合中的条目
    pub fn remove_vertex(&mut self, key: &K) {
        let Some(succs) = self.outgoing.shift_remove(key) else {
            return;
        };
        match self.mode {
            GraphMode::Undirected => {
                for w in succs.iter().filter(|w| *w != key) {
                    if let Some(set) = self.outgoing.get_mut(w) {
                        set.shift_remove(key);
                    }
                }
            }
            GraphMode::Directed => {
                for w in succs.iter() {
                    if let Some(set) = self.incoming.get_mut(w) {
                        set.shift_remove(key);
                    }
                }
                if let Some(preds) = self.incoming.shift_remove(key) {
                    for w in preds.iter() {
                        if let Some(set) = self.outgoing.get_mut(w) {
                            set.shift_remove(key);
                        }
                    }
                }
            }
        }
    }

    /// 添加边，调用方保证两个端点都已存在
    pub fn add_edge(&mut self, u: &K, v: &K) {
        if let Some(set) = self.outgoing.get_mut(u) {
            set.insert(v.clone());
        }
        let back = match self.mode {
            GraphMode::Undirected => &mut self.outgoing,
            GraphMode::Directed => &mut self.incoming,
        };
        if let Some(set) = back.get_mut(v) {
            set.insert(u.clone());
        }
    }

    /// 移除边
    pub fn remove_edge(&mut self, u: &K, v: &K) {
        if let Some(set) = self.outgoing.get_mut(u) {
            set.shift_remove(v);
        }
        let back = match self.mode {
            GraphMode::Undirected => &mut self.outgoing,
            GraphMode::Directed => &mut self.incoming,
        };
        if let Some(set) = back.get_mut(v) {
            set.shift_remove(u);
        }
    }

    pub fn contains_vertex(&self, key: &K) -> bool {
        self.outgoing.contains_key(key)
    }

    pub fn contains_edge(&self, u: &K, v: &K) -> bool {
        self.outgoing
            .get(u)
            .map(|set| set.contains(v))
            .unwrap_or(false)
    }

    /// 获取后继（无向图中即邻居）
    pub fn successors(&self, key: &K) -> Option<&IndexSet<K>> {
        self.outgoing.get(key)
    }

    /// 获取前驱（无向图中即邻居）
    pub fn predecessors(&self, key: &K) -> Option<&IndexSet<K>> {
        match self.mode {
            GraphMode::Undirected => self.outgoing.get(key),
            GraphMode::Directed => self.incoming.get(key),
        }
    }

    /// 获取出度
    pub fn out_degree(&self, key: &K) -> usize {
        match self.mode {
            GraphMode::Undirected => self.degree(key),
            GraphMode::Directed => self.outgoing.get(key).map(|s| s.len()).unwrap_or(0),
        }
    }

    /// 获取入度
    pub fn in_degree(&self, key: &K) -> usize {
        match self.mode {
            GraphMode::Undirected => self.degree(key),
            GraphMode::Directed => self.incoming.get(key).map(|s| s.len()).unwrap_or(0),
        }
    }

    /// 获取度数。无向自环计 2，有向图为入度与出度之和
    pub fn degree(&self, key: &K) -> usize {
        match self.mode {
            GraphMode::Undirected => self
                .outgoing
                .get(key)
                .map(|s| s.len() + usize::from(s.contains(key)))
                .unwrap_or(0),
            GraphMode::Directed => self.out_degree(key) + self.in_degree(key),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.outgoing.len()
    }

    /// 按插入顺序遍历顶点
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.outgoing.keys()
    }
}
