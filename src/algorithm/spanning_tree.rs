//! 最小生成树（Kruskal）

use super::topology::Topology;
use super::union_find::UnionFind;
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, VertexKey};

/// Kruskal 最小生成树算法
///
/// 边按权重稳定排序，权重相同时按插入顺序。
/// 非连通图得到覆盖全部顶点的生成森林。
pub struct Kruskal<'g, K: VertexKey> {
    graph: &'g Graph<K>,
}

impl<'g, K: VertexKey> Kruskal<'g, K> {
    pub fn new(graph: &'g Graph<K>) -> Self {
        Self { graph }
    }

    /// 生成树（森林）中的边，按加入顺序排列
    pub fn minimum_spanning_edges(&self) -> Result<Vec<&'g Edge<K>>> {
        if self.graph.is_directed() {
            return Err(Error::UnsupportedOperation(
                "最小生成树仅适用于无向图".to_string(),
            ));
        }

        let topo = Topology::new(self.graph);
        let mut candidates: Vec<&'g Edge<K>> = self.graph.edges().collect();
        candidates.sort_by(|a, b| a.weight().total_cmp(&b.weight()));

        let mut uf = UnionFind::new(topo.len());
        let mut tree = Vec::with_capacity(topo.len().saturating_sub(1));
        for edge in candidates {
            let u = topo.index_of(edge.source())?;
            let v = topo.index_of(edge.target())?;
            if uf.union(u, v) {
                tree.push(edge);
            }
        }

        tracing::debug!(
            edges = tree.len(),
            components = uf.components(),
            "最小生成树计算完成"
        );
        Ok(tree)
    }

    /// 以生成树（森林）边构造新图，保留全部顶点与属性
    pub fn minimum_spanning_tree(&self) -> Result<Graph<K>> {
        let edges = self.minimum_spanning_edges()?;
        let mut tree = Graph::with_policy(self.graph.mode(), self.graph.policy());
        for vertex in self.graph.vertices() {
            tree.add_vertex_with(vertex.key().clone(), vertex.properties().clone());
        }
        for edge in edges {
            tree.add_edge_with(
                edge.source().clone(),
                edge.target().clone(),
                edge.weight(),
                edge.properties().clone(),
            )?;
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::GraphMode;

    #[test]
    fn test_minimum_spanning_edges() {
        let graph = Graph::from_parts(
            GraphMode::Undirected,
            ["a", "b", "c", "d"],
            [
                ("a", "b", 4.0),
                ("a", "c", 1.0),
                ("b", "c", 2.0),
                ("c", "d", 5.0),
                ("b", "d", 3.0),
            ],
        )
        .unwrap();

        let edges = Kruskal::new(&graph).minimum_spanning_edges().unwrap();
        let pairs: Vec<(&str, &str)> = edges
            .iter()
            .map(|e| (*e.source(), *e.target()))
            .collect();
        assert_eq!(pairs, vec![("a", "c"), ("b", "c"), ("b", "d")]);

        let total: f64 = edges.iter().map(|e| e.weight()).sum();
        assert_eq!(total, 6.0);
    }

    #[test]
    fn test_spanning_forest_keeps_all_vertices() {
        let mut graph = Graph::from_parts(
            GraphMode::Undirected,
            [1u32, 2, 3, 4, 5],
            [(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0), (4, 5, 2.0)],
        )
        .unwrap();
        graph.vertex_mut(&5).unwrap().set_property("label", "five");

        let tree = Kruskal::new(&graph).minimum_spanning_tree().unwrap();
        assert_eq!(tree.vertex_count(), 5);
        assert_eq!(tree.edge_count(), 3);
        // 权重相同时保留先插入的边
        assert!(tree.has_edge(&1, &2));
        assert!(tree.has_edge(&2, &3));
        assert!(!tree.has_edge(&3, &1));
        assert_eq!(
            tree.vertex(&5).unwrap().property("label").and_then(|v| v.as_string()),
            Some("five")
        );
    }

    #[test]
    fn test_directed_rejected() {
        let graph = Graph::from_parts(GraphMode::Directed, [1u32, 2], [(1, 2, 1.0)]).unwrap();
        assert_eq!(
            Kruskal::new(&graph)
                .minimum_spanning_tree()
                .unwrap_err()
                .kind(),
            ErrorKind::UnsupportedOperation
        );
    }
}
