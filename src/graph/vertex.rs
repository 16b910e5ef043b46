//! 顶点定义

use crate::types::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// 顶点标识需要满足的约束
///
/// 任何可哈希、可排序的值都可以作为顶点标识，例如 `&str`、`String`、`u64`。
/// 排序只用于让连通分量等结果保持确定的输出顺序。
pub trait VertexKey: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync {}

impl<T> VertexKey for T where T: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync {}

/// 顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex<K> {
    /// 顶点标识
    key: K,
    /// 属性
    properties: Properties,
}

impl<K> Vertex<K> {
    /// 创建新顶点
    pub fn new(key: K) -> Self {
        Self {
            key,
            properties: Properties::new(),
        }
    }

    pub fn with_properties(key: K, properties: Properties) -> Self {
        Self { key, properties }
    }

    /// 获取顶点标识
    pub fn key(&self) -> &K {
        &self.key
    }

    /// 获取属性
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// 设置属性
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// 移除属性
    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    /// 获取所有属性
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// 合并属性，同名属性被覆盖
    pub(crate) fn merge_properties(&mut self, properties: Properties) {
        self.properties.extend(properties);
    }

    pub fn into_key(self) -> K {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_properties() {
        let mut v = Vertex::new("A");
        assert_eq!(v.key(), &"A");
        assert!(v.properties().is_empty());

        v.set_property("color", "red");
        v.set_property("rank", 3i64);
        assert_eq!(v.property("color").and_then(|p| p.as_string()), Some("red"));
        assert_eq!(v.property("rank").and_then(|p| p.as_int()), Some(3));

        let mut extra = Properties::new();
        extra.insert("color".to_string(), PropertyValue::from("blue"));
        v.merge_properties(extra);
        assert_eq!(v.property("color").and_then(|p| p.as_string()), Some("blue"));

        assert!(v.remove_property("rank").is_some());
        assert_eq!(v.properties().len(), 1);
    }

    #[test]
    fn test_into_key() {
        let mut v = Vertex::new(String::from("node-7"));
        v.set_property("color", "red");
        assert_eq!(v.into_key(), "node-7");
    }
}
