//! 边定义

use crate::error::{Error, Result};
use crate::types::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 默认边权重
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// 边
///
/// 无向图中 `source`/`target` 只记录插入时的方向，查询时两个方向等价。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<K> {
    /// 源顶点
    source: K,
    /// 目标顶点
    target: K,
    /// 权重（最大流中作为容量）
    weight: f64,
    /// 属性
    properties: Properties,
}

impl<K> Edge<K> {
    /// 创建新边
    pub fn new(source: K, target: K, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
            properties: Properties::new(),
        }
    }

    pub fn with_properties(source: K, target: K, weight: f64, properties: Properties) -> Self {
        Self {
            source,
            target,
            weight,
            properties,
        }
    }

    /// 获取源顶点
    pub fn source(&self) -> &K {
        &self.source
    }

    /// 获取目标顶点
    pub fn target(&self) -> &K {
        &self.target
    }

    pub fn endpoints(&self) -> (&K, &K) {
        (&self.source, &self.target)
    }

    /// 获取权重
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// 设置权重
    pub fn set_weight(&mut self, weight: f64) -> Result<()> {
        validate_weight(weight)?;
        self.weight = weight;
        Ok(())
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

    pub(crate) fn merge_properties(&mut self, properties: Properties) {
        self.properties.extend(properties);
    }
}

impl<K: fmt::Debug> Edge<K> {
    pub(crate) fn describe(&self) -> String {
        format!("({:?}, {:?})", self.source, self.target)
    }
}

/// 权重必须是有限值
pub(crate) fn validate_weight(weight: f64) -> Result<()> {
    if weight.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidWeight(format!("权重必须为有限值, 实际为 {}", weight)))
    }
}
