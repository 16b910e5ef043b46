//! 分析配置
//!
//! 迭代算法的收敛参数及中心性计算选项，可从 JSON 加载

use crate::error::{Error, Result};
use crate::types::PathMetric;
use serde::{Deserialize, Serialize};

/// 幂迭代参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerIterationConfig {
    /// 最大迭代次数
    pub max_iterations: usize,
    /// 收敛阈值（按顶点数缩放）
    pub tolerance: f64,
}

impl Default for PowerIterationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl PowerIterationConfig {
    fn validate(&self, section: &str) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(format!(
                "{}.max_iterations 必须大于 0",
                section
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "{}.tolerance 必须为正数, 实际为 {}",
                section, self.tolerance
            )));
        }
        Ok(())
    }
}

/// PageRank 参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRankConfig {
    /// 阻尼系数
    pub damping: f64,
    #[serde(flatten)]
    pub iteration: PowerIterationConfig,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            iteration: PowerIterationConfig::default(),
        }
    }
}

/// 中心性与结构分析配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 特征向量中心性的迭代参数
    pub power_iteration: PowerIterationConfig,
    pub pagerank: PageRankConfig,
    /// 介数中心性是否归一化
    pub normalized: bool,
    /// 接近中心性与介数中心性使用的距离
    pub metric: PathMetric,
    /// 特征向量中心性是否使用边权重
    pub weighted_eigenvector: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            power_iteration: PowerIterationConfig::default(),
            pagerank: PageRankConfig::default(),
            normalized: true,
            metric: PathMetric::Hops,
            weighted_eigenvector: false,
        }
    }
}

impl AnalysisConfig {
    /// 从 JSON 解析并校验
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.power_iteration.validate("power_iteration")?;
        self.pagerank.iteration.validate("pagerank")?;
        let d = self.pagerank.damping;
        if !(d > 0.0 && d < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "pagerank.damping 必须位于 (0, 1) 区间, 实际为 {}",
                d
            )));
        }
        Ok(())
    }
}
