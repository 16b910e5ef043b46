//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("顶点不存在: {0}")]
    VertexNotFound(String),

    #[error("边不存在: {0}")]
    EdgeNotFound(String),

    #[error("无效的边权重: {0}")]
    InvalidWeight(String),

    #[error("不支持的操作: {0}")]
    UnsupportedOperation(String),

    #[error("图规模不足: {0}")]
    DegenerateGraph(String),

    #[error("{algorithm} 在 {iterations} 次迭代后仍未收敛")]
    Convergence {
        algorithm: &'static str,
        iterations: usize,
    },

    #[error("顶点之间不存在路径: {from} -> {to}")]
    Disconnected { from: String, to: String },

    #[error("无效的参数: {0}")]
    InvalidArgument(String),

    #[error("无效的配置: {0}")]
    InvalidConfig(String),

    #[error("序列化错误: {0}")]
    SerializationError(String),
}

/// 错误分类，便于调用方按类别处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidWeight,
    UnsupportedOperation,
    DegenerateGraph,
    Convergence,
    Disconnected,
    InvalidArgument,
    InvalidConfig,
    Serialization,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::VertexNotFound(_) | Error::EdgeNotFound(_) => ErrorKind::NotFound,
            Error::InvalidWeight(_) => ErrorKind::InvalidWeight,
            Error::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            Error::DegenerateGraph(_) => ErrorKind::DegenerateGraph,
            Error::Convergence { .. } => ErrorKind::Convergence,
            Error::Disconnected { .. } => ErrorKind::Disconnected,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Error::SerializationError(_) => ErrorKind::Serialization,
        }
    }

    pub(crate) fn vertex_not_found<K: std::fmt::Debug>(key: &K) -> Self {
        Error::VertexNotFound(format!("{:?}", key))
    }

    pub(crate) fn disconnected<K: std::fmt::Debug>(from: &K, to: &K) -> Self {
        Error::Disconnected {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
