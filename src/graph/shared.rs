//! 多线程共享的图
//!
//! 单写多读：分析引擎在读锁内运行，修改在写锁内完成。

use super::graph::Graph;
use super::vertex::VertexKey;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// 读写锁保护的图句柄，克隆开销为一次引用计数
#[derive(Debug)]
pub struct SharedGraph<K: VertexKey> {
    inner: Arc<RwLock<Graph<K>>>,
}

impl<K: VertexKey> SharedGraph<K> {
    pub fn new(graph: Graph<K>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// 获取读锁
    pub fn read(&self) -> RwLockReadGuard<'_, Graph<K>> {
        self.inner.read()
    }

    /// 获取写锁
    pub fn write(&self) -> RwLockWriteGuard<'_, Graph<K>> {
        self.inner.write()
    }

    /// 在读锁内执行分析
    pub fn with_read<R>(&self, f: impl FnOnce(&Graph<K>) -> R) -> R {
        f(&*self.inner.read())
    }

    /// 在写锁内执行修改
    pub fn with_write<R>(&self, f: impl FnOnce(&mut Graph<K>) -> R) -> R {
        f(&mut *self.inner.write())
    }
}

impl<K: VertexKey> Clone for SharedGraph<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: VertexKey> From<Graph<K>> for SharedGraph<K> {
    fn from(graph: Graph<K>) -> Self {
        Self::new(graph)
    }
}
