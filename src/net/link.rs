//! 链路类型
//!
//! 无向链路：一对节点名称，不允许自环。

use serde::{Deserialize, Serialize};

/// 无向链路
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub a: String,
    pub b: String,
}

impl Link {
    /// 创建新链路（保留调用方给出的端点顺序，用于确定性的实例化顺序）
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// 与端点顺序无关的键：(a, b) 与 (b, a) 相同
    pub fn key(&self) -> (&str, &str) {
        if self.a <= self.b {
            (self.a.as_str(), self.b.as_str())
        } else {
            (self.b.as_str(), self.a.as_str())
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }
}
