//! 节点类型
//!
//! 定义拓扑节点，包括节点类别（各层交换机、主机）与位置坐标。

use super::id::Dpid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    CoreSwitch,
    AggregationSwitch,
    EdgeSwitch,
    RingSwitch,
    StarSwitch,
    Host,
}

impl NodeKind {
    /// 除主机以外都是交换机，需要 dpid
    pub fn is_switch(self) -> bool {
        !matches!(self, NodeKind::Host)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::CoreSwitch => "core_switch",
            NodeKind::AggregationSwitch => "aggregation_switch",
            NodeKind::EdgeSwitch => "edge_switch",
            NodeKind::RingSwitch => "ring_switch",
            NodeKind::StarSwitch => "star_switch",
            NodeKind::Host => "host",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 拓扑节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// 拓扑生命周期内稳定的可读名称
    pub id: String,
    pub kind: NodeKind,
    /// 仅交换机有 dpid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpid: Option<Dpid>,
    /// fat-tree 中的 pod 编号（从 1 开始）；ring/star 为 None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl Node {
    /// 创建交换机节点
    pub fn switch(id: impl Into<String>, kind: NodeKind, dpid: Dpid) -> Self {
        debug_assert!(kind.is_switch());
        Self {
            id: id.into(),
            kind,
            dpid: Some(dpid),
            pod: None,
            index: None,
        }
    }

    /// 创建主机节点
    pub fn host(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Host,
            dpid: None,
            pod: None,
            index: None,
        }
    }

    pub fn at(mut self, pod: Option<u32>, index: Option<u32>) -> Self {
        self.pod = pod;
        self.index = index;
        self
    }

    pub fn is_switch(&self) -> bool {
        self.kind.is_switch()
    }
}
