//! 标识符分配
//!
//! 把拓扑中的位置（层、pod、序号）映射为节点名称和 dpid。
//! 映射是位置的纯函数：没有计数器，与遍历顺序无关，
//! 同样的参数重复生成得到完全相同的标识符。
//!
//! dpid 布局（高位到低位）：
//!
//! ```text
//! | layer tag: 8 | reserved: 8 | pod: 16 | index: 32 |
//! ```
//!
//! layer tag 从 1 开始，因此所有交换机的 dpid 都非零；
//! 只要 pod 不超过 16 bit，不同位置一定得到不同 dpid。

use crate::net::{Dpid, Node, NodeKind};

/// 拓扑中的一个位置；pod 与 index 均从 1 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Core { index: u32 },
    Aggregation { pod: u32, index: u32 },
    Edge { pod: u32, index: u32 },
    /// 挂在 `Edge { pod, index: edge }` 下的第 `seq` 台主机
    EdgeHost { pod: u32, edge: u32, seq: u32 },
    RingSwitch { index: u32 },
    StarSwitch,
    Host { index: u32 },
}

impl Slot {
    pub fn kind(self) -> NodeKind {
        match self {
            Slot::Core { .. } => NodeKind::CoreSwitch,
            Slot::Aggregation { .. } => NodeKind::AggregationSwitch,
            Slot::Edge { .. } => NodeKind::EdgeSwitch,
            Slot::RingSwitch { .. } => NodeKind::RingSwitch,
            Slot::StarSwitch => NodeKind::StarSwitch,
            Slot::EdgeHost { .. } | Slot::Host { .. } => NodeKind::Host,
        }
    }

    /// 节点名称
    pub fn name(self) -> String {
        match self {
            Slot::Core { index } => format!("c{index}"),
            Slot::Aggregation { pod, index } => format!("a{pod}_{index}"),
            Slot::Edge { pod, index } => format!("e{pod}_{index}"),
            Slot::EdgeHost { pod, edge, seq } => format!("he{pod}_{edge}_{seq}"),
            Slot::RingSwitch { index } => format!("s{index}"),
            // ring 交换机从 s1 开始编号，中心交换机用 s0 避免重名
            Slot::StarSwitch => "s0".to_string(),
            Slot::Host { index } => format!("h{index}"),
        }
    }

    /// datapath 标识符；主机没有
    pub fn dpid(self) -> Option<Dpid> {
        let (tag, pod, index) = match self {
            Slot::Core { index } => (1u64, 0, index),
            Slot::Aggregation { pod, index } => (2, pod, index),
            Slot::Edge { pod, index } => (3, pod, index),
            Slot::RingSwitch { index } => (4, 0, index),
            Slot::StarSwitch => (5, 0, 1),
            Slot::EdgeHost { .. } | Slot::Host { .. } => return None,
        };
        debug_assert!(pod <= u16::MAX as u32, "pod {pod} overflows dpid layout");
        Some(Dpid(tag << 56 | (pod as u64) << 32 | index as u64))
    }

    /// 生成带坐标的节点
    pub fn to_node(self) -> Node {
        let name = self.name();
        let node = match self.dpid() {
            Some(dpid) => Node::switch(name, self.kind(), dpid),
            None => Node::host(name),
        };
        match self {
            Slot::Core { index } => node.at(None, Some(index)),
            Slot::Aggregation { pod, index } | Slot::Edge { pod, index } => {
                node.at(Some(pod), Some(index))
            }
            Slot::EdgeHost { pod, seq, .. } => node.at(Some(pod), Some(seq)),
            Slot::RingSwitch { .. } | Slot::StarSwitch | Slot::Host { .. } => node,
        }
    }
}
