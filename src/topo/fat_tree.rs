//! Fat-tree 拓扑构建
//!
//! k 个 pod，(k/2)² 台核心交换机；每个 pod 有 k/2 台汇聚和 k/2 台边缘交换机，
//! 每台边缘交换机挂 `hosts_per_edge` 台主机。

use super::ident::Slot;
use super::{MAX_NODES, ShapeGenerator};
use crate::error::TopoError;
use crate::net::{GraphBuilder, GraphError, NodeKind, TopologyGraph};
use tracing::debug;

/// 每台边缘交换机默认挂载的主机数
pub const DEFAULT_HOSTS_PER_EDGE: usize = 2;

/// k 的上限：保证 pod 与序号都落在 dpid 布局内
pub const MAX_K: usize = 254;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatTree {
    pub k: usize,
    pub hosts_per_edge: usize,
}

impl FatTree {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            hosts_per_edge: DEFAULT_HOSTS_PER_EDGE,
        }
    }

    pub fn with_hosts_per_edge(mut self, hosts_per_edge: usize) -> Self {
        self.hosts_per_edge = hosts_per_edge;
        self
    }

    fn half(&self) -> usize {
        self.k / 2
    }

    pub fn core_count(&self) -> usize {
        self.half() * self.half()
    }

    /// 汇聚层（和边缘层）交换机总数
    pub fn pod_switch_count(&self) -> usize {
        self.k * self.half()
    }

    pub fn host_count(&self) -> usize {
        self.pod_switch_count() * self.hosts_per_edge
    }

    pub fn link_count(&self) -> usize {
        let half = self.half();
        // 主机链路 + pod 内全连接 + 核心到每个 pod 各一条
        self.host_count() + self.k * half * half + self.core_count() * self.k
    }

    /// 核心交换机（扁平序号，从 0 开始）所属的组，即它连接的汇聚交换机序号
    pub fn core_group(&self, core: usize) -> usize {
        core / self.half()
    }
}

impl ShapeGenerator for FatTree {
    fn shape(&self) -> &'static str {
        "fat_tree"
    }

    fn validate(&self) -> Result<(), TopoError> {
        if self.k == 0 {
            return Err(TopoError::invalid("k", "must be positive"));
        }
        if self.k % 2 != 0 {
            return Err(TopoError::invalid(
                "k",
                format!("must be even, got {}", self.k),
            ));
        }
        if self.k > MAX_K {
            return Err(TopoError::invalid(
                "k",
                format!("must be at most {MAX_K}, got {}", self.k),
            ));
        }
        if self.hosts_per_edge == 0 {
            return Err(TopoError::invalid("hosts_per_edge", "must be positive"));
        }
        // k 已有上限，交换机数不会溢出；主机数先按剩余额度折算
        let switches = self.core_count() + 2 * self.pod_switch_count();
        let max = (MAX_NODES - switches) / self.pod_switch_count();
        if self.hosts_per_edge > max {
            return Err(TopoError::invalid(
                "hosts_per_edge",
                format!(
                    "at most {max} for k={} ({MAX_NODES} nodes in total), got {}",
                    self.k, self.hosts_per_edge
                ),
            ));
        }
        Ok(())
    }

    fn capacity(&self) -> (usize, usize) {
        let nodes = self.core_count() + 2 * self.pod_switch_count() + self.host_count();
        (nodes, self.link_count())
    }

    fn populate(&self, builder: &mut GraphBuilder) -> Result<(), GraphError> {
        let k = self.k as u32;
        let half = self.half() as u32;
        let hosts_per_edge = self.hosts_per_edge as u32;

        for index in 1..=half * half {
            builder.add_node(Slot::Core { index }.to_node())?;
        }
        debug!(count = half * half, "核心交换机已添加");

        for pod in 1..=k {
            for index in 1..=half {
                builder.add_node(Slot::Aggregation { pod, index }.to_node())?;
            }
            for index in 1..=half {
                builder.add_node(Slot::Edge { pod, index }.to_node())?;
            }

            for edge in 1..=half {
                let edge_name = Slot::Edge { pod, index: edge }.name();
                for seq in 1..=hosts_per_edge {
                    let host = Slot::EdgeHost { pod, edge, seq }.to_node();
                    let host_name = host.id.clone();
                    builder.add_node(host)?;
                    builder.connect(&host_name, &edge_name)?;
                }
            }
            debug!(pod, "pod 交换机与主机已添加");
        }

        // pod 内：每台汇聚交换机连接本 pod 的每台边缘交换机
        for pod in 1..=k {
            for agg in 1..=half {
                let agg_name = Slot::Aggregation { pod, index: agg }.name();
                for edge in 1..=half {
                    let edge_name = Slot::Edge { pod, index: edge }.name();
                    builder.connect(&agg_name, &edge_name)?;
                }
            }
        }

        // 第 g 组核心交换机连接每个 pod 中序号为 g 的汇聚交换机
        for core in 0..self.core_count() {
            let core_name = Slot::Core {
                index: core as u32 + 1,
            }
            .name();
            let group = self.core_group(core) as u32;
            for pod in 1..=k {
                let agg_name = Slot::Aggregation {
                    pod,
                    index: group + 1,
                }
                .name();
                builder.connect(&core_name, &agg_name)?;
            }
        }

        Ok(())
    }

    /// 核心与汇聚交换机度数均为 k，边缘交换机为 k/2 + hosts_per_edge，主机为 1
    fn verify(&self, graph: &TopologyGraph) -> Result<(), GraphError> {
        for node in graph.nodes() {
            let expected = match node.kind {
                NodeKind::CoreSwitch | NodeKind::AggregationSwitch => self.k,
                NodeKind::EdgeSwitch => self.half() + self.hosts_per_edge,
                NodeKind::Host => 1,
                NodeKind::RingSwitch | NodeKind::StarSwitch => continue,
            };
            let actual = graph.degree(&node.id).unwrap_or(0);
            if actual != expected {
                return Err(GraphError::DegreeMismatch {
                    node: node.id.clone(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}
