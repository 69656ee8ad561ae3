//! Ring 拓扑构建
//!
//! 每个位置一台交换机和一台主机，交换机首尾相连成环：s1-s2-...-sn-s1。

use super::ident::Slot;
use super::{MAX_NODES, ShapeGenerator};
use crate::error::TopoError;
use crate::net::{GraphBuilder, GraphError, NodeKind, TopologyGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    pub num_nodes: usize,
}

impl Ring {
    pub fn new(num_nodes: usize) -> Self {
        Self { num_nodes }
    }

    /// 交换机之间的链路数。n = 1 没有自环，n = 2 只有一条链路
    pub fn ring_link_count(&self) -> usize {
        match self.num_nodes {
            0 | 1 => 0,
            2 => 1,
            n => n,
        }
    }
}

impl ShapeGenerator for Ring {
    fn shape(&self) -> &'static str {
        "ring"
    }

    fn validate(&self) -> Result<(), TopoError> {
        // 每个位置一台交换机加一台主机
        let max = MAX_NODES / 2;
        if self.num_nodes < 1 || self.num_nodes > max {
            return Err(TopoError::invalid(
                "num_nodes",
                format!("must be in 1..={max}, got {}", self.num_nodes),
            ));
        }
        Ok(())
    }

    fn capacity(&self) -> (usize, usize) {
        (2 * self.num_nodes, self.num_nodes + self.ring_link_count())
    }

    fn populate(&self, builder: &mut GraphBuilder) -> Result<(), GraphError> {
        let n = self.num_nodes as u32;

        for index in 1..=n {
            builder.add_node(Slot::RingSwitch { index }.to_node())?;
        }
        for index in 1..=n {
            let host = Slot::Host { index }.to_node();
            let host_name = host.id.clone();
            builder.add_node(host)?;
            builder.connect(&host_name, &Slot::RingSwitch { index }.name())?;
        }

        for index in 1..=n {
            let next = index % n + 1;
            // n = 2 时 s2-s1 与 s1-s2 是同一条链路
            if next == index || (n == 2 && index == 2) {
                continue;
            }
            builder.connect(
                &Slot::RingSwitch { index }.name(),
                &Slot::RingSwitch { index: next }.name(),
            )?;
        }
        Ok(())
    }

    fn verify(&self, graph: &TopologyGraph) -> Result<(), GraphError> {
        // 一条主机链路 + 环上的邻居（n = 1 没有，n = 2 只有一个）
        let switch_degree = self.num_nodes.min(3);
        for node in graph.nodes() {
            let expected = match node.kind {
                NodeKind::RingSwitch => switch_degree,
                _ => 1,
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
