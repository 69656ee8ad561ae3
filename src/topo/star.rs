//! Star 拓扑构建
//!
//! 一台中心交换机，所有主机直接连到它。

use super::ident::Slot;
use super::{MAX_NODES, ShapeGenerator};
use crate::error::TopoError;
use crate::net::{GraphBuilder, GraphError, NodeKind, TopologyGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Star {
    pub num_hosts: usize,
}

impl Star {
    pub fn new(num_hosts: usize) -> Self {
        Self { num_hosts }
    }
}

impl ShapeGenerator for Star {
    fn shape(&self) -> &'static str {
        "star"
    }

    fn validate(&self) -> Result<(), TopoError> {
        let max = MAX_NODES - 1;
        if self.num_hosts < 1 || self.num_hosts > max {
            return Err(TopoError::invalid(
                "num_hosts",
                format!("must be in 1..={max}, got {}", self.num_hosts),
            ));
        }
        Ok(())
    }

    fn capacity(&self) -> (usize, usize) {
        (self.num_hosts + 1, self.num_hosts)
    }

    fn populate(&self, builder: &mut GraphBuilder) -> Result<(), GraphError> {
        let hub = Slot::StarSwitch.to_node();
        let hub_name = hub.id.clone();
        builder.add_node(hub)?;

        for index in 1..=self.num_hosts as u32 {
            let host = Slot::Host { index }.to_node();
            let host_name = host.id.clone();
            builder.add_node(host)?;
            builder.connect(&host_name, &hub_name)?;
        }
        Ok(())
    }

    fn verify(&self, graph: &TopologyGraph) -> Result<(), GraphError> {
        for node in graph.nodes() {
            let expected = match node.kind {
                NodeKind::StarSwitch => self.num_hosts,
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
