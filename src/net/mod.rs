//! 拓扑数据模型
//!
//! 此模块包含拓扑图的核心组件：节点、链路、dpid 以及带不变量检查的图结构。

// 子模块声明
mod graph;
mod id;
mod link;
mod node;

// 重新导出公共接口
pub use graph::{GraphBuilder, GraphError, TopologyGraph};
pub use id::Dpid;
pub use link::Link;
pub use node::{Node, NodeKind};
