//! 拓扑生成
//!
//! 每种形状（fat-tree / ring / star）实现同一个 `ShapeGenerator` 约定：
//! 先检查参数，再按布线规则一次性填充 `TopologyGraph`。生成过程是纯计算，
//! 不触碰任何外部系统。

pub mod fat_tree;
pub mod ident;
pub mod ring;
pub mod star;

use crate::error::TopoError;
use crate::net::{GraphBuilder, GraphError, TopologyGraph};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use fat_tree::FatTree;
pub use ident::Slot;
pub use ring::Ring;
pub use star::Star;

/// 单个拓扑的节点数上限；超出时按参数错误处理，不去预留内存
pub const MAX_NODES: usize = 1 << 20;

/// 形状生成器
pub trait ShapeGenerator {
    /// 形状名称，写入生成的拓扑图
    fn shape(&self) -> &'static str;

    /// 参数检查；失败时不会创建任何图
    fn validate(&self) -> Result<(), TopoError>;

    /// 预计的 (节点数, 链路数)，用于预留容量
    fn capacity(&self) -> (usize, usize) {
        (0, 0)
    }

    /// 按布线规则填充拓扑图
    fn populate(&self, builder: &mut GraphBuilder) -> Result<(), GraphError>;

    /// 形状特有的不变量（如 fat-tree 的度数）
    fn verify(&self, _graph: &TopologyGraph) -> Result<(), GraphError> {
        Ok(())
    }

    /// 检查参数并生成完整的拓扑图
    fn generate(&self) -> Result<TopologyGraph, TopoError> {
        self.validate()?;

        let (nodes, links) = self.capacity();
        let mut builder = GraphBuilder::new(self.shape()).with_capacity(nodes, links);
        self.populate(&mut builder)?;
        let graph = builder.build();
        self.verify(&graph)?;

        info!(
            shape = self.shape(),
            nodes = graph.nodes().len(),
            links = graph.links().len(),
            "🧩 拓扑生成完成"
        );
        Ok(graph)
    }
}

/// 形状选择与参数（可从 JSON 读取）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeSpec {
    FatTree {
        k: usize,
        #[serde(default = "default_hosts_per_edge")]
        hosts_per_edge: usize,
    },
    Ring {
        num_nodes: usize,
    },
    Star {
        num_hosts: usize,
    },
}

fn default_hosts_per_edge() -> usize {
    fat_tree::DEFAULT_HOSTS_PER_EDGE
}

impl ShapeSpec {
    pub fn from_json(raw: &str) -> Result<Self, TopoError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn generator(&self) -> Box<dyn ShapeGenerator> {
        match *self {
            ShapeSpec::FatTree { k, hosts_per_edge } => {
                Box::new(FatTree::new(k).with_hosts_per_edge(hosts_per_edge))
            }
            ShapeSpec::Ring { num_nodes } => Box::new(Ring::new(num_nodes)),
            ShapeSpec::Star { num_hosts } => Box::new(Star::new(num_hosts)),
        }
    }

    pub fn generate(&self) -> Result<TopologyGraph, TopoError> {
        self.generator().generate()
    }
}
