//! 拓扑图
//!
//! `GraphBuilder` 负责一次性构建并在每一步检查不变量；
//! `build()` 之后得到不可变的 `TopologyGraph`，只能被读取和实例化。

use std::collections::{HashMap, HashSet};

use super::id::Dpid;
use super::link::Link;
use super::node::{Node, NodeKind};
use serde::Serialize;
use tracing::{debug, trace};

/// 拓扑图不变量被破坏
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),

    #[error("link endpoint `{0}` is not a node")]
    UnknownNode(String),

    #[error("self-link on `{0}`")]
    SelfLink(String),

    #[error("duplicate link {a} <-> {b}")]
    DuplicateLink { a: String, b: String },

    #[error("switch `{0}` has no dpid")]
    MissingDpid(String),

    #[error("switch `{0}` has a zero dpid")]
    ZeroDpid(String),

    #[error("dpid {dpid} is shared by `{first}` and `{second}`")]
    DuplicateDpid {
        dpid: Dpid,
        first: String,
        second: String,
    },

    #[error("`{node}` has degree {actual}, expected {expected}")]
    DegreeMismatch {
        node: String,
        expected: usize,
        actual: usize,
    },
}

/// 拓扑图构建器
#[derive(Debug, Default)]
pub struct GraphBuilder {
    shape: String,
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    links: Vec<Link>,
    /// 无序端点对，用于拒绝平行链路
    pairs: HashSet<(usize, usize)>,
    dpids: HashMap<Dpid, usize>,
}

impl GraphBuilder {
    pub fn new(shape: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            ..Self::default()
        }
    }

    /// 预留容量（生成器事先知道节点和链路数量）
    pub fn with_capacity(mut self, nodes: usize, links: usize) -> Self {
        self.nodes.reserve(nodes);
        self.index.reserve(nodes);
        self.links.reserve(links);
        self.pairs.reserve(links);
        self
    }

    /// 添加节点
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        if node.is_switch() {
            let dpid = node
                .dpid
                .ok_or_else(|| GraphError::MissingDpid(node.id.clone()))?;
            if dpid.is_zero() {
                return Err(GraphError::ZeroDpid(node.id));
            }
            if let Some(&owner) = self.dpids.get(&dpid) {
                return Err(GraphError::DuplicateDpid {
                    dpid,
                    first: self.nodes[owner].id.clone(),
                    second: node.id,
                });
            }
            self.dpids.insert(dpid, self.nodes.len());
        }

        trace!(id = %node.id, kind = %node.kind, dpid = ?node.dpid, "添加节点");
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// 连接两个节点（无向链路）
    pub fn connect(&mut self, a: &str, b: &str) -> Result<(), GraphError> {
        let ia = self.lookup(a)?;
        let ib = self.lookup(b)?;
        if ia == ib {
            return Err(GraphError::SelfLink(a.to_string()));
        }
        let pair = (ia.min(ib), ia.max(ib));
        if !self.pairs.insert(pair) {
            return Err(GraphError::DuplicateLink {
                a: a.to_string(),
                b: b.to_string(),
            });
        }

        trace!(a, b, "添加链路");
        self.links.push(Link::new(a, b));
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn lookup(&self, id: &str) -> Result<usize, GraphError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    /// 冻结为不可变拓扑图
    pub fn build(self) -> TopologyGraph {
        let mut adj = vec![Vec::new(); self.nodes.len()];
        for link in &self.links {
            let ia = self.index[&link.a];
            let ib = self.index[&link.b];
            adj[ia].push(ib);
            adj[ib].push(ia);
        }

        debug!(
            shape = %self.shape,
            nodes = self.nodes.len(),
            links = self.links.len(),
            "拓扑图构建完成"
        );

        TopologyGraph {
            shape: self.shape,
            nodes: self.nodes,
            links: self.links,
            index: self.index,
            adj,
        }
    }
}

/// 不可变拓扑图：节点按插入顺序保存，链路按生成顺序保存
#[derive(Debug, Clone, Serialize)]
pub struct TopologyGraph {
    shape: String,
    nodes: Vec<Node>,
    links: Vec<Link>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    adj: Vec<Vec<usize>>,
}

impl TopologyGraph {
    /// 生成该图的形状名称（fat_tree / ring / star）
    pub fn shape(&self) -> &str {
        &self.shape
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn switches(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_switch())
    }

    pub fn hosts(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.is_switch())
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes_of_kind(kind).count()
    }

    /// 节点的度（相邻链路数）
    pub fn degree(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|&i| self.adj[i].len())
    }

    /// 相邻节点（按链路生成顺序）
    pub fn neighbors(&self, id: &str) -> Vec<&Node> {
        match self.index.get(id) {
            Some(&i) => self.adj[i].iter().map(|&j| &self.nodes[j]).collect(),
            None => Vec::new(),
        }
    }

    /// 从头重新检查通用不变量
    ///
    /// 构建器已经逐步检查过；这里供测试与实例化前的兜底使用。
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        let mut dpids: HashMap<Dpid, &str> = HashMap::new();
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
            if !node.is_switch() {
                continue;
            }
            let dpid = node
                .dpid
                .ok_or_else(|| GraphError::MissingDpid(node.id.clone()))?;
            if dpid.is_zero() {
                return Err(GraphError::ZeroDpid(node.id.clone()));
            }
            if let Some(first) = dpids.insert(dpid, &node.id) {
                return Err(GraphError::DuplicateDpid {
                    dpid,
                    first: first.to_string(),
                    second: node.id.clone(),
                });
            }
        }

        let mut pairs = HashSet::with_capacity(self.links.len());
        for link in &self.links {
            for end in [&link.a, &link.b] {
                if !ids.contains(end.as_str()) {
                    return Err(GraphError::UnknownNode(end.clone()));
                }
            }
            if link.a == link.b {
                return Err(GraphError::SelfLink(link.a.clone()));
            }
            if !pairs.insert(link.key()) {
                return Err(GraphError::DuplicateLink {
                    a: link.a.clone(),
                    b: link.b.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
