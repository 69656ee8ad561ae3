//! Open vSwitch 后端
//!
//! 交换机是 OVS bridge，主机是 network namespace，链路是 veth pair
//! （接口名为 `<节点>-eth<N>`）。主机按创建顺序编号 N，得到 `10.0.0.0/8`
//! 中的第 N 个地址和 MAC `00:00:00:00:00:NN`。所有外部命令都经过
//! `CommandRunner`，便于在没有 OVS 的环境里替换。

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use super::backend::{BackendError, Controller, EmulationBackend};
use super::interrupt::Interrupt;
use crate::net::{Dpid, TopologyGraph};
use tracing::{debug, info, trace, warn};

/// 外部命令执行器
pub trait CommandRunner {
    /// 运行命令，成功时返回去掉首尾空白的 stdout
    fn run(&mut self, program: &str, args: &[String]) -> Result<String, BackendError>;
}

/// 直接在宿主机上执行命令
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<String, BackendError> {
        let cmd = format!("{program} {}", args.join(" "));
        trace!(%cmd, "执行命令");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| BackendError::Spawn {
                cmd: cmd.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(BackendError::CommandFailed {
                cmd,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Linux 接口名上限（IFNAMSIZ 减去结尾的 NUL）
pub const MAX_IFNAME_LEN: usize = 15;

/// 主机地址所在网段 10.0.0.0/8
const HOST_NET: u32 = 0x0a00_0000;
const HOST_PREFIX_LEN: u32 = 8;

/// 第 `seq` 台主机（从 1 开始）的 IPv4 地址和 MAC
pub fn host_address(seq: u32) -> Option<(Ipv4Addr, String)> {
    // 去掉网络地址和广播地址
    if seq == 0 || seq >= (1 << (32 - HOST_PREFIX_LEN)) - 1 {
        return None;
    }
    let ip = Ipv4Addr::from(HOST_NET | seq);
    let bytes = u64::from(seq).to_be_bytes();
    let mac = bytes[2..]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":");
    Some((ip, mac))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entity {
    Switch,
    Host,
}

#[derive(Debug)]
pub struct OvsBackend<R = SystemRunner> {
    runner: R,
    poll_interval: Duration,
    entities: HashMap<String, Entity>,
    /// 创建顺序，teardown 时按此顺序删除
    created: Vec<String>,
    next_port: HashMap<String, u32>,
    links: HashSet<(String, String)>,
    /// 留在根 namespace 的 veth 端，bridge 删除后不会自动消失
    root_veths: Vec<String>,
    started: Vec<String>,
    /// 主机序号，决定地址
    host_seq: HashMap<String, u32>,
    addressed: HashSet<String>,
    interrupt: Interrupt,
}

impl OvsBackend<SystemRunner> {
    pub fn system(poll_interval: Duration) -> Self {
        Self::new(SystemRunner, poll_interval)
    }
}

impl<R: CommandRunner> OvsBackend<R> {
    pub fn new(runner: R, poll_interval: Duration) -> Self {
        Self {
            runner,
            poll_interval,
            entities: HashMap::new(),
            created: Vec::new(),
            next_port: HashMap::new(),
            links: HashSet::new(),
            root_veths: Vec::new(),
            started: Vec::new(),
            host_seq: HashMap::new(),
            addressed: HashSet::new(),
            interrupt: Interrupt::new(),
        }
    }

    /// 等待控制通道时遇到中断立即返回
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    fn vsctl<I, S>(&mut self, args: I) -> Result<String, BackendError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.runner.run("ovs-vsctl", &args)
    }

    fn ip<I, S>(&mut self, args: I) -> Result<String, BackendError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.runner.run("ip", &args)
    }

    /// 为节点分配下一个接口名
    fn next_intf(&mut self, node: &str) -> String {
        let port = self.next_port.entry(node.to_string()).or_insert(0);
        let name = format!("{node}-eth{port}");
        *port += 1;
        name
    }

    fn entity(&self, id: &str) -> Result<Entity, BackendError> {
        self.entities
            .get(id)
            .copied()
            .ok_or_else(|| BackendError::Rejected(format!("unknown node `{id}`")))
    }

    fn attach(&mut self, node: &str, kind: Entity, intf: &str) -> Result<(), BackendError> {
        match kind {
            Entity::Switch => {
                self.vsctl(["--may-exist", "add-port", node, intf])?;
                self.ip(["link", "set", intf, "up"])?;
            }
            Entity::Host => {
                self.ip(["link", "set", intf, "netns", node])?;
                // 只给主机的第一个接口配地址
                if !self.addressed.contains(node) {
                    self.assign_address(node, intf)?;
                }
                self.ip(["-n", node, "link", "set", intf, "up"])?;
            }
        }
        Ok(())
    }

    fn assign_address(&mut self, host: &str, intf: &str) -> Result<(), BackendError> {
        let seq = self.host_seq.get(host).copied().unwrap_or_default();
        let (ip, mac) = host_address(seq)
            .ok_or_else(|| BackendError::Rejected(format!("no address left for host `{host}`")))?;
        let cidr = format!("{ip}/{HOST_PREFIX_LEN}");

        self.ip(["-n", host, "link", "set", intf, "address", mac.as_str()])?;
        self.ip(["-n", host, "addr", "add", cidr.as_str(), "dev", intf])?;
        debug!(host, intf, %cidr, %mac, "主机地址已配置");
        self.addressed.insert(host.to_string());
        Ok(())
    }

    /// bridge 上所有控制器都报告 is_connected=true
    fn connected(&mut self, bridge: &str) -> Result<bool, BackendError> {
        let raw = self.vsctl(["--", "get", "Bridge", bridge, "controller"])?;
        let uuids: Vec<String> = raw
            .trim_matches(|c| c == '[' || c == ']')
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if uuids.is_empty() {
            return Ok(false);
        }
        for uuid in &uuids {
            let state = self.vsctl(["get", "Controller", uuid.as_str(), "is_connected"])?;
            if state != "true" {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn all_connected(&mut self) -> Result<bool, BackendError> {
        let started = self.started.clone();
        for bridge in &started {
            if !self.connected(bridge)? {
                trace!(%bridge, "控制通道尚未连通");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<R: CommandRunner> EmulationBackend for OvsBackend<R> {
    /// 接口名 `<节点>-eth<度数-1>` 与 bridge 名都不能超过内核上限，
    /// 主机数不能超过地址段容量
    fn preflight(&mut self, graph: &TopologyGraph) -> Result<(), BackendError> {
        for node in graph.nodes() {
            if node.is_switch() && node.id.len() > MAX_IFNAME_LEN {
                return Err(BackendError::Rejected(format!(
                    "bridge name `{}` exceeds {MAX_IFNAME_LEN} bytes",
                    node.id
                )));
            }
            let degree = graph.degree(&node.id).unwrap_or_default();
            if degree == 0 {
                continue;
            }
            let longest = format!("{}-eth{}", node.id, degree - 1);
            if longest.len() > MAX_IFNAME_LEN {
                return Err(BackendError::Rejected(format!(
                    "interface name `{longest}` exceeds {MAX_IFNAME_LEN} bytes"
                )));
            }
        }
        let hosts = graph.hosts().count();
        if hosts > 0 && u32::try_from(hosts).ok().and_then(host_address).is_none() {
            return Err(BackendError::Rejected(format!(
                "{hosts} hosts do not fit in 10.0.0.0/{HOST_PREFIX_LEN}"
            )));
        }
        Ok(())
    }

    fn create_switch(&mut self, id: &str, dpid: Dpid, protocol: &str) -> Result<(), BackendError> {
        if self.entities.contains_key(id) {
            return Ok(());
        }
        self.vsctl([
            "--may-exist".to_string(),
            "add-br".to_string(),
            id.to_string(),
            "--".to_string(),
            "set".to_string(),
            "bridge".to_string(),
            id.to_string(),
            format!("other-config:datapath-id={}", dpid.to_hex()),
            format!("protocols={protocol}"),
            "other-config:enable-flush=true".to_string(),
            "fail-mode=secure".to_string(),
        ])?;
        self.ip(["link", "set", id, "up"])?;

        debug!(id, %dpid, protocol, "bridge 已创建");
        self.entities.insert(id.to_string(), Entity::Switch);
        self.created.push(id.to_string());
        Ok(())
    }

    fn create_host(&mut self, id: &str) -> Result<(), BackendError> {
        if self.entities.contains_key(id) {
            return Ok(());
        }
        self.ip(["netns", "add", id])?;
        self.ip(["-n", id, "link", "set", "lo", "up"])?;

        let seq = self.host_seq.len() as u32 + 1;
        debug!(id, seq, "namespace 已创建");
        self.host_seq.insert(id.to_string(), seq);
        self.entities.insert(id.to_string(), Entity::Host);
        self.created.push(id.to_string());
        Ok(())
    }

    fn create_link(&mut self, a: &str, b: &str) -> Result<(), BackendError> {
        let key = if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        if self.links.contains(&key) {
            return Ok(());
        }
        let kind_a = self.entity(a)?;
        let kind_b = self.entity(b)?;

        let intf_a = self.next_intf(a);
        let intf_b = self.next_intf(b);
        self.ip([
            "link",
            "add",
            intf_a.as_str(),
            "type",
            "veth",
            "peer",
            "name",
            intf_b.as_str(),
        ])?;
        self.attach(a, kind_a, &intf_a)?;
        self.attach(b, kind_b, &intf_b)?;

        // 删除 veth 的任意一端即可删除整对
        if kind_a == Entity::Switch {
            self.root_veths.push(intf_a.clone());
        } else if kind_b == Entity::Switch {
            self.root_veths.push(intf_b.clone());
        }

        debug!(a, b, %intf_a, %intf_b, "veth 已创建");
        self.links.insert(key);
        Ok(())
    }

    fn start_switch(&mut self, id: &str, controllers: &[Controller]) -> Result<(), BackendError> {
        if self.entity(id)? != Entity::Switch {
            return Err(BackendError::Rejected(format!("`{id}` is not a switch")));
        }
        let mut args = vec!["set-controller".to_string(), id.to_string()];
        args.extend(controllers.iter().map(Controller::target));
        self.vsctl(args)?;

        if !self.started.iter().any(|s| s == id) {
            self.started.push(id.to_string());
        }
        Ok(())
    }

    fn wait_connected(&mut self, timeout: Duration) -> Result<bool, BackendError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.all_connected()? {
                info!(switches = self.started.len(), "所有交换机已连上控制器");
                return Ok(true);
            }
            if self.interrupt.is_triggered() {
                warn!("等待控制通道时被中断");
                return Ok(false);
            }
            let now = Instant::now();
            if now >= deadline {
                warn!(?timeout, "等待控制通道超时");
                return Ok(false);
            }
            thread::sleep(self.poll_interval.min(deadline - now));
        }
    }

    fn teardown(&mut self) -> Result<(), BackendError> {
        let mut first_err = None;

        for intf in std::mem::take(&mut self.root_veths) {
            // namespace 或 bridge 先行删除时 veth 可能已经不存在
            if let Err(err) = self.ip(["link", "del", intf.as_str()]) {
                debug!(%intf, %err, "veth 已不存在");
            }
        }

        for id in std::mem::take(&mut self.created) {
            let kind = self.entities.get(&id).copied();
            let result = match kind {
                Some(Entity::Switch) => self.vsctl(["--if-exists", "del-br", id.as_str()]),
                Some(Entity::Host) => self.ip(["netns", "del", id.as_str()]),
                None => continue,
            };
            if let Err(err) = result {
                warn!(%id, %err, "删除失败");
                first_err.get_or_insert(err);
            }
        }

        self.entities.clear();
        self.next_port.clear();
        self.links.clear();
        self.started.clear();
        self.host_seq.clear();
        self.addressed.clear();

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
