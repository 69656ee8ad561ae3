//! 拓扑实例化器
//!
//! 顺序：先按存储顺序创建所有节点，再创建所有链路，然后逐个启动交换机，
//! 等待控制通道连通，进入交互会话，最后 teardown。
//! 无论哪一步失败或被 Ctrl-C 打断，teardown 都恰好执行一次。

use std::time::Duration;

use super::backend::{BackendError, Controller, EmulationBackend};
use super::interrupt::Interrupt;
use super::session::InteractiveSession;
use crate::error::TopoError;
use crate::net::TopologyGraph;
use tracing::{debug, info, warn};

/// 实例化选项
#[derive(Debug, Clone)]
pub struct RealizeOpts {
    /// 交换机使用的南向协议版本
    pub protocol: String,
    pub controllers: Vec<Controller>,
    /// 等待控制通道连通的上限
    pub connect_timeout: Duration,
    pub interrupt: Interrupt,
}

impl Default for RealizeOpts {
    fn default() -> Self {
        Self {
            protocol: "OpenFlow13".to_string(),
            controllers: Vec::new(),
            connect_timeout: Duration::from_secs(30),
            interrupt: Interrupt::new(),
        }
    }
}

/// 实例化结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RealizeReport {
    pub switches: usize,
    pub hosts: usize,
    pub links: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TopologyRealizer {
    opts: RealizeOpts,
}

impl TopologyRealizer {
    pub fn new(opts: RealizeOpts) -> Self {
        Self { opts }
    }

    /// 实例化拓扑图并运行交互会话；拓扑图在此被消费
    #[tracing::instrument(skip_all, fields(shape = graph.shape()))]
    pub fn realize<B, S>(
        &self,
        graph: TopologyGraph,
        backend: &mut B,
        session: &mut S,
    ) -> Result<RealizeReport, TopoError>
    where
        B: EmulationBackend + ?Sized,
        S: InteractiveSession + ?Sized,
    {
        graph.validate()?;

        let mut guard = TeardownGuard::new(backend);
        guard
            .backend()
            .preflight(&graph)
            .map_err(request_failed("preflight", graph.shape()))?;
        let report = self.bring_up(&graph, guard.backend())?;

        info!("🖥️  进入交互会话");
        session.run(&graph)?;

        info!("🧹 拆除拓扑");
        guard.finish().map_err(request_failed("teardown", graph.shape()))?;
        self.check_interrupt()?;
        Ok(report)
    }

    fn check_interrupt(&self) -> Result<(), TopoError> {
        if self.opts.interrupt.is_triggered() {
            return Err(TopoError::Interrupted);
        }
        Ok(())
    }

    fn bring_up<B>(&self, graph: &TopologyGraph, backend: &mut B) -> Result<RealizeReport, TopoError>
    where
        B: EmulationBackend + ?Sized,
    {
        let mut report = RealizeReport::default();

        for node in graph.nodes() {
            self.check_interrupt()?;
            match node.dpid {
                Some(dpid) => {
                    debug!(id = %node.id, %dpid, kind = %node.kind, "创建交换机");
                    backend
                        .create_switch(&node.id, dpid, &self.opts.protocol)
                        .map_err(request_failed("create_switch", &node.id))?;
                    report.switches += 1;
                }
                None => {
                    debug!(id = %node.id, "创建主机");
                    backend
                        .create_host(&node.id)
                        .map_err(request_failed("create_host", &node.id))?;
                    report.hosts += 1;
                }
            }
        }

        for link in graph.links() {
            self.check_interrupt()?;
            debug!(a = %link.a, b = %link.b, "创建链路");
            backend
                .create_link(&link.a, &link.b)
                .map_err(request_failed("create_link", &format!("{}<->{}", link.a, link.b)))?;
            report.links += 1;
        }

        for switch in graph.switches() {
            self.check_interrupt()?;
            backend
                .start_switch(&switch.id, &self.opts.controllers)
                .map_err(request_failed("start_switch", &switch.id))?;
        }
        info!(
            switches = report.switches,
            hosts = report.hosts,
            links = report.links,
            controllers = self.opts.controllers.len(),
            "交换机已启动"
        );

        let timeout = self.opts.connect_timeout;
        info!(?timeout, "⏳ 等待控制通道连通");
        let connected = backend
            .wait_connected(timeout)
            .map_err(request_failed("wait_connected", graph.shape()))?;
        self.check_interrupt()?;
        if !connected {
            return Err(TopoError::ControllerUnreachable { timeout });
        }
        info!("✅ 控制通道已连通");

        Ok(report)
    }
}

fn request_failed<'a>(op: &'static str, target: &'a str) -> impl FnOnce(BackendError) -> TopoError + 'a {
    move |source| TopoError::BackendRequestFailed {
        op,
        target: target.to_string(),
        source,
    }
}

/// 持有后端会话期间负责 teardown：正常结束走 `finish`，提前返回或 panic 时由 Drop 执行
struct TeardownGuard<'a, B: EmulationBackend + ?Sized> {
    backend: &'a mut B,
    armed: bool,
}

impl<'a, B: EmulationBackend + ?Sized> TeardownGuard<'a, B> {
    fn new(backend: &'a mut B) -> Self {
        Self {
            backend,
            armed: true,
        }
    }

    fn backend(&mut self) -> &mut B {
        &mut *self.backend
    }

    fn finish(mut self) -> Result<(), BackendError> {
        self.armed = false;
        self.backend.teardown()
    }
}

impl<B: EmulationBackend + ?Sized> Drop for TeardownGuard<'_, B> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if let Err(err) = self.backend.teardown() {
            warn!(%err, "teardown 失败");
        }
    }
}
