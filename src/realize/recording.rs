//! 记录型后端
//!
//! 不创建任何真实实体，只按顺序记录收到的请求。用于 `--dry-run`，
//! 也可以在指定的第 n 次调用上注入失败，检验 teardown 行为。

use std::time::Duration;

use super::backend::{BackendError, Controller, EmulationBackend};
use crate::net::Dpid;
use tracing::{debug, info};

/// 一次后端请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    CreateSwitch {
        id: String,
        dpid: Dpid,
        protocol: String,
    },
    CreateHost {
        id: String,
    },
    CreateLink {
        a: String,
        b: String,
    },
    StartSwitch {
        id: String,
        controllers: Vec<String>,
    },
    WaitConnected {
        timeout: Duration,
    },
    Teardown,
}

impl BackendCall {
    pub fn op(&self) -> &'static str {
        match self {
            BackendCall::CreateSwitch { .. } => "create_switch",
            BackendCall::CreateHost { .. } => "create_host",
            BackendCall::CreateLink { .. } => "create_link",
            BackendCall::StartSwitch { .. } => "start_switch",
            BackendCall::WaitConnected { .. } => "wait_connected",
            BackendCall::Teardown => "teardown",
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    /// 第几次调用（从 0 开始）返回错误
    fail_at: Option<usize>,
    disconnected: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 让第 `n` 次调用（从 0 开始）失败
    pub fn failing_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// 控制通道永远不会连通，`wait_connected` 返回超时
    pub fn never_connected(mut self) -> Self {
        self.disconnected = true;
        self
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn teardown_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Teardown))
            .count()
    }

    fn record(&mut self, call: BackendCall) -> Result<(), BackendError> {
        let n = self.calls.len();
        let op = call.op();
        debug!(n, op, "记录后端请求");
        self.calls.push(call);
        if self.fail_at == Some(n) {
            return Err(BackendError::Rejected(format!(
                "injected failure at call #{n} ({op})"
            )));
        }
        Ok(())
    }
}

impl EmulationBackend for RecordingBackend {
    fn create_switch(&mut self, id: &str, dpid: Dpid, protocol: &str) -> Result<(), BackendError> {
        self.record(BackendCall::CreateSwitch {
            id: id.to_string(),
            dpid,
            protocol: protocol.to_string(),
        })
    }

    fn create_host(&mut self, id: &str) -> Result<(), BackendError> {
        self.record(BackendCall::CreateHost { id: id.to_string() })
    }

    fn create_link(&mut self, a: &str, b: &str) -> Result<(), BackendError> {
        self.record(BackendCall::CreateLink {
            a: a.to_string(),
            b: b.to_string(),
        })
    }

    fn start_switch(&mut self, id: &str, controllers: &[Controller]) -> Result<(), BackendError> {
        self.record(BackendCall::StartSwitch {
            id: id.to_string(),
            controllers: controllers.iter().map(Controller::target).collect(),
        })
    }

    fn wait_connected(&mut self, timeout: Duration) -> Result<bool, BackendError> {
        self.record(BackendCall::WaitConnected { timeout })?;
        Ok(!self.disconnected)
    }

    fn teardown(&mut self) -> Result<(), BackendError> {
        info!(calls = self.calls.len(), "dry-run teardown");
        self.record(BackendCall::Teardown)
    }
}
