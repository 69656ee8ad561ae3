//! 仿真后端接口
//!
//! 真正创建交换机、主机和链路的系统不属于本 crate，只通过这个 trait 使用。

use crate::net::{Dpid, TopologyGraph};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 远程 SDN 控制器地址；只会原样传给后端
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controller {
    pub name: String,
    pub ip: String,
    pub port: u16,
}

impl Controller {
    pub fn remote(ip: impl Into<String>, port: u16) -> Self {
        Self {
            name: "c0".to_string(),
            ip: ip.into(),
            port,
        }
    }

    /// OVS `set-controller` 使用的目标格式
    pub fn target(&self) -> String {
        format!("tcp:{}:{}", self.ip, self.port)
    }
}

impl fmt::Display for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.target())
    }
}

/// 后端拒绝请求或执行失败
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to run `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{cmd}` exited with status {status:?}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{0}")]
    Rejected(String),
}

/// 仿真后端
///
/// 创建类请求应当是幂等的：重复创建同一个实体不产生新的副作用。
pub trait EmulationBackend {
    /// 创建任何实体之前检查整张图能否在本后端上实例化
    fn preflight(&mut self, _graph: &TopologyGraph) -> Result<(), BackendError> {
        Ok(())
    }

    fn create_switch(&mut self, id: &str, dpid: Dpid, protocol: &str) -> Result<(), BackendError>;

    fn create_host(&mut self, id: &str) -> Result<(), BackendError>;

    fn create_link(&mut self, a: &str, b: &str) -> Result<(), BackendError>;

    /// 启动交换机并指定它的控制器集合
    fn start_switch(&mut self, id: &str, controllers: &[Controller]) -> Result<(), BackendError>;

    /// 阻塞直到所有已启动交换机的控制通道连通；超时返回 `Ok(false)`
    fn wait_connected(&mut self, timeout: Duration) -> Result<bool, BackendError>;

    /// 销毁所有已创建的实体
    fn teardown(&mut self) -> Result<(), BackendError>;
}
