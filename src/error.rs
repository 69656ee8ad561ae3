//! 错误类型
//!
//! 生成阶段只会产生 `InvalidParameter` / `Graph`，且一定发生在任何后端调用之前；
//! 其余变体都来自实例化阶段。

use std::path::PathBuf;
use std::time::Duration;

use crate::net::GraphError;
use crate::realize::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum TopoError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("controller unreachable: switches not connected within {timeout:?}")]
    ControllerUnreachable { timeout: Duration },

    #[error("backend request `{op}` failed for `{target}`: {source}")]
    BackendRequestFailed {
        op: &'static str,
        target: String,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("interactive session failed: {0}")]
    Session(#[from] std::io::Error),

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("interrupted by Ctrl-C")]
    Interrupted,

    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl TopoError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        TopoError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, TopoError::InvalidParameter { .. })
    }
}
