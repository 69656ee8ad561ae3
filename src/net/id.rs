//! 标识符类型
//!
//! 定义交换机的 datapath 标识符（dpid）。

use serde::{Deserialize, Serialize};
use std::fmt;

/// datapath 标识符：交换机向控制器呈现的 64-bit 编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dpid(pub u64);

impl Dpid {
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// OVS `other-config:datapath-id` 需要的 16 位十六进制形式
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Display for Dpid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
