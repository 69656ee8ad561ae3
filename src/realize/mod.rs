//! 拓扑实例化
//!
//! 把生成好的 `TopologyGraph` 翻译成对外部仿真后端的请求，
//! 等待控制通道连通后交给交互会话，最后保证执行一次 teardown。

mod backend;
mod interrupt;
mod ovs;
mod realizer;
mod recording;
mod session;

pub use backend::{BackendError, Controller, EmulationBackend};
pub use interrupt::Interrupt;
pub use ovs::{CommandRunner, MAX_IFNAME_LEN, OvsBackend, SystemRunner, host_address};
pub use realizer::{RealizeOpts, RealizeReport, TopologyRealizer};
pub use recording::{BackendCall, RecordingBackend};
pub use session::{ConsoleSession, InteractiveSession, NoSession};
