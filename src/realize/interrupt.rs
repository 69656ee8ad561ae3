//! Ctrl-C 处理
//!
//! 收到 SIGINT 后只置位标志，不直接退出进程；实例化器、控制通道轮询和交互会话
//! 看到标志后各自收尾，teardown 仍然走正常路径。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

/// 可在线程间共享的中断标志
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册进程级 SIGINT 处理器；每个进程只能调用一次
    pub fn install() -> Result<Self, ctrlc::Error> {
        let interrupt = Self::new();
        let flag = interrupt.clone();
        ctrlc::set_handler(move || {
            warn!("⚠️ 收到中断信号，准备拆除拓扑");
            flag.trigger();
        })?;
        Ok(interrupt)
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
