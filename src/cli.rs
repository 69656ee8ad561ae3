//! 命令行公共部分
//!
//! 三个形状各有一个二进制：`<controller-ip> <controller-port> <size>`，
//! 其余选项在这里共享。

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Args;
use tracing::{error, info};

use crate::error::TopoError;
use crate::realize::{
    ConsoleSession, Controller, EmulationBackend, InteractiveSession, Interrupt, NoSession,
    OvsBackend, RealizeOpts, RealizeReport, RecordingBackend, TopologyRealizer,
};
use crate::topo::ShapeSpec;

/// 初始化 tracing；日志写到 stderr，stdout 留给交互会话和 JSON 输出
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();
}

/// 解析形状尺寸（k / 节点数 / 主机数）；0 交给生成器报错
pub fn parse_size(raw: &str) -> Result<usize, TopoError> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        TopoError::invalid("size", format!("`{raw}` is not an integer"))
    })?;
    usize::try_from(value)
        .map_err(|_| TopoError::invalid("size", format!("must be positive, got {value}")))
}

pub fn parse_port(raw: &str) -> Result<u16, TopoError> {
    raw.trim().parse().map_err(|_| {
        TopoError::invalid("controller_port", format!("`{raw}` is not a port number"))
    })
}

/// 控制器位置参数
#[derive(Debug, Clone, Args)]
pub struct ControllerArgs {
    /// SDN 控制器 IP
    pub controller_ip: String,

    /// SDN 控制器端口
    #[arg(value_parser = parse_port)]
    pub controller_port: u16,
}

impl ControllerArgs {
    pub fn controller(&self) -> Controller {
        Controller::remote(self.controller_ip.clone(), self.controller_port)
    }
}

/// 实例化选项
#[derive(Debug, Clone, Args)]
pub struct RealizeArgs {
    /// 交换机协议版本
    #[arg(long, default_value = "OpenFlow13")]
    pub protocol: String,

    /// 等待交换机连上控制器的秒数
    #[arg(long, default_value_t = 30)]
    pub connect_timeout_secs: u64,

    /// 轮询控制通道状态的间隔（毫秒）
    #[arg(long, default_value_t = 500)]
    pub poll_interval_ms: u64,

    /// 只记录后端请求，不创建真实的 bridge / namespace
    #[arg(long)]
    pub dry_run: bool,

    /// 不进入交互会话，连通后立即 teardown
    #[arg(long)]
    pub batch: bool,

    /// 实例化前把生成的拓扑图写成 JSON
    #[arg(long)]
    pub dump_json: Option<PathBuf>,
}

impl RealizeArgs {
    pub fn opts(&self, controller: Controller, interrupt: Interrupt) -> RealizeOpts {
        RealizeOpts {
            protocol: self.protocol.clone(),
            controllers: vec![controller],
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            interrupt,
        }
    }
}

/// 生成并实例化一个形状
pub fn run_shape(
    spec: &ShapeSpec,
    controller: Controller,
    args: &RealizeArgs,
) -> Result<RealizeReport, TopoError> {
    info!(?spec, %controller, "🚀 生成拓扑");
    let graph = spec.generate()?;

    if let Some(path) = &args.dump_json {
        let json = graph.to_json_pretty()?;
        fs::write(path, json).map_err(|source| TopoError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "拓扑图已写出");
    }

    // Ctrl-C 不再直接结束进程，由各阶段看到标志后走 teardown
    let interrupt = Interrupt::install()?;
    let realizer = TopologyRealizer::new(args.opts(controller, interrupt.clone()));
    let mut backend: Box<dyn EmulationBackend> = if args.dry_run {
        Box::new(RecordingBackend::new())
    } else {
        let poll = Duration::from_millis(args.poll_interval_ms);
        Box::new(OvsBackend::system(poll).with_interrupt(interrupt.clone()))
    };
    let mut session: Box<dyn InteractiveSession> = if args.batch {
        Box::new(NoSession)
    } else {
        Box::new(ConsoleSession::stdio().with_interrupt(interrupt))
    };

    realizer.realize(graph, backend.as_mut(), session.as_mut())
}

/// 把运行结果转换成进程退出码
pub fn exit_code(result: Result<RealizeReport, TopoError>) -> ExitCode {
    match result {
        Ok(report) => {
            info!(
                switches = report.switches,
                hosts = report.hosts,
                links = report.links,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(TopoError::Interrupted) => {
            info!("已中断");
            ExitCode::from(130)
        }
        Err(err) => {
            error!(%err, "❌ 失败");
            ExitCode::FAILURE
        }
    }
}
