//! Fat-tree 拓扑
//!
//! 生成 k-ary fat-tree 并连接到远程控制器

use std::process::ExitCode;

use clap::Parser;
use dctopo_rs::cli::{self, ControllerArgs, RealizeArgs};
use dctopo_rs::topo::fat_tree::DEFAULT_HOSTS_PER_EDGE;
use dctopo_rs::topo::ShapeSpec;

#[derive(Debug, Parser)]
#[command(name = "fat_tree", about = "Fat-tree 拓扑：k 个 pod，(k/2)² 台核心交换机")]
struct Args {
    #[command(flatten)]
    controller: ControllerArgs,

    /// fat-tree 参数 k（正偶数）
    #[arg(value_parser = cli::parse_size)]
    k: usize,

    /// 每台边缘交换机挂载的主机数
    #[arg(long, default_value_t = DEFAULT_HOSTS_PER_EDGE)]
    hosts_per_edge: usize,

    #[command(flatten)]
    realize: RealizeArgs,
}

fn main() -> ExitCode {
    cli::init_tracing();

    let args = Args::parse();
    let spec = ShapeSpec::FatTree {
        k: args.k,
        hosts_per_edge: args.hosts_per_edge,
    };
    cli::exit_code(cli::run_shape(
        &spec,
        args.controller.controller(),
        &args.realize,
    ))
}
