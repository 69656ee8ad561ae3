//! Star 拓扑
//!
//! 一台中心交换机，所有主机直连

use std::process::ExitCode;

use clap::Parser;
use dctopo_rs::cli::{self, ControllerArgs, RealizeArgs};
use dctopo_rs::topo::ShapeSpec;

#[derive(Debug, Parser)]
#[command(name = "star", about = "Star 拓扑：所有主机直连中心交换机")]
struct Args {
    #[command(flatten)]
    controller: ControllerArgs,

    /// 主机数量
    #[arg(value_parser = cli::parse_size)]
    num_hosts: usize,

    #[command(flatten)]
    realize: RealizeArgs,
}

fn main() -> ExitCode {
    cli::init_tracing();

    let args = Args::parse();
    let spec = ShapeSpec::Star {
        num_hosts: args.num_hosts,
    };
    cli::exit_code(cli::run_shape(
        &spec,
        args.controller.controller(),
        &args.realize,
    ))
}
