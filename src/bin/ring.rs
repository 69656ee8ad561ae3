//! Ring 拓扑
//!
//! 每个位置一台交换机和一台主机，交换机连成环

use std::process::ExitCode;

use clap::Parser;
use dctopo_rs::cli::{self, ControllerArgs, RealizeArgs};
use dctopo_rs::topo::ShapeSpec;

#[derive(Debug, Parser)]
#[command(name = "ring", about = "Ring 拓扑：s1-s2-...-sn-s1，每台交换机挂一台主机")]
struct Args {
    #[command(flatten)]
    controller: ControllerArgs,

    /// 交换机（及主机）数量
    #[arg(value_parser = cli::parse_size)]
    num_nodes: usize,

    #[command(flatten)]
    realize: RealizeArgs,
}

fn main() -> ExitCode {
    cli::init_tracing();

    let args = Args::parse();
    let spec = ShapeSpec::Ring {
        num_nodes: args.num_nodes,
    };
    cli::exit_code(cli::run_shape(
        &spec,
        args.controller.controller(),
        &args.realize,
    ))
}
