//! 只生成不实例化：读取形状 JSON，输出拓扑图 JSON
//!
//! 形状 JSON 例如 `{"kind": "fat_tree", "k": 4}`、`{"kind": "ring", "num_nodes": 4}`。

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dctopo_rs::TopoError;
use dctopo_rs::cli;
use dctopo_rs::topo::ShapeSpec;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "topology_json", about = "Generate a topology graph from a shape spec and print it as JSON")]
struct Args {
    /// Path to shape spec JSON
    #[arg(long)]
    spec: PathBuf,

    /// Output file; defaults to stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn run(args: &Args) -> Result<(), TopoError> {
    let raw = fs::read_to_string(&args.spec).map_err(|source| TopoError::Io {
        path: args.spec.clone(),
        source,
    })?;
    let spec = ShapeSpec::from_json(&raw)?;
    let graph = spec.generate()?;
    let json = graph.to_json_pretty()?;

    match &args.out {
        Some(path) => {
            fs::write(path, json).map_err(|source| TopoError::Io {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "拓扑图已写出");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    cli::init_tracing();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "❌ 失败");
            ExitCode::FAILURE
        }
    }
}
