//! 交互会话
//!
//! 控制通道连通后，实例化器把控制权交给会话；会话返回即开始 teardown。

use std::io::{self, BufRead, BufReader, Stdout, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use super::interrupt::Interrupt;
use crate::net::TopologyGraph;
use tracing::info;

pub trait InteractiveSession {
    fn run(&mut self, graph: &TopologyGraph) -> io::Result<()>;
}

/// 不进入交互，直接返回（批处理模式）
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSession;

impl InteractiveSession for NoSession {
    fn run(&mut self, _graph: &TopologyGraph) -> io::Result<()> {
        Ok(())
    }
}

const HELP: &str = "\
Documented commands:
  nodes   list all nodes
  links   list all links
  net     list each node with its neighbors
  dump    show node details (kind, dpid, position)
  help    show this message
  exit    tear down the topology and quit (also: quit, EOF)";

/// 检查中断标志的间隔
const INTERRUPT_POLL: Duration = Duration::from_millis(100);

enum Next {
    Line(String),
    Eof,
    Interrupted,
}

/// 最小命令行：查看拓扑，`exit` / EOF / Ctrl-C 退出
///
/// 输入在单独的线程里按行读取，阻塞在 stdin 上时也能响应中断。
pub struct ConsoleSession<W> {
    lines: Receiver<io::Result<String>>,
    output: W,
    prompt: String,
    interrupt: Interrupt,
}

impl ConsoleSession<Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

fn read_lines<R: BufRead>(mut input: R, tx: Sender<io::Result<String>>) {
    loop {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => {
                if tx.send(Ok(line)).is_err() {
                    return;
                }
            }
            Err(err) => {
                let _ = tx.send(Err(err));
                return;
            }
        }
    }
}

impl<W: Write> ConsoleSession<W> {
    pub fn new<R: BufRead + Send + 'static>(input: R, output: W) -> Self {
        let (tx, lines) = mpsc::channel();
        thread::spawn(move || read_lines(input, tx));
        Self {
            lines,
            output,
            prompt: "dctopo> ".to_string(),
            interrupt: Interrupt::new(),
        }
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn next_line(&self) -> io::Result<Next> {
        loop {
            if self.interrupt.is_triggered() {
                return Ok(Next::Interrupted);
            }
            match self.lines.recv_timeout(INTERRUPT_POLL) {
                Ok(line) => return line.map(Next::Line),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(Next::Eof),
            }
        }
    }

    fn exec(&mut self, cmd: &str, graph: &TopologyGraph) -> io::Result<()> {
        let out = &mut self.output;
        match cmd {
            "help" => writeln!(out, "{HELP}")?,
            "nodes" => {
                writeln!(out, "available nodes are:")?;
                let names: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
                writeln!(out, "{}", names.join(" "))?;
            }
            "links" => {
                for link in graph.links() {
                    writeln!(out, "{} <-> {}", link.a, link.b)?;
                }
            }
            "net" => {
                for node in graph.nodes() {
                    let peers: Vec<&str> = graph
                        .neighbors(&node.id)
                        .into_iter()
                        .map(|n| n.id.as_str())
                        .collect();
                    writeln!(out, "{}: {}", node.id, peers.join(" "))?;
                }
            }
            "dump" => {
                for node in graph.nodes() {
                    write!(out, "<{} {}", node.kind, node.id)?;
                    if let Some(dpid) = node.dpid {
                        write!(out, " dpid={dpid}")?;
                    }
                    if let Some(pod) = node.pod {
                        write!(out, " pod={pod}")?;
                    }
                    if let Some(index) = node.index {
                        write!(out, " index={index}")?;
                    }
                    writeln!(out, ">")?;
                }
            }
            other => writeln!(out, "*** Unknown command: {other}")?,
        }
        Ok(())
    }
}

impl<W: Write> InteractiveSession for ConsoleSession<W> {
    fn run(&mut self, graph: &TopologyGraph) -> io::Result<()> {
        writeln!(
            self.output,
            "*** {} topology: {} nodes, {} links (type `help` for commands)",
            graph.shape(),
            graph.nodes().len(),
            graph.links().len()
        )?;

        loop {
            write!(self.output, "{}", self.prompt)?;
            self.output.flush()?;

            let line = match self.next_line()? {
                Next::Line(line) => line,
                Next::Eof => {
                    writeln!(self.output)?;
                    break;
                }
                Next::Interrupted => {
                    writeln!(self.output, "\nInterrupt")?;
                    info!("会话被中断");
                    break;
                }
            };
            match line.trim() {
                "" => continue,
                "exit" | "quit" => break,
                cmd => self.exec(cmd, graph)?,
            }
        }
        Ok(())
    }
}
