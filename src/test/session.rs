use crate::net::TopologyGraph;
use crate::realize::{ConsoleSession, InteractiveSession, Interrupt};
use crate::topo::{ShapeGenerator, Star};
use std::io::{self, BufReader, Cursor, Read};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn run_script(graph: &TopologyGraph, script: &str) -> String {
    let mut session = ConsoleSession::new(Cursor::new(script.to_string()), Vec::new());
    session.run(graph).expect("session");
    String::from_utf8(session.into_output()).expect("utf8 output")
}

#[test]
fn console_lists_nodes_links_and_neighbors() {
    let graph = Star::new(2).generate().unwrap();
    let out = run_script(&graph, "nodes\nlinks\nnet\nexit\n");

    assert!(out.contains("star topology: 3 nodes, 2 links"), "{out}");
    assert!(out.contains("s0 h1 h2"), "{out}");
    assert!(out.contains("h1 <-> s0"), "{out}");
    assert!(out.contains("h2 <-> s0"), "{out}");
    assert!(out.contains("s0: h1 h2"), "{out}");
}

#[test]
fn console_dump_shows_dpid_and_kind() {
    let graph = Star::new(1).generate().unwrap();
    let out = run_script(&graph, "dump\n");
    assert!(out.contains("<star_switch s0 dpid=0500000000000001>"), "{out}");
    assert!(out.contains("<host h1>"), "{out}");
}

#[test]
fn console_reports_unknown_commands_and_stops_at_exit() {
    let graph = Star::new(1).generate().unwrap();
    let out = run_script(&graph, "\nbogus\nquit\nnodes\n");
    assert!(out.contains("*** Unknown command: bogus"), "{out}");
    assert!(!out.contains("available nodes"), "{out}");
}

#[test]
fn console_ends_on_eof() {
    let graph = Star::new(1).generate().unwrap();
    let out = run_script(&graph, "help");
    assert!(out.contains("Documented commands"), "{out}");
    assert_eq!(out.matches("dctopo> ").count(), 2);
}

/// 一直阻塞，直到对应的 sender 被丢弃（模拟终端上没有输入）
struct IdleInput(mpsc::Receiver<()>);

impl Read for IdleInput {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        let _ = self.0.recv();
        Ok(0)
    }
}

#[test]
fn console_ends_on_interrupt_while_waiting_for_input() {
    let graph = Star::new(1).generate().unwrap();
    let (hold, idle) = mpsc::channel();
    let interrupt = Interrupt::new();
    let mut session = ConsoleSession::new(BufReader::new(IdleInput(idle)), Vec::new())
        .with_interrupt(interrupt.clone());

    let trigger = thread::spawn(move || {
        thread::sleep(Duration::from_millis(150));
        interrupt.trigger();
    });
    session.run(&graph).expect("session");
    trigger.join().unwrap();

    let out = String::from_utf8(session.into_output()).unwrap();
    assert!(out.ends_with("dctopo> \nInterrupt\n"), "{out:?}");
    drop(hold);
}
