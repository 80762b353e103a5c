//! Structured reporting of experiment results.
//!
//! Values are collected through a thread local reporter into a JSON
//! document which is printed to stdout when the outermost guard drops.
//! Contexts nest roughly along the call graph: `push_context` opens an
//! object under a key, `push_collection_context` opens an array whose
//! items are created with `push_collection_item`.

use serde_json::{Map, Value};
use std::cell::RefCell;

pub use serde_json::json;

#[derive(Debug)]
enum Node {
    Object(Map<String, Value>),
    Collection(Vec<Value>),
}

#[derive(Debug)]
struct Frame {
    // key under which this frame is inserted into its parent object,
    // None for collection items
    key: Option<String>,
    node: Node,
}

#[derive(Debug)]
pub struct Reporter {
    stack: Vec<Frame>,
}

impl Default for Reporter {
    fn default() -> Self {
        Reporter {
            stack: vec![Frame {
                key: None,
                node: Node::Object(Map::new()),
            }],
        }
    }
}

impl Reporter {
    fn report(&mut self, key: String, val: Value) {
        match &mut self.stack.last_mut().expect("reporting outside of any context").node {
            Node::Object(object) => {
                let prev = object.insert(key, val);
                if !cfg!(feature = "report-allow-override") {
                    assert!(prev.is_none(), "reported the same key twice");
                }
            }
            Node::Collection(_) => panic!("cannot report a keyed value into a collection"),
        }
    }

    fn push_object(&mut self, key: Option<String>) {
        self.stack.push(Frame { key, node: Node::Object(Map::new()) });
    }

    fn push_collection(&mut self, key: String) {
        self.stack.push(Frame {
            key: Some(key),
            node: Node::Collection(Vec::new()),
        });
    }

    fn pop(&mut self) {
        let frame = self.stack.pop().expect("tried to pop the root reporting context");
        let value = match frame.node {
            Node::Object(object) => Value::Object(object),
            Node::Collection(collection) => Value::Array(collection),
        };

        match &mut self.stack.last_mut().expect("tried to pop the root reporting context").node {
            Node::Object(object) => {
                let key = frame.key.expect("object context without key");
                let prev = object.insert(key, value);
                assert!(prev.is_none(), "popped into an already used key");
            }
            Node::Collection(collection) => {
                assert!(frame.key.is_none(), "keyed context inside a collection");
                collection.push(value);
            }
        }
    }

    fn into_root(mut self) -> Value {
        assert_eq!(self.stack.len(), 1, "unbalanced reporting contexts");
        match self.stack.pop().unwrap().node {
            Node::Object(object) => Value::Object(object),
            Node::Collection(_) => unreachable!("root context is always an object"),
        }
    }
}

thread_local! {
    static REPORTER: RefCell<Option<Reporter>> = RefCell::new(None);
}

#[must_use]
pub struct ContextGuard(());

impl Drop for ContextGuard {
    fn drop(&mut self) {
        with_reporter(Reporter::pop);
    }
}

/// Open a nested object under the given key until the guard drops.
pub fn push_context(key: String) -> ContextGuard {
    with_reporter(|r| r.push_object(Some(key)));
    ContextGuard(())
}

#[must_use]
pub struct CollectionContextGuard(());

impl Drop for CollectionContextGuard {
    fn drop(&mut self) {
        with_reporter(Reporter::pop);
    }
}

/// Open a collection under the given key until the guard drops.
pub fn push_collection_context(key: String) -> CollectionContextGuard {
    with_reporter(|r| r.push_collection(key));
    CollectionContextGuard(())
}

impl CollectionContextGuard {
    pub fn push_collection_item(&mut self) -> CollectionItemContextGuard {
        with_reporter(|r| r.push_object(None));
        CollectionItemContextGuard(self)
    }
}

#[must_use]
pub struct CollectionItemContextGuard<'a>(&'a CollectionContextGuard);

impl<'a> Drop for CollectionItemContextGuard<'a> {
    fn drop(&mut self) {
        with_reporter(Reporter::pop);
    }
}

fn with_reporter(f: impl FnOnce(&mut Reporter)) {
    REPORTER.with(|reporter| {
        if let Some(r) = reporter.borrow_mut().as_mut() {
            f(r);
        }
    });
}

pub fn report(key: String, val: Value) {
    if cfg!(feature = "report-to-stderr") {
        eprintln!("{}: {}", key, val);
    }
    report_silent(key, val)
}

pub fn report_silent(key: String, val: Value) {
    with_reporter(|r| r.report(key, val));
}

#[must_use]
pub struct ReportingGuard(());

impl Drop for ReportingGuard {
    fn drop(&mut self) {
        REPORTER.with(|reporter| {
            if let Some(r) = reporter.replace(None) {
                println!("{}", r.into_root());
            }
        });
    }
}

#[macro_export]
macro_rules! report {
    ($k:expr, $($json:tt)+) => { $crate::report::report($k.to_string(), $crate::report::json!($($json)+)) };
}

#[macro_export]
macro_rules! report_silent {
    ($k:expr, $($json:tt)+) => { $crate::report::report_silent($k.to_string(), $crate::report::json!($($json)+)) };
}

/// Activate reporting for this thread and report a few facts about the run.
/// The returned guard prints the collected JSON on drop.
pub fn enable_reporting(program: &str) -> ReportingGuard {
    REPORTER.with(|reporter| reporter.replace(Some(Reporter::default())));

    report!("program", program);
    if let Ok(start) = time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc2822) {
        report!("start_time", start);
    }
    report!("args", std::env::args().collect::<Vec<String>>());

    if let Ok(hostname) = std::process::Command::new("hostname").output() {
        report!("hostname", String::from_utf8_lossy(&hostname.stdout).trim());
    }

    ReportingGuard(())
}

pub mod benchmark;
pub use benchmark::*;
