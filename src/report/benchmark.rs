//! Wall clock measurement helpers for the preprocessing and query code.

use super::*;
use std::sync::atomic::{compiler_fence, Ordering::SeqCst};
use std::time::*;

/// Measure how long the given lambda takes, print and report the time
/// under `running_time_ms` and return the result of the lambda.
pub fn report_time<Out, F: FnOnce() -> Out>(name: &str, f: F) -> Out {
    report_time_with_key(name, "running_time_ms", f)
}

/// Measure how long the given lambda takes, print the time, report it
/// under the given key and return the result of the lambda.
pub fn report_time_with_key<Out, F: FnOnce() -> Out>(name: &str, key: &'static str, f: F) -> Out {
    eprintln!("starting {}", name);
    let (res, duration) = measure(f);
    let ms = duration.as_secs_f64() * 1000.0;
    eprintln!("{} done - took: {}ms", name, ms);
    report!(key, ms);
    res
}

/// Measure how long the given lambda takes and return its result together
/// with the duration.
pub fn measure<Out, F: FnOnce() -> Out>(f: F) -> (Out, Duration) {
    compiler_fence(SeqCst);
    let start = Instant::now();
    let res = f();
    let passed = start.elapsed();
    compiler_fence(SeqCst);
    (res, passed)
}

/// Repeatedly measures the time passed since it was started.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Timer {
        Timer { start: Instant::now() }
    }

    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    pub fn get_passed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    pub fn get_passed(&self) -> Duration {
        self.start.elapsed()
    }
}
