//! Stage timing for turn evaluation.
//!
//! A RAII guard wraps each of the four phases (classify, score, space,
//! select) without touching function signatures. Timings accumulate in
//! thread-local cells on the evaluation thread and are merged into global
//! atomics at a convenient point, so the hot path never contends on a
//! lock. Disabled unless SNAKE_PROFILE is set.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

const STAGES: [&str; 4] = ["classify", "score", "space", "select"];

thread_local! {
    static LOCAL_NANOS: RefCell<[u64; 4]> = RefCell::new([0; 4]);
    static LOCAL_CALLS: RefCell<[usize; 4]> = RefCell::new([0; 4]);
}

static GLOBAL_NANOS: [AtomicU64; 4] =
    [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)];
static GLOBAL_CALLS: [AtomicUsize; 4] =
    [AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0)];

#[inline]
pub fn is_profiling_enabled() -> bool {
    std::env::var("SNAKE_PROFILE").is_ok()
}

fn stage_index(stage: &str) -> Option<usize> {
    STAGES.iter().position(|&s| s == stage)
}

pub struct ProfileGuard {
    start: Instant,
    index: usize,
}

impl ProfileGuard {
    pub fn new(stage: &'static str) -> Option<Self> {
        if !is_profiling_enabled() {
            return None;
        }
        stage_index(stage).map(|index| ProfileGuard { start: Instant::now(), index })
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed().as_nanos() as u64;
        LOCAL_NANOS.with(|t| t.borrow_mut()[self.index] += elapsed);
        LOCAL_CALLS.with(|c| c.borrow_mut()[self.index] += 1);
    }
}

/// Flushes this thread's counters into the global totals. Called after an
/// evaluation finishes on a blocking worker, and by the replay tool before
/// printing.
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }
    LOCAL_NANOS.with(|t| {
        let mut nanos = t.borrow_mut();
        for (index, slot) in nanos.iter_mut().enumerate() {
            GLOBAL_NANOS[index].fetch_add(*slot, Ordering::Relaxed);
            *slot = 0;
        }
    });
    LOCAL_CALLS.with(|c| {
        let mut calls = c.borrow_mut();
        for (index, slot) in calls.iter_mut().enumerate() {
            GLOBAL_CALLS[index].fetch_add(*slot, Ordering::Relaxed);
            *slot = 0;
        }
    });
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }
    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\nEvaluation profile ({}ms total):", total_time_ms);
    for (index, stage) in STAGES.iter().enumerate() {
        let nanos = GLOBAL_NANOS[index].load(Ordering::Relaxed);
        let calls = GLOBAL_CALLS[index].load(Ordering::Relaxed);
        let ms = nanos as f64 / 1_000_000.0;
        let pct = if total_ns > 0 { 100.0 * nanos as f64 / total_ns as f64 } else { 0.0 };
        let avg_us = if calls > 0 { nanos as f64 / (calls as f64 * 1000.0) } else { 0.0 };
        eprintln!(
            "  {:<9} {:>9.2}ms ({:>5.1}%)  {} calls, {:.2}us avg",
            stage, ms, pct, calls, avg_us
        );
    }
    eprintln!();
}

#[macro_export]
macro_rules! profile {
    ($stage:expr, $code:block) => {{
        let _guard = $crate::profile::ProfileGuard::new($stage);
        $code
    }};
}
