//! Replay timing for a BFS trace.
//!
//! The core never sleeps. A presentation layer asks for a schedule and waits
//! between entries itself. Only discoveries cost time: each `Queued` entry
//! delays everything after it by one step, matching the stepwise highlight
//! animation.

use std::time::Duration;

use crate::{TraceEntry, TraceKind};

pub const DEFAULT_STEP: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStep<'a> {
    /// Time since the replay started at which `entry` should be shown.
    pub offset: Duration,
    pub entry: &'a TraceEntry,
}

pub fn replay_schedule(trace: &[TraceEntry], step: Duration) -> Vec<ReplayStep<'_>> {
    let mut queued_before = 0u32;
    trace
        .iter()
        .map(|entry| {
            let offset = step.saturating_mul(queued_before);
            if entry.kind == TraceKind::Queued {
                queued_before = queued_before.saturating_add(1);
            }
            ReplayStep { offset, entry }
        })
        .collect()
}

/// Delay to wait after showing `entry` before showing the next one.
pub fn delay_after(entry: &TraceEntry, step: Duration) -> Duration {
    if entry.kind == TraceKind::Queued {
        step
    } else {
        Duration::ZERO
    }
}
