//! Free-slot derivation: the complement of busy time inside a day's policy.
//!
//! All functions here work on [`Interval`]s of instants. Civil-time concerns
//! are settled by [`DayPolicy::window`] and
//! [`DayPolicy::blackout_intervals`] before any interval math runs.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

use crate::category::Category;
use crate::civil::CivilZone;
use crate::event::{AvailableSlot, Block};
use crate::policy::{DayPolicy, PolicyConfig};
use crate::time::Interval;

/// Busy spans of the given blocks; surgeries get `pre_op` extra lead time.
///
/// Non-occupying categories (cancelled, available) are ignored.
pub fn busy_intervals(blocks: &[Block], pre_op: Duration) -> Vec<Interval> {
    blocks
        .iter()
        .filter(|b| b.category().is_busy())
        .map(|b| match b.category() {
            Category::Surgery => b.interval().with_lead(pre_op),
            _ => b.interval(),
        })
        .collect()
}

/// Sorts and merges overlapping or touching intervals into maximal
/// disjoint runs.
pub fn flatten(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort();
    let mut runs: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match runs.last_mut() {
            Some(run) if interval.start <= run.end => run.end = run.end.max(interval.end),
            _ => runs.push(interval),
        }
    }
    runs
}

/// Walks `window` past the flattened busy `runs` and returns the gaps of at
/// least `min` length.
pub fn free_windows(window: Interval, runs: &[Interval], min: Duration) -> Vec<Interval> {
    let mut free = Vec::new();
    let mut cursor = window.start;
    let mut push = |start: DateTime<Utc>, end: DateTime<Utc>| {
        if let Some(gap) = Interval::try_new(start, end) {
            if gap.duration() >= min && !gap.is_empty() {
                free.push(gap);
            }
        }
    };

    for run in runs {
        if cursor >= window.end {
            break;
        }
        push(cursor, run.start.min(window.end));
        cursor = cursor.max(run.end);
    }
    if cursor < window.end {
        push(cursor, window.end);
    }
    free
}

/// Removes every blackout from `candidate`; fragments shorter than `min`
/// are dropped.
pub fn subtract_blackouts(candidate: Interval, blackouts: &[Interval], min: Duration) -> Vec<Interval> {
    let mut pieces = vec![candidate];
    for blackout in blackouts {
        pieces = pieces
            .into_iter()
            .flat_map(|piece| subtract(piece, blackout))
            .collect();
    }
    pieces.retain(|p| p.duration() >= min && !p.is_empty());
    pieces
}

/// `piece` minus `hole`: zero, one or two fragments.
fn subtract(piece: Interval, hole: &Interval) -> Vec<Interval> {
    if !piece.overlaps(hole) {
        return vec![piece];
    }
    let mut out = Vec::with_capacity(2);
    if piece.start < hole.start {
        out.push(Interval::new(piece.start, hole.start));
    }
    if hole.end < piece.end {
        out.push(Interval::new(hole.end, piece.end));
    }
    out
}

/// Drops the part of each slot before `not_before`, then re-applies `min`.
pub fn clip_not_before(
    slots: Vec<AvailableSlot>,
    not_before: DateTime<Utc>,
    min: Duration,
) -> Vec<AvailableSlot> {
    slots
        .into_iter()
        .filter_map(|slot| {
            let start = slot.interval.start.max(not_before);
            Interval::try_new(start, slot.interval.end)
        })
        .filter(|i| i.duration() >= min && !i.is_empty())
        .map(AvailableSlot::new)
        .collect()
}

/// Computes one civil day's free slots.
///
/// `blocks` are the merge engine's output for anything touching the day.
/// Every returned slot lies inside the day's business window and overlaps
/// neither a busy block (surgeries including their pre-op lead) nor a
/// blackout.
pub fn derive_availability(
    blocks: &[Block],
    date: NaiveDate,
    policy: &PolicyConfig,
    zone: &CivilZone,
) -> Vec<AvailableSlot> {
    let day: DayPolicy = policy.resolve(date);
    let window = day.window(zone);
    if window.is_empty() {
        debug!(%date, "closed day, no availability");
        return Vec::new();
    }

    let runs = flatten(busy_intervals(blocks, policy.pre_op_buffer()));
    let blackouts = day.blackout_intervals(zone);
    let min = policy.min_slot();

    let slots: Vec<AvailableSlot> = free_windows(window, &runs, min)
        .into_iter()
        .flat_map(|candidate| subtract_blackouts(candidate, &blackouts, min))
        .map(AvailableSlot::new)
        .collect();

    debug!(
        %date,
        busy_runs = runs.len(),
        blackouts = blackouts.len(),
        slots = slots.len(),
        "derived availability"
    );
    slots
}
