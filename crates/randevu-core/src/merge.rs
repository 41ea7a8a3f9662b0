//! Collapsing runs of adjacent appointments into summary blocks.
//!
//! Back-to-back short visits are a privacy leak when shown one by one, so
//! any run of events separated by less than the merge gap becomes a single
//! [`MergedBlock`] with per-category counts. Surgeries are never merged.

use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::category::Category;
use crate::event::{Block, ClassifiedEvent, MergedBlock};
use crate::name::{NameNormalizer, abbreviate};
use crate::time::Interval;

/// Categories that are always emitted on their own.
pub const NEVER_MERGE: &[Category] = &[Category::Surgery];

/// Category of a block whose members disagree.
pub const MIXED_CATEGORY: Category = Category::Busy;

/// Groups adjacent events of one civil day.
#[derive(Debug, Clone)]
pub struct MergeEngine {
    gap: Duration,
    normalizer: NameNormalizer,
}

impl MergeEngine {
    pub fn new(gap: Duration, normalizer: NameNormalizer) -> Self {
        Self { gap, normalizer }
    }

    /// Merges one day's events, which must be sorted by start.
    ///
    /// Cancelled events are skipped. The gap is measured from the latest end
    /// seen in the pending run, so an event nested inside a longer one never
    /// splits the run.
    pub fn merge(&self, events: &[ClassifiedEvent]) -> Vec<Block> {
        let mut out = Vec::new();
        let mut pending: Vec<&ClassifiedEvent> = Vec::new();
        let mut pending_end: Option<DateTime<Utc>> = None;

        for event in events {
            if event.category == Category::Cancelled {
                continue;
            }

            if NEVER_MERGE.contains(&event.category) {
                self.flush(&mut pending, &mut out);
                pending_end = None;
                out.push(Block::Single(event.clone()));
                continue;
            }

            if let Some(end) = pending_end {
                if event.interval.start - end >= self.gap {
                    self.flush(&mut pending, &mut out);
                    pending_end = None;
                }
            }
            pending_end = Some(
                pending_end.map_or(event.interval.end, |end| end.max(event.interval.end)),
            );
            pending.push(event);
        }
        self.flush(&mut pending, &mut out);
        out
    }

    fn flush(&self, pending: &mut Vec<&ClassifiedEvent>, out: &mut Vec<Block>) {
        match pending.len() {
            0 => {}
            1 => out.push(Block::Single(pending[0].clone())),
            _ => out.push(Block::Merged(self.summarize(pending))),
        }
        pending.clear();
    }

    fn summarize(&self, members: &[&ClassifiedEvent]) -> MergedBlock {
        let first = members[0];
        let end = members
            .iter()
            .map(|m| m.interval.end)
            .max()
            .unwrap_or(first.interval.end);

        let counts: Vec<(Category, usize)> = Category::ALL
            .iter()
            .map(|c| (*c, members.iter().filter(|m| m.category == *c).count()))
            .filter(|(_, n)| *n > 0)
            .collect();
        let category = match counts.as_slice() {
            [(only, _)] => *only,
            _ => MIXED_CATEGORY,
        };

        let representative_title = members
            .iter()
            .map(|m| self.normalizer.normalize(&m.event.title))
            .find(|name| !name.is_empty())
            .and_then(|name| abbreviate(&name));

        trace!(
            id = %first.event.id,
            members = members.len(),
            representative = ?representative_title,
            "merged block"
        );

        MergedBlock {
            id: format!("merged-{}", first.event.id),
            interval: Interval::new(first.interval.start, end),
            category,
            member_count: members.len(),
            counts,
            representative_title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CalendarEvent;
    use crate::time::EventTime;
    use chrono::{DateTime, TimeZone, Utc};

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 5, h, m, 0).unwrap()
    }

    fn event(
        id: &str,
        title: &str,
        category: Category,
        start: (u32, u32),
        minutes: i64,
    ) -> ClassifiedEvent {
        let start = utc(start.0, start.1);
        let end = start + Duration::minutes(minutes);
        ClassifiedEvent {
            event: CalendarEvent::new(id, title, EventTime::from_utc(start), EventTime::from_utc(end)),
            interval: Interval::new(start, end),
            category,
            rule: "test",
        }
    }

    fn engine() -> MergeEngine {
        MergeEngine::new(Duration::minutes(15), NameNormalizer::default())
    }

    fn merged(block: &Block) -> &MergedBlock {
        match block {
            Block::Merged(m) => m,
            Block::Single(e) => panic!("expected merged block, got single {}", e.id()),
        }
    }

    mod grouping {
        use super::*;

        #[test]
        fn close_controls_merge() {
            let events = vec![
                event("a", "K1 Ahmet Can", Category::Control, (6, 0), 20),
                event("b", "K2 Mehmet", Category::Control, (6, 30), 20),
                event("c", "K Ayşe", Category::Control, (7, 0), 20),
            ];
            let out = engine().merge(&events);
            assert_eq!(out.len(), 1);
            let block = merged(&out[0]);
            assert_eq!(block.member_count, 3);
            assert_eq!(block.id, "merged-a");
            assert_eq!(block.category, Category::Control);
            assert_eq!(block.interval, Interval::new(utc(6, 0), utc(7, 20)));
            assert_eq!(block.counts, vec![(Category::Control, 3)]);
        }

        #[test]
        fn distant_controls_stay_separate() {
            let events = vec![
                event("a", "K1", Category::Control, (6, 0), 10),
                event("b", "K2", Category::Control, (6, 30), 10),
                event("c", "K3", Category::Control, (7, 0), 10),
            ];
            let out = engine().merge(&events);
            assert_eq!(out.len(), 3);
            assert!(out.iter().all(|b| matches!(b, Block::Single(_))));
        }

        #[test]
        fn gap_equal_to_threshold_splits() {
            let events = vec![
                event("a", "K1", Category::Control, (6, 0), 15),
                event("b", "K2", Category::Control, (6, 30), 15),
            ];
            assert_eq!(engine().merge(&events).len(), 2);
        }

        #[test]
        fn single_member_passes_through_unchanged() {
            let only = event("a", "K1 Ahmet", Category::Control, (6, 0), 15);
            let out = engine().merge(std::slice::from_ref(&only));
            assert_eq!(out, vec![Block::Single(only)]);
        }

        #[test]
        fn empty_input() {
            assert!(engine().merge(&[]).is_empty());
        }
    }

    mod categories {
        use super::*;

        #[test]
        fn mixed_run_is_busy_with_counts() {
            let events = vec![
                event("a", "K1", Category::Control, (6, 0), 10),
                event("b", "m Selin", Category::Exam, (6, 15), 10),
                event("c", "K2", Category::Control, (6, 30), 10),
            ];
            let out = engine().merge(&events);
            let block = merged(&out[0]);
            assert_eq!(block.category, MIXED_CATEGORY);
            assert_eq!(block.counts, vec![(Category::Control, 2), (Category::Exam, 1)]);
        }

        #[test]
        fn surgery_breaks_runs_and_stands_alone() {
            let events = vec![
                event("a", "K1", Category::Control, (6, 0), 10),
                event("b", "K2", Category::Control, (6, 15), 10),
                event("s", "🔪 Ayşe", Category::Surgery, (6, 30), 90),
                event("c", "K3", Category::Control, (8, 5), 10),
            ];
            let out = engine().merge(&events);
            assert_eq!(out.len(), 3);
            assert_eq!(merged(&out[0]).member_count, 2);
            assert!(matches!(&out[1], Block::Single(e) if e.category == Category::Surgery));
            assert!(matches!(&out[2], Block::Single(e) if e.id() == "c"));
        }

        #[test]
        fn adjacent_surgeries_never_merge() {
            let events = vec![
                event("s1", "🔪 A", Category::Surgery, (6, 0), 60),
                event("s2", "🔪 B", Category::Surgery, (7, 0), 60),
            ];
            assert_eq!(engine().merge(&events).len(), 2);
        }

        #[test]
        fn cancelled_events_are_skipped() {
            let events = vec![
                event("a", "K1", Category::Control, (6, 0), 10),
                event("x", "iptal", Category::Cancelled, (6, 10), 10),
                event("b", "K2", Category::Control, (6, 20), 10),
            ];
            let out = engine().merge(&events);
            assert_eq!(out.len(), 1);
            assert_eq!(merged(&out[0]).member_count, 2);
        }
    }

    mod extents {
        use super::*;

        #[test]
        fn nested_event_does_not_shrink_block() {
            let events = vec![
                event("a", "Kongre", Category::Busy, (6, 0), 120),
                event("b", "K1", Category::Control, (6, 30), 15),
                event("c", "K2", Category::Control, (8, 10), 15),
            ];
            let out = engine().merge(&events);
            assert_eq!(out.len(), 1);
            let block = merged(&out[0]);
            assert_eq!(block.interval, Interval::new(utc(6, 0), utc(8, 25)));
        }

        #[test]
        fn representative_title_is_abbreviated_first_name() {
            let events = vec![
                event("a", "K1", Category::Control, (6, 0), 10),
                event("b", "K2 | ayşe YILMAZ tel 0555 111 22 33", Category::Control, (6, 15), 10),
            ];
            let out = engine().merge(&events);
            assert_eq!(
                merged(&out[0]).representative_title.as_deref(),
                Some("Ayşe Y.")
            );
        }
    }
}
