//! The end-to-end schedule computation.
//!
//! [`Pipeline::run`] takes an already-fetched batch of [`CalendarEvent`]s and
//! returns the chronologically sorted, privacy-safe [`PublicEvent`] list:
//!
//! 1. resolve each event to an [`Interval`] in the civil zone,
//! 2. classify it,
//! 3. drop cancelled events and anything outside the requested days,
//! 4. merge adjacent events per civil day,
//! 5. derive free slots per civil day,
//! 6. genericize every record and sort.
//!
//! The computation is synchronous and performs no I/O. Without a
//! `not_before` bound its output depends only on its inputs.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info, trace};

use crate::availability::{clip_not_before, derive_availability};
use crate::category::Category;
use crate::civil::CivilZone;
use crate::classify::{Classifier, ClassifierConfig};
use crate::event::{AvailableSlot, Block, CalendarEvent, ClassifiedEvent, PublicEvent};
use crate::fold::FoldTable;
use crate::locale::Language;
use crate::merge::MergeEngine;
use crate::name::NameNormalizer;
use crate::policy::{PolicyConfig, PolicyError};
use crate::time::Interval;

/// Everything the pipeline is parameterized by.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub zone: CivilZone,
    pub fold: FoldTable,
    pub classifier: ClassifierConfig,
    pub policy: PolicyConfig,
}

/// The days to compute and how to present them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub first_day: NaiveDate,
    pub days: u32,
    /// Free slots never start before this instant.
    pub not_before: Option<DateTime<Utc>>,
    pub language: Language,
}

impl ScheduleRequest {
    pub fn new(first_day: NaiveDate, days: u32) -> Self {
        Self {
            first_day,
            days,
            not_before: None,
            language: Language::default(),
        }
    }

    #[must_use]
    pub fn with_not_before(mut self, not_before: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// The requested civil dates, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first_day.iter_days().take(self.days as usize)
    }

    /// The requested days as one span of instants.
    pub fn range(&self, zone: &CivilZone) -> Interval {
        let start = zone.start_of_day(self.first_day);
        let last = self
            .first_day
            .checked_add_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(self.first_day);
        Interval::new(start, zone.start_of_day(last).max(start))
    }
}

/// Structured pipeline output before genericization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub blocks: Vec<Block>,
    pub slots: Vec<AvailableSlot>,
}

/// Classifier, merge engine and availability deriver wired together.
#[derive(Debug)]
pub struct Pipeline {
    zone: CivilZone,
    policy: PolicyConfig,
    classifier: Classifier,
    merger: MergeEngine,
}

impl Default for Pipeline {
    fn default() -> Self {
        let config = PipelineConfig::default();
        Self::build(config)
    }
}

impl Pipeline {
    /// Validates the policy and builds the pipeline.
    pub fn new(config: PipelineConfig) -> Result<Self, PolicyError> {
        config.policy.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PipelineConfig) -> Self {
        let merger = MergeEngine::new(
            config.policy.merge_gap(),
            NameNormalizer::new(config.fold),
        );
        Self {
            zone: config.zone,
            classifier: Classifier::new(&config.classifier, config.fold),
            policy: config.policy,
            merger,
        }
    }

    pub fn zone(&self) -> &CivilZone {
        &self.zone
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Resolves and classifies every event, sorted by start, end, then id.
    ///
    /// Events whose end precedes their start are dropped.
    pub fn classify_all(&self, events: &[CalendarEvent]) -> Vec<ClassifiedEvent> {
        let mut classified: Vec<ClassifiedEvent> = events
            .iter()
            .filter_map(|event| {
                let Some(interval) = self.zone.resolve(&event.start, &event.end) else {
                    debug!(id = %event.id, "dropping event with inverted span");
                    return None;
                };
                let duration = (!event.is_all_day()).then(|| interval.minutes());
                let verdict =
                    self.classifier
                        .explain(&event.title, event.color_id.as_deref(), duration);
                trace!(
                    id = %event.id,
                    title = %event.title,
                    category = %verdict.category,
                    rule = verdict.rule,
                    "classified"
                );
                Some(ClassifiedEvent {
                    event: event.clone(),
                    interval,
                    category: verdict.category,
                    rule: verdict.rule,
                })
            })
            .collect();
        classified.sort_by(|a, b| {
            (a.interval.start, a.interval.end, a.id()).cmp(&(b.interval.start, b.interval.end, b.id()))
        });
        classified
    }

    /// Runs every stage and returns blocks and slots for the request.
    pub fn schedule(&self, events: &[CalendarEvent], request: &ScheduleRequest) -> Schedule {
        let range = request.range(&self.zone);
        let classified = self.classify_all(events);
        let total = classified.len();

        let mut by_day: BTreeMap<NaiveDate, Vec<ClassifiedEvent>> = BTreeMap::new();
        let mut cancelled = 0usize;
        for event in classified {
            if event.category == Category::Cancelled {
                cancelled += 1;
                continue;
            }
            if !touches(&event.interval, &range) {
                continue;
            }
            by_day
                .entry(self.zone.date_of(event.interval.start))
                .or_default()
                .push(event);
        }

        let blocks: Vec<Block> = by_day
            .values()
            .flat_map(|events| self.merger.merge(events))
            .collect();

        let mut slots = Vec::new();
        for date in request.dates() {
            let bounds = self.zone.day_bounds(date);
            let day_blocks: Vec<Block> = blocks
                .iter()
                .filter(|b| touches(&b.interval(), &bounds))
                .cloned()
                .collect();
            slots.extend(derive_availability(&day_blocks, date, &self.policy, &self.zone));
        }
        if let Some(not_before) = request.not_before {
            slots = clip_not_before(slots, not_before, self.policy.min_slot());
        }

        debug!(
            events = events.len(),
            classified = total,
            cancelled,
            blocks = blocks.len(),
            slots = slots.len(),
            "pipeline stages done"
        );
        Schedule { blocks, slots }
    }

    /// Computes the outbound record list.
    pub fn run(&self, events: &[CalendarEvent], request: &ScheduleRequest) -> Vec<PublicEvent> {
        let schedule = self.schedule(events, request);
        let mut out: Vec<PublicEvent> = schedule
            .blocks
            .iter()
            .map(|b| PublicEvent::from_block(b, &self.zone, request.language))
            .chain(
                schedule
                    .slots
                    .iter()
                    .map(|s| PublicEvent::from_slot(s, &self.zone, request.language)),
            )
            .collect();
        out.sort_by(|a, b| (a.start, a.end, &a.id).cmp(&(b.start, b.end, &b.id)));
        info!(
            first_day = %request.first_day,
            days = request.days,
            records = out.len(),
            "schedule computed"
        );
        out
    }
}

/// True if `interval` shares time with `range`, counting zero-length
/// intervals inside it.
fn touches(interval: &Interval, range: &Interval) -> bool {
    interval.overlaps(range) || (interval.is_empty() && range.contains(interval.start))
}
