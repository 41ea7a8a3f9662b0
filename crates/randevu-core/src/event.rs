//! Event types for each pipeline stage.
//!
//! This module provides the records that flow through the pipeline:
//! - [`CalendarEvent`]: A provider-agnostic upstream event (patient text included)
//! - [`ClassifiedEvent`]: An event with its resolved interval and category
//! - [`Block`] / [`MergedBlock`]: The merge engine's output
//! - [`AvailableSlot`]: A synthesized free window
//! - [`PublicEvent`]: The privacy-safe outbound record

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::civil::CivilZone;
use crate::locale::Language;
use crate::time::{EventTime, Interval};

/// A calendar event as delivered by a provider.
///
/// Titles, locations and descriptions may contain patient-identifying
/// text; none of them is ever copied into a [`PublicEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Unique identifier for the event (provider-specific).
    pub id: String,
    /// The event title/summary as typed by the receptionist.
    pub title: String,
    /// Provider color tag, if any.
    pub color_id: Option<String>,
    /// When the event starts.
    pub start: EventTime,
    /// When the event ends.
    pub end: EventTime,
    /// The raw location field from the event.
    pub location: Option<String>,
    /// The raw description field from the event.
    pub description: Option<String>,
}

impl CalendarEvent {
    /// Creates a new CalendarEvent with required fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: EventTime,
        end: EventTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            color_id: None,
            start,
            end,
            location: None,
            description: None,
        }
    }

    /// Returns true if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    /// Builder method to set the color tag.
    pub fn with_color(mut self, color_id: impl Into<String>) -> Self {
        self.color_id = Some(color_id.into());
        self
    }

    /// Builder method to set raw location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set raw description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An event with its category, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEvent {
    pub event: CalendarEvent,
    /// Absolute span of the event.
    pub interval: Interval,
    pub category: Category,
    /// Name of the classifier rule that fired.
    pub rule: &'static str,
}

impl ClassifiedEvent {
    pub fn id(&self) -> &str {
        &self.event.id
    }
}

/// A run of two or more adjacent events collapsed into one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedBlock {
    /// `merged-<first member id>`.
    pub id: String,
    /// First member's start to the latest member end.
    pub interval: Interval,
    /// Shared category, or [`Category::Busy`] for mixed runs.
    pub category: Category,
    pub member_count: usize,
    /// Per-category member counts, in [`Category::ALL`] order, zeros omitted.
    pub counts: Vec<(Category, usize)>,
    /// Abbreviated patient name of the first nameable member. Internal only.
    pub representative_title: Option<String>,
}

/// Output of the merge engine: a lone event passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Single(ClassifiedEvent),
    Merged(MergedBlock),
}

impl Block {
    pub fn interval(&self) -> Interval {
        match self {
            Self::Single(event) => event.interval,
            Self::Merged(block) => block.interval,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Single(event) => event.category,
            Self::Merged(block) => block.category,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Single(event) => event.id(),
            Self::Merged(block) => &block.id,
        }
    }

    /// Number of upstream events the block stands for.
    pub fn member_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Merged(block) => block.member_count,
        }
    }
}

/// A bookable free window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AvailableSlot {
    pub interval: Interval,
}

impl AvailableSlot {
    pub fn new(interval: Interval) -> Self {
        Self { interval }
    }

    /// Slots always carry [`Category::Available`].
    pub fn category(&self) -> Category {
        Category::Available
    }

    /// `available-<YYYYMMDDTHHMM>` of the civil start.
    pub fn id(&self, zone: &CivilZone) -> String {
        format!(
            "available-{}",
            zone.wall_clock(self.interval.start).format("%Y%m%dT%H%M")
        )
    }
}

/// The outbound record handed to the presentation layer.
///
/// `title` is always a generic localized label; patient text never reaches
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<usize>,
}

impl PublicEvent {
    /// Creates the outbound record for a merge-engine block.
    pub fn from_block(block: &Block, zone: &CivilZone, language: Language) -> Self {
        let (title, member_count) = match block {
            Block::Single(event) => (language.label(event.category).to_string(), None),
            Block::Merged(merged) => (language.summary(&merged.counts), Some(merged.member_count)),
        };
        let interval = block.interval();
        Self {
            id: block.id().to_string(),
            title,
            start: zone.to_offset(interval.start),
            end: zone.to_offset(interval.end),
            category: block.category(),
            member_count,
        }
    }

    /// Creates the outbound record for a free slot.
    pub fn from_slot(slot: &AvailableSlot, zone: &CivilZone, language: Language) -> Self {
        Self {
            id: slot.id(zone),
            title: language.label(Category::Available).to_string(),
            start: zone.to_offset(slot.interval.start),
            end: zone.to_offset(slot.interval.end),
            category: Category::Available,
            member_count: None,
        }
    }
}
